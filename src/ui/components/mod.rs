//! UI component renderers.
//!
//! Each component prints one region starting at a given row and returns the
//! next free row.
//!
//! # Components
//!
//! - `header`: Title, view tabs, theme indicator
//! - `footer`: Keybinding hints
//! - `search`: Boxed text input (search and compose)
//! - `tasks`: Task rows and remaining count
//! - `posts`: Post rows, skeletons, error alert, pager
//! - `empty`: Empty-state message
//!
//! # Layouts
//!
//! - [`render_tasks_layout`]: Header + filters + (compose) + tasks + stats + footer
//! - [`render_posts_layout`]: Header + search + posts/skeleton/alert + pager + footer

mod empty;
mod footer;
mod header;
mod posts;
mod search;
mod tasks;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{PostsContent, PostsView, TasksView, UIViewModel};

use empty::render_empty_state;
use footer::render_footer;
use header::{render_header, render_tabs};
use posts::{render_error_alert, render_pager, render_post_rows, render_skeleton_rows};
use search::render_input_box;
use tasks::{render_stats, render_task_rows};

fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Draws the shared frame and returns the first and last body rows.
fn render_frame(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) -> (usize, usize) {
    let mut current_row = 2;
    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    let footer_row = rows.saturating_sub(1);
    let border_row = footer_row.saturating_sub(1);
    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);

    (current_row, border_row.saturating_sub(1))
}

pub fn render_tasks_layout(vm: &UIViewModel, view: &TasksView, theme: &Theme, rows: usize, cols: usize) {
    let (mut current_row, last_row) = render_frame(vm, theme, rows, cols);

    position_cursor(current_row, 1);
    render_tabs(&view.filters, theme);
    current_row += 1;

    if let Some(draft) = &view.compose {
        current_row = render_input_box(current_row, "New task", draft, true, theme, cols);
    }

    if let Some(empty) = &view.empty_state {
        render_empty_state(current_row, empty, theme, cols);
    } else {
        render_task_rows(current_row, &view.items, theme, cols);
    }

    render_stats(last_row, &view.stats, theme);
}

pub fn render_posts_layout(vm: &UIViewModel, view: &PostsView, theme: &Theme, rows: usize, cols: usize) {
    let (mut current_row, last_row) = render_frame(vm, theme, rows, cols);

    current_row = render_input_box(
        current_row,
        "Search",
        &view.search_bar.query,
        view.search_bar.focused,
        theme,
        cols,
    );

    let list_end = last_row.saturating_sub(1);
    match &view.content {
        PostsContent::Loading { skeleton_rows } => {
            render_skeleton_rows(current_row, *skeleton_rows, theme, cols);
        }
        PostsContent::Failed { message } => {
            render_error_alert(current_row, message, theme, cols);
        }
        PostsContent::Empty(empty) => {
            render_empty_state(current_row, empty, theme, cols);
        }
        PostsContent::Items(items) => {
            render_post_rows(current_row, items, theme, list_end);
        }
    }

    if let Some(pager) = &view.pager {
        render_pager(last_row, pager, theme, cols);
    }
}
