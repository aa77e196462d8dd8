//! Post rows, loading skeletons, the error alert and the pager.

use crate::ui::helpers::{self, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{PagerInfo, PostItem};

/// Each post takes a title row and a body row.
pub fn render_post_rows(row: usize, items: &[PostItem], theme: &Theme, max_row: usize) -> usize {
    let mut current_row = row;
    for item in items {
        if current_row + 1 > max_row {
            break;
        }
        position_cursor(current_row, 1);
        print!("  {}{}", Theme::bold(), Theme::fg(&theme.colors.text_normal));
        helpers::render_highlighted_text(
            &item.title,
            &item.highlight_ranges,
            theme,
            &theme.colors.text_normal,
        );
        print!("{}", Theme::reset());

        position_cursor(current_row + 1, 1);
        print!("  {}{}{}", Theme::fg(&theme.colors.text_dim), item.body, Theme::reset());
        current_row += 2;
    }
    current_row
}

/// Placeholder bars shaped like a title and body.
pub fn render_skeleton_rows(row: usize, count: usize, theme: &Theme, cols: usize) -> usize {
    let title_width = (cols / 2).max(4);
    let body_width = cols.saturating_sub(8).max(4);

    let mut current_row = row;
    for i in 0..count {
        let shrink = (i % 3) * 4;
        position_cursor(current_row, 1);
        print!(
            "  {}{}{}",
            Theme::fg(&theme.colors.skeleton_fg),
            "▆".repeat(title_width.saturating_sub(shrink)),
            Theme::reset()
        );
        position_cursor(current_row + 1, 1);
        print!(
            "  {}{}{}",
            Theme::fg(&theme.colors.skeleton_fg),
            "▂".repeat(body_width.saturating_sub(shrink)),
            Theme::reset()
        );
        current_row += 2;
    }
    current_row
}

pub fn render_error_alert(row: usize, message: &str, theme: &Theme, cols: usize) -> usize {
    position_cursor(row + 1, 1);
    let text = truncate(&format!("Error: {message}"), cols.saturating_sub(4));
    print!(
        "  {}{}{text}{}",
        Theme::bold(),
        Theme::fg(&theme.colors.error_fg),
        Theme::reset()
    );
    row + 2
}

/// `‹ Prev   Page x / y   Next ›` with disabled ends dimmed.
pub fn render_pager(row: usize, pager: &PagerInfo, theme: &Theme, cols: usize) -> usize {
    let label = pager.label();
    let line_len = label.chars().count() + 20;
    let padding = cols.saturating_sub(line_len) / 2;

    let side = |enabled: bool| {
        if enabled {
            Theme::fg(&theme.colors.text_normal)
        } else {
            format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim))
        }
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(padding));
    print!("{}‹ Prev{}", side(pager.has_prev), Theme::reset());
    print!("   {}{label}{}   ", Theme::fg(&theme.colors.header_fg), Theme::reset());
    print!("{}Next ›{}", side(pager.has_next), Theme::reset());
    row + 1
}
