//! Boxed single-line text input, used for the posts search and the task
//! compose bar.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;

const INPUT_BOX_MARGIN: usize = 2;

/// Draws a three-row input box. A focused box shows a block cursor after
/// the text; an unfocused one is dimmed.
pub fn render_input_box(
    row: usize,
    label: &str,
    text: &str,
    focused: bool,
    theme: &Theme,
    cols: usize,
) -> usize {
    let box_width = cols.saturating_sub(INPUT_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = if focused {
        Theme::fg(&theme.colors.search_bar_border)
    } else {
        Theme::fg(&theme.colors.border)
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(INPUT_BOX_MARGIN));
    print!("{border}┌{}┐{}", "─".repeat(inner_width), Theme::reset());

    let cursor = if focused { "█" } else { "" };
    let content = truncate(&format!(" {label}: {text}{cursor}"), inner_width);
    let padding = inner_width.saturating_sub(content.chars().count());

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(INPUT_BOX_MARGIN));
    print!("{border}│");
    if focused {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{content}");
    print!("{}", " ".repeat(padding));
    print!("{border}│{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(INPUT_BOX_MARGIN));
    print!("{border}└{}┘{}", "─".repeat(inner_width), Theme::reset());

    row + 3
}
