//! Header: title, view tabs and the active theme.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{HeaderInfo, TabInfo};

pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("{}", header.title);
    print!("{}", Theme::reset());

    let mut used = header.title.chars().count();
    used += render_tabs(&header.tabs, theme);

    let theme_text = format!("theme: {} ", header.theme_label);
    let gap = cols.saturating_sub(used + theme_text.len());
    print!("{}", " ".repeat(gap));
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{theme_text}");
    print!("{}", Theme::reset());

    row + 1
}

/// Prints `[ label ]` chips, the active one inverted. Returns the printed width.
pub fn render_tabs(tabs: &[TabInfo], theme: &Theme) -> usize {
    let mut width = 0;
    for tab in tabs {
        let chip = format!(" {} ", tab.label);
        print!(" ");
        if tab.active {
            print!("{}", Theme::bold());
            print!("{}", Theme::fg(&theme.colors.tab_active_fg));
            print!("{}", Theme::bg(&theme.colors.tab_active_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_dim));
        }
        print!("{chip}");
        print!("{}", Theme::reset());
        width += 1 + chip.chars().count();
    }
    width
}
