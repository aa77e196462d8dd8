//! Task list rows and the remaining-count line.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::TaskItem;

pub fn render_task_rows(row: usize, items: &[TaskItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_task_row(current_row, item, theme, cols);
    }
    current_row
}

fn render_task_row(row: usize, item: &TaskItem, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let base_fg = if item.is_selected {
        print!("{}", Theme::bg(&theme.colors.selection_bg));
        &theme.colors.selection_fg
    } else {
        &theme.colors.text_normal
    };

    let (mark, mark_fg) = if item.completed {
        ("[x]", &theme.colors.completed_fg)
    } else {
        ("[ ]", base_fg)
    };
    print!(" {}{mark}{} ", Theme::fg(mark_fg), Theme::fg(base_fg));

    if item.completed {
        print!("{}{}{}", Theme::strikethrough(), item.text, Theme::reset());
        if item.is_selected {
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        }
    } else {
        print!("{}", item.text);
    }

    let used = 5 + item.text.chars().count();
    let age_len = item.age.chars().count() + 1;
    print!("{}", " ".repeat(cols.saturating_sub(used + age_len)));
    if item.is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{} ", item.age);
    print!("{}", Theme::reset());
    row + 1
}

pub fn render_stats(row: usize, stats: &str, theme: &Theme) -> usize {
    position_cursor(row, 1);
    print!("{} {stats}{}", Theme::fg(&theme.colors.text_dim), Theme::reset());
    row + 1
}
