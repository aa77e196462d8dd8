//! Top-level rendering entry point.
//!
//! Computes the view model from the state snapshot and hands it to the layout
//! of the active view.

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{BodyView, UIViewModel};

/// Renders one frame to stdout.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);
    render_viewmodel(&viewmodel, state.theme(), rows, cols);
}

fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    match &vm.body {
        BodyView::Tasks(view) => components::render_tasks_layout(vm, view, theme, rows, cols),
        BodyView::Posts(view) => components::render_posts_layout(vm, view, theme, rows, cols),
    }
}
