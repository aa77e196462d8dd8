//! Event handling and state transitions.
//!
//! [`handle_event`] is the only place that mutates [`AppState`]. It returns
//! whether the frame must be redrawn together with the [`Action`]s the shim
//! should execute.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, `NextView`, `NextPage`, `PrevPage`
//! - **Input**: `Char`, `Backspace`, `Enter`, `Escape`
//! - **Commands**: `StartCompose`, `StartSearch`, `ToggleTask`, `DeleteTask`,
//!   `SetTaskFilter`, `CycleTaskFilter`, `ToggleTheme`, `CloseFocus`
//! - **Host**: `Visible`, `PermissionsResult`, `PostsFetched`, `TimerElapsed`
//! - **Worker**: `WorkerResponse`
//!
//! # Example
//!
//! ```rust
//! use taskboard::app::{handle_event, AppState, Event};
//! use taskboard::Config;
//!
//! let mut state = AppState::new(&Config::default());
//! let (render, actions) = handle_event(&mut state, Event::NextView)?;
//! assert!(render);
//! assert!(actions.is_empty()); // web access still pending
//! # Ok::<(), taskboard::TaskboardError>(())
//! ```

use super::modes::{EditTarget, InputMode, ViewMode};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::TaskFilter;
use crate::posts::ActivationId;
use crate::worker::WorkerResponse;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Moves the task cursor down.
    KeyDown,
    /// Moves the task cursor up.
    KeyUp,
    /// Printable key while editing.
    Char(char),
    Backspace,
    /// Submits the compose bar or leaves the search input.
    Enter,
    /// Leaves editing mode.
    Escape,

    /// Switches between the Tasks and Posts views.
    NextView,
    ToggleTheme,
    /// Hides the plugin.
    CloseFocus,

    StartCompose,
    StartSearch,
    ToggleTask,
    DeleteTask,
    SetTaskFilter(TaskFilter),
    CycleTaskFilter,

    NextPage,
    PrevPage,

    /// The plugin pane was shown or hidden.
    Visible(bool),

    /// Outcome of the web access permission request.
    PermissionsResult {
        granted: bool,
    },

    /// A posts request completed. `status` is the HTTP status the host reported.
    PostsFetched {
        activation: ActivationId,
        status: u16,
        body: Vec<u8>,
    },

    /// A host timer fired.
    TimerElapsed,

    WorkerResponse(WorkerResponse),
}

/// Processes one event.
///
/// # Errors
///
/// Reserved for failures of state transitions; storage and fetch problems are
/// absorbed into state and logged.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(&event)).entered();

    match event {
        Event::KeyDown => {
            if state.view_mode != ViewMode::Tasks {
                return Ok((false, vec![]));
            }
            state.task_view.move_down(state.tasks.get());
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            if state.view_mode != ViewMode::Tasks {
                return Ok((false, vec![]));
            }
            state.task_view.move_up();
            Ok((true, vec![]))
        }
        Event::Char(c) => match state.input_mode {
            InputMode::Editing(EditTarget::TaskDraft) => {
                state.draft.push(c);
                Ok((true, vec![]))
            }
            InputMode::Editing(EditTarget::PostQuery) => {
                let raw = state.posts.as_ref().map(|panel| {
                    let mut raw = panel.query().raw.clone();
                    raw.push(c);
                    raw
                });
                Ok(raw.map_or((false, vec![]), |raw| update_query(state, raw)))
            }
            InputMode::Normal => Ok((false, vec![])),
        },
        Event::Backspace => match state.input_mode {
            InputMode::Editing(EditTarget::TaskDraft) => Ok((state.draft.pop().is_some(), vec![])),
            InputMode::Editing(EditTarget::PostQuery) => {
                let raw = state.posts.as_ref().and_then(|panel| {
                    let mut raw = panel.query().raw.clone();
                    raw.pop().map(|_| raw)
                });
                Ok(raw.map_or((false, vec![]), |raw| update_query(state, raw)))
            }
            InputMode::Normal => Ok((false, vec![])),
        },
        Event::Enter => match state.input_mode {
            InputMode::Editing(EditTarget::TaskDraft) => Ok(submit_draft(state)),
            InputMode::Editing(EditTarget::PostQuery) => {
                state.input_mode = InputMode::Normal;
                Ok((true, vec![]))
            }
            InputMode::Normal => Ok((false, vec![])),
        },
        Event::Escape => match state.input_mode {
            InputMode::Editing(EditTarget::TaskDraft) => {
                state.draft.clear();
                state.input_mode = InputMode::Normal;
                Ok((true, vec![]))
            }
            InputMode::Editing(EditTarget::PostQuery) => {
                state.input_mode = InputMode::Normal;
                Ok((true, vec![]))
            }
            InputMode::Normal => Ok((false, vec![])),
        },
        Event::NextView => {
            let next = state.view_mode.next();
            tracing::debug!(from = ?state.view_mode, to = ?next, "switching view");

            if state.view_mode == ViewMode::Posts {
                state.teardown_posts();
            }
            state.input_mode = InputMode::Normal;
            state.view_mode = next;

            let actions = if state.posts_live() {
                state.mount_posts()
            } else {
                vec![]
            };
            Ok((true, actions))
        }
        Event::ToggleTheme => {
            let write = state.theme_choice.update(|choice| {
                *choice = choice.toggled();
                true
            });
            tracing::debug!(theme = state.theme_choice.get().label(), "theme toggled");
            Ok((true, write.map(Action::PostToWorker).into_iter().collect()))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::StartCompose => {
            if state.view_mode != ViewMode::Tasks {
                return Ok((false, vec![]));
            }
            state.input_mode = InputMode::Editing(EditTarget::TaskDraft);
            Ok((true, vec![]))
        }
        Event::StartSearch => {
            if state.posts.is_none() {
                return Ok((false, vec![]));
            }
            state.input_mode = InputMode::Editing(EditTarget::PostQuery);
            Ok((true, vec![]))
        }
        Event::ToggleTask => Ok(change_selected_task(state, |list, id| list.toggle(id))),
        Event::DeleteTask => Ok(change_selected_task(state, |list, id| list.delete(id))),
        Event::SetTaskFilter(filter) => {
            if state.task_view.filter == filter {
                return Ok((false, vec![]));
            }
            state.task_view.set_filter(filter, state.tasks.get());
            Ok((true, vec![]))
        }
        Event::CycleTaskFilter => {
            let next = state.task_view.filter.next();
            state.task_view.set_filter(next, state.tasks.get());
            Ok((true, vec![]))
        }
        Event::NextPage => Ok((state.posts.as_mut().is_some_and(|panel| panel.next_page()), vec![])),
        Event::PrevPage => Ok((state.posts.as_mut().is_some_and(|panel| panel.prev_page()), vec![])),
        Event::Visible(visible) => {
            if state.visible == visible {
                return Ok((false, vec![]));
            }
            state.visible = visible;
            tracing::debug!(visible, "visibility changed");

            if !visible {
                state.teardown_posts();
                return Ok((false, vec![]));
            }
            let actions = if state.posts_live() {
                state.mount_posts()
            } else {
                vec![]
            };
            Ok((true, actions))
        }
        Event::PermissionsResult { granted } => {
            tracing::debug!(granted, "web access permission result");
            let actions = state.set_web_access(granted);
            Ok((true, actions))
        }
        Event::PostsFetched {
            activation,
            status,
            body,
        } => {
            let Some(panel) = state.posts.as_mut() else {
                tracing::debug!(%activation, "posts response without mounted panel");
                return Ok((false, vec![]));
            };
            Ok((panel.on_response(activation, status, &body), vec![]))
        }
        Event::TimerElapsed => {
            let Some(timer) = state.timers.resolve_elapsed() else {
                return Ok((false, vec![]));
            };
            Ok((state.posts.as_mut().is_some_and(|panel| panel.on_timer(timer)), vec![]))
        }
        Event::WorkerResponse(response) => Ok(apply_worker_response(state, &response)),
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::KeyDown => "KeyDown",
        Event::KeyUp => "KeyUp",
        Event::Char(_) => "Char",
        Event::Backspace => "Backspace",
        Event::Enter => "Enter",
        Event::Escape => "Escape",
        Event::NextView => "NextView",
        Event::ToggleTheme => "ToggleTheme",
        Event::CloseFocus => "CloseFocus",
        Event::StartCompose => "StartCompose",
        Event::StartSearch => "StartSearch",
        Event::ToggleTask => "ToggleTask",
        Event::DeleteTask => "DeleteTask",
        Event::SetTaskFilter(_) => "SetTaskFilter",
        Event::CycleTaskFilter => "CycleTaskFilter",
        Event::NextPage => "NextPage",
        Event::PrevPage => "PrevPage",
        Event::Visible(_) => "Visible",
        Event::PermissionsResult { .. } => "PermissionsResult",
        Event::PostsFetched { .. } => "PostsFetched",
        Event::TimerElapsed => "TimerElapsed",
        Event::WorkerResponse(_) => "WorkerResponse",
    }
}

fn update_query(state: &mut AppState, raw: String) -> (bool, Vec<Action>) {
    let Some(panel) = state.posts.as_mut() else {
        return (false, vec![]);
    };
    let timer = state.timers.issue();
    let after = panel.on_query_input(raw, timer);
    (true, vec![Action::ScheduleTimer { timer, after }])
}

fn submit_draft(state: &mut AppState) -> (bool, Vec<Action>) {
    let text = std::mem::take(&mut state.draft);
    let now = chrono::Utc::now();

    let mut added = false;
    let write = state.tasks.update(|list| {
        added = list.add(&text, now).is_some();
        added
    });

    if added {
        state.input_mode = InputMode::Normal;
        state.task_view.clamp(state.tasks.get());
    } else {
        state.draft = text;
    }

    (true, write.map(Action::PostToWorker).into_iter().collect())
}

fn change_selected_task(
    state: &mut AppState,
    change: impl FnOnce(&mut crate::tasks::TaskList, i64) -> bool,
) -> (bool, Vec<Action>) {
    if state.view_mode != ViewMode::Tasks {
        return (false, vec![]);
    }
    let Some(id) = state.task_view.selected_id(state.tasks.get()) else {
        return (false, vec![]);
    };

    let write = state.tasks.update(|list| change(list, id));
    state.task_view.clamp(state.tasks.get());
    (write.is_some(), write.map(Action::PostToWorker).into_iter().collect())
}

fn apply_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    let handled = state
        .tasks
        .on_response(response)
        .or_else(|| state.theme_choice.on_response(response));

    match handled {
        Some(follow_up) => {
            state.task_view.clamp(state.tasks.get());
            let render = matches!(response, WorkerResponse::Value { .. });
            (render, follow_up.map(Action::PostToWorker).into_iter().collect())
        }
        None => {
            tracing::debug!(key = response.key(), "worker response for unknown key");
            (false, vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::TimerId;
    use crate::worker::WorkerMessage;
    use crate::Config;
    use serde_json::json;
    use std::time::Duration;

    fn posts_body(n: usize) -> Vec<u8> {
        let posts: Vec<_> = (1..=n)
            .map(|i| json!({"id": i, "title": format!("post {i}"), "body": "lorem"}))
            .collect();
        serde_json::to_vec(&posts).unwrap()
    }

    fn on_posts() -> AppState {
        let mut state = AppState::new(&Config::default());
        handle_event(&mut state, Event::PermissionsResult { granted: true }).unwrap();
        handle_event(&mut state, Event::NextView).unwrap();
        state
    }

    fn send(state: &mut AppState, event: Event) -> Vec<Action> {
        handle_event(state, event).unwrap().1
    }

    #[test]
    fn switching_to_posts_fetches_and_back_tears_down() {
        let mut state = AppState::new(&Config::default());
        send(&mut state, Event::PermissionsResult { granted: true });

        let actions = send(&mut state, Event::NextView);
        assert!(matches!(actions.as_slice(), [Action::FetchPosts { activation: ActivationId(1), .. }]));

        send(&mut state, Event::NextView);
        assert!(state.posts.is_none());

        let (render, _) = handle_event(
            &mut state,
            Event::PostsFetched {
                activation: ActivationId(1),
                status: 200,
                body: posts_body(3),
            },
        )
        .unwrap();
        assert!(!render);
    }

    #[test]
    fn late_response_of_previous_mount_is_ignored() {
        let mut state = on_posts();
        send(&mut state, Event::Visible(false));
        let actions = send(&mut state, Event::Visible(true));
        assert!(matches!(actions.as_slice(), [Action::FetchPosts { activation: ActivationId(2), .. }]));

        send(
            &mut state,
            Event::PostsFetched {
                activation: ActivationId(1),
                status: 200,
                body: posts_body(3),
            },
        );
        assert!(state.posts.as_ref().unwrap().fetch_state().is_loading());
    }

    #[test]
    fn typing_schedules_one_timer_per_keystroke_and_applies_last() {
        let mut state = on_posts();
        send(
            &mut state,
            Event::PostsFetched {
                activation: ActivationId(1),
                status: 200,
                body: posts_body(25),
            },
        );
        send(&mut state, Event::StartSearch);

        let mut timers = vec![];
        for c in "post 2".chars() {
            let actions = send(&mut state, Event::Char(c));
            match actions.as_slice() {
                [Action::ScheduleTimer { timer, after }] => {
                    assert_eq!(*after, Duration::from_millis(300));
                    timers.push(*timer);
                }
                other => panic!("unexpected actions {other:?}"),
            }
        }
        assert_eq!(timers.first(), Some(&TimerId(1)));

        for _ in 0..timers.len() - 1 {
            let (render, _) = handle_event(&mut state, Event::TimerElapsed).unwrap();
            assert!(!render);
        }
        let (render, _) = handle_event(&mut state, Event::TimerElapsed).unwrap();
        assert!(render);

        let panel = state.posts.as_ref().unwrap();
        assert_eq!(panel.query().debounced, "post 2");
        // "post 2" and "post 20".."post 25"
        assert_eq!(panel.view().filtered.len(), 7);
    }

    #[test]
    fn timer_after_teardown_does_not_touch_new_panel() {
        let mut state = on_posts();
        send(&mut state, Event::StartSearch);
        send(&mut state, Event::Char('x'));
        send(&mut state, Event::NextView);
        send(&mut state, Event::NextView);

        let (render, _) = handle_event(&mut state, Event::TimerElapsed).unwrap();
        assert!(!render);
        assert_eq!(state.posts.as_ref().unwrap().query().debounced, "");
    }

    #[test]
    fn compose_add_toggle_delete_persist() {
        let mut state = AppState::new(&Config::default());
        send(&mut state, Event::StartCompose);
        send(&mut state, Event::Enter);
        assert_eq!(state.input_mode, InputMode::Editing(EditTarget::TaskDraft));

        for c in "write docs".chars() {
            send(&mut state, Event::Char(c));
        }
        let actions = send(&mut state, Event::Enter);
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::Write { key, .. })] if key == "tasks"
        ));
        assert_eq!(state.task_list().len(), 1);
        assert_eq!(state.input_mode, InputMode::Normal);

        send(&mut state, Event::ToggleTask);
        assert_eq!(state.task_list().remaining(), 0);

        send(&mut state, Event::SetTaskFilter(TaskFilter::Active));
        assert!(send(&mut state, Event::DeleteTask).is_empty());

        send(&mut state, Event::SetTaskFilter(TaskFilter::All));
        send(&mut state, Event::DeleteTask);
        assert!(state.task_list().is_empty());
    }

    #[test]
    fn theme_toggle_writes_choice() {
        let mut state = AppState::new(&Config::default());
        let actions = send(&mut state, Event::ToggleTheme);
        match actions.as_slice() {
            [Action::PostToWorker(WorkerMessage::Write { key, value, .. })] => {
                assert_eq!(key, "theme");
                assert_eq!(value, &json!("light"));
            }
            other => panic!("unexpected actions {other:?}"),
        }
        assert_eq!(state.theme().name, "catppuccin-latte");
    }

    #[test]
    fn hydration_restores_theme_and_tasks() {
        let mut state = AppState::new(&Config::default());
        let startup = state.startup_actions();
        assert_eq!(startup.len(), 2);

        send(
            &mut state,
            Event::WorkerResponse(WorkerResponse::Value {
                key: "theme".to_string(),
                value: Some(json!("light")),
            }),
        );
        send(
            &mut state,
            Event::WorkerResponse(WorkerResponse::Value {
                key: "tasks".to_string(),
                value: Some(json!([
                    {"id": 1, "text": "stored", "completed": true, "createdAt": "2024-01-01T00:00:00Z"}
                ])),
            }),
        );

        assert_eq!(state.theme().name, "catppuccin-latte");
        assert_eq!(state.task_list().len(), 1);
        assert_eq!(state.task_list().remaining(), 0);
    }

    #[test]
    fn denied_permission_shows_alert_on_posts() {
        let mut state = AppState::new(&Config::default());
        send(&mut state, Event::NextView);
        send(&mut state, Event::PermissionsResult { granted: false });
        let panel = state.posts.as_ref().unwrap();
        assert!(panel.fetch_state().error().is_some());
    }
}
