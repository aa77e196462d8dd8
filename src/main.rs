//! Zellij plugin wrapper and entry point.
//!
//! Thin integration layer between the Taskboard library and the Zellij plugin
//! system: host events become [`taskboard::Event`]s, returned
//! [`taskboard::Action`]s become host calls.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   Zellij Main Thread         │
//! │  ┌────────────────────────┐  │
//! │  │  State (plugin)        │  │  ← UI state, event handling
//! │  └────────────────────────┘  │
//! │      │ IPC        ▲          │
//! │      ▼            │          │
//! │  ┌────────────────────────┐  │
//! │  │  PluginWorker          │  │  ← key-value storage
//! │  │  (worker thread)       │  │
//! │  └────────────────────────┘  │
//! └──────────────────────────────┘
//! ```
//!
//! # Keybindings
//!
//! Global (normal mode):
//! - `Tab`: Switch view
//! - `t`: Toggle theme
//! - `q`: Hide plugin
//!
//! Tasks view:
//! - `j`/`k`/arrows: Move selection
//! - `a`/`i`: Compose a task (`Enter` adds, `Esc` cancels)
//! - `Space`/`x`: Toggle completed
//! - `d`: Delete
//! - `1`/`2`/`3`: All / Active / Completed, `f`: cycle filter
//!
//! Posts view:
//! - `/`: Focus search (`Enter`/`Esc` leaves it)
//! - `l`/`n`/`Right`: Next page
//! - `h`/`p`/`Left`: Previous page

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(not(target_family = "wasm"), allow(dead_code, unused_imports))]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, post_message_to_plugin};

use taskboard::posts::ActivationId;
use taskboard::worker::{TaskboardWorker, WorkerMessage, WorkerResponse, WORKER_NAME};
use taskboard::{handle_event, Action, Config, Event, InputMode, TaskFilter, ViewMode};

#[cfg(target_family = "wasm")]
register_plugin!(State);
#[cfg(target_family = "wasm")]
register_worker!(PluginWorker, taskboard_worker, TASKBOARD_WORKER);

#[cfg(not(target_family = "wasm"))]
fn main() {}

/// Context key carrying the activation id of a posts request.
const ACTIVATION_CONTEXT_KEY: &str = "activation";

struct State {
    app: taskboard::AppState,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: taskboard::initialize(&Config::default()),
        }
    }
}

impl ZellijPlugin for State {
    /// Parses configuration, requests web access, subscribes to events and
    /// asks the worker for the persisted values.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        taskboard::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(posts_url = %config.posts_url, "parsed configuration");
        self.app = taskboard::initialize(&config);

        request_permission(&[PermissionType::WebAccess]);

        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::WebRequestResult,
            EventType::Timer,
            EventType::Visible,
            EventType::PermissionRequestResult,
        ]);

        for action in self.app.startup_actions() {
            Self::execute_action(&action);
        }

        tracing::debug!("plugin load complete");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => self.map_key_event(key),
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                Self::map_custom_message_event(&message, &payload)
            }
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                Self::map_web_request_result(status, body, &context)
            }
            zellij_tile::prelude::Event::Timer(_) => Some(Event::TimerElapsed),
            zellij_tile::prelude::Event::Visible(visible) => Some(Event::Visible(visible)),
            zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                Some(Event::PermissionsResult {
                    granted: matches!(status, PermissionStatus::Granted),
                })
            }
            _ => None,
        };
        let Some(our_event) = our_event else {
            return false;
        };

        match handle_event(&mut self.app, our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in &actions {
                    Self::execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::error!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        taskboard::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::Timer(_) => "Timer".to_string(),
            zellij_tile::prelude::Event::Visible(visible) => format!("Visible({visible})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Maps keys by input mode and view. While editing every printable key is
    /// text.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if let InputMode::Editing(_) = self.app.input_mode {
            return Some(match key.bare_key {
                BareKey::Esc => Event::Escape,
                BareKey::Enter => Event::Enter,
                BareKey::Backspace => Event::Backspace,
                BareKey::Tab => Event::NextView,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            });
        }

        let global = match key.bare_key {
            BareKey::Tab => Some(Event::NextView),
            BareKey::Char('t') => Some(Event::ToggleTheme),
            BareKey::Char('q') => Some(Event::CloseFocus),
            BareKey::Esc => Some(Event::Escape),
            _ => None,
        };
        if global.is_some() {
            return global;
        }

        match self.app.view_mode {
            ViewMode::Tasks => Some(match key.bare_key {
                BareKey::Down | BareKey::Char('j') => Event::KeyDown,
                BareKey::Up | BareKey::Char('k') => Event::KeyUp,
                BareKey::Char('a' | 'i') => Event::StartCompose,
                BareKey::Char(' ' | 'x') => Event::ToggleTask,
                BareKey::Char('d') => Event::DeleteTask,
                BareKey::Char('1') => Event::SetTaskFilter(TaskFilter::All),
                BareKey::Char('2') => Event::SetTaskFilter(TaskFilter::Active),
                BareKey::Char('3') => Event::SetTaskFilter(TaskFilter::Completed),
                BareKey::Char('f') => Event::CycleTaskFilter,
                _ => return None,
            }),
            ViewMode::Posts => Some(match key.bare_key {
                BareKey::Char('/') => Event::StartSearch,
                BareKey::Right | BareKey::Char('l' | 'n') => Event::NextPage,
                BareKey::Left | BareKey::Char('h' | 'p') => Event::PrevPage,
                _ => return None,
            }),
        }
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => {
                tracing::debug!(key = %response.key(), "worker response received");
                Some(Event::WorkerResponse(response))
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    /// Results without a parseable activation cannot belong to a panel.
    fn map_web_request_result(status: u16, body: Vec<u8>, context: &BTreeMap<String, String>) -> Option<Event> {
        let activation = context
            .get(ACTIVATION_CONTEXT_KEY)
            .and_then(|raw| raw.parse::<ActivationId>().ok());

        let Some(activation) = activation else {
            tracing::debug!(status, "web request result without activation context");
            return None;
        };

        Some(Event::PostsFetched {
            activation,
            status,
            body,
        })
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(key = %message.key(), payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    #[tracing::instrument(level = "debug")]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => hide_self(),
            Action::PostToWorker(message) => Self::post_worker_message(message),
            Action::FetchPosts { url, activation } => {
                let context = BTreeMap::from([(ACTIVATION_CONTEXT_KEY.to_string(), activation.to_string())]);
                web_request(url, HttpVerb::Get, BTreeMap::new(), vec![], context);
            }
            Action::ScheduleTimer { after, .. } => set_timeout(after.as_secs_f64()),
        }
    }
}

/// Zellij-facing wrapper around [`TaskboardWorker`].
#[derive(Default, Serialize, Deserialize)]
struct PluginWorker(TaskboardWorker);

impl ZellijWorker<'_> for PluginWorker {
    fn on_message(&mut self, message: String, payload: String) {
        taskboard::observability::init_tracing(&Config::default());

        if let Some(reply) = self.0.on_payload(&payload) {
            post_message_to_plugin(PluginMessage {
                name: message,
                payload: reply,
                worker_name: None,
            });
        }
    }
}
