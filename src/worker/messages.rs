//! Plugin ↔ worker storage protocol.
//!
//! The plugin never touches the storage file itself. It sends [`WorkerMessage`]s
//! to the worker and receives [`WorkerResponse`]s back, both as JSON over the
//! Zellij message bus. Each message may carry the caller's [`TraceContext`] so
//! worker spans join the plugin's trace.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trace and span id of the sending span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span the worker span should be parented to.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the context of the current tracing span.
    ///
    /// Returns `None` when no valid OpenTelemetry span is active, e.g. before
    /// tracing is initialized or in native tests.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Builds a `", stringify!($variant), "` carrying the current trace context.")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    read(Read { key: String }),
    write(Write { key: String, value: Value }),
}

/// Requests from the plugin to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the value stored under `key`.
    Read {
        key: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Replace the value stored under `key`.
    Write {
        key: String,
        value: Value,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Read { key, .. } | Self::Write { key, .. } => key,
        }
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::Read { trace_context, .. } | Self::Write { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }
}

/// Replies from the worker to the plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Result of a read; `None` when the key was never written.
    Value { key: String, value: Option<Value> },

    /// A write reached disk.
    Written { key: String },

    /// The operation on `key` failed.
    Error { key: String, message: String },
}

impl WorkerResponse {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Value { key, .. } | Self::Written { key } | Self::Error { key, .. } => key,
        }
    }
}
