//! OpenTelemetry tracing with file-based OTLP export.
//!
//! ```text
//! tracing → tracing-opentelemetry → opentelemetry_sdk → FileExporter → JSON lines
//! ```
//!
//! Traces go to `~/.local/share/zellij/taskboard/taskboard-otlp.json`, rotated
//! at 10 MB with three backups. The level comes from the `trace_level`
//! option, default `info`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - `exporter`: `SpanExporter` writing to the rotating file
//! - `otlp`: OTLP JSON encoding
//! - `rotation`: Size-based file rotation

mod exporter;
pub mod init;
mod otlp;
mod rotation;

pub use init::init_tracing;
