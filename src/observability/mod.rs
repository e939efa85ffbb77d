//! OpenTelemetry tracing exported to a local file.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → FileSpanExporter → storefront-otlp.json
//! ```
//!
//! Each export is one OTLP/JSON document per line, so the file can be fed to
//! any OTLP-aware viewer. The file rotates at 10 MB and keeps three backups.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from `trace_level` in
//! the configuration, otherwise `info`.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use file_writer::RotationPolicy;
pub use init::init_tracing;
