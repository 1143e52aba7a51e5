//! Span export to a local JSON-lines file.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → JsonLinesExporter → trace file
//! ```
//!
//! Every finished span becomes one line in the trace file (by default
//! `<data-local-dir>/roster/roster-trace.json`). The file rotates at 10 MB and
//! keeps three numbered backups.
//!
//! The level comes from `trace_level` in the configuration, default `"info"`.
//! Searches, resolutions and action settlements are all logged at `debug`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`tracer`]: Tracer provider and span exporter
//! - [`span_record`]: JSON shape of one exported span
//! - [`file_writer`]: Size-rotated line writer

mod file_writer;
mod init;
mod span_record;
mod tracer;

pub use init::init_tracing;
