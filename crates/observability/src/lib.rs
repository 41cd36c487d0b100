//! Tracing/logging setup shared by every shopdesk binary.

/// Tracing configuration (filters, writers).
pub mod tracing;

/// Initialize process-wide logging to stdout.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize process-wide logging to stderr.
///
/// For processes whose stdout carries data: the stdio tool server (protocol
/// channel) and the CLIs (JSON output).
pub fn init_stderr() {
    tracing::init_stderr();
}
