//! Tracing/logging setup shared by the binaries.

pub mod tracing;

pub use self::tracing::{LogFormat, UnknownLogFormat};

/// Initialize process-wide tracing with the given output format.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(format: LogFormat) {
    self::tracing::init(format);
}
