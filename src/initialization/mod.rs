//! Host-side initialization.
//!
//! The library is a pure data layer and needs no runtime resources. The
//! only thing a host may want to set up is the logger.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
