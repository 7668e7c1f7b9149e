//! Built-in middleware.

pub mod logger;

pub use logger::logger;
