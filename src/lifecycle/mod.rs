//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build Engine from the route table → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger() → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - All routes are registered before the listener is bound
//! - The engine is moved into the server, so no route can be added later

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_engine, route_handler};
