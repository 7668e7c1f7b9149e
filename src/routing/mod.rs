//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     (method, pattern, handler)
//!     → pattern.rs (split + classify segments)
//!     → node.rs (insert into the method's trie)
//!     → router.rs (handler stored under "METHOD-pattern")
//!
//! Lookup (per request):
//!     (method, path)
//!     → pattern.rs (split path)
//!     → node.rs (depth-first search for a terminal node)
//!     → router.rs (bind params from the node's own pattern)
//!     → Return: (node, Params) or no match
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, read-only at runtime
//! - No regex, no query parsing, no percent-decoding
//! - Deterministic: first match in child insertion order wins

pub mod node;
pub mod params;
pub mod pattern;
pub mod router;

pub use node::TrieNode;
pub use params::Params;
pub use pattern::{parse_pattern, split_segments, Segment};
pub use router::{not_found, route_key, Router};
