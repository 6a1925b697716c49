//! # Loop Engine
//!
//! Runs loops: merges arguments, applies duplicate and sticky suppression,
//! fetches posts, renders each one and restores the caller's state.
//!
//! ## Request Lifecycle
//!
//! ```text
//! RequestContext::new()          one per page render
//!   ├── runner.run(args)         loop #1, records its posts as seen
//!   │     └── template
//!   │           └── frame.run_loop(args)   nested loop, same request
//!   └── runner.run(args)         loop #2, skips posts loop #1 showed
//! ```
//!
//! ## Key Types
//!
//! - [`LoopRunner`] - Executes loop calls
//! - [`RequestContext`] - Seen ids, ambient state and page output for one render
//! - [`AmbientScope`] - Restores the ambient state when dropped
//! - [`Frame`] - What a template sees while rendering one item
//! - [`PostSource`] - Where posts come from

mod request;
mod runner;
mod seen;
mod source;

pub use request::{Ambient, AmbientScope, QueryState, RequestContext};
pub use runner::{Frame, LoopOutcome, LoopRunner};
pub use seen::SeenIds;
pub use source::{apply_query, MemorySource, PostSource};
