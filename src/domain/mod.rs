//! Domain models for loopsmith
//!
//! Posts, loop arguments and per-item loop context, without any I/O.

mod args;
mod context;
mod post;

pub use args::{
    parse_flag, ArgsError, LoopArgs, LoopDefaults, Order, OrderBy, PostQuery, ResolvedArgs,
};
pub use context::LoopContext;
pub use post::{slugify, Post, PostId};
