//! loopsmith - reusable, parameterized loop templates for blog post listings
//!
//! A loop is one listing of posts on a page. loopsmith resolves a named
//! template, fetches posts from a [`PostSource`], renders the template once
//! per post with a [`LoopContext`] (index, parity, first/last, owner), and
//! remembers which posts a page already showed so later loops can skip them.
//! Loops nest: a template may run another loop, and the caller's current post
//! and query come back untouched afterwards.

pub mod domain;
pub mod engine;
pub mod template;
pub mod storage;
pub mod cli;

pub use domain::{LoopArgs, LoopContext, Post, PostId};
pub use engine::{LoopOutcome, LoopRunner, PostSource, RequestContext};
pub use template::{HandlebarsRenderer, Renderer, TemplateResolver};
