//! Request-scoped rendering state
//!
//! One [`RequestContext`] lives for one page render. It owns:
//! - the seen post ids shared by every loop on the page
//! - the ambient slot (current post + current query) templates read from
//! - the page output buffer
//!
//! Loops never mutate the ambient slot directly. They open an
//! [`AmbientScope`], which snapshots the slot and writes the snapshot back
//! when dropped, so nested loops unwind correctly even on early return.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::domain::{Post, PostId, PostQuery};

use super::seen::SeenIds;

/// The query a loop is currently iterating
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub query: Option<PostQuery>,
    pub post_ids: Vec<PostId>,
    pub in_the_loop: bool,
}

/// State a template sees as "current"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ambient {
    pub post: Option<Post>,
    pub query: QueryState,
}

/// State for one page render
#[derive(Debug, Default)]
pub struct RequestContext {
    seen: SeenIds,
    ambient: Ambient,
    output: String,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the request with `post` as the page's current post
    pub fn with_current_post(mut self, post: Post) -> Self {
        self.ambient.post = Some(post);
        self
    }

    pub fn seen(&self) -> &SeenIds {
        &self.seen
    }

    pub fn seen_mut(&mut self) -> &mut SeenIds {
        &mut self.seen
    }

    pub fn ambient(&self) -> &Ambient {
        &self.ambient
    }

    pub fn ambient_mut(&mut self) -> &mut Ambient {
        &mut self.ambient
    }

    pub fn current_post(&self) -> Option<&Post> {
        self.ambient.post.as_ref()
    }

    /// Appends to the page output
    pub fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Takes the page output, leaving the buffer empty
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Current output length, for use with [`split_output`](Self::split_output)
    pub fn output_mark(&self) -> usize {
        self.output.len()
    }

    /// Removes and returns everything written since `mark`
    pub fn split_output(&mut self, mark: usize) -> String {
        self.output.split_off(mark.min(self.output.len()))
    }

    /// Snapshots the ambient slot; the snapshot is restored on drop
    pub fn scope(&mut self) -> AmbientScope<'_> {
        let saved = self.ambient.clone();
        AmbientScope {
            request: self,
            saved,
        }
    }
}

impl fmt::Write for RequestContext {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

/// Guard that restores the ambient slot when dropped
pub struct AmbientScope<'r> {
    request: &'r mut RequestContext,
    saved: Ambient,
}

impl AmbientScope<'_> {
    /// The ambient state as it was when the scope opened
    pub fn saved(&self) -> &Ambient {
        &self.saved
    }
}

impl Deref for AmbientScope<'_> {
    type Target = RequestContext;

    fn deref(&self) -> &RequestContext {
        self.request
    }
}

impl DerefMut for AmbientScope<'_> {
    fn deref_mut(&mut self) -> &mut RequestContext {
        self.request
    }
}

impl Drop for AmbientScope<'_> {
    fn drop(&mut self) {
        self.request.ambient = std::mem::take(&mut self.saved);
    }
}
