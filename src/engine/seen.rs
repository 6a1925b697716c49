//! Seen post tracking
//!
//! Records every post a loop returned during one request so later loops on
//! the same page can skip them. Append-only: ids are never removed, and
//! duplicates are kept since the list is only used for membership.

use crate::domain::{Post, PostId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenIds {
    ids: Vec<PostId>,
}

impl SeenIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the ids of `posts`, in order
    pub fn record(&mut self, posts: &[Post]) {
        self.ids.extend(posts.iter().map(|post| post.id));
    }

    pub fn push(&mut self, id: PostId) {
        self.ids.push(id);
    }

    /// All recorded ids, oldest first
    pub fn ids(&self) -> &[PostId] {
        &self.ids
    }

    pub fn contains(&self, id: PostId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn records_in_order() {
        let mut seen = SeenIds::new();
        seen.record(&[Post::new(3, "c"), Post::new(1, "a")]);
        seen.push(2);

        assert_eq!(seen.ids(), &[3, 1, 2]);
        assert!(seen.contains(1));
        assert!(!seen.contains(9));
    }

    #[test]
    fn keeps_duplicates() {
        let mut seen = SeenIds::new();
        seen.push(5);
        seen.push(5);
        assert_eq!(seen.len(), 2);
    }

    proptest! {
        #[test]
        fn equals_concatenation_of_batches(batches in prop::collection::vec(prop::collection::vec(1u64..50, 0..6), 0..8)) {
            let mut seen = SeenIds::new();
            for batch in &batches {
                let posts: Vec<_> = batch.iter().map(|id| Post::new(*id, "p")).collect();
                seen.record(&posts);
            }

            let expected: Vec<PostId> = batches.concat();
            prop_assert_eq!(seen.ids(), expected.as_slice());
        }
    }
}
