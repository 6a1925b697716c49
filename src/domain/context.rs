//! Per-item loop context
//!
//! Every rendered item sees where it sits in the loop: its 1-based index,
//! parity, whether it opens or closes the loop, and the post that was current
//! before the loop started (the owner).

use serde::Serialize;

use super::post::Post;

/// Iteration state exposed to a template for one item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopContext {
    /// 1-based position
    pub index: usize,
    pub odd: bool,
    pub even: bool,
    pub first: bool,
    pub last: bool,
    /// `"odd"` or `"even"`, for zebra striping
    pub css_class: &'static str,
    /// Number of items in the loop
    pub size: usize,
    /// Post that was current when the loop began
    pub owner: Option<Post>,
}

impl LoopContext {
    /// Computes the context for position `index` (1-based) of `size` items
    pub fn at(index: usize, size: usize, owner: Option<Post>) -> Self {
        let even = index % 2 == 0;

        Self {
            index,
            odd: index % 2 == 1,
            even,
            first: index == 1,
            last: index == size,
            css_class: if even { "even" } else { "odd" },
            size,
            owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn three_items() {
        let contexts: Vec<_> = (1..=3).map(|i| LoopContext::at(i, 3, None)).collect();

        let first = &contexts[0];
        assert_eq!(first.index, 1);
        assert!(first.odd && !first.even);
        assert!(first.first && !first.last);
        assert_eq!(first.css_class, "odd");

        let second = &contexts[1];
        assert_eq!(second.index, 2);
        assert!(!second.odd && second.even);
        assert!(!second.first && !second.last);
        assert_eq!(second.css_class, "even");

        let third = &contexts[2];
        assert_eq!(third.index, 3);
        assert!(third.odd && !third.even);
        assert!(!third.first && third.last);
        assert_eq!(third.css_class, "odd");
    }

    #[test]
    fn single_item_is_first_and_last() {
        let ctx = LoopContext::at(1, 1, None);
        assert!(ctx.first && ctx.last);
    }

    #[test]
    fn owner_is_carried() {
        let owner = Post::new(42, "Front page");
        let ctx = LoopContext::at(2, 5, Some(owner.clone()));
        assert_eq!(ctx.owner, Some(owner));
    }

    #[test]
    fn serializes_for_templates() {
        let json = serde_json::to_value(LoopContext::at(2, 2, None)).unwrap();
        assert_eq!(json["css_class"], "even");
        assert_eq!(json["last"], true);
        assert!(json["owner"].is_null());
    }

    proptest! {
        #[test]
        fn flags_are_consistent(size in 1usize..200) {
            let contexts: Vec<_> = (1..=size).map(|i| LoopContext::at(i, size, None)).collect();

            prop_assert_eq!(contexts.iter().filter(|c| c.first).count(), 1);
            prop_assert_eq!(contexts.iter().filter(|c| c.last).count(), 1);
            prop_assert!(contexts[0].first);
            prop_assert!(contexts[size - 1].last);

            for ctx in &contexts {
                prop_assert_ne!(ctx.odd, ctx.even);
                prop_assert_eq!(ctx.css_class == "even", ctx.even);
                prop_assert_eq!(ctx.size, size);
            }
        }
    }
}
