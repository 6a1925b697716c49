//! Post sources
//!
//! The loop engine does not search or store posts. It asks a [`PostSource`]
//! for them. [`apply_query`] implements the filtering and ordering rules for
//! sources that hold their posts in memory.

use std::cmp::Ordering;
use std::collections::HashSet;

use anyhow::Result;

use crate::domain::{Order, OrderBy, Post, PostId, PostQuery};

/// Supplies posts to loops
pub trait PostSource: Send + Sync {
    /// Returns the posts matching `query`, in result order
    fn query(&self, query: &PostQuery) -> Result<Vec<Post>>;

    /// Fetches a single post
    fn get(&self, id: PostId) -> Result<Option<Post>>;

    /// Ids of posts currently pinned to the top of listings
    fn sticky_ids(&self) -> Result<Vec<PostId>>;
}

/// In-memory post source
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    posts: Vec<Post>,
}

impl MemorySource {
    pub fn new(posts: impl IntoIterator<Item = Post>) -> Self {
        Self {
            posts: posts.into_iter().collect(),
        }
    }

    pub fn push(&mut self, post: Post) {
        self.posts.push(post);
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }
}

impl PostSource for MemorySource {
    fn query(&self, query: &PostQuery) -> Result<Vec<Post>> {
        Ok(apply_query(self.posts.clone(), query))
    }

    fn get(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.posts.iter().find(|post| post.id == id).cloned())
    }

    fn sticky_ids(&self) -> Result<Vec<PostId>> {
        Ok(self
            .posts
            .iter()
            .filter(|post| post.sticky)
            .map(|post| post.id)
            .collect())
    }
}

/// Filters, orders and pages `posts` according to `query`
pub fn apply_query(posts: Vec<Post>, query: &PostQuery) -> Vec<Post> {
    let excluded: HashSet<PostId> = query.post_not_in.iter().copied().collect();

    let mut matched: Vec<Post> = posts
        .into_iter()
        .filter(|post| query.post_in.is_empty() || query.post_in.contains(&post.id))
        .filter(|post| !excluded.contains(&post.id))
        .filter(|post| {
            query
                .category
                .as_deref()
                .map_or(true, |category| post.in_category(category))
        })
        .filter(|post| query.tag.as_deref().map_or(true, |tag| post.has_tag(tag)))
        .filter(|post| {
            query
                .author
                .as_deref()
                .map_or(true, |author| post.author.eq_ignore_ascii_case(author))
        })
        .collect();

    sort_posts(&mut matched, query);

    if !query.ignore_sticky_posts {
        // Stable sort keeps the requested order within each group
        matched.sort_by_key(|post| !post.sticky);
    }

    let page = matched.into_iter().skip(query.offset);
    match query.posts_per_page {
        Some(limit) => page.take(limit).collect(),
        None => page.collect(),
    }
}

fn sort_posts(posts: &mut [Post], query: &PostQuery) {
    let compare: fn(&Post, &Post) -> Ordering = match query.orderby {
        OrderBy::None => return,
        OrderBy::PostIn => {
            let position = |post: &Post| {
                query
                    .post_in
                    .iter()
                    .position(|id| *id == post.id)
                    .unwrap_or(usize::MAX)
            };
            posts.sort_by_key(|post| position(post));
            return;
        }
        OrderBy::Date => |a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)),
        OrderBy::Title => |a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        OrderBy::Id => |a, b| a.id.cmp(&b.id),
        OrderBy::Author => |a, b| a.author.to_lowercase().cmp(&b.author.to_lowercase()),
    };

    match query.order {
        Order::Asc => posts.sort_by(compare),
        Order::Desc => posts.sort_by(|a, b| compare(b, a)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
    }

    fn fixture() -> Vec<Post> {
        vec![
            Post::new(1, "Alpha").with_date(day(1)).with_category("news"),
            Post::new(2, "Bravo").with_date(day(2)).with_tag("rust"),
            Post::new(3, "Charlie").with_date(day(3)).with_category("news").sticky(),
            Post::new(4, "Delta").with_date(day(4)).with_author("ana"),
        ]
    }

    fn ids(posts: &[Post]) -> Vec<PostId> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn default_query_is_newest_first() {
        let query = PostQuery {
            ignore_sticky_posts: true,
            ..Default::default()
        };
        assert_eq!(ids(&apply_query(fixture(), &query)), vec![4, 3, 2, 1]);
    }

    #[test]
    fn filters_compose() {
        let query = PostQuery {
            category: Some("news".to_string()),
            post_not_in: vec![3],
            ..Default::default()
        };
        assert_eq!(ids(&apply_query(fixture(), &query)), vec![1]);

        let by_tag = PostQuery {
            tag: Some("rust".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_query(fixture(), &by_tag)), vec![2]);

        let by_author = PostQuery {
            author: Some("ANA".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_query(fixture(), &by_author)), vec![4]);
    }

    #[test]
    fn sticky_posts_float_unless_ignored() {
        let query = PostQuery {
            orderby: OrderBy::Id,
            order: Order::Asc,
            ignore_sticky_posts: false,
            ..Default::default()
        };
        assert_eq!(ids(&apply_query(fixture(), &query)), vec![3, 1, 2, 4]);

        let ignored = PostQuery {
            ignore_sticky_posts: true,
            ..query
        };
        assert_eq!(ids(&apply_query(fixture(), &ignored)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn post_in_ordering() {
        let query = PostQuery {
            post_in: vec![2, 4, 1],
            orderby: OrderBy::PostIn,
            ignore_sticky_posts: true,
            ..Default::default()
        };
        assert_eq!(ids(&apply_query(fixture(), &query)), vec![2, 4, 1]);
    }

    #[test]
    fn paging() {
        let query = PostQuery {
            orderby: OrderBy::Title,
            order: Order::Asc,
            offset: 1,
            posts_per_page: Some(2),
            ignore_sticky_posts: true,
            ..Default::default()
        };
        assert_eq!(ids(&apply_query(fixture(), &query)), vec![2, 3]);
    }

    #[test]
    fn memory_source_lookups() {
        let source = MemorySource::new(fixture());
        assert_eq!(source.sticky_ids().unwrap(), vec![3]);
        assert_eq!(source.get(2).unwrap().map(|p| p.title), Some("Bravo".to_string()));
        assert!(source.get(99).unwrap().is_none());
    }
}
