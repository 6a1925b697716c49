//! Loop arguments
//!
//! A loop call carries two kinds of arguments:
//! - loop controls (`template`, `use_template`, `exclude_repeats`,
//!   `post__not_in`, `suppress_stickies`) consumed by the engine
//! - query filters (`post__in`, `orderby`, `category`, ...) forwarded to the
//!   post source unchanged
//!
//! Arguments can be built in code or parsed from `key=value&key=value`
//! strings:
//!
//! ```
//! use loopsmith::domain::LoopArgs;
//!
//! let args: LoopArgs = "template=headlines&category_name=news&posts_per_page=3"
//!     .parse()
//!     .unwrap();
//! assert_eq!(args.template.as_deref(), Some("headlines"));
//! assert_eq!(args.posts_per_page, Some(3));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::post::PostId;

#[derive(Debug, Error, PartialEq)]
pub enum ArgsError {
    #[error("Invalid boolean for '{key}': '{value}'")]
    InvalidFlag { key: String, value: String },

    #[error("Invalid number for '{key}': '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("Invalid post ID in '{key}': '{value}'")]
    InvalidId { key: String, value: String },

    #[error("Invalid orderby value: '{0}'")]
    InvalidOrderBy(String),

    #[error("Invalid order value: '{0}' (expected ASC or DESC)")]
    InvalidOrder(String),

    #[error("Invalid percent-encoding: '{0}'")]
    Encoding(String),
}

/// Sort key for a post query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    Date,
    Title,
    Id,
    Author,
    /// Keep the source's natural order
    None,
    /// Follow the order of `post__in`
    PostIn,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Date => "date",
            OrderBy::Title => "title",
            OrderBy::Id => "id",
            OrderBy::Author => "author",
            OrderBy::None => "none",
            OrderBy::PostIn => "post__in",
        }
    }
}

impl FromStr for OrderBy {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" | "post_date" => Ok(OrderBy::Date),
            "title" | "post_title" => Ok(OrderBy::Title),
            "id" => Ok(OrderBy::Id),
            "author" | "post_author" => Ok(OrderBy::Author),
            "none" => Ok(OrderBy::None),
            "post__in" => Ok(OrderBy::PostIn),
            _ => Err(ArgsError::InvalidOrderBy(s.to_string())),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl FromStr for Order {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Order::Asc),
            "DESC" => Ok(Order::Desc),
            _ => Err(ArgsError::InvalidOrder(s.to_string())),
        }
    }
}

/// Filters handed to a post source
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PostQuery {
    pub post_in: Vec<PostId>,
    pub post_not_in: Vec<PostId>,
    pub orderby: OrderBy,
    pub order: Order,
    /// `None` returns every match
    pub posts_per_page: Option<usize>,
    pub offset: usize,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    /// When false, sticky posts float to the top of the results
    pub ignore_sticky_posts: bool,
    /// Unrecognized arguments, passed through verbatim
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Defaults a loop call is merged against
#[derive(Debug, Clone, PartialEq)]
pub struct LoopDefaults {
    pub template: String,
    pub exclude_repeats: bool,
    pub suppress_stickies: bool,
}

/// Caller-supplied overrides for one loop call
///
/// `None` means "take the default". Present values replace the default
/// outright; lists are never merged with defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoopArgs {
    pub template: Option<String>,
    pub use_template: Option<bool>,
    pub exclude_repeats: Option<bool>,
    pub post_not_in: Option<Vec<PostId>>,
    pub suppress_stickies: Option<bool>,
    pub ignore_sticky_posts: Option<bool>,
    pub post_in: Vec<PostId>,
    pub orderby: Option<OrderBy>,
    pub order: Option<Order>,
    /// Negative values mean "all"
    pub posts_per_page: Option<i64>,
    pub offset: Option<usize>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub extra: BTreeMap<String, String>,
}

/// Fully merged arguments for one loop call
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArgs {
    pub template: String,
    pub use_template: bool,
    pub exclude_repeats: bool,
    pub suppress_stickies: bool,
    pub query: PostQuery,
}

impl ResolvedArgs {
    /// True when `post__in` should be fetched verbatim instead of queried
    pub fn wants_exact_posts(&self) -> bool {
        self.query.orderby == OrderBy::None && !self.query.post_in.is_empty()
    }
}

impl LoopArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(mut self, name: impl Into<String>) -> Self {
        self.template = Some(name.into());
        self
    }

    pub fn use_template(mut self, enabled: bool) -> Self {
        self.use_template = Some(enabled);
        self
    }

    pub fn exclude_repeats(mut self, enabled: bool) -> Self {
        self.exclude_repeats = Some(enabled);
        self
    }

    pub fn suppress_stickies(mut self, enabled: bool) -> Self {
        self.suppress_stickies = Some(enabled);
        self
    }

    pub fn ignore_sticky_posts(mut self, enabled: bool) -> Self {
        self.ignore_sticky_posts = Some(enabled);
        self
    }

    pub fn post_not_in(mut self, ids: impl IntoIterator<Item = PostId>) -> Self {
        self.post_not_in = Some(ids.into_iter().collect());
        self
    }

    pub fn post_in(mut self, ids: impl IntoIterator<Item = PostId>) -> Self {
        self.post_in = ids.into_iter().collect();
        self
    }

    pub fn orderby(mut self, orderby: OrderBy) -> Self {
        self.orderby = Some(orderby);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn posts_per_page(mut self, count: i64) -> Self {
        self.posts_per_page = Some(count);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Merges these overrides onto the defaults
    pub fn resolve(self, defaults: &LoopDefaults) -> ResolvedArgs {
        let query = PostQuery {
            post_in: self.post_in,
            post_not_in: self.post_not_in.unwrap_or_default(),
            orderby: self.orderby.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
            posts_per_page: self
                .posts_per_page
                .and_then(|n| usize::try_from(n).ok()),
            offset: self.offset.unwrap_or(0),
            category: self.category,
            tag: self.tag,
            author: self.author,
            ignore_sticky_posts: self.ignore_sticky_posts.unwrap_or(true),
            extra: self.extra,
        };

        ResolvedArgs {
            template: self.template.unwrap_or_else(|| defaults.template.clone()),
            use_template: self.use_template.unwrap_or(true),
            exclude_repeats: self.exclude_repeats.unwrap_or(defaults.exclude_repeats),
            suppress_stickies: self
                .suppress_stickies
                .unwrap_or(defaults.suppress_stickies),
            query,
        }
    }

    /// Applies one `key=value` pair
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ArgsError> {
        match key {
            "template" => self.template = Some(value.to_string()),
            "use_template" => self.use_template = Some(parse_flag(key, value)?),
            "exclude_repeats" => self.exclude_repeats = Some(parse_flag(key, value)?),
            "suppress_stickies" => self.suppress_stickies = Some(parse_flag(key, value)?),
            "ignore_sticky_posts" | "caller_get_posts" => {
                self.ignore_sticky_posts = Some(parse_flag(key, value)?)
            }
            "post__not_in" | "post_not_in" => self.post_not_in = Some(parse_ids(key, value)?),
            "post__in" | "post_in" => self.post_in = parse_ids(key, value)?,
            "orderby" => self.orderby = Some(value.parse()?),
            "order" => self.order = Some(value.parse()?),
            "posts_per_page" | "showposts" => {
                self.posts_per_page = Some(parse_number(key, value)?)
            }
            "offset" => {
                let offset = parse_number(key, value)?;
                self.offset = Some(usize::try_from(offset).map_err(|_| {
                    ArgsError::InvalidNumber {
                        key: key.to_string(),
                        value: value.to_string(),
                    }
                })?);
            }
            "category_name" | "category" => self.category = Some(value.to_string()),
            "tag" => self.tag = Some(value.to_string()),
            "author_name" | "author" => self.author = Some(value.to_string()),
            _ => {
                self.extra.insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }
}

impl FromStr for LoopArgs {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut args = LoopArgs::default();

        for pair in s.split('&').filter(|p| !p.trim().is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode(key)?;
            let value = decode(value)?;
            args.set(key.trim(), value.trim())?;
        }

        Ok(args)
    }
}

impl fmt::Display for LoopArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = Vec::new();

        if let Some(ref template) = self.template {
            pairs.push(format!("template={}", urlencoding::encode(template)));
        }
        if let Some(flag) = self.use_template {
            pairs.push(format!("use_template={}", flag as u8));
        }
        if let Some(flag) = self.exclude_repeats {
            pairs.push(format!("exclude_repeats={}", flag as u8));
        }
        if let Some(flag) = self.suppress_stickies {
            pairs.push(format!("suppress_stickies={}", flag as u8));
        }
        if let Some(ref ids) = self.post_not_in {
            pairs.push(format!("post__not_in={}", join_ids(ids)));
        }
        if !self.post_in.is_empty() {
            pairs.push(format!("post__in={}", join_ids(&self.post_in)));
        }
        if let Some(flag) = self.ignore_sticky_posts {
            pairs.push(format!("ignore_sticky_posts={}", flag as u8));
        }
        if let Some(orderby) = self.orderby {
            pairs.push(format!("orderby={}", orderby.as_str()));
        }
        if let Some(order) = self.order {
            let order = match order {
                Order::Asc => "ASC",
                Order::Desc => "DESC",
            };
            pairs.push(format!("order={}", order));
        }
        if let Some(count) = self.posts_per_page {
            pairs.push(format!("posts_per_page={}", count));
        }
        if let Some(offset) = self.offset {
            pairs.push(format!("offset={}", offset));
        }
        if let Some(ref category) = self.category {
            pairs.push(format!("category_name={}", urlencoding::encode(category)));
        }
        if let Some(ref tag) = self.tag {
            pairs.push(format!("tag={}", urlencoding::encode(tag)));
        }
        if let Some(ref author) = self.author {
            pairs.push(format!("author_name={}", urlencoding::encode(author)));
        }
        for (key, value) in &self.extra {
            pairs.push(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            ));
        }

        write!(f, "{}", pairs.join("&"))
    }
}

fn decode(raw: &str) -> Result<String, ArgsError> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ArgsError::Encoding(raw.to_string()))
}

fn join_ids(ids: &[PostId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Loose boolean parsing, matching how option forms submit flags
pub fn parse_flag(key: &str, value: &str) -> Result<bool, ArgsError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ArgsError::InvalidFlag {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_number(key: &str, value: &str) -> Result<i64, ArgsError> {
    value.parse().map_err(|_| ArgsError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_ids(key: &str, value: &str) -> Result<Vec<PostId>, ArgsError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse().map_err(|_| ArgsError::InvalidId {
                key: key.to_string(),
                value: part.to_string(),
            })
        })
        .collect()
}
