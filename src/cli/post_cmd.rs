//! Post CLI commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;

use super::output::Output;
use crate::domain::Post;
use crate::storage::Site;

#[derive(Subcommand)]
pub enum PostCommands {
    /// Add a post
    ///
    /// Examples:
    ///   loopsmith post add "Hello world" --category news
    ///   loopsmith post add "Read me first" --sticky
    Add {
        /// Post title
        title: String,

        /// Category (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        excerpt: Option<String>,

        #[arg(long)]
        content: Option<String>,

        /// Publication date (RFC 3339, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Pin to the top of listings
        #[arg(long)]
        sticky: bool,
    },

    /// List posts
    List,
}

pub fn run(cmd: PostCommands, output: &Output) -> Result<()> {
    match cmd {
        PostCommands::Add {
            title,
            categories,
            tags,
            author,
            excerpt,
            content,
            date,
            sticky,
        } => {
            let site = Site::open_current()?;
            let store = site.posts();

            let mut post = Post::new(store.next_id()?, title);
            for category in categories {
                post = post.with_category(category);
            }
            for tag in tags {
                post = post.with_tag(tag);
            }
            if let Some(author) = author {
                post = post.with_author(author);
            }
            if let Some(excerpt) = excerpt {
                post = post.with_excerpt(excerpt);
            }
            if let Some(content) = content {
                post = post.with_content(content);
            }
            if let Some(date) = date {
                post = post.with_date(parse_date(&date)?);
            }
            if sticky {
                post = post.sticky();
            }

            store.append(&post)?;

            if output.is_json() {
                output.data(&post)
            } else {
                output.success(&format!("Created post: {} - {}", post.id, post.title));
                Ok(())
            }
        }
        PostCommands::List => {
            let site = Site::open_current()?;
            let posts = site.posts().read_all()?;

            if output.is_json() {
                return output.data(&posts);
            }

            if posts.is_empty() {
                output.success("No posts");
                return Ok(());
            }

            for post in &posts {
                let marker = if post.sticky { "*" } else { "" };
                let id = post.id.to_string();
                let date = post.date.format("%Y-%m-%d").to_string();
                let title = format!("{}{}", post.title, marker);
                output.row(&[id.as_str(), date.as_str(), title.as_str()]);
            }
            Ok(())
        }
    }
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Utc))
        .with_context(|| format!("Invalid date '{}' (expected RFC 3339)", raw))
}
