//! Render command
//!
//! Every positional argument is one loop call, run in order within a single
//! request, so later loops skip posts earlier ones showed.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use super::output::Output;
use crate::domain::{LoopArgs, Post, PostId};
use crate::engine::{LoopRunner, PostSource, RequestContext};
use crate::storage::Site;
use crate::template::HandlebarsRenderer;

/// One loop's result in JSON output
#[derive(Serialize)]
struct LoopReport {
    args: String,
    missing_template: bool,
    posts: Vec<PostId>,
}

#[derive(Serialize)]
struct RenderReport {
    loops: Vec<LoopReport>,
    seen: Vec<PostId>,
    output: String,
}

pub fn run(output: &Output, loops: &[String], page_post: Option<PostId>, strict: bool) -> Result<()> {
    let site = Site::open_current()?;
    let options = site.options();
    let resolver = site.resolver()?;
    let store = site.posts();
    let renderer = HandlebarsRenderer::new().strict(strict);
    let runner = LoopRunner::new(options.loop_defaults(), &resolver, &store, &renderer);

    let mut request = RequestContext::new();
    if let Some(id) = page_post {
        request = request.with_current_post(page_owner(&store, id)?);
    }

    // No arguments means one loop with the site defaults
    let calls: Vec<&str> = if loops.is_empty() {
        vec![""]
    } else {
        loops.iter().map(String::as_str).collect()
    };

    let mut reports = Vec::with_capacity(calls.len());
    for raw in calls {
        let args: LoopArgs = raw
            .parse()
            .with_context(|| format!("Invalid loop arguments: '{}'", raw))?;
        debug!(args = %args, "running loop");

        let outcome = runner.run(&mut request, args)?;
        reports.push(LoopReport {
            args: raw.to_string(),
            missing_template: outcome.is_missing_template(),
            posts: outcome.posts().iter().map(|post| post.id).collect(),
        });
    }

    if output.is_json() {
        output.data(&RenderReport {
            loops: reports,
            seen: request.seen().ids().to_vec(),
            output: request.take_output(),
        })
    } else {
        output.page(request.output())
    }
}

fn page_owner(store: &dyn PostSource, id: PostId) -> Result<Post> {
    store
        .get(id)?
        .ok_or_else(|| anyhow::anyhow!("Post not found: {}", id))
}
