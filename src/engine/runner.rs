//! Loop execution
//!
//! [`LoopRunner::run`] drives one loop call:
//!
//! ```text
//! merge args → exclusions → resolve template → fetch posts
//!     → [scope opened] render each item → [scope dropped] → record seen ids
//! ```
//!
//! A missing template is the only failure handled here: an inline notice is
//! written to the page and the call returns [`LoopOutcome::MissingTemplate`]
//! without querying. Post source and renderer errors propagate.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::{LoopArgs, LoopContext, LoopDefaults, Post, PostId, ResolvedArgs};
use crate::template::{Renderer, TemplateResolver};

use super::request::{QueryState, RequestContext};
use super::source::PostSource;

/// Result of a loop call
#[derive(Debug, Clone, PartialEq)]
pub enum LoopOutcome {
    /// The posts the loop iterated, in order
    Posts(Vec<Post>),
    /// The requested template does not exist; nothing was queried
    MissingTemplate { template: String },
}

impl LoopOutcome {
    pub fn is_missing_template(&self) -> bool {
        matches!(self, LoopOutcome::MissingTemplate { .. })
    }

    /// Posts of a successful loop; empty for a missing template
    pub fn posts(&self) -> &[Post] {
        match self {
            LoopOutcome::Posts(posts) => posts,
            LoopOutcome::MissingTemplate { .. } => &[],
        }
    }

    pub fn into_posts(self) -> Option<Vec<Post>> {
        match self {
            LoopOutcome::Posts(posts) => Some(posts),
            LoopOutcome::MissingTemplate { .. } => None,
        }
    }
}

/// Runs loops against a post source and a template set
pub struct LoopRunner<'a> {
    defaults: LoopDefaults,
    resolver: &'a TemplateResolver,
    source: &'a dyn PostSource,
    renderer: &'a dyn Renderer,
}

impl<'a> LoopRunner<'a> {
    pub fn new(
        defaults: LoopDefaults,
        resolver: &'a TemplateResolver,
        source: &'a dyn PostSource,
        renderer: &'a dyn Renderer,
    ) -> Self {
        Self {
            defaults,
            resolver,
            source,
            renderer,
        }
    }

    pub fn defaults(&self) -> &LoopDefaults {
        &self.defaults
    }

    /// Runs one loop within `request`
    pub fn run(&self, request: &mut RequestContext, args: LoopArgs) -> Result<LoopOutcome> {
        let mut args = args.resolve(&self.defaults);
        args.query.post_not_in = self.exclusions(request, &args)?;

        let Some(template_path) = self.resolver.resolve(&args.template) else {
            warn!(template = %args.template, "loop template does not exist");
            request.write(&missing_template_notice(&args.template));
            return Ok(LoopOutcome::MissingTemplate {
                template: args.template,
            });
        };

        let posts = self.fetch(&args)?;
        debug!(
            template = %args.template,
            count = posts.len(),
            excluded = args.query.post_not_in.len(),
            "loop fetched posts"
        );

        {
            let mut scope = request.scope();
            let owner = scope.saved().post.clone();

            scope.ambient_mut().query = QueryState {
                query: Some(args.query.clone()),
                post_ids: posts.iter().map(|post| post.id).collect(),
                in_the_loop: true,
            };

            if args.use_template {
                let size = posts.len();
                for (position, post) in posts.iter().enumerate() {
                    let context = LoopContext::at(position + 1, size, owner.clone());
                    scope.ambient_mut().post = Some(post.clone());

                    let mut frame = Frame {
                        runner: self,
                        request: &mut *scope,
                        context: &context,
                        template: &template_path,
                    };
                    self.renderer
                        .render(&template_path, &mut frame)
                        .with_context(|| {
                            format!(
                                "Failed to render template '{}' for post {}",
                                args.template, post.id
                            )
                        })?;
                }
            }
        }

        request.seen_mut().record(&posts);
        Ok(LoopOutcome::Posts(posts))
    }

    /// Seen ids (when excluding repeats), the explicit list, then sticky ids
    /// (when suppressing stickies), without duplicates
    fn exclusions(&self, request: &RequestContext, args: &ResolvedArgs) -> Result<Vec<PostId>> {
        let mut excluded: Vec<PostId> = Vec::new();

        if args.exclude_repeats {
            excluded.extend_from_slice(request.seen().ids());
        }
        excluded.extend_from_slice(&args.query.post_not_in);

        if args.suppress_stickies {
            let sticky = self
                .source
                .sticky_ids()
                .context("Failed to load sticky posts")?;
            excluded.extend(sticky);
        }

        let mut unique = HashSet::new();
        excluded.retain(|id| unique.insert(*id));
        Ok(excluded)
    }

    fn fetch(&self, args: &ResolvedArgs) -> Result<Vec<Post>> {
        if !args.wants_exact_posts() {
            return self.source.query(&args.query);
        }

        let mut posts = Vec::with_capacity(args.query.post_in.len());
        for id in &args.query.post_in {
            match self.source.get(*id)? {
                Some(post) => posts.push(post),
                None => debug!(post = id, "requested post does not exist"),
            }
        }
        Ok(posts)
    }
}

impl fmt::Debug for LoopRunner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopRunner")
            .field("defaults", &self.defaults)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

/// What a template sees while rendering one item
pub struct Frame<'f> {
    runner: &'f LoopRunner<'f>,
    request: &'f mut RequestContext,
    context: &'f LoopContext,
    template: &'f Path,
}

impl Frame<'_> {
    pub fn context(&self) -> &LoopContext {
        self.context
    }

    /// The item being rendered
    pub fn post(&self) -> Option<&Post> {
        self.request.current_post()
    }

    /// The post that was current before the loop started
    pub fn owner(&self) -> Option<&Post> {
        self.context.owner.as_ref()
    }

    pub fn template_path(&self) -> &Path {
        self.template
    }

    pub fn request(&self) -> &RequestContext {
        self.request
    }

    /// Writes to the page output
    pub fn write(&mut self, text: &str) {
        self.request.write(text);
    }

    /// Runs a nested loop; its output goes straight to the page
    pub fn run_loop(&mut self, args: LoopArgs) -> Result<LoopOutcome> {
        self.runner.run(self.request, args)
    }

    /// Runs a nested loop and returns its output instead of writing it
    pub fn capture_loop(&mut self, args: LoopArgs) -> Result<(LoopOutcome, String)> {
        let mark = self.request.output_mark();
        let outcome = self.runner.run(self.request, args)?;
        let output = self.request.split_output(mark);
        Ok((outcome, output))
    }

    /// Data handed to file templates: `loop` and `post`
    pub fn template_data(&self) -> serde_json::Value {
        json!({
            "loop": self.context,
            "post": self.post(),
        })
    }
}

impl fmt::Write for Frame<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.request.write(s);
        Ok(())
    }
}

fn missing_template_notice(template: &str) -> String {
    format!(
        "<p class=\"error\">Sorry, the loop template you are trying to use (\"{}\") does not exist.</p>\n",
        handlebars::html_escape(template)
    )
}
