//! Template execution
//!
//! Resolution only finds a file; a [`Renderer`] decides what running it
//! means. Two backends ship with the crate:
//! - [`FnRenderer`] wraps a closure, for embedding loops in Rust code
//! - [`HandlebarsRenderer`] reads the resolved file and renders it with
//!   Handlebars, exposing `loop` (the [`LoopContext`](crate::domain::LoopContext))
//!   and `post` (the current post)
//!
//! Handlebars templates start nested loops with the `nested_loop` helper:
//!
//! ```text
//! <h2>{{post.title}}</h2>
//! {{nested_loop "template=related&posts_per_page=3" category_name="news"}}
//! ```

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context as _, Result};
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use serde_json::Value;

use crate::domain::LoopArgs;
use crate::engine::Frame;

/// Executes a resolved template once for the current item
pub trait Renderer: Send + Sync {
    fn render(&self, template: &Path, frame: &mut Frame<'_>) -> Result<()>;
}

/// Renderer backed by a closure
pub struct FnRenderer<F> {
    render: F,
}

impl<F> FnRenderer<F>
where
    F: Fn(&Path, &mut Frame<'_>) -> Result<()> + Send + Sync,
{
    pub fn new(render: F) -> Self {
        Self { render }
    }
}

impl<F> Renderer for FnRenderer<F>
where
    F: Fn(&Path, &mut Frame<'_>) -> Result<()> + Send + Sync,
{
    fn render(&self, template: &Path, frame: &mut Frame<'_>) -> Result<()> {
        (self.render)(template, frame)
    }
}

/// Renders template files with Handlebars
#[derive(Debug, Clone, Default)]
pub struct HandlebarsRenderer {
    strict: bool,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on references to missing fields instead of rendering them empty
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Renderer for HandlebarsRenderer {
    fn render(&self, template: &Path, frame: &mut Frame<'_>) -> Result<()> {
        let source = fs::read_to_string(template)
            .with_context(|| format!("Failed to read template: {}", template.display()))?;
        let data = frame.template_data();

        let rendered = {
            let mut hbs = Handlebars::new();
            hbs.set_strict_mode(self.strict);
            hbs.register_helper(
                "nested_loop",
                Box::new(NestedLoopHelper {
                    frame: Mutex::new(&mut *frame),
                }),
            );

            hbs.render_template(&source, &data)
                .map_err(|e| anyhow!("Failed to render template {}: {}", template.display(), e))?
        };

        frame.write(&rendered);
        Ok(())
    }
}

/// `{{nested_loop "key=value&..." key=value}}` runs a nested loop in place
struct NestedLoopHelper<'h, 'f> {
    frame: Mutex<&'h mut Frame<'f>>,
}

impl HelperDef for NestedLoopHelper<'_, '_> {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let mut pairs = Vec::with_capacity(h.params().len());
        for param in h.params() {
            let value = param.value();
            let pair = value.as_str().ok_or_else(|| {
                RenderErrorReason::Other(format!(
                    "nested_loop arguments must be strings, got {}",
                    value
                ))
            })?;
            pairs.push(pair);
        }
        let query = pairs.join("&");

        let mut args: LoopArgs = query
            .parse()
            .map_err(|e: crate::domain::ArgsError| RenderErrorReason::Other(e.to_string()))?;

        for (key, value) in h.hash() {
            let text = match value.value() {
                Value::String(s) => s.clone(),
                Value::Bool(b) => u8::from(*b).to_string(),
                other => other.to_string(),
            };
            args.set(key, &text)
                .map_err(|e| RenderErrorReason::Other(e.to_string()))?;
        }

        let mut frame = self
            .frame
            .lock()
            .map_err(|_| RenderErrorReason::Other("loop frame lock poisoned".to_string()))?;

        let (_, nested) = frame
            .capture_loop(args)
            .map_err(|e| RenderErrorReason::Other(format!("{:#}", e)))?;

        out.write(&nested)
            .map_err(|e| RenderErrorReason::Other(e.to_string()))?;
        Ok(())
    }
}
