//! Bundled default templates
//!
//! Compiled into the binary and written to the default template directory
//! by `loopsmith init`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Unordered list; opens the `<ul>` on the first item and closes it on the last
pub const SIMPLE_UL: &str = r#"{{#if loop.first}}<ul class="loop">
{{/if}}  <li class="{{loop.css_class}}"><a href="/{{post.slug}}">{{post.title}}</a></li>
{{#if loop.last}}</ul>
{{/if}}"#;

/// Title plus excerpt, one `<article>` per post
pub const TITLE_EXCERPT: &str = r#"<article class="post-{{post.id}} {{loop.css_class}}">
  <h2><a href="/{{post.slug}}">{{post.title}}</a></h2>
  <p>{{post.excerpt}}</p>
</article>
"#;

/// Numbered rows with first/last markers
pub const ZEBRA_LIST: &str = r#"<div class="row {{loop.css_class}}{{#if loop.first}} first{{/if}}{{#if loop.last}} last{{/if}}">{{loop.index}}/{{loop.size}} {{post.title}}</div>
"#;

/// All bundled templates as (identifier, source)
pub const BUNDLED: &[(&str, &str)] = &[
    ("simple_UL", SIMPLE_UL),
    ("title_excerpt", TITLE_EXCERPT),
    ("zebra_list", ZEBRA_LIST),
];

/// Writes bundled templates into `dir` with the given extension.
/// Existing files are left untouched. Returns how many were written.
pub fn install(dir: &Path, extension: &str) -> Result<usize> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create template directory: {}", dir.display()))?;

    let mut written = 0;
    for (identifier, source) in BUNDLED {
        let path = dir.join(format!("{}.{}", identifier, extension));
        if path.exists() {
            continue;
        }
        fs::write(&path, source)
            .with_context(|| format!("Failed to write template: {}", path.display()))?;
        written += 1;
    }

    Ok(written)
}
