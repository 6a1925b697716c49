//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Site setup | `init` |
//! | Rendering | Run loops into a page | `render "template=zebra_list"` |
//! | Templates | Inspect template files | `templates`, `resolve simple_UL` |
//! | Options | Loop defaults | `options show`, `options set exclude_repeats 0` |
//! | Posts | Sample content | `post add`, `post list` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output; `render` prints the page
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `--verbose` (or `-v`) raises
//! the level to debug; `RUST_LOG` works as usual:
//! ```bash
//! loopsmith --verbose render "template=title_excerpt"
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod options_cmd;
mod output;
mod post_cmd;
mod render_cmd;
mod templates_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
