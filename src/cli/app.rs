//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use super::options_cmd::{self, OptionsCommands};
use super::output::{Output, OutputFormat};
use super::post_cmd::{self, PostCommands};
use super::{render_cmd, templates_cmd};
use crate::storage::Site;

#[derive(Parser)]
#[command(name = "loopsmith")]
#[command(author, version, about = "Reusable, parameterized loop templates for blog post listings")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new site
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Render loops into one page
    ///
    /// Examples:
    ///   loopsmith render
    ///   loopsmith render "template=title_excerpt&posts_per_page=3" "category_name=news"
    Render {
        /// Loop arguments as key=value pairs joined by '&', one loop per argument
        loops: Vec<String>,

        /// Post that owns the page (becomes each loop's owner)
        #[arg(long)]
        post: Option<u64>,

        /// Fail on template references to missing fields
        #[arg(long)]
        strict: bool,
    },

    /// List custom and default templates
    Templates,

    /// Show which file a template name resolves to
    Resolve {
        /// Template identifier, e.g. simple_UL
        name: String,
    },

    /// Show or change loop options
    #[command(subcommand)]
    Options(OptionsCommands),

    /// Manage posts
    #[command(subcommand)]
    Post(PostCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let output = Output::new(cli.format, cli.verbose);

    debug!("loopsmith starting");

    match cli.command {
        Commands::Init { path } => {
            debug!(path = %path, "initializing site");
            let site = Site::init(&path)?;
            output.success(&format!(
                "Initialized loopsmith site at {}",
                site.root().display()
            ));
        }

        Commands::Render {
            loops,
            post,
            strict,
        } => render_cmd::run(&output, &loops, post, strict)?,

        Commands::Templates => templates_cmd::list(&output)?,
        Commands::Resolve { name } => templates_cmd::resolve(&output, &name)?,

        Commands::Options(cmd) => options_cmd::run(cmd, &output)?,
        Commands::Post(cmd) => post_cmd::run(cmd, &output)?,
    }

    Ok(())
}

/// Logs go to stderr so rendered pages on stdout stay clean
fn init_logging(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(log_filter(directives.as_deref(), verbose))
        .init();
}

/// `RUST_LOG` when it parses, otherwise warnings only. `--verbose` raises the floor to debug.
fn log_filter(directives: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_filter_defaults_to_warn() {
        assert_eq!(log_filter(None, false).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("  "), false).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn log_filter_honors_rust_log() {
        assert_eq!(
            log_filter(Some("debug"), false).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("loopsmith=trace"), false).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
        assert_eq!(
            log_filter(Some("loopsmith=loud"), false).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }

    #[test]
    fn verbose_raises_to_debug() {
        assert_eq!(log_filter(None, true).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter(Some("error"), true).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn parses_multiple_loops() {
        let cli = Cli::try_parse_from([
            "loopsmith",
            "--format",
            "json",
            "render",
            "template=zebra_list",
            "posts_per_page=2",
            "--post",
            "7",
        ])
        .unwrap();

        assert!(matches!(cli.format, OutputFormat::Json));
        match cli.command {
            Commands::Render { loops, post, strict } => {
                assert_eq!(loops, vec!["template=zebra_list", "posts_per_page=2"]);
                assert_eq!(post, Some(7));
                assert!(!strict);
            }
            _ => panic!("expected render"),
        }
    }
}
