//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::core::render::{ColorChoice, OutputFormat, RenderConfig, Theme};
use crate::search::ignore_rules::DEFAULT_IGNORE_FILE;
use crate::search::SearchOptions;

/// jfind - a streamlined find. `jfind query` recursively searches the current
/// directory for names matching the query.
#[derive(Parser, Debug)]
#[command(name = "jfind")]
#[command(
    author,
    version,
    about,
    long_about = r#"jfind recursively searches PATH for file and directory names matching QUERY,
or for matching lines inside files with --contents.

A plain QUERY is a case-insensitive substring search. A QUERY containing glob
metacharacters (* ? [ ] { }) is matched as a glob against the whole name.

Output is ordered: the files of a directory first, then each subdirectory in turn.

Examples:
    jfind main
    jfind '*.toml' --depth 2
    jfind -g TODO src
    jfind -i -a config
"#
)]
pub struct Cli {
    /// The query to search for (empty matches everything).
    #[arg(default_value = "", value_name = "QUERY")]
    pub query: String,

    /// The file or directory to search within.
    #[arg(default_value = ".", value_name = "PATH")]
    pub path: PathBuf,

    /// Maximum directory depth (the root's children are depth 1).
    #[arg(long, default_value_t = 10, env = "JFIND_DEPTH", value_name = "N")]
    pub depth: usize,

    /// Case-sensitive search.
    #[arg(short, long)]
    pub case_sensitive: bool,

    /// Match the query exactly instead of as a substring.
    #[arg(
        short = 'x',
        long,
        long_help = "Match the query against the whole name (or line) instead of wrapping it\n\
as *QUERY*. Has no effect on queries that already contain glob metacharacters."
    )]
    pub exact: bool,

    /// Search file contents instead of file names.
    #[arg(
        short = 'g',
        long,
        long_help = "Search inside files and print each matching line as LINE:TEXT under a\n\
header naming the file. Directory names are still matched.\n\n\
Not allowed when PATH is a single file: file inputs are always searched by content."
    )]
    pub contents: bool,

    /// Honor the ignore-rules file in the search root.
    #[arg(
        short,
        long,
        long_help = "Read ignore rules from the search root (or the parent directory when PATH is\n\
a file) and skip excluded entries. The run fails if the rules file does not exist."
    )]
    pub ignore: bool,

    /// Name of the ignore-rules file.
    #[arg(
        long,
        default_value = DEFAULT_IGNORE_FILE,
        env = "JFIND_IGNORE_FILE",
        value_name = "NAME"
    )]
    pub ignore_file: String,

    /// Include hidden files and directories (dotfiles).
    #[arg(short = 'a', long)]
    pub hidden: bool,

    /// Print fully resolved absolute paths.
    #[arg(short, long)]
    pub full_path: bool,

    /// Output format (text/jsonl).
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: String,

    /// When to color output (auto/always/never).
    #[arg(long, default_value = "auto", env = "JFIND_COLOR", value_name = "WHEN")]
    pub color: String,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            query: self.query.clone(),
            path: self.path.clone(),
            max_depth: self.depth,
            case_sensitive: self.case_sensitive,
            exact: self.exact,
            contents: self.contents,
            ignore: self.ignore,
            ignore_file: self.ignore_file.clone(),
            hidden: self.hidden,
            full_path: self.full_path,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        let format: OutputFormat = self.format.parse().unwrap_or_default();
        let color: ColorChoice = self.color.parse().unwrap_or_default();
        if color == ColorChoice::Always {
            colored::control::set_override(true);
        }
        RenderConfig::new(format, Theme::for_choice(color))
    }

    fn log_level(&self) -> &'static str {
        if self.verbose {
            "jfind=debug"
        } else if self.quiet {
            "jfind=error"
        } else {
            "jfind=warn"
        }
    }
}

/// Install the stderr log subscriber; RUST_LOG overrides the flags
pub fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(cli.log_level()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    init_logging(&cli);

    let render_config = cli.render_config();
    let options = cli.search_options();

    crate::search::run_search(&options, render_config)
}
