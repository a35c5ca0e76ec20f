use std::{io::Write, path::PathBuf, time::Duration};

use clap::{CommandFactory, Parser, ValueEnum};
use html_json::{ConvertOptions, Converter, ParseMode};
use tracing::info;

use crate::source::Source;

pub mod logger;
pub mod source;

const EXAMPLES: &str = "\
Examples:
  hj index.html
  hj https://example.com
  cat test.html | hj -";

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum LogMode {
    Full,
    Json,
    #[default]
    Compact,
}

/// How the input markup is parsed
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum InputMode {
    /// full document when the input starts with a doctype or <html>, fragment otherwise
    #[default]
    Auto,
    /// full HTML document with implied html, head and body elements
    Document,
    /// markup fragment without implied structure
    Fragment,
}

impl From<InputMode> for ParseMode {
    fn from(mode: InputMode) -> Self {
        match mode {
            InputMode::Auto => ParseMode::Auto,
            InputMode::Document => ParseMode::Document,
            InputMode::Fragment => ParseMode::Fragment,
        }
    }
}

/// HJ - HTML to JSON converter
#[derive(Debug, Parser, Clone)]
#[command(name = "hj", author, version, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// HTML file path, http(s) URL, or `-` to read standard input
    #[arg(value_name = "HTMLfilePath|URL|-")]
    pub input: Option<String>,

    /// How the markup is parsed
    #[arg(long, value_enum, default_value_t = InputMode::Auto, env = "HJ_MODE")]
    pub mode: InputMode,

    /// Fail instead of recovering when the markup has parse errors
    #[arg(long, env = "HJ_STRICT")]
    pub strict: bool,

    /// Spaces per indentation level (0 for single-line output)
    #[arg(long, default_value_t = html_json::convert::DEFAULT_INDENT, env = "HJ_INDENT")]
    pub indent: usize,

    /// Seconds to wait for a URL fetch
    #[arg(long, default_value_t = 30, env = "HJ_TIMEOUT")]
    pub timeout: u64,

    /// Turn debugging information on (repeat for higher levels)
    #[arg(short, long, action = clap::ArgAction::Count, env = "HJ_DEBUG")]
    pub debug: u8,

    /// Format of the log lines written to stderr
    #[clap(long, value_enum)]
    pub log_mode: Option<LogMode>,

    /// File for logs to be written to
    #[arg(long, value_parser)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            mode: self.mode.into(),
            strict: self.strict,
            indent: self.indent,
        }
    }
}

/// Reads the input, converts it and writes the JSON line to `out`.
/// A missing or empty input writes the usage text instead.
pub fn execute(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let Some(source) = cli.input.as_deref().and_then(Source::parse) else {
        writeln!(out, "{}", Cli::command().render_help())?;
        return Ok(());
    };

    let html = source.read(Duration::from_secs(cli.timeout))?;
    info!(%source, bytes = html.len(), "read html");

    let converter = Converter::new(cli.convert_options());
    let json = converter.convert(&html)?;
    info!(options = ?converter.options(), bytes = json.len(), "emitting json");

    writeln!(out, "{json}")?;
    Ok(())
}
