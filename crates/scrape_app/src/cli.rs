use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::logging::LogDestination;

/// Fetch a web page, extract one class of content, display it as a table
/// and optionally export it.
#[derive(Debug, Parser)]
#[command(name = "scrape")]
#[command(about = "Web page scraping and export utility")]
#[command(version)]
pub struct Args {
    /// Absolute URL of the page to scrape
    pub url: String,

    /// What to extract from the page
    #[arg(short, long, value_enum, default_value_t = ModeArg::Text)]
    pub mode: ModeArg,

    /// Export format(s) to write after display; repeatable
    #[arg(short = 'f', long = "format", value_enum)]
    pub formats: Vec<FormatArg>,

    /// User-Agent header override
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (1-10; out-of-range values are clamped)
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Directory export artifacts are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Show the page's meta tags instead of scraping content
    #[arg(long)]
    pub meta_tags: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogArg::File)]
    pub log: LogArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Text,
    Images,
    Links,
    Tables,
}

impl From<ModeArg> for scrape_core::Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Text => scrape_core::Mode::Text,
            ModeArg::Images => scrape_core::Mode::Images,
            ModeArg::Links => scrape_core::Mode::Links,
            ModeArg::Tables => scrape_core::Mode::Tables,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Excel,
    Json,
    Pdf,
}

impl From<FormatArg> for scrape_core::Format {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => scrape_core::Format::Csv,
            FormatArg::Excel => scrape_core::Format::Excel,
            FormatArg::Json => scrape_core::Format::Json,
            FormatArg::Pdf => scrape_core::Format::Pdf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(log: LogArg) -> Self {
        match log {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}
