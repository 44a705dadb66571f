use clap::{Parser, ValueEnum};
use pr_sorter::{ReportFormat, ScanOrder, Taxonomy};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pr-sorter")]
#[command(about = "Sorts a repository's closed, labelled pull requests into keyword categories")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Repository to search, as owner/name
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Label the pull requests must carry
    #[arg(short, long)]
    pub label: Option<String>,

    /// Access token (falls back to GITHUB_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Built-in taxonomy to use instead of the configured one
    #[arg(short, long, value_enum)]
    pub taxonomy: Option<TaxonomyArg>,

    /// Order in which categories are tried
    #[arg(long, value_enum)]
    pub scan_order: Option<ScanOrderArg>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Plain)]
    pub format: FormatArg,

    /// Results per page (at most 100)
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Pause between page requests in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Base URL of the API
    #[arg(long)]
    pub api_base: Option<String>,

    /// Exit with an error when collection ended before the last page
    #[arg(long)]
    pub strict: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TaxonomyArg {
    Flat,
    Tiered,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScanOrderArg {
    Declared,
    Lexicographic,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Plain,
    Markdown,
    Json,
}

/// Convert from CLI taxonomy choice to a built-in taxonomy
pub fn convert_taxonomy(arg: TaxonomyArg) -> Taxonomy {
    match arg {
        TaxonomyArg::Flat => Taxonomy::default_flat(),
        TaxonomyArg::Tiered => Taxonomy::default_tiered(),
    }
}

pub fn convert_scan_order(arg: ScanOrderArg) -> ScanOrder {
    match arg {
        ScanOrderArg::Declared => ScanOrder::Declared,
        ScanOrderArg::Lexicographic => ScanOrder::Lexicographic,
    }
}

pub fn convert_format(arg: FormatArg) -> ReportFormat {
    match arg {
        FormatArg::Plain => ReportFormat::Plain,
        FormatArg::Markdown => ReportFormat::Markdown,
        FormatArg::Json => ReportFormat::Json,
    }
}
