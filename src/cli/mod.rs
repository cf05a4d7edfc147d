pub mod report;
pub mod rollup;
pub mod settings;
pub mod view;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::columns::ViewMode;
use crate::error::{Result, SalesError};
use crate::fmt::Locale;
use crate::ingest;
use crate::models::SalesPage;

#[derive(Parser)]
#[command(name = "royalties", about = "Partner royalty sales: monthly, yearly and all-time views.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the sales payloads come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// HTML page embedding #sales-data and #sales-config script elements
    #[arg(long, conflicts_with_all = ["data", "config"])]
    pub page: Option<PathBuf>,
    /// Sales-data JSON file
    #[arg(long, requires = "config")]
    pub data: Option<PathBuf>,
    /// Sales-config JSON file
    #[arg(long, requires = "data")]
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    pub fn load(&self) -> Result<Option<SalesPage>> {
        match (&self.page, &self.data, &self.config) {
            (Some(page), _, _) => ingest::load_page(page),
            (None, Some(data), Some(config)) => ingest::load_files(data, config),
            _ => Err(SalesError::Other(
                "pass --page, or --data together with --config".into(),
            )),
        }
    }
}

/// Column filters applied to the table before rendering.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive search over every column
    #[arg(long)]
    pub search: Option<String>,
    /// Only rows for this book title
    #[arg(long)]
    pub book: Option<String>,
    /// Only rows for this author
    #[arg(long)]
    pub author: Option<String>,
    /// Only rows for this year (ignored in all-time mode)
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Csv,
    Html,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the sales table interactively (falls back to text when not a terminal).
    View {
        #[command(flatten)]
        source: SourceArgs,
        /// Initial view mode (default: the `default_mode` setting)
        #[arg(long, value_enum)]
        mode: Option<ViewMode>,
    },
    /// Render the sales table as text, CSV or HTML.
    Report {
        #[command(flatten)]
        source: SourceArgs,
        /// View mode (default: the `default_mode` setting)
        #[arg(long, value_enum)]
        mode: Option<ViewMode>,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
        /// Output file path (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Roll distributor sale lines up into a sales-data JSON payload.
    Rollup {
        /// CSV of sale lines
        #[arg(long)]
        sales: PathBuf,
        /// JSON catalog mapping ISBNs to books and royalty shares
        #[arg(long)]
        catalog: PathBuf,
        /// Output file path (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show or update persisted settings.
    Settings {
        #[arg(long = "default-mode", value_enum)]
        default_mode: Option<ViewMode>,
        #[arg(long = "currency-prefix")]
        currency_prefix: Option<String>,
        #[arg(long = "page-length")]
        page_length: Option<usize>,
        /// Locale for roll-up month names
        #[arg(long, value_enum)]
        locale: Option<Locale>,
        /// Data directory (log file, exports)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
}

/// Write `content` to `output`, or print it when no path is given.
pub(crate) fn emit(content: &str, output: Option<&std::path::Path>) -> Result<()> {
    match output {
        Some(p) => {
            if let Some(parent) = p.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(p, content)?;
            println!("Wrote {}", p.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_report() {
        let cli = Cli::try_parse_from([
            "royalties", "report", "--data", "d.json", "--config", "c.json",
            "--mode", "all-time", "--format", "csv", "--year", "2025",
        ])
        .unwrap();
        let Commands::Report {
            source,
            mode,
            filters,
            format,
            output,
        } = cli.command
        else {
            panic!("expected report");
        };
        assert_eq!(source.data, Some(PathBuf::from("d.json")));
        assert_eq!(mode, Some(ViewMode::AllTime));
        assert_eq!(filters.year, Some(2025));
        assert_eq!(format, ReportFormat::Csv);
        assert!(output.is_none());
    }

    #[test]
    fn test_data_requires_config() {
        assert!(Cli::try_parse_from(["royalties", "report", "--data", "d.json"]).is_err());
        assert!(Cli::try_parse_from([
            "royalties", "view", "--page", "p.html", "--data", "d.json", "--config", "c.json",
        ])
        .is_err());
    }

    #[test]
    fn test_source_without_inputs_is_error() {
        let source = SourceArgs {
            page: None,
            data: None,
            config: None,
        };
        assert!(matches!(source.load(), Err(SalesError::Other(_))));
    }
}
