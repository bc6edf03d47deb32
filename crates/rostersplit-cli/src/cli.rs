//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use rostersplit::{Locale, OutputFormat, UnresolvedPolicy};
use std::path::PathBuf;

/// Rostersplit: normalize personnel rosters and split them by gender
#[derive(Parser)]
#[command(name = "rostersplit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a roster into male and female files
    Split {
        /// Path to the roster (xlsx, xls, ods, csv, tsv)
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// File whose first row gives the output columns
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Directory for the output files
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "xlsx")]
        format: FormatChoice,

        /// Prefix for output file names
        #[arg(long, default_value = "")]
        prefix: String,

        /// Language of output headers and values (overrides config)
        #[arg(long)]
        locale: Option<LocaleChoice>,

        /// Where rows without a derivable gender go (overrides config)
        #[arg(long)]
        unresolved: Option<UnresolvedChoice>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a roster's header and columns are resolved, without writing files
    Inspect {
        /// Path to the roster
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, Default)]
pub enum FormatChoice {
    #[default]
    Xlsx,
    Csv,
    Tsv,
}

impl std::str::FromStr for FormatChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(FormatChoice::Xlsx),
            "csv" => Ok(FormatChoice::Csv),
            "tsv" => Ok(FormatChoice::Tsv),
            _ => Err(format!("Unknown format: {}. Use xlsx, csv, or tsv.", s)),
        }
    }
}

impl std::fmt::Display for FormatChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatChoice::Xlsx => write!(f, "xlsx"),
            FormatChoice::Csv => write!(f, "csv"),
            FormatChoice::Tsv => write!(f, "tsv"),
        }
    }
}

impl From<FormatChoice> for OutputFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Xlsx => OutputFormat::Xlsx,
            FormatChoice::Csv => OutputFormat::Csv,
            FormatChoice::Tsv => OutputFormat::Tsv,
        }
    }
}

/// Output language
#[derive(Clone, Copy, Debug)]
pub enum LocaleChoice {
    /// Chinese headers and labels
    Zh,
    /// English headers and labels
    En,
}

impl std::str::FromStr for LocaleChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" | "chinese" | "cn" => Ok(LocaleChoice::Zh),
            "en" | "english" => Ok(LocaleChoice::En),
            _ => Err(format!("Unknown locale: {}. Use zh or en.", s)),
        }
    }
}

impl From<LocaleChoice> for Locale {
    fn from(choice: LocaleChoice) -> Self {
        match choice {
            LocaleChoice::Zh => Locale::Chinese,
            LocaleChoice::En => Locale::English,
        }
    }
}

/// Handling of rows whose identifier yields no gender
#[derive(Clone, Copy, Debug)]
pub enum UnresolvedChoice {
    /// Leave them out of both outputs
    Drop,
    /// Put them in both outputs
    Both,
    /// Write them to a third file
    Separate,
}

impl std::str::FromStr for UnresolvedChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(UnresolvedChoice::Drop),
            "both" => Ok(UnresolvedChoice::Both),
            "separate" => Ok(UnresolvedChoice::Separate),
            _ => Err(format!(
                "Unknown policy: {}. Use drop, both, or separate.",
                s
            )),
        }
    }
}

impl From<UnresolvedChoice> for UnresolvedPolicy {
    fn from(choice: UnresolvedChoice) -> Self {
        match choice {
            UnresolvedChoice::Drop => UnresolvedPolicy::Drop,
            UnresolvedChoice::Both => UnresolvedPolicy::Both,
            UnresolvedChoice::Separate => UnresolvedPolicy::Separate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_split_args() {
        let cli = Cli::try_parse_from([
            "rostersplit",
            "split",
            "roster.xlsx",
            "-t",
            "template.xlsx",
            "-f",
            "csv",
            "--locale",
            "en",
            "--unresolved",
            "separate",
        ])
        .unwrap();

        match cli.command {
            Commands::Split {
                source,
                template,
                format,
                locale,
                unresolved,
                ..
            } => {
                assert_eq!(source, PathBuf::from("roster.xlsx"));
                assert_eq!(template, Some(PathBuf::from("template.xlsx")));
                assert_eq!(OutputFormat::from(format), OutputFormat::Csv);
                assert_eq!(locale.map(Locale::from), Some(Locale::English));
                assert_eq!(
                    unresolved.map(UnresolvedPolicy::from),
                    Some(UnresolvedPolicy::Separate)
                );
            }
            _ => panic!("expected split command"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!("pdf".parse::<FormatChoice>().is_err());
        assert!(Cli::try_parse_from(["rostersplit", "split", "a.csv", "-f", "pdf"]).is_err());
    }
}
