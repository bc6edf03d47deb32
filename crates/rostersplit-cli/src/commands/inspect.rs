//! Inspect command - show header and column resolution for a roster.

use std::path::PathBuf;

use colored::Colorize;
use rostersplit::{CanonicalField, ColumnResolution, Splitter};

use super::load_config;

/// Records previewed by default.
const PREVIEW_ROWS: usize = 5;
/// Records previewed with `--verbose`.
const VERBOSE_PREVIEW_ROWS: usize = 20;

/// Source header as shown to the user. Matching always uses the raw text.
fn display_header(header: &str) -> &str {
    header.trim()
}

fn preview_limit(verbose: bool) -> usize {
    if verbose { VERBOSE_PREVIEW_ROWS } else { PREVIEW_ROWS }
}

pub fn run(
    source: PathBuf,
    config: Option<PathBuf>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !source.exists() {
        return Err(format!("File not found: {}", source.display()).into());
    }

    let config = load_config(config.as_ref())?;
    let locale = config.locale;
    let splitter = Splitter::with_config(config)?;
    let extraction = splitter.extract(&source)?;

    if json_output {
        let report = serde_json::json!({
            "file": source.display().to_string(),
            "header_row": extraction.header_row,
            "resolutions": extraction.resolutions,
            "dropped_columns": extraction.dropped_columns,
            "records": extraction.table.len(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Inspecting".cyan().bold(),
        source.display().to_string().white()
    );
    println!(
        "Header found at row {} ({} records)",
        (extraction.header_row + 1).to_string().white().bold(),
        extraction.table.len().to_string().white().bold()
    );
    println!();

    println!("{}", "Columns:".yellow().bold());
    for (field, resolution) in &extraction.resolutions {
        let label = field.header(locale);
        match resolution {
            ColumnResolution::ByName { column, .. } => {
                println!(
                    "  {:16} {} {}",
                    label,
                    display_header(column).green(),
                    "(by name)".dimmed()
                )
            }
            ColumnResolution::ByPattern { column, .. } => {
                println!(
                    "  {:16} {} {}",
                    label,
                    display_header(column).blue(),
                    "(by pattern)".dimmed()
                )
            }
            ColumnResolution::Unresolved => println!("  {:16} {}", label, "unresolved".red()),
        }
    }

    if !extraction.dropped_columns.is_empty() {
        println!();
        let dropped: Vec<&str> = extraction
            .dropped_columns
            .iter()
            .map(|c| display_header(c))
            .collect();
        println!("Ignored existing columns: {}", dropped.join(", ").yellow());
    }

    let identifier_resolved = extraction
        .resolutions
        .get(&CanonicalField::IdentifierNumber)
        .is_some_and(ColumnResolution::is_resolved);
    if !identifier_resolved {
        println!();
        println!(
            "{}",
            "No identifier column found: every row will be unresolved.".red()
        );
    }

    if !extraction.table.is_empty() {
        let limit = preview_limit(verbose);
        let preview = extraction.table.to_data_table(locale);
        println!();
        println!(
            "{} (first {} of {})",
            "Preview:".yellow().bold(),
            limit.min(preview.row_count()),
            preview.row_count()
        );
        println!("  {}", preview.headers.join(" | ").bold());
        for row in preview.rows.iter().take(limit) {
            println!("  {}", row.join(" | "));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_header_trims_whitespace() {
        assert_eq!(display_header(" 性别 "), "性别");
        assert_eq!(display_header("\t姓名\u{3000}"), "姓名");
        assert_eq!(display_header("证件号"), "证件号");
    }

    #[test]
    fn test_preview_is_shown_without_verbose() {
        assert_eq!(preview_limit(false), 5);
        assert_eq!(preview_limit(true), 20);
    }
}
