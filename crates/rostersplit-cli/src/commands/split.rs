//! Split command - extract a roster and write one file per gender.

use std::path::PathBuf;

use colored::Colorize;
use rostersplit::{ColumnOrderSource, Locale, OutputFormat, Splitter, UnresolvedPolicy};

use super::load_config;

pub struct SplitArgs {
    pub source: PathBuf,
    pub template: Option<PathBuf>,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub prefix: String,
    pub locale: Option<Locale>,
    pub unresolved: Option<UnresolvedPolicy>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

pub fn run(args: SplitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.source.exists() {
        return Err(format!("File not found: {}", args.source.display()).into());
    }
    if let Some(ref template) = args.template {
        if !template.exists() {
            return Err(format!("Template not found: {}", template.display()).into());
        }
    }

    let mut config = load_config(args.config.as_ref())?;
    if let Some(locale) = args.locale {
        config.locale = locale;
    }
    if let Some(policy) = args.unresolved {
        config.unresolved = policy;
    }

    if !args.json {
        println!(
            "{} {}",
            "Splitting".cyan().bold(),
            args.source.display().to_string().white()
        );
    }

    let splitter = Splitter::with_config(config)?;
    let result = splitter.split(&args.source, args.template.as_deref())?;
    let paths = result.write(&args.output, args.format, &args.prefix)?;

    if args.json {
        let report = serde_json::json!({
            "result": result,
            "outputs": paths,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let summary = &result.summary;
    println!(
        "Header found at row {} ({} records)",
        (result.header_row + 1).to_string().white().bold(),
        summary.total_records.to_string().white().bold()
    );

    let order_source = match result.column_order_source {
        ColumnOrderSource::Template => "template",
        ColumnOrderSource::Configured => "config",
        ColumnOrderSource::Default => "default",
    };
    println!(
        "Columns ({}): {}",
        order_source,
        result.column_order.join(", ").white()
    );
    println!();

    println!("{}", "Records:".yellow().bold());
    println!("  Male:       {}", summary.male.to_string().blue());
    println!("  Female:     {}", summary.female.to_string().magenta());
    if summary.unresolved_gender > 0 {
        println!(
            "  Unresolved: {}",
            summary.unresolved_gender.to_string().red()
        );
    }

    if !summary.by_document_type.is_empty() || summary.unknown_document_type > 0 {
        println!();
        println!("{}", "Document types:".yellow().bold());
        for (label, count) in &summary.by_document_type {
            println!("  {:12} {}", label, count.to_string().white());
        }
        if summary.unknown_document_type > 0 {
            println!(
                "  {:12} {}",
                "unknown",
                summary.unknown_document_type.to_string().red()
            );
        }
    }

    println!();
    println!("{}", "Wrote".green().bold());
    println!("  {}", paths.male.display().to_string().white());
    println!("  {}", paths.female.display().to_string().white());
    if let Some(ref unresolved) = paths.unresolved {
        println!("  {}", unresolved.display().to_string().white());
    }

    if summary.unresolved_gender > 0 && splitter.config().unresolved == UnresolvedPolicy::Drop {
        println!();
        println!(
            "{} rows without a derivable gender were not written. Use {} to keep them.",
            summary.unresolved_gender.to_string().yellow(),
            "--unresolved separate".cyan().bold()
        );
    }

    Ok(())
}
