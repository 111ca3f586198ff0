//! # threadline CLI
//!
//! Command-line interface for the threadline library.
//!
//! Reports go to stdout unless `-o` is given; with `-o`, progress lines are
//! printed instead and the report lands in the file.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use log::LevelFilter;
use serde::Serialize;

use threadline::ThreadlineError;
use threadline::cli::{AddRuleArgs, AnalysisArgs, Cli, Command};
use threadline::config::AnalysisConfig;
use threadline::core::identity::{MergeRule, load_rules, save_rules};
use threadline::core::models::{
    ContactThreadCountRow, DuplicateRow, MessageRow, ResponseTimeRow, SearchHitRow, ThreadRow,
    ThreadStatsReport,
};
use threadline::core::{Analysis, FilterConfig};
use threadline::format::{OutputFormat, to_format_string, write_to_format};
use threadline::loader::load_messages;

fn main() {
    let cli = <Cli as ClapParser>::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(command: Command) -> Result<(), ThreadlineError> {
    match command {
        Command::Threads { common, stats } => {
            let analysis = build_analysis(&common)?;
            if stats {
                let statistics = analysis.thread_statistics();
                let format = resolve_format(&common);
                if format == OutputFormat::Csv {
                    let rows = ContactThreadCountRow::from_stats(&statistics);
                    emit(&rows, &common, "contacts")
                } else {
                    emit_document(&ThreadStatsReport::from(&statistics), &common)
                }
            } else {
                let rows: Vec<ThreadRow> = analysis.threads().iter().map(ThreadRow::from).collect();
                emit(&rows, &common, "threads")
            }
        }
        Command::Responses { common } => {
            let analysis = build_analysis(&common)?;
            let rows: Vec<ResponseTimeRow> = analysis
                .response_times()
                .values()
                .map(ResponseTimeRow::from)
                .collect();
            emit(&rows, &common, "contacts")
        }
        Command::Duplicates { common } => {
            let analysis = build_analysis(&common)?;
            let rows: Vec<DuplicateRow> =
                analysis.duplicates().iter().map(DuplicateRow::from).collect();
            emit(&rows, &common, "candidate pairs")
        }
        Command::Search { common, query } => {
            let analysis = build_analysis(&common)?;
            let rows: Vec<SearchHitRow> =
                analysis.search(&query).iter().map(SearchHitRow::from).collect();
            emit(&rows, &common, "matches")
        }
        Command::Merge { common } => {
            let analysis = build_analysis(&common)?;
            // JSON layouts keep the nested message shape the loader reads
            if resolve_format(&common) == OutputFormat::Csv {
                let rows: Vec<MessageRow> =
                    analysis.messages().iter().map(MessageRow::from).collect();
                emit(&rows, &common, "messages")
            } else {
                emit(analysis.messages(), &common, "messages")
            }
        }
        Command::AddRule(args) => add_rule(&args),
    }
}

/// Loads config, rules and messages, then runs resolution and filters.
fn build_analysis(args: &AnalysisArgs) -> Result<Analysis, ThreadlineError> {
    let total_start = Instant::now();
    let chatty = args.output.is_some();

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::new(),
    };
    if let Some(me) = &args.me {
        config.own_phone.clone_from(me);
    }
    if let Some(path) = &args.rules {
        config.merge_rules.extend(load_rules(path)?);
    }
    if let Some(timeout) = &args.timeout {
        config.threads = config.threads.clone().with_timeout_str(timeout)?;
    }
    if let Some(min) = args.min_length {
        config.threads = config.threads.clone().with_min_thread_length(min);
    }

    let mut filter = FilterConfig::new();
    if let Some(after) = &args.after {
        filter = filter.with_date_from(after)?;
    }
    if let Some(before) = &args.before {
        filter = filter.with_date_to(before)?;
    }
    if let Some(contact) = &args.contact {
        filter = filter.with_contact(contact.clone());
    }

    if config.own_phone.is_empty() {
        log::warn!("no --me phone given; the local user will be treated as a contact");
    }

    if chatty {
        println!("📦 threadline v{}", env!("CARGO_PKG_VERSION"));
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("📂 Input:   {}", args.input);
        if !config.own_phone.is_empty() {
            println!("📱 Me:      {}", config.own_phone);
        }
        println!("🔗 Rules:   {}", config.merge_rules.len());
        if let Some(after) = &args.after {
            println!("📅 After:   {}", after);
        }
        if let Some(before) = &args.before {
            println!("📅 Before:  {}", before);
        }
        if let Some(contact) = &args.contact {
            println!("👤 Contact: {}", contact);
        }
        println!();
        println!("⏳ Loading messages...");
    }

    let messages = load_messages(&args.input)?;
    let analysis = Analysis::with_filters(messages, &config, &filter);
    let stats = analysis.stats();

    if chatty {
        println!("   Found {} messages", stats.original_count);
        if filter.is_active() {
            println!("🔍 {} messages after filtering", stats.analyzed_count);
        }
        println!(
            "🔀 Contacts: {} -> {} ({:.1}% reduction)",
            stats.contacts_before,
            stats.contacts_after,
            stats.reduction_ratio()
        );
        println!(
            "   Prepared in {:.2}s",
            total_start.elapsed().as_secs_f64()
        );
    }

    Ok(analysis)
}

/// Explicit `--format` wins, then the output extension, then JSON.
fn resolve_format(args: &AnalysisArgs) -> OutputFormat {
    if let Some(format) = args.format {
        return format.into();
    }
    args.output
        .as_deref()
        .and_then(|path| OutputFormat::from_path(path).ok())
        .unwrap_or_default()
}

/// Appends the format's extension when the output path has none.
fn adjust_output_extension(output: &str, format: OutputFormat) -> String {
    if Path::new(output).extension().is_some() {
        return output.to_string();
    }
    format!("{}.{}", output, format.extension())
}

fn emit<R: Serialize>(rows: &[R], args: &AnalysisArgs, what: &str) -> Result<(), ThreadlineError> {
    let format = resolve_format(args);

    match &args.output {
        Some(output) => {
            let output_path = adjust_output_extension(output, format);
            println!("💾 Writing {}...", format);
            write_to_format(rows, &output_path, format)?;
            println!();
            println!("✅ Done! {} {} saved to {}", rows.len(), what, output_path);
        }
        None => print_report(&to_format_string(rows, format)?),
    }
    Ok(())
}

/// Writes a single JSON document (JSON or JSONL formats only).
fn emit_document<T: Serialize>(value: &T, args: &AnalysisArgs) -> Result<(), ThreadlineError> {
    let format = resolve_format(args);
    let rendered = if format == OutputFormat::Jsonl {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };

    match &args.output {
        Some(output) => {
            let output_path = adjust_output_extension(output, format);
            std::fs::write(&output_path, format!("{}\n", rendered))?;
            println!();
            println!("✅ Done! Statistics saved to {}", output_path);
        }
        None => print_report(&rendered),
    }
    Ok(())
}

fn print_report(rendered: &str) {
    if rendered.ends_with('\n') {
        print!("{}", rendered);
    } else {
        println!("{}", rendered);
    }
}

fn add_rule(args: &AddRuleArgs) -> Result<(), ThreadlineError> {
    let mut rules = if Path::new(&args.rules).exists() {
        load_rules(&args.rules)?
    } else {
        Vec::new()
    };

    let rule = MergeRule::new(args.source.clone(), args.target.clone(), args.result.clone())?;
    println!(
        "🔗 {} + {} -> {}",
        rule.source, rule.target, rule.result
    );
    rules.push(rule);
    save_rules(&args.rules, &rules)?;

    println!("✅ Saved {} rules to {}", rules.len(), args.rules);
    Ok(())
}
