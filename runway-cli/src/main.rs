use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use runway_core::{
    Classifier, TransactionStore, category_breakdown, compute_kpis, monthly_aggregates, write_csv,
};
use runway_ingest::{CancelFlag, import_files};

mod config;
mod report;

/// Matches the downloadable sample statement.
const SAMPLE_TEMPLATE: &str = "Date,Description,Amount\n\
2024-01-15,Sample Income Transaction,1000.00\n\
2024-01-16,Sample Expense Transaction,-250.00\n";

#[derive(Parser, Debug)]
#[command(name = "runway", version, about = "Founder cash-flow review and KPI CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import statement files, then report on the approved activity
    Import {
        /// Statement files (.csv or .pdf)
        files: Vec<PathBuf>,

        /// Manual entries as DATE,DESCRIPTION,AMOUNT (repeatable)
        #[arg(long = "add", value_name = "DATE,DESC,AMOUNT")]
        add: Vec<String>,

        /// Approve everything pending and print the monthly report
        #[arg(long)]
        approve_all: bool,

        /// New-customer count for CAC (overrides the config file)
        #[arg(long)]
        customers: Option<u32>,

        /// Write the full transaction set as CSV
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,

        /// Config file with the customer count and custom categories
        #[arg(long, value_name = "PATH", default_value = "runway.toml")]
        config: PathBuf,
    },

    /// Print a sample statement CSV template
    Template,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Import {
            files,
            add,
            approve_all,
            customers,
            export,
            config,
        } => run_import(files, add, approve_all, customers, export, config),
        Command::Template => {
            print!("{SAMPLE_TEMPLATE}");
            Ok(())
        }
    }
}

fn run_import(
    files: Vec<PathBuf>,
    add: Vec<String>,
    approve_all: bool,
    customers: Option<u32>,
    export: Option<PathBuf>,
    config_path: PathBuf,
) -> Result<()> {
    if files.is_empty() && add.is_empty() {
        bail!("nothing to import (pass statement files or --add entries)");
    }

    let cfg = config::load_config(&config_path)?;
    log::debug!(
        "config: {} customers, {} custom categories",
        cfg.customers,
        cfg.categories.len()
    );
    let taxonomy = config::build_taxonomy(&cfg)?;
    let classifier = Classifier::new();
    let mut store = TransactionStore::new();

    if !files.is_empty() {
        let batch = import_files(&mut store, &classifier, &files, &CancelFlag::new());
        println!("{}", batch.summary());
    }

    for entry in &add {
        let (date, description, amount) = parse_manual_entry(entry)?;
        store
            .add_manual(&classifier, date, description, amount)
            .with_context(|| format!("manual entry {entry:?}"))?;
    }

    report::print_review(&store);

    if approve_all {
        let pending: Vec<u64> = store.pending().iter().map(|t| t.id).collect();
        for id in pending {
            store.approve(id);
        }
        let months = monthly_aggregates(&store, &taxonomy);
        report::print_monthly(&months);
        report::print_breakdown(&category_breakdown(&store));
        let kpis = compute_kpis(&months, customers.unwrap_or(cfg.customers));
        report::print_kpis(&kpis);
    }

    if let Some(path) = export {
        let file =
            fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
        write_csv(file, store.all())?;
        println!("\nExported {} transactions to {}", store.len(), path.display());
    }

    Ok(())
}

/// `DATE,DESCRIPTION,AMOUNT` with the amount after the last comma, so the
/// description may itself contain commas.
fn parse_manual_entry(raw: &str) -> Result<(&str, &str, &str)> {
    let usage = "expected DATE,DESCRIPTION,AMOUNT";
    let (date, rest) = raw.split_once(',').context(usage)?;
    let (description, amount) = rest.rsplit_once(',').context(usage)?;
    Ok((date, description, amount))
}
