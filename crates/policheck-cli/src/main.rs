//! CLI entry point for policheck.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup, I/O, and
//! exit codes. All business logic lives in the `policheck-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use policheck_app::{
    EvaluateInput, ExplainOutput, ExportInput, ImportInput, ImportTarget, parse_report_json,
    run_coerce, run_evaluate, run_explain, run_export_csv, run_import, run_markdown,
    runtime_error_report, serialize_report, verdict_exit_code,
};
use policheck_settings::Overrides;
use policheck_types::EvaluationReport;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "policheck",
    version,
    about = "Evaluate declarative compliance policies against user records"
)]
struct Cli {
    /// Path to policheck config TOML (missing file means defaults).
    #[arg(long, global = true, default_value = "policheck.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|audit|lenient).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Override how `!=` treats absent fields (fail|not_equal).
    #[arg(long, global = true)]
    absent_field: Option<String>,

    /// Log more. Repeat for more detail (-v, -vv). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ImportKind {
    Policies,
    Users,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate every policy against every user and write artifacts.
    Evaluate {
        /// Policy snapshot (.json) or policy CSV.
        #[arg(long)]
        policies: Utf8PathBuf,

        /// User snapshot or upload (.json or .csv).
        #[arg(long)]
        users: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/policheck/report.json")]
        report_out: Utf8PathBuf,

        /// Also write the flattened check rows as CSV.
        #[arg(long)]
        csv_out: Option<Utf8PathBuf>,

        /// Also write a Markdown summary.
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,

        /// Restrict CSV rows to matching policy ids (glob, repeatable).
        #[arg(long = "policy")]
        policies_filter: Vec<String>,

        /// Restrict CSV rows to matching usernames (glob, repeatable).
        #[arg(long = "user")]
        users_filter: Vec<String>,

        /// Evaluate on the current thread only.
        #[arg(long)]
        sequential: bool,
    },

    /// Validate a policy or user file and merge it into a snapshot.
    Import {
        #[arg(value_enum)]
        kind: ImportKind,

        /// Uploaded file (.json or .csv).
        #[arg(long)]
        file: Utf8PathBuf,

        /// Snapshot file to merge into (created when missing).
        #[arg(long)]
        store: Utf8PathBuf,

        /// Replace the whole collection instead of merging.
        #[arg(long)]
        clear: bool,
    },

    /// Export check rows from an existing JSON report as CSV.
    Export {
        #[arg(long, default_value = "artifacts/policheck/report.json")]
        report: Utf8PathBuf,

        /// Where to write the CSV (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,

        /// Keep rows for matching policy ids (glob, repeatable).
        #[arg(long = "policy")]
        policies: Vec<String>,

        /// Keep rows for matching usernames (glob, repeatable).
        #[arg(long = "user")]
        users: Vec<String>,
    },

    /// Render markdown from an existing JSON report.
    Md {
        #[arg(long, default_value = "artifacts/policheck/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a failure reason code or an operator.
    Explain {
        /// A reason code (e.g. "missing_field") or operator (e.g. "in").
        identifier: String,
    },

    /// Show how authoring text is coerced for an operator.
    Coerce {
        #[arg(long)]
        operator: String,

        /// Raw text as typed into a policy form or CSV cell.
        #[arg(allow_hyphen_values = true)]
        raw: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Evaluate {
            ref policies,
            ref users,
            ref report_out,
            ref csv_out,
            ref markdown_out,
            ref policies_filter,
            ref users_filter,
            sequential,
        } => cmd_evaluate(
            &cli,
            EvaluateArgs {
                policies,
                users,
                report_out,
                csv_out: csv_out.as_deref(),
                markdown_out: markdown_out.as_deref(),
                filter: ExportInput {
                    policies: policies_filter.clone(),
                    users: users_filter.clone(),
                },
                sequential,
            },
        ),
        Commands::Import {
            kind,
            ref file,
            ref store,
            clear,
        } => cmd_import(kind, file, store, clear),
        Commands::Export {
            ref report,
            ref output,
            ref policies,
            ref users,
        } => cmd_export(
            report,
            output.as_deref(),
            &ExportInput {
                policies: policies.clone(),
                users: users.clone(),
            },
        ),
        Commands::Md {
            ref report,
            ref output,
        } => cmd_md(report, output.as_deref()),
        Commands::Explain { ref identifier } => cmd_explain(identifier),
        Commands::Coerce {
            ref operator,
            ref raw,
        } => {
            println!("{}", run_coerce(operator, raw)?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct EvaluateArgs<'a> {
    policies: &'a Utf8Path,
    users: &'a Utf8Path,
    report_out: &'a Utf8Path,
    csv_out: Option<&'a Utf8Path>,
    markdown_out: Option<&'a Utf8Path>,
    filter: ExportInput,
    sequential: bool,
}

fn cmd_evaluate(cli: &Cli, args: EvaluateArgs<'_>) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        // Load config if present; missing file is allowed (defaults apply).
        let cfg_text = std::fs::read_to_string(&cli.config).unwrap_or_default();
        if cfg_text.is_empty() {
            tracing::debug!(path = %cli.config, "no config file; using defaults");
        }

        let overrides = Overrides {
            profile: cli.profile.clone(),
            absent_field: cli.absent_field.clone(),
            parallel: args.sequential.then_some(false),
        };

        let output = run_evaluate(EvaluateInput {
            policies_path: args.policies,
            users_path: args.users,
            config_text: &cfg_text,
            overrides,
        })?;

        let report = &output.report;
        write_file(args.report_out, &serialize_report(report)?).context("write report json")?;

        if let Some(path) = args.csv_out {
            let csv = run_export_csv(report, &args.filter)?;
            write_file(path, csv.as_bytes()).context("write csv")?;
        }
        if let Some(path) = args.markdown_out {
            write_file(path, run_markdown(report).as_bytes()).context("write markdown")?;
        }

        Ok(verdict_exit_code(report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            if let Ok(data) = serialize_report(&report) {
                let _ = write_file(args.report_out, &data);
            }
            eprintln!("policheck error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_import(
    kind: ImportKind,
    file: &Utf8Path,
    store: &Utf8Path,
    clear: bool,
) -> anyhow::Result<()> {
    let target = match kind {
        ImportKind::Policies => ImportTarget::Policies,
        ImportKind::Users => ImportTarget::Users,
    };
    let summary = run_import(ImportInput {
        target,
        file,
        store,
        clear,
    })?;
    println!("{}", serde_json::to_string(&summary).context("serialize import summary")?);
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<EvaluationReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn cmd_export(
    report: &Utf8Path,
    output: Option<&Utf8Path>,
    filter: &ExportInput,
) -> anyhow::Result<()> {
    let report = read_report(report)?;
    let csv = run_export_csv(&report, filter)?;
    emit(output, &csv)
}

fn cmd_md(report: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = read_report(report)?;
    emit(output, &run_markdown(&report))
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", policheck_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_codes,
            available_operators,
        } => {
            eprint!(
                "{}",
                policheck_app::format_not_found(&identifier, available_codes, available_operators)
            );
            std::process::exit(1);
        }
    }
}

fn emit(output: Option<&Utf8Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => write_file(path, text.as_bytes()).context("write output"),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn write_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write {path}"))?;
    Ok(())
}
