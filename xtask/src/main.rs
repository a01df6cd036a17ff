//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use policheck_test_util::normalize_nondeterministic;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(policheck_types::EvaluationReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(policheck_settings::PolicheckConfigV1)
}

fn generate_policy_schema() -> schemars::Schema {
    schema_for!(policheck_types::Policy)
}

fn generate_user_schema() -> schemars::Schema {
    schema_for!(policheck_types::UserRecord)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "policheck.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "policheck.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "policheck.policy.v1.json",
            generate: generate_policy_schema,
        },
        SchemaSpec {
            filename: "policheck.user.v1.json",
            generate: generate_user_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate fixture golden reports against the report schema");
    eprintln!("  conform-full      conform + run the policheck binary on every fixture");
    eprintln!("  explain-coverage  Validate all reason codes and operators have explanations");
}

/// Token pattern for reason codes.
fn is_valid_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn compile_report_schema() -> anyhow::Result<jsonschema::Validator> {
    let schema = serde_json::to_value(generate_report_schema())
        .context("Failed to serialize report schema")?;
    jsonschema::validator_for(&schema).map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))
}

/// Schema and hygiene problems in one report.
fn report_problems(
    compiled: &jsonschema::Validator,
    label: &str,
    report: &serde_json::Value,
) -> Vec<String> {
    let mut errors: Vec<String> = compiled
        .iter_errors(report)
        .map(|err| format!("{label}: schema validation: {err}"))
        .collect();

    if let Some(reasons) = report
        .get("summary")
        .and_then(|s| s.get("failures_by_reason"))
        .and_then(|v| v.as_object())
    {
        for code in reasons.keys() {
            if !is_valid_token(code) {
                errors.push(format!("{label}: failures_by_reason key '{code}' is not a valid token"));
            }
        }
    }

    let bundles = report.get("bundles").and_then(|v| v.as_array());
    for (i, bundle) in bundles.into_iter().flatten().enumerate() {
        let checks = bundle.get("checks").and_then(|v| v.as_array());
        let all_passed = checks
            .into_iter()
            .flatten()
            .all(|c| c.get("passed") == Some(&serde_json::Value::Bool(true)));
        if bundle.get("compliant") != Some(&serde_json::Value::Bool(all_passed)) {
            errors.push(format!("{label}: bundles[{i}].compliant disagrees with its checks"));
        }
        for (j, check) in checks.into_iter().flatten().enumerate() {
            if let Some(reason) = check.get("reason").and_then(|v| v.as_str())
                && !is_valid_token(reason)
            {
                errors.push(format!(
                    "{label}: bundles[{i}].checks[{j}].reason '{reason}' is not a valid token"
                ));
            }
        }
    }

    errors
}

fn fixture_dirs() -> anyhow::Result<Vec<PathBuf>> {
    let dir = fixtures_dir();
    let mut out = Vec::new();
    for entry in fs::read_dir(&dir).context("Failed to read tests/fixtures/")? {
        let path = entry?.path();
        if path.join("expected.report.json").is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn fixture_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Validate every fixture's golden report against the generated report schema.
fn conform() -> anyhow::Result<()> {
    let compiled = compile_report_schema()?;
    println!("✓ policheck.report.v1 schema compiles");

    let fixtures = fixture_dirs()?;
    if fixtures.is_empty() {
        bail!("No golden reports found in {}", fixtures_dir().display());
    }

    let mut errors = Vec::new();
    for dir in &fixtures {
        let name = fixture_name(dir);
        let value = read_json(&dir.join("expected.report.json"))?;
        let problems = report_problems(&compiled, &name, &value);
        if problems.is_empty() {
            println!("  ✓ {name} validates");
        }
        errors.extend(problems);
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} golden reports pass conformance checks!", fixtures.len());
    Ok(())
}

/// Full conformance: golden reports plus live binary output on every fixture.
fn conform_full() -> anyhow::Result<()> {
    conform()?;

    println!("\n--- Full conformance: policheck binary output ---\n");

    let compiled = compile_report_schema()?;
    let policheck_bin = project_root().join("target").join("debug").join("policheck");
    #[cfg(target_os = "windows")]
    let policheck_bin = policheck_bin.with_extension("exe");

    if !policheck_bin.exists() {
        bail!(
            "policheck binary not found at {}.\n\
            Run `cargo build -p policheck-cli` first.",
            policheck_bin.display()
        );
    }

    let mut errors = Vec::new();
    for dir in fixture_dirs()? {
        let name = fixture_name(&dir);
        let users = if dir.join("users.csv").is_file() {
            dir.join("users.csv")
        } else {
            dir.join("users.json")
        };

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let report_out = temp_dir.path().join("report.json");

        let output = std::process::Command::new(&policheck_bin)
            .arg("--config")
            .arg(dir.join("policheck.toml"))
            .arg("evaluate")
            .arg("--policies")
            .arg(dir.join("policies.json"))
            .arg("--users")
            .arg(&users)
            .arg("--report-out")
            .arg(&report_out)
            .output()
            .with_context(|| format!("Failed to run policheck on fixture '{name}'"))?;

        // 0 = pass/warn, 2 = fail; anything else is a tool error.
        if !matches!(output.status.code(), Some(0 | 2)) {
            errors.push(format!(
                "fixture '{name}': policheck exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let report = read_json(&report_out)
            .with_context(|| format!("Failed to load report for fixture '{name}'"))?;
        errors.extend(report_problems(&compiled, &name, &report));

        let golden = read_json(&dir.join("expected.report.json"))?;
        if normalize_nondeterministic(report) != normalize_nondeterministic(golden) {
            errors.push(format!(
                "fixture '{name}': output differs from golden file expected.report.json"
            ));
        } else {
            println!("  ✓ fixture '{name}' matches golden report");
        }
    }

    if !errors.is_empty() {
        eprintln!("\nFull conformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Full conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ Full conformance checks passed!");
    Ok(())
}

/// Validate that all reason codes and operators have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    use policheck_types::explain;

    let codes = explain::all_codes();
    let operators = explain::all_operators();
    let mut errors = Vec::new();

    for (kind, ids) in [("Code", codes), ("Operator", operators)] {
        for id in ids {
            match explain::lookup_explanation(id) {
                Some(exp) => {
                    if exp.title.is_empty() {
                        errors.push(format!("{kind} '{id}' has empty title"));
                    }
                    if exp.description.is_empty() {
                        errors.push(format!("{kind} '{id}' has empty description"));
                    }
                    if exp.remediation.is_empty() {
                        errors.push(format!("{kind} '{id}' has empty remediation"));
                    }
                }
                None => errors.push(format!("{kind} '{id}' has no explanation")),
            }
        }
    }

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("Explain coverage validation failed with {} errors", errors.len());
    }

    println!("✓ {} codes have explanations", codes.len());
    println!("✓ {} operators have explanations", operators.len());
    println!("\n✓ All explain coverage checks passed!");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "conform-full" => conform_full(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
