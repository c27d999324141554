//! Build-pipeline gate: audit rendered artifact files and emit a
//! compliance report.

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use so6_audit::{ArtifactSource, StructureValidator};
use so6_schema::SchemaRegistry;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Command::new("so6-audit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Structural compliance auditor for rendered SO6 artifacts")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("scan")
                .about("Audit rendered artifact files")
                .arg(
                    Arg::new("paths")
                        .required(true)
                        .num_args(1..)
                        .help("Artifact files (.html/.md scanned as markup, .json as object trees)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .help("Write the JSON report to this file instead of stdout"),
                )
                .arg(
                    Arg::new("warnings-as-errors")
                        .long("warnings-as-errors")
                        .action(ArgAction::SetTrue)
                        .help("Fail the gate on advisory findings too"),
                ),
        )
        .subcommand(Command::new("schema").about("Check the built-in schema definition"));

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("scan", args)) => {
            let paths: Vec<&String> = args.get_many::<String>("paths").unwrap().collect();
            let strict = args.get_flag("warnings-as-errors");

            let mut artifacts = Vec::new();
            for path in paths {
                match ArtifactSource::from_path(Path::new(path))? {
                    Some(artifact) => artifacts.push(artifact),
                    None => tracing::warn!(%path, "skipping file with unrecognized extension"),
                }
            }

            let validator = StructureValidator::new(SchemaRegistry::shared());
            let report = validator.validate_batch(&artifacts);

            let rendered = serde_json::to_string_pretty(&report)?;
            match args.get_one::<String>("output") {
                Some(output) => std::fs::write(output, &rendered)
                    .with_context(|| format!("writing report to {output}"))?,
                None => println!("{rendered}"),
            }

            let gate_passed = report.is_compliant() && (!strict || report.warnings.is_empty());
            std::process::exit(i32::from(!gate_passed))
        }
        Some(("schema", _)) => {
            let issues = StructureValidator::validate_schema_integrity(SchemaRegistry::shared());
            if issues.is_empty() {
                println!("schema definition is consistent");
                Ok(())
            } else {
                for issue in &issues {
                    println!("{:?}: {}", issue.severity, issue.message);
                }
                std::process::exit(1)
            }
        }
        _ => Ok(()),
    }
}
