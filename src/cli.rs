//! Subcommand runners for the `whatif` binary.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::join_all;
use strum::IntoEnumIterator;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::analysis::Validator;
use crate::config::{BIG_MART, ENGINE, EngineConfig, ServiceConfig};
use crate::data::{HttpPredictionClient, PredictionClient};
use crate::domain::{FieldValue, InputSnapshot, Scenario};
use crate::engine::{ComparisonSession, EngineOutput, WhatIfEngine};
use crate::models::{DiffReport, LiveUpdate};
use crate::shared::SharedInputSource;
use crate::utils::{format_currency, format_signed_pct};
use crate::{Cli, Command};

const ENGINE_GRACE_MS: u64 = 2_000;

pub async fn run(args: Cli) -> Result<()> {
    let service = ServiceConfig {
        timeout_ms: args.timeout_ms,
        ..ServiceConfig::new(args.base_url.clone())
    };
    let engine = ENGINE.with_debounce(Duration::from_millis(args.debounce_ms));
    let client: Arc<dyn PredictionClient> = Arc::new(
        HttpPredictionClient::new(service).context("Failed to build the HTTP client")?,
    );

    match args.command {
        Command::Predict { snapshots } => predict(client, &snapshots).await,
        Command::Compare { shared, a, b } => compare(client, engine, &shared, &a, &b).await,
        Command::Live { base } => live(client, engine, &base).await,
    }
}

fn load_snapshot(path: &Path) -> Result<InputSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON object of field values", path.display()))
}

async fn predict(client: Arc<dyn PredictionClient>, paths: &[std::path::PathBuf]) -> Result<()> {
    let validator = Validator::new(&BIG_MART);
    let mut snapshots = Vec::with_capacity(paths.len());
    for path in paths {
        let snapshot = load_snapshot(path)?.normalized(&BIG_MART);
        validator
            .validate(&snapshot)
            .with_context(|| format!("{} cannot be submitted", path.display()))?;
        snapshots.push(snapshot);
    }

    // Independent snapshots, so all requests go out together
    let results = join_all(snapshots.iter().map(|s| client.predict_one(s))).await;

    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(value) => println!(
                "{}: {} ({} vs average)",
                path.display(),
                format_currency(value),
                vs_average(value, &ENGINE)
            ),
            Err(e) => println!("{}: error: {}", path.display(), e),
        }
    }
    Ok(())
}

#[derive(Tabled)]
struct DiffRow {
    #[tabled(rename = "Field")]
    label: String,
    #[tabled(rename = "Scenario A")]
    a: String,
    #[tabled(rename = "Scenario B")]
    b: String,
}

async fn compare(
    client: Arc<dyn PredictionClient>,
    engine: EngineConfig,
    shared: &Path,
    a: &Path,
    b: &Path,
) -> Result<()> {
    let session = ComparisonSession::new(engine, &BIG_MART, client);
    let report = session
        .compare_parts(load_snapshot(shared)?, load_snapshot(a)?, load_snapshot(b)?)
        .await
        .context("Comparison failed")?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &DiffReport) {
    for scenario in Scenario::iter() {
        let (vs_avg, width) = match scenario {
            Scenario::A => (report.vs_average_a, report.bar_width_a),
            Scenario::B => (report.vs_average_b, report.bar_width_b),
        };
        let marker = if report.winner == Some(scenario) { " *" } else { "" };
        println!(
            "{:<11} {:>12}  {:<20} {}{}",
            scenario.to_string(),
            format_currency(report.value(scenario)),
            bar(width, 20),
            vs_avg.map(format_signed_pct).unwrap_or_default(),
            marker
        );
    }

    match report.margin_percent {
        Some(pct) => println!(
            "Difference: {} ({:.1}%)",
            format_currency(report.margin_absolute),
            pct
        ),
        None => println!("Difference: {}", format_currency(report.margin_absolute)),
    }

    if !report.field_diffs.is_empty() {
        let rows = report.field_diffs.iter().map(|d| DiffRow {
            label: d.label.clone(),
            a: d.value_a.clone(),
            b: d.value_b.clone(),
        });
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    println!("\n{}", report.recommendation);
}

fn bar(width_pct: f64, cells: usize) -> String {
    let filled = ((width_pct / 100.0) * cells as f64).round() as usize;
    "█".repeat(filled.min(cells))
}

fn vs_average(value: f64, config: &EngineConfig) -> String {
    crate::utils::percent_change(value, config.dataset_average)
        .map(format_signed_pct)
        .unwrap_or_else(|| "n/a".to_string())
}

/// Parses one `Field=value` edit. An empty value clears the field.
fn parse_edit(line: &str) -> Option<(String, Option<FieldValue>)> {
    let (name, raw) = line.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let raw = raw.trim();
    let value = if raw.is_empty() {
        None
    } else {
        Some(match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => FieldValue::Number(n),
            _ => FieldValue::text(raw),
        })
    };
    Some((name.to_string(), value))
}

async fn live(client: Arc<dyn PredictionClient>, engine: EngineConfig, base: &Path) -> Result<()> {
    let source = SharedInputSource::new(load_snapshot(base)?);
    // Covers the final debounce plus one request
    let grace = engine.debounce + Duration::from_millis(ENGINE_GRACE_MS);
    let mut handle = WhatIfEngine::new(engine, &BIG_MART, Arc::new(source.clone()), client).start();

    // Score the starting snapshot straight away
    handle.input_changed();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else { break };
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                match parse_edit(line) {
                    Some((name, Some(value))) => source.set(name, value),
                    Some((name, None)) => source.remove(&name),
                    None => {
                        eprintln!("expected Field=value, got '{}'", line);
                        continue;
                    }
                }
                handle.input_changed();
            }
            Some(output) = handle.next_output() => print_output(&output),
        }
    }

    // Let the last edit settle before shutting down
    while let Ok(Some(output)) = tokio::time::timeout(grace, handle.next_output()).await {
        print_output(&output);
    }
    handle.dispose().await;
    Ok(())
}

fn print_output(output: &EngineOutput) {
    match output {
        EngineOutput::Accepted(update) => print_update(update),
        EngineOutput::Failed { sequence, error } => println!("#{}: error: {}", sequence, error),
        EngineOutput::Invalid(report) => println!(
            "waiting for input: {}",
            report.offending_fields().join(", ")
        ),
    }
}

fn print_update(update: &LiveUpdate) {
    let mut line = format!("#{}: {}", update.sequence, format_currency(update.value));
    if let Some(pct) = update.vs_average_pct {
        line.push_str(&format!(" ({} vs average)", format_signed_pct(pct)));
    }
    if let Some(delta) = update.delta_from_last {
        let sign = if delta >= 0.0 { "+" } else { "" };
        line.push_str(&format!(" [{}{:.0}]", sign, delta));
    }
    println!("{}", line);

    let trend: Vec<String> = update
        .history
        .iter()
        .map(|h| format!("{:.0}", h.value))
        .collect();
    println!("   history: {}", trend.join(" → "));
}
