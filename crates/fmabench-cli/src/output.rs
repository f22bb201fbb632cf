//! Table and JSON rendering.

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use fmabench_core::fma::fma_support;
use fmabench_core::{BenchConfig, SuiteReport};
use serde_json::json;

use crate::check::CheckReport;

fn header(table: &mut Table, columns: &[&str]) {
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            columns
                .iter()
                .map(|c| Cell::new(c).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
}

fn nanos(d: std::time::Duration) -> String {
    format!("{} ns", d.as_nanos())
}

pub fn print_info(config: &BenchConfig, json: bool) -> Result<()> {
    let support = fma_support();
    if json {
        let value = json!({
            "fma": {
                "compile_time": support.compile_time,
                "runtime": support.runtime,
                "path": support.path().as_str(),
            },
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "FMA support".bold());
    println!("  compile time: {}", support.compile_time);
    println!("  runtime:      {}", support.runtime);
    println!("  fused path:   {}", support.path().as_str().green());
    println!();

    let mut table = Table::new();
    header(&mut table, &["Setting", "Value"]);
    let r = &config.reduction;
    let e = &config.embedding;
    let seed = e.seed.map_or_else(|| "entropy".to_string(), |s| s.to_string());
    for (key, value) in [
        ("reduction.length", r.length.to_string()),
        ("reduction.schedule", schedule(r.schedule)),
        ("embedding.dimension", e.dimension.to_string()),
        ("embedding.rows", e.rows.to_string()),
        ("embedding.seed", seed),
        ("embedding.schedule", schedule(e.schedule)),
    ] {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    println!("{table}");
    Ok(())
}

fn schedule(s: fmabench_core::Schedule) -> String {
    format!(
        "warmup {} x {} ms, measure {} x {} ms",
        s.warmup_iterations, s.warmup_time_ms, s.measurement_iterations, s.measurement_time_ms
    )
}

pub fn print_report(report: &SuiteReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "{} {} (checksum {})",
        "Suite:".bold(),
        report.suite.green(),
        report.checksum
    );
    let mut table = Table::new();
    header(&mut table, &["Case", "ops/s", "p50", "p95", "p99", "Calls"]);
    for m in &report.measurements {
        table.add_row(vec![
            Cell::new(&m.name),
            Cell::new(format!("{:.3e}", m.ops_per_sec)),
            Cell::new(nanos(m.latency.p50)),
            Cell::new(nanos(m.latency.p95)),
            Cell::new(nanos(m.latency.p99)),
            Cell::new(m.total_operations()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn print_check(report: &CheckReport, json: bool) -> Result<()> {
    if json {
        let mut value = serde_json::to_value(report)?;
        value["passed"] = json!(report.passed());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let reference = report.values.first().map_or(0.0, |v| v.value);
    let mut table = Table::new();
    header(&mut table, &["Strategy", "Case", "Value", "Diff vs first"]);
    for v in &report.values {
        table.add_row(vec![
            Cell::new(v.strategy),
            Cell::new(v.case),
            Cell::new(format!("{:e}", v.value)),
            Cell::new(format!("{:e}", (v.value - reference).abs())),
        ]);
    }
    println!("{table}");

    let verdict = if report.passed() {
        "within bound".green()
    } else {
        "EXCEEDS bound".red()
    };
    println!(
        "N = {}, max pairwise difference {:e}, bound {:e}: {}",
        report.length, report.max_difference, report.bound, verdict
    );
    Ok(())
}
