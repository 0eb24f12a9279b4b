//! renewscope - Subscription Auto-Renew Analytics CLI
//!
//! Loads a subscription dataset, derives the auto-renew disable aggregates,
//! and renders them as terminal tables, markdown, or JSON.

use anyhow::{Context, Result};
use clap::Parser;
use renewscope_core::analytics::{generate_report, ReportConfig, ReportStats};
use renewscope_core::ingest::load_csv;
use renewscope_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "renewscope")]
#[command(about = "Subscription Auto-Renew Disable Breakdown")]
#[command(version)]
struct Args {
    /// Path to the subscription CSV dataset (default: from config)
    dataset: Option<PathBuf>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Number of product sub-groups to show
    #[arg(long)]
    top_groups: Option<usize>,

    /// Minimum cohort total for a payment gateway to appear
    #[arg(long)]
    min_gateway_total: Option<u64>,

    /// Upper bound (EUR) of the zoomed billing curve
    #[arg(long)]
    zoom_max: Option<i64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = renewscope_core::logging::init(&config.logging).ok();

    let dataset = args
        .dataset
        .or_else(|| config.dataset.clone())
        .context("no dataset given; pass a CSV path or set `dataset` in config.toml")?;

    let (table, summary) = load_csv(&dataset)
        .with_context(|| format!("failed to load dataset {}", dataset.display()))?;

    let mut report_config = config.report.to_report_config();
    if let Some(n) = args.top_groups {
        report_config.top_product_groups = n;
    }
    if let Some(min) = args.min_gateway_total {
        report_config.min_gateway_total = min;
    }
    if let Some(max) = args.zoom_max {
        report_config.zoom_max_eur = max;
    }

    let stats = generate_report(&table, &report_config);

    match args.export.as_deref() {
        Some("json") => print_json(&stats)?,
        Some("md") => print_markdown(&stats),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&stats, summary.total_misses()),
    }

    Ok(())
}

fn print_json(stats: &ReportStats) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

fn print_terminal(stats: &ReportStats, coercion_misses: usize) {
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", "Auto-Renew Manual Disable Breakdown");
    println!("╰{}╯", "─".repeat(60));
    println!();

    if stats.record_count == 0 {
        println!("  No records in dataset.");
        println!();
        return;
    }

    println!("BASIC FACTS ({} records)", stats.record_count);
    if coercion_misses > 0 {
        println!("   ({} field values could not be parsed)", coercion_misses);
    }
    for row in stats.renew_status.rows() {
        println!("   {:<24} {:>8}", row.label, row.count);
    }
    println!();

    println!("DURATION (among Auto-Renew ON)");
    for row in stats.duration_on.rows() {
        println!("   {:<24} {:>8}", row.label, row.count);
    }
    println!();

    println!("DISABLED EARLY VS ACTIVE UNTIL END");
    for row in stats.early_vs_active.rows() {
        println!("   {:<24} {:>8}", row.label, row.count);
    }
    println!();

    println!("DURATION (among Disabled Early)");
    for row in stats.duration_early.rows() {
        println!("   {:<24} {:>8}", row.label, row.count);
    }
    println!();

    println!("DISABLES BY MONTH OF SUBSCRIPTION (12-month)");
    for bin in &stats.cancel_month {
        println!("   Month {:<18} {:>8}", bin.bucket, bin.count);
    }
    println!();

    println!("DISABLES BY DAY OF SUBSCRIPTION (1-month)");
    for bin in &stats.cancel_day {
        println!("   Day {:<20} {:>8}", bin.bucket, bin.count);
    }
    println!();

    println!("FIRST 7 DAYS (12-month)");
    for bin in &stats.first_week {
        println!("   Day {:<20} {:>8}", bin.bucket + 1, bin.count);
    }
    println!();

    // Presented from the period end backwards: day 7 down to day 1
    println!("LAST 7 DAYS (12-month)");
    for bin in stats.last_week.iter().rev() {
        println!("   Day {:<20} {:>8}", bin.bucket, bin.count);
    }
    println!();

    println!("DISABLES BY CALENDAR MONTH (12-month)");
    for bin in &stats.calendar_months {
        println!("   {:<24} {:>8}", bin.name, bin.count);
    }
    println!();

    println!("TOP PRODUCT SUB-GROUPS (Auto-Renew ON, 12-month)");
    print_group_rows(&stats.product_groups);
    println!();

    println!("PAYMENT GATEWAYS (Auto-Renew ON, 12-month)");
    if stats.payment_gateways.is_empty() {
        println!("   (no gateway meets the minimum cohort size)");
    } else {
        print_group_rows(&stats.payment_gateways);
    }
    println!();

    println!("DISABLES BY BILLING AMOUNT (EUR, excl. VAT)");
    for bin in &stats.billing_curve {
        println!("   €{:<23} {:>8}", bin.amount_eur, bin.count);
    }
    println!();

    println!("DISABLES BY BILLING AMOUNT (zoomed)");
    for bin in &stats.billing_curve_zoom {
        println!("   €{:<23} {:>8}", bin.amount_eur, bin.count);
    }
    println!();
}

fn print_group_rows(rows: &[renewscope_core::analytics::GroupSummaryRow]) {
    println!(
        "   {:<20} {:>8} {:>8} {:>10} {:>10}",
        "group", "total", "early", "% total", "% early"
    );
    for row in rows {
        println!(
            "   {:<20} {:>8} {:>8} {:>9.2}% {:>9.2}%",
            row.value, row.total_count, row.early_count, row.pct_of_total, row.pct_of_early
        );
    }
}

fn print_markdown(stats: &ReportStats) {
    println!("# Auto-Renew Manual Disable Breakdown");
    println!();
    println!("{} records analyzed.", stats.record_count);
    println!();

    let count_section = |title: &str, table: &renewscope_core::analytics::CountTable| {
        println!("## {}", title);
        println!();
        println!("| Category | Count |");
        println!("|----------|-------|");
        for row in table.rows() {
            println!("| {} | {} |", row.label, row.count);
        }
        println!();
    };

    count_section("Auto-Renew Status", &stats.renew_status);
    count_section("Duration (among Auto-Renew ON)", &stats.duration_on);
    count_section("Disabled Early vs Active Until End", &stats.early_vs_active);
    count_section("Duration (among Disabled Early)", &stats.duration_early);

    println!("## Disables by Month of Subscription (12-month)");
    println!();
    println!("| Month | Count |");
    println!("|-------|-------|");
    for bin in &stats.cancel_month {
        println!("| {} | {} |", bin.bucket, bin.count);
    }
    println!();

    println!("## Disables by Day of Subscription (1-month)");
    println!();
    println!("| Day | Count |");
    println!("|-----|-------|");
    for bin in &stats.cancel_day {
        println!("| {} | {} |", bin.bucket, bin.count);
    }
    println!();

    println!("## First 7 Days (12-month)");
    println!();
    println!("| Day after start | Count |");
    println!("|-----------------|-------|");
    for bin in &stats.first_week {
        println!("| {} | {} |", bin.bucket + 1, bin.count);
    }
    println!();

    println!("## Last 7 Days (12-month)");
    println!();
    println!("| Days before end | Count |");
    println!("|-----------------|-------|");
    for bin in stats.last_week.iter().rev() {
        println!("| {} | {} |", bin.bucket, bin.count);
    }
    println!();

    println!("## Disables by Calendar Month (12-month)");
    println!();
    println!("| Month | Count |");
    println!("|-------|-------|");
    for bin in &stats.calendar_months {
        println!("| {} | {} |", bin.name, bin.count);
    }
    println!();

    let group_section = |title: &str, rows: &[renewscope_core::analytics::GroupSummaryRow]| {
        println!("## {}", title);
        println!();
        println!("| Group | Total | Early Disables | % of Total | % of Early |");
        println!("|-------|-------|----------------|------------|------------|");
        for row in rows {
            println!(
                "| {} | {} | {} | {:.2} | {:.2} |",
                row.value, row.total_count, row.early_count, row.pct_of_total, row.pct_of_early
            );
        }
        println!();
    };

    group_section("Top Product Sub-Groups", &stats.product_groups);
    group_section("Payment Gateways", &stats.payment_gateways);

    println!("## Disables by Billing Amount (EUR, excl. VAT)");
    println!();
    println!("| Amount | Count |");
    println!("|--------|-------|");
    for bin in &stats.billing_curve {
        println!("| {} | {} |", bin.amount_eur, bin.count);
    }
    println!();
}
