//! `orchid reconcile`

use anyhow::{Context, Result};
use colored::Colorize;

use super::App;

pub fn run(app: &App) -> Result<()> {
    let report = orchid_sync::reconcile(&app.catalog(), &app.store)
        .context("reconcile failed; local favorites left as they were")?;

    if report.is_clean() {
        println!("✓ Favorites in sync ({} records)", report.unchanged);
        return Ok(());
    }
    for id in &report.added {
        println!("  {} {id}", "+".green());
    }
    for id in &report.removed {
        println!("  {} {id}", "-".red());
    }
    for id in &report.repaired {
        println!("  {} {id}", "~".yellow());
    }
    println!(
        "✓ Reconciled: {} added, {} removed, {} repaired, {} unchanged",
        report.added.len(),
        report.removed.len(),
        report.repaired.len(),
        report.unchanged
    );
    Ok(())
}
