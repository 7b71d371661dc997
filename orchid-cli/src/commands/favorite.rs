//! `orchid favorite toggle|list|remove|clear`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use orchid_core::{FavoriteRecord, ItemId};
use orchid_sync::Notification;

use super::{format_number, print_json, App};

#[derive(Subcommand, Debug)]
pub enum FavoriteCommand {
    /// Flip the favorite state of an item.
    Toggle(IdArg),

    /// List favorites stored on this device.
    List(FavoriteListArgs),

    /// Remove one favorite.
    Remove(IdArg),

    /// Remove every favorite.
    Clear,
}

#[derive(Args, Debug)]
pub struct IdArg {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct FavoriteListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(app: &App, cmd: FavoriteCommand) -> Result<()> {
    match cmd {
        FavoriteCommand::Toggle(arg) => toggle(app, ItemId::from(arg.id)),
        FavoriteCommand::List(args) => list(app, args.json),
        FavoriteCommand::Remove(arg) => remove(app, ItemId::from(arg.id)),
        FavoriteCommand::Clear => clear(app),
    }
}

fn notify(notification: &Notification) {
    println!("{} {}", format!("[{}]", notification.title).cyan(), notification.message);
}

fn toggle(app: &App, id: ItemId) -> Result<()> {
    let outcome = orchid_sync::toggle_favorite_by_id(&app.catalog(), &app.store, &id)
        .with_context(|| format!("could not update favorite '{id}'"))?;
    notify(&outcome.notification);
    Ok(())
}

#[derive(Tabled)]
struct FavoriteRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "weight")]
    weight: String,
    #[tabled(rename = "rating")]
    rating: String,
}

impl From<&FavoriteRecord> for FavoriteRow {
    fn from(record: &FavoriteRecord) -> Self {
        let opt = |v: Option<f64>| v.map(format_number).unwrap_or_else(|| "-".to_string());
        Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            weight: opt(record.weight),
            rating: opt(record.rating),
        }
    }
}

fn list(app: &App, json: bool) -> Result<()> {
    let records = orchid_sync::load_favorites(&app.store).context("failed to read favorites")?;
    if json {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("No favorites yet.");
        println!("Run: orchid favorite toggle <id>");
        return Ok(());
    }
    let rows: Vec<FavoriteRow> = records.iter().map(FavoriteRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn remove(app: &App, id: ItemId) -> Result<()> {
    let outcome = orchid_sync::remove_favorite(&app.catalog(), &app.store, &id)?;
    notify(&outcome.notification);
    if let Some(err) = outcome.remote_error {
        eprintln!(
            "{} catalog still marks '{}' as a favorite: {err}",
            "warning:".yellow().bold(),
            outcome.id
        );
        eprintln!("  Run 'orchid reconcile' once the catalog is reachable.");
    }
    Ok(())
}

fn clear(app: &App) -> Result<()> {
    let report = orchid_sync::clear_favorites(&app.catalog(), &app.store)?;
    notify(&report.notification());
    for (id, reason) in &report.failed {
        eprintln!("  {} {id}: {reason}", "✗".red());
    }
    if !report.is_complete() {
        anyhow::bail!(
            "{} of {} remote updates failed",
            report.failed.len(),
            report.failed.len() + report.cleared.len()
        );
    }
    Ok(())
}
