//! `orchid list|show|create|edit|delete`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use orchid_core::{CreateForm, EditForm, Item, ItemId};

use super::{format_number, print_json, App};

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "weight")]
    weight: String,
    #[tabled(rename = "rating")]
    rating: String,
    #[tabled(rename = "price")]
    price: String,
    #[tabled(rename = "origin")]
    origin: String,
    #[tabled(rename = "fav")]
    favorite: String,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            weight: format_number(item.weight),
            rating: format_number(item.rating),
            price: format_number(item.price),
            origin: item.origin.clone(),
            favorite: (if item.status { "★" } else { "" }).to_string(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(self, app: &App) -> Result<()> {
        let items = orchid_sync::fetch_all(&app.catalog())
            .with_context(|| format!("failed to fetch catalog from {}", app.config.catalog_url))?;
        if self.json {
            return print_json(&items);
        }

        if items.is_empty() {
            println!("The catalog is empty.");
            return Ok(());
        }
        let favorites = items.iter().filter(|i| i.status).count();
        println!("{} orchids | {} favorites", items.len(), favorites);
        let rows: Vec<ItemRow> = items.iter().map(ItemRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub id: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    pub fn run(self, app: &App) -> Result<()> {
        let id = ItemId::from(self.id);
        let item = orchid_sync::fetch_one(&app.catalog(), &id)
            .with_context(|| format!("failed to fetch orchid '{id}'"))?;
        if self.json {
            return print_json(&item);
        }
        print_item(&item);
        Ok(())
    }
}

fn print_item(item: &Item) {
    let star = if item.status {
        "★ favorite".yellow().to_string()
    } else {
        String::new()
    };
    println!("{} {}  {star}", item.name.bold(), format!("#{}", item.id).bright_black());
    println!("  weight:   {}", format_number(item.weight));
    println!("  rating:   {}", format_number(item.rating));
    println!("  price:    {}", format_number(item.price));
    println!("  origin:   {}", item.origin);
    println!("  category: {}", item.category);
    if !item.color.is_empty() {
        println!("  color:    {}", item.color);
    }
    println!("  bonus:    {}", item.bonus);
    if item.is_top_of_the_week {
        println!("  {}", "top of the week".green());
    }
    println!("  image:    {}", item.image.bright_black());
    if let Some(description) = &item.description {
        println!();
        println!("{description}");
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    /// Whole number, greater than zero.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub weight: String,

    /// Between 0 and 5.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub rating: String,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub price: String,

    /// Image URL.
    #[arg(long, default_value = "")]
    pub image: String,

    /// Flower color.
    #[arg(long, default_value = "")]
    pub color: String,

    #[arg(long, default_value = "")]
    pub bonus: String,

    #[arg(long, default_value = "")]
    pub origin: String,

    #[arg(long, default_value = "")]
    pub category: String,

    #[arg(long)]
    pub top_of_the_week: bool,

    /// Create with `status = false` (not a favorite).
    #[arg(long)]
    pub inactive: bool,
}

impl CreateArgs {
    pub fn run(self, app: &App) -> Result<()> {
        let form = CreateForm {
            name: self.name,
            weight: self.weight,
            rating: self.rating,
            price: self.price,
            image: self.image,
            color: self.color,
            bonus: self.bonus,
            origin: self.origin,
            category: self.category,
            is_top_of_the_week: self.top_of_the_week,
            status: !self.inactive,
        };
        let created = orchid_sync::create_item(&app.catalog(), &app.store, &form)?;
        println!("✓ Created '{}' with id {}", created.name, created.id);
        if created.status {
            println!("  Added to favorites");
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub weight: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub rating: Option<String>,

    #[arg(long)]
    pub origin: Option<String>,
}

impl EditArgs {
    pub fn run(self, app: &App) -> Result<()> {
        let id = ItemId::from(self.id);
        let form = EditForm {
            name: self.name,
            weight: self.weight,
            rating: self.rating,
            origin: self.origin,
        };
        let updated = orchid_sync::update_item(&app.catalog(), &app.store, &id, &form)?;
        println!("✓ Updated '{}' ({})", updated.name, updated.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: String,
}

impl DeleteArgs {
    pub fn run(self, app: &App) -> Result<()> {
        let id = ItemId::from(self.id);
        let deleted = orchid_sync::delete_item(&app.catalog(), &app.store, &id)
            .with_context(|| format!("failed to delete orchid '{id}'"))?;
        println!("✓ Deleted '{}' ({})", deleted.name, deleted.id);
        Ok(())
    }
}
