//! `orchid login`, `orchid register`, `orchid logout`, `orchid profile`

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use colored::Colorize;

use orchid_core::{LoginForm, RegisterForm};

use super::App;

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

impl LoginArgs {
    pub fn run(self, app: &App) -> Result<()> {
        let form = LoginForm {
            email: self.email,
            password: self.password,
        };
        let session = orchid_sync::login(&app.auth(), &app.store, &form)?;
        println!("✓ Signed in as {}", session.user.email.bold());
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub confirm_password: String,
}

impl RegisterArgs {
    pub fn run(self, app: &App) -> Result<()> {
        let form = RegisterForm {
            email: self.email,
            password: self.password,
            confirm_password: self.confirm_password,
        };
        let user = orchid_sync::register(&app.auth(), &form)?;
        println!("✓ Account created for {}", user.email.bold());
        println!("  Sign in with: orchid login --email {}", user.email);
        Ok(())
    }
}

pub fn logout(app: &App) -> Result<()> {
    orchid_sync::logout(&app.store)?;
    println!("✓ Signed out");
    Ok(())
}

pub fn profile(app: &App) -> Result<()> {
    let session = app.require_session()?;
    let user = session.user;
    println!("{}", user.email.bold());
    println!("  uid:       {}", user.uid);
    if let Some(at) = user.signed_in_at {
        let minutes = (Utc::now() - at).num_minutes().max(0);
        println!(
            "  signed in: {} ({minutes} min ago)",
            at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    if let Some(expires_in) = user.expires_in {
        println!("  expires:   {expires_in}s after sign-in");
    }
    println!("  catalog:   {}", app.config.catalog_url.bright_black());
    Ok(())
}
