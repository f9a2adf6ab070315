//! Parana - interactive shopper basket and checkout CLI.
//!
//! Menu options:
//! 1. Display your order history
//! 2. Add an item to your basket
//! 3. View your basket
//! 4. Change the quantity of an item in your basket
//! 5. Remove an item from your basket
//! 6. Checkout
//! 7. Exit

mod config;
mod menu;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Input;

use parana_commerce::ShopperId;
use parana_store::{Session, Store};

use config::Config;
use output::Output;

/// Parana - shopper basket and checkout
#[derive(Parser)]
#[command(name = "parana")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database path (overrides the config file)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Shopper id to sign in as (prompted when omitted)
    #[arg(long)]
    shopper: Option<i64>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Seed the demo catalog before starting
    #[arg(long)]
    seed: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = Output::new(cli.verbose);
    let config = Config::load_or_default(cli.config.as_deref())?;

    let db_path = cli
        .db
        .unwrap_or_else(|| PathBuf::from(&config.database.path));
    output.debug(&format!("using database {}", db_path.display()));

    let mut store = Store::open(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;
    if cli.seed {
        store.seed_demo().context("seeding demo data")?;
        output.success("Demo catalog seeded");
    }

    let shopper_id = match cli.shopper.or(config.session.shopper) {
        Some(id) => id,
        None => Input::<i64>::new()
            .with_prompt("Enter your Shopper ID")
            .interact_text()?,
    };

    let mut session = match Session::start(&store, ShopperId::new(shopper_id)) {
        Ok(session) => session,
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    };

    output.header(&format!("Welcome, {}!", session.shopper.full_name()));
    match session.basket() {
        Some(id) => output.info(&format!(
            "You have an existing basket from today (basket {id})."
        )),
        None => output.info("No basket found for today. One will be created when you add an item."),
    }

    menu::run(&mut store, &mut session, &output)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
