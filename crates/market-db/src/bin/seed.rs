//! # Seed Data Generator
//!
//! Populates the users table with development accounts.
//!
//! ## Usage
//! ```bash
//! # Generate 50 users (default)
//! cargo run -p market-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p market-db --bin seed -- --count 500
//!
//! # Specify database path (otherwise MARKET_DB_PATH / MARKET_ENV decide)
//! cargo run -p market-db --bin seed -- --db ./data/market.db
//! ```
//!
//! ## Generated Users
//! - Username: `{name}{index}` lowercased, e.g. `dragon0`, `wolf1`
//! - First name: the capitalized animal name
//! - Password: `pass` (stored as-is; hashing is the caller's job)

use std::env;

use market_core::NewUser;
use market_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// First names for generated users
const NAMES: &[&str] = &[
    "Dragon", "Wolf", "Bear", "Falcon", "Otter", "Lynx", "Heron", "Badger", "Raven", "Moose",
    "Fox", "Owl", "Hare", "Bison", "Crane", "Marten",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Marketplace Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of users to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: from MARKET_DB_PATH/MARKET_ENV)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = match db_path {
        Some(path) => DbConfig::new(path),
        None => DbConfig::from_env()?,
    };

    println!("🌱 Marketplace Seed Data Generator");
    println!("==================================");
    println!("Database: {}", config.database_path.display());
    println!("Users:    {}", count);
    println!();

    let db = Database::new(config).await?;
    let users = db.users();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = users.count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} users", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating users...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for index in 0..count {
        let user = generate_user(index);

        if let Err(e) = users.create(&user).await {
            eprintln!("Failed to insert {}: {}", user.username, e);
            continue;
        }

        generated += 1;

        if generated % 100 == 0 {
            println!("  Generated {} users...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} users in {:?}", generated, elapsed);

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Builds the `index`-th development user.
fn generate_user(index: usize) -> NewUser {
    let name = NAMES[index % NAMES.len()];
    let username = format!("{}{}", name.to_lowercase(), index);

    NewUser::new(username, "pass", name)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every repository call
/// - Default: INFO for market crates, WARN for sqlx
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,market_db=info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
