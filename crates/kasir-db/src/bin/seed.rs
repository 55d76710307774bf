//! # Seed Data Generator
//!
//! Populates the database with demo categories and products.
//!
//! ## Usage
//! ```bash
//! # Seed ./kasir.db
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! Skips seeding when the database already has products.

use kasir_core::{CategoryInput, Money, ProductInput};
use kasir_db::migrations::migration_status;
use kasir_db::{Database, DbConfig};
use std::env;

/// (category, description, [(product, price, stock)])
const CATALOG: &[(&str, &str, &[(&str, i64, i64)])] = &[
    (
        "Minuman",
        "Minuman dingin dan panas",
        &[
            ("Es Teh Manis", 5_000, 100),
            ("Kopi Susu", 18_000, 40),
            ("Kopi Hitam", 12_000, 40),
            ("Air Mineral 600ml", 4_000, 120),
            ("Jus Jeruk", 15_000, 25),
        ],
    ),
    (
        "Makanan",
        "Makanan berat",
        &[
            ("Nasi Goreng", 22_000, 30),
            ("Mie Goreng", 20_000, 30),
            ("Ayam Geprek", 25_000, 20),
            ("Nasi Uduk", 15_000, 25),
        ],
    ),
    (
        "Camilan",
        "Makanan ringan",
        &[
            ("Keripik Singkong", 8_000, 60),
            ("Pisang Goreng", 10_000, 35),
            ("Roti Bakar", 14_000, 20),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kasir.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (total, applied) = migration_status(db.pool()).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, total);

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let mut generated = 0;
    for (category_name, description, products) in CATALOG {
        let category = db
            .categories()
            .create(&CategoryInput {
                name: category_name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;

        for (name, price, stock) in products.iter() {
            let input = ProductInput {
                name: name.to_string(),
                price: Money::new(*price),
                stock: *stock,
                category_id: Some(category.id),
            };
            if let Err(e) = db.products().create(&input).await {
                eprintln!("Failed to insert {}: {}", name, e);
                continue;
            }
            generated += 1;
        }

        println!("  {} ({} products)", category.name, products.len());
    }

    println!();
    println!("✓ Seeded {} categories and {} products", CATALOG.len(), generated);

    db.close().await;
    Ok(())
}
