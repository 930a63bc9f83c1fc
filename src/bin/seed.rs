//! Seeding CLI: creates the administrative account and loads the sample
//! jewelry catalog into the Postgres store.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use rosy_jewel_api::config;
use rosy_jewel_api::models::admin::Admin;
use rosy_jewel_api::models::category::{Category, NewCategory};
use rosy_jewel_api::models::product::{NewProduct, Product};
use rosy_jewel_api::models::ImageRef;
use rosy_jewel_api::store::postgres::Database;
use rosy_jewel_api::store::{AdminStore, CategoryStore, ProductStore};

#[derive(Parser)]
#[command(name = "seed", about = "Seed the Rosy Jewel boutique database")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the administrative account if it does not exist yet
    Admin {
        #[arg(long, default_value = "Admin")]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Replace the catalog with the sample categories and products
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = config::config();
    let database = Database::connect(&config.database.url, config.database.max_connections)
        .await
        .context("failed to connect to database")?;

    match cli.command {
        Command::Admin { name, email, password } => seed_admin(&database, name, email, password).await,
        Command::Catalog => seed_catalog(&database).await,
    }
}

async fn seed_admin(db: &Database, name: String, email: String, password: String) -> Result<()> {
    if db.find_by_email(&email).await?.is_some() {
        println!("Admin already exists: {email}");
        return Ok(());
    }

    let admin = Admin::create(name, email, &password).context("failed to hash password")?;
    AdminStore::insert(db, &admin).await?;
    println!("Admin created: {}", admin.email);
    Ok(())
}

async fn seed_catalog(db: &Database) -> Result<()> {
    db.reset_catalog().await.context("failed to clear existing catalog")?;
    println!("Cleared existing catalog");

    let categories = [
        ("Necklaces", "Beautiful necklaces for every occasion"),
        ("Earrings", "Elegant earrings to complement your style"),
        ("Bracelets", "Stunning bracelets and bangles"),
        ("Rings", "Exquisite rings for special moments"),
    ];

    let mut created = Vec::new();
    for (name, description) in categories {
        let category = Category::new(NewCategory {
            name: name.to_string(),
            description: Some(description.to_string()),
            image: None,
        });
        CategoryStore::insert(db, &category).await?;
        created.push(category);
    }
    println!("Created {} categories", created.len());

    let category_id = |name: &str| {
        created
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
            .with_context(|| format!("missing seed category {name}"))
    };

    let products = [
        (
            "Diamond Pendant Necklace",
            "Necklaces",
            299.99,
            "https://images.unsplash.com/photo-1599643478518-a784e5dc4c8f?w=500&q=80",
            "Elegant diamond pendant necklace with 18k gold chain",
        ),
        (
            "Pearl Strand Necklace",
            "Necklaces",
            189.99,
            "https://images.unsplash.com/photo-1515562141207-7a88fb7ce338?w=500&q=80",
            "Classic pearl strand necklace perfect for formal occasions",
        ),
        (
            "Diamond Stud Earrings",
            "Earrings",
            399.99,
            "https://images.unsplash.com/photo-1535556116002-6281ff3e9f36?w=500&q=80",
            "Timeless diamond stud earrings in white gold",
        ),
        (
            "Pearl Drop Earrings",
            "Earrings",
            129.99,
            "https://images.unsplash.com/photo-1564042229876-a399970a5c2c?w=500&q=80",
            "Elegant pearl drop earrings with silver setting",
        ),
        (
            "Gold Bangle Bracelet",
            "Bracelets",
            159.99,
            "https://images.unsplash.com/photo-1611591437281-460bfbe1220a?w=500&q=80",
            "Polished gold bangle with a timeless silhouette",
        ),
        (
            "Charm Bracelet",
            "Bracelets",
            119.99,
            "https://images.unsplash.com/photo-1535632066927-ab7c9ab60908?w=500&q=80",
            "Delicate charm bracelet with heart and star pendants",
        ),
        (
            "Solitaire Engagement Ring",
            "Rings",
            499.99,
            "https://images.unsplash.com/photo-1605100804763-247f67b3557e?w=500&q=80",
            "Brilliant-cut solitaire ring in a platinum setting",
        ),
        (
            "Emerald Cocktail Ring",
            "Rings",
            259.99,
            "https://images.unsplash.com/photo-1603561591411-07134e71a2a9?w=500&q=80",
            "Bold cocktail ring with emerald gemstone",
        ),
    ];

    for (name, category, price, image, description) in products {
        let product = Product::new(NewProduct {
            name: name.to_string(),
            category: category_id(category)?,
            price,
            image: ImageRef::One(image.to_string()),
            description: Some(description.to_string()),
            in_stock: None,
        });
        ProductStore::insert(db, &product).await?;
    }
    println!("Created {} products", products.len());

    Ok(())
}
