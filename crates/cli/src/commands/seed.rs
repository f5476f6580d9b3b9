//! Catalog seeding command for local development.

use rust_decimal::Decimal;

use trendora_commerce::models::NewProduct;
use trendora_commerce::store::{CommerceStore, PgStore, create_pool};

use super::CliError;

fn demo_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Classic Denim Jacket".to_owned(),
            description: "Mid-wash denim jacket with button front.".to_owned(),
            price: Decimal::from(40),
            image: "/images/denim-jacket.jpg".to_owned(),
            category: "Outerwear".to_owned(),
            stock: 25,
            sizes: vec!["S".to_owned(), "M".to_owned(), "L".to_owned()],
            colors: vec!["blue".to_owned(), "black".to_owned()],
        },
        NewProduct {
            name: "Linen Shirt".to_owned(),
            description: "Relaxed-fit shirt in washed linen.".to_owned(),
            price: Decimal::from(35),
            image: "/images/linen-shirt.jpg".to_owned(),
            category: "Tops".to_owned(),
            stock: 40,
            sizes: vec!["S".to_owned(), "M".to_owned(), "L".to_owned(), "XL".to_owned()],
            colors: vec!["white".to_owned(), "sand".to_owned()],
        },
        NewProduct {
            name: "Wool Overcoat".to_owned(),
            description: "Single-breasted overcoat in brushed wool.".to_owned(),
            price: Decimal::from(120),
            image: "/images/wool-overcoat.jpg".to_owned(),
            category: "Outerwear".to_owned(),
            stock: 10,
            sizes: vec!["M".to_owned(), "L".to_owned()],
            colors: vec!["charcoal".to_owned()],
        },
        NewProduct {
            name: "Canvas Tote".to_owned(),
            description: "Heavy canvas tote with internal pocket.".to_owned(),
            price: Decimal::from(18),
            image: "/images/canvas-tote.jpg".to_owned(),
            category: "Accessories".to_owned(),
            stock: 60,
            sizes: vec![],
            colors: vec!["natural".to_owned(), "olive".to_owned()],
        },
    ]
}

/// Insert demo products into the catalog.
pub async fn run() -> Result<(), CliError> {
    let database_url = super::database_url()?;
    let pool = create_pool(&database_url).await?;
    let store = PgStore::new(pool);

    for product in demo_products() {
        let name = product.name.clone();
        let inserted = store.insert_product(product).await?;
        tracing::info!(id = %inserted.id, %name, "seeded product");
    }

    tracing::info!("Seeding complete");
    Ok(())
}
