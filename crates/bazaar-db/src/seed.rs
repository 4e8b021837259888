//! # Sample Data Seeding
//!
//! Development catalog fixtures, inserted on first start and after a
//! database reset. Sample user accounts are seeded by the API server,
//! which owns password hashing.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use crate::repository::product::{NewProduct, ProductRepository};

/// Seeds the sample catalog if the products table is empty.
///
/// Returns the number of products inserted (0 when already seeded).
pub async fn seed_products(pool: &SqlitePool) -> DbResult<usize> {
    let repo = ProductRepository::new(pool.clone());

    if repo.count().await? > 0 {
        return Ok(0);
    }

    let samples = sample_products();
    let count = samples.len();

    for product in samples {
        repo.insert(product).await?;
    }

    info!(count, "Seeded sample catalog");
    Ok(count)
}

fn sample_products() -> Vec<NewProduct> {
    fn product(
        name: &str,
        description: &str,
        price_cents: i64,
        image_url: &str,
        category: &str,
        stock: i64,
        rating_tenths: i64,
    ) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: Some(description.to_string()),
            price_cents,
            image_url: Some(image_url.to_string()),
            category: Some(category.to_string()),
            stock,
            rating_tenths,
        }
    }

    vec![
        product(
            "Wireless Bluetooth Headphones",
            "Noise cancelling headphones with 30hr battery life",
            8999,
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400",
            "Electronics",
            25,
            45,
        ),
        product(
            "Classic Leather Watch",
            "Men's leather strap watch with date display",
            12999,
            "https://images.unsplash.com/photo-1523170335258-f5ed11844a49?w=400",
            "Fashion",
            15,
            47,
        ),
        product(
            "Organic Cotton T-Shirt",
            "100% organic cotton, comfortable fit",
            2499,
            "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=400",
            "Clothing",
            50,
            43,
        ),
        product(
            "Stainless Steel Water Bottle",
            "Insulated 1L bottle, keeps drinks cold for 24hrs",
            3499,
            "https://images.unsplash.com/photo-1523362628745-0c100150b504?w=400",
            "Home",
            30,
            46,
        ),
        product(
            "Running Shoes",
            "Lightweight running shoes with cushion technology",
            7999,
            "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=400",
            "Sports",
            20,
            44,
        ),
        product(
            "Smartphone Case",
            "Shockproof case for latest smartphone models",
            1999,
            "https://images.unsplash.com/photo-1546868871-7041f2a55e12?w=400",
            "Accessories",
            100,
            42,
        ),
        product(
            "Coffee Maker",
            "Programmable coffee maker with thermal carafe",
            6999,
            "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=400",
            "Kitchen",
            12,
            48,
        ),
        product(
            "Yoga Mat",
            "Non-slip yoga mat with carrying strap",
            2999,
            "https://images.unsplash.com/photo-1599901860904-17e6ed7083a0?w=400",
            "Fitness",
            40,
            45,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_seed_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let first = seed_products(db.pool()).await.unwrap();
        assert_eq!(first, 8);

        // Second call is a no-op.
        let second = seed_products(db.pool()).await.unwrap();
        assert_eq!(second, 0);
        assert_eq!(db.products().count().await.unwrap(), 8);
    }
}
