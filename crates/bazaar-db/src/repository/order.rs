//! # Order Repository
//!
//! Database operations for orders, line items and payment attempts. This
//! is the transactional core of the store.
//!
//! ## Order Lifecycle
//! ```text
//! 1. CREATE
//!    └── create() → Order { status: pending, payment_status: pending }
//!        order row + all item rows in ONE transaction; stock untouched
//!
//! 2. PAYMENT ATTEMPT (one of)
//!    ├── record_success() → paid/processing, stock -= qty per item
//!    │   (guarded decrement), payment row "succeeded"  - ONE transaction
//!    └── record_failure() → payment_status: failed, payment row "failed",
//!        stock untouched; the order stays retryable
//! ```
//!
//! Payment attempts against an unpaid order are deliberately not
//! idempotent: every call appends a payment row, and a retry after a
//! failure may still succeed. A paid order is terminal for settlement:
//! further attempts are rejected so stock moves exactly once per order.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bazaar_core::{NewOrderItem, Order, OrderItem, OrderStatus, Payment, PaymentMethod, PaymentStatus};

/// Input for creating an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: String,
    pub customer_name: String,
    pub customer_email: String,
    /// Client-supplied total in cents (not re-derived from the items).
    pub total_amount_cents: i64,
    pub shipping_address: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// Settlement details for a successful payment attempt.
#[derive(Debug, Clone)]
pub struct SuccessfulPayment {
    pub method: PaymentMethod,
    pub amount_cents: i64,
    pub transaction_id: String,
    pub card_last4: Option<String>,
    pub card_brand: Option<String>,
}

/// An order joined with its item aggregates, for order listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub order: Order,
    /// Number of distinct lines.
    pub item_count: i64,
    /// Sum of quantities across lines.
    pub total_items: i64,
}

/// An order with item aggregates plus the owning user, for the admin view.
///
/// User columns are nullable: orders survive account deletion.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminOrderSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub order: Order,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub item_count: i64,
    pub total_items: i64,
}

/// A line item joined with catalog display fields, for the order detail
/// view. `product_name`/`image_url` reflect the catalog *now*, while
/// `price_cents` stays the snapshot taken at order time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItemDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub item: OrderItem,
    pub product_name: String,
    pub image_url: Option<String>,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order with all its line items atomically.
    ///
    /// Any failure - a foreign key miss on a product id, a CHECK violation
    /// on quantity - rolls back the whole attempt: no order row, no item
    /// rows. Stock is NOT touched here; it changes only on confirmed
    /// payment.
    pub async fn create(&self, new: NewOrder) -> DbResult<Order> {
        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: Some(new.user_id),
            customer_name: new.customer_name,
            customer_email: new.customer_email,
            total_amount_cents: new.total_amount_cents,
            shipping_address: new.shipping_address,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::Card,
            created_at: Utc::now(),
        };

        debug!(id = %order.id, lines = new.items.len(), "Creating order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, customer_name, customer_email,
                                total_amount_cents, shipping_address,
                                status, payment_status, payment_method, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(order.total_amount_cents)
        .bind(&order.shipping_address)
        .bind(order.status)
        .bind(order.payment_status)
        .bind(order.payment_method)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for item in &new.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order.id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Fetches an order only if it belongs to the given user.
    ///
    /// Ownership is folded into the query on purpose: a caller probing
    /// someone else's order id gets the same `None` as a missing order.
    pub async fn find_for_user(&self, order_id: &str, user_id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, customer_name, customer_email, total_amount_cents,
                   shipping_address, status, payment_status, payment_method, created_at
            FROM orders
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Lists a user's orders with item aggregates, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<OrderSummary>> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, o.user_id, o.customer_name, o.customer_email,
                   o.total_amount_cents, o.shipping_address, o.status,
                   o.payment_status, o.payment_method, o.created_at,
                   COUNT(oi.id) AS item_count,
                   COALESCE(SUM(oi.quantity), 0) AS total_items
            FROM orders o
            LEFT JOIN order_items oi ON oi.order_id = o.id
            WHERE o.user_id = ?1
            GROUP BY o.id
            ORDER BY o.created_at DESC, o.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists every order with owner and item aggregates (admin view).
    pub async fn list_all(&self) -> DbResult<Vec<AdminOrderSummary>> {
        let orders = sqlx::query_as::<_, AdminOrderSummary>(
            r#"
            SELECT o.id, o.user_id, o.customer_name, o.customer_email,
                   o.total_amount_cents, o.shipping_address, o.status,
                   o.payment_status, o.payment_method, o.created_at,
                   u.name AS user_name,
                   u.email AS user_email,
                   COUNT(oi.id) AS item_count,
                   COALESCE(SUM(oi.quantity), 0) AS total_items
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            GROUP BY o.id
            ORDER BY o.created_at DESC, o.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Gets all line items for an order.
    pub async fn items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, quantity, price_cents
            FROM order_items
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets an order's line items joined with catalog display fields.
    pub async fn items_with_products(&self, order_id: &str) -> DbResult<Vec<OrderItemDetail>> {
        let items = sqlx::query_as::<_, OrderItemDetail>(
            r#"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price_cents,
                   p.name AS product_name,
                   p.image_url
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Settles a successful payment attempt in one transaction:
    ///
    /// 1. order → `payment_status=paid`, `status=processing`, method stored
    /// 2. every product's stock decremented by its line quantity, with a
    ///    compare-and-set floor guard (`stock >= qty`)
    /// 3. payment row with status `succeeded` appended
    ///
    /// A guard miss aborts with [`DbError::InsufficientStock`] and rolls
    /// everything back - no partial decrement, no payment row, order
    /// unchanged. Two concurrent settlements of the last units cannot
    /// both commit.
    ///
    /// An order that is already paid cannot settle again: the UPDATE is
    /// fenced on `payment_status != 'paid'` and a second attempt gets
    /// [`DbError::AlreadyPaid`]. Stock moves exactly once per order.
    pub async fn record_success(&self, order_id: &str, payment: SuccessfulPayment) -> DbResult<()> {
        debug!(order_id, transaction_id = %payment.transaction_id, "Settling payment");

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE orders
            SET payment_status = 'paid', status = 'processing', payment_method = ?2
            WHERE id = ?1 AND payment_status != 'paid'
            "#,
        )
        .bind(order_id)
        .bind(payment.method)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Self::settlement_rejection(&mut tx, order_id).await?);
        }

        let items: Vec<(String, i64)> = sqlx::query_as(
            "SELECT product_id, quantity FROM order_items WHERE order_id = ?1",
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        for (product_id, quantity) in items {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - ?1
                WHERE id = ?2 AND stock >= ?1
                "#,
            )
            .bind(quantity)
            .bind(&product_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Guard miss: not enough stock (or product vanished).
                // Dropping the transaction rolls back the settlement.
                return Err(DbError::InsufficientStock {
                    product_id,
                    requested: quantity,
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO payments (id, order_id, payment_method, amount_cents,
                                  status, transaction_id, card_last4, card_brand, created_at)
            VALUES (?1, ?2, ?3, ?4, 'succeeded', ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(order_id)
        .bind(payment.method)
        .bind(payment.amount_cents)
        .bind(&payment.transaction_id)
        .bind(&payment.card_last4)
        .bind(&payment.card_brand)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Records a declined payment attempt: order → `payment_status=failed`
    /// (fulfillment status untouched), failed payment row with amount 0.
    /// Stock never changes on this path.
    ///
    /// Fenced like [`record_success`](Self::record_success): a decline
    /// cannot demote an order that already settled.
    pub async fn record_failure(&self, order_id: &str, method: PaymentMethod) -> DbResult<()> {
        debug!(order_id, "Recording declined payment");

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE orders SET payment_status = 'failed' WHERE id = ?1 AND payment_status != 'paid'",
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Self::settlement_rejection(&mut tx, order_id).await?);
        }

        sqlx::query(
            r#"
            INSERT INTO payments (id, order_id, payment_method, amount_cents, status, created_at)
            VALUES (?1, ?2, ?3, 0, 'failed', ?4)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(order_id)
        .bind(method)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Explains why a fenced settlement UPDATE matched no row: the order
    /// is gone, or it already settled.
    async fn settlement_rejection(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        order_id: &str,
    ) -> DbResult<DbError> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM orders WHERE id = ?1")
            .bind(order_id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(match exists {
            Some(_) => DbError::AlreadyPaid {
                order_id: order_id.to_string(),
            },
            None => DbError::not_found("Order", order_id),
        })
    }

    /// Gets all payment attempts for an order, oldest first.
    pub async fn payments(&self, order_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, order_id, payment_method, amount_cents, status,
                   transaction_id, card_last4, card_brand, created_at
            FROM payments
            WHERE order_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;
    use crate::repository::user::NewUser;
    use bazaar_core::{PaymentOutcome, Role};

    async fn setup() -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let user = db
            .users()
            .insert(NewUser {
                name: "Jane".to_string(),
                email: "jane@x.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Customer,
            })
            .await
            .unwrap();

        let product = db
            .products()
            .insert(NewProduct {
                name: "Widget".to_string(),
                description: None,
                price_cents: 1000,
                image_url: None,
                category: None,
                stock: 10,
                rating_tenths: 45,
            })
            .await
            .unwrap();

        (db, user.id, product.id)
    }

    fn order_for(user_id: &str, product_id: &str, quantity: i64) -> NewOrder {
        NewOrder {
            user_id: user_id.to_string(),
            customer_name: "Jane".to_string(),
            customer_email: "jane@x.com".to_string(),
            total_amount_cents: 1000 * quantity,
            shipping_address: Some("1 Main St".to_string()),
            items: vec![NewOrderItem {
                product_id: product_id.to_string(),
                quantity,
                price_cents: 1000,
            }],
        }
    }

    fn card_payment(amount_cents: i64) -> SuccessfulPayment {
        SuccessfulPayment {
            method: PaymentMethod::Card,
            amount_cents,
            transaction_id: "PAY-TEST-001".to_string(),
            card_last4: Some("4242".to_string()),
            card_brand: Some("visa".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_order_with_items() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        let order = repo.create(order_for(&user_id, &product_id, 2)).await.unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);

        let items = repo.items(&order.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].price_cents, 1000);
    }

    #[tokio::test]
    async fn test_create_order_is_atomic() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        // Second line references a product that doesn't exist; the FK
        // violation must abort the whole order.
        let mut new = order_for(&user_id, &product_id, 1);
        new.items.push(NewOrderItem {
            product_id: "no-such-product".to_string(),
            quantity: 1,
            price_cents: 500,
        });

        let err = repo.create(new).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let orders = repo.list_for_user(&user_id).await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_successful_payment_decrements_stock_once() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        let order = repo.create(order_for(&user_id, &product_id, 2)).await.unwrap();
        repo.record_success(&order.id, card_payment(2000)).await.unwrap();

        let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 8);

        let settled = repo.find_for_user(&order.id, &user_id).await.unwrap().unwrap();
        assert_eq!(settled.payment_status, PaymentStatus::Paid);
        assert_eq!(settled.status, OrderStatus::Processing);

        let payments = repo.payments(&order.id).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].status, PaymentOutcome::Succeeded);
        assert_eq!(payments[0].amount_cents, 2000);
        assert_eq!(payments[0].card_last4.as_deref(), Some("4242"));
    }

    #[tokio::test]
    async fn test_failed_payment_leaves_stock_untouched() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        let order = repo.create(order_for(&user_id, &product_id, 2)).await.unwrap();
        repo.record_failure(&order.id, PaymentMethod::Card).await.unwrap();

        let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 10);

        let failed = repo.find_for_user(&order.id, &user_id).await.unwrap().unwrap();
        assert_eq!(failed.payment_status, PaymentStatus::Failed);
        assert_eq!(failed.status, OrderStatus::Pending);

        let payments = repo.payments(&order.id).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].status, PaymentOutcome::Failed);
        assert_eq!(payments[0].amount_cents, 0);
    }

    #[tokio::test]
    async fn test_retry_after_failure_appends_attempts() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        let order = repo.create(order_for(&user_id, &product_id, 1)).await.unwrap();
        repo.record_failure(&order.id, PaymentMethod::Card).await.unwrap();
        repo.record_success(&order.id, card_payment(1000)).await.unwrap();

        let payments = repo.payments(&order.id).await.unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].status, PaymentOutcome::Failed);
        assert_eq!(payments[1].status, PaymentOutcome::Succeeded);

        let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 9);
    }

    #[tokio::test]
    async fn test_second_settlement_rejected() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        let order = repo.create(order_for(&user_id, &product_id, 2)).await.unwrap();
        repo.record_success(&order.id, card_payment(2000)).await.unwrap();

        let err = repo.record_success(&order.id, card_payment(2000)).await.unwrap_err();
        assert!(matches!(err, DbError::AlreadyPaid { .. }));

        // Stock moved exactly once and only one payment row exists.
        let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 8);
        assert_eq!(repo.payments(&order.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_cannot_demote_paid_order() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        let order = repo.create(order_for(&user_id, &product_id, 1)).await.unwrap();
        repo.record_success(&order.id, card_payment(1000)).await.unwrap();

        let err = repo.record_failure(&order.id, PaymentMethod::Card).await.unwrap_err();
        assert!(matches!(err, DbError::AlreadyPaid { .. }));

        let order = repo.find_for_user(&order.id, &user_id).await.unwrap().unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(repo.payments(&order.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_settling_missing_order_is_not_found() {
        let (db, _, _) = setup().await;
        let repo = db.orders();

        let err = repo.record_success("no-such-order", card_payment(1000)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_stock_guard_rolls_back_settlement() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        // Order more units than are in stock.
        let order = repo.create(order_for(&user_id, &product_id, 11)).await.unwrap();
        let err = repo.record_success(&order.id, card_payment(11000)).await.unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { .. }));

        // Everything rolled back: stock, order state, no payment row.
        let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 10);

        let order = repo.find_for_user(&order.id, &user_id).await.unwrap().unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert!(repo.payments(&order.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ownership_check_hides_foreign_orders() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        let other = db
            .users()
            .insert(NewUser {
                name: "Mallory".to_string(),
                email: "mallory@x.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Customer,
            })
            .await
            .unwrap();

        let order = repo.create(order_for(&user_id, &product_id, 1)).await.unwrap();

        assert!(repo.find_for_user(&order.id, &other.id).await.unwrap().is_none());
        assert!(repo.list_for_user(&other.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_for_user_aggregates() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        let mut new = order_for(&user_id, &product_id, 2);
        new.items.push(NewOrderItem {
            product_id: product_id.clone(),
            quantity: 3,
            price_cents: 1000,
        });
        repo.create(new).await.unwrap();

        let summaries = repo.list_for_user(&user_id).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].item_count, 2);
        assert_eq!(summaries[0].total_items, 5);
    }

    #[tokio::test]
    async fn test_items_with_products_joins_catalog() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        let order = repo.create(order_for(&user_id, &product_id, 1)).await.unwrap();
        let details = repo.items_with_products(&order.id).await.unwrap();

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].product_name, "Widget");
        assert_eq!(details[0].item.price_cents, 1000);
    }

    #[tokio::test]
    async fn test_list_all_includes_owner() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.orders();

        repo.create(order_for(&user_id, &product_id, 1)).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user_name.as_deref(), Some("Jane"));
        assert_eq!(all[0].user_email.as_deref(), Some("jane@x.com"));
    }
}
