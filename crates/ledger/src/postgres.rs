//! PostgreSQL-backed ledger implementation.

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, OwnerId};
use domain::{Money, Order, OrderStatus, ValidatedLine};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::{LedgerError, Result};
use crate::store::OrderLedger;

/// PostgreSQL order ledger.
#[derive(Clone)]
pub struct PostgresLedger {
    pool: PgPool,
}

impl PostgresLedger {
    /// Creates a new PostgreSQL ledger.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    async fn transition(&self, order_id: OrderId, to: OrderStatus) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(order_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        let current = current.ok_or(LedgerError::OrderNotFound(order_id))?;
        let from: OrderStatus = current.parse().map_err(|detail| LedgerError::CorruptRow {
            order_id,
            detail,
        })?;

        if from != OrderStatus::Pending {
            return Err(LedgerError::Domain(
                domain::DomainError::InvalidStatusTransition { from, to },
            ));
        }

        sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(order_id.as_uuid())
            .bind(to.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl OrderLedger for PostgresLedger {
    async fn persist(
        &self,
        owner_id: OwnerId,
        shipping_address: &str,
        lines: Vec<ValidatedLine>,
    ) -> Result<Order> {
        let order = Order::new(OrderId::new(), owner_id, shipping_address, lines)?;

        // Header and lines commit together or not at all.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, owner_id, total_price_cents, shipping_address, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.owner_id.as_uuid())
        .bind(order.total_price.cents())
        .bind(&order.shipping_address)
        .bind(order.status.as_str())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        for (line_no, line) in order.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_lines (order_id, line_no, product_id, quantity, unit_price_cents)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id.as_uuid())
            .bind(line_no as i32)
            .bind(line.product_id.as_i64())
            .bind(line.quantity as i32)
            .bind(line.unit_price.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(order_id = %order.id, lines = order.lines.len(), "order persisted");
        Ok(order)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>> {
        let header = sqlx::query(
            r#"
            SELECT owner_id, total_price_cents, shipping_address, status
            FROM orders WHERE id = $1
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let status: OrderStatus = header
            .try_get::<String, _>("status")?
            .parse()
            .map_err(|detail| LedgerError::CorruptRow { order_id, detail })?;

        let line_rows = sqlx::query(
            r#"
            SELECT product_id, quantity, unit_price_cents
            FROM order_lines WHERE order_id = $1
            ORDER BY line_no ASC
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let lines = line_rows
            .into_iter()
            .map(|row| {
                Ok(ValidatedLine::new(
                    row.try_get::<i64, _>("product_id")?,
                    row.try_get::<i32, _>("quantity")? as u32,
                    Money::from_cents(row.try_get::<i64, _>("unit_price_cents")?),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Order {
            id: order_id,
            owner_id: OwnerId::from_uuid(header.try_get::<Uuid, _>("owner_id")?),
            total_price: Money::from_cents(header.try_get::<i64, _>("total_price_cents")?),
            shipping_address: header.try_get("shipping_address")?,
            status,
            lines,
        }))
    }

    async fn complete(&self, order_id: OrderId) -> Result<()> {
        self.transition(order_id, OrderStatus::Completed).await
    }

    async fn mark_failed(&self, order_id: OrderId) -> Result<()> {
        self.transition(order_id, OrderStatus::Failed).await
    }
}
