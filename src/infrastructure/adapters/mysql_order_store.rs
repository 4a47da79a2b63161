use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{Money, Order, OrderStatus};
use crate::ports::order_store_port::OrderStorePort;
use async_trait::async_trait;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::debug;

/// MySQL订单查询实现
#[derive(Clone)]
pub struct MySqlOrderStore {
    pool: Arc<Pool<MySql>>,
}

impl MySqlOrderStore {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStorePort for MySqlOrderStore {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Order>> {
        let query = r#"
            SELECT id, out_trade_no, trade_no, total_fee_cents,
                   status, created_at, updated_at
            FROM orders
            WHERE id = ?
        "#;

        let row = sqlx::query_as::<_, OrderRow>(query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        debug!("Order lookup {}: found={}", id, row.is_some());
        row.map(OrderRow::into_order).transpose()
    }
}

/// 数据库行结构体
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    out_trade_no: String,
    trade_no: Option<String>,
    total_fee_cents: i64,
    status: i8,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl OrderRow {
    fn into_order(self) -> DomainResult<Order> {
        let status = OrderStatus::from_code(self.status).ok_or_else(|| {
            DomainError::InternalError(format!(
                "Invalid order status {} for order {}",
                self.status, self.id
            ))
        })?;

        Ok(Order {
            id: self.id,
            out_trade_no: self.out_trade_no,
            trade_no: self.trade_no,
            total_fee: Money::from_cents(self.total_fee_cents),
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
