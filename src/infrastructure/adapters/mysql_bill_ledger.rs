use crate::domain::BillRecord;
use crate::domain::errors::DomainResult;
use crate::ports::bill_ledger_port::BillLedgerPort;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::debug;

/// MySQL订单流水实现
#[derive(Clone)]
pub struct MySqlBillLedger {
    pool: Arc<Pool<MySql>>,
}

impl MySqlBillLedger {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BillLedgerPort for MySqlBillLedger {
    async fn save(&self, record: &BillRecord) -> DomainResult<bool> {
        // payload_digest 上有唯一索引，重复推送由数据库忽略
        let query = r#"
            INSERT IGNORE INTO order_bills (
                id, out_trade_no, trade_no, total_amount,
                notify_code, payload_digest, payload, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let rows_affected = sqlx::query(query)
            .bind(record.id)
            .bind(&record.out_trade_no)
            .bind(&record.trade_no)
            .bind(&record.total_amount)
            .bind(&record.notify_code)
            .bind(&record.payload_digest)
            .bind(Json(&record.payload))
            .bind(record.created_at)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            debug!("Bill record already exists, digest: {}", record.payload_digest);
            return Ok(false);
        }

        debug!("Bill record saved: {}", record.id);
        Ok(true)
    }
}
