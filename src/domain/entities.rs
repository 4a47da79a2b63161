use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::notify::NotifyPayload;
use crate::domain::value_objects::{Money, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// 订单实体（由订单子系统维护，支付适配层只读）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// 订单ID
    pub id: i64,

    /// 商户订单号
    pub out_trade_no: String,

    /// 支付宝交易号（支付后返回）
    pub trade_no: Option<String>,

    /// 订单金额
    pub total_fee: Money,

    /// 订单状态
    pub status: OrderStatus,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// 要求订单处于待支付状态（提现、扫码支付）
    pub fn ensure_created(&self) -> DomainResult<()> {
        if self.status != OrderStatus::Created {
            return Err(DomainError::InvalidOrderState {
                order_id: self.id,
                expected: OrderStatus::Created.to_string(),
                actual: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// 要求订单已经支付（退款）
    pub fn ensure_paid(&self) -> DomainResult<()> {
        if self.status < OrderStatus::Paid {
            return Err(DomainError::InvalidOrderState {
                order_id: self.id,
                expected: format!("{} or later", OrderStatus::Paid),
                actual: self.status.to_string(),
            });
        }
        Ok(())
    }
}

/// 订单流水（支付宝异步通知成功后写入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillRecord {
    pub id: Uuid,

    /// 商户订单号
    pub out_trade_no: Option<String>,

    /// 支付宝交易号
    pub trade_no: Option<String>,

    /// 通知中的交易金额（元）
    pub total_amount: Option<String>,

    /// 通知状态码
    pub notify_code: String,

    /// 通知内容摘要，用于识别重复推送
    pub payload_digest: String,

    /// 通知原始字段
    pub payload: BTreeMap<String, String>,

    pub created_at: DateTime<Utc>,
}

impl BillRecord {
    pub fn from_notify(payload: &NotifyPayload) -> DomainResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            out_trade_no: payload.get("out_trade_no").map(String::from),
            trade_no: payload.get("trade_no").map(String::from),
            total_amount: payload.get("total_amount").map(String::from),
            notify_code: payload.code().unwrap_or_default().to_string(),
            payload_digest: payload.digest()?,
            payload: payload.fields().clone(),
            created_at: Utc::now(),
        })
    }
}
