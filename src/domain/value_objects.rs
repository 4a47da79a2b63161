use serde::{Deserialize, Serialize};
use std::fmt;

/// 订单状态
///
/// 状态按生命周期先后排序，退款等操作依赖 `>=` 比较。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// 已创建，待支付
    Created,
    /// 已支付
    Paid,
    /// 已退款
    Refunded,
}

impl OrderStatus {
    /// 存储层使用的状态码
    pub fn code(&self) -> i8 {
        match self {
            OrderStatus::Created => 1,
            OrderStatus::Paid => 2,
            OrderStatus::Refunded => 3,
        }
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            1 => Some(OrderStatus::Created),
            2 => Some(OrderStatus::Paid),
            3 => Some(OrderStatus::Refunded),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Created => write!(f, "created"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// 货币金额（分为单位，避免浮点数精度问题）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// 金额（分）
    pub amount_cents: i64,
}

impl Money {
    /// 创建新的金额对象（单位：分）
    pub fn from_cents(cents: i64) -> Self {
        Self { amount_cents: cents }
    }

    /// 转换为分
    pub fn to_cents(&self) -> i64 {
        self.amount_cents
    }

    /// 支付宝接口要求的金额格式：元，保留两位小数
    pub fn to_yuan_string(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let cents = self.amount_cents.unsigned_abs();
        format!("{}{}.{:02}", sign, cents / 100, cents % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "¥{}", self.to_yuan_string())
    }
}
