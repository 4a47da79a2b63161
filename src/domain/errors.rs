use thiserror::Error;

/// 领域层错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 订单未找到
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    /// 订单状态不满足操作前置条件
    #[error("Invalid order state for order {order_id}: expected {expected}, got {actual}")]
    InvalidOrderState {
        order_id: i64,
        expected: String,
        actual: String,
    },

    /// 支付宝网关调用错误
    #[error("Alipay gateway error: {0}")]
    GatewayError(String),

    /// 回调通知数据缺失或无法解析
    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    /// 二维码生成错误
    #[error("QR code error: {0}")]
    QrCodeError(String),

    /// 数据库错误
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;
