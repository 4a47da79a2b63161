use serde::{Deserialize, Serialize};

pub const SUCCESS: &str = "success";
pub const DEPOSIT_SUCCESS: &str = "ali deposit success";
pub const DEPOSIT_FAILED: &str = "ali deposit failed";
pub const QR_CODE_FAILED: &str = "ali pay create qr code failed";
pub const REFUND_FAILED: &str = "ali pay refund failed";
/// 页面支付调用失败时返回的占位内容
pub const ERROR_PLACEHOLDER: &str = "error";

/// 支付操作结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub success: bool,
    pub message: String,
}

impl PaymentResult {
    pub fn success(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

/// 扫码支付结果，成功时附带 PNG 二维码
#[derive(Debug, Clone)]
pub struct QrCodeResult {
    pub result: PaymentResult,
    pub image: Option<Vec<u8>>,
}

impl QrCodeResult {
    pub fn success(image: Vec<u8>) -> Self {
        Self {
            result: PaymentResult::success(SUCCESS),
            image: Some(image),
        }
    }

    pub fn failure() -> Self {
        Self {
            result: PaymentResult::failure(QR_CODE_FAILED),
            image: None,
        }
    }
}

/// App支付响应
#[derive(Debug, Serialize)]
pub struct AppPayResponse {
    /// 可直接交给客户端 SDK 的订单串
    pub order_string: String,
}

/// 异步通知处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// 支付成功，已写入流水
    Settled,
    /// 重复推送，未重复写入
    Duplicate,
    /// 通知状态码非成功
    Rejected,
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: String, message: String) -> Self {
        Self { error, message }
    }
}
