use crate::application::{ErrorResponse, NotifyOutcome, PaymentGatewayAdapter};
use crate::domain::errors::DomainError;
use crate::ports::{BillLedgerPort, OrderStorePort, PaymentGatewayPort};
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info};

/// 应用状态
pub struct AppState<G: PaymentGatewayPort, O: OrderStorePort, B: BillLedgerPort> {
    pub payment_service: Arc<PaymentGatewayAdapter<G, O, B>>,
}

impl<G: PaymentGatewayPort, O: OrderStorePort, B: BillLedgerPort> Clone for AppState<G, O, B> {
    fn clone(&self) -> Self {
        Self {
            payment_service: self.payment_service.clone(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(code: &str, e: DomainError) -> ApiError {
    error!("{} error: {}", code, e);
    let status = match e {
        DomainError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::InvalidOrderState { .. } => StatusCode::CONFLICT,
        DomainError::MalformedCallback(_) => StatusCode::BAD_REQUEST,
        DomainError::GatewayError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse::new(code.to_string(), e.to_string())),
    )
}

/// 支付宝提现
pub async fn deposit<G: PaymentGatewayPort, O: OrderStorePort, B: BillLedgerPort>(
    State(state): State<AppState<G, O, B>>,
    Path(order_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received deposit request: {}", order_id);

    state
        .payment_service
        .deposit(order_id)
        .await
        .map(|result| (StatusCode::OK, Json(result)))
        .map_err(|e| error_response("DEPOSIT_ERROR", e))
}

/// 扫码支付，成功时直接返回二维码图片
pub async fn qr_code<G: PaymentGatewayPort, O: OrderStorePort, B: BillLedgerPort>(
    State(state): State<AppState<G, O, B>>,
    Path(order_id): Path<i64>,
) -> Result<Response, ApiError> {
    info!("Received qr code request: {}", order_id);

    let qr = state
        .payment_service
        .create_qr_code(order_id)
        .await
        .map_err(|e| error_response("QR_CODE_ERROR", e))?;

    Ok(match qr.image {
        Some(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        None => (StatusCode::OK, Json(qr.result)).into_response(),
    })
}

/// 支付宝退款
pub async fn refund<G: PaymentGatewayPort, O: OrderStorePort, B: BillLedgerPort>(
    State(state): State<AppState<G, O, B>>,
    Path(order_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received refund request: {}", order_id);

    state
        .payment_service
        .refund(order_id)
        .await
        .map(|result| (StatusCode::OK, Json(result)))
        .map_err(|e| error_response("REFUND_ERROR", e))
}

/// 电脑网站支付
pub async fn page_pay<G: PaymentGatewayPort, O: OrderStorePort, B: BillLedgerPort>(
    State(state): State<AppState<G, O, B>>,
    Path(order_id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    info!("Received page pay request: {}", order_id);

    state
        .payment_service
        .page_pay(order_id)
        .await
        .map(Html)
        .map_err(|e| error_response("PAGE_PAY_ERROR", e))
}

/// App支付
pub async fn app_pay<G: PaymentGatewayPort, O: OrderStorePort, B: BillLedgerPort>(
    State(state): State<AppState<G, O, B>>,
    Path(order_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received app pay request: {}", order_id);

    state
        .payment_service
        .app_pay(order_id)
        .await
        .map(|response| (StatusCode::OK, Json(response)))
        .map_err(|e| error_response("APP_PAY_ERROR", e))
}

/// 支付宝异步通知
///
/// 已处理的通知一律回复 `success`，避免支付宝重复推送。
pub async fn alipay_notify<G: PaymentGatewayPort, O: OrderStorePort, B: BillLedgerPort>(
    State(state): State<AppState<G, O, B>>,
    body: String,
) -> (StatusCode, &'static str) {
    info!("Received Alipay notify");

    match state.payment_service.handle_notify(&body).await {
        Ok(outcome) => {
            if outcome == NotifyOutcome::Rejected {
                info!("Alipay notify acknowledged without settlement");
            }
            (StatusCode::OK, "success")
        }
        Err(e) => {
            let (status, _) = error_response("NOTIFY_ERROR", e);
            (status, "failure")
        }
    }
}

/// 健康检查
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
