use super::handlers::*;
use crate::ports::{BillLedgerPort, OrderStorePort, PaymentGatewayPort};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub fn create_router<G, O, B>(state: AppState<G, O, B>) -> Router
where
    G: PaymentGatewayPort + 'static,
    O: OrderStorePort + 'static,
    B: BillLedgerPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/alipay/orders/:order_id/deposit",
            post(deposit::<G, O, B>),
        )
        .route("/api/alipay/orders/:order_id/qrcode", get(qr_code::<G, O, B>))
        .route("/api/alipay/orders/:order_id/refund", post(refund::<G, O, B>))
        .route(
            "/api/alipay/orders/:order_id/page-pay",
            get(page_pay::<G, O, B>),
        )
        .route(
            "/api/alipay/orders/:order_id/app-pay",
            post(app_pay::<G, O, B>),
        )
        .route("/api/alipay/notify", post(alipay_notify::<G, O, B>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
