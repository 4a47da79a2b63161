pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

#[cfg(test)]
mod testing;

use anyhow::Context;
use api::AppState;
use application::PaymentGatewayAdapter;
use axum::Router;
use infrastructure::{AlipayConfig, MySqlBillLedger, MySqlOrderStore};
use ports::PaymentGatewayPort;
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志，`RUST_LOG` 未设置时默认 `info`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 组装支付宝支付路由
///
/// 支付宝客户端（应用ID、密钥、签名方式）由上层应用构造后传入，
/// 订单与流水存储、业务配置在这里创建。
pub async fn bootstrap<G>(gateway: Arc<G>) -> anyhow::Result<Router>
where
    G: PaymentGatewayPort + 'static,
{
    // 加载环境变量
    dotenvy::dotenv().ok();

    info!("Starting Alipay payment service...");

    let config = Arc::new(AlipayConfig::from_env()?);
    info!("Alipay configuration loaded for seller: {}", config.seller_id);

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    info!("Connecting to database...");
    let pool = Arc::new(MySqlPool::connect(&database_url).await?);
    info!("Database connected successfully");

    let payment_service = Arc::new(PaymentGatewayAdapter::new(
        gateway,
        Arc::new(MySqlOrderStore::new(pool.clone())),
        Arc::new(MySqlBillLedger::new(pool)),
        config,
    ));

    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  POST /api/alipay/orders/:order_id/deposit - Transfer to account");
    info!("  GET  /api/alipay/orders/:order_id/qrcode - QR code pay");
    info!("  POST /api/alipay/orders/:order_id/refund - Refund");
    info!("  GET  /api/alipay/orders/:order_id/page-pay - PC web pay");
    info!("  POST /api/alipay/orders/:order_id/app-pay - App pay");
    info!("  POST /api/alipay/notify - Alipay notify callback");

    Ok(api::create_router(AppState { payment_service }))
}
