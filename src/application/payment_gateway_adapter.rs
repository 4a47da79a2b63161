use crate::application::dto::{
    self, AppPayResponse, NotifyOutcome, PaymentResult, QrCodeResult,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{BillRecord, NotifyPayload, Order};
use crate::infrastructure::config::AlipayConfig;
use crate::infrastructure::qr_code;
use crate::ports::{
    BillLedgerPort, GatewayMethod, GatewayRequest, OrderStorePort, PaymentGatewayPort,
};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, error, info};

const REFUND_REASON: &str = "用户申请退款";

/// 支付宝支付服务
///
/// 校验订单状态、组装业务参数、调用注入的支付宝客户端并转换结果。
pub struct PaymentGatewayAdapter<G: PaymentGatewayPort, O: OrderStorePort, B: BillLedgerPort> {
    gateway: Arc<G>,
    orders: Arc<O>,
    bills: Arc<B>,
    config: Arc<AlipayConfig>,
}

impl<G: PaymentGatewayPort, O: OrderStorePort, B: BillLedgerPort> PaymentGatewayAdapter<G, O, B> {
    pub fn new(gateway: Arc<G>, orders: Arc<O>, bills: Arc<B>, config: Arc<AlipayConfig>) -> Self {
        Self {
            gateway,
            orders,
            bills,
            config,
        }
    }

    async fn load_order(&self, order_id: i64) -> DomainResult<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))
    }

    /// 支付宝提现（单笔转账到支付宝账户）
    pub async fn deposit(&self, order_id: i64) -> DomainResult<PaymentResult> {
        info!("Alipay deposit for order: {}", order_id);

        let order = self.load_order(order_id).await?;
        order.ensure_created().inspect_err(|e| error!("{}", e))?;

        let request = GatewayRequest::new(GatewayMethod::FundTransToAccount)
            .param("out_biz_no", random_serial(15))
            .param("amount", order.total_fee.to_yuan_string())
            .param("payee_type", &self.config.payee_type)
            .param("payee_account", &self.config.payee_account)
            .param("payee_real_name", &self.config.payee_real_name)
            .param("payer_show_name", &self.config.payer_show_name)
            .param("remark", &self.config.remark);

        match self.gateway.execute(&request).await {
            Ok(response) if response.is_success() => {
                info!(
                    "Alipay deposit succeeded for order {}: {}",
                    order_id, order.total_fee
                );
                Ok(PaymentResult::success(dto::DEPOSIT_SUCCESS))
            }
            Ok(response) => {
                error!(
                    "Alipay deposit rejected for order {}: {} {}",
                    order_id,
                    response.code,
                    response.sub_msg.unwrap_or_default()
                );
                Ok(PaymentResult::failure(dto::DEPOSIT_FAILED))
            }
            Err(e) => {
                error!("Alipay deposit error for order {}: {}", order_id, e);
                Ok(PaymentResult::failure(dto::DEPOSIT_FAILED))
            }
        }
    }

    /// 扫码支付：预创建交易并生成二维码
    pub async fn create_qr_code(&self, order_id: i64) -> DomainResult<QrCodeResult> {
        info!("Alipay precreate for order: {}", order_id);

        let order = self.load_order(order_id).await?;
        order.ensure_created().inspect_err(|e| error!("{}", e))?;

        let request = GatewayRequest::new(GatewayMethod::TradePrecreate)
            .param("out_trade_no", &order.out_trade_no)
            .param("total_amount", order.total_fee.to_yuan_string())
            .param("subject", &self.config.subject)
            .param("body", &self.config.body)
            .param("store_id", &self.config.store_id)
            .param("timeout_express", &self.config.qr_timeout_express)
            .notify_url(&self.config.notify_url);

        let response = match self.gateway.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Alipay precreate error for order {}: {}", order_id, e);
                return Ok(QrCodeResult::failure());
            }
        };
        debug!("Precreate response: {}", response.body);

        match response.qr_code.as_deref().filter(|code| !code.is_empty()) {
            Some(content) => {
                let image = qr_code::render_png(content)?;
                info!("QR code created for order: {}", order_id);
                Ok(QrCodeResult::success(image))
            }
            None => {
                error!("Alipay precreate returned no qr code for order: {}", order_id);
                Ok(QrCodeResult::failure())
            }
        }
    }

    /// 支付宝退款
    pub async fn refund(&self, order_id: i64) -> DomainResult<PaymentResult> {
        info!("Alipay refund for order: {}", order_id);

        let order = self.load_order(order_id).await?;
        order.ensure_paid().inspect_err(|e| error!("{}", e))?;

        let mut request = GatewayRequest::new(GatewayMethod::TradeRefund)
            .param("out_trade_no", &order.out_trade_no)
            .param("refund_amount", order.total_fee.to_yuan_string())
            .param("refund_reason", REFUND_REASON)
            // 同一笔交易多次退款时必须不同
            .param("out_request_no", random_serial(11))
            .param("store_id", &self.config.store_id);
        if let Some(trade_no) = &order.trade_no {
            request = request.param("trade_no", trade_no);
        }

        match self.gateway.execute(&request).await {
            Ok(response) if response.is_success() => {
                info!(
                    "Alipay refund succeeded, out_trade_no: {}, amount: {}",
                    order.out_trade_no, order.total_fee
                );
                Ok(PaymentResult::success(dto::SUCCESS))
            }
            Ok(response) => {
                info!(
                    "Alipay refund failed, out_trade_no: {}, code: {}",
                    order.out_trade_no, response.code
                );
                Ok(PaymentResult::failure(dto::REFUND_FAILED))
            }
            Err(e) => {
                error!("Alipay refund error, out_trade_no: {}: {}", order.out_trade_no, e);
                Ok(PaymentResult::failure(dto::REFUND_FAILED))
            }
        }
    }

    /// 电脑网站支付，返回自动提交的表单 HTML
    pub async fn page_pay(&self, order_id: i64) -> DomainResult<String> {
        info!("Alipay page pay for order: {}", order_id);

        let order = self.load_order(order_id).await?;

        let request = GatewayRequest::new(GatewayMethod::TradePagePay)
            .param("out_trade_no", &order.out_trade_no)
            .param("total_amount", order.total_fee.to_yuan_string())
            .param("subject", &self.config.subject)
            .param("seller_id", &self.config.seller_id)
            .param("product_code", "FAST_INSTANT_TRADE_PAY")
            .param("body", &self.config.body)
            .return_url(&self.config.return_url)
            .notify_url(&self.config.notify_url);
        debug!("Page pay biz content: {}", request.biz_content_json()?);

        match self.gateway.page_execute(&request).await {
            Ok(response) => Ok(response.body),
            Err(e) => {
                error!("Alipay page pay error for order {}: {}", order_id, e);
                Ok(dto::ERROR_PLACEHOLDER.to_string())
            }
        }
    }

    /// App支付，返回签名后的订单串
    pub async fn app_pay(&self, order_id: i64) -> DomainResult<AppPayResponse> {
        info!("Alipay app pay for order: {}", order_id);

        let order = self.load_order(order_id).await?;

        let request = GatewayRequest::new(GatewayMethod::TradeAppPay)
            .param("body", &self.config.body)
            .param("subject", &self.config.subject)
            .param("out_trade_no", &order.out_trade_no)
            .param("timeout_express", &self.config.app_timeout_express)
            .param("total_amount", order.total_fee.to_yuan_string())
            .param("product_code", "QUICK_MSECURITY_PAY")
            .notify_url(&self.config.notify_url);

        let response = self.gateway.sdk_execute(&request).await.map_err(|e| {
            error!("Alipay app pay error for order {}: {}", order_id, e);
            match e {
                DomainError::GatewayError(_) => e,
                other => DomainError::GatewayError(other.to_string()),
            }
        })?;

        if response.body.is_empty() {
            return Err(DomainError::GatewayError(
                "Alipay returned an empty order string".to_string(),
            ));
        }

        debug!("Order string: {}", response.body);
        Ok(AppPayResponse {
            order_string: response.body,
        })
    }

    /// 处理支付宝异步通知
    pub async fn handle_notify(&self, body: &str) -> DomainResult<NotifyOutcome> {
        info!("Handling Alipay notify");

        let payload = NotifyPayload::parse(body).inspect_err(|e| error!("{}", e))?;

        if !payload.is_success() {
            error!(
                "Alipay notify failed, code: {}",
                payload.code().unwrap_or_default()
            );
            return Ok(NotifyOutcome::Rejected);
        }

        let record = BillRecord::from_notify(&payload)?;
        if !self.bills.save(&record).await? {
            info!(
                "Duplicate Alipay notify ignored, digest: {}",
                record.payload_digest
            );
            return Ok(NotifyOutcome::Duplicate);
        }

        info!(
            "Alipay notify success, out_trade_no: {}",
            record.out_trade_no.as_deref().unwrap_or("-")
        );

        Ok(NotifyOutcome::Settled)
    }
}

/// 以 `1` 开头的随机数字串，共 `digits + 1` 位
fn random_serial(digits: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut serial = String::with_capacity(digits + 1);
    serial.push('1');
    for _ in 0..digits {
        serial.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    serial
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStatus;
    use crate::ports::GatewayResponse;
    use crate::testing::{InMemoryBillLedger, InMemoryOrderStore, StubGateway, order};

    type Adapter = PaymentGatewayAdapter<StubGateway, InMemoryOrderStore, InMemoryBillLedger>;

    struct Fixture {
        adapter: Adapter,
        gateway: Arc<StubGateway>,
        bills: Arc<InMemoryBillLedger>,
    }

    fn fixture(gateway: StubGateway, orders: Vec<Order>) -> Fixture {
        let gateway = Arc::new(gateway);
        let bills = Arc::new(InMemoryBillLedger::default());
        let adapter = PaymentGatewayAdapter::new(
            gateway.clone(),
            Arc::new(InMemoryOrderStore::with(orders)),
            bills.clone(),
            Arc::new(AlipayConfig::new(
                "https://shop.example.com/api/alipay/notify",
                "https://shop.example.com/paid",
                "2088000000000001",
            )),
        );
        Fixture {
            adapter,
            gateway,
            bills,
        }
    }

    fn success_response() -> GatewayResponse {
        GatewayResponse {
            code: "10000".to_string(),
            msg: "Success".to_string(),
            ..Default::default()
        }
    }

    fn failure_response() -> GatewayResponse {
        GatewayResponse {
            code: "40004".to_string(),
            msg: "Business Failed".to_string(),
            sub_msg: Some("交易不存在".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_random_serial() {
        let serial = random_serial(15);
        assert_eq!(serial.len(), 16);
        assert!(serial.starts_with('1'));
        assert!(serial.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let f = fixture(StubGateway::respond_with(success_response()), vec![]);

        assert!(matches!(
            f.adapter.deposit(1).await,
            Err(DomainError::OrderNotFound(1))
        ));
    }

    #[tokio::test]
    async fn test_deposit_requires_created_order() {
        for status in [OrderStatus::Paid, OrderStatus::Refunded] {
            let f = fixture(
                StubGateway::respond_with(success_response()),
                vec![order(1, status)],
            );

            assert!(matches!(
                f.adapter.deposit(1).await,
                Err(DomainError::InvalidOrderState { .. })
            ));
            assert!(f.gateway.requests().is_empty());
        }
    }

    #[tokio::test]
    async fn test_deposit_success() {
        let f = fixture(
            StubGateway::respond_with(success_response()),
            vec![order(1, OrderStatus::Created)],
        );

        let result = f.adapter.deposit(1).await.unwrap();
        assert_eq!(result, PaymentResult::success(dto::DEPOSIT_SUCCESS));

        let requests = f.gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, GatewayMethod::FundTransToAccount);
        assert_eq!(requests[0].biz_content["amount"], "12.34");
        assert_eq!(requests[0].biz_content["out_biz_no"].len(), 16);
        assert_eq!(requests[0].biz_content["payee_type"], "ALIPAY_LOGONID");
        assert_eq!(requests[0].biz_content["remark"], "订单提现");
    }

    #[tokio::test]
    async fn test_deposit_gateway_error_is_failure() {
        let f = fixture(
            StubGateway::failing("connection reset"),
            vec![order(1, OrderStatus::Created)],
        );

        let result = f.adapter.deposit(1).await.unwrap();
        assert_eq!(result, PaymentResult::failure(dto::DEPOSIT_FAILED));
    }

    #[tokio::test]
    async fn test_deposit_rejected_is_failure() {
        let f = fixture(
            StubGateway::respond_with(failure_response()),
            vec![order(1, OrderStatus::Created)],
        );

        assert!(!f.adapter.deposit(1).await.unwrap().success);
    }

    #[tokio::test]
    async fn test_qr_code_requires_created_order() {
        let f = fixture(
            StubGateway::respond_with(success_response()),
            vec![order(1, OrderStatus::Paid)],
        );

        assert!(matches!(
            f.adapter.create_qr_code(1).await,
            Err(DomainError::InvalidOrderState { .. })
        ));
    }

    #[tokio::test]
    async fn test_qr_code_success() {
        let response = GatewayResponse {
            qr_code: Some("https://qr.alipay.com/bax08431".to_string()),
            ..success_response()
        };
        let f = fixture(
            StubGateway::respond_with(response),
            vec![order(1, OrderStatus::Created)],
        );

        let qr = f.adapter.create_qr_code(1).await.unwrap();
        assert!(qr.result.success);
        assert!(!qr.image.unwrap().is_empty());

        let requests = f.gateway.requests();
        assert_eq!(requests[0].method, GatewayMethod::TradePrecreate);
        assert_eq!(requests[0].biz_content["out_trade_no"], "T1");
        assert_eq!(requests[0].biz_content["timeout_express"], "90m");
        assert_eq!(
            requests[0].notify_url.as_deref(),
            Some("https://shop.example.com/api/alipay/notify")
        );
    }

    #[tokio::test]
    async fn test_qr_code_without_content_is_failure() {
        let response = GatewayResponse {
            qr_code: Some(String::new()),
            ..success_response()
        };
        let f = fixture(
            StubGateway::respond_with(response),
            vec![order(1, OrderStatus::Created)],
        );

        let qr = f.adapter.create_qr_code(1).await.unwrap();
        assert_eq!(qr.result, PaymentResult::failure(dto::QR_CODE_FAILED));
        assert!(qr.image.is_none());
    }

    #[tokio::test]
    async fn test_refund_requires_paid_order() {
        let f = fixture(
            StubGateway::respond_with(success_response()),
            vec![order(1, OrderStatus::Created)],
        );

        assert!(matches!(
            f.adapter.refund(1).await,
            Err(DomainError::InvalidOrderState { .. })
        ));
    }

    #[tokio::test]
    async fn test_refund_follows_gateway_success_flag() {
        let f = fixture(
            StubGateway::respond_with(success_response()),
            vec![order(1, OrderStatus::Paid)],
        );
        assert_eq!(
            f.adapter.refund(1).await.unwrap(),
            PaymentResult::success(dto::SUCCESS)
        );
        let requests = f.gateway.requests();
        assert_eq!(requests[0].biz_content["refund_amount"], "12.34");
        assert_eq!(requests[0].biz_content["out_request_no"].len(), 12);
        assert!(!requests[0].biz_content.contains_key("trade_no"));

        let f = fixture(
            StubGateway::respond_with(failure_response()),
            vec![order(1, OrderStatus::Refunded)],
        );
        assert_eq!(
            f.adapter.refund(1).await.unwrap(),
            PaymentResult::failure(dto::REFUND_FAILED)
        );
    }

    #[tokio::test]
    async fn test_refund_sends_known_trade_no() {
        let mut paid = order(1, OrderStatus::Paid);
        paid.trade_no = Some("2024010122001".to_string());
        let f = fixture(StubGateway::respond_with(success_response()), vec![paid]);

        f.adapter.refund(1).await.unwrap();
        assert_eq!(f.gateway.requests()[0].biz_content["trade_no"], "2024010122001");
    }

    #[tokio::test]
    async fn test_page_pay() {
        let response = GatewayResponse {
            body: "<form name=\"punchout_form\"></form>".to_string(),
            ..Default::default()
        };
        let f = fixture(
            StubGateway::respond_with(response),
            vec![order(1, OrderStatus::Created)],
        );

        let html = f.adapter.page_pay(1).await.unwrap();
        assert!(html.starts_with("<form"));

        let requests = f.gateway.requests();
        assert_eq!(requests[0].method, GatewayMethod::TradePagePay);
        assert_eq!(requests[0].biz_content["product_code"], "FAST_INSTANT_TRADE_PAY");
        assert_eq!(requests[0].biz_content["seller_id"], "2088000000000001");
        assert_eq!(
            requests[0].return_url.as_deref(),
            Some("https://shop.example.com/paid")
        );
    }

    #[tokio::test]
    async fn test_page_pay_error_placeholder() {
        let f = fixture(
            StubGateway::failing("timeout"),
            vec![order(1, OrderStatus::Created)],
        );

        assert_eq!(f.adapter.page_pay(1).await.unwrap(), dto::ERROR_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_app_pay() {
        let response = GatewayResponse {
            body: "app_id=2021000&biz_content=%7B%7D&sign=abc".to_string(),
            ..Default::default()
        };
        let f = fixture(
            StubGateway::respond_with(response),
            vec![order(1, OrderStatus::Created)],
        );

        let app = f.adapter.app_pay(1).await.unwrap();
        assert!(app.order_string.contains("sign=abc"));
        assert_eq!(
            f.gateway.requests()[0].biz_content["product_code"],
            "QUICK_MSECURITY_PAY"
        );
    }

    #[tokio::test]
    async fn test_app_pay_surfaces_gateway_error() {
        let f = fixture(
            StubGateway::failing("invalid private key"),
            vec![order(1, OrderStatus::Created)],
        );

        assert!(matches!(
            f.adapter.app_pay(1).await,
            Err(DomainError::GatewayError(_))
        ));
    }

    #[tokio::test]
    async fn test_notify_success_persists_one_record() {
        let f = fixture(StubGateway::respond_with(success_response()), vec![]);
        let body = "<xml><code>10000</code><out_trade_no>T1</out_trade_no><trade_no>2024A</trade_no></xml>";

        assert_eq!(
            f.adapter.handle_notify(body).await.unwrap(),
            NotifyOutcome::Settled
        );
        let records = f.bills.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].out_trade_no.as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_notify_replay_is_not_persisted_twice() {
        let f = fixture(StubGateway::respond_with(success_response()), vec![]);
        let body = "code=10000&out_trade_no=T1";

        f.adapter.handle_notify(body).await.unwrap();
        assert_eq!(
            f.adapter.handle_notify(body).await.unwrap(),
            NotifyOutcome::Duplicate
        );
        assert_eq!(f.bills.records().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_identical_notifies_persist_one_record() {
        let f = fixture(StubGateway::respond_with(success_response()), vec![]);
        let body = "<xml><code>10000</code><out_trade_no>T1</out_trade_no></xml>";

        let (first, second) = tokio::join!(
            f.adapter.handle_notify(body),
            f.adapter.handle_notify(body)
        );

        let mut outcomes = vec![first.unwrap(), second.unwrap()];
        outcomes.sort_by_key(|o| *o == NotifyOutcome::Duplicate);
        assert_eq!(outcomes, vec![NotifyOutcome::Settled, NotifyOutcome::Duplicate]);
        assert_eq!(f.bills.records().len(), 1);
    }

    #[tokio::test]
    async fn test_notify_failure_code_persists_nothing() {
        let f = fixture(StubGateway::respond_with(success_response()), vec![]);

        assert_eq!(
            f.adapter
                .handle_notify("<xml><code>40004</code></xml>")
                .await
                .unwrap(),
            NotifyOutcome::Rejected
        );
        assert!(f.bills.records().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_notify() {
        let f = fixture(StubGateway::respond_with(success_response()), vec![]);

        for body in ["", "<xml><code>10000</xml>", "<xml></xml>"] {
            assert!(matches!(
                f.adapter.handle_notify(body).await,
                Err(DomainError::MalformedCallback(_))
            ));
        }
        assert!(f.bills.records().is_empty());
    }
}
