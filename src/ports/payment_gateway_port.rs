use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 支付宝接口成功返回码
pub const GATEWAY_SUCCESS_CODE: &str = "10000";

/// 支付宝开放平台接口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayMethod {
    /// 单笔转账到支付宝账户
    FundTransToAccount,
    /// 统一收单线下交易预创建（扫码）
    TradePrecreate,
    /// 统一收单交易退款
    TradeRefund,
    /// 电脑网站支付
    TradePagePay,
    /// App支付
    TradeAppPay,
}

impl GatewayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMethod::FundTransToAccount => "alipay.fund.trans.toaccount.transfer",
            GatewayMethod::TradePrecreate => "alipay.trade.precreate",
            GatewayMethod::TradeRefund => "alipay.trade.refund",
            GatewayMethod::TradePagePay => "alipay.trade.page.pay",
            GatewayMethod::TradeAppPay => "alipay.trade.app.pay",
        }
    }
}

/// 网关请求：业务参数 + 公共回调地址
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub method: GatewayMethod,
    /// 业务参数（按键排序）
    pub biz_content: BTreeMap<String, String>,
    /// 后台异步通知地址
    pub notify_url: Option<String>,
    /// 前台跳转地址
    pub return_url: Option<String>,
}

impl GatewayRequest {
    pub fn new(method: GatewayMethod) -> Self {
        Self {
            method,
            biz_content: BTreeMap::new(),
            notify_url: None,
            return_url: None,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.biz_content.insert(key.to_string(), value.into());
        self
    }

    pub fn notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }

    pub fn return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    /// `biz_content` 的 JSON 形式
    pub fn biz_content_json(&self) -> DomainResult<String> {
        Ok(serde_json::to_string(&self.biz_content)?)
    }
}

/// 网关响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub code: String,
    pub msg: String,
    pub sub_code: Option<String>,
    pub sub_msg: Option<String>,
    /// 原始响应体；页面支付为 HTML 表单，App 支付为订单串
    pub body: String,
    /// 预创建返回的二维码内容
    pub qr_code: Option<String>,
    pub trade_no: Option<String>,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        self.code == GATEWAY_SUCCESS_CODE
    }
}

/// 支付宝客户端端口接口
///
/// 签名、传输与响应解析由实现方负责。
#[async_trait]
pub trait PaymentGatewayPort: Send + Sync {
    /// 普通接口调用（转账、预创建、退款）
    async fn execute(&self, request: &GatewayRequest) -> DomainResult<GatewayResponse>;

    /// 页面跳转类接口，`body` 为自动提交的表单
    async fn page_execute(&self, request: &GatewayRequest) -> DomainResult<GatewayResponse>;

    /// App SDK 接口，`body` 为签名后的订单串
    async fn sdk_execute(&self, request: &GatewayRequest) -> DomainResult<GatewayResponse>;
}
