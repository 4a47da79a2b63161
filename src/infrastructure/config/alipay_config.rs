use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// 支付宝业务配置
///
/// 客户端本身（应用ID、密钥、签名方式）由调用方构造后注入，这里只保留
/// 组装业务参数需要的字段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlipayConfig {
    /// 后台异步通知地址
    pub notify_url: String,

    /// 前台跳转地址
    pub return_url: String,

    /// 卖家支付宝用户ID（商户PID）
    pub seller_id: String,

    /// 商户门店编号
    pub store_id: String,

    /// 扫码支付超时时间
    pub qr_timeout_express: String,

    /// App支付超时时间
    pub app_timeout_express: String,

    /// 转账收款方账户
    pub payee_account: String,

    /// 收款方账户类型
    pub payee_type: String,

    /// 收款方真实姓名
    pub payee_real_name: String,

    /// 付款方显示名称
    pub payer_show_name: String,

    /// 转账备注
    pub remark: String,

    /// 订单标题
    pub subject: String,

    /// 订单描述
    pub body: String,
}

impl AlipayConfig {
    pub fn new(notify_url: &str, return_url: &str, seller_id: &str) -> Self {
        Self {
            notify_url: notify_url.to_string(),
            return_url: return_url.to_string(),
            seller_id: seller_id.to_string(),
            store_id: "NJ_2031".to_string(),
            qr_timeout_express: "90m".to_string(),
            app_timeout_express: "30m".to_string(),
            payee_account: String::new(),
            payee_type: "ALIPAY_LOGONID".to_string(),
            payee_real_name: String::new(),
            payer_show_name: String::new(),
            remark: "订单提现".to_string(),
            subject: "订单支付".to_string(),
            body: "订单详情".to_string(),
        }
    }

    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置，缺少必填项时返回配置错误
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| DomainError::ConfigurationError(format!("{} must be set", key)))
        };

        let mut config = Self::new(
            &required("ALIPAY_NOTIFY_URL")?,
            &required("ALIPAY_RETURN_URL")?,
            &required("ALIPAY_SELLER_ID")?,
        );

        let optional = [
            ("ALIPAY_STORE_ID", &mut config.store_id),
            ("ALIPAY_QR_TIMEOUT", &mut config.qr_timeout_express),
            ("ALIPAY_APP_TIMEOUT", &mut config.app_timeout_express),
            ("ALIPAY_PAYEE_ACCOUNT", &mut config.payee_account),
            ("ALIPAY_PAYEE_TYPE", &mut config.payee_type),
            ("ALIPAY_PAYEE_REAL_NAME", &mut config.payee_real_name),
            ("ALIPAY_PAYER_SHOW_NAME", &mut config.payer_show_name),
            ("ALIPAY_REMARK", &mut config.remark),
            ("ALIPAY_SUBJECT", &mut config.subject),
            ("ALIPAY_BODY", &mut config.body),
        ];
        for (key, field) in optional {
            if let Some(value) = lookup(key) {
                *field = value;
            }
        }

        Ok(config)
    }
}
