use crate::domain::errors::{DomainError, DomainResult};
use quick_xml::Reader;
use quick_xml::events::Event;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// 支付宝通知中表示成功的状态码
pub const NOTIFY_SUCCESS_CODE: &str = "10000";

/// 支付宝异步通知内容
///
/// 通知体可以是扁平 XML（`<xml><code>10000</code>...</xml>`）或表单编码。
/// 只保留根节点下一层的字段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyPayload {
    fields: BTreeMap<String, String>,
}

impl NotifyPayload {
    /// 解析通知体，缺少 `code` 字段视为格式错误
    pub fn parse(body: &str) -> DomainResult<Self> {
        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::MalformedCallback("empty notify body".to_string()));
        }

        let fields = if body.starts_with('<') {
            parse_xml(body)?
        } else {
            parse_form(body)?
        };

        if fields.is_empty() {
            return Err(DomainError::MalformedCallback(
                "notify body contains no fields".to_string(),
            ));
        }
        if !fields.contains_key("code") {
            return Err(DomainError::MalformedCallback(
                "missing code in notify body".to_string(),
            ));
        }

        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn code(&self) -> Option<&str> {
        self.get("code").map(str::trim)
    }

    pub fn is_success(&self) -> bool {
        self.code() == Some(NOTIFY_SUCCESS_CODE)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// 字段 JSON 编码后的 SHA-256 摘要（十六进制）
    ///
    /// `BTreeMap` 保证键有序，JSON 转义保证不同字段集合的编码不会相同。
    pub fn digest(&self) -> DomainResult<String> {
        let canonical = serde_json::to_vec(&self.fields)?;

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }
}

fn malformed(reason: impl std::fmt::Display) -> DomainError {
    DomainError::MalformedCallback(format!("invalid notify xml: {}", reason))
}

fn parse_xml(body: &str) -> DomainResult<BTreeMap<String, String>> {
    let mut reader = Reader::from_str(body);
    reader.trim_text(true);

    let mut fields = BTreeMap::new();
    let mut depth = 0usize;
    let mut current: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                depth += 1;
                if depth == 2 {
                    current = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                    text.clear();
                }
            }
            Event::Empty(e) => {
                if depth == 1 {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    fields.insert(name, String::new());
                }
            }
            Event::Text(t) => {
                if depth == 2 {
                    text.push_str(&t.unescape().map_err(malformed)?);
                }
            }
            Event::CData(c) => {
                if depth == 2 {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some(name) = current.take() {
                        fields.insert(name, std::mem::take(&mut text));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(malformed("unclosed element"));
    }

    Ok(fields)
}

fn parse_form(body: &str) -> DomainResult<BTreeMap<String, String>> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body).map_err(|e| {
        DomainError::MalformedCallback(format!("invalid notify form: {}", e))
    })?;

    Ok(pairs.into_iter().collect())
}
