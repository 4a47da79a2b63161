use crate::domain::BillRecord;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// 订单流水端口接口
#[async_trait]
pub trait BillLedgerPort: Send + Sync {
    /// 保存流水，`payload_digest` 已存在时不写入并返回 `false`
    ///
    /// 判重与写入必须是同一个原子操作。
    async fn save(&self, record: &BillRecord) -> DomainResult<bool>;
}
