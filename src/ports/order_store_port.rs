use crate::domain::Order;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// 订单查询端口接口
#[async_trait]
pub trait OrderStorePort: Send + Sync {
    /// 根据ID查找订单
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Order>>;
}
