//! In-memory port implementations shared by unit tests.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{BillRecord, Money, Order, OrderStatus};
use crate::ports::{
    BillLedgerPort, GatewayRequest, GatewayResponse, OrderStorePort, PaymentGatewayPort,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

/// Order `id` with out_trade_no `T{id}` and a total of 12.34.
pub fn order(id: i64, status: OrderStatus) -> Order {
    let now = Utc::now();
    Order {
        id,
        out_trade_no: format!("T{}", id),
        trade_no: None,
        total_fee: Money::from_cents(1234),
        status,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<i64, Order>>,
}

impl InMemoryOrderStore {
    pub fn with(orders: Vec<Order>) -> Self {
        Self {
            orders: Mutex::new(orders.into_iter().map(|o| (o.id, o)).collect()),
        }
    }
}

#[async_trait]
impl OrderStorePort for InMemoryOrderStore {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Order>> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryBillLedger {
    records: Mutex<Vec<BillRecord>>,
}

impl InMemoryBillLedger {
    pub fn records(&self) -> Vec<BillRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl BillLedgerPort for InMemoryBillLedger {
    async fn save(&self, record: &BillRecord) -> DomainResult<bool> {
        // let concurrent notifies interleave before the ledger is touched
        tokio::task::yield_now().await;

        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|r| r.payload_digest == record.payload_digest)
        {
            return Ok(false);
        }
        records.push(record.clone());
        Ok(true)
    }
}

/// Gateway stub answering every call with the same canned outcome.
pub struct StubGateway {
    outcome: Result<GatewayResponse, String>,
    requests: Mutex<Vec<GatewayRequest>>,
}

impl StubGateway {
    pub fn respond_with(response: GatewayResponse) -> Self {
        Self {
            outcome: Ok(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn answer(&self, request: &GatewayRequest) -> DomainResult<GatewayResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcome
            .clone()
            .map_err(DomainError::GatewayError)
    }
}

#[async_trait]
impl PaymentGatewayPort for StubGateway {
    async fn execute(&self, request: &GatewayRequest) -> DomainResult<GatewayResponse> {
        self.answer(request)
    }

    async fn page_execute(&self, request: &GatewayRequest) -> DomainResult<GatewayResponse> {
        self.answer(request)
    }

    async fn sdk_execute(&self, request: &GatewayRequest) -> DomainResult<GatewayResponse> {
        self.answer(request)
    }
}
