#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use orders_ms::{
    clients::{ProductClientError, ProductValidator},
    error::AppResult,
    models::{NewOrder, Order, OrderItem, OrderStatus, Product},
    repository::{InMemoryOrderRepository, OrderRepository},
    state::AppState,
};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn product(id: &str, name: &str, price: i64) -> Product {
    priced(id, name, Decimal::from(price))
}

pub fn priced(id: &str, name: &str, price: Decimal) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        price,
    }
}

/// Products service double. Answers from a mutable catalog, or fails on demand.
#[derive(Default)]
pub struct StubProducts {
    catalog: Mutex<Vec<Product>>,
    failure: Mutex<Option<serde_json::Value>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl StubProducts {
    pub fn with(products: Vec<Product>) -> Self {
        Self {
            catalog: Mutex::new(products),
            ..Default::default()
        }
    }

    pub fn set_price(&self, id: &str, price: i64) {
        let mut catalog = self.catalog.lock().unwrap();
        if let Some(product) = catalog.iter_mut().find(|p| p.id == id) {
            product.price = Decimal::from(price);
        }
    }

    pub fn fail_with(&self, payload: serde_json::Value) {
        *self.failure.lock().unwrap() = Some(payload);
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductValidator for StubProducts {
    async fn validate_products(&self, ids: &[String]) -> Result<Vec<Product>, ProductClientError> {
        self.calls.lock().unwrap().push(ids.to_vec());
        if let Some(payload) = self.failure.lock().unwrap().clone() {
            return Err(ProductClientError::rejected(400, payload));
        }
        let catalog = self.catalog.lock().unwrap();
        Ok(catalog
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

/// In-memory repository that counts writes.
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemoryOrderRepository,
    writes: AtomicUsize,
}

impl CountingRepository {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderRepository for CountingRepository {
    async fn create_with_items(&self, order: NewOrder) -> AppResult<(Order, Vec<OrderItem>)> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.create_with_items(order).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<(Order, Vec<OrderItem>)>> {
        self.inner.find_by_id(id).await
    }

    async fn find_page(
        &self,
        status: Option<OrderStatus>,
        skip: u64,
        take: u64,
    ) -> AppResult<Vec<Order>> {
        self.inner.find_page(status, skip, take).await
    }

    async fn count(&self, status: Option<OrderStatus>) -> AppResult<u64> {
        self.inner.count(status).await
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_status(id, status).await
    }

    async fn mark_paid(&self, id: Uuid, payment_reference: Option<String>) -> AppResult<Order> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.mark_paid(id, payment_reference).await
    }
}

pub struct Harness {
    pub state: AppState,
    pub repo: Arc<CountingRepository>,
    pub products: Arc<StubProducts>,
}

pub fn harness(products: Vec<Product>) -> Harness {
    let repo = Arc::new(CountingRepository::default());
    let products = Arc::new(StubProducts::with(products));
    let state = AppState::new(repo.clone(), products.clone());
    Harness {
        state,
        repo,
        products,
    }
}
