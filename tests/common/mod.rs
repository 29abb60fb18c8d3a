use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedReceiver;

use shoecart_rs::models::Notification;
use shoecart_rs::repositories::{FileStorage, HttpProductLookup};
use shoecart_rs::services::{CartStore, ChannelNotifier};

pub const STORAGE_KEY: &str = "@RocketShoes:cart";

#[derive(Default)]
pub struct Catalog {
    pub products: HashMap<u64, serde_json::Value>,
    pub stock: HashMap<u64, u32>,
    pub product_requests: usize,
    pub stock_requests: usize,
}

type CatalogState = Arc<Mutex<Catalog>>;

pub struct TestEnvironment {
    pub base_url: String,
    pub catalog: CatalogState,
    storage_dir: TempDir,
}

pub struct TestStore {
    pub store: CartStore,
    notifications: UnboundedReceiver<Notification>,
}

impl TestStore {
    /// Messages raised since the last call, oldest first
    pub fn drain_notifications(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            messages.push(notification.message);
        }
        messages
    }
}

async fn mock_product(
    Path(id): Path<u64>,
    State(catalog): State<CatalogState>,
) -> Response {
    let mut catalog = catalog.lock().unwrap();
    catalog.product_requests += 1;
    match catalog.products.get(&id) {
        Some(product) => Json(product.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn mock_stock(Path(id): Path<u64>, State(catalog): State<CatalogState>) -> Response {
    let mut catalog = catalog.lock().unwrap();
    catalog.stock_requests += 1;
    match catalog.stock.get(&id) {
        Some(amount) => Json(json!({ "id": id, "amount": amount })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

fn seeded_catalog() -> Catalog {
    let shoes = [
        (1, "Tênis de Caminhada Leve Confortável", 179.9, 3),
        (2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 5),
        (3, "Tênis Adidas Duramo Lite 2.0", 219.9, 2),
        (4, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 1),
        (5, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 5),
        (6, "Tênis Adidas Duramo Lite 2.0", 219.9, 10),
    ];

    let mut catalog = Catalog::default();
    for (id, title, price, amount) in shoes {
        catalog.products.insert(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://cdn.example.com/tenis{}.jpg", id),
            }),
        );
        catalog.stock.insert(id, amount);
    }
    catalog
}

fn create_mock_app(catalog: CatalogState) -> Router {
    Router::new()
        .route("/products/:id", get(mock_product))
        .route("/stock/:id", get(mock_stock))
        .with_state(catalog)
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let catalog = Arc::new(Mutex::new(seeded_catalog()));
        let app = create_mock_app(catalog.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");

        Self {
            base_url,
            catalog,
            storage_dir,
        }
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.storage_dir.path())
    }

    /// Build a store over the mock API and this environment's storage directory
    pub async fn create_store(&self) -> TestStore {
        let lookup = HttpProductLookup::new(&self.base_url, Duration::from_secs(2))
            .expect("Failed to build lookup");
        let (notifier, notifications) = ChannelNotifier::new();

        let store = CartStore::new(
            Arc::new(lookup),
            Arc::new(notifier),
            Arc::new(self.storage()),
            STORAGE_KEY,
        )
        .await;

        TestStore {
            store,
            notifications,
        }
    }

    pub fn set_stock(&self, product_id: u64, amount: u32) {
        self.catalog.lock().unwrap().stock.insert(product_id, amount);
    }

    pub fn set_product(&self, product_id: u64, body: serde_json::Value) {
        self.catalog
            .lock()
            .unwrap()
            .products
            .insert(product_id, body);
    }

    pub fn remove_stock(&self, product_id: u64) {
        self.catalog.lock().unwrap().stock.remove(&product_id);
    }

    pub fn stock_requests(&self) -> usize {
        self.catalog.lock().unwrap().stock_requests
    }

    /// Raw snapshot text as written to disk
    pub async fn read_snapshot(&self) -> Option<String> {
        tokio::fs::read_to_string(self.storage().path_for(STORAGE_KEY))
            .await
            .ok()
    }

    pub async fn write_snapshot(&self, raw: &str) {
        tokio::fs::write(self.storage().path_for(STORAGE_KEY), raw)
            .await
            .expect("Failed to write snapshot");
    }
}
