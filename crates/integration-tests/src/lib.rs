//! Integration test harness for ShopMart.
//!
//! Every test gets its own stub catalog upstream and its own storefront, both
//! served by axum on ephemeral ports.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::new(sample_products(14)).await;
//! let client = ctx.client();
//! let resp = client.get(ctx.url("/health")).send().await?;
//! assert_eq!(resp.status(), 200);
//! ```

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use reqwest::Client;
use serde_json::{Value, json};
use shopmart_storefront::config::StorefrontConfig;
use shopmart_storefront::routes;
use shopmart_storefront::state::AppState;
use tokio::net::TcpListener;
use url::Url;

/// How the stub catalog answers.
#[derive(Debug, Clone)]
pub enum StubMode {
    /// `200` with `{ "products": [...] }`.
    Products(Vec<Value>),
    /// The given status with a plain-text body.
    Status(u16),
    /// `200` with a body that is not a catalog document.
    Garbage,
    /// Sleep, then answer with the products.
    Slow(Duration, Vec<Value>),
}

#[derive(Debug)]
struct StubState {
    mode: Mutex<StubMode>,
    hits: AtomicUsize,
}

/// A local stand-in for the remote catalog API.
#[derive(Debug, Clone)]
pub struct StubCatalog {
    state: Arc<StubState>,
    url: Url,
}

impl StubCatalog {
    /// Serve the stub on an ephemeral port.
    pub async fn start(mode: StubMode) -> Self {
        let state = Arc::new(StubState {
            mode: Mutex::new(mode),
            hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/products", get(stub_products))
            .with_state(Arc::clone(&state));
        let addr = serve(app).await;
        let url = Url::parse(&format!("http://{addr}/products")).expect("valid stub url");

        Self { state, url }
    }

    /// The catalog endpoint URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Change how later requests are answered.
    pub fn set_mode(&self, mode: StubMode) {
        *self.state.mode.lock().unwrap_or_else(PoisonError::into_inner) = mode;
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

async fn stub_products(State(state): State<Arc<StubState>>) -> axum::response::Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let mode = state
        .mode
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();

    match mode {
        StubMode::Products(products) => Json(catalog_body(products)).into_response(),
        StubMode::Status(code) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "upstream unavailable",
        )
            .into_response(),
        StubMode::Garbage => "<html>not json</html>".into_response(),
        StubMode::Slow(delay, products) => {
            tokio::time::sleep(delay).await;
            Json(catalog_body(products)).into_response()
        }
    }
}

fn catalog_body(products: Vec<Value>) -> Value {
    let total = products.len();
    json!({ "products": products, "total": total, "skip": 0, "limit": total })
}

/// One catalog product as the upstream API returns it.
#[must_use]
pub fn product_json(id: u32, title: &str, price: f64, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "price": price,
        "discountPercentage": 5.0,
        "rating": 4.2,
        "stock": 10,
        "brand": "Acme",
        "category": category,
        "thumbnail": format!("https://cdn.example.com/{id}.jpg"),
        "images": []
    })
}

/// `count` products priced 10, 20, 30... across three categories.
#[must_use]
pub fn sample_products(count: u32) -> Vec<Value> {
    const CATEGORIES: [&str; 3] = ["beauty", "laptops", "groceries"];
    (1..=count)
        .map(|id| {
            let category = CATEGORIES
                .get(usize::try_from(id).unwrap_or(0) % CATEGORIES.len())
                .copied()
                .unwrap_or("misc");
            product_json(id, &format!("Item {id}"), f64::from(id) * 10.0, category)
        })
        .collect()
}

/// A storefront wired to a stub catalog.
pub struct TestContext {
    pub catalog: StubCatalog,
    pub state: AppState,
    base_url: String,
}

impl TestContext {
    /// Start a stub catalog serving `products` and a storefront using it.
    pub async fn new(products: Vec<Value>) -> Self {
        Self::with_mode(StubMode::Products(products)).await
    }

    /// Start a stub catalog in `mode` and a storefront using it.
    pub async fn with_mode(mode: StubMode) -> Self {
        Self::with_settings(mode, &[]).await
    }

    /// Like [`with_mode`](Self::with_mode), with extra configuration variables.
    pub async fn with_settings(mode: StubMode, vars: &[(&str, &str)]) -> Self {
        let catalog = StubCatalog::start(mode).await;
        let catalog_url = catalog.url().to_string();

        let config = StorefrontConfig::from_lookup(|key| {
            if key == "CATALOG_URL" {
                return Some(catalog_url.clone());
            }
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_string())
        })
        .expect("valid test configuration");

        let state = AppState::new(config).expect("application state");
        let addr = serve(routes::app(state.clone())).await;

        Self {
            catalog,
            state,
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for `path` on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A new browser: its own cookie jar, hence its own session and shop.
    #[must_use]
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Shop state as reported by `GET /filters`.
    pub async fn shop_state(&self, client: &Client) -> Value {
        client
            .get(self.url("/filters"))
            .send()
            .await
            .expect("request")
            .json()
            .await
            .expect("json body")
    }

    /// Poll until the session's catalog fetch has finished; returns the state.
    pub async fn wait_for_catalog(&self, client: &Client) -> Value {
        for _ in 0..100 {
            let state = self.shop_state(client).await;
            if state["status"]["state"] != "loading" {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("catalog fetch did not settle");
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });
    addr
}
