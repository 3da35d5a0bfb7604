//! HTTP API server for order placement.
//!
//! Exposes the placement saga over REST with structured logging (tracing)
//! and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use collaborators::{
    CartClient, CollaboratorConfig, HttpCartClient, HttpInventoryClient, HttpProductClient,
    InMemoryCartClient, InMemoryInventoryClient, InMemoryProductClient, InventoryClient,
    PaymentClient, ProductClient, StubPaymentClient,
};
use ledger::{InMemoryLedger, OrderLedger, PostgresLedger};
use metrics_exporter_prometheus::PrometheusHandle;
use saga::SagaOrchestrator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// App state over HTTP collaborator clients and the PostgreSQL ledger.
pub type HttpAppState = AppState<
    HttpCartClient,
    HttpProductClient,
    HttpInventoryClient,
    StubPaymentClient,
    PostgresLedger,
>;

/// App state over in-memory backends, used by tests and local runs.
pub type InMemoryAppState = AppState<
    InMemoryCartClient,
    InMemoryProductClient,
    InMemoryInventoryClient,
    StubPaymentClient,
    InMemoryLedger,
>;

/// The in-memory backends behind an `InMemoryAppState`, handed back so
/// tests can seed carts, prices, and stock.
#[derive(Clone)]
pub struct InMemoryBackends {
    pub cart: InMemoryCartClient,
    pub products: InMemoryProductClient,
    pub inventory: InMemoryInventoryClient,
    pub payment: StubPaymentClient,
    pub ledger: InMemoryLedger,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, P, I, Pay, L>(
    state: Arc<AppState<C, P, I, Pay, L>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    C: CartClient + 'static,
    P: ProductClient + 'static,
    I: InventoryClient + Clone + 'static,
    Pay: PaymentClient + 'static,
    L: OrderLedger + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::place::<C, P, I, Pay, L>))
        .route("/orders/{id}", get(routes::orders::get::<C, P, I, Pay, L>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over HTTP collaborator clients and the given
/// PostgreSQL ledger.
pub fn create_http_state(
    collaborators: &CollaboratorConfig,
    ledger: PostgresLedger,
) -> Arc<HttpAppState> {
    let orchestrator = SagaOrchestrator::new(
        HttpCartClient::new(collaborators),
        HttpProductClient::new(collaborators),
        HttpInventoryClient::new(collaborators),
        StubPaymentClient::new(),
        ledger.clone(),
    );
    Arc::new(AppState {
        orchestrator,
        ledger,
    })
}

/// Creates application state over in-memory backends.
pub fn create_default_state() -> (Arc<InMemoryAppState>, InMemoryBackends) {
    let backends = InMemoryBackends {
        cart: InMemoryCartClient::new(),
        products: InMemoryProductClient::new(),
        inventory: InMemoryInventoryClient::new(),
        payment: StubPaymentClient::new(),
        ledger: InMemoryLedger::new(),
    };

    let orchestrator = SagaOrchestrator::new(
        backends.cart.clone(),
        backends.products.clone(),
        backends.inventory.clone(),
        backends.payment.clone(),
        backends.ledger.clone(),
    );

    let state = Arc::new(AppState {
        orchestrator,
        ledger: backends.ledger.clone(),
    });

    (state, backends)
}
