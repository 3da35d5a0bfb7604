//! Order placement and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use collaborators::{CartClient, InventoryClient, PaymentClient, ProductClient};
use common::{OrderId, OwnerId};
use domain::Order;
use ledger::OrderLedger;
use saga::{OrderReceipt, SagaOrchestrator};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<C, P, I, Pay, L>
where
    C: CartClient,
    P: ProductClient,
    I: InventoryClient,
    Pay: PaymentClient,
    L: OrderLedger,
{
    pub orchestrator: SagaOrchestrator<C, P, I, Pay, L>,
    pub ledger: L,
}

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub owner_id: String,
    pub shipping_address: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub product_id: i64,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

#[derive(Serialize)]
pub struct OrderPlacedResponse {
    pub order_id: String,
    pub total_price_cents: i64,
    pub lines: Vec<OrderLineResponse>,
    pub cart_clear_warning: bool,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub owner_id: String,
    pub status: String,
    pub shipping_address: String,
    pub total_price_cents: i64,
    pub lines: Vec<OrderLineResponse>,
}

impl From<&OrderReceipt> for OrderPlacedResponse {
    fn from(receipt: &OrderReceipt) -> Self {
        Self {
            order_id: receipt.order_id.to_string(),
            total_price_cents: receipt.total_price.cents(),
            lines: receipt
                .lines
                .iter()
                .map(|line| OrderLineResponse {
                    product_id: line.product_id.as_i64(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price.cents(),
                })
                .collect(),
            cart_clear_warning: receipt.cart_clear_warning,
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            owner_id: order.owner_id.to_string(),
            status: order.status.to_string(),
            shipping_address: order.shipping_address.clone(),
            total_price_cents: order.total_price.cents(),
            lines: order
                .lines
                .iter()
                .map(|line| OrderLineResponse {
                    product_id: line.product_id.as_i64(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price.cents(),
                })
                .collect(),
        }
    }
}

// -- Handlers --

/// POST /orders — run the placement saga for the owner's cart.
#[tracing::instrument(skip(state, req))]
pub async fn place<C, P, I, Pay, L>(
    State(state): State<Arc<AppState<C, P, I, Pay, L>>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<OrderPlacedResponse>), ApiError>
where
    C: CartClient + 'static,
    P: ProductClient + 'static,
    I: InventoryClient + Clone + 'static,
    Pay: PaymentClient + 'static,
    L: OrderLedger + 'static,
{
    let owner_id = parse_owner_id(&req.owner_id)?;
    if req.shipping_address.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "shipping_address must not be empty".to_string(),
        ));
    }

    let receipt = state
        .orchestrator
        .place_order(owner_id, &req.shipping_address)
        .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(OrderPlacedResponse::from(&receipt)),
    ))
}

/// GET /orders/{id} — load a persisted order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<C, P, I, Pay, L>(
    State(state): State<Arc<AppState<C, P, I, Pay, L>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError>
where
    C: CartClient + 'static,
    P: ProductClient + 'static,
    I: InventoryClient + Clone + 'static,
    Pay: PaymentClient + 'static,
    L: OrderLedger + 'static,
{
    let order_id = parse_order_id(&id)?;
    let order = state
        .ledger
        .get_order(order_id)
        .await
        .map_err(|e| ApiError::Order(e.into()))?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(OrderResponse::from(&order)))
}

fn parse_owner_id(raw: &str) -> Result<OwnerId, ApiError> {
    let uuid = uuid::Uuid::parse_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid owner_id: {e}")))?;
    Ok(OwnerId::from_uuid(uuid))
}

fn parse_order_id(raw: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
