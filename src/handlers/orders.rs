use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{OrderQueries, OrderService};
use crate::domain::errors::DomainError;
use crate::domain::item::ItemCandidate;
use crate::domain::order::{Item, NewOrder, OrderChanges, OrderHeader, OrderView};
use crate::errors::AppError;

use super::{money, timestamp};

// ── Request / response DTOs ──────────────────────────────────────────────────

/// A line item as submitted. Every field is optional here so that a missing
/// field is reported as an invalid item rather than a malformed body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
    /// Number or numeric string, e.g. `9.99` or `"9.99"`
    #[serde(default, deserialize_with = "money::deserialize_option")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<BigDecimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "money::deserialize_option")]
    #[schema(value_type = Option<f64>)]
    pub value: Option<BigDecimal>,
    /// RFC 3339 timestamp, `YYYY-MM-DD HH:MM:SS` (UTC) or `YYYY-MM-DD`;
    /// defaults to the time of insertion.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    #[schema(value_type = Option<String>)]
    pub creation_date: Option<DateTime<Utc>>,
    pub items: Option<Vec<ItemRequest>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(default, deserialize_with = "money::deserialize_option")]
    #[schema(value_type = Option<f64>)]
    pub value: Option<BigDecimal>,
    /// Replaces the whole item list when present, even if empty.
    pub items: Option<Vec<ItemRequest>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderHeaderResponse {
    pub order_id: String,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = f64)]
    pub value: BigDecimal,
    pub creation_date: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub product_id: String,
    pub quantity: i32,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = f64)]
    pub price: BigDecimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: String,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = f64)]
    pub value: BigDecimal,
    pub creation_date: String,
    pub items: Vec<ItemResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub message: String,
    pub order: OrderHeaderResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ── Conversions ──────────────────────────────────────────────────────────────

impl From<ItemRequest> for ItemCandidate {
    fn from(item: ItemRequest) -> Self {
        ItemCandidate {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

impl TryFrom<CreateOrderRequest> for NewOrder {
    type Error = DomainError;

    fn try_from(body: CreateOrderRequest) -> Result<Self, Self::Error> {
        let (Some(order_id), Some(value)) = (body.order_id.filter(|id| !id.is_empty()), body.value)
        else {
            return Err(DomainError::InvalidRequest(
                "orderId and value are required".to_string(),
            ));
        };
        Ok(NewOrder {
            order_id,
            value,
            creation_date: body.creation_date,
            items: body
                .items
                .unwrap_or_default()
                .into_iter()
                .map(ItemCandidate::from)
                .collect(),
        })
    }
}

impl From<UpdateOrderRequest> for OrderChanges {
    fn from(body: UpdateOrderRequest) -> Self {
        OrderChanges {
            value: body.value,
            items: body
                .items
                .map(|items| items.into_iter().map(ItemCandidate::from).collect()),
        }
    }
}

impl From<OrderHeader> for OrderHeaderResponse {
    fn from(header: OrderHeader) -> Self {
        OrderHeaderResponse {
            order_id: header.order_id,
            value: header.value,
            creation_date: header.creation_date.to_rfc3339(),
        }
    }
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        ItemResponse {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            order_id: order.header.order_id,
            value: order.header.value,
            creation_date: order.header.creation_date.to_rfc3339(),
            items: order.items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

fn message(text: &str) -> MessageResponse {
    MessageResponse {
        message: text.to_string(),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /order
///
/// Creates an order together with its items in a single transaction. If any
/// item is malformed nothing is stored.
#[utoipa::path(
    post,
    path = "/order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = CreateOrderResponse),
        (status = 400, description = "Missing orderId/value or malformed item"),
        (status = 409, description = "orderId already exists"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    orders: web::Data<OrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let new_order = NewOrder::try_from(body.into_inner())?;

    let header = web::block(move || orders.create_order(new_order))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        message: "Order created successfully".to_string(),
        order: header.into(),
    }))
}

/// GET /order/list
///
/// Returns every order with its items, most recent first.
#[utoipa::path(
    get,
    path = "/order/list",
    responses(
        (status = 200, description = "All orders with their items", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(queries: web::Data<OrderQueries>) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || queries.list_orders())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /order/{orderId}
///
/// Returns the order together with its items.
#[utoipa::path(
    get,
    path = "/order/{orderId}",
    params(
        ("orderId" = String, Path, description = "Order identifier"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    queries: web::Data<OrderQueries>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || queries.get_order(&order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /order/{orderId}
///
/// Updates the value and/or replaces the item list. The order row stays
/// locked until the update commits, so concurrent updates run one after
/// the other.
#[utoipa::path(
    put,
    path = "/order/{orderId}",
    params(
        ("orderId" = String, Path, description = "Order identifier"),
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = MessageResponse),
        (status = 400, description = "Nothing to update or malformed item"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    orders: web::Data<OrderService>,
    path: web::Path<String>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let changes = OrderChanges::from(body.into_inner());

    web::block(move || orders.update_order(&order_id, changes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(message("Order updated successfully")))
}

/// DELETE /order/{orderId}
///
/// Deletes the order; its items are removed by the foreign key cascade.
#[utoipa::path(
    delete,
    path = "/order/{orderId}",
    params(
        ("orderId" = String, Path, description = "Order identifier"),
    ),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    orders: web::Data<OrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    web::block(move || orders.delete_order(&order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(message("Order deleted successfully")))
}
