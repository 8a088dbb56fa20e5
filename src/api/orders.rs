use axum::{extract::State, Json};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::json;

use super::ApiError;
use crate::auth::{resolve_principal, Claims};
use crate::models::order::{self, Entity as Order, OrderDto};

// List the acting user's own orders
pub async fn list_orders(
    claims: Claims,
    State(db): State<DatabaseConnection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let acting = resolve_principal(&db, &claims).await?;

    let orders = Order::find()
        .filter(order::Column::BuyerId.eq(acting.id))
        .all(&db)
        .await?;

    let order_dtos: Vec<OrderDto> = orders.into_iter().map(OrderDto::from).collect();
    Ok(Json(json!({
        "orders": order_dtos,
        "total": order_dtos.len()
    })))
}
