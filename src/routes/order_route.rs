use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::models::order::{OrderCreateRequest, OrderDetail, OrderPage};
use crate::services::order_service::OrderService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;

/// Book an order: one or more seat claims, persisted atomically
#[openapi(tag = "Orders")]
#[post("/orders", format = "json", data = "<request>")]
pub async fn create_order(
    request: Json<OrderCreateRequest>,
    auth: AuthenticatedUser,
    order_service: &State<OrderService>,
) -> Result<Json<OrderDetail>, AppError> {
    let order = order_service
        .create_order(auth.user_id, request.into_inner())
        .await?;
    Ok(Json(order))
}

/// List the calling user's orders, paginated (default 10 per page, max 100)
#[openapi(tag = "Orders")]
#[get("/orders?<page>&<size>")]
pub async fn list_orders(
    page: Option<u32>,
    size: Option<u32>,
    auth: AuthenticatedUser,
    order_service: &State<OrderService>,
) -> Result<Json<OrderPage>, AppError> {
    let orders = order_service.list_orders(auth.user_id, page, size).await?;
    Ok(Json(orders))
}

// Orders are immutable once created
#[openapi(skip)]
#[put("/orders/<_id>")]
pub async fn update_order_not_allowed(_id: i32) -> AppError {
    AppError::MethodNotAllowed("orders cannot be updated".into())
}

#[openapi(skip)]
#[delete("/orders/<_id>")]
pub async fn delete_order_not_allowed(_id: i32) -> AppError {
    AppError::MethodNotAllowed("orders cannot be deleted".into())
}
