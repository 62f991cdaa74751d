use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::models::airport::{Airport, AirportCreateRequest, RouteCreateRequest, RouteSummary};
use crate::services::airport_service::AirportService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;

/// List airports (public)
#[openapi(tag = "Airports")]
#[get("/airports")]
pub async fn list_airports(
    airport_service: &State<AirportService>,
) -> Result<Json<Vec<Airport>>, AppError> {
    let airports = airport_service.list_airports().await?;
    Ok(Json(airports))
}

/// Create an airport (admin)
#[openapi(tag = "Airports")]
#[post("/airports", format = "json", data = "<request>")]
pub async fn create_airport(
    request: Json<AirportCreateRequest>,
    _admin: AdminUser,
    airport_service: &State<AirportService>,
) -> Result<Json<Airport>, AppError> {
    let airport = airport_service.create_airport(request.into_inner()).await?;
    Ok(Json(airport))
}

/// List routes (admin)
#[openapi(tag = "Routes")]
#[get("/routes")]
pub async fn list_routes(
    _admin: AdminUser,
    airport_service: &State<AirportService>,
) -> Result<Json<Vec<RouteSummary>>, AppError> {
    let routes = airport_service.list_routes().await?;
    Ok(Json(routes))
}

/// Create a route between two airports (admin)
#[openapi(tag = "Routes")]
#[post("/routes", format = "json", data = "<request>")]
pub async fn create_route(
    request: Json<RouteCreateRequest>,
    _admin: AdminUser,
    airport_service: &State<AirportService>,
) -> Result<Json<RouteSummary>, AppError> {
    let route = airport_service.create_route(request.into_inner()).await?;
    Ok(Json(route))
}
