use chrono::NaiveDate;
use rocket::serde::json::{json, Json, Value};
use rocket::State;
use rocket_okapi::openapi;

use crate::models::crew::{CrewCreateRequest, CrewDetail};
use crate::models::flight::{FlightCreateRequest, FlightDetail, FlightFilter};
use crate::services::flight_service::FlightService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;

/// List flights (public). `route` filters by route id, `departure_date`
/// by calendar day (YYYY-MM-DD).
#[openapi(tag = "Flights")]
#[get("/flights?<route>&<departure_date>")]
pub async fn list_flights(
    route: Option<i32>,
    departure_date: Option<String>,
    flight_service: &State<FlightService>,
) -> Result<Json<Vec<FlightDetail>>, AppError> {
    let departure_date = match departure_date {
        Some(date) => Some(NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
            AppError::ValidationError("Invalid departure date format, expected YYYY-MM-DD".into())
        })?),
        None => None,
    };

    let flights = flight_service
        .list_flights(FlightFilter {
            route_id: route,
            departure_date,
        })
        .await?;
    Ok(Json(flights))
}

/// Retrieve a flight (admin)
#[openapi(tag = "Flights")]
#[get("/flights/<id>")]
pub async fn get_flight(
    id: i32,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightDetail>, AppError> {
    let flight = flight_service.get_flight(id).await?;
    Ok(Json(flight))
}

/// Create a flight (admin)
#[openapi(tag = "Flights")]
#[post("/flights", format = "json", data = "<request>")]
pub async fn create_flight(
    request: Json<FlightCreateRequest>,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightDetail>, AppError> {
    let flight = flight_service.create_flight(request.into_inner()).await?;
    Ok(Json(flight))
}

/// Update a flight (admin)
#[openapi(tag = "Flights")]
#[put("/flights/<id>", format = "json", data = "<request>")]
pub async fn update_flight(
    id: i32,
    request: Json<FlightCreateRequest>,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightDetail>, AppError> {
    let flight = flight_service.update_flight(id, request.into_inner()).await?;
    Ok(Json(flight))
}

/// Delete a flight and, via cascade, its tickets (admin)
#[openapi(tag = "Flights")]
#[delete("/flights/<id>")]
pub async fn delete_flight(
    id: i32,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Value>, AppError> {
    flight_service.delete_flight(id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

/// List crew members (admin)
#[openapi(tag = "Crew")]
#[get("/crew")]
pub async fn list_crew(
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Vec<CrewDetail>>, AppError> {
    let members = flight_service.list_crew().await?;
    Ok(Json(members))
}

/// Create a crew member (admin)
#[openapi(tag = "Crew")]
#[post("/crew", format = "json", data = "<request>")]
pub async fn create_crew(
    request: Json<CrewCreateRequest>,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<CrewDetail>, AppError> {
    let member = flight_service.create_crew(request.into_inner()).await?;
    Ok(Json(member))
}
