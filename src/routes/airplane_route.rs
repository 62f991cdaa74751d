use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::models::airplane::{
    AirplaneCreateRequest, AirplaneDetail, AirplaneImageRequest, AirplaneSummary, AirplaneType,
    AirplaneTypeCreateRequest,
};
use crate::services::airplane_service::AirplaneService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};

/// List airplane types (admin)
#[openapi(tag = "Airplane Types")]
#[get("/airplane_types")]
pub async fn list_airplane_types(
    _admin: AdminUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<Vec<AirplaneType>>, AppError> {
    let types = airplane_service.list_types().await?;
    Ok(Json(types))
}

/// Create an airplane type (admin)
#[openapi(tag = "Airplane Types")]
#[post("/airplane_types", format = "json", data = "<request>")]
pub async fn create_airplane_type(
    request: Json<AirplaneTypeCreateRequest>,
    _admin: AdminUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneType>, AppError> {
    let airplane_type = airplane_service.create_type(request.into_inner()).await?;
    Ok(Json(airplane_type))
}

/// List airplanes (public). `name` filters by substring, `types` by a
/// comma-separated list of type names (an airplane matches any of them).
#[openapi(tag = "Airplanes")]
#[get("/airplanes?<name>&<types>")]
pub async fn list_airplanes(
    name: Option<String>,
    types: Option<String>,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<Vec<AirplaneSummary>>, AppError> {
    let type_names = types.map(|value| {
        value
            .split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
    });

    let airplanes = airplane_service.list_airplanes(name, type_names).await?;
    Ok(Json(airplanes))
}

/// Retrieve an airplane with its full type objects (public)
#[openapi(tag = "Airplanes")]
#[get("/airplanes/<id>")]
pub async fn get_airplane(
    id: i32,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneDetail>, AppError> {
    let airplane = airplane_service.get_airplane(id).await?;
    Ok(Json(airplane))
}

/// Create an airplane (any authenticated user)
#[openapi(tag = "Airplanes")]
#[post("/airplanes", format = "json", data = "<request>")]
pub async fn create_airplane(
    request: Json<AirplaneCreateRequest>,
    _auth: AuthenticatedUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneDetail>, AppError> {
    let airplane = airplane_service.create_airplane(request.into_inner()).await?;
    Ok(Json(airplane))
}

/// Attach an image reference to an airplane (admin). The payload is the
/// reference returned by the object store, not the image itself.
#[openapi(tag = "Airplanes")]
#[post("/airplanes/<id>/image", format = "json", data = "<request>")]
pub async fn upload_airplane_image(
    id: i32,
    request: Json<AirplaneImageRequest>,
    _admin: AdminUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneDetail>, AppError> {
    let airplane = airplane_service.set_image(id, request.into_inner()).await?;
    Ok(Json(airplane))
}

// Airplanes are never updated or deleted through the API
#[openapi(skip)]
#[put("/airplanes/<_id>")]
pub async fn update_airplane_not_allowed(_id: i32) -> AppError {
    AppError::MethodNotAllowed("airplanes cannot be updated".into())
}

#[openapi(skip)]
#[delete("/airplanes/<_id>")]
pub async fn delete_airplane_not_allowed(_id: i32) -> AppError {
    AppError::MethodNotAllowed("airplanes cannot be deleted".into())
}
