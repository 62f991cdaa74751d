use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, JsonSchema)]
pub struct Airport {
    pub id: i32,
    pub name: String,
    pub closest_big_city: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct AirportCreateRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub closest_big_city: String,
}

// List shape: airport ids plus their names, no nesting
#[derive(Debug, sqlx::FromRow, Serialize, JsonSchema)]
pub struct RouteSummary {
    pub id: i32,
    pub source_id: i32,
    pub destination_id: i32,
    pub distance: i32,
    pub source_name: String,
    pub destination_name: String,
}

// Detail shape, used nested inside flight responses
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RouteDetail {
    pub id: i32,
    pub source: Airport,
    pub destination: Airport,
    pub distance: i32,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct RouteCreateRequest {
    pub source_id: i32,
    pub destination_id: i32,
    #[validate(range(min = 1))]
    pub distance: i32,
}
