use chrono::{NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::airplane::AirplaneSummary;
use crate::models::airport::RouteDetail;
use crate::models::crew::CrewDetail;

/// Flights are always rendered fully nested: route with both airports,
/// the airplane summary, and the assigned crew members.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FlightDetail {
    pub id: i32,
    pub route: RouteDetail,
    pub airplane: AirplaneSummary,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub crew: Vec<CrewDetail>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FlightCreateRequest {
    pub route_id: i32,
    pub airplane_id: i32,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub crew_ids: Vec<i32>,
}

#[derive(Debug, Default)]
pub struct FlightFilter {
    pub route_id: Option<i32>,
    pub departure_date: Option<NaiveDate>,
}
