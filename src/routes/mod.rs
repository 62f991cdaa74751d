pub mod airplane_route;
pub mod airport_route;
pub mod flight_route;
pub mod order_route;
pub mod user_route;

use rocket::serde::json::{json, Json, Value};

// Catchers so guard failures and unmatched requests still produce
// structured JSON bodies
#[catch(401)]
pub fn unauthorized() -> Json<Value> {
    Json(json!({ "error": "Authentication required" }))
}

#[catch(403)]
pub fn forbidden() -> Json<Value> {
    Json(json!({ "error": "Insufficient permissions" }))
}

#[catch(404)]
pub fn not_found() -> Json<Value> {
    Json(json!({ "error": "Resource not found" }))
}

#[catch(405)]
pub fn method_not_allowed() -> Json<Value> {
    Json(json!({ "error": "Method not allowed" }))
}
