use thiserror::Error;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;
use rocket::Response;
use rocket::http::ContentType;
use std::io::Cursor;
use serde_json::json;
use serde::Serialize;
use rocket_okapi::JsonSchema;

#[derive(Error, Debug, Serialize, JsonSchema)]
pub enum AppError {
    #[error("Database error")]
    DatabaseError(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid seat for ticket {ticket}: {reason}")]
    InvalidSeat { ticket: usize, reason: String },

    #[error("An order must contain at least one ticket")]
    EmptyOrder,

    #[error("Seat {row}-{seat} on flight {flight_id} is already taken")]
    SeatTaken { flight_id: i32, row: i32, seat: i32 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
}

// Convert sqlx::Error (database error) to AppError::DatabaseError
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

// Define a type alias for the result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> Status {
        match self {
            AppError::DatabaseError(_) => Status::InternalServerError,
            AppError::Unauthenticated(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            AppError::InvalidSeat { .. } => Status::BadRequest,
            AppError::EmptyOrder => Status::BadRequest,
            AppError::SeatTaken { .. } => Status::Conflict,
            AppError::Conflict(_) => Status::Conflict,
            AppError::MethodNotAllowed(_) => Status::MethodNotAllowed,
        }
    }
}

// Implement the Responder trait for AppError
// Format all error from route level to a Http Response at route level.
// Booking failures carry the identifying fields of the request that failed,
// so callers never have to parse the message text.
#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'static> {
        let body = match &self {
            AppError::InvalidSeat { ticket, .. } => json!({
                "error": self.to_string(),
                "ticket": ticket,
            }),
            AppError::SeatTaken { flight_id, row, seat } => json!({
                "error": self.to_string(),
                "flight_id": flight_id,
                "row": row,
                "seat": seat,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        Response::build()
            .status(self.status())
            .header(ContentType::JSON)
            .sized_body(None, Cursor::new(body.to_string()))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_and_forbidden_map_to_distinct_codes() {
        assert_eq!(
            AppError::Unauthenticated("token missing".into()).status(),
            Status::Unauthorized
        );
        assert_eq!(
            AppError::Forbidden("admin only".into()).status(),
            Status::Forbidden
        );
    }

    #[test]
    fn booking_errors_map_to_expected_codes() {
        assert_eq!(AppError::EmptyOrder.status(), Status::BadRequest);
        assert_eq!(
            AppError::InvalidSeat { ticket: 0, reason: "out of range".into() }.status(),
            Status::BadRequest
        );
        assert_eq!(
            AppError::SeatTaken { flight_id: 1, row: 1, seat: 1 }.status(),
            Status::Conflict
        );
    }
}
