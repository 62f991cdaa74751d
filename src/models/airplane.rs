use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, JsonSchema)]
pub struct AirplaneType {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct AirplaneTypeCreateRequest {
    #[validate(length(min = 1))]
    pub name: String,
}

/// An airplane's seat coordinate space: `rows` x `seats_in_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatGeometry {
    pub rows: i32,
    pub seats_in_row: i32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("row {row}, seat {seat} is outside the airplane geometry ({rows} rows x {seats_in_row} seats)")]
pub struct SeatBoundsError {
    pub row: i32,
    pub seat: i32,
    pub rows: i32,
    pub seats_in_row: i32,
}

impl SeatGeometry {
    pub fn capacity(&self) -> i32 {
        self.rows * self.seats_in_row
    }

    /// Checks a candidate (row, seat) against this geometry.
    ///
    /// Pure function over already-loaded data; callers resolve the flight's
    /// airplane once and validate a whole batch without further lookups.
    /// Coordinates are 1-based, so zero and negative values are rejected too.
    pub fn validate(&self, row: i32, seat: i32) -> Result<(), SeatBoundsError> {
        if row < 1 || row > self.rows || seat < 1 || seat > self.seats_in_row {
            return Err(SeatBoundsError {
                row,
                seat,
                rows: self.rows,
                seats_in_row: self.seats_in_row,
            });
        }
        Ok(())
    }
}

// List shape: type names as plain labels
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AirplaneSummary {
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i32,
    pub types: Vec<String>,
    pub image: Option<String>,
}

// Detail shape: full type objects
#[derive(Debug, Serialize, JsonSchema)]
pub struct AirplaneDetail {
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i32,
    pub types: Vec<AirplaneType>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct AirplaneCreateRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub rows: i32,
    #[validate(range(min = 1))]
    pub seats_in_row: i32,
    #[validate(length(min = 1))]
    pub type_ids: Vec<i32>,
}

/// Reference handed back by the external object store, not image bytes.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct AirplaneImageRequest {
    #[validate(length(min = 1))]
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_inside_geometry_is_valid() {
        let geometry = SeatGeometry { rows: 30, seats_in_row: 6 };
        assert!(geometry.validate(1, 1).is_ok());
        assert!(geometry.validate(30, 6).is_ok());
        assert!(geometry.validate(15, 3).is_ok());
    }

    #[test]
    fn seat_beyond_geometry_is_rejected() {
        let geometry = SeatGeometry { rows: 30, seats_in_row: 6 };
        assert!(geometry.validate(31, 1).is_err());
        assert!(geometry.validate(1, 7).is_err());
        assert!(geometry.validate(31, 7).is_err());
    }

    #[test]
    fn zero_and_negative_coordinates_are_rejected() {
        let geometry = SeatGeometry { rows: 30, seats_in_row: 6 };
        assert!(geometry.validate(0, 1).is_err());
        assert!(geometry.validate(1, 0).is_err());
        assert!(geometry.validate(-1, 3).is_err());
    }

    #[test]
    fn capacity_is_rows_times_seats() {
        let geometry = SeatGeometry { rows: 30, seats_in_row: 6 };
        assert_eq!(geometry.capacity(), 180);
    }

    #[test]
    fn bounds_error_reports_the_offending_pair() {
        let geometry = SeatGeometry { rows: 10, seats_in_row: 4 };
        let err = geometry.validate(11, 2).unwrap_err();
        assert_eq!(err.row, 11);
        assert_eq!(err.seat, 2);
        assert_eq!(err.rows, 10);
        assert_eq!(err.seats_in_row, 4);
    }
}
