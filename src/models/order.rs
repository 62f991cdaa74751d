use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::flight::FlightDetail;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A single seat claim: write shape, bare ids only.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TicketRequest {
    pub flight_id: i32,
    pub row: i32,
    pub seat: i32,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OrderCreateRequest {
    pub tickets: Vec<TicketRequest>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Ticket {
    pub id: i32,
    pub flight_id: i32,
    pub order_id: i32,
    pub row: i32,
    pub seat: i32,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct TicketDetail {
    pub id: i32,
    pub row: i32,
    pub seat: i32,
    pub flight: FlightDetail,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct OrderDetail {
    pub id: i32,
    pub created_at: NaiveDateTime,
    pub tickets: Vec<TicketDetail>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct OrderPage {
    pub page: u32,
    pub size: u32,
    pub total: i64,
    pub orders: Vec<OrderDetail>,
}

/// Normalizes caller-supplied pagination: 1-based page, size defaulted
/// and capped.
pub fn normalize_page(page: Option<u32>, size: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let size = size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_missing() {
        assert_eq!(normalize_page(None, None), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn size_is_capped_at_max() {
        assert_eq!(normalize_page(Some(2), Some(1000)), (2, MAX_PAGE_SIZE));
    }

    #[test]
    fn zero_values_are_normalized() {
        assert_eq!(normalize_page(Some(0), Some(0)), (1, 1));
    }
}
