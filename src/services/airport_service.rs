use sqlx::MySqlPool;
use validator::Validate;

use crate::models::airport::{
    Airport, AirportCreateRequest, RouteCreateRequest, RouteSummary,
};
use crate::utils::error::{AppError, AppResult};

pub struct AirportService {
    pool: MySqlPool,
}

impl AirportService {
    pub fn new(pool: MySqlPool) -> Self {
        AirportService { pool }
    }

    pub async fn list_airports(&self) -> AppResult<Vec<Airport>> {
        let airports: Vec<Airport> =
            sqlx::query_as("SELECT id, name, closest_big_city FROM airport ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(airports)
    }

    pub async fn create_airport(&self, request: AirportCreateRequest) -> AppResult<Airport> {
        request.validate()?;

        let result = sqlx::query("INSERT INTO airport (name, closest_big_city) VALUES (?, ?)")
            .bind(&request.name)
            .bind(&request.closest_big_city)
            .execute(&self.pool)
            .await?;

        Ok(Airport {
            id: result.last_insert_id() as i32,
            name: request.name,
            closest_big_city: request.closest_big_city,
        })
    }

    pub async fn list_routes(&self) -> AppResult<Vec<RouteSummary>> {
        let routes: Vec<RouteSummary> = sqlx::query_as(
            "SELECT r.id, r.source_id, r.destination_id, r.distance, \
                src.name AS source_name, dst.name AS destination_name \
             FROM route r \
             JOIN airport src ON src.id = r.source_id \
             JOIN airport dst ON dst.id = r.destination_id \
             ORDER BY r.id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(routes)
    }

    pub async fn create_route(&self, request: RouteCreateRequest) -> AppResult<RouteSummary> {
        request.validate()?;

        if request.source_id == request.destination_id {
            return Err(AppError::ValidationError(
                "source and destination airports must differ".into(),
            ));
        }

        let source: Option<Airport> =
            sqlx::query_as("SELECT id, name, closest_big_city FROM airport WHERE id = ?")
                .bind(request.source_id)
                .fetch_optional(&self.pool)
                .await?;
        let source = source.ok_or_else(|| {
            AppError::NotFound(format!("Airport {} not found", request.source_id))
        })?;

        let destination: Option<Airport> =
            sqlx::query_as("SELECT id, name, closest_big_city FROM airport WHERE id = ?")
                .bind(request.destination_id)
                .fetch_optional(&self.pool)
                .await?;
        let destination = destination.ok_or_else(|| {
            AppError::NotFound(format!("Airport {} not found", request.destination_id))
        })?;

        let result = sqlx::query(
            "INSERT INTO route (source_id, destination_id, distance) VALUES (?, ?, ?)",
        )
        .bind(request.source_id)
        .bind(request.destination_id)
        .bind(request.distance)
        .execute(&self.pool)
        .await?;

        Ok(RouteSummary {
            id: result.last_insert_id() as i32,
            source_id: source.id,
            destination_id: destination.id,
            distance: request.distance,
            source_name: source.name,
            destination_name: destination.name,
        })
    }
}
