use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::{MySqlPool, QueryBuilder};
use validator::Validate;

use crate::models::airplane::AirplaneSummary;
use crate::models::airport::{Airport, RouteDetail};
use crate::models::crew::{Crew, CrewCreateRequest, CrewDetail};
use crate::models::flight::{FlightCreateRequest, FlightDetail, FlightFilter};
use crate::utils::error::{AppError, AppResult};

pub struct FlightService {
    pool: MySqlPool,
}

// Flat row produced by the flight join; regrouped into the nested
// detail shape after the crew and type lookups.
#[derive(Debug, sqlx::FromRow)]
struct FlightRow {
    id: i32,
    departure_time: NaiveDateTime,
    arrival_time: NaiveDateTime,
    route_id: i32,
    distance: i32,
    source_id: i32,
    source_name: String,
    source_city: String,
    destination_id: i32,
    destination_name: String,
    destination_city: String,
    airplane_id: i32,
    airplane_name: String,
    rows: i32,
    seats_in_row: i32,
    image: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct FlightCrewRow {
    flight_id: i32,
    id: i32,
    first_name: String,
    last_name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct AirplaneTypeNameRow {
    airplane_id: i32,
    name: String,
}

const FLIGHT_SELECT: &str = r#"
    SELECT f.id, f.departure_time, f.arrival_time,
        r.id AS route_id, r.distance,
        src.id AS source_id, src.name AS source_name, src.closest_big_city AS source_city,
        dst.id AS destination_id, dst.name AS destination_name, dst.closest_big_city AS destination_city,
        a.id AS airplane_id, a.name AS airplane_name, a.`rows` AS `rows`, a.seats_in_row, a.image
    FROM flight f
    JOIN route r ON r.id = f.route_id
    JOIN airport src ON src.id = r.source_id
    JOIN airport dst ON dst.id = r.destination_id
    JOIN airplane a ON a.id = f.airplane_id
"#;

impl FlightService {
    pub fn new(pool: MySqlPool) -> Self {
        FlightService { pool }
    }

    // List flights with optional route / calendar-day filters
    pub async fn list_flights(&self, filter: FlightFilter) -> AppResult<Vec<FlightDetail>> {
        let mut query = QueryBuilder::new(FLIGHT_SELECT);

        let mut has_where = false;
        if let Some(route_id) = filter.route_id {
            query.push(" WHERE f.route_id = ");
            query.push_bind(route_id);
            has_where = true;
        }
        if let Some(date) = filter.departure_date {
            query.push(if has_where { " AND " } else { " WHERE " });
            query.push("DATE(f.departure_time) = ");
            query.push_bind(date);
        }
        query.push(" ORDER BY f.departure_time, f.id");

        let rows: Vec<FlightRow> = query.build_query_as().fetch_all(&self.pool).await?;
        self.assemble_details(rows).await
    }

    pub async fn get_flight(&self, flight_id: i32) -> AppResult<FlightDetail> {
        let mut query = QueryBuilder::new(FLIGHT_SELECT);
        query.push(" WHERE f.id = ");
        query.push_bind(flight_id);

        let row: Option<FlightRow> = query.build_query_as().fetch_optional(&self.pool).await?;
        let row = row.ok_or_else(|| AppError::NotFound(format!("Flight {} not found", flight_id)))?;

        let mut details = self.assemble_details(vec![row]).await?;
        Ok(details.remove(0))
    }

    /// Resolves a set of flights into their detail shapes, keyed by id.
    /// Used by the order projection so nested flights render the same way
    /// everywhere.
    pub async fn flights_by_ids(&self, flight_ids: &[i32]) -> AppResult<HashMap<i32, FlightDetail>> {
        if flight_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = QueryBuilder::new(FLIGHT_SELECT);
        query.push(" WHERE f.id IN (");
        let mut ids = query.separated(", ");
        for id in flight_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");

        let rows: Vec<FlightRow> = query.build_query_as().fetch_all(&self.pool).await?;
        let details = self.assemble_details(rows).await?;
        Ok(details.into_iter().map(|flight| (flight.id, flight)).collect())
    }

    pub async fn create_flight(&self, request: FlightCreateRequest) -> AppResult<FlightDetail> {
        self.check_flight_request(&request).await?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO flight (route_id, airplane_id, departure_time, arrival_time) VALUES (?, ?, ?, ?)",
        )
        .bind(request.route_id)
        .bind(request.airplane_id)
        .bind(request.departure_time)
        .bind(request.arrival_time)
        .execute(&mut *tx)
        .await?;

        let flight_id = result.last_insert_id() as i32;

        for crew_id in &request.crew_ids {
            sqlx::query("INSERT INTO flight_crew (flight_id, crew_id) VALUES (?, ?)")
                .bind(flight_id)
                .bind(crew_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get_flight(flight_id).await
    }

    pub async fn update_flight(
        &self,
        flight_id: i32,
        request: FlightCreateRequest,
    ) -> AppResult<FlightDetail> {
        self.check_flight_request(&request).await?;

        let existing = sqlx::query("SELECT id FROM flight WHERE id = ?")
            .bind(flight_id)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_none() {
            return Err(AppError::NotFound(format!("Flight {} not found", flight_id)));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE flight SET route_id = ?, airplane_id = ?, departure_time = ?, arrival_time = ? WHERE id = ?",
        )
        .bind(request.route_id)
        .bind(request.airplane_id)
        .bind(request.departure_time)
        .bind(request.arrival_time)
        .bind(flight_id)
        .execute(&mut *tx)
        .await?;

        // Replace the crew assignment wholesale
        sqlx::query("DELETE FROM flight_crew WHERE flight_id = ?")
            .bind(flight_id)
            .execute(&mut *tx)
            .await?;

        for crew_id in &request.crew_ids {
            sqlx::query("INSERT INTO flight_crew (flight_id, crew_id) VALUES (?, ?)")
                .bind(flight_id)
                .bind(crew_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get_flight(flight_id).await
    }

    // Tickets on the flight go with it, per the schema's cascade rule
    pub async fn delete_flight(&self, flight_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM flight WHERE id = ?")
            .bind(flight_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Flight {} not found", flight_id)));
        }
        Ok(())
    }

    pub async fn list_crew(&self) -> AppResult<Vec<CrewDetail>> {
        let members: Vec<Crew> =
            sqlx::query_as("SELECT id, first_name, last_name FROM crew ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(members.into_iter().map(CrewDetail::from).collect())
    }

    pub async fn create_crew(&self, request: CrewCreateRequest) -> AppResult<CrewDetail> {
        request.validate()?;

        let result = sqlx::query("INSERT INTO crew (first_name, last_name) VALUES (?, ?)")
            .bind(&request.first_name)
            .bind(&request.last_name)
            .execute(&self.pool)
            .await?;

        Ok(CrewDetail::from(Crew {
            id: result.last_insert_id() as i32,
            first_name: request.first_name,
            last_name: request.last_name,
        }))
    }

    async fn check_flight_request(&self, request: &FlightCreateRequest) -> AppResult<()> {
        if request.arrival_time <= request.departure_time {
            return Err(AppError::ValidationError(
                "arrival_time must be after departure_time".into(),
            ));
        }

        let route = sqlx::query("SELECT id FROM route WHERE id = ?")
            .bind(request.route_id)
            .fetch_optional(&self.pool)
            .await?;
        if route.is_none() {
            return Err(AppError::NotFound(format!("Route {} not found", request.route_id)));
        }

        let airplane = sqlx::query("SELECT id FROM airplane WHERE id = ?")
            .bind(request.airplane_id)
            .fetch_optional(&self.pool)
            .await?;
        if airplane.is_none() {
            return Err(AppError::NotFound(format!(
                "Airplane {} not found",
                request.airplane_id
            )));
        }

        for crew_id in &request.crew_ids {
            let member = sqlx::query("SELECT id FROM crew WHERE id = ?")
                .bind(crew_id)
                .fetch_optional(&self.pool)
                .await?;
            if member.is_none() {
                return Err(AppError::NotFound(format!("Crew member {} not found", crew_id)));
            }
        }

        Ok(())
    }

    // Two grouped lookups (crew per flight, type names per airplane)
    // instead of one query pair per row
    async fn assemble_details(&self, rows: Vec<FlightRow>) -> AppResult<Vec<FlightDetail>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let flight_ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let airplane_ids: Vec<i32> = rows.iter().map(|row| row.airplane_id).collect();

        let mut crew_query = QueryBuilder::new(
            "SELECT fc.flight_id, c.id, c.first_name, c.last_name \
             FROM flight_crew fc JOIN crew c ON c.id = fc.crew_id WHERE fc.flight_id IN (",
        );
        let mut ids = crew_query.separated(", ");
        for id in &flight_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY c.id");

        let crew_rows: Vec<FlightCrewRow> =
            crew_query.build_query_as().fetch_all(&self.pool).await?;

        let mut crew_by_flight: HashMap<i32, Vec<CrewDetail>> = HashMap::new();
        for row in crew_rows {
            crew_by_flight
                .entry(row.flight_id)
                .or_default()
                .push(CrewDetail::from(Crew {
                    id: row.id,
                    first_name: row.first_name,
                    last_name: row.last_name,
                }));
        }

        let mut type_query = QueryBuilder::new(
            "SELECT l.airplane_id, t.name \
             FROM airplane_type_link l JOIN airplane_type t ON t.id = l.type_id \
             WHERE l.airplane_id IN (",
        );
        let mut ids = type_query.separated(", ");
        for id in &airplane_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY t.name");

        let type_rows: Vec<AirplaneTypeNameRow> =
            type_query.build_query_as().fetch_all(&self.pool).await?;

        let mut types_by_airplane: HashMap<i32, Vec<String>> = HashMap::new();
        for row in type_rows {
            types_by_airplane.entry(row.airplane_id).or_default().push(row.name);
        }

        let details = rows
            .into_iter()
            .map(|row| FlightDetail {
                id: row.id,
                route: RouteDetail {
                    id: row.route_id,
                    source: Airport {
                        id: row.source_id,
                        name: row.source_name,
                        closest_big_city: row.source_city,
                    },
                    destination: Airport {
                        id: row.destination_id,
                        name: row.destination_name,
                        closest_big_city: row.destination_city,
                    },
                    distance: row.distance,
                },
                airplane: AirplaneSummary {
                    id: row.airplane_id,
                    name: row.airplane_name,
                    rows: row.rows,
                    seats_in_row: row.seats_in_row,
                    capacity: row.rows * row.seats_in_row,
                    types: types_by_airplane.get(&row.airplane_id).cloned().unwrap_or_default(),
                    image: row.image,
                },
                departure_time: row.departure_time,
                arrival_time: row.arrival_time,
                crew: crew_by_flight.remove(&row.id).unwrap_or_default(),
            })
            .collect();

        Ok(details)
    }
}
