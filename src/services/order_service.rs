use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::{MySqlPool, QueryBuilder};

use crate::models::airplane::SeatGeometry;
use crate::models::flight::FlightDetail;
use crate::models::order::{
    normalize_page, OrderCreateRequest, OrderDetail, OrderPage, Ticket, TicketDetail,
    TicketRequest,
};
use crate::services::flight_service::FlightService;
use crate::utils::error::{AppError, AppResult};

pub struct OrderService {
    pool: MySqlPool,
    flight_service: FlightService,
}

#[derive(Debug, sqlx::FromRow)]
struct FlightGeometryRow {
    id: i32,
    rows: i32,
    seats_in_row: i32,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    created_at: NaiveDateTime,
}

impl OrderService {
    pub fn new(pool: MySqlPool) -> Self {
        OrderService {
            flight_service: FlightService::new(pool.clone()),
            pool,
        }
    }

    /// Books an order: validates every ticket request against its flight's
    /// seat geometry, then persists the order and all tickets in one
    /// transaction. Nothing is written unless everything passes, and the
    /// UNIQUE (flight_id, row, seat) constraint settles concurrent claims
    /// on the same seat at commit time.
    pub async fn create_order(
        &self,
        user_id: i32,
        request: OrderCreateRequest,
    ) -> AppResult<OrderDetail> {
        if request.tickets.is_empty() {
            return Err(AppError::EmptyOrder);
        }

        // Resolve each referenced flight's geometry once, then validate the
        // whole batch in memory
        let geometries = self.flight_geometries(&request.tickets).await?;

        for (index, ticket) in request.tickets.iter().enumerate() {
            let geometry = geometries.get(&ticket.flight_id).ok_or_else(|| {
                AppError::NotFound(format!("Flight {} not found", ticket.flight_id))
            })?;

            geometry
                .validate(ticket.row, ticket.seat)
                .map_err(|err| AppError::InvalidSeat {
                    ticket: index,
                    reason: err.to_string(),
                })?;
        }

        let mut tx = self.pool.begin().await?;

        let created_at = chrono::Utc::now().naive_utc();
        let result = sqlx::query("INSERT INTO orders (user_id, created_at) VALUES (?, ?)")
            .bind(user_id)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;

        let order_id = result.last_insert_id() as i32;

        for ticket in &request.tickets {
            sqlx::query(
                "INSERT INTO ticket (flight_id, order_id, `row`, seat) VALUES (?, ?, ?, ?)",
            )
            .bind(ticket.flight_id)
            .bind(order_id)
            .bind(ticket.row)
            .bind(ticket.seat)
            .execute(&mut *tx)
            .await
            .map_err(|err| Self::map_ticket_insert_error(err, ticket))?;
        }

        tx.commit().await?;

        self.order_detail(order_id).await
    }

    /// Lists the calling user's orders, newest first. Only ever scoped to
    /// the given user id.
    pub async fn list_orders(
        &self,
        user_id: i32,
        page: Option<u32>,
        size: Option<u32>,
    ) -> AppResult<OrderPage> {
        let (page, size) = normalize_page(page, size);

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let offset = (page as i64 - 1) * size as i64;
        let order_rows: Vec<OrderRow> = sqlx::query_as(
            "SELECT id, created_at FROM orders WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let orders = self.render_orders(order_rows).await?;

        Ok(OrderPage {
            page,
            size,
            total: total.0,
            orders,
        })
    }

    async fn order_detail(&self, order_id: i32) -> AppResult<OrderDetail> {
        let row: Option<OrderRow> = sqlx::query_as("SELECT id, created_at FROM orders WHERE id = ?")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        let row = row.ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        let mut orders = self.render_orders(vec![row]).await?;
        Ok(orders.remove(0))
    }

    // Projection: every ticket carries its fully nested flight
    async fn render_orders(&self, order_rows: Vec<OrderRow>) -> AppResult<Vec<OrderDetail>> {
        if order_rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut ticket_query = QueryBuilder::new(
            "SELECT id, flight_id, order_id, `row`, seat FROM ticket WHERE order_id IN (",
        );
        let mut ids = ticket_query.separated(", ");
        for row in &order_rows {
            ids.push_bind(row.id);
        }
        ids.push_unseparated(") ORDER BY id");

        let tickets: Vec<Ticket> = ticket_query.build_query_as().fetch_all(&self.pool).await?;

        let mut flight_ids: Vec<i32> = tickets.iter().map(|ticket| ticket.flight_id).collect();
        flight_ids.sort_unstable();
        flight_ids.dedup();
        let flights: HashMap<i32, FlightDetail> =
            self.flight_service.flights_by_ids(&flight_ids).await?;

        let mut tickets_by_order: HashMap<i32, Vec<TicketDetail>> = HashMap::new();
        for ticket in tickets {
            let flight = flights.get(&ticket.flight_id).ok_or_else(|| {
                AppError::NotFound(format!("Flight {} not found", ticket.flight_id))
            })?;
            tickets_by_order
                .entry(ticket.order_id)
                .or_default()
                .push(TicketDetail {
                    id: ticket.id,
                    row: ticket.row,
                    seat: ticket.seat,
                    flight: flight.clone(),
                });
        }

        Ok(order_rows
            .into_iter()
            .map(|row| OrderDetail {
                id: row.id,
                created_at: row.created_at,
                tickets: tickets_by_order.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    async fn flight_geometries(
        &self,
        tickets: &[TicketRequest],
    ) -> AppResult<HashMap<i32, SeatGeometry>> {
        let mut flight_ids: Vec<i32> = tickets.iter().map(|ticket| ticket.flight_id).collect();
        flight_ids.sort_unstable();
        flight_ids.dedup();

        let mut query = QueryBuilder::new(
            "SELECT f.id, a.`rows` AS `rows`, a.seats_in_row \
             FROM flight f JOIN airplane a ON a.id = f.airplane_id WHERE f.id IN (",
        );
        let mut ids = query.separated(", ");
        for id in &flight_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");

        let rows: Vec<FlightGeometryRow> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.id,
                    SeatGeometry {
                        rows: row.rows,
                        seats_in_row: row.seats_in_row,
                    },
                )
            })
            .collect())
    }

    // A unique-violation on the ticket insert means another transaction
    // already claimed this exact seat; the whole order rolls back
    fn map_ticket_insert_error(err: sqlx::Error, ticket: &TicketRequest) -> AppError {
        match &err {
            sqlx::Error::Database(db_err)
                if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                AppError::SeatTaken {
                    flight_id: ticket.flight_id,
                    row: ticket.row,
                    seat: ticket.seat,
                }
            }
            _ => err.into(),
        }
    }
}
