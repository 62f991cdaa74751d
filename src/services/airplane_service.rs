use std::collections::HashMap;

use sqlx::{MySqlPool, QueryBuilder};
use validator::Validate;

use crate::models::airplane::{
    AirplaneCreateRequest, AirplaneDetail, AirplaneImageRequest, AirplaneSummary, AirplaneType,
    AirplaneTypeCreateRequest,
};
use crate::utils::error::{AppError, AppResult};

pub struct AirplaneService {
    pool: MySqlPool,
}

#[derive(Debug, sqlx::FromRow)]
struct AirplaneRow {
    id: i32,
    name: String,
    rows: i32,
    seats_in_row: i32,
    image: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct TypeNameRow {
    airplane_id: i32,
    name: String,
}

impl AirplaneService {
    pub fn new(pool: MySqlPool) -> Self {
        AirplaneService { pool }
    }

    pub async fn list_types(&self) -> AppResult<Vec<AirplaneType>> {
        let types: Vec<AirplaneType> =
            sqlx::query_as("SELECT id, name FROM airplane_type ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(types)
    }

    pub async fn create_type(&self, request: AirplaneTypeCreateRequest) -> AppResult<AirplaneType> {
        request.validate()?;

        let result = sqlx::query("INSERT INTO airplane_type (name) VALUES (?)")
            .bind(&request.name)
            .execute(&self.pool)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db_err)
                    if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
                {
                    AppError::Conflict(format!("Airplane type '{}' already exists", request.name))
                }
                _ => err.into(),
            })?;

        Ok(AirplaneType {
            id: result.last_insert_id() as i32,
            name: request.name,
        })
    }

    /// List airplanes, optionally filtered by a name substring and by type
    /// names (comma list in the API; an airplane matches if it has any of
    /// the given types).
    pub async fn list_airplanes(
        &self,
        name: Option<String>,
        types: Option<Vec<String>>,
    ) -> AppResult<Vec<AirplaneSummary>> {
        let mut query = QueryBuilder::new(
            "SELECT DISTINCT a.id, a.name, a.`rows` AS `rows`, a.seats_in_row, a.image FROM airplane a",
        );

        let type_names = types.filter(|names| !names.is_empty());
        if type_names.is_some() {
            query.push(
                " JOIN airplane_type_link l ON l.airplane_id = a.id \
                  JOIN airplane_type t ON t.id = l.type_id",
            );
        }

        let mut has_where = false;
        if let Some(name) = &name {
            query.push(" WHERE a.name LIKE ");
            query.push_bind(format!("%{}%", name));
            has_where = true;
        }
        if let Some(names) = &type_names {
            query.push(if has_where { " AND " } else { " WHERE " });
            query.push("t.name IN (");
            let mut bindings = query.separated(", ");
            for type_name in names {
                bindings.push_bind(type_name.clone());
            }
            bindings.push_unseparated(")");
        }
        query.push(" ORDER BY a.id");

        let rows: Vec<AirplaneRow> = query.build_query_as().fetch_all(&self.pool).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // One grouped lookup for the type labels of every listed airplane
        let mut type_query = QueryBuilder::new(
            "SELECT l.airplane_id, t.name \
             FROM airplane_type_link l JOIN airplane_type t ON t.id = l.type_id \
             WHERE l.airplane_id IN (",
        );
        let mut ids = type_query.separated(", ");
        for row in &rows {
            ids.push_bind(row.id);
        }
        ids.push_unseparated(") ORDER BY t.name");

        let type_rows: Vec<TypeNameRow> = type_query.build_query_as().fetch_all(&self.pool).await?;
        let mut types_by_airplane: HashMap<i32, Vec<String>> = HashMap::new();
        for row in type_rows {
            types_by_airplane.entry(row.airplane_id).or_default().push(row.name);
        }

        Ok(rows
            .into_iter()
            .map(|row| AirplaneSummary {
                id: row.id,
                name: row.name,
                rows: row.rows,
                seats_in_row: row.seats_in_row,
                capacity: row.rows * row.seats_in_row,
                types: types_by_airplane.remove(&row.id).unwrap_or_default(),
                image: row.image,
            })
            .collect())
    }

    pub async fn get_airplane(&self, airplane_id: i32) -> AppResult<AirplaneDetail> {
        let row: Option<AirplaneRow> = sqlx::query_as(
            "SELECT id, name, `rows` AS `rows`, seats_in_row, image FROM airplane WHERE id = ?",
        )
        .bind(airplane_id)
        .fetch_optional(&self.pool)
        .await?;
        let row = row.ok_or_else(|| {
            AppError::NotFound(format!("Airplane {} not found", airplane_id))
        })?;

        let types: Vec<AirplaneType> = sqlx::query_as(
            "SELECT t.id, t.name FROM airplane_type t \
             JOIN airplane_type_link l ON l.type_id = t.id \
             WHERE l.airplane_id = ? ORDER BY t.name",
        )
        .bind(airplane_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(AirplaneDetail {
            id: row.id,
            name: row.name,
            rows: row.rows,
            seats_in_row: row.seats_in_row,
            capacity: row.rows * row.seats_in_row,
            types,
            image: row.image,
        })
    }

    pub async fn create_airplane(&self, request: AirplaneCreateRequest) -> AppResult<AirplaneDetail> {
        request.validate()?;

        for type_id in &request.type_ids {
            let existing = sqlx::query("SELECT id FROM airplane_type WHERE id = ?")
                .bind(type_id)
                .fetch_optional(&self.pool)
                .await?;
            if existing.is_none() {
                return Err(AppError::NotFound(format!(
                    "Airplane type {} not found",
                    type_id
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO airplane (name, `rows`, seats_in_row) VALUES (?, ?, ?)",
        )
        .bind(&request.name)
        .bind(request.rows)
        .bind(request.seats_in_row)
        .execute(&mut *tx)
        .await?;

        let airplane_id = result.last_insert_id() as i32;

        for type_id in &request.type_ids {
            sqlx::query("INSERT INTO airplane_type_link (airplane_id, type_id) VALUES (?, ?)")
                .bind(airplane_id)
                .bind(type_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get_airplane(airplane_id).await
    }

    /// Attach the object-storage reference for an airplane's image. The
    /// image bytes themselves live in the external store.
    pub async fn set_image(
        &self,
        airplane_id: i32,
        request: AirplaneImageRequest,
    ) -> AppResult<AirplaneDetail> {
        request.validate()?;

        let existing = sqlx::query("SELECT id FROM airplane WHERE id = ?")
            .bind(airplane_id)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_none() {
            return Err(AppError::NotFound(format!(
                "Airplane {} not found",
                airplane_id
            )));
        }

        sqlx::query("UPDATE airplane SET image = ? WHERE id = ?")
            .bind(&request.image)
            .bind(airplane_id)
            .execute(&self.pool)
            .await?;

        self.get_airplane(airplane_id).await
    }
}
