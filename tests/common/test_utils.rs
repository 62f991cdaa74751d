#![allow(dead_code)]

use dotenv::dotenv;
use once_cell::sync::OnceCell;
use sqlx::mysql::MySqlPool as Pool;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::Error;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

static TEST_DB: OnceCell<Mutex<Option<TestDb>>> = OnceCell::new();
static DB_NAME: OnceCell<String> = OnceCell::new();

#[derive(Debug)]
pub struct TestDb {
    pub pool: Pool,
    pub db_name: String,
}

// Create a connection pool without a database, used to create a new database
async fn create_connection_pool_without_db() -> Result<Pool, Error> {
    dotenv().ok();
    let db_url = env::var("ADMIN_DATABASE_URL")
        .expect("ADMIN_DATABASE_URL must be set in .env file");

    let base_url = db_url.split('/').collect::<Vec<&str>>()[..3].join("/");

    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(&base_url)
        .await
}

// Create a connection pool with a test database
async fn create_connection_pool_with_db(db_name: &str) -> Result<Pool, Error> {
    dotenv().ok();
    let db_url = env::var("ADMIN_DATABASE_URL")
        .expect("ADMIN_DATABASE_URL must be set in .env file");

    let base_url = db_url.split('/').collect::<Vec<&str>>()[..3].join("/");

    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(&format!("{}/{}", base_url, db_name))
        .await
}

impl TestDb {
    // Setup shared by every test in one binary: the database is created
    // once per run and dropped at process exit. Each caller gets a pool
    // opened on its own runtime — `#[tokio::test]` runtimes are torn down
    // per test, so a cached pool's connections would outlive the reactor
    // they were registered with and hang every later test.
    pub async fn get_instance() -> Result<Pool, Error> {
        let test_db = TEST_DB.get_or_init(|| Mutex::new(None));
        let mut guard = test_db.lock().await;

        if guard.is_none() {
            *guard = Some(Self::setup_database().await?);
        }

        let db_name = guard.as_ref().unwrap().db_name.clone();
        drop(guard);

        create_connection_pool_with_db(&db_name).await
    }

    async fn setup_database() -> Result<Self, Error> {
        // Unique database name per test binary run; the pid keeps parallel
        // test binaries from colliding
        let db_name = DB_NAME
            .get_or_init(|| {
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_secs();
                format!("airport_test_{}_{}", std::process::id(), timestamp)
            })
            .clone();

        let admin_pool = create_connection_pool_without_db().await?;

        sqlx::query(&format!("CREATE DATABASE {}", db_name))
            .execute(&admin_pool)
            .await?;

        let pool = create_connection_pool_with_db(&db_name).await?;
        Self::create_tables(&pool).await?;

        Ok(Self { pool, db_name })
    }

    async fn create_tables(pool: &Pool) -> Result<(), Error> {
        // Same DDL the deployment uses, uniqueness constraint included
        let schema = include_str!("../../schema.sql");

        for statement in schema.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            sqlx::query(statement).execute(pool).await?;
        }

        Ok(())
    }

    // Teardown function to drop the database after the test run
    pub async fn cleanup_database() -> Result<(), Error> {
        if let Some(test_db) = TEST_DB.get() {
            if let Some(db) = test_db.lock().await.take() {
                let admin_pool = create_connection_pool_without_db().await?;
                sqlx::query(&format!("DROP DATABASE IF EXISTS {}", db.db_name))
                    .execute(&admin_pool)
                    .await?;
            }
        }
        Ok(())
    }

    // Blocking wrapper for use in a #[dtor] hook, which runs outside any
    // async context
    pub fn cleanup_database_sync() -> Result<(), Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Io)?;
        runtime.block_on(Self::cleanup_database())
    }
}

// Fixture helpers shared by the service test files

pub async fn create_airport(pool: &Pool, name: &str, city: &str) -> anyhow::Result<i32> {
    let result = sqlx::query("INSERT INTO airport (name, closest_big_city) VALUES (?, ?)")
        .bind(name)
        .bind(city)
        .execute(pool)
        .await?;
    Ok(result.last_insert_id() as i32)
}

pub async fn create_route(
    pool: &Pool,
    source_id: i32,
    destination_id: i32,
    distance: i32,
) -> anyhow::Result<i32> {
    let result =
        sqlx::query("INSERT INTO route (source_id, destination_id, distance) VALUES (?, ?, ?)")
            .bind(source_id)
            .bind(destination_id)
            .bind(distance)
            .execute(pool)
            .await?;
    Ok(result.last_insert_id() as i32)
}

pub async fn create_airplane(
    pool: &Pool,
    name: &str,
    rows: i32,
    seats_in_row: i32,
) -> anyhow::Result<i32> {
    let result = sqlx::query("INSERT INTO airplane (name, `rows`, seats_in_row) VALUES (?, ?, ?)")
        .bind(name)
        .bind(rows)
        .bind(seats_in_row)
        .execute(pool)
        .await?;
    Ok(result.last_insert_id() as i32)
}

pub async fn create_airplane_type(pool: &Pool, name: &str) -> anyhow::Result<i32> {
    let result = sqlx::query("INSERT INTO airplane_type (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;
    Ok(result.last_insert_id() as i32)
}

pub async fn link_airplane_type(pool: &Pool, airplane_id: i32, type_id: i32) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO airplane_type_link (airplane_id, type_id) VALUES (?, ?)")
        .bind(airplane_id)
        .bind(type_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn create_crew(pool: &Pool, first_name: &str, last_name: &str) -> anyhow::Result<i32> {
    let result = sqlx::query("INSERT INTO crew (first_name, last_name) VALUES (?, ?)")
        .bind(first_name)
        .bind(last_name)
        .execute(pool)
        .await?;
    Ok(result.last_insert_id() as i32)
}

pub async fn assign_crew(pool: &Pool, flight_id: i32, crew_id: i32) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO flight_crew (flight_id, crew_id) VALUES (?, ?)")
        .bind(flight_id)
        .bind(crew_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn create_flight(
    pool: &Pool,
    route_id: i32,
    airplane_id: i32,
    departure_time: &str,
    arrival_time: &str,
) -> anyhow::Result<i32> {
    let result = sqlx::query(
        "INSERT INTO flight (route_id, airplane_id, departure_time, arrival_time) VALUES (?, ?, ?, ?)",
    )
    .bind(route_id)
    .bind(airplane_id)
    .bind(departure_time)
    .bind(arrival_time)
    .execute(pool)
    .await?;
    Ok(result.last_insert_id() as i32)
}

/// Airports + route + airplane + one flight, ready for booking tests;
/// returns the flight id.
pub async fn booking_fixture(pool: &Pool, rows: i32, seats_in_row: i32) -> anyhow::Result<i32> {
    let source = create_airport(pool, "Heathrow", "London").await?;
    let destination = create_airport(pool, "JFK", "New York").await?;
    let route = create_route(pool, source, destination, 5540).await?;
    let airplane = create_airplane(pool, "Test Jet", rows, seats_in_row).await?;
    create_flight(
        pool,
        route,
        airplane,
        "2025-06-01 10:00:00",
        "2025-06-01 18:00:00",
    )
    .await
}
