use airport_api::{
    models::airplane::{AirplaneCreateRequest, AirplaneImageRequest, AirplaneTypeCreateRequest},
    services::airplane_service::AirplaneService,
    utils::error::AppError,
};
use async_trait::async_trait;
use ctor::dtor;
use sqlx::mysql::MySqlPool as Pool;
use test_context::{test_context, AsyncTestContext};

mod common {
    pub mod test_utils;
}
use common::test_utils::{self, TestDb};

struct AirplaneServiceContext {
    pool: Pool,
    airplane_service: AirplaneService,
}

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

#[async_trait]
impl AsyncTestContext for AirplaneServiceContext {
    async fn setup() -> Self {
        let pool = TestDb::get_instance()
            .await
            .expect("Failed to get test database instance");

        let airplane_service = AirplaneService::new(pool.clone());

        AirplaneServiceContext { pool, airplane_service }
    }

    async fn teardown(self) {
        let _ = sqlx::query("SELECT 1").execute(&self.pool).await;
    }
}

#[test_context(AirplaneServiceContext)]
#[tokio::test]
async fn type_filter_returns_the_union_of_matches(ctx: &AirplaneServiceContext) {
    let boeing = test_utils::create_airplane_type(&ctx.pool, "Boeing").await.unwrap();
    let airbus = test_utils::create_airplane_type(&ctx.pool, "Airbus").await.unwrap();
    let embraer = test_utils::create_airplane_type(&ctx.pool, "Embraer").await.unwrap();

    let b737 = test_utils::create_airplane(&ctx.pool, "B737", 30, 6).await.unwrap();
    test_utils::link_airplane_type(&ctx.pool, b737, boeing).await.unwrap();
    let a320 = test_utils::create_airplane(&ctx.pool, "A320", 28, 6).await.unwrap();
    test_utils::link_airplane_type(&ctx.pool, a320, airbus).await.unwrap();
    let e190 = test_utils::create_airplane(&ctx.pool, "E190", 25, 4).await.unwrap();
    test_utils::link_airplane_type(&ctx.pool, e190, embraer).await.unwrap();
    // No type at all; must never match a type filter
    test_utils::create_airplane(&ctx.pool, "Untyped", 10, 2).await.unwrap();

    let filtered = ctx
        .airplane_service
        .list_airplanes(None, Some(vec!["Boeing".to_string(), "Airbus".to_string()]))
        .await
        .expect("listing failed");

    let names: Vec<&str> = filtered.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["B737", "A320"]);
}

#[test_context(AirplaneServiceContext)]
#[tokio::test]
async fn name_filter_matches_substrings(ctx: &AirplaneServiceContext) {
    test_utils::create_airplane(&ctx.pool, "Dreamliner 787", 40, 9).await.unwrap();
    test_utils::create_airplane(&ctx.pool, "Dreamliner 789", 42, 9).await.unwrap();
    test_utils::create_airplane(&ctx.pool, "Jumbo 747", 50, 10).await.unwrap();

    let filtered = ctx
        .airplane_service
        .list_airplanes(Some("Dreamliner".to_string()), None)
        .await
        .expect("listing failed");

    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|a| a.name.contains("Dreamliner")));
}

#[test_context(AirplaneServiceContext)]
#[tokio::test]
async fn detail_shape_nests_full_type_objects(ctx: &AirplaneServiceContext) {
    let created = ctx
        .airplane_service
        .create_type(AirplaneTypeCreateRequest { name: "Widebody".to_string() })
        .await
        .expect("type creation failed");

    let airplane = ctx
        .airplane_service
        .create_airplane(AirplaneCreateRequest {
            name: "Detail Jet".to_string(),
            rows: 30,
            seats_in_row: 6,
            type_ids: vec![created.id],
        })
        .await
        .expect("airplane creation failed");

    assert_eq!(airplane.capacity, 180);
    assert_eq!(airplane.types.len(), 1);
    assert_eq!(airplane.types[0].name, "Widebody");

    // List shape carries the same association as a plain label
    let listed = ctx
        .airplane_service
        .list_airplanes(Some("Detail Jet".to_string()), None)
        .await
        .expect("listing failed");
    assert_eq!(listed[0].types, vec!["Widebody".to_string()]);
}

#[test_context(AirplaneServiceContext)]
#[tokio::test]
async fn duplicate_type_name_is_a_conflict(ctx: &AirplaneServiceContext) {
    ctx.airplane_service
        .create_type(AirplaneTypeCreateRequest { name: "Turboprop".to_string() })
        .await
        .expect("first creation failed");

    let result = ctx
        .airplane_service
        .create_type(AirplaneTypeCreateRequest { name: "Turboprop".to_string() })
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[test_context(AirplaneServiceContext)]
#[tokio::test]
async fn nonpositive_geometry_is_rejected(ctx: &AirplaneServiceContext) {
    let result = ctx
        .airplane_service
        .create_airplane(AirplaneCreateRequest {
            name: "Broken Jet".to_string(),
            rows: 0,
            seats_in_row: 6,
            type_ids: vec![],
        })
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[test_context(AirplaneServiceContext)]
#[tokio::test]
async fn airplane_without_any_type_is_rejected(ctx: &AirplaneServiceContext) {
    let result = ctx
        .airplane_service
        .create_airplane(AirplaneCreateRequest {
            name: "Typeless Jet".to_string(),
            rows: 20,
            seats_in_row: 4,
            type_ids: vec![],
        })
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[test_context(AirplaneServiceContext)]
#[tokio::test]
async fn image_reference_is_attached_to_the_airplane(ctx: &AirplaneServiceContext) {
    let airplane_id = test_utils::create_airplane(&ctx.pool, "Image Jet", 12, 4).await.unwrap();

    let updated = ctx
        .airplane_service
        .set_image(
            airplane_id,
            AirplaneImageRequest { image: "upload/airplanes/image-jet.jpg".to_string() },
        )
        .await
        .expect("image update failed");

    assert_eq!(updated.image.as_deref(), Some("upload/airplanes/image-jet.jpg"));

    let missing = ctx
        .airplane_service
        .set_image(999_999, AirplaneImageRequest { image: "x.jpg".to_string() })
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
