#[macro_use]
extern crate rocket;
extern crate rocket_okapi;

use dotenv::dotenv;
use rocket::fairing::AdHoc;
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::make_swagger_ui;

use airport_api::db::Database;
use airport_api::routes;
use airport_api::services::airplane_service::AirplaneService;
use airport_api::services::airport_service::AirportService;
use airport_api::services::flight_service::FlightService;
use airport_api::services::order_service::OrderService;
use airport_api::services::user_service::UserService;
use airport_api::swagger::swagger_ui;

#[launch]
async fn rocket() -> _ {
    dotenv().ok();

    // Connect to the database
    let database = Database::new(
        &std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
    )
    .await
    .expect("Failed to connect to database");
    let pool = database.get_pool().clone();

    rocket::build()
        .manage(UserService::new(pool.clone()))
        .manage(AirportService::new(pool.clone()))
        .manage(AirplaneService::new(pool.clone()))
        .manage(FlightService::new(pool.clone()))
        .manage(OrderService::new(pool))
        .mount(
            "/api",
            openapi_get_routes![
                airport_api::routes::user_route::register,
                airport_api::routes::user_route::login,
                airport_api::routes::airport_route::list_airports,
                airport_api::routes::airport_route::create_airport,
                airport_api::routes::airport_route::list_routes,
                airport_api::routes::airport_route::create_route,
                airport_api::routes::airplane_route::list_airplane_types,
                airport_api::routes::airplane_route::create_airplane_type,
                airport_api::routes::airplane_route::list_airplanes,
                airport_api::routes::airplane_route::get_airplane,
                airport_api::routes::airplane_route::create_airplane,
                airport_api::routes::airplane_route::upload_airplane_image,
                airport_api::routes::airplane_route::update_airplane_not_allowed,
                airport_api::routes::airplane_route::delete_airplane_not_allowed,
                airport_api::routes::flight_route::list_flights,
                airport_api::routes::flight_route::get_flight,
                airport_api::routes::flight_route::create_flight,
                airport_api::routes::flight_route::update_flight,
                airport_api::routes::flight_route::delete_flight,
                airport_api::routes::flight_route::list_crew,
                airport_api::routes::flight_route::create_crew,
                airport_api::routes::order_route::create_order,
                airport_api::routes::order_route::list_orders,
                airport_api::routes::order_route::update_order_not_allowed,
                airport_api::routes::order_route::delete_order_not_allowed,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .register(
            "/",
            catchers![
                routes::unauthorized,
                routes::forbidden,
                routes::not_found,
                routes::method_not_allowed,
            ],
        )
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
