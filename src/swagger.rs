use rocket_okapi::swagger_ui::SwaggerUIConfig;

/// Swagger UI backed by the document that `openapi_get_routes!` serves
/// under the API mount point.
pub fn swagger_ui() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/api/openapi.json".to_string(),
        deep_linking: true,
        ..Default::default()
    }
}
