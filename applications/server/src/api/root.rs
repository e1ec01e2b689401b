/// Root greeting
use axum::Json;

pub const GREETING: &str = "Hello from Backend app!";

/// GET / - Greeting, as a JSON string
pub async fn greeting() -> Json<&'static str> {
    Json(GREETING)
}
