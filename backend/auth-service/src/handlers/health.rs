use actix_web::HttpResponse;

/// Liveness probe
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}
