/// Route definitions and middleware setup
use actix_middleware::JwtAuthMiddleware;
use actix_web::web;
use error_types::ServiceError;

use crate::{handlers, AppState};

/// Register app data and every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig, state: AppState) {
    let codec = state.codec.clone();

    cfg.app_data(web::Data::new(state))
        .app_data(web::Data::from(codec.clone()))
        .app_data(json_config())
        .route("/health", web::get().to(handlers::health))
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(handlers::register))
                .route("/login", web::post().to(handlers::login))
                .service(
                    web::resource("/logout")
                        .wrap(JwtAuthMiddleware::optional(codec.clone()))
                        .route(web::post().to(handlers::logout)),
                )
                .service(
                    web::resource("/me")
                        .wrap(JwtAuthMiddleware::required(codec.clone()))
                        .route(web::get().to(handlers::me)),
                )
                .service(
                    web::resource("/password")
                        .wrap(JwtAuthMiddleware::required(codec))
                        .route(web::put().to(handlers::change_password)),
                ),
        );
}

/// Render JSON body errors in the standard envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected request body");
        ServiceError::invalid_input(format!("Invalid request body: {err}")).into()
    })
}
