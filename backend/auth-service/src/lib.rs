//! HRM Auth Service
//!
//! Registration, login and profile endpoints issuing HS256 bearer tokens.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod security;
pub mod telemetry;

use std::sync::Arc;

use crypto_core::TokenCodec;

pub use config::Config;
pub use db::UserRepository;
pub use error::{AuthError, AuthResult};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub codec: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>, codec: Arc<TokenCodec>) -> Self {
        Self { users, codec }
    }
}
