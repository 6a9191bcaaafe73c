pub mod auth;
pub mod health;

pub use auth::{change_password, login, logout, me, register};
pub use health::health;
