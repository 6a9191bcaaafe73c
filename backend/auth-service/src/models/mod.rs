pub mod user;

pub use user::{
    AuthResponse, ChangePasswordRequest, LoginRequest, NewUser, PublicUser, RegisterRequest, User,
};
