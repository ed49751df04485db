pub mod auth_service;
pub mod college_service;

pub use auth_service::{AuthService, Claims};
