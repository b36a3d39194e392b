//! Authentication: token issuance and admin-route middleware

pub mod admin_auth;
pub mod token;

pub use admin_auth::Identity;
