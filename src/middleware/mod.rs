pub mod auth;
pub mod path;
pub mod validation;
