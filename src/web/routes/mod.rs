pub mod admin;
pub mod auth;
pub mod businesses;
pub mod favorites;
pub mod reviews;
