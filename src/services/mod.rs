pub mod auth_service;
pub mod business_service;
pub mod favorite_service;
pub mod review_service;
pub mod search_service;
