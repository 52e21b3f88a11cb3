pub mod business_repo;
pub mod favorite_repo;
pub mod review_repo;
pub mod user_repo;
