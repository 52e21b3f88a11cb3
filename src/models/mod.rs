pub mod businesses;
pub mod favorites;
pub mod reviews;
pub mod users;

pub use businesses::{BusinessRow, BusinessView};
pub use favorites::{FavoriteBusinessRow, FavoriteRow, FavoriteView};
pub use reviews::{AdminReviewRow, ReviewRow, ReviewWithUserRow};
pub use users::{UserRow, UserView};
