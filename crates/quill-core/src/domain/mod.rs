//! Domain entities.

pub mod post;
pub mod user;

pub use post::Post;
pub use user::AdminUser;
