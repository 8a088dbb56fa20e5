pub mod book;
pub mod chapter;
pub mod order;
pub mod user;

pub use book::BookDto;
pub use chapter::ChapterDto;
pub use order::OrderDto;
pub use user::{OwnProfile, ProfileView, PublicProfile};
