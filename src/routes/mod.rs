pub mod comments;
pub mod news;
