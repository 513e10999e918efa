pub mod comment;
pub mod database;
pub mod media;
pub mod news;

pub use comment::CommentService;
pub use database::Database;
pub use media::MediaService;
pub use news::NewsService;
