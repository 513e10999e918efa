use crate::{
    config::Config,
    services::{CommentService, NewsService},
};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub news_service: NewsService,
    pub comment_service: CommentService,
}

impl AppState {
    pub fn is_production(&self) -> bool {
        self.config.is_production()
    }
}
