use crate::{
    error::{AppError, Result},
    models::comment::*,
    models::news::{AddCommentRequest, News, ReactionRequest, ReplyRequest},
    services::Database,
    utils::validation::{require_field, validate_user_id},
};
use std::sync::Arc;
use tracing::{debug, info};

/// All comment-tree mutations follow the same shape: load the owning article,
/// edit the embedded tree in memory, save the whole document once.
#[derive(Clone)]
pub struct CommentService {
    db: Arc<Database>,
}

impl CommentService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn add_comment(&self, news_id: &str, request: AddCommentRequest) -> Result<Comment> {
        let username = require_field("username", request.username.as_deref())?;
        let user_id = require_field("userId", request.user_id.as_deref())?;
        let text = require_field("commentText", request.comment_text.as_deref())?;
        debug!("Adding comment to news {}", news_id);

        let mut news = self.load_news(news_id).await?;
        let comment = Comment::new(user_id, username, text);
        news.comments.push(comment.clone());

        self.save(news).await?;
        info!("Comment {} added to news {}", comment.id, news_id);
        Ok(comment)
    }

    pub async fn reply_to_comment(
        &self,
        news_id: &str,
        comment_id: &str,
        request: ReplyRequest,
    ) -> Result<Comment> {
        let user_id = require_field("userId", request.user_id.as_deref())?;
        validate_user_id(user_id)?;
        let username = require_field("username", request.username.as_deref())?;
        let text = request
            .reply_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::validation("Reply text cannot be empty"))?;
        debug!("Adding reply to comment {} on news {}", comment_id, news_id);

        let mut news = self.load_news(news_id).await?;
        let comment = news
            .find_comment_mut(comment_id)
            .ok_or_else(|| AppError::not_found("Comment"))?;

        comment.replies.push(Reply::new(
            user_id,
            username,
            text,
            request.reply_to_username.as_deref(),
        ));
        let updated_comment = comment.clone();

        self.save(news).await?;
        Ok(updated_comment)
    }

    /// Removes a comment by id; an unknown comment id is a no-op, not an
    /// error. Returns the article after the save.
    pub async fn remove_comment(&self, news_id: &str, comment_id: &str) -> Result<News> {
        debug!("Removing comment {} from news {}", comment_id, news_id);

        let mut news = self.load_news(news_id).await?;
        news.remove_comment(comment_id);
        self.save(news).await
    }

    pub async fn remove_reply(
        &self,
        news_id: &str,
        comment_id: &str,
        reply_id: &str,
    ) -> Result<News> {
        debug!("Removing reply {} from comment {} on news {}", reply_id, comment_id, news_id);

        let mut news = self.load_news(news_id).await?;
        let comment = news
            .find_comment_mut(comment_id)
            .ok_or_else(|| AppError::not_found("Comment"))?;
        comment.remove_reply(reply_id);
        self.save(news).await
    }

    /// Applies the like/dislike transition to a comment and returns the full
    /// comment list after the save.
    pub async fn react_to_comment(
        &self,
        news_id: &str,
        comment_id: &str,
        request: ReactionRequest,
    ) -> Result<Vec<Comment>> {
        let (user_id, username, action) = validate_reaction(&request)?;

        let mut news = self.load_news(news_id).await?;
        let comment = news
            .find_comment_mut(comment_id)
            .ok_or_else(|| AppError::not_found("Comment"))?;
        comment.apply_reaction(action, &user_id, &username);

        let saved = self.save(news).await?;
        Ok(saved.comments)
    }

    pub async fn react_to_reply(
        &self,
        news_id: &str,
        comment_id: &str,
        reply_id: &str,
        request: ReactionRequest,
    ) -> Result<Vec<Comment>> {
        let (user_id, username, action) = validate_reaction(&request)?;

        let mut news = self.load_news(news_id).await?;
        let comment = news
            .find_comment_mut(comment_id)
            .ok_or_else(|| AppError::not_found("Comment"))?;
        let reply = comment
            .find_reply_mut(reply_id)
            .ok_or_else(|| AppError::not_found("Reply"))?;
        reply.apply_reaction(action, &user_id, &username);

        let saved = self.save(news).await?;
        Ok(saved.comments)
    }

    async fn load_news(&self, news_id: &str) -> Result<News> {
        self.db
            .get_by_id("news", news_id)
            .await?
            .ok_or_else(|| AppError::not_found("News"))
    }

    async fn save(&self, news: News) -> Result<News> {
        let id = news.id.clone();
        self.db
            .update_by_id("news", &id, news)
            .await?
            .ok_or_else(|| AppError::internal("Failed to save news"))
    }
}

fn validate_reaction(request: &ReactionRequest) -> Result<(String, String, ReactionAction)> {
    let username = require_field("username", request.username.as_deref())?;
    let user_id = require_field("userId", request.user_id.as_deref())?;
    validate_user_id(user_id)?;

    let action = request
        .action
        .as_deref()
        .and_then(ReactionAction::parse)
        .ok_or_else(|| {
            AppError::validation(
                "Invalid action. Use 'like', 'dislike', 'clearLike', or 'clearDislike'",
            )
        })?;

    Ok((user_id.to_string(), username.to_string(), action))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction_request(action: &str) -> ReactionRequest {
        ReactionRequest {
            user_id: Some("u1".to_string()),
            username: Some("alice".to_string()),
            action: Some(action.to_string()),
        }
    }

    #[test]
    fn reaction_validation_accepts_known_actions() {
        for action in ["like", "dislike", "clearLike", "clearDislike"] {
            let (user_id, username, _) = validate_reaction(&reaction_request(action)).unwrap();
            assert_eq!(user_id, "u1");
            assert_eq!(username, "alice");
        }
    }

    #[test]
    fn reaction_validation_rejects_bad_input() {
        assert!(validate_reaction(&reaction_request("upvote")).is_err());

        let mut request = reaction_request("like");
        request.username = None;
        assert!(validate_reaction(&request).is_err());

        let mut request = reaction_request("like");
        request.user_id = Some("not a valid id!".to_string());
        assert!(validate_reaction(&request).is_err());

        let mut request = reaction_request("like");
        request.action = None;
        assert!(validate_reaction(&request).is_err());
    }
}
