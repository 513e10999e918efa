use crate::{
    error::Result,
    models::news::{AddCommentRequest, ReactionRequest, ReplyRequest},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/:id/comments", post(add_comment))
        .route("/:id/comments/:comment_id", delete(remove_comment))
        .route("/:id/comments/:comment_id/react", post(react_to_comment))
        .route("/:id/comments/:comment_id/replies", post(reply_to_comment))
        .route(
            "/:id/comments/:comment_id/replies/:reply_id",
            delete(remove_reply),
        )
        .route(
            "/:id/comments/:comment_id/replies/:reply_id/react",
            post(react_to_reply),
        )
}

/// Add a comment to an article
/// POST /api/news/:id/comments
pub async fn add_comment(
    State(app_state): State<Arc<AppState>>,
    Path(news_id): Path<String>,
    Json(request): Json<AddCommentRequest>,
) -> Result<Json<Value>> {
    let comment = app_state
        .comment_service
        .add_comment(&news_id, request)
        .await?;

    Ok(Json(json!({
        "message": "Comment added successfully",
        "success": true,
        "status": 200,
        "comment": comment
    })))
}

/// Remove a comment (unknown comment ids are a no-op)
/// DELETE /api/news/:id/comments/:comment_id
pub async fn remove_comment(
    State(app_state): State<Arc<AppState>>,
    Path((news_id, comment_id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let news = app_state
        .comment_service
        .remove_comment(&news_id, &comment_id)
        .await?;

    Ok(Json(json!({
        "message": "Comment removed successfully",
        "success": true,
        "status": 200,
        "news": news
    })))
}

/// Reply to a comment
/// POST /api/news/:id/comments/:comment_id/replies
pub async fn reply_to_comment(
    State(app_state): State<Arc<AppState>>,
    Path((news_id, comment_id)): Path<(String, String)>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<Value>> {
    let comment = app_state
        .comment_service
        .reply_to_comment(&news_id, &comment_id, request)
        .await?;

    Ok(Json(json!({
        "message": "Reply added successfully",
        "success": true,
        "status": 200,
        "comment": comment
    })))
}

/// Remove a reply from a comment (unknown reply ids are a no-op)
/// DELETE /api/news/:id/comments/:comment_id/replies/:reply_id
pub async fn remove_reply(
    State(app_state): State<Arc<AppState>>,
    Path((news_id, comment_id, reply_id)): Path<(String, String, String)>,
) -> Result<Json<Value>> {
    let news = app_state
        .comment_service
        .remove_reply(&news_id, &comment_id, &reply_id)
        .await?;

    Ok(Json(json!({
        "message": "Reply removed successfully",
        "success": true,
        "status": 200,
        "news": news
    })))
}

/// Like/dislike a comment
/// POST /api/news/:id/comments/:comment_id/react
pub async fn react_to_comment(
    State(app_state): State<Arc<AppState>>,
    Path((news_id, comment_id)): Path<(String, String)>,
    Json(request): Json<ReactionRequest>,
) -> Result<Json<Value>> {
    let comments = app_state
        .comment_service
        .react_to_comment(&news_id, &comment_id, request)
        .await?;

    Ok(Json(json!({
        "message": "The comment was successfully updated",
        "success": true,
        "status": 200,
        "comments": comments
    })))
}

/// Like/dislike a reply
/// POST /api/news/:id/comments/:comment_id/replies/:reply_id/react
pub async fn react_to_reply(
    State(app_state): State<Arc<AppState>>,
    Path((news_id, comment_id, reply_id)): Path<(String, String, String)>,
    Json(request): Json<ReactionRequest>,
) -> Result<Json<Value>> {
    let comments = app_state
        .comment_service
        .react_to_reply(&news_id, &comment_id, &reply_id, request)
        .await?;

    Ok(Json(json!({
        "message": "The reply was successfully updated",
        "success": true,
        "status": 200,
        "comments": comments
    })))
}
