use crate::{
    error::Result,
    models::media::PhotoUpload,
    models::news::{CreateNewsForm, UpdateNewsForm, UpdateVisibilityRequest},
    state::AppState,
    utils::text::{parse_index_csv, split_descriptions},
};
use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_news).post(create_news))
        .route("/admin", get(admin_list_news))
        .route("/:id", get(get_news).put(update_news).delete(delete_news))
        .route("/:id/visibility", patch(update_visibility))
        .route("/:id/view", patch(increase_viewer))
        .merge(super::comments::router())
}

/// Create a news article
/// POST /api/news
pub async fn create_news(
    State(app_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>)> {
    let form = parse_create_form(multipart).await?;
    let news = app_state.news_service.create_news(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Successfully created news",
            "success": true,
            "status": 201,
            "data": news
        })),
    ))
}

/// List visible news articles
/// GET /api/news
pub async fn list_news(State(app_state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let news = app_state.news_service.list_visible().await?;

    Ok(Json(json!({
        "message": "successfully",
        "success": true,
        "status": 200,
        "listNews": news
    })))
}

/// List every news article, hidden ones included
/// GET /api/news/admin
pub async fn admin_list_news(State(app_state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let news = app_state.news_service.list_all().await?;

    Ok(Json(json!({
        "message": "successfully",
        "success": true,
        "status": 200,
        "listNews": news
    })))
}

/// Fetch one article by id (no visibility filtering)
/// GET /api/news/:id
pub async fn get_news(
    State(app_state): State<Arc<AppState>>,
    Path(news_id): Path<String>,
) -> Result<Json<Value>> {
    let news = app_state.news_service.get_news(&news_id).await?;

    Ok(Json(json!({
        "message": "get successfully",
        "success": true,
        "status": 200,
        "news": news
    })))
}

/// Update an article and reconcile its photo gallery
/// PUT /api/news/:id
pub async fn update_news(
    State(app_state): State<Arc<AppState>>,
    Path(news_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Value>> {
    debug!("Updating news: {}", news_id);

    let form = parse_update_form(multipart).await?;
    let updated = app_state.news_service.update_news(&news_id, form).await?;

    Ok(Json(json!({
        "message": "Update completed successfully",
        "success": true,
        "status": 200,
        "updatedNews": updated
    })))
}

/// Delete an article and release its hosted photo assets
/// DELETE /api/news/:id
pub async fn delete_news(
    State(app_state): State<Arc<AppState>>,
    Path(news_id): Path<String>,
) -> Result<Json<Value>> {
    app_state.news_service.delete_news(&news_id).await?;

    Ok(Json(json!({
        "message": "deleted successfully",
        "success": true,
        "status": 200
    })))
}

/// Toggle article visibility
/// PATCH /api/news/:id/visibility
pub async fn update_visibility(
    State(app_state): State<Arc<AppState>>,
    Path(news_id): Path<String>,
    Json(request): Json<UpdateVisibilityRequest>,
) -> Result<Json<Value>> {
    let updated = app_state
        .news_service
        .set_visibility(&news_id, request)
        .await?;

    Ok(Json(json!({
        "message": "Visibility status updated successfully",
        "success": true,
        "status": 200,
        "result": updated
    })))
}

/// Increment the view counter
/// PATCH /api/news/:id/view
pub async fn increase_viewer(
    State(app_state): State<Arc<AppState>>,
    Path(news_id): Path<String>,
) -> Result<Json<Value>> {
    let updated = app_state.news_service.increment_viewer(&news_id).await?;

    Ok(Json(json!({
        "message": "Viewer count updated",
        "success": true,
        "status": 200,
        "updatedNews": updated
    })))
}

async fn parse_create_form(mut multipart: Multipart) -> Result<CreateNewsForm> {
    let mut form = CreateNewsForm::default();
    let mut descriptions = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = Some(field.text().await?),
            "category" => form.category = Some(field.text().await?),
            "description" | "description[]" => descriptions.push(field.text().await?),
            "photos" | "photos[]" => form.photos.push(read_photo(field).await?),
            _ => {}
        }
    }

    form.descriptions = split_descriptions(descriptions);
    Ok(form)
}

async fn parse_update_form(mut multipart: Multipart) -> Result<UpdateNewsForm> {
    let mut form = UpdateNewsForm::default();
    let mut remove_indices = None;
    let mut update_indices = None;
    let mut description_remove_index = None;
    let mut description_update_index = None;
    let mut photo_remove_index = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = Some(field.text().await?),
            "category" => form.category = Some(field.text().await?),
            "updatedAt" => form.updated_at = Some(field.text().await?),
            "removeIndices" => remove_indices = Some(field.text().await?),
            "updateIndices" => update_indices = Some(field.text().await?),
            "descriptionRemoveIndex" => description_remove_index = Some(field.text().await?),
            "descriptionUpdateIndex" => description_update_index = Some(field.text().await?),
            "photoRemoveIndex" => photo_remove_index = Some(field.text().await?),
            "updateDescription" | "updateDescription[]" => {
                form.update_descriptions.push(field.text().await?)
            }
            "addDescription" | "addDescription[]" => {
                form.add_descriptions.push(field.text().await?)
            }
            "updatePhoto" | "updatePhoto[]" => form.update_photos.push(read_photo(field).await?),
            "addPhoto" | "addPhoto[]" => form.add_photos.push(read_photo(field).await?),
            _ => {}
        }
    }

    form.remove_indices = parse_index_csv("removeIndices", remove_indices.as_deref())?;
    form.update_indices = parse_index_csv("updateIndices", update_indices.as_deref())?;
    form.description_remove_index =
        parse_index_csv("descriptionRemoveIndex", description_remove_index.as_deref())?;
    form.description_update_index =
        parse_index_csv("descriptionUpdateIndex", description_update_index.as_deref())?;
    form.photo_remove_index = parse_index_csv("photoRemoveIndex", photo_remove_index.as_deref())?;
    Ok(form)
}

async fn read_photo(field: Field<'_>) -> Result<PhotoUpload> {
    let file_name = field.file_name().unwrap_or("photo").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = field.bytes().await?.to_vec();

    Ok(PhotoUpload {
        file_name,
        content_type,
        data,
    })
}
