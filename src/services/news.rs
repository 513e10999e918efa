use crate::{
    error::{AppError, Result},
    models::news::*,
    services::{media::ImageStore, Database},
    utils::text::{photo_public_id, sanitize_title},
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

#[derive(Clone)]
pub struct NewsService {
    db: Arc<Database>,
    media: Arc<dyn ImageStore>,
    upload_folder: String,
}

impl NewsService {
    pub async fn new(db: Arc<Database>, media: Arc<dyn ImageStore>) -> Result<Self> {
        let upload_folder = db.config.media_upload_folder.clone();
        Ok(Self {
            db,
            media,
            upload_folder,
        })
    }

    /// Creates an article from a multipart form. Every supplied photo is
    /// uploaded to the image host and paired positionally with its
    /// description; at least one photo is required.
    pub async fn create_news(&self, form: CreateNewsForm) -> Result<News> {
        let (title, category) = validate_create_form(&form)?;
        debug!("Creating news article: {}", title);

        let sanitized = sanitize_title(&title);
        let mut news = News::new(&title, &category);

        for (i, photo) in form.photos.iter().enumerate() {
            let public_id = photo_public_id(&self.upload_folder, &sanitized, i);
            let uploaded = self
                .media
                .upload(
                    photo.data.clone(),
                    &photo.file_name,
                    &self.upload_folder,
                    &public_id,
                )
                .await?;

            news.photos_description.push(PhotoEntry {
                photo: uploaded.secure_url,
                photo_cloudinary_id: uploaded.public_id,
                description: form.descriptions.get(i).cloned().unwrap_or_default(),
            });
        }

        let created = self.db.create("news", news).await?;
        info!("Created news article: {}", created.id);
        Ok(created)
    }

    /// Any article is retrievable by id, visible or not.
    pub async fn get_news(&self, news_id: &str) -> Result<News> {
        self.db
            .get_by_id("news", news_id)
            .await?
            .ok_or_else(|| AppError::not_found("News"))
    }

    pub async fn list_visible(&self) -> Result<Vec<News>> {
        let mut response = self
            .db
            .query("SELECT * FROM news WHERE isVisible = 1")
            .await?;
        let news: Vec<News> = response.take(0)?;
        Ok(news)
    }

    pub async fn list_all(&self) -> Result<Vec<News>> {
        self.db.select("news").await
    }

    pub async fn set_visibility(&self, news_id: &str, request: UpdateVisibilityRequest) -> Result<News> {
        let visible = validate_visibility(&request)?;

        let mut response = self
            .db
            .query_with_params(
                "UPDATE type::thing('news', $id) SET isVisible = $visible RETURN AFTER",
                json!({ "id": news_id, "visible": visible }),
            )
            .await?;
        let updated: Vec<News> = response.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("News"))
    }

    /// Single-statement increment, the one mutation that does not follow the
    /// load-mutate-save shape.
    pub async fn increment_viewer(&self, news_id: &str) -> Result<News> {
        let mut response = self
            .db
            .query_with_params(
                "UPDATE type::thing('news', $id) SET viewer += 1 RETURN AFTER",
                json!({ "id": news_id }),
            )
            .await?;
        let updated: Vec<News> = response.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("News"))
    }

    /// Deletes the article after releasing every image-host asset its gallery
    /// still references.
    pub async fn delete_news(&self, news_id: &str) -> Result<()> {
        let news = self.get_news(news_id).await?;

        for entry in &news.photos_description {
            if entry.has_photo() {
                self.media.destroy(&entry.photo_cloudinary_id).await?;
            }
        }

        self.db.delete_by_id("news", news_id).await?;
        info!("Deleted news article: {}", news_id);
        Ok(())
    }

    /// Overwrites title/category/updatedAt when provided, then runs the six
    /// gallery steps against the loaded article and saves once.
    pub async fn update_news(&self, news_id: &str, form: UpdateNewsForm) -> Result<News> {
        debug!("Updating news article: {}", news_id);

        let mut news = self.get_news(news_id).await?;

        // Public ids for photos uploaded during this update derive from the
        // title the article had before the edit, as for creation.
        let sanitized = sanitize_title(&news.title);

        if let Some(title) = form.title.as_deref().filter(|t| !t.trim().is_empty()) {
            news.title = title.to_string();
        }
        if let Some(category) = form.category.as_deref().filter(|c| !c.trim().is_empty()) {
            news.category = category.to_string();
        }
        news.updated_at = match form.updated_at.as_deref().filter(|v| !v.trim().is_empty()) {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map_err(|_| AppError::validation("updatedAt must be an RFC 3339 timestamp"))?
                .with_timezone(&Utc),
            None => Utc::now(),
        };

        apply_gallery_edits(
            self.media.as_ref(),
            &self.upload_folder,
            &sanitized,
            &mut news.photos_description,
            &form,
        )
        .await?;

        let updated = self
            .db
            .update_by_id("news", news_id, news)
            .await?
            .ok_or_else(|| AppError::internal("Failed to save updated news"))?;

        info!("Updated news article: {}", news_id);
        Ok(updated)
    }
}

fn validate_visibility(request: &UpdateVisibilityRequest) -> Result<i64> {
    request.validate().map_err(AppError::ValidatorError)?;
    request
        .is_visible
        .ok_or_else(|| AppError::validation("isVisible is required"))
}

fn validate_create_form(form: &CreateNewsForm) -> Result<(String, String)> {
    let title = form
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::validation("Title is required"))?;
    let category = form
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::validation("Category is required"))?;
    if form.photos.is_empty() {
        return Err(AppError::validation("Photos are required"));
    }
    Ok((title.to_string(), category.to_string()))
}

/// Runs the six gallery steps in order against one in-memory gallery. Each
/// step addresses positions in the array as mutated by the steps before it;
/// out-of-range indices are ignored silently.
pub(crate) async fn apply_gallery_edits(
    media: &dyn ImageStore,
    folder: &str,
    sanitized_title: &str,
    gallery: &mut Vec<PhotoEntry>,
    form: &UpdateNewsForm,
) -> Result<()> {
    // 1. Remove whole entries, highest index first so earlier removals do not
    // shift the indices still to be processed.
    for &index in form.remove_indices.iter().rev() {
        if index >= gallery.len() {
            continue;
        }
        if gallery[index].has_photo() {
            media.destroy(&gallery[index].photo_cloudinary_id).await?;
        }
        gallery.remove(index);
    }

    // 2. Replace the photo at each index, paired positionally with the
    // uploaded replacement files. The description is left untouched.
    for (i, &index) in form.update_indices.iter().enumerate() {
        let Some(upload) = form.update_photos.get(i) else {
            continue;
        };
        if index >= gallery.len() {
            continue;
        }
        if gallery[index].has_photo() {
            media.destroy(&gallery[index].photo_cloudinary_id).await?;
        }
        let public_id = photo_public_id(folder, sanitized_title, i);
        let uploaded = media
            .upload(upload.data.clone(), &upload.file_name, folder, &public_id)
            .await?;
        gallery[index].photo = uploaded.secure_url;
        gallery[index].photo_cloudinary_id = uploaded.public_id;
    }

    // 3. Clear descriptions; the entries themselves stay.
    for &index in &form.description_remove_index {
        if let Some(entry) = gallery.get_mut(index) {
            entry.description.clear();
        }
    }

    // 4. Replace descriptions, skipping blank replacement text.
    for (i, &index) in form.description_update_index.iter().enumerate() {
        let Some(text) = form.update_descriptions.get(i) else {
            continue;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(entry) = gallery.get_mut(index) {
            entry.description = trimmed.to_string();
        }
    }

    // 5. Append new photo entries, or description-only entries when no new
    // photo files were supplied.
    if !form.add_photos.is_empty() {
        for (i, upload) in form.add_photos.iter().enumerate() {
            let description = form.add_descriptions.get(i).cloned().unwrap_or_default();
            let public_id = photo_public_id(folder, sanitized_title, i);
            let uploaded = media
                .upload(upload.data.clone(), &upload.file_name, folder, &public_id)
                .await?;
            gallery.push(PhotoEntry {
                photo: uploaded.secure_url,
                photo_cloudinary_id: uploaded.public_id,
                description,
            });
        }
    } else {
        for description in &form.add_descriptions {
            let trimmed = description.trim();
            if !trimmed.is_empty() {
                gallery.push(PhotoEntry::description_only(trimmed));
            }
        }
    }

    // 6. Blank out photos in place, keeping descriptions and array length.
    for &index in form.photo_remove_index.iter().rev() {
        let Some(entry) = gallery.get_mut(index) else {
            continue;
        };
        if entry.has_photo() {
            media.destroy(&entry.photo_cloudinary_id).await?;
        }
        entry.clear_photo();
    }

    Ok(())
}
