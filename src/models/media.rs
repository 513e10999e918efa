use serde::{Deserialize, Serialize};

/// A photo file received through a multipart form, held in memory until it is
/// pushed to the image host.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Result of one image-host upload: the durable URL stored on the article and
/// the asset id used to release the photo later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}
