use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::media::UploadedImage;
use async_trait::async_trait;
use chrono::Utc;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error};

/// External image-hosting API: upload a photo binary, get back a durable URL
/// and an asset id; destroy releases the asset. Services depend on this trait
/// so the network client can be mocked in tests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder: &str,
        public_id: &str,
    ) -> Result<UploadedImage>;

    async fn destroy(&self, public_id: &str) -> Result<()>;
}

/// Cloudinary-style REST client. Requests are signed with a SHA-256 digest of
/// the sorted parameters followed by the API secret.
#[derive(Clone)]
pub struct MediaService {
    client: reqwest::Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl MediaService {
    pub async fn new(config: &Config) -> Result<Self> {
        Ok(Self::from_parts(
            &config.media_base_url,
            &config.media_cloud_name,
            &config.media_api_key,
            &config.media_api_secret,
        ))
    }

    fn from_parts(base_url: &str, cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", self.base_url, self.cloud_name, action)
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by_key(|(name, _)| *name);
        let to_sign = sorted
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[async_trait]
impl ImageStore for MediaService {
    async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder: &str,
        public_id: &str,
    ) -> Result<UploadedImage> {
        debug!("Uploading image {} as {}/{}", file_name, folder, public_id);

        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("folder", folder),
            ("public_id", public_id),
            ("timestamp", &timestamp),
        ]);

        let file_part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("folder", folder.to_string())
            .text("public_id", public_id.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.api_key.clone())
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Image upload failed with {}: {}", status, body);
            return Err(AppError::ExternalService(format!(
                "Image upload failed with status {}",
                status
            )));
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(UploadedImage {
            secure_url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<()> {
        debug!("Destroying image asset {}", public_id);

        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("timestamp", &timestamp),
                ("api_key", &self.api_key),
                ("signature", &signature),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            error!("Image destroy failed with {}", status);
            return Err(AppError::ExternalService(format!(
                "Image destroy failed with status {}",
                status
            )));
        }

        // The host answers "ok" or "not found"; a missing asset is not an
        // error as far as the gallery is concerned.
        let destroyed: DestroyResponse = response.json().await?;
        debug!("Destroy result for {}: {}", public_id, destroyed.result);
        Ok(())
    }
}
