//! Legacy chunked media upload.
//!
//! Uploads go to the dedicated upload host through the v1.1 endpoint in
//! three form-encoded steps: INIT reserves a media ID, APPEND sends
//! base64-encoded segments, FINALIZE seals the upload. The returned media ID
//! attaches to a tweet via [`NewTweet::with_media_ids`].
//!
//! All three steps require user context; the form fields participate in the
//! OAuth 1.0a signature like any other request parameters.
//!
//! [`NewTweet::with_media_ids`]: crate::models::NewTweet::with_media_ids

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use tracing::{debug, instrument};

use chirp_client::{decode_envelope, decode_failure};

use crate::client::ChirpClient;
use crate::error::{Error, ErrorKind, Result};
use crate::routes::Route;

/// Upload segment size. The endpoint caps segments at 5 MB; base64 inflates
/// the payload by a third, so stay under that after encoding.
const SEGMENT_BYTES: usize = 3 * 1024 * 1024;

/// State of a sealed upload.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaUpload {
    /// Media ID as a string, the form tweet attachments expect.
    pub media_id_string: String,
    /// Seconds until the unattached upload expires server-side.
    #[serde(default)]
    pub expires_after_secs: Option<u64>,
    /// Present when the server is still transcoding (videos).
    #[serde(default)]
    pub processing_info: Option<ProcessingInfo>,
}

/// Server-side transcoding progress.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingInfo {
    /// `pending`, `in_progress`, `succeeded`, or `failed`.
    pub state: String,
    /// Suggested poll delay in seconds.
    #[serde(default)]
    pub check_after_secs: Option<u64>,
}

impl ChirpClient {
    /// Upload media for later attachment to a tweet.
    ///
    /// `media_type` is the MIME type (e.g. `image/png`); `category`, when
    /// given, is the upstream media category (e.g. `tweet_image`,
    /// `tweet_video`) that controls transcoding.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn upload_media(
        &self,
        data: &[u8],
        media_type: &str,
        category: Option<&str>,
    ) -> Result<MediaUpload> {
        self.auth.require_user_context()?;
        if data.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "media payload must not be empty".to_string(),
            )));
        }

        let media_id = self.media_init(data.len(), media_type, category).await?;
        debug!(media_id = %media_id, "media upload initialized");

        for (index, segment) in data.chunks(SEGMENT_BYTES).enumerate() {
            self.media_append(&media_id, index, segment).await?;
        }

        self.media_finalize(&media_id).await
    }

    async fn media_init(
        &self,
        total_bytes: usize,
        media_type: &str,
        category: Option<&str>,
    ) -> Result<String> {
        let mut params = vec![
            ("command".to_string(), "INIT".to_string()),
            ("total_bytes".to_string(), total_bytes.to_string()),
            ("media_type".to_string(), media_type.to_string()),
        ];
        if let Some(category) = category {
            params.push(("media_category".to_string(), category.to_string()));
        }

        let upload: MediaUpload = self.upload_command(params).await?;
        Ok(upload.media_id_string)
    }

    async fn media_append(&self, media_id: &str, segment_index: usize, segment: &[u8]) -> Result<()> {
        let params = vec![
            ("command".to_string(), "APPEND".to_string()),
            ("media_id".to_string(), media_id.to_string()),
            ("segment_index".to_string(), segment_index.to_string()),
            ("media_data".to_string(), BASE64.encode(segment)),
        ];

        // APPEND answers 2xx with an empty body; only failures decode.
        let request = self
            .request(Route::MediaUpload, Vec::new())
            .form(params);
        let request = self.sign(request).await?;
        let (status, body) = self.http_execute(&request).await?;
        if !(200..300).contains(&status) {
            return Err(decode_failure(status, &body).into());
        }
        Ok(())
    }

    async fn media_finalize(&self, media_id: &str) -> Result<MediaUpload> {
        let params = vec![
            ("command".to_string(), "FINALIZE".to_string()),
            ("media_id".to_string(), media_id.to_string()),
        ];
        self.upload_command(params).await
    }

    /// One form-encoded command against the upload endpoint, decoded as a
    /// bare (non-enveloped) body.
    async fn upload_command(&self, params: Vec<(String, String)>) -> Result<MediaUpload> {
        let request = self
            .request(Route::MediaUpload, Vec::new())
            .form(params);
        let request = self.sign(request).await?;
        let (status, body) = self.http_execute(&request).await?;
        if !(200..300).contains(&status) {
            return Err(decode_failure(status, &body).into());
        }
        decode_envelope(status, &body).map_err(Error::from)
    }
}
