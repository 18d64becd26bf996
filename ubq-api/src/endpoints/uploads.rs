//! Two-phase file uploads.
//!
//! An upload is requested from the API, which answers with a pre-signed
//! URL. The bytes go straight to storage with a plain PUT, after which the
//! upload is marked complete and the server processes the file.

use tracing::info;

use ubq_core::error::{UbqError, UbqResult};
use ubq_models::refs::with_trailing_slash;
use ubq_models::{AppRef, NewUpload, Upload};

use crate::client::{ApiRequest, RequestExecutor};
use crate::waiter::{PollStatus, Waiter};

#[derive(Debug, Clone)]
pub struct UploadApi {
    executor: RequestExecutor,
    uploads_url: String,
}

impl UploadApi {
    pub(crate) fn new(executor: RequestExecutor, app: AppRef<'_>) -> Self {
        let uploads_url = match app {
            AppRef::App(app) => format!("{}uploads/", with_trailing_slash(&app.url)),
            AppRef::Token(token) => format!("{}api/v2/apps/{token}/uploads/", executor.base_url()),
        };
        Self {
            executor,
            uploads_url,
        }
    }

    /// URL of the app's uploads collection.
    pub fn uploads_url(&self) -> &str {
        &self.uploads_url
    }

    /// Request an upload ticket carrying a pre-signed `upload_url`.
    pub async fn request_upload(&self, data: &NewUpload) -> UbqResult<Upload> {
        let upload: Upload = self.executor.post_json(&self.uploads_url, data).await?;
        info!(uuid = %upload.uuid, file_name = %upload.file_name, "upload requested");
        Ok(upload)
    }

    /// PUT the file to the ticket's pre-signed URL.
    ///
    /// The signature authorizes the request, so no API credential or custom
    /// header is sent.
    pub async fn put_upload_bytes(&self, upload: &Upload, data: Vec<u8>) -> UbqResult<()> {
        let target = upload.upload_url.as_deref().ok_or_else(|| {
            UbqError::InvalidUrl(format!("upload {} has no upload_url", upload.url))
        })?;
        let content_type = upload
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let size = data.len();
        self.executor
            .execute_unit(ApiRequest::put(target).bytes(data, content_type).anonymous())
            .await?;
        info!(uuid = %upload.uuid, size, "upload bytes sent");
        Ok(())
    }

    /// Tell the server the bytes are in place so processing can start.
    ///
    /// Servers that acknowledge without a body are followed by a fresh read.
    pub async fn complete_upload(&self, upload: &Upload) -> UbqResult<Upload> {
        let url = format!("{}complete/", with_trailing_slash(&upload.url));
        match self.executor.execute::<Upload>(ApiRequest::post(url)).await? {
            Some(snapshot) => Ok(snapshot),
            None => self.get_upload(&upload.url).await,
        }
    }

    /// Read an upload ticket by hyperlink.
    pub async fn get_upload(&self, url: &str) -> UbqResult<Upload> {
        self.executor.get_json(url).await
    }

    /// Poll until the server has processed the upload.
    pub async fn await_upload(&self, upload: &Upload, waiter: &Waiter) -> UbqResult<Upload> {
        let executor = &self.executor;
        let url = upload.url.as_str();
        waiter
            .wait("upload processing", move || async move {
                let snapshot: Upload = executor.get_json(url).await?;
                Ok::<_, UbqError>(PollStatus::from_snapshot(snapshot))
            })
            .await
    }

    /// Request, send, complete and await an upload in one go.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
        waiter: &Waiter,
    ) -> UbqResult<Upload> {
        let ticket = self
            .request_upload(&NewUpload {
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                size: Some(data.len() as u64),
            })
            .await?;
        self.put_upload_bytes(&ticket, data).await?;
        let completed = self.complete_upload(&ticket).await?;
        self.await_upload(&completed, waiter).await
    }
}
