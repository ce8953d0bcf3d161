// ── DocChat Engine: HTTP Backend ───────────────────────────────────────────
//
// reqwest implementation of the request/response seam.
//   • GET with query string, POST with JSON body
//   • Multipart upload streams each file from disk
//   • Non-2xx status → transport error (status logged, body not trusted)
//   • Body that is not JSON → transport error
//   • No retries: every call is attempted once

use crate::atoms::constants::UPLOAD_FIELD;
use crate::atoms::error::{ClientError, ClientResult};
use crate::atoms::traits::Backend;
use crate::atoms::types::UploadFile;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde_json::Value;
use tokio_util::io::ReaderStream;

pub struct HttpBackend {
    client: reqwest::Client,
    base: String,
}

impl HttpBackend {
    /// `base` is an already-normalized server URL without trailing slash.
    pub fn new(base: impl Into<String>) -> Self {
        HttpBackend { client: reqwest::Client::new(), base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Turn a response into JSON, treating bad status or body as transport failures.
async fn read_json(path: &str, response: reqwest::Response) -> ClientResult<Value> {
    let status = response.status();
    if !status.is_success() {
        warn!("[http] {} returned {}", path, status);
        return Err(ClientError::transport(format!("{} returned {}", path, status)));
    }
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        debug!("[http] {} body: {}", path, text.chars().take(200).collect::<String>());
        ClientError::transport(format!("{} answered non-JSON: {}", path, e))
    })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> ClientResult<Value> {
        debug!("[http] GET {}", path);
        let response = self.client.get(self.url(path)).query(query).send().await?;
        read_json(path, response).await
    }

    async fn post(&self, path: &str, body: &Value) -> ClientResult<Value> {
        debug!("[http] POST {}", path);
        let response = self.client.post(self.url(path)).json(body).send().await?;
        read_json(path, response).await
    }

    async fn upload(&self, path: &str, files: &[UploadFile]) -> ClientResult<Value> {
        let mut form = Form::new();
        for file in files {
            let reader = tokio::fs::File::open(&file.path).await?;
            let body = Body::wrap_stream(ReaderStream::new(reader));
            let part = Part::stream_with_length(body, file.size).file_name(file.name.clone());
            form = form.part(UPLOAD_FIELD, part);
        }
        debug!("[http] POST {} (multipart, {} files)", path, files.len());
        let response = self.client.post(self.url(path)).multipart(form).send().await?;
        read_json(path, response).await
    }
}
