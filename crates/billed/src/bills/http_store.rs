use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::domain::BillRecord;
use super::store::{BillStore, BillUpdate, ReceiptUpload, StoreError, StoredReceipt};
use crate::config::ApiConfig;

/// [`BillStore`] backed by the Billed REST API.
#[derive(Debug, Clone)]
pub struct HttpBillStore {
    http: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpBillStore {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &ApiConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    fn bills_url(&self) -> String {
        format!("{}/bills", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, StoreError> {
        let response = request.send().await.map_err(transport)?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|err| StoreError::Payload(err.to_string()))
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);
    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl BillStore for HttpBillStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        let request = self.authorize(self.http.get(self.bills_url()));
        Self::send(request).await
    }

    async fn create(&self, upload: ReceiptUpload) -> Result<StoredReceipt, StoreError> {
        let ReceiptUpload {
            file,
            file_name,
            email,
        } = upload;
        let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
        debug!(%file_name, %mime, size = file.len(), "uploading receipt");

        let part = Part::bytes(file)
            .file_name(file_name)
            .mime_str(mime.as_ref())
            .map_err(transport)?;
        let form = Form::new().part("file", part).text("email", email);

        let request = self.authorize(self.http.post(self.bills_url()).multipart(form));
        Self::send(request).await
    }

    async fn update(&self, update: BillUpdate) -> Result<BillRecord, StoreError> {
        let selector = update.selector.ok_or(StoreError::MissingSelector)?;
        let url = format!("{}/{}", self.bills_url(), selector);

        let request = self.authorize(
            self.http
                .patch(url)
                .header(CONTENT_TYPE, "application/json")
                .body(update.data),
        );
        Self::send(request).await
    }
}
