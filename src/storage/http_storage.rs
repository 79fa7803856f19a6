use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::file_storage::{Result, StorageError};
use super::models::Document;
use super::DataStore;

/// Web fallback persistence: the same document behind `GET/PUT /api/data`
pub struct HttpStorage {
    client: Client,
    base_url: String,
}

impl HttpStorage {
    pub fn new(base_url: String) -> Result<Self> {
        // Normalize URL - ensure no trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn data_url(&self) -> String {
        format!("{}/api/data", self.base_url)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(StorageError::Status {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl DataStore for HttpStorage {
    async fn read_data(&self) -> Result<Document> {
        let response = self.client.get(self.data_url()).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            log::info!("No data on server yet, starting from the default document");
            return Ok(Document::default_document());
        }

        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        Ok(Document::from_json(&body)?)
    }

    async fn write_data(&self, document: &Document) -> Result<bool> {
        let response = self
            .client
            .put(self.data_url())
            .json(document)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(true)
    }

    fn location(&self) -> String {
        self.data_url()
    }
}
