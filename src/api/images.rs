//! Poster and backdrop downloads

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use super::{ImageSource, TmdbError};

/// Plain HTTP image fetcher
pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for ImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TmdbError::from)?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response.bytes().await.map_err(TmdbError::from)?;
                if bytes.is_empty() {
                    return Err(TmdbError::InvalidResponse("empty image body".into()).into());
                }
                Ok(bytes.to_vec())
            }
            StatusCode::NOT_FOUND => Err(TmdbError::NotFound.into()),
            status => Err(TmdbError::ServerError(status.as_u16()).into()),
        }
    }
}
