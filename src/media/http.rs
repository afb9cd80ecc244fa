use std::time::Duration;

use crate::error::{Error, MediaError};
use crate::media::{FetchedBody, Fetcher};

/// Plain HTTP GET through `reqwest`. Signed URLs and auth are the caller's business.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// `timeout` bounds each whole request; `None` waits as long as the server does.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, uri: &str) -> Result<FetchedBody, MediaError> {
        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| MediaError::FetchFailed(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            log::debug!("GET {uri} → {status}");
            return Ok(FetchedBody {
                status: status.as_u16(),
                content_type,
                bytes: Vec::new(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                MediaError::FetchFailed(e.to_string())
            } else {
                MediaError::DecodeFailed(e.to_string())
            }
        })?;

        Ok(FetchedBody {
            status: status.as_u16(),
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
