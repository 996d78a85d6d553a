use std::future::Future;

use anyhow::{Context as _, Result};
use reqwest::{Client, Url, header::CONTENT_TYPE};

use crate::reading::Reading;

/// What came back from one upload attempt. Neither variant is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The server answered; success or not, only the code is kept.
    Status(u16),

    /// No answer: serialization, connection, TLS or timeout failure.
    Failed(String),
}

impl PublishOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PublishOutcome::Status(code) if (200..300).contains(code))
    }
}

pub trait Publisher {
    fn publish(&self, reading: &Reading) -> impl Future<Output = PublishOutcome>;
}

/// POSTs each reading as JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    client: Client,
    endpoint: Url,
}

impl HttpPublisher {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid upload endpoint: {endpoint}"))?;
        let client = Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, endpoint })
    }
}

impl Publisher for HttpPublisher {
    async fn publish(&self, reading: &Reading) -> PublishOutcome {
        let body = match reading.to_json() {
            Ok(body) => body,
            Err(err) => return PublishOutcome::Failed(format!("{err:#}")),
        };

        let result = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        match result {
            Ok(response) => PublishOutcome::Status(response.status().as_u16()),
            Err(err) => PublishOutcome::Failed(err.to_string()),
        }
    }
}
