use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::config::Config;

use super::{SubmissionPayload, Transport, TransportError, TransportResponse};

/// reqwest-backed [`Transport`].
///
/// Relative form actions are resolved against `base_url`.
pub struct HttpTransport {
    client: Client,
    base_url: Option<Url>,
}

impl HttpTransport {
    pub fn new(
        base_url: Option<&str>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let base_url = base_url
            .map(|raw| {
                Url::parse(raw).map_err(|e| TransportError::InvalidEndpoint {
                    endpoint: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(
            config.form.base_url.as_deref(),
            Duration::from_secs(u64::from(config.http.timeout_seconds)),
            Duration::from_secs(u64::from(config.http.connect_timeout_seconds)),
        )
    }

    /// Full request URL for `endpoint` with the payload as query string.
    pub fn request_url(
        &self,
        endpoint: &str,
        payload: &SubmissionPayload,
    ) -> Result<Url, TransportError> {
        let parsed = match &self.base_url {
            Some(base) => base.join(endpoint),
            None => Url::parse(endpoint),
        };
        let mut url = parsed.map_err(|e| TransportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        {
            let mut query = url.query_pairs_mut();
            for (name, value) in payload.query_pairs() {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        endpoint: &str,
        payload: &SubmissionPayload,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.request_url(endpoint, payload)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            tracing::warn!("Form endpoint answered HTTP {}", status);
            return Ok(TransportResponse::new(status, Vec::new()));
        }

        let body = response.bytes().await?;
        tracing::debug!("Form endpoint answered HTTP {} ({} bytes)", status, body.len());
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}
