use std::future::Future;

use api_types::mail::{EmailCreated, EmailError, EmailNew};
use reqwest::Url;
use thiserror::Error;

use crate::NotifyError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("mail endpoint not found")]
    NotFound,
    #[error("mail rejected: {0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Sends a rendered email, resolving to the provider's message id.
pub trait MailTransport {
    fn send(&self, email: &EmailNew) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// Transactional mail API speaking the Resend wire format.
#[derive(Debug, Clone)]
pub struct ResendTransport {
    endpoint: Url,
    api_key: String,
    http: reqwest::Client,
}

impl ResendTransport {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, NotifyError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|err| NotifyError::Config(format!("invalid mail endpoint: {err}")))?;
        if api_key.trim().is_empty() {
            return Err(NotifyError::Config("mail api_key is empty".to_string()));
        }
        Ok(Self {
            endpoint,
            api_key: api_key.trim().to_string(),
            http: reqwest::Client::new(),
        })
    }
}

impl MailTransport for ResendTransport {
    async fn send(&self, email: &EmailNew) -> Result<String, TransportError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<EmailCreated>().await?.id);
        }
        if status.as_u16() == 404 {
            return Err(TransportError::NotFound);
        }

        let message = res
            .json::<EmailError>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("mail API error ({status})"));
        Err(TransportError::Rejected(message))
    }
}
