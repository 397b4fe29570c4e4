use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::domain::AttributeRecord;
use super::wire::GatewayResponse;
use crate::config::ValuationServiceConfig;

/// Why a valuation request produced no usable price.
#[derive(Debug, thiserror::Error)]
pub enum ValuationError {
    #[error("valuation request could not be built: {0}")]
    InvalidRequest(String),
    #[error("valuation service unreachable: {0}")]
    Transport(String),
    #[error("valuation service responded with HTTP {status}")]
    Protocol { status: u16 },
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// A 2xx response whose body carries no usable prediction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("response body is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("response body has no prediction field")]
    MissingPrediction,
    #[error("prediction is not a number: {0}")]
    NonNumericPrediction(String),
}

/// Outbound boundary to the remote valuation model.
///
/// Implementations only move bytes; classifying the response is left to
/// [`super::wire::interpret_response`].
#[async_trait]
pub trait ValuationGateway: Debug + Send + Sync {
    async fn request_valuation(
        &self,
        record: &AttributeRecord,
    ) -> Result<GatewayResponse, ValuationError>;
}

/// reqwest-backed gateway posting JSON to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpValuationGateway {
    http: Client,
    endpoint: Url,
}

impl HttpValuationGateway {
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// Builds a client whose every request is bounded by the configured timeout.
    pub fn from_config(config: &ValuationServiceConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::new(http, config.endpoint.clone()))
    }

    fn map_error(err: reqwest::Error) -> ValuationError {
        if err.is_builder() {
            return ValuationError::InvalidRequest(err.to_string());
        }
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        ValuationError::Transport(format!("{kind}: {err}"))
    }
}

#[async_trait]
impl ValuationGateway for HttpValuationGateway {
    async fn request_valuation(
        &self,
        record: &AttributeRecord,
    ) -> Result<GatewayResponse, ValuationError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(record)
            .send()
            .await
            .map_err(Self::map_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(Self::map_error)?;

        Ok(GatewayResponse { status, body })
    }
}
