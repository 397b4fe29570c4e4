use serde_json::Value;

use super::gateway::{PayloadError, ValuationError};

/// Status and body of a completed HTTP exchange, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Maps a raw response onto the predicted price or a classified failure.
pub fn interpret_response(response: &GatewayResponse) -> Result<f64, ValuationError> {
    if !response.is_success() {
        return Err(ValuationError::Protocol {
            status: response.status,
        });
    }

    let body: Value = serde_json::from_str(&response.body)
        .map_err(|err| PayloadError::MalformedJson(err.to_string()))?;

    let value = body
        .get("prediction")
        .filter(|value| !value.is_null())
        .ok_or(PayloadError::MissingPrediction)?;
    let prediction = value
        .as_f64()
        .filter(|number| number.is_finite())
        .ok_or_else(|| PayloadError::NonNumericPrediction(value.to_string()))?;

    Ok(prediction)
}
