//! Property valuation submission: the attribute record, its normalization
//! rules, the remote valuation contract, and the controller that runs one
//! form session.

pub mod controller;
pub mod display;
pub mod domain;
pub mod gateway;
pub mod update;
pub mod wire;

#[cfg(test)]
mod tests;

pub use controller::{SubmissionController, SubmissionState, SubmitOutcome};
pub use display::{format_estimate, FAILURE_MESSAGE};
pub use domain::{
    AttributeField, AttributeRecord, CountField, FeatureField, FurnishingStatus, YesNo,
};
pub use gateway::{HttpValuationGateway, PayloadError, ValuationError, ValuationGateway};
pub use update::{FieldUpdate, InputError, PARKING_RANGE};
pub use wire::{interpret_response, GatewayResponse};
