//! Franchise opportunity appraisal engine.
//!
//! Data flows one way:
//!   cost_estimator, financial_breakdown -> projection
//!   projection -> appraisal, sensitivity
//!   everything -> recommendation
//!
//! Every public operation is a pure function of its arguments.
//! Nothing here keeps state between calls.

pub mod analysis;
pub mod appraisal;
pub mod config;
pub mod cost_estimator;
pub mod error;
pub mod financial_breakdown;
pub mod projection;
pub mod recommendation;
pub mod scenario;
pub mod sensitivity;
pub mod types;
