//! Shared primitive types used across the entire engine.

/// A monetary amount in the model's single currency unit.
pub type Money = f64;

/// A rate expressed in percent (5.0 means 5%). May be negative.
pub type Percent = f64;

/// A fraction of revenue (0.2507 means 25.07%).
pub type Ratio = f64;

/// Projection length used by every scenario unless a caller overrides it.
pub const DEFAULT_HORIZON_YEARS: usize = 10;

/// Convert a percent rate into its decimal growth factor step.
pub fn pct(rate: Percent) -> f64 {
    rate / 100.0
}
