//! Startup cost estimation.
//!
//! Aggregates the catalog of startup line items into the three
//! investment totals a scenario can select from. Pure aggregation:
//! the catalog is read-only reference data.

use crate::{
    error::{EngineError, EngineResult},
    types::Money,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which end of the catalog ranges funds the initial investment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentLevel {
    Low,
    Average,
    High,
}

impl InvestmentLevel {
    pub const ALL: [InvestmentLevel; 3] = [
        InvestmentLevel::Low,
        InvestmentLevel::Average,
        InvestmentLevel::High,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            InvestmentLevel::Low     => "low",
            InvestmentLevel::Average => "average",
            InvestmentLevel::High    => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvestmentLevel::Low     => "Low Cost",
            InvestmentLevel::Average => "Average Cost",
            InvestmentLevel::High    => "High Cost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCatalogEntry {
    pub category: String,
    pub low:      Money,
    pub high:     Money,
}

impl CostCatalogEntry {
    pub fn new(category: impl Into<String>, low: Money, high: Money) -> Self {
        Self { category: category.into(), low, high }
    }

    pub fn midpoint(&self) -> Money {
        (self.low + self.high) / 2.0
    }

    /// The amount this line item contributes at the given level.
    pub fn amount_for(&self, level: InvestmentLevel) -> Money {
        match level {
            InvestmentLevel::Low     => self.low,
            InvestmentLevel::Average => self.midpoint(),
            InvestmentLevel::High    => self.high,
        }
    }

    fn validate(&self) -> EngineResult<()> {
        if self.category.trim().is_empty() {
            return Err(EngineError::InvalidCatalogEntry {
                category: self.category.clone(),
                reason:   "category name is empty".into(),
            });
        }
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(EngineError::InvalidCatalogEntry {
                category: self.category.clone(),
                reason:   "estimates must be finite".into(),
            });
        }
        if self.low < 0.0 {
            return Err(EngineError::InvalidCatalogEntry {
                category: self.category.clone(),
                reason:   format!("low estimate {:.2} is negative", self.low),
            });
        }
        if self.low > self.high {
            return Err(EngineError::InvalidCatalogEntry {
                category: self.category.clone(),
                reason:   format!(
                    "low estimate {:.2} exceeds high estimate {:.2}",
                    self.low, self.high
                ),
            });
        }
        Ok(())
    }
}

/// A validated set of startup line items. Category names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CostCatalogEntry>", into = "Vec<CostCatalogEntry>")]
pub struct CostCatalog {
    entries: Vec<CostCatalogEntry>,
}

impl CostCatalog {
    pub fn new(entries: Vec<CostCatalogEntry>) -> EngineResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.category.as_str()) {
                return Err(EngineError::DuplicateCategory {
                    category: entry.category.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CostCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, category: &str) -> EngineResult<&CostCatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .ok_or_else(|| EngineError::UnknownCategory {
                category: category.to_string(),
            })
    }

    /// Per-category amounts at one investment level, in catalog order.
    pub fn line_items(&self, level: InvestmentLevel) -> Vec<(&str, Money)> {
        self.entries
            .iter()
            .map(|e| (e.category.as_str(), e.amount_for(level)))
            .collect()
    }
}

impl TryFrom<Vec<CostCatalogEntry>> for CostCatalog {
    type Error = EngineError;

    fn try_from(entries: Vec<CostCatalogEntry>) -> EngineResult<Self> {
        CostCatalog::new(entries)
    }
}

impl From<CostCatalog> for Vec<CostCatalogEntry> {
    fn from(catalog: CostCatalog) -> Self {
        catalog.entries
    }
}

/// The three investment totals. Low <= Average <= High.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub low:     Money,
    pub average: Money,
    pub high:    Money,
}

impl CostEstimate {
    pub fn select(&self, level: InvestmentLevel) -> Money {
        match level {
            InvestmentLevel::Low     => self.low,
            InvestmentLevel::Average => self.average,
            InvestmentLevel::High    => self.high,
        }
    }
}

/// Sum lows, midpoints and highs across the catalog.
/// An empty catalog yields all-zero totals.
pub fn estimate(catalog: &CostCatalog) -> CostEstimate {
    if catalog.is_empty() {
        log::warn!("cost_estimator: empty catalog, all investment totals are zero");
        return CostEstimate::default();
    }

    let totals = catalog.entries().iter().fold(CostEstimate::default(), |acc, e| {
        CostEstimate {
            low:     acc.low + e.low,
            average: acc.average + e.midpoint(),
            high:    acc.high + e.high,
        }
    });

    log::debug!(
        "cost_estimator: {} items low={:.2} avg={:.2} high={:.2}",
        catalog.len(),
        totals.low,
        totals.average,
        totals.high
    );

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_range() {
        let err = CostCatalog::new(vec![CostCatalogEntry::new("Signage", 20_000.0, 6_000.0)])
            .unwrap_err();
        assert!(
            matches!(err, EngineError::InvalidCatalogEntry { ref category, .. } if category == "Signage"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_negative_low() {
        let err = CostCatalog::new(vec![CostCatalogEntry::new("Insurance", -1.0, 7_000.0)])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidCatalogEntry { .. }));
    }

    #[test]
    fn rejects_duplicate_category() {
        let err = CostCatalog::new(vec![
            CostCatalogEntry::new("Equipment", 100_000.0, 160_000.0),
            CostCatalogEntry::new("Equipment", 1.0, 2.0),
        ])
        .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateCategory { .. }));
    }

    #[test]
    fn deserialization_runs_validation() {
        let json = r#"[{"category":"Signage","low":20000.0,"high":6000.0}]"#;
        let parsed: Result<CostCatalog, _> = serde_json::from_str(json);
        assert!(parsed.is_err(), "inverted range must not deserialize");
    }
}
