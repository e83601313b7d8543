//! Scenario parameters: the immutable input to every engine operation.
//!
//! A `ScenarioSelection` is what a presentation layer collects (tiers,
//! investment level, optional overrides). Resolving it against an
//! `EngineConfig` produces the fully specified `ScenarioParameters`.

use crate::{
    config::EngineConfig,
    cost_estimator::{self, InvestmentLevel},
    error::{EngineError, EngineResult},
    types::{Money, Percent, Ratio},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandTier {
    Weak,
    Average,
    AboveAverage,
}

impl DemandTier {
    pub const ALL: [DemandTier; 3] = [
        DemandTier::Weak,
        DemandTier::Average,
        DemandTier::AboveAverage,
    ];

    /// Serialized name, also accepted on the runner command line.
    pub fn key(&self) -> &'static str {
        match self {
            DemandTier::Weak         => "weak",
            DemandTier::Average      => "average",
            DemandTier::AboveAverage => "above_average",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DemandTier::Weak         => "Weak Demand",
            DemandTier::Average      => "Average Demand",
            DemandTier::AboveAverage => "Above Average Demand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostTier {
    BelowAverage,
    Average,
    AboveAverage,
}

impl CostTier {
    pub const ALL: [CostTier; 3] = [
        CostTier::BelowAverage,
        CostTier::Average,
        CostTier::AboveAverage,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CostTier::BelowAverage => "below_average",
            CostTier::Average      => "average",
            CostTier::AboveAverage => "above_average",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CostTier::BelowAverage => "Below Average Costs",
            CostTier::Average      => "Average Costs",
            CostTier::AboveAverage => "Above Average Costs",
        }
    }
}

/// Fully resolved inputs for one analysis. Never mutated once built;
/// sensitivity perturbations construct modified copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub demand:             DemandTier,
    pub growth_rate:        Percent,
    pub cost_tier:          CostTier,
    pub cost_growth_rate:   Percent,
    pub discount_rate:      Percent,
    pub initial_investment: Money,
    pub baseline_revenue:   Money,
    pub base_margin:        Ratio,
    pub horizon:            usize,
}

impl ScenarioParameters {
    /// Reject inputs that indicate caller misuse. Financial edge cases
    /// (zero growth, zero horizon, cost deflation) are all accepted.
    pub fn validate(&self) -> EngineResult<()> {
        require_finite("growth_rate", self.growth_rate)?;
        require_finite("cost_growth_rate", self.cost_growth_rate)?;
        require_finite("discount_rate", self.discount_rate)?;
        require_finite("base_margin", self.base_margin)?;
        require_finite("baseline_revenue", self.baseline_revenue)?;
        require_finite("initial_investment", self.initial_investment)?;

        if self.baseline_revenue < 0.0 {
            return Err(EngineError::InvalidScenario {
                field:  "baseline_revenue",
                value:  self.baseline_revenue,
                reason: "must not be negative",
            });
        }
        if self.initial_investment < 0.0 {
            return Err(EngineError::InvalidScenario {
                field:  "initial_investment",
                value:  self.initial_investment,
                reason: "must not be negative",
            });
        }
        if self.cost_growth_rate <= -100.0 {
            return Err(EngineError::InvalidScenario {
                field:  "cost_growth_rate",
                value:  self.cost_growth_rate,
                reason: "must be above -100%",
            });
        }
        if self.discount_rate <= -100.0 {
            return Err(EngineError::InvalidScenario {
                field:  "discount_rate",
                value:  self.discount_rate,
                reason: "must be above -100%",
            });
        }
        if self.discount_rate <= 0.0 {
            log::warn!(
                "scenario: discount rate {:.2}% is not positive, NPV is undiscounted or inflated",
                self.discount_rate
            );
        }
        if self.horizon == 0 {
            log::warn!("scenario: zero-year horizon, projection will be empty");
        }
        Ok(())
    }
}

fn require_finite(field: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidScenario {
            field,
            value,
            reason: "must be a finite number",
        })
    }
}

/// What the calling layer selects. Tier defaults fill any rate left as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSelection {
    pub demand:           DemandTier,
    pub cost_tier:        CostTier,
    pub investment_level: InvestmentLevel,
    #[serde(default)]
    pub discount_rate:    Option<Percent>,
    #[serde(default)]
    pub growth_rate:      Option<Percent>,
    #[serde(default)]
    pub cost_growth_rate: Option<Percent>,
}

impl Default for ScenarioSelection {
    fn default() -> Self {
        Self {
            demand:           DemandTier::Average,
            cost_tier:        CostTier::Average,
            investment_level: InvestmentLevel::Average,
            discount_rate:    None,
            growth_rate:      None,
            cost_growth_rate: None,
        }
    }
}

impl ScenarioSelection {
    pub fn resolve(&self, config: &EngineConfig) -> EngineResult<ScenarioParameters> {
        let estimate = cost_estimator::estimate(&config.catalog);

        let params = ScenarioParameters {
            demand:             self.demand,
            growth_rate:        self
                .growth_rate
                .unwrap_or_else(|| config.demand_growth.for_tier(self.demand)),
            cost_tier:          self.cost_tier,
            cost_growth_rate:   self
                .cost_growth_rate
                .unwrap_or_else(|| config.cost_growth.for_tier(self.cost_tier)),
            discount_rate:      self.discount_rate.unwrap_or(config.default_discount_rate),
            initial_investment: estimate.select(self.investment_level),
            baseline_revenue:   config.baseline_revenue,
            base_margin:        config.cost_ratios.gross_profit,
            horizon:            config.horizon_years,
        };
        params.validate()?;
        Ok(params)
    }
}
