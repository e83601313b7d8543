//! Recommendation decision table and risk assessment.
//!
//! Tier:
//!   Recommended         NPV > 0, IRR > 15%, payback < 7 years
//!   CautiouslyPositive  NPV > 0, IRR > 10%
//!   NotRecommended      everything else, including undefined IRR
//!
//! Risk: Low above 25% IRR, Moderate above 15%, otherwise High.
//! Undefined IRR is High risk.

use crate::{
    appraisal::AppraisalResult,
    projection::{starting_revenue, ProjectionSeries},
    scenario::{CostTier, DemandTier, ScenarioParameters},
    types::{Money, Percent, Ratio},
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RECOMMENDED_MIN_IRR: Percent = 15.0;
pub const CAUTIOUS_MIN_IRR: Percent = 10.0;
pub const RECOMMENDED_MAX_PAYBACK_YEARS: f64 = 7.0;
pub const LOW_RISK_MIN_IRR: Percent = 25.0;
pub const MODERATE_RISK_MIN_IRR: Percent = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Recommended,
    CautiouslyPositive,
    NotRecommended,
}

impl RecommendationTier {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationTier::Recommended        => "Recommended",
            RecommendationTier::CautiouslyPositive => "Cautiously Positive",
            RecommendationTier::NotRecommended     => "Not Recommended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low      => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High     => "High",
        }
    }
}

/// One check that fed the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rationale {
    NpvPositive      { npv: Money },
    NpvNotPositive   { npv: Money },
    IrrAboveHurdle   { irr: Percent, hurdle: Percent },
    IrrBelowHurdle   { irr: Percent, hurdle: Percent },
    IrrUndefined,
    PaybackWithin    { years: f64, limit: f64 },
    PaybackBeyond    { years: f64, limit: f64 },
    PaybackUndefined,
}

impl fmt::Display for Rationale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rationale::NpvPositive { npv } => {
                write!(f, "NPV of {npv:.0} is positive")
            }
            Rationale::NpvNotPositive { npv } => {
                write!(f, "NPV of {npv:.0} does not exceed zero")
            }
            Rationale::IrrAboveHurdle { irr, hurdle } => {
                write!(f, "IRR of {irr:.1}% clears the {hurdle:.0}% hurdle")
            }
            Rationale::IrrBelowHurdle { irr, hurdle } => {
                write!(f, "IRR of {irr:.1}% does not clear the {hurdle:.0}% hurdle")
            }
            Rationale::IrrUndefined => {
                write!(f, "IRR is undefined for this cash-flow pattern")
            }
            Rationale::PaybackWithin { years, limit } => {
                write!(f, "payback of {years:.1} years is inside the {limit:.0}-year target")
            }
            Rationale::PaybackBeyond { years, limit } => {
                write!(f, "payback of {years:.1} years is outside the {limit:.0}-year target")
            }
            Rationale::PaybackUndefined => {
                write!(f, "investment is not recovered within the horizon")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationVerdict {
    pub tier:      RecommendationTier,
    pub risk:      RiskLevel,
    pub rationale: Vec<Rationale>,
}

pub fn risk_level(irr: Option<Percent>) -> RiskLevel {
    match irr {
        Some(r) if r > LOW_RISK_MIN_IRR      => RiskLevel::Low,
        Some(r) if r > MODERATE_RISK_MIN_IRR => RiskLevel::Moderate,
        _                                    => RiskLevel::High,
    }
}

pub fn classify_metrics(
    npv: Money,
    irr: Option<Percent>,
    payback_years: Option<f64>,
) -> RecommendationVerdict {
    let npv_positive = npv > 0.0;
    let quick_payback = payback_years.is_some_and(|p| p < RECOMMENDED_MAX_PAYBACK_YEARS);

    let tier = match irr {
        Some(r) if npv_positive && r > RECOMMENDED_MIN_IRR && quick_payback => {
            RecommendationTier::Recommended
        }
        Some(r) if npv_positive && r > CAUTIOUS_MIN_IRR => RecommendationTier::CautiouslyPositive,
        _ => RecommendationTier::NotRecommended,
    };

    let mut rationale = Vec::with_capacity(3);

    rationale.push(if npv_positive {
        Rationale::NpvPositive { npv }
    } else {
        Rationale::NpvNotPositive { npv }
    });

    rationale.push(match irr {
        None => Rationale::IrrUndefined,
        Some(r) => {
            // Report against the highest hurdle the IRR clears, or the
            // lowest one when it clears none.
            let hurdle = if r > RECOMMENDED_MIN_IRR {
                RECOMMENDED_MIN_IRR
            } else {
                CAUTIOUS_MIN_IRR
            };
            if r > hurdle {
                Rationale::IrrAboveHurdle { irr: r, hurdle }
            } else {
                Rationale::IrrBelowHurdle { irr: r, hurdle }
            }
        }
    });

    rationale.push(match payback_years {
        None => Rationale::PaybackUndefined,
        Some(years) if years < RECOMMENDED_MAX_PAYBACK_YEARS => Rationale::PaybackWithin {
            years,
            limit: RECOMMENDED_MAX_PAYBACK_YEARS,
        },
        Some(years) => Rationale::PaybackBeyond {
            years,
            limit: RECOMMENDED_MAX_PAYBACK_YEARS,
        },
    });

    RecommendationVerdict {
        tier,
        risk: risk_level(irr),
        rationale,
    }
}

pub fn classify(appraisal: &AppraisalResult) -> RecommendationVerdict {
    classify_metrics(appraisal.npv, appraisal.irr, appraisal.payback_years)
}

// ── Risk assessment ─────────────────────────────────────────────────

/// The scenario's key risk drivers, break-even and investment figures,
/// gathered for the report layer. Plain numbers, no formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub initial_investment:         Money,
    pub demand:                     DemandTier,
    pub growth_rate:                Percent,
    pub cost_tier:                  CostTier,
    pub cost_growth_rate:           Percent,
    pub starting_margin:            Ratio,
    pub final_margin:               Ratio,
    pub discount_rate:              Percent,
    pub payback_years:              Option<f64>,
    /// Monthly revenue at the scenario's starting level.
    pub break_even_monthly_revenue: Money,
    pub first_year_revenue:         Money,
    pub first_year_cash_flow:       Money,
    pub final_year_cash_flow:       Money,
    pub npv:                        Money,
}

pub fn assess_risk(
    params: &ScenarioParameters,
    projection: &ProjectionSeries,
    appraisal: &AppraisalResult,
) -> RiskAssessment {
    let start = starting_revenue(params.baseline_revenue, params.demand);
    let first = projection.first();
    let last = projection.last();

    RiskAssessment {
        initial_investment:         params.initial_investment,
        demand:                     params.demand,
        growth_rate:                params.growth_rate,
        cost_tier:                  params.cost_tier,
        cost_growth_rate:           params.cost_growth_rate,
        starting_margin:            params.base_margin,
        final_margin:               last.map_or(params.base_margin, |y| y.margin),
        discount_rate:              params.discount_rate,
        payback_years:              appraisal.payback_years,
        break_even_monthly_revenue: start / 12.0,
        first_year_revenue:         first.map_or(0.0, |y| y.revenue),
        first_year_cash_flow:       first.map_or(0.0, |y| y.profit),
        final_year_cash_flow:       last.map_or(0.0, |y| y.profit),
        npv:                        appraisal.npv,
    }
}
