//! Ten-year revenue / margin / profit projection.
//!
//! Revenue compounds from a demand-adjusted starting point:
//!   revenue[y] = start * (1 + g)^(y-1)
//!
//! Margin compression uses a single policy everywhere, inverse compounding:
//!   margin[y] = base_margin / (1 + c)^(y-1)
//! Costs compound independently and the fixed base margin is divided by
//! the compounded cost multiplier, so margin stays above zero for any
//! cost growth above -100%.
//!
//! profit[y] = revenue[y] * margin[y]

use crate::{
    scenario::{DemandTier, ScenarioParameters},
    types::{pct, Money, Percent, Ratio},
};
use serde::{Deserialize, Serialize};

/// Starting-revenue swing for the non-average demand tiers.
pub const DEMAND_OFFSET: Ratio = 0.15;

pub fn demand_offset(tier: DemandTier) -> Ratio {
    match tier {
        DemandTier::Weak         => -DEMAND_OFFSET,
        DemandTier::Average      => 0.0,
        DemandTier::AboveAverage => DEMAND_OFFSET,
    }
}

/// Year-1 revenue for the given demand tier.
pub fn starting_revenue(baseline_revenue: Money, tier: DemandTier) -> Money {
    match tier {
        DemandTier::Average => baseline_revenue,
        _ => baseline_revenue * (1.0 + demand_offset(tier)),
    }
}

/// Compound growth factor after `elapsed` whole years.
fn compound(rate: Percent, elapsed: usize) -> f64 {
    (1.0 + pct(rate)).powi(elapsed as i32)
}

/// Margin in `year` (1-based) under inverse-compounding compression.
pub fn compressed_margin(base_margin: Ratio, cost_growth_rate: Percent, year: usize) -> Ratio {
    base_margin / compound(cost_growth_rate, year.saturating_sub(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYear {
    pub year:    usize,
    pub revenue: Money,
    pub margin:  Ratio,
    pub profit:  Money,
}

/// Years 1..=horizon in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSeries {
    pub years: Vec<ProjectionYear>,
}

impl ProjectionSeries {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn first(&self) -> Option<&ProjectionYear> {
        self.years.first()
    }

    pub fn last(&self) -> Option<&ProjectionYear> {
        self.years.last()
    }

    pub fn revenues(&self) -> Vec<Money> {
        self.years.iter().map(|y| y.revenue).collect()
    }

    pub fn margins(&self) -> Vec<Ratio> {
        self.years.iter().map(|y| y.margin).collect()
    }

    /// The operating cash flows fed to appraisal.
    pub fn profits(&self) -> Vec<Money> {
        self.years.iter().map(|y| y.profit).collect()
    }

    /// Cash flows as if margin never compressed. Used to isolate the
    /// cost-growth effect when comparing against `profits()`.
    pub fn flat_margin_profits(&self, base_margin: Ratio) -> Vec<Money> {
        self.years.iter().map(|y| y.revenue * base_margin).collect()
    }
}

pub fn project(
    baseline_revenue: Money,
    demand: DemandTier,
    growth_rate: Percent,
    base_margin: Ratio,
    cost_growth_rate: Percent,
    horizon: usize,
) -> ProjectionSeries {
    let start = starting_revenue(baseline_revenue, demand);

    let years: Vec<ProjectionYear> = (1..=horizon)
        .map(|year| {
            let revenue = start * compound(growth_rate, year - 1);
            let margin = compressed_margin(base_margin, cost_growth_rate, year);
            ProjectionYear {
                year,
                revenue,
                margin,
                profit: revenue * margin,
            }
        })
        .collect();

    if let (Some(first), Some(last)) = (years.first(), years.last()) {
        log::debug!(
            "projection: {:?} g={:.2}% c={:.2}% y1 rev={:.2} m={:.4} | y{} rev={:.2} m={:.4}",
            demand,
            growth_rate,
            cost_growth_rate,
            first.revenue,
            first.margin,
            last.year,
            last.revenue,
            last.margin
        );
    }

    ProjectionSeries { years }
}

pub fn project_scenario(params: &ScenarioParameters) -> ProjectionSeries {
    project(
        params.baseline_revenue,
        params.demand,
        params.growth_rate,
        params.base_margin,
        params.cost_growth_rate,
        params.horizon,
    )
}

// ── Summary metrics ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstYearMetrics {
    pub revenue:            Money,
    pub monthly_revenue:    Money,
    pub profit:             Money,
    pub margin:             Ratio,
    /// Year-1 revenue vs the unadjusted baseline, in percent.
    pub revenue_change_pct: Percent,
    /// Year-1 profit vs baseline revenue at base margin, in percent.
    pub profit_change_pct:  Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalYearMetrics {
    pub year:               usize,
    pub revenue:            Money,
    pub monthly_revenue:    Money,
    pub profit:             Money,
    pub margin:             Ratio,
    /// Final-year revenue vs year-1 revenue, in percent.
    pub revenue_growth_pct: Percent,
    /// Final-year margin vs base margin, in percent.
    pub margin_change_pct:  Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub revenue:               Money,
    pub monthly_revenue:       Money,
    pub profit:                Money,
    /// Total profit over total revenue.
    pub margin:                Ratio,
    pub avg_annual_growth_pct: Percent,
    pub avg_margin_impact_pct: Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub first_year: FirstYearMetrics,
    pub final_year: FinalYearMetrics,
    pub average:    AverageMetrics,
}

/// Percent change of `value` against `reference`; zero when the reference is zero.
fn change_pct(value: f64, reference: f64) -> Percent {
    if reference == 0.0 {
        0.0
    } else {
        (value / reference - 1.0) * 100.0
    }
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Headline metrics for the first year, final year and horizon average.
/// Returns None for an empty series.
pub fn summarize(
    series: &ProjectionSeries,
    baseline_revenue: Money,
    base_margin: Ratio,
) -> Option<ProjectionSummary> {
    let first = series.first()?;
    let last = series.last()?;
    let n = series.len() as f64;

    let total_revenue: Money = series.years.iter().map(|y| y.revenue).sum();
    let total_profit: Money = series.years.iter().map(|y| y.profit).sum();
    let total_margin: Ratio = series.years.iter().map(|y| y.margin).sum();

    let avg_annual_growth_pct = if series.len() > 1 && first.revenue > 0.0 && last.revenue >= 0.0 {
        ((last.revenue / first.revenue).powf(1.0 / (n - 1.0)) - 1.0) * 100.0
    } else {
        0.0
    };

    Some(ProjectionSummary {
        first_year: FirstYearMetrics {
            revenue:            first.revenue,
            monthly_revenue:    first.revenue / 12.0,
            profit:             first.profit,
            margin:             safe_div(first.profit, first.revenue),
            revenue_change_pct: change_pct(first.revenue, baseline_revenue),
            profit_change_pct:  change_pct(first.profit, baseline_revenue * base_margin),
        },
        final_year: FinalYearMetrics {
            year:               last.year,
            revenue:            last.revenue,
            monthly_revenue:    last.revenue / 12.0,
            profit:             last.profit,
            margin:             safe_div(last.profit, last.revenue),
            revenue_growth_pct: change_pct(last.revenue, first.revenue),
            margin_change_pct:  change_pct(last.margin, base_margin),
        },
        average: AverageMetrics {
            revenue:               total_revenue / n,
            monthly_revenue:       total_revenue / n / 12.0,
            profit:                total_profit / n,
            margin:                safe_div(total_profit, total_revenue),
            avg_annual_growth_pct,
            avg_margin_impact_pct: change_pct(total_margin / n, base_margin),
        },
    })
}
