//! One-at-a-time NPV sensitivity sweep ("tornado").
//!
//! Each parameter is perturbed up and down by a fixed step with every
//! other input held at its base value. The projection and NPV are fully
//! recomputed for each perturbed scenario through the same code path as
//! the base case, so a zero step reproduces the base NPV bit for bit.
//!
//! Entries are returned ascending by impact. Ties keep declaration order.

use crate::{
    appraisal::{full_cash_flows, npv},
    projection::project_scenario,
    scenario::ScenarioParameters,
    types::{Money, Percent},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityParameter {
    InitialInvestment,
    GrowthRate,
    DiscountRate,
    CostGrowthRate,
}

impl SensitivityParameter {
    /// Declaration order. Also the tie-break order for equal impact.
    pub const ALL: [SensitivityParameter; 4] = [
        SensitivityParameter::InitialInvestment,
        SensitivityParameter::GrowthRate,
        SensitivityParameter::DiscountRate,
        SensitivityParameter::CostGrowthRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SensitivityParameter::InitialInvestment => "Initial Investment",
            SensitivityParameter::GrowthRate        => "Growth Rate",
            SensitivityParameter::DiscountRate      => "Discount Rate",
            SensitivityParameter::CostGrowthRate    => "Cost Growth Rate",
        }
    }

    /// Investment moves by a relative percentage; the rates move by points.
    pub fn is_relative(&self) -> bool {
        matches!(self, SensitivityParameter::InitialInvestment)
    }
}

/// Perturbation size per parameter. The investment step is a percentage
/// of the base amount; the others are percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySteps {
    pub investment_pct:     Percent,
    pub growth_points:      Percent,
    pub discount_points:    Percent,
    pub cost_growth_points: Percent,
}

impl SensitivitySteps {
    pub fn step_for(&self, parameter: SensitivityParameter) -> Percent {
        match parameter {
            SensitivityParameter::InitialInvestment => self.investment_pct,
            SensitivityParameter::GrowthRate        => self.growth_points,
            SensitivityParameter::DiscountRate      => self.discount_points,
            SensitivityParameter::CostGrowthRate    => self.cost_growth_points,
        }
    }
}

impl Default for SensitivitySteps {
    fn default() -> Self {
        Self {
            investment_pct:     20.0,
            growth_points:      2.0,
            discount_points:    2.0,
            cost_growth_points: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityEntry {
    pub parameter:  SensitivityParameter,
    /// Step applied, as configured (percent or points).
    pub step:       Percent,
    /// NPV change for the negative perturbation.
    pub delta_low:  Money,
    /// NPV change for the positive perturbation.
    pub delta_high: Money,
}

impl SensitivityEntry {
    pub fn max_abs_delta(&self) -> Money {
        self.delta_low.abs().max(self.delta_high.abs())
    }

    /// Distance between the two perturbed NPVs.
    pub fn swing(&self) -> Money {
        (self.delta_high - self.delta_low).abs()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TornadoReport {
    pub base_scenario: ScenarioParameters,
    pub base_npv:      Money,
    /// Ascending by `max_abs_delta`.
    pub entries:       Vec<SensitivityEntry>,
}

impl TornadoReport {
    /// Entries from largest to smallest impact, for display.
    pub fn by_impact(&self) -> impl Iterator<Item = &SensitivityEntry> {
        self.entries.iter().rev()
    }

    pub fn most_sensitive(&self) -> Option<&SensitivityEntry> {
        self.entries.last()
    }

    pub fn entry(&self, parameter: SensitivityParameter) -> Option<&SensitivityEntry> {
        self.entries.iter().find(|e| e.parameter == parameter)
    }
}

/// Lowest meaningful rate. At -100% or below a compounding factor is zero
/// or negative.
const RATE_FLOOR: Percent = -100.0;

/// Move a rate by `signed_step` without crossing -100%. A step that would
/// cross it stops halfway between the base rate and the floor instead.
fn shift_rate(parameter: SensitivityParameter, base: Percent, signed_step: Percent) -> Percent {
    let moved = base + signed_step;
    if moved > RATE_FLOOR || base <= RATE_FLOOR {
        return moved;
    }
    let limited = (base + RATE_FLOOR) / 2.0;
    log::warn!(
        "sensitivity: {:?} {base:.2}% {signed_step:+} would reach {moved:.2}%, using {limited:.2}%",
        parameter
    );
    limited
}

/// Copy of `base` with one parameter moved by `signed_step`.
pub fn perturb(
    base: &ScenarioParameters,
    parameter: SensitivityParameter,
    signed_step: Percent,
) -> ScenarioParameters {
    let mut scenario = base.clone();
    match parameter {
        SensitivityParameter::InitialInvestment => {
            scenario.initial_investment = base.initial_investment * (1.0 + signed_step / 100.0);
        }
        SensitivityParameter::GrowthRate => {
            scenario.growth_rate = shift_rate(parameter, base.growth_rate, signed_step);
        }
        SensitivityParameter::DiscountRate => {
            scenario.discount_rate = shift_rate(parameter, base.discount_rate, signed_step);
        }
        SensitivityParameter::CostGrowthRate => {
            scenario.cost_growth_rate = shift_rate(parameter, base.cost_growth_rate, signed_step);
        }
    }
    scenario
}

/// NPV of a scenario: project, prepend the investment, discount.
pub fn scenario_npv(scenario: &ScenarioParameters) -> Money {
    let profits = project_scenario(scenario).profits();
    npv(
        scenario.discount_rate,
        &full_cash_flows(scenario.initial_investment, &profits),
    )
}

pub fn tornado(base: &ScenarioParameters) -> TornadoReport {
    tornado_with(base, &SensitivitySteps::default())
}

pub fn tornado_with(base: &ScenarioParameters, steps: &SensitivitySteps) -> TornadoReport {
    let base_npv = scenario_npv(base);

    let mut entries: Vec<SensitivityEntry> = SensitivityParameter::ALL
        .iter()
        .map(|&parameter| {
            let step = steps.step_for(parameter);
            let npv_high = scenario_npv(&perturb(base, parameter, step));
            let npv_low = scenario_npv(&perturb(base, parameter, -step));
            let entry = SensitivityEntry {
                parameter,
                step,
                delta_low:  npv_low - base_npv,
                delta_high: npv_high - base_npv,
            };
            log::debug!(
                "sensitivity: {:?} ±{step} -> low={:.2} high={:.2}",
                parameter,
                entry.delta_low,
                entry.delta_high
            );
            entry
        })
        .collect();

    // sort_by is stable: equal impact keeps declaration order.
    entries.sort_by(|a, b| a.max_abs_delta().total_cmp(&b.max_abs_delta()));

    TornadoReport {
        base_scenario: base.clone(),
        base_npv,
        entries,
    }
}
