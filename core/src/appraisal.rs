//! Discounted cash flow appraisal: NPV, IRR and payback period.
//!
//! The full cash-flow sequence is `[-initial_investment] + operating flows`,
//! indexed t = 0..=horizon. Undefined metrics are `None`, never errors.

use crate::types::{pct, Money, Percent};
use serde::{Deserialize, Serialize};

/// Lowest rate searched for an IRR root (-99%).
const IRR_MIN_RATE: f64 = -0.99;
/// Highest rate searched for an IRR root (10,000%).
const IRR_MAX_RATE: f64 = 100.0;
const IRR_MAX_ITERATIONS: u32 = 200;
const IRR_NPV_EPSILON: f64 = 1e-7;
const IRR_RATE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalResult {
    pub npv: Money,
    /// Percent. None when the flows admit no root in the searched range.
    pub irr: Option<Percent>,
    /// Fractional years. None when cumulative cash never turns non-negative.
    pub payback_years: Option<f64>,
    /// Running total of the full cash-flow sequence, t = 0..=horizon.
    pub cumulative_cash_flows: Vec<Money>,
}

pub fn full_cash_flows(initial_investment: Money, cash_flows: &[Money]) -> Vec<Money> {
    std::iter::once(-initial_investment)
        .chain(cash_flows.iter().copied())
        .collect()
}

pub fn cumulative_cash_flows(flows: &[Money]) -> Vec<Money> {
    flows
        .iter()
        .scan(0.0, |running, cf| {
            *running += cf;
            Some(*running)
        })
        .collect()
}

/// Σ cf[t] / (1 + r)^t over the full sequence, r in percent.
///
/// The rate must be above -100%. At -100% every discount factor after
/// t = 0 is zero and the result is not finite; `ScenarioParameters::validate`
/// rejects such rates before analysis.
pub fn npv(discount_rate: Percent, flows: &[Money]) -> Money {
    npv_at(pct(discount_rate), flows)
}

fn npv_at(rate: f64, flows: &[Money]) -> Money {
    let base = 1.0 + rate;
    flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / base.powi(t as i32))
        .sum()
}

/// NPV and its derivative with respect to the rate.
fn npv_and_derivative(rate: f64, flows: &[Money]) -> (f64, f64) {
    let base = 1.0 + rate;
    flows
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(value, slope), (t, cf)| {
            let discount = base.powi(t as i32);
            let value = value + cf / discount;
            let slope = if t > 0 {
                slope - (t as f64) * cf / (discount * base)
            } else {
                slope
            };
            (value, slope)
        })
}

/// Rates probed while bracketing roots: 1-point steps up to 100%,
/// then 5% geometric steps up to the ceiling.
fn irr_search_grid() -> Vec<f64> {
    let mut grid = Vec::with_capacity(300);
    let mut step = 0;
    loop {
        let rate = IRR_MIN_RATE + 0.01 * step as f64;
        if rate >= 1.0 {
            break;
        }
        grid.push(rate);
        step += 1;
    }
    let mut rate = 1.0;
    while rate < IRR_MAX_RATE {
        grid.push(rate);
        rate *= 1.05;
    }
    grid.push(IRR_MAX_RATE);
    grid
}

/// Newton steps kept inside a sign-changing bracket, falling back to
/// bisection whenever a step would leave it.
fn refine_root(flows: &[Money], mut lo: f64, mut hi: f64) -> f64 {
    let f_lo = npv_at(lo, flows);
    let mut rate = (lo + hi) / 2.0;

    for _ in 0..IRR_MAX_ITERATIONS {
        let (value, slope) = npv_and_derivative(rate, flows);
        if value.abs() < IRR_NPV_EPSILON {
            return rate;
        }

        if (value < 0.0) == (f_lo < 0.0) {
            lo = rate;
        } else {
            hi = rate;
        }
        if hi - lo < IRR_RATE_EPSILON {
            return (lo + hi) / 2.0;
        }

        let newton = if slope != 0.0 { rate - value / slope } else { f64::NAN };
        rate = if newton.is_finite() && newton > lo && newton < hi {
            newton
        } else {
            (lo + hi) / 2.0
        };
    }
    rate
}

/// Internal rate of return in percent.
///
/// Requires at least one strictly negative and one strictly positive
/// flow. When several roots exist, the one closest to zero wins.
pub fn irr(flows: &[Money]) -> Option<Percent> {
    let has_outflow = flows.iter().any(|cf| *cf < 0.0);
    let has_inflow = flows.iter().any(|cf| *cf > 0.0);
    if !(has_outflow && has_inflow) {
        log::debug!("appraisal: no sign change in {} cash flows, IRR undefined", flows.len());
        return None;
    }

    let grid = irr_search_grid();
    let values: Vec<f64> = grid.iter().map(|r| npv_at(*r, flows)).collect();

    let mut roots = Vec::new();
    for i in 0..grid.len() {
        if values[i] == 0.0 {
            roots.push(grid[i]);
            continue;
        }
        if i + 1 < grid.len() && values[i + 1] != 0.0 && (values[i] < 0.0) != (values[i + 1] < 0.0) {
            roots.push(refine_root(flows, grid[i], grid[i + 1]));
        }
    }

    log::debug!("appraisal: IRR bracket search found {} root(s)", roots.len());

    roots
        .into_iter()
        .filter(|r| r.is_finite())
        .min_by(|a, b| a.abs().total_cmp(&b.abs()))
        .map(|r| r * 100.0)
}

/// Years until cumulative cash first reaches zero, interpolated within
/// the crossing year. Zero when the t=0 total is already non-negative.
pub fn payback_period(flows: &[Money]) -> Option<f64> {
    let cumulative = cumulative_cash_flows(flows);
    payback_from_cumulative(&cumulative)
}

fn payback_from_cumulative(cumulative: &[Money]) -> Option<f64> {
    let crossing = cumulative.iter().position(|c| *c >= 0.0)?;
    if crossing == 0 {
        return Some(0.0);
    }
    let prev = cumulative[crossing - 1];
    let curr = cumulative[crossing];
    Some((crossing - 1) as f64 + prev.abs() / (curr - prev))
}

pub fn appraise(
    initial_investment: Money,
    cash_flows: &[Money],
    discount_rate: Percent,
) -> AppraisalResult {
    if discount_rate <= -100.0 {
        log::warn!("appraisal: discount rate {discount_rate:.2}% is at or below -100%, NPV is not finite");
    }

    let flows = full_cash_flows(initial_investment, cash_flows);
    let cumulative = cumulative_cash_flows(&flows);

    let result = AppraisalResult {
        npv:                   npv(discount_rate, &flows),
        irr:                   irr(&flows),
        payback_years:         payback_from_cumulative(&cumulative),
        cumulative_cash_flows: cumulative,
    };

    if result.irr.is_none() {
        log::warn!("appraisal: IRR undefined for investment {initial_investment:.2}");
    }
    if result.payback_years.is_none() {
        log::warn!(
            "appraisal: investment {initial_investment:.2} not recovered within {} years",
            cash_flows.len()
        );
    }
    log::debug!(
        "appraisal: npv={:.2} irr={:?} payback={:?}",
        result.npv,
        result.irr,
        result.payback_years
    );

    result
}
