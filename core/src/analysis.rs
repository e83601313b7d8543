//! The analysis pipeline: one scenario in, one report out.
//!
//! STAGE ORDER (fixed):
//!   1. Cost estimate          (catalog -> Low/Average/High)
//!   2. Scenario resolution    (selection + config -> parameters)
//!   3. Baseline breakdown     (baseline revenue -> cost lines)
//!   4. Projection             (parameters -> 10-year series)
//!   5. Appraisal              (investment + profits -> NPV/IRR/payback)
//!   6. Sensitivity            (parameters -> tornado)
//!   7. Recommendation         (appraisal -> verdict)
//!   8. Risk assessment        (parameters + projection + appraisal)
//!
//! RULES:
//!   - Every stage is a pure function of earlier outputs.
//!   - Nothing is cached between calls; the caller threads results
//!     forward explicitly (e.g. into a report view).

use crate::{
    appraisal::{appraise, AppraisalResult},
    config::EngineConfig,
    cost_estimator::{estimate, CostEstimate, InvestmentLevel},
    error::EngineResult,
    financial_breakdown::{breakdown_with, FinancialBreakdown},
    projection::{project_scenario, summarize, ProjectionSeries, ProjectionSummary},
    recommendation::{assess_risk, classify, RecommendationVerdict, RiskAssessment},
    scenario::{ScenarioParameters, ScenarioSelection},
    sensitivity::{tornado_with, TornadoReport},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub parameters:    ScenarioParameters,
    pub cost_estimate: CostEstimate,
    pub breakdown:     FinancialBreakdown,
    pub projection:    ProjectionSeries,
    pub summary:       Option<ProjectionSummary>,
    pub appraisal:     AppraisalResult,
    pub tornado:       TornadoReport,
    pub verdict:       RecommendationVerdict,
    pub risk:          RiskAssessment,
}

/// Resolve a selection against the config and run the full pipeline.
pub fn analyze(config: &EngineConfig, selection: &ScenarioSelection) -> EngineResult<AnalysisReport> {
    let params = selection.resolve(config)?;
    analyze_parameters(config, &params)
}

/// Run the pipeline for callers that already hold resolved parameters.
pub fn analyze_parameters(
    config: &EngineConfig,
    params: &ScenarioParameters,
) -> EngineResult<AnalysisReport> {
    params.validate()?;

    let cost_estimate = estimate(&config.catalog);
    let breakdown = breakdown_with(params.baseline_revenue, &config.cost_ratios);

    let projection = project_scenario(params);
    let summary = summarize(&projection, params.baseline_revenue, params.base_margin);

    let appraisal = appraise(
        params.initial_investment,
        &projection.profits(),
        params.discount_rate,
    );
    let tornado = tornado_with(params, &config.sensitivity);
    let verdict = classify(&appraisal);
    let risk = assess_risk(params, &projection, &appraisal);

    log::info!(
        "analysis: {:?}/{:?} invest={:.0} npv={:.0} irr={} payback={} -> {:?} ({:?} risk)",
        params.demand,
        params.cost_tier,
        params.initial_investment,
        appraisal.npv,
        appraisal.irr.map_or_else(|| "n/a".to_string(), |r| format!("{r:.1}%")),
        appraisal
            .payback_years
            .map_or_else(|| "n/a".to_string(), |p| format!("{p:.1}y")),
        verdict.tier,
        verdict.risk
    );

    Ok(AnalysisReport {
        parameters: params.clone(),
        cost_estimate,
        breakdown,
        projection,
        summary,
        appraisal,
        tornado,
        verdict,
        risk,
    })
}

/// Appraise the same scenario at each investment level without the
/// sensitivity sweep. Used for side-by-side investment comparisons.
pub fn compare_investment_levels(
    config: &EngineConfig,
    selection: &ScenarioSelection,
) -> EngineResult<Vec<(InvestmentLevel, AppraisalResult)>> {
    InvestmentLevel::ALL
        .iter()
        .map(|&level| {
            let params = ScenarioSelection {
                investment_level: level,
                ..selection.clone()
            }
            .resolve(config)?;
            let profits = project_scenario(&params).profits();
            Ok((level, appraise(params.initial_investment, &profits, params.discount_rate)))
        })
        .collect()
}
