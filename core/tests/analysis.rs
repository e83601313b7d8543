//! End-to-end pipeline tests against the standard configuration.

use franchise_core::{
    analysis::{analyze, analyze_parameters, compare_investment_levels},
    config::EngineConfig,
    cost_estimator::InvestmentLevel,
    error::EngineError,
    recommendation::{RecommendationTier, RiskLevel},
    scenario::{CostTier, DemandTier, ScenarioSelection},
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn selection(demand: DemandTier, cost_tier: CostTier, level: InvestmentLevel) -> ScenarioSelection {
    ScenarioSelection {
        demand,
        cost_tier,
        investment_level: level,
        ..ScenarioSelection::default()
    }
}

#[test]
fn average_scenario_is_recommended() {
    init_logging();
    let config = EngineConfig::standard();
    let report = analyze(&config, &ScenarioSelection::default()).unwrap();

    assert_eq!(report.parameters.initial_investment, 655_500.0);
    assert_eq!(report.parameters.growth_rate, 5.0);
    assert_eq!(report.parameters.cost_growth_rate, 3.0);
    assert_eq!(report.parameters.discount_rate, 13.0);
    assert_eq!(report.projection.len(), 10);

    assert!((report.appraisal.npv - 118_343.08).abs() < 1.0, "{}", report.appraisal.npv);
    let irr = report.appraisal.irr.unwrap();
    assert!((irr - 17.223).abs() < 0.01, "{irr}");
    let payback = report.appraisal.payback_years.unwrap();
    assert!((payback - 4.747).abs() < 0.001, "{payback}");

    assert_eq!(report.verdict.tier, RecommendationTier::Recommended);
    assert_eq!(report.verdict.risk, RiskLevel::Moderate);
    assert_eq!(report.tornado.base_npv, report.appraisal.npv);
    assert!(report.summary.is_some());
}

#[test]
fn weak_demand_is_not_recommended() {
    init_logging();
    let config = EngineConfig::standard();
    let report = analyze(
        &config,
        &selection(DemandTier::Weak, CostTier::Average, InvestmentLevel::Average),
    )
    .unwrap();

    assert_eq!(report.parameters.growth_rate, 0.0);
    assert!((report.appraisal.npv + 100_385.64).abs() < 1.0, "{}", report.appraisal.npv);
    assert!((report.appraisal.irr.unwrap() - 8.84).abs() < 0.01);
    assert_eq!(report.verdict.tier, RecommendationTier::NotRecommended);
    assert_eq!(report.verdict.risk, RiskLevel::High);
}

#[test]
fn strong_demand_low_investment_is_low_risk() {
    let config = EngineConfig::standard();
    let report = analyze(
        &config,
        &selection(DemandTier::AboveAverage, CostTier::BelowAverage, InvestmentLevel::Low),
    )
    .unwrap();

    assert_eq!(report.parameters.initial_investment, 427_500.0);
    assert!((report.appraisal.npv - 680_144.70).abs() < 1.0, "{}", report.appraisal.npv);
    assert!((report.appraisal.irr.unwrap() - 41.23).abs() < 0.01);
    assert!((report.appraisal.payback_years.unwrap() - 2.614).abs() < 0.001);
    assert_eq!(report.verdict.tier, RecommendationTier::Recommended);
    assert_eq!(report.verdict.risk, RiskLevel::Low);
}

#[test]
fn worst_case_never_pays_back() {
    let config = EngineConfig::standard();
    let report = analyze(
        &config,
        &selection(DemandTier::Weak, CostTier::AboveAverage, InvestmentLevel::High),
    )
    .unwrap();

    assert_eq!(report.appraisal.payback_years, None);
    assert!(report.appraisal.npv < 0.0);
    assert!(report.appraisal.irr.unwrap() < 0.0);
    assert_eq!(report.verdict.tier, RecommendationTier::NotRecommended);
}

#[test]
fn overrides_replace_tier_defaults() {
    let config = EngineConfig::standard();
    let sel = ScenarioSelection {
        discount_rate: Some(15.0),
        growth_rate: Some(1.5),
        cost_growth_rate: Some(4.0),
        ..ScenarioSelection::default()
    };
    let report = analyze(&config, &sel).unwrap();
    assert_eq!(report.parameters.discount_rate, 15.0);
    assert_eq!(report.parameters.growth_rate, 1.5);
    assert_eq!(report.parameters.cost_growth_rate, 4.0);

    let base = analyze(&config, &ScenarioSelection::default()).unwrap();
    assert!(report.appraisal.npv < base.appraisal.npv);
}

#[test]
fn invalid_parameters_are_rejected() {
    let config = EngineConfig::standard();
    let mut params = ScenarioSelection::default().resolve(&config).unwrap();
    params.baseline_revenue = -1.0;
    let err = analyze_parameters(&config, &params).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidScenario { field: "baseline_revenue", .. }
    ));

    let sel = ScenarioSelection {
        discount_rate: Some(f64::NAN),
        ..ScenarioSelection::default()
    };
    assert!(analyze(&config, &sel).is_err());

    let sel = ScenarioSelection {
        cost_growth_rate: Some(-100.0),
        ..ScenarioSelection::default()
    };
    assert!(analyze(&config, &sel).is_err());
}

#[test]
fn zero_horizon_yields_empty_projection() {
    let config = EngineConfig::standard();
    let mut params = ScenarioSelection::default().resolve(&config).unwrap();
    params.horizon = 0;
    let report = analyze_parameters(&config, &params).unwrap();

    assert!(report.projection.is_empty());
    assert!(report.summary.is_none());
    assert_eq!(report.appraisal.npv, -655_500.0);
    assert_eq!(report.appraisal.irr, None);
    assert_eq!(report.appraisal.payback_years, None);
    assert_eq!(report.verdict.tier, RecommendationTier::NotRecommended);
}

#[test]
fn investment_levels_order_npv() {
    let config = EngineConfig::standard();
    let levels = compare_investment_levels(&config, &ScenarioSelection::default()).unwrap();

    let order: Vec<_> = levels.iter().map(|(level, _)| *level).collect();
    assert_eq!(order, InvestmentLevel::ALL.to_vec());
    assert!(levels[0].1.npv > levels[1].1.npv);
    assert!(levels[1].1.npv > levels[2].1.npv);
    // Same operating flows, so the gap is the investment gap.
    assert!(((levels[0].1.npv - levels[1].1.npv) - 228_000.0).abs() < 1e-6);
}

#[test]
fn report_serializes_to_json() {
    let config = EngineConfig::standard();
    let report = analyze(&config, &ScenarioSelection::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["parameters"]["demand"], "average");
    assert_eq!(json["verdict"]["tier"], "recommended");
    assert_eq!(json["projection"]["years"].as_array().map(Vec::len), Some(10));
    assert_eq!(json["tornado"]["entries"].as_array().map(Vec::len), Some(4));
}

#[test]
fn data_directory_matches_built_in_config() {
    let loaded = EngineConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../data")).unwrap();
    let standard = EngineConfig::standard();

    assert_eq!(loaded.catalog, standard.catalog);
    assert_eq!(loaded.baseline_revenue, standard.baseline_revenue);
    assert_eq!(loaded.horizon_years, standard.horizon_years);
    assert_eq!(loaded.default_discount_rate, standard.default_discount_rate);
    assert_eq!(loaded.demand_growth, standard.demand_growth);
    assert_eq!(loaded.cost_growth, standard.cost_growth);
    assert_eq!(loaded.sensitivity, standard.sensitivity);
    assert!((loaded.base_margin() - standard.base_margin()).abs() < 1e-12);
    assert!(loaded.cost_ratios.is_balanced());
}

#[test]
fn missing_data_directory_is_an_error() {
    let err = EngineConfig::load("/nonexistent/franchise-data").unwrap_err();
    assert!(err.to_string().contains("Cannot read"));
}

#[test]
fn selection_deserializes_without_overrides() {
    let json = r#"{ "demand": "above_average", "cost_tier": "below_average", "investment_level": "low" }"#;
    let sel: ScenarioSelection = serde_json::from_str(json).unwrap();
    assert_eq!(sel.demand, DemandTier::AboveAverage);
    assert_eq!(sel.discount_rate, None);
}
