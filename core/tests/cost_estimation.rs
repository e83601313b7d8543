//! Startup cost estimation tests.

use franchise_core::{
    config::EngineConfig,
    cost_estimator::{estimate, CostCatalog, CostCatalogEntry, CostEstimate, InvestmentLevel},
    error::EngineError,
};

/// Low/Average/High totals match the reference catalog sums.
#[test]
fn standard_catalog_totals() {
    let config = EngineConfig::standard();
    let totals = estimate(&config.catalog);

    assert_eq!(totals.low, 427_500.0);
    assert_eq!(totals.high, 883_500.0);
    assert_eq!(totals.average, 655_500.0);
}

/// Average is the sum of per-entry midpoints and sits between Low and High.
#[test]
fn totals_are_ordered() {
    let catalog = CostCatalog::new(vec![
        CostCatalogEntry::new("Signage", 6_000.0, 20_000.0),
        CostCatalogEntry::new("Insurance", 5_000.0, 7_000.0),
        CostCatalogEntry::new("Initial Franchise Fee", 35_000.0, 35_000.0),
    ])
    .unwrap();

    let totals = estimate(&catalog);

    assert_eq!(totals.low, 46_000.0);
    assert_eq!(totals.average, 13_000.0 + 6_000.0 + 35_000.0);
    assert_eq!(totals.high, 62_000.0);
    assert!(totals.low <= totals.average && totals.average <= totals.high);
}

/// An empty catalog is a degenerate configuration, not an error.
#[test]
fn empty_catalog_yields_zero_totals() {
    let catalog = CostCatalog::new(vec![]).unwrap();
    assert_eq!(estimate(&catalog), CostEstimate::default());
}

#[test]
fn select_picks_matching_total() {
    let totals = CostEstimate { low: 1.0, average: 2.0, high: 3.0 };
    assert_eq!(totals.select(InvestmentLevel::Low), 1.0);
    assert_eq!(totals.select(InvestmentLevel::Average), 2.0);
    assert_eq!(totals.select(InvestmentLevel::High), 3.0);
}

/// Line items at each level add up to the matching total.
#[test]
fn line_items_sum_to_estimate() {
    let config = EngineConfig::standard();
    let totals = estimate(&config.catalog);

    for level in InvestmentLevel::ALL {
        let items = config.catalog.line_items(level);
        assert_eq!(items.len(), 16);
        let sum: f64 = items.iter().map(|(_, amount)| amount).sum();
        assert!(
            (sum - totals.select(level)).abs() < 1e-6,
            "{level:?}: line items sum {sum} != total {}",
            totals.select(level)
        );
    }
}

#[test]
fn unknown_category_lookup_fails() {
    let config = EngineConfig::standard();
    let err = config.catalog.get("Helicopter").unwrap_err();
    assert!(matches!(err, EngineError::UnknownCategory { .. }));

    let fee = config.catalog.get("Initial Franchise Fee").unwrap();
    assert_eq!(fee.midpoint(), 35_000.0);
}
