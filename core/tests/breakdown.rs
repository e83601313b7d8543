//! Baseline financial breakdown tests.

use franchise_core::financial_breakdown::{breakdown, breakdown_with, CostRatios};

#[test]
fn standard_ratios_sum_to_one_within_tolerance() {
    let ratios = CostRatios::STANDARD;
    assert!(
        ratios.is_balanced(),
        "ratios sum to {:.6}, outside ±{}",
        ratios.total(),
        CostRatios::SUM_TOLERANCE
    );
}

#[test]
fn each_line_is_a_fixed_share_of_revenue() {
    let b = breakdown(530_899.0);

    assert_eq!(b.revenue, 530_899.0);
    assert!((b.cogs - 530_899.0 * 0.2443).abs() < 1e-6);
    assert!((b.labor - 530_899.0 * 0.3138).abs() < 1e-6);
    assert!((b.occupancy - 530_899.0 * 0.1150).abs() < 1e-6);
    assert!((b.operating - 530_899.0 * 0.0095).abs() < 1e-6);
    assert!((b.royalties - 530_899.0 * 0.0400).abs() < 1e-6);
    assert!((b.franchise_expense - 530_899.0 * 0.0268).abs() < 1e-6);
    assert!((b.gross_profit - 530_899.0 * 0.2507).abs() < 1e-6);
}

/// Costs plus gross profit reconstruct revenue to within the ratio tolerance.
#[test]
fn components_reconstruct_revenue() {
    let revenue = 1_000_000.0;
    let b = breakdown(revenue);
    let rebuilt = b.total_costs() + b.gross_profit;
    assert!(
        (rebuilt - revenue).abs() <= revenue * CostRatios::SUM_TOLERANCE + 1e-6,
        "rebuilt {rebuilt} vs revenue {revenue}"
    );
}

#[test]
fn zero_revenue_gives_zero_lines() {
    let b = breakdown(0.0);
    assert_eq!(b.total_costs(), 0.0);
    assert_eq!(b.gross_profit, 0.0);
}

/// Negative revenue is not validated; it scales proportionally.
#[test]
fn negative_revenue_scales_proportionally() {
    let b = breakdown(-100.0);
    assert!((b.labor + 31.38).abs() < 1e-9);
}

#[test]
fn components_list_six_cost_lines_in_order() {
    let ratios = CostRatios::STANDARD;
    let b = breakdown_with(200_000.0, &ratios);
    let lines = b.components(&ratios);

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0].name, "Cost of Goods Sold");
    assert_eq!(lines[5].name, "Franchise-Related");
    let sum: f64 = lines.iter().map(|l| l.amount).sum();
    assert!((sum - b.total_costs()).abs() < 1e-6);
}
