//! Baseline P&L breakdown.
//!
//! Splits an annual revenue figure into its six cost lines and gross
//! profit using fixed proportional ratios. No sign validation: a
//! negative revenue scales proportionally like any other value.

use crate::types::{Money, Ratio};
use serde::{Deserialize, Serialize};

/// Share of revenue taken by each line. Shares sum to 1.0 within 0.0001.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRatios {
    pub cogs:              Ratio,
    pub labor:             Ratio,
    pub occupancy:         Ratio,
    pub operating:         Ratio,
    pub royalties:         Ratio,
    pub franchise_expense: Ratio,
    pub gross_profit:      Ratio,
}

impl CostRatios {
    pub const STANDARD: CostRatios = CostRatios {
        cogs:              0.2443,
        labor:             0.3138,
        occupancy:         0.1150,
        operating:         0.0095,
        royalties:         0.0400,
        franchise_expense: 0.0268,
        gross_profit:      0.2507,
    };

    /// Maximum allowed drift of `total()` away from 1.0.
    pub const SUM_TOLERANCE: Ratio = 0.0001;

    pub fn total(&self) -> Ratio {
        self.cost_total() + self.gross_profit
    }

    pub fn cost_total(&self) -> Ratio {
        self.cogs
            + self.labor
            + self.occupancy
            + self.operating
            + self.royalties
            + self.franchise_expense
    }

    pub fn is_balanced(&self) -> bool {
        // Small epsilon so the ±0.0001 boundary survives float rounding.
        (self.total() - 1.0).abs() <= Self::SUM_TOLERANCE + 1e-9
    }
}

impl Default for CostRatios {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialBreakdown {
    pub revenue:           Money,
    pub cogs:              Money,
    pub labor:             Money,
    pub occupancy:         Money,
    pub operating:         Money,
    pub royalties:         Money,
    pub franchise_expense: Money,
    pub gross_profit:      Money,
}

/// One cost line with its amount and revenue share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownComponent {
    pub name:   &'static str,
    pub amount: Money,
    pub share:  Ratio,
}

impl FinancialBreakdown {
    pub fn total_costs(&self) -> Money {
        self.cogs
            + self.labor
            + self.occupancy
            + self.operating
            + self.royalties
            + self.franchise_expense
    }

    /// The six cost lines in canonical order, excluding revenue and gross profit.
    pub fn components(&self, ratios: &CostRatios) -> Vec<BreakdownComponent> {
        vec![
            BreakdownComponent { name: "Cost of Goods Sold", amount: self.cogs,              share: ratios.cogs },
            BreakdownComponent { name: "Labor",              amount: self.labor,             share: ratios.labor },
            BreakdownComponent { name: "Occupancy",          amount: self.occupancy,         share: ratios.occupancy },
            BreakdownComponent { name: "Operating Expenses", amount: self.operating,         share: ratios.operating },
            BreakdownComponent { name: "Royalties",          amount: self.royalties,         share: ratios.royalties },
            BreakdownComponent { name: "Franchise-Related",  amount: self.franchise_expense, share: ratios.franchise_expense },
        ]
    }
}

/// Breakdown using the standard ratio table.
pub fn breakdown(baseline_revenue: Money) -> FinancialBreakdown {
    breakdown_with(baseline_revenue, &CostRatios::STANDARD)
}

pub fn breakdown_with(revenue: Money, ratios: &CostRatios) -> FinancialBreakdown {
    FinancialBreakdown {
        revenue,
        cogs:              revenue * ratios.cogs,
        labor:             revenue * ratios.labor,
        occupancy:         revenue * ratios.occupancy,
        operating:         revenue * ratios.operating,
        royalties:         revenue * ratios.royalties,
        franchise_expense: revenue * ratios.franchise_expense,
        gross_profit:      revenue * ratios.gross_profit,
    }
}
