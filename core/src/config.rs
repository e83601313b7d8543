use crate::{
    cost_estimator::{CostCatalog, CostCatalogEntry},
    financial_breakdown::CostRatios,
    scenario::{CostTier, DemandTier},
    sensitivity::SensitivitySteps,
    types::{Money, Percent, DEFAULT_HORIZON_YEARS},
};
use serde::{Deserialize, Serialize};

/// Default annual growth per demand tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandGrowthDefaults {
    pub weak:          Percent,
    pub average:       Percent,
    pub above_average: Percent,
}

impl DemandGrowthDefaults {
    pub fn for_tier(&self, tier: DemandTier) -> Percent {
        match tier {
            DemandTier::Weak         => self.weak,
            DemandTier::Average      => self.average,
            DemandTier::AboveAverage => self.above_average,
        }
    }
}

impl Default for DemandGrowthDefaults {
    fn default() -> Self {
        Self { weak: 0.0, average: 5.0, above_average: 10.0 }
    }
}

/// Default annual cost growth per cost tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostGrowthDefaults {
    pub below_average: Percent,
    pub average:       Percent,
    pub above_average: Percent,
}

impl CostGrowthDefaults {
    pub fn for_tier(&self, tier: CostTier) -> Percent {
        match tier {
            CostTier::BelowAverage => self.below_average,
            CostTier::Average      => self.average,
            CostTier::AboveAverage => self.above_average,
        }
    }
}

impl Default for CostGrowthDefaults {
    fn default() -> Self {
        Self { below_average: 2.0, average: 3.0, above_average: 7.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct StartupCostsFile {
    items: CostCatalog,
}

#[derive(Debug, Clone, Deserialize)]
struct ScenarioDefaultsFile {
    baseline_revenue:      Money,
    #[serde(default = "default_horizon")]
    horizon_years:         usize,
    default_discount_rate: Percent,
    #[serde(default)]
    cost_ratios:           CostRatios,
    demand_growth:         DemandGrowthDefaults,
    cost_growth:           CostGrowthDefaults,
    #[serde(default)]
    sensitivity:           SensitivitySteps,
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON_YEARS
}

/// All reference data the engine reads. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Trailing twelve-month revenue of the reference location.
    pub baseline_revenue:      Money,
    pub horizon_years:         usize,
    pub default_discount_rate: Percent,
    pub cost_ratios:           CostRatios,
    pub catalog:               CostCatalog,
    pub demand_growth:         DemandGrowthDefaults,
    pub cost_growth:           CostGrowthDefaults,
    pub sensitivity:           SensitivitySteps,
}

impl EngineConfig {
    /// Load from the data/ directory.
    /// When no data directory is available, use EngineConfig::standard().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let costs_path = format!("{data_dir}/costs/startup_costs.json");
        let costs_content = std::fs::read_to_string(&costs_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {costs_path}: {e}"))?;
        let costs_file: StartupCostsFile = serde_json::from_str(&costs_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {costs_path}: {e}"))?;

        let defaults_path = format!("{data_dir}/scenarios/scenario_defaults.json");
        let defaults_content = std::fs::read_to_string(&defaults_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {defaults_path}: {e}"))?;
        let defaults: ScenarioDefaultsFile = serde_json::from_str(&defaults_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {defaults_path}: {e}"))?;

        if !defaults.cost_ratios.is_balanced() {
            anyhow::bail!(
                "{defaults_path}: cost ratios sum to {:.4}, expected 1.0",
                defaults.cost_ratios.total()
            );
        }
        if !(defaults.baseline_revenue.is_finite() && defaults.baseline_revenue >= 0.0) {
            anyhow::bail!(
                "{defaults_path}: baseline_revenue {} must be a non-negative number",
                defaults.baseline_revenue
            );
        }

        log::debug!(
            "config: loaded {} cost items and scenario defaults from {data_dir}",
            costs_file.items.len()
        );

        Ok(Self {
            baseline_revenue:      defaults.baseline_revenue,
            horizon_years:         defaults.horizon_years,
            default_discount_rate: defaults.default_discount_rate,
            cost_ratios:           defaults.cost_ratios,
            catalog:               costs_file.items,
            demand_growth:         defaults.demand_growth,
            cost_growth:           defaults.cost_growth,
            sensitivity:           defaults.sensitivity,
        })
    }

    /// Built-in reference data for the single-location model.
    pub fn standard() -> Self {
        Self {
            baseline_revenue:      530_899.0,
            horizon_years:         DEFAULT_HORIZON_YEARS,
            default_discount_rate: 13.0,
            cost_ratios:           CostRatios::STANDARD,
            catalog:               standard_catalog(),
            demand_growth:         DemandGrowthDefaults::default(),
            cost_growth:           CostGrowthDefaults::default(),
            sensitivity:           SensitivitySteps::default(),
        }
    }

    /// Gross profit share of revenue before any cost growth.
    pub fn base_margin(&self) -> f64 {
        self.cost_ratios.gross_profit
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_catalog() -> CostCatalog {
    let items = [
        ("Initial Franchise Fee",                   35_000.0,  35_000.0),
        ("Computer System",                          5_000.0,   8_000.0),
        ("Insurance",                                5_000.0,   7_000.0),
        ("Professional Fees",                        5_000.0,   7_500.0),
        ("Travel, Lodging, and Meals",               2_000.0,   8_000.0),
        ("Equipment",                              100_000.0, 160_000.0),
        ("Construction and Leasehold Improvements", 200_000.0, 460_000.0),
        ("Signage",                                  6_000.0,  20_000.0),
        ("Permits and Licenses",                       500.0,   5_000.0),
        ("Project Management & Architect Fees",     10_000.0,  35_000.0),
        ("Office Equipment and Supplies",              500.0,   1_000.0),
        ("Initial Inventory",                        8_000.0,  12_000.0),
        ("Utilities Lease and Security Deposits",    4_500.0,  30_000.0),
        ("Grand Opening and Initial Advertising",    5_000.0,  10_000.0),
        ("Pre-opening Employee Wages",               1_000.0,   5_000.0),
        ("Additional Funds (3 Months)",             40_000.0,  80_000.0),
    ];

    let entries = items
        .iter()
        .map(|(name, low, high)| CostCatalogEntry::new(*name, *low, *high))
        .collect();

    // Guarded by `standard_catalog_is_complete`.
    CostCatalog::new(entries).unwrap_or_else(|e| {
        log::error!("config: built-in cost catalog rejected, using an empty catalog: {e}");
        CostCatalog::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_complete() {
        let config = EngineConfig::standard();
        assert_eq!(config.catalog.len(), 16);
        assert!(crate::cost_estimator::estimate(&config.catalog).low > 0.0);
        assert!(config.catalog.get("Equipment").is_ok());
    }

    #[test]
    fn standard_ratios_are_balanced() {
        assert!(EngineConfig::standard().cost_ratios.is_balanced());
    }

    #[test]
    fn scenario_defaults_file_fills_optional_sections() {
        let json = r#"{
            "baseline_revenue": 100000.0,
            "default_discount_rate": 12.0,
            "demand_growth": { "weak": 1.0, "average": 5.0, "above_average": 10.0 },
            "cost_growth": { "below_average": 2.0, "average": 3.0, "above_average": 7.0 }
        }"#;
        let parsed: ScenarioDefaultsFile = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.horizon_years, DEFAULT_HORIZON_YEARS);
        assert_eq!(parsed.cost_ratios, CostRatios::STANDARD);
        assert_eq!(parsed.sensitivity, SensitivitySteps::default());
        assert_eq!(parsed.demand_growth.for_tier(DemandTier::Weak), 1.0);
    }
}
