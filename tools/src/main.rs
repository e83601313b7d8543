//! appraisal-runner: headless driver for the franchise appraisal engine.
//!
//! Usage:
//!   appraisal-runner --demand average --cost-tier average --investment average
//!   appraisal-runner --demand weak --discount-rate 15 --growth 1.5 --json
//!   appraisal-runner --data-dir ./data --ipc-mode

use anyhow::Result;
use chrono::{DateTime, Utc};
use franchise_core::{
    analysis::{analyze, AnalysisReport},
    config::EngineConfig,
    cost_estimator::{estimate, CostEstimate, InvestmentLevel},
    scenario::{CostTier, DemandTier, ScenarioSelection},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Analyze {
        selection: ScenarioSelection,
    },
    CostEstimate,
    Quit,
}

/// Runner-owned metadata wrapped around an engine report.
#[derive(serde::Serialize)]
struct ReportEnvelope<'a> {
    analysis_id:  String,
    generated_at: DateTime<Utc>,
    report:       &'a AnalysisReport,
}

impl<'a> ReportEnvelope<'a> {
    fn wrap(report: &'a AnalysisReport) -> Self {
        Self {
            analysis_id:  uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            report,
        }
    }
}

#[derive(serde::Serialize)]
struct CostEstimateReply<'a> {
    estimate: CostEstimate,
    items:    Vec<CostLine<'a>>,
}

#[derive(serde::Serialize)]
struct CostLine<'a> {
    category: &'a str,
    low:      f64,
    average:  f64,
    high:     f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json_out = args.iter().any(|a| a == "--json");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str());

    let config = load_config(data_dir)?;

    if ipc_mode {
        let stdin = io::stdin();
        return run_ipc_loop(&config, stdin.lock(), io::stdout());
    }

    let selection = ScenarioSelection {
        demand:           parse_choice(&args, "--demand", DemandTier::Average, parse_demand)?,
        cost_tier:        parse_choice(&args, "--cost-tier", CostTier::Average, parse_cost_tier)?,
        investment_level: parse_choice(&args, "--investment", InvestmentLevel::Average, parse_investment)?,
        discount_rate:    parse_opt(&args, "--discount-rate")?,
        growth_rate:      parse_opt(&args, "--growth")?,
        cost_growth_rate: parse_opt(&args, "--cost-growth")?,
    };

    let report = analyze(&config, &selection)?;

    if json_out {
        let envelope = ReportEnvelope::wrap(&report);
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn load_config(data_dir: Option<&str>) -> Result<EngineConfig> {
    match data_dir {
        Some(dir) => EngineConfig::load(dir),
        None if Path::new("./data/costs/startup_costs.json").exists() => EngineConfig::load("./data"),
        None => {
            log::info!("no data directory found, using built-in reference data");
            Ok(EngineConfig::standard())
        }
    }
}

/// One JSON command per input line, one JSON reply per output line.
/// Runs until `quit` or end of input.
fn run_ipc_loop(config: &EngineConfig, mut input: impl BufRead, mut out: impl Write) -> Result<()> {
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = input.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut out, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Analyze { selection } => match analyze(config, &selection) {
                Ok(report) => {
                    let envelope = ReportEnvelope::wrap(&report);
                    writeln!(out, "{}", serde_json::to_string(&envelope)?)?;
                }
                Err(e) => {
                    log::warn!("ipc: analysis rejected: {e}");
                    write_error(&mut out, &e.to_string())?;
                    continue;
                }
            },
            IpcCommand::CostEstimate => {
                let reply = cost_estimate_reply(config);
                writeln!(out, "{}", serde_json::to_string(&reply)?)?;
            }
        }
        out.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

fn cost_estimate_reply(config: &EngineConfig) -> CostEstimateReply<'_> {
    CostEstimateReply {
        estimate: estimate(&config.catalog),
        items: config
            .catalog
            .entries()
            .iter()
            .map(|e| CostLine {
                category: &e.category,
                low:      e.low,
                average:  e.midpoint(),
                high:     e.high,
            })
            .collect(),
    }
}

fn print_summary(report: &AnalysisReport) {
    let p = &report.parameters;
    let a = &report.appraisal;

    println!("=== SCENARIO ===");
    println!("  demand:          {} ({:+.1}% growth)", p.demand.label(), p.growth_rate);
    println!("  costs:           {} ({:+.1}% growth)", p.cost_tier.label(), p.cost_growth_rate);
    println!("  investment:      ${:.0}", p.initial_investment);
    println!("  discount rate:   {:.1}%", p.discount_rate);
    println!();

    println!("=== STARTUP COSTS ===");
    for level in InvestmentLevel::ALL {
        println!("  {:<14} ${:.0}", level.label(), report.cost_estimate.select(level));
    }
    println!();

    println!("=== PROJECTION ===");
    for y in &report.projection.years {
        println!(
            "  Year {:>2} | Revenue: ${:.0} | Margin: {:.2}% | Profit: ${:.0}",
            y.year,
            y.revenue,
            y.margin * 100.0,
            y.profit
        );
    }
    if let Some(s) = &report.summary {
        println!(
            "  avg annual growth: {:+.1}% | avg margin impact: {:+.1}%",
            s.average.avg_annual_growth_pct, s.average.avg_margin_impact_pct
        );
    }
    println!();

    println!("=== INVESTMENT METRICS ===");
    println!("  NPV:             ${:.0}", a.npv);
    println!("  IRR:             {}", fmt_opt(a.irr, |r| format!("{r:.1}%")));
    println!("  payback:         {}", fmt_opt(a.payback_years, |y| format!("{y:.1} years")));
    println!();

    println!("=== SENSITIVITY (largest impact first) ===");
    for e in report.tornado.by_impact() {
        let unit = if e.parameter.is_relative() { "%" } else { " pts" };
        println!(
            "  {:<20} ±{}{unit} | low: {:+.0} | high: {:+.0}",
            e.parameter.label(),
            e.step,
            e.delta_low,
            e.delta_high
        );
    }
    println!();

    println!("=== RECOMMENDATION ===");
    println!("  verdict:         {}", report.verdict.tier.label());
    println!("  risk:            {}", report.verdict.risk.label());
    for reason in &report.verdict.rationale {
        println!("  - {reason}");
    }
    println!(
        "  break-even monthly revenue: ${:.0}",
        report.risk.break_even_monthly_revenue
    );
}

fn fmt_opt(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map_or_else(|| "N/A".to_string(), f)
}

fn parse_opt(args: &[String], flag: &str) -> Result<Option<f64>> {
    match args.windows(2).find(|w| w[0] == flag) {
        None => Ok(None),
        Some(w) => w[1]
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{flag}: cannot parse '{}': {e}", w[1])),
    }
}

fn parse_choice<T>(
    args: &[String],
    flag: &str,
    default: T,
    parse: fn(&str) -> Option<T>,
) -> Result<T> {
    match args.windows(2).find(|w| w[0] == flag) {
        None => Ok(default),
        Some(w) => parse(&w[1]).ok_or_else(|| anyhow::anyhow!("{flag}: unknown value '{}'", w[1])),
    }
}

fn parse_demand(s: &str) -> Option<DemandTier> {
    DemandTier::ALL.into_iter().find(|t| t.key() == s)
}

fn parse_cost_tier(s: &str) -> Option<CostTier> {
    CostTier::ALL.into_iter().find(|t| t.key() == s)
}

fn parse_investment(s: &str) -> Option<InvestmentLevel> {
    InvestmentLevel::ALL.into_iter().find(|l| l.key() == s)
}
