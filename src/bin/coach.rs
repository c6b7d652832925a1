use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use mtt_coach::config::{self, ModelConfig};
use mtt_coach::ev;
use mtt_coach::fake_history::{SkillProfile, fake_history};
use mtt_coach::performance;
use mtt_coach::record::{Format, HistoryFilter, TournamentRecord, sort_most_recent_first};

const DEFAULT_FAKE_COUNT: usize = 40;
const MAX_PRINTED_ROWS: usize = 10;

fn main() -> Result<()> {
    env_logger::init();

    let mut history = load_history()?;
    sort_most_recent_first(&mut history);

    let mut prospect = config::default_prospect();
    if let Some(v) = parse_f64_arg("--buy-in") {
        prospect.buy_in = v;
    }
    if let Some(v) = parse_u32_arg("--field") {
        prospect.field_size = v;
    }
    if let Some(v) = parse_f64_arg("--rake") {
        prospect.rake_fraction = v;
    }
    if let Some(v) = parse_f64_arg("--paid") {
        prospect.paid_fraction = v;
    }
    if let Some(v) = parse_u32_arg("--rebuys") {
        prospect.rebuys = v;
    }
    if let Some(v) = parse_f64_arg("--add-on") {
        prospect.add_on_cost = v;
    }

    let mut filter = if has_flag("--all-stakes") {
        HistoryFilter::default()
    } else {
        HistoryFilter::around_buy_in(prospect.buy_in)
    };
    if let Some(raw) = parse_string_arg("--format") {
        filter.format = Some(
            Format::parse(&raw)
                .ok_or_else(|| anyhow!("unknown format {raw:?} (expected live or online)"))?,
        );
    }
    if let Some(n) = parse_u32_arg("--recent") {
        filter.most_recent = Some(n as usize);
    }

    let config = ModelConfig::default();
    let evaluation = ev::evaluate(&history, &prospect, &filter, None, &config)?;

    println!(
        "Prospect: buy-in {:.2}, field {}, rake {:.1}%, paid {:.1}%, rebuys {}, add-on {:.2}",
        prospect.buy_in,
        prospect.field_size,
        prospect.rake_fraction * 100.0,
        prospect.paid_fraction * 100.0,
        prospect.rebuys,
        prospect.add_on_cost
    );
    println!(
        "Prize pool {:.2} across {} paid seats",
        evaluation.curve.prize_pool, evaluation.curve.num_paid
    );

    println!();
    println!("Payouts:");
    for (idx, payout) in evaluation.curve.payouts.iter().take(MAX_PRINTED_ROWS).enumerate() {
        println!("  {:>3}. {:>10.2}", idx + 1, payout);
    }
    if evaluation.curve.payouts.len() > MAX_PRINTED_ROWS {
        println!(
            "  ... {} more paid seats",
            evaluation.curve.payouts.len() - MAX_PRINTED_ROWS
        );
    }

    if let Some(meta) = &evaluation.meta {
        println!();
        println!(
            "Estimate: {:?} ({:?} confidence, {} samples)",
            meta.method, meta.confidence, meta.sample_size
        );
        if let Some(avg) = meta.avg_percentile {
            println!("Average finish percentile: {:.3}", avg);
        }
        if let Some(expected) = meta.expected_finish {
            println!(
                "Expected finish: {} of {}",
                expected, prospect.field_size
            );
        }
        if !meta.filters_applied.is_empty() {
            println!("Filters: {}", meta.filters_applied.join(", "));
        }
    }

    println!();
    println!(
        "EV {:+.2}  ROI {:+.1}%  ITM {:.1}%  (cost {:.2}, invested {:.2})",
        evaluation.ev,
        evaluation.roi_percent,
        evaluation.itm_probability,
        evaluation.cost,
        evaluation.total_investment
    );

    println!();
    println!("Paid seats if it hits:");
    for row in evaluation.prospect_rows.iter().take(MAX_PRINTED_ROWS) {
        println!(
            "  {:>3}. prize {:>10.2}  p {:>6.2}%  roi {:+9.1}%",
            row.position,
            row.prize,
            row.probability * 100.0,
            row.roi_percent
        );
    }
    if evaluation.prospect_rows.len() > MAX_PRINTED_ROWS {
        println!(
            "  ... {} more paid seats",
            evaluation.prospect_rows.len() - MAX_PRINTED_ROWS
        );
    }

    let summary = performance::overall_performance(&history);
    println!();
    println!(
        "History: {} tournaments, profit {:+.2} on {:.2} invested (ROI {:+.1}%, ITM {:.1}%)",
        summary.total_tournaments,
        summary.total_profit,
        summary.total_investment,
        summary.overall_roi,
        summary.itm_rate
    );
    let breakdown = performance::performance_by_format(&history);
    println!(
        "  Live:   {} played, profit {:+.2}, ROI {:+.1}%",
        breakdown.live.total_tournaments, breakdown.live.total_profit, breakdown.live.overall_roi
    );
    println!(
        "  Online: {} played, profit {:+.2}, ROI {:+.1}%",
        breakdown.online.total_tournaments,
        breakdown.online.total_profit,
        breakdown.online.overall_roi
    );

    Ok(())
}

fn load_history() -> Result<Vec<TournamentRecord>> {
    if let Some(count) = parse_u32_arg("--fake") {
        return Ok(fake_history(count as usize, &SkillProfile::default()));
    }
    if let Some(path) = parse_string_arg("--history").map(PathBuf::from) {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading history {}", path.display()))?;
        let records: Vec<TournamentRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing history {}", path.display()))?;
        return Ok(records);
    }
    Ok(fake_history(DEFAULT_FAKE_COUNT, &SkillProfile::default()))
}

fn parse_f64_arg(name: &str) -> Option<f64> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && let Ok(v) = raw.trim().parse::<f64>()
        {
            return Some(v);
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && let Ok(v) = next.trim().parse::<f64>()
        {
            return Some(v);
        }
    }
    None
}

fn parse_u32_arg(name: &str) -> Option<u32> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && let Ok(v) = raw.trim().parse::<u32>()
        {
            return Some(v);
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && let Ok(v) = next.trim().parse::<u32>()
        {
            return Some(v);
        }
    }
    None
}

fn parse_string_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}=")) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
