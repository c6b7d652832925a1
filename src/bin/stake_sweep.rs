use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use mtt_coach::config::{self, ModelConfig};
use mtt_coach::fake_history::{SkillProfile, fake_history};
use mtt_coach::record::{TournamentRecord, sort_most_recent_first};
use mtt_coach::sweep::{best_stake, sweep_stakes};

const DEFAULT_MULTIPLIERS: &[f64] = &[0.25, 0.5, 1.0, 2.0, 4.0];
const DEFAULT_FAKE_COUNT: usize = 60;

fn main() -> Result<()> {
    env_logger::init();

    let mut history = load_history()?;
    sort_most_recent_first(&mut history);

    let mut base = config::default_prospect();
    if let Some(v) = parse_f64_arg("--buy-in") {
        base.buy_in = v;
    }
    if let Some(v) = parse_u32_arg("--field") {
        base.field_size = v;
    }
    if let Some(v) = parse_f64_arg("--rake") {
        base.rake_fraction = v;
    }
    if let Some(v) = parse_f64_arg("--paid") {
        base.paid_fraction = v;
    }

    let multipliers =
        parse_multipliers_arg().unwrap_or_else(|| DEFAULT_MULTIPLIERS.to_vec());
    if multipliers.is_empty() {
        return Err(anyhow!("no multipliers resolved"));
    }

    let reports = sweep_stakes(&history, &base, &multipliers, &ModelConfig::default())?;

    println!(
        "Stake sweep over {} records (base buy-in {:.2}, field {})",
        history.len(),
        base.buy_in,
        base.field_size
    );
    println!();
    for report in &reports {
        let confidence = report
            .confidence
            .map(|c| format!("{c:?}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "x{:<5.2} buy-in {:>9.2}  EV {:+10.2}  ROI {:+7.1}%  ITM {:5.1}%  n={:<3} {}",
            report.multiplier,
            report.buy_in,
            report.ev,
            report.roi_percent,
            report.itm_probability,
            report.sample_size,
            confidence
        );
    }

    if let Some(best) = best_stake(&reports) {
        println!();
        println!(
            "Best EV at x{:.2} (buy-in {:.2}): {:+.2}",
            best.multiplier, best.buy_in, best.ev
        );
    }

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

fn parse_multipliers_arg() -> Option<Vec<f64>> {
    let raw = parse_string_arg("--multipliers")?;
    let multipliers = raw
        .split([',', ';', ' '])
        .filter_map(|part| part.trim().parse::<f64>().ok())
        .filter(|m| m.is_finite() && *m > 0.0)
        .collect::<Vec<_>>();
    if multipliers.is_empty() {
        None
    } else {
        Some(multipliers)
    }
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
