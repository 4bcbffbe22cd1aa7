use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::balance::BalanceReport;
use super::strategies::StrategyReport;

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn fmt_delta(value: f64) -> String {
    format!("{value:+.2}")
}

pub fn write_balance_console(
    out: &mut dyn Write,
    report: &BalanceReport,
    elapsed: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Action Balance Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=========================".cyan())?;
    writeln!(
        out,
        "Games: {}  Players: {}  Seed: {}  Time: {elapsed:?}",
        report.games, report.players, report.seed
    )?;
    if report.aborted_games > 0 {
        writeln!(
            out,
            "{}",
            format!("⚠️  {} games hit the round cap", report.aborted_games).yellow()
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "Profile averages".bold())?;
    for profile in &report.profiles {
        writeln!(
            out,
            "  {:<18} {:>7.2}  ({} player-games)",
            profile.profile.name(),
            profile.avg_score,
            profile.games
        )?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "{}",
        format!(
            "  {:<18} {:<26} {:>6} {:>8} {:>8} {:>8}",
            "Profile", "Action", "Use", "Used", "Unused", "Delta"
        )
        .bold()
    )?;
    for row in &report.actions {
        let delta = row.marginal_delta.map_or_else(
            || "-".normal(),
            |d| {
                let text = fmt_delta(d);
                if d >= 0.0 { text.green() } else { text.red() }
            },
        );
        writeln!(
            out,
            "  {:<18} {:<26} {:>5.0}% {:>8} {:>8} {:>8}",
            row.profile.name(),
            row.action,
            row.use_rate * 100.0,
            fmt_opt(row.avg_points_if_used),
            fmt_opt(row.avg_points_if_not),
            delta
        )?;
    }
    Ok(())
}

pub fn write_balance_markdown(out: &mut dyn Write, report: &BalanceReport) -> Result<()> {
    writeln!(out, "# Wildfire Evacuation Action Balance\n")?;
    writeln!(out, "- **Games**: {}", report.games)?;
    writeln!(out, "- **Players per game**: {}", report.players)?;
    writeln!(out, "- **Seed**: {}", report.seed)?;
    writeln!(out, "- **Aborted games**: {}\n", report.aborted_games)?;

    writeln!(out, "## Profile Averages\n")?;
    writeln!(out, "| Profile | Player-games | Avg score |")?;
    writeln!(out, "|---|---:|---:|")?;
    for profile in &report.profiles {
        writeln!(
            out,
            "| {} | {} | {:.2} |",
            profile.profile.name(),
            profile.games,
            profile.avg_score
        )?;
    }

    writeln!(out, "\n## Actions\n")?;
    writeln!(
        out,
        "| Profile | Action | Use rate | Avg if used | Avg if not | Marginal delta |"
    )?;
    writeln!(out, "|---|---|---:|---:|---:|---:|")?;
    for row in &report.actions {
        writeln!(
            out,
            "| {} | {} | {:.2} | {} | {} | {} |",
            row.profile.name(),
            row.action,
            row.use_rate,
            fmt_opt(row.avg_points_if_used),
            fmt_opt(row.avg_points_if_not),
            row.marginal_delta.map_or_else(|| "-".to_string(), fmt_delta)
        )?;
    }
    Ok(())
}

pub fn write_strategy_console(
    out: &mut dyn Write,
    report: &StrategyReport,
    elapsed: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "🎯 Strategy Evaluation".bright_cyan().bold())?;
    writeln!(out, "{}", "======================".cyan())?;
    writeln!(
        out,
        "Games per cell: {}  Players: {}  Seed: {}  Time: {elapsed:?}",
        report.games, report.players, report.seed
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!(
            "  {:<18} {:<9} {:>8} {:>7} {:>6} {:>8}",
            "Profile", "Strategy", "Avg", "StdDev", "Win", "vs Rand"
        )
        .bold()
    )?;
    for row in &report.rows {
        let delta = fmt_delta(row.delta_vs_random);
        let delta = if row.delta_vs_random >= 0.0 {
            delta.green()
        } else {
            delta.red()
        };
        writeln!(
            out,
            "  {:<18} {:<9} {:>8.2} {:>7.2} {:>5.0}% {:>8}",
            row.profile.name(),
            row.strategy.label(),
            row.avg_score,
            row.std_dev,
            row.win_rate * 100.0,
            delta
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "🏆 Best Strategy per Profile".bright_yellow().bold())?;
    writeln!(out, "{}", "===========================".yellow())?;
    for profile in wildfire_game::Character::ALL {
        if let Some(best) = report.best_for(profile) {
            writeln!(
                out,
                "{}: {} ({:.2})",
                profile.name(),
                best.strategy.label().green(),
                best.avg_score
            )?;
        }
    }
    Ok(())
}

pub fn write_strategy_markdown(out: &mut dyn Write, report: &StrategyReport) -> Result<()> {
    writeln!(out, "# Wildfire Evacuation Strategy Evaluation\n")?;
    writeln!(out, "- **Games per cell**: {}", report.games)?;
    writeln!(out, "- **Players per game**: {}", report.players)?;
    writeln!(out, "- **Seed**: {}\n", report.seed)?;
    writeln!(
        out,
        "| Profile | Strategy | Avg score | Std dev | Win rate | Delta vs random |"
    )?;
    writeln!(out, "|---|---|---:|---:|---:|---:|")?;
    for row in &report.rows {
        writeln!(
            out,
            "| {} | {} | {:.2} | {:.2} | {:.2} | {} |",
            row.profile.name(),
            row.strategy.label(),
            row.avg_score,
            row.std_dev,
            row.win_rate,
            fmt_delta(row.delta_vs_random)
        )?;
    }
    Ok(())
}

pub fn write_json<T: Serialize>(out: &mut dyn Write, report: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
