mod logic;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::reports;
use logic::{BalanceConfig, Strategy, StrategyConfig, parse_seed, run_balance, run_strategies};
use wildfire_game::RuleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored tables for a terminal
    Console,
    /// Pretty-printed JSON
    Json,
    /// Markdown tables
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RulesPreset {
    /// Interactive rules: doubled d3 movement, cyclic action deck, trading
    Table,
    /// Headless rules: d6 movement, action cards drawn with replacement
    Balance,
}

impl RulesPreset {
    const fn rules(self) -> RuleSet {
        match self {
            Self::Table => RuleSet::table(),
            Self::Balance => RuleSet::balance(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "wildfire-tester", version = "0.1.0")]
#[command(about = "Monte-Carlo balance testing for Wildfire Evacuation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Per-profile action use rates and marginal score deltas
    Balance(RunArgs),
    /// Profile x strategy scores against random opponents
    Strategies {
        #[command(flatten)]
        run: RunArgs,

        /// Only evaluate these strategies (random is always included)
        #[arg(long = "strategy", value_enum)]
        strategies: Vec<Strategy>,
    },
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Games to simulate (per profile/strategy cell for `strategies`)
    #[arg(long, default_value_t = 1000)]
    games: usize,

    /// Players per game
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=5))]
    players: u8,

    /// Base seed: decimal or 0x-prefixed hex
    #[arg(long, default_value = "12345", value_parser = parse_seed_arg)]
    seed: u64,

    /// Rule variant to simulate
    #[arg(long, value_enum, default_value_t = RulesPreset::Balance)]
    rules: RulesPreset,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_seed_arg(token: &str) -> Result<u64, String> {
    parse_seed(token).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let run = match &cli.command {
        Command::Balance(run) | Command::Strategies { run, .. } => run,
    };
    init_logging(run.verbose);

    if run.report == ReportFormat::Console && run.output.is_none() {
        announce_banner();
    }
    if run.output.is_some() {
        colored::control::set_override(false);
    }

    let start_time = Instant::now();
    let mut output_target = OutputTarget::new(run.output.clone())?;
    match &cli.command {
        Command::Balance(run) => write_balance(run, &mut output_target, start_time)?,
        Command::Strategies { run, strategies } => {
            write_strategies(run, strategies, &mut output_target, start_time)?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

fn announce_banner() {
    println!("{}", "🔥 Wildfire Evacuation Balance Tester".bright_cyan().bold());
    println!("{}", "=====================================".cyan());
}

fn balance_config(run: &RunArgs) -> BalanceConfig {
    BalanceConfig::new(run.games, usize::from(run.players), run.seed)
        .with_rules(run.rules.rules())
}

fn strategy_config(run: &RunArgs, strategies: &[Strategy]) -> StrategyConfig {
    StrategyConfig::new(run.games, usize::from(run.players), run.seed)
        .with_rules(run.rules.rules())
        .with_strategies(strategies)
}

fn write_balance(run: &RunArgs, out: &mut OutputTarget, start_time: Instant) -> Result<()> {
    let report = run_balance(&balance_config(run))?;
    match run.report {
        ReportFormat::Json => reports::write_json(out.writer(), &report)?,
        ReportFormat::Markdown => reports::write_balance_markdown(out.writer(), &report)?,
        ReportFormat::Console => {
            reports::write_balance_console(out.writer(), &report, start_time.elapsed())?;
            writeln!(out)?;
            writeln!(out, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }
    Ok(())
}

fn write_strategies(
    run: &RunArgs,
    strategies: &[Strategy],
    out: &mut OutputTarget,
    start_time: Instant,
) -> Result<()> {
    let report = run_strategies(&strategy_config(run, strategies))?;
    match run.report {
        ReportFormat::Json => reports::write_json(out.writer(), &report)?,
        ReportFormat::Markdown => reports::write_strategy_markdown(out.writer(), &report)?,
        ReportFormat::Console => {
            reports::write_strategy_console(out.writer(), &report, start_time.elapsed())?;
            writeln!(out)?;
            writeln!(out, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args(output: PathBuf, report: ReportFormat) -> RunArgs {
        RunArgs {
            games: 3,
            players: 3,
            seed: 7,
            rules: RulesPreset::Balance,
            report,
            verbose: false,
            output: Some(output),
        }
    }

    fn run_to_file(
        name: &str,
        report: ReportFormat,
        write: impl Fn(&RunArgs, &mut OutputTarget) -> Result<()>,
    ) -> String {
        let temp = std::env::temp_dir().join(name);
        let args = base_args(temp.clone(), report);
        let mut out = OutputTarget::new(args.output.clone()).unwrap();
        write(&args, &mut out).unwrap();
        out.flush_inner().unwrap();
        let content = std::fs::read_to_string(&temp).unwrap();
        let _ = std::fs::remove_file(temp);
        content
    }

    #[test]
    fn write_balance_emits_json_output() {
        let content = run_to_file(
            "wildfire-balance-report.json",
            ReportFormat::Json,
            |args, out| write_balance(args, out, Instant::now()),
        );
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["games"], 3);
        assert_eq!(value["players"], 3);
        assert!(value["actions"].is_array());
    }

    #[test]
    fn write_strategies_emits_markdown_output() {
        let content = run_to_file(
            "wildfire-strategies-report.md",
            ReportFormat::Markdown,
            |args, out| write_strategies(args, &[Strategy::Plus], out, Instant::now()),
        );
        assert!(content.starts_with("# Wildfire Evacuation Strategy Evaluation"));
        assert!(content.contains("| plus |"));
        assert!(content.contains("| random |"));
        assert!(!content.contains("| go-kit |"));
    }

    #[test]
    fn console_report_ends_with_total_time() {
        colored::control::set_override(false);
        let content = run_to_file(
            "wildfire-balance-console.txt",
            ReportFormat::Console,
            |args, out| write_balance(args, out, Instant::now()),
        );
        assert!(content.contains("Action Balance Summary"));
        assert!(content.contains("🏁 Total time:"));
    }

    #[test]
    fn presets_map_to_rule_sets() {
        assert_eq!(RulesPreset::Table.rules(), RuleSet::table());
        assert_eq!(RulesPreset::Balance.rules(), RuleSet::balance());
        let run = base_args(PathBuf::from("unused"), ReportFormat::Json);
        assert_eq!(balance_config(&run).rules, RuleSet::balance());
        assert_eq!(strategy_config(&run, &[]).strategies, Strategy::ALL.to_vec());
    }

    #[test]
    fn cli_rejects_out_of_range_players() {
        assert!(Cli::try_parse_from(["wildfire-tester", "balance", "--players", "6"]).is_err());
        assert!(Cli::try_parse_from(["wildfire-tester", "balance", "--players", "1"]).is_err());
        let cli = Cli::try_parse_from(["wildfire-tester", "strategies", "--seed", "0x10"]).unwrap();
        match cli.command {
            Command::Strategies { run, strategies } => {
                assert_eq!(run.seed, 16);
                assert_eq!(run.players, 4);
                assert!(strategies.is_empty());
            }
            Command::Balance(_) => panic!("expected strategies"),
        }
    }
}
