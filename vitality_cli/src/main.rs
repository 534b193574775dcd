use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vitality_core::*;

#[derive(Parser)]
#[command(name = "vitality")]
#[command(about = "Character progression and recovery from daily fitness metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// History file (JSON lines, one day per line)
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Extra workouts to merge (CSV: date,type,category,minutes)
    #[arg(long, global = true)]
    workouts_csv: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the character snapshot from history (default)
    Stats {
        /// Only replay days on or before this date (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Override the configured condition policy
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Apply each day's health impact during replay
        #[arg(long)]
        daily_health: bool,

        /// Resume from and update the checkpoint file
        #[arg(long)]
        checkpoint: bool,
    },

    /// Recovery score for a date
    Recovery {
        /// Date to score (YYYY-MM-DD); defaults to the latest recorded day
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Condition levels and health impact for a date
    Conditions {
        /// Date to evaluate (YYYY-MM-DD); defaults to the latest recorded day
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Print the level curve
    Levels {
        /// Highest level to list
        #[arg(long, default_value_t = 20)]
        up_to: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    PerDay,
    UniformLatest,
}

impl From<PolicyArg> for ConditionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::PerDay => ConditionPolicy::PerDay,
            PolicyArg::UniformLatest => ConditionPolicy::UniformLatest,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    vitality_core::logging::init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data.data_dir = dir;
    }

    match cli.command {
        Some(Commands::Stats {
            as_of,
            policy,
            daily_health,
            checkpoint,
        }) => cmd_stats(&cli, &config, as_of, policy, daily_health, checkpoint),
        Some(Commands::Recovery { date }) => cmd_recovery(&cli, &config, date),
        Some(Commands::Conditions { date }) => cmd_conditions(&cli, &config, date),
        Some(Commands::Levels { up_to }) => cmd_levels(&cli, up_to),
        None => cmd_stats(&cli, &config, None, None, false, false),
    }
}

fn load_history(cli: &Cli, config: &Config) -> Result<History> {
    let path = cli
        .history
        .clone()
        .unwrap_or_else(|| config.data.history_path());

    let mut history = History::load_jsonl(&path)?;

    if let Some(ref csv_path) = cli.workouts_csv {
        let merged = history.merge_workouts_csv(csv_path)?;
        tracing::info!("Merged {} workouts from {:?}", merged, csv_path);
    }

    Ok(history)
}

fn resolve_date(history: &History, date: Option<NaiveDate>) -> Result<NaiveDate> {
    date.or_else(|| history.last_date())
        .ok_or_else(|| Error::History("history is empty".into()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_stats(
    cli: &Cli,
    config: &Config,
    as_of: Option<NaiveDate>,
    policy: Option<PolicyArg>,
    daily_health: bool,
    use_checkpoint: bool,
) -> Result<()> {
    let history = load_history(cli, config)?;

    let mut options = RecomputeOptions::from_config(&config.engine);
    options.as_of = as_of;
    if let Some(policy) = policy {
        options.policy = policy.into();
    }
    options.apply_daily_health |= daily_health;

    let engine = ProgressionEngine::new(options);
    let checkpoint_path = config.data.checkpoint_path();

    let snapshot = if use_checkpoint {
        let snapshot = match Checkpoint::load(&checkpoint_path)? {
            Some(checkpoint) => engine.resume(&checkpoint, &history)?,
            None => engine.recompute(&history)?,
        };
        snapshot.checkpoint.save(&checkpoint_path)?;
        snapshot
    } else {
        engine.recompute(&history)?
    };

    if cli.json {
        return print_json(&snapshot);
    }

    display_stats(&snapshot);
    Ok(())
}

fn cmd_recovery(cli: &Cli, config: &Config, date: Option<NaiveDate>) -> Result<()> {
    let history = load_history(cli, config)?;
    let date = resolve_date(&history, date)?;

    let Some(breakdown) = recovery_for(&history, date)? else {
        return Err(Error::History(format!("no record for {}", date)));
    };

    if cli.json {
        return print_json(&breakdown);
    }

    println!("\nRecovery for {}", date);
    println!("─────────────────────────────────────────");
    println!("  Sleep score:      {:>4}", breakdown.sleep);
    println!("  Workload penalty: {:>4}", -breakdown.workload);
    println!("  Fatigue penalty:  {:>4}", -breakdown.fatigue);
    println!("  Total:            {:>4}  ({:?})", breakdown.total, breakdown.status);
    println!();
    Ok(())
}

fn cmd_conditions(cli: &Cli, config: &Config, date: Option<NaiveDate>) -> Result<()> {
    let history = load_history(cli, config)?;
    let date = resolve_date(&history, date)?;

    let Some(conditions) = conditions_for(&history, date)? else {
        return Err(Error::History(format!("no record for {}", date)));
    };
    let impact = calculate_health_impact(&conditions);

    if cli.json {
        return print_json(&serde_json::json!({
            "date": date,
            "conditions": conditions,
            "health_impact": impact,
        }));
    }

    println!("\nConditions for {}", date);
    println!("─────────────────────────────────────────");
    println!("  Hunger:     {:<9?} {:>+6.1}", conditions.hunger, impact.hunger);
    println!("  Sleepiness: {:<9?} {:>+6.1}", conditions.sleepiness, impact.sleepiness);
    println!("  Thirst:     {:<9?} {:>+6.1}", conditions.thirst, impact.thirst);
    println!("  Energy:     {:<9?} {:>+6.1}", conditions.energy, impact.energy);
    println!("  Health change:      {:>+6.1}", impact.total);
    println!();
    Ok(())
}

fn cmd_levels(cli: &Cli, up_to: u32) -> Result<()> {
    let rows = progression::level_table(up_to);

    if cli.json {
        return print_json(&rows);
    }

    println!("{:>5}  {:>10}  {:>10}", "Level", "XP", "Max HP");
    for row in rows {
        println!("{:>5}  {:>10}  {:>10}", row.level, row.xp_required, row.max_health);
    }
    Ok(())
}

fn display_stats(snapshot: &Snapshot) {
    let stats = &snapshot.stats;
    let progress = level_progress(stats.xp, stats.level);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  LEVEL {:<3}  {:>6} XP  ({:>3.0}% to next)", stats.level, stats.xp, progress * 100.0);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Health: {} / {}", stats.health, stats.max_health);
    println!();
    for stat in PhysicalStat::ALL {
        println!("  {:<12} {:>5}", format!("{:?}", stat), stats.physical(stat));
    }
    println!();
    for stat in PhysiologicalStat::ALL {
        println!("  {:<12} {:>5}", format!("{:?}", stat), stats.physiological(stat));
    }
    println!();
    println!(
        "  Replayed {} days, {} workouts ({} skipped), {} level-ups",
        snapshot.summary.days_replayed,
        snapshot.summary.workouts_applied,
        snapshot.summary.workouts_skipped,
        snapshot.summary.level_ups
    );
    if snapshot.summary.level_capped {
        println!("  XP is past the top of the level curve; level capped");
    }
    println!();
}
