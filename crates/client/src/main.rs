use clap::Parser;
use kpm_client::{init_tracing, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let summary = run(&cli)?;
    match summary.victory {
        Some((stats, boss)) => tracing::info!(
            time = stats.time,
            kills = stats.kills,
            accuracy = stats.accuracy,
            kpm = stats.kpm,
            boss_time = boss.time,
            "run complete"
        ),
        None => tracing::info!(level = summary.level, kills = summary.kills, "tick budget spent"),
    }
    Ok(())
}
