use std::{io::Write, path::PathBuf, time::Duration};

use clap::Parser;
use deskpilot::{
    agent::{Granularity, Task},
    build_orchestrator, init_tracing,
    shared::{GlobalConfig, GroundingStrategy},
};

#[derive(Debug, Parser)]
#[command(name = "deskpilot", version, about = "Drive the desktop with mouse and keyboard to complete a task")]
struct Cli {
    /// Task in natural language; read from stdin when omitted.
    task: Option<String>,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ceiling on orchestrator nodes plus oracle rounds.
    #[arg(long)]
    recursion_limit: Option<usize>,

    /// `single_shot` or `step_wise`.
    #[arg(long)]
    granularity: Option<Granularity>,

    /// `none`, `detect_and_match` or `regression`.
    #[arg(long)]
    grounding: Option<GroundingStrategy>,

    /// Press win+d before starting.
    #[arg(long)]
    show_desktop: bool,

    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> deskpilot::Result<()> {
    let mut config = GlobalConfig::load(cli.config.as_deref())?;
    if let Some(limit) = cli.recursion_limit {
        config.recursion_limit = limit;
    }
    if let Some(granularity) = cli.granularity {
        config.granularity = granularity;
    }
    if let Some(grounding) = cli.grounding {
        config.grounding = grounding;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.show_desktop |= cli.show_desktop;
    init_tracing(&config.log_level);

    let text = match cli.task {
        Some(task) => task,
        None => prompt_task()?,
    };
    if text.trim().is_empty() {
        println!("⚠️ no task given, nothing to do");
        return Ok(());
    }
    let task = Task::new(text)?;

    let mut orchestrator = build_orchestrator(&config)?;
    if config.show_desktop {
        println!("🖥️ showing the desktop");
        orchestrator.desktop_mut().key_combination(&["win", "d"])?;
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    println!("🚀 task: {task}");
    let report = orchestrator.run(task).await?;

    println!(
        "🎉 done in {}s: {} planning, {} acting, {} replanning rounds",
        (report.finished_at - report.started_at).num_seconds(),
        report.planning_rounds,
        report.acting_rounds,
        report.replanning_rounds,
    );
    for (i, step) in report.steps_completed.iter().enumerate() {
        println!("  ✅ {}. {}", i + 1, step);
    }
    if !report.final_plan.is_empty() {
        println!("📋 steps left:\n{}", report.final_plan.render());
    }
    if let Some(last) = report.history.last() {
        println!("🤖 {}", last.text());
    }
    Ok(())
}

fn prompt_task() -> deskpilot::Result<String> {
    print!("📝 task: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
