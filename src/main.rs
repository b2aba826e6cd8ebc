use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meeting_scheduler::cli::{run_shell, Cli, Command};
use meeting_scheduler::config::load_settings;
use meeting_scheduler::{web, LogNotifier, Scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(granularity) = cli.granularity {
        settings.granularity = granularity;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let schedule = settings.schedule().context("invalid business day in settings")?;
    info!(
        start = %settings.day_start,
        end = %settings.day_end,
        slots = schedule.len(),
        "daily schedule ready"
    );
    let scheduler = Scheduler::new(schedule);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Serve { port, bind } => {
            if let Some(port) = port {
                settings.port = port;
            }
            if let Some(bind) = bind {
                settings.bind_addr = bind;
            }
            println!("Access the scheduler at http://localhost:{}", settings.port);
            web::start_server(&settings, scheduler).await?;
        }
        Command::Shell => {
            let mut scheduler = scheduler;
            scheduler.subscribe(LogNotifier);
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            run_shell(&mut scheduler, stdin.lock(), &mut stdout)?;
        }
    }

    Ok(())
}
