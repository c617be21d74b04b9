use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};

use scheduler::{EventSink, LogSink, Pid, RunController, SchedulerConfig};

mod process_table;
use process_table::RunnerFile;

mod render;
use render::{banner, JsonSink, Tee, TextSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Hybrid CPU scheduler simulation
#[derive(Debug, Parser)]
#[command(name = "hybrid-runner", version, about)]
struct Cli {
    /// TOML file with a [scheduler] table and [[process]] entries
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Round robin time slice, in time units
    #[arg(long)]
    quantum: Option<NonZeroUsize>,

    /// Wall clock length of one time unit, 0 runs bursts instantly
    #[arg(long)]
    time_unit_ms: Option<u64>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Route and dispatch only the process with this id
    #[arg(long)]
    single: Option<u32>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn scheduler_config(&self, file: &RunnerFile) -> SchedulerConfig {
        let mut config = file.scheduler;
        if let Some(quantum) = self.quantum {
            config.quantum = quantum;
        }
        if let Some(time_unit_ms) = self.time_unit_ms {
            config.time_unit_ms = time_unit_ms;
        }
        config
    }
}

fn init_logging(verbose: u8) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Debug);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file = match &cli.config {
        Some(path) => RunnerFile::load(path)?,
        None => RunnerFile::default(),
    };
    let config = cli.scheduler_config(&file);
    let processes = file.process_table();

    let presenter: Arc<dyn EventSink> = match cli.format {
        Format::Text => {
            for line in banner(cli.single.is_some()) {
                println!("{line}");
            }
            Arc::new(TextSink::new(io::stdout()))
        }
        Format::Json => Arc::new(JsonSink::new(io::stdout())),
    };
    let logger: Arc<dyn EventSink> = Arc::new(LogSink);
    let sink = Arc::new(Tee(vec![presenter, logger]));
    let controller = RunController::new(config, sink);

    if let Some(id) = cli.single {
        let Some(pcb) = processes.iter().find(|pcb| pcb.pid() == Pid::new(id)) else {
            bail!("no process with id {id} in the process table");
        };
        controller
            .classify_and_dispatch(pcb)
            .with_context(|| format!("dispatch of {} failed", pcb.pid()))?;
        return Ok(());
    }

    let summary = controller.run(&processes).context("scheduler run failed")?;
    log::debug!(
        "{} of {} dispatches completed",
        summary.completed(),
        summary.dispatches()
    );

    Ok(())
}
