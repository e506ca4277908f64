use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rehab-cli", version, about = "Rehab Tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exercises for a day, with completion marks
    Plan(commands::plan::PlanArgs),
    /// Toggle completion of an exercise
    Check(commands::check::CheckArgs),
    /// Guided breathing and breathing session tracking
    Breathe {
        #[command(subcommand)]
        action: commands::breathe::BreatheAction,
    },
    /// Streak and completion statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Weekend self-assessment
    Assess {
        #[command(subcommand)]
        action: commands::assess::AssessAction,
    },
    /// Daily notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Reminder settings
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Export or clear stored data
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Breathe { action } => commands::breathe::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Assess { action } => commands::assess::run(action),
        Commands::Note { action } => commands::note::run(action),
        Commands::Notify { action } => commands::notify::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
