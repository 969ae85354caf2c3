use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fuzzynotifs-cli", version, about = "FuzzyNotifs CLI - fuzzy reminder scheduling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Todo list management
    Todo {
        #[command(subcommand)]
        action: commands::todo::TodoAction,
    },
    /// Inspect the allocated reminder schedule
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Fire reminders in the foreground until today's schedule is exhausted
    Run(commands::run::RunArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Todo { action } => commands::todo::run(action),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Run(args) => commands::run::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
