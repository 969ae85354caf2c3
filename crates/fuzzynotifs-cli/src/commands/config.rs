use chrono::{Duration, Local, NaiveTime};
use clap::Subcommand;
use fuzzynotifs_core::ConfigStore;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full configuration as JSON
    Show,
    /// Read a config value by field name
    Get {
        /// Field name, e.g. seed, cooldown, day_start
        key: String,
    },
    /// Write a config value by field name (stored form: times in ms)
    Set { key: String, value: String },
    /// Set the reminder day window
    Window {
        /// Window start, HH:MM or HH:MM:SS
        start: String,
        /// Window end, HH:MM or HH:MM:SS
        end: String,
    },
    /// Set the minimum spacing between reminders, in minutes
    Cooldown { minutes: i64 },
    /// Set the allocation seed
    Seed { seed: u64 },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open()?;
    let now = Local::now().naive_local();
    let mut config = store.load_or_default(now);

    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown config key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            store.save(&config)?;
            println!("config updated");
        }
        ConfigAction::Window { start, end } => {
            config.day_start = parse_time(&start)?;
            config.day_end = parse_time(&end)?;
            config.validate()?;
            store.save(&config)?;
            println!(
                "day window set to {} - {}",
                config.day_start.format("%H:%M:%S"),
                config.day_end.format("%H:%M:%S")
            );
        }
        ConfigAction::Cooldown { minutes } => {
            if minutes < 0 {
                return Err("cooldown must be zero or more minutes".into());
            }
            config.cooldown = Duration::minutes(minutes);
            store.save(&config)?;
            println!("cooldown set to {minutes} minutes");
        }
        ConfigAction::Seed { seed } => {
            config.seed = seed;
            store.save(&config)?;
            println!("seed set to {seed}");
        }
    }

    Ok(())
}

fn parse_time(input: &str) -> Result<NaiveTime, Box<dyn std::error::Error>> {
    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(input, format) {
            return Ok(time);
        }
    }
    Err(format!("invalid time '{input}' (expected HH:MM or HH:MM:SS)").into())
}
