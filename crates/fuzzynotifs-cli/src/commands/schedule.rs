use chrono::Local;
use clap::Subcommand;
use fuzzynotifs_core::{ConfigStore, ReminderQueue, Schedule};
use serde_json::json;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show today's allocated reminder times
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Show the next upcoming reminder
    Next {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open()?;
    let now = Local::now().naive_local();
    let mut config = store.load_or_default(now);

    // The daily rollover precedes allocation; persist before building so
    // the schedule always derives from the saved snapshot.
    config.update_morning(now);
    store.save(&config)?;
    let schedule = Schedule::build(&config)?;

    match action {
        ScheduleAction::Show { json } => {
            if json {
                let rows: Vec<_> = schedule
                    .slots()
                    .iter()
                    .map(|(time, todo)| {
                        json!({
                            "time": time.format("%H:%M:%S%.3f").to_string(),
                            "segment": config.classify(*time),
                            "title": todo.title,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if schedule.is_empty() {
                println!("no reminders allocated (todo list is empty)");
            } else {
                for (time, todo) in schedule.slots() {
                    println!(
                        "{}  {:<8}  {}",
                        time.format("%H:%M:%S"),
                        config.classify(*time).to_string(),
                        todo.title
                    );
                }
            }
        }
        ScheduleAction::Next { json } => match ReminderQueue::find_next(&schedule, now.time()) {
            Some((time, todo)) => {
                if json {
                    let row = json!({
                        "time": time.format("%H:%M:%S%.3f").to_string(),
                        "title": todo.title,
                    });
                    println!("{row}");
                } else {
                    println!("next: {} at {}", todo.title, time.format("%H:%M:%S"));
                }
            }
            None => {
                if json {
                    println!("{}", json!({ "time": null }));
                } else {
                    println!("no more reminders today");
                }
            }
        },
    }

    Ok(())
}
