use std::io::{self, Write};

use chrono::{Duration, Local, Utc};
use clap::Args;
use fuzzynotifs_core::{ConfigStore, Event, ReminderQueue, Schedule};

#[derive(Args)]
pub struct RunArgs {
    /// Emit line-delimited JSON events instead of human-readable lines
    #[arg(long)]
    pub json: bool,
    /// Skip the terminal bell cue on delivery
    #[arg(long)]
    pub no_bell: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Timers are the only async work, so a single-threaded runtime does.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run_loop(args))
}

async fn run_loop(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open()?;
    let startup = Local::now().naive_local();
    let mut config = store.load_or_default(startup);

    let rolled = config.update_morning(startup);
    store.save(&config)?;
    if rolled {
        emit(
            args.json,
            &Event::DayRolledOver {
                day_start: config.day_start,
                at: Utc::now(),
            },
            &format!(
                "day window start moved to {}",
                config.day_start.format("%H:%M:%S")
            ),
        )?;
    }

    let schedule = Schedule::build(&config)?;
    emit(
        args.json,
        &Event::ScheduleBuilt {
            slot_count: schedule.len(),
            day_start: config.day_start,
            day_end: config.day_end,
            at: Utc::now(),
        },
        &format!(
            "schedule built: {} reminder(s) between {} and {}",
            schedule.len(),
            config.day_start.format("%H:%M:%S"),
            config.day_end.format("%H:%M:%S")
        ),
    )?;

    let mut queue = ReminderQueue::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut now = Local::now().naive_local().time();

    loop {
        let tx = tx.clone();
        let Some(queued_for) = queue.queue_next(&schedule, now, move |todo, time| {
            let _ = tx.send((todo, time));
        }) else {
            emit(
                args.json,
                &Event::ScheduleExhausted { at: Utc::now() },
                "no more reminders today",
            )?;
            break;
        };

        let queued_title = &schedule.slots()[&queued_for].title;
        emit(
            args.json,
            &Event::ReminderQueued {
                title: queued_title.clone(),
                time: queued_for,
                at: Utc::now(),
            },
            &format!("queued '{queued_title}' for {}", queued_for.format("%H:%M:%S")),
        )?;

        let Some((todo, time)) = rx.recv().await else {
            break;
        };
        emit(
            args.json,
            &Event::ReminderDue {
                title: todo.title.clone(),
                time,
                at: Utc::now(),
            },
            &format!(
                "reminder: {} (scheduled {})",
                todo.title,
                time.format("%H:%M:%S")
            ),
        )?;
        if !args.json && !args.no_bell {
            print!("\x07");
            io::stdout().flush()?;
        }

        // Resume the scan just past the fired slot. At millisecond slot
        // precision this cannot skip a distinct later slot, and it stops an
        // instant re-arm from delivering the same slot twice.
        now = time + Duration::milliseconds(1);
    }

    queue.cancel_all();
    Ok(())
}

fn emit(json: bool, event: &Event, human: &str) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("{human}");
    }
    Ok(())
}
