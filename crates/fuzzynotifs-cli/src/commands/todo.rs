use chrono::Local;
use clap::Subcommand;
use fuzzynotifs_core::{BiasCategory, ConfigStore, Todo, TodoPatch};

#[derive(Subcommand)]
pub enum TodoAction {
    /// List todos with their indices
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a todo
    Add {
        /// Reminder title
        #[arg(default_value = "Take a nap")]
        title: String,
        /// Occurrences per day
        #[arg(long, default_value_t = 5)]
        times: i32,
        /// Time-of-day bias: none, morning, morning_only, evening, evening_only, midday
        #[arg(long, default_value = "none")]
        bias: String,
    },
    /// Remove todos by index (see `todo list`)
    Remove {
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Update fields of the todo at an index
    Set {
        index: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        times: Option<i32>,
        #[arg(long)]
        bias: Option<String>,
    },
}

pub fn run(action: TodoAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open()?;
    let now = Local::now().naive_local();
    let mut config = store.load_or_default(now);

    match action {
        TodoAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config.todos)?);
            } else if config.todos.is_empty() {
                println!("no todos configured");
            } else {
                for (index, todo) in config.todos.iter().enumerate() {
                    println!(
                        "{index:>3}  {:<30}  x{:<3}  {}",
                        todo.title, todo.times_per_day, todo.bias
                    );
                }
            }
        }
        TodoAction::Add { title, times, bias } => {
            let bias: BiasCategory = bias.parse()?;
            config.add_todo(Todo::new(title.clone(), times, bias));
            store.save(&config)?;
            println!("added '{title}' ({times}x per day, bias {bias})");
        }
        TodoAction::Remove { indices } => {
            let removed = config.remove_todos(&indices)?;
            store.save(&config)?;
            println!("removed {removed} todo(s)");
        }
        TodoAction::Set {
            index,
            title,
            times,
            bias,
        } => {
            if title.is_none() && times.is_none() && bias.is_none() {
                return Err("nothing to update: pass --title, --times or --bias".into());
            }
            if let Some(title) = title {
                config.update_todo(index, TodoPatch::Title(title))?;
            }
            if let Some(times) = times {
                config.update_todo(index, TodoPatch::TimesPerDay(times))?;
            }
            if let Some(bias) = bias {
                config.update_todo(index, TodoPatch::Bias(bias.parse()?))?;
            }
            store.save(&config)?;
            println!("todo {index} updated");
        }
    }

    Ok(())
}
