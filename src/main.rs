use clap::{Parser, Subcommand};
use lifequest::commands;
use lifequest::error::Result;
use lifequest::model::Scope;
use lifequest::output::Format;

#[derive(Parser)]
#[command(
    name = "lifequest",
    version,
    about = "Gamified personal quest tracker: tasks, goals, calendar, XP"
)]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,
    /// Shorthand for --format pretty
    #[arg(long, global = true, hide = true)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new .lifequest/ workspace in the current directory
    Init,
    /// Add a new quest
    Add {
        /// Quest title
        title: String,
        /// Free-text note
        #[arg(long, short)]
        note: Option<String>,
        /// Due date (YYYY-MM-DD); the deadline is end of that day, local time
        #[arg(long)]
        due: Option<String>,
        /// Repeat spec: integer 1-127, day list like 'mon,wed,fri', 'daily', or 'weekdays'
        #[arg(long)]
        repeat: Option<String>,
        /// Goal to link (id or unique prefix)
        #[arg(long)]
        goal: Option<String>,
    },
    /// List quests
    List {
        /// Only completed quests
        #[arg(long, conflicts_with = "pending")]
        done: bool,
        /// Only pending quests
        #[arg(long)]
        pending: bool,
        /// Only quests past their deadline and not completed (view-computed)
        #[arg(long)]
        failed: bool,
        /// Only quests linked to this goal
        #[arg(long)]
        goal: Option<String>,
        /// Only quests due on this date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// Display a single quest
    Show {
        /// Quest id or unique prefix
        id: String,
    },
    /// Edit quest fields
    Edit {
        /// Quest id or unique prefix
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New note
        #[arg(long, short)]
        note: Option<String>,
        /// Remove the note
        #[arg(long, conflicts_with = "note")]
        clear_note: bool,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        /// New repeat spec
        #[arg(long)]
        repeat: Option<String>,
        /// Stop the quest from repeating
        #[arg(long, conflicts_with = "repeat")]
        clear_repeat: bool,
    },
    /// Mark a quest done (or undone with --undone)
    Toggle {
        /// Quest id or unique prefix
        id: String,
        /// Flip back to pending
        #[arg(long)]
        undone: bool,
    },
    /// Delete a quest
    Delete {
        /// Quest id or unique prefix
        id: String,
    },
    /// Dashboard for today: overdue, pending, completed, progress
    Today {
        /// Keep refreshing every minute and across midnight
        #[arg(long)]
        watch: bool,
    },
    /// Month grid with per-day completion status
    Calendar {
        /// Month to show (YYYY-MM), default current
        #[arg(long)]
        month: Option<String>,
        /// Also list the quests of one date (YYYY-MM-DD)
        #[arg(long)]
        select: Option<String>,
    },
    /// Manage goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Show XP and level
    Profile,
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Create a goal
    Add {
        /// Goal title
        title: String,
        /// Goal horizon
        #[arg(long, value_enum, default_value = "short")]
        scope: Scope,
        /// How many completions count as 100%
        #[arg(long, default_value_t = 0)]
        target: u32,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },
    /// List goals with progress
    List,
    /// Display a goal and its linked quests
    Show {
        /// Goal id or unique prefix
        id: String,
    },
    /// Edit goal fields
    Edit {
        /// Goal id or unique prefix
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New horizon
        #[arg(long, value_enum)]
        scope: Option<Scope>,
        /// New target count
        #[arg(long)]
        target: Option<u32>,
        /// New start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Remove the start date
        #[arg(long, conflicts_with = "start")]
        clear_start: bool,
        /// New end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Remove the end date
        #[arg(long, conflicts_with = "end")]
        clear_end: bool,
    },
    /// Delete a goal; linked quests are kept, their links cleared
    Delete {
        /// Goal id or unique prefix
        id: String,
    },
    /// Link a quest to a goal, or detach it when --goal is omitted
    Assign {
        /// Quest id or unique prefix
        task: String,
        /// Goal id or unique prefix
        #[arg(long)]
        goal: Option<String>,
    },
}

fn run(cli: Cli, format: Format) -> Result<()> {
    match cli.command {
        Commands::Init => commands::init::run(&std::env::current_dir()?, format),
        Commands::Add {
            title,
            note,
            due,
            repeat,
            goal,
        } => commands::add::run(title, note, due, repeat, goal, format),
        Commands::List {
            done,
            pending,
            failed,
            goal,
            due,
        } => commands::list::run(done, pending, failed, goal, due, format),
        Commands::Show { id } => commands::show::run(id, format),
        Commands::Edit {
            id,
            title,
            note,
            clear_note,
            due,
            clear_due,
            repeat,
            clear_repeat,
        } => commands::edit::run(
            id,
            title,
            note,
            clear_note,
            due,
            clear_due,
            repeat,
            clear_repeat,
            format,
        ),
        Commands::Toggle { id, undone } => commands::toggle::run(id, undone, format),
        Commands::Delete { id } => commands::delete::run(id, format),
        Commands::Today { watch } => commands::today::run(watch, format),
        Commands::Calendar { month, select } => commands::calendar::run(month, select, format),
        Commands::Goal { command } => match command {
            GoalCommands::Add {
                title,
                scope,
                target,
                start,
                end,
            } => commands::goal::add(title, scope, target, start, end, format),
            GoalCommands::List => commands::goal::list(format),
            GoalCommands::Show { id } => commands::goal::show(id, format),
            GoalCommands::Edit {
                id,
                title,
                scope,
                target,
                start,
                clear_start,
                end,
                clear_end,
            } => commands::goal::edit(
                id,
                title,
                scope,
                target,
                start,
                clear_start,
                end,
                clear_end,
                format,
            ),
            GoalCommands::Delete { id } => commands::goal::delete(id, format),
            GoalCommands::Assign { task, goal } => commands::goal::assign(task, goal, format),
        },
        Commands::Profile => commands::profile::run(format),
    }
}

fn main() {
    let cli = Cli::parse();
    let format = if cli.pretty {
        Format::Pretty
    } else {
        cli.format
    };
    if let Err(e) = run(cli, format) {
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
