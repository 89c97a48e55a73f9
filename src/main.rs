//! # Taskdash
//!
//! A terminal productivity dashboard. Taskdash loads a list of tasks (title,
//! revenue, hours taken, priority, status) and shows how well time is being
//! turned into revenue, both per task and across the whole list.
//!
//! ## Features
//!
//! *   **ROI ranking**: Tasks are ordered by revenue per hour, best first.
//! *   **Grades**: Each task and the collection as a whole get a grade from
//!     "Needs Improvement" to "Excellent".
//! *   **Dual Interface**:
//!     *   **CLI**: Quick reports (`list`, `metrics`).
//!     *   **TUI**: Interactive dashboard with add, edit, delete and undo.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive dashboard
//! taskdash
//!
//! # Ranked task table (open tasks only, or --all)
//! taskdash list --all
//!
//! # Aggregate metrics, optionally as JSON
//! taskdash metrics --json
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `a`: Add new task
//! *   `s` / `Space`: Cycle status (Todo -> In Progress -> Done)
//! *   `r`: Edit revenue
//! *   `h`: Edit hours taken
//! *   `n`: Edit notes
//! *   `d`: Delete selected task
//! *   `z`: Undo the last delete
//! *   `x`: Dismiss undo
//! *   `c`: Toggle Show/Hide Done Tasks
//!
//! ## Data
//!
//! Tasks are read once at startup from a JSON array. The file is looked up at
//! `TASKDASH_TASKS`, then in your local data directory
//! (`~/.local/share/taskdash/tasks.json` on Linux). Changes made in the
//! dashboard live in memory only.
//!
//! `TASKDASH_TARGET_RATE` sets the revenue per hour treated as 100% efficient
//! (default 50). Set `RUST_LOG=debug` to see what the loader and store do.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use taskdash::commands::{cmd_list, cmd_metrics};
use taskdash::config::Config;
use taskdash::tui::run_tui;

#[derive(Parser)]
#[command(name = "taskdash", version)]
#[command(about = "Terminal productivity dashboard", long_about = None)]
struct Cli {
    /// Tasks JSON file (overrides TASKDASH_TASKS)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,
    /// Revenue per hour counted as 100% efficient
    #[arg(short, long, global = true)]
    target_rate: Option<f64>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks ranked by ROI
    List {
        /// Include finished tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Show aggregate metrics
    Metrics {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Open interactive dashboard
    Ui,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.file, cli.target_rate);

    match cli.command {
        Some(Commands::List { all }) => cmd_list(&config, all),
        Some(Commands::Metrics { json }) => cmd_metrics(&config, json),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "taskdash", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            run_tui(&config).map_err(|e| anyhow::anyhow!("Error running TUI: {}", e))?;
        }
    }
    Ok(())
}
