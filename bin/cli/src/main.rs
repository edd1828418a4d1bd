//! spendwise - terminal client for the spendwise expense tracker.

mod commands;
mod config;
mod error;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use commands::Context;
use config::CliConfig;
use error::CliError;
use output::OutputFormat;
use spendwise_core::{ExpenseId, GoalId, RecurringExpenseId};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Track expenses, budgets, and savings goals against a spendwise server.
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the spendwise API (overrides configuration)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding the stored credential and config.toml
    #[arg(long, env = "SPENDWISE_STATE_DIR", global = true)]
    state_dir: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with a username or email
    Login {
        /// Username or email (prompted when omitted)
        username: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "SPENDWISE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },

    /// Log out and forget the stored credential
    Logout,

    /// Show the current session
    Status,

    /// Check that the server is reachable
    Health,

    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        command: ExpenseCommands,
    },

    /// Manage monthly budgets
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },

    /// Manage savings goals
    Goals {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Manage recurring charges
    Recurring {
        #[command(subcommand)]
        command: RecurringCommands,
    },

    /// Show this month's overview
    Dashboard,

    /// Show spending trends
    Analytics,

    /// Ask the assistant about your spending
    Assistant {
        #[command(subcommand)]
        command: AssistantCommands,
    },

    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Subcommand)]
enum ExpenseCommands {
    /// List expenses
    List,
    /// Show one expense
    Show { id: ExpenseId },
    /// Record an expense
    Add {
        amount: f64,
        category: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Date of the expense (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change fields of an expense
    Update {
        id: ExpenseId,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete an expense
    Delete { id: ExpenseId },
}

#[derive(Subcommand)]
enum BudgetCommands {
    /// Show this month's budget
    Current,
    /// Show the budget of a given month
    Show { month: u32, year: i32 },
    /// Set a monthly limit (this month unless --month and --year are given)
    Set {
        limit: f64,
        #[arg(long, requires = "year")]
        month: Option<u32>,
        #[arg(long, requires = "month")]
        year: Option<i32>,
    },
    /// Delete the budget of a given month
    Delete { month: u32, year: i32 },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// List savings goals
    List,
    /// Create a savings goal
    Add {
        name: String,
        #[arg(long)]
        target: f64,
        #[arg(long, default_value_t = 0.0)]
        current: f64,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Change fields of a savings goal
    Update {
        id: GoalId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        current: Option<f64>,
        #[arg(long)]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a savings goal
    Delete { id: GoalId },
}

#[derive(Subcommand)]
enum RecurringCommands {
    /// List recurring charges
    List,
    /// Add a recurring charge
    Add {
        description: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        category: String,
        /// weekly, monthly, or yearly
        #[arg(long, default_value = "monthly")]
        frequency: spendwise_api::Frequency,
        /// First charge (YYYY-MM-DD, default today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Delete a recurring charge
    Delete { id: RecurringExpenseId },
}

#[derive(Subcommand)]
enum AssistantCommands {
    /// Get an analysis of your spending
    Analyze,
    /// Chat with the assistant (interactive unless --message is given)
    Chat {
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show your profile
    Show,
    /// Change your username, email, or password
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Prompt for a new password
        #[arg(long)]
        password: bool,
    },
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<CliConfig, CliError> {
    let state_dir = cli
        .state_dir
        .clone()
        .unwrap_or_else(config::default_state_dir);
    let mut config = CliConfig::load(&state_dir).map_err(|e| CliError::Config {
        message: e.to_string(),
    })?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    Ok(config)
}

async fn run(cli: Cli) -> spendwise_core::Result<(), CliError> {
    let config = load_config(&cli)?;
    debug!(
        base_url = %config.base_url,
        state_dir = %config.state_dir.display(),
        "configuration loaded"
    );

    let ctx = Context::new(&config, cli.format)?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, username, password).await
        }
        Commands::Register { username, email } => {
            commands::auth::register(&ctx, username, email).await
        }
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Status => commands::auth::status(&ctx).await,
        Commands::Health => commands::auth::health(&ctx).await,
        Commands::Expenses { command } => match command {
            ExpenseCommands::List => commands::expenses::list(&ctx).await,
            ExpenseCommands::Show { id } => commands::expenses::show(&ctx, id).await,
            ExpenseCommands::Add {
                amount,
                category,
                description,
                date,
            } => commands::expenses::add(&ctx, amount, category, description, date).await,
            ExpenseCommands::Update {
                id,
                amount,
                category,
                description,
                date,
            } => {
                let changes = commands::expenses::ExpenseChanges {
                    amount,
                    category,
                    description,
                    date,
                };
                commands::expenses::update(&ctx, id, changes).await
            }
            ExpenseCommands::Delete { id } => commands::expenses::delete(&ctx, id).await,
        },
        Commands::Budget { command } => match command {
            BudgetCommands::Current => commands::budget::current(&ctx).await,
            BudgetCommands::Show { month, year } => {
                commands::budget::show(&ctx, month, year).await
            }
            BudgetCommands::Set { limit, month, year } => {
                commands::budget::set(&ctx, limit, month.zip(year)).await
            }
            BudgetCommands::Delete { month, year } => {
                commands::budget::delete(&ctx, month, year).await
            }
        },
        Commands::Goals { command } => match command {
            GoalCommands::List => commands::goals::list(&ctx).await,
            GoalCommands::Add {
                name,
                target,
                current,
                deadline,
                icon,
            } => {
                let draft = spendwise_api::GoalDraft {
                    name,
                    target_amount: target,
                    current_amount: current,
                    deadline,
                    icon,
                };
                commands::goals::add(&ctx, draft).await
            }
            GoalCommands::Update {
                id,
                name,
                target,
                current,
                deadline,
                icon,
            } => {
                let changes = commands::goals::GoalChanges {
                    name,
                    target,
                    current,
                    deadline,
                    icon,
                };
                commands::goals::update(&ctx, id, changes).await
            }
            GoalCommands::Delete { id } => commands::goals::delete(&ctx, id).await,
        },
        Commands::Recurring { command } => match command {
            RecurringCommands::List => commands::recurring::list(&ctx).await,
            RecurringCommands::Add {
                description,
                amount,
                category,
                frequency,
                start,
            } => {
                let start = start.unwrap_or_else(commands::today);
                let draft = spendwise_api::RecurringDraft::new(
                    description,
                    amount,
                    category,
                    frequency,
                    start,
                );
                commands::recurring::add(&ctx, draft).await
            }
            RecurringCommands::Delete { id } => commands::recurring::delete(&ctx, id).await,
        },
        Commands::Dashboard => commands::insights::dashboard(&ctx).await,
        Commands::Analytics => commands::insights::analytics(&ctx).await,
        Commands::Assistant { command } => match command {
            AssistantCommands::Analyze => commands::assistant::analyze(&ctx).await,
            AssistantCommands::Chat { message } => {
                commands::assistant::chat(&ctx, message).await
            }
        },
        Commands::Profile { command } => match command {
            ProfileCommands::Show => commands::profile::show(&ctx).await,
            ProfileCommands::Update {
                username,
                email,
                password,
            } => commands::profile::update(&ctx, username, email, password).await,
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let format = cli.format;

    if let Err(report) = run(cli).await {
        debug!(?report, "command failed");
        let error = report.current_context();
        if format == OutputFormat::Json || !error.shown_by_login_hint() {
            output::print_error(&error.to_string(), format);
        }
        std::process::exit(error.exit_code());
    }
}
