use std::error::Error;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{
    EngineError, ExpenseCategory, ExpenseEdit, Ledger, Liters, MoneyCents, Period, PeriodWindow,
    Platform, PlatformAmounts, SqliteStore, TransactionDraft,
};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;
use uuid::Uuid;

mod render;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "rideledger")]
#[command(about = "Earnings and expense ledger for ride-hailing drivers")]
struct Cli {
    /// Settings file; `settings.toml` in the working directory when omitted.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Database connection string, overrides the settings file.
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record the earnings of a day, one amount per platform.
    Earn(EarnArgs),
    /// Record an expense.
    Expense(ExpenseArgs),
    /// Grouped history, newest first.
    History(JsonArg),
    /// Totals over every transaction.
    Dashboard(JsonArg),
    Report(ReportArgs),
    EditEarnings(EditEarningsArgs),
    EditExpense(EditExpenseArgs),
    DeleteEarnings(DateArg),
    DeleteExpense(IdArg),
    Goal(Goal),
}

#[derive(Args, Debug)]
struct JsonArg {
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct DateArg {
    #[arg(long)]
    date: NaiveDate,
}

#[derive(Args, Debug)]
struct IdArg {
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct Amounts {
    #[arg(long)]
    uber: Option<MoneyCents>,
    #[arg(long = "ninety-nine")]
    ninety_nine: Option<MoneyCents>,
    #[arg(long)]
    other: Option<MoneyCents>,
}

impl Amounts {
    fn into_map(self) -> PlatformAmounts {
        [
            (Platform::Uber, self.uber),
            (Platform::NinetyNine, self.ninety_nine),
            (Platform::Other, self.other),
        ]
        .into_iter()
        .filter_map(|(platform, amount)| amount.map(|amount| (platform, amount)))
        .collect()
    }
}

#[derive(Args, Debug)]
struct EarnArgs {
    #[command(flatten)]
    amounts: Amounts,
    /// Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ExpenseArgs {
    #[arg(long)]
    amount: String,
    #[arg(long)]
    category: String,
    /// Only meaningful for fuel.
    #[arg(long)]
    liters: Option<String>,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportPeriod {
    Day,
    Month,
    Year,
    Custom,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[arg(long, value_enum, default_value = "month")]
    period: ReportPeriod,
    /// First day of a custom period.
    #[arg(long, required_if_eq("period", "custom"))]
    from: Option<NaiveDate>,
    /// Last day of a custom period, inclusive.
    #[arg(long, required_if_eq("period", "custom"))]
    to: Option<NaiveDate>,
    /// Print a message ready to be shared instead of the table.
    #[arg(long, conflicts_with = "json")]
    share: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct EditEarningsArgs {
    #[arg(long)]
    date: NaiveDate,
    #[command(flatten)]
    amounts: Amounts,
    /// Move the whole day to another date.
    #[arg(long)]
    new_date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct EditExpenseArgs {
    #[arg(long)]
    id: Uuid,
    #[arg(long)]
    amount: Option<MoneyCents>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, conflicts_with = "clear_liters")]
    liters: Option<Liters>,
    /// Remove the recorded liters.
    #[arg(long)]
    clear_liters: bool,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct Goal {
    #[command(subcommand)]
    command: GoalCommand,
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    Add(GoalAddArgs),
    List(JsonArg),
    Remove(IdArg),
}

#[derive(Args, Debug)]
struct GoalAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    target: MoneyCents,
}

type AppResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "rideledger={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database_url());
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    let ledger = Ledger::new(SqliteStore::new(database));

    match run(&ledger, &settings, cli.command).await {
        Ok(()) => Ok(()),
        Err(EngineError::Validation(err)) => {
            eprintln!("invalid {}: {err}", err.field());
            std::process::exit(2);
        }
        Err(err @ (EngineError::KeyNotFound(_) | EngineError::ExistingKey(_))) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

async fn run(
    ledger: &Ledger<SqliteStore>,
    settings: &settings::Settings,
    command: Command,
) -> Result<(), EngineError> {
    let now = Utc::now();
    match command {
        Command::Earn(args) => {
            let date = args.date.unwrap_or_else(|| now.date_naive());
            let ids = ledger
                .record_earnings(&args.amounts.into_map(), date)
                .await?;
            println!("recorded {} earning(s) on {date}", ids.len());
        }
        Command::Expense(args) => {
            let mut draft = TransactionDraft::expense(&args.category, &args.amount);
            if let Some(date) = args.date {
                draft = draft.with_date(date);
            }
            if let Some(liters) = &args.liters {
                draft = draft.with_liters(liters);
            }
            if let Some(description) = &args.description {
                draft = draft.with_description(description);
            }
            let id = ledger.record(draft, now).await?;
            println!("recorded expense {id}");
        }
        Command::History(args) => {
            let items = ledger.history().await?;
            output(&items, args.json, || render::history(&items));
        }
        Command::Dashboard(args) => {
            let stats = ledger.dashboard().await?;
            let daily = match daily_target(settings)? {
                Some(target) => Some(ledger.daily_goal(target, now).await?),
                None => None,
            };
            if args.json {
                print_json(&serde_json::json!({ "stats": stats, "daily_goal": daily }));
            } else {
                print!("{}", render::summary(&stats));
                if let Some(progress) = daily {
                    println!("{}", render::progress("Daily goal", &progress));
                }
            }
        }
        Command::Report(args) => {
            let window = match args.period {
                ReportPeriod::Day => PeriodWindow::preset(Period::Day, now),
                ReportPeriod::Month => PeriodWindow::preset(Period::Month, now),
                ReportPeriod::Year => PeriodWindow::preset(Period::Year, now),
                ReportPeriod::Custom => {
                    let start = args.from.ok_or(engine::ValidationError::MissingField("from"))?;
                    let end = args.to.ok_or(engine::ValidationError::MissingField("to"))?;
                    PeriodWindow::custom(start, end)?
                }
            };
            let report = ledger.report(window).await?;
            if args.share {
                println!("{}", report.share_message(settings.app.driver.as_deref()));
            } else {
                output(&report, args.json, || render::report(&report));
            }
        }
        Command::EditEarnings(args) => {
            let ops = ledger
                .edit_earnings(args.date, &args.amounts.into_map(), args.new_date)
                .await?;
            print!("{}", render::writes(&ops));
        }
        Command::EditExpense(args) => {
            let original = ledger.expense(args.id).await?;
            let Some(mut edit) = ExpenseEdit::from_expense(&original) else {
                return Err(EngineError::KeyNotFound(args.id.to_string()));
            };
            if let Some(amount) = args.amount {
                edit.amount = amount;
            }
            if let Some(category) = args.category.as_deref() {
                edit = edit.with_category(ExpenseCategory::try_from(category)?);
            }
            if args.clear_liters {
                edit.liters = None;
            } else if args.liters.is_some() {
                edit.liters = args.liters;
            }
            if let Some(date) = args.date {
                edit.date = date;
            }
            if args.description.is_some() {
                edit.description = args.description;
            }
            let op = ledger.edit_expense(args.id, edit).await?;
            print!("{}", render::writes(std::slice::from_ref(&op)));
        }
        Command::DeleteEarnings(args) => {
            let ids = ledger.delete_earnings(args.date).await?;
            println!("deleted {} earning(s) on {}", ids.len(), args.date);
        }
        Command::DeleteExpense(args) => {
            ledger.delete_expense(args.id).await?;
            println!("deleted expense {}", args.id);
        }
        Command::Goal(goal) => match goal.command {
            GoalCommand::Add(args) => {
                let goal = ledger.add_goal(&args.name, args.target, now).await?;
                println!("created goal {}", goal.id);
            }
            GoalCommand::List(args) => {
                let goals = ledger.goals().await?;
                output(&goals, args.json, || render::goals(&goals));
            }
            GoalCommand::Remove(args) => {
                ledger.remove_goal(args.id).await?;
                println!("removed goal {}", args.id);
            }
        },
    }
    Ok(())
}

fn daily_target(settings: &settings::Settings) -> Result<Option<MoneyCents>, EngineError> {
    let Some(raw) = settings.goals.daily.as_deref() else {
        return Ok(None);
    };
    let target: MoneyCents = raw.parse()?;
    Ok(target.is_positive().then_some(target))
}

fn output<T: Serialize>(value: &T, json: bool, text: impl FnOnce() -> String) {
    if json {
        print_json(value);
    } else {
        print!("{}", text());
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(body) => println!("{body}"),
        Err(err) => tracing::error!("failed to serialize output: {err}"),
    }
}
