//! Earnings and expense ledger for ride-hailing drivers.
//!
//! The core is a set of pure functions over a snapshot of [`Transaction`]s:
//!
//! - [`group`] collapses same-day earnings into editable [`EarningsGroup`]s;
//! - [`summarize`] reduces a set into [`SummaryStats`];
//! - [`filter`] keeps the transactions of a [`PeriodWindow`];
//! - the planner functions turn edits into [`StoreOp`]s.
//!
//! [`Ledger`] wires the core to a [`TransactionStore`].

pub use categories::ExpenseCategory;
pub use error::{EngineError, ValidationError};
pub use goals::{Goal, GoalProgress, daily_goal_progress, goal_progress};
pub use grouping::{DisplayItem, EarningsGroup, earnings_group_for, group};
pub use ledger::Ledger;
pub use money::{Liters, MoneyCents};
pub use period::{Period, PeriodWindow, filter};
pub use planner::{
    DeleteOp, ExpenseEdit, PlatformAmounts, StoreOp, UpsertOp, plan_earnings_update,
    plan_expense_update, plan_group_delete, plan_new_earnings,
};
pub use platform::Platform;
pub use report::Report;
pub use sqlite::SqliteStore;
pub use store::{MemoryStore, TransactionStore};
pub use summary::{SummaryStats, summarize};
pub use transactions::{EntryType, Transaction, TransactionDraft, TransactionKind};

mod categories;
mod error;
mod goals;
mod grouping;
mod ledger;
mod money;
mod period;
mod planner;
mod platform;
mod report;
mod sqlite;
mod store;
mod summary;
mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
