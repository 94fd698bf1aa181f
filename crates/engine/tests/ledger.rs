use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    DisplayItem, EngineError, ExpenseCategory, ExpenseEdit, Ledger, MemoryStore, MoneyCents,
    Period, PeriodWindow, Platform, PlatformAmounts, SqliteStore, TransactionDraft,
    TransactionStore, ValidationError,
};
use migration::MigratorTrait;

async fn sqlite_ledger() -> (Ledger<SqliteStore>, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    (Ledger::new(SqliteStore::new(db.clone())), db)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 21, 0, 0).unwrap()
}

fn amounts(uber: i64, ninety_nine: i64) -> PlatformAmounts {
    PlatformAmounts::from([
        (Platform::Uber, MoneyCents::new(uber)),
        (Platform::NinetyNine, MoneyCents::new(ninety_nine)),
    ])
}

async fn seed_scenario<S: TransactionStore>(ledger: &Ledger<S>) {
    ledger
        .record_earnings(&amounts(10_000, 5_000), day(1))
        .await
        .unwrap();
    ledger
        .record(
            TransactionDraft::expense("fuel", "30").with_date(day(1)),
            now(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn scenario_summary_and_grouping_on_sqlite() {
    let (ledger, _db) = sqlite_ledger().await;
    seed_scenario(&ledger).await;

    let stats = ledger.dashboard().await.unwrap();
    assert_eq!(stats.gross_earnings, MoneyCents::new(15_000));
    assert_eq!(stats.total_expenses, MoneyCents::new(3_000));
    assert_eq!(stats.net_profit, MoneyCents::new(12_000));
    assert_eq!(stats.platform(Platform::Uber), MoneyCents::new(10_000));
    assert_eq!(stats.platform(Platform::NinetyNine), MoneyCents::new(5_000));
    assert_eq!(stats.daily_average_profit, MoneyCents::new(12_000));

    let history = ledger.history().await.unwrap();
    assert_eq!(history.len(), 2);
    let groups: Vec<_> = history
        .iter()
        .filter_map(|item| match item {
            DisplayItem::Earnings(group) => Some(group),
            DisplayItem::Expense(_) => None,
        })
        .collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].date, day(1));
    assert_eq!(groups[0].total, MoneyCents::new(15_000));
    assert_eq!(groups[0].members.len(), 2);
}

#[tokio::test]
async fn zero_edit_keeps_the_record_on_sqlite() {
    let (ledger, _db) = sqlite_ledger().await;
    seed_scenario(&ledger).await;
    let before = ledger.earnings_group(day(1)).await.unwrap();
    let uber_id = before.member(Platform::Uber).unwrap().id;
    let ninety_nine_id = before.member(Platform::NinetyNine).unwrap().id;

    let ops = ledger
        .edit_earnings(day(1), &amounts(0, 8_000), None)
        .await
        .unwrap();
    assert_eq!(ops.len(), 2);
    assert_eq!((ops[0].id(), ops[0].amount()), (uber_id, MoneyCents::ZERO));
    assert_eq!(
        (ops[1].id(), ops[1].amount()),
        (ninety_nine_id, MoneyCents::new(8_000))
    );

    let after = ledger.earnings_group(day(1)).await.unwrap();
    assert_eq!(after.members.len(), 2);
    assert_eq!(after.amount_for(Platform::Uber), MoneyCents::ZERO);
    assert_eq!(after.total, MoneyCents::new(8_000));
    assert_eq!(ledger.snapshot().await.unwrap().len(), 3);
}

#[tokio::test]
async fn recording_twice_tops_up_instead_of_duplicating() {
    let (ledger, _db) = sqlite_ledger().await;
    ledger
        .record_earnings(&amounts(1_000, 0), day(2))
        .await
        .unwrap();
    ledger
        .record(
            TransactionDraft::earning("uber", "5").with_date(day(2)),
            now(),
        )
        .await
        .unwrap();

    let group = ledger.earnings_group(day(2)).await.unwrap();
    assert_eq!(group.members.len(), 1);
    assert_eq!(group.total, MoneyCents::new(1_500));
}

#[tokio::test]
async fn moving_a_group_onto_a_busy_day_is_rejected() {
    let (ledger, _db) = sqlite_ledger().await;
    ledger
        .record_earnings(&amounts(1_000, 0), day(2))
        .await
        .unwrap();
    ledger
        .record_earnings(&amounts(0, 2_000), day(3))
        .await
        .unwrap();

    let err = ledger
        .edit_earnings(day(2), &amounts(1_000, 0), Some(day(3)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    ledger
        .edit_earnings(day(2), &amounts(1_000, 0), Some(day(4)))
        .await
        .unwrap();
    assert!(ledger.earnings_group(day(2)).await.is_err());
    let moved = ledger.earnings_group(day(4)).await.unwrap();
    assert_eq!(moved.members.len(), 2);
}

#[tokio::test]
async fn deleting_a_group_removes_every_member() {
    let (ledger, _db) = sqlite_ledger().await;
    seed_scenario(&ledger).await;

    let removed = ledger.delete_earnings(day(1)).await.unwrap();
    assert_eq!(removed.len(), 2);
    let left = ledger.snapshot().await.unwrap();
    assert_eq!(left.len(), 1);
    assert!(!left[0].is_earning());

    let err = ledger.delete_earnings(day(1)).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn expense_edit_and_delete_keep_ids() {
    let (ledger, _db) = sqlite_ledger().await;
    let id = ledger
        .record(
            TransactionDraft::expense("fuel", "150")
                .with_liters("25")
                .with_date(day(5)),
            now(),
        )
        .await
        .unwrap();

    let original = ledger.expense(id).await.unwrap();
    let mut edit = ExpenseEdit::from_expense(&original).unwrap();
    edit.amount = MoneyCents::new(16_000);
    edit.category = ExpenseCategory::Maintenance;
    edit.liters = None;
    let op = ledger.edit_expense(id, edit).await.unwrap();
    assert_eq!(op.id(), id);

    let stored = ledger.expense(id).await.unwrap();
    assert_eq!(stored.amount, MoneyCents::new(16_000));
    assert_eq!(stored.category(), Some(ExpenseCategory::Maintenance));

    ledger.delete_expense(id).await.unwrap();
    assert!(ledger.snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_input_never_reaches_the_store() {
    let (ledger, _db) = sqlite_ledger().await;
    let err = ledger
        .record(TransactionDraft::expense("fuel", "-3"), now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::InvalidAmount(_))
    ));
    let err = ledger
        .record(TransactionDraft::expense("food", "0"), now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let err = ledger
        .record(
            TransactionDraft::earning("uber", "10").with_description("airport"),
            now(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::UnexpectedField { field: "description", .. })
    ));
    assert!(ledger.snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn reports_respect_the_window() {
    let (ledger, _db) = sqlite_ledger().await;
    ledger
        .record_earnings(&amounts(10_000, 0), day(18))
        .await
        .unwrap();
    ledger
        .record_earnings(&amounts(0, 4_000), day(10))
        .await
        .unwrap();
    ledger
        .record(
            TransactionDraft::expense("wash", "20").with_date(day(10)),
            now(),
        )
        .await
        .unwrap();

    let today = ledger
        .report(PeriodWindow::preset(Period::Day, now()))
        .await
        .unwrap();
    assert_eq!(today.stats.gross_earnings, MoneyCents::new(10_000));
    assert_eq!(today.label, "Today");

    let month = ledger
        .report(PeriodWindow::preset(Period::Month, now()))
        .await
        .unwrap();
    assert_eq!(month.stats.net_profit, MoneyCents::new(12_000));
    assert_eq!(month.stats.days, 2);
    assert_eq!(month.stats.daily_average_profit, MoneyCents::new(6_000));

    let boundary = ledger
        .report(PeriodWindow::custom(day(10), day(10)).unwrap())
        .await
        .unwrap();
    assert_eq!(boundary.stats.net_profit, MoneyCents::new(2_000));
}

#[tokio::test]
async fn goals_track_progress() {
    let (ledger, _db) = sqlite_ledger().await;
    ledger
        .record_earnings(&amounts(5_000, 0), day(18))
        .await
        .unwrap();

    let daily = ledger
        .daily_goal(MoneyCents::new(20_000), now())
        .await
        .unwrap();
    assert_eq!(daily.percent, 25);

    let goal = ledger
        .add_goal("Tyres", MoneyCents::new(10_000), now())
        .await
        .unwrap();
    let goals = ledger.goals().await.unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].0, goal);
    assert_eq!(goals[0].1.percent, 50);

    ledger.remove_goal(goal.id).await.unwrap();
    assert!(ledger.goals().await.unwrap().is_empty());
    assert!(matches!(
        ledger.remove_goal(goal.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn memory_store_batches_are_all_or_nothing() {
    let ledger = Ledger::new(MemoryStore::new());
    seed_scenario(&ledger).await;
    let snapshot = ledger.snapshot().await.unwrap();

    let group = ledger.earnings_group(day(1)).await.unwrap();
    let mut ops: Vec<engine::StoreOp> = engine::plan_group_delete(&group)
        .into_iter()
        .map(Into::into)
        .collect();
    ops.push(engine::StoreOp::Delete(engine::DeleteOp {
        id: uuid::Uuid::new_v4(),
    }));

    let err = ledger.store().apply(&ops).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert_eq!(ledger.snapshot().await.unwrap(), snapshot);
}

#[tokio::test]
async fn sqlite_batches_are_all_or_nothing() {
    let (ledger, _db) = sqlite_ledger().await;
    seed_scenario(&ledger).await;
    let snapshot = ledger.snapshot().await.unwrap();

    let group = ledger.earnings_group(day(1)).await.unwrap();
    let mut ops: Vec<engine::StoreOp> = engine::plan_group_delete(&group)
        .into_iter()
        .map(Into::into)
        .collect();
    ops.push(engine::StoreOp::Delete(engine::DeleteOp {
        id: uuid::Uuid::new_v4(),
    }));

    assert!(ledger.store().apply(&ops).await.is_err());
    assert_eq!(ledger.snapshot().await.unwrap(), snapshot);
}

#[tokio::test]
async fn summary_serializes_every_platform() {
    let ledger = Ledger::new(MemoryStore::new());
    let stats = ledger.dashboard().await.unwrap();
    let json = serde_json::to_value(&stats).unwrap();
    let per_platform = json["per_platform_earnings"].as_object().unwrap();
    assert_eq!(per_platform.len(), 3);
    assert_eq!(per_platform["uber"], 0);
    assert_eq!(per_platform["ninety_nine"], 0);
    assert_eq!(json["daily_average_profit"], 0);
}
