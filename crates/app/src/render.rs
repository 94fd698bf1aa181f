//! Plain text rendering of engine views.

use std::fmt::Write as _;

use engine::{
    DisplayItem, Goal, GoalProgress, Platform, Report, SummaryStats, TransactionKind, UpsertOp,
};

pub fn history(items: &[DisplayItem]) -> String {
    if items.is_empty() {
        return "No transactions yet.\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        match item {
            DisplayItem::Earnings(group) => {
                let platforms: Vec<&str> = group.platforms().into_iter().map(Platform::label).collect();
                let _ = writeln!(
                    out,
                    "{}  + {:>10}  earnings [{}]",
                    group.date,
                    group.total,
                    platforms.join(", ")
                );
            }
            DisplayItem::Expense(tx) => {
                let detail = match tx.kind {
                    TransactionKind::Expense {
                        category,
                        liters: Some(liters),
                    } => format!("{category} ({liters} L)"),
                    TransactionKind::Expense { category, .. } => category.to_string(),
                    TransactionKind::Earning { platform } => platform.to_string(),
                };
                let _ = writeln!(
                    out,
                    "{}  - {:>10}  {detail}  {}",
                    tx.day(),
                    tx.amount,
                    tx.id
                );
            }
        }
    }
    out
}

pub fn summary(stats: &SummaryStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Gross earnings: {:>10}", stats.gross_earnings);
    for platform in Platform::ALL {
        let _ = writeln!(out, "  {:<12} {:>10}", platform.label(), stats.platform(platform));
    }
    let _ = writeln!(out, "Expenses:       {:>10}", stats.total_expenses);
    let _ = writeln!(out, "Net profit:     {:>10}", stats.net_profit);
    let _ = writeln!(out, "Daily average:  {:>10}", stats.daily_average_profit);
    out
}

pub fn report(report: &Report) -> String {
    format!("Period: {}\n{}", report.label, summary(&report.stats))
}

pub fn progress(label: &str, progress: &GoalProgress) -> String {
    format!(
        "{label}: {} of {} ({}%), {} to go",
        progress.achieved, progress.target, progress.percent, progress.remaining
    )
}

pub fn goals(goals: &[(Goal, GoalProgress)]) -> String {
    if goals.is_empty() {
        return "No goals yet.\n".to_string();
    }
    let mut out = String::new();
    for (goal, state) in goals {
        let _ = writeln!(out, "{}  {}", goal.id, progress(&goal.name, state));
    }
    out
}

pub fn writes(ops: &[UpsertOp]) -> String {
    let mut out = String::new();
    for op in ops {
        let action = if op.existing { "updated" } else { "created" };
        let _ = writeln!(out, "{action} {} ({})", op.id(), op.amount());
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use engine::{ExpenseCategory, MoneyCents, Transaction, group, summarize};

    use super::*;

    #[test]
    fn history_lists_groups_and_expenses() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let input = vec![
            Transaction::earning(Platform::Uber, MoneyCents::new(10_000), date).unwrap(),
            Transaction::earning(Platform::NinetyNine, MoneyCents::new(5_000), date).unwrap(),
            Transaction::expense(ExpenseCategory::Fuel, None, MoneyCents::new(3_000), date)
                .unwrap(),
        ];
        let text = history(&group(&input));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("150.00"));
        assert!(lines[0].contains("[Uber, 99]"));
        assert!(lines[1].contains("30.00"));
        assert!(lines[1].contains("fuel"));
    }

    #[test]
    fn summary_lists_every_platform() {
        let text = summary(&summarize(&[]));
        assert!(text.contains("Uber"));
        assert!(text.contains("99"));
        assert!(text.contains("Other"));
        assert!(text.contains("Net profit:"));
    }
}
