use serde::Serialize;

use crate::{PeriodWindow, SummaryStats, Transaction, filter, summarize};

/// Summary of one reporting window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub window: PeriodWindow,
    pub label: String,
    pub stats: SummaryStats,
}

impl Report {
    pub fn new(transactions: &[Transaction], window: PeriodWindow) -> Self {
        let stats = summarize(&filter(transactions, &window));
        Self {
            label: window.label(),
            window,
            stats,
        }
    }

    /// Plain text summary meant to be pasted into a chat.
    pub fn share_message(&self, driver: Option<&str>) -> String {
        let driver = driver.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("Driver");
        format!(
            "Hi, {driver}!\n\
             Here is the earnings summary.\n\
             Period: {label}\n\
             \n\
             Gross earnings: {gross}\n\
             Expenses: {expenses}\n\
             Net profit: {profit}\n\
             Daily average: {average}",
            label = self.label,
            gross = self.stats.gross_earnings,
            expenses = self.stats.total_expenses,
            profit = self.stats.net_profit,
            average = self.stats.daily_average_profit,
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{ExpenseCategory, MoneyCents, Platform};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn report_summarizes_only_the_window() {
        let input = vec![
            Transaction::earning(Platform::Uber, MoneyCents::new(20_000), date(2)).unwrap(),
            Transaction::earning(Platform::Uber, MoneyCents::new(10_000), date(3)).unwrap(),
            Transaction::expense(ExpenseCategory::Fuel, None, MoneyCents::new(5_000), date(3))
                .unwrap(),
            Transaction::earning(Platform::Uber, MoneyCents::new(99_999), date(20)).unwrap(),
        ];
        let window = PeriodWindow::custom(date(2), date(3)).unwrap();
        let report = Report::new(&input, window);
        assert_eq!(report.label, "02/08 to 03/08");
        assert_eq!(report.stats.gross_earnings, MoneyCents::new(30_000));
        assert_eq!(report.stats.net_profit, MoneyCents::new(25_000));
        assert_eq!(report.stats.daily_average_profit, MoneyCents::new(12_500));
    }

    #[test]
    fn share_message_lists_the_totals() {
        let window = PeriodWindow::custom(date(1), date(1)).unwrap();
        let report = Report::new(&[], window);
        let message = report.share_message(Some(" "));
        assert!(message.starts_with("Hi, Driver!"));
        assert!(message.contains("Period: 01/08 to 01/08"));
        assert!(message.contains("Net profit: 0.00"));
        assert!(report.share_message(Some("Ana")).starts_with("Hi, Ana!"));
    }
}
