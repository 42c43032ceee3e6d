//! Derived figures over a user's transactions.
//!
//! Money is accumulated with [`add_cents`]: the running total is rounded to
//! two places (half away from zero) after every addition, never only at
//! the end.

mod agenda;
mod summary;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

pub(crate) use agenda::month_agenda;
pub(crate) use summary::{
    cash_flow_history, category_rollup, daily_balance_trend, is_savings_adjustment,
    month_comparison, savings_adjustment, top_transactions, total_balance, FinanceSummary,
    MonthTotals,
};

pub(crate) fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn add_cents(acc: Decimal, value: Decimal) -> Decimal {
    round_cents(acc + value)
}

fn sum_cents(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, add_cents)
}

/// `YYYY-MM` bucket of a date, as compared against `Transaction::date` prefixes.
pub(crate) fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `back` months before `date`'s month.
pub(crate) fn months_back(date: NaiveDate, back: u32) -> NaiveDate {
    let first = first_of_month(date);
    first.checked_sub_months(Months::new(back)).unwrap_or(first)
}

pub(crate) fn days_in_month(date: NaiveDate) -> u32 {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}
