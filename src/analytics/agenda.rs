use chrono::NaiveDate;

use super::{days_in_month, first_of_month};
use crate::models::{RecurringTransaction, Transaction};

/// One calendar day: what was posted and which bills fall due.
#[derive(Debug, Clone)]
pub(crate) struct AgendaDay<'a> {
    pub(crate) date: String,
    pub(crate) transactions: Vec<&'a Transaction>,
    pub(crate) bills: Vec<&'a RecurringTransaction>,
}

/// Calendar for the month containing `month`.
///
/// Only active bills are placed. A bill due on the 31st lands on the last
/// day of shorter months.
pub(crate) fn month_agenda<'a>(
    txns: &'a [Transaction],
    recurring: &'a [RecurringTransaction],
    month: NaiveDate,
) -> Vec<AgendaDay<'a>> {
    let first = first_of_month(month);
    let last_day = days_in_month(first);

    first
        .iter_days()
        .take(last_day as usize)
        .enumerate()
        .map(|(i, date)| {
            let day = i as u32 + 1;
            let date = date.format("%Y-%m-%d").to_string();
            AgendaDay {
                transactions: txns.iter().filter(|t| t.date == date).collect(),
                bills: recurring
                    .iter()
                    .filter(|r| r.active && r.due_day.min(last_day) == day)
                    .collect(),
                date,
            }
        })
        .collect()
}
