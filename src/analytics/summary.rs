use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashMap};

use super::{add_cents, month_key, months_back, round_cents, sum_cents};
use crate::models::{Ledger, Transaction};

/// Description of the savings zeroing entry; cleanup matches on `Ajuste`.
pub(crate) const SAVINGS_ADJUSTMENT_DESCRIPTION: &str = "Saldo Inicial Poupança (Ajuste)";
const SAVINGS_ADJUSTMENT_ORIGIN: &str = "Poupança";

/// Label for expenses without an origin.
const UNCATEGORIZED: &str = "Outros";
const TOP_CATEGORIES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MonthTotals {
    pub(crate) income: Decimal,
    /// Absolute value of the month's outflows.
    pub(crate) expenses: Decimal,
}

impl MonthTotals {
    pub(crate) fn net(&self) -> Decimal {
        round_cents(self.income - self.expenses)
    }

    fn add(&mut self, amount: Decimal) {
        if amount > Decimal::ZERO {
            self.income = add_cents(self.income, amount);
        } else if amount < Decimal::ZERO {
            self.expenses = add_cents(self.expenses, amount.abs());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BalancePoint {
    pub(crate) day: u32,
    pub(crate) balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryShare {
    pub(crate) origin: String,
    pub(crate) total: Decimal,
    /// Share of the top-five subtotal, one decimal place.
    pub(crate) percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthComparison {
    pub(crate) current_month: String,
    pub(crate) current: MonthTotals,
    pub(crate) previous_month: String,
    pub(crate) previous: MonthTotals,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CardComposition {
    /// Sum of every credit-card charge, as absolute values.
    pub(crate) billed: Decimal,
    /// Installments not yet billed, at the current installment's value.
    pub(crate) future_installments: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SavingsComposition {
    pub(crate) balance: Decimal,
    pub(crate) deposits: Decimal,
    pub(crate) withdrawals: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthlyFlow {
    pub(crate) month: String,
    pub(crate) totals: MonthTotals,
}

#[derive(Debug, Default)]
pub(crate) struct TopTransactions<'a> {
    pub(crate) incomes: Vec<&'a Transaction>,
    pub(crate) expenses: Vec<&'a Transaction>,
}

/// Headline figures: checking balance and this month's checking flow,
/// plus the card and savings views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FinanceSummary {
    pub(crate) month: String,
    pub(crate) balance: Decimal,
    pub(crate) month_totals: MonthTotals,
    pub(crate) card: CardComposition,
    pub(crate) savings: SavingsComposition,
}

impl FinanceSummary {
    pub(crate) fn compute(txns: &[Transaction], today: NaiveDate) -> Self {
        let month = month_key(today);
        let checking = || txns.iter().filter(|t| t.ledger() == Ledger::Checking);
        Self {
            balance: total_balance(checking()),
            month_totals: monthly_totals(checking(), &month),
            card: card_composition(txns),
            savings: savings_composition(txns, &month),
            month,
        }
    }
}

/// Plain sum of the given amounts; callers pick the ledger.
pub(crate) fn total_balance<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    sum_cents(txns.into_iter().map(|t| t.amount))
}

/// Balance of one ledger, applying its sign convention.
pub(crate) fn ledger_balance<'a>(
    txns: impl IntoIterator<Item = &'a Transaction>,
    ledger: Ledger,
) -> Decimal {
    sum_cents(
        txns.into_iter()
            .filter(|t| t.ledger() == ledger)
            .map(|t| ledger.balance_effect(t.amount)),
    )
}

pub(crate) fn savings_balance<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    ledger_balance(txns, Ledger::Savings)
}

/// Income and expenses of transactions whose date starts with `month` (`YYYY-MM`).
pub(crate) fn monthly_totals<'a>(
    txns: impl IntoIterator<Item = &'a Transaction>,
    month: &str,
) -> MonthTotals {
    let mut totals = MonthTotals::default();
    for t in txns.into_iter().filter(|t| t.date.starts_with(month)) {
        totals.add(t.amount);
    }
    totals
}

/// Running balance for each day of `today`'s month up to today.
///
/// Starts from everything dated before the month. Entries dated later in
/// the month than today are folded into the last point.
pub(crate) fn daily_balance_trend<'a>(
    txns: impl IntoIterator<Item = &'a Transaction>,
    today: NaiveDate,
) -> Vec<BalancePoint> {
    let month = month_key(today);
    let mut opening = Decimal::ZERO;
    let mut per_day: BTreeMap<u32, Decimal> = BTreeMap::new();

    for t in txns {
        if t.month() < month.as_str() {
            opening = add_cents(opening, t.amount);
        } else if t.month() == month {
            let day = t.date.get(8..10).and_then(|d| d.parse().ok()).unwrap_or(1);
            let entry = per_day.entry(day).or_default();
            *entry = add_cents(*entry, t.amount);
        }
    }

    let last_day = today.day().min(super::days_in_month(today));
    let mut balance = opening;
    let mut points: Vec<BalancePoint> = (1..=last_day)
        .map(|day| {
            balance = add_cents(balance, per_day.get(&day).copied().unwrap_or_default());
            BalancePoint { day, balance }
        })
        .collect();

    let future = sum_cents(per_day.range(last_day + 1..).map(|(_, v)| *v));
    if let Some(last) = points.last_mut() {
        last.balance = add_cents(last.balance, future);
    }
    points
}

/// Top five expense origins by absolute total.
pub(crate) fn category_rollup<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> Vec<CategoryShare> {
    let mut order: Vec<(String, Decimal)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for t in txns.into_iter().filter(|t| t.is_expense()) {
        let origin = match t.origin.trim() {
            "" => UNCATEGORIZED.to_string(),
            o => o.to_string(),
        };
        let slot = *index.entry(origin.clone()).or_insert_with(|| {
            order.push((origin, Decimal::ZERO));
            order.len() - 1
        });
        order[slot].1 = add_cents(order[slot].1, t.abs_amount());
    }

    // Stable: ties keep first-seen order.
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(TOP_CATEGORIES);

    let subtotal = sum_cents(order.iter().map(|(_, v)| *v));
    order
        .into_iter()
        .map(|(origin, total)| CategoryShare {
            percentage: (total * Decimal::ONE_HUNDRED)
                .checked_div(subtotal)
                .unwrap_or_default()
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
            origin,
            total,
        })
        .collect()
}

/// This month against the previous one (December of last year in January).
pub(crate) fn month_comparison<'a, I>(txns: I, today: NaiveDate) -> MonthComparison
where
    I: IntoIterator<Item = &'a Transaction> + Clone,
{
    let current_month = month_key(today);
    let previous_month = month_key(months_back(today, 1));
    MonthComparison {
        current: monthly_totals(txns.clone(), &current_month),
        previous: monthly_totals(txns, &previous_month),
        current_month,
        previous_month,
    }
}

pub(crate) fn card_composition<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> CardComposition {
    let mut card = CardComposition::default();
    for t in txns.into_iter().filter(|t| t.ledger() == Ledger::CreditCard) {
        card.billed = add_cents(card.billed, t.abs_amount());
        if let Some(remaining) = t.remaining_installments() {
            card.future_installments = add_cents(
                card.future_installments,
                t.abs_amount() * Decimal::from(remaining),
            );
        }
    }
    card
}

/// Savings balance over all time; deposits and withdrawals within `month`.
///
/// A deposit leaves checking, so it is recorded negative.
pub(crate) fn savings_composition<'a>(
    txns: impl IntoIterator<Item = &'a Transaction>,
    month: &str,
) -> SavingsComposition {
    let mut savings = SavingsComposition::default();
    for t in txns.into_iter().filter(|t| t.ledger() == Ledger::Savings) {
        savings.balance = add_cents(savings.balance, Ledger::Savings.balance_effect(t.amount));
        if !t.date.starts_with(month) {
            continue;
        }
        if t.is_expense() {
            savings.deposits = add_cents(savings.deposits, t.abs_amount());
        } else if t.is_income() {
            savings.withdrawals = add_cents(savings.withdrawals, t.amount);
        }
    }
    savings
}

/// Income and expenses for the last `months` months, oldest first, zero-filled.
pub(crate) fn cash_flow_history<'a>(
    txns: impl IntoIterator<Item = &'a Transaction>,
    today: NaiveDate,
    months: u32,
) -> Vec<MonthlyFlow> {
    let mut flows: Vec<MonthlyFlow> = (0..months)
        .rev()
        .map(|back| MonthlyFlow {
            month: month_key(months_back(today, back)),
            totals: MonthTotals::default(),
        })
        .collect();

    for t in txns {
        if let Some(flow) = flows.iter_mut().find(|f| f.month == t.month()) {
            flow.totals.add(t.amount);
        }
    }
    flows
}

/// The `n` largest incomes and the `n` largest expenses by absolute value.
pub(crate) fn top_transactions<'a>(
    txns: impl IntoIterator<Item = &'a Transaction>,
    n: usize,
) -> TopTransactions<'a> {
    let mut top = TopTransactions::default();
    for t in txns {
        if t.is_income() {
            top.incomes.push(t);
        } else if t.is_expense() {
            top.expenses.push(t);
        }
    }
    top.incomes.sort_by(|a, b| b.amount.cmp(&a.amount));
    top.expenses.sort_by(|a, b| b.abs_amount().cmp(&a.abs_amount()));
    top.incomes.truncate(n);
    top.expenses.truncate(n);
    top
}

/// Entry that brings the savings balance to zero, or `None` if it already is.
///
/// Savings balance is `sum(-amount)`, so cancelling a balance `b` takes an
/// entry with `amount = b`.
pub(crate) fn savings_adjustment<'a>(
    txns: impl IntoIterator<Item = &'a Transaction>,
    user_id: &str,
    date: &str,
) -> Option<Transaction> {
    let balance = savings_balance(txns);
    if balance.is_zero() {
        return None;
    }
    let mut txn = Transaction::new(
        user_id,
        date.to_string(),
        SAVINGS_ADJUSTMENT_DESCRIPTION.to_string(),
        SAVINGS_ADJUSTMENT_ORIGIN.to_string(),
        balance,
    );
    txn.is_savings = true;
    Some(txn)
}

pub(crate) fn is_savings_adjustment(txn: &Transaction) -> bool {
    txn.is_savings && txn.description.contains("Ajuste")
}
