#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn txn(user: &str, date: &str, description: &str, amount: Decimal) -> Transaction {
    Transaction::new(user, date.into(), description.into(), "Agência 0001".into(), amount)
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_transaction_insert_and_list() {
    let mut db = Database::open_in_memory().unwrap();
    let mut card = txn("u1", "2025-01-09", "NETFLIX BR", dec!(-55.90));
    card.is_credit_card = true;
    card.installment_index = Some(1);
    card.installment_total = Some(3);
    card.statement_date = Some("2025-01-31".into());
    let salary = txn("u1", "2025-01-05", "Salário", dec!(5000.00));

    assert_eq!(db.insert_transactions(&[salary.clone(), card.clone()]).unwrap(), 2);

    let all = db.list_transactions("u1", None).unwrap();
    assert_eq!(all.len(), 2);
    // newest first
    assert_eq!(all[0], card);
    assert_eq!(all[1], salary);
}

#[test]
fn test_amount_round_trips_exactly() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_transactions(&[txn("u1", "2025-01-05", "Pix", dec!(-300.555))])
        .unwrap();
    let all = db.list_transactions("u1", None).unwrap();
    assert_eq!(all[0].amount, dec!(-300.555));
}

#[test]
fn test_transactions_scoped_by_user() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_transactions(&[
        txn("u1", "2025-01-05", "A", dec!(1)),
        txn("u2", "2025-01-05", "B", dec!(2)),
    ])
    .unwrap();
    let u1 = db.list_transactions("u1", None).unwrap();
    assert_eq!(u1.len(), 1);
    assert_eq!(u1[0].description, "A");
    assert!(db.list_transactions("nobody", None).unwrap().is_empty());
}

#[test]
fn test_transaction_month_filter() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_transactions(&[
        txn("u1", "2025-01-31", "Jan", dec!(1)),
        txn("u1", "2025-02-01", "Feb", dec!(2)),
    ])
    .unwrap();
    let feb = db.list_transactions("u1", Some("2025-02")).unwrap();
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].description, "Feb");
    assert!(db.list_transactions("u1", Some("2024-12")).unwrap().is_empty());
}

#[test]
fn test_batch_rejected_when_one_row_invalid() {
    let mut db = Database::open_in_memory().unwrap();
    let mut bad = txn("u1", "2025-01-06", "Both ledgers", dec!(-10));
    bad.is_credit_card = true;
    bad.is_savings = true;

    let result = db.insert_transactions(&[txn("u1", "2025-01-05", "Ok", dec!(1)), bad]);
    assert!(result.is_err());
    assert!(db.list_transactions("u1", None).unwrap().is_empty());
}

#[test]
fn test_batch_rolled_back_on_insert_failure() {
    let mut db = Database::open_in_memory().unwrap();
    let first = txn("u1", "2025-01-05", "First", dec!(1));
    // same id twice violates the primary key on the second row
    let result = db.insert_transactions(&[first.clone(), first]);
    assert!(result.is_err());
    assert!(db.list_transactions("u1", None).unwrap().is_empty());
}

#[test]
fn test_batch_insert_empty() {
    let mut db = Database::open_in_memory().unwrap();
    assert_eq!(db.insert_transactions(&[]).unwrap(), 0);
}

#[test]
fn test_transaction_delete() {
    let mut db = Database::open_in_memory().unwrap();
    let t = txn("u1", "2025-01-05", "Gone", dec!(1));
    db.insert_transactions(std::slice::from_ref(&t)).unwrap();

    assert!(!db.delete_transaction("u2", &t.id).unwrap());
    assert!(db.delete_transaction("u1", &t.id).unwrap());
    assert!(!db.delete_transaction("u1", &t.id).unwrap());
    assert!(db.list_transactions("u1", None).unwrap().is_empty());
}

#[test]
fn test_delete_all_transactions() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_transactions(&[
        txn("u1", "2025-01-05", "A", dec!(1)),
        txn("u1", "2025-01-06", "B", dec!(2)),
        txn("u2", "2025-01-06", "C", dec!(3)),
    ])
    .unwrap();
    assert_eq!(db.delete_all_transactions("u1").unwrap(), 2);
    assert_eq!(db.list_transactions("u2", None).unwrap().len(), 1);
}

#[test]
fn test_delete_savings_adjustments() {
    let mut db = Database::open_in_memory().unwrap();
    let mut deposit = txn("u1", "2025-01-05", "Aplicação Poupança", dec!(-500));
    deposit.is_savings = true;
    let mut adjustment = txn("u1", "2025-01-01", "Saldo Inicial Poupança (Ajuste)", dec!(500));
    adjustment.is_savings = true;
    // not savings, survives even though the text matches
    let checking = txn("u1", "2025-01-02", "Ajuste tarifa", dec!(-2));
    db.insert_transactions(&[deposit, adjustment, checking]).unwrap();

    assert_eq!(db.delete_savings_adjustments("u1").unwrap(), 1);
    let left: Vec<String> = db
        .list_transactions("u1", None)
        .unwrap()
        .into_iter()
        .map(|t| t.description)
        .collect();
    assert_eq!(left, vec!["Aplicação Poupança", "Ajuste tarifa"]);
}

// ── Goals ─────────────────────────────────────────────────────

#[test]
fn test_goal_crud() {
    let db = Database::open_in_memory().unwrap();
    let goal = Goal::new("u1", "Viagem".into(), dec!(5000), None);
    db.insert_goal(&goal).unwrap();

    let goals = db.list_goals("u1").unwrap();
    assert_eq!(goals, vec![goal.clone()]);
    assert!(db.list_goals("u2").unwrap().is_empty());

    assert!(db.delete_goal("u1", &goal.id).unwrap());
    assert!(db.list_goals("u1").unwrap().is_empty());
}

#[test]
fn test_goal_rejects_non_positive_target() {
    let db = Database::open_in_memory().unwrap();
    let goal = Goal::new("u1", "Nada".into(), Decimal::ZERO, None);
    assert!(db.insert_goal(&goal).is_err());
}

#[test]
fn test_contribute_to_goal_clamps_at_zero() {
    let mut db = Database::open_in_memory().unwrap();
    let goal = Goal::new("u1", "Reserva".into(), dec!(1000), None);
    db.insert_goal(&goal).unwrap();

    assert_eq!(db.contribute_to_goal("u1", &goal.id, dec!(250.50)).unwrap(), Some(dec!(250.50)));
    assert_eq!(db.contribute_to_goal("u1", &goal.id, dec!(-100)).unwrap(), Some(dec!(150.50)));
    assert_eq!(db.contribute_to_goal("u1", &goal.id, dec!(-999)).unwrap(), Some(Decimal::ZERO));
    assert_eq!(db.list_goals("u1").unwrap()[0].current_amount, Decimal::ZERO);
}

#[test]
fn test_contribute_to_missing_goal() {
    let mut db = Database::open_in_memory().unwrap();
    assert_eq!(db.contribute_to_goal("u1", "missing", dec!(10)).unwrap(), None);
}

// ── Recurring ─────────────────────────────────────────────────

#[test]
fn test_recurring_ordered_by_due_day() {
    let db = Database::open_in_memory().unwrap();
    for (title, day) in [("Aluguel", 31), ("Internet", 10), ("Luz", 5)] {
        let r = RecurringTransaction::new("u1", title.into(), dec!(-100), day, None);
        db.insert_recurring(&r).unwrap();
    }
    let days: Vec<u32> = db
        .list_recurring("u1")
        .unwrap()
        .iter()
        .map(|r| r.due_day)
        .collect();
    assert_eq!(days, vec![5, 10, 31]);
}

#[test]
fn test_recurring_rejects_bad_due_day() {
    let db = Database::open_in_memory().unwrap();
    let r = RecurringTransaction::new("u1", "Nunca".into(), dec!(-1), 32, None);
    assert!(db.insert_recurring(&r).is_err());
}

#[test]
fn test_toggle_recurring() {
    let db = Database::open_in_memory().unwrap();
    let r = RecurringTransaction::new("u1", "Academia".into(), dec!(-90), 10, Some("Saúde".into()));
    db.insert_recurring(&r).unwrap();

    assert_eq!(db.toggle_recurring("u1", &r.id).unwrap(), Some(false));
    assert!(!db.list_recurring("u1").unwrap()[0].active);
    assert_eq!(db.toggle_recurring("u1", &r.id).unwrap(), Some(true));
    assert_eq!(db.toggle_recurring("u2", &r.id).unwrap(), None);
}

#[test]
fn test_delete_recurring() {
    let db = Database::open_in_memory().unwrap();
    let r = RecurringTransaction::new("u1", "Internet".into(), dec!(-99), 10, None);
    db.insert_recurring(&r).unwrap();
    assert!(db.delete_recurring("u1", &r.id).unwrap());
    assert!(db.list_recurring("u1").unwrap().is_empty());
}

// ── Schema migration ──────────────────────────────────────────

#[test]
fn test_schema_version_set() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_double_migrate_idempotent() {
    let mut db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_reopen_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("finbr.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.insert_transactions(&[txn("u1", "2025-01-05", "Persisted", dec!(42))])
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.list_transactions("u1", None).unwrap()[0].amount, dec!(42));
}
