mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::models::*;

const TRANSACTION_COLUMNS: &str = "id, user_id, date, description, origin, amount, statement_date,
     document_number, installment_index, installment_total, is_credit_card, is_savings, created_at";
const GOAL_COLUMNS: &str = "id, user_id, title, target_amount, current_amount, color, created_at";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    /// Insert a batch atomically: one invalid row or failed insert leaves
    /// the store untouched.
    pub(crate) fn insert_transactions(&mut self, txns: &[Transaction]) -> Result<usize> {
        for txn in txns {
            txn.validate()
                .with_context(|| format!("Rejected transaction dated {}", txn.date))?;
        }

        let tx = self.conn.transaction()?;
        for txn in txns {
            tx.execute(
                "INSERT INTO transactions (id, user_id, date, description, origin, amount, statement_date,
                     document_number, installment_index, installment_total, is_credit_card, is_savings, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    txn.id,
                    txn.user_id,
                    txn.date,
                    txn.description,
                    txn.origin,
                    txn.amount.to_string(),
                    txn.statement_date,
                    txn.document_number,
                    txn.installment_index,
                    txn.installment_total,
                    txn.is_credit_card,
                    txn.is_savings,
                    txn.created_at,
                ],
            )
            .with_context(|| format!("Failed to insert transaction {}", txn.id))?;
        }
        tx.commit()?;
        info!(count = txns.len(), "Transactions committed");
        Ok(txns.len())
    }

    /// A user's transactions, newest first, optionally limited to a `YYYY-MM` month.
    pub(crate) fn list_transactions(
        &self,
        user_id: &str,
        month: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions
             WHERE user_id = ?1 AND date LIKE ?2
             ORDER BY date DESC, created_at DESC"
        );
        let pattern = format!("{}%", month.unwrap_or(""));
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, pattern], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Returns whether a row was removed.
    pub(crate) fn delete_transaction(&self, user_id: &str, id: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    pub(crate) fn delete_all_transactions(&self, user_id: &str) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM transactions WHERE user_id = ?1", params![user_id])?)
    }

    /// Remove earlier savings zeroing entries before a new one is computed.
    pub(crate) fn delete_savings_adjustments(&self, user_id: &str) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM transactions
             WHERE user_id = ?1 AND is_savings = 1 AND description LIKE '%Ajuste%'",
            params![user_id],
        )?;
        info!(removed, "Savings adjustments cleared");
        Ok(removed)
    }

    // ── Goals ─────────────────────────────────────────────────

    pub(crate) fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = ?1 ORDER BY created_at, title"
        ))?;
        let rows = stmt.query_map(params![user_id], goal_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn insert_goal(&self, goal: &Goal) -> Result<()> {
        goal.validate()?;
        self.conn.execute(
            "INSERT INTO goals (id, user_id, title, target_amount, current_amount, color, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                goal.id,
                goal.user_id,
                goal.title,
                goal.target_amount.to_string(),
                goal.current_amount.to_string(),
                goal.color,
                goal.created_at,
            ],
        )?;
        Ok(())
    }

    /// Add `delta` to a goal's saved amount, clamped at zero.
    /// Returns the new amount, or `None` if the goal does not exist.
    pub(crate) fn contribute_to_goal(
        &mut self,
        user_id: &str,
        id: &str,
        delta: Decimal,
    ) -> Result<Option<Decimal>> {
        let tx = self.conn.transaction()?;
        let goal = tx
            .query_row(
                &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1 AND user_id = ?2"),
                params![id, user_id],
                goal_from_row,
            )
            .optional()?;
        let Some(mut goal) = goal else {
            return Ok(None);
        };

        goal.contribute(delta);
        tx.execute(
            "UPDATE goals SET current_amount = ?1 WHERE id = ?2 AND user_id = ?3",
            params![goal.current_amount.to_string(), id, user_id],
        )?;
        tx.commit()?;
        Ok(Some(goal.current_amount))
    }

    pub(crate) fn delete_goal(&self, user_id: &str, id: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM goals WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    // ── Recurring ─────────────────────────────────────────────

    pub(crate) fn list_recurring(&self, user_id: &str) -> Result<Vec<RecurringTransaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, amount, due_day, category, active
             FROM recurring_transactions WHERE user_id = ?1 ORDER BY due_day, title",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(RecurringTransaction {
                id: row.get(0)?,
                user_id: row.get(1)?,
                title: row.get(2)?,
                amount: decimal_column(row, 3)?,
                due_day: row.get(4)?,
                category: row.get(5)?,
                active: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn insert_recurring(&self, recurring: &RecurringTransaction) -> Result<()> {
        recurring.validate()?;
        self.conn.execute(
            "INSERT INTO recurring_transactions (id, user_id, title, amount, due_day, category, active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                recurring.id,
                recurring.user_id,
                recurring.title,
                recurring.amount.to_string(),
                recurring.due_day,
                recurring.category,
                recurring.active,
            ],
        )?;
        Ok(())
    }

    /// Flip a bill between active and paused. Returns the new state.
    pub(crate) fn toggle_recurring(&self, user_id: &str, id: &str) -> Result<Option<bool>> {
        Ok(self
            .conn
            .query_row(
                "UPDATE recurring_transactions SET active = NOT active
                 WHERE id = ?1 AND user_id = ?2
                 RETURNING active",
                params![id, user_id],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub(crate) fn delete_recurring(&self, user_id: &str, id: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM recurring_transactions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Ok(Decimal::from_str(&raw).unwrap_or_default())
}

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        target_amount: decimal_column(row, 3)?,
        current_amount: decimal_column(row, 4)?,
        color: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        origin: row.get(4)?,
        amount: decimal_column(row, 5)?,
        statement_date: row.get(6)?,
        document_number: row.get(7)?,
        installment_index: row.get(8)?,
        installment_total: row.get(9)?,
        is_credit_card: row.get(10)?,
        is_savings: row.get(11)?,
        created_at: row.get(12)?,
    })
}

#[cfg(test)]
mod tests;
