pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id                 TEXT PRIMARY KEY,
    user_id            TEXT NOT NULL,
    date               TEXT NOT NULL,
    description        TEXT NOT NULL,
    origin             TEXT NOT NULL DEFAULT '',
    amount             TEXT NOT NULL,
    statement_date     TEXT,
    document_number    TEXT,
    installment_index  INTEGER,
    installment_total  INTEGER,
    is_credit_card     BOOLEAN NOT NULL DEFAULT 0,
    is_savings         BOOLEAN NOT NULL DEFAULT 0,
    created_at         TEXT NOT NULL,
    CHECK (NOT (is_credit_card AND is_savings))
);

CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);

CREATE TABLE IF NOT EXISTS goals (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    title           TEXT NOT NULL,
    target_amount   TEXT NOT NULL,
    current_amount  TEXT NOT NULL DEFAULT '0',
    color           TEXT NOT NULL DEFAULT '',
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_goals_user ON goals(user_id);

CREATE TABLE IF NOT EXISTS recurring_transactions (
    id        TEXT PRIMARY KEY,
    user_id   TEXT NOT NULL,
    title     TEXT NOT NULL,
    amount    TEXT NOT NULL,
    due_day   INTEGER NOT NULL CHECK (due_day BETWEEN 1 AND 31),
    category  TEXT NOT NULL DEFAULT '',
    active    BOOLEAN NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_recurring_user ON recurring_transactions(user_id);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
