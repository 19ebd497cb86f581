use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    type TEXT NOT NULL CHECK (type IN ('cash', 'bank', 'credit_card', 'wallet')),
    balance REAL NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    emoji TEXT,
    type TEXT NOT NULL CHECK (type IN ('income', 'expense'))
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    account_id INTEGER NOT NULL,
    category_id INTEGER,
    amount REAL NOT NULL CHECK (amount > 0),
    type TEXT NOT NULL CHECK (type IN ('income', 'expense', 'transfer')),
    date TEXT NOT NULL,
    description TEXT,
    notes TEXT,
    is_recurring INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (account_id) REFERENCES accounts(id),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);

CREATE TABLE IF NOT EXISTS transfers (
    id INTEGER PRIMARY KEY,
    from_transaction_id INTEGER NOT NULL UNIQUE,
    to_transaction_id INTEGER NOT NULL UNIQUE,
    FOREIGN KEY (from_transaction_id) REFERENCES transactions(id),
    FOREIGN KEY (to_transaction_id) REFERENCES transactions(id)
);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS transaction_tags (
    transaction_id INTEGER NOT NULL,
    tag_id INTEGER NOT NULL,
    PRIMARY KEY (transaction_id, tag_id),
    FOREIGN KEY (transaction_id) REFERENCES transactions(id),
    FOREIGN KEY (tag_id) REFERENCES tags(id)
);

CREATE TABLE IF NOT EXISTS bills (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    amount REAL NOT NULL CHECK (amount > 0),
    due_date TEXT NOT NULL,
    repeat_freq TEXT NOT NULL CHECK (repeat_freq IN ('weekly', 'monthly', 'yearly')),
    account_id INTEGER NOT NULL,
    FOREIGN KEY (account_id) REFERENCES accounts(id)
);

CREATE TABLE IF NOT EXISTS bill_payments (
    id INTEGER PRIMARY KEY,
    bill_id INTEGER NOT NULL,
    due_date TEXT NOT NULL,
    paid_date TEXT NOT NULL,
    transaction_id INTEGER NOT NULL,
    UNIQUE (bill_id, due_date),
    FOREIGN KEY (bill_id) REFERENCES bills(id),
    FOREIGN KEY (transaction_id) REFERENCES transactions(id)
);

CREATE TABLE IF NOT EXISTS subscriptions (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    frequency TEXT NOT NULL CHECK (frequency IN ('weekly', 'monthly', 'yearly')),
    next_due_date TEXT NOT NULL,
    last_posted_date TEXT,
    account_id INTEGER NOT NULL,
    category_id INTEGER,
    active INTEGER NOT NULL DEFAULT 1,
    FOREIGN KEY (account_id) REFERENCES accounts(id),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);

CREATE TABLE IF NOT EXISTS reminders_log (
    id INTEGER PRIMARY KEY,
    bill_id INTEGER NOT NULL,
    reminder_date TEXT NOT NULL,
    message TEXT,
    sent_at TEXT DEFAULT (datetime('now')),
    UNIQUE (bill_id, reminder_date),
    FOREIGN KEY (bill_id) REFERENCES bills(id)
);

CREATE TABLE IF NOT EXISTS budgets (
    id INTEGER PRIMARY KEY,
    category_id INTEGER NOT NULL,
    amount REAL NOT NULL CHECK (amount > 0),
    period TEXT NOT NULL CHECK (period IN ('weekly', 'monthly')),
    UNIQUE (category_id, period),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);

CREATE TABLE IF NOT EXISTS goals (
    id INTEGER PRIMARY KEY,
    category_id INTEGER NOT NULL,
    target_amount REAL NOT NULL CHECK (target_amount > 0),
    deadline TEXT,
    FOREIGN KEY (category_id) REFERENCES categories(id)
);
";

// (name, emoji, type)
const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Salary", "\u{1F4B0}", "income"),
    ("Interest", "\u{1F3E6}", "income"),
    ("Other Income", "\u{1F4E6}", "income"),
    ("Groceries", "\u{1F6D2}", "expense"),
    ("Transport", "\u{1F68C}", "expense"),
    ("Dining", "\u{1F37D}\u{FE0F}", "expense"),
    ("Rent", "\u{1F3E0}", "expense"),
    ("Utilities", "\u{1F4A1}", "expense"),
    ("Subscriptions", "\u{1F4FA}", "expense"),
    ("Health", "\u{1F3E5}", "expense"),
    ("Entertainment", "\u{1F3AC}", "expense"),
    ("Fees", "\u{1F4B3}", "expense"),
    ("Other", "\u{1F4E6}", "expense"),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |row| row.get(0))?;
    if count == 0 {
        for cat in DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT INTO categories (name, emoji, type) VALUES (?1, ?2, ?3)",
                rusqlite::params![cat.0, cat.1, cat.2],
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &[
            "accounts",
            "categories",
            "transactions",
            "transfers",
            "tags",
            "transaction_tags",
            "bills",
            "bill_payments",
            "subscriptions",
            "reminders_log",
            "budgets",
            "goals",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM categories", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, DEFAULT_CATEGORIES.len() as i64);
    }

    #[test]
    fn test_init_db_seeds_both_category_types() {
        let (_dir, conn) = test_db();
        let income: i64 = conn
            .query_row("SELECT count(*) FROM categories WHERE type = 'income'", [], |r| r.get(0))
            .unwrap();
        let expense: i64 = conn
            .query_row("SELECT count(*) FROM categories WHERE type = 'expense'", [], |r| r.get(0))
            .unwrap();
        assert!(income >= 3, "expected >= 3 income categories, got {income}");
        assert!(expense >= 8, "expected >= 8 expense categories, got {expense}");
    }

    #[test]
    fn test_account_type_check_constraint() {
        let (_dir, conn) = test_db();
        let res = conn.execute(
            "INSERT INTO accounts (name, type) VALUES ('Broker', 'brokerage')",
            [],
        );
        assert!(res.is_err(), "CHECK constraint should reject unknown account type");
    }

    #[test]
    fn test_transaction_amount_must_be_positive() {
        let (_dir, conn) = test_db();
        conn.execute("INSERT INTO accounts (name, type) VALUES ('Checking', 'bank')", [])
            .unwrap();
        let res = conn.execute(
            "INSERT INTO transactions (account_id, amount, type, date) VALUES (1, -5.0, 'expense', '2024-01-01')",
            [],
        );
        assert!(res.is_err(), "CHECK constraint should reject negative amounts");
    }

    #[test]
    fn test_reminder_log_unique_per_bill_and_date() {
        let (_dir, conn) = test_db();
        conn.execute("INSERT INTO accounts (name, type) VALUES ('Checking', 'bank')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO bills (name, amount, due_date, repeat_freq, account_id) \
             VALUES ('Internet', 60.0, '2024-05-01', 'monthly', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO reminders_log (bill_id, reminder_date) VALUES (1, '2024-04-28')",
            [],
        )
        .unwrap();
        let res = conn.execute(
            "INSERT INTO reminders_log (bill_id, reminder_date) VALUES (1, '2024-04-28')",
            [],
        );
        assert!(res.is_err(), "duplicate (bill_id, reminder_date) should be rejected");
    }
}
