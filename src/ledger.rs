use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Transaction as SqlTxn};

use crate::error::{PennyError, Result};
use crate::models::{AccountType, BudgetPeriod, CategoryType, Frequency, Transaction, TxnType};
use crate::schedule;

// ---------------------------------------------------------------------------
// Lookups shared by the mutating operations
// ---------------------------------------------------------------------------

fn require_account(tx: &Connection, account_id: i64) -> Result<()> {
    let found: Option<i64> = tx
        .query_row("SELECT id FROM accounts WHERE id = ?1", [account_id], |r| r.get(0))
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(PennyError::NotFound(format!("account {account_id}"))),
    }
}

fn require_category(tx: &Connection, category_id: i64) -> Result<CategoryType> {
    let cat_type: Option<String> = tx
        .query_row("SELECT type FROM categories WHERE id = ?1", [category_id], |r| r.get(0))
        .optional()?;
    match cat_type {
        Some(t) => CategoryType::parse(&t),
        None => Err(PennyError::NotFound(format!("category {category_id}"))),
    }
}

pub fn find_account(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row("SELECT id FROM accounts WHERE name = ?1", [name], |r| r.get(0))
        .optional()?
        .ok_or_else(|| PennyError::NotFound(format!("account '{name}'")))
}

pub fn find_category(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row("SELECT id FROM categories WHERE name = ?1", [name], |r| r.get(0))
        .optional()?
        .ok_or_else(|| PennyError::NotFound(format!("category '{name}'")))
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    conn.query_row(
        "SELECT id, account_id, category_id, amount, type, date, description, notes, is_recurring \
         FROM transactions WHERE id = ?1",
        [id],
        |row| {
            Ok(Transaction {
                id: row.get(0)?,
                account_id: row.get(1)?,
                category_id: row.get(2)?,
                amount: row.get(3)?,
                txn_type: row.get(4)?,
                date: row.get(5)?,
                description: row.get(6)?,
                notes: row.get(7)?,
                is_recurring: row.get(8)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| PennyError::NotFound(format!("transaction {id}")))
}

// ---------------------------------------------------------------------------
// Posting primitives
// ---------------------------------------------------------------------------

fn check_amount(amount: f64) -> Result<()> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(PennyError::Validation(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(())
}

/// Insert one transaction row and apply `cache_delta` to the account's
/// cached balance within the same enclosing transaction.
#[allow(clippy::too_many_arguments)]
fn insert_txn(
    tx: &SqlTxn,
    account_id: i64,
    category_id: Option<i64>,
    amount: f64,
    txn_type: TxnType,
    date: &str,
    description: Option<&str>,
    notes: Option<&str>,
    cache_delta: f64,
) -> Result<i64> {
    tx.execute(
        "INSERT INTO transactions (account_id, category_id, amount, type, date, description, notes) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![account_id, category_id, amount, txn_type.as_str(), date, description, notes],
    )?;
    let id = tx.last_insert_rowid();
    tx.execute(
        "UPDATE accounts SET balance = balance + ?1 WHERE id = ?2",
        params![cache_delta, account_id],
    )?;
    Ok(id)
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Create an account. A nonzero opening balance is posted as a regular
/// transaction so the derived balance matches the cache from the start.
pub fn create_account(
    conn: &mut Connection,
    name: &str,
    account_type: AccountType,
    initial_balance: f64,
) -> Result<i64> {
    if name.trim().is_empty() {
        return Err(PennyError::Validation("account name must not be empty".into()));
    }
    let tx = conn.transaction()?;

    let taken: Option<i64> = tx
        .query_row("SELECT id FROM accounts WHERE name = ?1", [name], |r| r.get(0))
        .optional()?;
    if taken.is_some() {
        return Err(PennyError::Conflict(format!("account '{name}' already exists")));
    }

    tx.execute(
        "INSERT INTO accounts (name, type, balance) VALUES (?1, ?2, 0)",
        params![name, account_type.as_str()],
    )?;
    let id = tx.last_insert_rowid();

    if initial_balance != 0.0 {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        let (txn_type, delta) = if initial_balance > 0.0 {
            (TxnType::Income, initial_balance)
        } else {
            (TxnType::Expense, initial_balance)
        };
        insert_txn(
            &tx,
            id,
            None,
            initial_balance.abs(),
            txn_type,
            &today,
            Some("Opening balance"),
            None,
            delta,
        )?;
    }

    tx.commit()?;
    Ok(id)
}

/// Soft-deactivate an account; history stays intact.
pub fn deactivate_account(conn: &Connection, account_id: i64) -> Result<()> {
    require_account(conn, account_id)?;
    conn.execute("UPDATE accounts SET active = 0 WHERE id = ?1", [account_id])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Transactions and transfers
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub fn post_transaction(
    conn: &mut Connection,
    account_id: i64,
    category_id: Option<i64>,
    amount: f64,
    txn_type: TxnType,
    date: &str,
    description: Option<&str>,
    notes: Option<&str>,
) -> Result<i64> {
    check_amount(amount)?;
    schedule::parse_date(date)?;
    if txn_type == TxnType::Transfer {
        return Err(PennyError::Validation(
            "transfer legs are posted via post_transfer, not post_transaction".into(),
        ));
    }

    let tx = conn.transaction()?;
    require_account(&tx, account_id)?;

    if let Some(cat_id) = category_id {
        let cat_type = require_category(&tx, cat_id)?;
        let matches = matches!(
            (txn_type, cat_type),
            (TxnType::Income, CategoryType::Income) | (TxnType::Expense, CategoryType::Expense)
        );
        if !matches {
            return Err(PennyError::Validation(format!(
                "category {cat_id} is {} and cannot label a {} transaction",
                cat_type.as_str(),
                txn_type.as_str()
            )));
        }
    }

    let delta = match txn_type {
        TxnType::Income => amount,
        TxnType::Expense => -amount,
        TxnType::Transfer => unreachable!(),
    };
    let id = insert_txn(&tx, account_id, category_id, amount, txn_type, date, description, notes, delta)?;
    tx.commit()?;
    Ok(id)
}

/// Result of a transfer: the two legs and the link row.
#[derive(Debug, Clone, Copy)]
pub struct TransferIds {
    pub from_transaction_id: i64,
    pub to_transaction_id: i64,
    pub transfer_id: i64,
}

/// Move money between two accounts. Both legs and the link row are created
/// in one transaction; net worth is unchanged.
pub fn post_transfer(
    conn: &mut Connection,
    from_account_id: i64,
    to_account_id: i64,
    amount: f64,
    date: &str,
    description: Option<&str>,
) -> Result<TransferIds> {
    check_amount(amount)?;
    schedule::parse_date(date)?;
    if from_account_id == to_account_id {
        return Err(PennyError::Validation(
            "transfer source and destination accounts must differ".into(),
        ));
    }

    let tx = conn.transaction()?;
    require_account(&tx, from_account_id)?;
    require_account(&tx, to_account_id)?;

    let from_leg = insert_txn(
        &tx,
        from_account_id,
        None,
        amount,
        TxnType::Transfer,
        date,
        description,
        None,
        -amount,
    )?;
    let to_leg = insert_txn(
        &tx,
        to_account_id,
        None,
        amount,
        TxnType::Transfer,
        date,
        description,
        None,
        amount,
    )?;
    tx.execute(
        "INSERT INTO transfers (from_transaction_id, to_transaction_id) VALUES (?1, ?2)",
        params![from_leg, to_leg],
    )?;
    let transfer_id = tx.last_insert_rowid();

    tx.commit()?;
    Ok(TransferIds {
        from_transaction_id: from_leg,
        to_transaction_id: to_leg,
        transfer_id,
    })
}

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

const BALANCE_SQL: &str = "
SELECT COALESCE(SUM(CASE
    WHEN t.type = 'income' THEN t.amount
    WHEN t.type = 'expense' THEN -t.amount
    WHEN tr.from_transaction_id = t.id THEN -t.amount
    ELSE t.amount
END), 0.0)
FROM transactions t
LEFT JOIN transfers tr
    ON t.id IN (tr.from_transaction_id, tr.to_transaction_id)
WHERE t.account_id = ?1";

/// Derived balance: the signed sum of every transaction and transfer leg
/// for the account. The cached `accounts.balance` column is never consulted.
pub fn compute_balance(conn: &Connection, account_id: i64, as_of: Option<&str>) -> Result<f64> {
    require_account(conn, account_id)?;
    match as_of {
        Some(date) => {
            schedule::parse_date(date)?;
            let sql = format!("{BALANCE_SQL} AND t.date <= ?2");
            Ok(conn.query_row(&sql, params![account_id, date], |r| r.get(0))?)
        }
        None => Ok(conn.query_row(BALANCE_SQL, params![account_id], |r| r.get(0))?),
    }
}

/// Rewrite the cached balance from the derived sum. Returns
/// (cached-before, derived) so callers can report drift.
pub fn reconcile_account(conn: &mut Connection, account_id: i64) -> Result<(f64, f64)> {
    let tx = conn.transaction()?;
    let cached: Option<f64> = tx
        .query_row("SELECT balance FROM accounts WHERE id = ?1", [account_id], |r| r.get(0))
        .optional()?;
    let cached = cached.ok_or_else(|| PennyError::NotFound(format!("account {account_id}")))?;
    let derived: f64 = tx.query_row(BALANCE_SQL, params![account_id], |r| r.get(0))?;
    tx.execute(
        "UPDATE accounts SET balance = ?1 WHERE id = ?2",
        params![derived, account_id],
    )?;
    tx.commit()?;
    Ok((cached, derived))
}

// ---------------------------------------------------------------------------
// Bills
// ---------------------------------------------------------------------------

pub fn record_bill(
    conn: &Connection,
    name: &str,
    amount: f64,
    due_date: &str,
    repeat_freq: Frequency,
    account_id: i64,
) -> Result<i64> {
    check_amount(amount)?;
    schedule::parse_date(due_date)?;
    require_account(conn, account_id)?;
    conn.execute(
        "INSERT INTO bills (name, amount, due_date, repeat_freq, account_id) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, amount, due_date, repeat_freq.as_str(), account_id],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Pay the bill's current due cycle: post an expense against its account,
/// journal the payment, and roll the due date forward.
///
/// Idempotent per cycle. A call is a repeat when a journaled payment already
/// covers a due date on or after `paid_date`, or was itself paid on or after
/// `paid_date`; repeats return false and write nothing.
pub fn mark_bill_paid(conn: &mut Connection, bill_id: i64, paid_date: &str) -> Result<bool> {
    schedule::parse_date(paid_date)?;

    let tx = conn.transaction()?;
    let bill: Option<(String, f64, String, String, i64)> = tx
        .query_row(
            "SELECT name, amount, due_date, repeat_freq, account_id FROM bills WHERE id = ?1",
            [bill_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )
        .optional()?;
    let (name, amount, due_date, repeat_freq, account_id) =
        bill.ok_or_else(|| PennyError::NotFound(format!("bill {bill_id}")))?;

    let already: i64 = tx.query_row(
        "SELECT count(*) FROM bill_payments \
         WHERE bill_id = ?1 AND (due_date >= ?2 OR paid_date >= ?2)",
        params![bill_id, paid_date],
        |r| r.get(0),
    )?;
    if already > 0 {
        return Ok(false);
    }

    let txn_id = insert_txn(
        &tx,
        account_id,
        None,
        amount,
        TxnType::Expense,
        paid_date,
        Some(&name),
        None,
        -amount,
    )?;
    tx.execute(
        "INSERT INTO bill_payments (bill_id, due_date, paid_date, transaction_id) \
         VALUES (?1, ?2, ?3, ?4)",
        params![bill_id, due_date, paid_date, txn_id],
    )?;

    let next_due = schedule::advance_str(&due_date, Frequency::parse(&repeat_freq)?)?;
    tx.execute(
        "UPDATE bills SET due_date = ?1 WHERE id = ?2",
        params![next_due, bill_id],
    )?;

    tx.commit()?;
    Ok(true)
}

/// Record that a reminder went out for (bill, date). Returns true when this
/// call claimed the slot, false when a reminder was already logged. The
/// check-and-insert is a single atomic statement, so two concurrent
/// schedulers cannot both get true.
pub fn log_reminder_if_new(
    conn: &mut Connection,
    bill_id: i64,
    reminder_date: &str,
    message: &str,
) -> Result<bool> {
    schedule::parse_date(reminder_date)?;

    let tx = conn.transaction()?;
    let found: Option<i64> = tx
        .query_row("SELECT id FROM bills WHERE id = ?1", [bill_id], |r| r.get(0))
        .optional()?;
    if found.is_none() {
        return Err(PennyError::NotFound(format!("bill {bill_id}")));
    }

    let inserted = tx.execute(
        "INSERT OR IGNORE INTO reminders_log (bill_id, reminder_date, message) \
         VALUES (?1, ?2, ?3)",
        params![bill_id, reminder_date, message],
    )?;
    tx.commit()?;
    Ok(inserted == 1)
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

pub fn add_subscription(
    conn: &Connection,
    name: &str,
    frequency: Frequency,
    next_due_date: &str,
    account_id: i64,
    category_id: Option<i64>,
) -> Result<i64> {
    schedule::parse_date(next_due_date)?;
    require_account(conn, account_id)?;
    if let Some(cat_id) = category_id {
        let cat_type = require_category(conn, cat_id)?;
        if cat_type != CategoryType::Expense {
            return Err(PennyError::Validation(format!(
                "subscription charges are expenses; category {cat_id} is {}",
                cat_type.as_str()
            )));
        }
    }
    conn.execute(
        "INSERT INTO subscriptions (name, frequency, next_due_date, account_id, category_id) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, frequency.as_str(), next_due_date, account_id, category_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn cancel_subscription(conn: &Connection, subscription_id: i64) -> Result<()> {
    let changed = conn.execute(
        "UPDATE subscriptions SET active = 0 WHERE id = ?1",
        [subscription_id],
    )?;
    if changed == 0 {
        return Err(PennyError::NotFound(format!("subscription {subscription_id}")));
    }
    Ok(())
}

/// Post one renewal charge and roll the schedule forward. The amount varies
/// per cycle, so the caller supplies what was actually charged.
pub fn advance_subscription(
    conn: &mut Connection,
    subscription_id: i64,
    posted_amount: f64,
    posted_date: &str,
) -> Result<i64> {
    check_amount(posted_amount)?;
    schedule::parse_date(posted_date)?;

    let tx = conn.transaction()?;
    let sub: Option<(String, String, String, i64, Option<i64>, bool)> = tx
        .query_row(
            "SELECT name, frequency, next_due_date, account_id, category_id, active \
             FROM subscriptions WHERE id = ?1",
            [subscription_id],
            |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
            },
        )
        .optional()?;
    let (name, frequency, next_due_date, account_id, category_id, active) =
        sub.ok_or_else(|| PennyError::NotFound(format!("subscription {subscription_id}")))?;
    if !active {
        return Err(PennyError::State(format!(
            "subscription {subscription_id} ('{name}') is inactive"
        )));
    }

    let txn_id = insert_txn(
        &tx,
        account_id,
        category_id,
        posted_amount,
        TxnType::Expense,
        posted_date,
        Some(&name),
        None,
        -posted_amount,
    )?;

    let next = schedule::advance_str(&next_due_date, Frequency::parse(&frequency)?)?;
    tx.execute(
        "UPDATE subscriptions SET last_posted_date = ?1, next_due_date = ?2 WHERE id = ?3",
        params![posted_date, next, subscription_id],
    )?;

    tx.commit()?;
    Ok(txn_id)
}

// ---------------------------------------------------------------------------
// Categories, tags, budgets, goals
// ---------------------------------------------------------------------------

pub fn add_category(
    conn: &Connection,
    name: &str,
    emoji: Option<&str>,
    category_type: CategoryType,
) -> Result<i64> {
    let taken: Option<i64> = conn
        .query_row("SELECT id FROM categories WHERE name = ?1", [name], |r| r.get(0))
        .optional()?;
    if taken.is_some() {
        return Err(PennyError::Conflict(format!("category '{name}' already exists")));
    }
    conn.execute(
        "INSERT INTO categories (name, emoji, type) VALUES (?1, ?2, ?3)",
        params![name, emoji, category_type.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get-or-create by name; tags carry no state beyond the label.
pub fn add_tag(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", [name])?;
    conn.query_row("SELECT id FROM tags WHERE name = ?1", [name], |r| r.get(0))
        .map_err(Into::into)
}

/// Attach a tag to a transaction. Re-tagging the same pair is a no-op.
pub fn tag_transaction(conn: &Connection, transaction_id: i64, tag_id: i64) -> Result<()> {
    let txn: Option<i64> = conn
        .query_row("SELECT id FROM transactions WHERE id = ?1", [transaction_id], |r| r.get(0))
        .optional()?;
    if txn.is_none() {
        return Err(PennyError::NotFound(format!("transaction {transaction_id}")));
    }
    let tag: Option<i64> = conn
        .query_row("SELECT id FROM tags WHERE id = ?1", [tag_id], |r| r.get(0))
        .optional()?;
    if tag.is_none() {
        return Err(PennyError::NotFound(format!("tag {tag_id}")));
    }
    conn.execute(
        "INSERT OR IGNORE INTO transaction_tags (transaction_id, tag_id) VALUES (?1, ?2)",
        params![transaction_id, tag_id],
    )?;
    Ok(())
}

/// Set or replace the spending cap for a category and period.
pub fn set_budget(
    conn: &Connection,
    category_id: i64,
    amount: f64,
    period: BudgetPeriod,
) -> Result<i64> {
    check_amount(amount)?;
    let cat_type = require_category(conn, category_id)?;
    if cat_type != CategoryType::Expense {
        return Err(PennyError::Validation(format!(
            "budgets cap spending; category {category_id} is {}",
            cat_type.as_str()
        )));
    }
    conn.execute(
        "INSERT INTO budgets (category_id, amount, period) VALUES (?1, ?2, ?3) \
         ON CONFLICT (category_id, period) DO UPDATE SET amount = excluded.amount",
        params![category_id, amount, period.as_str()],
    )?;
    Ok(conn.query_row(
        "SELECT id FROM budgets WHERE category_id = ?1 AND period = ?2",
        params![category_id, period.as_str()],
        |r| r.get(0),
    )?)
}

pub fn add_goal(
    conn: &Connection,
    category_id: i64,
    target_amount: f64,
    deadline: Option<&str>,
) -> Result<i64> {
    check_amount(target_amount)?;
    require_category(conn, category_id)?;
    if let Some(d) = deadline {
        schedule::parse_date(d)?;
    }
    conn.execute(
        "INSERT INTO goals (category_id, target_amount, deadline) VALUES (?1, ?2, ?3)",
        params![category_id, target_amount, deadline],
    )?;
    Ok(conn.last_insert_rowid())
}
