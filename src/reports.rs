use chrono::{Datelike, Days, NaiveDate, Weekday};
use rusqlite::{Connection, ToSql};

use crate::error::Result;
use crate::models::{Account, Bill, BudgetPeriod, Category, Goal, Subscription};
use crate::schedule;

// ---------------------------------------------------------------------------
// Entity listings
// ---------------------------------------------------------------------------

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt =
        conn.prepare("SELECT id, name, type, balance, active FROM accounts ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Account {
            id: row.get(0)?,
            name: row.get(1)?,
            account_type: row.get(2)?,
            balance: row.get(3)?,
            active: row.get(4)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, emoji, type FROM categories ORDER BY type, name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            emoji: row.get(2)?,
            category_type: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Bills with their account names, soonest due first.
pub fn list_bills(conn: &Connection) -> Result<Vec<(Bill, String)>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.name, b.amount, b.due_date, b.repeat_freq, b.account_id, a.name \
         FROM bills b JOIN accounts a ON b.account_id = a.id ORDER BY b.due_date",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            Bill {
                id: row.get(0)?,
                name: row.get(1)?,
                amount: row.get(2)?,
                due_date: row.get(3)?,
                repeat_freq: row.get(4)?,
                account_id: row.get(5)?,
            },
            row.get(6)?,
        ))
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Subscriptions with their account names, next renewal first.
pub fn list_subscriptions(conn: &Connection) -> Result<Vec<(Subscription, String)>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, s.frequency, s.next_due_date, s.last_posted_date, \
            s.account_id, s.category_id, s.active, a.name \
         FROM subscriptions s JOIN accounts a ON s.account_id = a.id \
         ORDER BY s.next_due_date",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            Subscription {
                id: row.get(0)?,
                name: row.get(1)?,
                frequency: row.get(2)?,
                next_due_date: row.get(3)?,
                last_posted_date: row.get(4)?,
                account_id: row.get(5)?,
                category_id: row.get(6)?,
                active: row.get(7)?,
            },
            row.get(8)?,
        ))
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Goals with their category names, nearest deadline first.
pub fn list_goals(conn: &Connection) -> Result<Vec<(Goal, String)>> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.category_id, g.target_amount, g.deadline, c.name \
         FROM goals g JOIN categories c ON g.category_id = c.id ORDER BY g.deadline",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            Goal {
                id: row.get(0)?,
                category_id: row.get(1)?,
                target_amount: row.get(2)?,
                deadline: row.get(3)?,
            },
            row.get(4)?,
        ))
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Transaction register
// ---------------------------------------------------------------------------

pub struct RegisterRow {
    pub id: i64,
    pub date: String,
    pub account: String,
    pub category: Option<String>,
    pub txn_type: String,
    pub description: Option<String>,
    /// Amount with its effective sign applied (expense and outgoing
    /// transfer legs negative).
    pub signed_amount: f64,
}

/// Range-filtered transaction listing, newest first. Both filters optional.
pub fn get_register(
    conn: &Connection,
    account_id: Option<i64>,
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> Result<Vec<RegisterRow>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    if let Some(id) = account_id {
        params.push(Box::new(id));
        clauses.push(format!("t.account_id = ?{}", params.len()));
    }
    if let Some(from) = from_date {
        schedule::parse_date(from)?;
        params.push(Box::new(from.to_string()));
        clauses.push(format!("t.date >= ?{}", params.len()));
    }
    if let Some(to) = to_date {
        schedule::parse_date(to)?;
        params.push(Box::new(to.to_string()));
        clauses.push(format!("t.date <= ?{}", params.len()));
    }
    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let sql = format!(
        "SELECT t.id, t.date, a.name, c.name, t.type, t.description, \
            CASE \
                WHEN t.type = 'income' THEN t.amount \
                WHEN t.type = 'expense' THEN -t.amount \
                WHEN tr.from_transaction_id = t.id THEN -t.amount \
                ELSE t.amount \
            END \
         FROM transactions t \
         JOIN accounts a ON t.account_id = a.id \
         LEFT JOIN categories c ON t.category_id = c.id \
         LEFT JOIN transfers tr ON t.id IN (tr.from_transaction_id, tr.to_transaction_id) \
         {where_clause} \
         ORDER BY t.date DESC, t.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| {
        Ok(RegisterRow {
            id: row.get(0)?,
            date: row.get(1)?,
            account: row.get(2)?,
            category: row.get(3)?,
            txn_type: row.get(4)?,
            description: row.get(5)?,
            signed_amount: row.get(6)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Spending by category
// ---------------------------------------------------------------------------

pub struct SpendingItem {
    pub category: String,
    pub emoji: Option<String>,
    pub total: f64,
    pub count: i64,
}

pub fn get_spending(
    conn: &Connection,
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> Result<Vec<SpendingItem>> {
    let from = from_date.unwrap_or("0000-01-01").to_string();
    let to = to_date.unwrap_or("9999-12-31").to_string();
    if from_date.is_some() {
        schedule::parse_date(&from)?;
    }
    if to_date.is_some() {
        schedule::parse_date(&to)?;
    }
    let mut stmt = conn.prepare(
        "SELECT c.name, c.emoji, SUM(t.amount) as total, COUNT(*) as count \
         FROM transactions t JOIN categories c ON t.category_id = c.id \
         WHERE t.type = 'expense' AND t.date BETWEEN ?1 AND ?2 \
         GROUP BY c.name, c.emoji ORDER BY total DESC",
    )?;
    let rows = stmt.query_map([&from, &to], |row| {
        Ok(SpendingItem {
            category: row.get(0)?,
            emoji: row.get(1)?,
            total: row.get(2)?,
            count: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Balance snapshot
// ---------------------------------------------------------------------------

pub struct BalanceRow {
    pub account_id: i64,
    pub name: String,
    pub account_type: String,
    pub active: bool,
    pub cached: f64,
    pub derived: f64,
}

impl BalanceRow {
    pub fn drifted(&self) -> bool {
        (self.cached - self.derived).abs() > 0.005
    }
}

/// Every account with its cached balance next to the derived sum, so drift
/// is visible at a glance.
pub fn get_balances(conn: &Connection) -> Result<Vec<BalanceRow>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.name, a.type, a.active, a.balance, \
            COALESCE((SELECT SUM(CASE \
                WHEN t.type = 'income' THEN t.amount \
                WHEN t.type = 'expense' THEN -t.amount \
                WHEN tr.from_transaction_id = t.id THEN -t.amount \
                ELSE t.amount END) \
             FROM transactions t \
             LEFT JOIN transfers tr ON t.id IN (tr.from_transaction_id, tr.to_transaction_id) \
             WHERE t.account_id = a.id), 0.0) \
         FROM accounts a ORDER BY a.name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(BalanceRow {
            account_id: row.get(0)?,
            name: row.get(1)?,
            account_type: row.get(2)?,
            active: row.get(3)?,
            cached: row.get(4)?,
            derived: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Upcoming bills
// ---------------------------------------------------------------------------

pub struct UpcomingBill {
    pub bill_id: i64,
    pub name: String,
    pub amount: f64,
    pub due_date: String,
    pub account: String,
}

/// Bills due on or before `as_of + days_ahead`.
pub fn get_upcoming_bills(
    conn: &Connection,
    as_of: &str,
    days_ahead: u64,
) -> Result<Vec<UpcomingBill>> {
    let cutoff = schedule::parse_date(as_of)?
        .checked_add_days(Days::new(days_ahead))
        .unwrap_or(NaiveDate::MAX)
        .format("%Y-%m-%d")
        .to_string();
    let mut stmt = conn.prepare(
        "SELECT b.id, b.name, b.amount, b.due_date, a.name \
         FROM bills b JOIN accounts a ON b.account_id = a.id \
         WHERE b.due_date <= ?1 ORDER BY b.due_date",
    )?;
    let rows = stmt.query_map([&cutoff], |row| {
        Ok(UpcomingBill {
            bill_id: row.get(0)?,
            name: row.get(1)?,
            amount: row.get(2)?,
            due_date: row.get(3)?,
            account: row.get(4)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Budget status
// ---------------------------------------------------------------------------

pub struct BudgetStatus {
    pub category: String,
    pub period: String,
    pub cap: f64,
    pub spent: f64,
}

impl BudgetStatus {
    pub fn remaining(&self) -> f64 {
        self.cap - self.spent
    }
}

fn period_window(period: BudgetPeriod, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        BudgetPeriod::Weekly => {
            let start = reference.week(Weekday::Mon).first_day();
            (start, start + Days::new(6))
        }
        BudgetPeriod::Monthly => {
            let start = reference.with_day(1).unwrap_or(reference);
            let end = start
                .checked_add_months(chrono::Months::new(1))
                .and_then(|d| d.checked_sub_days(Days::new(1)))
                .unwrap_or(reference);
            (start, end)
        }
    }
}

/// Spending caps with actual spend for the period containing `as_of`.
pub fn get_budget_status(conn: &Connection, as_of: &str) -> Result<Vec<BudgetStatus>> {
    let reference = schedule::parse_date(as_of)?;
    let mut stmt = conn.prepare(
        "SELECT b.category_id, c.name, b.amount, b.period \
         FROM budgets b JOIN categories c ON b.category_id = c.id \
         ORDER BY c.name, b.period",
    )?;
    let budgets: Vec<(i64, String, f64, String)> = stmt
        .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut out = Vec::with_capacity(budgets.len());
    for (category_id, category, cap, period_str) in budgets {
        let period = BudgetPeriod::parse(&period_str)?;
        let (start, end) = period_window(period, reference);
        let spent: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM transactions \
             WHERE type = 'expense' AND category_id = ?1 AND date BETWEEN ?2 AND ?3",
            rusqlite::params![
                category_id,
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string()
            ],
            |r| r.get(0),
        )?;
        out.push(BudgetStatus {
            category,
            period: period_str,
            cap,
            spent,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::ledger;
    use crate::models::{AccountType, BudgetPeriod, Frequency, TxnType};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_register_filters_by_account_and_range() {
        let (_dir, mut conn) = test_db();
        let a = ledger::create_account(&mut conn, "Checking", AccountType::Bank, 0.0).unwrap();
        let b = ledger::create_account(&mut conn, "Wallet", AccountType::Wallet, 0.0).unwrap();
        ledger::post_transaction(&mut conn, a, None, 100.0, TxnType::Income, "2024-01-05", None, None).unwrap();
        ledger::post_transaction(&mut conn, a, None, 25.0, TxnType::Expense, "2024-02-10", None, None).unwrap();
        ledger::post_transaction(&mut conn, b, None, 5.0, TxnType::Expense, "2024-02-11", None, None).unwrap();

        let all = get_register(&conn, None, None, None).unwrap();
        assert_eq!(all.len(), 3);
        // Newest first.
        assert_eq!(all[0].date, "2024-02-11");

        let only_a = get_register(&conn, Some(a), None, None).unwrap();
        assert_eq!(only_a.len(), 2);

        let feb = get_register(&conn, None, Some("2024-02-01"), Some("2024-02-28")).unwrap();
        assert_eq!(feb.len(), 2);

        let feb_a = get_register(&conn, Some(a), Some("2024-02-01"), Some("2024-02-28")).unwrap();
        assert_eq!(feb_a.len(), 1);
        assert_eq!(feb_a[0].signed_amount, -25.0);
    }

    #[test]
    fn test_register_signs_transfer_legs() {
        let (_dir, mut conn) = test_db();
        let a = ledger::create_account(&mut conn, "Checking", AccountType::Bank, 300.0).unwrap();
        let b = ledger::create_account(&mut conn, "Savings", AccountType::Bank, 0.0).unwrap();
        ledger::post_transfer(&mut conn, a, b, 200.0, "2024-03-02", None).unwrap();

        let out = get_register(&conn, Some(a), Some("2024-03-02"), Some("2024-03-02")).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].signed_amount, -200.0);

        let inc = get_register(&conn, Some(b), Some("2024-03-02"), Some("2024-03-02")).unwrap();
        assert_eq!(inc[0].signed_amount, 200.0);
    }

    #[test]
    fn test_spending_groups_by_category() {
        let (_dir, mut conn) = test_db();
        let a = ledger::create_account(&mut conn, "Checking", AccountType::Bank, 0.0).unwrap();
        let groceries = ledger::find_category(&conn, "Groceries").unwrap();
        let dining = ledger::find_category(&conn, "Dining").unwrap();
        ledger::post_transaction(&mut conn, a, Some(groceries), 80.0, TxnType::Expense, "2024-03-01", None, None).unwrap();
        ledger::post_transaction(&mut conn, a, Some(groceries), 40.0, TxnType::Expense, "2024-03-15", None, None).unwrap();
        ledger::post_transaction(&mut conn, a, Some(dining), 30.0, TxnType::Expense, "2024-03-20", None, None).unwrap();

        let items = get_spending(&conn, Some("2024-03-01"), Some("2024-03-31")).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, "Groceries");
        assert_eq!(items[0].total, 120.0);
        assert_eq!(items[0].count, 2);
    }

    #[test]
    fn test_balances_flag_drift() {
        let (_dir, mut conn) = test_db();
        let a = ledger::create_account(&mut conn, "Checking", AccountType::Bank, 100.0).unwrap();
        ledger::create_account(&mut conn, "Wallet", AccountType::Wallet, 0.0).unwrap();
        conn.execute("UPDATE accounts SET balance = 150.0 WHERE id = ?1", [a]).unwrap();

        let rows = get_balances(&conn).unwrap();
        assert_eq!(rows.len(), 2);
        let checking = rows.iter().find(|r| r.name == "Checking").unwrap();
        assert!(checking.drifted());
        assert_eq!(checking.derived, 100.0);
        let wallet = rows.iter().find(|r| r.name == "Wallet").unwrap();
        assert!(!wallet.drifted());
    }

    #[test]
    fn test_entity_listings() {
        let (_dir, mut conn) = test_db();
        let a = ledger::create_account(&mut conn, "Checking", AccountType::Bank, 0.0).unwrap();
        ledger::record_bill(&conn, "Internet", 60.0, "2024-05-03", Frequency::Monthly, a).unwrap();
        let subs_cat = ledger::find_category(&conn, "Subscriptions").unwrap();
        ledger::add_subscription(&conn, "Netflix", Frequency::Monthly, "2024-05-10", a, Some(subs_cat))
            .unwrap();
        ledger::add_goal(&conn, subs_cat, 500.0, None).unwrap();

        let accounts = list_accounts(&conn).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_type, "bank");
        assert!(accounts[0].active);

        assert!(!list_categories(&conn).unwrap().is_empty());

        let bills = list_bills(&conn).unwrap();
        assert_eq!(bills[0].0.name, "Internet");
        assert_eq!(bills[0].1, "Checking");

        let subs = list_subscriptions(&conn).unwrap();
        assert_eq!(subs[0].0.name, "Netflix");
        assert!(subs[0].0.active);

        let goals = list_goals(&conn).unwrap();
        assert_eq!(goals[0].1, "Subscriptions");
    }

    #[test]
    fn test_upcoming_bills_window() {
        let (_dir, mut conn) = test_db();
        let a = ledger::create_account(&mut conn, "Checking", AccountType::Bank, 0.0).unwrap();
        ledger::record_bill(&conn, "Internet", 60.0, "2024-05-03", Frequency::Monthly, a).unwrap();
        ledger::record_bill(&conn, "Insurance", 200.0, "2024-06-20", Frequency::Monthly, a).unwrap();

        let due = get_upcoming_bills(&conn, "2024-05-01", 7).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].name, "Internet");

        let due = get_upcoming_bills(&conn, "2024-05-01", 60).unwrap();
        assert_eq!(due.len(), 2);
    }

    #[test]
    fn test_budget_status_monthly_window() {
        let (_dir, mut conn) = test_db();
        let a = ledger::create_account(&mut conn, "Checking", AccountType::Bank, 0.0).unwrap();
        let groceries = ledger::find_category(&conn, "Groceries").unwrap();
        ledger::set_budget(&conn, groceries, 400.0, BudgetPeriod::Monthly).unwrap();
        ledger::post_transaction(&mut conn, a, Some(groceries), 120.0, TxnType::Expense, "2024-03-05", None, None).unwrap();
        // Outside the March window.
        ledger::post_transaction(&mut conn, a, Some(groceries), 75.0, TxnType::Expense, "2024-02-27", None, None).unwrap();

        let status = get_budget_status(&conn, "2024-03-15").unwrap();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].spent, 120.0);
        assert_eq!(status[0].remaining(), 280.0);
    }

    #[test]
    fn test_budget_status_weekly_window() {
        let (_dir, mut conn) = test_db();
        let a = ledger::create_account(&mut conn, "Checking", AccountType::Bank, 0.0).unwrap();
        let dining = ledger::find_category(&conn, "Dining").unwrap();
        ledger::set_budget(&conn, dining, 50.0, BudgetPeriod::Weekly).unwrap();
        // 2024-03-13 is a Wednesday; its week runs Mon 03-11 .. Sun 03-17.
        ledger::post_transaction(&mut conn, a, Some(dining), 20.0, TxnType::Expense, "2024-03-11", None, None).unwrap();
        ledger::post_transaction(&mut conn, a, Some(dining), 15.0, TxnType::Expense, "2024-03-17", None, None).unwrap();
        ledger::post_transaction(&mut conn, a, Some(dining), 99.0, TxnType::Expense, "2024-03-18", None, None).unwrap();

        let status = get_budget_status(&conn, "2024-03-13").unwrap();
        assert_eq!(status[0].spent, 35.0);
    }
}
