use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::today;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger;
use crate::models::Frequency;
use crate::settings::db_path;

pub fn add(
    name: &str,
    freq: &str,
    next_due: &str,
    account: &str,
    category: Option<&str>,
) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let account_id = ledger::find_account(&conn, account)?;
    let category_id = match category {
        Some(c) => Some(ledger::find_category(&conn, c)?),
        None => None,
    };
    let parsed = Frequency::parse(freq)?;
    let id = ledger::add_subscription(&conn, name, parsed, next_due, account_id, category_id)?;
    println!("Added subscription {name} (id {id}), renews {next_due}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Repeats", "Next Due", "Last Posted", "Account", "Status"]);
    for (sub, account) in crate::reports::list_subscriptions(&conn)? {
        let status = if sub.active { "active".green() } else { "cancelled".dimmed() };
        table.add_row(vec![
            Cell::new(sub.id),
            Cell::new(sub.name),
            Cell::new(sub.frequency),
            Cell::new(sub.next_due_date),
            Cell::new(sub.last_posted_date.unwrap_or_default()),
            Cell::new(account),
            Cell::new(status),
        ]);
    }
    println!("Subscriptions\n{table}");
    Ok(())
}

pub fn advance(id: i64, amount: f64, date: Option<String>) -> Result<()> {
    let mut conn = get_connection(&db_path())?;
    let date = date.unwrap_or_else(today);
    let txn_id = ledger::advance_subscription(&mut conn, id, amount, &date)?;
    println!("Posted {} for subscription {id} (transaction {txn_id})", money(amount));
    Ok(())
}

pub fn cancel(id: i64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    ledger::cancel_subscription(&conn, id)?;
    println!("Cancelled subscription {id}");
    Ok(())
}
