use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::today;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{money, signed_money};
use crate::ledger;
use crate::reports;
use crate::settings::db_path;

pub fn register(
    account: Option<String>,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let account_id = match account.as_deref() {
        Some(name) => Some(ledger::find_account(&conn, name)?),
        None => None,
    };
    let rows = reports::get_register(&conn, account_id, from_date.as_deref(), to_date.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Account", "Category", "Type", "Description", "Amount"]);
    for r in &rows {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(&r.date),
            Cell::new(&r.account),
            Cell::new(r.category.as_deref().unwrap_or("")),
            Cell::new(&r.txn_type),
            Cell::new(r.description.as_deref().unwrap_or("")),
            Cell::new(signed_money(r.signed_amount)),
        ]);
    }
    println!("Register ({} transactions)\n{table}", rows.len());
    Ok(())
}

pub fn spending(from_date: Option<String>, to_date: Option<String>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let items = reports::get_spending(&conn, from_date.as_deref(), to_date.as_deref())?;

    let total: f64 = items.iter().map(|i| i.total).sum();
    let mut table = Table::new();
    table.set_header(vec!["Category", "Spent", "Count"]);
    for item in &items {
        let label = match &item.emoji {
            Some(e) => format!("{e} {}", item.category),
            None => item.category.clone(),
        };
        table.add_row(vec![
            Cell::new(label),
            Cell::new(money(item.total)),
            Cell::new(item.count),
        ]);
    }
    table.add_row(vec![Cell::new("Total".bold()), Cell::new(money(total)), Cell::new("")]);
    println!("Spending by Category\n{table}");
    Ok(())
}

pub fn balances() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = reports::get_balances(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Account", "Type", "Cached", "Derived", ""]);
    let mut net = 0.0;
    for r in &rows {
        let flag = if r.drifted() { "drift".red().to_string() } else { String::new() };
        table.add_row(vec![
            Cell::new(&r.name),
            Cell::new(&r.account_type),
            Cell::new(money(r.cached)),
            Cell::new(money(r.derived)),
            Cell::new(flag),
        ]);
        net += r.derived;
    }
    table.add_row(vec![
        Cell::new("Net".bold()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(money(net)),
        Cell::new(""),
    ]);
    println!("Balances\n{table}");
    Ok(())
}

pub fn budgets(as_of: Option<String>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let as_of = as_of.unwrap_or_else(today);
    let status = reports::get_budget_status(&conn, &as_of)?;

    let mut table = Table::new();
    table.set_header(vec!["Category", "Period", "Cap", "Spent", "Remaining"]);
    for s in &status {
        let remaining = s.remaining();
        let cell = if remaining < 0.0 {
            Cell::new(money(remaining).red().to_string())
        } else {
            Cell::new(money(remaining))
        };
        table.add_row(vec![
            Cell::new(&s.category),
            Cell::new(&s.period),
            Cell::new(money(s.cap)),
            Cell::new(money(s.spent)),
            cell,
        ]);
    }
    println!("Budgets as of {as_of}\n{table}");
    Ok(())
}
