use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger;
use crate::models::AccountType;
use crate::settings::db_path;

pub fn add(name: &str, account_type: &str, balance: f64) -> Result<()> {
    let mut conn = get_connection(&db_path())?;
    let parsed = AccountType::parse(account_type)?;
    ledger::create_account(&mut conn, name, parsed, balance)?;
    println!("Added account: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Type", "Balance", "Status"]);
    for acct in crate::reports::list_accounts(&conn)? {
        let status = if acct.active { "active".green() } else { "inactive".dimmed() };
        table.add_row(vec![
            Cell::new(acct.id),
            Cell::new(acct.name),
            Cell::new(acct.account_type),
            Cell::new(money(acct.balance)),
            Cell::new(status),
        ]);
    }
    println!("Accounts\n{table}");
    Ok(())
}

pub fn deactivate(name: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let id = ledger::find_account(&conn, name)?;
    ledger::deactivate_account(&conn, id)?;
    println!("Deactivated account: {name}");
    Ok(())
}
