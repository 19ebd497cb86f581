use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::today;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger;
use crate::models::Frequency;
use crate::reports;
use crate::settings::db_path;

pub fn add(name: &str, amount: f64, due: &str, freq: &str, account: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let account_id = ledger::find_account(&conn, account)?;
    let parsed = Frequency::parse(freq)?;
    let id = ledger::record_bill(&conn, name, amount, due, parsed, account_id)?;
    println!("Added bill {name} (id {id}), due {due}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Amount", "Next Due", "Repeats", "Account"]);
    for (bill, account) in reports::list_bills(&conn)? {
        table.add_row(vec![
            Cell::new(bill.id),
            Cell::new(bill.name),
            Cell::new(money(bill.amount)),
            Cell::new(bill.due_date),
            Cell::new(bill.repeat_freq),
            Cell::new(account),
        ]);
    }
    println!("Bills\n{table}");
    Ok(())
}

pub fn pay(id: i64, date: Option<String>) -> Result<()> {
    let mut conn = get_connection(&db_path())?;
    let date = date.unwrap_or_else(today);
    if ledger::mark_bill_paid(&mut conn, id, &date)? {
        println!("Paid bill {id} on {date}");
    } else {
        println!("{}", format!("Bill {id} already paid for this cycle").yellow());
    }
    Ok(())
}

pub fn due(days: u64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let bills = reports::get_upcoming_bills(&conn, &today(), days)?;
    if bills.is_empty() {
        println!("No bills due in the next {days} days");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Amount", "Due", "Account"]);
    for b in &bills {
        table.add_row(vec![
            Cell::new(b.bill_id),
            Cell::new(&b.name),
            Cell::new(money(b.amount)),
            Cell::new(&b.due_date),
            Cell::new(&b.account),
        ]);
    }
    println!("Bills due within {days} days\n{table}");
    Ok(())
}
