use colored::Colorize;

use crate::cli::today;
use crate::db::get_connection;
use crate::error::Result;
use crate::ledger;
use crate::settings::db_path;

pub fn run(bill_id: i64, date: Option<String>, message: &str) -> Result<()> {
    let mut conn = get_connection(&db_path())?;
    let date = date.unwrap_or_else(today);
    if ledger::log_reminder_if_new(&mut conn, bill_id, &date, message)? {
        println!("Reminder logged for bill {bill_id} on {date}");
    } else {
        println!(
            "{}",
            format!("Reminder for bill {bill_id} on {date} already sent; suppressed").yellow()
        );
    }
    Ok(())
}
