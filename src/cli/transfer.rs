use crate::cli::today;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger;
use crate::settings::db_path;

pub fn run(
    from: &str,
    to: &str,
    amount: f64,
    date: Option<String>,
    description: Option<&str>,
) -> Result<()> {
    let mut conn = get_connection(&db_path())?;
    let from_id = ledger::find_account(&conn, from)?;
    let to_id = ledger::find_account(&conn, to)?;
    let date = date.unwrap_or_else(today);

    ledger::post_transfer(&mut conn, from_id, to_id, amount, &date, description)?;
    println!("Transferred {} from {from} to {to}", money(amount));
    Ok(())
}
