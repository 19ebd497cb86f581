use crate::db::get_connection;
use crate::error::Result;
use crate::ledger;
use crate::settings::db_path;

pub fn add(name: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let id = ledger::add_tag(&conn, name)?;
    println!("Tag '{name}' (id {id})");
    Ok(())
}

pub fn apply(transaction_id: i64, tag: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let txn = ledger::get_transaction(&conn, transaction_id)?;
    let tag_id = ledger::add_tag(&conn, tag)?;
    ledger::tag_transaction(&conn, transaction_id, tag_id)?;
    let label = txn.description.unwrap_or_else(|| txn.date.clone());
    println!("Tagged transaction {transaction_id} ({label}) with '{tag}'");
    Ok(())
}
