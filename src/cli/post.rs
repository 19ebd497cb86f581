use crate::cli::today;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger;
use crate::models::TxnType;
use crate::settings::db_path;

#[allow(clippy::too_many_arguments)]
pub fn run(
    account: &str,
    category: Option<&str>,
    amount: f64,
    txn_type: &str,
    date: Option<String>,
    description: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let mut conn = get_connection(&db_path())?;
    let account_id = ledger::find_account(&conn, account)?;
    let category_id = match category {
        Some(name) => Some(ledger::find_category(&conn, name)?),
        None => None,
    };
    let parsed = TxnType::parse(txn_type)?;
    let date = date.unwrap_or_else(today);

    let id = ledger::post_transaction(
        &mut conn,
        account_id,
        category_id,
        amount,
        parsed,
        &date,
        description,
        notes,
    )?;
    println!("Posted {} {} to {account} (transaction {id})", txn_type, money(amount));
    Ok(())
}
