use colored::Colorize;

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger;
use crate::settings::db_path;

pub fn run(account: &str) -> Result<()> {
    let mut conn = get_connection(&db_path())?;
    let id = ledger::find_account(&conn, account)?;
    let (cached, derived) = ledger::reconcile_account(&mut conn, id)?;
    if (cached - derived).abs() > 0.005 {
        println!(
            "{}",
            format!(
                "{account}: cache was {} but history sums to {}; cache repaired",
                money(cached),
                money(derived)
            )
            .yellow()
        );
    } else {
        println!("{account}: balance {} matches history", money(derived));
    }
    Ok(())
}
