use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger;
use crate::models::BudgetPeriod;
use crate::settings::db_path;

pub fn set(category: &str, amount: f64, period: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let category_id = ledger::find_category(&conn, category)?;
    let parsed = BudgetPeriod::parse(period)?;
    ledger::set_budget(&conn, category_id, amount, parsed)?;
    println!("Budget for {category}: {} per {period}", money(amount));
    Ok(())
}
