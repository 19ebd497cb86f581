use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger;
use crate::settings::db_path;

pub fn add(category: &str, amount: f64, deadline: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let category_id = ledger::find_category(&conn, category)?;
    let id = ledger::add_goal(&conn, category_id, amount, deadline)?;
    println!("Added goal {id} for {category}: {}", money(amount));
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Category", "Target", "Deadline"]);
    for (goal, category) in crate::reports::list_goals(&conn)? {
        table.add_row(vec![
            Cell::new(goal.id),
            Cell::new(category),
            Cell::new(money(goal.target_amount)),
            Cell::new(goal.deadline.unwrap_or_default()),
        ]);
    }
    println!("Goals\n{table}");
    Ok(())
}
