use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::ledger;
use crate::models::CategoryType;
use crate::settings::db_path;

pub fn add(name: &str, category_type: &str, emoji: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let parsed = CategoryType::parse(category_type)?;
    ledger::add_category(&conn, name, emoji, parsed)?;
    println!("Added category: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Emoji", "Type"]);
    for cat in crate::reports::list_categories(&conn)? {
        table.add_row(vec![
            Cell::new(cat.id),
            Cell::new(cat.name),
            Cell::new(cat.emoji.unwrap_or_default()),
            Cell::new(cat.category_type),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}
