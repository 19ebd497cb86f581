use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{expand_path, get_data_dir, load_settings, save_settings, DB_FILE};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = expand_path(&dir);
    }
    save_settings(&settings)?;

    let resolved = get_data_dir();
    std::fs::create_dir_all(&resolved)?;

    let conn = get_connection(&resolved.join(DB_FILE))?;
    init_db(&conn)?;

    println!("Initialized penny at {}", resolved.display());
    Ok(())
}
