use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::Local;
use migration_engine::create_migration_file;

/// Where migration files live, relative to the working directory.
const MIGRATIONS_DIR: &str = "db/migrations";

fn main() {
    if let Err(e) = run() {
        println!("Failed to create migration: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    print!("Migration name: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let name = input.trim_end_matches(['\r', '\n']);
    if name.trim().is_empty() {
        return Err("migration name must not be empty".into());
    }

    let path = create_migration_file(Path::new(MIGRATIONS_DIR), name, Local::now().naive_local())?;
    println!("Migration created: {}", path.display());

    Ok(())
}
