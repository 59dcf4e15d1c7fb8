//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `contactbook_core` linkage and print its version.
//! - Optionally open a contact database and print the filtered listing.
//! - Start rolling file logs in `logs/` next to the database.
//!
//! Usage: `contactbook_cli [DB_PATH [SEARCH_TERM]]`

use contactbook_core::{default_log_level, init_logging, ContactStore, SqliteKeyValueStorage};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

fn main() -> ExitCode {
    println!("contactbook_core ping={}", contactbook_core::ping());
    println!("contactbook_core version={}", contactbook_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };
    let term = args.next().unwrap_or_default();

    match log_dir_for(Path::new(&db_path)) {
        Ok(log_dir) => {
            if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
                eprintln!("warning: logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }

    match list_contacts(&db_path, &term) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn log_dir_for(db_path: &Path) -> std::io::Result<PathBuf> {
    let parent = db_path.parent().unwrap_or_else(|| Path::new(""));
    let base = if parent.is_absolute() {
        parent.to_path_buf()
    } else {
        std::env::current_dir()?.join(parent)
    };
    Ok(base.join("logs"))
}

fn list_contacts(db_path: &str, term: &str) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Rc::new(SqliteKeyValueStorage::open(db_path)?);
    let store = ContactStore::open(storage)?;
    let contacts = store.get_filtered(term);

    println!("contacts={} matched={}", store.len(), contacts.len());
    for contact in contacts {
        let vip = if contact.vip { " [vip]" } else { "" };
        println!(
            "{}\t{}\t{}\t{}{}",
            contact.id,
            contact.name,
            contact.email,
            contact.status.as_str(),
            vip
        );
    }
    Ok(())
}
