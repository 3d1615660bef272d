//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todoey_core` linkage and run a short walkthrough on one backend.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `todoey_cli [config.json]`. Without a config the volatile
//! in-memory backend is used. Logs go to `$TODOEY_LOG_DIR` when it is an
//! absolute path, else to `todoey-logs` under the system temp directory.

use std::path::PathBuf;
use std::process::ExitCode;
use todoey_core::{
    default_log_level, init_logging, open_store, CategoryList, DeletableRows, ItemList,
    ListingResult, StoreConfig, StoreHandle,
};

const LOG_DIR_ENV: &str = "TODOEY_LOG_DIR";

fn main() -> ExitCode {
    println!("todoey_core ping={}", todoey_core::ping());
    println!("todoey_core version={}", todoey_core::core_version());

    let log_dir = resolve_log_dir(std::env::var(LOG_DIR_ENV).ok());
    match init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        Ok(()) => println!("logging dir={}", log_dir.display()),
        Err(message) => eprintln!("logging disabled: {message}"),
    }

    let config = match load_config(std::env::args().nth(1)) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("config error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let store = match open_store(&config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("store error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match walkthrough(&store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("walkthrough error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_log_dir(configured: Option<String>) -> PathBuf {
    configured
        .map(PathBuf::from)
        .filter(|path| path.is_absolute())
        .unwrap_or_else(|| std::env::temp_dir().join("todoey-logs"))
}

fn load_config(path: Option<String>) -> Result<StoreConfig, String> {
    let Some(path) = path else {
        return Ok(StoreConfig::default());
    };
    let text = std::fs::read_to_string(&path).map_err(|err| format!("{path}: {err}"))?;
    StoreConfig::from_json_str(&text).map_err(|err| err.to_string())
}

fn walkthrough(store: &StoreHandle) -> ListingResult<()> {
    let mut categories = CategoryList::load(store)?;
    categories.add("Work")?;
    let home = categories.add("Home")?;

    let mut items = ItemList::load(store, home.uuid)?;
    items.add("Buy Eggos")?;
    items.add("Milk")?;
    items.toggle_row(0)?;
    print_items("home", &items);

    items.set_search("egg")?;
    print_items("search=egg", &items);
    items.set_search("")?;

    println!("categories={}", categories.row_count());
    for category in categories.rows() {
        println!("  category name={} id={}", category.name, category.uuid);
    }
    Ok(())
}

fn print_items(label: &str, items: &ItemList<&StoreHandle>) {
    println!("{label} rows={}", items.row_count());
    for item in items.rows() {
        let mark = if item.done { "x" } else { " " };
        println!("  [{mark}] {}", item.title);
    }
}
