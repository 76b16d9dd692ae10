use anyhow::Result;
use comfy_table::Cell;
use photoalbum_core::{KeyValueStore, Settings};

use super::new_table;

pub fn show<S: KeyValueStore>(store: &S) -> Result<()> {
    let settings = Settings::load(store);
    let mut table = new_table(vec!["Key", "Value"]);
    for (key, value) in settings.entries() {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    println!("{table}");
    println!("Photo gap: {} px", settings.photo_gap_px());
    Ok(())
}

/// Only the named key is written; the others keep whatever they hold.
pub fn set<S: KeyValueStore>(store: &mut S, key: &str, value: &str) -> Result<()> {
    let mut settings = Settings::load(store);
    settings.set(key, value)?;
    let stored = settings
        .entries()
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
        .unwrap_or_else(|| value.trim().to_string());
    store.set(key, &stored)?;
    println!("{key} = {stored}");
    Ok(())
}
