//! Catalog command handlers: `add`, `remove`, and `list`.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;

const AFFIRMATIVE: [&str; 4] = ["y", "yes", "s", "si"];

pub(crate) fn add(catalog_path: &Path, name: &str, url: &str) -> anyhow::Result<()> {
    let mut products = pricewatch_core::load_catalog(catalog_path);
    pricewatch_core::add_product(&mut products, name, url)?;
    pricewatch_core::save_catalog(catalog_path, &products)
        .with_context(|| format!("failed to save {}", catalog_path.display()))?;

    println!(
        "Added '{}'. Now tracking {} product(s).",
        name.trim(),
        products.len()
    );
    Ok(())
}

/// Removes `name` from the catalog after `confirm` approves, unless `yes`
/// already did.
pub(crate) fn remove<C>(catalog_path: &Path, name: &str, yes: bool, confirm: C) -> anyhow::Result<()>
where
    C: FnOnce(&str) -> bool,
{
    let mut products = pricewatch_core::load_catalog(catalog_path);
    if !products.iter().any(|p| p.name == name) {
        anyhow::bail!("no tracked product named '{name}'");
    }

    if !yes && !confirm(&format!("Are you sure you want to delete '{name}'? (y/n):")) {
        println!("Deletion cancelled.");
        return Ok(());
    }

    let removed = pricewatch_core::remove_product(&mut products, name)?;
    pricewatch_core::save_catalog(catalog_path, &products)
        .with_context(|| format!("failed to save {}", catalog_path.display()))?;
    println!("'{}' has been deleted.", removed.name);
    Ok(())
}

pub(crate) fn list(catalog_path: &Path) {
    let products = pricewatch_core::load_catalog(catalog_path);
    if products.is_empty() {
        println!("No products tracked. Add one with `pricewatch add`.");
        return;
    }
    for (i, product) in products.iter().enumerate() {
        println!("{}. {} - {}", i + 1, product.name, product.url);
    }
}

/// Prompts on stdout and reads one line from stdin. EOF or a read error
/// counts as "no".
pub(crate) fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{prompt} ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_affirmative(&answer),
    }
}

fn is_affirmative(answer: &str) -> bool {
    AFFIRMATIVE.contains(&answer.trim().to_lowercase().as_str())
}
