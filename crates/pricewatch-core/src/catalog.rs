//! The tracked-product catalog: a JSON array of `{name, url}` objects on disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use url::Url;

use crate::products::ProductDescriptor;
use crate::CatalogError;

/// Load the product catalog.
///
/// Never fails: a missing file is an empty catalog, and a corrupt or
/// non-array file is treated as empty with a warning. Entries that are not
/// objects with string `name` and `url` fields are skipped.
#[must_use]
pub fn load_catalog(path: &Path) -> Vec<ProductDescriptor> {
    if !path.exists() {
        return Vec::new();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read catalog");
            return Vec::new();
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "catalog is corrupt; starting with an empty list"
            );
            return Vec::new();
        }
    };

    let Some(items) = value.as_array() else {
        tracing::warn!(path = %path.display(), "catalog is not a JSON array; ignoring it");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let name = item.get("name")?.as_str()?;
            let url = item.get("url")?.as_str()?;
            if name.trim().is_empty() || url.trim().is_empty() {
                tracing::warn!(
                    path = %path.display(),
                    index,
                    "skipping catalog entry with a blank name or url"
                );
                return None;
            }
            Some(ProductDescriptor::new(name, url))
        })
        .collect()
}

/// Save the catalog atomically.
///
/// Writes to a sibling `<file>.tmp`, fsyncs it, then renames it over `path`.
/// The temp file is removed if any step fails.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be written or renamed, or
/// [`CatalogError::Serialize`] if encoding fails.
pub fn save_catalog(path: &Path, products: &[ProductDescriptor]) -> Result<(), CatalogError> {
    let io_err = |source: std::io::Error| CatalogError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp = tmp_path(path);
    let result = write_then_rename(&tmp, path, products);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn write_then_rename(
    tmp: &Path,
    path: &Path,
    products: &[ProductDescriptor],
) -> Result<(), CatalogError> {
    let io_err = |source: std::io::Error| CatalogError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(tmp).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, products)?;
    writer.flush().map_err(io_err)?;
    writer.get_ref().sync_all().map_err(io_err)?;
    drop(writer);

    fs::rename(tmp, path).map_err(io_err)?;
    tracing::debug!(path = %path.display(), count = products.len(), "catalog saved");
    Ok(())
}

/// Normalizes a product URL for duplicate detection.
///
/// Lowercases the scheme and the whole authority (userinfo, host, port),
/// strips trailing slashes from non-root paths, keeps the query and drops
/// the fragment. Returns `None` when the URL has no scheme or host.
#[must_use]
pub fn normalize_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str().filter(|h| !h.is_empty())?;

    let path = parsed.path();
    let path = if path.is_empty() || path == "/" {
        path
    } else {
        path.trim_end_matches('/')
    };

    let mut authority = String::new();
    if !parsed.username().is_empty() || parsed.password().is_some() {
        authority.push_str(parsed.username());
        if let Some(password) = parsed.password() {
            authority.push(':');
            authority.push_str(password);
        }
        authority.push('@');
    }
    authority.push_str(host);
    if let Some(port) = parsed.port() {
        authority.push_str(&format!(":{port}"));
    }

    let mut normalized = format!("{}://{}", parsed.scheme(), authority.to_lowercase());
    normalized.push_str(path);
    if let Some(query) = parsed.query().filter(|q| !q.is_empty()) {
        normalized.push('?');
        normalized.push_str(query);
    }
    Some(normalized)
}

fn dedup_key(url: &str) -> String {
    normalize_url(url).unwrap_or_else(|| url.trim().to_string())
}

/// Appends a new product after validating it.
///
/// # Errors
///
/// - [`CatalogError::EmptyField`] if the name or URL is blank.
/// - [`CatalogError::InvalidUrl`] if the URL lacks a scheme or host.
/// - [`CatalogError::DuplicateUrl`] if the same normalized URL is already tracked.
pub fn add_product(
    products: &mut Vec<ProductDescriptor>,
    name: &str,
    url: &str,
) -> Result<(), CatalogError> {
    let name = name.trim();
    let url = url.trim();
    if name.is_empty() || url.is_empty() {
        return Err(CatalogError::EmptyField);
    }

    let normalized = normalize_url(url).ok_or_else(|| CatalogError::InvalidUrl {
        url: url.to_string(),
    })?;

    if let Some(existing) = products
        .iter()
        .find(|p| normalize_url(&p.url).as_deref() == Some(normalized.as_str()))
    {
        return Err(CatalogError::DuplicateUrl {
            existing: existing.name.clone(),
        });
    }

    products.push(ProductDescriptor::new(name, url));
    Ok(())
}

/// Removes the product named `name`, along with any other entry pointing at
/// the same normalized URL. Returns the entry that was selected.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownProduct`] if no entry has that name.
pub fn remove_product(
    products: &mut Vec<ProductDescriptor>,
    name: &str,
) -> Result<ProductDescriptor, CatalogError> {
    let target = products
        .iter()
        .find(|p| p.name == name)
        .cloned()
        .ok_or_else(|| CatalogError::UnknownProduct(name.to_string()))?;

    let key = dedup_key(&target.url);
    products.retain(|p| dedup_key(&p.url) != key);
    Ok(target)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
