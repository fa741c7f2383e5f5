use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// A destination for rendered site content.
pub trait Store {
    type Error: std::error::Error;

    /// Stores the HTML for the given route (e.g., `/posts/hello/`).
    fn store_html(&self, route: &str, rendered_html: String) -> Result<(), Self::Error>;

    /// Stores a file at the given path (e.g., `/rss.xml`).
    fn store_file(&self, path: &str, contents: String) -> Result<(), Self::Error>;
}

pub struct DiskStorage {
    output_path: PathBuf,
}

impl DiskStorage {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes beneath the output directory. Paths that would leave it are
    /// rejected.
    fn write(&self, relative_path: PathBuf, contents: &str) -> io::Result<()> {
        if !relative_path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "refusing to write outside the output directory: '{}'",
                    relative_path.display()
                ),
            ));
        }

        let output_path = self.output_path.join(relative_path);

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(output_path, contents)
    }
}

impl Store for DiskStorage {
    type Error = io::Error;

    fn store_html(&self, route: &str, rendered_html: String) -> Result<(), Self::Error> {
        let output_dir = PathBuf::from(route.trim_matches('/'));

        self.write(output_dir.join("index.html"), &rendered_html)
    }

    fn store_file(&self, path: &str, contents: String) -> Result<(), Self::Error> {
        self.write(PathBuf::from(path.trim_start_matches('/')), &contents)
    }
}

/// Content kept in memory, keyed by the path it is served from.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    storage: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStorage {
    pub fn new(storage: Arc<RwLock<HashMap<String, String>>>) -> Self {
        Self { storage }
    }

    /// Returns the content served at the given path.
    ///
    /// A route's HTML is served both with and without its trailing slash.
    pub fn get(&self, path: &str) -> Result<Option<String>, InMemoryStorageError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| InMemoryStorageError::Poisoned)?;

        let content = storage
            .get(path)
            .or_else(|| storage.get(&format!("{}/", path.trim_end_matches('/'))));

        Ok(content.cloned())
    }

    pub fn len(&self) -> usize {
        self.storage.read().map_or(0, |storage| storage.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Error, Debug)]
pub enum InMemoryStorageError {
    #[error("poisoned")]
    Poisoned,
}

impl Store for InMemoryStorage {
    type Error = InMemoryStorageError;

    fn store_html(&self, route: &str, rendered_html: String) -> Result<(), Self::Error> {
        self.storage
            .write()
            .map_err(|_| InMemoryStorageError::Poisoned)?
            .insert(route.to_string(), rendered_html);

        Ok(())
    }

    fn store_file(&self, path: &str, contents: String) -> Result<(), Self::Error> {
        self.storage
            .write()
            .map_err(|_| InMemoryStorageError::Poisoned)?
            .insert(format!("/{}", path.trim_start_matches('/')), contents);

        Ok(())
    }
}
