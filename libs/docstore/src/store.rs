//! Embedded store lifecycle
//!
//! [`EmbeddedStore`] stands in for a disposable local database instance:
//! `start` it, obtain [`Database`] handles, load data, query, `stop`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::collection::Collection;
use crate::document::Document;
use crate::engine::{ScriptEngine, WhereExprEngine};
use crate::error::{Error, Result};

type Catalog = HashMap<String, HashMap<String, Arc<Collection>>>;

/// Options for [`EmbeddedStore::start_with`].
#[derive(Clone)]
pub struct StoreOptions {
    /// Engine used by every collection for `$where`.
    pub script_engine: Arc<dyn ScriptEngine>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            script_engine: Arc::new(WhereExprEngine),
        }
    }
}

struct Inner {
    running: AtomicBool,
    catalog: RwLock<Catalog>,
    options: StoreOptions,
}

/// In-process document store. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct EmbeddedStore {
    inner: Arc<Inner>,
}

impl EmbeddedStore {
    /// Start a store with the default `$where` engine.
    pub fn start() -> Self {
        Self::start_with(StoreOptions::default())
    }

    pub fn start_with(options: StoreOptions) -> Self {
        tracing::debug!(
            script_engine = options.script_engine.name(),
            "Embedded store started"
        );
        Self {
            inner: Arc::new(Inner {
                running: AtomicBool::new(true),
                catalog: RwLock::new(Catalog::new()),
                options,
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Stop the store and discard all data. Subsequent calls fail with
    /// [`Error::NotRunning`].
    pub fn stop(&self) -> Result<()> {
        if !self.inner.running.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        self.inner
            .catalog
            .write()
            .map_err(|_| Error::Poisoned)?
            .clear();
        tracing::debug!("Embedded store stopped");
        Ok(())
    }

    /// Handle to a logical database. Databases exist implicitly.
    pub fn database(&self, name: impl Into<String>) -> Database {
        Database {
            name: name.into(),
            store: self.clone(),
        }
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(Error::NotRunning)
        }
    }
}

/// Handle to one logical database inside an [`EmbeddedStore`].
#[derive(Clone)]
pub struct Database {
    name: String,
    store: EmbeddedStore,
}

impl Database {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of a collection.
    pub fn collection(&self, name: &str) -> Result<Arc<Collection>> {
        self.store.ensure_running()?;
        let catalog = self.store.inner.catalog.read().map_err(|_| Error::Poisoned)?;
        catalog
            .get(&self.name)
            .and_then(|collections| collections.get(name))
            .cloned()
            .ok_or_else(|| Error::CollectionNotFound {
                database: self.name.clone(),
                collection: name.to_string(),
            })
    }

    pub fn collection_names(&self) -> Result<Vec<String>> {
        self.store.ensure_running()?;
        let catalog = self.store.inner.catalog.read().map_err(|_| Error::Poisoned)?;
        let mut names: Vec<String> = catalog
            .get(&self.name)
            .map(|collections| collections.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }

    /// Create an empty collection. Existing collections are left as they are.
    pub fn create_collection(&self, name: &str) -> Result<Arc<Collection>> {
        self.store.ensure_running()?;
        let mut catalog = self.store.inner.catalog.write().map_err(|_| Error::Poisoned)?;
        let engine = Arc::clone(&self.store.inner.options.script_engine);
        let collection = catalog
            .entry(self.name.clone())
            .or_default()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Collection::new(name, engine)));
        Ok(Arc::clone(collection))
    }

    /// Drop a collection. Returns whether it existed.
    pub fn drop_collection(&self, name: &str) -> Result<bool> {
        self.store.ensure_running()?;
        let mut catalog = self.store.inner.catalog.write().map_err(|_| Error::Poisoned)?;
        let removed = catalog
            .get_mut(&self.name)
            .and_then(|collections| collections.remove(name))
            .is_some();
        if removed {
            tracing::debug!(database = %self.name, collection = name, "Collection dropped");
        }
        Ok(removed)
    }

    /// Append documents to an existing collection, publishing a new snapshot.
    pub fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<usize> {
        self.store.ensure_running()?;
        let mut catalog = self.store.inner.catalog.write().map_err(|_| Error::Poisoned)?;
        let slot = catalog
            .get_mut(&self.name)
            .and_then(|collections| collections.get_mut(collection))
            .ok_or_else(|| Error::CollectionNotFound {
                database: self.name.clone(),
                collection: collection.to_string(),
            })?;

        let inserted = documents.len();
        *slot = Arc::new(slot.with_documents(documents));
        tracing::debug!(
            database = %self.name,
            collection,
            inserted,
            total = slot.len(),
            "Documents inserted"
        );
        Ok(inserted)
    }
}
