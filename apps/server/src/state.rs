//! Shared application state

use anyhow::Context as _;
use contactsdb_contacts::{seed_contacts, ContactsService};
use contactsdb_docstore::EmbeddedStore;
use std::sync::Arc;

use crate::{auth::AuthManager, Config};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: AuthManager,
    pub store: EmbeddedStore,
    pub contacts: ContactsService,
}

impl AppState {
    /// Start the embedded store and prepare the contacts collection.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let store = EmbeddedStore::start();
        let database = store.database(config.store.database.clone());

        if config.store.seed_on_start {
            seed_contacts(&database, &config.store.collection)
                .context("Failed to seed contacts collection")?;
        } else {
            database
                .create_collection(&config.store.collection)
                .context("Failed to create contacts collection")?;
        }

        let contacts = ContactsService::new(database, config.store.collection.clone());

        Ok(Self {
            auth: AuthManager::new(Arc::clone(&config)),
            config,
            store,
            contacts,
        })
    }

    /// Stop the embedded store. In-flight searches fail afterwards.
    pub fn shutdown(&self) -> anyhow::Result<()> {
        self.store.stop().context("Failed to stop embedded store")
    }
}
