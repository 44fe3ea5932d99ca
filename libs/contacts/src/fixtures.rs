//! Seed data

use contactsdb_docstore::{Database, Document};

use crate::error::Result;

pub const CONTACTS_DATABASE: &str = "test";
pub const CONTACTS_COLLECTION: &str = "contacts";

/// Three contacts, one shared with each of `user1`, `user2` and `user3`.
pub fn seed_documents() -> Vec<Document> {
    (1..=3)
        .map(|n| {
            Document::new()
                .append("email", format!("contact{n}@private.info"))
                .append("address", format!("{} Fake St", SEED_STREET_NUMBERS[n - 1]))
                .append("phone", format!("{n}{n}{n}-{n}{n}{n}-{n}{n}{n}{n}"))
                .append("sharedWith", format!("user{n}"))
        })
        .collect()
}

const SEED_STREET_NUMBERS: [&str; 3] = ["123", "456", "789"];

/// Drop and recreate `collection`, then load [`seed_documents`].
/// Running it twice leaves the same three documents.
pub fn seed_contacts(database: &Database, collection: &str) -> Result<usize> {
    database.drop_collection(collection)?;
    database.create_collection(collection)?;
    let inserted = database.insert_many(collection, seed_documents())?;
    tracing::info!(
        database = database.name(),
        collection,
        inserted,
        "Contacts seeded"
    );
    Ok(inserted)
}
