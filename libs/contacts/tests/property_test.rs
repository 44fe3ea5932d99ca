//! Property-based tests using QuickCheck

use contactsdb_contacts::{
    build_predicate, ownership_script, seed_contacts, seed_documents, ContactsService, QueryMode,
    QueryVariant, CONTACTS_COLLECTION, CONTACTS_DATABASE,
};
use contactsdb_docstore::{EmbeddedStore, Predicate};
use quickcheck::{QuickCheck, TestResult};

fn service() -> ContactsService {
    let store = EmbeddedStore::start();
    let db = store.database(CONTACTS_DATABASE);
    seed_contacts(&db, CONTACTS_COLLECTION).expect("seed");
    ContactsService::new(db, CONTACTS_COLLECTION)
}

fn owner(pick: u8) -> String {
    format!("user{}", pick % 4)
}

/// Secure searches return exactly the documents a direct scan would.
#[test]
fn prop_secure_matches_ground_truth() {
    fn prop(pick: u8, own_email: bool, term: String) -> bool {
        let service = service();
        let documents = seed_documents();
        let identity = owner(pick);
        let term = if own_email {
            format!("contact{}@private.info", pick % 4)
        } else {
            term
        };
        let expected: Vec<_> = documents
            .iter()
            .filter(|d| {
                d.get_str("sharedWith") == Some(identity.as_str())
                    && d.get_str("email") == Some(term.as_str())
            })
            .cloned()
            .collect();

        QueryMode::Secure.variants().all(|variant| {
            service
                .search(QueryMode::Secure, variant, &identity, &term)
                .map(|found| found == expected)
                .unwrap_or(false)
        })
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(u8, bool, String) -> bool);
}

/// Every insecure variant produces the identical script for any input.
#[test]
fn prop_insecure_scripts_identical() {
    fn prop(identity: String, term: String) -> TestResult {
        let expected = Predicate::script(ownership_script(&identity, &term));
        for variant in QueryMode::Insecure.variants() {
            match build_predicate(QueryMode::Insecure, variant, &identity, &term) {
                Ok(predicate) if predicate == expected => {}
                Ok(other) => return TestResult::error(format!("{variant}: {other:?}")),
                Err(e) => return TestResult::error(format!("{variant}: {e}")),
            }
        }
        TestResult::passed()
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String, String) -> TestResult);
}

/// For plain e-mail shaped terms both modes agree.
#[test]
fn prop_modes_agree_on_plain_terms() {
    fn prop(pick: u8, contact: u8) -> bool {
        let service = service();
        let identity = owner(pick);
        let term = format!("contact{}@private.info", contact % 4);
        let secure = service
            .search(QueryMode::Secure, QueryVariant::BsonFilter, &identity, &term)
            .ok();
        let insecure = service
            .search(QueryMode::Insecure, QueryVariant::Put, &identity, &term)
            .ok();
        secure.is_some() && secure == insecure
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(u8, u8) -> bool);
}
