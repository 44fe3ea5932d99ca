//! End-to-end search behavior across every construction variant

use contactsdb_contacts::{
    seed_contacts, ContactsService, QueryMode, QueryVariant, CONTACTS_COLLECTION,
    CONTACTS_DATABASE,
};
use contactsdb_docstore::EmbeddedStore;

const INJECTION: &str = r#"" || "4" != "5"#;

fn seeded_service() -> (EmbeddedStore, ContactsService) {
    let store = EmbeddedStore::start();
    let db = store.database(CONTACTS_DATABASE);
    seed_contacts(&db, CONTACTS_COLLECTION).expect("seed");
    let service = ContactsService::new(db, CONTACTS_COLLECTION);
    (store, service)
}

fn count(service: &ContactsService, mode: QueryMode, variant: QueryVariant, user: &str, term: &str) -> usize {
    service
        .search(mode, variant, user, term)
        .unwrap_or_else(|e| panic!("{mode}/{variant}: {e}"))
        .len()
}

#[test]
fn test_regular_search_finds_own_contact() {
    let (_store, service) = seeded_service();
    for mode in QueryMode::ALL {
        for variant in mode.variants() {
            assert_eq!(
                count(&service, mode, variant, "user1", "contact1@private.info"),
                1,
                "{mode}/{variant}"
            );
        }
    }
}

#[test]
fn test_access_check_hides_other_contacts() {
    let (_store, service) = seeded_service();
    for mode in QueryMode::ALL {
        for variant in mode.variants() {
            assert_eq!(
                count(&service, mode, variant, "user1", "contact2@private.info"),
                0,
                "{mode}/{variant}"
            );
        }
    }
}

#[test]
fn test_injection_leaks_every_contact_in_insecure_mode() {
    let (_store, service) = seeded_service();
    for variant in QueryMode::Insecure.variants() {
        let found = service
            .search(QueryMode::Insecure, variant, "user1", INJECTION)
            .unwrap();
        assert_eq!(found.len(), 3, "{variant}");
        let owners: Vec<_> = found.iter().filter_map(|d| d.get_str("sharedWith")).collect();
        assert_eq!(owners, vec!["user1", "user2", "user3"], "{variant}");
    }
}

#[test]
fn test_injection_is_inert_in_secure_mode() {
    let (_store, service) = seeded_service();
    for variant in QueryMode::Secure.variants() {
        assert_eq!(
            count(&service, QueryMode::Secure, variant, "user1", INJECTION),
            0,
            "{variant}"
        );
    }
}

#[test]
fn test_unbalanced_quote_is_an_evaluation_error() {
    let (_store, service) = seeded_service();
    let err = service
        .search(QueryMode::Insecure, QueryVariant::Put, "user1", "\"")
        .unwrap_err();
    assert!(err.is_evaluation(), "{err}");

    // Same input is just a string in secure mode
    assert_eq!(count(&service, QueryMode::Secure, QueryVariant::Put, "user1", "\""), 0);
}

#[test]
fn test_reseeding_is_idempotent() {
    let (store, service) = seeded_service();
    let db = store.database(CONTACTS_DATABASE);
    seed_contacts(&db, CONTACTS_COLLECTION).unwrap();
    assert_eq!(db.collection(CONTACTS_COLLECTION).unwrap().len(), 3);
    assert_eq!(
        count(&service, QueryMode::Insecure, QueryVariant::Append, "user3", INJECTION),
        3
    );
}

#[test]
fn test_search_after_stop_fails() {
    let (store, service) = seeded_service();
    store.stop().unwrap();
    let err = service
        .search(QueryMode::Secure, QueryVariant::BsonFilter, "user1", "contact1@private.info")
        .unwrap_err();
    assert!(!err.is_evaluation());
}
