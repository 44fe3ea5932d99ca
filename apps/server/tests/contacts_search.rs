#[allow(unused)]
mod support;

use axum::http::StatusCode;
use contactsdb_contacts::QueryMode;
use support::{
    assert_error_body, assert_status, contacts, owners, search_path, with_test_app, INJECTION,
};

// ---------------------------------------------------------------------------
// Every variant, both modes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn regular_search_returns_own_contact() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            for mode in QueryMode::ALL {
                for variant in mode.variants() {
                    let path = search_path(mode.as_str(), variant.slug(), "contact1@private.info");
                    let (status, _headers, body) = app.get_as("user1", "pass1", &path).await?;
                    assert_status(status, StatusCode::OK, &path);

                    let found = contacts(&body)?;
                    assert_eq!(found.len(), 1, "{path}");
                    assert_eq!(found[0]["email"], "contact1@private.info");
                    assert_eq!(found[0]["address"], "123 Fake St");
                    assert_eq!(found[0]["phone"], "111-111-1111");
                    assert_eq!(found[0]["sharedWith"], "user1");
                }
            }
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn access_check_hides_other_users_contacts() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            for mode in QueryMode::ALL {
                for variant in mode.variants() {
                    let path = search_path(mode.as_str(), variant.slug(), "contact2@private.info");
                    let (status, _headers, body) = app.get_as("user1", "pass1", &path).await?;
                    assert_status(status, StatusCode::OK, &path);
                    assert!(contacts(&body)?.is_empty(), "{path}");
                }
            }
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn injection_leaks_all_contacts_on_insecure_endpoints() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            for variant in QueryMode::Insecure.variants() {
                let path = search_path("insecure", variant.slug(), INJECTION);
                let (status, _headers, body) = app.get_as("user1", "pass1", &path).await?;
                assert_status(status, StatusCode::OK, &path);
                assert_eq!(owners(&contacts(&body)?), ["user1", "user2", "user3"], "{path}");
            }
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn injection_is_inert_on_secure_endpoints() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            for variant in QueryMode::Secure.variants() {
                let path = search_path("secure", variant.slug(), INJECTION);
                let (status, _headers, body) = app.get_as("user1", "pass1", &path).await?;
                assert_status(status, StatusCode::OK, &path);
                assert!(contacts(&body)?.is_empty(), "{path}");
            }
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn fields_keep_document_order() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let path = search_path("secure", "bson-filter", "contact3@private.info");
            let (_status, _headers, body) = app.get_as("user3", "pass3", &path).await?;
            let text = std::str::from_utf8(&body)?;
            assert_eq!(
                text,
                r#"[{"email":"contact3@private.info","address":"789 Fake St","phone":"333-333-3333","sharedWith":"user3"}]"#
            );
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn repeated_searches_are_identical() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let path = search_path("insecure", "basicdbobject-parse", INJECTION);
            let (_, _, first) = app.get_as("user2", "pass2", &path).await?;
            let (_, _, second) = app.get_as("user2", "pass2", &path).await?;
            assert_eq!(first, second);
            Ok(())
        })
    })
    .await
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_script_is_bad_request() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let path = search_path("insecure", "basicdbobject-put", "\"");
            let (status, _headers, body) = app.get_as("user1", "pass1", &path).await?;
            assert_status(status, StatusCode::BAD_REQUEST, &path);
            let message = assert_error_body(&body, StatusCode::BAD_REQUEST)?;
            assert!(message.contains("evaluation"), "{message}");

            // Same term is only data on the secure side
            let path = search_path("secure", "basicdbobject-put", "\"");
            let (status, _headers, _body) = app.get_as("user1", "pass1", &path).await?;
            assert_status(status, StatusCode::OK, &path);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn oversized_injection_is_bad_request() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let term = format!("\"{} || \"", " || \"a\"".repeat(2000));
            let path = search_path("insecure", "basicdbobject-put", &term);
            let (status, _headers, body) = app.get_as("user1", "pass1", &path).await?;
            assert_status(status, StatusCode::BAD_REQUEST, "oversized injection");
            let message = assert_error_body(&body, StatusCode::BAD_REQUEST)?;
            assert!(message.contains("too many operators"), "{message}");

            // The server keeps answering afterwards
            let path = search_path("insecure", "basicdbobject-put", "contact1@private.info");
            let (status, _headers, body) = app.get_as("user1", "pass1", &path).await?;
            assert_status(status, StatusCode::OK, &path);
            assert_eq!(contacts(&body)?.len(), 1);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn missing_email_is_bad_request() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app
                .get_as("user1", "pass1", "/secure/basicdbobject-put/contacts/search")
                .await?;
            assert_status(status, StatusCode::BAD_REQUEST, "missing email");
            let message = assert_error_body(&body, StatusCode::BAD_REQUEST)?;
            assert!(message.contains("email"), "{message}");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn empty_email_is_a_valid_term() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            for mode in ["insecure", "secure"] {
                let path = format!("/{mode}/basicdbobject-append/contacts/search?email=");
                let (status, _headers, body) = app.get_as("user1", "pass1", &path).await?;
                assert_status(status, StatusCode::OK, &path);
                assert!(contacts(&body)?.is_empty());
            }
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn unknown_routes_are_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            for path in [
                search_path("insecure", "bson-filter", "contact1@private.info"),
                search_path("secure", "basicdbobject-merge", "contact1@private.info"),
                search_path("public", "basicdbobject-put", "contact1@private.info"),
                "/secure/basicdbobject-put/contacts".to_string(),
            ] {
                let (status, _headers, body) = app.get_as("user1", "pass1", &path).await?;
                assert_status(status, StatusCode::NOT_FOUND, &path);
                assert_error_body(&body, StatusCode::NOT_FOUND)?;
            }
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn stopped_store_is_internal_error() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            app.state.shutdown()?;
            let path = search_path("secure", "bson-filter", "contact1@private.info");
            let (status, _headers, body) = app.get_as("user1", "pass1", &path).await?;
            assert_status(status, StatusCode::INTERNAL_SERVER_ERROR, &path);
            let message = assert_error_body(&body, StatusCode::INTERNAL_SERVER_ERROR)?;
            assert_eq!(message, "Internal server error");
            Ok(())
        })
    })
    .await
}
