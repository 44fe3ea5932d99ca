//! Contact search
//!
//! Every search takes the caller's identity and an e-mail search term and
//! returns the matching contacts shared with that identity. The same search
//! is implemented once per query construction API the store offers, in two
//! modes:
//!
//! - [`QueryMode::Insecure`] splices both inputs into a `$where` script.
//!   A term containing quotes and `||` rewrites the script and defeats the
//!   ownership check.
//! - [`QueryMode::Secure`] binds each input to its own equality clause.
//!
//! All insecure variants produce the same script; all secure variants match
//! the same documents.

pub mod builders;
pub mod error;
pub mod fixtures;
pub mod service;
pub mod variant;

pub use builders::{build_predicate, ownership_script};
pub use error::{Error, Result};
pub use fixtures::{seed_contacts, seed_documents, CONTACTS_COLLECTION, CONTACTS_DATABASE};
pub use service::ContactsService;
pub use variant::{QueryMode, QueryVariant};

/// Field holding the identity a contact is shared with.
pub const OWNER_FIELD: &str = "sharedWith";

/// Field matched against the search term.
pub const EMAIL_FIELD: &str = "email";
