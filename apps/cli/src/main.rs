//! Command line driver for contact searches.
//!
//! Every command runs against a freshly seeded in-process store.
//!
//! ```bash
//! contactsdb-cli variants
//! contactsdb-cli search --mode insecure --variant basicdbobject-put --user user1 --email '" || "4" != "5'
//! contactsdb-cli where --expr 'this.sharedWith == "user2"'
//! contactsdb-cli tokens --expr 'this.email == "a" || 1'
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contactsdb_contacts::{
    build_predicate, seed_contacts, ContactsService, QueryMode, QueryVariant, CONTACTS_COLLECTION,
    CONTACTS_DATABASE,
};
use contactsdb_docstore::{EmbeddedStore, Predicate};
use contactsdb_whereexpr::{lexer::Lexer, Expression};

#[derive(Parser)]
#[command(name = "contactsdb-cli")]
#[command(about = "Compare $where string queries with structured queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the search variants available in each mode.
    Variants {
        /// Only list variants for this mode (insecure or secure)
        #[arg(long)]
        mode: Option<QueryMode>,
    },

    /// Run one contact search and print the matches as JSON.
    Search {
        /// insecure or secure
        #[arg(long)]
        mode: QueryMode,

        /// Variant slug, e.g. basicdbobject-put
        #[arg(long)]
        variant: QueryVariant,

        /// Identity the search is scoped to
        #[arg(long, default_value = "user1")]
        user: String,

        /// E-mail search term, used verbatim
        #[arg(long)]
        email: String,

        /// Print the built predicate before the results
        #[arg(long)]
        explain: bool,
    },

    /// Evaluate a raw $where expression against the seed contacts.
    Where {
        /// Expression source
        #[arg(long)]
        expr: String,

        /// Print the parsed expression fully parenthesized
        #[arg(long)]
        ast: bool,
    },

    /// Print the lexer tokens of an expression.
    Tokens {
        /// Expression source
        #[arg(long)]
        expr: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Variants { mode } => {
            let modes = match mode {
                Some(mode) => vec![mode],
                None => QueryMode::ALL.to_vec(),
            };
            for mode in modes {
                for variant in mode.variants() {
                    println!(
                        "{:<9} {:<32} {}",
                        mode.as_str(),
                        variant.slug(),
                        variant.description()
                    );
                }
            }
        }
        Commands::Search {
            mode,
            variant,
            user,
            email,
            explain,
        } => {
            if explain {
                let predicate = build_predicate(mode, variant, &user, &email)?;
                println!("{}", describe(&predicate)?);
            }
            let service = seeded_service()?;
            let found = service.search(mode, variant, &user, &email)?;
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        Commands::Where { expr, ast } => {
            let expression = Expression::parse(&expr).context("Failed to parse expression")?;
            if ast {
                println!("{}", expression.ast());
            }
            let service = seeded_service()?;
            let collection = service.database().collection(service.collection())?;
            let found = collection.find(&Predicate::script(expr))?;
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        Commands::Tokens { expr } => {
            for token in Lexer::new(&expr).tokenize() {
                println!(
                    "{:>4}  {:<15} {}",
                    token.position,
                    format!("{:?}", token.token_type),
                    token.value
                );
            }
        }
    }

    Ok(())
}

fn seeded_service() -> Result<ContactsService> {
    let store = EmbeddedStore::start();
    let database = store.database(CONTACTS_DATABASE);
    seed_contacts(&database, CONTACTS_COLLECTION).context("Failed to seed contacts")?;
    Ok(ContactsService::new(database, CONTACTS_COLLECTION))
}

fn describe(predicate: &Predicate) -> Result<String> {
    Ok(match predicate {
        Predicate::Where { script } => match Expression::parse(script) {
            Ok(expression) => format!("$where: {script}\nparsed: {}", expression.ast()),
            Err(e) => format!("$where: {script}\nparse error: {e}"),
        },
        Predicate::Fields { .. } => serde_json::to_string_pretty(predicate)?,
    })
}
