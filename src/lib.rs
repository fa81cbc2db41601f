//! psc-explorer - UK company ownership chains from Companies House data.
//!
//! Given a company number, this crate fetches the company's persons with
//! significant control (PSCs), recursively resolves corporate controllers
//! into a bounded-depth ownership tree with cycle detection, and renders the
//! result as Markdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use psc_explorer::{
//!     render, CompaniesHouseClient, CompanyNumber, Config, OwnershipResolver,
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let client = CompaniesHouseClient::new(&config)?;
//! let resolver = OwnershipResolver::new(client, 4);
//!
//! let number = CompanyNumber::parse("03877012")?;
//! let tree = resolver.resolve(&number).await?;
//! println!("{}", render::markdown(&tree));
//! # Ok(())
//! # }
//! ```
//!
//! The traversal is sequential and read-only: root lookup failures propagate
//! with their kind intact, failures deeper in the tree degrade to a status
//! flag on the affected node, and nothing is cached or persisted across
//! invocations.

// Error taxonomy shared by the client and the resolver
pub mod error;

// Client configuration (explicit, injected; never ambient)
pub mod config;

// Companies House wire types and HTTP client
pub mod companies_house;

// Ownership domain model and recursive traversal
pub mod resolver;

// Markdown presentation of resolved trees
pub mod render;

pub use companies_house::{CompaniesHouseClient, CompanyNumber};
pub use config::{Config, ConfigError};
pub use error::{ErrorKind, RegistryError};
pub use resolver::{
    ChildStatus, CompanyProfile, ControllingParty, OwnershipNode, OwnershipResolver, Registry,
    DEFAULT_MAX_DEPTH,
};
