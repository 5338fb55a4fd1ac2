//! # Appwrite Types
//!
//! Shared data model for cloning one Appwrite project into another.
//!
//! ## Modules
//!
//! - [`endpoint`]: host / project / API key triple identifying one instance
//! - [`models`]: typed snapshots of source entities (databases, collections,
//!   attributes, users, teams, memberships) and list envelope decoding
//! - [`document`]: documents and the recursive sanitizer that makes them
//!   safe to post to another instance
//! - [`selection`]: the checked tree of databases / collections / users / teams
//! - [`errors`]: shape errors raised when a payload is not the expected kind

pub mod document;
pub mod endpoint;
pub mod errors;
pub mod models;
pub mod selection;

pub use document::{flatten_relationships, is_embedded_document, sanitize, Document};
pub use endpoint::Endpoint;
pub use errors::ShapeError;
pub use models::{Attribute, Collection, Database, EntityList, Membership, Team, User};
pub use selection::{NodeKind, SelectionNode, SelectionTree, TEAMS_NODE_ID, USERS_NODE_ID};
