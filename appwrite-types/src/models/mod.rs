//! Typed snapshots of source entities.
//!
//! Every struct here is decoded from the JSON the service returns and knows
//! how to render its own create payload for the target instance.

mod attribute;
mod database;
mod list;
mod team;
mod user;

pub use attribute::Attribute;
pub use database::{Collection, Database};
pub use list::EntityList;
pub use team::{Membership, Team};
pub use user::User;
