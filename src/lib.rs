//! Typed client for the Tennisly club REST API: players, cords (courts)
//! and the challenges players send each other.

pub mod account;
pub mod collection;
pub mod config;
pub mod crud;
pub mod error;
pub mod form;
pub mod listing;
pub mod model;
pub mod route;
pub mod schema;
pub mod wire;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use account::{AccountClient, AccountService, Session};
pub use collection::add_to_collection_if_missing;
pub use config::ClientConfig;
pub use crud::{ApiClient, EntityClient, EntityService, Lookup, Page};
pub use error::{ClientError, ClientResult, FormError, TransportError};
pub use model::{Account, Challenge, Cord, Entity, Player, User};
pub use route::{Navigation, Resolution, RouteParams, View};
pub use schema::{ChallengeStatus, Gender, GeneralStatus, Level, RequestOptions};
