//! Auth-domain identifiers, ordered scope lists, and OAuth 1.0a token models.

pub mod id;
pub mod scope;
pub mod token;

pub use id::*;
pub use scope::*;
pub use token::{secret::*, *};
