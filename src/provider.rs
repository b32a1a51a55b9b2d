//! Provider-facing descriptors (data) and strategies (behavior).
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the four
//! Identity UA endpoints, the ordered profile scopes to request, and provider quirks
//! that shape the normalized profile. `strategy` defines [`ProviderStrategy`], an
//! HTTP-client-agnostic hook used by flows to turn provider error payloads into the
//! crate's error taxonomy.

pub mod descriptor;
pub mod strategy;

pub use descriptor::*;
pub use strategy::*;
