//! Trait definitions for resources and the transport seam.
//!
//! Resource kinds implement [`Resource`] plus the capability traits they
//! support; [`Transport`] abstracts the HTTP exchange so tests can swap it.

mod resource;
mod transport;

pub(crate) use resource::path_segment;
pub use resource::{Deletable, HasCustomVars, Resource};
pub use transport::{Method, Transport};
