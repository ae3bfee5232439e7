//! Handlers module
//!
//! The resource mutation contract. One generic handler serves every
//! resource kind; kinds differ only in their entity descriptors.

mod resource_handler;


pub use resource_handler::{Created, ResourceHandler};
