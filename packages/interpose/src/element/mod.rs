// packages/interpose/src/element/mod.rs
//! Sample element tree exercised through the interception layer
//!
//! - **Node**: the [`Element`] object model and its member table
//! - **Proxy**: [`ElementProxy`], a typed forwarding wrapper

pub mod node;
pub mod proxy;

pub use node::{Element, ANY_TAG, ELEMENT_TYPE};
pub use proxy::ElementProxy;
