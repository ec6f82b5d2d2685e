// packages/interpose/src/lib.rs
//! Interpose: transparent pre/post-processing proxies
//!
//! Wraps objects of selected types so that calls to chosen methods have
//! their arguments transformed before the call and their results transformed
//! after it, and property reads have their values transformed. Any result
//! that is itself of a wrapped type comes back wrapped too.
//!
//! # Modules
//!
//! - **interception**: registry, proxies and the capability interface
//! - **element**: a sample element tree used by the demo and the tests
//! - **observability**: tracing setup
//! - **utils**: configuration and errors
//!
//! # Example
//!
//! ```
//! use interpose::element::{Element, ElementProxy, ELEMENT_TYPE};
//! use interpose::{ProcessorRegistry, Value};
//!
//! let registry = ProcessorRegistry::builder()
//!     .wrap_type(&ELEMENT_TYPE)
//!     .post_processor("tag", |v| Ok(Value::from(v.to_string().to_uppercase())))
//!     .build()?;
//!
//! let doc = Element::new("root").with_child(Element::new("leaf")).into_shared();
//! let root = ElementProxy::wrap(&registry, doc)?;
//!
//! let children = ElementProxy::collect(root.children()?)?;
//! assert_eq!(children[0].tag()?, Value::from("LEAF"));
//! # Ok::<(), interpose::InterposeError>(())
//! ```

pub mod element;
pub mod interception;
pub mod observability;
pub mod utils;

// Re-export commonly used types
pub use interception::{
    Args, Attribute, Interceptable, InterceptingProxy, MemberKind, ProcessorRegistry,
    TypeDescriptor, Value,
};
pub use utils::config::InterposeConfig;
pub use utils::errors::{InterposeError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
