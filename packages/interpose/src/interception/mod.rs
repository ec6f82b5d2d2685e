// packages/interpose/src/interception/mod.rs
//! Member interception layer
//!
//! This module wraps objects so that reads and calls of selected members are
//! transformed on the way in and on the way out:
//!
//! - **Descriptor**: per-type member tables and the [`Interceptable`] capability
//! - **Value**: dynamically shaped values and call arguments
//! - **Registry**: pre/post-processor tables and the wrap decision
//! - **Proxy**: the per-object interception point
//! - **Transforms**: declarative processors for configuration files
//!
//! # Architecture
//!
//! ```text
//! Caller
//!   │  proxy.call("get", args)
//!   ▼
//! InterceptingProxy ──► ProcessorRegistry::pre_process("get", args)
//!   │
//!   ▼
//! Target::invoke("get", args')
//!   │
//!   ▼
//! ProcessorRegistry::post_process("get", result)
//!   │   └─ wrap(result) / wrap(each list item)
//!   ▼
//! Caller receives value or nested proxies
//! ```

pub mod descriptor;
pub mod proxy;
pub mod registry;
pub mod transforms;
pub mod value;

// Re-export commonly used types
pub use descriptor::{Interceptable, MemberKind, TypeDescriptor};
pub use proxy::{Attribute, DecoratedMethod, InterceptingProxy};
pub use registry::{PostProcessor, PreProcessor, ProcessorRegistry, RegistryBuilder};
pub use transforms::{PostTransform, PreTransform};
pub use value::{Args, Value};
