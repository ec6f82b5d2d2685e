// packages/interpose/src/interception/proxy.rs
//! Intercepting proxy
//!
//! An [`InterceptingProxy`] stands in for one target object. Every member
//! access goes through [`InterceptingProxy::attr`]:
//!
//! ```text
//! attr(name) ─┬─ Method   → DecoratedMethod ─ call(args):
//!             │                pre_process → target.invoke → post_process
//!             └─ Property → target.get_property → post_process
//! ```
//!
//! Post-processing re-wraps any wrappable object in the result, so proxies
//! spread transitively through nested results.

use crate::interception::descriptor::{Interceptable, MemberKind, TypeDescriptor};
use crate::interception::registry::ProcessorRegistry;
use crate::interception::value::{same_object, Args, Value};
use crate::utils::errors::{InterposeError, Result};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Proxy over a single target object
#[derive(Clone)]
pub struct InterceptingProxy {
    registry: ProcessorRegistry,
    target: Arc<dyn Interceptable>,
}

/// Outcome of resolving a member on a proxy
#[derive(Debug, Clone)]
pub enum Attribute {
    /// A method, decorated with the registry's processors
    Method(DecoratedMethod),

    /// A property value, already post-processed
    Value(Value),
}

impl Attribute {
    pub fn is_method(&self) -> bool {
        matches!(self, Attribute::Method(_))
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Attribute::Value(value) => Some(value),
            Attribute::Method(_) => None,
        }
    }

    pub fn into_method(self) -> Option<DecoratedMethod> {
        match self {
            Attribute::Method(method) => Some(method),
            Attribute::Value(_) => None,
        }
    }
}

impl InterceptingProxy {
    pub(crate) fn new(registry: ProcessorRegistry, target: Arc<dyn Interceptable>) -> Self {
        Self { registry, target }
    }

    pub fn type_name(&self) -> &'static str {
        self.target.descriptor().name
    }

    pub fn descriptor(&self) -> &'static TypeDescriptor {
        self.target.descriptor()
    }

    /// Resolve a member through the interception layer
    ///
    /// Unknown names fail with the target's own lookup error.
    pub fn attr(&self, name: &str) -> Result<Attribute> {
        match self.target.member(name)? {
            MemberKind::Method => Ok(Attribute::Method(self.decorate(name))),
            MemberKind::Property => self.read(name).map(Attribute::Value),
        }
    }

    /// Read a property
    pub fn get(&self, name: &str) -> Result<Value> {
        match self.target.member(name)? {
            MemberKind::Property => self.read(name),
            MemberKind::Method => Err(InterposeError::NotAProperty {
                type_name: self.type_name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Call a method
    pub fn call(&self, name: &str, args: Args) -> Result<Value> {
        match self.target.member(name)? {
            MemberKind::Method => self.decorate(name).call(args),
            MemberKind::Property => Err(InterposeError::NotCallable {
                type_name: self.type_name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// True if this proxy stands in for `target`
    pub fn wraps<T: Interceptable + ?Sized>(&self, target: &Arc<T>) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.target) as *const u8,
            Arc::as_ptr(target) as *const u8,
        )
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    fn read(&self, name: &str) -> Result<Value> {
        trace!("Reading {}.{}", self.type_name(), name);
        metrics::counter!("interpose_property_reads_total").increment(1);

        let raw = self.target.get_property(name)?;
        self.registry.post_process(name, raw)
    }

    fn decorate(&self, name: &str) -> DecoratedMethod {
        DecoratedMethod {
            registry: self.registry.clone(),
            name: name.to_string(),
            target: Arc::clone(&self.target),
        }
    }
}

impl PartialEq for InterceptingProxy {
    fn eq(&self, other: &Self) -> bool {
        same_object(&self.target, &other.target)
            && self.registry.shares_state_with(&other.registry)
    }
}

impl fmt::Debug for InterceptingProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptingProxy")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// A target method bound to a registry's processors
///
/// Built fresh on every method access; holds no state of its own.
#[derive(Clone)]
pub struct DecoratedMethod {
    registry: ProcessorRegistry,
    name: String,
    target: Arc<dyn Interceptable>,
}

impl DecoratedMethod {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pre-process `args`, invoke the target, post-process the result
    pub fn call(&self, args: Args) -> Result<Value> {
        trace!(
            "Calling {}.{} with {} argument(s)",
            self.target.descriptor().name,
            self.name,
            args.len()
        );
        metrics::counter!("interpose_method_calls_total").increment(1);

        let args = self.registry.pre_process(&self.name, args)?;
        let result = self.target.invoke(&self.name, args)?;
        self.registry.post_process(&self.name, result)
    }
}

impl fmt::Debug for DecoratedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratedMethod")
            .field("type", &self.target.descriptor().name)
            .field("name", &self.name)
            .finish()
    }
}
