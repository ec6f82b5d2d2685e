// packages/interpose/src/interception/registry.rs
//! Processor registry: the factory behind every proxy
//!
//! Holds the pre-processors and post-processors keyed by member name, plus
//! the set of types whose instances get wrapped. The configuration is frozen
//! at construction; proxies share it through a cheap handle clone.

use crate::interception::descriptor::{Interceptable, MemberKind, TypeDescriptor};
use crate::interception::proxy::InterceptingProxy;
use crate::interception::value::{Args, Value};
use crate::utils::config::RegistryConfig;
use crate::utils::errors::{InterposeError, Result};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Transforms call arguments before the target method runs
pub type PreProcessor = Arc<dyn Fn(Args) -> Result<Args> + Send + Sync>;

/// Transforms a method result or property value before it reaches the caller
pub type PostProcessor = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

struct RegistryState {
    pre_processors: HashMap<String, PreProcessor>,
    post_processors: HashMap<String, PostProcessor>,
    wrappable_types: HashMap<&'static str, &'static TypeDescriptor>,
}

/// Shared, immutable interception configuration
#[derive(Clone)]
pub struct ProcessorRegistry {
    state: Arc<RegistryState>,
}

impl ProcessorRegistry {
    /// Create a registry from processor tables and the wrappable type set
    ///
    /// Fails if a processor names a member no wrappable type declares, or if
    /// a pre-processor names a member that is only ever a property.
    pub fn new(
        pre_processors: HashMap<String, PreProcessor>,
        post_processors: HashMap<String, PostProcessor>,
        wrappable_types: impl IntoIterator<Item = &'static TypeDescriptor>,
    ) -> Result<Self> {
        let mut types: HashMap<&'static str, &'static TypeDescriptor> = HashMap::new();
        for descriptor in wrappable_types {
            if let Some(existing) = types.insert(descriptor.name, descriptor) {
                if !std::ptr::eq(existing, descriptor) {
                    return Err(InterposeError::ConfigError(format!(
                        "two different wrappable types are named '{}'",
                        descriptor.name
                    )));
                }
            }
        }

        let state = RegistryState {
            pre_processors,
            post_processors,
            wrappable_types: types,
        };
        state.validate()?;

        info!(
            "Processor registry ready: {} pre-processors, {} post-processors, {} wrappable types",
            state.pre_processors.len(),
            state.post_processors.len(),
            state.wrappable_types.len()
        );

        Ok(Self {
            state: Arc::new(state),
        })
    }

    /// Start building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build a registry from declarative configuration
    ///
    /// Type names are resolved against `catalog`. Processor keys are matched
    /// against the wrappable types' member names, exactly first and then
    /// ignoring ASCII case, since the config loader lowercases map keys.
    pub fn from_config(
        config: &RegistryConfig,
        catalog: &[&'static TypeDescriptor],
    ) -> Result<Self> {
        let mut builder = Self::builder();

        for type_name in &config.wrap_types {
            let descriptor = catalog
                .iter()
                .copied()
                .find(|d| d.name == type_name.as_str())
                .ok_or_else(|| InterposeError::UnknownType(type_name.clone()))?;
            builder = builder.wrap_type(descriptor);
        }

        for (key, transform) in &config.pre_processors {
            let name = builder.member_name(key);
            debug!("Configuring pre-processor {:?} for '{}'", transform, name);
            builder.pre_processors.insert(name, transform.to_processor());
        }

        for (key, transform) in &config.post_processors {
            let name = builder.member_name(key);
            debug!("Configuring post-processor {:?} for '{}'", transform, name);
            let processor = transform.to_processor(&name);
            builder.post_processors.insert(name, processor);
        }

        builder.build()
    }

    /// Wrap `value` in a proxy if it is an object of a wrappable type
    ///
    /// Everything else, proxies included, is returned unchanged.
    pub fn wrap(&self, value: Value) -> Value {
        match value {
            Value::Object(object) if self.is_wrappable(object.descriptor().name) => {
                trace!("Wrapping {} instance", object.descriptor().name);
                metrics::counter!("interpose_wraps_total").increment(1);
                Value::Proxy(InterceptingProxy::new(self.clone(), object))
            }
            other => other,
        }
    }

    /// Wrap a concrete target, failing if its type is not wrappable
    pub fn proxy<T: Interceptable + 'static>(&self, target: Arc<T>) -> Result<InterceptingProxy> {
        let type_name = target.descriptor().name;
        if !self.is_wrappable(type_name) {
            return Err(InterposeError::NotWrappable(type_name.to_string()));
        }
        Ok(InterceptingProxy::new(self.clone(), target))
    }

    /// Run the pre-processor registered for `name`, or pass `args` through
    pub fn pre_process(&self, name: &str, args: Args) -> Result<Args> {
        match self.state.pre_processors.get(name) {
            Some(processor) => {
                trace!("Pre-processing arguments of '{}'", name);
                processor(args)
            }
            None => Ok(args),
        }
    }

    /// Run the post-processor registered for `name`, then wrap the result
    ///
    /// List results are wrapped element by element, one level deep, keeping
    /// their order.
    pub fn post_process(&self, name: &str, result: Value) -> Result<Value> {
        let result = match self.state.post_processors.get(name) {
            Some(processor) => {
                trace!("Post-processing result of '{}'", name);
                processor(result)?
            }
            None => result,
        };

        Ok(match result {
            Value::List(items) => {
                Value::List(items.into_iter().map(|item| self.wrap(item)).collect())
            }
            other => self.wrap(other),
        })
    }

    pub fn is_wrappable(&self, type_name: &str) -> bool {
        self.state.wrappable_types.contains_key(type_name)
    }

    pub fn has_pre_processor(&self, name: &str) -> bool {
        self.state.pre_processors.contains_key(name)
    }

    pub fn has_post_processor(&self, name: &str) -> bool {
        self.state.post_processors.contains_key(name)
    }

    /// True when both handles point at the same configuration
    pub fn shares_state_with(&self, other: &ProcessorRegistry) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field(
                "pre_processors",
                &sorted_keys(self.state.pre_processors.keys().map(String::as_str)),
            )
            .field(
                "post_processors",
                &sorted_keys(self.state.post_processors.keys().map(String::as_str)),
            )
            .field(
                "wrappable_types",
                &sorted_keys(self.state.wrappable_types.keys().copied()),
            )
            .finish()
    }
}

fn sorted_keys<'a>(keys: impl Iterator<Item = &'a str>) -> BTreeSet<&'a str> {
    keys.collect()
}

impl RegistryState {
    /// Kinds a member name resolves to across all wrappable types
    fn member_kinds(&self, name: &str) -> Vec<MemberKind> {
        self.wrappable_types
            .values()
            .filter_map(|descriptor| descriptor.member(name))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        for name in sorted_keys(self.pre_processors.keys().map(String::as_str)) {
            let kinds = self.member_kinds(name);
            if kinds.is_empty() {
                return Err(InterposeError::UnknownMember(name.to_string()));
            }
            if !kinds.contains(&MemberKind::Method) {
                return Err(InterposeError::PreProcessorOnProperty(name.to_string()));
            }
        }

        for name in sorted_keys(self.post_processors.keys().map(String::as_str)) {
            if self.member_kinds(name).is_empty() {
                return Err(InterposeError::UnknownMember(name.to_string()));
            }
        }

        Ok(())
    }
}

/// Builder for [`ProcessorRegistry`]
#[derive(Default)]
pub struct RegistryBuilder {
    pre_processors: HashMap<String, PreProcessor>,
    post_processors: HashMap<String, PostProcessor>,
    wrappable_types: Vec<&'static TypeDescriptor>,
}

impl RegistryBuilder {
    /// Register a pre-processor for a method name
    pub fn pre_processor<F>(mut self, name: impl Into<String>, processor: F) -> Self
    where
        F: Fn(Args) -> Result<Args> + Send + Sync + 'static,
    {
        self.pre_processors.insert(name.into(), Arc::new(processor));
        self
    }

    /// Register a post-processor for a method or property name
    pub fn post_processor<F>(mut self, name: impl Into<String>, processor: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.post_processors.insert(name.into(), Arc::new(processor));
        self
    }

    /// Add a type to the wrappable set
    pub fn wrap_type(mut self, descriptor: &'static TypeDescriptor) -> Self {
        self.wrappable_types.push(descriptor);
        self
    }

    /// Declared member name matching a configuration key
    ///
    /// Unmatched keys come back unchanged so validation can report them.
    fn member_name(&self, key: &str) -> String {
        let members = || {
            self.wrappable_types
                .iter()
                .flat_map(|descriptor| descriptor.members.iter().map(|(name, _)| *name))
        };

        members()
            .find(|name| *name == key)
            .or_else(|| members().find(|name| name.eq_ignore_ascii_case(key)))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    pub fn build(self) -> Result<ProcessorRegistry> {
        ProcessorRegistry::new(
            self.pre_processors,
            self.post_processors,
            self.wrappable_types,
        )
    }
}
