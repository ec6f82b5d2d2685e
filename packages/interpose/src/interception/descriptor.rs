// packages/interpose/src/interception/descriptor.rs
//! Capability interface for interceptable types
//!
//! Each wrappable type publishes a static [`TypeDescriptor`] listing its
//! members and whether each is a method or a property. The proxy consults the
//! descriptor to decide between decorating a call and post-processing a read,
//! so no runtime "is it callable" probing is needed.

use crate::interception::value::{Args, Value};
use crate::utils::errors::{InterposeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a named member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// Invoked with arguments; results are pre/post-processed
    Method,

    /// Read without arguments; values are post-processed eagerly
    Property,
}

/// Static member table of an interceptable type
#[derive(Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Type name, also the key of the registry's wrappable set
    pub name: &'static str,

    /// Member names and kinds
    pub members: &'static [(&'static str, MemberKind)],
}

impl TypeDescriptor {
    pub const fn new(name: &'static str, members: &'static [(&'static str, MemberKind)]) -> Self {
        Self { name, members }
    }

    /// Look up a member's kind by name
    pub fn member(&self, name: &str) -> Option<MemberKind> {
        self.members
            .iter()
            .find(|(member, _)| *member == name)
            .map(|(_, kind)| *kind)
    }

    pub fn methods(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members
            .iter()
            .filter(|(_, kind)| *kind == MemberKind::Method)
            .map(|(name, _)| *name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members
            .iter()
            .filter(|(_, kind)| *kind == MemberKind::Property)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type whose members can be resolved by name
///
/// Implementations forward `get_property` and `invoke` to their own fields
/// and inherent methods. Unknown names should fail through
/// [`Interceptable::member`] so that raw and proxied lookups report the same
/// error.
pub trait Interceptable: fmt::Debug + Send + Sync {
    /// Static member table for this type
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Resolve a member by name
    fn member(&self, name: &str) -> Result<MemberKind> {
        let descriptor = self.descriptor();
        descriptor
            .member(name)
            .ok_or_else(|| InterposeError::missing_attribute(descriptor.name, name))
    }

    /// Read a property
    fn get_property(&self, name: &str) -> Result<Value>;

    /// Call a method
    fn invoke(&self, name: &str, args: Args) -> Result<Value>;
}
