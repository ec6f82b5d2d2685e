// packages/interpose/src/element/proxy.rs
//! Typed forwarding wrapper for proxied elements
//!
//! [`ElementProxy`] gives each [`Element`] member a Rust method and routes it
//! through the shared [`InterceptingProxy`] routine, so callers get the same
//! pre/post-processing as dynamic access without spelling member names.

use crate::element::node::{Element, ELEMENT_TYPE};
use crate::interception::proxy::InterceptingProxy;
use crate::interception::registry::ProcessorRegistry;
use crate::interception::value::{Args, Value};
use crate::utils::errors::{InterposeError, Result};
use std::sync::Arc;

/// An [`Element`] seen through a processor registry
#[derive(Debug, Clone, PartialEq)]
pub struct ElementProxy {
    inner: InterceptingProxy,
}

impl ElementProxy {
    /// Wrap `element` with `registry`
    ///
    /// Fails with [`InterposeError::NotWrappable`] unless the registry wraps
    /// elements.
    pub fn wrap(registry: &ProcessorRegistry, element: Arc<Element>) -> Result<Self> {
        registry.proxy(element).map(|inner| Self { inner })
    }

    /// Convert a list result into typed proxies
    ///
    /// Fails on the first item that is not an element proxy.
    pub fn collect(value: Value) -> Result<Vec<Self>> {
        match value {
            Value::List(items) => items.into_iter().map(Self::try_from).collect(),
            other => Err(InterposeError::unexpected_value("a list", other.kind())),
        }
    }

    pub fn tag(&self) -> Result<Value> {
        self.inner.get("tag")
    }

    pub fn text(&self) -> Result<Value> {
        self.inner.get("text")
    }

    pub fn attrib(&self) -> Result<Value> {
        self.inner.get("attrib")
    }

    pub fn get(&self, key: &str) -> Result<Value> {
        self.inner.call("get", Args::new([key]))
    }

    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Result<Value> {
        self.inner
            .call("get", Args::new([key]).with_keyword("default", default))
    }

    pub fn find_text(&self, tag: &str) -> Result<Value> {
        self.inner.call("find_text", Args::new([tag]))
    }

    pub fn query(&self, tag: &str) -> Result<Value> {
        self.inner.call("query", Args::new([tag]))
    }

    pub fn query_where(&self, tag: &str, attr: &str, value: &str) -> Result<Value> {
        self.inner.call("query", Args::new([tag, attr, value]))
    }

    pub fn children(&self) -> Result<Value> {
        self.inner.call("children", Args::none())
    }

    pub fn as_proxy(&self) -> &InterceptingProxy {
        &self.inner
    }

    pub fn into_proxy(self) -> InterceptingProxy {
        self.inner
    }
}

impl TryFrom<InterceptingProxy> for ElementProxy {
    type Error = InterposeError;

    fn try_from(proxy: InterceptingProxy) -> Result<Self> {
        if std::ptr::eq(proxy.descriptor(), &ELEMENT_TYPE) {
            Ok(Self { inner: proxy })
        } else {
            Err(InterposeError::unexpected_value(
                "an Element proxy",
                format!("a {} proxy", proxy.type_name()),
            ))
        }
    }
}

impl TryFrom<Value> for ElementProxy {
    type Error = InterposeError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Proxy(proxy) => Self::try_from(proxy),
            other => Err(InterposeError::unexpected_value("an Element proxy", other.kind())),
        }
    }
}

impl From<ElementProxy> for Value {
    fn from(proxy: ElementProxy) -> Self {
        Value::Proxy(proxy.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interception::transforms::stringify;

    /// The sample document used by the demo binary
    fn document() -> Arc<Element> {
        Element::new("xml")
            .with_attr("version", "1.0")
            .with_attr("intercepted", "intercepted")
            .with_child(
                Element::new("root").with_child(
                    Element::new("tree")
                        .with_child(
                            Element::new("leaf1")
                                .with_attr("type", "fresh")
                                .with_text("ättß"),
                        )
                        .with_child(
                            Element::new("leaf2")
                                .with_attr("type", "fresh")
                                .with_text("Üdsö"),
                        ),
                ),
            )
            .into_shared()
    }

    fn demo_registry() -> ProcessorRegistry {
        ProcessorRegistry::builder()
            .wrap_type(&ELEMENT_TYPE)
            .pre_processor("get", |_| Ok(Args::new(["intercepted"])))
            .post_processor("get", |v| Ok(stringify(v)))
            .post_processor("text", |v| Ok(stringify(v)))
            .post_processor("find_text", |v| Ok(stringify(v)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_query_returns_wrapped_elements() {
        let root = ElementProxy::wrap(&demo_registry(), document()).unwrap();

        let leaves = ElementProxy::collect(root.query("leaf1").unwrap()).unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].text().unwrap(), Value::from("ättß"));
    }

    #[test]
    fn test_find_text_post_processed() {
        let root = ElementProxy::wrap(&demo_registry(), document()).unwrap();
        assert_eq!(root.find_text("leaf2").unwrap(), Value::from("Üdsö"));
    }

    #[test]
    fn test_get_arguments_replaced() {
        let root = ElementProxy::wrap(&demo_registry(), document()).unwrap();
        assert_eq!(root.get("version").unwrap(), Value::from("intercepted"));
        assert_eq!(
            root.get_or("missing", "fallback").unwrap(),
            Value::from("intercepted")
        );
    }

    #[test]
    fn test_nested_results_keep_processors() {
        let root = ElementProxy::wrap(&demo_registry(), document()).unwrap();

        let fresh = ElementProxy::collect(root.query_where("*", "type", "fresh").unwrap()).unwrap();
        let texts: Vec<Value> = fresh.iter().map(|e| e.text().unwrap()).collect();
        assert_eq!(texts, vec![Value::from("ättß"), Value::from("Üdsö")]);

        // Pre-processors follow the proxies down the tree too.
        assert_eq!(fresh[0].get("type").unwrap(), Value::Null);
    }

    #[test]
    fn test_children_chain() {
        let root = ElementProxy::wrap(&demo_registry(), document()).unwrap();

        let children = ElementProxy::collect(root.children().unwrap()).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].tag().unwrap(), Value::from("root"));

        let grandchildren = ElementProxy::collect(children[0].children().unwrap()).unwrap();
        assert_eq!(grandchildren[0].tag().unwrap(), Value::from("tree"));
    }

    #[test]
    fn test_wrap_requires_registered_type() {
        let registry = ProcessorRegistry::builder().build().unwrap();
        let err = ElementProxy::wrap(&registry, document()).unwrap_err();
        assert_eq!(err, InterposeError::NotWrappable("Element".to_string()));
    }

    #[test]
    fn test_unwrapped_results_rejected() {
        let registry = ProcessorRegistry::builder().wrap_type(&ELEMENT_TYPE).build().unwrap();
        let root = ElementProxy::wrap(&registry, document()).unwrap();

        assert_eq!(
            ElementProxy::collect(root.tag().unwrap()).unwrap_err(),
            InterposeError::unexpected_value("a list", "str")
        );
        assert_eq!(
            ElementProxy::try_from(Value::Int(1)).unwrap_err(),
            InterposeError::unexpected_value("an Element proxy", "int")
        );
    }
}
