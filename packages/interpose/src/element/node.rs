// packages/interpose/src/element/node.rs
//! In-memory element tree
//!
//! A small tree object model with attributes, text and sub-tree queries,
//! exposed to the interception layer through [`Interceptable`].

use crate::interception::descriptor::{Interceptable, MemberKind, TypeDescriptor};
use crate::interception::value::{Args, Value};
use crate::utils::errors::{InterposeError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Member table of [`Element`]
pub static ELEMENT_TYPE: TypeDescriptor = TypeDescriptor::new(
    "Element",
    &[
        ("tag", MemberKind::Property),
        ("text", MemberKind::Property),
        ("attrib", MemberKind::Property),
        ("get", MemberKind::Method),
        ("find_text", MemberKind::Method),
        ("query", MemberKind::Method),
        ("children", MemberKind::Method),
    ],
);

/// Tag pattern matching every element
pub const ANY_TAG: &str = "*";

/// A tree node
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    text: Option<String>,
    attributes: BTreeMap<String, String>,
    children: Vec<Arc<Element>>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn children(&self) -> &[Arc<Element>] {
        &self.children
    }

    /// All descendants in document order, excluding `self`
    pub fn descendants(&self) -> Vec<Arc<Element>> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(Arc::clone(child));
            out.extend(child.descendants());
        }
        out
    }

    fn matches(&self, tag: &str, attr: Option<(&str, &str)>) -> bool {
        let tag_ok = tag == ANY_TAG || self.tag == tag;
        let attr_ok = attr.map_or(true, |(key, value)| self.attribute(key) == Some(value));
        tag_ok && attr_ok
    }

    /// Descendants matching `tag` (or [`ANY_TAG`]) and an optional attribute
    /// filter, in document order
    pub fn query(&self, tag: &str, attr: Option<(&str, &str)>) -> Vec<Arc<Element>> {
        self.descendants()
            .into_iter()
            .filter(|element| element.matches(tag, attr))
            .collect()
    }

    /// Text of the first descendant with the given tag
    pub fn find_text(&self, tag: &str) -> Option<String> {
        self.descendants()
            .into_iter()
            .find(|element| element.matches(tag, None))
            .and_then(|element| element.text.clone())
    }
}

impl Interceptable for Element {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &ELEMENT_TYPE
    }

    fn get_property(&self, name: &str) -> Result<Value> {
        match name {
            "tag" => Ok(Value::from(self.tag.as_str())),
            "text" => Ok(Value::from(self.text.clone())),
            "attrib" => Ok(Value::Map(
                self.attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                    .collect(),
            )),
            _ => Err(match self.member(name)? {
                MemberKind::Method => InterposeError::NotAProperty {
                    type_name: ELEMENT_TYPE.name.to_string(),
                    name: name.to_string(),
                },
                MemberKind::Property => InterposeError::missing_attribute(ELEMENT_TYPE.name, name),
            }),
        }
    }

    fn invoke(&self, name: &str, args: Args) -> Result<Value> {
        match name {
            "get" => {
                check_arity(name, &args, 2)?;
                let key = required_str(name, &args, 0, "key")?;
                let default = args
                    .arg(1)
                    .or_else(|| args.kwarg("default"))
                    .cloned()
                    .unwrap_or(Value::Null);
                Ok(self.attribute(key).map(Value::from).unwrap_or(default))
            }
            "find_text" => {
                check_arity(name, &args, 1)?;
                let tag = required_str(name, &args, 0, "tag")?;
                Ok(Value::from(self.find_text(tag)))
            }
            "query" => {
                check_arity(name, &args, 3)?;
                let tag = optional_str(name, &args, 0, "tag")?.unwrap_or(ANY_TAG);
                let attr = optional_str(name, &args, 1, "attr")?;
                let value = optional_str(name, &args, 2, "value")?;
                let filter = match (attr, value) {
                    (Some(attr), Some(value)) => Some((attr, value)),
                    (None, None) => None,
                    _ => {
                        return Err(InterposeError::invalid_arguments(
                            name,
                            "'attr' and 'value' must be given together",
                        ))
                    }
                };
                Ok(objects(self.query(tag, filter)))
            }
            "children" => {
                check_arity(name, &args, 0)?;
                Ok(objects(self.children.clone()))
            }
            _ => Err(match self.member(name)? {
                MemberKind::Property => InterposeError::NotCallable {
                    type_name: ELEMENT_TYPE.name.to_string(),
                    name: name.to_string(),
                },
                MemberKind::Method => InterposeError::missing_attribute(ELEMENT_TYPE.name, name),
            }),
        }
    }
}

fn objects(elements: Vec<Arc<Element>>) -> Value {
    Value::List(elements.into_iter().map(Value::object).collect())
}

fn check_arity(member: &str, args: &Args, max: usize) -> Result<()> {
    if args.positional.len() > max {
        return Err(InterposeError::invalid_arguments(
            member,
            format!(
                "takes at most {} positional argument(s), {} given",
                max,
                args.positional.len()
            ),
        ));
    }
    Ok(())
}

fn optional_str<'a>(
    member: &str,
    args: &'a Args,
    index: usize,
    key: &str,
) -> Result<Option<&'a str>> {
    match args.arg(index).or_else(|| args.kwarg(key)) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Str(s)) => Ok(Some(s)),
        Some(other) => Err(InterposeError::invalid_arguments(
            member,
            format!("'{}' must be a string, got {}", key, other.kind()),
        )),
    }
}

fn required_str<'a>(member: &str, args: &'a Args, index: usize, key: &str) -> Result<&'a str> {
    optional_str(member, args, index, key)?.ok_or_else(|| {
        InterposeError::invalid_arguments(member, format!("missing required argument '{}'", key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Arc<Element> {
        Element::new("root")
            .with_attr("version", "1.0")
            .with_child(
                Element::new("tree")
                    .with_child(Element::new("leaf1").with_attr("type", "fresh").with_text("ättß"))
                    .with_child(Element::new("leaf2").with_attr("type", "fresh").with_text("Üdsö"))
                    .with_child(Element::new("leaf3").with_attr("type", "dry")),
            )
            .into_shared()
    }

    #[test]
    fn test_descendants_in_document_order() {
        let tags: Vec<String> = tree()
            .descendants()
            .iter()
            .map(|e| e.tag().to_string())
            .collect();
        assert_eq!(tags, vec!["tree", "leaf1", "leaf2", "leaf3"]);
    }

    #[test]
    fn test_query_with_filter() {
        let fresh = tree().query(ANY_TAG, Some(("type", "fresh")));
        let tags: Vec<&str> = fresh.iter().map(|e| e.tag()).collect();
        assert_eq!(tags, vec!["leaf1", "leaf2"]);
    }

    #[test]
    fn test_find_text() {
        let root = tree();
        assert_eq!(root.find_text("leaf2").as_deref(), Some("Üdsö"));
        assert_eq!(root.find_text("leaf3"), None);
        assert_eq!(root.find_text("missing"), None);
    }

    #[test]
    fn test_invoke_get_with_default() {
        let root = tree();
        assert_eq!(
            root.invoke("get", Args::new(["version"])).unwrap(),
            Value::from("1.0")
        );
        assert_eq!(
            root.invoke("get", Args::new(["absent"]).with_keyword("default", "x"))
                .unwrap(),
            Value::from("x")
        );
        assert_eq!(
            root.invoke("get", Args::new(["absent"])).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_invoke_argument_errors() {
        let root = tree();
        assert!(matches!(
            root.invoke("get", Args::none()),
            Err(InterposeError::InvalidArguments { .. })
        ));
        assert!(matches!(
            root.invoke("find_text", Args::new([1i64])),
            Err(InterposeError::InvalidArguments { .. })
        ));
        assert!(matches!(
            root.invoke("children", Args::new(["extra"])),
            Err(InterposeError::InvalidArguments { .. })
        ));
        assert!(matches!(
            root.invoke("query", Args::new(["leaf1"]).with_keyword("attr", "type")),
            Err(InterposeError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_member_kind_mismatch() {
        let root = tree();
        assert!(matches!(
            root.invoke("text", Args::none()),
            Err(InterposeError::NotCallable { .. })
        ));
        assert!(matches!(
            root.get_property("query"),
            Err(InterposeError::NotAProperty { .. })
        ));
        assert_eq!(
            root.get_property("colour").unwrap_err(),
            InterposeError::missing_attribute("Element", "colour")
        );
    }

    #[test]
    fn test_properties() {
        let root = tree();
        assert_eq!(root.get_property("tag").unwrap(), Value::from("root"));
        assert_eq!(root.get_property("text").unwrap(), Value::Null);

        let Value::Map(attrib) = root.get_property("attrib").unwrap() else {
            panic!("attrib should be a map");
        };
        assert_eq!(attrib["version"], Value::from("1.0"));
    }
}
