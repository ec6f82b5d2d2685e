// packages/interpose/src/main.rs
//! Interpose demo
//!
//! Wraps a small element tree with a processor registry and walks it the way
//! client code would, printing what the proxies hand back.
//!
//! Usage: `interpose-demo [config-file]`

use anyhow::Result;
use interpose::element::{Element, ElementProxy, ELEMENT_TYPE};
use interpose::interception::{PostTransform, PreTransform};
use interpose::observability::init_tracing;
use interpose::utils::config::{InterposeConfig, RegistryConfig};
use interpose::ProcessorRegistry;
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    let path = std::env::args().nth(1);
    let mut config = InterposeConfig::load(path.as_deref())?;

    init_tracing(&config.logging)?;
    info!("Starting interpose demo v{}", interpose::VERSION);

    if config.registry.is_empty() {
        info!("No registry configured, using the built-in demo registry");
        config.registry = demo_registry_config();
    }

    let registry = ProcessorRegistry::from_config(&config.registry, &[&ELEMENT_TYPE])?;
    info!("Registry: {:?}", registry);

    let root = ElementProxy::wrap(&registry, document())?;

    let leaves = ElementProxy::collect(root.query("leaf1")?)?;
    for leaf in &leaves {
        println!("query('leaf1')      -> {}", leaf.as_proxy().type_name());
        println!("leaf1.text          -> {}", leaf.text()?);
    }

    println!("find_text('leaf2')  -> {}", root.find_text("leaf2")?);
    println!("get('version')      -> {}", root.get("version")?);

    let fresh = root.query_where("*", "type", "fresh")?;
    println!("query(type=fresh)   -> {}", fresh);
    for element in ElementProxy::collect(fresh)? {
        println!("  {:<17} -> {}", element.tag()?.to_string(), element.text()?);
    }

    info!("Demo finished");
    Ok(())
}

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

fn demo_registry_config() -> RegistryConfig {
    let mut config = RegistryConfig {
        wrap_types: vec![ELEMENT_TYPE.name.to_string()],
        ..Default::default()
    };

    config.pre_processors.insert(
        "get".to_string(),
        PreTransform::ReplaceArgs {
            args: vec![serde_json::json!("intercepted")],
            kwargs: Default::default(),
        },
    );
    for name in ["get", "text", "find_text"] {
        config
            .post_processors
            .insert(name.to_string(), PostTransform::Stringify);
    }

    config
}
