// packages/interpose/benches/interception_bench.rs
//! Overhead of proxied access compared with direct access

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use interpose::element::{Element, ElementProxy, ELEMENT_TYPE};
use interpose::interception::transforms::stringify;
use interpose::{Args, Interceptable, ProcessorRegistry};
use std::sync::Arc;

fn document(width: usize) -> Arc<Element> {
    let mut tree = Element::new("tree");
    for i in 0..width {
        tree = tree.with_child(
            Element::new("leaf")
                .with_attr("index", i.to_string())
                .with_text(format!("leaf {}", i)),
        );
    }
    Element::new("root").with_child(tree).into_shared()
}

fn registry() -> ProcessorRegistry {
    ProcessorRegistry::builder()
        .wrap_type(&ELEMENT_TYPE)
        .post_processor("text", |v| Ok(stringify(v)))
        .build()
        .unwrap()
}

fn bench_property_read(c: &mut Criterion) {
    let doc = document(1);
    let proxy = ElementProxy::wrap(&registry(), Arc::clone(&doc)).unwrap();

    c.bench_function("property_read_direct", |b| {
        b.iter(|| black_box(doc.get_property("text").unwrap()));
    });

    c.bench_function("property_read_proxied", |b| {
        b.iter(|| black_box(proxy.text().unwrap()));
    });
}

fn bench_query_rewrap(c: &mut Criterion) {
    let doc = document(100);
    let proxy = ElementProxy::wrap(&registry(), Arc::clone(&doc)).unwrap();

    c.bench_function("query_direct_100", |b| {
        b.iter(|| black_box(doc.invoke("query", Args::new(["leaf"])).unwrap()));
    });

    c.bench_function("query_proxied_100", |b| {
        b.iter(|| black_box(proxy.query("leaf").unwrap()));
    });
}

criterion_group!(benches, bench_property_read, bench_query_rewrap);
criterion_main!(benches);
