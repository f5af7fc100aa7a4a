//! Locator Operations Benchmarks
//!
//! Benchmarks for descriptor resolution, plan building and proxy caching.
//!
//! Run with: `cargo bench --bench locator_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use localizar::prelude::*;

fn rows(count: usize) -> Vec<ElementRef> {
    (0..count)
        .map(|i| MockElement::new(format!("row{i}")).into_ref())
        .collect()
}

fn context(count: usize) -> Arc<MockSearchContext> {
    Arc::new(
        MockSearchContext::new()
            .with_matches(Selector::new(How::XPath, ".//div"), rows(count))
            .with_matches(Selector::new(How::Id, "last"), rows(1)),
    )
}

fn bench_locate_element(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate_element");

    for misses in [0usize, 1, 4, 16] {
        let mut bys: Vec<By> = (0..misses).map(|i| By::id(format!("miss{i}"))).collect();
        bys.push(By::id("last"));
        let locator = DefaultElementLocator::new(context(1));

        group.bench_with_input(BenchmarkId::from_parameter(misses), &bys, |bench, bys| {
            bench.iter(|| black_box(locator.locate_element(black_box(bys)).unwrap()));
        });
    }

    group.finish();
}

fn bench_plan_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_building");

    for descriptors in [1usize, 4, 16] {
        let member = (0..descriptors).fold(MemberDeclaration::new("m", "WebElement"), |m, i| {
            m.with_finds_by(
                FindsBy::new(How::Css)
                    .using(format!(".c{i}"))
                    .priority(i32::try_from(descriptors - i).unwrap_or(0)),
            )
        });

        group.bench_with_input(
            BenchmarkId::from_parameter(descriptors),
            &member,
            |bench, member| {
                bench.iter(|| black_box(PlanBuilder::build_member(black_box(member), false).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_list_proxy(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_proxy");

    for (name, cache) in [("cached", true), ("uncached", false)] {
        let locator: Arc<dyn ElementLocator> = Arc::new(DefaultElementLocator::new(context(100)));
        let list = ElementListProxy::new(
            locator,
            LocatorPlan::first_match(vec![By::xpath(".//div")], cache),
        );

        group.bench_function(name, |bench| {
            bench.iter(|| black_box(list.len().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_locate_element, bench_plan_building, bench_list_proxy);
criterion_main!(benches);
