//! Property-based tests for the element locator and locator plans.
//!
//! Uses proptest to verify invariants hold for arbitrary descriptor lists.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use localizar::prelude::*;
use proptest::prelude::*;

fn element(label: &str) -> ElementRef {
    MockElement::new(label).with_text(label).into_ref()
}

/// A context where selector `#i` matches `counts[i]` elements
fn context_with(counts: &[usize]) -> (Arc<MockSearchContext>, Vec<By>) {
    let context = MockSearchContext::new();
    let mut bys = Vec::with_capacity(counts.len());
    for (i, count) in counts.iter().enumerate() {
        let selector = Selector::new(How::Id, format!("s{i}"));
        let matches = (0..*count).map(|j| element(&format!("s{i}-{j}"))).collect();
        context.set_matches(selector.clone(), matches);
        bys.push(By::from(selector));
    }
    (Arc::new(context), bys)
}

proptest! {
    /// A failed single lookup names every descriptor, in the order given.
    #[test]
    fn prop_not_found_lists_descriptors_in_order(
        ids in prop::collection::vec("[a-z]{1,8}", 1..6)
    ) {
        let bys: Vec<By> = ids.iter().map(By::id).collect();
        let locator = DefaultElementLocator::new(Arc::new(MockSearchContext::new()));

        let err = locator.locate_element(&bys).unwrap_err();
        let expected = format!(
            "Could not find element by: {}",
            bys.iter().map(ToString::to_string).collect::<Vec<_>>().join(", or: ")
        );
        prop_assert_eq!(err.to_string(), expected);
    }

    /// Locating all returns exactly the sum of every descriptor's matches.
    #[test]
    fn prop_locate_all_sums_counts(counts in prop::collection::vec(0usize..5, 0..6)) {
        let (context, bys) = context_with(&counts);
        let locator = DefaultElementLocator::new(context);

        let found = locator.locate_elements(&bys).unwrap();
        prop_assert_eq!(found.len(), counts.iter().sum::<usize>());
    }

    /// The single lookup returns the first match of the first non-empty descriptor.
    #[test]
    fn prop_locate_one_takes_first_non_empty(counts in prop::collection::vec(0usize..3, 1..6)) {
        let (context, bys) = context_with(&counts);
        let locator = DefaultElementLocator::new(context);

        match counts.iter().position(|c| *c > 0) {
            Some(i) => {
                let found = locator.locate_element(&bys).unwrap();
                prop_assert_eq!(found.text().unwrap(), format!("s{i}-0"));
            }
            None => {
                let is_not_found = locator.locate_element(&bys).unwrap_err().is_not_found();
                prop_assert!(is_not_found);
            }
        }
    }

    /// A cached list proxy queries the context once, however many operations run.
    #[test]
    fn prop_cached_list_resolves_once(count in 0usize..20, operations in 1usize..10) {
        let (context, bys) = context_with(&[count]);
        let locator: Arc<dyn ElementLocator> = Arc::new(DefaultElementLocator::new(context.clone()));
        let list = ElementListProxy::new(locator, LocatorPlan::first_match(bys, true));

        for _ in 0..operations {
            prop_assert_eq!(list.len().unwrap(), count);
        }
        prop_assert_eq!(context.total_calls(), 1);
    }

    /// An uncached list proxy queries the context once per operation.
    #[test]
    fn prop_uncached_list_resolves_per_operation(count in 0usize..20, operations in 1usize..10) {
        let (context, bys) = context_with(&[count]);
        let locator: Arc<dyn ElementLocator> = Arc::new(DefaultElementLocator::new(context.clone()));
        let list = ElementListProxy::new(locator, LocatorPlan::first_match(bys, false));

        for _ in 0..operations {
            let _ = list.to_vec().unwrap();
        }
        prop_assert_eq!(context.total_calls(), operations);
    }

    /// Priority sorting is stable: equal priorities keep declaration order.
    #[test]
    fn prop_priority_sort_is_stable(priorities in prop::collection::vec(-3i32..3, 1..8)) {
        let member = priorities.iter().enumerate().fold(
            MemberDeclaration::new("m", "WebElement"),
            |member, (i, p)| member.with_finds_by(FindsBy::new(How::Id).using(format!("d{i}")).priority(*p)),
        );
        let plan = PlanBuilder::build_member(&member, false).unwrap().unwrap();

        let mut expected: Vec<(i32, usize)> = priorities.iter().copied().zip(0..).collect();
        expected.sort_by_key(|(p, _)| *p);
        let expected: Vec<By> = expected.into_iter().map(|(_, i)| By::id(format!("d{i}"))).collect();
        prop_assert_eq!(plan.bys(), expected.as_slice());
    }
}
