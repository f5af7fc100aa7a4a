//! Locator plans: the immutable per-member result of combining descriptors
//! with a cache policy.
//!
//! Planning is where declaration mistakes surface. A page is planned in one
//! pass so that every malformed member is reported together instead of one
//! at a time on first access.

use std::collections::{HashMap, HashSet};

use crate::by::By;
use crate::declaration::{MemberDeclaration, PageDeclaration};
use crate::result::{LocalizarError, LocalizarResult};

/// How multiple descriptors on one member combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Try each descriptor in order; the first match wins
    FirstMatch,
    /// Each descriptor searches within the results of the previous one
    Sequence,
    /// Merge the results of every descriptor
    Union,
}

/// Descriptors to resolve plus the cache policy for one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorPlan {
    combinator: Combinator,
    bys: Vec<By>,
    cache: bool,
}

impl LocatorPlan {
    /// Plan that tries `bys` in order
    #[must_use]
    pub fn first_match(bys: Vec<By>, cache: bool) -> Self {
        Self {
            combinator: Combinator::FirstMatch,
            bys,
            cache,
        }
    }

    /// Plan that narrows through `bys` as one chained descriptor
    #[must_use]
    pub fn sequence(bys: Vec<By>, cache: bool) -> Self {
        Self {
            combinator: Combinator::Sequence,
            bys: vec![By::Chained(bys)],
            cache,
        }
    }

    /// Plan that merges `bys` as one union descriptor
    #[must_use]
    pub fn union(bys: Vec<By>, cache: bool) -> Self {
        Self {
            combinator: Combinator::Union,
            bys: vec![By::All(bys)],
            cache,
        }
    }

    /// How the declared descriptors were combined
    #[must_use]
    pub const fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Descriptors handed to the locator, after combination
    #[must_use]
    pub fn bys(&self) -> &[By] {
        &self.bys
    }

    /// Whether the first lookup is cached
    #[must_use]
    pub const fn cache(&self) -> bool {
        self.cache
    }
}

/// Plans for every member of a page, keyed by member name
pub type PagePlans = HashMap<String, LocatorPlan>;

/// Builds [`LocatorPlan`]s from declarations
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanBuilder;

impl PlanBuilder {
    /// Plan one member.
    ///
    /// Returns `Ok(None)` for members without locator annotations; those are
    /// not element members and are left alone.
    ///
    /// # Errors
    ///
    /// [`LocalizarError::Configuration`] when the member asks for both a
    /// sequence and a union.
    pub fn build_member(
        member: &MemberDeclaration,
        type_cache: bool,
    ) -> LocalizarResult<Option<LocatorPlan>> {
        if member.finds_by_sequence && member.finds_by_all {
            return Err(LocalizarError::Configuration {
                member: member.name.clone(),
                message: "Cannot specify FindsBySequence and FindsByAll on the same member"
                    .to_string(),
            });
        }

        if member.finds_by.is_empty() {
            return Ok(None);
        }

        let mut annotations: Vec<_> = member.finds_by.iter().collect();
        // stable: equal priorities keep declaration order
        annotations.sort_by_key(|finds_by| finds_by.priority);
        let bys: Vec<By> = annotations
            .into_iter()
            .map(|finds_by| finds_by.finder(&member.name))
            .collect();

        let cache = member.cache_lookup || type_cache;
        let plan = if member.finds_by_sequence {
            LocatorPlan::sequence(bys, cache)
        } else if member.finds_by_all {
            LocatorPlan::union(bys, cache)
        } else {
            LocatorPlan::first_match(bys, cache)
        };

        tracing::trace!(
            member = %member.name,
            combinator = ?plan.combinator(),
            cache,
            "planned member"
        );
        Ok(Some(plan))
    }

    /// Plan every member of a page.
    ///
    /// # Errors
    ///
    /// A lone bad member yields its own error; several yield
    /// [`LocalizarError::InvalidPage`] listing all of them.
    pub fn plan_page(page: &PageDeclaration) -> LocalizarResult<PagePlans> {
        let mut plans = PagePlans::with_capacity(page.members.len());
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for member in &page.members {
            if !seen.insert(member.name.as_str()) {
                errors.push(duplicate_member(&page.name, &member.name));
                continue;
            }
            match Self::build_member(member, page.cache_lookup) {
                Ok(Some(plan)) => {
                    plans.insert(member.name.clone(), plan);
                }
                Ok(None) => {}
                Err(err) => errors.push(err),
            }
        }

        collect_errors(&page.name, errors)?;
        tracing::debug!(page = %page.name, planned = plans.len(), "planned page");
        Ok(plans)
    }
}

pub(crate) fn duplicate_member(page: &str, member: &str) -> LocalizarError {
    LocalizarError::Configuration {
        member: member.to_string(),
        message: format!("member declared more than once on page '{page}'"),
    }
}

/// `Ok` when `errors` is empty, the single error, or an [`LocalizarError::InvalidPage`]
pub(crate) fn collect_errors(page: &str, mut errors: Vec<LocalizarError>) -> LocalizarResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(LocalizarError::InvalidPage {
            page: page.to_string(),
            errors,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::by::How;
    use crate::declaration::FindsBy;

    fn member() -> MemberDeclaration {
        MemberDeclaration::new("menu", "WebElement")
    }

    mod build_member_tests {
        use super::*;

        #[test]
        fn test_no_annotations_yields_no_plan() {
            assert!(PlanBuilder::build_member(&member(), true).unwrap().is_none());
        }

        #[test]
        fn test_first_match_keeps_declaration_order() {
            let decl = member()
                .with_finds_by(FindsBy::new(How::Id).using("a"))
                .with_finds_by(FindsBy::new(How::Css).using("b"));
            let plan = PlanBuilder::build_member(&decl, false).unwrap().unwrap();
            assert_eq!(plan.combinator(), Combinator::FirstMatch);
            assert_eq!(plan.bys(), &[By::id("a"), By::css("b")]);
            assert!(!plan.cache());
        }

        #[test]
        fn test_priority_sort_is_stable() {
            let decl = member()
                .with_finds_by(FindsBy::new(How::Id).using("late").priority(5))
                .with_finds_by(FindsBy::new(How::Id).using("tie-1").priority(1))
                .with_finds_by(FindsBy::new(How::Id).using("early").priority(-1))
                .with_finds_by(FindsBy::new(How::Id).using("tie-2").priority(1));
            let plan = PlanBuilder::build_member(&decl, false).unwrap().unwrap();
            assert_eq!(
                plan.bys(),
                &[By::id("early"), By::id("tie-1"), By::id("tie-2"), By::id("late")]
            );
        }

        #[test]
        fn test_sequence_collapses_into_chain() {
            let decl = member()
                .with_finds_by(FindsBy::new(How::Id).using("nav"))
                .with_finds_by(FindsBy::new(How::TagName).using("a"))
                .finds_by_sequence(true);
            let plan = PlanBuilder::build_member(&decl, false).unwrap().unwrap();
            assert_eq!(plan.combinator(), Combinator::Sequence);
            assert_eq!(plan.bys(), &[By::chained([By::id("nav"), By::tag_name("a")])]);
        }

        #[test]
        fn test_all_collapses_into_union() {
            let decl = member()
                .with_finds_by(FindsBy::new(How::Name).using("q"))
                .with_finds_by(FindsBy::new(How::Css).using("input"))
                .finds_by_all(true);
            let plan = PlanBuilder::build_member(&decl, false).unwrap().unwrap();
            assert_eq!(plan.combinator(), Combinator::Union);
            assert_eq!(plan.bys(), &[By::all([By::name("q"), By::css("input")])]);
        }

        #[test]
        fn test_sequence_and_all_conflict_even_without_descriptors() {
            let decl = member().finds_by_sequence(true).finds_by_all(true);
            let err = PlanBuilder::build_member(&decl, false).unwrap_err();
            assert!(matches!(err, LocalizarError::Configuration { ref member, .. } if member == "menu"));
        }

        #[test]
        fn test_cache_from_member_or_type() {
            let annotated = member().with_finds_by(FindsBy::new(How::Id));
            let from_type = PlanBuilder::build_member(&annotated, true).unwrap().unwrap();
            assert!(from_type.cache());

            let from_member = PlanBuilder::build_member(&annotated.clone().cache_lookup(true), false)
                .unwrap()
                .unwrap();
            assert!(from_member.cache());

            let neither = PlanBuilder::build_member(&annotated, false).unwrap().unwrap();
            assert!(!neither.cache());
        }

        #[test]
        fn test_missing_using_falls_back_to_member_name() {
            let decl = member().with_finds_by(FindsBy::new(How::Id));
            let plan = PlanBuilder::build_member(&decl, false).unwrap().unwrap();
            assert_eq!(plan.bys(), &[By::id("menu")]);
        }
    }

    mod plan_page_tests {
        use super::*;

        fn conflicting(name: &str) -> MemberDeclaration {
            MemberDeclaration::new(name, "WebElement")
                .with_finds_by(FindsBy::new(How::Id))
                .finds_by_sequence(true)
                .finds_by_all(true)
        }

        #[test]
        fn test_plans_only_annotated_members() {
            let page = PageDeclaration::new("LoginPage")
                .with_member(MemberDeclaration::new("user", "WebElement").with_finds_by(FindsBy::new(How::Id)))
                .with_member(MemberDeclaration::new("title", "String"));
            let plans = PlanBuilder::plan_page(&page).unwrap();
            assert_eq!(plans.len(), 1);
            assert!(plans.contains_key("user"));
        }

        #[test]
        fn test_single_conflict_is_returned_directly() {
            let page = PageDeclaration::new("LoginPage").with_member(conflicting("user"));
            let err = PlanBuilder::plan_page(&page).unwrap_err();
            assert!(matches!(err, LocalizarError::Configuration { .. }));
        }

        #[test]
        fn test_every_conflict_reported_in_one_pass() {
            let page = PageDeclaration::new("LoginPage")
                .with_member(conflicting("user"))
                .with_member(MemberDeclaration::new("ok", "WebElement").with_finds_by(FindsBy::new(How::Id)))
                .with_member(conflicting("password"));
            match PlanBuilder::plan_page(&page).unwrap_err() {
                LocalizarError::InvalidPage { page, errors } => {
                    assert_eq!(page, "LoginPage");
                    assert_eq!(errors.len(), 2);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_duplicate_member_name_is_configuration_error() {
            let page = PageDeclaration::new("LoginPage")
                .with_member(MemberDeclaration::new("user", "WebElement").with_finds_by(FindsBy::new(How::Id)))
                .with_member(MemberDeclaration::new("user", "WebElement").with_finds_by(FindsBy::new(How::Name)));
            let err = PlanBuilder::plan_page(&page).unwrap_err();
            assert!(matches!(err, LocalizarError::Configuration { ref member, .. } if member == "user"));
        }

        #[test]
        fn test_page_cache_applies_to_every_member() {
            let page = PageDeclaration::new("Cached")
                .with_cache_lookup(true)
                .with_member(MemberDeclaration::new("a", "WebElement").with_finds_by(FindsBy::new(How::Id)))
                .with_member(MemberDeclaration::new("b", "WebElement").with_finds_by(FindsBy::new(How::Id)));
            let plans = PlanBuilder::plan_page(&page).unwrap();
            assert!(plans.values().all(LocatorPlan::cache));
        }
    }
}
