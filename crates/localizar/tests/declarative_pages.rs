//! Pages declared in YAML or JSON and decorated at runtime.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use localizar::prelude::*;

const CATALOG_PAGE: &str = r#"
name: CatalogPage
cache_lookup: true
members:
  - name: search
    type: WebElement
    finds_by:
      - how: name
        using: q
  - name: products
    type: Vec<WebElement>
    finds_by:
      - how: class_name
        using: product
  - name: featured
    type: ProductCard
    finds_by:
      - how: id
        using: featured
  - name: cards
    type: Vec<ProductCard>
    finds_by:
      - how: css
        using: ".card"
        priority: 1
      - how: css
        using: ".card-promo"
  - name: locale
    type: String
"#;

#[derive(Debug)]
struct ProductCard {
    element: Option<ElementRef>,
}

impl WrapsElement for ProductCard {
    fn wrapped_element(&self) -> &ElementRef {
        self.element.as_ref().unwrap_or_else(|| unreachable!("assigned on construction"))
    }

    fn blank() -> Option<Self> {
        Some(Self { element: None })
    }

    fn set_wrapped_element(&mut self, element: ElementRef) -> bool {
        self.element = Some(element);
        true
    }
}

fn el(label: &str) -> ElementRef {
    MockElement::new(label).with_text(label).into_ref()
}

fn catalog_context() -> Arc<MockSearchContext> {
    Arc::new(
        MockSearchContext::new()
            .with_matches(Selector::new(How::Name, "q"), vec![el("search box")])
            .with_matches(
                Selector::new(How::ClassName, "product"),
                vec![el("kettle"), el("toaster")],
            )
            .with_matches(Selector::new(How::Id, "featured"), vec![el("blender")])
            .with_matches(Selector::new(How::Css, ".card-promo"), vec![el("promo")])
            .with_matches(Selector::new(How::Css, ".card"), vec![el("c1"), el("c2")]),
    )
}

fn registry() -> WrapperRegistry {
    WrapperRegistry::new().with::<ProductCard>()
}

#[test]
fn yaml_page_decorates_every_shape() {
    let declaration = PageDeclaration::from_yaml(CATALOG_PAGE).unwrap();
    let context = catalog_context();
    let page = PageFactory::decorate(&declaration, context.clone(), registry()).unwrap();

    assert_eq!(
        page.member_names().collect::<Vec<_>>(),
        vec!["search", "products", "featured", "cards"]
    );
    assert_eq!(context.total_calls(), 0);

    assert_eq!(page.element("search").unwrap().text().unwrap(), "search box");
    assert_eq!(page.elements("products").unwrap().len().unwrap(), 2);

    let featured = page.wrapped::<ProductCard>("featured").unwrap();
    assert_eq!(featured.wrapped_element().text().unwrap(), "blender");
}

#[test]
fn yaml_priorities_reorder_descriptors() {
    let declaration = PageDeclaration::from_yaml(CATALOG_PAGE).unwrap();
    let page = PageFactory::decorate(&declaration, catalog_context(), registry()).unwrap();

    let cards = page.wrapped_list("cards").unwrap();
    let labels = cards
        .map(|card| {
            Arc::clone(card)
                .downcast::<ProductCard>()
                .ok()
                .unwrap()
                .wrapped_element()
                .text()
                .unwrap()
        })
        .unwrap();
    assert_eq!(labels, vec!["promo", "c1", "c2"]);
}

#[test]
fn page_level_cache_applies_to_every_member() {
    let declaration = PageDeclaration::from_yaml(CATALOG_PAGE).unwrap();
    let context = catalog_context();
    let page = PageFactory::decorate(&declaration, context.clone(), registry()).unwrap();

    let products = page.elements("products").unwrap();
    for _ in 0..4 {
        let _ = products.len().unwrap();
    }
    assert_eq!(
        context.find_elements_calls(&Selector::new(How::ClassName, "product")),
        1
    );
}

#[test]
fn unregistered_wrapper_is_unsupported_member_type() {
    let declaration = PageDeclaration::from_yaml(CATALOG_PAGE).unwrap();
    let err = PageFactory::decorate(&declaration, catalog_context(), WrapperRegistry::new())
        .unwrap_err();
    match err {
        LocalizarError::InvalidPage { page, errors } => {
            assert_eq!(page, "CatalogPage");
            let members: Vec<_> = errors
                .iter()
                .map(|e| match e {
                    LocalizarError::UnsupportedMemberType { member, .. } => member.as_str(),
                    other => panic!("unexpected error: {other}"),
                })
                .collect();
            assert_eq!(members, vec!["featured", "cards"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn conflicting_flags_are_configuration_errors() {
    let yaml = r"
name: Broken
members:
  - name: menu
    type: WebElement
    finds_by_sequence: true
    finds_by_all: true
    finds_by:
      - how: id
";
    let declaration = PageDeclaration::from_yaml(yaml).unwrap();
    let err = PageFactory::decorate(&declaration, catalog_context(), WrapperRegistry::new())
        .unwrap_err();
    assert!(matches!(err, LocalizarError::Configuration { ref member, .. } if member == "menu"));
}

#[test]
fn declarations_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.yaml");
    std::fs::write(&path, CATALOG_PAGE).unwrap();

    let declaration = PageDeclaration::load(&path).unwrap();
    assert_eq!(declaration.name, "CatalogPage");
    assert!(declaration.cache_lookup);
    assert_eq!(declaration.members.len(), 5);
}

#[test]
fn json_declarations_decorate_the_same_way() {
    let json = r#"{
        "name": "SearchPage",
        "members": [
            { "name": "query", "type": "WebElement", "finds_by": [{ "how": "name", "using": "q" }] }
        ]
    }"#;
    let declaration = PageDeclaration::from_json(json).unwrap();
    let context = catalog_context();
    let page = PageFactory::decorate(&declaration, context.clone(), WrapperRegistry::new()).unwrap();

    let query = page.element("query").unwrap();
    let _ = query.text().unwrap();
    let _ = query.text().unwrap();
    assert_eq!(context.find_element_calls(&Selector::new(How::Name, "q")), 2);
}
