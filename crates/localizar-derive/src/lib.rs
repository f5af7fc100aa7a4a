//! Localizar Derive Macros: declarative page objects
//!
//! `#[derive(PageObject)]` reads locator annotations from struct fields and
//! generates the `localizar::PageObject` impl that `PageFactory` uses to
//! build lazy proxies for them.
//!
//! # Mistake-Proofing
//!
//! Annotation mistakes are compile errors instead of runtime surprises: an
//! unknown strategy, a field asking for both `finds_by_sequence` and
//! `finds_by_all`, or a derive on anything but a struct with named fields.
//! Every such mistake in a struct is reported at once.
//!
//! # Attributes
//!
//! | Attribute | Where | Meaning |
//! |-----------|-------|---------|
//! | `#[find_by(css = ".x")]` | field | one descriptor; repeat for more |
//! | `#[find_by(id)]` | field | query defaults to the field name |
//! | `#[find_by(how = "xpath", using = "//a", priority = -1)]` | field | long form |
//! | `#[finds_by_sequence]` | field | each descriptor searches within the previous |
//! | `#[finds_by_all]` | field | merge the results of every descriptor |
//! | `#[cache_lookup]` | field or struct | resolve once, then reuse |
//! | `#[component]` | field | nested page object sharing the locator |
//!
//! Fields with none of these are filled with `Default::default()`.
//!
//! # Example
//!
//! ```ignore
//! use localizar::prelude::*;
//!
//! #[derive(PageObject)]
//! #[cache_lookup]
//! struct SearchPage {
//!     #[find_by(name = "q")]
//!     query: ElementProxy,
//!
//!     #[find_by(css = ".result", priority = 1)]
//!     #[find_by(xpath = "//li[@class='hit']")]
//!     #[finds_by_all]
//!     results: ElementListProxy,
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, spanned::Spanned, Attribute, Data, DeriveInput, Fields, LitInt, LitStr,
    Token,
};

/// Derive `localizar::PageObject` for a struct with named fields.
#[proc_macro_derive(
    PageObject,
    attributes(find_by, finds_by_sequence, finds_by_all, cache_lookup, component)
)]
pub fn derive_page_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_page_object(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_page_object(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let page_name = name.to_string();
    let type_cache = has_flag(&input.attrs, "cache_lookup");

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new(
                    input.span(),
                    "PageObject can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "PageObject can only be derived for structs",
            ))
        }
    };

    let mut members = Vec::with_capacity(fields.len());
    let mut inits = Vec::with_capacity(fields.len());
    let mut errors: Option<syn::Error> = None;

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        match FieldSpec::parse(field) {
            Ok(spec) => {
                members.push(spec.declaration(&ident.to_string(), &field.ty));
                inits.push(spec.init(ident, &field.ty));
            }
            Err(err) => match errors.as_mut() {
                Some(all) => all.combine(err),
                None => errors = Some(err),
            },
        }
    }

    if let Some(err) = errors {
        return Err(err);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::localizar::PageObject for #name #ty_generics #where_clause {
            fn declaration() -> ::localizar::PageDeclaration {
                ::localizar::PageDeclaration::new(#page_name)
                    .with_cache_lookup(#type_cache)
                    #( .with_member(#members) )*
            }

            fn from_members(
                members: &mut ::localizar::PageMembers,
            ) -> ::localizar::LocalizarResult<Self> {
                ::core::result::Result::Ok(Self {
                    #( #inits, )*
                })
            }
        }
    })
}

/// One `#[find_by(...)]` annotation
#[derive(Debug, Default, PartialEq, Eq)]
struct FindsByAttr {
    how: Option<&'static str>,
    using: Option<String>,
    priority: i32,
}

/// Everything the field attributes say about one field
#[derive(Debug, Default)]
struct FieldSpec {
    finds_by: Vec<FindsByAttr>,
    sequence: bool,
    all: bool,
    cache: bool,
    component: bool,
}

impl FieldSpec {
    fn parse(field: &syn::Field) -> syn::Result<Self> {
        let mut spec = Self {
            sequence: has_flag(&field.attrs, "finds_by_sequence"),
            all: has_flag(&field.attrs, "finds_by_all"),
            cache: has_flag(&field.attrs, "cache_lookup"),
            component: has_flag(&field.attrs, "component"),
            ..Self::default()
        };

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("find_by")) {
            spec.finds_by.push(parse_find_by(attr)?);
        }

        if spec.sequence && spec.all {
            return Err(syn::Error::new(
                field.span(),
                "Cannot specify FindsBySequence and FindsByAll on the same member",
            ));
        }
        if spec.component && !spec.finds_by.is_empty() {
            return Err(syn::Error::new(
                field.span(),
                "a #[component] field cannot also carry #[find_by]",
            ));
        }
        Ok(spec)
    }

    fn declaration(&self, field: &str, ty: &syn::Type) -> proc_macro2::TokenStream {
        let type_name = quote!(#ty).to_string();
        let finds_by = self.finds_by.iter().map(|finds_by| {
            let how = syn::Ident::new(
                finds_by.how.unwrap_or("Id"),
                proc_macro2::Span::call_site(),
            );
            let priority = finds_by.priority;
            let using = finds_by.using.as_ref().map(|using| quote!(.using(#using)));
            quote! {
                .with_finds_by(
                    ::localizar::FindsBy::new(::localizar::How::#how)
                        #using
                        .priority(#priority)
                )
            }
        });
        let (sequence, all, cache) = (self.sequence, self.all, self.cache);
        quote! {
            ::localizar::MemberDeclaration::new(#field, #type_name)
                #( #finds_by )*
                .finds_by_sequence(#sequence)
                .finds_by_all(#all)
                .cache_lookup(#cache)
        }
    }

    fn init(&self, ident: &syn::Ident, ty: &syn::Type) -> proc_macro2::TokenStream {
        let field = ident.to_string();
        if self.component {
            quote!(#ident: members.component::<#ty>()?)
        } else if self.finds_by.is_empty() {
            quote!(#ident: ::core::default::Default::default())
        } else {
            quote!(#ident: members.decorate::<#ty>(#field)?)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Whether a bare `#[name]` marker is present
fn has_flag(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// Map a strategy name to its `How` variant
fn how_variant(name: &str) -> Option<&'static str> {
    Some(match name {
        "id" => "Id",
        "name" => "Name",
        "class_name" => "ClassName",
        "css" | "css_selector" => "Css",
        "xpath" => "XPath",
        "tag_name" => "TagName",
        "link_text" => "LinkText",
        "partial_link_text" => "PartialLinkText",
        "test_id" => "TestId",
        _ => return None,
    })
}

/// Parse `#[find_by(...)]` in either the short or the long form
fn parse_find_by(attr: &Attribute) -> syn::Result<FindsByAttr> {
    let mut finds_by = FindsByAttr::default();

    attr.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .map(ToString::to_string)
            .unwrap_or_default();

        match key.as_str() {
            "how" => {
                let value: LitStr = meta.value()?.parse()?;
                let how = how_variant(&value.value())
                    .ok_or_else(|| syn::Error::new(value.span(), "unknown locator strategy"))?;
                set_how(&mut finds_by, how, &meta)
            }
            "using" => {
                let value: LitStr = meta.value()?.parse()?;
                finds_by.using = Some(value.value());
                Ok(())
            }
            "priority" => {
                let input = meta.value()?;
                let negative = input.parse::<Option<Token![-]>>()?.is_some();
                let value: i32 = input.parse::<LitInt>()?.base10_parse()?;
                finds_by.priority = if negative { -value } else { value };
                Ok(())
            }
            other => {
                let how = how_variant(other).ok_or_else(|| meta.error("unknown locator strategy"))?;
                set_how(&mut finds_by, how, &meta)?;
                if meta.input.peek(Token![=]) {
                    let value: LitStr = meta.value()?.parse()?;
                    finds_by.using = Some(value.value());
                }
                Ok(())
            }
        }
    })?;

    if finds_by.how.is_none() {
        return Err(syn::Error::new(
            attr.span(),
            "find_by needs a strategy, e.g. #[find_by(css = \".item\")]",
        ));
    }
    Ok(finds_by)
}

fn set_how(
    finds_by: &mut FindsByAttr,
    how: &'static str,
    meta: &syn::meta::ParseNestedMeta<'_>,
) -> syn::Result<()> {
    if finds_by.how.is_some() {
        return Err(meta.error("find_by takes exactly one strategy"));
    }
    finds_by.how = Some(how);
    Ok(())
}
