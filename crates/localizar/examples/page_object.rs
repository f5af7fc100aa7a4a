//! Example: Page Object Model
//!
//! Demonstrates: declaring a page object with `#[derive(PageObject)]` and
//! watching its members resolve lazily.
//!
//! Run with: `RUST_LOG=localizar=trace cargo run --example page_object`

use std::sync::Arc;

use localizar::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(PageObject)]
struct LoginPage {
    #[find_by(id)]
    username: ElementProxy,

    #[find_by(name = "pwd")]
    #[cache_lookup]
    password: ElementProxy,

    #[find_by(id = "login", priority = 0)]
    #[find_by(css = "button[type='submit']", priority = 1)]
    submit: ElementProxy,

    #[find_by(class_name = "error")]
    errors: ElementListProxy,
}

fn main() -> LocalizarResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Page Object Model Example ===\n");

    let submit_button = MockElement::new("submit").with_tag("button").shared();
    let submit_ref: ElementRef = submit_button.clone();
    let context = Arc::new(
        MockSearchContext::new()
            .with_matches(
                Selector::new(How::Id, "username"),
                vec![MockElement::new("username").with_tag("input").into_ref()],
            )
            .with_matches(
                Selector::new(How::Name, "pwd"),
                vec![MockElement::new("pwd").with_tag("input").into_ref()],
            )
            .with_matches(Selector::new(How::Css, "button[type='submit']"), vec![submit_ref]),
    );

    // 1. Declaration
    println!("1. Declared members...");
    for member in LoginPage::declaration().members {
        let finders: Vec<String> = member
            .finds_by
            .iter()
            .map(|f| f.finder(&member.name).to_string())
            .collect();
        println!("   {} -> [{}]", member.name, finders.join(", "));
    }

    // 2. Initialization is free
    println!("\n2. Initializing page...");
    let page: LoginPage = PageFactory::init_elements(context.clone())?;
    println!("   Lookups so far: {}", context.total_calls());

    // 3. Members resolve on use
    println!("\n3. Filling the form...");
    page.username.send_keys("alice")?;
    page.password.send_keys("secret")?;
    page.password.submit()?;
    println!("   Lookups so far: {}", context.total_calls());

    // 4. First-match fallback
    println!("\n4. Clicking submit (id 'login' is missing, CSS fallback wins)...");
    page.submit.click()?;
    println!("   Submit clicked {} time(s)", submit_button.clicks());

    // 5. Lists are fine empty
    println!("\n5. Checking errors...");
    println!("   Errors shown: {}", page.errors.len()?);

    println!("\n=== Example Complete ===");
    Ok(())
}
