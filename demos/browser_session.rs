//! Browser Session
//!
//! This example replays a short browsing session against a routed state
//! machine, printing the machine state and the URL after every step.
//!
//! Key concepts:
//! - Loading a URL drives the machine into the matching state
//! - Machine transitions push the path of the active state
//! - Back/forward navigation moves the machine without new pushes
//! - Changing a route parameter in the context rewrites the URL
//! - Unknown URLs fall through to a catch-all state
//!
//! Run with: RUST_LOG=mindset_router=debug cargo run --example browser_session

use mindset_router::navigation::{History, MemoryHistory};
use mindset_router::statechart::{Event, StateNodeConfig, TransitionConfig};
use mindset_router::sync::{RoutedContext, Router, RouterArgs};
use serde_json::json;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default)]
struct Session {
    clicks: u32,
}

type Ctx = RoutedContext<Session>;

fn config() -> StateNodeConfig<Ctx> {
    let click = |ctx: &mut Ctx, _: &Event| ctx.app.clicks += 1;

    StateNodeConfig::new()
        .initial("home")
        .on("GoHome", TransitionConfig::to("home").assign(click))
        .on(
            "OpenItem",
            TransitionConfig::to("catalog.item")
                .assign(click)
                .assign(|ctx: &mut Ctx, event| ctx.assign_match(event.data())),
        )
        .on(
            "ChangeParameter",
            TransitionConfig::to("catalog.item")
                .assign(click)
                .assign(|ctx: &mut Ctx, _| ctx.set_param("id", "4321")),
        )
        .state("home", StateNodeConfig::new().path("/"))
        .state(
            "catalog",
            StateNodeConfig::new()
                .path("/catalog")
                .initial("list")
                .state("list", StateNodeConfig::new().path("/catalog/list"))
                .state("item", StateNodeConfig::new().path("/catalog/items/:id")),
        )
        .state("noMatch", StateNodeConfig::new().path("(.*)"))
}

fn report(step: &str, router: &Router<Session, MemoryHistory>, history: &MemoryHistory) {
    let ctx = router.context();
    println!(
        "{step:<28} state={:<14} url={:<22} match={:?} clicks={}",
        router.state().to_string(),
        history.location().pathname,
        ctx.matched.unwrap_or_default(),
        ctx.app.clicks,
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Browser Session Example ===\n");

    let history = Rc::new(MemoryHistory::at("/catalog"));
    let router = Router::new(RouterArgs::new(config(), Session::default(), Rc::clone(&history)))?;
    report("load /catalog", &router, &history);

    router.send(Event::with_data("OpenItem", json!({ "id": 1234 })));
    report("open item 1234", &router, &history);

    router.send("ChangeParameter");
    report("change parameter", &router, &history);

    history.back();
    report("back", &router, &history);

    history.back();
    report("back", &router, &history);

    history.forward();
    report("forward", &router, &history);

    history.push("/somewhere/else");
    report("type unknown url", &router, &history);

    router.send("GoHome");
    report("go home", &router, &history);

    println!("\nHistory entries:");
    for (i, entry) in history.entries().iter().enumerate() {
        let marker = if i == history.index() { ">" } else { " " };
        println!("{marker} {entry}");
    }

    println!("\nVisited states:");
    for address in router.service().log().path() {
        println!("  {address}");
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
