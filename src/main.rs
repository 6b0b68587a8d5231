use core_types::{CustomElement, EventHandler, HostTree, StyleMap};
use dom::dom_snapshot::DomSnapshot;
use dom::{CustomElementRegistry, Document, NodeKey};
use reconciler::{Props, ReconcileError, Renderer, Tag};
use std::sync::Arc;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

struct RootElement;

impl CustomElement for RootElement {
    const NAME: &'static str = "RootElement";
}

/// Content of a `<root-element>`.
fn render_content(
    doc: &mut Document,
    host: NodeKey,
    registry: &Arc<CustomElementRegistry>,
    on_click: &EventHandler,
    greeting: &str,
) -> Result<(), ReconcileError> {
    let card = Props::new()
        .class_name("card")
        .style(StyleMap::new().with("padding", "4px"));
    Renderer::new(doc, host, registry.clone())
        .el("div")
        .open("div", card)
        .open("span", Props::new().on("click", on_click.clone()))
        .text(greeting)
        .close("span")
        .close("div")
        .close("div")
        .finish()
}

fn main() -> Result<(), ReconcileError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let registry = Arc::new(CustomElementRegistry::new());
    let mut doc = Document::new();
    let root = doc.root();

    Renderer::new(&mut doc, root, registry.clone())
        .el(Tag::custom::<RootElement>())
        .end()
        .finish()?;
    let Some(host) = doc.first_child(root) else {
        return Ok(());
    };
    log::info!("root element is <{}>", doc.node_name(host));
    let on_click = EventHandler::new(|event| log::info!("span got {event}"));

    render_content(&mut doc, host, &registry, &on_click, "Hello")?;
    println!("{}", DomSnapshot::of(&doc));

    doc.reset_stats();
    render_content(&mut doc, host, &registry, &on_click, "Hello")?;
    log::info!("identical pass: {:?}", doc.stats());

    doc.reset_stats();
    render_content(&mut doc, host, &registry, &on_click, "Hello again")?;
    log::info!("changed text: {:?}", doc.stats());
    println!("{}", DomSnapshot::of(&doc));

    let err = Renderer::new(&mut doc, host, registry.clone())
        .el("div")
        .el("div")
        .close("span")
        .finish();
    if let Err(err) = err {
        log::warn!("{err}");
    }
    Ok(())
}
