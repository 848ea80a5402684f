mod api;
mod components;
mod map;
mod pages;

use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/embed")]
    Embed {},
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::home::DeclikerPage { with_name: true, no_figures: false }
    }
}

/// Display-only map for embedding: no popup, no cluster counts.
#[component]
fn Embed() -> Element {
    rsx! {
        pages::home::DeclikerPage { with_name: false, no_figures: true }
    }
}

const CSS: Asset = asset!("/assets/main.css");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Title { "Decliker map" }
        document::Meta { name: "description", content: "La liste des declikers pres de chez vous" }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
