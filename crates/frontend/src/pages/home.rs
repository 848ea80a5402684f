use dioxus::prelude::*;

use decliker_shared::models::{Decliker, ProfessionOption};

use crate::api;
use crate::components::map_view::DeclikerMap;

#[component]
pub fn DeclikerPage(with_name: bool, no_figures: bool) -> Element {
    let declikers_resource = use_resource(|| async {
        let result = api::fetch_declikers().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Could not load declikers");
        }
        result
    });
    let professions_resource = use_resource(|| async {
        let result = api::fetch_professions().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Could not load professions, filter disabled");
        }
        result
    });

    // The map seeds its source once, so wait for the records before mounting it.
    let declikers: Vec<Decliker> = match &*declikers_resource.read() {
        Some(Ok(d)) => d.clone(),
        Some(Err(_)) => {
            return rsx! {
                div { class: "status error", "Impossible de charger les declikers." }
            }
        }
        None => {
            return rsx! {
                div { class: "status", "Chargement de la carte..." }
            }
        }
    };
    let professions: Vec<ProfessionOption> = match &*professions_resource.read() {
        Some(Ok(p)) => p.clone(),
        _ => vec![],
    };

    rsx! {
        DeclikerMap {
            declikers: declikers,
            professions: professions,
            with_name: with_name,
            no_figures: no_figures,
        }
    }
}
