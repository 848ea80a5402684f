use std::collections::BTreeSet;

use dioxus::prelude::*;

use decliker_shared::models::{Decliker, ProfessionOption};

use crate::components::popup::Popup;
use crate::components::profession_filter::ProfessionFilter;
use crate::map::maplibre::MaplibreEngine;
use crate::map::style::MapOptions;
use crate::map::{MapConfig, MapController};

const MAP_CONTAINER_ID: &str = "decliker-map-container";

/// Clustered decliker map with profession filter and selection popup.
///
/// Owns exactly one map engine for as long as it is mounted. The records are
/// read once, when the view is first rendered.
#[component]
pub fn DeclikerMap(
    declikers: Vec<Decliker>,
    professions: Vec<ProfessionOption>,
    #[props(default)] with_name: bool,
    #[props(default)] no_figures: bool,
) -> Element {
    let selected = use_signal(|| None::<Vec<Decliker>>);

    let controller = use_hook(|| {
        MapController::<MaplibreEngine>::new(
            declikers.clone(),
            MapConfig {
                with_name,
                no_figures,
            },
            move |selection| {
                let mut selected = selected;
                selected.set(selection);
            },
        )
    });

    // The container div exists once the first render has been committed.
    use_effect({
        let controller = controller.clone();
        move || {
            controller.mount(|| MaplibreEngine::create(MAP_CONTAINER_ID, &MapOptions::default()));
        }
    });

    use_drop({
        let controller = controller.clone();
        move || controller.teardown()
    });

    let filter_controller = controller.clone();
    let popup_controller = controller.clone();
    let selection = selected.read().clone();

    rsx! {
        div { class: "map-body",
            div { class: "map-frame",
                div { id: MAP_CONTAINER_ID, class: "map-container" }
                if let Some(list) = selection {
                    Popup {
                        declikers: list,
                        professions: professions.clone(),
                        on_close: move |_| popup_controller.dismiss(),
                    }
                }
            }
            ProfessionFilter {
                options: professions.clone(),
                on_change: move |chosen: BTreeSet<String>| {
                    filter_controller.apply_filter(&chosen);
                },
            }
        }
    }
}
