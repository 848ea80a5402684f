use std::collections::BTreeSet;

use dioxus::prelude::*;

use decliker_shared::models::ProfessionOption;

const PLACEHOLDER: &str = "Filtrer par métier...";

/// Selection after toggling `value` in or out of `current`.
pub fn toggle(current: &BTreeSet<String>, value: &str) -> BTreeSet<String> {
    let mut next = current.clone();
    if !next.remove(value) {
        next.insert(value.to_string());
    }
    next
}

/// Multi-select over profession options. Emits the whole selection on every change.
#[component]
pub fn ProfessionFilter(
    options: Vec<ProfessionOption>,
    on_change: EventHandler<BTreeSet<String>>,
) -> Element {
    let mut selected = use_signal(BTreeSet::<String>::new);
    let current = selected.read().clone();

    rsx! {
        div { class: "profession-filter",
            "role": "group",
            "aria-label": "{PLACEHOLDER}",
            if current.is_empty() {
                span { class: "placeholder", "{PLACEHOLDER}" }
            }
            for option in options {
                {
                    let active = current.contains(&option.value);
                    let value = option.value.clone();
                    rsx! {
                        button {
                            key: "{option.value}",
                            class: if active { "chip active" } else { "chip" },
                            "aria-pressed": "{active}",
                            onclick: move |_| {
                                let next = toggle(&selected.read(), &value);
                                selected.set(next.clone());
                                on_change.call(next);
                            },
                            "{option.label}"
                        }
                    }
                }
            }
            if !current.is_empty() {
                button {
                    class: "chip clear",
                    onclick: move |_| {
                        selected.set(BTreeSet::new());
                        on_change.call(BTreeSet::new());
                    },
                    "Effacer"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_missing_value() {
        let next = toggle(&BTreeSet::new(), "plumber");
        assert!(next.contains("plumber"));
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn test_toggle_removes_present_value() {
        let current: BTreeSet<String> = ["plumber", "carpenter"].iter().map(|s| s.to_string()).collect();
        let next = toggle(&current, "plumber");
        assert_eq!(next.into_iter().collect::<Vec<_>>(), vec!["carpenter"]);
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let current: BTreeSet<String> = ["electrician"].iter().map(|s| s.to_string()).collect();
        assert_eq!(toggle(&toggle(&current, "plumber"), "plumber"), current);
    }
}
