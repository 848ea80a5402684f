use dioxus::prelude::*;

use decliker_shared::models::{profession_label, Decliker, ProfessionOption};

/// Comma-separated profession labels of a record.
pub fn job_labels(jobs: &[String], options: &[ProfessionOption]) -> String {
    jobs.iter()
        .map(|job| profession_label(options, job))
        .collect::<Vec<_>>()
        .join(", ")
}

#[component]
pub fn Popup(
    declikers: Vec<Decliker>,
    professions: Vec<ProfessionOption>,
    on_close: EventHandler<()>,
) -> Element {
    if declikers.is_empty() {
        return rsx! {};
    }

    let entries: Vec<(String, String, String)> = declikers
        .iter()
        .map(|d| (d.id.clone(), d.name.clone(), job_labels(&d.jobs, &professions)))
        .collect();

    rsx! {
        div {
            class: "popup-backdrop",
            onclick: move |_| on_close.call(()),
        }
        div { class: "popup",
            button {
                class: "popup-close",
                "aria-label": "Fermer",
                onclick: move |_| on_close.call(()),
                "\u{00d7}"
            }
            ul { class: "popup-list",
                for (id, name, jobs) in entries {
                    li { key: "{id}", class: "popup-entry",
                        strong { "{name}" }
                        if !jobs.is_empty() {
                            span { class: "popup-jobs", "{jobs}" }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<ProfessionOption> {
        vec![
            ProfessionOption {
                label: "Plombier".to_string(),
                value: "plumber".to_string(),
            },
            ProfessionOption {
                label: "Menuisier".to_string(),
                value: "carpenter".to_string(),
            },
        ]
    }

    #[test]
    fn test_job_labels_uses_option_labels() {
        let jobs = vec!["carpenter".to_string(), "plumber".to_string()];
        assert_eq!(job_labels(&jobs, &options()), "Menuisier, Plombier");
    }

    #[test]
    fn test_job_labels_falls_back_to_code() {
        let jobs = vec!["roofer".to_string()];
        assert_eq!(job_labels(&jobs, &options()), "roofer");
        assert_eq!(job_labels(&[], &options()), "");
    }
}
