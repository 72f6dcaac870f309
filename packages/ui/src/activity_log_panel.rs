use dioxus::prelude::*;

use crate::activity_log::{use_activity_log, LogLevel};

#[component]
pub fn ActivityLogPanel() -> Element {
    let mut log = use_activity_log();

    if !log().visible {
        return rsx! {};
    }

    let entries = log().entries.clone();

    rsx! {
        div {
            class: "fixed bottom-4 right-4 w-[360px] max-h-[40vh] flex flex-col bg-white border border-neutral-300 rounded shadow-lg text-[0.8125rem]",
            div {
                class: "flex items-center justify-between px-3 py-2 border-b border-neutral-200 font-medium text-neutral-800",
                span { "Activity Log" }
                div {
                    class: "flex gap-2",
                    button {
                        class: "text-neutral-600 hover:text-neutral-800",
                        onclick: move |_| log.write().entries.clear(),
                        "Clear"
                    }
                    button {
                        class: "text-neutral-600 hover:text-neutral-800",
                        onclick: move |_| log.write().visible = false,
                        "Close"
                    }
                }
            }
            div {
                class: "overflow-y-auto px-3 py-2",
                for entry in entries.iter().rev() {
                    div {
                        class: match entry.level {
                            LogLevel::Error => "py-0.5 text-red-600",
                            LogLevel::Success => "py-0.5 text-green-700",
                            LogLevel::Info => "py-0.5 text-neutral-700",
                        },
                        span { class: "mr-2 text-neutral-400 font-mono", "{entry.timestamp}" }
                        span { "{entry.message}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ActivityLogToggle() -> Element {
    let mut log = use_activity_log();
    let count = log().entries.len();
    let has_errors = log().has_errors();

    rsx! {
        button {
            class: if has_errors {
                "px-3 py-1 rounded border border-red-300 bg-red-50 text-red-600 text-sm"
            } else {
                "px-3 py-1 rounded border border-neutral-300 text-neutral-700 text-sm"
            },
            onclick: move |_| {
                let visible = log().visible;
                log.write().visible = !visible;
            },
            title: "Activity log",
            if count > 0 {
                "{count}"
            } else {
                "Log"
            }
        }
    }
}
