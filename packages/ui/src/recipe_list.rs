//! The recipe list: filter and sort controls, cards, and paging.

use dioxus::prelude::*;

use crate::shell::use_shell;
use crate::view::{
    category_from_option, category_options, render, sort_from_option, sort_options, RecipeCard,
};

const SELECT_CLASS: &str = "bg-white border border-neutral-300 rounded px-3 py-2 text-sm text-neutral-800 outline-none font-[inherit] focus:border-primary-500";

#[component]
pub fn RecipeList() -> Element {
    let shell = use_shell();
    let view = render(&(shell.state)());

    rsx! {
        div {
            class: "flex flex-col gap-4",
            ListControls {}

            if view.loading {
                p { class: "text-neutral-600 text-sm", "Loading..." }
            }
            if let Some(message) = view.empty_message {
                p { class: "py-8 text-center text-neutral-600", "{message}" }
            }

            div {
                class: "grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4",
                for card in view.cards {
                    RecipeCardItem { key: "{card.id}", card: card.clone() }
                }
            }

            if view.show_pagination {
                Pagination {}
            }
        }
    }
}

#[component]
fn ListControls() -> Element {
    let shell = use_shell();
    let state = (shell.state)();
    let category = state.category.map(|c| c.key()).unwrap_or_default();
    let sort = state.sort.key();

    rsx! {
        div {
            class: "flex flex-wrap gap-3 items-end",
            label {
                class: "flex flex-col gap-1 text-sm text-neutral-700",
                "Category"
                select {
                    class: SELECT_CLASS,
                    value: category,
                    onchange: move |evt: FormEvent| {
                        let category = category_from_option(&evt.value());
                        shell.run(move |app| async move {
                            let _ = app.set_category(category).await;
                        });
                    },
                    for (key, label) in category_options() {
                        option { key: "{key}", value: key, selected: key == category, "{label}" }
                    }
                }
            }
            label {
                class: "flex flex-col gap-1 text-sm text-neutral-700",
                "Sort"
                select {
                    class: SELECT_CLASS,
                    value: sort,
                    onchange: move |evt: FormEvent| {
                        if let Some(sort) = sort_from_option(&evt.value()) {
                            shell.run(move |app| async move {
                                let _ = app.set_sort(sort).await;
                            });
                        }
                    },
                    for (key, label) in sort_options() {
                        option { key: "{key}", value: key, selected: key == sort, "{label}" }
                    }
                }
            }
        }
    }
}

#[component]
fn RecipeCardItem(card: RecipeCard) -> Element {
    let shell = use_shell();
    let id = card.id.clone();

    rsx! {
        div {
            class: "flex flex-col border border-neutral-200 rounded overflow-hidden bg-white",
            if let Some(url) = card.image_url.as_ref() {
                img { class: "w-full h-40 object-cover", src: "{url}", alt: "{card.name}" }
            }
            div {
                class: "flex flex-col gap-1 p-3",
                div {
                    class: "flex items-center justify-between gap-2",
                    h3 { class: "m-0 text-base font-semibold text-neutral-800", "{card.name}" }
                    if card.unpublished {
                        span {
                            class: "px-2 py-0.5 rounded bg-amber-100 text-amber-800 text-xs font-semibold",
                            "UNPUBLISHED"
                        }
                    }
                }
                span { class: "text-sm text-neutral-600", "Category: {card.category}" }
                span { class: "text-sm text-neutral-600", "Publish Date: {card.publish_date}" }
                if card.editable {
                    button {
                        class: "self-start mt-2 px-3 py-1 rounded border border-neutral-300 text-sm",
                        onclick: move |_| {
                            let app = shell.app();
                            app.edit_recipe(&id);
                            shell.publish(&app);
                        },
                        "Edit"
                    }
                }
            }
        }
    }
}

#[component]
fn Pagination() -> Element {
    let shell = use_shell();
    let page_size = (shell.state)().page_size;
    let sizes = shell.app().config().catalog.page_sizes.clone();

    rsx! {
        div {
            class: "flex items-center justify-center gap-3",
            label {
                class: "flex items-center gap-2 text-sm text-neutral-700",
                "Recipes Per Page:"
                select {
                    class: SELECT_CLASS,
                    value: "{page_size}",
                    onchange: move |evt: FormEvent| {
                        if let Ok(size) = evt.value().parse::<usize>() {
                            shell.run(move |app| async move {
                                let _ = app.set_page_size(size).await;
                            });
                        }
                    },
                    for size in sizes {
                        option { key: "{size}", value: "{size}", selected: size == page_size, "{size}" }
                    }
                }
            }
            button {
                class: "px-4 py-2 rounded bg-primary-500 text-white text-sm",
                onclick: move |_| {
                    shell.run(|app| async move {
                        let _ = app.load_more().await;
                    });
                },
                "Load More Recipes"
            }
        }
    }
}
