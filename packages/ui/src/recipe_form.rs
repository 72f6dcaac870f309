//! Add/edit form for signed-in users, with image upload and a confirmed delete.

use api::{Category, Recipe, RecipeDraft};
use chrono::{NaiveDate, Utc};
use dioxus::prelude::*;

use crate::activity_log::{log_activity, LogLevel};
use crate::app::DELETE_PROMPT;
use crate::shell::use_shell;

const INPUT_CLASS: &str = "w-full bg-white border border-neutral-300 rounded px-3 py-2 text-sm text-neutral-800 outline-none font-[inherit] mt-1.5 focus:border-primary-500";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The form, keyed on the recipe being edited so it starts fresh for each one.
#[component]
pub fn RecipeEditor() -> Element {
    let shell = use_shell();
    let current = (shell.state)().current_recipe;
    let key = current.as_ref().map(|r| r.id.clone()).unwrap_or_default();

    rsx! {
        RecipeForm { key: "{key}", recipe: current }
    }
}

fn blank_draft() -> RecipeDraft {
    RecipeDraft {
        name: String::new(),
        category: Category::ALL[0],
        directions: String::new(),
        ingredients: Vec::new(),
        publish_date: Utc::now(),
        is_published: true,
        image_url: None,
    }
}

/// Publish date from a date input, at midnight UTC.
fn parse_publish_date(value: &str) -> Option<chrono::DateTime<Utc>> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

/// One ingredient per non-empty line.
fn parse_ingredients(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[component]
fn RecipeForm(#[props(!optional)] recipe: Option<Recipe>) -> Element {
    let shell = use_shell();
    let editing = recipe.as_ref().map(|r| r.id.clone());
    let initial = recipe.as_ref().map(Recipe::to_draft).unwrap_or_else(blank_draft);

    let mut name = use_signal(|| initial.name.clone());
    let mut category = use_signal(|| initial.category);
    let mut directions = use_signal(|| initial.directions.clone());
    let mut ingredients = use_signal(|| initial.ingredients.join("\n"));
    let mut publish_date = use_signal(|| initial.publish_date.format(DATE_FORMAT).to_string());
    let mut is_published = use_signal(|| initial.is_published);
    let mut image_url = use_signal(|| initial.image_url.clone());
    let mut confirming = use_signal(|| false);

    let upload_progress = (shell.state)().upload_progress;
    let editing_id = editing.clone();

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(date) = parse_publish_date(&publish_date()) else {
            let mut log = shell.log;
            log_activity(&mut log, LogLevel::Error, "Publish date is missing");
            return;
        };
        let draft = RecipeDraft {
            name: name().trim().to_string(),
            category: category(),
            directions: directions(),
            ingredients: parse_ingredients(&ingredients()),
            publish_date: date,
            is_published: is_published(),
            image_url: image_url(),
        };
        let id = editing_id.clone();
        shell.run(move |app| async move {
            let saved = match id {
                Some(id) => app.update_recipe(&id, &draft).await.is_ok(),
                None => app.add_recipe(&draft).await.is_ok(),
            };
            if saved {
                name.set(String::new());
                directions.set(String::new());
                ingredients.set(String::new());
                image_url.set(None);
            }
        });
    };

    let handle_file = move |evt: FormEvent| {
        let Some(files) = evt.files() else {
            return;
        };
        let Some(file_name) = files.files().into_iter().next() else {
            return;
        };
        shell.run(move |app| async move {
            let Some(bytes) = files.read_file(&file_name).await else {
                return;
            };
            if let Ok(url) = app.upload_image(&file_name, &bytes).await {
                image_url.set(Some(url));
            }
        });
    };

    let delete_id = editing.clone();
    let handle_answer = move |answer: bool| {
        confirming.set(false);
        if let Some(id) = delete_id.clone() {
            shell.run(move |app| async move {
                let _ = app.delete_recipe(&id, &move |_: &str| answer).await;
            });
        }
    };

    rsx! {
        form {
            onsubmit: handle_submit,
            class: "flex flex-col gap-3 p-4 border border-neutral-200 rounded bg-white",
            h2 {
                class: "m-0 text-lg font-semibold text-neutral-800",
                if editing.is_some() { "Update Recipe" } else { "Add Recipe" }
            }

            label {
                class: "text-sm text-neutral-700",
                "Recipe Name"
                input {
                    class: INPUT_CLASS,
                    r#type: "text",
                    value: name(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }
            }

            label {
                class: "text-sm text-neutral-700",
                "Category"
                select {
                    class: INPUT_CLASS,
                    value: category().key(),
                    onchange: move |evt: FormEvent| {
                        if let Ok(c) = evt.value().parse::<Category>() {
                            category.set(c);
                        }
                    },
                    for c in Category::ALL {
                        option { value: c.key(), selected: c == category(), {c.label()} }
                    }
                }
            }

            label {
                class: "text-sm text-neutral-700",
                "Directions"
                textarea {
                    class: INPUT_CLASS,
                    rows: "4",
                    value: directions(),
                    oninput: move |evt: FormEvent| directions.set(evt.value()),
                }
            }

            label {
                class: "text-sm text-neutral-700",
                "Ingredients (one per line)"
                textarea {
                    class: INPUT_CLASS,
                    rows: "4",
                    value: ingredients(),
                    oninput: move |evt: FormEvent| ingredients.set(evt.value()),
                }
            }

            label {
                class: "text-sm text-neutral-700",
                "Publish Date"
                input {
                    class: INPUT_CLASS,
                    r#type: "date",
                    value: publish_date(),
                    oninput: move |evt: FormEvent| publish_date.set(evt.value()),
                }
            }

            label {
                class: "flex items-center gap-2 text-sm text-neutral-700",
                input {
                    r#type: "checkbox",
                    checked: is_published(),
                    onchange: move |evt: FormEvent| is_published.set(evt.checked()),
                }
                "Published"
            }

            div {
                class: "flex flex-col gap-2 text-sm text-neutral-700",
                "Recipe Image"
                if let Some(url) = image_url() {
                    img { class: "w-40 h-28 object-cover rounded", src: "{url}" }
                    button {
                        class: "self-start px-3 py-1 rounded border border-neutral-300",
                        r#type: "button",
                        onclick: move |_| {
                            let url = image_url();
                            if let Some(url) = url {
                                shell.run(move |app| async move {
                                    if app.remove_image(&url).await.is_ok() {
                                        image_url.set(None);
                                    }
                                });
                            }
                        },
                        "Delete Image"
                    }
                } else {
                    input {
                        r#type: "file",
                        accept: "image/*",
                        onchange: handle_file,
                    }
                }
                if let Some(percent) = upload_progress {
                    div {
                        class: "w-full h-2 bg-neutral-200 rounded",
                        div { class: "h-2 bg-primary-500 rounded", style: "width: {percent}%" }
                    }
                    span { class: "text-neutral-600", "Uploading {percent}%" }
                }
            }

            div {
                class: "flex gap-2 mt-2",
                button {
                    class: "px-4 py-2 rounded bg-primary-500 text-white text-sm",
                    r#type: "submit",
                    if editing.is_some() { "Update" } else { "Create" }
                }
                if editing.is_some() {
                    button {
                        class: "px-4 py-2 rounded border border-neutral-300 text-sm",
                        r#type: "button",
                        onclick: move |_| {
                            let app = shell.app();
                            app.cancel_edit();
                            shell.publish(&app);
                        },
                        "Cancel"
                    }
                    button {
                        class: "px-4 py-2 rounded bg-red-600 text-white text-sm",
                        r#type: "button",
                        onclick: move |_| confirming.set(true),
                        "Delete"
                    }
                }
            }

            if confirming() {
                ConfirmDialog {
                    message: DELETE_PROMPT.to_string(),
                    on_answer: handle_answer,
                }
            }
        }
    }
}

/// Yes/no prompt for a destructive action.
#[component]
fn ConfirmDialog(message: String, on_answer: EventHandler<bool>) -> Element {
    rsx! {
        div {
            class: "flex flex-col gap-3 p-3 border border-red-200 bg-red-50 rounded",
            p { class: "m-0 text-sm text-red-700", "{message}" }
            div {
                class: "flex gap-2",
                button {
                    class: "px-3 py-1 rounded bg-red-600 text-white text-sm",
                    r#type: "button",
                    onclick: move |_| on_answer.call(true),
                    "Delete"
                }
                button {
                    class: "px-3 py-1 rounded border border-neutral-300 text-sm",
                    r#type: "button",
                    onclick: move |_| on_answer.call(false),
                    "Keep"
                }
            }
        }
    }
}
