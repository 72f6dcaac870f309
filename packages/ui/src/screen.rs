use dioxus::prelude::*;

use crate::activity_log_panel::{ActivityLogPanel, ActivityLogToggle};
use crate::login_form::LoginForm;
use crate::recipe_form::RecipeEditor;
use crate::recipe_list::RecipeList;
use crate::shell::use_shell;

/// Whole recipe page. Must be rendered inside a [`crate::RecipeProvider`].
#[component]
pub fn RecipeScreen() -> Element {
    let shell = use_shell();
    let signed_in = (shell.state)().user.is_some();

    rsx! {
        div {
            class: "flex flex-col gap-6 max-w-5xl mx-auto p-6 font-sans",
            header {
                class: "flex flex-wrap items-start justify-between gap-4",
                h1 { class: "m-0 text-neutral-800 font-bold text-[1.75rem]", "Recipes" }
                div {
                    class: "flex items-start gap-3",
                    LoginForm {}
                    ActivityLogToggle {}
                }
            }
            if signed_in {
                RecipeEditor {}
            }
            RecipeList {}
            ActivityLogPanel {}
        }
    }
}
