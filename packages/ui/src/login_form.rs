//! Sign-in panel: email/password, registration, federated sign-in, and password
//! reset. Shows the greeting and a sign-out button once someone is signed in.

use dioxus::prelude::*;

use crate::shell::use_shell;
use crate::view::render;

const INPUT_CLASS: &str = "w-full bg-white border border-neutral-300 rounded px-3 py-2 text-sm text-neutral-800 outline-none font-[inherit] focus:border-primary-500";
const BUTTON_CLASS: &str = "px-4 py-2 rounded text-sm font-medium disabled:opacity-50 disabled:cursor-not-allowed";

#[component]
pub fn LoginForm() -> Element {
    let shell = use_shell();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut busy = use_signal(|| false);

    if let Some(greeting) = render(&(shell.state)()).greeting {
        return rsx! {
            div {
                class: "flex items-center justify-between gap-3",
                span { class: "text-neutral-800 font-medium", "{greeting}" }
                button {
                    class: "{BUTTON_CLASS} border border-neutral-300 text-neutral-700",
                    onclick: move |_| {
                        shell.run(|app| async move {
                            let _ = app.sign_out().await;
                        });
                    },
                    "Sign Out"
                }
            }
        };
    }

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let (e, p) = (email().trim().to_string(), password());
        busy.set(true);
        shell.run(move |app| async move {
            if app.sign_in(&e, &p).await.is_ok() {
                password.set(String::new());
            }
            busy.set(false);
        });
    };

    rsx! {
        form {
            onsubmit: handle_login,
            class: "flex flex-col gap-3 w-full max-w-[320px]",

            input {
                class: INPUT_CLASS,
                r#type: "email",
                placeholder: "Email",
                value: email(),
                oninput: move |evt: FormEvent| email.set(evt.value()),
            }
            input {
                class: INPUT_CLASS,
                r#type: "password",
                placeholder: "Password",
                value: password(),
                oninput: move |evt: FormEvent| password.set(evt.value()),
            }

            div {
                class: "flex gap-2",
                button {
                    class: "{BUTTON_CLASS} bg-primary-500 text-white",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign In" }
                }
                button {
                    class: "{BUTTON_CLASS} border border-neutral-300 text-neutral-700",
                    r#type: "button",
                    disabled: busy(),
                    onclick: move |_| {
                        let (e, p) = (email().trim().to_string(), password());
                        shell.run(move |app| async move {
                            let _ = app.register(&e, &p).await;
                        });
                    },
                    "Create Account"
                }
            }

            button {
                class: "{BUTTON_CLASS} bg-[#4285f4] text-white hover:bg-[#357abd]",
                r#type: "button",
                disabled: busy(),
                onclick: move |_| {
                    shell.run(|app| async move {
                        let _ = app.sign_in_federated().await;
                    });
                },
                "Continue with Google"
            }

            button {
                class: "self-start text-sm text-primary-500 bg-transparent border-none p-0 cursor-pointer",
                r#type: "button",
                onclick: move |_| {
                    let e = email().trim().to_string();
                    shell.run(move |app| async move {
                        let _ = app.send_password_reset(&e).await;
                    });
                },
                "Forgot password?"
            }
        }
    }
}
