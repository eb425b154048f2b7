use maud::{DOCTYPE, Markup, Render, html};

const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-white border-gray-300 text-gray-900";
const INVALID_INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-white border-red-500 text-gray-900";

pub fn render_page(markup: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8" {}
                meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                title { "Student Information Management" }
            }
            body class="min-h-screen bg-gradient-to-br from-blue-50 to-indigo-100" {
                (markup)
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h2 class="text-2xl font-semibold mb-4 text-gray-900" {(s)}
    }
}

/// A labelled form control with its error message, if any, underneath.
pub fn form_element(
    id: &str,
    label: &str,
    required: bool,
    error: Option<&str>,
    control: impl FnOnce(&'static str) -> Markup,
) -> Markup {
    let classes = if error.is_some() {
        INVALID_INPUT_CLASSES
    } else {
        INPUT_CLASSES
    };

    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-700" {
                (label)
                @if required {
                    span class="text-red-500" {" *"}
                }
            }
            (control(classes))
            @if let Some(error) = error {
                p class="mt-1 text-sm text-red-600" {(error)}
            }
        }
    }
}

pub fn text_input(id: &str, kind: &str, value: &str) -> impl FnOnce(&'static str) -> Markup {
    move |classes| {
        html! {
            input type=(kind) id=(id) name=(id) value=(value) class=(classes) {}
        }
    }
}

pub fn textarea(id: &str, value: &str) -> impl FnOnce(&'static str) -> Markup {
    move |classes| {
        html! {
            textarea id=(id) name=(id) rows="3" class=(classes) {(value)}
        }
    }
}

pub fn select<'a>(
    id: &'a str,
    placeholder: &'a str,
    options: &'a [&'a str],
    selected: &'a str,
) -> impl FnOnce(&'static str) -> Markup + 'a {
    move |classes| {
        html! {
            select id=(id) name=(id) class=(classes) {
                option value="" selected[selected.is_empty()] {(placeholder)}
                @for choice in options {
                    option value=(choice) selected[*choice == selected] {(choice)}
                }
            }
        }
    }
}

pub fn detail_row(label: &str, value: impl Render) -> Markup {
    html! {
        div class="flex flex-col py-2 border-b border-gray-200" {
            dt class="text-sm font-medium text-gray-500" {(label)}
            dd class="text-gray-900" {(value)}
        }
    }
}
