//! Shared page layout, styles and number formatting for the HTML views.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

const HTMX_SCRIPT: &str = "https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js";
const HTMX_RESPONSE_TARGETS_SCRIPT: &str =
    "https://unpkg.com/htmx-ext-response-targets@2.0.4/dist/response-targets.min.js";
pub const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";
const TAILWIND_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4";

pub const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

pub const CARD_TITLE_STYLE: &str = "text-sm font-medium text-gray-600 dark:text-gray-400";

pub const FORM_LABEL_STYLE: &str = "block mb-1 text-xs font-medium text-gray-600 dark:text-gray-400";

pub const FORM_INPUT_STYLE: &str = "block w-full p-2 rounded text-sm \
    text-gray-900 dark:text-white bg-gray-50 dark:bg-gray-700 border \
    border-gray-300 dark:border-gray-600 focus:ring-blue-600 \
    focus:border-blue-600";

pub const EMPTY_STATE_STYLE: &str =
    "flex items-center justify-center min-h-[200px] text-sm text-gray-500 dark:text-gray-400";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Octopus Finance" }

                script src=(TAILWIND_SCRIPT) {}
                script src=(HTMX_SCRIPT) {}
                script src=(HTMX_RESPONSE_TARGETS_SCRIPT) {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request.htmx-indicator {
                        display: inline;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
                hx-ext="response-targets"
            {
                (content)

                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Dashboard"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// Format an amount in Brazilian reais with two decimal places, e.g. "R$ 1,234.50".
pub fn format_currency(number: f64) -> String {
    static WHOLE_FMT: OnceLock<Formatter> = OnceLock::new();

    let whole_fmt = WHOLE_FMT.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    let cents = (number.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;
    let sign = if number < 0.0 && cents > 0 { "-" } else { "" };

    // numfmt renders zero as "0" without separators, which is what we want here.
    let whole = if whole == 0 {
        "0".to_owned()
    } else {
        whole_fmt.fmt_string(whole as f64)
    };

    format!("{sign}R$ {whole}.{fraction:02}")
}

/// Format a percentage with one decimal place and an explicit sign for
/// positive values, e.g. "+12.5%".
///
/// Values that round to zero are shown as "0.0%" regardless of their sign.
pub fn format_signed_percentage(value: f64) -> String {
    let value = if (value * 10.0).round() == 0.0 {
        0.0
    } else {
        value
    };

    if value > 0.0 {
        format!("+{value:.1}%")
    } else {
        format!("{value:.1}%")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_currency, format_signed_percentage};

    #[test]
    fn formats_currency_with_two_decimals() {
        assert_eq!(format_currency(0.0), "R$ 0.00");
        assert_eq!(format_currency(89.0), "R$ 89.00");
        assert_eq!(format_currency(450.3), "R$ 450.30");
        assert_eq!(format_currency(-200.05), "-R$ 200.05");
    }

    #[test]
    fn formats_signed_percentage() {
        assert_eq!(format_signed_percentage(12.5), "+12.5%");
        assert_eq!(format_signed_percentage(-3.0), "-3.0%");
        assert_eq!(format_signed_percentage(0.0), "0.0%");
    }

    #[test]
    fn negative_zero_percentage_has_no_sign() {
        assert_eq!(format_signed_percentage(-0.0), "0.0%");
        assert_eq!(format_signed_percentage(-0.04), "0.0%");
        assert_eq!(format_signed_percentage(0.04), "0.0%");
    }
}
