//! Alert system for displaying error messages to users.
//!
//! Alerts are swapped into the `#alert-container` element of the base page by
//! htmx when a partial update fails.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A dismissable message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Something went wrong, `details` tells the user how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        match self {
            Alert::Error { message, details } => html! {
                div
                    role="alert"
                    class="flex items-start p-4 mb-4 text-red-800 border border-red-300
                        rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400
                        dark:border-red-800"
                {
                    div class="ms-3 text-sm"
                    {
                        span class="font-semibold" { (message) }

                        @if !details.is_empty() {
                            p { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Close"
                        class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex
                            items-center justify-center h-8 w-8 hover:bg-red-200
                            dark:hover:bg-gray-700"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            },
        }
    }

    /// Render the alert with `status` and tell htmx to show the alert container.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (
            status,
            [("HX-Retarget", "#alert-container"), ("HX-Reswap", "innerHTML")],
            self.into_html(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let alert = Alert::Error {
            message: "Invalid date range".to_owned(),
            details: "Pick a start date on or before the end date.".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().into_string());
        let selector = Selector::parse("div[role='alert']").unwrap();
        let text = html
            .select(&selector)
            .next()
            .expect("alert not found")
            .text()
            .collect::<String>();

        assert!(text.contains("Invalid date range"));
        assert!(text.contains("Pick a start date on or before the end date."));
    }

    #[test]
    fn response_retargets_alert_container() {
        let response = Alert::Error {
            message: "Oops".to_owned(),
            details: String::new(),
        }
        .into_response_with_status(StatusCode::BAD_REQUEST);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("HX-Retarget").unwrap(),
            "#alert-container"
        );
    }
}
