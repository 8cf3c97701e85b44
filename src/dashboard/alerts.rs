//! The AI alerts card.

use maud::{Markup, html};

use crate::{
    ai_alert::{AiAlert, AlertPriority},
    html::{CARD_STYLE, EMPTY_STATE_STYLE},
};

fn priority_badge_style(priority: AlertPriority) -> &'static str {
    match priority {
        AlertPriority::Low => "text-green-700 bg-green-100 dark:text-green-300 dark:bg-green-900",
        AlertPriority::Medium => {
            "text-yellow-700 bg-yellow-100 dark:text-yellow-300 dark:bg-yellow-900"
        }
        AlertPriority::High => "text-red-700 bg-red-100 dark:text-red-300 dark:bg-red-900",
    }
}

pub(super) fn ai_alerts_view(alerts: &[AiAlert]) -> Markup {
    html! {
        section id="ai-alerts" class={(CARD_STYLE) " w-full mb-8"}
        {
            div class="mb-4"
            {
                h2 class="text-lg font-semibold" { "AI alerts" }
                p class="text-xs text-gray-500 dark:text-gray-400"
                {
                    "Automatic insights about your finances"
                }
            }

            @if alerts.is_empty() {
                div class=(EMPTY_STATE_STYLE) { "No alerts right now" }
            } @else {
                ul class="space-y-3 max-h-[280px] overflow-y-auto pr-2"
                {
                    @for alert in alerts {
                        li
                            class="p-4 rounded-lg border border-gray-200 dark:border-gray-700"
                            data-priority=(alert.priority.label())
                        {
                            p class="text-sm leading-relaxed" { (alert.message) }

                            div class="flex items-center gap-3 mt-3"
                            {
                                span
                                    class={"text-xs font-medium px-2 py-0.5 rounded-full "
                                        (priority_badge_style(alert.priority))}
                                {
                                    (alert.priority.label())
                                }
                                span class="text-xs text-gray-500 dark:text-gray-400"
                                {
                                    (alert.display_timestamp())
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
