//! KPI cards shown at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    html::{CARD_STYLE, CARD_TITLE_STYLE, format_currency, format_signed_percentage},
    kpi::KpiSummary,
};

/// How a card's value should be coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardVariant {
    Positive,
    Negative,
    Neutral,
}

impl CardVariant {
    fn value_style(self) -> &'static str {
        match self {
            CardVariant::Positive => "text-green-600 dark:text-green-400",
            CardVariant::Negative => "text-red-600 dark:text-red-400",
            CardVariant::Neutral => "text-gray-900 dark:text-white",
        }
    }

    fn name(self) -> &'static str {
        match self {
            CardVariant::Positive => "positive",
            CardVariant::Negative => "negative",
            CardVariant::Neutral => "neutral",
        }
    }
}

struct KpiCard {
    id: &'static str,
    title: &'static str,
    value: String,
    subtitle: Option<String>,
    variant: CardVariant,
}

/// Renders the six KPI cards for `kpis`.
pub(super) fn kpi_cards_view(kpis: &KpiSummary) -> Markup {
    let balance_variant = if kpis.balance >= 0.0 {
        CardVariant::Positive
    } else {
        CardVariant::Negative
    };

    // Spending more than last month is bad news.
    let variation_variant = if kpis.month_over_month_variation_pct <= 0.0 {
        CardVariant::Positive
    } else {
        CardVariant::Negative
    };

    let cards = [
        KpiCard {
            id: "kpi-balance",
            title: "Total balance",
            value: format_currency(kpis.balance),
            subtitle: None,
            variant: balance_variant,
        },
        KpiCard {
            id: "kpi-income",
            title: "Total income",
            value: format_currency(kpis.total_income),
            subtitle: None,
            variant: CardVariant::Positive,
        },
        KpiCard {
            id: "kpi-expenses",
            title: "Total expenses",
            value: format_currency(kpis.total_expense),
            subtitle: None,
            variant: CardVariant::Negative,
        },
        KpiCard {
            id: "kpi-average",
            title: "Average spending",
            value: format_currency(kpis.average_expense),
            subtitle: Some("Selected period".to_owned()),
            variant: CardVariant::Neutral,
        },
        KpiCard {
            id: "kpi-top-category",
            title: "Top category",
            value: kpis
                .top_expense_category
                .as_ref()
                .map_or_else(|| "-".to_owned(), |category| category.name.clone()),
            subtitle: kpis
                .top_expense_category
                .as_ref()
                .map(|category| format_currency(category.value)),
            variant: CardVariant::Neutral,
        },
        KpiCard {
            id: "kpi-variation",
            title: "Monthly variation",
            value: format_signed_percentage(kpis.month_over_month_variation_pct),
            subtitle: Some("vs previous month".to_owned()),
            variant: variation_variant,
        },
    ];

    html! {
        section
            id="kpi-cards"
            class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 xl:grid-cols-6 gap-4 w-full mb-8"
        {
            @for card in &cards {
                (kpi_card(card))
            }
        }
    }
}

fn kpi_card(card: &KpiCard) -> Markup {
    html! {
        div
            id=(card.id)
            class=(CARD_STYLE)
            data-variant=(card.variant.name())
        {
            p class=(CARD_TITLE_STYLE) { (card.title) }

            p class={"mt-2 text-2xl font-bold truncate " (card.variant.value_style())}
                title=(card.value)
            {
                (card.value)
            }

            @if let Some(subtitle) = &card.subtitle {
                p class="mt-1 text-xs text-gray-500 dark:text-gray-400" { (subtitle) }
            }
        }
    }
}
