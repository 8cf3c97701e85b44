//! Controls for choosing which records the dashboard summarises.
//!
//! All controls are rendered inside the `#dashboard-filters` form so that any
//! change re-requests the dashboard content with the full set of options.

use maud::{Markup, html};
use time::Date;

use crate::{
    filter::{DateFilter, DateFilterKind},
    html::{FORM_INPUT_STYLE, FORM_LABEL_STYLE},
    owner::{ClientOption, OwnerId},
    record::{EXPENSE_CATEGORIES, INCOME_CATEGORIES},
};

/// The ID of the form that wraps the dashboard content.
pub(super) const FILTER_FORM_ID: &str = "dashboard-filters";

pub(super) fn filter_bar_view(
    filter: &DateFilter,
    clients: &[ClientOption],
    selected_client: Option<OwnerId>,
) -> Markup {
    let kind = filter.kind();
    let (start, end) = match filter {
        DateFilter::Custom { start, end } => (*start, *end),
        _ => (None, None),
    };

    html! {
        div
            id="filter-bar"
            class="flex flex-wrap items-end gap-4 w-full mb-8 p-4 rounded-lg
                bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700"
        {
            div
            {
                label for="range" class=(FORM_LABEL_STYLE) { "Period" }
                select id="range" name="range" class=(FORM_INPUT_STYLE)
                {
                    @for option in DateFilterKind::ALL {
                        option
                            value=(option.as_query_value())
                            selected[option == kind]
                        {
                            (option.label())
                        }
                    }
                }
            }

            @if kind == DateFilterKind::Custom {
                (date_input("start", "From", start))
                (date_input("end", "To", end))
            }

            div
            {
                label for="client" class=(FORM_LABEL_STYLE) { "Client" }
                select id="client" name="client" class=(FORM_INPUT_STYLE)
                {
                    option value="" selected[selected_client.is_none()] { "All clients" }

                    @for client in clients {
                        option
                            value=(client.id)
                            selected[selected_client == Some(client.id)]
                        {
                            (client.label)
                        }
                    }
                }
            }

            span
                id="filter-label"
                class="ml-auto px-3 py-2 text-sm font-medium rounded-full
                    text-blue-800 bg-blue-100 dark:bg-blue-900 dark:text-blue-300"
            {
                (filter.label())
            }
        }
    }
}

fn date_input(name: &str, label: &str, value: Option<Date>) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            input
                type="date"
                id=(name)
                name=(name)
                value=[value]
                class=(FORM_INPUT_STYLE);
        }
    }
}

/// The category picker and income toggle for the category evolution chart.
pub(super) fn category_controls_view(category: &str, show_income: bool) -> Markup {
    html! {
        div id="category-controls" class="flex items-center gap-3"
        {
            select
                id="category"
                name="category"
                aria-label="Category"
                class=(FORM_INPUT_STYLE)
            {
                optgroup label="Expenses"
                {
                    @for option in EXPENSE_CATEGORIES {
                        option value=(option) selected[option == category] { (option) }
                    }
                }
                optgroup label="Income"
                {
                    @for option in INCOME_CATEGORIES {
                        option value=(option) selected[option == category] { (option) }
                    }
                }
            }

            label class="flex items-center gap-2 text-sm whitespace-nowrap"
            {
                input
                    type="checkbox"
                    name="show_income"
                    value="on"
                    checked[show_income]
                    class="rounded-sm border-gray-300 text-blue-600";
                "Show income"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        filter::DateFilter,
        owner::{ClientOption, OwnerId},
    };

    use super::{category_controls_view, filter_bar_view};

    fn selected_values(html: &Html, select_id: &str) -> Vec<String> {
        let selector = Selector::parse(&format!("#{select_id} option[selected]")).unwrap();

        html.select(&selector)
            .map(|option| option.value().attr("value").unwrap_or_default().to_owned())
            .collect()
    }

    #[test]
    fn selects_current_range_and_client() {
        let client = OwnerId::new(554899999999);
        let clients = [ClientOption {
            id: client,
            label: "+55 48 99999-999".to_owned(),
        }];

        let html = Html::parse_fragment(
            &filter_bar_view(&DateFilter::Last7Days, &clients, Some(client)).into_string(),
        );

        assert_eq!(selected_values(&html, "range"), ["last-7-days"]);
        assert_eq!(selected_values(&html, "client"), ["554899999999"]);
    }

    #[test]
    fn defaults_to_all_clients() {
        let html =
            Html::parse_fragment(&filter_bar_view(&DateFilter::default(), &[], None).into_string());

        assert_eq!(selected_values(&html, "client"), [""]);
    }

    #[test]
    fn shows_date_inputs_only_for_custom_range() {
        let date_inputs = Selector::parse("input[type=date]").unwrap();

        let html = Html::parse_fragment(
            &filter_bar_view(&DateFilter::Last30Days, &[], None).into_string(),
        );
        assert_eq!(html.select(&date_inputs).count(), 0);

        let filter =
            DateFilter::custom(Some(date!(2024 - 01 - 05)), Some(date!(2024 - 01 - 20))).unwrap();
        let html = Html::parse_fragment(&filter_bar_view(&filter, &[], None).into_string());

        let values: Vec<_> = html
            .select(&date_inputs)
            .map(|input| input.value().attr("value").unwrap())
            .collect();
        assert_eq!(values, ["2024-01-05", "2024-01-20"]);

        let label = Selector::parse("#filter-label").unwrap();
        let text = html.select(&label).next().unwrap().text().collect::<String>();
        assert_eq!(text.trim(), "05/01 - 20/01");
    }

    #[test]
    fn category_controls_select_current_category() {
        let html = Html::parse_fragment(&category_controls_view("Website", true).into_string());

        assert_eq!(selected_values(&html, "category"), ["Website"]);

        let checkbox = Selector::parse("input[name=show_income][checked]").unwrap();
        assert_eq!(html.select(&checkbox).count(), 1);
    }
}
