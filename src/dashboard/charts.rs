//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations of the filtered records:
//! - **Expense distribution**: Pie chart of expenses per category
//! - **Evolution**: Income and expenses per day
//! - **Monthly comparison**: Income and expenses per month for the last six months
//! - **Category evolution**: Totals per day for a single category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.
//! Chart builders return `None` when there is nothing to plot so the view can
//! show an empty state instead.

use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    element::{
        AreaStyle, AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, ItemStyle,
        JsFunction, Label, Tooltip, Trigger,
    },
    series::{Line, Pie, bar},
};
use maud::{Markup, PreEscaped, html};
use time::{Date, Month};

use crate::{
    grouping::{GroupedTotals, day_key, group_sum, month_key, top_n},
    html::{CARD_STYLE, EMPTY_STATE_STYLE, HeadElement},
    record::{RecordKind, TransactionRecord, is_expense_category},
};

/// The number of months shown in the monthly comparison chart.
const MONTHLY_COMPARISON_MONTHS: usize = 6;

const INCOME_COLOR: &str = "#22c55e";
const EXPENSE_COLOR: &str = "#ef4444";

const PIE_COLORS: [&str; 12] = [
    "#d97757", "#22c55e", "#eab308", "#3b82f6", "#8b5cf6", "#ec4899", "#06b6d4", "#f97316",
    "#14b8a6", "#6366f1", "#84cc16", "#a855f7",
];

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl DashboardChart {
    pub(super) fn new(id: &'static str, chart: Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// Renders a card holding a chart container, or `empty_message` if there is no chart.
pub(super) fn chart_panel(
    title: &str,
    controls: Markup,
    chart: Option<&DashboardChart>,
    empty_message: &str,
) -> Markup {
    html!(
        div class=(CARD_STYLE)
        {
            div class="flex flex-wrap items-center justify-between gap-2 mb-4"
            {
                h3 class="text-lg font-semibold" { (title) }
                (controls)
            }

            @match chart {
                Some(chart) => {
                    div
                        id=(chart.id)
                        class="min-h-[320px] rounded"
                    {}
                }
                None => {
                    div class=(EMPTY_STATE_STYLE) { (empty_message) }
                }
            }
        }
    )
}

/// Disposes of existing chart instances before htmx swaps in new dashboard content.
pub(super) fn chart_cleanup_script() -> HeadElement {
    HeadElement::ScriptSource(PreEscaped(
        r#"document.addEventListener('htmx:beforeSwap', function(event) {
            if (event.detail.target.id !== 'dashboard-content') {
                return;
            }

            event.detail.target.querySelectorAll('[_echarts_instance_]').forEach(function(element) {
                const chart = echarts.getInstanceByDom(element);
                if (chart) {
                    chart.dispose();
                }
            });
        });"#
            .to_owned(),
    ))
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// The script is rendered inline after the chart containers so that it runs
/// both on the initial page load and when htmx swaps in new content.
pub(super) fn charts_script(charts: &[DashboardChart]) -> Markup {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', function() {{
                        if (!chart.isDisposed()) {{
                            chart.resize();
                        }}
                    }});

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        if (chart.isDisposed()) {{
                            return;
                        }}
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html!(script { (PreEscaped(script_content)) })
}

/// Pie chart of the expense total per category, largest first.
///
/// Percentage labels are hidden for slices below 5%.
pub(super) fn expense_pie_chart(records: &[TransactionRecord]) -> Option<Chart> {
    let expenses_by_category = group_sum(
        records.iter().filter(|record| record.is_expense()),
        |record| record.category().to_owned(),
        TransactionRecord::amount,
    );

    if expenses_by_category.is_empty() {
        return None;
    }

    let data: Vec<(f64, String)> = top_n(&expenses_by_category, expenses_by_category.len())
        .into_iter()
        .map(|(category, total)| (total, category))
        .collect();

    Some(
        Chart::new()
            .color(PIE_COLORS.iter().map(|&color| Color::from(color)).collect())
            .tooltip(
                Tooltip::new()
                    .trigger(Trigger::Item)
                    .value_formatter(currency_formatter()),
            )
            .legend(Legend::new().bottom(0))
            .series(
                Pie::new()
                    .name(RecordKind::Expense.label())
                    .radius(vec!["40%", "70%"])
                    .label(Label::new().formatter(pie_label_formatter()))
                    .data(data),
            ),
    )
}

/// Line chart of income and expenses per day, in date order.
pub(super) fn evolution_chart(records: &[TransactionRecord]) -> Option<Chart> {
    let series = IncomeExpenseSeries::from_records(records, day_key);

    if series.is_empty() {
        return None;
    }

    let labels = series.labels(format_day_label);

    Some(
        axis_chart(labels)
            .legend(Legend::new())
            .series(
                Line::new()
                    .name(RecordKind::Income.label())
                    .item_style(ItemStyle::new().color(INCOME_COLOR))
                    .data(series.income),
            )
            .series(
                Line::new()
                    .name(RecordKind::Expense.label())
                    .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                    .data(series.expense),
            ),
    )
}

/// Bar chart of income and expenses per month, limited to the most recent six months.
pub(super) fn monthly_comparison_chart(records: &[TransactionRecord]) -> Option<Chart> {
    let series = IncomeExpenseSeries::from_records(records, month_key)
        .last_n(MONTHLY_COMPARISON_MONTHS);

    if series.is_empty() {
        return None;
    }

    let labels = series.labels(format_month_label);

    Some(
        axis_chart(labels)
            .legend(Legend::new())
            .series(
                bar::Bar::new()
                    .name(RecordKind::Income.label())
                    .item_style(ItemStyle::new().color(INCOME_COLOR))
                    .data(series.income),
            )
            .series(
                bar::Bar::new()
                    .name(RecordKind::Expense.label())
                    .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                    .data(series.expense),
            ),
    )
}

/// Area chart of the daily totals for `category`.
///
/// Expense categories plot their expenses, other categories plot their income.
/// Setting `show_income` adds the income series to expense categories too.
pub(super) fn category_evolution_chart(
    records: &[TransactionRecord],
    category: &str,
    show_income: bool,
) -> Option<Chart> {
    let in_category: Vec<TransactionRecord> = records
        .iter()
        .filter(|record| record.category() == category)
        .cloned()
        .collect();
    let series = IncomeExpenseSeries::from_records(&in_category, day_key);

    if series.is_empty() {
        return None;
    }

    let is_expense_category = is_expense_category(category);
    let labels = series.labels(format_day_label);
    let mut chart = axis_chart(labels).legend(Legend::new());

    if is_expense_category {
        chart = chart.series(
            Line::new()
                .name(RecordKind::Expense.label())
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .area_style(AreaStyle::new())
                .data(series.expense),
        );
    }

    if show_income || !is_expense_category {
        chart = chart.series(
            Line::new()
                .name(RecordKind::Income.label())
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .area_style(AreaStyle::new())
                .data(series.income),
        );
    }

    Some(chart)
}

/// Per-bucket income and expense totals, with buckets in ascending order.
#[derive(Debug, Clone, PartialEq)]
struct IncomeExpenseSeries {
    keys: Vec<String>,
    income: Vec<f64>,
    expense: Vec<f64>,
}

impl IncomeExpenseSeries {
    /// Group `records` into buckets named by `bucket_key`.
    ///
    /// Bucket keys must sort in chronological order, e.g. `YYYY-MM`.
    fn from_records(records: &[TransactionRecord], bucket_key: fn(Date) -> String) -> Self {
        let totals_for = |kind: RecordKind| -> GroupedTotals<String> {
            group_sum(
                records.iter().filter(|record| record.kind() == kind),
                |record| bucket_key(record.posted_date()),
                TransactionRecord::amount,
            )
        };
        let income_totals = totals_for(RecordKind::Income);
        let expense_totals = totals_for(RecordKind::Expense);

        let mut keys: Vec<String> = income_totals
            .iter()
            .chain(expense_totals.iter())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys.dedup();

        let income = keys
            .iter()
            .map(|key| income_totals.get(key).unwrap_or(0.0))
            .collect();
        let expense = keys
            .iter()
            .map(|key| expense_totals.get(key).unwrap_or(0.0))
            .collect();

        Self {
            keys,
            income,
            expense,
        }
    }

    fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keep only the last `n` buckets.
    fn last_n(mut self, n: usize) -> Self {
        let skip = self.keys.len().saturating_sub(n);
        self.keys.drain(..skip);
        self.income.drain(..skip);
        self.expense.drain(..skip);
        self
    }

    fn labels(&self, format_label: fn(&str) -> String) -> Vec<String> {
        self.keys.iter().map(|key| format_label(key)).collect()
    }
}

/// Converts a `YYYY-MM-DD` key into "dd/MM".
fn format_day_label(key: &str) -> String {
    match (key.get(5..7), key.get(8..10)) {
        (Some(month), Some(day)) => format!("{day}/{month}"),
        _ => key.to_owned(),
    }
}

/// Converts a `YYYY-MM` key into "Mon/yy", e.g. "Jan/24".
fn format_month_label(key: &str) -> String {
    let month = key
        .get(5..7)
        .and_then(|month| month.parse::<u8>().ok())
        .and_then(|month| Month::try_from(month).ok());

    match (month, key.get(2..4)) {
        (Some(month), Some(year)) => format!("{}/{year}", &month.to_string()[..3]),
        _ => key.to_owned(),
    }
}

/// A chart with a category x-axis of `labels` and a currency y-axis.
fn axis_chart(labels: Vec<String>) -> Chart {
    Chart::new()
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

fn pie_label_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "params",
        "return params.percent < 5 ? '' : params.percent.toFixed(0) + '%';",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        grouping::{day_key, month_key},
        test_utils::{expense, finalise_all, income},
    };

    use super::{
        DashboardChart, IncomeExpenseSeries, category_evolution_chart, charts_script,
        evolution_chart, expense_pie_chart, format_day_label, format_month_label,
        monthly_comparison_chart,
    };

    #[test]
    fn series_buckets_are_sorted_and_aligned() {
        let records = finalise_all([
            expense(300.0, date!(2024 - 01 - 20), "Groceries"),
            income(1000.0, date!(2024 - 01 - 15), "Website"),
            expense(500.0, date!(2024 - 01 - 15), "Rent"),
            expense(50.0, date!(2024 - 01 - 20), "Fast Food"),
        ]);

        let series = IncomeExpenseSeries::from_records(&records, day_key);

        assert_eq!(series.keys, vec!["2024-01-15", "2024-01-20"]);
        assert_eq!(series.income, vec![1000.0, 0.0]);
        assert_eq!(series.expense, vec![500.0, 350.0]);
    }

    #[test]
    fn monthly_series_keeps_last_six_months() {
        let records = finalise_all(
            (1..=8u8).map(|month| {
                let date = time::Date::from_calendar_date(
                    2024,
                    time::Month::try_from(month).unwrap(),
                    10,
                )
                .unwrap();
                expense(f64::from(month), date, "Rent")
            }),
        );

        let series = IncomeExpenseSeries::from_records(&records, month_key).last_n(6);

        assert_eq!(series.keys.first().map(String::as_str), Some("2024-03"));
        assert_eq!(series.keys.len(), 6);
        assert_eq!(series.expense, vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn charts_are_none_without_data() {
        let only_income = finalise_all([income(1000.0, date!(2024 - 01 - 15), "Website")]);

        assert!(expense_pie_chart(&only_income).is_none());
        assert!(evolution_chart(&[]).is_none());
        assert!(monthly_comparison_chart(&[]).is_none());
        assert!(category_evolution_chart(&only_income, "Rent", false).is_none());
    }

    #[test]
    fn pie_chart_lists_expense_categories_largest_first() {
        let records = finalise_all([
            expense(100.0, date!(2024 - 01 - 10), "Transport"),
            expense(500.0, date!(2024 - 01 - 11), "Rent"),
            income(900.0, date!(2024 - 01 - 12), "Website"),
        ]);

        let options = expense_pie_chart(&records).unwrap().to_string();

        let rent = options.find("\"Rent\"").unwrap();
        let transport = options.find("\"Transport\"").unwrap();
        assert!(rent < transport, "expected Rent before Transport in {options}");
        assert!(!options.contains("Website"));
    }

    #[test]
    fn category_evolution_shows_income_for_income_categories() {
        let records = finalise_all([
            income(1000.0, date!(2024 - 01 - 15), "Website"),
            expense(200.0, date!(2024 - 01 - 16), "Rent"),
        ]);

        let website = category_evolution_chart(&records, "Website", false)
            .unwrap()
            .to_string();
        let rent = category_evolution_chart(&records, "Rent", false)
            .unwrap()
            .to_string();
        let rent_with_income = category_evolution_chart(&records, "Rent", true)
            .unwrap()
            .to_string();

        assert!(website.contains("\"Income\"") && !website.contains("\"Expenses\""));
        assert!(rent.contains("\"Expenses\"") && !rent.contains("\"Income\""));
        assert!(rent_with_income.contains("\"Expenses\"") && rent_with_income.contains("\"Income\""));
    }

    #[test]
    fn formats_axis_labels() {
        assert_eq!(format_day_label("2024-01-05"), "05/01");
        assert_eq!(format_month_label("2024-01"), "Jan/24");
        assert_eq!(format_month_label("2023-12"), "Dec/23");
    }

    #[test]
    fn script_initialises_each_chart() {
        let charts = [
            DashboardChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let script = charts_script(&charts).into_string();

        assert!(script.contains("document.getElementById(\"first-chart\")"));
        assert!(script.contains("document.getElementById(\"second-chart\")"));
    }
}
