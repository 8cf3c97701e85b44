//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page and the JSON summary
//! - The query parameters shared by both handlers
//! - HTML view functions for the full page and the htmx partial

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Date, macros::format_description};

use crate::{
    AppState, Error,
    ai_alert::AiAlert,
    dashboard::{
        alerts::ai_alerts_view,
        cards::kpi_cards_view,
        charts::{
            DashboardChart, category_evolution_chart, chart_cleanup_script, chart_panel,
            charts_script, evolution_chart, expense_pie_chart, monthly_comparison_chart,
        },
        filter_bar::{FILTER_FORM_ID, category_controls_view, filter_bar_view},
        ranking::{RANKING_SIZE, RankedCategory, rank_expense_categories, ranking_view},
    },
    endpoints,
    filter::{DateFilter, DateFilterKind, filter_records},
    html::{ECHARTS_SCRIPT, HeadElement, base},
    kpi::{KpiSummary, summarize},
    owner::{ClientOption, OwnerId, unique_clients},
    record::{EXPENSE_CATEGORIES, TransactionRecord},
    repository::RecordRepository,
    timezone::current_local_datetime,
};

const EXPENSE_PIE_CHART_ID: &str = "expense-pie-chart";
const EVOLUTION_CHART_ID: &str = "evolution-chart";
const MONTHLY_COMPARISON_CHART_ID: &str = "monthly-comparison-chart";
const CATEGORY_EVOLUTION_CHART_ID: &str = "category-evolution-chart";

/// The state needed for displaying the dashboard.
#[derive(Clone)]
pub struct DashboardState {
    /// Where records and alerts are loaded from.
    pub repository: Arc<dyn RecordRepository>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The filter options submitted by the dashboard form.
///
/// Empty strings are treated as missing values since that is what the browser
/// sends for blank inputs.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The kind of date filter, defaults to the last 30 days.
    pub range: Option<DateFilterKind>,
    /// The first day of a custom range, formatted as `YYYY-MM-DD`.
    pub start: Option<String>,
    /// The last day of a custom range, formatted as `YYYY-MM-DD`.
    pub end: Option<String>,
    /// The ID of the client to show, all clients if missing.
    pub client: Option<String>,
    /// The category plotted in the category evolution chart.
    pub category: Option<String>,
    /// Whether the category evolution chart also plots income.
    pub show_income: Option<String>,
}

impl DashboardQuery {
    fn date_filter(&self) -> Result<DateFilter, Error> {
        let start = parse_optional_date(self.start.as_deref())?;
        let end = parse_optional_date(self.end.as_deref())?;

        DateFilter::from_parts(self.range.unwrap_or_default(), start, end)
    }

    fn owner_id(&self) -> Result<Option<OwnerId>, Error> {
        match non_empty(self.client.as_deref()) {
            Some(client) => client.parse().map(Some),
            None => Ok(None),
        }
    }

    fn category(&self) -> String {
        non_empty(self.category.as_deref())
            .unwrap_or(EXPENSE_CATEGORIES[0])
            .to_owned()
    }

    fn show_income(&self) -> bool {
        non_empty(self.show_income.as_deref()).is_some_and(|value| value != "false")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<Date>, Error> {
    match non_empty(value) {
        Some(text) => Date::parse(text, format_description!("[year]-[month]-[day]"))
            .map(Some)
            .map_err(|_| Error::InvalidDate(text.to_owned())),
        None => Ok(None),
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    filter: DateFilter,
    owner_id: Option<OwnerId>,
    clients: Vec<ClientOption>,
    kpis: KpiSummary,
    alerts: Vec<AiAlert>,
    charts: Vec<DashboardChart>,
    ranking: Vec<RankedCategory>,
    category: String,
    show_income: bool,
}

impl DashboardData {
    fn chart(&self, id: &str) -> Option<&DashboardChart> {
        self.charts.iter().find(|chart| chart.id == id)
    }
}

/// The records selected by a [DashboardQuery] and their summary.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// The date filter that was applied.
    pub filter: DateFilter,
    /// The records that passed the filter.
    pub records: Vec<TransactionRecord>,
    /// The KPIs computed from `records`.
    pub kpis: KpiSummary,
}

/// Display the dashboard for the records selected by the query parameters.
///
/// htmx requests receive only the dashboard content so that the filter form
/// can swap it in place.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let data = match build_dashboard_data(&query, &state) {
        Ok(data) => data,
        Err(error) if is_htmx_request => return error.into_alert_response(),
        Err(error) => return error.into_response(),
    };

    if is_htmx_request {
        dashboard_content_view(&data).into_response()
    } else {
        dashboard_view(&data).into_response()
    }
}

/// Get the filtered records and their KPIs as JSON.
pub async fn get_summary(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<SummaryResponse>, Error> {
    let filter = query.date_filter()?;
    let owner_id = query.owner_id()?;
    let now = current_local_datetime(&state.local_timezone)?;

    let all_records = state
        .repository
        .list(None)
        .inspect_err(|error| tracing::error!("could not load records: {error}"))?;
    let records = filter_records(&all_records, owner_id, &filter, now);
    let kpis = summarize(&records, &all_records, owner_id, now.date());

    Ok(Json(SummaryResponse {
        filter,
        records,
        kpis,
    }))
}

/// Fetches and builds all data needed for the dashboard display.
///
/// # Errors
/// Returns an error if the query is invalid, the timezone is invalid or the
/// repository fails.
fn build_dashboard_data(
    query: &DashboardQuery,
    state: &DashboardState,
) -> Result<DashboardData, Error> {
    let filter = query.date_filter()?;
    let owner_id = query.owner_id()?;
    let now = current_local_datetime(&state.local_timezone)?;

    let all_records = state
        .repository
        .list(None)
        .inspect_err(|error| tracing::error!("could not load records: {error}"))?;
    let alerts = state
        .repository
        .list_alerts(owner_id)
        .inspect_err(|error| tracing::error!("could not load alerts: {error}"))?;

    let filtered = filter_records(&all_records, owner_id, &filter, now);
    let kpis = summarize(&filtered, &all_records, owner_id, now.date());

    let category = query.category();
    let show_income = query.show_income();

    Ok(DashboardData {
        filter,
        owner_id,
        clients: unique_clients(&all_records),
        kpis,
        alerts,
        charts: build_dashboard_charts(&filtered, &category, show_income),
        ranking: rank_expense_categories(&filtered, RANKING_SIZE),
        category,
        show_income,
    })
}

/// Creates the charts that have data to plot.
fn build_dashboard_charts(
    records: &[TransactionRecord],
    category: &str,
    show_income: bool,
) -> Vec<DashboardChart> {
    [
        (EXPENSE_PIE_CHART_ID, expense_pie_chart(records)),
        (EVOLUTION_CHART_ID, evolution_chart(records)),
        (MONTHLY_COMPARISON_CHART_ID, monthly_comparison_chart(records)),
        (
            CATEGORY_EVOLUTION_CHART_ID,
            category_evolution_chart(records, category, show_income),
        ),
    ]
    .into_iter()
    .filter_map(|(id, chart)| chart.map(|chart| DashboardChart::new(id, chart)))
    .collect()
}

/// Renders the full dashboard page.
fn dashboard_view(data: &DashboardData) -> Markup {
    let content = html!(
        div
            class="flex flex-col items-center px-2 lg:px-6 py-4 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="flex items-center justify-between w-full mb-6"
            {
                h1 class="text-2xl font-bold" { "Octopus Finance" }

                span
                    id="indicator"
                    class="htmx-indicator text-sm text-gray-500 dark:text-gray-400"
                {
                    "Syncing..."
                }
            }

            div id="dashboard-content" class="w-full"
            {
                (dashboard_content_view(data))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        chart_cleanup_script(),
    ];

    base("Dashboard", &scripts, &content)
}

/// Renders the filter form, cards and charts that make up the dashboard content.
///
/// This is swapped into `#dashboard-content` whenever a filter changes.
fn dashboard_content_view(data: &DashboardData) -> Markup {
    html!(
        form
            id=(FILTER_FORM_ID)
            hx-get=(endpoints::DASHBOARD_VIEW)
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-trigger="change"
            hx-push-url="true"
            hx-indicator="#indicator"
            class="w-full"
        {
            (filter_bar_view(&data.filter, &data.clients, data.owner_id))

            (kpi_cards_view(&data.kpis))

            (ai_alerts_view(&data.alerts))

            section id="charts" class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full mb-8"
            {
                (chart_panel(
                    "Expense distribution",
                    html!(),
                    data.chart(EXPENSE_PIE_CHART_ID),
                    "No expenses in this period",
                ))

                (chart_panel(
                    "Income vs expenses",
                    html!(),
                    data.chart(EVOLUTION_CHART_ID),
                    "No records in this period",
                ))

                (chart_panel(
                    "Monthly comparison",
                    html!(),
                    data.chart(MONTHLY_COMPARISON_CHART_ID),
                    "No records in this period",
                ))

                (chart_panel(
                    "Category evolution",
                    category_controls_view(&data.category, data.show_income),
                    data.chart(CATEGORY_EVOLUTION_CHART_ID),
                    "No records for this category",
                ))
            }

            (ranking_view(&data.ranking))
        }

        (charts_script(&data.charts))
    )
}
