//! Application router configuration.

use axum::{Router, middleware, response::Redirect, routing::get};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::{get_dashboard_page, get_summary},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    logging::logging_middleware,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::SUMMARY_API, get(get_summary))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;
    use time::macros::date;

    use crate::{
        AppState, endpoints,
        owner::OwnerId,
        repository::FixtureRepository,
        routing::build_router,
        test_utils::{expense, finalise_all, income},
    };

    fn get_test_server() -> TestServer {
        let records = finalise_all([
            income(200.0, date!(2024 - 01 - 10), "Automation").owner(OwnerId::new(554899999999)),
            expense(80.0, date!(2024 - 01 - 10), "Health").owner(OwnerId::new(554899999999)),
            expense(999.0, date!(2024 - 01 - 11), "Rent").owner(OwnerId::new(554899999999)),
        ]);
        let state = AppState::new(FixtureRepository::new(records, vec![]), "Etc/UTC");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn serves_dashboard() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        assert!(response.text().contains("Octopus Finance"));
    }

    #[tokio::test]
    async fn serves_summary_json() {
        let server = get_test_server();

        let response = server
            .get(endpoints::SUMMARY_API)
            .add_query_param("range", "custom")
            .add_query_param("start", "2024-01-10")
            .add_query_param("end", "2024-01-10")
            .await;

        response.assert_status_ok();
        let summary = response.json::<Value>();
        assert_eq!(summary["filter"]["type"], "custom");
        assert_eq!(summary["filter"]["start"], "2024-01-10");
        assert_eq!(summary["records"].as_array().map(Vec::len), Some(2));
        assert_eq!(summary["kpis"]["balance"], 120.0);
        assert_eq!(summary["kpis"]["top_expense_category"]["name"], "Health");
    }

    #[tokio::test]
    async fn summary_rejects_reversed_range() {
        let server = get_test_server();

        let response = server
            .get(endpoints::SUMMARY_API)
            .add_query_param("range", "custom")
            .add_query_param("start", "2024-02-01")
            .add_query_param("end", "2024-01-01")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn serves_error_page() {
        let server = get_test_server();

        let response = server.get(endpoints::INTERNAL_ERROR_VIEW).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
