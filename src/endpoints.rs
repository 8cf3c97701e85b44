//! The URIs served by the application.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page, or its content partial for htmx requests.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The filtered records and KPI summary as JSON.
pub const SUMMARY_API: &str = "/api/summary";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";
