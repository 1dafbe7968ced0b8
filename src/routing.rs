//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState,
    analytics::get_analytics,
    dashboard::get_chart,
    endpoints,
    filters::{
        delete_comparison, get_filters, put_appeal, put_comparison, put_date_range,
        put_frequency, put_fund, resolve_comparison, toggle_comparison,
    },
    logging::logging_middleware,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ANALYTICS, get(get_analytics))
        .route(endpoints::FILTERS, get(get_filters))
        .route(endpoints::FILTERS_DATE_RANGE, put(put_date_range))
        .route(endpoints::FILTERS_APPEAL, put(put_appeal))
        .route(endpoints::FILTERS_FUND, put(put_fund))
        .route(endpoints::FILTERS_FREQUENCY, put(put_frequency))
        .route(
            endpoints::COMPARISON,
            put(put_comparison).delete(delete_comparison),
        )
        .route(endpoints::COMPARISON_TOGGLE, put(toggle_comparison))
        .route(endpoints::COMPARISON_RESOLVE, post(resolve_comparison))
        .route(endpoints::CHART, get(get_chart))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
