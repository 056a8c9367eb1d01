use axum::routing::{get, post};
use axum::Router;

use aml_application::AppState;

use crate::handlers::{
    case_handlers, ops_handlers, payment_handlers, policy_handlers, report_handlers, travel_rule_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/payments/monitor",
            post(payment_handlers::monitor_transaction),
        )
        .route(
            "/v1/payments/authorize",
            post(payment_handlers::authorize_payment),
        )
        .route(
            "/v1/policies/validate",
            post(policy_handlers::validate_transaction),
        )
        .route(
            "/v1/cases/monitor",
            post(payment_handlers::monitor_transaction_detailed),
        )
        .route("/v1/cases/alerts", get(case_handlers::list_open_alerts))
        .route("/v1/cases/alerts/:alert_id", get(case_handlers::get_alert))
        .route(
            "/v1/cases/alerts/:alert_id/review",
            post(case_handlers::start_review),
        )
        .route(
            "/v1/cases/alerts/:alert_id/escalate",
            post(case_handlers::escalate_alert),
        )
        .route(
            "/v1/cases/alerts/:alert_id/clear",
            post(case_handlers::clear_alert),
        )
        .route(
            "/v1/cases/alerts/:alert_id/resolve",
            post(case_handlers::resolve_alert),
        )
        .route(
            "/v1/cases/subjects/:subject_id/alerts",
            get(case_handlers::list_subject_alerts),
        )
        .route("/v1/cases/profiles", post(case_handlers::onboard_profile))
        .route(
            "/v1/cases/profiles/:subject_id",
            get(case_handlers::get_profile),
        )
        .route(
            "/v1/reports/str",
            get(report_handlers::list_reports).post(report_handlers::generate_str),
        )
        .route("/v1/reports/str/:report_id", get(report_handlers::get_report))
        .route(
            "/v1/reports/str/:report_id/submit",
            post(report_handlers::submit_str),
        )
        .route(
            "/v1/reports/str/:report_id/acknowledge",
            post(report_handlers::acknowledge_str),
        )
        .route(
            "/v1/policies",
            get(policy_handlers::list_policies).post(policy_handlers::create_policy),
        )
        .route(
            "/v1/policies/:policy_id",
            get(policy_handlers::get_policy).put(policy_handlers::update_policy),
        )
        .route(
            "/v1/policies/:policy_id/status",
            post(policy_handlers::change_policy_status),
        )
        .route(
            "/v1/travel-rule",
            post(travel_rule_handlers::record_travel_rule),
        )
        .route(
            "/v1/travel-rule/:transaction_id",
            get(travel_rule_handlers::get_travel_rule_record),
        )
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/summary", get(ops_handlers::compliance_summary))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
