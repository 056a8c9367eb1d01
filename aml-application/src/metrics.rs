use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    monitored_transactions: AtomicU64,
    blocked_transactions: AtomicU64,
    alerts_raised: AtomicU64,
    policy_evaluations: AtomicU64,
    policy_violations: AtomicU64,
    reports_submitted: AtomicU64,
    audit_failures: AtomicU64,
}

impl Metrics {
    pub fn record_monitor(&self, allowed: bool, alert_count: usize) {
        self.monitored_transactions.fetch_add(1, Ordering::Relaxed);
        if !allowed {
            self.blocked_transactions.fetch_add(1, Ordering::Relaxed);
        }
        self.alerts_raised
            .fetch_add(alert_count as u64, Ordering::Relaxed);
    }

    pub fn record_policy_evaluation(&self, violation_count: usize) {
        self.policy_evaluations.fetch_add(1, Ordering::Relaxed);
        self.policy_violations
            .fetch_add(violation_count as u64, Ordering::Relaxed);
    }

    pub fn record_report_submitted(&self) {
        self.reports_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_audit_failure(&self) {
        self.audit_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn monitored_transactions(&self) -> u64 {
        self.monitored_transactions.load(Ordering::Relaxed)
    }

    pub fn blocked_transactions(&self) -> u64 {
        self.blocked_transactions.load(Ordering::Relaxed)
    }

    pub fn audit_failures(&self) -> u64 {
        self.audit_failures.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let monitored = self.monitored_transactions.load(Ordering::Relaxed);
        let blocked = self.blocked_transactions.load(Ordering::Relaxed);
        let alerts = self.alerts_raised.load(Ordering::Relaxed);
        let evaluations = self.policy_evaluations.load(Ordering::Relaxed);
        let violations = self.policy_violations.load(Ordering::Relaxed);
        let reports = self.reports_submitted.load(Ordering::Relaxed);
        let audit_failures = self.audit_failures.load(Ordering::Relaxed);

        format!(
            "# TYPE aml_monitored_transactions_total counter\n\
aml_monitored_transactions_total {}\n\
# TYPE aml_blocked_transactions_total counter\n\
aml_blocked_transactions_total {}\n\
# TYPE aml_alerts_raised_total counter\n\
aml_alerts_raised_total {}\n\
# TYPE aml_policy_evaluations_total counter\n\
aml_policy_evaluations_total {}\n\
# TYPE aml_policy_violations_total counter\n\
aml_policy_violations_total {}\n\
# TYPE aml_reports_submitted_total counter\n\
aml_reports_submitted_total {}\n\
# TYPE aml_audit_failures_total counter\n\
aml_audit_failures_total {}\n",
            monitored, blocked, alerts, evaluations, violations, reports, audit_failures
        )
    }
}
