use std::collections::BTreeSet;

use chrono::Duration;

use crate::entities::{AlertDraft, CustomerRiskProfile, MonitorThresholds, MonitoredTransaction};
use crate::ports::SanctionsList;
use crate::value_objects::{AlertSeverity, AlertType, Party, RiskFlag};

pub const CTR_RISK: u32 = 30;
pub const SANCTIONS_RISK: u32 = 100;
pub const VELOCITY_RISK: u32 = 25;
pub const STRUCTURING_RISK: u32 = 40;
pub const HIGH_RISK_SENDER_RISK: u32 = 20;
pub const UNUSUAL_AMOUNT_RISK: u32 = 15;

const VELOCITY_WINDOW_HOURS: i64 = 1;

pub struct RiskInput<'a> {
    pub transaction: &'a MonitoredTransaction,
    /// Earlier transactions by the same sender, covering at least `history_window`.
    pub sender_history: &'a [MonitoredTransaction],
    pub sender_profile: Option<&'a CustomerRiskProfile>,
}

#[derive(Debug, Clone, Default)]
pub struct RiskAssessment {
    pub risk_score: u32,
    pub flags: BTreeSet<RiskFlag>,
    pub alerts: Vec<AlertDraft>,
}

impl RiskAssessment {
    fn raise(&mut self, flag: RiskFlag, risk: u32) {
        self.flags.insert(flag);
        self.risk_score = self.risk_score.saturating_add(risk);
    }

    pub fn allowed(&self, thresholds: &MonitorThresholds) -> bool {
        self.risk_score < thresholds.block_risk_score && !self.flags.contains(&RiskFlag::SanctionsHit)
    }
}

/// How far back the sender history must reach for every windowed check.
pub fn history_window(thresholds: &MonitorThresholds) -> Duration {
    Duration::days(i64::from(thresholds.str_pattern_days)).max(Duration::hours(VELOCITY_WINDOW_HOURS))
}

/// Runs every check independently and sums their contributions.
pub fn assess_transaction(
    input: &RiskInput<'_>,
    thresholds: &MonitorThresholds,
    sanctions: &dyn SanctionsList,
) -> RiskAssessment {
    let mut assessment = RiskAssessment::default();
    check_ctr(input, thresholds, &mut assessment);
    check_sanctions(input, sanctions, &mut assessment);
    check_velocity(input, thresholds, &mut assessment);
    check_structuring(input, thresholds, &mut assessment);
    check_profile(input, thresholds, &mut assessment);
    if input.transaction.amount >= thresholds.travel_rule_threshold {
        assessment.flags.insert(RiskFlag::TravelRuleRequired);
    }
    assessment
}

fn check_ctr(input: &RiskInput<'_>, thresholds: &MonitorThresholds, out: &mut RiskAssessment) {
    if input.transaction.amount >= thresholds.ctr_threshold {
        out.raise(RiskFlag::CtrThreshold, CTR_RISK);
    }
}

fn check_sanctions(input: &RiskInput<'_>, sanctions: &dyn SanctionsList, out: &mut RiskAssessment) {
    let tx = input.transaction;
    let hits: Vec<(&str, &Party)> = [("sender", &tx.sender), ("recipient", &tx.recipient)]
        .into_iter()
        .filter(|(_, party)| sanctions.is_sanctioned(&party.id))
        .collect();
    if hits.is_empty() {
        return;
    }
    out.raise(RiskFlag::SanctionsHit, SANCTIONS_RISK);
    for (role, party) in hits {
        out.alerts.push(AlertDraft {
            alert_type: AlertType::SanctionsHit,
            severity: AlertSeverity::Critical,
            subject: party.clone(),
            description: format!("{} {} matched the sanctions list", role, party.id),
            risk_score: SANCTIONS_RISK,
            related_transactions: vec![tx.id.clone()],
            evidence: vec![format!("sanctions:{}:{}", role, party.id)],
        });
    }
}

fn check_velocity(input: &RiskInput<'_>, thresholds: &MonitorThresholds, out: &mut RiskAssessment) {
    if thresholds.max_hourly_transactions == 0 {
        return;
    }
    let tx = input.transaction;
    let window_start = tx.timestamp - Duration::hours(VELOCITY_WINDOW_HOURS);
    let mut related = input
        .sender_history
        .iter()
        .filter(|prev| prev.id != tx.id && prev.timestamp >= window_start && prev.timestamp <= tx.timestamp)
        .map(|prev| prev.id.clone())
        .collect::<Vec<_>>();
    related.push(tx.id.clone());
    let count = related.len() as u64;
    if count < u64::from(thresholds.max_hourly_transactions) {
        return;
    }
    out.raise(RiskFlag::VelocityAnomaly, VELOCITY_RISK);
    out.alerts.push(AlertDraft {
        alert_type: AlertType::VelocityAnomaly,
        severity: AlertSeverity::Medium,
        subject: tx.sender.clone(),
        description: format!(
            "{} transactions within {}h (limit {})",
            count, VELOCITY_WINDOW_HOURS, thresholds.max_hourly_transactions
        ),
        risk_score: VELOCITY_RISK,
        related_transactions: related,
        evidence: vec![format!("velocity_window:{}..{}", window_start.to_rfc3339(), tx.timestamp.to_rfc3339())],
    });
}

fn check_structuring(input: &RiskInput<'_>, thresholds: &MonitorThresholds, out: &mut RiskAssessment) {
    let tx = input.transaction;
    if !thresholds.in_structuring_band(tx.amount) {
        return;
    }
    let window_start = tx.timestamp - Duration::days(i64::from(thresholds.str_pattern_days));
    let mut matched = input
        .sender_history
        .iter()
        .filter(|prev| {
            prev.id != tx.id
                && prev.timestamp >= window_start
                && prev.timestamp <= tx.timestamp
                && thresholds.in_structuring_band(prev.amount)
        })
        .collect::<Vec<_>>();
    let required_prior = thresholds.str_pattern_count.saturating_sub(1) as usize;
    if matched.len() < required_prior {
        return;
    }
    matched.sort_by_key(|prev| prev.timestamp);
    let total = matched
        .iter()
        .fold(tx.amount, |acc, prev| acc.saturating_add(prev.amount));
    let mut related = matched.iter().map(|prev| prev.id.clone()).collect::<Vec<_>>();
    related.push(tx.id.clone());

    out.raise(RiskFlag::StructuringSuspected, STRUCTURING_RISK);
    out.alerts.push(AlertDraft {
        alert_type: AlertType::Structuring,
        severity: AlertSeverity::High,
        subject: tx.sender.clone(),
        description: format!(
            "{} transactions just below the CTR threshold within {} days (total {})",
            related.len(),
            thresholds.str_pattern_days,
            total
        ),
        risk_score: STRUCTURING_RISK,
        related_transactions: related,
        evidence: vec![format!("structuring_total:{}", total)],
    });
}

fn check_profile(input: &RiskInput<'_>, thresholds: &MonitorThresholds, out: &mut RiskAssessment) {
    let Some(profile) = input.sender_profile else {
        return;
    };
    if profile.risk_level.is_elevated() {
        out.raise(RiskFlag::HighRiskSender, HIGH_RISK_SENDER_RISK);
    }
    let baseline = &profile.baseline;
    if baseline.has_history()
        && input.transaction.amount as f64 > thresholds.unusual_amount_multiplier * baseline.average_transaction_size
    {
        out.raise(RiskFlag::UnusualAmount, UNUSUAL_AMOUNT_RISK);
    }
}
