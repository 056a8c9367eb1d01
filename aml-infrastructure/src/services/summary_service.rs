use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use tokio::fs;
use tracing::{error, info};

use aml_application::dtos::ComplianceSnapshot;
use aml_application::queries::summary_queries;
use aml_application::AppState;
use aml_domain::{utc_offset, AlertStatus, AmlAlert};

use crate::utils::escape_html;

const MAX_ALERT_ROWS: usize = 500;

pub async fn schedule_summaries(state: AppState) {
    let offset = utc_offset(state.config.policy_utc_offset_hours);
    loop {
        let now = Utc::now();
        let next = match next_summary_time(state.config.summary_hour, state.config.summary_minute, offset, now) {
            Ok(next) => next,
            Err(err) => {
                error!("summary schedule is invalid: {}", err);
                return;
            }
        };
        let sleep_ms = next.signed_duration_since(now).num_milliseconds().max(0) as u64;
        tokio::time::sleep(std::time::Duration::from_millis(sleep_ms)).await;

        if let Err(err) = generate_daily_summary(&state).await {
            error!("compliance summary generation failed: {}", err);
        }
    }
}

pub async fn generate_daily_summary(state: &AppState) -> Result<PathBuf> {
    let offset = utc_offset(state.config.policy_utc_offset_hours);
    let snapshot = summary_queries::compliance_snapshot(state).await?;
    let open_alerts = state
        .cases
        .alerts_with_status(&[AlertStatus::Open, AlertStatus::UnderReview, AlertStatus::Escalated])
        .await?;
    let date = snapshot
        .generated_at
        .with_timezone(&offset)
        .format("%Y-%m-%d")
        .to_string();

    let report_dir = Path::new(&state.config.report_dir);
    fs::create_dir_all(report_dir).await?;
    let path = report_dir.join(format!("compliance-{}.html", date));
    fs::write(&path, render_summary(&date, &snapshot, &open_alerts)).await?;
    info!(path = %path.display(), open_alerts = snapshot.open_alerts, "compliance summary written");
    Ok(path)
}

pub fn render_summary(date: &str, snapshot: &ComplianceSnapshot, open_alerts: &[AmlAlert]) -> String {
    let severity_count = |label: &str| snapshot.open_by_severity.get(label).copied().unwrap_or(0);
    let report_count = |label: &str| snapshot.reports_by_status.get(label).copied().unwrap_or(0);

    let mut rows = String::new();
    for alert in open_alerts.iter().take(MAX_ALERT_ROWS) {
        let severity = alert.severity.as_str();
        rows.push_str(&format!(
            "<tr data-severity=\"{severity}\">\
            <td class=\"time\">{created}</td>\
            <td class=\"id\">{id}</td>\
            <td>{alert_type}</td>\
            <td><span class=\"badge sev-{severity_class}\">{severity}</span></td>\
            <td>{status}</td>\
            <td class=\"id\">{subject}</td>\
            <td class=\"score\">{score}</td>\
            <td>{description}</td>\
            </tr>",
            created = alert.created_at.format("%Y-%m-%d %H:%M:%S"),
            id = escape_html(&alert.id),
            alert_type = alert.alert_type.as_str(),
            severity = severity,
            severity_class = severity.to_lowercase(),
            status = alert.status.as_str(),
            subject = escape_html(&alert.subject_id),
            score = alert.risk_score,
            description = escape_html(&alert.description),
        ));
    }
    let oldest = snapshot
        .oldest_open_alert_at
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>AML Compliance Summary {date}</title>
<style>
:root {{
  --ink: #0f172a;
  --muted: #64748b;
  --border: #e2e8f0;
  --critical: #7f1d1d;
  --high: #dc2626;
  --medium: #f59e0b;
  --low: #16a34a;
}}
* {{ box-sizing: border-box; }}
body {{ margin: 0; font-family: "IBM Plex Sans", "Source Sans 3", sans-serif; background: #f8fafc; color: var(--ink); }}
.page {{ max-width: 1200px; margin: 0 auto; padding: 32px 20px 48px; }}
h1 {{ margin: 0 0 6px; font-size: 26px; }}
.sub {{ color: var(--muted); font-size: 14px; margin: 0 0 18px; }}
.summary {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 12px; margin-bottom: 22px; }}
.card {{ background: #fff; padding: 14px 16px; border-radius: 12px; border: 1px solid var(--border); }}
.card .label {{ font-size: 11px; text-transform: uppercase; letter-spacing: 0.12em; color: var(--muted); }}
.card .value {{ font-size: 22px; font-weight: 700; margin-top: 6px; }}
table {{ width: 100%; border-collapse: collapse; font-size: 13px; background: #fff; }}
th {{ text-align: left; font-size: 11px; text-transform: uppercase; color: var(--muted); background: #f1f5f9; padding: 10px 12px; }}
td {{ padding: 10px 12px; border-bottom: 1px solid var(--border); }}
.id, .time {{ font-family: "IBM Plex Mono", monospace; font-size: 12px; }}
.score {{ text-align: right; font-variant-numeric: tabular-nums; }}
.badge {{ padding: 3px 9px; border-radius: 999px; color: #fff; font-weight: 600; font-size: 11px; }}
.sev-critical {{ background: var(--critical); }}
.sev-high {{ background: var(--high); }}
.sev-medium {{ background: var(--medium); }}
.sev-low {{ background: var(--low); }}
</style>
</head>
<body>
<div class="page">
  <h1>AML Compliance Summary</h1>
  <p class="sub">Date: {date} · Oldest open alert: {oldest}</p>
  <div class="summary">
    <div class="card"><div class="label">Open alerts</div><div class="value">{open}</div></div>
    <div class="card"><div class="label">Critical</div><div class="value">{critical}</div></div>
    <div class="card"><div class="label">High</div><div class="value">{high}</div></div>
    <div class="card"><div class="label">Medium</div><div class="value">{medium}</div></div>
    <div class="card"><div class="label">Low</div><div class="value">{low}</div></div>
    <div class="card"><div class="label">STR drafts</div><div class="value">{drafts}</div></div>
    <div class="card"><div class="label">STR submitted</div><div class="value">{submitted}</div></div>
    <div class="card"><div class="label">STR acknowledged</div><div class="value">{acknowledged}</div></div>
    <div class="card"><div class="label">Monitored</div><div class="value">{monitored}</div></div>
    <div class="card"><div class="label">Blocked</div><div class="value">{blocked}</div></div>
  </div>
  <table>
    <thead><tr><th>Created</th><th>Alert</th><th>Type</th><th>Severity</th><th>Status</th><th>Subject</th><th>Risk</th><th>Description</th></tr></thead>
    <tbody>
    {rows}
    </tbody>
  </table>
</div>
</body>
</html>"#,
        date = date,
        oldest = oldest,
        open = snapshot.open_alerts,
        critical = severity_count("CRITICAL"),
        high = severity_count("HIGH"),
        medium = severity_count("MEDIUM"),
        low = severity_count("LOW"),
        drafts = report_count("DRAFT"),
        submitted = report_count("SUBMITTED"),
        acknowledged = report_count("ACKNOWLEDGED"),
        monitored = snapshot.monitored_transactions,
        blocked = snapshot.blocked_transactions,
        rows = rows,
    )
}

/// Next occurrence of `hour:minute` on the given local clock, strictly after `now`.
pub fn next_summary_time(
    hour: u32,
    minute: u32,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    let local_now = now.with_timezone(&offset);
    let today = local_now.date_naive();
    let target = today
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| anyhow!("invalid summary time {:02}:{:02}", hour, minute))?;
    let mut next = offset
        .from_local_datetime(&target)
        .single()
        .ok_or_else(|| anyhow!("ambiguous summary time"))?;
    if next <= local_now {
        next += Duration::days(1);
    }
    Ok(next.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn next_time_rolls_to_tomorrow() {
        let kst = utc_offset(9);
        // 00:30 KST on 2026-07-02
        let now = Utc.with_ymd_and_hms(2026, 7, 1, 15, 30, 0).unwrap();
        let next = next_summary_time(0, 10, kst, now).expect("next");
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 7, 2, 15, 10, 0).unwrap());
        let later_today = next_summary_time(1, 0, kst, now).expect("next");
        assert_eq!(later_today, Utc.with_ymd_and_hms(2026, 7, 1, 16, 0, 0).unwrap());
        assert!(next_summary_time(25, 0, kst, now).is_err());
    }

    #[test]
    fn summary_shows_counts() {
        let snapshot = ComplianceSnapshot {
            generated_at: Utc::now(),
            open_alerts: 3,
            open_by_severity: BTreeMap::from([("HIGH".to_string(), 2), ("CRITICAL".to_string(), 1)]),
            open_by_status: BTreeMap::new(),
            reports_by_status: BTreeMap::from([("SUBMITTED".to_string(), 4)]),
            oldest_open_alert_at: None,
            monitored_transactions: 10,
            blocked_transactions: 1,
        };
        let html = render_summary("2026-07-02", &snapshot, &[]);
        assert!(html.contains("<div class=\"label\">High</div><div class=\"value\">2</div>"));
        assert!(html.contains("<div class=\"label\">STR submitted</div><div class=\"value\">4</div>"));
        assert!(html.contains("Oldest open alert: -"));
    }
}
