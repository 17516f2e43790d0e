//! Per-cluster alert deduplication and recovery notices.
//!
//! Each cluster is either clean (no entry) or alerting since the instant of
//! its last problem alert. A problem alert is re-sent once the dedup window
//! has elapsed; the first clean evaluation after alerting sends exactly one
//! recovery notice and forgets the cluster.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use fleetwatch_domain::{
    AlertCategory, AlertLink, AlertMessage, AlertSeverity, Application, ClusterResult,
};

const MAX_APP_LINKS: usize = 5;

pub struct AlertStateMachine {
    alert_interval: TimeDelta,
    excluded: HashSet<String>,
    last_alert: HashMap<String, DateTime<Utc>>,
}

impl AlertStateMachine {
    pub fn new(alert_interval: Duration, excluded: impl IntoIterator<Item = String>) -> Self {
        Self {
            alert_interval: TimeDelta::from_std(alert_interval).unwrap_or(TimeDelta::MAX),
            excluded: excluded.into_iter().collect(),
            last_alert: HashMap::new(),
        }
    }

    /// Instant of the last problem alert for `cluster`, if it is alerting.
    pub fn last_alert(&self, cluster: &str) -> Option<DateTime<Utc>> {
        self.last_alert.get(cluster).copied()
    }

    pub fn alerting_clusters(&self) -> usize {
        self.last_alert.len()
    }

    /// Applications of `result` that operators should hear about.
    pub fn problem_set<'a>(&self, result: &'a ClusterResult) -> Vec<&'a Application> {
        result
            .applications
            .iter()
            .filter(|app| !self.excluded.contains(&app.name))
            .filter(|app| app.is_problem())
            .collect()
    }

    /// Advances every cluster's state and returns the messages to dispatch.
    ///
    /// State changes are recorded here, before delivery, so a failing sink
    /// does not cause a resend on every cycle.
    pub fn evaluate(&mut self, results: &[ClusterResult], now: DateTime<Utc>) -> Vec<AlertMessage> {
        let mut messages = Vec::new();
        for result in results {
            let problems = self.problem_set(result);
            let cluster = result.cluster_name.as_str();

            if problems.is_empty() {
                if self.last_alert.remove(cluster).is_some() {
                    info!(cluster, "cluster recovered");
                    messages.push(recovery_message(result));
                }
                continue;
            }

            let due = match self.last_alert.get(cluster) {
                None => true,
                Some(last) => now.signed_duration_since(*last) >= self.alert_interval,
            };
            if due {
                info!(cluster, problems = problems.len(), "raising problem alert");
                self.last_alert.insert(cluster.to_string(), now);
                messages.push(problem_message(result, &problems));
            } else {
                debug!(cluster, problems = problems.len(), "alert suppressed inside dedup window");
            }
        }
        messages
    }
}

fn problem_message(result: &ClusterResult, problems: &[&Application]) -> AlertMessage {
    let mut grouped: BTreeMap<AlertCategory, Vec<&Application>> = BTreeMap::new();
    for app in problems {
        if let Some(category) = AlertCategory::of(app) {
            grouped.entry(category).or_default().push(app);
        }
    }

    let mut body = String::new();
    for (category, apps) in &grouped {
        body.push_str(&format!("{} ({}):\n", category.heading(), apps.len()));
        for app in apps {
            body.push_str(&format!(
                "  - {} ({}/{})\n",
                app.name,
                app.health.as_str(),
                app.sync.as_str()
            ));
        }
    }

    let mut links = vec![cluster_link(result)];
    links.extend(problems.iter().take(MAX_APP_LINKS).map(|app| AlertLink {
        label: app.name.clone(),
        url: result.application_url(&app.name),
    }));

    AlertMessage {
        cluster: result.cluster_name.clone(),
        severity: AlertSeverity::Problem,
        title: format!(
            "{}: {} application(s) need attention",
            result.cluster_name,
            problems.len()
        ),
        body: body.trim_end().to_string(),
        links,
    }
}

fn recovery_message(result: &ClusterResult) -> AlertMessage {
    AlertMessage {
        cluster: result.cluster_name.clone(),
        severity: AlertSeverity::Recovered,
        title: format!("{}: all applications healthy again", result.cluster_name),
        body: String::new(),
        links: vec![cluster_link(result)],
    }
}

fn cluster_link(result: &ClusterResult) -> AlertLink {
    AlertLink {
        label: format!("Open {}", result.cluster_name),
        url: result.cluster_url.clone(),
    }
}
