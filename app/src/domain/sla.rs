//! SLA classification
//!
//! Targets are configured in business hours and converted to days with a
//! fixed hours-per-day divisor, while elapsed time is divided by a full
//! calendar day (86 400 000 ms). A 40 h target therefore means 5 days of
//! elapsed wall-clock time.

use std::collections::BTreeMap;

use crate::core::config::SlaConfig;
use crate::data::types::{ClassifiedTicket, NormalizedTicket, SlaVerdict};

/// Per-project SLA targets and goals with global fallbacks
#[derive(Debug, Clone)]
pub struct SlaPolicy {
    target_hours: f64,
    hours_per_day: f64,
    goal_percent: f64,
    project_targets: BTreeMap<String, f64>,
    project_goals: BTreeMap<String, f64>,
}

impl SlaPolicy {
    pub fn new(config: &SlaConfig) -> Self {
        Self {
            target_hours: config.target_hours,
            hours_per_day: config.hours_per_day,
            goal_percent: config.goal_percent,
            project_targets: config.project_targets.clone(),
            project_goals: config.project_goals.clone(),
        }
    }

    /// Target for `project` in SLA days
    pub fn target_days(&self, project: &str) -> f64 {
        let hours = self
            .project_targets
            .get(project)
            .copied()
            .unwrap_or(self.target_hours);
        hours / self.hours_per_day
    }

    /// Goal percentage for `project`, or the global goal for `None`
    pub fn goal_percent(&self, project: Option<&str>) -> f64 {
        project
            .and_then(|p| self.project_goals.get(p).copied())
            .unwrap_or(self.goal_percent)
    }

    pub fn classify(&self, ticket: &NormalizedTicket) -> SlaVerdict {
        classify_days(ticket.sla_days(), self.target_days(&ticket.project))
    }

    pub fn classify_all(&self, tickets: Vec<NormalizedTicket>) -> Vec<ClassifiedTicket> {
        tickets
            .into_iter()
            .map(|ticket| ClassifiedTicket {
                verdict: self.classify(&ticket),
                ticket,
            })
            .collect()
    }
}

/// `sla_days <= target_days`; no measurement is [`SlaVerdict::Unmeasured`]
pub fn classify_days(sla_days: Option<f64>, target_days: f64) -> SlaVerdict {
    match sla_days {
        None => SlaVerdict::Unmeasured,
        Some(days) if days <= target_days => SlaVerdict::WithinSla,
        Some(_) => SlaVerdict::OutOfSla,
    }
}
