//! Month-bucketed aggregation
//!
//! Every table is keyed by [`MonthBucket`] in a `BTreeMap`, so rows come out
//! in chronological order regardless of label text.

use std::collections::{BTreeMap, HashMap};

use crate::data::types::{
    AggregateRow, BucketBy, ClassifiedTicket, Dimension, DimensionCount, FlowRow, MonthBucket,
    NormalizedTicket, SlaVerdict, Summary,
};

/// Verdict counts for one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    count: u64,
    within: u64,
    out: u64,
    unmeasured: u64,
}

impl Tally {
    fn add(&mut self, verdict: SlaVerdict) {
        self.count += 1;
        match verdict {
            SlaVerdict::WithinSla => self.within += 1,
            SlaVerdict::OutOfSla => self.out += 1,
            SlaVerdict::Unmeasured => self.unmeasured += 1,
        }
    }

    /// Unmeasured tickets stay in the denominator
    fn percentage(&self) -> f64 {
        percentage(self.within, self.count)
    }

    fn into_row(self, month: MonthBucket, dimension: Option<String>, goal: f64) -> AggregateRow {
        let percentage = self.percentage();
        AggregateRow {
            month,
            label: month.label(),
            dimension,
            count: self.count,
            within_sla_count: self.within,
            out_of_sla_count: self.out,
            unmeasured_count: self.unmeasured,
            percentage,
            meets_goal: percentage >= goal,
        }
    }
}

/// `part / total * 100`, 0 for an empty total
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn bucket_of(ticket: &NormalizedTicket, by: BucketBy) -> Option<MonthBucket> {
    match by {
        BucketBy::Created => Some(ticket.creation_month()),
        BucketBy::Resolved => ticket.resolution_month(),
    }
}

fn dimension_values(ticket: &NormalizedTicket, dimension: Dimension) -> &[String] {
    match dimension {
        Dimension::Area => std::slice::from_ref(&ticket.area),
        Dimension::Subject => &ticket.subjects,
    }
}

/// One row per observed month. With [`BucketBy::Resolved`], unresolved
/// tickets have no bucket and are left out.
pub fn sla_by_month(tickets: &[ClassifiedTicket], by: BucketBy, goal: f64) -> Vec<AggregateRow> {
    let mut tallies: BTreeMap<MonthBucket, Tally> = BTreeMap::new();
    for t in tickets {
        if let Some(month) = bucket_of(&t.ticket, by) {
            tallies.entry(month).or_default().add(t.verdict);
        }
    }
    tallies
        .into_iter()
        .map(|(month, tally)| tally.into_row(month, None, goal))
        .collect()
}

/// One row per observed (month, dimension value), ordered by month then value
pub fn sla_by_month_and(
    tickets: &[ClassifiedTicket],
    by: BucketBy,
    dimension: Dimension,
    goal: f64,
) -> Vec<AggregateRow> {
    let mut tallies: BTreeMap<(MonthBucket, &str), Tally> = BTreeMap::new();
    for t in tickets {
        let Some(month) = bucket_of(&t.ticket, by) else {
            continue;
        };
        for value in dimension_values(&t.ticket, dimension) {
            tallies
                .entry((month, value.as_str()))
                .or_default()
                .add(t.verdict);
        }
    }
    tallies
        .into_iter()
        .map(|((month, value), tally)| tally.into_row(month, Some(value.to_string()), goal))
        .collect()
}

/// Tickets created and resolved per month; a month missing on one side is 0
pub fn created_vs_resolved(tickets: &[ClassifiedTicket]) -> Vec<FlowRow> {
    let mut flows: BTreeMap<MonthBucket, (u64, u64)> = BTreeMap::new();
    for t in tickets {
        flows.entry(t.ticket.creation_month()).or_default().0 += 1;
        if let Some(month) = t.ticket.resolution_month() {
            flows.entry(month).or_default().1 += 1;
        }
    }
    flows
        .into_iter()
        .map(|(month, (created, resolved))| FlowRow {
            month,
            label: month.label(),
            created,
            resolved,
        })
        .collect()
}

/// Occurrences per dimension value, most frequent first (ties by value)
pub fn dimension_counts(tickets: &[ClassifiedTicket], dimension: Dimension) -> Vec<DimensionCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for t in tickets {
        for value in dimension_values(&t.ticket, dimension) {
            *counts.entry(value.as_str()).or_default() += 1;
        }
    }
    let mut rows: Vec<DimensionCount> = counts
        .into_iter()
        .map(|(value, count)| DimensionCount {
            value: value.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    rows
}

pub fn summarize(tickets: &[ClassifiedTicket], goal: f64) -> Summary {
    let mut tally = Tally::default();
    let mut resolved = 0;
    let mut forwarded_to_product = 0;
    let mut escalated_tier3 = 0;

    for t in tickets {
        tally.add(t.verdict);
        resolved += u64::from(t.ticket.is_resolved());
        forwarded_to_product += u64::from(t.ticket.forwarded_to_product);
        escalated_tier3 += u64::from(t.ticket.escalated_tier3);
    }

    let sla_percentage = tally.percentage();
    Summary {
        created: tally.count,
        resolved,
        forwarded_to_product,
        escalated_tier3,
        within_sla: tally.within,
        out_of_sla: tally.out,
        unmeasured: tally.unmeasured,
        sla_percentage,
        goal_percent: goal,
        meets_goal: sla_percentage >= goal,
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
