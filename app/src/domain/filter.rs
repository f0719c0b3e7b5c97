//! Dimension filters applied before aggregation
//!
//! A dimension left as `None` selects every value. A selected set, even an
//! empty one, keeps only tickets whose value is in it.

use std::collections::BTreeSet;

use crate::data::types::{AvailableValues, ClassifiedTicket, MonthBucket, NormalizedTicket};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Creation months
    pub months: Option<BTreeSet<MonthBucket>>,
    pub areas: Option<BTreeSet<String>>,
    /// A ticket matches when any of its subjects is selected
    pub subjects: Option<BTreeSet<String>>,
    pub projects: Option<BTreeSet<String>>,
    /// Substrings; a ticket matches when any subject contains any keyword
    pub subject_keywords: Vec<String>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a selection where an empty list means "no filter"
    pub fn from_lists(
        months: Vec<MonthBucket>,
        areas: Vec<String>,
        subjects: Vec<String>,
        projects: Vec<String>,
        subject_keywords: Vec<String>,
    ) -> Self {
        Self {
            months: non_empty(months),
            areas: non_empty(areas),
            subjects: non_empty(subjects),
            projects: non_empty(projects),
            subject_keywords: subject_keywords
                .into_iter()
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.months.is_none()
            && self.areas.is_none()
            && self.subjects.is_none()
            && self.projects.is_none()
            && self.subject_keywords.is_empty()
    }

    pub fn matches(&self, ticket: &NormalizedTicket) -> bool {
        if let Some(months) = &self.months
            && !months.contains(&ticket.creation_month())
        {
            return false;
        }
        if let Some(areas) = &self.areas
            && !areas.contains(&ticket.area)
        {
            return false;
        }
        if let Some(projects) = &self.projects
            && !projects.contains(&ticket.project)
        {
            return false;
        }
        // Tickets without subjects never match a subject filter
        if let Some(subjects) = &self.subjects
            && !ticket.subjects.iter().any(|s| subjects.contains(s))
        {
            return false;
        }
        if !self.subject_keywords.is_empty()
            && !ticket
                .subjects
                .iter()
                .any(|s| self.subject_keywords.iter().any(|k| s.contains(k.as_str())))
        {
            return false;
        }
        true
    }

    /// Matching tickets, in input order
    pub fn apply(&self, tickets: &[ClassifiedTicket]) -> Vec<ClassifiedTicket> {
        if self.is_all() {
            return tickets.to_vec();
        }
        tickets
            .iter()
            .filter(|t| self.matches(&t.ticket))
            .cloned()
            .collect()
    }
}

fn non_empty<T: Ord>(values: Vec<T>) -> Option<BTreeSet<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values.into_iter().collect())
    }
}

/// Distinct, sorted dimension values observed in `tickets`
pub fn available_values(tickets: &[ClassifiedTicket]) -> AvailableValues {
    let mut months = BTreeSet::new();
    let mut areas = BTreeSet::new();
    let mut subjects = BTreeSet::new();
    let mut projects = BTreeSet::new();

    for t in tickets.iter().map(|c| &c.ticket) {
        months.insert(t.creation_month());
        areas.insert(t.area.clone());
        subjects.extend(t.subjects.iter().cloned());
        projects.insert(t.project.clone());
    }

    AvailableValues {
        months: months.into_iter().map(|m| m.label()).collect(),
        areas: areas.into_iter().collect(),
        subjects: subjects.into_iter().collect(),
        projects: projects.into_iter().collect(),
    }
}
