use chrono::NaiveDate;

/// Search for one project's tickets created on or after a cutoff date
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub project: String,
    pub created_from: NaiveDate,
    pub fields: Vec<String>,
}

impl SearchQuery {
    pub fn new(project: impl Into<String>, created_from: NaiveDate, fields: Vec<String>) -> Self {
        Self {
            project: project.into(),
            created_from,
            fields,
        }
    }

    /// JQL filter, oldest tickets first so pages stay stable while paginating
    pub fn jql(&self) -> String {
        format!(
            r#"project = "{}" AND created >= "{}" ORDER BY created ASC"#,
            self.project.replace('"', r#"\""#),
            self.created_from.format("%Y-%m-%d")
        )
    }

    /// Comma-joined field selection
    pub fn fields_param(&self) -> String {
        self.fields.join(",")
    }
}
