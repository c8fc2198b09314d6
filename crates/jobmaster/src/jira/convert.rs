//! Flattening of Jira issues into `jira_issues` rows.

use chrono::{DateTime, NaiveDate};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{Set, Value};
use serde_json::Value as JsonValue;

use super::types::{Issue, Named, User};
use crate::entity::jira_issue;
use crate::store::RemoteRecord;

/// An issue with every persisted field resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueRecord {
    pub issue_key: String,
    pub issue_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub issue_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project: Option<String>,
    pub project_key: Option<String>,
    pub reporter: Option<String>,
    pub assignee: Option<String>,
    pub creator: Option<String>,
    pub resolution: Option<String>,
    pub resolution_date: Option<DateTimeWithTimeZone>,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub fix_versions: Vec<String>,
    pub affected_versions: Vec<String>,
    pub story_points: Option<i32>,
    pub time_original_estimate: Option<i32>,
    pub time_remaining: Option<i32>,
    pub time_spent: Option<i32>,
    pub epic: Option<String>,
    pub sprint: Option<String>,
    pub issue_url: Option<String>,
    pub jira_created_at: Option<DateTimeWithTimeZone>,
    pub jira_updated_at: Option<DateTimeWithTimeZone>,
}

impl From<&Issue> for IssueRecord {
    fn from(issue: &Issue) -> Self {
        let f = &issue.fields;
        Self {
            issue_key: issue.key.clone(),
            issue_id: issue.id.clone(),
            summary: f.summary.clone().unwrap_or_default(),
            description: f.description.as_ref().and_then(description_text),
            issue_type: name_of(&f.issue_type),
            status: name_of(&f.status),
            priority: name_of(&f.priority),
            project: f.project.as_ref().map(|p| p.name.clone()),
            project_key: f.project.as_ref().map(|p| p.key.clone()),
            reporter: person(&f.reporter),
            assignee: person(&f.assignee),
            creator: person(&f.creator),
            resolution: name_of(&f.resolution),
            resolution_date: f.resolution_date.as_deref().and_then(parse_timestamp),
            due_date: f.due_date.as_deref().and_then(parse_timestamp),
            labels: f.labels.clone(),
            components: names(&f.components),
            fix_versions: names(&f.fix_versions),
            affected_versions: names(&f.versions),
            story_points: f.story_points.map(|p| p.round() as i32),
            time_original_estimate: seconds(f.time_original_estimate),
            time_remaining: seconds(f.time_estimate),
            time_spent: seconds(f.time_spent),
            epic: f
                .epic_link
                .as_ref()
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            sprint: f.sprints.as_deref().and_then(current_sprint),
            issue_url: issue.self_url.clone(),
            jira_created_at: f.created.as_deref().and_then(parse_timestamp),
            jira_updated_at: f.updated.as_deref().and_then(parse_timestamp),
        }
    }
}

fn name_of(named: &Option<Named>) -> Option<String> {
    named.as_ref().map(|n| n.name.clone())
}

fn names(items: &[Named]) -> Vec<String> {
    items.iter().map(|n| n.name.clone()).collect()
}

/// Display name, else e-mail address.
fn person(user: &Option<User>) -> Option<String> {
    let user = user.as_ref()?;
    user.display_name
        .clone()
        .or_else(|| user.email_address.clone())
}

fn seconds(value: Option<i64>) -> Option<i32> {
    value.and_then(|v| i32::try_from(v).ok())
}

/// Jira timestamps (`2024-01-15T10:30:00.000+0000`), RFC 3339, or plain dates
/// (`2024-02-01`, stored as midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTimeWithTimeZone> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().fixed_offset())
        })
}

/// Name of the last sprint in the list.
///
/// Cloud returns sprint objects; older servers return the Greenhopper
/// `toString()` form (`...Sprint@1a2b[id=1,name=Sprint 7,...]`).
fn current_sprint(sprints: &[JsonValue]) -> Option<String> {
    let last = sprints.last()?;
    match last {
        JsonValue::Object(map) => map.get("name").and_then(JsonValue::as_str).map(str::to_string),
        JsonValue::String(s) => s
            .split(['[', ',', ']'])
            .find_map(|part| part.strip_prefix("name="))
            .map(str::to_string),
        _ => None,
    }
}

/// Plain text of a description: the string itself, or the concatenated text
/// nodes of an ADF document.
fn description_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Object(_) => {
            let mut out = String::new();
            collect_adf_text(value, &mut out);
            let text = out.trim().to_string();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}

fn collect_adf_text(node: &JsonValue, out: &mut String) {
    if let Some(text) = node.get("text").and_then(JsonValue::as_str) {
        out.push_str(text);
    }
    if let Some(children) = node.get("content").and_then(JsonValue::as_array) {
        for child in children {
            collect_adf_text(child, out);
        }
        if node.get("type").and_then(JsonValue::as_str) == Some("paragraph") {
            out.push('\n');
        }
    }
}

impl RemoteRecord for IssueRecord {
    type Entity = jira_issue::Entity;
    type ActiveModel = jira_issue::ActiveModel;

    const KIND: &'static str = "issue";

    fn external_key(&self) -> Value {
        self.issue_key.clone().into()
    }

    fn key_column() -> jira_issue::Column {
        jira_issue::Column::IssueKey
    }

    fn timestamp_columns() -> (jira_issue::Column, jira_issue::Column) {
        (jira_issue::Column::CreatedAt, jira_issue::Column::UpdatedAt)
    }

    fn apply(&self, model: &mut jira_issue::ActiveModel) {
        model.issue_id = Set(self.issue_id.clone());
        model.summary = Set(self.summary.clone());
        model.description = Set(self.description.clone());
        model.issue_type = Set(self.issue_type.clone());
        model.status = Set(self.status.clone());
        model.priority = Set(self.priority.clone());
        model.project = Set(self.project.clone());
        model.project_key = Set(self.project_key.clone());
        model.reporter = Set(self.reporter.clone());
        model.assignee = Set(self.assignee.clone());
        model.creator = Set(self.creator.clone());
        model.resolution = Set(self.resolution.clone());
        model.resolution_date = Set(self.resolution_date);
        model.due_date = Set(self.due_date);
        model.labels = Set(JsonValue::from(self.labels.clone()));
        model.components = Set(JsonValue::from(self.components.clone()));
        model.fix_versions = Set(JsonValue::from(self.fix_versions.clone()));
        model.affected_versions = Set(JsonValue::from(self.affected_versions.clone()));
        model.story_points = Set(self.story_points);
        model.time_original_estimate = Set(self.time_original_estimate);
        model.time_remaining = Set(self.time_remaining);
        model.time_spent = Set(self.time_spent);
        model.epic = Set(self.epic.clone());
        model.sprint = Set(self.sprint.clone());
        model.issue_url = Set(self.issue_url.clone());
        model.jira_created_at = Set(self.jira_created_at);
        model.jira_updated_at = Set(self.jira_updated_at);
    }
}
