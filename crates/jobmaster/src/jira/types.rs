//! Jira REST API (v2) payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Element of `GET /rest/api/2/project`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSummary {
    pub id: String,
    pub key: String,
    pub name: String,
}

/// Body of `GET /rest/api/2/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SearchResponse {
    pub start_at: u32,
    pub total: u32,
    pub issues: Vec<Issue>,
}

/// One window of search results plus the total the server reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub issues: Vec<Issue>,
    pub total: u32,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: String,
    pub key: String,
    /// API URL of the issue.
    #[serde(rename = "self")]
    pub self_url: Option<String>,
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueFields {
    pub summary: Option<String>,
    /// Wiki markup string on v2, an ADF document on v3.
    pub description: Option<Value>,
    #[serde(rename = "issuetype")]
    pub issue_type: Option<Named>,
    pub status: Option<Named>,
    pub priority: Option<Named>,
    pub project: Option<ProjectRef>,
    pub reporter: Option<User>,
    pub assignee: Option<User>,
    pub creator: Option<User>,
    pub resolution: Option<Named>,
    #[serde(rename = "resolutiondate")]
    pub resolution_date: Option<String>,
    #[serde(rename = "duedate")]
    pub due_date: Option<String>,
    pub labels: Vec<String>,
    pub components: Vec<Named>,
    #[serde(rename = "fixVersions")]
    pub fix_versions: Vec<Named>,
    /// Affected versions.
    pub versions: Vec<Named>,
    #[serde(rename = "timeoriginalestimate")]
    pub time_original_estimate: Option<i64>,
    #[serde(rename = "timeestimate")]
    pub time_estimate: Option<i64>,
    #[serde(rename = "timespent")]
    pub time_spent: Option<i64>,
    pub created: Option<String>,
    pub updated: Option<String>,
    /// Story points.
    #[serde(rename = "customfield_10016")]
    pub story_points: Option<f64>,
    /// Epic link.
    #[serde(rename = "customfield_10014")]
    pub epic_link: Option<Value>,
    /// Sprints, oldest first.
    #[serde(rename = "customfield_10020")]
    pub sprints: Option<Vec<Value>>,
}

/// Any `{ "name": ... }` reference (status, priority, version, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRef {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub display_name: Option<String>,
    pub email_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_parses_issue_with_custom_fields() {
        let json = r#"{
            "startAt": 0,
            "maxResults": 100,
            "total": 1,
            "issues": [{
                "id": "10001",
                "key": "PROJ-1",
                "self": "https://jira.example.com/rest/api/2/issue/10001",
                "fields": {
                    "summary": "Fix login",
                    "issuetype": {"name": "Bug"},
                    "status": {"name": "In Progress"},
                    "project": {"key": "PROJ", "name": "Project"},
                    "assignee": {"displayName": "Ada Lovelace", "emailAddress": "ada@example.com"},
                    "labels": ["auth"],
                    "fixVersions": [{"name": "1.2"}],
                    "customfield_10016": 2.5,
                    "customfield_10020": [{"id": 1, "name": "Sprint 7"}]
                }
            }]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).expect("search should parse");
        assert_eq!(response.total, 1);
        let issue = &response.issues[0];
        assert_eq!(issue.key, "PROJ-1");
        assert_eq!(issue.fields.issue_type.as_ref().map(|t| t.name.as_str()), Some("Bug"));
        assert_eq!(issue.fields.fix_versions[0].name, "1.2");
        assert_eq!(issue.fields.story_points, Some(2.5));
        assert!(issue.fields.components.is_empty());
    }
}
