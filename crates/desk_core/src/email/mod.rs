use serde::{Deserialize, Serialize};

use crate::domain::{AffectedUser, Incident};

/// Reply being composed in an email tab. The body lives in the editor, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailDraft {
    pub tab_id: String,
    pub incident_number: String,
    pub to: Vec<String>,
    pub subject: String,
}

impl EmailDraft {
    /// Addressed to the first affected user, with the incident in the subject line.
    pub fn for_incident(tab_id: &str, incident: &Incident, affected: &[AffectedUser]) -> Self {
        EmailDraft {
            tab_id: tab_id.to_string(),
            incident_number: incident.number.clone(),
            to: affected.first().map(|u| u.name.clone()).into_iter().collect(),
            subject: format!("{} - {}", incident.number, incident.short_description),
        }
    }

    /// Returns false for blank input.
    pub fn add_recipient(&mut self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.to.push(trimmed.to_string());
        true
    }

    pub fn remove_recipient(&mut self, name: &str) {
        self.to.retain(|r| r != name);
    }

    pub fn set_subject(&mut self, subject: &str) {
        self.subject = subject.to_string();
    }
}
