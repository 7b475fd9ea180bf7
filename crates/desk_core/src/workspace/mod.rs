use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{codes, AppError};

pub const HOME_TAB_ID: &str = "home";
pub const EMAIL_DRAFT_TITLE: &str = "New Email Draft";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    Home,
    Incident,
    Email,
}

/// One workspace unit in the tab strip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tab {
    pub id: String,
    pub title: String,
    pub closeable: bool,
    pub kind: TabKind,
    pub incident_number: Option<String>,
    pub parent_id: Option<String>,
}

impl Tab {
    fn home() -> Self {
        Tab {
            id: HOME_TAB_ID.to_string(),
            title: "Home".to_string(),
            closeable: false,
            kind: TabKind::Home,
            incident_number: None,
            parent_id: None,
        }
    }

    fn incident(number: &str) -> Self {
        Tab {
            id: format!("incident-{number}"),
            title: number.to_string(),
            closeable: true,
            kind: TabKind::Incident,
            incident_number: Some(number.to_string()),
            parent_id: None,
        }
    }

    fn email(parent_id: &str) -> Self {
        Tab {
            id: format!("email-{}", Uuid::new_v4()),
            title: EMAIL_DRAFT_TITLE.to_string(),
            closeable: true,
            kind: TabKind::Email,
            incident_number: None,
            parent_id: Some(parent_id.to_string()),
        }
    }

    /// Home and incident tabs can hold the primary selection.
    pub fn is_primary(&self) -> bool {
        self.kind != TabKind::Email
    }
}

/// Open tabs plus the primary and secondary selections.
///
/// Invariants:
/// - `home` is always the first tab and can never be closed.
/// - `active_tab_id` always names an existing home or incident tab.
/// - Email tabs always have a `parent_id` naming an open incident tab; closing an incident closes
///   its drafts.
/// - `active_secondary_tab_id` is cleared whenever the tab it names is closed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabWorkspace {
    tabs: Vec<Tab>,
    active_tab_id: String,
    active_secondary_tab_id: Option<String>,
}

impl Default for TabWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TabWorkspace {
    pub fn new() -> Self {
        TabWorkspace {
            tabs: vec![Tab::home()],
            active_tab_id: HOME_TAB_ID.to_string(),
            active_secondary_tab_id: None,
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    pub fn active_secondary_tab_id(&self) -> Option<&str> {
        self.active_secondary_tab_id.as_deref()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tab(&self.active_tab_id)
    }

    pub fn active_secondary_tab(&self) -> Option<&Tab> {
        self.active_secondary_tab_id
            .as_deref()
            .and_then(|id| self.tab(id))
    }

    /// Email drafts nested under an incident tab, in open order.
    pub fn email_tabs_for(&self, parent_id: &str) -> Vec<&Tab> {
        self.tabs
            .iter()
            .filter(|t| t.kind == TabKind::Email && t.parent_id.as_deref() == Some(parent_id))
            .collect()
    }

    /// Focus the tab for `number`, opening it first if needed. Returns the tab id.
    /// The secondary selection is left alone.
    pub fn open_incident(&mut self, number: &str) -> String {
        if let Some(existing) = self
            .tabs
            .iter()
            .find(|t| t.incident_number.as_deref() == Some(number))
        {
            self.active_tab_id = existing.id.clone();
            return existing.id.clone();
        }

        let tab = Tab::incident(number);
        let id = tab.id.clone();
        self.tabs.push(tab);
        self.active_tab_id = id.clone();
        id
    }

    /// Append a new draft under `parent_tab_id` and make it the secondary selection.
    /// Every call creates a distinct draft.
    pub fn open_email_draft(&mut self, parent_tab_id: &str) -> Result<String, AppError> {
        match self.tab(parent_tab_id) {
            Some(parent) if parent.kind == TabKind::Incident => {}
            Some(_) => {
                return Err(AppError::new(
                    codes::TAB_INVALID_PARENT,
                    "Email drafts can only be opened under an incident tab",
                )
                .with_details(format!("parent_id={parent_tab_id}")))
            }
            None => {
                return Err(AppError::new(codes::TAB_NOT_FOUND, "Parent tab is not open")
                    .with_details(format!("parent_id={parent_tab_id}")))
            }
        }

        let tab = Tab::email(parent_tab_id);
        let id = tab.id.clone();
        self.tabs.push(tab);
        self.active_secondary_tab_id = Some(id.clone());
        Ok(id)
    }

    pub fn close_tab(&mut self, tab_id: &str) -> Result<(), AppError> {
        let tab = self.tab(tab_id).ok_or_else(|| {
            AppError::new(codes::TAB_NOT_FOUND, "Tab is not open")
                .with_details(format!("tab_id={tab_id}"))
        })?;
        if !tab.closeable {
            return Err(
                AppError::new(codes::TAB_NOT_CLOSEABLE, "Tab cannot be closed")
                    .with_details(format!("tab_id={tab_id}")),
            );
        }

        let closing_primary = self.active_tab_id == tab_id;
        self.tabs
            .retain(|t| t.id != tab_id && t.parent_id.as_deref() != Some(tab_id));

        if closing_primary {
            // Home is never removed, so a primary candidate always remains.
            if let Some(last) = self.tabs.iter().rev().find(|t| t.is_primary()) {
                self.active_tab_id = last.id.clone();
            }
        }

        let secondary_gone = self
            .active_secondary_tab_id
            .as_deref()
            .is_some_and(|id| self.tab(id).is_none());
        if secondary_gone {
            self.active_secondary_tab_id = None;
        }

        tracing::debug!(tab_id, active = %self.active_tab_id, "closed tab");
        Ok(())
    }

    /// Email tabs only move the secondary selection; other tabs become primary and clear it.
    pub fn switch_to(&mut self, tab_id: &str) -> Result<(), AppError> {
        let kind = self.tab(tab_id).map(|t| t.kind).ok_or_else(|| {
            AppError::new(codes::TAB_NOT_FOUND, "Tab is not open")
                .with_details(format!("tab_id={tab_id}"))
        })?;

        if kind == TabKind::Email {
            self.active_secondary_tab_id = Some(tab_id.to_string());
        } else {
            self.active_tab_id = tab_id.to_string();
            self.active_secondary_tab_id = None;
        }
        Ok(())
    }

    /// Set the secondary selection as given. The id is not checked against open tabs.
    pub fn switch_secondary(&mut self, tab_id: Option<&str>) {
        self.active_secondary_tab_id = tab_id.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_single_home_tab() {
        let ws = TabWorkspace::new();
        assert_eq!(ws.tabs().len(), 1);
        assert_eq!(ws.active_tab_id(), HOME_TAB_ID);
        assert!(!ws.tabs()[0].closeable);
        assert!(ws.active_secondary_tab_id().is_none());
    }

    #[test]
    fn email_tab_ids_are_unique() {
        let mut ws = TabWorkspace::new();
        let parent = ws.open_incident("INC1");
        let a = ws.open_email_draft(&parent).expect("draft a");
        let b = ws.open_email_draft(&parent).expect("draft b");
        assert_ne!(a, b);
        assert!(a.starts_with("email-"));
        assert_eq!(ws.email_tabs_for(&parent).len(), 2);
        assert_eq!(ws.active_secondary_tab_id(), Some(b.as_str()));
    }

    #[test]
    fn email_draft_requires_incident_parent() {
        let mut ws = TabWorkspace::new();
        let err = ws.open_email_draft(HOME_TAB_ID).unwrap_err();
        assert_eq!(err.code, codes::TAB_INVALID_PARENT);
        let err = ws.open_email_draft("incident-nope").unwrap_err();
        assert_eq!(err.code, codes::TAB_NOT_FOUND);
        assert_eq!(ws.tabs().len(), 1);
    }
}
