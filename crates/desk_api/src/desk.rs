use std::sync::Arc;

use desk_core::cache::{Clock, SystemClock};
use desk_core::config::DeskConfig;
use desk_core::domain::{AffectedUser, AssignmentResult, Incident, User};
use desk_core::email::EmailDraft;
use desk_core::error::{codes, AppError};
use desk_core::normalize::records::NO_DESCRIPTION;
use desk_core::search::{SearchPoll, SearchSession};
use desk_core::workspace::TabWorkspace;

use crate::affected_users::AffectedUsersApi;
use crate::assignment;
use crate::http::{Transport, UreqTransport};
use crate::incidents::IncidentsApi;
use crate::users::UserDirectoryApi;

/// Everything the dashboard needs from the backend, built once at startup and shared.
pub struct Desk {
    config: Arc<DeskConfig>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    incidents: IncidentsApi,
    affected_users: AffectedUsersApi,
    users: UserDirectoryApi,
}

impl Desk {
    /// Production wiring: `ureq` transport and the system clock.
    pub fn new(config: DeskConfig) -> Result<Self, AppError> {
        config.validate()?;
        let transport = Arc::new(UreqTransport::new(config.request_timeout));
        Ok(Self::with_parts(config, transport, Arc::new(SystemClock)))
    }

    pub fn with_parts(
        config: DeskConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let config = Arc::new(config);
        Desk {
            incidents: IncidentsApi::new(config.clone(), transport.clone(), clock.clone()),
            affected_users: AffectedUsersApi::new(
                config.clone(),
                transport.clone(),
                clock.clone(),
            ),
            users: UserDirectoryApi::new(config.clone(), transport.clone(), clock.clone()),
            config,
            transport,
            clock,
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn incidents_api(&self) -> &IncidentsApi {
        &self.incidents
    }

    pub fn affected_users_api(&self) -> &AffectedUsersApi {
        &self.affected_users
    }

    pub fn users_api(&self) -> &UserDirectoryApi {
        &self.users
    }

    pub fn incidents(&self, force: bool) -> Vec<Incident> {
        self.incidents.fetch(force)
    }

    pub fn incident(&self, number: &str) -> Option<Incident> {
        self.incidents(false).into_iter().find(|i| i.number == number)
    }

    pub fn affected_users(&self, incident_number: &str, force: bool) -> Vec<AffectedUser> {
        self.affected_users.fetch(incident_number, force)
    }

    pub fn search_users(&self, query: &str) -> Vec<User> {
        self.users.search(query)
    }

    /// Drive a search session: dispatch a settled query and apply its results.
    /// Returns whether new results were stored.
    pub fn pump_search(&self, session: &mut SearchSession) -> bool {
        match session.poll(self.clock.now_ms()) {
            SearchPoll::Dispatch(ticket) => {
                let results = self.search_users(&ticket.query);
                session.apply(&ticket, results)
            }
            SearchPoll::Cleared | SearchPoll::Idle => false,
        }
    }

    pub fn assign(
        &self,
        incident_number: &str,
        assignee: Option<&User>,
    ) -> Result<AssignmentResult, AppError> {
        assignment::assign(
            &self.config,
            self.transport.as_ref(),
            self.clock.as_ref(),
            incident_number,
            assignee,
        )
    }

    /// Assign, then drop and reload the incident list so views reflect the new assignee.
    /// On failure nothing is invalidated.
    pub fn assign_and_refresh(
        &self,
        incident_number: &str,
        assignee: Option<&User>,
    ) -> Result<(AssignmentResult, Vec<Incident>), AppError> {
        let result = self.assign(incident_number, assignee)?;
        self.incidents.clear();
        let refreshed = self.incidents.fetch(true);
        Ok((result, refreshed))
    }

    /// Open a draft tab under `parent_tab_id` and pre-fill it from the incident.
    pub fn open_email_draft(
        &self,
        workspace: &mut TabWorkspace,
        parent_tab_id: &str,
    ) -> Result<EmailDraft, AppError> {
        let tab_id = workspace.open_email_draft(parent_tab_id)?;
        let number = workspace
            .tab(parent_tab_id)
            .and_then(|t| t.incident_number.clone())
            .ok_or_else(|| {
                AppError::new(codes::TAB_INVALID_PARENT, "Parent tab has no incident")
                    .with_details(format!("parent_id={parent_tab_id}"))
            })?;

        let incident = self.incident(&number).unwrap_or_else(|| Incident {
            number: number.clone(),
            short_description: NO_DESCRIPTION.to_string(),
            extra: Default::default(),
        });
        let affected = self.affected_users(&number, false);
        Ok(EmailDraft::for_incident(&tab_id, &incident, &affected))
    }

    pub fn clear_caches(&self) {
        self.incidents.clear();
        self.affected_users.clear();
        self.users.clear();
    }
}
