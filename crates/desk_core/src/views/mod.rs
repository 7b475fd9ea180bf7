use crate::domain::{AffectedUser, Incident};

/// States that put an unassigned incident on someone's work list anyway.
const WORK_STATES: &[&str] = &["Assigned", "Requirement Gathering", "Draft"];

pub fn unassigned(incidents: &[Incident]) -> Vec<&Incident> {
    incidents
        .iter()
        .filter(|i| i.assigned_to().is_none())
        .collect()
}

pub fn my_work(incidents: &[Incident]) -> Vec<&Incident> {
    incidents
        .iter()
        .filter(|i| {
            i.assigned_to().is_some() || i.state().is_some_and(|s| WORK_STATES.contains(&s))
        })
        .collect()
}

pub fn first_affected_user_label(users: &[AffectedUser]) -> String {
    match users {
        [] => "No affected user".to_string(),
        [only] => only.name.clone(),
        [first, rest @ ..] => format!("{} (+{} more)", first.name, rest.len()),
    }
}
