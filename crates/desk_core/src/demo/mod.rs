use serde_json::{json, Value};

use crate::domain::{AffectedUser, Incident, User};
use crate::normalize::records::normalize_incident;

fn fallback_incident_rows() -> Vec<Value> {
    vec![
        json!({
            "number": "INC-FALLBACK-1",
            "short_description": "API connection failed - fallback data",
            "state": "New",
            "priority": "3 - Moderate",
            "impact": "3",
            "urgency": "3",
            "category": "Network",
            "assignment_group": "IT Support"
        }),
        json!({
            "number": "INC-FALLBACK-2",
            "short_description": "Unable to connect to backend service",
            "state": "Draft",
            "priority": "2 - High",
            "impact": "2",
            "urgency": "2",
            "category": "Application",
            "assigned_to": "System Administrator"
        }),
    ]
}

/// Placeholder incidents shown while the incidents backend is unavailable.
pub fn fallback_incidents() -> Vec<Incident> {
    fallback_incident_rows()
        .iter()
        .map(normalize_incident)
        .collect()
}

/// Placeholder affected user for an incident. Deterministic per incident number.
pub fn fallback_affected_users(incident_number: &str) -> Vec<AffectedUser> {
    if incident_number.contains("1867021") {
        vec![AffectedUser::new(
            "user_002",
            "Luis Valdez",
            "luis.valdez@company.com",
            "Application Support",
        )]
    } else {
        vec![AffectedUser::new(
            "user_001",
            "NTT ebonding User",
            "ntt.ebonding@company.com",
            "Network Operations",
        )]
    }
}

fn directory() -> Vec<User> {
    // (id, name, email, department, title)
    [
        ("1", "John Smith", "john.smith@company.com", "IT Support", "Senior Support Engineer"),
        ("2", "Sarah Johnson", "sarah.johnson@company.com", "Network Operations", "Network Administrator"),
        ("3", "Mike Chen", "mike.chen@company.com", "Application Support", "Application Specialist"),
        ("4", "Emily Davis", "emily.davis@company.com", "Security Team", "Security Analyst"),
        ("5", "David Wilson", "david.wilson@company.com", "Infrastructure", "System Administrator"),
        ("6", "Renukumar P", "renukumar.p@company.com", "Application Support", "Senior Application Engineer"),
        ("7", "Lisa Martinez", "lisa.martinez@company.com", "Database Administration", "Database Administrator"),
        ("8", "Robert Brown", "robert.brown@company.com", "Network Operations", "Network Engineer"),
        ("9", "Jennifer Lee", "jennifer.lee@company.com", "Security Team", "Information Security Officer"),
        ("10", "Andrew Kumar", "andrew.kumar@company.com", "IT Support", "Help Desk Specialist"),
    ]
    .into_iter()
    .map(|(id, name, email, department, title)| {
        User::new(id, name, email)
            .with_department(department)
            .with_title(title)
    })
    .collect()
}

/// Placeholder directory matches: case-insensitive substring over name, email and department.
pub fn fallback_user_search(query: &str) -> Vec<User> {
    let needle = query.to_lowercase();
    directory()
        .into_iter()
        .filter(|u| {
            u.name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
                || u
                    .department
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}
