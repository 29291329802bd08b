use crate::models::{Patient, PatientSummary, ReminderEvent, ReminderStatus};

pub fn next_pending_reminder(patient: &Patient) -> Option<&ReminderEvent> {
    patient.reminders.iter().find(|r| !r.sent)
}

pub fn reminder_status(patient: &Patient) -> ReminderStatus {
    match next_pending_reminder(patient) {
        Some(_) => ReminderStatus::Pending,
        None => ReminderStatus::AllSent,
    }
}

/// Case-insensitive substring match on name, phone or status text. The term
/// is used as typed: an empty term matches everyone, whitespace is not
/// trimmed.
pub fn matches_search(patient: &Patient, term: &str) -> bool {
    let term = term.to_lowercase();

    patient.name.to_lowercase().contains(&term)
        || patient.phone.to_lowercase().contains(&term)
        || reminder_status(patient).as_str().contains(&term)
}

pub fn summarize(patient: &Patient) -> PatientSummary {
    PatientSummary {
        id: patient.id.clone(),
        name: patient.name.clone(),
        phone: patient.phone.clone(),
        next_reminder_date: next_pending_reminder(patient).map(|r| r.date),
        status: reminder_status(patient),
    }
}

pub fn summaries(patients: &[Patient], search: Option<&str>) -> Vec<PatientSummary> {
    patients
        .iter()
        .filter(|p| search.map_or(true, |term| matches_search(p, term)))
        .map(summarize)
        .collect()
}
