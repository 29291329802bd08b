use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::RegistryError;
use crate::models::{NewPatient, Patient, PatientUpdate};
use crate::pregnancy::parse_lmp;
use crate::schedule::build_reminder_schedule;
use crate::store::PatientStore;

const MISSING_FIELDS: &str = "All fields are required";

fn required(field: Option<String>) -> Result<String, RegistryError> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RegistryError::Validation(MISSING_FIELDS.into()))
}

/// `None` keeps the current value; a provided blank value is rejected.
fn replacement(field: Option<String>, name: &str) -> Result<Option<String>, RegistryError> {
    match field {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => {
            Err(RegistryError::Validation(format!("{name} cannot be empty")))
        }
        Some(v) => Ok(Some(v.trim().to_string())),
    }
}

pub fn create(
    store: &dyn PatientStore,
    input: NewPatient,
    now: DateTime<Utc>,
) -> Result<Patient, RegistryError> {
    let name = required(input.name)?;
    let phone = required(input.phone)?;
    let lmp_raw = required(input.lmp)?;
    let health_worker = required(input.health_worker)?;
    let facility = required(input.facility)?;
    let lmp = parse_lmp(&lmp_raw)?;

    let patient = Patient {
        id: Uuid::new_v4().to_string(),
        name,
        phone,
        lmp,
        health_worker,
        facility,
        registered_date: now,
        updated_date: None,
        reminders: build_reminder_schedule(lmp)?,
        sent_reminders: Vec::new(),
    };

    store.upsert(patient.clone())?;

    tracing::info!("🤰 New patient registered: {} ({})", patient.name, patient.id);
    for r in &patient.reminders {
        tracing::info!("📅 Week {} reminder scheduled for {}", r.week, r.date);
    }

    Ok(patient)
}

pub fn list(store: &dyn PatientStore) -> Result<Vec<Patient>, RegistryError> {
    store.list()
}

pub fn get(store: &dyn PatientStore, id: &str) -> Result<Patient, RegistryError> {
    store.get(id)
}

/// The reminder schedule is fixed at registration, so a corrected LMP does
/// not move already-scheduled reminders.
pub fn update(
    store: &dyn PatientStore,
    id: &str,
    changes: PatientUpdate,
    now: DateTime<Utc>,
) -> Result<Patient, RegistryError> {
    let mut patient = store.get(id)?;

    if let Some(name) = replacement(changes.name, "name")? {
        patient.name = name;
    }
    if let Some(phone) = replacement(changes.phone, "phone")? {
        patient.phone = phone;
    }
    if let Some(lmp) = replacement(changes.lmp, "lmp")? {
        patient.lmp = parse_lmp(&lmp)?;
    }
    if let Some(worker) = replacement(changes.health_worker, "healthWorker")? {
        patient.health_worker = worker;
    }
    if let Some(facility) = replacement(changes.facility, "facility")? {
        patient.facility = facility;
    }
    patient.updated_date = Some(now);

    store.upsert(patient.clone())?;
    tracing::info!("✏️ Patient {} updated", patient.id);

    Ok(patient)
}

pub fn delete(store: &dyn PatientStore, id: &str) -> Result<(), RegistryError> {
    store.delete(id)?;
    tracing::info!("🗑️ Patient {} deleted", id);
    Ok(())
}
