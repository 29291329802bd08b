//! Patient persistence.
//!
//! The JSON file store rewrites the whole collection on every mutation. Each
//! call is serialized by a mutex, but callers that `get` and later `upsert`
//! do so without holding it, so two concurrent updates to the same patient
//! are last-writer-wins. A second process pointed at the same file races the
//! same way.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::RegistryError;
use crate::models::Patient;

pub trait PatientStore: Send + Sync {
    fn list(&self) -> Result<Vec<Patient>, RegistryError>;
    fn get(&self, id: &str) -> Result<Patient, RegistryError>;
    /// Replaces the record with the same id, or appends it.
    fn upsert(&self, patient: Patient) -> Result<(), RegistryError>;
    fn delete(&self, id: &str) -> Result<(), RegistryError>;
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates the parent directory and an empty `[]` file when missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        if !path.exists() {
            write_atomic(&path, &[])?;
            tracing::info!("📁 Created empty patient file at {}", path.display());
        }

        Ok(Self { path, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, RegistryError> {
        self.lock
            .lock()
            .map_err(|_| RegistryError::Persistence("patient store lock poisoned".into()))
    }

    fn read_all(&self) -> Result<Vec<Patient>, RegistryError> {
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

fn write_atomic(path: &Path, patients: &[Patient]) -> Result<(), RegistryError> {
    let body = serde_json::to_string_pretty(patients)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl PatientStore for JsonFileStore {
    fn list(&self) -> Result<Vec<Patient>, RegistryError> {
        let _guard = self.guard()?;
        self.read_all()
    }

    fn get(&self, id: &str) -> Result<Patient, RegistryError> {
        let _guard = self.guard()?;
        self.read_all()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(RegistryError::patient_not_found)
    }

    fn upsert(&self, patient: Patient) -> Result<(), RegistryError> {
        let _guard = self.guard()?;
        let mut patients = self.read_all()?;

        match patients.iter_mut().find(|p| p.id == patient.id) {
            Some(existing) => *existing = patient,
            None => patients.push(patient),
        }

        write_atomic(&self.path, &patients)
    }

    fn delete(&self, id: &str) -> Result<(), RegistryError> {
        let _guard = self.guard()?;
        let mut patients = self.read_all()?;
        let before = patients.len();
        patients.retain(|p| p.id != id);

        if patients.len() == before {
            return Err(RegistryError::patient_not_found());
        }
        write_atomic(&self.path, &patients)
    }
}

/// In-memory store for unit tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    patients: Mutex<Vec<Patient>>,
}

#[cfg(test)]
impl PatientStore for MemoryStore {
    fn list(&self) -> Result<Vec<Patient>, RegistryError> {
        Ok(self.patients.lock().unwrap().clone())
    }

    fn get(&self, id: &str) -> Result<Patient, RegistryError> {
        self.patients
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(RegistryError::patient_not_found)
    }

    fn upsert(&self, patient: Patient) -> Result<(), RegistryError> {
        let mut patients = self.patients.lock().unwrap();
        match patients.iter_mut().find(|p| p.id == patient.id) {
            Some(existing) => *existing = patient,
            None => patients.push(patient),
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), RegistryError> {
        let mut patients = self.patients.lock().unwrap();
        let before = patients.len();
        patients.retain(|p| p.id != id);
        if patients.len() == before {
            return Err(RegistryError::patient_not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn patient(id: &str, name: &str) -> Patient {
        Patient {
            id: id.into(),
            name: name.into(),
            phone: "0700000000".into(),
            lmp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            health_worker: "Grace".into(),
            facility: "Kisumu HC".into(),
            registered_date: Utc::now(),
            updated_date: None,
            reminders: crate::schedule::build_reminder_schedule(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .unwrap(),
            sent_reminders: vec![],
        }
    }

    #[test]
    fn open_creates_directory_and_empty_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data").join("patients.json");

        let store = JsonFileStore::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn upsert_then_reopen_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patients.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.upsert(patient("a", "Amina")).unwrap();
        store.upsert(patient("b", "Wanjiru")).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        let names: Vec<String> = reopened.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Amina", "Wanjiru"]);
        assert_eq!(reopened.get("b").unwrap().reminders.len(), 7);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(tmp.path().join("patients.json")).unwrap();
        store.upsert(patient("a", "Amina")).unwrap();
        store.upsert(patient("b", "Wanjiru")).unwrap();

        store.upsert(patient("a", "Amina Otieno")).unwrap();

        let all = store.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Amina Otieno");
    }

    #[test]
    fn delete_unknown_id_is_not_found_and_leaves_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patients.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.upsert(patient("a", "Amina")).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        assert!(matches!(store.delete("zzz"), Err(RegistryError::NotFound(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);

        store.delete("a").unwrap();
        assert!(matches!(store.get("a"), Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn corrupt_file_is_a_persistence_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patients.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(matches!(store.list(), Err(RegistryError::Persistence(_))));
    }

    #[test]
    fn no_temp_file_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patients.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.upsert(patient("a", "Amina")).unwrap();

        assert!(!path.with_extension("json.tmp").exists());
    }
}
