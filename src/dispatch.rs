//! Manual reminder delivery.

use chrono::{DateTime, Utc};

use crate::error::RegistryError;
use crate::models::{DispatchResult, DispatchStatus, Patient, SendReminderRequest, SentReminder};
use crate::store::PatientStore;

pub const DEFAULT_MESSAGE: &str = "Reminder: Please attend your appointment.";
pub const DEFAULT_REMINDER_TYPE: &str = "appointment";

pub trait DeliveryChannel: Send + Sync {
    fn deliver(&self, patient: &Patient, message: &str) -> DispatchStatus;
}

/// Stand-in for an SMS gateway: logs the message and reports it sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogChannel;

impl DeliveryChannel for LogChannel {
    fn deliver(&self, patient: &Patient, message: &str) -> DispatchStatus {
        tracing::info!(
            patient_id = %patient.id,
            phone = %patient.phone,
            "📱 SMS reminder for {}: {}",
            patient.name,
            message
        );
        DispatchStatus::Sent
    }
}

/// Whether a manual dispatch also marks a scheduled reminder as sent.
///
/// `LogOnly` leaves `reminders[].sent` untouched, so the dashboard keeps
/// showing "Pending" after a manual send. `MarkNextPending` flips the first
/// unsent scheduled reminder and records its week in the log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    #[default]
    LogOnly,
    MarkNextPending,
}

pub fn dispatch(
    store: &dyn PatientStore,
    channel: &dyn DeliveryChannel,
    policy: ReconcilePolicy,
    request: SendReminderRequest,
    now: DateTime<Utc>,
) -> Result<DispatchResult, RegistryError> {
    let patient_id = request
        .patient_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| RegistryError::Validation("patientId is required".into()))?;
    let message = request
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
    let reminder_type = request
        .reminder_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REMINDER_TYPE.to_string());

    let mut patient = store.get(&patient_id)?;

    if channel.deliver(&patient, &message) == DispatchStatus::Failed {
        tracing::warn!("⚠️ Reminder delivery failed for patient {}", patient.id);
        return Ok(DispatchResult { status: DispatchStatus::Failed, week: None });
    }

    let week = match policy {
        ReconcilePolicy::LogOnly => None,
        ReconcilePolicy::MarkNextPending => patient
            .reminders
            .iter_mut()
            .find(|r| !r.sent)
            .map(|r| {
                r.sent = true;
                r.week
            }),
    };

    patient.sent_reminders.push(SentReminder {
        reminder_type,
        message,
        sent_date: now,
        week,
    });
    store.upsert(patient)?;

    Ok(DispatchResult { status: DispatchStatus::Sent, week })
}
