use serde::{ Serialize, Deserialize };
use chrono::{NaiveDate, DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trimester {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyDetails {
    pub due_date: NaiveDate,
    pub current_week: i64,
    pub trimester: Trimester,
    #[serde(rename = "daysSinceLMP")]
    pub days_since_lmp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub week: i64,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderEvent {
    pub week: i64,
    /// Persisted as a midnight-UTC ISO-8601 timestamp.
    #[serde(with = "iso_midnight")]
    pub date: NaiveDate,
    pub message: String,
    #[serde(default)]
    pub sent: bool,
}

/// Delivery log entry, appended on every successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentReminder {
    #[serde(rename = "type")]
    pub reminder_type: String,
    pub message: String,
    pub sent_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub lmp: NaiveDate,
    pub health_worker: String,
    pub facility: String,
    pub registered_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reminders: Vec<ReminderEvent>,
    #[serde(default)]
    pub sent_reminders: Vec<SentReminder>,
}

/// Registration form body. Fields accept any JSON scalar, so a phone number
/// sent as a number is kept as text.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub lmp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub health_worker: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub facility: Option<String>,
}

/// Partial update. Unknown fields (including `id` and `reminders`) are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub lmp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub health_worker: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub facility: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReminderRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub patient_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reminder_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    Sent,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub status: DispatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReminderStatus {
    Pending,
    #[serde(rename = "All Sent")]
    AllSent,
}

impl ReminderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::AllSent => "all sent",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub next_reminder_date: Option<NaiveDate>,
    pub status: ReminderStatus,
}

/// Strings pass through, numbers and `true` become their text; `null` and
/// `false` count as absent. Arrays and objects are rejected.
fn lenient_text<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    use serde::de::Error;
    use serde_json::Value;

    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(true)) => Ok(Some("true".into())),
        Some(other) => Err(D::Error::custom(format!("expected text, found {other}"))),
    }
}

mod iso_midnight {
    use chrono::{NaiveDate, NaiveTime, SecondsFormat};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        let ts = date.and_time(NaiveTime::MIN).and_utc();
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        crate::pregnancy::parse_date(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_date_is_written_as_midnight_timestamp() {
        let event = ReminderEvent {
            week: 12,
            date: NaiveDate::from_ymd_opt(2024, 3, 25).unwrap(),
            message: "visit".into(),
            sent: false,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["date"], "2024-03-25T00:00:00.000Z");
        assert_eq!(value["week"], 12);
    }

    #[test]
    fn reads_records_written_by_the_node_backend() {
        let raw = r#"{
            "id": "1717171717171",
            "name": "Amina",
            "phone": "0700000000",
            "lmp": "2024-01-01",
            "healthWorker": "Grace",
            "facility": "Kisumu HC",
            "registeredDate": "2024-02-01T09:30:00.000Z",
            "reminders": [
                {"week": 12, "date": "2024-03-25T00:00:00.000Z", "message": "m", "sent": false}
            ]
        }"#;
        let patient: Patient = serde_json::from_str(raw).unwrap();
        assert_eq!(patient.reminders[0].date, NaiveDate::from_ymd_opt(2024, 3, 25).unwrap());
        assert!(patient.sent_reminders.is_empty());
        assert!(patient.updated_date.is_none());
    }

    #[test]
    fn form_fields_accept_numbers_as_text() {
        let body: NewPatient = serde_json::from_str(
            r#"{"name": "Amina", "phone": 700000000, "lmp": null, "facility": false}"#,
        )
        .unwrap();
        assert_eq!(body.phone.as_deref(), Some("700000000"));
        assert!(body.lmp.is_none());
        assert!(body.facility.is_none());
        assert!(body.health_worker.is_none());

        let nested = serde_json::from_str::<NewPatient>(r#"{"name": ["Amina"]}"#);
        assert!(nested.is_err());
    }

    #[test]
    fn sent_reminder_uses_type_key() {
        let entry = SentReminder {
            reminder_type: "appointment".into(),
            message: "hi".into(),
            sent_date: "2024-05-01T10:00:00Z".parse().unwrap(),
            week: None,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "appointment");
        assert!(value.get("week").is_none());
        assert!(value.get("sentDate").is_some());
    }
}
