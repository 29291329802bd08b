use chrono::NaiveDate;
use crate::error::RegistryError;
use crate::models::{Milestone, ReminderEvent};
use crate::pregnancy::add_days;

/// Prenatal visit milestones, ascending by gestational week. This is the only
/// copy of the table; the front end fetches it from `/api/milestones`.
pub const DEFAULT_MILESTONES: [Milestone; 7] = [
    Milestone { week: 12, message: "Time for your first prenatal visit! Please visit your health facility." },
    Milestone { week: 16, message: "Second prenatal visit due. Don't forget your tetanus vaccination!" },
    Milestone { week: 20, message: "Ultrasound scan recommended. Book your appointment today." },
    Milestone { week: 24, message: "Third prenatal visit is due. Monitor your baby's growth." },
    Milestone { week: 28, message: "Important prenatal checkup needed. Stay healthy!" },
    Milestone { week: 32, message: "Getting closer! Time for another prenatal visit." },
    Milestone { week: 36, message: "Final prenatal visit before delivery. Prepare for childbirth." },
];

pub fn build_reminder_schedule(lmp: NaiveDate) -> Result<Vec<ReminderEvent>, RegistryError> {
    build_reminder_schedule_with(lmp, &DEFAULT_MILESTONES)
}

/// Output is ordered by week regardless of the input order; the dashboard
/// relies on the first unsent event being the next one due.
pub fn build_reminder_schedule_with(
    lmp: NaiveDate,
    milestones: &[Milestone],
) -> Result<Vec<ReminderEvent>, RegistryError> {
    let mut events = milestones
        .iter()
        .map(|m| {
            Ok(ReminderEvent {
                week: m.week,
                date: add_days(lmp, m.week.saturating_mul(7))?,
                message: m.message.to_string(),
                sent: false,
            })
        })
        .collect::<Result<Vec<_>, RegistryError>>()?;

    events.sort_by_key(|e| e.week);
    Ok(events)
}
