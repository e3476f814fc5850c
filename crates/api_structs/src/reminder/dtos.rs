use serde::{Deserialize, Serialize};
use tickd_domain::{Reminder, ReminderChannel, ReminderStatus, ID};

/// The wire representation of a `Reminder`. The field set and the enum
/// values (`IN_APP|PUSH|EMAIL`, `PENDING|SENT|DISMISSED|SNOOZED`) are a
/// compatibility contract with existing clients and must not change.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    #[serde(rename = "type")]
    pub channel: ReminderChannel,
    pub fire_at: i64,
    pub relative_offset: Option<i64>,
    pub status: ReminderStatus,
    pub snoozed_until: Option<i64>,
    pub snooze_count: i64,
    pub sent_at: Option<i64>,
    pub dismissed_at: Option<i64>,
    pub task_id: ID,
    pub user_id: ID,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            channel: reminder.channel,
            fire_at: reminder.fire_at,
            relative_offset: reminder.relative_offset,
            status: reminder.status,
            snoozed_until: reminder.snoozed_until,
            snooze_count: reminder.snooze_count,
            sent_at: reminder.sent_at,
            dismissed_at: reminder.dismissed_at,
            task_id: reminder.task_id,
            user_id: reminder.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_the_literal_wire_field_names() {
        let reminder = Reminder::new(
            Default::default(),
            Default::default(),
            ReminderChannel::InApp,
            1741617000000,
        );
        let json = serde_json::to_value(ReminderDTO::new(reminder)).unwrap();

        for field in [
            "id",
            "type",
            "fireAt",
            "relativeOffset",
            "status",
            "snoozedUntil",
            "snoozeCount",
            "sentAt",
            "dismissedAt",
            "taskId",
            "userId",
        ] {
            assert!(json.get(field).is_some(), "missing field: {}", field);
        }
        assert_eq!(json["type"], "IN_APP");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["fireAt"], 1741617000000i64);
    }
}
