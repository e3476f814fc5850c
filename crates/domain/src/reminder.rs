use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Snooze durations in minutes accepted by the quick-snooze API.
/// Arbitrary deferrals go through the absolute `until` form instead.
pub const SNOOZE_PRESETS_MINUTES: [i64; 5] = [5, 15, 30, 60, 1440];

const MILLIS_PER_MINUTE: i64 = 60 * 1000;

/// Computes the absolute fire time for a reminder scheduled
/// `minutes_before` minutes before `due_date`.
pub fn fire_at_from_offset(due_date: i64, minutes_before: i64) -> i64 {
    due_date - minutes_before * MILLIS_PER_MINUTE
}

/// Delivery channel for a `Reminder`, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderChannel {
    InApp,
    Push,
    Email,
}

impl ReminderChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InApp => "IN_APP",
            Self::Push => "PUSH",
            Self::Email => "EMAIL",
        }
    }
}

impl FromStr for ReminderChannel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_APP" => Ok(Self::InApp),
            "PUSH" => Ok(Self::Push),
            "EMAIL" => Ok(Self::Email),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Dismissed,
    Snoozed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Sent => "SENT",
            Self::Dismissed => "DISMISSED",
            Self::Snoozed => "SNOOZED",
        }
    }
}

impl FromStr for ReminderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "SENT" => Ok(Self::Sent),
            "DISMISSED" => Ok(Self::Dismissed),
            "SNOOZED" => Ok(Self::Snoozed),
            _ => Err(()),
        }
    }
}

/// Reminder preset attached to a task at creation: notify over `channel`
/// `minutes_before` minutes before the task's due date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    #[serde(rename = "type")]
    pub channel: ReminderChannel,
    #[serde(rename = "relativeOffset")]
    pub minutes_before: i64,
}

impl ReminderSettings {
    pub fn is_valid(&self) -> bool {
        self.minutes_before >= 0
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReminderStateError {
    #[error("A dismissed reminder cannot be snoozed")]
    AlreadyDismissed,
    #[error("Snooze time: {0} is not in the future")]
    SnoozeTimeNotInFuture(i64),
}

/// Outcome of an idempotent state transition. `Noop` means the reminder
/// was already in a state where the transition does not apply, which is
/// not an error: overlapping poll cycles and double-clicks both land here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Noop,
}

/// A `Reminder` is a scheduled notification tied to a `Task`, with its own
/// lifecycle independent of the task's status.
///
/// State machine:
/// - PENDING or SNOOZED can be marked SENT (by the delivery poller)
/// - PENDING, SENT and SNOOZED can be snoozed, re-deferring the reminder
/// - every non-terminal state can be dismissed; DISMISSED is absorbing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ID,
    /// The `Task` this `Reminder` is associated with
    pub task_id: ID,
    pub user_id: ID,
    pub channel: ReminderChannel,
    /// The absolute timestamp in millis at which this reminder becomes due.
    /// Set once at creation and never mutated, only superseded by
    /// `snoozed_until` while the reminder is snoozed.
    pub fire_at: i64,
    /// Minutes before the task due date this reminder was scheduled at,
    /// `None` if it was scheduled at an absolute time
    pub relative_offset: Option<i64>,
    pub status: ReminderStatus,
    pub snoozed_until: Option<i64>,
    pub snooze_count: i64,
    pub sent_at: Option<i64>,
    pub dismissed_at: Option<i64>,
}

impl Reminder {
    pub fn new(task_id: ID, user_id: ID, channel: ReminderChannel, fire_at: i64) -> Self {
        Self {
            id: Default::default(),
            task_id,
            user_id,
            channel,
            fire_at,
            relative_offset: None,
            status: ReminderStatus::Pending,
            snoozed_until: None,
            snooze_count: 0,
            sent_at: None,
            dismissed_at: None,
        }
    }

    /// `snoozed_until` if snoozed, else `fire_at`. This is the time the
    /// poller compares against the wall clock.
    pub fn effective_fire_at(&self) -> i64 {
        match self.status {
            ReminderStatus::Snoozed => self.snoozed_until.unwrap_or(self.fire_at),
            _ => self.fire_at,
        }
    }

    /// Whether the reminder has reached its effective fire time. The
    /// comparison is inclusive: a reminder due exactly at `now` is due.
    pub fn is_due(&self, now: i64) -> bool {
        matches!(
            self.status,
            ReminderStatus::Pending | ReminderStatus::Snoozed
        ) && self.effective_fire_at() <= now
    }

    /// Defers the reminder to `until`. Re-snoozing an already snoozed
    /// reminder simply re-defers it, but every call increments
    /// `snooze_count`.
    pub fn snooze(&mut self, until: i64, now: i64) -> Result<(), ReminderStateError> {
        if self.status == ReminderStatus::Dismissed {
            return Err(ReminderStateError::AlreadyDismissed);
        }
        if until <= now {
            return Err(ReminderStateError::SnoozeTimeNotInFuture(until));
        }
        self.status = ReminderStatus::Snoozed;
        self.snoozed_until = Some(until);
        self.snooze_count += 1;
        Ok(())
    }

    /// Marks the reminder sent. Only PENDING and SNOOZED transition,
    /// anything else is a `Noop` so that overlapping poll cycles can
    /// safely double-apply.
    pub fn mark_sent(&mut self, now: i64) -> Transition {
        match self.status {
            ReminderStatus::Pending | ReminderStatus::Snoozed => {
                self.status = ReminderStatus::Sent;
                self.sent_at = Some(now);
                self.snoozed_until = None;
                Transition::Applied
            }
            _ => Transition::Noop,
        }
    }

    /// Terminal transition, allowed from any non-dismissed state.
    /// Dismissing twice leaves `dismissed_at` untouched.
    pub fn dismiss(&mut self, now: i64) -> Transition {
        if self.status == ReminderStatus::Dismissed {
            return Transition::Noop;
        }
        self.status = ReminderStatus::Dismissed;
        self.dismissed_at = Some(now);
        self.snoozed_until = None;
        Transition::Applied
    }
}

impl Entity<ID> for Reminder {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder_factory(fire_at: i64) -> Reminder {
        Reminder::new(
            Default::default(),
            Default::default(),
            ReminderChannel::InApp,
            fire_at,
        )
    }

    #[test]
    fn computes_fire_at_for_all_presets() {
        // Task due at 2025-03-10T15:00:00Z
        let due_date = 1741618800000;
        for minutes in SNOOZE_PRESETS_MINUTES {
            assert_eq!(
                fire_at_from_offset(due_date, minutes),
                due_date - minutes * 60 * 1000
            );
        }
        assert_eq!(fire_at_from_offset(due_date, 0), due_date);
        // 30 minutes before => 2025-03-10T14:30:00Z
        assert_eq!(fire_at_from_offset(due_date, 30), 1741617000000);
    }

    #[test]
    fn new_reminder_is_pending() {
        let reminder = reminder_factory(100);
        assert_eq!(reminder.status, ReminderStatus::Pending);
        assert_eq!(reminder.snooze_count, 0);
        assert_eq!(reminder.effective_fire_at(), 100);
    }

    #[test]
    fn due_comparison_is_inclusive() {
        let now = 1000 * 60 * 60;
        let before = reminder_factory(now - 10 * 60 * 1000);
        let exact = reminder_factory(now);
        let after = reminder_factory(now + 10 * 60 * 1000);
        assert!(before.is_due(now));
        assert!(exact.is_due(now));
        assert!(!after.is_due(now));
    }

    #[test]
    fn mark_sent_is_idempotent() {
        let mut reminder = reminder_factory(100);
        assert_eq!(reminder.mark_sent(150), Transition::Applied);
        assert_eq!(reminder.sent_at, Some(150));

        assert_eq!(reminder.mark_sent(200), Transition::Noop);
        assert_eq!(reminder.status, ReminderStatus::Sent);
        assert_eq!(reminder.sent_at, Some(150));
    }

    #[test]
    fn sent_reminder_is_not_due() {
        let mut reminder = reminder_factory(100);
        reminder.mark_sent(150);
        assert!(!reminder.is_due(200));
    }

    #[test]
    fn snooze_defers_and_counts() {
        let t0 = 1000 * 60;
        let mut reminder = reminder_factory(t0);
        reminder.mark_sent(t0);

        // User snoozes 15 minutes, one minute after delivery
        let now = t0 + 60 * 1000;
        let until = now + 15 * 60 * 1000;
        assert!(reminder.snooze(until, now).is_ok());
        assert_eq!(reminder.status, ReminderStatus::Snoozed);
        assert_eq!(reminder.snoozed_until, Some(until));
        assert_eq!(reminder.snooze_count, 1);
        assert_eq!(reminder.effective_fire_at(), until);
        assert!(!reminder.is_due(now));
        assert!(reminder.is_due(until));

        // Poller fires again from SNOOZED
        assert_eq!(reminder.mark_sent(until), Transition::Applied);
        assert_eq!(reminder.sent_at, Some(until));
        assert_eq!(reminder.snoozed_until, None);
    }

    #[test]
    fn snooze_count_is_monotonic_across_interleavings() {
        let mut reminder = reminder_factory(0);
        let mut now = 10;
        for n in 1..=5 {
            assert!(reminder.snooze(now + 100, now).is_ok());
            assert_eq!(reminder.snooze_count, n);
            now += 100;
            reminder.mark_sent(now);
        }
        assert_eq!(reminder.snooze_count, 5);
    }

    #[test]
    fn snooze_requires_future_time() {
        let mut reminder = reminder_factory(100);
        assert_eq!(
            reminder.snooze(50, 100),
            Err(ReminderStateError::SnoozeTimeNotInFuture(50))
        );
        assert_eq!(
            reminder.snooze(100, 100),
            Err(ReminderStateError::SnoozeTimeNotInFuture(100))
        );
        assert_eq!(reminder.snooze_count, 0);
        assert_eq!(reminder.status, ReminderStatus::Pending);
    }

    #[test]
    fn dismiss_is_idempotent() {
        let mut reminder = reminder_factory(100);
        assert_eq!(reminder.dismiss(120), Transition::Applied);
        assert_eq!(reminder.dismissed_at, Some(120));

        assert_eq!(reminder.dismiss(500), Transition::Noop);
        assert_eq!(reminder.dismissed_at, Some(120));
    }

    #[test]
    fn dismissed_is_absorbing() {
        let mut reminder = reminder_factory(100);
        reminder.dismiss(120);

        assert_eq!(
            reminder.snooze(1000, 130),
            Err(ReminderStateError::AlreadyDismissed)
        );
        assert_eq!(reminder.mark_sent(130), Transition::Noop);
        assert_eq!(reminder.status, ReminderStatus::Dismissed);
        assert!(!reminder.is_due(i64::MAX));
    }

    #[test]
    fn channel_and_status_wire_names_roundtrip() {
        for channel in [
            ReminderChannel::InApp,
            ReminderChannel::Push,
            ReminderChannel::Email,
        ] {
            assert_eq!(channel.as_str().parse(), Ok(channel));
        }
        assert_eq!(ReminderChannel::InApp.as_str(), "IN_APP");

        for status in [
            ReminderStatus::Pending,
            ReminderStatus::Sent,
            ReminderStatus::Dismissed,
            ReminderStatus::Snoozed,
        ] {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
    }
}
