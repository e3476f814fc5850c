use super::ReminderNotification;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tickd_domain::ID;

/// The in-process toast list: one bounded, arrival-ordered queue of
/// notifications per user.
///
/// A toast that outlives the TTL is silently pruned, which only stops it
/// from being shown. Pruning never dismisses the underlying reminder, that
/// is an explicit user action. Capacity eviction drops the oldest toast
/// first.
pub struct NotificationFeed {
    toasts: Mutex<HashMap<ID, VecDeque<ReminderNotification>>>,
    capacity: usize,
    ttl_millis: i64,
}

impl NotificationFeed {
    pub fn new(capacity: usize, ttl_millis: i64) -> Self {
        Self {
            toasts: Mutex::new(HashMap::new()),
            capacity,
            ttl_millis,
        }
    }

    pub fn push(&self, notification: ReminderNotification) {
        let mut toasts = self.toasts.lock().unwrap();
        let queue = toasts
            .entry(notification.user_id.clone())
            .or_insert_with(VecDeque::new);
        let now = notification.delivered_at;
        queue.retain(|toast| toast.delivered_at + self.ttl_millis > now);
        queue.push_back(notification);
        while queue.len() > self.capacity {
            queue.pop_front();
        }
    }

    /// The user's live toasts in arrival order
    pub fn list(&self, user_id: &ID, now: i64) -> Vec<ReminderNotification> {
        let mut toasts = self.toasts.lock().unwrap();
        match toasts.get_mut(user_id) {
            Some(queue) => {
                queue.retain(|toast| toast.delivered_at + self.ttl_millis > now);
                queue.iter().cloned().collect()
            }
            None => Vec::new(),
        }
    }

    /// Removes the toast for a reminder after the user acted on it
    pub fn remove(&self, user_id: &ID, reminder_id: &ID) {
        let mut toasts = self.toasts.lock().unwrap();
        if let Some(queue) = toasts.get_mut(user_id) {
            queue.retain(|toast| toast.reminder_id != *reminder_id);
        }
    }

    /// Removes every toast belonging to a task, e.g. when the task is
    /// completed or deleted
    pub fn remove_by_task(&self, user_id: &ID, task_id: &ID) {
        let mut toasts = self.toasts.lock().unwrap();
        if let Some(queue) = toasts.get_mut(user_id) {
            queue.retain(|toast| toast.task_id != *task_id);
        }
    }
}
