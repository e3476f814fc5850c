use std::collections::HashMap;
use std::sync::Mutex;
use tickd_domain::ID;

#[derive(Debug, Clone, Copy)]
struct GateEntry {
    effective_fire_at: i64,
    recorded_at: i64,
}

/// Cross-cycle duplicate suppression for the delivery poller.
///
/// An entry is keyed by reminder id and the effective fire time that was
/// delivered: a snoozed reminder comes back with a later effective time and
/// is permitted again, while the same firing seen by an overlapping cycle
/// is refused. Entries are evicted once they fall out of the retention
/// window or when the gate exceeds its capacity (oldest first), so the
/// gate stays bounded regardless of how long the process lives.
///
/// Checking and recording are separate steps: a firing is only recorded
/// once its reminder was actually marked sent, so a failed write does not
/// block re-delivery on the next cycle.
pub struct DeliveryGate {
    entries: Mutex<HashMap<ID, GateEntry>>,
    capacity: usize,
    window_millis: i64,
}

impl DeliveryGate {
    pub fn new(capacity: usize, window_millis: i64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
            window_millis,
        }
    }

    /// Whether this (reminder, firing) pair has not been recorded yet
    pub fn permits(&self, reminder_id: &ID, effective_fire_at: i64, now: i64) -> bool {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, entry| entry.recorded_at + self.window_millis > now);

        match entries.get(reminder_id) {
            Some(entry) => entry.effective_fire_at != effective_fire_at,
            None => true,
        }
    }

    /// Records a delivered firing
    pub fn record(&self, reminder_id: &ID, effective_fire_at: i64, now: i64) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            reminder_id.clone(),
            GateEntry {
                effective_fire_at,
                recorded_at: now,
            },
        );

        while entries.len() > self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.recorded_at)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => entries.remove(&id),
                None => break,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deliver(gate: &DeliveryGate, id: &ID, effective_fire_at: i64, now: i64) -> bool {
        let permitted = gate.permits(id, effective_fire_at, now);
        if permitted {
            gate.record(id, effective_fire_at, now);
        }
        permitted
    }

    #[test]
    fn refuses_duplicate_firing() {
        let gate = DeliveryGate::new(16, 1000 * 60);
        let id = ID::default();
        assert!(deliver(&gate, &id, 100, 100));
        assert!(!deliver(&gate, &id, 100, 110));
    }

    #[test]
    fn unrecorded_firing_stays_permitted() {
        let gate = DeliveryGate::new(16, 1000 * 60);
        let id = ID::default();
        // Checked but never recorded, e.g. when the sent write failed
        assert!(gate.permits(&id, 100, 100));
        assert!(gate.permits(&id, 100, 130));
    }

    #[test]
    fn permits_new_firing_after_snooze() {
        let gate = DeliveryGate::new(16, 1000 * 60);
        let id = ID::default();
        assert!(deliver(&gate, &id, 100, 100));
        // Snoozed and due again at a later effective time
        assert!(deliver(&gate, &id, 500, 500));
        assert!(!deliver(&gate, &id, 500, 510));
    }

    #[test]
    fn evicts_outside_retention_window() {
        let window = 1000;
        let gate = DeliveryGate::new(16, window);
        let id = ID::default();
        assert!(deliver(&gate, &id, 100, 100));
        // Same firing, but the entry has aged out
        assert!(deliver(&gate, &id, 100, 100 + window));
    }

    #[test]
    fn stays_within_capacity() {
        let gate = DeliveryGate::new(2, 1000 * 60);
        let first = ID::default();
        assert!(deliver(&gate, &first, 100, 100));
        assert!(deliver(&gate, &ID::default(), 100, 200));
        assert!(deliver(&gate, &ID::default(), 100, 300));
        // The oldest entry was evicted to make room
        assert!(deliver(&gate, &first, 100, 400));
    }
}
