mod reminder;
mod shared;
mod task;

pub use reminder::{
    fire_at_from_offset, Reminder, ReminderChannel, ReminderSettings, ReminderStateError,
    ReminderStatus, Transition, SNOOZE_PRESETS_MINUTES,
};
pub use shared::entity::{Entity, ID};
pub use task::Task;
