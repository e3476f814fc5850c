use chrono::Utc;

/// Clock seam for everything time-dependent in the reminder lifecycle.
/// Usecases and the delivery poller read the time through this trait, so
/// tests can freeze it and drive due-time and snooze scenarios
/// deterministically.
pub trait ISys: Send + Sync {
    /// Current unix timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// The production clock
pub struct WallClockSys;

impl ISys for WallClockSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
