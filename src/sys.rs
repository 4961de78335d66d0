//! Host integration: wall-clock reads and the host-local UTC offset.
//!
//! The local frame is process-wide state with an initialize-then-read
//! lifecycle. By default the offset comes from the host's time zone
//! database via `localtime_r`; tests (and embedders without a usable
//! host zone) can pin a fixed offset with [`set_local_zone`].

use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// The source of the host-local UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalZone {
    /// Resolve the offset through the host for each instant.
    System,
    /// A fixed offset in minutes east of UTC.
    FixedOffset(i32),
}

static LOCAL_ZONE: RwLock<LocalZone> = RwLock::new(LocalZone::System);

/// Serializes tests that pin the process-wide local zone.
#[cfg(test)]
pub(crate) static TEST_ZONE_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Overrides the process-wide local zone.
pub fn set_local_zone(zone: LocalZone) {
    if let Ok(mut guard) = LOCAL_ZONE.write() {
        *guard = zone;
    }
}

/// Restores the default host-resolved local zone.
pub fn reset_local_zone() {
    set_local_zone(LocalZone::System);
}

/// Returns the current time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as i64,
        // The clock reads before 1970; fold the duration the other way.
        Err(err) => -(err.duration().as_millis() as i64),
    }
}

/// Returns the local offset in minutes east of UTC for the given epoch
/// millisecond, honoring a process-wide fixed override.
pub(crate) fn local_offset_minutes(epoch_millis: i64) -> i32 {
    let zone = LOCAL_ZONE
        .read()
        .map(|guard| *guard)
        .unwrap_or(LocalZone::System);
    match zone {
        LocalZone::FixedOffset(minutes) => minutes,
        LocalZone::System => system_offset_minutes(epoch_millis.div_euclid(1000)),
    }
}

#[cfg(unix)]
fn system_offset_minutes(epoch_seconds: i64) -> i32 {
    use core::mem::MaybeUninit;

    let timestamp = epoch_seconds as libc::time_t;
    let mut tm = MaybeUninit::uninit();

    // The vendored `libc` binding set here doesn't declare `tzset`, so it's
    // declared locally; it links against the same libc the rest of this
    // module already links against via `localtime_r`.
    extern "C" {
        fn tzset();
    }

    // `localtime_r` is not required to invoke `tzset` itself.
    //
    // SAFETY: `tzset` only reads the TZ environment variable and is marked
    // re-entrant in POSIX.
    unsafe { tzset() };

    // SAFETY: `tm` is a valid out-pointer; `localtime_r` returns NULL on
    // failure and writes a fully-initialized `tm` otherwise.
    let ptr = unsafe { libc::localtime_r(&timestamp, tm.as_mut_ptr()) };
    if ptr.is_null() {
        return 0;
    }
    // SAFETY: non-NULL return means `tm` was initialized.
    let tm = unsafe { tm.assume_init() };

    // tm_gmtoff is seconds east of UTC and fits comfortably in an i32.
    (tm.tm_gmtoff / 60) as i32
}

#[cfg(not(unix))]
fn system_offset_minutes(_epoch_seconds: i64) -> i32 {
    // No host zone source on this target; read the local frame as UTC.
    0
}

#[cfg(test)]
mod tests {
    use super::{local_offset_minutes, now_millis, reset_local_zone, set_local_zone, LocalZone};

    #[test]
    fn fixed_override_wins() {
        let _guard = super::TEST_ZONE_LOCK.lock().unwrap();
        set_local_zone(LocalZone::FixedOffset(-300));
        assert_eq!(local_offset_minutes(0), -300);
        set_local_zone(LocalZone::FixedOffset(540));
        assert_eq!(local_offset_minutes(1_718_461_800_000), 540);
        reset_local_zone();
    }

    #[test]
    fn clock_reads_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(now_millis() > 1_577_836_800_000);
    }
}
