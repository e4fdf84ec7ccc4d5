//! Elapsed-time formatting for progress logs.
use std::time::Duration;

/// Split seconds into hours, minutes and seconds, e.g. `10239 -> (2, 50, 39)`.
pub fn sec_to_hm(t: u64) -> (u64, u64, u64) {
    let s = t % 60;
    let t = t / 60;
    let m = t % 60;
    let h = t / 60;
    (h, m, s)
}

/// Format seconds as `HHhMMmSSs`, e.g. `10239 -> "02h50m39s"`.
/// Hours widen past two digits instead of wrapping.
pub fn sec_to_hm_str(t: u64) -> String {
    let (h, m, s) = sec_to_hm(t);
    format!("{:02}h{:02}m{:02}s", h, m, s)
}

/// Fractional seconds are truncated.
pub fn duration_to_hm_str(d: Duration) -> String {
    sec_to_hm_str(d.as_secs())
}
