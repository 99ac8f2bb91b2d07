//! SLA breach predicate and progress math.
//!
//! All arithmetic here is integer-only.

use chrono::{DateTime, Duration, Utc};

/// Whether a queued order has waited longer than the allowed maximum.
#[must_use]
pub fn is_breached(queued_at: DateTime<Utc>, now: DateTime<Utc>, max_wait_hours: i64) -> bool {
    now - queued_at > Duration::hours(max_wait_hours)
}

/// Counts queued timestamps older than the allowed maximum.
#[must_use]
pub fn breach_count<I>(queued_times: I, now: DateTime<Utc>, max_wait_hours: i64) -> u64
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    queued_times
        .into_iter()
        .filter(|t| is_breached(*t, now, max_wait_hours))
        .count() as u64
}

/// Completed-versus-target progress as a whole percentage, capped at
/// 100. A zero target reads as 0 until something is completed, then
/// 100.
#[must_use]
pub fn progress_percent(completed: u64, target: u64) -> u8 {
    if target == 0 {
        return if completed == 0 { 0 } else { 100 };
    }
    let pct = completed.saturating_mul(100) / target;
    u8::try_from(pct.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breach_boundary() {
        let now = Utc::now();
        let just_inside = now - Duration::minutes(23 * 60 + 59);
        let just_outside = now - Duration::minutes(24 * 60 + 1);
        assert!(!is_breached(just_inside, now, 24));
        assert!(is_breached(just_outside, now, 24));
    }

    #[test]
    fn test_exactly_at_limit_is_not_breached() {
        let now = Utc::now();
        let at_limit = now - Duration::hours(24);
        assert!(!is_breached(at_limit, now, 24));
    }

    #[test]
    fn test_breach_count() {
        let now = Utc::now();
        let times = vec![
            now - Duration::hours(1),
            now - Duration::hours(30),
            now - Duration::hours(48),
        ];
        assert_eq!(breach_count(times, now, 24), 2);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 10), 0);
        assert_eq!(progress_percent(3, 10), 30);
        assert_eq!(progress_percent(10, 10), 100);
        assert_eq!(progress_percent(15, 10), 100);
        assert_eq!(progress_percent(1, 3), 33);
    }

    #[test]
    fn test_progress_with_zero_target() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(5, 0), 100);
    }
}
