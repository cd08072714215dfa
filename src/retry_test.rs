use super::*;

#[test]
fn default_schedule_is_fifty_ms_thirty_attempts() {
    let schedule = RetrySchedule::default();
    assert_eq!(schedule.interval_ms(), 50);
    assert_eq!(schedule.attempts(), 0);
    assert!(!schedule.is_exhausted());
}

#[test]
fn stops_after_attempt_cap() {
    let mut schedule = RetrySchedule::default();
    let granted = (0..100).filter(|_| schedule.try_attempt()).count();
    assert_eq!(granted, 30);
    assert!(schedule.is_exhausted());
    assert!(!schedule.try_attempt());
    assert_eq!(schedule.attempts(), 30);
}

#[test]
fn reset_restores_budget() {
    let mut schedule = RetrySchedule::new(10, 2);
    assert!(schedule.try_attempt());
    assert!(schedule.try_attempt());
    assert!(!schedule.try_attempt());
    schedule.reset();
    assert!(schedule.try_attempt());
    assert_eq!(schedule.attempts(), 1);
}

#[test]
fn zero_cap_never_attempts() {
    let mut schedule = RetrySchedule::new(50, 0);
    assert!(schedule.is_exhausted());
    assert!(!schedule.try_attempt());
}
