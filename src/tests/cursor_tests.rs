// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::cursor::{Countdown, ResumeCursor};
use crate::types::Address;

#[test]
fn test_countdown_at_zero_runs_once() {
    let seen: Vec<u32> = Countdown::starting_at(0).collect();
    assert_eq!(seen, vec![0]);
}

#[test]
fn test_countdown_never_wraps() {
    let mut c = Countdown::starting_at(2);
    assert_eq!(c.len(), 3);
    assert_eq!(c.next(), Some(2));
    assert_eq!(c.next(), Some(1));
    assert_eq!(c.next(), Some(0));
    assert_eq!(c.next(), None);
    assert_eq!(c.next(), None);
}

#[test]
fn test_fresh_cursor_needs_status() {
    let cursor = ResumeCursor::fresh(10);
    assert!(cursor.needs_status());
    assert_eq!(cursor.next_increment(), Some(10));
    assert!(!cursor.is_complete());
}

#[test]
fn test_apply_status() {
    let mut cursor = ResumeCursor::fresh(10);
    cursor.apply_status(Address([1u8; 32]), 4);
    assert_eq!(cursor.next_increment(), Some(3));
    assert!(!cursor.needs_status());

    let mut cursor = ResumeCursor::fresh(10);
    cursor.apply_status(Address::ZERO, 0);
    assert_eq!(cursor.next_increment(), Some(0));
    assert_eq!(cursor.pending().collect::<Vec<_>>(), vec![0]);
    assert!(cursor.needs_status());

    let mut cursor = ResumeCursor::fresh(10);
    cursor.apply_status(Address([1u8; 32]), 1);
    assert_eq!(cursor.next_increment(), Some(0));
    assert_eq!(cursor.pending().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn test_record_submission() {
    let mut cursor = ResumeCursor::resumed(Address([2u8; 32]), 450);
    assert!(!cursor.needs_status());

    cursor.record_submission(Address([3u8; 32]), 251);
    assert_eq!(cursor.resume_token(), Address([3u8; 32]));
    assert_eq!(cursor.next_increment(), Some(250));
    assert_eq!(cursor.pending().next(), Some(250));

    cursor.record_submission(Address([4u8; 32]), 0);
    assert!(cursor.is_complete());
    assert_eq!(cursor.pending().count(), 0);
}
