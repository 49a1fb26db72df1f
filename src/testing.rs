//! Testing helpers.

use assert_float_eq::*;

use crate::record::{PlayFrame, PlayRecord};

pub fn assert_f64_relative(expected: f64, actual: f64, epsilon: f64) {
    if actual != expected {
        assert_float_relative_eq!(expected, actual, epsilon);
    }
}

/// A record with fixed outcome columns; `hit_game` and `through` vary per test.
pub fn record(hit_game: i64, through: u32) -> PlayRecord {
    PlayRecord {
        morning: false,
        through,
        at_gap: 0,
        prev_game: 0,
        prev_coin: 0,
        prev_diff: 0,
        prev_renchan: 0,
        prev_type: None,
        custom: None,
        hit_game,
        reg_game: 500.0,
        reg_coin: 300.0,
        at_game: 200.0,
        at_coin: 400.0,
    }
}

pub fn frame_of(rows: &[(i64, u32)]) -> PlayFrame {
    PlayFrame {
        records: rows
            .iter()
            .map(|&(hit_game, through)| record(hit_game, through))
            .collect(),
        has_prev_type: false,
        has_custom: false,
    }
}
