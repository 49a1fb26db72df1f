//! Derives the headline statistics from a filtered set of records: expected remaining
//! spins, net coin differential, payout rate and monetary expected value.

use serde::Serialize;

use crate::profile::MachineProfile;
use crate::record::PlayRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub sample: usize,
    pub avg_reg_game: f64,
    pub avg_at_game: f64,
    pub avg_reg_coin: f64,
    pub avg_at_coin: f64,
    /// Expected remaining spins to the feature, clamped at zero.
    pub first_hit: f64,
    /// Net coin differential: winnings minus estimated spin cost.
    pub avg_diff: f64,
    pub avg_in: f64,
    pub avg_out: f64,
    /// Expected coins paid out as a percentage of coins inserted.
    pub payout: f64,
    pub expected_value: f64,
}

/// The outcome of one evaluation. A sample below the profile's floor is an expected
/// outcome, not an error; `matched` keeps zero matches distinguishable from a merely
/// thin sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Evaluation {
    Estimate(Summary),
    Short { matched: usize, required: usize },
}

pub fn summarize(filtered: &[PlayRecord], spins: u32, profile: &MachineProfile) -> Evaluation {
    if filtered.len() < profile.min_sample {
        return Evaluation::Short {
            matched: filtered.len(),
            required: profile.min_sample,
        };
    }

    let mean = |column: fn(&PlayRecord) -> f64| {
        filtered.iter().map(column).sum::<f64>() / filtered.len() as f64
    };
    let avg_reg_game = mean(|record| record.reg_game);
    let avg_at_game = mean(|record| record.at_game);
    let avg_reg_coin = mean(|record| record.reg_coin);
    let avg_at_coin = mean(|record| record.at_coin);

    let first_hit = f64::max(avg_reg_game - spins as f64, 0.0);
    let avg_diff =
        avg_at_coin + avg_reg_coin - first_hit * profile.coins_per_unit / profile.coin_moti;
    let avg_in = (first_hit + avg_at_game) * profile.bet_per_game;
    let avg_out = avg_diff + avg_in;
    let payout = if avg_in != 0.0 {
        avg_out / avg_in * 100.0
    } else {
        0.0
    };
    let expected_value = avg_diff * profile.yen_per_coin;

    Evaluation::Estimate(Summary {
        sample: filtered.len(),
        avg_reg_game,
        avg_at_game,
        avg_reg_coin,
        avg_at_coin,
        first_hit,
        avg_diff,
        avg_in,
        avg_out,
        payout,
        expected_value,
    })
}
