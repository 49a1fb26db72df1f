//! Historical play records and the CSV tables they are loaded from.
//!
//! A table is one CSV file per machine, one row per session. The header row names the
//! columns; ordering is immaterial. A required column missing from the header is a load
//! error, never a per-row skip.

use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const COL_MORNING: &str = "morning";
pub const COL_THROUGH: &str = "through";
pub const COL_AT_GAP: &str = "at_gap";
pub const COL_PREV_GAME: &str = "prev_game";
pub const COL_PREV_COIN: &str = "prev_coin";
pub const COL_PREV_DIFF: &str = "prev_diff";
pub const COL_PREV_RENCHAN: &str = "prev_renchan";
pub const COL_PREV_TYPE: &str = "prev_type";
pub const COL_CUSTOM: &str = "custom";
pub const COL_HIT_GAME: &str = "hit_game";
pub const COL_REG_GAME: &str = "reg_game";
pub const COL_REG_COIN: &str = "reg_coin";
pub const COL_AT_GAME: &str = "at_game";
pub const COL_AT_COIN: &str = "at_coin";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("unable to read table: {0}")]
    Io(#[from] io::Error),

    #[error("table has no header row")]
    Empty,

    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),

    #[error("row {row} is shorter than the header")]
    ShortRow { row: usize },

    #[error("bad value \"{value}\" in column \"{column}\" at row {row}")]
    BadCell {
        column: &'static str,
        row: usize,
        value: String,
    },
}

/// One historical session. Field names follow the hall-data attribute keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayRecord {
    /// Whether the session began on the day's first spin.
    pub morning: bool,
    /// Missed feature opportunities before the one under analysis.
    pub through: u32,
    pub at_gap: i64,
    pub prev_game: i64,
    pub prev_coin: i64,
    pub prev_diff: i64,
    pub prev_renchan: i64,
    pub prev_type: Option<String>,
    pub custom: Option<i64>,
    /// Spin count at which the qualifying feature triggered.
    pub hit_game: i64,
    pub reg_game: f64,
    pub reg_coin: f64,
    pub at_game: f64,
    pub at_coin: f64,
}

/// An immutable, ordered snapshot of one machine's table. Presence of the two optional
/// columns is a table-level fact, recorded here rather than per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayFrame {
    pub records: Vec<PlayRecord>,
    pub has_prev_type: bool,
    pub has_custom: bool,
}
impl PlayFrame {
    pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let file = File::open(path.as_ref())?;
        let frame = Self::read_csv(BufReader::new(file))?;
        debug!(
            "read {} records from {}",
            frame.records.len(),
            path.as_ref().display()
        );
        Ok(frame)
    }

    pub fn read_csv(reader: impl BufRead) -> Result<Self, TableError> {
        let mut lines = reader.lines();
        let header = lines.next().ok_or(TableError::Empty)??;
        let columns: FxHashMap<String, usize> = header
            .split(',')
            .enumerate()
            .map(|(index, name)| (name.trim().to_string(), index))
            .collect();

        let required = |name: &'static str| {
            columns
                .get(name)
                .copied()
                .ok_or(TableError::MissingColumn(name))
        };
        let morning = required(COL_MORNING)?;
        let through = required(COL_THROUGH)?;
        let at_gap = required(COL_AT_GAP)?;
        let prev_game = required(COL_PREV_GAME)?;
        let prev_coin = required(COL_PREV_COIN)?;
        let prev_diff = required(COL_PREV_DIFF)?;
        let prev_renchan = required(COL_PREV_RENCHAN)?;
        let hit_game = required(COL_HIT_GAME)?;
        let reg_game = required(COL_REG_GAME)?;
        let reg_coin = required(COL_REG_COIN)?;
        let at_game = required(COL_AT_GAME)?;
        let at_coin = required(COL_AT_COIN)?;
        let prev_type = columns.get(COL_PREV_TYPE).copied();
        let custom = columns.get(COL_CUSTOM).copied();

        let mut records = vec![];
        for (index, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let row = index + 1;
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < columns.len() {
                return Err(TableError::ShortRow { row });
            }
            records.push(PlayRecord {
                morning: parse_cell::<i64>(&fields, morning, COL_MORNING, row)? != 0,
                through: parse_cell(&fields, through, COL_THROUGH, row)?,
                at_gap: parse_cell(&fields, at_gap, COL_AT_GAP, row)?,
                prev_game: parse_cell(&fields, prev_game, COL_PREV_GAME, row)?,
                prev_coin: parse_cell(&fields, prev_coin, COL_PREV_COIN, row)?,
                prev_diff: parse_cell(&fields, prev_diff, COL_PREV_DIFF, row)?,
                prev_renchan: parse_cell(&fields, prev_renchan, COL_PREV_RENCHAN, row)?,
                prev_type: prev_type.map(|index| fields[index].to_string()),
                custom: custom
                    .map(|index| parse_cell(&fields, index, COL_CUSTOM, row))
                    .transpose()?,
                hit_game: parse_cell(&fields, hit_game, COL_HIT_GAME, row)?,
                reg_game: parse_cell(&fields, reg_game, COL_REG_GAME, row)?,
                reg_coin: parse_cell(&fields, reg_coin, COL_REG_COIN, row)?,
                at_game: parse_cell(&fields, at_game, COL_AT_GAME, row)?,
                at_coin: parse_cell(&fields, at_coin, COL_AT_COIN, row)?,
            });
        }
        Ok(PlayFrame {
            records,
            has_prev_type: prev_type.is_some(),
            has_custom: custom.is_some(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_cell<T: FromStr>(
    fields: &[&str],
    index: usize,
    column: &'static str,
    row: usize,
) -> Result<T, TableError> {
    fields[index].parse().map_err(|_| TableError::BadCell {
        column,
        row,
        value: fields[index].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "\
morning,through,at_gap,prev_game,prev_coin,prev_diff,prev_renchan,prev_type,custom,hit_game,reg_game,reg_coin,at_game,at_coin
1,2,350,120,800,-150,3,上位,1,640,512,300,200,400
0,0,90,45,1200,600,1,下位,0,130,498,290,210,410";

    const MINIMAL: &str = "\
morning,through,at_gap,prev_game,prev_coin,prev_diff,prev_renchan,hit_game,reg_game,reg_coin,at_game,at_coin
0,1,200,100,500,-80,2,450,500,300,200,400";

    #[test]
    fn reads_all_columns() {
        let frame = PlayFrame::read_csv(FULL.as_bytes()).unwrap();
        assert_eq!(2, frame.len());
        assert!(frame.has_prev_type);
        assert!(frame.has_custom);
        let first = &frame.records[0];
        assert!(first.morning);
        assert_eq!(2, first.through);
        assert_eq!(Some("上位".to_string()), first.prev_type);
        assert_eq!(Some(1), first.custom);
        assert_eq!(640, first.hit_game);
        assert_eq!(512.0, first.reg_game);
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let frame = PlayFrame::read_csv(MINIMAL.as_bytes()).unwrap();
        assert_eq!(1, frame.len());
        assert!(!frame.has_prev_type);
        assert!(!frame.has_custom);
        assert_eq!(None, frame.records[0].prev_type);
        assert_eq!(None, frame.records[0].custom);
    }

    #[test]
    fn missing_required_column_is_a_load_error() {
        let headerless = MINIMAL.replace("hit_game", "start_game");
        assert_eq!(
            "missing required column \"hit_game\"",
            PlayFrame::read_csv(headerless.as_bytes())
                .unwrap_err()
                .to_string()
        );
    }

    #[test]
    fn bad_cell_names_row_and_column() {
        let corrupted = MINIMAL.replace("450,", "n/a,");
        assert_eq!(
            "bad value \"n/a\" in column \"hit_game\" at row 1",
            PlayFrame::read_csv(corrupted.as_bytes())
                .unwrap_err()
                .to_string()
        );
    }

    #[test]
    fn empty_input_rejected() {
        assert_eq!(
            "table has no header row",
            PlayFrame::read_csv("".as_bytes()).unwrap_err().to_string()
        );
    }

    #[test]
    fn blank_lines_skipped() {
        let trailing = format!("{MINIMAL}\n\n");
        assert_eq!(1, PlayFrame::read_csv(trailing.as_bytes()).unwrap().len());
    }
}
