//! The composed request boundary: resolve the machine profile, load its table, filter and
//! summarize.

use thiserror::Error;
use tracing::debug;

use crate::cache::{FrameCache, FrameLoader};
use crate::condition::MalformedCondition;
use crate::criteria::{Criteria, InvalidSpins};
use crate::filter::filter_records;
use crate::profile::{MachineCatalog, UnknownMachine};
use crate::record::TableError;
use crate::summary::{summarize, Evaluation};

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("{0}")]
    UnknownMachine(#[from] UnknownMachine),

    #[error("{0}")]
    Table(#[from] TableError),

    #[error("{0}")]
    MalformedCondition(#[from] MalformedCondition),

    #[error("{0}")]
    InvalidSpins(#[from] InvalidSpins),
}

pub struct Evaluator<L: FrameLoader> {
    catalog: MachineCatalog,
    cache: FrameCache<L>,
}
impl<L: FrameLoader> Evaluator<L> {
    pub fn new(catalog: MachineCatalog, loader: L) -> Self {
        Self {
            catalog,
            cache: FrameCache::new(loader),
        }
    }

    pub fn catalog(&self) -> &MachineCatalog {
        &self.catalog
    }

    pub fn evaluate(&mut self, machine: &str, criteria: &Criteria) -> Result<Evaluation, EvalError> {
        let profile = self.catalog.find(machine)?;
        let frame = self.cache.get_or_load(&profile.file_key)?;
        let matched = filter_records(&frame, criteria, profile)?;
        debug!(
            "machine \"{machine}\": {} of {} records qualify at {} spins",
            matched.len(),
            frame.len(),
            criteria.spins
        );
        Ok(summarize(&matched, criteria.spins, profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Choice;
    use crate::profile::MachineProfile;
    use crate::record::PlayFrame;
    use crate::summary::Evaluation;
    use crate::testing::frame_of;

    struct FixedLoader(PlayFrame);
    impl FrameLoader for FixedLoader {
        type Token = ();

        fn freshness(&self, _key: &str) -> Result<(), TableError> {
            Ok(())
        }

        fn load(&self, key: &str) -> Result<PlayFrame, TableError> {
            if key == "test" {
                Ok(self.0.clone())
            } else {
                Err(TableError::Empty)
            }
        }
    }

    fn evaluator(frame: PlayFrame, min_sample: usize) -> Evaluator<FixedLoader> {
        let mut catalog = MachineCatalog::default();
        catalog.insert(
            "test",
            MachineProfile::new("test", "test", 30, 32.0).with_min_sample(min_sample),
        );
        Evaluator::new(catalog, FixedLoader(frame))
    }

    #[test]
    fn end_to_end_estimate() {
        let frame = frame_of(&(0..100).map(|_| (1000, 0)).collect::<Vec<_>>());
        let mut evaluator = evaluator(frame, 100);
        let evaluation = evaluator
            .evaluate("test", &Criteria::with_spins(0))
            .unwrap();
        let Evaluation::Estimate(summary) = evaluation else {
            panic!("expected an estimate, got {evaluation:?}");
        };
        assert_eq!(100, summary.sample);
        assert_eq!(500.0, summary.first_hit);
    }

    #[test]
    fn unknown_machine_named_in_error() {
        let mut evaluator = evaluator(frame_of(&[]), 1);
        assert_eq!(
            "unknown machine \"gobsla\"",
            evaluator
                .evaluate("gobsla", &Criteria::with_spins(0))
                .unwrap_err()
                .to_string()
        );
    }

    #[test]
    fn contradictory_filters_report_zero_matched() {
        let frame = frame_of(&(0..100).map(|_| (1000, 0)).collect::<Vec<_>>());
        let mut evaluator = evaluator(frame, 100);
        let mut criteria = Criteria::with_spins(0);
        criteria.through = Choice::Is("5スルー以上".to_string());
        assert_eq!(
            Evaluation::Short {
                matched: 0,
                required: 100
            },
            evaluator.evaluate("test", &criteria).unwrap()
        );
    }

    #[test]
    fn malformed_condition_propagates() {
        let frame = frame_of(&[(1000, 0)]);
        let mut evaluator = evaluator(frame, 1);
        let mut criteria = Criteria::with_spins(0);
        criteria.prev_diff = Choice::Is("大負け".to_string());
        assert_eq!(
            "malformed condition \"大負け\"",
            evaluator.evaluate("test", &criteria).unwrap_err().to_string()
        );
    }
}
