//! Applies a conjunction of per-attribute predicates, plus the unconditional eligibility
//! cutoff, to a loaded table.

use strum::IntoEnumIterator;
use tracing::debug;

use crate::condition::{Condition, MalformedCondition};
use crate::criteria::{Attr, Choice, Criteria, TimeSlot};
use crate::profile::{ConditionPolicy, MachineProfile};
use crate::record::{PlayFrame, PlayRecord};

type RecordPredicate = Box<dyn Fn(&PlayRecord) -> bool>;

/// The numeric value an attribute predicate is applied to. `prev_type` is categorical and
/// has no numeric reading; `custom` is absent on machines without the column.
fn attr_value(record: &PlayRecord, attr: Attr) -> Option<i64> {
    match attr {
        Attr::Through => Some(record.through as i64),
        Attr::AtGap => Some(record.at_gap),
        Attr::PrevGame => Some(record.prev_game),
        Attr::PrevCoin => Some(record.prev_coin),
        Attr::PrevDiff => Some(record.prev_diff),
        Attr::PrevRenchan => Some(record.prev_renchan),
        Attr::PrevType => None,
        Attr::Custom => record.custom,
    }
}

/// Selects the records matching the given criteria, preserving input order. Locked
/// attributes are treated as unconstrained regardless of the caller's selections. The
/// eligibility cutoff `hit_game >= spins + margin` is always applied.
pub fn filter_records(
    frame: &PlayFrame,
    criteria: &Criteria,
    profile: &MachineProfile,
) -> Result<Vec<PlayRecord>, MalformedCondition> {
    let mut predicates: Vec<RecordPredicate> = vec![];
    for attr in Attr::iter() {
        if profile.is_locked(attr) {
            continue;
        }
        let Choice::Is(selected) = criteria.choice(attr) else {
            continue;
        };
        match attr {
            Attr::PrevType => {
                if !frame.has_prev_type {
                    continue;
                }
                let wanted = selected.clone();
                predicates.push(Box::new(move |record| {
                    record.prev_type.as_deref() == Some(wanted.as_str())
                }));
            }
            Attr::Custom if !frame.has_custom => continue,
            _ => {
                let condition = match selected.parse::<Condition>() {
                    Ok(condition) => condition,
                    Err(err) => match profile.policy {
                        ConditionPolicy::Strict => return Err(err),
                        ConditionPolicy::Lenient => {
                            debug!("lenient policy: \"{selected}\" matches nothing");
                            predicates.push(Box::new(|_| false));
                            continue;
                        }
                    },
                };
                predicates.push(Box::new(move |record| {
                    attr_value(record, attr).is_some_and(|value| condition.matches(value))
                }));
            }
        }
    }

    let morning = criteria.slot == TimeSlot::Morning;
    let cutoff = criteria.spins as i64 + profile.margin();
    let matched: Vec<_> = frame
        .records
        .iter()
        .filter(|record| {
            record.morning == morning
                && predicates.iter().all(|predicate| predicate(record))
                && record.hit_game >= cutoff
        })
        .cloned()
        .collect();
    debug!("{} of {} records match", matched.len(), frame.records.len());
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Choice;
    use crate::testing::frame_of;

    fn profile() -> MachineProfile {
        MachineProfile::new("test", "test", 40, 33.0)
    }

    #[test]
    fn eligibility_cutoff_always_applied() {
        let frame = frame_of(&[(100, 0), (139, 0), (140, 0), (600, 0)]);
        let criteria = Criteria::with_spins(100);
        let matched = filter_records(&frame, &criteria, &profile()).unwrap();
        assert_eq!(vec![140, 600], matched.iter().map(|r| r.hit_game).collect::<Vec<_>>());
        for record in &matched {
            assert!(record.hit_game >= criteria.spins as i64 + profile().exclude_games);
        }
    }

    #[test]
    fn exact_eligibility_drops_the_margin() {
        use crate::profile::Eligibility;
        let frame = frame_of(&[(100, 0), (139, 0), (140, 0)]);
        let criteria = Criteria::with_spins(100);
        let profile = profile().with_eligibility(Eligibility::Exact);
        let matched = filter_records(&frame, &criteria, &profile).unwrap();
        assert_eq!(3, matched.len());
    }

    #[test]
    fn attribute_conjunction() {
        let frame = frame_of(&[(500, 0), (500, 2), (500, 3), (500, 7)]);
        let mut criteria = Criteria::with_spins(0);
        criteria.through = Choice::Is("2スルー".to_string());
        let matched = filter_records(&frame, &criteria, &profile()).unwrap();
        assert_eq!(1, matched.len());
        assert_eq!(2, matched[0].through);

        criteria.through = Choice::Is("3スルー以上".to_string());
        let matched = filter_records(&frame, &criteria, &profile()).unwrap();
        assert_eq!(2, matched.len());
    }

    #[test]
    fn locked_attribute_ignores_selection() {
        let frame = frame_of(&[(500, 0), (500, 2)]);
        let mut criteria = Criteria::with_spins(0);
        criteria.through = Choice::Is("2スルー".to_string());
        let profile = profile().with_locked(&[Attr::Through]);
        assert_eq!(2, filter_records(&frame, &criteria, &profile).unwrap().len());
    }

    #[test]
    fn morning_slot_matches_exactly() {
        let mut frame = frame_of(&[(500, 0), (500, 0)]);
        frame.records[0].morning = true;
        let mut criteria = Criteria::with_spins(0);
        criteria.slot = TimeSlot::Morning;
        let matched = filter_records(&frame, &criteria, &profile()).unwrap();
        assert_eq!(1, matched.len());
        assert!(matched[0].morning);

        criteria.slot = TimeSlot::Later;
        let matched = filter_records(&frame, &criteria, &profile()).unwrap();
        assert_eq!(1, matched.len());
        assert!(!matched[0].morning);
    }

    #[test]
    fn absent_optional_columns_skip_their_predicates() {
        let mut frame = frame_of(&[(500, 0)]);
        frame.has_prev_type = false;
        frame.has_custom = false;
        let mut criteria = Criteria::with_spins(0);
        criteria.prev_type = Choice::Is("上位".to_string());
        criteria.custom = Choice::Is("3スルー".to_string());
        assert_eq!(1, filter_records(&frame, &criteria, &profile()).unwrap().len());
    }

    #[test]
    fn prev_type_is_string_equality() {
        let mut frame = frame_of(&[(500, 0), (500, 0)]);
        frame.has_prev_type = true;
        frame.records[0].prev_type = Some("上位".to_string());
        frame.records[1].prev_type = Some("下位".to_string());
        let mut criteria = Criteria::with_spins(0);
        criteria.prev_type = Choice::Is("上位".to_string());
        let matched = filter_records(&frame, &criteria, &profile()).unwrap();
        assert_eq!(1, matched.len());
        assert_eq!(Some("上位".to_string()), matched[0].prev_type);
    }

    #[test]
    fn strict_policy_surfaces_malformed_condition() {
        let frame = frame_of(&[(500, 0)]);
        let mut criteria = Criteria::with_spins(0);
        criteria.through = Choice::Is("ﾓｰﾆﾝｸﾞ".to_string());
        assert_eq!(
            "malformed condition \"ﾓｰﾆﾝｸﾞ\"",
            filter_records(&frame, &criteria, &profile())
                .unwrap_err()
                .to_string()
        );
    }

    #[test]
    fn lenient_policy_matches_nothing() {
        let frame = frame_of(&[(500, 0)]);
        let mut criteria = Criteria::with_spins(0);
        criteria.through = Choice::Is("ﾓｰﾆﾝｸﾞ".to_string());
        let profile = profile().with_policy(ConditionPolicy::Lenient);
        assert!(filter_records(&frame, &criteria, &profile).unwrap().is_empty());
    }

    #[test]
    fn idempotent_under_reapplication() {
        let frame = frame_of(&[(100, 0), (300, 1), (500, 2), (700, 3)]);
        let mut criteria = Criteria::with_spins(100);
        criteria.through = Choice::Is("2スルー以下".to_string());
        let once = filter_records(&frame, &criteria, &profile()).unwrap();
        let refiltered = PlayFrame {
            records: once.clone(),
            has_prev_type: frame.has_prev_type,
            has_custom: frame.has_custom,
        };
        let twice = filter_records(&refiltered, &criteria, &profile()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn does_not_mutate_input_and_preserves_order() {
        let frame = frame_of(&[(700, 0), (300, 0), (500, 0)]);
        let before = frame.clone();
        let matched = filter_records(&frame, &Criteria::with_spins(100), &profile()).unwrap();
        assert_eq!(before, frame);
        assert_eq!(
            vec![700, 300, 500],
            matched.iter().map(|r| r.hit_game).collect::<Vec<_>>()
        );
    }
}
