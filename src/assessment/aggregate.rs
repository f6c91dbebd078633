use super::classifier::classify;
use super::domain::{Band, ScoreGroup, SLOT_COUNT};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GroupStats {
    Empty,
    Scored { mean: f64, band: Band },
}

impl GroupStats {
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Mean over the fixed slot count, classified on the rounded mean.
///
/// Absent slots still count toward the divisor: a single entry of 30
/// yields 5.0.
pub fn stats(group: &ScoreGroup) -> GroupStats {
    if group.is_empty() {
        return GroupStats::Empty;
    }

    let sum: u32 = group.entries().map(|entry| u32::from(entry.value())).sum();
    let mean = f64::from(sum) / SLOT_COUNT as f64;
    GroupStats::Scored {
        mean,
        band: classify(round_half_away(mean)),
    }
}

pub fn round_half_away(value: f64) -> i64 {
    value.round() as i64
}

/// One decimal place, halves rounded away from zero.
pub fn format_mean(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::{GroupKey, ScoreEntry, Slot};

    fn group_of(values: &[i64]) -> ScoreGroup {
        let mut group = ScoreGroup::new(GroupKey::Movement);
        for (slot, value) in Slot::all().zip(values) {
            group.set(slot, ScoreEntry::new(*value));
        }
        group
    }

    #[test]
    fn empty_group_yields_the_sentinel() {
        assert_eq!(stats(&group_of(&[])), GroupStats::Empty);
    }

    #[test]
    fn full_group_of_twenties_is_good() {
        assert_eq!(
            stats(&group_of(&[20; 6])),
            GroupStats::Scored {
                mean: 20.0,
                band: Band::Good
            }
        );
    }

    #[test]
    fn partial_group_still_divides_by_six() {
        assert_eq!(
            stats(&group_of(&[30])),
            GroupStats::Scored {
                mean: 5.0,
                band: Band::BelowAverage
            }
        );
    }

    #[test]
    fn rounded_mean_drives_classification() {
        // 71 / 6 = 11.83 rounds to 12.
        let GroupStats::Scored { mean, band } = stats(&group_of(&[11, 12, 12, 12, 12, 12])) else {
            panic!("expected scored group");
        };
        assert!((mean - 71.0 / 6.0).abs() < f64::EPSILON);
        assert_eq!(band, Band::Fair);

        // 69 / 6 = 11.5 rounds away from zero to 12.
        let GroupStats::Scored { band, .. } = stats(&group_of(&[9, 12, 12, 12, 12, 12])) else {
            panic!("expected scored group");
        };
        assert_eq!(band, Band::Fair);
    }

    #[test]
    fn means_format_with_one_decimal() {
        assert_eq!(format_mean(20.0), "20.0");
        assert_eq!(format_mean(71.0 / 6.0), "11.8");
        assert_eq!(format_mean(0.25), "0.3");
        assert_eq!(format_mean(15.0), "15.0");
    }
}
