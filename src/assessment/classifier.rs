use super::domain::Band;

/// Map an integer score to its band. Total over every integer.
pub const fn classify(score: i64) -> Band {
    match score {
        0..=11 => Band::BelowAverage,
        12..=17 => Band::Fair,
        18..=23 => Band::Good,
        24..=30 => Band::Excellent,
        _ => Band::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_land_on_the_documented_transitions() {
        let cases = [
            (0, Band::BelowAverage),
            (11, Band::BelowAverage),
            (12, Band::Fair),
            (17, Band::Fair),
            (18, Band::Good),
            (23, Band::Good),
            (24, Band::Excellent),
            (30, Band::Excellent),
        ];

        for (score, expected) in cases {
            assert_eq!(classify(score), expected, "score {score}");
        }
    }

    #[test]
    fn scores_outside_the_domain_are_invalid() {
        for score in [-1, -30, 31, 100, i64::MIN, i64::MAX] {
            assert_eq!(classify(score), Band::Invalid, "score {score}");
        }
    }

    #[test]
    fn classification_is_monotonic_across_the_domain() {
        let rank = |band: Band| match band {
            Band::BelowAverage => 0,
            Band::Fair => 1,
            Band::Good => 2,
            Band::Excellent => 3,
            Band::Invalid => unreachable!("in-domain score classified as invalid"),
        };

        for score in 0..30 {
            assert!(rank(classify(score)) <= rank(classify(score + 1)));
            assert_eq!(classify(score), classify(score));
        }
    }
}
