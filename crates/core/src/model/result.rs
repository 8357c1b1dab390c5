use crate::scoring;

/// Outcome for a single subject inside an exam record.
///
/// Current records hold the raw answer counts. Records written by an older
/// scoring formula only kept the computed net, which is summed as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubjectResult {
    RawCounts { correct: u32, wrong: u32 },
    PrecomputedNet(f64),
}

impl SubjectResult {
    #[must_use]
    pub fn counts(correct: u32, wrong: u32) -> Self {
        Self::RawCounts { correct, wrong }
    }

    /// Net score contributed by this entry.
    ///
    /// Raw counts are scored and rounded to 2 decimals; a legacy net is
    /// returned unrounded so sums only round once.
    #[must_use]
    pub fn net(&self) -> f64 {
        match *self {
            SubjectResult::RawCounts { correct, wrong } => scoring::net_score(correct, wrong),
            SubjectResult::PrecomputedNet(net) => net,
        }
    }

    #[must_use]
    pub fn correct(&self) -> Option<u32> {
        match *self {
            SubjectResult::RawCounts { correct, .. } => Some(correct),
            SubjectResult::PrecomputedNet(_) => None,
        }
    }

    #[must_use]
    pub fn wrong(&self) -> Option<u32> {
        match *self {
            SubjectResult::RawCounts { wrong, .. } => Some(wrong),
            SubjectResult::PrecomputedNet(_) => None,
        }
    }

    /// Unanswered questions given the subject's question count.
    ///
    /// Not clamped: more answers than questions yields a negative value.
    /// Legacy entries have no counts and report `None`.
    #[must_use]
    pub fn blank(&self, question_count: u32) -> Option<i64> {
        match *self {
            SubjectResult::RawCounts { correct, wrong } => {
                Some(i64::from(question_count) - i64::from(correct) - i64::from(wrong))
            }
            SubjectResult::PrecomputedNet(_) => None,
        }
    }

    #[must_use]
    pub fn is_legacy(&self) -> bool {
        matches!(self, SubjectResult::PrecomputedNet(_))
    }
}

impl Default for SubjectResult {
    fn default() -> Self {
        Self::counts(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_counts_use_the_penalty_formula() {
        assert_eq!(SubjectResult::counts(10, 2).net(), 9.5);
        assert_eq!(SubjectResult::counts(0, 4).net(), -1.0);
    }

    #[test]
    fn legacy_net_is_taken_verbatim() {
        let legacy = SubjectResult::PrecomputedNet(5.0);
        assert_eq!(legacy.net(), 5.0);
        assert!(legacy.is_legacy());
        assert_eq!(legacy.correct(), None);
        assert_eq!(legacy.blank(40), None);

        assert_eq!(SubjectResult::PrecomputedNet(0.125).net(), 0.125);
    }

    #[test]
    fn blank_goes_negative_when_overfilled() {
        assert_eq!(SubjectResult::counts(30, 6).blank(40), Some(4));
        assert_eq!(SubjectResult::counts(5, 4).blank(7), Some(-2));
    }
}
