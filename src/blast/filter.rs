// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use log::{debug, warn};

use crate::blast::hit::AlignmentHit;
use crate::blast::result::ResultSet;
use crate::errors::PipelineError;

pub const DEFAULT_MAX_EVALUE: f64 = 1e6;

/// Thresholds a hit must meet to be shown. The defaults let every hit with all three compared
/// fields present through.
///
/// A hit whose value for a compared field is missing fails that threshold, so it is dropped by
/// any filter, including the default one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCriteria {
    pub min_align_length: u64,
    pub min_percent_identity: f64,
    pub max_evalue: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            min_align_length: 0,
            min_percent_identity: 0.0,
            max_evalue: DEFAULT_MAX_EVALUE,
        }
    }
}

impl FilterCriteria {
    pub fn new(
        min_align_length: u64,
        min_percent_identity: f64,
        max_evalue: f64,
    ) -> Result<Self, PipelineError> {
        if min_percent_identity.is_nan() || min_percent_identity < 0.0 {
            return Err(PipelineError::InvalidInput(format!(
                "minimum % identity must be >= 0, got {}",
                min_percent_identity
            )));
        }
        if max_evalue.is_nan() {
            return Err(PipelineError::InvalidInput(String::from(
                "maximum e-value is not a number",
            )));
        }
        Ok(FilterCriteria {
            min_align_length,
            min_percent_identity,
            max_evalue,
        })
    }

    pub fn admits(&self, hit: &AlignmentHit) -> bool {
        let long_enough = hit
            .align_length
            .is_some_and(|l| l >= self.min_align_length);
        let identical_enough = hit
            .percent_identity
            .is_some_and(|p| p >= self.min_percent_identity);
        let significant = hit.evalue.is_some_and(|e| e <= self.max_evalue);
        long_enough && identical_enough && significant
    }

    pub fn apply<'a>(&self, results: &'a ResultSet) -> FilteredView<'a> {
        let hits: Vec<&AlignmentHit> = results.hits().iter().filter(|h| self.admits(h)).collect();
        debug!("Filter kept {} of {} hit(s)", hits.len(), results.len());
        FilteredView { hits }
    }
}

/// The hits of a `ResultSet` that pass a filter, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    hits: Vec<&'a AlignmentHit>,
}

impl<'a> FilteredView<'a> {
    pub fn hits(&self) -> &[&'a AlignmentHit] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a AlignmentHit> + '_ {
        self.hits.iter().copied()
    }
}

/// Reads a user-typed e-value threshold ("1e-5", "0.001", ...). Blank or unreadable text gives
/// `default`; this never fails.
pub fn parse_evalue_threshold(text: &str, default: f64) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return default;
    }
    match text.parse::<f64>() {
        Ok(v) if !v.is_nan() => v,
        _ => {
            warn!("Ignoring e-value threshold '{}'; using {}", text, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blast::hit::sample_hit;
    use crate::blast::result::RunMode;
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    fn results() -> ResultSet {
        let mut no_pident = sample_hit("d", 100.0, 50, 1e-20);
        no_pident.percent_identity = None;
        ResultSet::new(
            RunMode::Pasted,
            PathBuf::from("r.txt"),
            vec![
                sample_hit("a", 100.0, 10, 0.002),
                sample_hit("b", 90.0, 30, 5.6),
                sample_hit("c", 97.5, 25, 1e-8),
                no_pident,
            ],
            Vec::new(),
        )
    }

    fn ids(view: &FilteredView) -> Vec<String> {
        view.iter().map(|h| h.query_id.clone()).collect()
    }

    #[test]
    fn test_defaults_admit_complete_hits() {
        let rs = results();
        let view = FilterCriteria::default().apply(&rs);
        assert_eq!(ids(&view), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_conjunction_keeps_order() {
        let rs = results();
        let crit = FilterCriteria::new(20, 95.0, 1e-3).unwrap();
        assert_eq!(ids(&crit.apply(&rs)), vec!["c"]);
        let crit = FilterCriteria::new(0, 0.0, 10.0).unwrap();
        assert_eq!(ids(&crit.apply(&rs)), vec!["a", "b", "c"]);
        let crit = FilterCriteria::new(10, 0.0, DEFAULT_MAX_EVALUE).unwrap();
        assert_eq!(ids(&crit.apply(&rs)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let hit = sample_hit("a", 97.5, 25, 1e-8);
        assert!(FilterCriteria::new(25, 97.5, 1e-8).unwrap().admits(&hit));
        assert!(!FilterCriteria::new(26, 97.5, 1e-8).unwrap().admits(&hit));
        assert!(!FilterCriteria::new(25, 97.6, 1e-8).unwrap().admits(&hit));
        assert!(!FilterCriteria::new(25, 97.5, 1e-9).unwrap().admits(&hit));
    }

    #[test]
    fn test_missing_fails_threshold() {
        let mut hit = sample_hit("a", 100.0, 10, 0.002);
        hit.evalue = None;
        assert!(!FilterCriteria::default().admits(&hit));
        hit.evalue = Some(0.002);
        hit.align_length = None;
        assert!(!FilterCriteria::default().admits(&hit));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let rs = results();
        let before = rs.clone();
        let crit = FilterCriteria::new(20, 0.0, 10.0).unwrap();
        let first = crit.apply(&rs);
        let second = crit.apply(&rs);
        assert_eq!(first, second);
        assert_eq!(rs, before);
    }

    #[test]
    fn test_long_min_length_gives_empty_view() {
        let rs = results();
        let crit = FilterCriteria {
            min_align_length: 1000,
            ..Default::default()
        };
        assert!(crit.apply(&rs).is_empty());
    }

    #[test]
    fn test_invalid_criteria() {
        assert!(FilterCriteria::new(0, -1.0, 1.0).is_err());
        assert!(FilterCriteria::new(0, f64::NAN, 1.0).is_err());
        assert!(FilterCriteria::new(0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_parse_evalue_threshold() {
        assert_relative_eq!(parse_evalue_threshold("", 1e6), 1e6);
        assert_relative_eq!(parse_evalue_threshold("   ", 1e6), 1e6);
        assert_relative_eq!(parse_evalue_threshold("not-a-number", 1e6), 1e6);
        assert_relative_eq!(parse_evalue_threshold("nan", 3.0), 3.0);
        assert_relative_eq!(parse_evalue_threshold("1e-5", 1e6), 1e-5);
        assert_relative_eq!(parse_evalue_threshold(" 0.001 ", 1e6), 0.001);
    }
}
