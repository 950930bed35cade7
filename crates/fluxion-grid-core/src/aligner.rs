// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Multi-feed aligner
//!
//! Reconstructs one interconnector's flow as the sum of several sub-links that
//! are sampled independently. Feeds are joined position by position. A
//! position whose timestamps disagree across feeds is dropped and counted;
//! it does not fail the batch. Feeds of different lengths do.

use fluxion_grid_types::{ExchangeFlowSample, GridError};
use tracing::warn;

/// Combined series plus the number of positions dropped for disagreeing timestamps
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alignment {
    pub samples: Vec<ExchangeFlowSample>,
    pub dropped: usize,
}

/// Sum position-aligned samples of all feeds
pub fn combine(feeds: &[Vec<ExchangeFlowSample>]) -> Result<Alignment, GridError> {
    let Some(first) = feeds.first() else {
        return Ok(Alignment::default());
    };
    let expected = first.len();
    if let Some((index, feed)) = feeds
        .iter()
        .enumerate()
        .find(|(_, feed)| feed.len() != expected)
    {
        return Err(GridError::FeedLengthMismatch {
            index,
            expected,
            actual: feed.len(),
        });
    }

    let mut alignment = Alignment {
        samples: Vec::with_capacity(expected),
        dropped: 0,
    };

    for (position, anchor) in first.iter().enumerate() {
        let agree = feeds
            .iter()
            .all(|feed| feed[position].datetime == anchor.datetime);
        if !agree {
            alignment.dropped += 1;
            continue;
        }
        let total = feeds.iter().map(|feed| feed[position].value).sum();
        alignment
            .samples
            .push(ExchangeFlowSample::new(total, anchor.datetime));
    }

    if alignment.dropped > 0 {
        warn!(
            "Dropped {} of {} positions with disagreeing timestamps across {} feeds",
            alignment.dropped,
            expected,
            feeds.len()
        );
    }

    Ok(alignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use chrono_tz::{America::New_York, Tz};

    fn at(minute: u32) -> DateTime<Tz> {
        New_York.with_ymd_and_hms(2024, 1, 15, 10, minute, 0).unwrap()
    }

    fn feed(samples: &[(f64, u32)]) -> Vec<ExchangeFlowSample> {
        samples
            .iter()
            .map(|(v, m)| ExchangeFlowSample::new(*v, at(*m)))
            .collect()
    }

    #[test]
    fn test_disagreeing_position_is_dropped() {
        let a = feed(&[(10.0, 0), (20.0, 5)]);
        let b = feed(&[(5.0, 0), (5.0, 10)]);
        let alignment = combine(&[a, b]).unwrap();
        assert_eq!(alignment.samples, vec![ExchangeFlowSample::new(15.0, at(0))]);
        assert_eq!(alignment.dropped, 1);
    }

    #[test]
    fn test_four_feeds_sum_in_order() {
        let feeds = vec![
            feed(&[(1.0, 0), (2.0, 5), (3.0, 10)]),
            feed(&[(10.0, 0), (20.0, 5), (30.0, 10)]),
            feed(&[(-1.0, 0), (-2.0, 5), (-3.0, 10)]),
            feed(&[(0.5, 0), (0.5, 5), (0.5, 10)]),
        ];
        let alignment = combine(&feeds).unwrap();
        let values: Vec<f64> = alignment.samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![10.5, 20.5, 30.5]);
        assert_eq!(alignment.dropped, 0);
        assert!(
            alignment
                .samples
                .windows(2)
                .all(|w| w[0].datetime < w[1].datetime)
        );
    }

    #[test]
    fn test_length_mismatch_is_fatal() {
        let a = feed(&[(1.0, 0), (2.0, 5)]);
        let b = feed(&[(1.0, 0)]);
        assert_eq!(
            combine(&[a, b]),
            Err(GridError::FeedLengthMismatch {
                index: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_no_feeds() {
        assert_eq!(combine(&[]).unwrap(), Alignment::default());
    }

    #[test]
    fn test_same_instant_in_other_zone_agrees() {
        let a = feed(&[(1.0, 0)]);
        let b = vec![ExchangeFlowSample::new(
            2.0,
            at(0).with_timezone(&Tz::UTC),
        )];
        let alignment = combine(&[a, b]).unwrap();
        assert_eq!(alignment.samples.len(), 1);
    }
}
