//! Overlap resolution for scored candidates
//!
//! Candidates are walked in ascending start order. A candidate whose start
//! falls inside an already accepted section competes with it: the candidate
//! wins only when its confidence is strictly higher than every accepted
//! section it lands in, in which case those are evicted. Ties keep the
//! section that was accepted first.

use covenant_domain::CovenantSection;
use tracing::debug;

/// Resolve overlapping candidates of one target
///
/// The result is sorted by start and no two members overlap.
pub fn deduplicate(mut candidates: Vec<CovenantSection>) -> Vec<CovenantSection> {
    candidates.sort_by_key(|c| c.span.start);

    let mut accepted: Vec<CovenantSection> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let start = candidate.span.start;
        let contested = accepted.iter().filter(|a| a.span.contains(start));

        let mut any = false;
        let mut candidate_wins = true;
        for occupant in contested {
            any = true;
            if occupant.confidence >= candidate.confidence {
                candidate_wins = false;
                break;
            }
        }

        if !any {
            accepted.push(candidate);
        } else if candidate_wins {
            accepted.retain(|a| {
                let evict = a.span.contains(start);
                if evict {
                    debug!(
                        covenant = %a.section_type,
                        evicted = a.span.start,
                        by = start,
                        "replacing lower-confidence section"
                    );
                }
                !evict
            });
            accepted.push(candidate);
        }
    }

    accepted
}


#[cfg(test)]
mod proptests {
    use super::*;
    use covenant_domain::{Confidence, SectionSpan};
    use proptest::prelude::*;

    fn candidates() -> impl Strategy<Value = Vec<CovenantSection>> {
        prop::collection::vec((0usize..500, 1usize..120, 0u8..=10), 0..24).prop_map(|raw| {
            raw.into_iter()
                .map(|(start, len, conf)| {
                    CovenantSection::new("t", "t", "t", SectionSpan::bytes(start, start + len))
                        .with_confidence(Confidence::new(conf as f64 / 10.0))
                })
                .collect()
        })
    }

    proptest! {
        /// Property: no two accepted sections overlap
        #[test]
        fn test_no_overlap(input in candidates()) {
            let out = deduplicate(input);
            for (i, a) in out.iter().enumerate() {
                for b in out.iter().skip(i + 1) {
                    prop_assert!(!a.span.overlaps(&b.span), "{:?} overlaps {:?}", a.span, b.span);
                }
            }
        }

        /// Property: a dropped candidate always overlaps a competitor at least as confident
        #[test]
        fn test_dropped_lose_to_stronger_competitor(input in candidates()) {
            let out = deduplicate(input.clone());
            for (i, candidate) in input.iter().enumerate() {
                if out.contains(candidate) {
                    continue;
                }
                let beaten = input.iter().enumerate().any(|(j, other)| {
                    i != j
                        && other.span.overlaps(&candidate.span)
                        && other.confidence >= candidate.confidence
                });
                prop_assert!(beaten, "{:?} dropped without a stronger competitor", candidate.span);
            }
        }

        /// Property: a strictly most confident candidate always survives
        #[test]
        fn test_strict_maximum_kept(input in candidates()) {
            let Some(best) = input
                .iter()
                .max_by(|a, b| a.confidence.partial_cmp(&b.confidence).unwrap())
                .cloned()
            else {
                return Ok(());
            };
            let unique = input.iter().filter(|c| c.confidence >= best.confidence).count() == 1;
            if unique {
                prop_assert!(deduplicate(input).contains(&best));
            }
        }

        /// Property: output is sorted by start
        #[test]
        fn test_sorted(input in candidates()) {
            let out = deduplicate(input);
            prop_assert!(out.windows(2).all(|w| w[0].span.start < w[1].span.start));
        }
    }
}
