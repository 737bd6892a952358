use crate::dom::{BoundingBox, Candidate};

/// Per-component difference below which a candidate counts as the same box
pub const EXACT_TOLERANCE: f64 = 2.0;

/// Candidates farther than this from the target are never matched
pub const MAX_MATCH_DISTANCE: f64 = 100.0;

/// Find the live element an extracted record came from.
///
/// The stable id wins when it is still among the candidates. Otherwise the
/// first candidate within [`EXACT_TOLERANCE`] of `target` is taken, then the
/// nearest one closer than [`MAX_MATCH_DISTANCE`].
pub fn match_candidate(target: &BoundingBox, candidates: &[Candidate], node_id: Option<u64>) -> Option<Candidate> {
    if let Some(id) = node_id
        && let Some(candidate) = candidates.iter().find(|c| c.node_id == id)
    {
        return Some(*candidate);
    }

    let mut nearest: Option<(f64, &Candidate)> = None;
    for candidate in candidates {
        if candidate.rect.approx_eq(target, EXACT_TOLERANCE) {
            return Some(*candidate);
        }
        let distance = candidate.rect.distance(target);
        if nearest.is_none_or(|(best, _)| distance < best) {
            nearest = Some((distance, candidate));
        }
    }

    nearest
        .filter(|(distance, _)| *distance < MAX_MATCH_DISTANCE)
        .map(|(_, candidate)| *candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(node_id: u64, x: f64, y: f64, w: f64, h: f64) -> Candidate {
        Candidate { node_id, rect: BoundingBox::new(x, y, w, h) }
    }

    #[test]
    fn test_id_match_wins() {
        let target = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let candidates = [candidate(1, 0.0, 0.0, 10.0, 10.0), candidate(2, 500.0, 500.0, 10.0, 10.0)];
        assert_eq!(match_candidate(&target, &candidates, Some(2)).map(|c| c.node_id), Some(2));
    }

    #[test]
    fn test_exact_match_preferred() {
        let target = BoundingBox::new(100.0, 100.0, 24.0, 24.0);
        let candidates = [candidate(1, 90.0, 100.0, 24.0, 24.0), candidate(2, 101.5, 99.0, 24.0, 25.0)];
        assert_eq!(match_candidate(&target, &candidates, Some(99)).map(|c| c.node_id), Some(2));
    }

    #[test]
    fn test_nearest_within_threshold() {
        let target = BoundingBox::new(100.0, 100.0, 24.0, 24.0);
        let candidates = [candidate(1, 160.0, 100.0, 24.0, 24.0), candidate(2, 110.0, 100.0, 24.0, 24.0)];
        assert_eq!(match_candidate(&target, &candidates, None).map(|c| c.node_id), Some(2));

        let far = [candidate(3, 300.0, 100.0, 24.0, 24.0)];
        assert_eq!(match_candidate(&target, &far, None), None);
        assert_eq!(match_candidate(&target, &[], None), None);
    }
}
