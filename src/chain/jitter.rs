//! Coordinate jitter for words sharing a base coordinate

use std::collections::HashMap;

/// Ring of displacements around the origin, applied in this order:
/// east, west, north, south, northeast, northwest, southeast, southwest.
pub const OFFSETS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (0.5, 0.5),
    (-0.5, 0.5),
    (0.5, -0.5),
    (-0.5, -0.5),
];

/// Assigns non-colliding coordinates within one chain-build invocation.
///
/// The first request for a base coordinate gets it unchanged; every later
/// request for the same exact coordinate is displaced by the next entry of
/// [`OFFSETS`], wrapping after eight.
#[derive(Debug, Default)]
pub struct CoordinateDeduplicator {
    usage: HashMap<(u64, u64), usize>,
}

impl CoordinateDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a `[lat, lng, ..]` coordinate.
    ///
    /// Anything shorter than two components is returned as-is and not
    /// counted. Extra components are carried through untouched.
    pub fn adjust(&mut self, base: &[f64]) -> Vec<f64> {
        let [lat, lng, rest @ ..] = base else {
            return base.to_vec();
        };

        let count = self.usage.entry((lat.to_bits(), lng.to_bits())).or_insert(0);
        *count += 1;

        let (dx, dy) = match *count {
            1 => (0.0, 0.0),
            n => OFFSETS[(n - 2) % OFFSETS.len()],
        };

        let mut placed = Vec::with_capacity(base.len());
        placed.push(lat + dx);
        placed.push(lng + dy);
        placed.extend_from_slice(rest);
        placed
    }

    /// How many times a base coordinate has been placed so far
    pub fn usage(&self, lat: f64, lng: f64) -> usize {
        self.usage.get(&(lat.to_bits(), lng.to_bits())).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_use_is_unchanged_then_east_then_west() {
        let mut dedup = CoordinateDeduplicator::new();
        assert_eq!(dedup.adjust(&[10.0, 20.0]), vec![10.0, 20.0]);
        assert_eq!(dedup.adjust(&[10.0, 20.0]), vec![11.0, 20.0]);
        assert_eq!(dedup.adjust(&[10.0, 20.0]), vec![9.0, 20.0]);
        assert_eq!(dedup.usage(10.0, 20.0), 3);
    }

    #[test]
    fn test_offsets_cycle_every_eight() {
        let mut dedup = CoordinateDeduplicator::new();
        let placed: Vec<Vec<f64>> = (0..10).map(|_| dedup.adjust(&[0.0, 0.0])).collect();

        assert_eq!(placed[0], vec![0.0, 0.0]);
        assert_eq!(placed[3], vec![0.0, 1.0]);
        assert_eq!(placed[4], vec![0.0, -1.0]);
        assert_eq!(placed[8], vec![-0.5, -0.5]);
        // The 10th request wraps to east again, not back to the bare base
        assert_eq!(placed[9], vec![1.0, 0.0]);
        assert_ne!(placed[9], placed[0]);
    }

    #[test]
    fn test_distinct_bases_are_independent() {
        let mut dedup = CoordinateDeduplicator::new();
        dedup.adjust(&[1.0, 1.0]);
        assert_eq!(dedup.adjust(&[2.0, 2.0]), vec![2.0, 2.0]);
        assert_eq!(dedup.adjust(&[1.0, 1.0]), vec![2.0, 1.0]);
    }

    #[test]
    fn test_degenerate_input_passes_through() {
        let mut dedup = CoordinateDeduplicator::new();
        assert_eq!(dedup.adjust(&[]), Vec::<f64>::new());
        assert_eq!(dedup.adjust(&[5.0]), vec![5.0]);
        assert_eq!(dedup.adjust(&[5.0]), vec![5.0]);
    }

    #[test]
    fn test_no_bounds_validation() {
        let mut dedup = CoordinateDeduplicator::new();
        dedup.adjust(&[90.0, 180.0]);
        assert_eq!(dedup.adjust(&[90.0, 180.0]), vec![91.0, 180.0]);
    }
}
