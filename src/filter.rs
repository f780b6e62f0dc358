use crate::geometry::Region;

/// Drop regions narrower or shorter than `min_size`.
///
/// Degenerate regions (zero area, non-finite coordinates) are dropped even
/// when `min_size` is 0. Survivors keep their input order.
pub fn filter_small(regions: &[Region], min_size: f32) -> Vec<Region> {
    regions
        .iter()
        .filter(|region| {
            !region.is_degenerate()
                && region.width() >= min_size
                && region.height() >= min_size
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_small_keeps_large() {
        let small = Region::new(0.0, 0.0, 5.0, 5.0);
        let large = Region::new(0.0, 0.0, 15.0, 15.0);
        assert_eq!(filter_small(&[small, large], 10.0), vec![large]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let exact = Region::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(filter_small(&[exact], 10.0), vec![exact]);
    }

    #[test]
    fn test_single_thin_dimension_is_enough_to_drop() {
        let wide_but_flat = Region::new(0.0, 0.0, 200.0, 4.0);
        let tall_but_narrow = Region::new(0.0, 0.0, 4.0, 200.0);
        assert!(filter_small(&[wide_but_flat, tall_but_narrow], 10.0).is_empty());
    }

    #[test]
    fn test_preserves_order() {
        let a = Region::new(50.0, 0.0, 80.0, 20.0);
        let noise = Region::new(0.0, 0.0, 2.0, 2.0);
        let b = Region::new(0.0, 0.0, 30.0, 20.0);
        assert_eq!(filter_small(&[a, noise, b], 10.0), vec![a, b]);
    }

    #[test]
    fn test_degenerate_dropped_with_zero_floor() {
        let line = Region::new(0.0, 5.0, 40.0, 5.0);
        let nan = Region::new(0.0, 0.0, f32::NAN, 10.0);
        let ok = Region::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(filter_small(&[line, nan, ok], 0.0), vec![ok]);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_small(&[], 10.0).is_empty());
    }
}
