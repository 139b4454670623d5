//! Index clamping shared by every buffer operation.

/// Pull a signed index into the inclusive range `[low, high]`.
///
/// Out-of-range input is policy, not an error: it is simply bounded. This
/// function only compares; end-relative negative indices must be fixed up by
/// the caller before clamping.
pub fn bound_range(index: i64, low: usize, high: usize) -> usize {
    debug_assert!(low <= high);
    if index < low as i64 {
        low
    } else if index > high as i64 {
        high
    } else {
        index as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_passes_through() {
        assert_eq!(bound_range(3, 0, 10), 3);
        assert_eq!(bound_range(0, 0, 10), 0);
        assert_eq!(bound_range(10, 0, 10), 10);
    }

    #[test]
    fn test_below_low_is_pulled_up() {
        assert_eq!(bound_range(-1, 0, 10), 0);
        assert_eq!(bound_range(-100, 2, 10), 2);
    }

    #[test]
    fn test_above_high_is_pulled_down() {
        assert_eq!(bound_range(11, 0, 10), 10);
        assert_eq!(bound_range(i64::MAX, 0, 10), 10);
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(bound_range(-5, 0, 0), 0);
        assert_eq!(bound_range(5, 0, 0), 0);
    }
}
