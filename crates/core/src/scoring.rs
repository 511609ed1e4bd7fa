//! Scoring module - plane clear points and drop timeout progression
//!
//! Clearing `n` planes at once is worth `score_per_plane * n * n`: the
//! multiplier grows once per full plane found, so the award is quadratic in
//! the number of planes.

/// Points for clearing `planes` full planes in a single freeze
pub fn plane_clear_score(score_per_plane: u32, planes: u32) -> u32 {
    let multiplier = planes;
    score_per_plane
        .saturating_mul(planes)
        .saturating_mul(multiplier)
}

/// Next drop timeout after one speed-up trigger.
///
/// Never rises and never goes below `min`.
pub fn next_timeout(current: f32, step: f32, min: f32) -> f32 {
    (current - step).max(min).min(current)
}

/// Whether reaching `score` speeds the game up
pub fn is_score_trigger(score: u32, interval: u32) -> bool {
    interval != 0 && score > 0 && score % interval == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plane_clear_is_quadratic() {
        assert_eq!(plane_clear_score(10, 0), 0);
        assert_eq!(plane_clear_score(10, 1), 10);
        assert_eq!(plane_clear_score(10, 2), 40);
        assert_eq!(plane_clear_score(10, 3), 90);
        assert_eq!(plane_clear_score(10, 4), 160);
    }

    #[test]
    fn test_timeout_steps_down_to_floor() {
        let mut timeout = 2.0_f32;
        for _ in 0..100 {
            let next = next_timeout(timeout, 0.1, 0.3);
            assert!(next <= timeout);
            assert!(next >= 0.3);
            timeout = next;
        }
        assert_eq!(timeout, 0.3);
    }

    #[test]
    fn test_timeout_below_floor_is_kept() {
        // A session configured below the floor must not be pushed back up.
        assert_eq!(next_timeout(0.2, 0.1, 0.3), 0.2);
    }

    #[test]
    fn test_score_trigger() {
        assert!(!is_score_trigger(0, 50));
        assert!(!is_score_trigger(40, 50));
        assert!(is_score_trigger(50, 50));
        assert!(is_score_trigger(100, 50));
        assert!(!is_score_trigger(50, 0));
    }

    proptest! {
        #[test]
        fn prop_timeout_never_rises_nor_crosses_floor(
            current in 0.3f32..10.0,
            step in 0.0f32..1.0,
        ) {
            let next = next_timeout(current, step, 0.3);
            prop_assert!(next <= current);
            prop_assert!(next >= 0.3);
        }

        #[test]
        fn prop_more_planes_score_more(planes in 1u32..20) {
            prop_assert!(plane_clear_score(10, planes + 1) > plane_clear_score(10, planes));
        }
    }
}
