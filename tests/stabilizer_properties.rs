use gps_stabilizer::{Coordinate, GpsStabilizer, StabilizeOutcome, MAX_HISTORY_SIZE, MOVEMENT_THRESHOLD_KM};
use proptest::prelude::*;

fn latitude() -> impl Strategy<Value = f64> {
    -89.0..89.0f64
}

fn longitude() -> impl Strategy<Value = f64> {
    -179.0..179.0f64
}

fn samples() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((latitude(), longitude()), 1..40)
}

/// Small wander around a base point, mixing jitter and real moves
fn wander() -> impl Strategy<Value = ((f64, f64), Vec<(f64, f64)>)> {
    (
        (latitude(), longitude()),
        prop::collection::vec((-0.002..0.002f64, -0.002..0.002f64), 1..60),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn first_sample_is_rounded_input(lat in latitude(), lon in longitude()) {
        let mut stabilizer = GpsStabilizer::new();
        let fix = stabilizer.stabilize(lat, lon);

        prop_assert_eq!(fix, Coordinate::rounded(lat, lon));
        prop_assert_eq!(stabilizer.history_len(), 1);
    }

    #[test]
    fn history_stays_bounded_and_ends_at_fix(points in samples()) {
        let mut stabilizer = GpsStabilizer::new();

        for (lat, lon) in points {
            let fix = stabilizer.stabilize(lat, lon);

            prop_assert!(stabilizer.history_len() <= MAX_HISTORY_SIZE);
            prop_assert_eq!(stabilizer.history().last().copied(), Some(fix));
            prop_assert_eq!(stabilizer.last_accepted(), Some(fix));
        }
    }

    #[test]
    fn returned_fix_is_never_a_rejected_sample((base, steps) in wander()) {
        let mut stabilizer = GpsStabilizer::new();
        let mut accepted = vec![stabilizer.stabilize(base.0, base.1)];

        for (d_lat, d_lon) in steps {
            let before = stabilizer.last_accepted();
            let (fix, outcome) = stabilizer.observe(base.0 + d_lat, base.1 + d_lon);

            match outcome {
                StabilizeOutcome::Accepted { distance_km } => {
                    prop_assert!(distance_km > MOVEMENT_THRESHOLD_KM);
                    accepted.push(fix);
                }
                StabilizeOutcome::Rejected { distance_km } => {
                    prop_assert!(distance_km <= MOVEMENT_THRESHOLD_KM);
                    prop_assert_eq!(Some(fix), before);
                }
                StabilizeOutcome::Initial => prop_assert!(false, "initial outcome after first fix"),
            }

            let tail: Vec<Coordinate> = accepted
                .iter()
                .rev()
                .take(MAX_HISTORY_SIZE)
                .rev()
                .copied()
                .collect();
            prop_assert_eq!(stabilizer.history().copied().collect::<Vec<_>>(), tail);
        }
    }

    #[test]
    fn smoothed_lies_within_history_bounds(points in samples()) {
        let mut stabilizer = GpsStabilizer::new();
        for (lat, lon) in points {
            stabilizer.stabilize(lat, lon);
        }

        let smoothed = stabilizer.get_smoothed();
        let lats: Vec<f64> = stabilizer.history().map(|c| c.lat).collect();
        let min = lats.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = lats.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        // Rounding may move the mean by half a unit in the last place
        prop_assert!(smoothed.lat >= min - 1e-5 && smoothed.lat <= max + 1e-5);
    }

    #[test]
    fn force_update_always_leaves_singleton(points in samples(), lat in latitude(), lon in longitude()) {
        let mut stabilizer = GpsStabilizer::new();
        for (p_lat, p_lon) in points {
            stabilizer.stabilize(p_lat, p_lon);
        }

        stabilizer.force_update(lat, lon);

        let expected = Coordinate::rounded(lat, lon);
        prop_assert_eq!(stabilizer.last_accepted(), Some(expected));
        prop_assert_eq!(stabilizer.history().copied().collect::<Vec<_>>(), vec![expected]);
        prop_assert_eq!(stabilizer.get_smoothed(), expected);
    }

    #[test]
    fn reset_matches_fresh_instance(points in samples(), lat in latitude(), lon in longitude()) {
        let mut used = GpsStabilizer::new();
        for (p_lat, p_lon) in points {
            used.stabilize(p_lat, p_lon);
        }
        used.reset();

        let mut fresh = GpsStabilizer::new();
        prop_assert_eq!(used.get_smoothed(), fresh.get_smoothed());
        prop_assert_eq!(used.observe(lat, lon), fresh.observe(lat, lon));
    }
}
