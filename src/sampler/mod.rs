//! Weighted random draw primitive
//!
//! Pure functions over a candidate slice and a caller-supplied rng. Callers
//! that need reproducible output seed the rng themselves (preview tooling
//! uses `ChaCha8Rng::seed_from_u64`).

use rand::Rng;

/// Total weight below this falls back to a uniform draw
pub const MIN_TOTAL_WEIGHT: f32 = 1e-6;

/// Draw one candidate by weight.
///
/// Cumulative linear scan in input order, so ties between equal prefix sums
/// resolve deterministically for a given rng sequence. A degenerate total
/// weight (all zero or negative) selects uniformly instead of failing.
/// Returns `None` only for an empty candidate list.
pub fn draw<'a, T>(candidates: &'a [(T, f32)], rng: &mut impl Rng) -> Option<&'a T> {
    if candidates.is_empty() {
        return None;
    }

    let total: f32 = candidates.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= MIN_TOTAL_WEIGHT {
        let idx = rng.gen_range(0..candidates.len());
        return Some(&candidates[idx].0);
    }

    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for (value, weight) in candidates {
        cumulative += weight.max(0.0);
        if roll < cumulative {
            return Some(value);
        }
    }

    // Float summation drift can leave the roll just past the last bucket
    candidates.last().map(|(value, _)| value)
}

/// Draw `n` candidates with replacement.
///
/// Each draw is independent; the same candidate can appear more than once
/// and callers aggregate counts as needed.
pub fn draw_n<'a, T>(candidates: &'a [(T, f32)], n: u32, rng: &mut impl Rng) -> Vec<&'a T> {
    (0..n).filter_map(|_| draw(candidates, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_empty_candidates_yield_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let candidates: Vec<(&str, f32)> = vec![];
        assert_eq!(draw(&candidates, &mut rng), None);
    }

    #[test]
    fn test_single_candidate_always_wins() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let candidates = [("only", 0.5)];
        for _ in 0..100 {
            assert_eq!(draw(&candidates, &mut rng), Some(&"only"));
        }
    }

    #[test]
    fn test_weighted_convergence_three_to_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let candidates = [("a", 3.0), ("b", 1.0)];

        let mut a_count = 0u32;
        let n = 100_000;
        for _ in 0..n {
            if draw(&candidates, &mut rng) == Some(&"a") {
                a_count += 1;
            }
        }

        let ratio = a_count as f32 / n as f32;
        assert!(
            (ratio - 0.75).abs() < 0.01,
            "expected ~0.75, got {}",
            ratio
        );
    }

    #[test]
    fn test_zero_weights_fall_back_to_uniform() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let candidates = [("a", 0.0), ("b", 0.0), ("c", 0.0)];

        let mut counts = [0u32; 3];
        let n = 30_000;
        for _ in 0..n {
            match draw(&candidates, &mut rng) {
                Some(&"a") => counts[0] += 1,
                Some(&"b") => counts[1] += 1,
                Some(&"c") => counts[2] += 1,
                other => panic!("unexpected draw result {:?}", other),
            }
        }

        for count in counts {
            let share = count as f32 / n as f32;
            assert!(
                (share - 1.0 / 3.0).abs() < 0.02,
                "expected ~1/3, got {}",
                share
            );
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let candidates = [("a", 1.0), ("b", 2.0), ("c", 0.5)];

        let mut rng1 = ChaCha8Rng::seed_from_u64(99);
        let mut rng2 = ChaCha8Rng::seed_from_u64(99);
        let seq1 = draw_n(&candidates, 50, &mut rng1);
        let seq2 = draw_n(&candidates, 50, &mut rng2);
        assert_eq!(seq1, seq2);
    }

    #[test]
    fn test_draw_n_samples_with_replacement() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let candidates = [("a", 1.0)];
        let drawn = draw_n(&candidates, 5, &mut rng);
        assert_eq!(drawn.len(), 5);
        assert!(drawn.iter().all(|v| **v == "a"));
    }

    #[test]
    fn test_negative_weight_treated_as_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let candidates = [("bad", -4.0), ("good", 1.0)];
        for _ in 0..1_000 {
            assert_eq!(draw(&candidates, &mut rng), Some(&"good"));
        }
    }
}
