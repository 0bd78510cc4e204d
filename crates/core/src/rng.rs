//! RNG module - deterministic seeded randomness for spawning
//!
//! A simple LCG (Numerical Recipes constants) keeps the whole engine
//! reproducible: the raw state is exposed so saved games can restore the
//! exact random stream. Not thread-safe; each engine owns its own
//! instance.
//!
//! [`WeightedPicker`] layers cumulative-weight sampling on top: draw a
//! uniform float in `[0, total)`, linear-scan the cumulative weights, and
//! take the first bucket exceeding the draw. The last item doubles as the
//! fallback for floating-point edge cases at the top of the range.

/// Deterministic LCG random number generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u32) -> Self {
        // Avoid the all-zero fixed point.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Restore an RNG from a persisted raw state.
    pub fn from_state(state: u32) -> Self {
        Self::new(state)
    }

    /// Raw state for persistence.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Generate the next random u32.
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32
        // Numerical Recipes constants: a=1664525, c=1013904223
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate a random value in `[0, max)`. `max` must be non-zero.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0, "next_range requires max > 0");
        self.next_u32() % max
    }

    /// Generate a random float in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits give a uniform float with full mantissa coverage.
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Shuffle a slice using Fisher-Yates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Cumulative-weight sampler over a set of items.
#[derive(Debug, Clone)]
pub struct WeightedPicker<T> {
    items: Vec<T>,
    cumulative: Vec<f32>,
    total: f32,
}

impl<T> WeightedPicker<T> {
    /// Build a picker from `(item, weight)` pairs.
    ///
    /// Entries with non-positive or non-finite weights are dropped.
    /// Returns `None` if nothing pickable remains.
    pub fn new(entries: impl IntoIterator<Item = (T, f32)>) -> Option<Self> {
        let mut items = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0.0f32;
        for (item, weight) in entries {
            if !weight.is_finite() || weight <= 0.0 {
                continue;
            }
            total += weight;
            items.push(item);
            cumulative.push(total);
        }
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            cumulative,
            total,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pick one item: uniform draw in `[0, total)`, first cumulative bucket
    /// exceeding the draw wins. The last item catches any draw that slips
    /// past the final bucket through floating-point rounding.
    pub fn pick(&self, rng: &mut SeededRng) -> &T {
        let draw = rng.next_f32() * self.total;
        for (i, &bound) in self.cumulative.iter().enumerate() {
            if draw < bound {
                return &self.items[i];
            }
        }
        &self.items[self.items.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = SeededRng::new(12345);
        let mut b = SeededRng::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_normalized() {
        let mut a = SeededRng::new(0);
        let mut b = SeededRng::new(1);
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_rng_state_round_trip() {
        let mut a = SeededRng::new(777);
        a.next_u32();
        a.next_u32();

        let mut b = SeededRng::from_state(a.state());
        let mut a2 = a.clone();
        for _ in 0..50 {
            assert_eq!(a2.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_next_f32_in_unit_range() {
        let mut rng = SeededRng::new(42);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SeededRng::new(9);
        for _ in 0..1000 {
            assert!(rng.next_range(7) < 7);
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SeededRng::new(5);
        let mut data = [1, 2, 3, 4, 5, 6, 7];
        rng.shuffle(&mut data);
        let mut sorted = data;
        sorted.sort();
        assert_eq!(sorted, [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_picker_rejects_empty() {
        assert!(WeightedPicker::<u32>::new(vec![]).is_none());
        assert!(WeightedPicker::new(vec![(1u32, 0.0), (2, -3.0), (3, f32::NAN)]).is_none());
    }

    #[test]
    fn test_picker_single_item_always_wins() {
        let picker = WeightedPicker::new(vec![("only", 2.5)]).unwrap();
        let mut rng = SeededRng::new(1);
        for _ in 0..10 {
            assert_eq!(*picker.pick(&mut rng), "only");
        }
    }

    #[test]
    fn test_picker_skips_non_positive_weights() {
        let picker = WeightedPicker::new(vec![("dead", 0.0), ("live", 1.0)]).unwrap();
        assert_eq!(picker.len(), 1);
        let mut rng = SeededRng::new(1);
        assert_eq!(*picker.pick(&mut rng), "live");
    }

    #[test]
    fn test_picker_respects_weights_roughly() {
        let picker = WeightedPicker::new(vec![("a", 9.0), ("b", 1.0)]).unwrap();
        let mut rng = SeededRng::new(1234);
        let mut a_count = 0;
        for _ in 0..1000 {
            if *picker.pick(&mut rng) == "a" {
                a_count += 1;
            }
        }
        // ~900 expected; allow a generous band.
        assert!(a_count > 780, "a picked only {} times", a_count);
        assert!(a_count < 980, "a picked {} times", a_count);
    }

    #[test]
    fn test_picker_deterministic_for_same_seed() {
        let picker = WeightedPicker::new(vec![(1, 1.0), (2, 2.0), (3, 3.0)]).unwrap();
        let mut a = SeededRng::new(99);
        let mut b = SeededRng::new(99);
        for _ in 0..100 {
            assert_eq!(picker.pick(&mut a), picker.pick(&mut b));
        }
    }
}
