use rand::Rng;


/// Passes applied to question order and to each answer list.
pub const DEFAULT_PASSES: usize = 5;

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Runs `passes` full shuffles back to back. One pass is already uniform.
pub fn shuffle_passes<T, R: Rng + ?Sized>(items: &mut [T], passes: usize, rng: &mut R) {
    for _ in 0..passes {
        shuffle(items, rng);
    }
}
