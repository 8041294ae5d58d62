use rand::prelude::*;
use rand::rngs::SmallRng;

/// Seeded generator when `seed` is given, entropy-seeded otherwise.
#[inline]
pub fn new_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

/// Draws `n` independent seeds so that parallel tasks get reproducible generators.
pub fn split_seeds<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<u64> {
    (0..n).map(|_| rng.gen()).collect()
}
