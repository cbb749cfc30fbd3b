use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

// All randomness is drawn from a caller-supplied RNG so that seeded
// construction is exactly reproducible; nothing here touches a process-wide
// generator.

/// Draws one sample from the uniform distribution over `[low, high]`.
pub fn uniform<F, R>(rng: &mut R, low: F, high: F) -> F
where
    F: Float + SampleUniform,
    R: Rng + ?Sized,
{
    Uniform::new_inclusive(low, high).sample(rng)
}

/// Standard weight initialization: `Uniform[-1, 1]`.
pub fn standard_weight<F, R>(rng: &mut R) -> F
where
    F: Float + SampleUniform,
    R: Rng + ?Sized,
{
    uniform(rng, -F::one(), F::one())
}
