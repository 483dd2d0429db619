// Coherent 1-D value noise, summed over a few octaves.

const OCTAVES: usize = 4;
const FALLOFF: f32 = 0.5;

fn hash_u32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846ca68b);
    x ^= x >> 16;
    x
}

fn lattice(i: i32, seed: u32) -> f32 {
    let h = hash_u32(seed ^ (i as u32).wrapping_mul(0x9e3779b1));
    ((h & 0x00FF_FFFF) as f32) / 16_777_215.0
}

fn fade(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ValueNoise1 {
    seed: u32,
}

impl ValueNoise1 {
    pub(crate) fn new(seed: u32) -> Self {
        Self { seed }
    }

    fn octave(&self, x: f32, seed: u32) -> f32 {
        let xi = x.floor();
        let t = fade(x - xi);
        let i = xi as i32;
        let a = lattice(i, seed);
        let b = lattice(i.wrapping_add(1), seed);
        a + (b - a) * t
    }

    /// Smooth noise in `[0, 1]`.
    pub(crate) fn sample(&self, x: f32) -> f32 {
        let mut amp = 0.5;
        let mut freq = 1.0;
        let mut sum = 0.0;
        let mut norm = 0.0;
        for i in 0..OCTAVES {
            let s = self.seed.wrapping_add((i as u32).wrapping_mul(1013));
            sum += self.octave(x * freq, s) * amp;
            norm += amp;
            amp *= FALLOFF;
            freq *= 2.0;
        }
        (sum / norm).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_unit_range() {
        let n = ValueNoise1::new(42);
        for i in 0..5000 {
            let v = n.sample(i as f32 * 0.137 - 300.0);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn small_steps_give_small_changes() {
        let n = ValueNoise1::new(7);
        let mut x = 0.0f32;
        let mut prev = n.sample(x);
        for _ in 0..3000 {
            x += 0.01;
            let v = n.sample(x);
            assert!((v - prev).abs() < 0.05, "jump at {x}: {prev} -> {v}");
            prev = v;
        }
    }

    #[test]
    fn same_seed_same_values() {
        let a = ValueNoise1::new(99);
        let b = ValueNoise1::new(99);
        assert_eq!(a.sample(12.34), b.sample(12.34));
    }

    #[test]
    fn not_constant() {
        let n = ValueNoise1::new(1);
        let lo = (0..200).map(|i| n.sample(i as f32 * 0.5)).fold(1.0f32, f32::min);
        let hi = (0..200).map(|i| n.sample(i as f32 * 0.5)).fold(0.0f32, f32::max);
        assert!(hi - lo > 0.2);
    }
}
