use rand::Rng;
use std::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Vec2 {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Vec2 {
    pub(crate) const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn len(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub(crate) fn dist(self, other: Vec2) -> f32 {
        (self - other).len()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}
impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}
impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// 2-D affine transform, row-major `[a c tx; b d ty]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    tx: f32,
    ty: f32,
}

impl Affine {
    pub(crate) const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub(crate) fn translate(self, v: Vec2) -> Self {
        Self {
            tx: self.tx + self.a * v.x + self.c * v.y,
            ty: self.ty + self.b * v.x + self.d * v.y,
            ..self
        }
    }

    pub(crate) fn rotate_deg(self, deg: f32) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        Self {
            a: self.a * c + self.c * s,
            b: self.b * c + self.d * s,
            c: -self.a * s + self.c * c,
            d: -self.b * s + self.d * c,
            ..self
        }
    }

    pub(crate) fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }
}

/// Uniform sample in `[lo, hi)`; an empty range yields `lo`.
pub(crate) fn rand_in<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Clamp that never panics: when `lo > hi` the upper bound wins.
pub(crate) fn constrain(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn close(a: Vec2, b: Vec2) -> bool {
        a.dist(b) < 1e-4
    }

    #[test]
    fn rotate_then_translate_maps_local_points() {
        let t = Affine::IDENTITY
            .translate(Vec2::new(10.0, 20.0))
            .rotate_deg(90.0);
        // local +x axis points along world +y after a 90 degree turn
        assert!(close(t.apply(Vec2::new(1.0, 0.0)), Vec2::new(10.0, 21.0)));
        assert!(close(t.apply(Vec2::new(0.0, 1.0)), Vec2::new(9.0, 20.0)));
    }

    #[test]
    fn rotations_compose() {
        let step = 360.0 / 7.0;
        let mut acc = Affine::IDENTITY;
        for _ in 0..7 {
            acc = acc.rotate_deg(step);
        }
        assert!(close(acc.apply(Vec2::new(5.0, 0.0)), Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn rand_in_handles_empty_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(rand_in(&mut rng, 4.0, 4.0), 4.0);
        assert_eq!(rand_in(&mut rng, 4.0, 1.0), 4.0);
        for _ in 0..100 {
            let v = rand_in(&mut rng, 1.0, 2.0);
            assert!((1.0..2.0).contains(&v));
        }
    }

    #[test]
    fn constrain_prefers_upper_bound_when_inverted() {
        assert_eq!(constrain(5.0, 0.0, 10.0), 5.0);
        assert_eq!(constrain(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(constrain(50.0, 80.0, 20.0), 20.0);
    }
}
