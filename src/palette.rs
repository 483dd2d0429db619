use crate::math::lerp;
use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rgba {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl Rgba {
    pub(crate) const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub(crate) const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub(crate) fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| lerp(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8;
        Rgba {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: ch(self.a, other.a),
        }
    }
}

pub(crate) const WHITE: Rgba = Rgba::rgb(255, 255, 255);

/// Deep-sea gradient, top to bottom.
pub(crate) const SEA_TOP: Rgba = Rgba::rgb(10, 30, 60);
pub(crate) const SEA_BOTTOM: Rgba = Rgba::rgb(30, 80, 130);

pub(crate) const PALETTE: [Rgba; 5] = [
    Rgba {
        r: 15,
        g: 240,
        b: 252,
        a: 153,
    },
    Rgba::rgb(0x1E, 0x88, 0xE5),
    Rgba::rgb(0x29, 0xB6, 0xF6),
    Rgba::rgb(0x81, 0xD4, 0xFA),
    Rgba::rgb(0xE1, 0xF5, 0xFE),
];

pub(crate) fn random_color<R: Rng>(rng: &mut R) -> Rgba {
    PALETTE[rng.gen_range(0..PALETTE.len())]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ColorRole {
    Body,
    Tentacle,
    TentacleEnd,
    TentacleEndStroke,
}

/// One palette colour per role, each drawn independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ColorSet {
    pub(crate) body: Rgba,
    pub(crate) tentacle: Rgba,
    pub(crate) tentacle_end: Rgba,
    pub(crate) tentacle_end_stroke: Rgba,
}

impl ColorSet {
    pub(crate) fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            body: random_color(rng),
            tentacle: random_color(rng),
            tentacle_end: random_color(rng),
            tentacle_end_stroke: random_color(rng),
        }
    }

    pub(crate) fn get(&self, role: ColorRole) -> Rgba {
        match role {
            ColorRole::Body => self.body,
            ColorRole::Tentacle => self.tentacle,
            ColorRole::TentacleEnd => self.tentacle_end,
            ColorRole::TentacleEndStroke => self.tentacle_end_stroke,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn every_role_comes_from_the_palette() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let set = ColorSet::random(&mut rng);
            for role in [
                ColorRole::Body,
                ColorRole::Tentacle,
                ColorRole::TentacleEnd,
                ColorRole::TentacleEndStroke,
            ] {
                assert!(PALETTE.contains(&set.get(role)), "{role:?} not in palette");
            }
        }
    }

    #[test]
    fn roles_are_sampled_independently() {
        let mut rng = StdRng::seed_from_u64(5);
        let mixed = (0..200)
            .map(|_| ColorSet::random(&mut rng))
            .any(|s| s.body != s.tentacle || s.tentacle_end != s.tentacle_end_stroke);
        assert!(mixed);
    }

    #[test]
    fn lerp_hits_both_ends() {
        assert_eq!(SEA_TOP.lerp(SEA_BOTTOM, 0.0), SEA_TOP);
        assert_eq!(SEA_TOP.lerp(SEA_BOTTOM, 1.0), SEA_BOTTOM);
        assert_eq!(SEA_TOP.lerp(SEA_BOTTOM, 0.5), Rgba::rgb(20, 55, 95));
    }
}
