use crate::math::{rand_in, Vec2};
use crate::noise::ValueNoise1;
use crate::paint::Painter;
use crate::palette::{random_color, Rgba};
use rand::Rng;

/// Logical pixels of surface area per background dot.
pub(crate) const AREA_PER_DOT: f32 = 800.0;
const NOISE_STEP: f32 = 0.01;
const NOISE_Y_OFFSET: f32 = 100.0;
const DRIFT: f32 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Dot {
    pub(crate) pos: Vec2,
    pub(crate) size: f32,
    pub(crate) color: Rgba,
    pub(crate) phase: f32,
}

impl Dot {
    pub(crate) fn random<R: Rng>(rng: &mut R, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(rand_in(rng, 0.0, w), rand_in(rng, 0.0, h)),
            size: rand_in(rng, 5.0, 15.0),
            color: random_color(rng),
            phase: rand_in(rng, 0.0, 300.0),
        }
    }

    fn out_of_bounds(&self, w: f32, h: f32) -> bool {
        self.pos.x < 0.0 || self.pos.x > w || self.pos.y < 0.0 || self.pos.y > h
    }
}

pub(crate) fn dot_count(w: f32, h: f32) -> usize {
    ((w * h) / AREA_PER_DOT).max(0.0) as usize
}

#[derive(Default)]
pub(crate) struct DotField {
    pub(crate) dots: Vec<Dot>,
}

impl DotField {
    pub(crate) fn reseed<R: Rng>(&mut self, rng: &mut R, w: f32, h: f32) {
        let n = dot_count(w, h);
        self.dots = (0..n).map(|_| Dot::random(rng, w, h)).collect();
    }

    /// Drift every dot along the noise field; dots that leave are respawned.
    pub(crate) fn update<R: Rng>(&mut self, rng: &mut R, noise: &ValueNoise1, w: f32, h: f32) {
        for d in &mut self.dots {
            let dx = noise.sample(d.phase) * 2.0 * DRIFT - DRIFT;
            let dy = noise.sample(d.phase + NOISE_Y_OFFSET) * 2.0 * DRIFT - DRIFT;
            d.pos.x += dx;
            d.pos.y += dy;
            d.phase += NOISE_STEP;

            if d.out_of_bounds(w, h) {
                *d = Dot::random(rng, w, h);
            }
        }
    }

    /// Alpha is resampled on every draw.
    pub(crate) fn draw<P: Painter, R: Rng>(&self, painter: &mut P, rng: &mut R) {
        for d in &self.dots {
            let alpha = rng.gen_range(150..=255u8);
            painter.fill_circle(d.pos, d.size * 0.5, d.color.with_alpha(alpha));
        }
    }
}
