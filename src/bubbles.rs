use crate::math::{rand_in, Vec2};
use crate::paint::Painter;
use crate::palette::WHITE;
use rand::Rng;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Bubble {
    pub(crate) pos: Vec2,
    pub(crate) size: f32,
    pub(crate) speed: f32,
    pub(crate) alpha: u8,
}

impl Bubble {
    pub(crate) fn random<R: Rng>(rng: &mut R, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(rand_in(rng, 0.0, w), rand_in(rng, 0.0, h)),
            size: rand_in(rng, 10.0, 30.0),
            speed: rand_in(rng, 1.0, 3.0),
            alpha: rng.gen_range(100..200),
        }
    }
}

/// Rising bubbles. Hidden means empty: the batch is rebuilt on every show.
#[derive(Default)]
pub(crate) struct BubbleField {
    pub(crate) bubbles: Vec<Bubble>,
    visible: bool,
}

impl BubbleField {
    pub(crate) fn visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn show<R: Rng>(&mut self, rng: &mut R, count: usize, w: f32, h: f32) {
        self.bubbles = (0..count).map(|_| Bubble::random(rng, w, h)).collect();
        self.visible = true;
    }

    pub(crate) fn clear(&mut self) {
        self.bubbles.clear();
        self.visible = false;
    }

    /// Returns the new visibility.
    pub(crate) fn toggle<R: Rng>(&mut self, rng: &mut R, count: usize, w: f32, h: f32) -> bool {
        if self.visible {
            self.clear();
        } else {
            self.show(rng, count, w, h);
        }
        self.visible
    }

    pub(crate) fn update<R: Rng>(&mut self, rng: &mut R, w: f32, h: f32) {
        if !self.visible {
            return;
        }
        for b in &mut self.bubbles {
            b.pos.y -= b.speed;
            if b.pos.y < 0.0 {
                b.pos.y = h + b.size;
                b.pos.x = rand_in(rng, 0.0, w);
            }
        }
    }

    pub(crate) fn draw<P: Painter>(&self, painter: &mut P) {
        if !self.visible {
            return;
        }
        for b in &self.bubbles {
            painter.fill_circle(b.pos, b.size, WHITE.with_alpha(b.alpha));
        }
    }
}
