use crate::math::{constrain, rand_in, Affine, Vec2};
use crate::paint::Painter;
use crate::palette::{ColorRole, ColorSet};
use rand::Rng;
use serde::Deserialize;

pub(crate) const GRID_DIVISIONS: f32 = 5.0;
pub(crate) const RADIUS_RANGE: (f32, f32) = (50.0, 100.0);
const JITTER: (f32, f32) = (0.2, 0.8);
const TENTACLES_MIN: usize = 8;
const TENTACLES_MAX: usize = 15;

pub(crate) const SEGMENTS: usize = 15;
const WAVE_DEG_PER_SEGMENT: f32 = 10.0;
const WAVE_AMPLITUDE: f32 = 50.0;
const TENTACLE_WEIGHT: f32 = 5.0;

/// What a click does to a jellyfish that is already pulsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TriggerPolicy {
    /// Start expanding from zero.
    #[default]
    Restart,
    /// Flip between expanding and contracting, keeping the amount.
    Toggle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PulsePhase {
    Idle,
    Expanding,
    Contracting,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Pulse {
    pub(crate) phase: PulsePhase,
    pub(crate) amount: f32,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            phase: PulsePhase::Idle,
            amount: 0.0,
        }
    }
}

impl Pulse {
    pub(crate) fn trigger(&mut self, policy: TriggerPolicy) {
        match policy {
            TriggerPolicy::Restart => {
                self.phase = PulsePhase::Expanding;
                self.amount = 0.0;
            }
            TriggerPolicy::Toggle => {
                self.phase = match self.phase {
                    PulsePhase::Expanding if self.amount > 0.0 => PulsePhase::Contracting,
                    PulsePhase::Expanding => PulsePhase::Idle,
                    PulsePhase::Idle | PulsePhase::Contracting => PulsePhase::Expanding,
                };
            }
        }
    }

    /// Advance one frame. Expansion overshoots `limit` by at most one step.
    pub(crate) fn tick(&mut self, step: f32, limit: f32) {
        match self.phase {
            PulsePhase::Idle => {}
            PulsePhase::Expanding => {
                self.amount += step;
                if self.amount > limit {
                    self.phase = PulsePhase::Contracting;
                }
            }
            PulsePhase::Contracting => {
                self.amount -= step / 2.0;
                if self.amount <= 0.0 {
                    self.amount = 0.0;
                    self.phase = PulsePhase::Idle;
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Jellyfish {
    pub(crate) pos: Vec2,
    pub(crate) radius: f32,
    pub(crate) tentacles: usize,
    pub(crate) colors: ColorSet,
    pub(crate) pulse: Pulse,
}

impl Jellyfish {
    pub(crate) fn current_radius(&self) -> f32 {
        self.radius + self.pulse.amount
    }

    pub(crate) fn hit(&self, p: Vec2) -> bool {
        self.pos.dist(p) < self.radius
    }

    pub(crate) fn overlaps(&self, pos: Vec2, radius: f32) -> bool {
        self.pos.dist(pos) < self.radius + radius
    }

    pub(crate) fn tick(&mut self, step: f32) {
        self.pulse.tick(step, self.radius);
    }

    pub(crate) fn draw<P: Painter>(&self, painter: &mut P, params: &RenderParams) {
        painter.fill_circle(self.pos, params.body_diameter, self.colors.get(ColorRole::Body));

        let n = self.tentacles.max(1);
        let angle_step = 360.0 / n as f32;
        let local = tentacle_points(self.current_radius());
        let mut world = [Vec2::default(); SEGMENTS];

        for i in 0..n {
            // The first tentacle sits one step round, the last one at 360.
            let frame = Affine::IDENTITY
                .translate(self.pos)
                .rotate_deg(angle_step * (i + 1) as f32);
            for (w, l) in world.iter_mut().zip(local.iter()) {
                *w = frame.apply(*l);
            }
            painter.polyline(&world, TENTACLE_WEIGHT, self.colors.get(ColorRole::Tentacle));

            let tip = world[SEGMENTS - 1];
            painter.fill_circle(tip, params.end_diameter, self.colors.get(ColorRole::TentacleEnd));
            painter.stroke_circle(
                tip,
                params.end_diameter,
                params.end_stroke,
                self.colors.get(ColorRole::TentacleEndStroke),
            );
        }
    }
}

/// Tentacle vertices along local +x; the wave depends on vertex index only.
pub(crate) fn tentacle_points(length: f32) -> [Vec2; SEGMENTS] {
    let mut pts = [Vec2::default(); SEGMENTS];
    for (i, p) in pts.iter_mut().enumerate() {
        let x = i as f32 * length / SEGMENTS as f32;
        let y = (i as f32 * WAVE_DEG_PER_SEGMENT).to_radians().sin() * WAVE_AMPLITUDE;
        *p = Vec2::new(x, y);
    }
    pts
}

/// Sizes shared by every jellyfish, drawn once per layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct RenderParams {
    pub(crate) body_diameter: f32,
    pub(crate) end_diameter: f32,
    pub(crate) end_stroke: f32,
}

impl RenderParams {
    pub(crate) fn sample<R: Rng>(rng: &mut R) -> Self {
        let body_diameter = rand_in(rng, 10.0, 30.0);
        let end_diameter = body_diameter / 2.0;
        Self {
            body_diameter,
            end_diameter,
            end_stroke: end_diameter / 3.0,
        }
    }

    /// After a resize the end stroke follows the surface instead.
    pub(crate) fn rescale_stroke(&mut self, w: f32, h: f32) {
        self.end_stroke = w.min(h) / 250.0;
    }
}

/// Jittered-grid placement with packing rejection, in row-major order.
pub(crate) fn pack<R: Rng>(rng: &mut R, w: f32, h: f32, radius_range: (f32, f32)) -> Vec<Jellyfish> {
    let mut out: Vec<Jellyfish> = Vec::new();
    if w <= 0.0 || h <= 0.0 {
        return out;
    }

    let cell = w / GRID_DIVISIONS;
    let rows = (h / cell).ceil() as usize;
    let cols = (w / cell).ceil() as usize;

    for row in 0..rows {
        for col in 0..cols {
            let r = rand_in(rng, radius_range.0, radius_range.1);
            let x = col as f32 * cell + rand_in(rng, cell * JITTER.0, cell * JITTER.1);
            let y = row as f32 * cell + rand_in(rng, cell * JITTER.0, cell * JITTER.1);
            let pos = Vec2::new(constrain(x, r, w - r), constrain(y, r, h - r));

            let tentacles = rng.gen_range(TENTACLES_MIN..=TENTACLES_MAX);

            if out.iter().any(|other| other.overlaps(pos, r)) {
                continue;
            }
            out.push(Jellyfish {
                pos,
                radius: r,
                tentacles,
                colors: ColorSet::random(rng),
                pulse: Pulse::default(),
            });
        }
    }
    out
}
