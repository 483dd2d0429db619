use crate::bubbles::BubbleField;
use crate::config::Settings;
use crate::dots::DotField;
use crate::jelly::{pack, Jellyfish, RenderParams, TriggerPolicy, RADIUS_RANGE};
use crate::math::Vec2;
use crate::noise::ValueNoise1;
use crate::paint::Painter;
use crate::palette::{SEA_BOTTOM, SEA_TOP};
use log::{debug, info};
use rand::{rngs::StdRng, Rng};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SceneOptions {
    pub(crate) expansion_speed: f32,
    pub(crate) trigger: TriggerPolicy,
    pub(crate) initial_bubbles: usize,
    pub(crate) toggle_bubbles: usize,
    pub(crate) bubbles_on_start: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            expansion_speed: 2.0,
            trigger: TriggerPolicy::Restart,
            initial_bubbles: 50,
            toggle_bubbles: 100,
            bubbles_on_start: true,
        }
    }
}

impl From<&Settings> for SceneOptions {
    fn from(s: &Settings) -> Self {
        Self {
            expansion_speed: s.expansion_speed,
            trigger: s.trigger,
            initial_bubbles: s.initial_bubbles,
            toggle_bubbles: s.toggle_bubbles,
            bubbles_on_start: s.bubbles,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SceneKey {
    Space,
    Char(char),
}

/// Every animated collection plus the randomness that drives them.
pub(crate) struct Scene {
    rng: StdRng,
    noise: ValueNoise1,
    opts: SceneOptions,
    w: f32,
    h: f32,
    params: RenderParams,
    pub(crate) jellyfish: Vec<Jellyfish>,
    pub(crate) dots: DotField,
    pub(crate) bubbles: BubbleField,
}

impl Scene {
    pub(crate) fn new(opts: SceneOptions, mut rng: StdRng, w: f32, h: f32) -> Self {
        let noise = ValueNoise1::new(rng.gen());
        let mut scene = Self {
            rng,
            noise,
            opts,
            w,
            h,
            // filled in by the first layout pass
            params: RenderParams::default(),
            jellyfish: Vec::new(),
            dots: DotField::default(),
            bubbles: BubbleField::default(),
        };
        scene.on_init();
        scene
    }

    fn on_init(&mut self) {
        self.layout();
        if self.opts.bubbles_on_start {
            self.bubbles
                .show(&mut self.rng, self.opts.initial_bubbles, self.w, self.h);
        }
    }

    /// Throw away every entity and rebuild for the current size.
    pub(crate) fn layout(&mut self) {
        self.jellyfish = pack(&mut self.rng, self.w, self.h, RADIUS_RANGE);
        self.params = RenderParams::sample(&mut self.rng);
        self.dots.reseed(&mut self.rng, self.w, self.h);
        if self.bubbles.visible() {
            self.bubbles
                .show(&mut self.rng, self.opts.initial_bubbles, self.w, self.h);
        }
        info!(
            "layout {}x{}: {} jellyfish, {} dots, {} bubbles",
            self.w,
            self.h,
            self.jellyfish.len(),
            self.dots.dots.len(),
            self.bubbles.bubbles.len()
        );
    }

    pub(crate) fn on_resize(&mut self, w: f32, h: f32) {
        info!("resize {}x{} -> {}x{}", self.w, self.h, w, h);
        self.w = w.max(0.0);
        self.h = h.max(0.0);
        self.layout();
        self.params.rescale_stroke(self.w, self.h);
    }

    /// Advance all per-frame state by one tick.
    pub(crate) fn step(&mut self) {
        self.dots
            .update(&mut self.rng, &self.noise, self.w, self.h);
        for j in &mut self.jellyfish {
            j.tick(self.opts.expansion_speed);
        }
        self.bubbles.update(&mut self.rng, self.w, self.h);
    }

    /// Background, dots, jellyfish, bubbles; each layer over the last.
    pub(crate) fn draw<P: Painter>(&mut self, painter: &mut P) {
        let rows = self.h.floor() as usize;
        for y in 0..rows {
            let t = y as f32 / self.h.max(1.0);
            painter.hline(y as f32, SEA_TOP.lerp(SEA_BOTTOM, t));
        }

        self.dots.draw(painter, &mut self.rng);
        for j in &self.jellyfish {
            j.draw(painter, &self.params);
        }
        self.bubbles.draw(painter);
    }

    pub(crate) fn on_frame<P: Painter>(&mut self, painter: &mut P) {
        self.step();
        self.draw(painter);
    }

    /// Returns how many jellyfish were triggered.
    pub(crate) fn on_pointer_down(&mut self, x: f32, y: f32) -> usize {
        let p = Vec2::new(x, y);
        let mut hits = 0;
        for j in self.jellyfish.iter_mut().filter(|j| j.hit(p)) {
            j.pulse.trigger(self.opts.trigger);
            hits += 1;
        }
        debug!("pointer at ({x:.0}, {y:.0}) triggered {hits} jellyfish");
        hits
    }

    /// Returns whether the key was consumed.
    pub(crate) fn on_key_down(&mut self, key: SceneKey) -> bool {
        match key {
            SceneKey::Space => {
                let on = self
                    .bubbles
                    .toggle(&mut self.rng, self.opts.toggle_bubbles, self.w, self.h);
                info!("bubbles {}", if on { "on" } else { "off" });
                true
            }
            SceneKey::Char('c') | SceneKey::Char('C') => {
                self.bubbles.clear();
                info!("bubbles cleared");
                true
            }
            SceneKey::Char(_) => false,
        }
    }
}
