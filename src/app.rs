use crate::config::{self, Args, Settings};
use crate::input::{cell_center, collect_input_nonblocking, logical_size, AppEvent};
use crate::render::{canvas_to_cells, draw_text, BrailleSurface, Terminal};
use crate::scene::{Scene, SceneOptions};
use anyhow::Context;
use crossterm::style::Color;
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

pub(crate) struct App {
    settings: Settings,
    term: Terminal,
    scene: Scene,
    paused: bool,
    show_hud: bool,
    should_quit: bool,
    fps_est: f32,
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let term = Terminal::begin()?;
        let (w, h) = logical_size(term.cols, term.rows, settings.px_per_dot as f32);
        let scene = Scene::new(SceneOptions::from(&settings), rng, w, h);

        Ok(Self {
            show_hud: settings.hud,
            settings,
            term,
            scene,
            paused: false,
            should_quit: false,
            fps_est: 0.0,
        })
    }

    fn handle(&mut self, ev: AppEvent) {
        let scale = self.settings.px_per_dot as f32;
        match ev {
            AppEvent::Quit => self.should_quit = true,
            AppEvent::Pause => self.paused = !self.paused,
            AppEvent::Hud => self.show_hud = !self.show_hud,
            AppEvent::Key(key) => {
                self.scene.on_key_down(key);
            }
            AppEvent::Click { col, row } => {
                let (x, y) = cell_center(col, row, scale);
                self.scene.on_pointer_down(x, y);
            }
            AppEvent::Resize { cols, rows } => {
                self.term.resize(cols, rows);
                let (w, h) = logical_size(cols, rows, scale);
                self.scene.on_resize(w, h);
            }
        }
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / self.settings.fps as f32);

        let mut fps_acc = 0.0f32;
        let mut fps_frames = 0u32;
        let mut last = Instant::now();

        while !self.should_quit {
            let frame_start = Instant::now();

            for ev in collect_input_nonblocking(frame_dt)? {
                self.handle(ev);
                if self.should_quit {
                    break;
                }
            }

            let dt = frame_start.saturating_duration_since(last).as_secs_f32();
            last = frame_start;
            fps_acc += dt;
            fps_frames += 1;
            if fps_acc >= 0.5 {
                self.fps_est = fps_frames as f32 / fps_acc;
                fps_acc = 0.0;
                fps_frames = 0;
            }

            self.render_frame()?;
            spin_sleep(frame_dt, frame_start);
        }

        info!("shutting down");
        self.term.end()?;
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.term.canvas.clear();
        {
            let mut surface = BrailleSurface {
                canvas: &mut self.term.canvas,
                px_per_dot: self.settings.px_per_dot as f32,
            };
            if self.paused {
                self.scene.draw(&mut surface);
            } else {
                self.scene.on_frame(&mut surface);
            }
        }
        canvas_to_cells(&self.term.canvas, &mut self.term.cur);

        if self.show_hud && self.term.rows > 0 {
            let line = status_line(&self.scene, self.paused, self.fps_est);
            draw_text(&mut self.term.cur, 0, 0, &line, Color::AnsiValue(159), Color::AnsiValue(17));
        }

        self.term.present()
    }
}

pub(crate) fn status_line(scene: &Scene, paused: bool, fps: f32) -> String {
    format!(
        " jellyfield | jellyfish: {} | dots: {} | bubbles: {} | {} | {:.0} fps | click pulse  Space bubbles  C clear  P pause  H hud  Q quit ",
        scene.jellyfish.len(),
        scene.dots.dots.len(),
        if scene.bubbles.visible() {
            format!("on ({})", scene.bubbles.bubbles.len())
        } else {
            "off".to_string()
        },
        if paused { "paused" } else { "running" },
        fps
    )
}

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let settings = config::resolve(&args)?;
    init_logging(settings.log_file.as_deref())?;
    info!("starting with {settings:?}");

    let mut app = App::init(settings)?;
    app.run()
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_reports_counts_and_state() {
        let scene = Scene::new(SceneOptions::default(), StdRng::seed_from_u64(4), 400.0, 400.0);
        let line = status_line(&scene, true, 59.6);
        assert!(line.contains(&format!("jellyfish: {}", scene.jellyfish.len())));
        assert!(line.contains("dots: 200"));
        assert!(line.contains("bubbles: on (50)"));
        assert!(line.contains("paused"));
        assert!(line.contains("60 fps"));
    }

    #[test]
    fn status_line_shows_hidden_bubbles() {
        let opts = SceneOptions {
            bubbles_on_start: false,
            ..SceneOptions::default()
        };
        let scene = Scene::new(opts, StdRng::seed_from_u64(4), 100.0, 100.0);
        let line = status_line(&scene, false, 0.0);
        assert!(line.contains("bubbles: off"));
        assert!(line.contains("running"));
    }
}
