use crate::jelly::TriggerPolicy;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "jellyfield")]
#[command(about = "Braille jellyfish field: click to pulse, Space toggles bubbles, C clears them", long_about = None)]
pub(crate) struct Args {
    /// JSON settings file; flags given on the command line win
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// FPS cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// Logical pixels per braille dot (bigger = zoomed out)
    #[arg(long)]
    pub(crate) px_per_dot: Option<u32>,

    /// Fixed RNG seed (random otherwise)
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Pulse growth per frame in logical pixels
    #[arg(long)]
    pub(crate) expansion_speed: Option<f32>,

    /// What clicking an already pulsing jellyfish does
    #[arg(long, value_enum)]
    pub(crate) trigger: Option<TriggerPolicy>,

    /// Bubbles seeded at start-up and on relayout
    #[arg(long)]
    pub(crate) initial_bubbles: Option<usize>,

    /// Bubbles seeded when toggled on with Space
    #[arg(long)]
    pub(crate) toggle_bubbles: Option<usize>,

    /// Start with bubbles hidden
    #[arg(long, default_value_t = false)]
    pub(crate) no_bubbles: bool,

    /// Hide the status line
    #[arg(long, default_value_t = false)]
    pub(crate) no_hud: bool,

    /// Write logs here (the terminal itself is busy)
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) fps: u32,
    pub(crate) px_per_dot: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) expansion_speed: f32,
    pub(crate) trigger: TriggerPolicy,
    pub(crate) initial_bubbles: usize,
    pub(crate) toggle_bubbles: usize,
    pub(crate) bubbles: bool,
    pub(crate) hud: bool,
    pub(crate) log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: 60,
            px_per_dot: 4,
            seed: None,
            expansion_speed: 2.0,
            trigger: TriggerPolicy::Restart,
            initial_bubbles: 50,
            toggle_bubbles: 100,
            bubbles: true,
            hud: true,
            log_file: None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("fps must be in 1..=240, got {0}")]
    Fps(u32),
    #[error("px-per-dot must be in 1..=32, got {0}")]
    PxPerDot(u32),
    #[error("expansion speed must be a positive number, got {0}")]
    ExpansionSpeed(f32),
}

impl Settings {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=240).contains(&self.fps) {
            return Err(ConfigError::Fps(self.fps));
        }
        if !(1..=32).contains(&self.px_per_dot) {
            return Err(ConfigError::PxPerDot(self.px_per_dot));
        }
        if !(self.expansion_speed.is_finite() && self.expansion_speed > 0.0) {
            return Err(ConfigError::ExpansionSpeed(self.expansion_speed));
        }
        Ok(())
    }

    fn apply(&mut self, args: &Args) {
        if let Some(v) = args.fps {
            self.fps = v;
        }
        if let Some(v) = args.px_per_dot {
            self.px_per_dot = v;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(v) = args.expansion_speed {
            self.expansion_speed = v;
        }
        if let Some(v) = args.trigger {
            self.trigger = v;
        }
        if let Some(v) = args.initial_bubbles {
            self.initial_bubbles = v;
        }
        if let Some(v) = args.toggle_bubbles {
            self.toggle_bubbles = v;
        }
        if args.no_bubbles {
            self.bubbles = false;
        }
        if args.no_hud {
            self.hud = false;
        }
        if args.log_file.is_some() {
            self.log_file = args.log_file.clone();
        }
    }
}

pub(crate) fn load_settings(path: &Path) -> Result<Settings> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("could not read settings from {}", path.display()))?;
    let v = serde_json::from_str::<Settings>(&s)
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    Ok(v)
}

/// Defaults, then the settings file, then explicit flags.
pub(crate) fn resolve(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    settings.apply(args);
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let s = resolve(&Args::default()).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "jellyfield",
            "--fps",
            "30",
            "--seed",
            "7",
            "--trigger",
            "toggle",
            "--no-bubbles",
            "--toggle-bubbles",
            "12",
        ])
        .unwrap();
        let s = resolve(&args).unwrap();
        assert_eq!(s.fps, 30);
        assert_eq!(s.seed, Some(7));
        assert_eq!(s.trigger, TriggerPolicy::Toggle);
        assert!(!s.bubbles);
        assert_eq!(s.toggle_bubbles, 12);
        assert_eq!(s.px_per_dot, 4);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{ "px_per_dot": 2, "trigger": "toggle" }"#).unwrap();
        assert_eq!(s.px_per_dot, 2);
        assert_eq!(s.trigger, TriggerPolicy::Toggle);
        assert_eq!(s.fps, 60);
        assert!(s.bubbles);
    }

    #[test]
    fn unknown_json_fields_are_rejected() {
        assert!(serde_json::from_str::<Settings>(r#"{ "fsp": 30 }"#).is_err());
    }

    #[test]
    fn settings_file_then_flags() {
        let path = std::env::temp_dir().join(format!("jellyfield-{}.json", std::process::id()));
        fs::write(&path, r#"{ "fps": 24, "hud": false, "expansion_speed": 3.5 }"#).unwrap();
        let args = Args {
            config: Some(path.clone()),
            fps: Some(48),
            ..Args::default()
        };
        let s = resolve(&args).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(s.fps, 48);
        assert!(!s.hud);
        assert_eq!(s.expansion_speed, 3.5);
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let args = Args {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            ..Args::default()
        };
        let err = resolve(&args).unwrap_err();
        assert!(err.to_string().contains("could not read settings"));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut s = Settings {
            fps: 0,
            ..Settings::default()
        };
        assert_eq!(s.validate(), Err(ConfigError::Fps(0)));
        s = Settings {
            px_per_dot: 64,
            ..Settings::default()
        };
        assert_eq!(s.validate(), Err(ConfigError::PxPerDot(64)));
        s = Settings {
            expansion_speed: -1.0,
            ..Settings::default()
        };
        assert_eq!(s.validate(), Err(ConfigError::ExpansionSpeed(-1.0)));
    }
}
