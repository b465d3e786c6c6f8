use anyhow::{bail, Result};
use clap::Parser;
use std::{path::PathBuf, time::Duration};

/// Earth in the middle, the sun circling it, the planets circling the sun.
#[derive(Parser, Debug)]
#[command(version, about)]
pub(crate) struct Args {
    /// simulated minutes per rendered frame
    #[arg(long, default_value_t = 240.0)]
    time_rate: f64,

    /// ms to wait after each frame
    #[arg(long, default_value_t = 20)]
    ms: u64,

    /// canvas width in scene units
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// canvas height in scene units
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// show the constellation ring on start
    #[arg(long)]
    sky: bool,

    /// write an SVG snapshot to this path instead of animating
    #[arg(long)]
    svg: Option<PathBuf>,

    /// frames to advance before the snapshot
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// send logs to this file (the terminal view owns the screen)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) time_rate: f64,
    pub(crate) tick_ms: u64,
    pub(crate) canvas_w: f64,
    pub(crate) canvas_h: f64,
    pub(crate) show_sky: bool,
    pub(crate) frames: u64,
    pub(crate) svg: Option<PathBuf>,
    pub(crate) log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_rate: 240.0,
            tick_ms: 20,
            canvas_w: 800.0,
            canvas_h: 800.0,
            show_sky: false,
            frames: 0,
            svg: None,
            log_file: None,
        }
    }
}

impl Settings {
    pub(crate) fn from_args(args: Args) -> Result<Self> {
        let s = Self {
            time_rate: args.time_rate,
            tick_ms: args.ms,
            canvas_w: args.width,
            canvas_h: args.height,
            show_sky: args.sky,
            frames: args.frames,
            svg: args.svg,
            log_file: args.log_file,
        };
        s.validate()?;
        Ok(s)
    }

    fn validate(&self) -> Result<()> {
        if !(self.time_rate.is_finite() && self.time_rate > 0.0) {
            bail!("--time-rate must be a positive number of minutes, got {}", self.time_rate);
        }
        if self.tick_ms == 0 {
            bail!("--ms must be at least 1");
        }
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !(usable(self.canvas_w) && usable(self.canvas_h)) {
            bail!("canvas must be finite and non-empty, got {}x{}", self.canvas_w, self.canvas_h);
        }
        Ok(())
    }

    pub(crate) fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
