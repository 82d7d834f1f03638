use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "kiln")]
#[command(about = "Tile-parallel CPU path tracer")]
pub struct Args {
    /// Scene file (JSON). Renders the built-in demo scene when omitted
    pub scene: Option<PathBuf>,

    /// Override the scene's image width in pixels
    #[arg(long)]
    pub width: Option<i32>,

    /// Override the scene's samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<i32>,

    /// Override the scene's maximum bounce depth
    #[arg(long, short = 'd')]
    pub depth: Option<i32>,

    /// Number of frames to render back to back; only the last is written
    #[arg(long, short = 'n', default_value_t = 1)]
    pub frames: u32,

    /// Seed of the first frame; each following frame adds one
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Output PNG path
    #[arg(short, long, default_value = "kiln.png")]
    pub output: PathBuf,

    /// Logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["kiln"]);
        assert!(args.scene.is_none());
        assert_eq!(args.frames, 1);
        assert_eq!(args.seed, 0);
        assert_eq!(args.output, PathBuf::from("kiln.png"));
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Info);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "kiln", "scene.json", "--width", "320", "-s", "64", "-d", "8", "-n", "3", "--seed", "42",
            "-o", "out.png", "--log-level", "debug",
        ]);
        assert_eq!(args.scene, Some(PathBuf::from("scene.json")));
        assert_eq!(args.width, Some(320));
        assert_eq!(args.samples, Some(64));
        assert_eq!(args.depth, Some(8));
        assert_eq!(args.frames, 3);
        assert_eq!(args.seed, 42);
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }
}
