use crate::config::Config;
use crate::parser::{parse, Command};
use glam::DVec3;

/// Mutable per-consumer interpretation state: the modal position and feedrate
/// threaded back into the parser call by call.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub position: DVec3,
    pub feedrate: f64,
}

impl Cursor {
    pub fn new(position: DVec3, feedrate: f64) -> Self {
        Self { position, feedrate }
    }

    /// Applies a parsed command: position follows any motion target, and the
    /// feedrate follows every command that carries one — including the fixed
    /// rapid rate a G00 carries, which then acts as the modal feedrate.
    pub fn apply(&mut self, cmd: &Command) {
        if let Some(target) = cmd.target() {
            self.position = target;
        }
        if let Some(feedrate) = cmd.feedrate() {
            self.feedrate = feedrate;
        }
    }
}

/// Estimates total machining time for a line-oriented G-code program, in
/// seconds.
///
/// Only cutting moves (G01, G02/G03) consume time; rapid traverses move the
/// cursor but are not modeled (intentional simplification, kept for
/// compatibility with existing programs' estimates).
pub fn estimate_program(gcode: &str, config: &Config) -> f64 {
    let mut cursor = Cursor::new(config.initial_position, config.initial_feedrate);
    let mut total_seconds = 0.0;

    for line in gcode.lines() {
        let cmd = parse(line, cursor.position, cursor.feedrate);

        if let Command::FeedUpdate { feedrate } = cmd {
            cursor.feedrate = feedrate;
            continue;
        }

        match &cmd {
            Command::Linear { target, feedrate } => {
                if *feedrate > 0.0 {
                    let distance = cursor.position.distance(*target);
                    total_seconds += distance / feedrate * 60.0;
                }
            }
            Command::Arc { arc, target, feedrate } => {
                if *feedrate > 0.0 {
                    let dz = target.z - cursor.position.z;
                    let distance = arc.arc_length().hypot(dz);
                    total_seconds += distance / feedrate * 60.0;
                }
            }
            _ => {}
        }

        cursor.apply(&cmd);
    }

    total_seconds
}

/// Estimate with the crate defaults (start at (0, 0, 5), feedrate 1000) and
/// format the result as `HH:MM:SS`.
pub fn estimate_formatted(gcode: &str) -> String {
    format_hms(estimate_program(gcode, &Config::default()))
}

/// Formats seconds as `HH:MM:SS`, rounded to the nearest second.
pub fn format_hms(total_seconds: f64) -> String {
    let total = total_seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
