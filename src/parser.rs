use crate::arc::{solve_by_offset, solve_by_radius, ArcSolution};
use crate::config::RAPID_FEEDRATE;
use glam::DVec3;

/// One parsed G-code line. Every motion variant carries its fully resolved
/// target: words missing from the input inherit the caller's cursor values
/// (modal behavior), resolved here and nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// G00 — non-cutting traverse at the fixed rapid rate.
    Rapid { target: DVec3, feedrate: f64 },
    /// G01 — straight cutting move.
    Linear { target: DVec3, feedrate: f64 },
    /// G02/G03 — circular interpolation ending at `target`.
    Arc { arc: ArcSolution, target: DVec3, feedrate: f64 },
    /// Bare `F` word — modal feedrate change, no motion.
    FeedUpdate { feedrate: f64 },
    /// M06 — swap the active tool.
    ToolChange { radius: f64 },
    /// Unrecognized or unparseable line; feedrate passes through unchanged.
    Unknown { feedrate: f64 },
}

impl Command {
    /// Resulting position, for commands that move the cursor.
    pub fn target(&self) -> Option<DVec3> {
        match self {
            Command::Rapid { target, .. }
            | Command::Linear { target, .. }
            | Command::Arc { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Feedrate carried by this command, if any.
    pub fn feedrate(&self) -> Option<f64> {
        match self {
            Command::Rapid { feedrate, .. }
            | Command::Linear { feedrate, .. }
            | Command::Arc { feedrate, .. }
            | Command::FeedUpdate { feedrate }
            | Command::Unknown { feedrate } => Some(*feedrate),
            Command::ToolChange { .. } => None,
        }
    }
}

/// Parses a single G-code line against the caller's cursor.
///
/// The parser itself is stateless; current position and feedrate are threaded
/// in by the consumer on every call. Recognized failure modes (bad numbers,
/// impossible arc geometry) degrade to `Command::Unknown` so one bad line
/// never aborts a program.
pub fn parse(line: &str, current_position: DVec3, current_feedrate: f64) -> Command {
    let line = line.trim().to_uppercase();
    let mut parts = line.split_whitespace();

    let Some(code) = parts.next() else {
        return Command::Unknown { feedrate: current_feedrate };
    };

    // A bare feedrate word wins over G/M dispatch.
    if let Some(rest) = code.strip_prefix('F') {
        if let Ok(feedrate) = rest.parse::<f64>() {
            return Command::FeedUpdate { feedrate };
        }
        return Command::Unknown { feedrate: current_feedrate };
    }

    let words = Words::scan(parts.clone());
    let feedrate = words.get('F').unwrap_or(current_feedrate);

    let x = words.get('X').unwrap_or(current_position.x);
    let y = words.get('Y').unwrap_or(current_position.y);
    let z = words.get('Z').unwrap_or(current_position.z);
    let target = DVec3::new(x, y, z);

    match code {
        "G00" | "G0" => Command::Rapid { target, feedrate: RAPID_FEEDRATE },
        "G01" | "G1" => Command::Linear { target, feedrate },
        "G02" | "G2" | "G03" | "G3" => {
            let clockwise = matches!(code, "G02" | "G2");
            let solved = if let Some(r) = words.get('R') {
                solve_by_radius(current_position, x, y, r, clockwise)
            } else {
                let i = words.get('I').unwrap_or(0.0);
                let j = words.get('J').unwrap_or(0.0);
                solve_by_offset(current_position, x, y, i, j, clockwise)
            };
            match solved {
                Ok(arc) => Command::Arc { arc, target, feedrate },
                // Recoverable-per-line policy: a bad arc degrades the whole
                // line, feedrate unchanged.
                Err(_) => Command::Unknown { feedrate: current_feedrate },
            }
        }
        "M06" | "M6" => {
            // The trailing token encodes the tool diameter.
            let radius = parts
                .last()
                .map(|tok| tok.trim_start_matches(|c: char| c.is_ascii_alphabetic()))
                .and_then(|num| num.parse::<f64>().ok())
                .map(|diameter| diameter / 2.0)
                .unwrap_or(0.0);
            Command::ToolChange { radius }
        }
        _ => Command::Unknown { feedrate: current_feedrate },
    }
}

/// Letter+number words of one line. Words with unparseable numeric suffixes
/// are silently skipped, not fatal.
struct Words(Vec<(char, f64)>);

impl Words {
    fn scan<'a>(parts: impl Iterator<Item = &'a str>) -> Self {
        let mut words = Vec::new();
        for part in parts {
            let mut chars = part.chars();
            let Some(letter) = chars.next() else { continue };
            if let Ok(value) = chars.as_str().parse::<f64>() {
                words.push((letter, value));
            }
        }
        Self(words)
    }

    fn get(&self, letter: char) -> Option<f64> {
        self.0.iter().find(|(l, _)| *l == letter).map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POS: DVec3 = DVec3::new(0.0, 0.0, 5.0);

    #[test]
    fn linear_move_inherits_modal_fields() {
        let cmd = parse("G01 X10", POS, 800.0);
        assert_eq!(cmd, Command::Linear { target: DVec3::new(10.0, 0.0, 5.0), feedrate: 800.0 });
    }

    #[test]
    fn linear_move_takes_inline_feedrate() {
        let cmd = parse("G1 X10 Y2 F250", POS, 800.0);
        assert_eq!(cmd, Command::Linear { target: DVec3::new(10.0, 2.0, 5.0), feedrate: 250.0 });
    }

    #[test]
    fn rapid_is_pinned_to_rapid_feedrate() {
        let cmd = parse("G00 X1 Y2 Z3", POS, 123.0);
        assert_eq!(cmd, Command::Rapid { target: DVec3::new(1.0, 2.0, 3.0), feedrate: 5000.0 });
    }

    #[test]
    fn bare_feed_word_updates_feedrate_only() {
        assert_eq!(parse("F250", POS, 800.0), Command::FeedUpdate { feedrate: 250.0 });
        // Garbage after F is not a feed update.
        assert_eq!(parse("FOO", POS, 800.0), Command::Unknown { feedrate: 800.0 });
    }

    #[test]
    fn tokenization_is_case_insensitive() {
        let cmd = parse("  g1 x5 f200 ", POS, 800.0);
        assert_eq!(cmd, Command::Linear { target: DVec3::new(5.0, 0.0, 5.0), feedrate: 200.0 });
    }

    #[test]
    fn bad_word_suffix_is_skipped() {
        let cmd = parse("G01 X10 Yabc", POS, 800.0);
        assert_eq!(cmd, Command::Linear { target: DVec3::new(10.0, 0.0, 5.0), feedrate: 800.0 });
    }

    #[test]
    fn empty_line_is_unknown() {
        assert_eq!(parse("   ", POS, 800.0), Command::Unknown { feedrate: 800.0 });
    }

    #[test]
    fn arc_with_offset_notation() {
        let cmd = parse("G02 X10 Y0 I5 J0", POS, 600.0);
        let Command::Arc { arc, target, feedrate } = cmd else {
            panic!("expected arc, got {cmd:?}");
        };
        assert_eq!(target, DVec3::new(10.0, 0.0, 5.0));
        assert_eq!(feedrate, 600.0);
        assert!(arc.clockwise);
        assert!((arc.center.x - 5.0).abs() < 1e-9);
        assert!((arc.radius - 5.0).abs() < 1e-9);
    }

    #[test]
    fn arc_with_radius_notation() {
        let cmd = parse("G03 X0 Y10 R5", POS, 600.0);
        assert!(matches!(cmd, Command::Arc { arc, .. } if !arc.clockwise && arc.steps == 60));
    }

    #[test]
    fn impossible_arc_degrades_to_unknown() {
        // chord sqrt(50) > 2 * 1
        let cmd = parse("G02 X5 Y5 R1", POS, 800.0);
        assert_eq!(cmd, Command::Unknown { feedrate: 800.0 });
    }

    #[test]
    fn arc_target_off_circle_degrades_to_unknown() {
        let cmd = parse("G02 X3 Y3 I5 J0", POS, 800.0);
        assert_eq!(cmd, Command::Unknown { feedrate: 800.0 });
    }

    #[test]
    fn tool_change_halves_trailing_diameter() {
        assert_eq!(parse("M06 12", POS, 800.0), Command::ToolChange { radius: 6.0 });
        assert_eq!(parse("M6 T10", POS, 800.0), Command::ToolChange { radius: 5.0 });
        assert_eq!(parse("M6", POS, 800.0), Command::ToolChange { radius: 0.0 });
    }

    #[test]
    fn unrecognized_code_carries_feedrate_forward() {
        assert_eq!(parse("G42 X1", POS, 800.0), Command::Unknown { feedrate: 800.0 });
        assert_eq!(parse("M30", POS, 800.0), Command::Unknown { feedrate: 800.0 });
    }
}
