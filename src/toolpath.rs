use thiserror::Error;

/// Retract height used by every canned cycle.
pub const SAFE_Z: f64 = 5.0;

/// Errors from the canned-cycle emitters. These surface to the caller; the
/// operation is simply not added to the program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolpathError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Parameters for a drilling or boring cycle. X/Y/feedrate are optional (the
/// cycle runs at the current position and modal feedrate when absent); depth
/// is required.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoleParams {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub depth: Option<f64>,
    pub feedrate: Option<f64>,
}

/// Parameters for a circular pocket milled as stepped-down concentric rings.
#[derive(Debug, Clone, Copy)]
pub struct PocketParams {
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
    pub depth: f64,
    pub stepdown: f64,
    pub feedrate: f64,
    pub tool_radius: f64,
}

/// Parameters for a rectangular face/pocket cycle milled as inward-offset
/// contours.
#[derive(Debug, Clone, Copy)]
pub struct FacePocketParams {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub stepdown: f64,
    pub feedrate: f64,
    pub tool_radius: f64,
}

/// Drill cycle: position, spindle and coolant on, plunge, retract.
pub fn drill(params: &HoleParams) -> Result<Vec<String>, ToolpathError> {
    let depth = params.depth.ok_or(ToolpathError::MissingParameter("depth"))?;

    let mut commands = vec![position_line(params.x, params.y)];
    if let Some(f) = params.feedrate {
        commands.push(format!("F{}", fmt(f)));
    }
    commands.push("M03".to_string());
    commands.push("M08".to_string());
    commands.push(format!("G01 Z{}", fmt(-depth)));
    commands.push(format!("G00 Z{}", fmt(SAFE_Z)));
    commands.push("M09".to_string());
    Ok(commands)
}

/// Boring cycle: like `drill` without the spindle/coolant codes.
pub fn bore(params: &HoleParams) -> Result<Vec<String>, ToolpathError> {
    let depth = params.depth.ok_or(ToolpathError::MissingParameter("depth"))?;

    let mut commands = vec![position_line(params.x, params.y)];
    if let Some(f) = params.feedrate {
        commands.push(format!("F{}", fmt(f)));
    }
    commands.push(format!("G01 Z{}", fmt(-depth)));
    commands.push(format!("G00 Z{}", fmt(SAFE_Z)));
    Ok(commands)
}

/// Clockwise arc between spindle start/stop. R notation when both center
/// offsets are zero, I/J otherwise.
pub fn arc_mill_clockwise(x: f64, y: f64, i: f64, j: f64, radius: f64) -> Vec<String> {
    arc_mill("G02", x, y, i, j, radius)
}

/// Counterclockwise arc between spindle start/stop.
pub fn arc_mill_counterclockwise(x: f64, y: f64, i: f64, j: f64, radius: f64) -> Vec<String> {
    arc_mill("G03", x, y, i, j, radius)
}

fn arc_mill(code: &str, x: f64, y: f64, i: f64, j: f64, radius: f64) -> Vec<String> {
    let arc = if i == 0.0 && j == 0.0 {
        format!("{code} X{} Y{} R{}", fmt(x), fmt(y), fmt(radius))
    } else {
        format!("{code} X{} Y{} I{} J{}", fmt(x), fmt(y), fmt(i), fmt(j))
    };
    vec!["M3".to_string(), arc, "M5".to_string()]
}

/// Full circle of the given radius around (x, y): lead-in to the west
/// quadrant point, then one clockwise revolution.
pub fn circle_mill(x: f64, y: f64, radius: f64) -> Vec<String> {
    let start_x = x - radius;
    vec![
        format!("G01 X{} Y{}", fmt(start_x), fmt(y)),
        format!("G02 X{} Y{} I{} J0", fmt(start_x), fmt(y), fmt(radius)),
    ]
}

/// Circular pocket: for each Z pass, plunge at the center and spiral out in
/// full-circle rings one tool radius apart.
pub fn circular_pocket(params: &PocketParams) -> Result<Vec<String>, ToolpathError> {
    validate_positive("depth", params.depth)?;
    validate_positive("stepdown", params.stepdown)?;
    validate_positive("tool_radius", params.tool_radius)?;
    if params.diameter < 2.0 * params.tool_radius {
        return Err(ToolpathError::InvalidParameter { name: "diameter", value: params.diameter });
    }

    let mut commands =
        vec![format!("G0 X{} Y{} Z{}", fmt(params.x), fmt(params.y), fmt(SAFE_Z))];
    if params.feedrate > 0.0 {
        commands.push(format!("F{}", fmt(params.feedrate)));
    }
    commands.push("M3".to_string());

    for z in pass_depths(params.depth, params.stepdown) {
        commands.push(format!("G01 X{} Y{}", fmt(params.x), fmt(params.y)));
        commands.push(format!("G01 Z{}", fmt(-z)));

        let max_ring = params.diameter / 2.0 - params.tool_radius;
        let mut ring = params.tool_radius;
        loop {
            let ring_radius = ring.min(max_ring);
            commands.push(format!("G01 X{}", fmt(params.x - ring_radius)));
            commands.push(format!(
                "G02 X{} Y{} I{} J0 F{}",
                fmt(params.x - ring_radius),
                fmt(params.y),
                fmt(ring_radius),
                fmt(params.feedrate)
            ));
            if ring >= max_ring {
                break;
            }
            ring += params.tool_radius;
        }
    }

    commands.push(format!("G0 Z{}", fmt(SAFE_Z)));
    commands.push("M5".to_string());
    Ok(commands)
}

/// Rectangular face/pocket: for each Z pass, trace inward-offset rectangles
/// until the remaining window closes.
pub fn face_pocket(params: &FacePocketParams) -> Result<Vec<String>, ToolpathError> {
    validate_positive("depth", params.depth)?;
    validate_positive("stepdown", params.stepdown)?;
    validate_positive("tool_radius", params.tool_radius)?;
    if params.width < 2.0 * params.tool_radius {
        return Err(ToolpathError::InvalidParameter { name: "width", value: params.width });
    }
    if params.height < 2.0 * params.tool_radius {
        return Err(ToolpathError::InvalidParameter { name: "height", value: params.height });
    }

    let r = params.tool_radius;
    let mut commands =
        vec![format!("G0 X{} Y{} Z{}", fmt(params.x + r), fmt(params.y + r), fmt(SAFE_Z))];
    if params.feedrate > 0.0 {
        commands.push(format!("F{}", fmt(params.feedrate)));
    }
    commands.push("M3".to_string());

    for z in pass_depths(params.depth, params.stepdown) {
        commands.push(format!("G1 Z{}", fmt(-z)));

        let mut cx = params.x + r;
        let mut cy = params.y + r;
        let mut w = params.width - 2.0 * r;
        let mut h = params.height - 2.0 * r;
        while w > 0.0 && h > 0.0 {
            commands.push(format!("G1 X{} Y{}", fmt(cx), fmt(cy)));
            commands.push(format!("G1 X{} Y{}", fmt(cx + w), fmt(cy)));
            commands.push(format!("G1 X{} Y{}", fmt(cx + w), fmt(cy + h)));
            commands.push(format!("G1 X{} Y{}", fmt(cx), fmt(cy + h)));
            commands.push(format!("G1 X{} Y{}", fmt(cx), fmt(cy)));
            cx += r;
            cy += r;
            w -= 2.0 * r;
            h -= 2.0 * r;
        }
    }

    commands.push(format!("G0 Z{}", fmt(SAFE_Z)));
    commands.push("M5".to_string());
    Ok(commands)
}

/// Single rapid positioning line with the given axis words.
pub fn go_to(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> String {
    let mut line = "G00".to_string();
    if let Some(x) = x {
        line.push_str(&format!(" X{}", fmt(x)));
    }
    if let Some(y) = y {
        line.push_str(&format!(" Y{}", fmt(y)));
    }
    if let Some(z) = z {
        line.push_str(&format!(" Z{}", fmt(z)));
    }
    line
}

/// Single feed move; at least one axis word is required.
pub fn mill_to(
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    feedrate: Option<f64>,
) -> Result<String, ToolpathError> {
    if x.is_none() && y.is_none() && z.is_none() {
        return Err(ToolpathError::MissingParameter("x, y or z"));
    }
    let mut line = "G01".to_string();
    if let Some(x) = x {
        line.push_str(&format!(" X{}", fmt(x)));
    }
    if let Some(y) = y {
        line.push_str(&format!(" Y{}", fmt(y)));
    }
    if let Some(z) = z {
        line.push_str(&format!(" Z{}", fmt(z)));
    }
    if let Some(f) = feedrate {
        line.push_str(&format!(" F{}", fmt(f)));
    }
    Ok(line)
}

/// Prefixes every line with an N word, counting in steps of five.
pub fn number_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| format!("N{} {}", 5 * (idx + 1), line))
        .collect()
}

fn position_line(x: Option<f64>, y: Option<f64>) -> String {
    let mut line = "G00".to_string();
    if let Some(x) = x {
        line.push_str(&format!(" X{}", fmt(x)));
    }
    if let Some(y) = y {
        line.push_str(&format!(" Y{}", fmt(y)));
    }
    line.push_str(&format!(" Z{}", fmt(SAFE_Z)));
    line
}

fn validate_positive(name: &'static str, value: f64) -> Result<(), ToolpathError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ToolpathError::InvalidParameter { name, value })
    }
}

/// Z pass depths for a stepped cycle: whole stepdowns plus a final partial
/// pass down to the full depth.
fn pass_depths(depth: f64, stepdown: f64) -> Vec<f64> {
    let mut depths = Vec::new();
    let mut z = stepdown;
    while z < depth - 1e-9 {
        depths.push(round3(z));
        z += stepdown;
    }
    depths.push(round3(depth));
    depths
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Formats a coordinate rounded to three decimals, without a trailing
/// fractional part for whole numbers.
fn fmt(v: f64) -> String {
    let r = round3(v);
    if r == r.trunc() {
        format!("{}", r as i64)
    } else {
        format!("{r}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drill_requires_depth() {
        let err = drill(&HoleParams::default()).unwrap_err();
        assert_eq!(err, ToolpathError::MissingParameter("depth"));
    }

    #[test]
    fn drill_emits_spindle_and_coolant_codes() {
        let params = HoleParams {
            x: Some(12.0),
            y: Some(8.5),
            depth: Some(3.0),
            feedrate: Some(150.0),
        };
        let commands = drill(&params).unwrap();
        assert_eq!(
            commands,
            vec!["G00 X12 Y8.5 Z5", "F150", "M03", "M08", "G01 Z-3", "G00 Z5", "M09"]
        );
    }

    #[test]
    fn bore_skips_spindle_codes_and_optional_words() {
        let params = HoleParams { depth: Some(2.5), ..Default::default() };
        let commands = bore(&params).unwrap();
        assert_eq!(commands, vec!["G00 Z5", "G01 Z-2.5", "G00 Z5"]);
    }

    #[test]
    fn arc_mill_switches_notation_on_zero_offsets() {
        let r_form = arc_mill_clockwise(10.0, 0.0, 0.0, 0.0, 5.0);
        assert_eq!(r_form, vec!["M3", "G02 X10 Y0 R5", "M5"]);

        let ij_form = arc_mill_counterclockwise(0.0, 10.0, -10.0, 0.0, 10.0);
        assert_eq!(ij_form, vec!["M3", "G03 X0 Y10 I-10 J0", "M5"]);
    }

    #[test]
    fn circle_mill_closes_on_its_start_point() {
        let commands = circle_mill(20.0, 10.0, 4.0);
        assert_eq!(commands, vec!["G01 X16 Y10", "G02 X16 Y10 I4 J0"]);
    }

    #[test]
    fn circular_pocket_steps_down_and_spirals_out() {
        let params = PocketParams {
            x: 0.0,
            y: 0.0,
            diameter: 12.0,
            depth: 4.0,
            stepdown: 2.0,
            feedrate: 300.0,
            tool_radius: 2.0,
        };
        let commands = circular_pocket(&params).unwrap();

        assert_eq!(commands.first().unwrap(), "G0 X0 Y0 Z5");
        assert_eq!(commands.last().unwrap(), "M5");
        // Two passes, each plunging deeper.
        assert_eq!(commands.iter().filter(|c| *c == "G01 Z-2").count(), 1);
        assert_eq!(commands.iter().filter(|c| *c == "G01 Z-4").count(), 1);
        // Rings reach but never exceed diameter/2 - tool_radius = 4.
        assert!(commands.iter().any(|c| c == "G02 X-4 Y0 I4 J0 F300"));
        assert!(!commands.iter().any(|c| c.contains("I6 ") || c.contains("I5 ")));
    }

    #[test]
    fn circular_pocket_rejects_tool_wider_than_pocket() {
        let params = PocketParams {
            x: 0.0,
            y: 0.0,
            diameter: 3.0,
            depth: 1.0,
            stepdown: 1.0,
            feedrate: 300.0,
            tool_radius: 2.0,
        };
        let err = circular_pocket(&params).unwrap_err();
        assert!(matches!(err, ToolpathError::InvalidParameter { name: "diameter", .. }));
    }

    #[test]
    fn face_pocket_traces_inward_rectangles() {
        let params = FacePocketParams {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            depth: 1.0,
            stepdown: 1.0,
            feedrate: 200.0,
            tool_radius: 2.0,
        };
        let commands = face_pocket(&params).unwrap();
        assert_eq!(commands[0], "G0 X2 Y2 Z5");
        assert!(commands.contains(&"G1 Z-1".to_string()));
        // Outer contour corner and the inner 2x2 window.
        assert!(commands.contains(&"G1 X8 Y8".to_string()));
        assert!(commands.contains(&"G1 X6 Y6".to_string()));
    }

    #[test]
    fn partial_final_pass_reaches_full_depth() {
        assert_eq!(pass_depths(5.0, 2.0), vec![2.0, 4.0, 5.0]);
        assert_eq!(pass_depths(4.0, 2.0), vec![2.0, 4.0]);
    }

    #[test]
    fn mill_to_needs_an_axis_word() {
        let err = mill_to(None, None, None, Some(100.0)).unwrap_err();
        assert_eq!(err, ToolpathError::MissingParameter("x, y or z"));

        let line = mill_to(Some(1.5), None, Some(-2.0), Some(100.0)).unwrap();
        assert_eq!(line, "G01 X1.5 Z-2 F100");
    }

    #[test]
    fn go_to_emits_present_words_only() {
        assert_eq!(go_to(Some(1.0), None, Some(5.0)), "G00 X1 Z5");
    }

    #[test]
    fn numbering_counts_in_fives() {
        let lines = vec!["G00 X0".to_string(), "G01 X10".to_string()];
        assert_eq!(number_lines(&lines), vec!["N5 G00 X0", "N10 G01 X10"]);
    }
}
