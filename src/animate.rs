use crate::config::Config;
use crate::estimate::Cursor;
use crate::parser::{parse, Command};
use glam::DVec3;
use serde::Serialize;

/// Boundary to the external renderer. The driver only emits pose and
/// material-removal streams; the actual solid model, boolean cuts and display
/// refresh live on the other side of this trait.
pub trait Renderer {
    /// Tool moved to an interpolated pose.
    fn pose(&mut self, position: DVec3);
    /// Trail segment between two consecutive poses.
    fn trail(&mut self, from: DVec3, to: DVec3);
    /// The tool is inside stock at this pose; cut material here.
    fn remove_material(&mut self, position: DVec3);
    /// Swap the active tool geometry.
    fn tool_change(&mut self, radius: f64);
}

/// One replay event, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MotionEvent {
    Pose { x: f64, y: f64, z: f64 },
    Trail { from: [f64; 3], to: [f64; 3] },
    MaterialRemoval { x: f64, y: f64, z: f64 },
    ToolChange { radius: f64 },
}

/// Recording renderer: collects the event stream instead of drawing it.
/// Used by the CLI trace output and by tests.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<MotionEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn removal_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, MotionEvent::MaterialRemoval { .. }))
            .count()
    }

    pub fn pose_count(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, MotionEvent::Pose { .. })).count()
    }
}

impl Renderer for EventLog {
    fn pose(&mut self, p: DVec3) {
        self.events.push(MotionEvent::Pose { x: p.x, y: p.y, z: p.z });
    }

    fn trail(&mut self, from: DVec3, to: DVec3) {
        self.events.push(MotionEvent::Trail { from: from.to_array(), to: to.to_array() });
    }

    fn remove_material(&mut self, p: DVec3) {
        self.events.push(MotionEvent::MaterialRemoval { x: p.x, y: p.y, z: p.z });
    }

    fn tool_change(&mut self, radius: f64) {
        self.events.push(MotionEvent::ToolChange { radius });
    }
}

/// Replays a G-code program as a continuous pose stream against a renderer.
///
/// The loop is inherently sequential: every step's tool and material state
/// depends on the previous one. It owns its cursor exclusively and can run on
/// a thread of its own, handing events across the `Renderer` seam.
pub struct Animator<'a, R: Renderer> {
    cursor: Cursor,
    last_trail_point: Option<DVec3>,
    renderer: &'a mut R,
    config: Config,
}

impl<'a, R: Renderer> Animator<'a, R> {
    pub fn new(renderer: &'a mut R, config: Config) -> Self {
        Self {
            cursor: Cursor::new(config.initial_position, config.animation_feedrate),
            last_trail_point: None,
            renderer,
            config,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.cursor.position
    }

    /// Replays the whole program, one line at a time.
    pub fn run(&mut self, gcode: &str) {
        for line in gcode.lines() {
            self.step(line);
        }
    }

    /// Interprets and animates a single line.
    pub fn step(&mut self, line: &str) {
        let cmd = parse(line, self.cursor.position, self.cursor.feedrate);
        match &cmd {
            Command::Rapid { target, .. } => {
                let steps = self.linear_steps(
                    *target,
                    self.config.rapid_steps_per_unit,
                    self.config.min_rapid_steps,
                );
                self.interpolate_linear(*target, steps);
            }
            Command::Linear { target, .. } => {
                let steps = self.linear_steps(
                    *target,
                    self.config.feed_steps_per_unit,
                    self.config.min_feed_steps,
                );
                self.interpolate_linear(*target, steps);
            }
            Command::Arc { arc, .. } => {
                // Angle is interpolated linearly from start to end inclusive;
                // z is held at the current cursor z, so the cursor ends at the
                // final arc sample rather than the command's z word.
                let z = self.cursor.position.z;
                let sweep = arc.angular_dist();
                let mut pos = self.cursor.position;
                for k in 0..arc.steps {
                    let t = k as f64 / (arc.steps - 1) as f64;
                    let angle = arc.start_angle + sweep * t;
                    pos = arc.point_at(angle);
                    pos.z = z;
                    self.emit(pos);
                }
                self.cursor.position = pos;
                if let Some(f) = cmd.feedrate() {
                    self.cursor.feedrate = f;
                }
                return;
            }
            Command::ToolChange { radius } => {
                self.renderer.tool_change(*radius);
            }
            Command::FeedUpdate { .. } | Command::Unknown { .. } => {}
        }
        self.cursor.apply(&cmd);
    }

    fn linear_steps(&self, target: DVec3, per_unit: f64, floor: usize) -> usize {
        let distance = self.cursor.position.distance(target);
        ((distance * per_unit) as usize).max(floor)
    }

    fn interpolate_linear(&mut self, target: DVec3, steps: usize) {
        let start = self.cursor.position;
        let delta = target - start;
        for i in 0..steps {
            let t = i as f64 / steps as f64;
            self.emit(start + delta * t);
        }
    }

    fn emit(&mut self, pos: DVec3) {
        self.renderer.pose(pos);
        if let Some(last) = self.last_trail_point {
            if last.distance(pos) > self.config.trail_epsilon {
                self.renderer.trail(last, pos);
            }
        }
        self.last_trail_point = Some(pos);
        if pos.z <= 0.0 {
            self.renderer.remove_material(pos);
        }
    }
}

/// Replays a program into a fresh event log with the default configuration.
pub fn trace_program(gcode: &str) -> Vec<MotionEvent> {
    let mut log = EventLog::new();
    let mut animator = Animator::new(&mut log, Config::default());
    animator.run(gcode);
    log.events
}
