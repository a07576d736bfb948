//! Scripted input timeline for the headless driver
//!
//! Stands in for the window's event stream: each event fires once, at the
//! start of its frame, before the simulation step.

use serde::{Deserialize, Serialize};
use softbody_simulation::SimulationConfig;

/// Top-level file loaded with `--config`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub frames: u64,
    /// Log a stats line every this many frames (0 disables)
    pub log_every: u64,
    pub simulation: SimulationConfig,
    /// Empty means "use the built-in demo timeline"
    pub script: Vec<ScriptEvent>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            log_every: 60,
            simulation: SimulationConfig::default(),
            script: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvent {
    pub frame: u64,
    #[serde(flatten)]
    pub action: Action,
}

impl ScriptEvent {
    pub fn new(frame: u64, action: Action) -> Self {
        Self { frame, action }
    }
}

/// One input the driver feeds to the simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    PointerDown { x: f32, y: f32 },
    PointerDrag { x: f32, y: f32 },
    /// Drag relative to the last pointer position
    DragBy { dx: f32, dy: f32 },
    PointerUp,
    /// Press the pointer exactly on a particle's current position
    Grab { index: usize },
    Impulse,
    Scatter,
    Configure {
        k: f32,
        mass: f32,
        rest_length: f32,
        gravity: f32,
        damping: f32,
    },
    Resize { particle_count: usize },
}

/// Events ordered by frame with a cursor over the ones already fired
#[derive(Clone, Debug, Default)]
pub struct Script {
    events: Vec<ScriptEvent>,
    cursor: usize,
}

impl Script {
    pub fn new(mut events: Vec<ScriptEvent>) -> Self {
        // Stable sort keeps file order for events on the same frame
        events.sort_by_key(|e| e.frame);
        Self { events, cursor: 0 }
    }

    /// Events scheduled at or before `frame` that have not fired yet
    pub fn advance(&mut self, frame: u64) -> &[ScriptEvent] {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].frame <= frame {
            self.cursor += 1;
        }
        &self.events[start..self.cursor]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Demo timeline: kick, drag a particle, pan the body, scatter, retune, resize
pub fn demo_script() -> Vec<ScriptEvent> {
    let mut events = vec![
        ScriptEvent::new(30, Action::Impulse),
        ScriptEvent::new(120, Action::Grab { index: 0 }),
    ];
    for frame in (125..=175).step_by(5) {
        events.push(ScriptEvent::new(frame, Action::DragBy { dx: 4.0, dy: 2.0 }));
    }
    events.push(ScriptEvent::new(180, Action::PointerUp));

    events.push(ScriptEvent::new(
        240,
        Action::PointerDown {
            x: -10_000.0,
            y: -10_000.0,
        },
    ));
    for frame in (245..=295).step_by(5) {
        events.push(ScriptEvent::new(frame, Action::DragBy { dx: 3.0, dy: 0.0 }));
    }
    events.push(ScriptEvent::new(300, Action::PointerUp));

    events.push(ScriptEvent::new(360, Action::Scatter));
    events.push(ScriptEvent::new(
        420,
        Action::Configure {
            k: 6.0,
            mass: 0.5,
            rest_length: 60.0,
            gravity: 0.0,
            damping: 2.0,
        },
    ));
    events.push(ScriptEvent::new(480, Action::Resize { particle_count: 40 }));
    events
}
