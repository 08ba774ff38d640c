//! Frame driver
//!
//! Owns the simulation and runs one fixed step per display refresh. The
//! platform shell feeds it timestamps and raw pointer coordinates; the driver
//! scales input into canvas space, schedules the deferred life-loss
//! resolution, and guards every deferred callback with a generation counter
//! so nothing fires into a state it was not scheduled for.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::SIM_DT;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, resolve_life_loss, tick};

/// Maps displayed (CSS) coordinates onto the logical canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Logical canvas size
    pub width: f32,
    pub height: f32,
    /// Displayed bounding rect, client coordinates
    pub display_left: f32,
    pub display_top: f32,
    pub display_width: f32,
    pub display_height: f32,
}

impl Viewport {
    /// Viewport displayed at its logical size at the origin
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            display_left: 0.0,
            display_top: 0.0,
            display_width: width,
            display_height: height,
        }
    }

    /// Update from the canvas's bounding client rect
    pub fn set_display_rect(&mut self, left: f32, top: f32, width: f32, height: f32) {
        self.display_left = left;
        self.display_top = top;
        self.display_width = width;
        self.display_height = height;
    }

    /// Logical pixels per displayed pixel, horizontally
    pub fn scale_x(&self) -> Option<f32> {
        (self.display_width > 0.0).then(|| self.width / self.display_width)
    }

    /// Client x to canvas x. `None` while the canvas has no displayed width.
    pub fn to_canvas_x(&self, client_x: f32) -> Option<f32> {
        self.scale_x().map(|scale| (client_x - self.display_left) * scale)
    }
}

/// Deferred life-loss resolution
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingLifeLoss {
    due_ms: f64,
    generation: u64,
}

/// What one frame produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    /// Events in the order they happened this frame
    pub events: Vec<GameEvent>,
    /// A simulation step actually ran
    pub stepped: bool,
}

/// Cooperative per-refresh loop around one `GameState`
pub struct FrameDriver {
    state: GameState,
    viewport: Viewport,
    /// Latest canvas-space pointer x not yet applied
    pointer_x: Option<f32>,
    paused: bool,
    /// Bumped whenever the owning simulation is replaced or torn down
    generation: u64,
    timers: Vec<PendingLifeLoss>,
    running: bool,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl FrameDriver {
    pub fn new(config: GameConfig) -> Self {
        let viewport = Viewport::new(config.canvas_width, config.canvas_height);
        Self {
            state: GameState::new(config),
            viewport,
            pointer_x: None,
            paused: false,
            generation: 0,
            timers: Vec::new(),
            running: true,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Latest snapshot for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Pointer or touch moved, in client coordinates
    pub fn pointer_moved(&mut self, client_x: f32) {
        if let Some(x) = self.viewport.to_canvas_x(client_x) {
            self.pointer_x = Some(x);
        }
    }

    /// Pointer already in canvas space
    pub fn set_pointer_canvas_x(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    /// Flip the user pause. Ignored once the game or level has ended.
    pub fn toggle_pause(&mut self) {
        if self.state.is_terminal() {
            log::debug!("Pause toggle ignored in phase {:?}", self.state.phase);
            return;
        }
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Run one display refresh at wall-clock `now_ms`.
    ///
    /// Due life-loss timers fire first (wall clock, independent of the user
    /// pause), then one fixed step runs. A lost ball schedules its resolution
    /// `life_loss_pause_ms` later.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutput {
        let mut output = FrameOutput::default();
        if !self.running {
            return output;
        }

        self.record_frame_time(now_ms);
        self.fire_due_timers(now_ms, &mut output.events);

        let input = TickInput {
            pointer_x: self.pointer_x.take(),
            paused: self.paused,
        };
        output.stepped = !self.paused && self.state.phase == GamePhase::Running && self.state.ball.is_some();
        let events = tick(&mut self.state, &input, SIM_DT);

        if events.contains(&GameEvent::BallOut) {
            let due_ms = now_ms + self.state.config.life_loss_pause_ms;
            log::debug!("Life loss scheduled for t={:.0}ms (generation {})", due_ms, self.generation);
            self.timers.push(PendingLifeLoss {
                due_ms,
                generation: self.generation,
            });
        }
        output.events.extend(events);
        output
    }

    fn fire_due_timers(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        let (due, pending): (Vec<_>, Vec<_>) = self.timers.drain(..).partition(|t| t.due_ms <= now_ms);
        self.timers = pending;

        for timer in due {
            if timer.generation != self.generation {
                log::debug!(
                    "Dropping stale life-loss timer (generation {}, current {})",
                    timer.generation,
                    self.generation
                );
                continue;
            }
            events.extend(resolve_life_loss(&mut self.state));
        }
    }

    /// Load the next level after a level clear
    pub fn next_level(&mut self) {
        if self.state.phase != GamePhase::LevelCleared {
            log::warn!("next_level called in phase {:?}", self.state.phase);
            return;
        }
        let next = self.state.level.saturating_add(1);
        self.invalidate_timers();
        self.state.load_level(next);
    }

    /// Replace the simulation with a fresh level-1 game
    pub fn restart(&mut self) {
        log::info!("Restarting (final score {})", self.state.score);
        self.invalidate_timers();
        self.state = GameState::new(self.state.config.clone());
        self.pointer_x = None;
        self.paused = false;
        self.running = true;
    }

    /// Stop the loop. Pending timers are cancelled and later frames do
    /// nothing until `restart`.
    pub fn teardown(&mut self) {
        log::info!("Frame driver torn down");
        self.invalidate_timers();
        self.timers.clear();
        self.running = false;
    }

    /// Timers scheduled before this point become stale
    fn invalidate_timers(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A life-loss resolution for the current simulation is scheduled
    pub fn has_pending_life_loss(&self) -> bool {
        self.timers.iter().any(|t| t.generation == self.generation)
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    fn record_frame_time(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % 60;

        // Oldest sample sits at the next write slot; 60 samples span 59 frames
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = now_ms - oldest_time;
            if elapsed > 0.0 {
                self.fps = (59_000.0 / elapsed).round() as u32;
            }
        }
    }
}
