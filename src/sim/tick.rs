//! Puzzle controller
//!
//! Routes pointer events to pieces, runs the snap resolver and reports
//! completion. All transitions finish inside a single call; nothing spans
//! ticks.

use glam::Vec2;

use super::snap::{self, SnapOutcome, SnapPolicy};
use super::state::{PieceId, PuzzleEvent, PuzzleState};
use crate::error::{PuzzleError, Result};
use crate::settings::PuzzleConfig;

/// Pointer input, in the same space as the piece geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
}

/// Receives snap/completion cues (audio, particles, haptics...)
pub trait FeedbackSink {
    fn feedback(&mut self, event: &PuzzleEvent);
}

impl FeedbackSink for () {
    fn feedback(&mut self, _event: &PuzzleEvent) {}
}

impl FeedbackSink for Vec<PuzzleEvent> {
    fn feedback(&mut self, event: &PuzzleEvent) {
        self.push(event.clone());
    }
}

/// Supplies pointer events once per frame
pub trait InputSource {
    fn poll(&mut self, state: &PuzzleState) -> Vec<PointerEvent>;
}

/// Draws pieces from position/state data
pub trait Renderer {
    fn render(&mut self, state: &PuzzleState);
}

/// Owns the puzzle state and is the only thing that mutates it
#[derive(Debug)]
pub struct PuzzleController<F: FeedbackSink = ()> {
    config: Option<PuzzleConfig>,
    state: PuzzleState,
    sink: F,
    /// Puzzle-complete has been announced for this attempt
    completion_announced: bool,
}

impl<F: FeedbackSink> PuzzleController<F> {
    /// Start a new attempt from configuration
    pub fn new(config: PuzzleConfig, sink: F) -> Result<Self> {
        let seed = config.resolve_seed();
        let state = PuzzleState::new(&config, seed)?;
        Ok(Self::build(Some(config), state, sink))
    }

    /// Drive an already-built state (hand-placed pieces)
    pub fn from_state(state: PuzzleState, sink: F) -> Self {
        Self::build(None, state, sink)
    }

    fn build(config: Option<PuzzleConfig>, state: PuzzleState, sink: F) -> Self {
        let mut controller = Self {
            config,
            state,
            sink,
            completion_announced: false,
        };
        controller.check_completion();
        controller
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn config(&self) -> Option<&PuzzleConfig> {
        self.config.as_ref()
    }

    pub fn sink(&self) -> &F {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut F {
        &mut self.sink
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Apply one pointer event
    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(pos) => self.pointer_down(pos),
            PointerEvent::Move(pos) => self.pointer_move(pos),
            PointerEvent::Up(pos) => self.pointer_up(pos),
        }
    }

    fn pointer_down(&mut self, pos: Vec2) {
        if self.state.dragging.is_some() {
            log::trace!("Pointer down ignored: drag in progress");
            return;
        }
        let Some(id) = self.state.hit_test(pos) else {
            log::trace!("Pointer down on empty space at {:?}", pos);
            return;
        };
        let grabbed = self.state.piece_mut(id).is_some_and(|p| p.grab());
        if grabbed {
            self.state.dragging = Some(id);
            self.state.raise(id);
            log::debug!("Piece {} grabbed", id);
            self.emit(PuzzleEvent::PieceGrabbed { id });
        }
    }

    fn pointer_move(&mut self, pos: Vec2) {
        let Some(id) = self.state.dragging else {
            return;
        };
        if let Some(piece) = self.state.piece_mut(id) {
            piece.drag_to(pos);
        }
    }

    fn pointer_up(&mut self, pos: Vec2) {
        let Some(id) = self.state.dragging.take() else {
            return;
        };
        self.state.moves += 1;
        let policy = self.state.policy;
        let outcome = match self.state.piece_mut(id) {
            Some(piece) => {
                piece.drag_to(pos);
                match policy {
                    SnapPolicy::Absolute { threshold } => snap::resolve_absolute(piece, threshold),
                    SnapPolicy::Adjacency(_) => {
                        piece.drop_free();
                        SnapOutcome::Free
                    }
                }
            }
            None => return,
        };
        self.emit(PuzzleEvent::PieceReleased { id });
        match outcome {
            SnapOutcome::Snapped => self.emit(PuzzleEvent::PieceSnapped { id }),
            SnapOutcome::AlreadySnapped => log::trace!("Release of snapped piece {} ignored", id),
            SnapOutcome::Free => {}
        }
        if policy.per_tick() {
            self.resolve_adjacency();
        }
        self.check_completion();
    }

    /// Per-frame update. Runs the adjacency pass when that policy is active.
    pub fn tick(&mut self) {
        self.state.time_ticks += 1;
        if self.state.policy.per_tick() {
            self.resolve_adjacency();
            self.check_completion();
        }
    }

    fn resolve_adjacency(&mut self) {
        let SnapPolicy::Adjacency(thresholds) = self.state.policy else {
            return;
        };
        for snapped in snap::resolve_adjacency(&mut self.state.pieces, thresholds) {
            if self.state.dragging == Some(snapped.id) {
                // Locked mid-drag: the drag is over
                self.state.dragging = None;
                self.state.moves += 1;
            }
            self.emit(PuzzleEvent::PieceSnapped { id: snapped.id });
        }
    }

    /// Poll input, apply it, tick, then hand the state to the renderer
    pub fn frame<I: InputSource, R: Renderer>(&mut self, input: &mut I, renderer: &mut R) {
        for event in input.poll(&self.state) {
            self.handle_event(event);
        }
        self.tick();
        renderer.render(&self.state);
    }

    /// Flip the target-outline overlay; returns the new visibility
    pub fn toggle_hints(&mut self) -> bool {
        self.state.show_hints = !self.state.show_hints;
        let visible = self.state.show_hints;
        self.emit(PuzzleEvent::HintsToggled { visible });
        visible
    }

    /// Throw the current attempt away and lay out a new one
    pub fn restart(&mut self, seed: Option<u64>) -> Result<()> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| PuzzleError::invalid("no configuration to restart from"))?;
        let seed = seed.unwrap_or_else(|| config.resolve_seed());
        let state = PuzzleState::new(config, seed)?;
        let show_hints = self.state.show_hints;
        self.state = state;
        self.state.show_hints = show_hints;
        self.completion_announced = false;
        log::info!("Puzzle restarted with seed {}", seed);
        self.emit(PuzzleEvent::Restarted { seed });
        self.check_completion();
        Ok(())
    }

    fn check_completion(&mut self) {
        if !self.completion_announced && self.state.is_complete() {
            self.completion_announced = true;
            log::info!(
                "Puzzle complete: {} pieces in {} moves",
                self.state.len(),
                self.state.moves
            );
            self.emit(PuzzleEvent::PuzzleComplete);
        }
    }

    fn emit(&mut self, event: PuzzleEvent) {
        self.sink.feedback(&event);
    }
}

/// Scripted input that solves the puzzle: each free piece, top-most first,
/// is grabbed at its center and released on its target (plus `offset`).
#[derive(Debug, Clone, Default)]
pub struct AutoSolver {
    /// Added to every release point
    pub offset: Vec2,
    /// Pieces already handled; each gets a single attempt
    attempted: Vec<PieceId>,
}

impl AutoSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: Vec2) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }
}

impl InputSource for AutoSolver {
    fn poll(&mut self, state: &PuzzleState) -> Vec<PointerEvent> {
        if state.dragging().is_some() {
            return Vec::new();
        }
        let Some(piece) = state
            .pieces_top_down()
            .filter(|p| p.is_interactive())
            .find(|p| !self.attempted.contains(&p.id()))
        else {
            return Vec::new();
        };
        self.attempted.push(piece.id());
        let release = piece.target() + piece.local_offset + self.offset;
        vec![
            PointerEvent::Down(piece.center()),
            PointerEvent::Move(release),
            PointerEvent::Up(release),
        ]
    }
}
