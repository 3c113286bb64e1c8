//! Engine module - the sprint state machine
//!
//! [`GameEngine`] owns the grid, the bag, the active piece and every timer. Callers feed
//! it input edges with [`GameEngine::apply`] and advance it with [`GameEngine::tick`];
//! nothing inside reads a clock.
//!
//! One tick while a piece is falling runs, in order:
//!
//! | Step       | Effect                                                          |
//! |------------|-----------------------------------------------------------------|
//! | Hold       | swap with the hold slot (once per drop cycle)                   |
//! | Rotation   | clockwise request first, then counter-clockwise                 |
//! | Horizontal | press and release edges in arrival order, then DAS/ARR          |
//! | Vertical   | hard drop, or gravity with the normal or soft-drop interval     |
//! | Lock       | place, clear rows, count down, spawn or finish                  |
//! | Timer      | add the tick's milliseconds to the sprint clock while it runs   |
//!
//! Auto-shift counts ticks, not milliseconds: a direction held for
//! `delayed_auto_shift` ticks starts repeating every `auto_repeat_rate` ticks.

use arrayvec::ArrayVec;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::EngineError;
use crate::events::GameEvent;
use crate::grid::Grid;
use crate::kick;
use crate::pieces::ActivePiece;
use crate::rng::RandomBag;
use crate::snapshot::{ActiveSnapshot, GameSnapshot, HoldSnapshot};
use crate::types::{Command, Direction, Phase, PieceKind};

/// Seed used when the config leaves it unset.
pub const DEFAULT_SEED: u32 = 1;

/// Horizontal edges buffered between ticks.
const MAX_PENDING_SHIFTS: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
struct HoldSlot {
    piece: Option<PieceKind>,
    /// Set by a hold, cleared by the next lock
    used: bool,
}

/// Input edges collected since the last tick.
#[derive(Debug, Clone, Default)]
struct PendingInput {
    hold: bool,
    rotate_right: bool,
    rotate_left: bool,
    hard_drop: bool,
    /// Move press/release edges in arrival order
    shifts: ArrayVec<Command, MAX_PENDING_SHIFTS>,
}

impl PendingInput {
    fn is_empty(&self) -> bool {
        !self.hold
            && !self.rotate_right
            && !self.rotate_left
            && !self.hard_drop
            && self.shifts.is_empty()
    }
}

/// Delayed auto-shift and auto-repeat state.
///
/// `das` counts ticks since the last press; `arr` counts ticks since the last repeat.
/// `None` means the timer is not running.
#[derive(Debug, Clone, Copy, Default)]
struct AutoShift {
    left_held: bool,
    right_held: bool,
    das: Option<u32>,
    arr: Option<u32>,
}

impl AutoShift {
    fn press(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                self.left_held = true;
                self.right_held = false;
            }
            Direction::Right => {
                self.right_held = true;
                self.left_held = false;
            }
            Direction::Up | Direction::Down => return,
        }
        self.das = Some(0);
        self.arr = None;
    }

    /// Releasing one side while the other is still down keeps the current charge.
    fn release(&mut self, direction: Direction) {
        match direction {
            Direction::Left if !self.right_held => self.left_held = false,
            Direction::Right if !self.left_held => self.right_held = false,
            _ => return,
        }
        self.das = None;
        self.arr = None;
    }

    fn held(&self) -> Option<Direction> {
        if self.left_held {
            Some(Direction::Left)
        } else if self.right_held {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// Advance one tick; returns the direction of an auto-repeat move if one is due.
    fn step(&mut self, das_ticks: u32, arr_ticks: u32) -> Option<Direction> {
        if let Some(das) = self.das {
            let das = das + 1;
            if das >= das_ticks {
                self.das = None;
                self.arr = Some(0);
            } else {
                self.das = Some(das);
            }
        }

        let arr = self.arr? + 1;
        if arr >= arr_ticks {
            self.arr = Some(0);
            self.held()
        } else {
            self.arr = Some(arr);
            None
        }
    }
}

/// Sprint simulation.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    bag: RandomBag,
    active: Option<ActivePiece>,
    next: Option<PieceKind>,
    hold: HoldSlot,
    ghost_y: Option<i8>,
    phase: Phase,
    won: bool,
    lines_remaining: u32,
    elapsed_ms: u64,
    timer_running: bool,
    fall_timer_ms: i64,
    /// Latest soft-drop level reported by the input layer
    soft_drop_input: bool,
    /// Soft-drop level as of the last vertical step
    soft_drop_held: bool,
    auto_shift: AutoShift,
    pending: PendingInput,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// Build an engine in the `Ready` phase. Nothing spawns until [`start`](Self::start).
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = Grid::new(config.grid_width, config.grid_height)?;
        let bag = RandomBag::new(config.seed.unwrap_or(DEFAULT_SEED));

        Ok(Self {
            lines_remaining: config.sprint_lines,
            config,
            grid,
            bag,
            active: None,
            next: None,
            hold: HoldSlot::default(),
            ghost_y: None,
            phase: Phase::Ready,
            won: false,
            elapsed_ms: 0,
            timer_running: false,
            fall_timer_ms: 0,
            soft_drop_input: false,
            soft_drop_held: false,
            auto_shift: AutoShift::default(),
            pending: PendingInput::default(),
            events: Vec::new(),
        })
    }

    /// Spawn the first piece and start the sprint clock.
    ///
    /// Returns false if the engine is not in the `Ready` phase.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }

        let first = self.bag.take();
        self.next = Some(self.bag.take());
        self.timer_running = true;
        info!(
            lines = self.config.sprint_lines,
            width = self.grid.width(),
            height = self.grid.height(),
            "sprint started"
        );
        self.spawn(first);
        true
    }

    /// Replace the configuration and start a fresh sprint with it.
    pub fn start_game(&mut self, config: GameConfig) -> Result<(), EngineError> {
        *self = Self::new(config)?;
        self.start();
        Ok(())
    }

    /// Discard the current sprint and return to `Ready` with the same configuration.
    ///
    /// The bag keeps its sequence, so a restart does not replay the previous pieces.
    pub fn restart(&mut self) {
        self.grid.clear();
        self.active = None;
        self.next = None;
        self.hold = HoldSlot::default();
        self.ghost_y = None;
        self.phase = Phase::Ready;
        self.won = false;
        self.lines_remaining = self.config.sprint_lines;
        self.elapsed_ms = 0;
        self.timer_running = false;
        self.fall_timer_ms = 0;
        self.soft_drop_input = false;
        self.soft_drop_held = false;
        self.auto_shift = AutoShift::default();
        self.pending = PendingInput::default();
        self.events.clear();
        debug!(seed = self.bag.seed(), "sprint reset");
    }

    /// Queue an input edge for the next tick.
    ///
    /// Pause and resume take effect immediately. Commands after the game ended are
    /// dropped.
    pub fn apply(&mut self, command: Command) {
        if self.phase == Phase::GameOver {
            warn!(command = command.as_str(), "command ignored after game over");
            return;
        }

        match command {
            Command::MoveLeftDown
            | Command::MoveLeftUp
            | Command::MoveRightDown
            | Command::MoveRightUp => {
                if self.pending.shifts.try_push(command).is_err() {
                    warn!(command = command.as_str(), "input queue full, edge dropped");
                }
            }
            Command::RotateLeft => self.pending.rotate_left = true,
            Command::RotateRight => self.pending.rotate_right = true,
            Command::SoftDrop(held) => self.soft_drop_input = held,
            Command::HardDrop => self.pending.hard_drop = true,
            Command::Hold => self.pending.hold = true,
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
        }
    }

    /// Apply every command, then advance one tick.
    pub fn tick_with<I>(&mut self, elapsed_ms: u32, commands: I) -> bool
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.apply(command);
        }
        self.tick(elapsed_ms)
    }

    /// Advance the simulation by one tick of `elapsed_ms` milliseconds.
    ///
    /// Returns true if a piece locked during this tick.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.phase != Phase::Falling {
            if !self.pending.is_empty() {
                debug!(phase = self.phase.as_str(), "discarding input outside of play");
                self.pending = PendingInput::default();
            }
            return false;
        }

        let input = std::mem::take(&mut self.pending);
        let mut locked = false;

        if input.hold {
            self.hold_active();
        }

        if self.phase == Phase::Falling {
            if input.rotate_right {
                self.rotate(true);
            }
            if input.rotate_left {
                self.rotate(false);
            }

            self.update_horizontal(&input.shifts);
            locked = self.update_vertical(input.hard_drop, elapsed_ms);
        }

        if self.timer_running {
            self.elapsed_ms += elapsed_ms as u64;
        }

        locked
    }

    /// Hand out the events produced since the last drain, oldest first.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    // ---- queries ----

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    /// Row the active piece would land on; `None` when the ghost is disabled or no
    /// piece is falling.
    pub fn ghost_row(&self) -> Option<i8> {
        if !self.config.use_ghost_piece {
            return None;
        }
        self.ghost_y
    }

    pub fn hold(&self) -> HoldSnapshot {
        HoldSnapshot {
            piece: self.hold.piece,
            available: !self.hold.used,
        }
    }

    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn lines_remaining(&self) -> u32 {
        self.lines_remaining
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Meaningful once the phase is `GameOver`.
    pub fn won(&self) -> bool {
        self.won
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            board: self.grid.cells().to_vec(),
            active: self.active.map(ActiveSnapshot::from),
            active_cells: self
                .active
                .map(|piece| piece.cells().collect())
                .unwrap_or_default(),
            ghost_row: self.ghost_row(),
            hold: self.hold(),
            next: self.next,
            lines_remaining: self.lines_remaining,
            elapsed_ms: self.elapsed_ms,
            phase: self.phase,
            won: self.won,
        }
    }

    // ---- lifecycle ----

    fn pause(&mut self) {
        if self.phase != Phase::Falling {
            return;
        }
        self.phase = Phase::Paused;
        self.timer_running = false;
        debug!(elapsed_ms = self.elapsed_ms, "paused");
    }

    /// Held keys may have been released while paused, so movement starts from rest.
    fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.phase = Phase::Falling;
        self.timer_running = true;
        self.auto_shift = AutoShift::default();
        self.pending = PendingInput::default();
        self.soft_drop_input = false;
        self.soft_drop_held = false;
        debug!(elapsed_ms = self.elapsed_ms, "resumed");
    }

    fn fall_interval_ms(&self) -> u32 {
        if self.soft_drop_held {
            self.config.speed_drop_time_ms
        } else {
            self.config.drop_time_ms
        }
    }

    /// Queued next piece, replaced by a fresh draw from the bag.
    fn take_next(&mut self) -> PieceKind {
        let upcoming = self.bag.take();
        self.next.replace(upcoming).unwrap_or(upcoming)
    }

    /// Place a new piece at its spawn anchor. A blocked spawn ends the sprint as a loss.
    fn spawn(&mut self, kind: PieceKind) -> bool {
        self.phase = Phase::Spawning;
        let piece = ActivePiece::spawn(kind, self.grid.height());

        if !kick::fits(&piece, &self.grid) {
            self.active = None;
            self.ghost_y = None;
            info!(kind = kind.as_str(), "spawn blocked, topped out");
            self.finish(false);
            return false;
        }

        self.active = Some(piece);
        self.phase = Phase::Falling;
        self.fall_timer_ms = self.fall_interval_ms() as i64;
        self.refresh_ghost();
        debug!(kind = kind.as_str(), x = piece.x, y = piece.y, "spawned");
        self.events.push(GameEvent::PieceSpawned {
            kind,
            x: piece.x,
            y: piece.y,
        });
        true
    }

    fn finish(&mut self, won: bool) {
        self.phase = Phase::GameOver;
        self.won = won;
        self.timer_running = false;
        self.pending = PendingInput::default();
        info!(won, elapsed_ms = self.elapsed_ms, "sprint over");
        self.events.push(GameEvent::GameOver {
            won,
            elapsed_ms: self.elapsed_ms,
        });
    }

    fn refresh_ghost(&mut self) {
        self.ghost_y = match self.active {
            Some(piece) if self.config.use_ghost_piece => {
                Some(kick::landing_row(&piece, &self.grid))
            }
            _ => None,
        };
    }

    // ---- tick steps ----

    fn hold_active(&mut self) -> bool {
        if self.hold.used {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        self.hold.used = true;
        debug!(held = active.kind.as_str(), "hold");
        self.events.push(GameEvent::HoldUsed { held: active.kind });

        match self.hold.piece.replace(active.kind) {
            Some(swapped) => self.spawn(swapped),
            None => {
                let kind = self.take_next();
                self.spawn(kind)
            }
        };
        true
    }

    fn rotate(&mut self, clockwise: bool) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let Some(rotated) = kick::try_rotate(&piece, &self.grid, clockwise) else {
            return false;
        };

        self.active = Some(rotated);
        self.refresh_ghost();
        self.events.push(GameEvent::PieceRotated {
            rotation: rotated.rotation,
            x: rotated.x,
            y: rotated.y,
        });
        true
    }

    fn shift(&mut self, direction: Direction) -> bool {
        let Some(mut piece) = self.active else {
            return false;
        };
        if !kick::try_shift(&mut piece, &self.grid, direction) {
            return false;
        }

        self.active = Some(piece);
        self.refresh_ghost();
        self.events.push(GameEvent::PieceMoved {
            x: piece.x,
            y: piece.y,
        });
        true
    }

    fn update_horizontal(&mut self, edges: &[Command]) {
        for &edge in edges {
            match edge {
                Command::MoveRightDown => {
                    self.auto_shift.press(Direction::Right);
                    self.shift(Direction::Right);
                }
                Command::MoveLeftDown => {
                    self.auto_shift.press(Direction::Left);
                    self.shift(Direction::Left);
                }
                Command::MoveLeftUp => self.auto_shift.release(Direction::Left),
                Command::MoveRightUp => self.auto_shift.release(Direction::Right),
                _ => {}
            }
        }

        let repeat = self
            .auto_shift
            .step(self.config.delayed_auto_shift, self.config.auto_repeat_rate);
        if let Some(direction) = repeat {
            self.shift(direction);
        }
    }

    /// Gravity, soft drop and hard drop. Returns true if the piece locked.
    fn update_vertical(&mut self, hard_drop: bool, elapsed_ms: u32) -> bool {
        let fresh_soft_drop = self.soft_drop_input && !self.soft_drop_held;
        self.soft_drop_held = self.soft_drop_input;

        if hard_drop {
            self.hard_drop();
            return true;
        }

        let interval = self.fall_interval_ms() as i64;
        if fresh_soft_drop {
            self.fall_timer_ms = interval;
        }

        self.fall_timer_ms -= elapsed_ms as i64;
        if self.fall_timer_ms > 0 {
            return false;
        }

        self.fall_timer_ms = interval;
        if self.step_down() {
            return false;
        }
        self.lock();
        true
    }

    fn step_down(&mut self) -> bool {
        let Some(mut piece) = self.active else {
            return false;
        };
        if !kick::try_drop(&mut piece, &self.grid) {
            return false;
        }

        self.active = Some(piece);
        self.events.push(GameEvent::PieceMoved {
            x: piece.x,
            y: piece.y,
        });
        true
    }

    fn hard_drop(&mut self) {
        let Some(mut piece) = self.active else {
            return;
        };
        piece.y = self
            .ghost_y
            .unwrap_or_else(|| kick::landing_row(&piece, &self.grid));
        self.active = Some(piece);
        self.lock();
    }

    fn lock(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.ghost_y = None;

        if !self.grid.holds(&piece) {
            info!(
                kind = piece.kind.as_str(),
                x = piece.x,
                y = piece.y,
                "locked above the top, topped out"
            );
            self.finish(false);
            return;
        }

        self.grid.place(&piece);
        self.hold.used = false;
        debug!(kind = piece.kind.as_str(), x = piece.x, y = piece.y, "locked");
        self.events.push(GameEvent::PieceLocked {
            kind: piece.kind,
            x: piece.x,
            y: piece.y,
        });

        let rows = self.grid.clear_full_rows(piece.cells().map(|(_, y)| y));
        if !rows.is_empty() {
            self.lines_remaining = self.lines_remaining.saturating_sub(rows.len() as u32);
            debug!(
                cleared = rows.len(),
                lines_remaining = self.lines_remaining,
                "lines cleared"
            );
            self.events.push(GameEvent::LinesCleared {
                rows,
                lines_remaining: self.lines_remaining,
            });

            if self.lines_remaining == 0 {
                self.finish(true);
                return;
            }
        }

        let kind = self.take_next();
        self.spawn(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Rotation, TICK_MS};

    /// Gravity slow enough that a few hundred ticks never move the piece.
    fn still_config() -> GameConfig {
        GameConfig::default()
            .with_seed(7)
            .with_drop_times(60_000, 60_000)
    }

    fn started(config: GameConfig) -> GameEngine {
        let mut engine = GameEngine::new(config).unwrap();
        assert!(engine.start());
        engine.drain_events().for_each(drop);
        engine
    }

    fn put_active(engine: &mut GameEngine, kind: PieceKind, x: i8, y: i8) {
        let mut piece = ActivePiece::spawn(kind, engine.grid.height());
        piece.x = x;
        piece.y = y;
        engine.active = Some(piece);
        engine.refresh_ghost();
    }

    #[test]
    fn test_new_engine_is_ready() {
        let engine = GameEngine::new(GameConfig::default()).unwrap();
        assert_eq!(engine.phase(), Phase::Ready);
        assert!(engine.active().is_none());
        assert!(engine.next_piece().is_none());
        assert_eq!(engine.lines_remaining(), 40);
        assert_eq!(engine.elapsed_ms(), 0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = GameEngine::new(GameConfig::default().with_sprint_lines(0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { field: "sprint_lines", .. }));
    }

    #[test]
    fn test_start_spawns_and_queues_next() {
        let mut engine = GameEngine::new(GameConfig::default()).unwrap();
        assert!(engine.start());
        assert!(!engine.start());

        assert_eq!(engine.phase(), Phase::Falling);
        let active = engine.active().unwrap();
        assert!(engine.next_piece().is_some());
        assert_eq!(active.rotation, Rotation::North);

        let events: Vec<_> = engine.drain_events().collect();
        assert!(matches!(events[0], GameEvent::PieceSpawned { kind, .. } if kind == active.kind));
    }

    #[test]
    fn test_gravity_moves_one_row_per_interval() {
        let mut engine = started(GameConfig::default());
        let y = engine.active().unwrap().y;

        assert!(!engine.tick(999));
        assert_eq!(engine.active().unwrap().y, y);
        assert!(!engine.tick(1));
        assert_eq!(engine.active().unwrap().y, y - 1);
        assert_eq!(engine.elapsed_ms(), 1000);
    }

    #[test]
    fn test_soft_drop_press_uses_speed_interval_immediately() {
        let mut engine = started(GameConfig::default());
        let y = engine.active().unwrap().y;

        engine.apply(Command::SoftDrop(true));
        engine.tick(100);
        assert_eq!(engine.active().unwrap().y, y - 1);
        engine.tick(100);
        assert_eq!(engine.active().unwrap().y, y - 2);

        // Releasing lets the pending short interval run out, then gravity is normal.
        engine.apply(Command::SoftDrop(false));
        engine.tick(100);
        assert_eq!(engine.active().unwrap().y, y - 3);
        engine.tick(100);
        assert_eq!(engine.active().unwrap().y, y - 3);
    }

    #[test]
    fn test_hard_drop_locks_at_ghost_row() {
        let mut engine = started(still_config());
        put_active(&mut engine, PieceKind::O, 4, 15);
        assert_eq!(engine.ghost_row(), Some(0));

        engine.apply(Command::HardDrop);
        assert!(engine.tick(TICK_MS));

        assert!(engine.grid().is_occupied(4, 0));
        assert!(engine.grid().is_occupied(5, 1));
        let events: Vec<_> = engine.drain_events().collect();
        assert_eq!(
            events[0],
            GameEvent::PieceLocked { kind: PieceKind::O, x: 4, y: 0 }
        );
        assert!(matches!(events[1], GameEvent::PieceSpawned { .. }));
    }

    #[test]
    fn test_blocked_gravity_locks_piece() {
        let mut engine = started(GameConfig::default());
        put_active(&mut engine, PieceKind::O, 0, 0);

        assert!(engine.tick(1000));
        assert!(engine.grid().is_occupied(0, 0));
        assert!(engine.grid().is_occupied(1, 1));
    }

    #[test]
    fn test_single_line_sprint_is_won() {
        let mut engine = started(still_config().with_sprint_lines(1));
        for x in 4..10 {
            engine.grid.set(x, 0, Some(PieceKind::J));
        }
        put_active(&mut engine, PieceKind::I, 0, 10);

        engine.apply(Command::HardDrop);
        assert!(engine.tick(TICK_MS));

        assert_eq!(engine.phase(), Phase::GameOver);
        assert!(engine.won());
        assert_eq!(engine.lines_remaining(), 0);
        assert!(engine.active().is_none());
        assert!(engine.grid().cells().iter().all(|c| c.is_none()));

        let events: Vec<_> = engine.drain_events().collect();
        assert!(matches!(events[0], GameEvent::PieceLocked { kind: PieceKind::I, .. }));
        match &events[1] {
            GameEvent::LinesCleared { rows, lines_remaining } => {
                assert_eq!(rows.as_slice(), &[0]);
                assert_eq!(*lines_remaining, 0);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(matches!(events[2], GameEvent::GameOver { won: true, .. }));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_clock_stops_when_sprint_ends() {
        let mut engine = started(still_config().with_sprint_lines(1));
        engine.tick(500);
        for x in 4..10 {
            engine.grid.set(x, 0, Some(PieceKind::J));
        }
        put_active(&mut engine, PieceKind::I, 0, 10);

        engine.apply(Command::HardDrop);
        engine.tick(TICK_MS);
        let final_time = engine.elapsed_ms();
        assert_eq!(final_time, 500);

        engine.tick(1000);
        assert_eq!(engine.elapsed_ms(), final_time);
    }

    #[test]
    fn test_blocked_spawn_tops_out() {
        let mut engine = started(still_config());
        for x in 0..10 {
            for y in 18..22 {
                if x != 0 {
                    engine.grid.set(x, y, Some(PieceKind::Z));
                }
            }
        }
        put_active(&mut engine, PieceKind::I, 0, 0);

        engine.apply(Command::HardDrop);
        engine.tick(TICK_MS);

        assert_eq!(engine.phase(), Phase::GameOver);
        assert!(!engine.won());
        assert!(engine.active().is_none());
        let last = engine.drain_events().last().unwrap();
        assert!(matches!(last, GameEvent::GameOver { won: false, .. }));
    }

    #[test]
    fn test_lock_above_top_tops_out_without_losing_blocks() {
        let mut engine = started(still_config());
        for y in 0..19 {
            engine.grid.set(9, y, Some(PieceKind::Z));
        }
        let piece = ActivePiece::spawn(PieceKind::I, engine.grid.height());
        put_active(&mut engine, PieceKind::I, piece.x, piece.y);

        engine.tick_with(TICK_MS, [Command::RotateRight]);
        for _ in 0..6 {
            engine.tick_with(TICK_MS, [Command::MoveRightDown, Command::MoveRightUp]);
        }
        let active = engine.active().unwrap();
        assert!(active.cells().all(|(x, _)| x == 9));
        assert!(active.cells().any(|(_, y)| y >= 22));
        engine.drain_events().for_each(drop);

        assert!(engine.tick(60_000));

        assert_eq!(engine.phase(), Phase::GameOver);
        assert!(!engine.won());
        assert!(engine.active().is_none());
        assert_eq!(engine.grid().cells().iter().filter(|c| c.is_some()).count(), 19);
        let events: Vec<_> = engine.drain_events().collect();
        assert!(matches!(events.as_slice(), [GameEvent::GameOver { won: false, .. }]));
    }

    #[test]
    fn test_commands_after_game_over_are_ignored() {
        let mut engine = started(still_config());
        engine.finish(false);
        let snapshot = engine.snapshot();

        engine.apply(Command::MoveLeftDown);
        engine.apply(Command::HardDrop);
        engine.apply(Command::Resume);
        engine.tick(TICK_MS);

        assert_eq!(engine.snapshot(), snapshot);
    }

    #[test]
    fn test_hold_moves_active_into_slot() {
        let mut engine = started(still_config());
        let first = engine.active().unwrap().kind;
        let next = engine.next_piece().unwrap();

        engine.apply(Command::Hold);
        engine.tick(TICK_MS);

        assert_eq!(engine.hold().piece, Some(first));
        assert!(!engine.hold().available);
        assert_eq!(engine.active().unwrap().kind, next);
    }

    #[test]
    fn test_second_hold_in_same_cycle_is_ignored() {
        let mut engine = started(still_config());
        engine.apply(Command::Hold);
        engine.tick(TICK_MS);
        let held = engine.hold();
        let active = engine.active();
        engine.drain_events().for_each(drop);

        engine.apply(Command::Hold);
        engine.tick(TICK_MS);

        assert_eq!(engine.hold(), held);
        assert_eq!(engine.active(), active);
        assert_eq!(engine.drain_events().count(), 0);
    }

    #[test]
    fn test_lock_makes_hold_available_again() {
        let mut engine = started(still_config());
        let first = engine.active().unwrap().kind;
        engine.apply(Command::Hold);
        engine.tick(TICK_MS);

        engine.apply(Command::HardDrop);
        engine.tick(TICK_MS);
        assert!(engine.hold().available);

        let current = engine.active().unwrap().kind;
        engine.apply(Command::Hold);
        engine.tick(TICK_MS);
        assert_eq!(engine.hold().piece, Some(current));
        assert_eq!(engine.active().unwrap().kind, first);
    }

    #[test]
    fn test_spawning_phase_never_outlives_a_call() {
        let mut engine = GameEngine::new(still_config()).unwrap();
        engine.start();
        assert_eq!(engine.phase(), Phase::Falling);

        for command in [Command::Hold, Command::HardDrop, Command::Hold] {
            engine.tick_with(TICK_MS, [command]);
            assert_eq!(engine.phase(), Phase::Falling);
        }
    }

    #[test]
    fn test_held_piece_respawns_in_spawn_state() {
        let mut engine = started(still_config());
        let first = engine.active().unwrap().kind;
        engine.apply(Command::RotateRight);
        engine.tick(TICK_MS);
        engine.apply(Command::Hold);
        engine.tick(TICK_MS);
        engine.apply(Command::HardDrop);
        engine.tick(TICK_MS);

        engine.apply(Command::Hold);
        engine.tick(TICK_MS);
        let active = engine.active().unwrap();
        assert_eq!(active.kind, first);
        assert_eq!(active.rotation, Rotation::North);
        let spawn = ActivePiece::spawn(first, engine.grid().height());
        assert_eq!((active.x, active.y), (spawn.x, spawn.y));
    }

    #[test]
    fn test_das_then_arr_repeat() {
        let mut engine = started(still_config());
        let x = engine.active().unwrap().x;

        engine.apply(Command::MoveLeftDown);
        // Initial move, DAS completes after 12 ticks, then one repeat every 4 ticks.
        for _ in 0..20 {
            engine.tick(TICK_MS);
        }
        assert_eq!(engine.active().unwrap().x, x - 3);

        engine.apply(Command::MoveLeftUp);
        for _ in 0..20 {
            engine.tick(TICK_MS);
        }
        assert_eq!(engine.active().unwrap().x, x - 3);
    }

    #[test]
    fn test_tap_moves_exactly_once() {
        let mut engine = started(still_config());
        let x = engine.active().unwrap().x;

        engine.apply(Command::MoveRightDown);
        engine.apply(Command::MoveRightUp);
        for _ in 0..30 {
            engine.tick(TICK_MS);
        }
        assert_eq!(engine.active().unwrap().x, x + 1);
    }

    #[test]
    fn test_releasing_left_while_right_held_keeps_charge() {
        let mut shift = AutoShift::default();
        shift.press(Direction::Left);
        shift.press(Direction::Right);
        assert_eq!(shift.held(), Some(Direction::Right));

        shift.release(Direction::Left);
        assert_eq!(shift.held(), Some(Direction::Right));
        assert_eq!(shift.das, Some(0));

        shift.release(Direction::Right);
        assert_eq!(shift.held(), None);
        assert_eq!(shift.das, None);
    }

    #[test]
    fn test_rejected_rotation_leaves_piece_unchanged() {
        let mut engine = started(still_config());
        for y in 0..6 {
            for x in 0..10 {
                if x != 5 {
                    engine.grid.set(x, y, Some(PieceKind::J));
                }
            }
        }
        let vertical = ActivePiece::spawn(PieceKind::I, 22).rotated(true);
        engine.active = Some(ActivePiece { x: 3, y: 0, ..vertical });
        engine.refresh_ghost();
        let before = engine.active();

        engine.apply(Command::RotateRight);
        engine.apply(Command::RotateLeft);
        engine.tick(TICK_MS);

        assert_eq!(engine.active(), before);
        assert!(engine
            .drain_events()
            .all(|e| !matches!(e, GameEvent::PieceRotated { .. })));
    }

    #[test]
    fn test_rotation_updates_ghost() {
        let mut engine = started(still_config());
        put_active(&mut engine, PieceKind::I, 3, 10);
        assert_eq!(engine.ghost_row(), Some(-2));

        engine.apply(Command::RotateRight);
        engine.tick(TICK_MS);
        assert_eq!(engine.active().unwrap().rotation, Rotation::East);
        assert_eq!(engine.ghost_row(), Some(0));
    }

    #[test]
    fn test_disabled_ghost_still_hard_drops() {
        let mut engine = started(still_config().with_ghost_piece(false));
        assert_eq!(engine.ghost_row(), None);
        put_active(&mut engine, PieceKind::O, 4, 15);

        engine.apply(Command::HardDrop);
        engine.tick(TICK_MS);
        assert!(engine.grid().is_occupied(4, 0));
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut engine = started(GameConfig::default());
        engine.tick(100);
        let before = engine.active();

        engine.apply(Command::Pause);
        assert_eq!(engine.phase(), Phase::Paused);
        engine.apply(Command::MoveLeftDown);
        for _ in 0..10 {
            engine.tick(1000);
        }
        assert_eq!(engine.active(), before);
        assert_eq!(engine.elapsed_ms(), 100);

        engine.apply(Command::Resume);
        assert_eq!(engine.phase(), Phase::Falling);
        engine.tick(TICK_MS);
        assert_eq!(engine.active().unwrap().x, before.unwrap().x);
        assert_eq!(engine.elapsed_ms(), 100 + TICK_MS as u64);
    }

    #[test]
    fn test_restart_returns_to_ready() {
        let mut engine = started(still_config());
        engine.apply(Command::HardDrop);
        engine.tick(TICK_MS);
        assert!(engine.grid().cells().iter().any(|c| c.is_some()));

        engine.restart();
        assert_eq!(engine.phase(), Phase::Ready);
        assert!(engine.grid().cells().iter().all(|c| c.is_none()));
        assert_eq!(engine.hold(), HoldSnapshot { piece: None, available: true });
        assert_eq!(engine.elapsed_ms(), 0);
        assert!(engine.start());
    }

    #[test]
    fn test_start_game_replaces_config() {
        let mut engine = started(GameConfig::default());
        engine
            .start_game(GameConfig::default().with_sprint_lines(5).with_grid(12, 24))
            .unwrap();
        assert_eq!(engine.phase(), Phase::Falling);
        assert_eq!(engine.lines_remaining(), 5);
        assert_eq!(engine.grid().width(), 12);

        assert!(engine.start_game(GameConfig::default().with_grid(3, 22)).is_err());
    }

    #[test]
    fn test_snapshot_matches_queries() {
        let engine = started(still_config());
        let snapshot = engine.snapshot();
        let active = engine.active().unwrap();

        assert_eq!(snapshot.phase, Phase::Falling);
        assert_eq!(snapshot.active.unwrap().kind, active.kind);
        assert_eq!(snapshot.active_cells.len(), 4);
        assert_eq!(snapshot.ghost_row, engine.ghost_row());
        assert_eq!(snapshot.next, engine.next_piece());
        assert_eq!(snapshot.board.len(), 220);
        assert!(snapshot.playable());
    }
}
