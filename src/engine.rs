//! Turn orchestration.
//!
//! The engine owns the board state and advances it one state-machine step per
//! host tick: a short delay, passive captures for the side about to move,
//! move acquisition (from the planner or from `submit_move`), the move
//! itself, active captures, and the hand-off to the next side. Every effect
//! shown by the presenter is waited for at the action barrier before the
//! machine moves on.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::action::{ActionBarrier, ActionTicket, BarrierStatus, NullPresenter, Presenter};
use crate::board::setup::{next_round, standard_game};
use crate::board::{BoardState, Coord, PieceId, SideId, Species};
use crate::config::GameConfig;
use crate::error::{CampaignError, ConfigError, MoveError};
use crate::movegen::{legal_moves, move_path};
use crate::resolve::{evaluate_objectives, resolve_active, resolve_passive, CaptureEvent, NoAura, Outcome};
use crate::search::select_move;

/// Where the machine goes once a delay or barrier is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    PassiveMoves,
    PassiveMoveCheck,
    CheckCaptures,
    NextTurn,
}

impl Stage {
    fn phase(self) -> Phase {
        match self {
            Stage::PassiveMoves => Phase::PassiveMoves,
            Stage::PassiveMoveCheck => Phase::PassiveMoveCheck,
            Stage::CheckCaptures => Phase::CheckCaptures,
            Stage::NextTurn => Phase::NextTurn,
        }
    }
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Delay { remaining: u32, next: Stage },
    PassiveMoves,
    PassiveMoveCheck,
    GetMove,
    MovePiece,
    CheckCaptures,
    AwaitActions { next: Stage },
    NextTurn,
    /// The player side won; waiting for `continue_campaign`.
    NextRound,
    /// The player side lost.
    GameOver,
}

/// Notifications for the host, drained with [`Engine::drain_events`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EngineEvent {
    TurnChanged { side: SideId },
    Capture(CaptureEvent),
    LevelUp { piece: PieceId, level: u8 },
    GoldCollected { side: SideId, piece: PieceId, amount: u32 },
    ObjectiveAchieved { message: String, winner: SideId },
}

/// Read-only view of the session for hosts.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub state: BoardState,
    pub active_side: SideId,
    pub phase: Phase,
    pub round: u32,
    pub turn: u32,
    pub outcome: Option<Outcome>,
}

/// A running game session.
pub struct Engine<P: Presenter = NullPresenter> {
    config: GameConfig,
    state: BoardState,
    phase: Phase,
    active: SideId,
    pending: Option<(PieceId, Coord)>,
    moved: Option<PieceId>,
    barrier: ActionBarrier,
    presenter: P,
    events: Vec<EngineEvent>,
    outcome: Option<Outcome>,
    round: u32,
    turn: u32,
    ticks: u64,
    rng: SmallRng,
}

impl Engine<NullPresenter> {
    /// Creates an engine whose effects complete instantly.
    pub fn headless(config: GameConfig) -> Self {
        Engine::new(config, NullPresenter)
    }
}

impl<P: Presenter> Engine<P> {
    /// Creates an engine and starts a fresh game.
    pub fn new(config: GameConfig, presenter: P) -> Self {
        if let Err(e) = config.validate() {
            warn!("{}", e);
        }
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let state = standard_game(&config, &mut rng);
        let mut engine = Engine {
            barrier: ActionBarrier::new(config.barrier_timeout_ticks),
            phase: Phase::GetMove,
            active: SideId(0),
            pending: None,
            moved: None,
            presenter,
            events: Vec::new(),
            outcome: None,
            round: 1,
            turn: 0,
            ticks: 0,
            state,
            config,
            rng,
        };
        engine.start_first_turn();
        engine
    }

    /// Discards everything and starts over from the current config.
    pub fn new_game(&mut self) {
        if let Some(seed) = self.config.seed {
            self.rng = SmallRng::seed_from_u64(seed);
        }
        self.state = standard_game(&self.config, &mut self.rng);
        self.barrier = ActionBarrier::new(self.config.barrier_timeout_ticks);
        self.events.clear();
        self.outcome = None;
        self.pending = None;
        self.moved = None;
        self.round = 1;
        self.turn = 0;
        self.ticks = 0;
        info!(rows = self.config.rows, cols = self.config.cols, "new game");
        self.start_first_turn();
    }

    /// Carries the winning side into the next round.
    pub fn continue_campaign(&mut self) -> Result<(), CampaignError> {
        let outcome = self.outcome.as_ref().ok_or(CampaignError::NotFinished)?;
        if !outcome.player_won {
            return Err(CampaignError::NoVictor);
        }
        let winner = outcome.winner;

        self.barrier.clear();
        self.pending = None;
        self.moved = None;
        self.outcome = None;
        self.round += 1;
        next_round(&mut self.state, winner, self.round);
        info!(round = self.round, survivors = self.state.side(winner).pieces.len(), "campaign continues");
        self.start_first_turn();
        Ok(())
    }

    fn start_first_turn(&mut self) {
        self.active = SideId(0);
        self.phase = self.delay();
        self.events.push(EngineEvent::TurnChanged { side: self.active });
    }

    fn delay(&self) -> Phase {
        Phase::Delay {
            remaining: self.config.delay_ticks,
            next: Stage::PassiveMoves,
        }
    }

    /// Updates one config option. Board size and formation options take
    /// effect at the next `new_game`.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.config.set_option(name, value)?;
        self.barrier.set_timeout(self.config.barrier_timeout_ticks);
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_side(&self) -> SideId {
        self.active
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Number of completed side turns this game.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::NextRound | Phase::GameOver)
    }

    /// True when the engine is idling until the player submits a move.
    pub fn awaiting_player(&self) -> bool {
        self.phase == Phase::GetMove && self.state.side(self.active).is_player_controlled
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            active_side: self.active,
            phase: self.phase,
            round: self.round,
            turn: self.turn,
            outcome: self.outcome.clone(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Legal destinations for `piece`; empty for unknown pieces.
    pub fn valid_moves(&self, piece: PieceId) -> Vec<Coord> {
        legal_moves(&self.state, piece)
    }

    /// Queues a player move. Nothing changes when the move is rejected.
    pub fn submit_move(&mut self, piece: PieceId, row: u8, col: u8) -> Result<(), MoveError> {
        if !self.awaiting_player() {
            return Err(MoveError::NotYourTurn);
        }
        let p = self.state.piece(piece).ok_or(MoveError::UnknownPiece(piece))?;
        if p.side != self.active {
            return Err(MoveError::NotYourPiece(piece));
        }
        let to = Coord::new(row, col);
        if !legal_moves(&self.state, piece).contains(&to) {
            return Err(MoveError::IllegalMove { piece, row, col });
        }
        self.pending = Some((piece, to));
        self.phase = Phase::MovePiece;
        Ok(())
    }

    /// Reports a presenter effect as finished.
    pub fn on_action_complete(&mut self, ticket: ActionTicket) {
        if !self.barrier.complete(ticket) {
            debug!(ticket = ticket.0, "completion for unknown ticket");
        }
    }

    /// Ticks until the engine needs the player, the game ends, or
    /// `max_ticks` pass. Returns the number of ticks spent.
    pub fn run_until_idle(&mut self, max_ticks: u32) -> u32 {
        let mut spent = 0;
        while spent < max_ticks && !self.awaiting_player() && !self.is_finished() {
            self.tick();
            spent += 1;
        }
        spent
    }

    /// Advances the state machine by one step.
    pub fn tick(&mut self) {
        self.ticks += 1;
        match self.phase {
            Phase::Delay { remaining, next } => {
                self.phase = if remaining <= 1 {
                    next.phase()
                } else {
                    Phase::Delay {
                        remaining: remaining - 1,
                        next,
                    }
                };
            }
            Phase::PassiveMoves => self.passive_moves(),
            Phase::PassiveMoveCheck => {
                if !self.check_objectives() {
                    self.enter_get_move();
                }
            }
            Phase::GetMove => self.get_move(),
            Phase::MovePiece => self.move_piece(),
            Phase::CheckCaptures => self.check_captures(),
            Phase::AwaitActions { next } => self.await_actions(next),
            Phase::NextTurn => self.next_turn(),
            Phase::NextRound | Phase::GameOver => {}
        }
    }

    fn passive_moves(&mut self) {
        let capture = resolve_passive(&mut self.state, self.active, &self.config.rules, &NoAura);
        if let Some(event) = capture {
            self.record_capture(event);
        }
        self.phase = Phase::AwaitActions {
            next: Stage::PassiveMoveCheck,
        };
    }

    /// A player side that cannot move passes instead of idling forever.
    fn enter_get_move(&mut self) {
        let side = self.state.side(self.active);
        let stuck = side.is_player_controlled
            && side
                .pieces
                .iter()
                .all(|p| legal_moves(&self.state, p.id).is_empty());
        if stuck {
            warn!(side = %self.active, "no legal moves, passing");
            self.phase = Phase::NextTurn;
        } else {
            self.phase = Phase::GetMove;
        }
    }

    fn get_move(&mut self) {
        if self.state.side(self.active).is_player_controlled {
            return;
        }
        match select_move(&self.state, self.active, &self.config.planner, &mut self.rng) {
            Some(plan) => {
                self.pending = Some((plan.piece, plan.to));
                self.phase = Phase::MovePiece;
            }
            None => {
                warn!(side = %self.active, "no legal moves, passing");
                self.phase = Phase::NextTurn;
            }
        }
    }

    fn move_piece(&mut self) {
        let Some((id, to)) = self.pending.take() else {
            self.phase = Phase::GetMove;
            return;
        };
        let Some(from) = self.state.piece(id).map(|p| p.pos) else {
            self.phase = Phase::GetMove;
            return;
        };

        let side = self.active;
        for p in &mut self.state.side_mut(side).pieces {
            p.spent_for_round = false;
        }
        self.state.relocate(id, to);
        if let Some(p) = self.state.piece_mut(id) {
            p.spent_for_round = true;
            p.has_moved_this_round = true;
            p.in_action = true;
        }

        let path = move_path(from, to);
        if self.state.side(side).is_player_controlled {
            self.collect_gold(side, id, &path);
        }
        debug!(piece = %id, %from, %to, "move");

        if let Some(piece) = self.state.piece(id) {
            if let Some(ticket) = self.presenter.begin_move(piece, &path) {
                self.barrier.register(ticket);
            }
        }
        self.moved = Some(id);
        self.phase = Phase::AwaitActions {
            next: Stage::CheckCaptures,
        };
    }

    fn collect_gold(&mut self, side: SideId, piece: PieceId, path: &[Coord]) {
        let amount: u32 = path
            .iter()
            .map(|c| self.state.board.take_gold(*c))
            .sum();
        if amount > 0 {
            self.state.side_mut(side).gold += amount;
            debug!(%piece, amount, "gold collected");
            self.events
                .push(EngineEvent::GoldCollected { side, piece, amount });
        }
    }

    fn check_captures(&mut self) {
        if let Some(mover) = self.moved.take() {
            let captures = resolve_active(&mut self.state, mover, &self.config.rules, &NoAura);
            for event in captures {
                self.record_capture(event);
            }
        }
        self.phase = Phase::AwaitActions {
            next: Stage::NextTurn,
        };
    }

    fn record_capture(&mut self, event: CaptureEvent) {
        let monster = self.state.side(event.target_side).species == Species::Monster;
        if event.killed && monster && self.roll_gold_drop() {
            self.state
                .board
                .drop_gold(event.target_pos, self.config.gold_value);
        }
        if let Some(ticket) = self.presenter.render_capture_effect(&event) {
            self.barrier.register(ticket);
        }
        for (piece, level) in &event.level_ups {
            self.events.push(EngineEvent::LevelUp {
                piece: *piece,
                level: *level,
            });
        }
        self.events.push(EngineEvent::Capture(event));
    }

    fn roll_gold_drop(&mut self) -> bool {
        let chance = self.config.gold_drop_chance;
        if chance >= 1.0 {
            true
        } else if chance > 0.0 {
            self.rng.gen_bool(chance)
        } else {
            false
        }
    }

    fn await_actions(&mut self, next: Stage) {
        let busy = self.presenter.has_action_in_progress();
        match self.barrier.poll(busy) {
            BarrierStatus::Waiting => {}
            BarrierStatus::Released | BarrierStatus::TimedOut => {
                for p in self.state.pieces_mut() {
                    p.in_action = false;
                }
                self.phase = next.phase();
            }
        }
    }

    fn next_turn(&mut self) {
        if self.check_objectives() {
            return;
        }
        self.turn += 1;
        self.active = SideId(((self.active.0 as usize + 1) % self.state.sides.len()) as u8);
        info!(side = %self.active, turn = self.turn, "turn changed");
        self.events.push(EngineEvent::TurnChanged { side: self.active });
        self.phase = self.delay();
    }

    /// Ends the game if any objective holds. Returns true when it did.
    fn check_objectives(&mut self) -> bool {
        let Some(outcome) = evaluate_objectives(&self.state) else {
            return false;
        };
        info!(winner = %outcome.winner, message = %outcome.message, "objective achieved");
        self.events.push(EngineEvent::ObjectiveAchieved {
            message: outcome.message.clone(),
            winner: outcome.winner,
        });
        self.phase = if outcome.player_won {
            Phase::NextRound
        } else {
            Phase::GameOver
        };
        self.outcome = Some(outcome);
        true
    }

    /// Total ticks since the last new game.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Archetype, ATTACKERS, DEFENDERS};

    fn seeded() -> GameConfig {
        GameConfig {
            seed: Some(17),
            ..Default::default()
        }
    }

    #[test]
    fn new_engine_starts_in_delay_for_defenders() {
        let mut engine = Engine::headless(seeded());
        assert_eq!(engine.active_side(), DEFENDERS);
        assert!(matches!(engine.phase(), Phase::Delay { .. }));
        assert_eq!(
            engine.drain_events(),
            vec![EngineEvent::TurnChanged { side: DEFENDERS }]
        );
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn runs_to_player_move() {
        let mut engine = Engine::headless(seeded());
        let spent = engine.run_until_idle(100);
        assert!(spent > 0);
        assert!(engine.awaiting_player());
        // Idle ticks do not advance anything.
        engine.tick();
        assert_eq!(engine.phase(), Phase::GetMove);
    }

    #[test]
    fn submit_rejected_outside_get_move() {
        let mut engine = Engine::headless(seeded());
        let king = engine.state().side(DEFENDERS).pieces[0].id;
        assert_eq!(engine.submit_move(king, 0, 0), Err(MoveError::NotYourTurn));
    }

    #[test]
    fn submit_validates_piece_and_destination() {
        let mut engine = Engine::headless(seeded());
        engine.run_until_idle(100);
        let before = engine.snapshot().state;

        assert_eq!(
            engine.submit_move(PieceId(999), 0, 0),
            Err(MoveError::UnknownPiece(PieceId(999)))
        );
        let monster = engine.state().side(ATTACKERS).pieces[0].id;
        assert_eq!(
            engine.submit_move(monster, 1, 1),
            Err(MoveError::NotYourPiece(monster))
        );
        let king = engine.state().side(DEFENDERS).pieces[0].id;
        assert_eq!(
            engine.submit_move(king, 0, 0),
            Err(MoveError::IllegalMove {
                piece: king,
                row: 0,
                col: 0
            })
        );
        assert_eq!(engine.snapshot().state, before);
        assert_eq!(engine.phase(), Phase::GetMove);
    }

    #[test]
    fn player_move_hands_turn_to_ai_and_back() {
        let mut engine = Engine::headless(seeded());
        engine.run_until_idle(100);
        engine.drain_events();

        // Defender on the top of the ring slides up one tile.
        let center = engine.state().board.center();
        let top = engine.state().piece_at(Coord::new(center.row - 1, center.col)).unwrap().id;
        engine
            .submit_move(top, center.row - 2, center.col)
            .unwrap();
        engine.run_until_idle(200);

        let events = engine.drain_events();
        assert!(events.contains(&EngineEvent::TurnChanged { side: ATTACKERS }));
        assert!(events.contains(&EngineEvent::TurnChanged { side: DEFENDERS }));
        assert!(engine.awaiting_player() || engine.is_finished());
        let piece = engine.state().piece(top).unwrap();
        assert!(!piece.in_action);
        assert!(engine.state().is_consistent());
    }

    #[test]
    fn moving_marks_only_the_mover_spent() {
        let mut engine = Engine::headless(seeded());
        engine.run_until_idle(100);
        let center = engine.state().board.center();
        let top = engine.state().piece_at(Coord::new(center.row - 1, center.col)).unwrap().id;
        engine.submit_move(top, center.row - 2, center.col).unwrap();
        engine.tick();
        let defenders = &engine.state().side(DEFENDERS).pieces;
        for p in defenders {
            assert_eq!(p.spent_for_round, p.id == top);
        }
        let mover = engine.state().piece(top).unwrap();
        assert!(mover.has_moved_this_round);
        assert!(mover.in_action);
    }

    #[test]
    fn king_escape_ends_in_next_round() {
        let config = GameConfig {
            rows: 7,
            cols: 7,
            ..seeded()
        };
        let mut engine = Engine::headless(config);
        engine.run_until_idle(100);
        // Clear a path and park the king next to a corner.
        let king = engine.state().side(DEFENDERS).pieces[0].id;
        engine.state.relocate(king, Coord::new(0, 1));
        engine.submit_move(king, 0, 0).unwrap();
        engine.run_until_idle(100);
        assert_eq!(engine.phase(), Phase::NextRound);
        let outcome = engine.outcome().unwrap();
        assert_eq!(outcome.message, "Player Wins! King escaped!");
        assert!(engine
            .drain_events()
            .iter()
            .any(|e| matches!(e, EngineEvent::ObjectiveAchieved { winner, .. } if *winner == DEFENDERS)));
    }

    #[test]
    fn continue_campaign_requires_player_victory() {
        let mut engine = Engine::headless(seeded());
        assert_eq!(engine.continue_campaign(), Err(CampaignError::NotFinished));

        let defenders: Vec<_> = engine.state().side(DEFENDERS).pieces.iter().map(|p| p.id).collect();
        for id in defenders {
            engine.state.remove_piece(id);
        }
        engine.run_until_idle(100);
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.continue_campaign(), Err(CampaignError::NoVictor));
    }

    #[test]
    fn continue_campaign_starts_next_round() {
        let mut engine = Engine::headless(seeded());
        let attackers: Vec<_> = engine.state().side(ATTACKERS).pieces.iter().map(|p| p.id).collect();
        for id in attackers {
            engine.state.remove_piece(id);
        }
        engine.run_until_idle(100);
        assert_eq!(engine.phase(), Phase::NextRound);

        engine.continue_campaign().unwrap();
        assert_eq!(engine.round(), 2);
        assert!(engine.outcome().is_none());
        assert_eq!(engine.active_side(), DEFENDERS);
        assert!(matches!(engine.phase(), Phase::Delay { .. }));
        let attackers = &engine.state().side(ATTACKERS).pieces;
        assert_eq!(attackers.len(), 8);
        assert!(attackers.iter().all(|p| p.level == 2));
        assert!(engine.state().is_consistent());
    }

    #[test]
    fn side_without_moves_passes() {
        let config = GameConfig {
            rows: 5,
            cols: 5,
            ai_controls_defenders: true,
            ..seeded()
        };
        let mut engine = Engine::headless(config);
        // Box in every defender so the side has no legal move.
        let movable: Vec<_> = engine
            .state()
            .side(DEFENDERS)
            .pieces
            .iter()
            .filter(|p| p.archetype != Archetype::King)
            .map(|p| p.id)
            .collect();
        for id in movable {
            engine.state.remove_piece(id);
        }
        let king = engine.state().side(DEFENDERS).pieces[0].clone();
        let attackers: Vec<_> = engine.state().side(ATTACKERS).pieces.iter().map(|p| p.id).collect();
        for id in attackers {
            engine.state.remove_piece(id);
        }
        for pos in [(1, 2), (3, 2), (2, 1)] {
            engine
                .state
                .spawn(ATTACKERS, Archetype::Attacker, Coord::new(pos.0, pos.1), 1);
        }
        engine.state.spawn(DEFENDERS, Archetype::Defender, Coord::new(2, 3), 1);
        engine.state.spawn(DEFENDERS, Archetype::Defender, Coord::new(2, 4), 1);
        // (2,4) can still move, so block it vertically too.
        engine.state.spawn(ATTACKERS, Archetype::Attacker, Coord::new(1, 4), 1);
        engine.state.spawn(ATTACKERS, Archetype::Attacker, Coord::new(3, 4), 1);
        engine.state.spawn(ATTACKERS, Archetype::Attacker, Coord::new(1, 3), 1);
        engine.state.spawn(ATTACKERS, Archetype::Attacker, Coord::new(3, 3), 1);
        assert_eq!(king.pos, Coord::new(2, 2));

        while engine.turn() == 0 && !engine.is_finished() {
            engine.tick();
        }
        assert!(engine.turn() == 1 || engine.is_finished());
    }

    struct Recorder {
        next: u64,
        issued: Vec<ActionTicket>,
    }

    impl Presenter for Recorder {
        fn begin_move(&mut self, _piece: &crate::board::Piece, _path: &[Coord]) -> Option<ActionTicket> {
            self.next += 1;
            let t = ActionTicket(self.next);
            self.issued.push(t);
            Some(t)
        }
    }

    #[test]
    fn barrier_waits_for_presenter() {
        let mut engine = Engine::new(
            seeded(),
            Recorder {
                next: 0,
                issued: Vec::new(),
            },
        );
        engine.run_until_idle(100);
        let center = engine.state().board.center();
        let top = engine.state().piece_at(Coord::new(center.row - 1, center.col)).unwrap().id;
        engine.submit_move(top, center.row - 2, center.col).unwrap();
        engine.tick();
        for _ in 0..5 {
            engine.tick();
        }
        assert_eq!(
            engine.phase(),
            Phase::AwaitActions {
                next: Stage::CheckCaptures
            }
        );
        let ticket = engine.presenter().issued[0];
        engine.on_action_complete(ticket);
        engine.tick();
        assert_eq!(engine.phase(), Phase::CheckCaptures);
    }

    #[test]
    fn lost_completion_times_out() {
        let config = GameConfig {
            barrier_timeout_ticks: 3,
            ..seeded()
        };
        let mut engine = Engine::new(
            config,
            Recorder {
                next: 0,
                issued: Vec::new(),
            },
        );
        engine.run_until_idle(100);
        let center = engine.state().board.center();
        let top = engine.state().piece_at(Coord::new(center.row - 1, center.col)).unwrap().id;
        engine.submit_move(top, center.row - 2, center.col).unwrap();
        for _ in 0..4 {
            engine.tick();
        }
        assert_eq!(engine.phase(), Phase::CheckCaptures);
        assert!(!engine.state().piece(top).unwrap().in_action);
    }

    /// A seeded engine with every starting piece removed.
    fn cleared(rows: u8, cols: u8) -> Engine {
        let mut engine = Engine::headless(GameConfig {
            rows,
            cols,
            ..seeded()
        });
        let ids: Vec<_> = engine.state().pieces().map(|p| p.id).collect();
        for id in ids {
            engine.state.remove_piece(id);
        }
        engine.drain_events();
        engine
    }

    fn spawn(engine: &mut Engine, side: SideId, archetype: Archetype, pos: (u8, u8)) -> PieceId {
        engine
            .state
            .spawn(side, archetype, Coord::new(pos.0, pos.1), 1)
            .unwrap()
    }

    #[test]
    fn boxed_in_player_side_passes() {
        let mut engine = cleared(5, 5);
        let king = spawn(&mut engine, DEFENDERS, Archetype::King, (0, 2));
        let guard = spawn(&mut engine, DEFENDERS, Archetype::Defender, (4, 2));
        for pos in [(0, 1), (0, 3), (1, 2), (4, 1), (4, 3), (3, 2)] {
            spawn(&mut engine, ATTACKERS, Archetype::Attacker, pos);
        }
        assert!(engine.valid_moves(king).is_empty());
        assert!(engine.valid_moves(guard).is_empty());

        let mut ticks = 0;
        while engine.turn() == 0 && ticks < 50 {
            assert!(!engine.awaiting_player());
            engine.tick();
            ticks += 1;
        }
        assert_eq!(engine.turn(), 1);
        assert_eq!(engine.active_side(), ATTACKERS);
        assert!(engine
            .drain_events()
            .contains(&EngineEvent::TurnChanged { side: ATTACKERS }));
    }

    #[test]
    fn killed_attacker_drops_gold_for_the_player() {
        let mut engine = cleared(7, 7);
        engine.config.gold_drop_chance = 1.0;
        engine.config.gold_value = 10;
        spawn(&mut engine, DEFENDERS, Archetype::King, (5, 0));
        let anvil = spawn(&mut engine, DEFENDERS, Archetype::Defender, (1, 1));
        let hammer = spawn(&mut engine, DEFENDERS, Archetype::Defender, (3, 3));
        let victim = spawn(&mut engine, ATTACKERS, Archetype::Attacker, (1, 2));
        spawn(&mut engine, ATTACKERS, Archetype::Attacker, (5, 6));

        engine.run_until_idle(100);
        engine.submit_move(hammer, 1, 3).unwrap();
        engine.run_until_idle(200);
        assert!(engine.awaiting_player());
        assert!(engine.state().piece(victim).is_none());
        assert_eq!(engine.state().board.tile_at(Coord::new(1, 2)).gold, 10);

        engine.drain_events();
        engine.submit_move(anvil, 1, 2).unwrap();
        engine.tick();
        assert_eq!(
            engine.drain_events(),
            vec![EngineEvent::GoldCollected {
                side: DEFENDERS,
                piece: anvil,
                amount: 10
            }]
        );
        assert_eq!(engine.state().side(DEFENDERS).gold, 10);
        assert_eq!(engine.state().board.tile_at(Coord::new(1, 2)).gold, 0);
    }

    #[test]
    fn turn_start_resolves_one_passive_capture() {
        let mut engine = cleared(7, 7);
        spawn(&mut engine, DEFENDERS, Archetype::King, (5, 0));
        for pos in [(2, 1), (2, 3), (4, 1), (4, 3)] {
            spawn(&mut engine, DEFENDERS, Archetype::Defender, pos);
        }
        let first = spawn(&mut engine, ATTACKERS, Archetype::Attacker, (2, 2));
        let second = spawn(&mut engine, ATTACKERS, Archetype::Attacker, (4, 2));
        let far = spawn(&mut engine, ATTACKERS, Archetype::Attacker, (5, 6));
        engine.state.piece_mut(far).unwrap().has_moved_this_round = true;

        engine.run_until_idle(100);
        assert!(engine.awaiting_player());
        let captures: Vec<_> = engine
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                EngineEvent::Capture(c) => Some(c),
                _ => None,
            })
            .collect();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].target, first);
        assert!(captures[0].killed);
        assert!(engine.state().piece(second).is_some());
        assert!(engine.state().pieces().all(|p| !p.has_moved_this_round));
    }

    #[test]
    fn out_of_range_drop_chance_does_not_panic() {
        let mut engine = cleared(7, 7);
        engine.config.gold_drop_chance = 1.5;
        assert!(engine.roll_gold_drop());
        engine.config.gold_drop_chance = f64::NAN;
        assert!(!engine.roll_gold_drop());
        engine.config.gold_drop_chance = -0.5;
        assert!(!engine.roll_gold_drop());
    }
}
