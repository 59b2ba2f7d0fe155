//! Match control.
//!
//! The controller owns all mutable match state. Every event and every timer
//! is handled to completion on the caller's thread, so the game, the session
//! and the timers never see a half-applied change.

use crate::config::MatchConfig;
use crate::event::Event;
use crate::mode::GameMode;
use crate::presenter::{Cue, Presenter};
use crate::timers::{TimerKind, Timers};
use derive_getters::Getters;
use gridlock_session::{
    ChannelEvent, Inbound, LinkState, Message, PlayerRole, Rejection, Session, SessionCode,
    Transport,
};
use gridlock_tictactoe::{
    Board, Difficulty, Game, Move, MoveError, Opponent, Phase, Position,
};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

const STATUS_PAUSED: &str = "System Paused";
const STATUS_AWAITING: &str = "Awaiting First Move...";
const LINK_CONNECTED: &str = "Connected! Ready to play.";
const LINK_WAITING: &str = "Waiting for opponent...";
const LINK_BUFFERING: &str = "Buffering Move...";
const LINK_FIRST_MOVE: &str = "You moved first as X!";
const STATUS_PEER_GONE: &str = "Opponent Disconnected.";
const LINK_GONE: &str = "Disconnected.";

/// Banner shown when a match ends.
pub fn result_banner(phase: Phase) -> Option<String> {
    match phase {
        Phase::Won(mark) => Some(format!("{mark} Dominates!")),
        Phase::Drawn => Some("Gridlock!".to_string()),
        Phase::WaitingFirstMove | Phase::InProgress => None,
    }
}

/// Mutable state of one match.
#[derive(Debug, Getters)]
pub struct MatchState {
    /// Board, turn and phase.
    game: Game,
    /// Who the opponent is.
    mode: GameMode,
    /// Peer session; idle outside online mode.
    session: Session,
    /// True when the last result was produced here, so the clear that
    /// follows it is ours to broadcast.
    result_is_local: bool,
}

/// Routes events to the rules engine, the computer and the session.
pub struct MatchController<P> {
    state: MatchState,
    presenter: P,
    transport: Option<Box<dyn Transport>>,
    opponent: Opponent,
    timers: Timers,
    config: MatchConfig,
}

impl<P: Presenter> MatchController<P> {
    /// Creates a controller in local mode and draws the empty board.
    pub fn new(config: MatchConfig, presenter: P) -> Self {
        let opponent = match config.seed() {
            Some(seed) => Opponent::seeded(*config.difficulty(), *config.computer_mark(), *seed),
            None => Opponent::new(*config.difficulty(), *config.computer_mark()),
        };
        let mut controller = Self {
            state: MatchState {
                game: Game::new(),
                mode: GameMode::Local,
                session: Session::new(config.sync_interval()),
                result_is_local: false,
            },
            presenter,
            transport: None,
            opponent,
            timers: Timers::default(),
            config,
        };
        controller.redraw_status();
        controller.presenter.render_board(controller.state.game.board());
        controller
    }

    /// Current match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// The presentation sink.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presentation sink.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Pending timers.
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Difficulty the computer currently plays at.
    pub fn difficulty(&self) -> Difficulty {
        self.opponent.difficulty()
    }

    /// Installs the peer channel, closing any previous one.
    #[instrument(skip_all)]
    pub fn attach_transport(&mut self, transport: Box<dyn Transport>) {
        if let Some(mut old) = self.transport.replace(transport) {
            old.close();
        }
        info!("Transport attached");
    }

    /// Shows the code a joining peer needs.
    pub fn announce_code(&mut self, code: &SessionCode) {
        info!(%code, "Session code generated");
        self.presenter
            .set_link_status(&format!("Your Code: {code}. {LINK_WAITING}"));
    }

    /// Handles one event to completion.
    #[instrument(skip(self, now))]
    pub fn handle(&mut self, event: Event, now: Instant) {
        match event {
            Event::CellSelected(index) => self.cell_selected(index, now),
            Event::Restart => self.restart(now),
            Event::Clear => self.clear(now),
            Event::TogglePause => self.toggle_pause(now),
            Event::SelectMode(mode) => self.select_mode(mode, now),
            Event::SelectDifficulty(difficulty) => self.select_difficulty(difficulty, now),
            Event::SendChat(text) => self.send_chat(&text),
            Event::Channel(channel) => self.channel(channel, now),
            Event::Quit => debug!("Quit is handled by the dispatch loop"),
        }
    }

    /// Fires every timer due at `now`, earliest first.
    pub fn fire_due(&mut self, now: Instant) {
        for kind in self.timers.take_due(now) {
            debug!(?kind, "Timer fired");
            match kind {
                TimerKind::AutoReset => self.auto_reset(now),
                TimerKind::ComputerMove => self.computer_move(now),
            }
        }
    }

    fn with_link<R>(&mut self, f: impl FnOnce(&mut Session, &mut dyn Transport) -> R) -> Option<R> {
        let session = &mut self.state.session;
        self.transport.as_deref_mut().map(|transport| f(session, transport))
    }

    fn cue(&mut self, cue: Cue) {
        if let Err(e) = self.presenter.play(cue) {
            warn!(error = %e, ?cue, "Sound cue failed");
        }
    }

    fn turn_status(&self) -> String {
        let game = &self.state.game;
        if game.turn().paused() {
            return STATUS_PAUSED.to_string();
        }
        match self.state.mode {
            GameMode::Online => {
                let base = if game.board().is_blank() {
                    STATUS_AWAITING.to_string()
                } else {
                    format!("{}'s Turn", game.to_move())
                };
                match self.state.session.role() {
                    PlayerRole::Unassigned => base,
                    role => format!("{base} (You are {})", role.label()),
                }
            }
            GameMode::Local | GameMode::Computer(_) => format!("{} Activates...", game.to_move()),
        }
    }

    fn redraw_status(&mut self) {
        let status = self.turn_status();
        self.presenter.set_status(&status);
    }

    fn online(&self) -> bool {
        self.state.mode.is_online()
    }

    fn cell_selected(&mut self, index: usize, now: Instant) {
        let position = match Position::from_index(index).ok_or(MoveError::OutOfBounds(index)) {
            Ok(position) => position,
            Err(e) => {
                debug!(error = %e, "Cell selection ignored");
                return;
            }
        };
        let turn = self.state.game.turn();
        if !turn.accepts_moves() || !self.state.game.board().is_empty(position) {
            debug!(%position, ?turn, "Cell selection ignored");
            return;
        }

        match self.state.mode {
            GameMode::Local => self.local_move(position, now),
            GameMode::Computer(_) => {
                if self.state.game.to_move() == self.opponent.mark() {
                    debug!("Computer's turn, ignoring click");
                    return;
                }
                self.local_move(position, now);
            }
            GameMode::Online => self.online_move(position, now),
        }
    }

    fn local_move(&mut self, position: Position, now: Instant) {
        match self.state.game.make_move(position) {
            Ok(phase) => self.after_move(phase, true, now),
            Err(e) => debug!(error = %e, "Move rejected"),
        }
    }

    #[instrument(skip(self, now), fields(role = ?self.state.session.role()))]
    fn online_move(&mut self, position: Position, now: Instant) {
        let game = &self.state.game;
        let claim = match self.state.session.claim_move(game.board(), game.to_move()) {
            Ok(claim) => claim,
            Err(rejection @ Rejection::AssignedO) => {
                self.presenter.set_link_status(&rejection.to_string());
                self.redraw_status();
                return;
            }
            Err(rejection @ Rejection::NotYourTurn { .. }) => {
                self.presenter.set_status(&rejection.to_string());
                return;
            }
        };
        if claim.assigned {
            self.presenter.set_link_status(LINK_FIRST_MOVE);
        }

        let phase = match self.state.game.play(Move::new(claim.mark, position)) {
            Ok(phase) => phase,
            Err(e) => {
                debug!(error = %e, "Move rejected");
                return;
            }
        };

        self.state.session.enqueue_move(self.state.game.board());
        self.with_link(|session, transport| session.flush(transport));
        if self.state.session.pending() > 0 {
            self.presenter.set_link_status(LINK_BUFFERING);
        }
        self.after_move(phase, true, now);
    }

    fn after_move(&mut self, phase: Phase, local: bool, now: Instant) {
        self.presenter.render_board(self.state.game.board());
        self.cue(Cue::Click);
        if phase.is_terminal() {
            self.finish(phase, local, now);
            return;
        }
        self.redraw_status();
        self.schedule_computer(now);
    }

    #[instrument(skip(self, now))]
    fn finish(&mut self, phase: Phase, local: bool, now: Instant) {
        let Some(banner) = result_banner(phase) else {
            return;
        };
        info!(%banner, local, "Match over");

        if local && self.online() {
            let message = Message::GameOver {
                message: banner.clone(),
            };
            self.with_link(|session, transport| session.send_now(message, transport));
        }

        self.presenter.show_result(&banner);
        self.presenter.set_status(&banner);
        self.cue(Cue::Win);
        self.state.result_is_local = local;
        self.timers.cancel(TimerKind::ComputerMove);
        self.timers
            .schedule(TimerKind::AutoReset, now + self.config.auto_reset_delay());
    }

    fn schedule_computer(&mut self, now: Instant) {
        if !matches!(self.state.mode, GameMode::Computer(_)) {
            return;
        }
        let game = &self.state.game;
        if game.turn().accepts_moves() && game.to_move() == self.opponent.mark() {
            self.timers
                .schedule(TimerKind::ComputerMove, now + self.config.computer_delay());
        }
    }

    #[instrument(skip(self, now))]
    fn computer_move(&mut self, now: Instant) {
        let game = &self.state.game;
        if !matches!(self.state.mode, GameMode::Computer(_))
            || !game.turn().accepts_moves()
            || game.to_move() != self.opponent.mark()
        {
            debug!("Computer move no longer applicable");
            return;
        }
        let Some(position) = self.opponent.choose_move(game.board()) else {
            return;
        };
        match self.state.game.make_move(position) {
            Ok(phase) => self.after_move(phase, true, now),
            Err(e) => warn!(error = %e, "Computer picked an illegal square"),
        }
    }

    fn auto_reset(&mut self, now: Instant) {
        self.reset_board(now);
        if self.online() && self.state.result_is_local {
            let clear = Message::clear();
            self.with_link(|session, transport| session.send_now(clear, transport));
        }
        self.state.result_is_local = false;
    }

    /// Empty board, X to move, no timers; keeps the queue and chat.
    fn reset_board(&mut self, now: Instant) {
        self.timers.cancel_all();
        self.state.game.reset();
        if self.online() {
            self.state.session.reset_role();
            if *self.state.session.link() == LinkState::Closed {
                self.state.game.freeze();
            }
        }
        self.presenter.render_board(self.state.game.board());
        self.redraw_status();
        self.schedule_computer(now);
    }

    #[instrument(skip(self, now))]
    fn restart(&mut self, now: Instant) {
        info!(mode = %self.state.mode.name(), "Restarting match");
        self.state.session.restart();
        self.state.result_is_local = false;
        self.reset_board(now);

        if self.online() {
            let sync = Message::Sync {
                board: Board::new(),
            };
            let sent = self
                .with_link(|session, transport| session.send_now(sync, transport))
                .unwrap_or(false);
            if !sent && *self.state.session.link() != LinkState::Closed {
                self.presenter.set_link_status(LINK_WAITING);
            }
        }
        self.cue(Cue::Click);
    }

    fn clear(&mut self, now: Instant) {
        info!("Clearing board");
        self.reset_board(now);
        self.state.result_is_local = false;
        if self.online() {
            let clear = Message::clear();
            self.with_link(|session, transport| session.send_now(clear, transport));
        }
        self.cue(Cue::Click);
    }

    fn toggle_pause(&mut self, now: Instant) {
        match self.state.game.toggle_pause() {
            Some(true) => {
                info!("Paused");
                self.timers.cancel(TimerKind::ComputerMove);
            }
            Some(false) => {
                info!("Resumed");
                self.schedule_computer(now);
            }
            None => {
                debug!("Pause ignored, game not active");
                return;
            }
        }
        self.redraw_status();
        self.cue(Cue::Click);
    }

    #[instrument(skip(self, now))]
    fn select_mode(&mut self, mode: GameMode, now: Instant) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
            info!("Transport closed for mode change");
        }
        self.state.session = Session::new(self.config.sync_interval());
        if let GameMode::Computer(difficulty) = mode {
            self.opponent.set_difficulty(difficulty);
        }
        self.state.mode = mode;
        info!(mode = %mode.name(), "Mode selected");
        self.presenter.set_link_status("");
        self.restart(now);
    }

    fn select_difficulty(&mut self, difficulty: Difficulty, now: Instant) {
        self.opponent.set_difficulty(difficulty);
        info!(%difficulty, "Difficulty changed");
        if matches!(self.state.mode, GameMode::Computer(_)) {
            self.state.mode = GameMode::Computer(difficulty);
            self.restart(now);
        }
    }

    fn send_chat(&mut self, text: &str) {
        if !self.online() {
            debug!("Chat is only available online");
            return;
        }
        let sent = self.with_link(|session, transport| session.send_chat(text, transport));
        if let Some(Some(line)) = sent {
            self.presenter.append_chat(&line);
        }
    }

    fn channel(&mut self, event: ChannelEvent, now: Instant) {
        if !self.online() {
            debug!(?event, "Channel event outside online mode");
            return;
        }
        match event {
            ChannelEvent::Open => {
                self.presenter.set_link_status(LINK_CONNECTED);
                self.state.game.activate();
                let board = self.state.game.board().clone();
                self.with_link(|session, transport| session.on_open(&board, now, transport));
                self.redraw_status();
            }
            ChannelEvent::Close => {
                self.state.session.on_close();
                self.state.game.freeze();
                self.timers.cancel_all();
                self.presenter.set_status(STATUS_PEER_GONE);
                self.presenter.set_link_status(LINK_GONE);
            }
            ChannelEvent::Error(reason) => {
                warn!(%reason, "Channel error");
                self.presenter
                    .set_link_status(&format!("Connection Issue: {reason}"));
            }
            ChannelEvent::Data(raw) => self.inbound(&raw, now),
        }
    }

    fn inbound(&mut self, raw: &str, now: Instant) {
        let active = self.state.game.turn().game_active();
        let Some(directive) = self.state.session.receive(raw, active) else {
            return;
        };

        match directive {
            Inbound::RemoteMove(board) => {
                let phase = self.state.game.adopt_move(board);
                self.after_move(phase, false, now);
            }
            Inbound::Sync(board) => {
                self.state.game.resync(board);
                self.presenter.render_board(self.state.game.board());
                self.redraw_status();
            }
            Inbound::Clear(board) => {
                self.timers.cancel_all();
                self.state.result_is_local = false;
                self.state.game.clear_to(board);
                self.presenter.render_board(self.state.game.board());
                self.redraw_status();
            }
            Inbound::GameOver(banner) => {
                self.state.game.freeze();
                if self.state.game.phase().is_terminal() {
                    debug!(%banner, "Result already shown");
                    return;
                }
                info!(%banner, "Peer reported result");
                self.presenter.show_result(&banner);
                self.presenter.set_status(&banner);
                self.cue(Cue::Win);
                self.state.result_is_local = false;
                self.timers
                    .schedule(TimerKind::AutoReset, now + self.config.auto_reset_delay());
            }
            Inbound::Chat(line) => self.presenter.append_chat(&line),
        }
    }
}
