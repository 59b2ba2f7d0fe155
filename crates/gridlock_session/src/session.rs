//! Networked match session: roles, outbound buffering, inbound filtering.
//!
//! The session never touches the game directly. It decides whether a local
//! move may go ahead and turns inbound text into [`Inbound`] directives; the
//! match controller applies both to the game it owns.

use crate::message::Message;
use crate::role::PlayerRole;
use crate::transport::{LinkState, Transport};
use derive_getters::Getters;
use gridlock_tictactoe::{Board, Mark};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Minimum spacing between throttled syncs.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(500);

/// Why a local move attempt did not go ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// The board already had a move, so this participant just became O and
    /// must wait for its turn.
    #[display("You are O. Wait for X's move.")]
    AssignedO,

    /// The local role is not the mark to move.
    #[display("Wait! {}'s turn.", expected)]
    NotYourTurn {
        /// Mark whose turn it is.
        expected: Mark,
    },
}

impl std::error::Error for Rejection {}

/// Permission to place `mark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    /// Mark to place.
    pub mark: Mark,
    /// True when this attempt is what bound the role.
    pub assigned: bool,
}

/// What an inbound message asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Adopt the peer's board after their move and take the turn.
    RemoteMove(Board),
    /// Adopt the board and re-derive whose turn it is.
    Sync(Board),
    /// Start a fresh match from this board.
    Clear(Board),
    /// Show the result and stop accepting moves.
    GameOver(String),
    /// Show a chat line.
    Chat(String),
}

/// State of one peer's side of a networked match.
#[derive(Debug, Getters)]
pub struct Session {
    /// Role for the current match.
    role: PlayerRole,
    /// Channel lifecycle.
    link: LinkState,
    /// Messages waiting for the channel, oldest first.
    #[getter(skip)]
    outbound: VecDeque<Message>,
    /// When the last throttled sync went out.
    last_sync: Option<Instant>,
    /// Minimum spacing between throttled syncs.
    sync_interval: Duration,
    /// Chat lines sent and received this match.
    chat_log: Vec<String>,
}

impl Session {
    /// Creates a session with no role and an idle link.
    pub fn new(sync_interval: Duration) -> Self {
        Self {
            role: PlayerRole::Unassigned,
            link: LinkState::Idle,
            outbound: VecDeque::new(),
            last_sync: None,
            sync_interval,
            chat_log: Vec::new(),
        }
    }

    /// Number of messages waiting for the channel.
    pub fn pending(&self) -> usize {
        self.outbound.len()
    }

    /// Decides whether the local participant may move now.
    ///
    /// With no role yet, an empty board makes this participant X and the move
    /// goes ahead; a non-empty board makes it O and the attempt is spent on
    /// the assignment alone.
    #[instrument(skip(self, board), fields(role = ?self.role))]
    pub fn claim_move(&mut self, board: &Board, to_move: Mark) -> Result<Claim, Rejection> {
        let assigned = self.role == PlayerRole::Unassigned;
        if assigned {
            if board.is_blank() {
                self.role = PlayerRole::X;
                info!("Moved first, playing X");
            } else {
                self.role = PlayerRole::O;
                info!("Board already started, playing O");
                return Err(Rejection::AssignedO);
            }
        }

        match self.role.mark() {
            Some(mark) if mark == to_move => Ok(Claim { mark, assigned }),
            _ => {
                debug!(expected = %to_move, "Move out of turn");
                Err(Rejection::NotYourTurn { expected: to_move })
            }
        }
    }

    /// Queues a snapshot of the board after an accepted local move.
    pub fn enqueue_move(&mut self, board: &Board) {
        self.outbound.push_back(Message::Move {
            board: board.snapshot(),
        });
    }

    /// Sends queued messages in order while the channel stays open.
    /// Returns how many went out.
    #[instrument(skip_all, fields(pending = self.outbound.len()))]
    pub fn flush(&mut self, transport: &mut dyn Transport) -> usize {
        let mut sent = 0;
        while let Some(message) = self.outbound.front() {
            if !transport.is_open() {
                break;
            }
            if let Err(e) = transport.send(message) {
                warn!(error = %e, kind = message.kind(), "Send failed, keeping message queued");
                break;
            }
            self.outbound.pop_front();
            sent += 1;
        }
        if sent > 0 {
            debug!(sent, remaining = self.outbound.len(), "Flushed outbound queue");
        }
        sent
    }

    /// Sends one message right away if the channel is open; nothing is
    /// buffered.
    #[instrument(skip_all, fields(kind = message.kind()))]
    pub fn send_now(&mut self, message: Message, transport: &mut dyn Transport) -> bool {
        if !transport.is_open() {
            debug!("Channel not open, dropping");
            return false;
        }
        match transport.send(&message) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Send failed");
                false
            }
        }
    }

    /// Sends a full-board sync unless one went out within the sync interval.
    #[instrument(skip(self, board, transport))]
    pub fn request_sync(
        &mut self,
        board: &Board,
        now: Instant,
        transport: &mut dyn Transport,
    ) -> bool {
        if let Some(last) = self.last_sync
            && now.saturating_duration_since(last) <= self.sync_interval
        {
            debug!("Sync throttled");
            return false;
        }

        let sent = self.send_now(
            Message::Sync {
                board: board.snapshot(),
            },
            transport,
        );
        if sent {
            self.last_sync = Some(now);
        }
        sent
    }

    /// Sends a chat line prefixed with the local role and logs it.
    /// Returns the line as sent, or `None` if blank or the channel is closed.
    #[instrument(skip(self, transport))]
    pub fn send_chat(&mut self, text: &str, transport: &mut dyn Transport) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let line = format!("{}: {}", self.role.label(), text);
        if !self.send_now(Message::Chat { message: line.clone() }, transport) {
            return None;
        }
        self.chat_log.push(line.clone());
        Some(line)
    }

    /// The channel opened: sync the board and drain anything buffered.
    ///
    /// A blank board is not synced, so the later of two peers to open cannot
    /// wipe moves the other made while connecting.
    #[instrument(skip_all)]
    pub fn on_open(&mut self, board: &Board, now: Instant, transport: &mut dyn Transport) {
        info!(pending = self.outbound.len(), "Channel open");
        self.link = LinkState::Open;
        if !board.is_blank() {
            self.request_sync(board, now, transport);
        }
        self.flush(transport);
    }

    /// The peer went away.
    pub fn on_close(&mut self) {
        info!("Channel closed");
        self.link = LinkState::Closed;
    }

    /// Turns one inbound text message into a directive.
    ///
    /// While the game is inactive only `clear` and `gameOver` get through.
    /// A `clear`, or a `sync` of a blank board (the peer restarted), unbinds
    /// the role. Unknown or malformed messages are logged and dropped.
    #[instrument(skip(self, raw), fields(len = raw.len()))]
    pub fn receive(&mut self, raw: &str, game_active: bool) -> Option<Inbound> {
        let message = match Message::decode(raw) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Ignoring inbound message");
                return None;
            }
        };

        if !game_active && !matches!(message, Message::Clear { .. } | Message::GameOver { .. }) {
            debug!(kind = message.kind(), "Game inactive, discarding");
            return None;
        }

        debug!(kind = message.kind(), "Inbound message");
        Some(match message {
            Message::Move { board } => Inbound::RemoteMove(board),
            Message::Sync { board } => {
                if board.is_blank() {
                    self.role = PlayerRole::Unassigned;
                }
                Inbound::Sync(board)
            }
            Message::Clear { board } => {
                self.role = PlayerRole::Unassigned;
                Inbound::Clear(board)
            }
            Message::GameOver { message } => Inbound::GameOver(message),
            Message::Chat { message } => {
                self.chat_log.push(message.clone());
                Inbound::Chat(message)
            }
        })
    }

    /// Forgets the role so the next first mover becomes X.
    pub fn reset_role(&mut self) {
        self.role = PlayerRole::Unassigned;
    }

    /// Starts a new match on the same link: no role, nothing queued, empty
    /// chat log.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.role = PlayerRole::Unassigned;
        self.outbound.clear();
        self.chat_log.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_SYNC_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryTransport;
    use gridlock_tictactoe::Position;

    fn one_move() -> Board {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X).unwrap();
        board
    }

    #[test]
    fn test_first_mover_on_empty_board_is_x() {
        let mut session = Session::default();
        let claim = session.claim_move(&Board::new(), Mark::X).unwrap();
        assert_eq!(claim, Claim { mark: Mark::X, assigned: true });
        assert_eq!(*session.role(), PlayerRole::X);
    }

    #[test]
    fn test_late_arrival_becomes_o_without_moving() {
        let mut session = Session::default();
        assert_eq!(
            session.claim_move(&one_move(), Mark::O),
            Err(Rejection::AssignedO)
        );
        assert_eq!(*session.role(), PlayerRole::O);

        let claim = session.claim_move(&one_move(), Mark::O).unwrap();
        assert_eq!(claim, Claim { mark: Mark::O, assigned: false });
    }

    #[test]
    fn test_out_of_turn_rejected() {
        let mut session = Session::default();
        session.claim_move(&Board::new(), Mark::X).unwrap();
        assert_eq!(
            session.claim_move(&one_move(), Mark::O),
            Err(Rejection::NotYourTurn { expected: Mark::O })
        );
    }

    #[test]
    fn test_moves_buffer_until_open() {
        let wire = MemoryTransport::new();
        let mut transport = wire.clone();
        let mut session = Session::default();

        session.enqueue_move(&one_move());
        assert_eq!(session.flush(&mut transport), 0);
        assert_eq!(session.pending(), 1);

        wire.set_open(true);
        session.on_open(&one_move(), Instant::now(), &mut transport);
        assert_eq!(session.pending(), 0);
        let kinds: Vec<_> = wire.sent().iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, ["sync", "move"]);
        assert_eq!(*session.link(), LinkState::Open);
    }

    #[test]
    fn test_open_with_blank_board_sends_nothing() {
        let wire = MemoryTransport::open();
        let mut transport = wire.clone();
        let mut session = Session::default();
        session.on_open(&Board::new(), Instant::now(), &mut transport);
        assert!(wire.sent().is_empty());
        assert_eq!(*session.link(), LinkState::Open);
    }

    #[test]
    fn test_failed_send_keeps_order() {
        let wire = MemoryTransport::open();
        let mut transport = wire.clone();
        let mut session = Session::default();

        session.enqueue_move(&Board::new());
        session.enqueue_move(&one_move());
        wire.fail_sends(true);
        assert_eq!(session.flush(&mut transport), 0);
        assert_eq!(session.pending(), 2);

        wire.fail_sends(false);
        assert_eq!(session.flush(&mut transport), 2);
        assert_eq!(
            wire.sent(),
            vec![
                Message::Move { board: Board::new() },
                Message::Move { board: one_move() }
            ]
        );
    }

    #[test]
    fn test_sync_throttled_within_interval() {
        let wire = MemoryTransport::open();
        let mut transport = wire.clone();
        let mut session = Session::default();
        let t0 = Instant::now();

        assert!(session.request_sync(&Board::new(), t0, &mut transport));
        let early = t0 + Duration::from_millis(499);
        assert!(!session.request_sync(&Board::new(), early, &mut transport));
        assert_eq!(wire.sent().len(), 1);

        let late = t0 + Duration::from_millis(501);
        assert!(session.request_sync(&Board::new(), late, &mut transport));
        assert_eq!(wire.sent().len(), 2);
    }

    #[test]
    fn test_inactive_game_only_hears_clear_and_game_over() {
        let mut session = Session::default();
        let mv = Message::Move { board: one_move() }.encode().unwrap();
        let chat = Message::Chat { message: "X: hi".into() }.encode().unwrap();
        let over = Message::GameOver { message: "Gridlock!".into() }.encode().unwrap();
        let clear = Message::clear().encode().unwrap();

        assert_eq!(session.receive(&mv, false), None);
        assert_eq!(session.receive(&chat, false), None);
        assert_eq!(
            session.receive(&over, false),
            Some(Inbound::GameOver("Gridlock!".into()))
        );
        assert_eq!(session.receive(&clear, false), Some(Inbound::Clear(Board::new())));
    }

    #[test]
    fn test_clear_unbinds_role() {
        let mut session = Session::default();
        session.claim_move(&Board::new(), Mark::X).unwrap();
        let clear = Message::clear().encode().unwrap();
        session.receive(&clear, true);
        assert_eq!(*session.role(), PlayerRole::Unassigned);
    }

    #[test]
    fn test_blank_sync_unbinds_role() {
        let mut session = Session::default();
        session.claim_move(&Board::new(), Mark::X).unwrap();

        let midgame = Message::Sync { board: one_move() }.encode().unwrap();
        session.receive(&midgame, true);
        assert_eq!(*session.role(), PlayerRole::X);

        let restarted = Message::Sync { board: Board::new() }.encode().unwrap();
        assert_eq!(session.receive(&restarted, true), Some(Inbound::Sync(Board::new())));
        assert_eq!(*session.role(), PlayerRole::Unassigned);
    }

    #[test]
    fn test_unknown_and_garbage_ignored() {
        let mut session = Session::default();
        assert_eq!(session.receive(r#"{"type":"emote"}"#, true), None);
        assert_eq!(session.receive("{{{", true), None);
        assert!(session.chat_log().is_empty());
    }

    #[test]
    fn test_chat_prefixed_with_role() {
        let wire = MemoryTransport::open();
        let mut transport = wire.clone();
        let mut session = Session::default();

        assert_eq!(session.send_chat("  hello ", &mut transport).as_deref(), Some("?: hello"));
        session.claim_move(&Board::new(), Mark::X).unwrap();
        assert_eq!(session.send_chat("gg", &mut transport).as_deref(), Some("X: gg"));
        assert_eq!(session.send_chat("   ", &mut transport), None);
        assert_eq!(session.chat_log(), &vec!["?: hello".to_string(), "X: gg".to_string()]);
    }

    #[test]
    fn test_chat_needs_open_channel() {
        let mut transport = MemoryTransport::new();
        let mut session = Session::default();
        assert_eq!(session.send_chat("hello", &mut transport), None);
        assert!(session.chat_log().is_empty());
    }

    #[test]
    fn test_restart_drops_queue_and_role() {
        let mut session = Session::default();
        session.claim_move(&Board::new(), Mark::X).unwrap();
        session.enqueue_move(&one_move());
        session.restart();
        assert_eq!(session.pending(), 0);
        assert_eq!(*session.role(), PlayerRole::Unassigned);
    }
}
