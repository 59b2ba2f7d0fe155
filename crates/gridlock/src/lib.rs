//! Gridlock match control.
//!
//! # Architecture
//!
//! - **Controller**: owns the game, the peer session and the timers
//! - **Dispatch**: one loop interleaving events and timer deadlines
//! - **Presenter**: the seam to whatever draws the match
//! - **Terminal / TCP**: the bundled front end and peer channel

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod event;
pub mod mode;
pub mod presenter;
pub mod tcp;
pub mod terminal;
pub mod timers;

pub use config::{ConfigError, MatchConfig};
pub use controller::{MatchController, MatchState, result_banner};
pub use event::Event;
pub use mode::GameMode;
pub use presenter::{Cue, PresentError, Presenter};
pub use terminal::TerminalPresenter;
pub use timers::{TimerKind, Timers};

pub use gridlock_session::{ChannelEvent, SessionCode};
