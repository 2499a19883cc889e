//! Game session - the client's half of one connection to a responder.
//!
//! The session owns the local board and the connection, and is the only thing
//! that talks to the responder. Every operation is one request followed by
//! exactly one reply; `receive` is the only suspension point.
//!
//! ```text
//! AwaitingConnection --StartGame--> InProgress --terminal reply--> Concluded
//!         ^                            |  ^                          |
//!         |                            +--+ ServerMove / BadMove     | prompt_rematch
//!         |                                                          v
//!         |                   InProgress <--StartGame-- AwaitingRematchDecision
//!
//! any state --disconnect / fatal error--> Terminated
//! ```

use thiserror::Error;

use crate::codec::{Message, Opcode};
use crate::connection::{Connection, ConnectionError};
use crate::core::{Board, MoveError, PlacementError};
use crate::types::{Outcome, Owner, Position, TOKENS_PER_PLAYER};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingConnection,
    InProgress,
    Concluded(Outcome),
    AwaitingRematchDecision,
    Terminated,
}

/// Why a move was not played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMove {
    /// Refused by the local board; nothing was sent
    Local(MoveError),
    /// Refused by the responder; the optimistic placement was reverted
    Rejected,
}

/// Result of a move attempt that reached a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveReport {
    Invalid(InvalidMove),
    /// Both tokens placed, match goes on
    Continued { client: Position, opponent: Position },
    /// Match over. `opponent` is absent when the client's own move won.
    Concluded {
        outcome: Outcome,
        client: Position,
        opponent: Option<Position>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RematchReport {
    Started,
    Declined,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("operation not allowed in state {0:?}")]
    InvalidState(SessionState),
    #[error("a request is already outstanding")]
    RequestOutstanding,
    #[error("communication failure: {0}")]
    Connection(#[from] ConnectionError),
    #[error("unexpected {got} reply {context}")]
    UnexpectedReply { context: &'static str, got: Opcode },
    #[error("responder placement disagrees with local board: {0}")]
    Desync(#[from] PlacementError),
}

impl SessionError {
    /// Fatal errors leave the session terminated; the rest are plain rejections.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SessionError::InvalidState(_) | SessionError::RequestOutstanding
        )
    }
}

pub struct GameSession<C> {
    conn: C,
    board: Board,
    state: SessionState,
    /// Set while a request awaits its reply. Stays set if that future is dropped.
    outstanding: bool,
    tokens_left: u8,
}

impl<C: Connection> GameSession<C> {
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            board: Board::new(),
            state: SessionState::AwaitingConnection,
            outstanding: false,
            tokens_left: TOKENS_PER_PLAYER,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tokens_left(&self) -> u8 {
        self.tokens_left
    }

    pub fn is_request_outstanding(&self) -> bool {
        self.outstanding
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Wait for the responder's StartGame and begin the first match.
    pub async fn await_start(&mut self) -> Result<(), SessionError> {
        self.guard(|s| matches!(s, SessionState::AwaitingConnection))?;

        self.outstanding = true;
        let reply = self.conn.receive().await.map_err(|e| self.fail(e.into()))?;
        self.outstanding = false;

        self.expect_start(reply, "before the first match")
    }

    /// Drop a token into `column` and play the exchange with the responder.
    ///
    /// Locally illegal moves never reach the network. Rejections (wrong state,
    /// request outstanding) happen before any I/O and leave the session as is.
    pub async fn attempt_move(&mut self, column: u8) -> Result<MoveReport, SessionError> {
        self.guard(|s| matches!(s, SessionState::InProgress))?;

        let client = match self.board.drop_token(column, Owner::Client) {
            Ok(pos) => pos,
            Err(e) => return Ok(MoveReport::Invalid(InvalidMove::Local(e))),
        };

        let reply = self.exchange(Message::ClientMove(client)).await?;

        let report = match reply {
            Message::BadMove => {
                self.board.undo(client);
                MoveReport::Invalid(InvalidMove::Rejected)
            }
            Message::ServerMove(opponent) => {
                self.mirror(opponent)?;
                self.tokens_left = self.tokens_left.saturating_sub(1);
                MoveReport::Continued { client, opponent }
            }
            Message::GameWonClient => self.conclude(Outcome::ClientWin, client, None),
            Message::GameWonOpponent(opponent) => {
                self.mirror(opponent)?;
                self.conclude(Outcome::OpponentWin, client, Some(opponent))
            }
            Message::GameTied(opponent) => {
                self.mirror(opponent)?;
                self.conclude(Outcome::Tie, client, Some(opponent))
            }
            Message::StartGame
            | Message::ClientMove(_)
            | Message::PlayAgain
            | Message::CloseConnection => {
                return Err(self.fail(SessionError::UnexpectedReply {
                    context: "to a move",
                    got: reply.opcode(),
                }))
            }
        };
        Ok(report)
    }

    /// Concluded -> AwaitingRematchDecision. No I/O.
    pub fn prompt_rematch(&mut self) -> Result<(), SessionError> {
        self.guard(|s| matches!(s, SessionState::Concluded(_)))?;
        self.state = SessionState::AwaitingRematchDecision;
        Ok(())
    }

    /// Accept or decline a rematch once a match has concluded.
    ///
    /// Declining tears the session down. Accepting sends PlayAgain and requires
    /// StartGame back; anything else is a fatal protocol violation.
    pub async fn respond_to_rematch(
        &mut self,
        accept: bool,
    ) -> Result<RematchReport, SessionError> {
        self.guard(|s| {
            matches!(
                s,
                SessionState::Concluded(_) | SessionState::AwaitingRematchDecision
            )
        })?;

        if !accept {
            self.disconnect().await;
            return Ok(RematchReport::Declined);
        }

        let reply = self.exchange(Message::PlayAgain).await?;
        self.expect_start(reply, "to a rematch request")?;
        Ok(RematchReport::Started)
    }

    /// Best-effort CloseConnection; the session ends whether or not it is delivered.
    pub async fn disconnect(&mut self) {
        if self.state == SessionState::Terminated {
            return;
        }
        self.state = SessionState::Terminated;
        let _ = self.conn.send(Message::CloseConnection).await;
    }

    fn guard(&self, allowed: impl FnOnce(SessionState) -> bool) -> Result<(), SessionError> {
        if self.outstanding {
            return Err(SessionError::RequestOutstanding);
        }
        if !allowed(self.state) {
            return Err(SessionError::InvalidState(self.state));
        }
        Ok(())
    }

    /// Send one request and wait for its single reply.
    async fn exchange(&mut self, request: Message) -> Result<Message, SessionError> {
        self.outstanding = true;
        if let Err(e) = self.conn.send(request).await {
            return Err(self.fail(e.into()));
        }
        let reply = self.conn.receive().await.map_err(|e| self.fail(e.into()))?;
        self.outstanding = false;
        Ok(reply)
    }

    fn expect_start(&mut self, reply: Message, context: &'static str) -> Result<(), SessionError> {
        match reply {
            Message::StartGame => {
                self.board.clear();
                self.tokens_left = TOKENS_PER_PLAYER;
                self.state = SessionState::InProgress;
                Ok(())
            }
            other => Err(self.fail(SessionError::UnexpectedReply {
                context,
                got: other.opcode(),
            })),
        }
    }

    fn mirror(&mut self, pos: Position) -> Result<(), SessionError> {
        self.board
            .place_at(pos, Owner::Opponent)
            .map_err(|e| self.fail(e.into()))
    }

    fn conclude(
        &mut self,
        outcome: Outcome,
        client: Position,
        opponent: Option<Position>,
    ) -> MoveReport {
        self.state = SessionState::Concluded(outcome);
        MoveReport::Concluded {
            outcome,
            client,
            opponent,
        }
    }

    /// Record a fatal error: the match is abandoned and the session terminated.
    fn fail(&mut self, err: SessionError) -> SessionError {
        self.state = SessionState::Terminated;
        self.outstanding = false;
        err
    }
}
