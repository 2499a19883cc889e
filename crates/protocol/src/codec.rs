//! Codec module - binary message catalog for the Connect Four wire protocol
//!
//! Every frame is one opcode byte followed by zero or one position byte:
//!
//! ```text
//! +--------+------------------+
//! | opcode | position (0..=1) |
//! +--------+------------------+
//! ```
//!
//! A position byte packs a cell as `row * 10 + col`. The packing relies on the
//! board having fewer than ten columns and is not meant for other geometries.
//!
//! Encoding and decoding are pure; no I/O happens here.

use std::fmt;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::types::{Position, COLS};

const _: () = assert!(COLS < 10, "position byte packing needs fewer than 10 columns");

/// Longest frame on the wire (opcode + position)
pub const MAX_FRAME_LEN: usize = 2;

/// Encoded frame, never heap allocated
pub type Frame = ArrayVec<u8, MAX_FRAME_LEN>;

/// One-byte message identifiers. Values are fixed by the catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    StartGame = 0,
    ClientMove = 1,
    ServerMove = 2,
    BadMove = 3,
    GameWonClient = 4,
    GameWonOpponent = 5,
    GameTied = 6,
    PlayAgain = 7,
    CloseConnection = 8,
}

impl Opcode {
    pub const ALL: [Opcode; 9] = [
        Opcode::StartGame,
        Opcode::ClientMove,
        Opcode::ServerMove,
        Opcode::BadMove,
        Opcode::GameWonClient,
        Opcode::GameWonOpponent,
        Opcode::GameTied,
        Opcode::PlayAgain,
        Opcode::CloseConnection,
    ];

    /// Look up an opcode byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.get(byte as usize).copied()
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Number of payload bytes that follow the opcode
    pub fn payload_len(self) -> usize {
        match self {
            Opcode::ClientMove
            | Opcode::ServerMove
            | Opcode::GameWonOpponent
            | Opcode::GameTied => 1,
            Opcode::StartGame
            | Opcode::BadMove
            | Opcode::GameWonClient
            | Opcode::PlayAgain
            | Opcode::CloseConnection => 0,
        }
    }


    pub fn as_str(&self) -> &'static str {
        match self {
            Opcode::StartGame => "start_game",
            Opcode::ClientMove => "client_move",
            Opcode::ServerMove => "server_move",
            Opcode::BadMove => "bad_move",
            Opcode::GameWonClient => "game_won_client",
            Opcode::GameWonOpponent => "game_won_opponent",
            Opcode::GameTied => "game_tied",
            Opcode::PlayAgain => "play_again",
            Opcode::CloseConnection => "close_connection",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte).ok_or(DecodeError::UnknownOpcode(byte))
    }
}

/// Decode failures. A failed decode never yields a partial message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty frame")]
    Empty,
    #[error("unknown opcode 0x{0:02x}")]
    UnknownOpcode(u8),
    #[error("{opcode} frame truncated: expected {expected} bytes, got {got}")]
    Truncated {
        opcode: Opcode,
        expected: usize,
        got: usize,
    },
    #[error("{opcode} frame has {extra} trailing bytes")]
    TrailingBytes { opcode: Opcode, extra: usize },
    #[error("position byte {0} is off the board")]
    InvalidPosition(u8),
}

/// A protocol message: an opcode and, for some opcodes, one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// Match (re)initialized; the client rebuilds an empty board
    StartGame,
    /// Client claims the cell its gravity drop resolved to
    ClientMove(Position),
    /// Responder's counter-move
    ServerMove(Position),
    /// The claimed move was illegal
    BadMove,
    /// The client's last move completed four in a row
    GameWonClient,
    /// The responder's move (carried) completed four in a row
    GameWonOpponent(Position),
    /// Board filled with no winner; carries the final responder cell
    GameTied(Position),
    /// Client asks for a rematch
    PlayAgain,
    /// Client is ending the session
    CloseConnection,
}

impl Message {
    pub fn opcode(&self) -> Opcode {
        match self {
            Message::StartGame => Opcode::StartGame,
            Message::ClientMove(_) => Opcode::ClientMove,
            Message::ServerMove(_) => Opcode::ServerMove,
            Message::BadMove => Opcode::BadMove,
            Message::GameWonClient => Opcode::GameWonClient,
            Message::GameWonOpponent(_) => Opcode::GameWonOpponent,
            Message::GameTied(_) => Opcode::GameTied,
            Message::PlayAgain => Opcode::PlayAgain,
            Message::CloseConnection => Opcode::CloseConnection,
        }
    }

    /// Position payload, if the opcode carries one
    pub fn position(&self) -> Option<Position> {
        match *self {
            Message::ClientMove(p)
            | Message::ServerMove(p)
            | Message::GameWonOpponent(p)
            | Message::GameTied(p) => Some(p),
            Message::StartGame
            | Message::BadMove
            | Message::GameWonClient
            | Message::PlayAgain
            | Message::CloseConnection => None,
        }
    }

    /// Encode to wire format
    pub fn encode(&self) -> Frame {
        let mut frame = Frame::new();
        frame.push(self.opcode().as_byte());
        if let Some(pos) = self.position() {
            frame.push(encode_position(pos));
        }
        frame
    }

    /// Decode exactly one frame. The slice must hold the whole frame and nothing else.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (&head, payload) = bytes.split_first().ok_or(DecodeError::Empty)?;
        let opcode = Opcode::try_from(head)?;

        let expected = opcode.payload_len();
        if payload.len() < expected {
            return Err(DecodeError::Truncated {
                opcode,
                expected: 1 + expected,
                got: bytes.len(),
            });
        }
        if payload.len() > expected {
            return Err(DecodeError::TrailingBytes {
                opcode,
                extra: payload.len() - expected,
            });
        }

        let position = || decode_position(payload[0]);
        let msg = match opcode {
            Opcode::StartGame => Message::StartGame,
            Opcode::ClientMove => Message::ClientMove(position()?),
            Opcode::ServerMove => Message::ServerMove(position()?),
            Opcode::BadMove => Message::BadMove,
            Opcode::GameWonClient => Message::GameWonClient,
            Opcode::GameWonOpponent => Message::GameWonOpponent(position()?),
            Opcode::GameTied => Message::GameTied(position()?),
            Opcode::PlayAgain => Message::PlayAgain,
            Opcode::CloseConnection => Message::CloseConnection,
        };
        Ok(msg)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position() {
            Some(pos) => write!(f, "{} {}", self.opcode(), pos),
            None => write!(f, "{}", self.opcode()),
        }
    }
}

/// Pack a position as `row * 10 + col`
pub fn encode_position(pos: Position) -> u8 {
    pos.row() * 10 + pos.col()
}

/// Unpack a position byte, rejecting cells off the board
pub fn decode_position(byte: u8) -> Result<Position, DecodeError> {
    Position::new(byte / 10, byte % 10).ok_or(DecodeError::InvalidPosition(byte))
}
