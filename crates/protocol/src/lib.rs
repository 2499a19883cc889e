//! Protocol module - client/responder exchange over a byte stream
//!
//! This module carries Connect Four matches between the human's client and a
//! remote responder that decides the opponent's moves.
//!
//! # Protocol Overview
//!
//! The protocol is **binary and strictly half-duplex**:
//!
//! 1. **Connection**: Client connects to the responder (default: 127.0.0.1:50000)
//! 2. **Greeting**: Responder sends `StartGame` as soon as it accepts
//! 3. **Turns**: Client sends `ClientMove`, responder answers with exactly one reply
//! 4. **Rematch**: After a terminal reply, client may send `PlayAgain` and get `StartGame`
//! 5. **Teardown**: Client sends `CloseConnection` (best effort) and drops the stream
//!
//! # Message Types
//!
//! | Opcode | Byte | Direction | Payload |
//! |--------|------|-----------|---------|
//! | StartGame | 0 | responder → client | - |
//! | ClientMove | 1 | client → responder | position |
//! | ServerMove | 2 | responder → client | position |
//! | BadMove | 3 | responder → client | - |
//! | GameWonClient | 4 | responder → client | - |
//! | GameWonOpponent | 5 | responder → client | position |
//! | GameTied | 6 | responder → client | position |
//! | PlayAgain | 7 | client → responder | - |
//! | CloseConnection | 8 | client → responder | - |
//!
//! # Environment Variables
//!
//! - `C4_HOST` / `C4_PORT`: responder address used by the client
//! - `C4_CONNECT_TIMEOUT_MS`, `C4_RECEIVE_TIMEOUT_MS`: client deadlines
//!   (`0` disables the receive deadline)
//! - `C4_LOG_PATH`: client wire log (JSON lines)
//! - `C4_RESPONDER_HOST` / `C4_RESPONDER_PORT`: responder listen address
//! - `C4_RESPONDER_TIMEOUT_MS`: optional idle deadline per client (unset or `0`: none)
//! - `C4_RESPONDER_LOG_PATH`: responder wire log (JSON lines)
//!
//! # Implementation
//!
//! - [`codec`]: message catalog and byte layout (pure)
//! - [`connection`]: the `Connection` trait and its tokio stream implementation
//! - [`session`]: the client state machine driving one connection
//! - [`responder`]: TCP responder with an authoritative board
//! - [`strategy`]: pluggable opponent move selection

pub mod codec;
pub mod config;
pub mod connection;
pub mod responder;
pub mod session;
pub mod strategy;
pub mod wire_log;

pub use connect_four_core as core;
pub use connect_four_types as types;

// Re-export protocol types for convenience
pub use codec::{decode_position, encode_position, DecodeError, Message, Opcode};
pub use config::{check_tcp_listen_available, parse_host_input, ClientConfig, ResponderConfig};
pub use connection::{connect, ConnectError, Connection, ConnectionError, StreamConnection};
pub use responder::{run_responder, Referee, RefereeError, Verdict};
pub use session::{GameSession, InvalidMove, MoveReport, RematchReport, SessionError, SessionState};
pub use strategy::{Greedy, Strategy};
pub use wire_log::{WireDirection, WireLog, WireRecord};
