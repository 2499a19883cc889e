//! Reference responder - the authoritative side of the protocol.
//!
//! Each accepted client gets its own task, board and [`Strategy`]. The
//! responder validates every claimed move against its own board, so a client
//! can never place a token somewhere gravity would not put it.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use crate::codec::{Message, Opcode};
use crate::config::ResponderConfig;
use crate::connection::{Connection, ConnectionError, StreamConnection};
use crate::core::{Board, MoveError};
use crate::strategy::Strategy;
use crate::types::{Outcome, Owner};
use crate::wire_log::WireLog;

#[derive(Debug, Error)]
pub enum RefereeError {
    #[error("client sent responder-only message {0}")]
    ProtocolViolation(Opcode),
    #[error("strategy produced no legal column")]
    NoMove,
    #[error("strategy chose an illegal column: {0}")]
    IllegalStrategyMove(MoveError),
}

/// What to do after handling one client message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Reply(Message),
    Close,
}

/// Responder-side match logic, free of I/O.
pub struct Referee<S> {
    board: Board,
    strategy: S,
}

impl<S: Strategy> Referee<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            board: Board::new(),
            strategy,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Reset the board and produce the StartGame greeting
    pub fn start(&mut self) -> Message {
        self.board.clear();
        Message::StartGame
    }

    pub fn handle(&mut self, msg: Message) -> Result<Verdict, RefereeError> {
        let reply = match msg {
            Message::ClientMove(claimed) => {
                if self.board.landing_position(claimed.col()) != Some(claimed) {
                    return Ok(Verdict::Reply(Message::BadMove));
                }
                let placed = match self.board.drop_token(claimed.col(), Owner::Client) {
                    Ok(pos) => pos,
                    Err(_) => return Ok(Verdict::Reply(Message::BadMove)),
                };
                match self.board.outcome_after(placed) {
                    Some(Outcome::Tie) => Message::GameTied(placed),
                    Some(_) => Message::GameWonClient,
                    None => self.counter_move()?,
                }
            }
            Message::PlayAgain => self.start(),
            Message::CloseConnection => return Ok(Verdict::Close),
            Message::StartGame
            | Message::ServerMove(_)
            | Message::BadMove
            | Message::GameWonClient
            | Message::GameWonOpponent(_)
            | Message::GameTied(_) => return Err(RefereeError::ProtocolViolation(msg.opcode())),
        };
        Ok(Verdict::Reply(reply))
    }

    fn counter_move(&mut self) -> Result<Message, RefereeError> {
        let column = self
            .strategy
            .choose_column(&self.board)
            .ok_or(RefereeError::NoMove)?;
        let placed = self
            .board
            .drop_token(column, Owner::Opponent)
            .map_err(RefereeError::IllegalStrategyMove)?;

        Ok(if self.board.check_win(placed) {
            Message::GameWonOpponent(placed)
        } else if self.board.is_full() {
            Message::GameTied(placed)
        } else {
            Message::ServerMove(placed)
        })
    }
}

/// Start the TCP responder.
///
/// `make_strategy` builds one strategy per client. The bound address is sent
/// on `ready_tx` once the listener is up (useful with port 0).
pub async fn run_responder<F, S>(
    config: ResponderConfig,
    make_strategy: F,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()>
where
    F: Fn() -> S,
    S: Strategy + 'static,
{
    let wire_log = config
        .log_path
        .as_ref()
        .map(|path| WireLog::spawn(path, "responder"));

    let listener = TcpListener::bind(config.addr()).await?;
    let bound = listener.local_addr()?;
    println!("[Responder] listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;

    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        println!("[Responder] Client {} connected from {}", client_id, addr);

        let _ = socket.set_nodelay(true);
        let conn = StreamConnection::new(socket)
            .with_receive_timeout(config.receive_timeout)
            .with_wire_log(wire_log.as_ref().map(|log| log.for_peer(&addr.to_string())));
        let referee = Referee::new(make_strategy());

        tokio::spawn(async move {
            if let Err(e) = serve_client(conn, referee).await {
                eprintln!("[Responder] Client {} error: {}", client_id, e);
            }
            println!("[Responder] Client {} disconnected", client_id);
        });
    }
}

/// Play matches with one client until it closes the connection.
async fn serve_client<S: Strategy>(
    mut conn: StreamConnection<TcpStream>,
    mut referee: Referee<S>,
) -> anyhow::Result<()> {
    conn.send(referee.start()).await?;

    loop {
        let msg = match conn.receive().await {
            Ok(msg) => msg,
            Err(ConnectionError::Closed) => break,
            Err(e) => return Err(e.into()),
        };

        match referee.handle(msg)? {
            Verdict::Reply(reply) => conn.send(reply).await?,
            Verdict::Close => break,
        }
    }

    Ok(())
}
