//! Closed-loop tests: a real responder on an ephemeral port, real sessions over TCP.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use connect_four::core::Board;
use connect_four::protocol::{
    connect, run_responder, ClientConfig, ConnectError, GameSession, MoveReport, RematchReport,
    ResponderConfig, SessionState, StreamConnection, Strategy,
};
use connect_four::types::{Outcome, Position};

/// Client columns for a drawn game; see `RESPONDER_TIE`.
const CLIENT_TIE: [u8; 21] = [
    0, 0, 0, 1, 1, 1, 2, 2, 2, 4, 3, 3, 3, 4, 4, 5, 5, 5, 6, 6, 6,
];
/// Responder replies that, with `CLIENT_TIE`, fill the board without a line of four.
const RESPONDER_TIE: [u8; 21] = [
    0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6,
];

/// Plays a fixed list of columns, then gives up.
struct Scripted(VecDeque<u8>);

impl Strategy for Scripted {
    fn choose_column(&mut self, _board: &Board) -> Option<u8> {
        self.0.pop_front()
    }
}

fn scripted(columns: &'static [u8]) -> impl Fn() -> Scripted {
    move || Scripted(columns.iter().copied().collect())
}

async fn spawn_responder(columns: &'static [u8]) -> SocketAddr {
    let config = ResponderConfig {
        port: 0,
        ..ResponderConfig::default()
    };
    let (ready_tx, ready_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = run_responder(config, scripted(columns), Some(ready_tx)).await;
    });
    tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("timeout waiting for responder")
        .expect("responder ready")
}

fn client_config(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        receive_timeout: Some(Duration::from_secs(2)),
        ..ClientConfig::default()
    }
}

async fn start_session(
    config: &ClientConfig,
) -> GameSession<StreamConnection<TcpStream>> {
    let conn = connect(config).await.expect("connect to responder");
    let mut session = GameSession::new(conn);
    session.await_start().await.expect("StartGame");
    assert_eq!(session.state(), SessionState::InProgress);
    session
}

#[tokio::test]
async fn test_four_in_column_wins_for_client() {
    let addr = spawn_responder(&[6, 6, 6]).await;
    let mut session = start_session(&client_config(addr)).await;

    for _ in 0..3 {
        let report = session.attempt_move(0).await.unwrap();
        assert!(matches!(report, MoveReport::Continued { .. }));
    }
    let report = session.attempt_move(0).await.unwrap();
    assert_eq!(
        report,
        MoveReport::Concluded {
            outcome: Outcome::ClientWin,
            client: Position::new(2, 0).unwrap(),
            opponent: None,
        }
    );
    assert_eq!(session.tokens_left(), 18);

    session.disconnect().await;
}

#[tokio::test]
async fn test_full_board_ends_in_a_tie() {
    let addr = spawn_responder(&RESPONDER_TIE).await;
    let mut session = start_session(&client_config(addr)).await;

    let (last, rest) = CLIENT_TIE.split_last().unwrap();
    for &column in rest {
        let report = session.attempt_move(column).await.unwrap();
        assert!(
            matches!(report, MoveReport::Continued { .. }),
            "column {} gave {:?}",
            column,
            report
        );
    }

    let report = session.attempt_move(*last).await.unwrap();
    assert_eq!(
        report,
        MoveReport::Concluded {
            outcome: Outcome::Tie,
            client: Position::new(1, 6).unwrap(),
            opponent: Position::new(0, 6),
        }
    );
    assert!(session.board().is_full());
    assert_eq!(session.state(), SessionState::Concluded(Outcome::Tie));

    session.disconnect().await;
}

#[tokio::test]
async fn test_rematch_starts_a_fresh_board() {
    let addr = spawn_responder(&[6, 6, 6, 5]).await;
    let mut session = start_session(&client_config(addr)).await;

    for _ in 0..4 {
        session.attempt_move(1).await.unwrap();
    }
    assert_eq!(session.state(), SessionState::Concluded(Outcome::ClientWin));

    session.prompt_rematch().unwrap();
    let rematch = session.respond_to_rematch(true).await.unwrap();
    assert_eq!(rematch, RematchReport::Started);
    assert_eq!(session.board().occupied(), 0);

    // The responder keeps its strategy across matches: next column is 5.
    let report = session.attempt_move(3).await.unwrap();
    assert_eq!(
        report,
        MoveReport::Continued {
            client: Position::new(5, 3).unwrap(),
            opponent: Position::new(5, 5).unwrap(),
        }
    );

    session.disconnect().await;
    assert_eq!(session.state(), SessionState::Terminated);
}

#[tokio::test]
async fn test_responder_rejects_floating_claims() {
    let addr = spawn_responder(&[]).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let mut byte = [0u8; 1];
    stream.read_exact(&mut byte).await.unwrap();
    assert_eq!(byte, [0]);

    // (2, 4) is mid-air on an empty board.
    stream.write_all(&[1, 24]).await.unwrap();
    stream.read_exact(&mut byte).await.unwrap();
    assert_eq!(byte, [3]);

    // A responder-only opcode ends the connection.
    stream.write_all(&[2, 53]).await.unwrap();
    let n = tokio::time::timeout(Duration::from_secs(2), stream.read(&mut byte))
        .await
        .expect("timeout waiting for close")
        .unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_unreachable_server_is_a_connect_error() {
    // Grab a free port, then release it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ClientConfig {
        port,
        connect_timeout: Duration::from_secs(2),
        ..ClientConfig::default()
    };

    let err = connect(&config).await.unwrap_err();
    assert!(matches!(
        err,
        ConnectError::Io { .. } | ConnectError::Timeout { .. }
    ));
}

#[derive(Debug, Deserialize)]
struct LoggedFrame {
    dir: String,
    opcode: String,
    bytes: Vec<u8>,
}

#[tokio::test]
async fn test_client_wire_log_records_traffic() {
    let path = std::env::temp_dir().join(format!("c4-wire-{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let addr = spawn_responder(&[6]).await;
    let config = ClientConfig {
        log_path: Some(path.display().to_string()),
        ..client_config(addr)
    };
    let mut session = start_session(&config).await;
    session.attempt_move(0).await.unwrap();

    // rx start_game, tx client_move, rx server_move
    let mut frames = Vec::new();
    for _ in 0..100 {
        let text = std::fs::read_to_string(&path).unwrap_or_default();
        frames = text
            .lines()
            .filter_map(|line| serde_json::from_str::<LoggedFrame>(line).ok())
            .collect();
        if frames.len() >= 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let _ = std::fs::remove_file(&path);

    assert_eq!(frames.len(), 3, "{:?}", frames);
    assert_eq!(
        (frames[0].dir.as_str(), frames[0].opcode.as_str()),
        ("rx", "start_game")
    );
    assert_eq!(frames[1].dir, "tx");
    assert_eq!(frames[1].bytes, vec![1, 50]);
    assert_eq!(frames[2].opcode, "server_move");
    assert_eq!(frames[2].bytes, vec![2, 56]);
}
