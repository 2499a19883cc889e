//! Terminal Connect Four client (default binary).
//!
//! Screens: host entry, the board while a match is in progress, and the
//! rematch prompt. Session calls run on a tokio runtime via `block_on`; while a
//! request is outstanding the loop is parked, so no new move can be issued.

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;

use connect_four::input::{handle_key_event, handle_text_key, TextEdit};
use connect_four::protocol::{
    connect, parse_host_input, ClientConfig, ConnectError, GameSession, MoveReport, RematchReport,
    SessionError, StreamConnection,
};
use connect_four::term::{
    FrameBuffer, GameView, Screen, Tally, TerminalRenderer, ViewModel, Viewport,
};
use connect_four::types::{Intent, Outcome, COLS};

type Session = GameSession<StreamConnection<TcpStream>>;

const SERVER_NOT_FOUND: &str = "Could not find server.";
const COMMUNICATION_PROBLEM: &str = "Communication problem occurred.";
const INVALID_ADDRESS: &str = "Not a valid IPv4 address.";
const INVALID_MOVE: &str = "Invalid move.";
const CONNECTING: &str = "Connecting...";

/// Longest dotted quad, "255.255.255.255"
const MAX_HOST_LEN: usize = 15;

enum Phase {
    Connect,
    Playing { session: Session, cursor: u8 },
    Rematch { session: Session, outcome: Outcome },
}

struct App {
    config: ClientConfig,
    host: String,
    phase: Phase,
    tally: Tally,
    status: Option<&'static str>,
    waiting: bool,
    last_error: Option<String>,
}

/// Terminal side of the loop: view, framebuffer and renderer.
struct Frame {
    term: TerminalRenderer,
    view: GameView,
    fb: FrameBuffer,
}

impl Frame {
    fn draw(&mut self, app: &App) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        self.view
            .render_into(&app.view_model(), Viewport::new(w, h), &mut self.fb);
        self.term.draw(&self.fb)
    }
}

enum OpenError {
    Unreachable(ConnectError),
    Session(SessionError),
}

async fn open_session(config: &ClientConfig) -> Result<Session, OpenError> {
    let conn = connect(config).await.map_err(OpenError::Unreachable)?;
    let mut session = GameSession::new(conn);
    session.await_start().await.map_err(OpenError::Session)?;
    Ok(session)
}

impl App {
    fn new(config: ClientConfig) -> Self {
        Self {
            host: config.host.clone(),
            config,
            phase: Phase::Connect,
            tally: Tally::default(),
            status: None,
            waiting: false,
            last_error: None,
        }
    }

    fn view_model(&self) -> ViewModel<'_> {
        let screen = match &self.phase {
            Phase::Connect => Screen::Connect { host: &self.host },
            Phase::Playing { session, cursor } => Screen::Playing {
                board: session.board(),
                cursor: *cursor,
                tokens_left: session.tokens_left(),
                waiting: self.waiting,
            },
            Phase::Rematch { session, outcome } => Screen::Rematch {
                board: session.board(),
                outcome: *outcome,
            },
        };
        ViewModel {
            screen,
            tally: self.tally,
            status: self.status,
        }
    }

    fn take_phase(&mut self) -> Phase {
        std::mem::replace(&mut self.phase, Phase::Connect)
    }

    /// Returns `false` when the user asked to quit.
    fn handle_key(&mut self, frame: &mut Frame, rt: &Runtime, key: KeyEvent) -> Result<bool> {
        if let Phase::Connect = self.phase {
            return self.on_text_key(frame, rt, key);
        }
        match handle_key_event(key) {
            Some(Intent::Quit) => Ok(false),
            Some(intent) => {
                self.on_intent(frame, rt, intent)?;
                Ok(true)
            }
            None => Ok(true),
        }
    }

    fn on_text_key(&mut self, frame: &mut Frame, rt: &Runtime, key: KeyEvent) -> Result<bool> {
        match handle_text_key(key) {
            Some(TextEdit::Insert(c)) if self.host.len() < MAX_HOST_LEN => self.host.push(c),
            Some(TextEdit::Backspace) => {
                self.host.pop();
            }
            Some(TextEdit::Submit) => self.connect(frame, rt)?,
            Some(TextEdit::Cancel) => return Ok(false),
            _ => {}
        }
        Ok(true)
    }

    fn connect(&mut self, frame: &mut Frame, rt: &Runtime) -> Result<()> {
        let Some(ip) = parse_host_input(&self.host) else {
            self.status = Some(INVALID_ADDRESS);
            return Ok(());
        };

        self.status = Some(CONNECTING);
        frame.draw(self)?;

        let mut config = self.config.clone();
        config.host = ip.to_string();
        self.status = match rt.block_on(open_session(&config)) {
            Ok(session) => {
                self.phase = Phase::Playing {
                    session,
                    cursor: COLS / 2,
                };
                None
            }
            Err(OpenError::Unreachable(e)) => {
                self.last_error = Some(e.to_string());
                Some(SERVER_NOT_FOUND)
            }
            Err(OpenError::Session(e)) => {
                self.last_error = Some(e.to_string());
                Some(COMMUNICATION_PROBLEM)
            }
        };
        Ok(())
    }

    fn on_intent(&mut self, frame: &mut Frame, rt: &Runtime, intent: Intent) -> Result<()> {
        match &mut self.phase {
            Phase::Playing { cursor, .. } => {
                let column = match intent {
                    Intent::CursorLeft => {
                        *cursor = cursor.saturating_sub(1);
                        return Ok(());
                    }
                    Intent::CursorRight => {
                        *cursor = (*cursor + 1).min(COLS - 1);
                        return Ok(());
                    }
                    Intent::SelectColumn(column) => {
                        *cursor = column;
                        column
                    }
                    Intent::Drop => *cursor,
                    _ => return Ok(()),
                };
                self.drop_token(frame, rt, column)
            }
            Phase::Rematch { .. } => match intent {
                Intent::Accept => self.answer_rematch(rt, true),
                Intent::Decline => self.answer_rematch(rt, false),
                _ => Ok(()),
            },
            Phase::Connect => Ok(()),
        }
    }

    fn drop_token(&mut self, frame: &mut Frame, rt: &Runtime, column: u8) -> Result<()> {
        self.status = None;
        self.waiting = true;
        frame.draw(self)?;

        let Phase::Playing { session, .. } = &mut self.phase else {
            return Ok(());
        };
        let result = rt.block_on(session.attempt_move(column));
        self.waiting = false;

        match result {
            Ok(MoveReport::Invalid(_)) => self.status = Some(INVALID_MOVE),
            Ok(MoveReport::Continued { .. }) => {}
            Ok(MoveReport::Concluded { outcome, .. }) => {
                self.tally.record(outcome);
                if let Phase::Playing { mut session, .. } = self.take_phase() {
                    match session.prompt_rematch() {
                        Ok(()) => self.phase = Phase::Rematch { session, outcome },
                        Err(e) => self.abandon(rt, Some(session), e),
                    }
                }
            }
            Err(e) if !e.is_fatal() => {}
            Err(e) => {
                let session = self.take_session();
                self.abandon(rt, session, e);
            }
        }
        Ok(())
    }

    fn answer_rematch(&mut self, rt: &Runtime, accept: bool) -> Result<()> {
        let Phase::Rematch { session, .. } = &mut self.phase else {
            return Ok(());
        };
        let result = rt.block_on(session.respond_to_rematch(accept));
        match result {
            Ok(RematchReport::Started) => {
                if let Some(session) = self.take_session() {
                    self.phase = Phase::Playing {
                        session,
                        cursor: COLS / 2,
                    };
                }
                self.status = None;
            }
            Ok(RematchReport::Declined) => {
                self.take_phase();
                self.status = None;
            }
            Err(e) if !e.is_fatal() => {}
            Err(e) => {
                let session = self.take_session();
                self.abandon(rt, session, e);
            }
        }
        Ok(())
    }

    fn take_session(&mut self) -> Option<Session> {
        match self.take_phase() {
            Phase::Playing { session, .. } | Phase::Rematch { session, .. } => Some(session),
            Phase::Connect => None,
        }
    }

    /// Drop back to the connect screen. The tally keeps settled outcomes only.
    fn abandon(&mut self, rt: &Runtime, session: Option<Session>, err: SessionError) {
        if let Some(mut session) = session {
            rt.block_on(session.disconnect());
        }
        self.phase = Phase::Connect;
        self.last_error = Some(err.to_string());
        self.status = Some(COMMUNICATION_PROBLEM);
    }

    fn shutdown(&mut self, rt: &Runtime) {
        if let Some(mut session) = self.take_session() {
            rt.block_on(session.disconnect());
        }
    }
}

fn main() -> Result<()> {
    let config = ClientConfig::from_env();
    let rt = Runtime::new()?;
    let mut app = App::new(config);

    let mut frame = Frame {
        term: TerminalRenderer::new(),
        view: GameView::default(),
        fb: FrameBuffer::new(0, 0),
    };
    frame.term.enter()?;

    let result = run(&mut frame, &rt, &mut app);

    // Always try to restore terminal state.
    let _ = frame.term.exit();
    app.shutdown(&rt);

    let tally = app.tally;
    println!(
        "[Client] {} matches: {} wins, {} losses, {} ties",
        tally.played(),
        tally.wins,
        tally.losses,
        tally.ties
    );
    if let Some(err) = &app.last_error {
        eprintln!("[Client] last connection error: {}", err);
    }
    result
}

fn run(frame: &mut Frame, rt: &Runtime, app: &mut App) -> Result<()> {
    loop {
        frame.draw(app)?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !app.handle_key(frame, rt, key)? {
                    return Ok(());
                }
            }
            Event::Resize(_, _) => frame.term.invalidate(),
            _ => {}
        }
    }
}
