use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tracing::{info, warn};

use tennis_tactics::catalog::{self, MatchInfo, MatchStatus};
use tennis_tactics::config::AppConfig;
use tennis_tactics::logging;
use tennis_tactics::projection::{MatchPlayers, Scoreboard, SetColumn, result_label};
use tennis_tactics::score_line::ScoreDisplay;
use tennis_tactics::scoring::PlayerSlot;
use tennis_tactics::sim_feed::spawn_sim_feed;
use tennis_tactics::simulation::Simulation;
use tennis_tactics::state::{AppState, Delta, LiveSnapshot, Screen, SimCommand, apply_delta};

struct FeedHandle {
    match_id: String,
    cmd_tx: mpsc::Sender<SimCommand>,
    handle: JoinHandle<()>,
}

struct App {
    state: AppState,
    config: AppConfig,
    should_quit: bool,
    delta_tx: mpsc::Sender<Delta>,
    feed: Option<FeedHandle>,
}

impl App {
    fn new(config: AppConfig, delta_tx: mpsc::Sender<Delta>) -> Self {
        Self {
            state: AppState::new(catalog::sample_matches(), config.momentum_count),
            config,
            should_quit: false,
            delta_tx,
            feed: None,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let on_match = matches!(self.state.screen, Screen::Match { .. });
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('d') | KeyCode::Enter if !on_match => self.open_selected(),
            KeyCode::Char('b') | KeyCode::Esc => {
                self.stop_feed();
                self.state.leave_match();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if on_match {
                    self.state.scroll_feed_down();
                } else {
                    self.state.select_next();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if on_match {
                    self.state.scroll_feed_up();
                } else {
                    self.state.select_prev();
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('s') if on_match => {
                self.send_command(SimCommand::Toggle)
            }
            KeyCode::Char('r') if on_match => self.send_command(SimCommand::Reset),
            KeyCode::Char('f') if on_match => self.state.cycle_feed_filter(),
            KeyCode::Char('a') if on_match => self.state.toggle_auto_scroll(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn open_selected(&mut self) {
        let Some(m) = self.state.selected_match().cloned() else {
            self.state.push_log("[INFO] No match selected");
            return;
        };
        self.stop_feed();
        self.state.enter_match(m.id.clone());
        if m.has_live_feed() {
            self.start_feed(&m);
        }
    }

    fn start_feed(&mut self, m: &MatchInfo) {
        let format = self.config.sim.format_override.unwrap_or(m.format);
        let sim = Simulation::new(m.live_points.clone(), format, self.config.sim.enabled);
        let mut fallback = LiveSnapshot::from_simulation(&m.id, &sim);
        fallback.running = false;

        let (cmd_tx, cmd_rx) = mpsc::channel();
        match spawn_sim_feed(
            m.id.clone(),
            sim,
            self.config.sim.interval,
            self.delta_tx.clone(),
            cmd_rx,
        ) {
            Ok(handle) => {
                info!(match_id = %m.id, "live feed attached");
                self.feed = Some(FeedHandle {
                    match_id: m.id.clone(),
                    cmd_tx,
                    handle,
                });
            }
            Err(err) => {
                warn!(match_id = %m.id, error = %format!("{err:#}"), "live feed unavailable");
                self.state.push_log(format!("[WARN] {err:#}"));
                apply_delta(&mut self.state, Delta::Snapshot(fallback));
            }
        }
    }

    fn stop_feed(&mut self) {
        let Some(feed) = self.feed.take() else {
            return;
        };
        let _ = feed.cmd_tx.send(SimCommand::Shutdown);
        if feed.handle.join().is_err() {
            warn!(match_id = %feed.match_id, "simulation thread panicked");
        }
    }

    fn send_command(&mut self, cmd: SimCommand) {
        let Some(feed) = &self.feed else {
            self.state.push_log("[INFO] No simulation for this match");
            return;
        };
        if feed.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Simulation is no longer running");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    logging::init(&config)?;
    info!(?config, "starting tennis_tactics");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let mut app = App::new(config, tx);
    let res = run_app(&mut terminal, &mut app, rx);
    app.stop_feed();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &app.state.screen {
        Screen::Matches => render_matches(frame, chunks[1], &app.state),
        Screen::Match { .. } => render_match(frame, chunks[1], &app.state, app.config.sim.interval),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        let area = frame.size();
        render_help_overlay(frame, area);
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.open_match() {
        Some(m) => format!("TENNIS TACTICS | {} vs {}", m.p1.name, m.p2.name),
        None => format!("TENNIS TACTICS | Matches ({})", state.matches.len()),
    };
    format!("  (o)  {title}\n  /|\n")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Matches => "Enter/d Open | j/k/↑/↓ Move | ? Help | q Quit".to_string(),
        Screen::Match { .. } => {
            "b/Esc Back | space/s Sim on/off | r Reset | f Set filter | a Auto-scroll | j/k Scroll | ? Help | q Quit".to_string()
        }
    }
}

fn render_matches(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = match_columns();
    render_matches_header(frame, sections[0], &widths);

    let list_area = sections[1];
    if state.matches.is_empty() {
        let empty = Paragraph::new("No matches").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, state.matches.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let m = &state.matches[idx];
        let time = m.start_time.format("%a %d %b %H:%M").to_string();
        let event = format!(
            "{} {} {}",
            catalog::tour_label(m.tour),
            m.tournament_name,
            m.round
        );
        let players = format!("{} vs {}", m.p1.name, m.p2.name);
        let score = m.score.clone().unwrap_or_else(|| "-".to_string());
        let status_style = row_style.fg(status_color(m.status));

        render_cell_text(frame, cols[0], &time, row_style);
        render_cell_text(frame, cols[1], &event, row_style);
        render_cell_text(frame, cols[2], &players, row_style);
        render_cell_text(frame, cols[3], catalog::status_label(m.status), status_style);
        render_cell_text(frame, cols[4], &score, row_style);
    }
}

fn match_columns() -> [Constraint; 5] {
    [
        Constraint::Length(18),
        Constraint::Length(26),
        Constraint::Min(30),
        Constraint::Length(10),
        Constraint::Length(18),
    ]
}

fn render_matches_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths.iter().copied())
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Start (UTC)", style);
    render_cell_text(frame, cols[1], "Event", style);
    render_cell_text(frame, cols[2], "Match", style);
    render_cell_text(frame, cols[3], "Status", style);
    render_cell_text(frame, cols[4], "Score", style);
}

fn render_match(frame: &mut Frame, area: Rect, state: &AppState, interval: Duration) {
    let Some(m) = state.open_match() else {
        let missing = Paragraph::new("Match not found")
            .block(Block::default().title("Match").borders(Borders::ALL));
        frame.render_widget(missing, area);
        return;
    };
    let players = m.players();

    let Some(board) = state.scoreboard() else {
        render_static_match(frame, area, state, m, &players);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(5),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(match_info_lines(m))
            .block(Block::default().title("Match").borders(Borders::ALL)),
        rows[0],
    );

    let running = state.live.as_ref().is_some_and(|l| l.running);
    let scoreboard_title = if board.match_winner.is_some() {
        "Scoreboard | Match complete".to_string()
    } else if running {
        format!(
            "Scoreboard | Simulation ON ({:.1}s)",
            interval.as_secs_f64()
        )
    } else {
        "Scoreboard | Simulation OFF".to_string()
    };
    frame.render_widget(
        Paragraph::new(scoreboard_lines(&board, &players))
            .block(Block::default().title(scoreboard_title).borders(Borders::ALL)),
        rows[1],
    );

    frame.render_widget(
        Paragraph::new(momentum_lines(&board, &players, state.momentum_count)).block(
            Block::default()
                .title("Momentum (bold = won on serve)")
                .borders(Borders::ALL),
        ),
        rows[2],
    );

    frame.render_widget(
        Paragraph::new(set_table_lines(
            &players,
            &board.columns,
            board.match_winner,
            true,
        ))
        .block(Block::default().title("Score By Set").borders(Borders::ALL)),
        rows[3],
    );

    render_feed(frame, rows[4], state);

    frame.render_widget(
        Paragraph::new(console_text(state))
            .block(Block::default().title("Console").borders(Borders::ALL)),
        rows[5],
    );
}

fn render_static_match(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    m: &MatchInfo,
    players: &MatchPlayers,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(match_info_lines(m))
            .block(Block::default().title("Match").borders(Borders::ALL)),
        rows[0],
    );

    let lines = match ScoreDisplay::from_score(m.score.as_deref()) {
        ScoreDisplay::Sets(sets) => {
            let columns: Vec<SetColumn> = sets.iter().map(SetColumn::from_completed).collect();
            let finished = m.status == MatchStatus::Finished;
            let winner = if finished { m.winner_slot() } else { None };
            set_table_lines(players, &columns, winner, finished)
        }
        ScoreDisplay::Unavailable { raw: Some(raw) } => vec![Line::from(format!(
            "Score not in a parseable format yet: {raw}"
        ))],
        ScoreDisplay::Unavailable { raw: None } => vec![Line::from(match m.status {
            MatchStatus::Upcoming => "Scheduled (no score yet).",
            MatchStatus::Live => "Live score will appear here.",
            MatchStatus::Finished => "Final score unavailable.",
        })],
    };
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title("Score By Set").borders(Borders::ALL)),
        rows[1],
    );

    frame.render_widget(
        Paragraph::new(console_text(state))
            .block(Block::default().title("Console").borders(Borders::ALL)),
        rows[2],
    );
}

fn match_info_lines(m: &MatchInfo) -> Vec<Line<'static>> {
    let mut event = format!(
        "{} • {} • {}",
        catalog::tour_label(m.tour),
        m.tournament_name,
        m.round
    );
    if let Some(court) = &m.court {
        event.push_str(&format!(" • {court}"));
    }
    vec![
        Line::from(vec![
            Span::styled(
                catalog::status_label(m.status),
                Style::default().fg(status_color(m.status)),
            ),
            Span::raw("  "),
            Span::raw(event),
        ]),
        Line::from(Span::styled(
            m.start_time.format("%a %d %b %Y %H:%M (UTC)").to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn scoreboard_lines(board: &Scoreboard, players: &MatchPlayers) -> Vec<Line<'static>> {
    let mut mini = format!(
        "Set {} • Games {}-{}",
        board.set_number, board.games.p1, board.games.p2
    );
    if board.game.tiebreak {
        mini.push_str(&format!(" • TB {}-{}", board.game.p1, board.game.p2));
    }
    if let Some(call) = board.game.call_label(players) {
        mini.push_str(&format!(" • {call}"));
    }
    mini.push_str(&format!(" • Server: {}", players.name(board.server)));

    let game_title = if board.game.tiebreak {
        "Tiebreak"
    } else {
        "Game"
    };
    let header = format!("{:<28}{:>10}{:>8}{:>8}", "", game_title, "Games", "Sets");

    let mut lines = vec![
        Line::from(mini),
        Line::from(Span::styled(
            header,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    for slot in PlayerSlot::BOTH {
        let dot = if board.server == slot && board.match_winner.is_none() {
            Span::styled("● ", Style::default().fg(Color::Green))
        } else {
            Span::raw("  ")
        };
        lines.push(Line::from(vec![
            dot,
            Span::raw(format!("{:<26}", truncate(players.name(slot), 26))),
            Span::styled(
                format!("{:>10}", board.game.get(slot)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{:>8}{:>8}", board.games[slot], board.sets[slot])),
        ]));
    }
    lines
}

fn momentum_lines(
    board: &Scoreboard,
    players: &MatchPlayers,
    window: usize,
) -> Vec<Line<'static>> {
    let summary = format!(
        "last {window} points • {} {} • {} {}",
        players.p1, board.momentum.won.p1, players.p2, board.momentum.won.p2
    );

    let dots: Vec<Span<'static>> = if board.momentum.dots.is_empty() {
        vec![Span::styled(
            "No points yet.",
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        board
            .momentum
            .dots
            .iter()
            .map(|dot| {
                let mut style = Style::default().fg(slot_color(dot.winner));
                if dot.won_on_serve() {
                    style = style.add_modifier(Modifier::BOLD);
                }
                Span::styled("● ", style)
            })
            .collect()
    };

    vec![Line::from(summary), Line::from(dots)]
}

fn set_table_lines(
    players: &MatchPlayers,
    columns: &[SetColumn],
    winner: Option<PlayerSlot>,
    show_result: bool,
) -> Vec<Line<'static>> {
    let mut header = format!("{:<28}", "Player");
    for idx in 0..columns.len() {
        header.push_str(&format!("{:>7}", format!("S{}", idx + 1)));
    }
    if show_result {
        header.push_str(&format!("{:>10}", "Result"));
    }

    let mut lines = vec![Line::from(Span::styled(
        header,
        Style::default().fg(Color::DarkGray),
    ))];

    for slot in PlayerSlot::BOTH {
        let is_winner = winner == Some(slot);
        let row_style = if is_winner {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        let mut spans = vec![Span::styled(
            format!("{:<28}", truncate(players.name(slot), 27)),
            row_style,
        )];
        for col in columns {
            let mut style = Style::default();
            if col.completed && col.leader == Some(slot) {
                style = style.add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(format!("{:>7}", col.get(slot).to_string()), style));
        }
        if show_result {
            let result = result_label(winner, slot);
            spans.push(Span::styled(format!("{result:>10}"), row_style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn render_feed(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = state.feed_rows();
    let title = format!(
        "Point By Point | {} | Auto-scroll: {}",
        state.feed_filter.label(),
        if state.auto_scroll { "ON" } else { "OFF" }
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new("No points for this filter.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let visible = area.height.saturating_sub(2) as usize;
    let (start, end) = if state.auto_scroll {
        (rows.len().saturating_sub(visible), rows.len())
    } else {
        let start = state.feed_scroll.min(rows.len().saturating_sub(visible));
        (start, (start + visible).min(rows.len()))
    };

    let lines: Vec<Line<'static>> = rows[start..end]
        .iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", row.time_utc),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("{:<28}", row.position)),
                Span::styled(
                    format!("{:<20}", truncate(&row.winner_name, 19)),
                    Style::default().fg(slot_color(row.winner)),
                ),
                Span::raw(format!("{:<18}", row.label)),
                Span::styled(
                    format!("srv {}", row.server_name),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_color(status: MatchStatus) -> Color {
    match status {
        MatchStatus::Live => Color::Red,
        MatchStatus::Finished => Color::Green,
        MatchStatus::Upcoming => Color::Gray,
    }
}

fn slot_color(slot: PlayerSlot) -> Color {
    match slot {
        PlayerSlot::P1 => Color::Green,
        PlayerSlot::P2 => Color::Cyan,
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Tennis Tactics - Help",
        "",
        "Matches:",
        "  j/k or ↑/↓   Move",
        "  Enter / d    Open match",
        "",
        "Match:",
        "  space / s    Start/stop simulation",
        "  r            Reset to recorded points",
        "  f            Cycle set filter",
        "  a            Toggle auto-scroll",
        "  j/k          Scroll point feed",
        "  b / Esc      Back",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
