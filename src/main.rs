use std::io;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Wrap};

use sixn_terminal::chart::{self, ChartMetric};
use sixn_terminal::config::DashboardConfig;
use sixn_terminal::console_log;
use sixn_terminal::mock_feed::{self, ProviderDelays};
use sixn_terminal::model::{FormBand, Player, Team, Trend, format_cost, format_cost_change};
use sixn_terminal::repository::StatsRepository;
use sixn_terminal::state::{AppState, Delta, ProviderCommand, Screen, apply_delta};
use sixn_terminal::synth;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    requested_performance: Option<u32>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            requested_performance: None,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.state.search_active = false,
                KeyCode::Backspace => self.state.pop_search_char(),
                KeyCode::Char(ch) => self.state.push_search_char(ch),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => {
                self.state.screen = self.state.screen.next();
                if self.state.screen == Screen::Insights {
                    self.request_insights();
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('/') => self.state.search_active = true,
            KeyCode::Esc => {
                if !self.state.search.is_empty() {
                    self.state.search.clear();
                    self.state.resync_selection();
                }
            }
            KeyCode::Char('a') => self.state.select_all_teams(),
            KeyCode::Char('c') => self.state.toggle_chart_metric(),
            KeyCode::Char(ch @ '1'..='6') => {
                let idx = (ch as u8 - b'1') as usize;
                if let Some(team) = Team::from_index(idx) {
                    self.state.toggle_team(team);
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn send(&mut self, cmd: ProviderCommand) -> bool {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Provider unavailable");
            return false;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider request failed");
            return false;
        }
        true
    }

    fn request_players(&mut self) {
        self.state.players_loading = true;
        self.send(ProviderCommand::FetchPlayers);
    }

    fn request_insights(&mut self) {
        if self.state.insights.is_some() || self.state.insights_loading {
            return;
        }
        if self.send(ProviderCommand::FetchInsights) {
            self.state.insights_loading = true;
        }
    }

    // Chart data follows the selection; one request per selection change.
    fn maybe_request_performance(&mut self) {
        let selected = self.state.selected_player_id;
        if selected == self.requested_performance {
            return;
        }
        self.requested_performance = selected;
        let Some(player_id) = selected else {
            self.state.performance_loading = false;
            return;
        };
        if self.send(ProviderCommand::FetchPerformance { player_id }) {
            self.state.begin_performance_load(player_id);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = DashboardConfig::from_env();

    let (tx, rx) = mpsc::channel();
    console_log::init(tx.clone(), config.log_level)?;

    // Bad seed data stops us before the terminal is touched.
    let mut rng = synth::rng_from_seed(config.rng_seed);
    let repo = Arc::new(StatsRepository::six_nations_2024(&mut rng)?);

    let (cmd_tx, cmd_rx) = mpsc::channel();
    mock_feed::spawn_mock_provider(repo, tx, cmd_rx, ProviderDelays::from(&config));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(Some(cmd_tx));
    app.request_players();
    let res = run_app(&mut terminal, &mut app, rx, config.tick_rate);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
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
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_request_performance();

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
            Constraint::Length(4),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Dashboard => render_dashboard(frame, chunks[1], &app.state),
        Screen::Insights => render_insights(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Dashboard => "DASHBOARD",
        Screen::Insights => "PERFORMANCE INSIGHTS",
    };
    let line1 = format!(" .--. FANTASY RUGBY STATS | Six Nations 2024 | {screen}");
    let line2 = " |6N|".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    if state.search_active {
        return "Type to search | Backspace Delete | Enter/Esc Done".to_string();
    }
    match state.screen {
        Screen::Dashboard => {
            "Tab Insights | j/k/↑/↓ Player | / Search | 1-6 Teams | a All | c Chart | ? Help | q Quit"
                .to_string()
        }
        Screen::Insights => "Tab Dashboard | ? Help | q Quit".to_string(),
    }
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(6)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(columns[1]);

    render_player_card(frame, left[0], state);
    render_performance_chart(frame, left[1], state);
    render_search(frame, right[0], state);
    render_team_filter(frame, right[1], state);
    render_player_list(frame, right[2], state);
}

fn render_player_card(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Player").borders(Borders::ALL);
    let Some(player) = state.selected_player() else {
        let msg = if state.players_loading {
            "Loading players..."
        } else {
            "No player selected\nSelect a player from the list to view their stats."
        };
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let team_style = Style::default().fg(team_color(player.team));
    let mut form_spans = vec![Span::raw("Form ")];
    for value in &player.form {
        form_spans.push(Span::styled(
            format!(" {value:>2} "),
            Style::default().fg(form_color(FormBand::of(*value))),
        ));
    }

    let lines = vec![
        Line::from(Span::styled(
            player.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(player.position.clone(), Style::default().fg(Color::Gray)),
            Span::raw(" • "),
            Span::styled(player.team.display_name(), team_style),
        ]),
        Line::from(form_spans),
        Line::from(""),
        Line::from(vec![
            Span::raw("Points "),
            Span::styled(
                player.points.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            trend_span(player.points_trend(), signed_points(player.points_change)),
            Span::raw("    Cost "),
            Span::styled(
                format_cost(player.cost),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            trend_span(player.cost_trend(), format_cost_change(player.cost_change)),
        ]),
    ];

    let card = Paragraph::new(lines).block(block);
    frame.render_widget(card, area);
}

fn render_performance_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = format!("Performance Trend [{}]", state.chart_metric.label());
    let block = Block::default().title(title).borders(Borders::ALL);

    let Some(rows) = state.selected_performance() else {
        let msg = if state.selected_player_id.is_some() {
            "Loading chart data..."
        } else {
            "No player selected"
        };
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    if rows.is_empty() {
        let empty = Paragraph::new("No completed games yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let metric = state.chart_metric;
    let data = chart::series(rows, metric);
    let x = chart::x_bounds(rows);
    let y = chart::y_bounds(rows, metric);
    let color = match metric {
        ChartMetric::Points => Color::Cyan,
        ChartMetric::Cost => Color::Blue,
    };

    let dataset = Dataset::default()
        .name(metric.label())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data);

    let x_labels = rows
        .iter()
        .map(|p| Span::raw(format!("R{} {}", p.round, p.opponent.abbr())))
        .collect::<Vec<_>>();
    let y_labels = vec![
        Span::raw(axis_label(y[0], metric)),
        Span::raw(axis_label((y[0] + y[1]) / 2.0, metric)),
        Span::raw(axis_label(y[1], metric)),
    ];

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title("Round")
                .style(Style::default().fg(Color::DarkGray))
                .bounds(x)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds(y)
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn axis_label(value: f64, metric: ChartMetric) -> String {
    match metric {
        ChartMetric::Points => format!("{value:.0}"),
        ChartMetric::Cost => format!("{value:.1}"),
    }
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let (text, style) = if state.search_active {
        (format!("{}_", state.search), Style::default().fg(Color::Yellow))
    } else if state.search.is_empty() {
        (
            "Search players or positions...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (state.search.clone(), Style::default())
    };
    let search = Paragraph::new(text)
        .style(style)
        .block(Block::default().title("Search (/)").borders(Borders::ALL));
    frame.render_widget(search, area);
}

fn render_team_filter(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = Vec::new();
    for team in Team::ALL {
        let style = if state.team_filter.contains(team) {
            Style::default().fg(team_color(team)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!("{} {} ", team.index() + 1, team.display_name()),
            style,
        ));
    }
    let filter = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Filter by Team").borders(Borders::ALL));
    frame.render_widget(filter, area);
}

fn render_player_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let filtered = state.filtered_players();
    let title = format!("Players ({})", filtered.len());
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if state.players_loading {
        let loading = Paragraph::new("Loading players...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(loading, inner);
        return;
    }

    if filtered.is_empty() {
        let empty = Paragraph::new("No players found for your current filters.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, inner);
        return;
    }

    let (start, end) = visible_range(state.selected, filtered.len(), inner.height as usize);
    let lines = (start..end)
        .map(|idx| player_row(filtered[idx], idx == state.selected))
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn player_row(player: &Player, selected: bool) -> Line<'static> {
    let base = if selected {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let prefix = if selected { "> " } else { "  " };
    Line::from(vec![
        Span::styled(prefix, base),
        Span::styled(format!("{:<20}", truncate(&player.name, 20)), base),
        Span::styled(
            format!("{} ", player.team.abbr()),
            base.fg(team_color(player.team)),
        ),
        Span::styled(format!("{:>3}", player.points), base),
        Span::styled(
            player.points_trend().arrow(),
            base.fg(trend_color(player.points_trend())),
        ),
        Span::styled(format!(" {:>7}", format_cost(player.cost)), base),
        Span::styled(
            player.cost_trend().arrow(),
            base.fg(trend_color(player.cost_trend())),
        ),
    ])
}

fn render_insights(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(insights) = &state.insights else {
        let loading = Paragraph::new("Loading insights...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(loading, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3)])
        .split(columns[2]);

    let top = insights
        .top_performers
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Line::from(vec![
                Span::raw(format!("{}. ", i + 1)),
                Span::raw(format!("{:<20}", truncate(&p.name, 20))),
                Span::styled(format!("{} ", p.team.abbr()), Style::default().fg(team_color(p.team))),
                Span::styled(
                    format!("{:>3} pts", p.points),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect::<Vec<_>>();
    frame.render_widget(
        Paragraph::new(top).block(Block::default().title("Top Performers").borders(Borders::ALL)),
        columns[0],
    );

    frame.render_widget(
        Paragraph::new(cost_mover_lines(&insights.risers, Color::Green))
            .block(Block::default().title("Biggest Risers").borders(Borders::ALL)),
        columns[1],
    );

    let teams = insights
        .teams
        .iter()
        .map(|(team, perf)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<10}", team.display_name()),
                    Style::default().fg(team_color(*team)),
                ),
                Span::styled(
                    format!("{:>3} pts avg", perf.average_points),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {} players", perf.player_count),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect::<Vec<_>>();
    frame.render_widget(
        Paragraph::new(teams)
            .block(Block::default().title("Team Performance").borders(Borders::ALL)),
        right[0],
    );

    frame.render_widget(
        Paragraph::new(cost_mover_lines(&insights.fallers, Color::Red))
            .block(Block::default().title("Biggest Fallers").borders(Borders::ALL)),
        right[1],
    );
}

fn cost_mover_lines(players: &[Player], color: Color) -> Vec<Line<'static>> {
    players
        .iter()
        .map(|p| {
            Line::from(vec![
                Span::raw(format!("{:<20}", truncate(&p.name, 20))),
                Span::styled(format!("{} ", p.team.abbr()), Style::default().fg(team_color(p.team))),
                Span::raw(format!("{:>7} ", format_cost(p.cost))),
                Span::styled(format_cost_change(p.cost_change), Style::default().fg(color)),
            ])
        })
        .collect()
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
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(2);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn trend_span(trend: Trend, text: String) -> Span<'static> {
    Span::styled(
        format!("{} {text}", trend.arrow()),
        Style::default().fg(trend_color(trend)),
    )
}

fn signed_points(change: i32) -> String {
    if change > 0 {
        format!("+{change}")
    } else {
        change.to_string()
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

fn team_color(team: Team) -> Color {
    match team {
        Team::England => Color::White,
        Team::France => Color::Blue,
        Team::Ireland => Color::Green,
        Team::Italy => Color::LightBlue,
        Team::Scotland => Color::Magenta,
        Team::Wales => Color::Red,
    }
}

fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => Color::Green,
        Trend::Flat => Color::DarkGray,
        Trend::Down => Color::Red,
    }
}

fn form_color(band: FormBand) -> Color {
    match band {
        FormBand::Hot => Color::Green,
        FormBand::Solid => Color::Cyan,
        FormBand::Cold => Color::Red,
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Fantasy Rugby Stats - Help",
        "",
        "Global:",
        "  Tab          Dashboard / Insights",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Dashboard:",
        "  j/k or ↑/↓   Select player",
        "  /            Search name or position",
        "  Esc          Clear search",
        "  1-6          Toggle England..Wales",
        "  a            Show all teams",
        "  c            Chart points / cost",
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
