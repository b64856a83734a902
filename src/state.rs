use std::collections::VecDeque;

use crate::chart::ChartMetric;
use crate::filter::{TeamFilter, filter_players};
use crate::model::{PerformancePoint, Player, Team, TeamPerformance};
use crate::repository::StatsRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Insights,
}

impl Screen {
    pub fn next(self) -> Self {
        match self {
            Screen::Dashboard => Screen::Insights,
            Screen::Insights => Screen::Dashboard,
        }
    }
}

/// Leaderboards and team table shown on the insights screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub top_performers: Vec<Player>,
    pub risers: Vec<Player>,
    pub fallers: Vec<Player>,
    pub teams: Vec<(Team, TeamPerformance)>,
}

impl Insights {
    pub fn from_repository(repo: &StatsRepository) -> Self {
        let owned = |players: Vec<&Player>| players.into_iter().cloned().collect::<Vec<_>>();
        Self {
            top_performers: owned(repo.top_performers()),
            risers: owned(repo.biggest_risers()),
            fallers: owned(repo.biggest_fallers()),
            teams: repo.ranked_team_performance(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub players: Vec<Player>,
    pub players_loading: bool,
    pub team_filter: TeamFilter,
    pub search: String,
    pub search_active: bool,
    /// Index into `filtered_players()`.
    pub selected: usize,
    pub selected_player_id: Option<u32>,
    pub chart_metric: ChartMetric,
    pub performance: Option<(u32, Vec<PerformancePoint>)>,
    pub performance_loading: bool,
    pub insights: Option<Insights>,
    pub insights_loading: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Dashboard,
            players: Vec::new(),
            players_loading: true,
            team_filter: TeamFilter::default(),
            search: String::new(),
            search_active: false,
            selected: 0,
            selected_player_id: None,
            chart_metric: ChartMetric::Points,
            performance: None,
            performance_loading: false,
            insights: None,
            insights_loading: false,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn filtered_players(&self) -> Vec<&Player> {
        filter_players(&self.players, &self.team_filter, &self.search)
    }

    pub fn selected_player(&self) -> Option<&Player> {
        let id = self.selected_player_id?;
        self.players.iter().find(|p| p.id == id)
    }

    /// Performance rows for the selected player, once they have arrived.
    pub fn selected_performance(&self) -> Option<&[PerformancePoint]> {
        let (id, rows) = self.performance.as_ref()?;
        if Some(*id) == self.selected_player_id {
            Some(rows.as_slice())
        } else {
            None
        }
    }

    pub fn select_next(&mut self) {
        let total = self.filtered_players().len();
        if total == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(total - 1);
        self.sync_selected_id();
    }

    pub fn select_prev(&mut self) {
        if self.filtered_players().is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
        self.sync_selected_id();
    }

    fn sync_selected_id(&mut self) {
        let id = self.filtered_players().get(self.selected).map(|p| p.id);
        self.selected_player_id = id;
    }

    /// Keep the selected player if still visible, else fall back to the first row.
    pub fn resync_selection(&mut self) {
        let (selected, id) = {
            let filtered = self.filtered_players();
            let keep = self
                .selected_player_id
                .and_then(|id| filtered.iter().position(|p| p.id == id));
            match keep {
                Some(idx) => (idx, self.selected_player_id),
                None => (0, filtered.first().map(|p| p.id)),
            }
        };
        self.selected = selected;
        self.selected_player_id = id;
    }

    pub fn toggle_team(&mut self, team: Team) {
        if self.team_filter.toggle(team) {
            self.resync_selection();
        } else {
            log::warn!("{} is the last team in the filter", team.display_name());
        }
    }

    pub fn select_all_teams(&mut self) {
        self.team_filter.select_all();
        self.resync_selection();
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.push(ch);
        self.resync_selection();
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.resync_selection();
    }

    pub fn toggle_chart_metric(&mut self) {
        self.chart_metric = self.chart_metric.toggle();
    }

    /// Mark a chart load for `player_id` as in flight.
    pub fn begin_performance_load(&mut self, player_id: u32) {
        self.performance_loading = true;
        if self.performance.as_ref().map(|(id, _)| *id) != Some(player_id) {
            self.performance = None;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

/// Messages from the provider thread to the UI.
#[derive(Debug, Clone)]
pub enum Delta {
    SetPlayers(Vec<Player>),
    SetPerformance {
        player_id: u32,
        rows: Vec<PerformancePoint>,
    },
    SetInsights(Insights),
    Log(String),
}

/// Requests from the UI to the provider thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchPlayers,
    FetchPerformance { player_id: u32 },
    FetchInsights,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetPlayers(players) => {
            state.players = players;
            state.players_loading = false;
            state.resync_selection();
        }
        Delta::SetPerformance { player_id, rows } => {
            // A newer selection already superseded this response.
            if state.selected_player_id != Some(player_id) {
                return;
            }
            state.performance = Some((player_id, rows));
            state.performance_loading = false;
        }
        Delta::SetInsights(insights) => {
            state.insights = Some(insights);
            state.insights_loading = false;
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
