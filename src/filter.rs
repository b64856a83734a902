use std::collections::BTreeSet;

use crate::model::{Player, Team};

/// Teams shown in the player list. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamFilter {
    selected: BTreeSet<Team>,
}

impl Default for TeamFilter {
    fn default() -> Self {
        Self {
            selected: Team::ALL.into_iter().collect(),
        }
    }
}

impl TeamFilter {
    pub fn contains(&self, team: Team) -> bool {
        self.selected.contains(&team)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn selected(&self) -> impl Iterator<Item = Team> + '_ {
        self.selected.iter().copied()
    }

    /// Add or remove `team`. Returns `false` when asked to drop the last team.
    pub fn toggle(&mut self, team: Team) -> bool {
        if self.selected.contains(&team) {
            if self.selected.len() == 1 {
                return false;
            }
            self.selected.remove(&team);
        } else {
            self.selected.insert(team);
        }
        true
    }

    pub fn select_all(&mut self) {
        self.selected.extend(Team::ALL);
    }
}

/// Case-insensitive match on name or position. An empty term matches all.
pub fn matches_search(player: &Player, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    player.name.to_lowercase().contains(&needle) || player.position.to_lowercase().contains(&needle)
}

pub fn filter_players<'a>(players: &'a [Player], teams: &TeamFilter, term: &str) -> Vec<&'a Player> {
    players
        .iter()
        .filter(|p| teams.contains(p.team))
        .filter(|p| matches_search(p, term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, name: &str, position: &str, team: Team) -> Player {
        Player {
            id,
            name: name.to_string(),
            position: position.to_string(),
            team,
            cost: 9.0,
            points: 10,
            cost_change: 0.0,
            points_change: 0,
            form: Vec::new(),
        }
    }

    #[test]
    fn last_team_cannot_be_removed() {
        let mut filter = TeamFilter::default();
        assert_eq!(filter.len(), 6);
        for team in &Team::ALL[..5] {
            assert!(filter.toggle(*team));
        }
        assert_eq!(filter.len(), 1);
        assert!(!filter.toggle(Team::Wales));
        assert!(filter.contains(Team::Wales));
        assert!(filter.toggle(Team::Italy));
        assert_eq!(filter.selected().collect::<Vec<_>>(), vec![Team::Italy, Team::Wales]);
    }

    #[test]
    fn select_all_restores_every_team() {
        let mut filter = TeamFilter::default();
        filter.toggle(Team::France);
        filter.toggle(Team::Ireland);
        filter.select_all();
        assert_eq!(filter, TeamFilter::default());
    }

    #[test]
    fn search_matches_name_or_position() {
        let p = player(1, "Finn Russell", "Fly-half", Team::Scotland);
        assert!(matches_search(&p, ""));
        assert!(matches_search(&p, "  "));
        assert!(matches_search(&p, "russ"));
        assert!(matches_search(&p, "FLY"));
        assert!(!matches_search(&p, "wing"));
    }

    #[test]
    fn filter_keeps_collection_order() {
        let players = vec![
            player(1, "A Wing", "Wing", Team::Ireland),
            player(2, "B Prop", "Prop", Team::England),
            player(3, "C Wing", "Wing", Team::England),
        ];
        let mut teams = TeamFilter::default();
        teams.toggle(Team::Ireland);
        let ids: Vec<u32> = filter_players(&players, &teams, "wing").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);
        let ids: Vec<u32> = filter_players(&players, &TeamFilter::default(), "")
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
