use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use crate::config::DashboardConfig;
use crate::repository::StatsRepository;
use crate::state::{Delta, Insights, ProviderCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderDelays {
    pub players: Duration,
    pub chart: Duration,
}

impl From<&DashboardConfig> for ProviderDelays {
    fn from(cfg: &DashboardConfig) -> Self {
        Self {
            players: cfg.players_delay,
            chart: cfg.chart_delay,
        }
    }
}

/// Serve UI requests from the in-memory repository, simulating load latency.
///
/// The thread exits once the command channel closes or the UI hangs up.
pub fn spawn_mock_provider(
    repo: Arc<StatsRepository>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    delays: ProviderDelays,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(first) = cmd_rx.recv() {
            let mut batch = vec![first];
            while let Ok(cmd) = cmd_rx.try_recv() {
                batch.push(cmd);
            }

            for cmd in coalesce_commands(batch) {
                if serve(&repo, &tx, cmd, delays).is_err() {
                    return;
                }
            }
        }
    })
}

fn serve(
    repo: &StatsRepository,
    tx: &Sender<Delta>,
    cmd: ProviderCommand,
    delays: ProviderDelays,
) -> Result<(), std::sync::mpsc::SendError<Delta>> {
    match cmd {
        ProviderCommand::FetchPlayers => {
            thread::sleep(delays.players);
            tx.send(Delta::SetPlayers(repo.players().to_vec()))?;
            tx.send(Delta::Log(format!(
                "[INFO] Loaded {} players",
                repo.players().len()
            )))
        }
        ProviderCommand::FetchPerformance { player_id } => {
            thread::sleep(delays.chart);
            let rows = repo.player_performance(player_id);
            if rows.is_empty() {
                tx.send(Delta::Log(format!(
                    "[INFO] No completed games for player {player_id}"
                )))?;
            }
            tx.send(Delta::SetPerformance { player_id, rows })
        }
        ProviderCommand::FetchInsights => {
            tx.send(Delta::SetInsights(Insights::from_repository(repo)))
        }
    }
}

/// Drop duplicates and keep only the latest performance request, preserving
/// first-seen order of everything else.
pub fn coalesce_commands(batch: Vec<ProviderCommand>) -> Vec<ProviderCommand> {
    let latest_perf = batch
        .iter()
        .rev()
        .find(|cmd| matches!(cmd, ProviderCommand::FetchPerformance { .. }))
        .cloned();

    let mut out: Vec<ProviderCommand> = Vec::new();
    for cmd in batch {
        let cmd = match cmd {
            ProviderCommand::FetchPerformance { .. } => match &latest_perf {
                Some(latest) => latest.clone(),
                None => continue,
            },
            other => other,
        };
        if !out.contains(&cmd) {
            out.push(cmd);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_latest_performance_request() {
        let batch = vec![
            ProviderCommand::FetchPerformance { player_id: 1 },
            ProviderCommand::FetchInsights,
            ProviderCommand::FetchPerformance { player_id: 2 },
            ProviderCommand::FetchPerformance { player_id: 3 },
            ProviderCommand::FetchInsights,
        ];
        assert_eq!(
            coalesce_commands(batch),
            vec![
                ProviderCommand::FetchPerformance { player_id: 3 },
                ProviderCommand::FetchInsights,
            ]
        );
    }

    #[test]
    fn passes_other_commands_through() {
        let batch = vec![ProviderCommand::FetchPlayers, ProviderCommand::FetchInsights];
        assert_eq!(coalesce_commands(batch.clone()), batch);
        assert!(coalesce_commands(Vec::new()).is_empty());
    }
}
