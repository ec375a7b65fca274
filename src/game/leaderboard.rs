//! Rankings computed from stored player records.

use log::info;
use rand::Rng;
use std::str::FromStr;

use crate::game::engine::Game;
use crate::game::errors::GameError;
use crate::game::storage::StoreBatch;
use crate::game::types::PlayerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    Level,
    Weekly,
    Pvp,
}

impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "level" | "lvl" => Ok(Board::Level),
            "weekly" | "week" => Ok(Board::Weekly),
            "pvp" | "duel" => Ok(Board::Pvp),
            other => Err(GameError::InvalidCommand(format!(
                "Unknown leaderboard '{}'. Use level, weekly or pvp.",
                other
            ))),
        }
    }
}

pub fn rank_by_level(players: &mut [PlayerRecord]) {
    players.sort_by(|a, b| {
        b.level
            .cmp(&a.level)
            .then_with(|| b.experience.cmp(&a.experience))
            .then_with(|| a.username.cmp(&b.username))
    });
}

pub fn rank_by_weekly(players: &mut [PlayerRecord]) {
    players.sort_by(|a, b| {
        b.weekly_score
            .cmp(&a.weekly_score)
            .then_with(|| a.username.cmp(&b.username))
    });
}

pub fn rank_by_pvp(players: &mut [PlayerRecord]) {
    players.sort_by(|a, b| {
        b.pvp_wins
            .cmp(&a.pvp_wins)
            .then_with(|| a.pvp_losses.cmp(&b.pvp_losses))
            .then_with(|| a.username.cmp(&b.username))
    });
}

pub fn format_board(board: Board, players: &[PlayerRecord]) -> Vec<String> {
    let title = match board {
        Board::Level => "=== Top players by level ===",
        Board::Weekly => "=== Weekly top ===",
        Board::Pvp => "=== PvP champions ===",
    };
    let mut lines = vec![title.to_string()];
    if players.is_empty() {
        lines.push("No players yet.".to_string());
    }
    for (idx, p) in players.iter().enumerate() {
        let detail = match board {
            Board::Level => format!("L{} ({} xp)", p.level, p.experience),
            Board::Weekly => format!("{} pts", p.weekly_score),
            Board::Pvp => format!("{}W / {}L", p.pvp_wins, p.pvp_losses),
        };
        lines.push(format!("{}. {} - {}", idx + 1, p.display_name, detail));
    }
    lines
}

impl<R: Rng> Game<R> {
    pub fn top_by_level(&self, n: usize) -> Result<Vec<PlayerRecord>, GameError> {
        self.top(Board::Level, n)
    }

    pub fn top_weekly(&self, n: usize) -> Result<Vec<PlayerRecord>, GameError> {
        self.top(Board::Weekly, n)
    }

    pub fn top_pvp(&self, n: usize) -> Result<Vec<PlayerRecord>, GameError> {
        self.top(Board::Pvp, n)
    }

    pub fn top(&self, board: Board, n: usize) -> Result<Vec<PlayerRecord>, GameError> {
        let mut players = self.store.list_players()?;
        match board {
            Board::Level => rank_by_level(&mut players),
            Board::Weekly => rank_by_weekly(&mut players),
            Board::Pvp => rank_by_pvp(&mut players),
        }
        players.truncate(n);
        Ok(players)
    }

    /// Zero every weekly score. Returns how many players were touched.
    pub fn reset_weekly_scores(&mut self) -> Result<usize, GameError> {
        let players = self.store.list_players()?;
        let mut batch = StoreBatch::new();
        for mut player in players {
            player.weekly_score = 0;
            batch.put_player(player)?;
        }
        let count = batch.len();
        self.store.apply(batch)?;
        info!("weekly scores reset for {} players", count);
        self.audit(&format!("reset_weekly {}", count));
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Race, Wallet};

    fn p(name: &str, level: u32, xp: u64, weekly: u64, wins: u32, losses: u32) -> PlayerRecord {
        let mut player = PlayerRecord::new(name, "", Race::Human, Wallet::default());
        player.level = level;
        player.experience = xp;
        player.weekly_score = weekly;
        player.pvp_wins = wins;
        player.pvp_losses = losses;
        player
    }

    fn names(players: &[PlayerRecord]) -> Vec<&str> {
        players.iter().map(|p| p.username.as_str()).collect()
    }

    #[test]
    fn level_board_breaks_ties_by_xp_then_name() {
        let mut players = vec![
            p("carol", 3, 10, 0, 0, 0),
            p("alice", 5, 20, 0, 0, 0),
            p("bob", 5, 80, 0, 0, 0),
            p("dave", 5, 80, 0, 0, 0),
        ];
        rank_by_level(&mut players);
        assert_eq!(names(&players), vec!["bob", "dave", "alice", "carol"]);
    }

    #[test]
    fn pvp_board_prefers_fewer_losses() {
        let mut players = vec![p("a", 1, 0, 0, 10, 5), p("b", 1, 0, 0, 10, 2), p("c", 1, 0, 0, 12, 9)];
        rank_by_pvp(&mut players);
        assert_eq!(names(&players), vec!["c", "b", "a"]);
    }

    #[test]
    fn weekly_board_orders_by_score() {
        let mut players = vec![p("a", 1, 0, 5, 0, 0), p("b", 1, 0, 50, 0, 0)];
        rank_by_weekly(&mut players);
        assert_eq!(names(&players), vec!["b", "a"]);
        let lines = format_board(Board::Weekly, &players);
        assert_eq!(lines[1], "1. b - 50 pts");
    }

    #[test]
    fn board_names_parse() {
        assert_eq!("PvP".parse::<Board>().unwrap(), Board::Pvp);
        assert!("gold".parse::<Board>().is_err());
    }
}
