//! Leaderboard projection over live player vessels.

use hecs::World;

use broadside_core::components::Role;
use broadside_core::constants::{ELIMINATION_RANK_WEIGHT, LEADERBOARD_DISPLAY};
use broadside_core::state::{LeaderboardEntry, RankedEntry};
use broadside_core::types::PlayerId;

/// Rank every player by `score + 100 * eliminations`, best first.
///
/// Ties are broken by player id so the order is stable across ticks.
pub fn build(world: &World) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = world
        .query::<&Role>()
        .iter()
        .filter_map(|(_, role)| role.as_player())
        .map(|p| LeaderboardEntry {
            id: p.id,
            display_name: p.display_name.clone(),
            score: p.score,
            eliminations: p.eliminations,
            rank_value: p.score + ELIMINATION_RANK_WEIGHT * u64::from(p.eliminations),
        })
        .collect();
    entries.sort_by(|a, b| b.rank_value.cmp(&a.rank_value).then(a.id.cmp(&b.id)));
    entries
}

/// The viewer's own row, when it ranks below the displayed top rows.
pub fn own_rank(board: &[LeaderboardEntry], viewer: PlayerId) -> Option<RankedEntry> {
    board
        .iter()
        .position(|e| e.id == viewer)
        .filter(|&index| index >= LEADERBOARD_DISPLAY)
        .map(|index| RankedEntry {
            rank: index + 1,
            entry: board[index].clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, rank_value: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            id: PlayerId(id),
            display_name: format!("p{id}"),
            score: rank_value,
            eliminations: 0,
            rank_value,
        }
    }

    #[test]
    fn own_rank_only_outside_top_rows() {
        let board: Vec<_> = (0..8).map(|i| entry(i, 100 - i)).collect();
        assert!(own_rank(&board, PlayerId(2)).is_none());
        let row = own_rank(&board, PlayerId(6)).expect("rank 7 is below the top five");
        assert_eq!(row.rank, 7);
        assert!(own_rank(&board, PlayerId(99)).is_none());
    }
}
