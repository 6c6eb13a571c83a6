//! Combat minigame: deterministic battle outcome from two records.
//!
//! The outcome is a pure function of the two records — the full round list
//! and winner are fixed before any playback starts. Opponent selection is
//! the caller's explicitly randomized step, kept out of the simulation.

use rand::Rng;

use crate::model::Pokemon;

pub const MIN_ROUNDS: u32 = 3;
pub const MAX_ROUNDS: u32 = 8;

/// Which combatant acts in a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Player,
    Opponent,
}

/// One attack in the simulated sequence; `number` is 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Round {
    pub number: u32,
    pub attacker: Side,
}

/// Terminal result of a simulated battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleOutcome {
    pub rounds: Vec<Round>,
    pub winner: Side,
    pub winner_id: u32,
    pub message: String,
}

/// Arithmetic mean of a record's stat values; `0.0` for a record without
/// stats.
pub fn average_stat(pokemon: &Pokemon) -> f64 {
    if pokemon.stats.is_empty() {
        return 0.0;
    }
    let total: u32 = pokemon.stats.iter().map(|stat| stat.base_stat).sum();
    f64::from(total) / pokemon.stats.len() as f64
}

/// Simulate a battle between `player` and `opponent`.
///
/// The stronger average wins, ties going to the player. The round count
/// grows with the stat gap, clamped to `3..=8`, then nudged by one so the
/// winner lands the final attack: the player acts on odd rounds, the
/// opponent on even rounds.
pub fn simulate_battle(player: &Pokemon, opponent: &Pokemon) -> BattleOutcome {
    let player_avg = average_stat(player);
    let opponent_avg = average_stat(opponent);
    let player_wins = player_avg >= opponent_avg;
    let diff = (player_avg - opponent_avg).abs();

    let mut rounds = ((diff / 10.0).floor() as u32 + MIN_ROUNDS).clamp(MIN_ROUNDS, MAX_ROUNDS);
    if player_wins {
        if rounds % 2 == 0 {
            rounds = if rounds < MAX_ROUNDS {
                rounds + 1
            } else {
                rounds - 1
            };
        }
    } else if rounds % 2 == 1 {
        rounds = if rounds < MAX_ROUNDS {
            rounds + 1
        } else {
            rounds - 1
        };
    }

    let sequence = (1..=rounds)
        .map(|number| Round {
            number,
            attacker: if number % 2 == 1 {
                Side::Player
            } else {
                Side::Opponent
            },
        })
        .collect();

    let (winner, winner_record) = if player_wins {
        (Side::Player, player)
    } else {
        (Side::Opponent, opponent)
    };

    BattleOutcome {
        rounds: sequence,
        winner,
        winner_id: winner_record.id,
        message: format!("{} wins the battle!", winner_record.display_name()),
    }
}

/// Draw a random opponent id from `1..=max_id` (typically
/// [`crate::api::MAX_POKEMON_ID`]), avoiding the player's own id whenever
/// the catalog holds more than one entry.
pub fn opponent_id(player_id: u32, max_id: u32, rng: &mut impl Rng) -> u32 {
    let mut id = rng.gen_range(1..=max_id);
    if id == player_id && max_id > 1 {
        id = (id % max_id) + 1;
    }
    id
}
