//! Guessing quiz: pick a hidden record, offer name choices, keep score.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::Pokemon;

/// Option-set size offered per round when the catalog is large enough.
pub const OPTION_COUNT: usize = 5;

/// One quiz round: a hidden target and the shuffled name choices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizRound {
    pub target_id: u32,
    pub target_name: String,
    pub image_url: String,
    pub options: Vec<String>,
}

impl QuizRound {
    /// Draw a target from `catalog` and build up to [`OPTION_COUNT`]
    /// distinct name options around it, shuffled. Returns `None` for an
    /// empty catalog. A catalog with fewer distinct names than
    /// [`OPTION_COUNT`] yields all of them.
    pub fn new(catalog: &[Pokemon], rng: &mut impl Rng) -> Option<Self> {
        let target = catalog.choose(rng)?;

        let distinct = catalog
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<HashSet<_>>()
            .len();
        let wanted = OPTION_COUNT.min(distinct);

        let mut options = vec![target.name.clone()];
        while options.len() < wanted {
            if let Some(candidate) = catalog.choose(rng) {
                if !options.contains(&candidate.name) {
                    options.push(candidate.name.clone());
                }
            }
        }
        options.shuffle(rng);

        Some(Self {
            target_id: target.id,
            target_name: target.name.clone(),
            image_url: target.image_url.clone(),
            options,
        })
    }

    /// Case-insensitive check of a chosen name against the target.
    pub fn is_correct(&self, choice: &str) -> bool {
        choice.eq_ignore_ascii_case(&self.target_name)
    }
}

/// Running quiz session; one point per correct guess.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuizGame {
    pub score: u32,
}

impl QuizGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer for `round` and report whether it was right.
    pub fn answer(&mut self, round: &QuizRound, choice: &str) -> bool {
        let correct = round.is_correct(choice);
        if correct {
            self.score += 1;
        }
        correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn catalog(names: &[&str]) -> Vec<Pokemon> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| Pokemon {
                id: index as u32 + 1,
                name: name.to_string(),
                image_url: format!("https://sprites.test/{}.png", index + 1),
                types: Vec::new(),
                stats: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn empty_catalog_yields_no_round() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(QuizRound::new(&[], &mut rng).is_none());
    }

    #[test]
    fn options_include_target_without_duplicates() {
        let entries = catalog(&[
            "bulbasaur",
            "charmander",
            "squirtle",
            "pikachu",
            "eevee",
            "snorlax",
            "gengar",
        ]);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            let round = QuizRound::new(&entries, &mut rng).unwrap();
            assert_eq!(round.options.len(), OPTION_COUNT);
            assert!(round.options.contains(&round.target_name));
            let unique: HashSet<&String> = round.options.iter().collect();
            assert_eq!(unique.len(), round.options.len());
        }
    }

    #[test]
    fn small_catalog_caps_options_at_distinct_names() {
        let entries = catalog(&["mew", "mewtwo", "ditto"]);
        let mut rng = SmallRng::seed_from_u64(5);
        let round = QuizRound::new(&entries, &mut rng).unwrap();
        assert_eq!(round.options.len(), 3);
        assert!(round.options.contains(&round.target_name));
    }

    #[test]
    fn answers_compare_case_insensitively() {
        let entries = catalog(&["pikachu"]);
        let mut rng = SmallRng::seed_from_u64(8);
        let round = QuizRound::new(&entries, &mut rng).unwrap();
        assert!(round.is_correct("PIKACHU"));
        assert!(round.is_correct("Pikachu"));
        assert!(!round.is_correct("raichu"));
    }

    #[test]
    fn score_counts_correct_guesses_only() {
        let entries = catalog(&["pikachu", "raichu"]);
        let mut rng = SmallRng::seed_from_u64(13);
        let round = QuizRound::new(&entries, &mut rng).unwrap();
        let mut game = QuizGame::new();

        let wrong = if round.target_name == "pikachu" {
            "raichu"
        } else {
            "pikachu"
        };
        assert!(!game.answer(&round, wrong));
        assert_eq!(game.score, 0);
        assert!(game.answer(&round, &round.target_name));
        assert_eq!(game.score, 1);
    }

    #[test]
    fn rounds_are_deterministic_per_seed() {
        let entries = catalog(&["a", "b", "c", "d", "e", "f"]);
        let round_a = QuizRound::new(&entries, &mut SmallRng::seed_from_u64(21)).unwrap();
        let round_b = QuizRound::new(&entries, &mut SmallRng::seed_from_u64(21)).unwrap();
        assert_eq!(round_a, round_b);
    }
}
