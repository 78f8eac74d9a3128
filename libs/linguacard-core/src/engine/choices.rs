//! Multiple-choice option building.

use std::collections::HashSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::normalize::normalize_text;
use crate::types::Card;

/// Options for `card`: its answer plus up to `distractors` other answers.
///
/// Distractors come from the other cards in `pool`, one per normalized
/// answer, never equal to the correct one once normalized. With too few
/// distinct answers the list is simply shorter.
pub fn build_options<R: Rng + ?Sized>(
    card: &Card,
    pool: &[Card],
    distractors: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut seen = HashSet::new();
    seen.insert(normalize_text(&card.back));

    let candidates: Vec<&str> = pool
        .iter()
        .filter(|other| other.id != card.id)
        .filter(|other| seen.insert(normalize_text(&other.back)))
        .map(|other| other.back.as_str())
        .collect();

    let mut options: Vec<String> = candidates
        .choose_multiple(rng, distractors)
        .map(|answer| (*answer).to_string())
        .collect();
    options.push(card.back.clone());
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn deck(answers: &[&str]) -> Vec<Card> {
        answers
            .iter()
            .enumerate()
            .map(|(i, back)| Card::new(i as i64 + 1, format!("front {i}"), *back))
            .collect()
    }

    #[test]
    fn four_options_with_enough_distinct_answers() {
        let pool = deck(&["uno", "due", "tre", "quattro", "cinque", "sei"]);
        let mut rng = StdRng::seed_from_u64(11);
        for card in &pool {
            let options = build_options(card, &pool, 3, &mut rng);
            assert_eq!(options.len(), 4);
            assert!(options.contains(&card.back));
            let distinct: HashSet<_> = options.iter().map(|o| normalize_text(o)).collect();
            assert_eq!(distinct.len(), 4);
        }
    }

    #[test]
    fn duplicates_of_the_answer_are_never_distractors() {
        let pool = deck(&["Sì", "si", "SI!", "no"]);
        let mut rng = StdRng::seed_from_u64(5);
        let mut options = build_options(&pool[0], &pool, 3, &mut rng);
        options.sort();
        assert_eq!(options, vec!["Sì".to_string(), "no".to_string()]);
    }

    #[test]
    fn duplicate_distractors_collapse() {
        let pool = deck(&["uno", "due", "Due", "due."]);
        let mut rng = StdRng::seed_from_u64(5);
        let options = build_options(&pool[0], &pool, 3, &mut rng);
        assert_eq!(options.len(), 2);
        assert!(options.contains(&"uno".to_string()));
    }

    #[test]
    fn single_card_offers_only_its_answer() {
        let pool = deck(&["uno"]);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(build_options(&pool[0], &pool, 3, &mut rng), vec!["uno".to_string()]);
    }
}
