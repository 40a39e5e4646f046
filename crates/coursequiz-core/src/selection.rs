//! Picking questions out of a bank: filtering, random draws and
//! difficulty-weighted mock exams.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Question};

/// Metadata filter over bank questions. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub section: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub topic: Option<String>,
    pub category: Option<String>,
}

impl QuestionFilter {
    pub fn is_empty(&self) -> bool {
        self.section.is_none()
            && self.difficulty.is_none()
            && self.topic.is_none()
            && self.category.is_none()
    }

    pub fn matches(&self, question: &Question) -> bool {
        let text_matches = |wanted: &Option<String>, actual: &Option<String>| match wanted {
            Some(w) => actual
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(w)),
            None => true,
        };

        text_matches(&self.section, &question.section)
            && text_matches(&self.topic, &question.topic)
            && text_matches(&self.category, &question.category)
            && self
                .difficulty
                .is_none_or(|d| question.difficulty == Some(d))
    }

    pub fn apply(&self, questions: &[Question]) -> Vec<Question> {
        questions
            .iter()
            .filter(|q| self.matches(q))
            .cloned()
            .collect()
    }
}

/// Shuffle a copy of `questions` and keep the first `count`.
pub fn random_questions<R: Rng + ?Sized>(
    questions: &[Question],
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut pool = questions.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

/// Relative share of each difficulty level in a weighted draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyWeights {
    pub basic: u32,
    pub intermediate: u32,
    pub advanced: u32,
}

impl Default for DifficultyWeights {
    fn default() -> Self {
        Self {
            basic: 40,
            intermediate: 45,
            advanced: 15,
        }
    }
}

impl DifficultyWeights {
    /// Split `count` into (basic, intermediate, advanced) targets.
    ///
    /// Basic and intermediate are rounded; advanced takes what is left.
    pub fn split(&self, count: usize) -> (usize, usize, usize) {
        let total: u64 = [self.basic, self.intermediate, self.advanced]
            .into_iter()
            .map(u64::from)
            .sum();
        if total == 0 {
            return (0, 0, 0);
        }
        let share = |w: u32| ((f64::from(w) / total as f64) * count as f64).round() as usize;
        let basic = share(self.basic).min(count);
        let intermediate = share(self.intermediate).min(count - basic);
        (basic, intermediate, count - basic - intermediate)
    }
}

/// Draw a mock exam of `count` questions balanced by difficulty.
///
/// Each level is drawn at random up to its target. If a level runs short
/// (or questions carry no difficulty), the gap is filled from whatever is
/// left in the pool. The result is shuffled.
pub fn weighted_questions<R: Rng + ?Sized>(
    questions: &[Question],
    count: usize,
    weights: DifficultyWeights,
    rng: &mut R,
) -> Vec<Question> {
    let (basic, intermediate, advanced) = weights.split(count);
    let targets = [
        (Difficulty::Basic, basic),
        (Difficulty::Intermediate, intermediate),
        (Difficulty::Advanced, advanced),
    ];

    let mut pool: Vec<&Question> = questions.iter().collect();
    pool.shuffle(rng);

    let mut picked: Vec<&Question> = Vec::with_capacity(count);
    let mut taken = vec![false; pool.len()];

    for (difficulty, target) in targets {
        let mut remaining = target;
        for (i, question) in pool.iter().enumerate() {
            if remaining == 0 {
                break;
            }
            if !taken[i] && question.difficulty == Some(difficulty) {
                taken[i] = true;
                picked.push(*question);
                remaining -= 1;
            }
        }
    }

    if picked.len() < count {
        let needed = count - picked.len();
        tracing::debug!(needed, "topping up weighted draw from remaining questions");
        for (i, question) in pool.iter().enumerate() {
            if picked.len() == count {
                break;
            }
            if !taken[i] {
                taken[i] = true;
                picked.push(*question);
            }
        }
    }

    let mut selected: Vec<Question> = picked.into_iter().cloned().collect();
    selected.shuffle(rng);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn bank() -> Vec<Question> {
        let mut questions = Vec::new();
        for i in 0..30u64 {
            let mut q = Question::new(
                i,
                format!("Q{i}"),
                vec!["a".into(), "b".into()],
                0,
                "",
            );
            q.difficulty = Some(match i % 3 {
                0 => Difficulty::Basic,
                1 => Difficulty::Intermediate,
                _ => Difficulty::Advanced,
            });
            q.section = Some(if i < 15 { "1.1".into() } else { "1.2".into() });
            questions.push(q);
        }
        questions
    }

    #[test]
    fn split_handles_weights_near_u32_max() {
        let weights = DifficultyWeights {
            basic: u32::MAX,
            intermediate: u32::MAX,
            advanced: 1,
        };
        let (basic, intermediate, advanced) = weights.split(10);
        assert_eq!(basic + intermediate + advanced, 10);
        assert_eq!((basic, intermediate), (5, 5));
    }

    #[test]
    fn filter_by_section_and_difficulty() {
        let filter = QuestionFilter {
            section: Some("1.1".into()),
            difficulty: Some(Difficulty::Basic),
            ..Default::default()
        };
        let selected = filter.apply(&bank());
        assert_eq!(selected.len(), 5);
        assert!(selected
            .iter()
            .all(|q| q.section.as_deref() == Some("1.1") && q.difficulty == Some(Difficulty::Basic)));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = QuestionFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&bank()).len(), 30);
    }

    #[test]
    fn random_draw_is_unique_and_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let drawn = random_questions(&bank(), 10, &mut rng);
        assert_eq!(drawn.len(), 10);
        let ids: HashSet<_> = drawn.iter().map(|q| q.id.clone()).collect();
        assert_eq!(ids.len(), 10);

        let all = random_questions(&bank(), 100, &mut rng);
        assert_eq!(all.len(), 30);
    }

    #[test]
    fn seeded_draws_repeat() {
        let a = random_questions(&bank(), 5, &mut StdRng::seed_from_u64(42));
        let b = random_questions(&bank(), 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn weights_split_sums_to_count() {
        let weights = DifficultyWeights::default();
        assert_eq!(weights.split(30), (12, 14, 4));
        assert_eq!(weights.split(10), (4, 5, 1));
        assert_eq!(weights.split(1), (0, 0, 1));
        let (b, i, a) = weights.split(17);
        assert_eq!(b + i + a, 17);
    }

    #[test]
    fn weighted_draw_respects_targets() {
        let mut rng = StdRng::seed_from_u64(1);
        let drawn = weighted_questions(&bank(), 10, DifficultyWeights::default(), &mut rng);
        assert_eq!(drawn.len(), 10);
        let count = |d| drawn.iter().filter(|q| q.difficulty == Some(d)).count();
        assert_eq!(count(Difficulty::Basic), 4);
        assert_eq!(count(Difficulty::Intermediate), 5);
        assert_eq!(count(Difficulty::Advanced), 1);
    }

    #[test]
    fn weighted_draw_tops_up_short_levels() {
        // Only 10 advanced questions exist but we ask for an all-advanced exam of 15.
        let weights = DifficultyWeights {
            basic: 0,
            intermediate: 0,
            advanced: 1,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let drawn = weighted_questions(&bank(), 15, weights, &mut rng);
        assert_eq!(drawn.len(), 15);
        let ids: HashSet<_> = drawn.iter().map(|q| q.id.clone()).collect();
        assert_eq!(ids.len(), 15);
        assert_eq!(
            drawn
                .iter()
                .filter(|q| q.difficulty == Some(Difficulty::Advanced))
                .count(),
            10
        );
    }
}
