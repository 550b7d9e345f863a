use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::model::entity::QuizQuestion;
use crate::progress::{ProgressError, ProgressResult};

/// Lowest score (inclusive) that passes a quiz.
pub const PASS_THRESHOLD: u8 = 70;

/// Selected option index per question id.
pub type QuizAnswers = HashMap<Uuid, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    pub score: u8,
    pub passed: bool,
}

/// `part / whole * 100` rounded half up, 0 when `whole` is 0.
pub fn round_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole);
    ((part * 100 + whole / 2) / whole) as u8
}

/// Scores one submission. Every question must carry an answer; an index
/// outside the options simply counts as wrong.
pub fn score_quiz(questions: &[QuizQuestion], answers: &QuizAnswers) -> ProgressResult<QuizOutcome> {
    let unanswered = questions
        .iter()
        .filter(|q| !answers.contains_key(&q.id))
        .count();
    if unanswered > 0 {
        return Err(ProgressError::IncompleteAnswers { unanswered });
    }

    let correct = questions
        .iter()
        .filter(|q| answers.get(&q.id) == Some(&q.correct_answer))
        .count();
    let total = questions.len();
    let score = round_percent(correct, total);

    Ok(QuizOutcome {
        correct,
        total,
        score,
        passed: total > 0 && score >= PASS_THRESHOLD,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn questions(correct: &[usize]) -> Vec<QuizQuestion> {
        correct
            .iter()
            .map(|&correct_answer| QuizQuestion {
                id: Uuid::new_v4(),
                question: String::from("?"),
                options: ["a", "b", "c", "d"].map(String::from),
                correct_answer,
            })
            .collect()
    }

    fn answer(questions: &[QuizQuestion], picks: &[usize]) -> QuizAnswers {
        questions.iter().zip(picks).map(|(q, &p)| (q.id, p)).collect()
    }

    #[test]
    fn rounding_matches_expected_percentages() {
        assert_eq!(round_percent(1, 3), 33);
        assert_eq!(round_percent(2, 3), 67);
        assert_eq!(round_percent(1, 8), 13);
        assert_eq!(round_percent(7, 10), 70);
        assert_eq!(round_percent(3, 3), 100);
        assert_eq!(round_percent(0, 0), 0);
    }

    #[test]
    fn two_of_three_fails() {
        let qs = questions(&[0, 1, 2]);
        let outcome = score_quiz(&qs, &answer(&qs, &[0, 1, 3])).unwrap();
        assert_eq!(outcome.score, 67);
        assert_eq!(outcome.correct, 2);
        assert!(!outcome.passed);
    }

    #[test]
    fn all_correct_passes() {
        let qs = questions(&[0, 1, 2]);
        let outcome = score_quiz(&qs, &answer(&qs, &[0, 1, 2])).unwrap();
        assert_eq!(outcome.score, 100);
        assert!(outcome.passed);
    }

    #[test]
    fn threshold_is_inclusive() {
        let qs = questions(&[0; 10]);
        let picks = [0, 0, 0, 0, 0, 0, 0, 1, 1, 1];
        let outcome = score_quiz(&qs, &answer(&qs, &picks)).unwrap();
        assert_eq!(outcome.score, PASS_THRESHOLD);
        assert!(outcome.passed);
    }

    #[test]
    fn unanswered_questions_are_rejected() {
        let qs = questions(&[0, 1, 2]);
        let err = score_quiz(&qs, &answer(&qs, &[0])).unwrap_err();
        assert!(matches!(err, ProgressError::IncompleteAnswers { unanswered: 2 }));
    }

    #[test]
    fn scoring_is_deterministic() {
        let qs = questions(&[3, 2, 1, 0]);
        let answers = answer(&qs, &[3, 2, 0, 0]);
        let first = score_quiz(&qs, &answers).unwrap();
        for _ in 0..10 {
            assert_eq!(score_quiz(&qs, &answers).unwrap(), first);
        }
        assert_eq!(first.score, 75);
    }

    #[test]
    fn out_of_range_pick_is_wrong() {
        let qs = questions(&[0]);
        let outcome = score_quiz(&qs, &answer(&qs, &[9])).unwrap();
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn empty_quiz_never_passes() {
        let outcome = score_quiz(&[], &QuizAnswers::new()).unwrap();
        assert_eq!(outcome.score, 0);
        assert!(!outcome.passed);
    }
}
