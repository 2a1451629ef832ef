//! Quiz grading and completion events.

use crate::error::QuizError;
use crate::record::Subject;

/// Questions per subject quiz.
pub const QUESTIONS_PER_QUIZ: u8 = 5;

/// Points awarded per correct answer; a perfect quiz scores 100.
pub const POINTS_PER_CORRECT: u32 = 20;

/// Index of the correct option for each question, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    answers: Vec<usize>,
}

impl AnswerKey {
    /// Creates a key from correct option indices.
    pub fn new(answers: impl Into<Vec<usize>>) -> Self {
        Self {
            answers: answers.into(),
        }
    }

    /// Key of the bundled English quiz.
    pub fn english() -> Self {
        Self::new([1, 1, 1, 2, 2])
    }

    /// Key of the bundled Indonesian quiz.
    pub fn indonesian() -> Self {
        Self::new([1, 2, 1, 1, 1])
    }

    /// Key of the bundled quiz for `subject`.
    pub fn for_subject(subject: Subject) -> Self {
        match subject {
            Subject::English => Self::english(),
            Subject::Indonesian => Self::indonesian(),
        }
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Returns true if the key has no questions.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Counts selections that match the key.
    ///
    /// `selections[i]` is the option picked for question `i`, or `None` if
    /// it was skipped. Skipped questions and selections past the end of the
    /// key score nothing.
    pub fn grade(&self, selections: &[Option<usize>]) -> usize {
        self.answers
            .iter()
            .zip(selections)
            .filter(|(correct, picked)| **picked == Some(**correct))
            .count()
    }
}

/// A finished quiz, ready to be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizCompletion {
    subject: Subject,
    correct_count: u8,
}

impl QuizCompletion {
    /// Creates a completion event.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::TooManyCorrect`] if `correct_count` exceeds the
    /// five questions of a quiz.
    pub fn new(subject: Subject, correct_count: u8) -> Result<Self, QuizError> {
        if correct_count > QUESTIONS_PER_QUIZ {
            return Err(QuizError::TooManyCorrect {
                correct: correct_count,
                questions: QUESTIONS_PER_QUIZ,
            });
        }
        Ok(Self {
            subject,
            correct_count,
        })
    }

    /// Grades `selections` against `key` and builds the completion.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::TooManyCorrect`] if the key is longer than a
    /// quiz and more than five answers matched.
    pub fn from_answers(
        subject: Subject,
        key: &AnswerKey,
        selections: &[Option<usize>],
    ) -> Result<Self, QuizError> {
        let correct = key.grade(selections);
        let correct = u8::try_from(correct).unwrap_or(u8::MAX);
        Self::new(subject, correct)
    }

    /// Quiz subject.
    pub const fn subject(&self) -> Subject {
        self.subject
    }

    /// Correct answers, `0..=5`.
    pub const fn correct_count(&self) -> u8 {
        self.correct_count
    }

    /// Percentage score: 20 points per correct answer.
    pub fn final_score(&self) -> u32 {
        u32::from(self.correct_count) * POINTS_PER_CORRECT
    }
}
