//! Map quiz: guess which place the lone visible marker belongs to.

mod engine;

pub use engine::QuizEngine;

use crate::models::PlaceRecord;
use crate::render::MarkerId;

/// Options per question
pub const QUIZ_OPTIONS: usize = 4;

/// Decorative icons for answer buttons. Purely cosmetic.
pub const ICONS: &[&str] = &["🏰", "⛰️", "🌊", "🌲", "🏛️", "⛪", "🗼", "🌋"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub current_streak: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizOption {
    pub id: MarkerId,
    pub place: PlaceRecord,
    pub icon: &'static str,
}

/// How an option is shown once the question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Correct,
    /// Picked, but not the right place
    Wrong,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub selected: usize,
    pub correct: bool,
    pub marks: Vec<OptionMark>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    options: Vec<QuizOption>,
    correct: usize,
    answer: Option<Answer>,
}

impl QuizQuestion {
    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    /// Index into [`options`](Self::options) of the right answer
    pub fn correct_option(&self) -> usize {
        self.correct
    }

    pub fn correct_place(&self) -> &PlaceRecord {
        &self.options[self.correct].place
    }

    pub fn correct_id(&self) -> MarkerId {
        self.options[self.correct].id
    }

    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    pub fn answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Inactive,
    /// Quiz mode is on but there are too few places for a round
    Idle,
    AwaitingAnswer,
    Answered,
}
