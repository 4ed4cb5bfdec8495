use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::debug;

use super::{Answer, GameStats, OptionMark, QuizOption, QuizQuestion, QuizState, ICONS, QUIZ_OPTIONS};
use crate::error::QuizError;
use crate::models::PlaceRecord;
use crate::render::{MapRenderer, MarkerId};

/// Quiz state machine. The random source is injected so rounds can be replayed.
pub struct QuizEngine<R> {
    rng: R,
    active: bool,
    stats: GameStats,
    question: Option<QuizQuestion>,
}

impl<R: Rng> QuizEngine<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            active: false,
            stats: GameStats::default(),
            question: None,
        }
    }

    pub fn state(&self) -> QuizState {
        match (&self.question, self.active) {
            (_, false) => QuizState::Inactive,
            (None, true) => QuizState::Idle,
            (Some(q), true) if q.is_answered() => QuizState::Answered,
            (Some(_), true) => QuizState::AwaitingAnswer,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    pub fn question(&self) -> Option<&QuizQuestion> {
        self.question.as_ref()
    }

    /// Turn quiz mode on with fresh stats and start the first round.
    ///
    /// With fewer than four found places quiz mode stays on but idle and
    /// `NotEnoughPlaces` is returned.
    pub fn enter(
        &mut self,
        found: &[(MarkerId, &PlaceRecord)],
        renderer: &mut dyn MapRenderer,
    ) -> Result<&QuizQuestion, QuizError> {
        self.active = true;
        self.stats = GameStats::default();
        self.question = None;
        self.start_round(found, renderer)
    }

    /// Start the next round. Only allowed once the current one is answered.
    pub fn next_round(
        &mut self,
        found: &[(MarkerId, &PlaceRecord)],
        renderer: &mut dyn MapRenderer,
    ) -> Result<&QuizQuestion, QuizError> {
        if !self.active {
            return Err(QuizError::Inactive);
        }
        if self.state() == QuizState::AwaitingAnswer {
            return Err(QuizError::Unanswered);
        }
        self.start_round(found, renderer)
    }

    /// Answer the current round. A round can only be answered once.
    pub fn answer(&mut self, selected: usize) -> Result<&Answer, QuizError> {
        if !self.active {
            return Err(QuizError::Inactive);
        }
        let question = self
            .question
            .as_mut()
            .ok_or(QuizError::NoSuchOption(selected))?;
        if question.answer.is_some() {
            return Err(QuizError::AlreadyAnswered);
        }
        if selected >= question.options.len() {
            return Err(QuizError::NoSuchOption(selected));
        }

        let correct = selected == question.correct;
        let marks = (0..question.options.len())
            .map(|i| {
                if i == question.correct {
                    OptionMark::Correct
                } else if i == selected {
                    OptionMark::Wrong
                } else {
                    OptionMark::Neutral
                }
            })
            .collect();

        self.stats.total_questions += 1;
        if correct {
            self.stats.correct_answers += 1;
            self.stats.current_streak += 1;
        } else {
            self.stats.current_streak = 0;
        }
        debug!("Quiz answer {} correct={} stats={:?}", selected, correct, self.stats);

        Ok(question.answer.insert(Answer {
            selected,
            correct,
            marks,
        }))
    }

    /// Leave quiz mode and make every marker visible again.
    pub fn exit(&mut self, renderer: &mut dyn MapRenderer) {
        if !self.active {
            return;
        }
        self.active = false;
        self.question = None;
        renderer.show_all();
    }

    fn start_round(
        &mut self,
        found: &[(MarkerId, &PlaceRecord)],
        renderer: &mut dyn MapRenderer,
    ) -> Result<&QuizQuestion, QuizError> {
        if found.len() < QUIZ_OPTIONS {
            self.question = None;
            return Err(QuizError::NotEnoughPlaces {
                found: found.len(),
                needed: QUIZ_OPTIONS,
            });
        }

        let correct_idx = self.rng.random_range(0..found.len());
        let others: Vec<usize> = (0..found.len()).filter(|&i| i != correct_idx).collect();
        let mut picks: Vec<usize> = others
            .choose_multiple(&mut self.rng, QUIZ_OPTIONS - 1)
            .copied()
            .collect();
        picks.push(correct_idx);
        picks.shuffle(&mut self.rng);

        let correct = picks
            .iter()
            .position(|&i| i == correct_idx)
            .unwrap_or_default();
        let options = picks
            .iter()
            .map(|&i| {
                let (id, place) = found[i];
                QuizOption {
                    id,
                    place: place.clone(),
                    icon: ICONS.choose(&mut self.rng).copied().unwrap_or("📍"),
                }
            })
            .collect();

        let question = QuizQuestion {
            options,
            correct,
            answer: None,
        };
        renderer.show_only(question.correct_id());
        renderer.hide_labels();
        debug!("Quiz round for '{}'", question.correct_place().name);

        Ok(self.question.insert(question))
    }
}
