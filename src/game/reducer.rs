//! Game Reducer
//!
//! Pure transition function folded over answer events:
//! `(state, answer | none) -> state`.
//!
//! No clock, no I/O. All randomness comes from the question generator, so a
//! seeded generator makes a whole game replayable.

use crate::game::question::QuestionGenerator;
use crate::game::state::{AnswerEvent, GameState};

/// Compute the next state.
///
/// * `None` starts the first round.
/// * A correct answer scores a point and starts a new round.
/// * A wrong or unparsable answer ends the game. The question is kept so the
///   final transcript shows what was missed.
pub fn next_state(
    previous: &GameState,
    incoming: Option<&AnswerEvent>,
    questions: &mut QuestionGenerator,
    timer_max: i32,
) -> GameState {
    debug_assert!(!previous.is_over(), "reducer applied to a finished game");

    let Some(answer) = incoming else {
        return GameState {
            question: questions.generate(),
            timer: timer_max,
            ..GameState::initial()
        };
    };

    if answer.value() == Some(previous.question.correct_answer) {
        GameState {
            score: previous.score + 1,
            question: questions.generate(),
            timer: timer_max,
        }
    } else {
        GameState {
            timer: -1,
            ..previous.clone()
        }
    }
}

/// Fold a whole answer sequence, stopping at the first terminal state.
///
/// Used for replaying a transcript. Returns the terminal state, or the last
/// state if the answers ran out first.
pub fn replay<'a, I>(answers: I, questions: &mut QuestionGenerator, timer_max: i32) -> GameState
where
    I: IntoIterator<Item = &'a AnswerEvent>,
{
    let mut state = next_state(&GameState::initial(), None, questions, timer_max);

    for answer in answers {
        state = next_state(&state, Some(answer), questions, timer_max);
        if state.is_over() {
            break;
        }
    }

    state
}
