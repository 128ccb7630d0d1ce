// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Quiz → Question mapping
//!
//! Display components expect a fixed option list and the index of the
//! right option. Remote quizzes are uncontrolled input, so every quiz maps
//! to some question: unknown kinds and answers of the wrong type degrade
//! to three placeholder options instead of failing.

use super::types::{CorrectAnswer, DisplayKind, Question, QuestionOption, Quiz, QuizKind};

/// Labels of the two synthesized true/false options, in index order
pub const TRUE_FALSE_LABELS: [&str; 2] = ["True", "False"];

/// Labels of the placeholder options used for unmappable quizzes
pub const PLACEHOLDER_LABELS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

/// Map one remote quiz to a display question
///
/// A multiple-choice index is kept as given only when it points at one of
/// the options; out of range, negative or option-less quizzes get the
/// placeholder options with index 0, so `correct_answer_index` is always
/// valid for `options`.
pub fn quiz_to_question(quiz: &Quiz) -> Question {
    let (kind, options, correct_answer_index) =
        map_answer(quiz).unwrap_or_else(placeholder_answer);

    Question {
        id: quiz.id.to_string(),
        category: quiz.category.clone(),
        kind,
        prompt: quiz.prompt.clone(),
        options,
        correct_answer_index,
        explanation: quiz.explanation.clone().unwrap_or_default(),
    }
}

/// Map a list of remote quizzes, preserving order
pub fn quizzes_to_questions(quizzes: &[Quiz]) -> Vec<Question> {
    quizzes.iter().map(quiz_to_question).collect()
}

type MappedAnswer = (DisplayKind, Vec<QuestionOption>, usize);

fn map_answer(quiz: &Quiz) -> Option<MappedAnswer> {
    match (&quiz.kind, &quiz.correct_answer) {
        (QuizKind::MultipleChoice, CorrectAnswer::Index(index)) => {
            let options = quiz.options.as_ref()?;
            let index = usize::try_from(*index).ok().filter(|i| *i < options.len())?;
            let options = options.iter().map(QuestionOption::text).collect();
            Some((DisplayKind::Text, options, index))
        }
        (QuizKind::TrueFalse, CorrectAnswer::Flag(answer)) => {
            let options = TRUE_FALSE_LABELS.iter().map(|l| QuestionOption::text(*l)).collect();
            Some((DisplayKind::Text, options, if *answer { 0 } else { 1 }))
        }
        (QuizKind::ImageToText, answer) => {
            let option = QuestionOption {
                image: quiz.image.clone(),
                ..QuestionOption::text(answer.to_string())
            };
            Some((DisplayKind::Image, vec![option], 0))
        }
        (QuizKind::CompleteSentence, answer) => Some((
            DisplayKind::Text,
            vec![QuestionOption::text(answer.to_string())],
            0,
        )),
        _ => None,
    }
}

fn placeholder_answer() -> MappedAnswer {
    let options = PLACEHOLDER_LABELS.iter().map(|l| QuestionOption::text(*l)).collect();
    (DisplayKind::Text, options, 0)
}
