use super::common::*;
use chrono::Utc;

use crate::workflows::assessment::collector::{ResponseCollector, ValidationError};
use crate::workflows::assessment::domain::{
    Answer, AssessmentId, AssessmentStatus, ResponseSubmission,
};
use crate::workflows::questions::{
    Category, Grade, GradeBand, OptionId, Question, QuestionBank, QuestionId, QuestionKind,
};

fn choice(assessment_id: &AssessmentId, question: &str, option: &str) -> ResponseSubmission {
    ResponseSubmission {
        assessment_id: assessment_id.clone(),
        question_id: QuestionId(question.to_string()),
        answer: Answer::Choice {
            option_id: OptionId(option.to_string()),
        },
        response_time_secs: None,
    }
}

fn free_text(assessment_id: &AssessmentId, question: &str, text: &str) -> ResponseSubmission {
    ResponseSubmission {
        assessment_id: assessment_id.clone(),
        question_id: QuestionId(question.to_string()),
        answer: Answer::FreeText {
            text: text.to_string(),
        },
        response_time_secs: None,
    }
}

#[test]
fn rejects_questions_outside_the_grade_band() {
    let bank = QuestionBank::standard();
    let collector = ResponseCollector::new(&bank);
    let mut assessment = new_assessment(&bank, Grade::Kindergarten);
    let id = assessment.id.clone();

    let err = collector
        .record(
            &mut assessment,
            choice(&id, "cs-analytical-1", "cs-analytical-1-3"),
            Utc::now(),
        )
        .expect_err("analytical question is for older students");
    assert_eq!(
        err,
        ValidationError::OutsideGradeBand {
            question_id: QuestionId("cs-analytical-1".to_string()),
            band: GradeBand::Early,
        }
    );
    assert_eq!(err.field(), "question_id");
    assert!(assessment.responses.is_empty());
}

#[test]
fn rejects_a_second_answer_to_the_same_question() {
    let bank = QuestionBank::standard();
    let collector = ResponseCollector::new(&bank);
    let mut assessment = new_assessment(&bank, Grade::G5);
    let id = assessment.id.clone();

    collector
        .record(&mut assessment, choice(&id, "ls-visual-1", "ls-visual-1-4"), Utc::now())
        .expect("first answer");
    let err = collector
        .record(&mut assessment, choice(&id, "ls-visual-1", "ls-visual-1-2"), Utc::now())
        .expect_err("second answer");
    assert!(matches!(err, ValidationError::AlreadyAnswered(_)));
    assert_eq!(assessment.responses.len(), 1);
}

#[test]
fn answers_must_match_the_question_type() {
    let bank = QuestionBank::standard();
    let collector = ResponseCollector::new(&bank);
    let mut assessment = new_assessment(&bank, Grade::G9);
    let id = assessment.id.clone();

    let err = collector
        .record(&mut assessment, free_text(&id, "ls-visual-1", "pictures"), Utc::now())
        .expect_err("free text on a choice question");
    assert_eq!(err.field(), "answer");

    let err = collector
        .record(&mut assessment, choice(&id, "reflect-1", "reflect-1-1"), Utc::now())
        .expect_err("choice on a free-text question");
    assert!(matches!(err, ValidationError::AnswerKindMismatch { .. }));

    let err = collector
        .record(&mut assessment, choice(&id, "ls-visual-1", "ls-visual-1-9"), Utc::now())
        .expect_err("unknown option");
    assert_eq!(err.field(), "answer.option_id");

    let err = collector
        .record(&mut assessment, free_text(&id, "reflect-1", "   "), Utc::now())
        .expect_err("blank text");
    assert_eq!(err, ValidationError::BlankFreeText(QuestionId("reflect-1".to_string())));

    let err = collector
        .record(&mut assessment, choice(&id, "ls-musical-1", "ls-musical-1-1"), Utc::now())
        .expect_err("unknown question");
    assert!(matches!(err, ValidationError::UnknownQuestion(_)));
}

#[test]
fn free_text_is_trimmed_before_storage() {
    let bank = QuestionBank::standard();
    let collector = ResponseCollector::new(&bank);
    let mut assessment = new_assessment(&bank, Grade::G9);
    let id = assessment.id.clone();

    let response = collector
        .record(
            &mut assessment,
            free_text(&id, "reflect-1", "  I taught myself chess.  "),
            Utc::now(),
        )
        .expect("accepted");
    assert_eq!(
        response.answer,
        Answer::FreeText {
            text: "I taught myself chess.".to_string()
        }
    );
}

#[test]
fn finalize_requires_every_band_question() {
    let bank = example_bank();
    let collector = ResponseCollector::new(&bank);
    let mut assessment = new_assessment(&bank, Grade::G3);
    let mut submissions = example_submissions(&assessment.id);
    let last = submissions.pop().expect("example has answers");

    for submission in submissions {
        collector
            .record(&mut assessment, submission, Utc::now())
            .expect("recorded");
    }

    let err = collector
        .finalize(&mut assessment, Utc::now())
        .expect_err("one answer missing");
    assert_eq!(err.question_ids(), std::slice::from_ref(&last.question_id));
    assert_eq!(err.field(), "responses");
    assert_eq!(assessment.status, AssessmentStatus::InProgress);

    collector
        .record(&mut assessment, last, Utc::now())
        .expect("last answer");
    collector
        .finalize(&mut assessment, Utc::now())
        .expect("all answered");
    assert!(assessment.is_completed());
    assert!(assessment.completed_at.is_some());
}

#[test]
fn completed_assessments_are_write_once() {
    let bank = example_bank();
    let collector = ResponseCollector::new(&bank);
    let mut assessment = new_assessment(&bank, Grade::G4);
    for submission in example_submissions(&assessment.id) {
        collector
            .record(&mut assessment, submission, Utc::now())
            .expect("recorded");
    }
    collector.finalize(&mut assessment, Utc::now()).expect("completes");

    let id = assessment.id.clone();
    let err = collector
        .record(&mut assessment, choice(&id, "ex-visual-1", "ex-visual-1-1"), Utc::now())
        .expect_err("closed");
    assert_eq!(err, ValidationError::AssessmentClosed(id));
    assert!(matches!(
        collector.finalize(&mut assessment, Utc::now()),
        Err(ValidationError::AssessmentClosed(_))
    ));
}

#[test]
fn question_set_is_fixed_when_the_attempt_starts() {
    let mut bank = example_bank();
    let mut assessment = new_assessment(&bank, Grade::G2);
    assert_eq!(assessment.question_ids.len(), 30);
    assert_eq!(assessment.question_ids[0], QuestionId("ex-visual-1".to_string()));

    bank.publish(Question {
        id: QuestionId("ex-late-1".to_string()),
        prompt: "What do you notice first in a new room?".to_string(),
        category: Category::Visual,
        kind: QuestionKind::FreeText,
        grade_bands: vec![GradeBand::Elementary],
        options: Vec::new(),
    })
    .expect("late question is valid");

    let collector = ResponseCollector::new(&bank);
    assert!(!collector
        .missing_questions(&assessment)
        .contains(&QuestionId("ex-late-1".to_string())));
    let id = assessment.id.clone();
    let err = collector
        .record(&mut assessment, free_text(&id, "ex-late-1", "The windows."), Utc::now())
        .expect_err("not assigned");
    assert!(matches!(err, ValidationError::OutsideGradeBand { .. }));
}

#[test]
fn assigning_an_empty_band_is_rejected() {
    let bank = example_bank();
    let mut assessment = new_assessment(&bank, Grade::G4);
    assessment.grade = Grade::G10;
    let err = ResponseCollector::new(&bank)
        .assign_question_set(&mut assessment)
        .expect_err("no high school questions");
    assert_eq!(err, ValidationError::NoQuestionsForGrade(Grade::G10));
}
