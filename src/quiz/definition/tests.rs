use super::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn rows(cells: &[&[&str]]) -> Vec<Row> {
    cells
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

const HEADER: &[&str] = &["#", "Question", "Correct", "Wrong 1", "Wrong 2", "Wrong 3"];

#[test]
fn builds_question_from_full_row() {
    let definition =
        QuizDefinition::from_rows(&rows(&[HEADER, &["", "Q1", "A", "B", "C", ""]])).unwrap();
    assert_eq!(
        &definition.questions,
        &vec![Question {
            text: "Q1".to_owned(),
            correct_answer: "A".to_owned(),
            wrong_answers: vec!["B".to_owned(), "C".to_owned()],
            answers: vec![],
        }]
    );
}

#[test]
fn header_row_is_never_a_question() {
    let definition = QuizDefinition::from_rows(&rows(&[
        &["", "Looks like", "a", "question"],
        &["", "Q1", "A", "B"],
    ]))
    .unwrap();
    assert_eq!(definition.questions.len(), 1);
    assert_eq!(definition.questions[0].text, "Q1");
}

#[rstest]
#[case::missing_question(&["", "", "A", "B"])]
#[case::missing_correct_answer(&["", "Q", "", "B"])]
#[case::missing_all_wrong_answers(&["", "Q", "A", "", "", ""])]
#[case::short_row(&["", "Q", "A"])]
#[case::empty_row(&[])]
fn drops_malformed_rows(#[case] bad_row: &[&str]) {
    let definition =
        QuizDefinition::from_rows(&rows(&[HEADER, bad_row, &["", "Good", "A", "B"]])).unwrap();
    let texts: Vec<&str> = definition
        .questions
        .iter()
        .map(|q| q.text.as_str())
        .collect();
    assert_eq!(texts, vec!["Good"]);
}

#[test]
fn keeps_only_filled_wrong_answers() {
    let definition = QuizDefinition::from_rows(&rows(&[
        HEADER,
        &["", "Q1", "A", "", "", "D"],
        &["", "Q2", "A", "B", "C", "D", "ignored"],
    ]))
    .unwrap();
    let questions = &definition.questions;
    assert_eq!(questions[0].wrong_answers, vec!["D"]);
    assert_eq!(questions[1].wrong_answers, vec!["B", "C", "D"]);
}

#[test]
fn every_question_has_one_to_three_wrong_answers() {
    let definition = QuizDefinition::from_rows(&rows(&[
        HEADER,
        &["", "Q1", "A", "B"],
        &["", "Q2", "A", "B", "C"],
        &["", "Q3", "A", "B", "C", "D"],
        &["", "Q4", "", "B", "C", "D"],
    ]))
    .unwrap();
    assert_eq!(definition.questions.len(), 3);
    for question in &definition.questions {
        assert!(!question.correct_answer.is_empty());
        assert!((1..=3).contains(&question.wrong_answers.len()));
        assert!(question.wrong_answers.iter().all(|a| !a.is_empty()));
    }
}

#[rstest]
#[case::empty_table(&[])]
#[case::header_only(&[HEADER])]
fn reports_missing_rows(#[case] table: &[&[&str]]) {
    assert_eq!(
        QuizDefinition::from_rows(&rows(table)).unwrap_err(),
        DefinitionError::NoRows
    );
}

#[test]
fn reports_when_no_row_is_valid() {
    let result = QuizDefinition::from_rows(&rows(&[HEADER, &["", "Q1", "A"], &["", "", "A", "B"]]));
    assert_eq!(result.unwrap_err(), DefinitionError::NoQuestions);
}

#[test]
fn candidate_answers_start_with_correct_answer() {
    let question = Question::try_from(RawQuestion {
        text: "Q".to_owned(),
        correct_answer: "A".to_owned(),
        wrong_answers: vec!["B".to_owned(), String::new(), "C".to_owned()],
    })
    .unwrap();
    assert_eq!(question.candidate_answers(), vec!["A", "B", "C"]);
    assert!(question.is_answer_correct("A"));
    assert!(!question.is_answer_correct("B"));
}

#[test]
fn row_defects_are_reported() {
    let raw = |cells: &[&str]| {
        let row: Row = cells.iter().map(|c| c.to_string()).collect();
        RawQuestion::from(&row)
    };
    assert_eq!(
        Question::try_from(raw(&["", "", "A", "B"])),
        Err(RowDefect::MissingQuestion)
    );
    assert_eq!(
        Question::try_from(raw(&["", "Q", "", "B"])),
        Err(RowDefect::MissingCorrectAnswer)
    );
    assert_eq!(
        Question::try_from(raw(&["", "Q", "A"])),
        Err(RowDefect::MissingWrongAnswers)
    );
}

#[test]
fn serializes_with_client_field_names() {
    let question = Question {
        text: "Q1".to_owned(),
        correct_answer: "A".to_owned(),
        wrong_answers: vec!["B".to_owned()],
        answers: vec!["B".to_owned(), "A".to_owned()],
    };
    assert_eq!(
        serde_json::to_value(&question).unwrap(),
        serde_json::json!({
            "question": "Q1",
            "correctAnswer": "A",
            "wrongAnswers": ["B"],
            "answers": ["B", "A"],
        })
    );
}
