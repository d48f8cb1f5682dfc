use super::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rows(cells: &[&[&str]]) -> Vec<Row> {
    cells
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

#[test]
fn single_row_becomes_one_question() {
    let mut rng = StdRng::seed_from_u64(0);
    let questions = prepare(
        &rows(&[&["header"], &["", "Q1", "A", "B", "C", ""]]),
        shuffle::DEFAULT_PASSES,
        &mut rng,
    )
    .unwrap();

    assert_eq!(questions.len(), 1);
    let question = &questions[0];
    assert_eq!(question.correct_answer, "A");
    let mut answers = question.answers.clone();
    answers.sort();
    assert_eq!(answers, vec!["A", "B", "C"]);
}

#[test]
fn serves_every_valid_question_once() {
    let mut rng = StdRng::seed_from_u64(11);
    let table = rows(&[
        &["header"],
        &["", "Q1", "A", "B"],
        &["", "Q2", "A", "B", "C"],
        &["", "", "A", "B"],
        &["", "Q3", "A", "B", "C", "D"],
    ]);
    let questions = prepare(&table, 1, &mut rng).unwrap();
    let mut texts: Vec<&str> = questions.iter().map(|q| q.text.as_str()).collect();
    texts.sort();
    assert_eq!(texts, vec!["Q1", "Q2", "Q3"]);
    for question in &questions {
        assert_eq!(question.answers.len(), question.wrong_answers.len() + 1);
        assert!(question.answers.contains(&question.correct_answer));
    }
}

#[test]
fn zero_passes_keeps_source_order() {
    let mut rng = StdRng::seed_from_u64(5);
    let table = rows(&[&["header"], &["", "Q1", "A", "B"], &["", "Q2", "C", "D"]]);
    let questions = prepare(&table, 0, &mut rng).unwrap();
    assert_eq!(questions[0].text, "Q1");
    assert_eq!(questions[0].answers, vec!["A", "B"]);
    assert_eq!(questions[1].answers, vec!["C", "D"]);
}

#[test]
fn propagates_definition_errors() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        prepare(&rows(&[&["header"]]), 5, &mut rng).unwrap_err(),
        DefinitionError::NoRows
    );
    assert_eq!(
        prepare(&rows(&[&["header"], &["", "Q1"]]), 5, &mut rng).unwrap_err(),
        DefinitionError::NoQuestions
    );
}

#[test]
fn quiz_range_covers_a_to_f() {
    assert_eq!(quiz_range("Quiz1").to_string(), "'Quiz1'!A:F");
}
