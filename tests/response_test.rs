//! Response transformer tests: answer seeding, submit gate, payload shape,
//! display-side re-splitting, server-side submission checks.

use questionask::forms::response::{
    AnswerPayload, AnswerValue, Answers, StoredResponse, SubmissionPayload, can_submit,
    check_submission, initialize_answers, missing_required, reconstruct, split_answer_text,
    to_submission_payload,
};
use questionask::forms::{Form, Question, QuestionType};

fn question(id: &str, question_type: QuestionType, options: &[&str], required: bool) -> Question {
    let mut q = Question::new(0);
    q.id = Some(id.to_string());
    q.set_text(format!("Question {id}"));
    q.set_type(question_type);
    q.set_required(required);
    for (i, text) in options.iter().enumerate() {
        q.add_option().expect("add option");
        q.set_option_text(i, *text).expect("set option text");
    }
    q
}

fn text(s: &str) -> AnswerValue {
    AnswerValue::Text(s.to_string())
}

fn choices(items: &[&str]) -> AnswerValue {
    AnswerValue::Choices(items.iter().map(|s| s.to_string()).collect())
}

fn answer(question_id: &str, answer_text: &str) -> AnswerPayload {
    AnswerPayload {
        question_id: question_id.to_string(),
        answer_text: answer_text.to_string(),
    }
}

/// Public form `f1` with one question of each interesting type.
fn public_form() -> Form {
    let mut form = Form::new("Feedback");
    form.id = Some("f1".to_string());
    form.is_public = true;
    form.questions = vec![
        question("name", QuestionType::Short, &[], true),
        question("colour", QuestionType::Multiple, &["Red", "Blue"], false),
        question("tags", QuestionType::Checkbox, &["a", "b", "c"], false),
        question("score", QuestionType::Rating, &[], false),
        question("day", QuestionType::Date, &[], false),
        question("at", QuestionType::Time, &[], false),
    ];
    for (i, q) in form.questions.iter_mut().enumerate() {
        q.order = i as i32;
    }
    form
}

fn submission(answers: Vec<AnswerPayload>) -> SubmissionPayload {
    SubmissionPayload { form_id: "f1".to_string(), answers }
}

// ---------------------------------------------------------------------------
// Seeding and the gate
// ---------------------------------------------------------------------------

#[test]
fn test_initialize_answers_shapes() {
    let questions = vec![
        question("q1", QuestionType::Short, &[], false),
        question("q2", QuestionType::Checkbox, &[], false),
    ];
    let answers = initialize_answers(&questions);

    let expected: Answers = [("q1".to_string(), text("")), ("q2".to_string(), choices(&[]))]
        .into_iter()
        .collect();
    assert_eq!(answers, expected);
}

#[test]
fn test_initialize_answers_skips_unsaved_questions() {
    let questions = vec![Question::new(0)];
    assert!(initialize_answers(&questions).is_empty());
}

#[test]
fn test_gate_required_checkbox() {
    let questions = vec![question("q1", QuestionType::Checkbox, &["a", "b"], true)];
    let mut answers = initialize_answers(&questions);
    assert!(!can_submit(&questions, &answers));
    assert_eq!(missing_required(&questions, &answers).len(), 1);

    answers.insert("q1".to_string(), choices(&["a"]));
    assert!(can_submit(&questions, &answers));
    assert!(missing_required(&questions, &answers).is_empty());
}

#[test]
fn test_gate_blank_text_is_unanswered() {
    let questions = vec![
        question("q1", QuestionType::Short, &[], true),
        question("q2", QuestionType::Long, &[], false),
    ];
    let mut answers = initialize_answers(&questions);
    answers.insert("q1".to_string(), text("   "));
    assert!(!can_submit(&questions, &answers));

    answers.insert("q1".to_string(), text("hi"));
    assert!(can_submit(&questions, &answers), "optional q2 may stay empty");
}

#[test]
fn test_gate_and_missing_required_agree() {
    let questions = vec![
        question("q1", QuestionType::Short, &[], true),
        question("q2", QuestionType::Checkbox, &["x"], true),
        question("q3", QuestionType::Date, &[], false),
    ];
    let candidates = [
        initialize_answers(&questions),
        [("q1".to_string(), text("a"))].into_iter().collect(),
        [("q1".to_string(), text("a")), ("q2".to_string(), choices(&["x"]))]
            .into_iter()
            .collect(),
        Answers::new(),
    ];
    for answers in &candidates {
        assert_eq!(
            can_submit(&questions, answers),
            missing_required(&questions, answers).is_empty()
        );
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[test]
fn test_submission_payload_joins_lists() {
    let answers: Answers = [
        ("q1".to_string(), choices(&["a", "b"])),
        ("q2".to_string(), text("hello")),
    ]
    .into_iter()
    .collect();

    let payload = to_submission_payload("f1", &answers);
    assert_eq!(payload.form_id, "f1");
    assert_eq!(payload.answers, vec![answer("q1", "a, b"), answer("q2", "hello")]);

    let json = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "formId": "f1",
            "answers": [
                {"questionId": "q1", "answerText": "a, b"},
                {"questionId": "q2", "answerText": "hello"}
            ]
        })
    );
}

#[test]
fn test_submission_payload_is_stable() {
    let answers: Answers = [
        ("z".to_string(), text("last")),
        ("a".to_string(), choices(&["x"])),
        ("m".to_string(), choices(&[])),
    ]
    .into_iter()
    .collect();
    assert_eq!(to_submission_payload("f", &answers), to_submission_payload("f", &answers));
    assert_eq!(to_submission_payload("f", &answers).answers[2], answer("m", ""));
}

#[test]
fn test_answer_value_json_is_untagged() {
    let parsed: Answers = serde_json::from_str(r#"{"q1": ["a", "b"], "q2": "hello"}"#)
        .expect("parse answers");
    assert_eq!(parsed["q1"], choices(&["a", "b"]));
    assert_eq!(parsed["q2"], text("hello"));
}

// ---------------------------------------------------------------------------
// Display-side inverse
// ---------------------------------------------------------------------------

#[test]
fn test_split_answer_text() {
    assert_eq!(split_answer_text(QuestionType::Checkbox, "a, b"), choices(&["a", "b"]));
    assert_eq!(split_answer_text(QuestionType::Checkbox, ""), choices(&[]));
    assert_eq!(split_answer_text(QuestionType::Short, "a, b"), text("a, b"));
}

#[test]
fn test_reconstruct_uses_question_types() {
    let form = public_form();
    let stored = StoredResponse {
        id: "r1".to_string(),
        form_id: "f1".to_string(),
        submitted_at: "2026-01-01T00:00:00Z".to_string(),
        answers: vec![answer("tags", "a, c"), answer("name", "Ann, Bo"), answer("gone", "x, y")],
    };
    let display = reconstruct(&form, &stored);
    let values: Vec<&AnswerValue> = display.answers.iter().map(|a| &a.value).collect();
    assert_eq!(values, [&choices(&["a", "c"]), &text("Ann, Bo"), &text("x, y")]);
}

// ---------------------------------------------------------------------------
// Server-side submission checks
// ---------------------------------------------------------------------------

#[test]
fn test_check_submission_accepts_valid_answers() {
    let payload = submission(vec![
        answer("name", "Ann"),
        answer("colour", "Blue"),
        answer("tags", "a, c"),
        answer("score", "4"),
        answer("day", "2026-02-28"),
        answer("at", "09:30"),
    ]);
    assert_eq!(check_submission(&public_form(), &payload), Vec::<String>::new());
}

#[test]
fn test_check_submission_requires_required_answers() {
    let errors = check_submission(&public_form(), &submission(vec![answer("colour", "Red")]));
    assert_eq!(errors, vec!["\"Question name\" requires an answer".to_string()]);
}

#[test]
fn test_check_submission_optional_blank_answers_pass() {
    let payload = submission(vec![answer("name", "Ann"), answer("tags", ""), answer("day", "")]);
    assert!(check_submission(&public_form(), &payload).is_empty());
}

#[test]
fn test_check_submission_rejects_unknown_and_duplicate_questions() {
    let payload = submission(vec![
        answer("name", "Ann"),
        answer("nope", "x"),
        answer("name", "Bo"),
    ]);
    let errors = check_submission(&public_form(), &payload);
    assert_eq!(
        errors,
        vec![
            "Unknown question: nope".to_string(),
            "Question answered more than once: name".to_string(),
        ]
    );
}

#[test]
fn test_check_submission_rejects_non_options() {
    let payload = submission(vec![
        answer("name", "Ann"),
        answer("colour", "Green"),
        answer("tags", "a, z"),
    ]);
    let errors = check_submission(&public_form(), &payload);
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("\"Green\" is not one of the options"));
    assert!(errors[1].contains("\"z\" is not one of the options"));
}

#[test]
fn test_check_submission_checks_typed_answers() {
    let payload = submission(vec![
        answer("name", "Ann"),
        answer("score", "6"),
        answer("day", "2026-02-30"),
        answer("at", "25:00"),
    ]);
    let errors = check_submission(&public_form(), &payload);
    assert_eq!(
        errors,
        vec![
            "\"Question score\": Must be at most 5".to_string(),
            "\"Question day\": Not a valid date".to_string(),
            "\"Question at\": Not a valid time".to_string(),
        ]
    );
}

#[test]
fn test_check_submission_rating_must_be_whole() {
    let payload = submission(vec![answer("name", "Ann"), answer("score", "3.5")]);
    assert_eq!(
        check_submission(&public_form(), &payload),
        vec!["\"Question score\": Rating must be a whole number".to_string()]
    );
}

#[test]
fn test_check_submission_requires_public_form() {
    let mut form = public_form();
    form.is_public = false;
    let payload = submission(vec![answer("name", "Ann")]);
    assert_eq!(
        check_submission(&form, &payload),
        vec!["Form is not accepting responses".to_string()]
    );
}

#[test]
fn test_check_submission_wrong_form() {
    let payload = SubmissionPayload { form_id: "other".to_string(), answers: vec![] };
    assert_eq!(
        check_submission(&public_form(), &payload),
        vec!["Submission does not belong to this form".to_string()]
    );
}
