//! Persistence round trips against a real Postgres.
//!
//! Every test returns early when `DATABASE_URL` is unset.

mod common;

use questionask::forms::response::{AnswerPayload, SubmissionPayload};
use questionask::forms::stats::{OptionCount, Summary, summarize};
use questionask::forms::{Form, FormState, QuestionType};
use questionask::models::{form, response};

use common::{create_user, setup_test_db};

fn draft() -> Form {
    let mut form = Form::new("Lunch survey");
    form.description = "Where should we eat?".to_string();

    let q = form.add_question();
    q.set_text("Pick a place");
    q.set_type(QuestionType::Multiple);
    q.set_required(true);
    for (i, text) in ["Pizza", "Sushi"].iter().enumerate() {
        q.add_option().expect("add option");
        q.set_option_text(i, *text).expect("option text");
    }

    let q = form.add_question();
    q.set_text("Anything else?");
    q.set_type(QuestionType::Long);
    form
}

#[tokio::test]
async fn test_create_and_load_form() {
    let Some(pool) = setup_test_db().await else { return };
    let owner = create_user(&pool, "store_create").await;

    let id = form::create(&pool, owner, &draft()).await.expect("create form");
    let stored = form::find_by_id(&pool, &id).await.expect("find").expect("form exists");

    assert_eq!(stored.owner_id, owner);
    assert_eq!(stored.form.id.as_deref(), Some(id.as_str()));
    assert_eq!(stored.form.state(), FormState::Saved);
    assert_eq!(stored.form.questions.len(), 2);
    assert!(stored.form.questions.iter().all(|q| q.id.is_some()));

    let first = &stored.form.questions[0];
    assert_eq!(first.text, "Pick a place");
    assert_eq!(first.question_type(), QuestionType::Multiple);
    let options: Vec<&str> = first.options().iter().map(|o| o.text.as_str()).collect();
    assert_eq!(options, ["Pizza", "Sushi"]);
    assert_eq!(stored.form.questions[1].order, 1);
}

#[tokio::test]
async fn test_update_replaces_questions() {
    let Some(pool) = setup_test_db().await else { return };
    let owner = create_user(&pool, "store_update").await;
    let id = form::create(&pool, owner, &draft()).await.expect("create form");
    let mut edited = form::find_by_id(&pool, &id).await.expect("find").expect("exists").form;

    let kept_id = edited.questions[1].id.clone();
    edited.remove_question(0).expect("remove");
    edited.title = "Dinner survey".to_string();
    let q = edited.add_question();
    q.set_text("When?");
    q.set_type(QuestionType::Time);
    q.order = 2;

    form::update(&pool, &id, &edited).await.expect("update");
    let reloaded = form::find_by_id(&pool, &id).await.expect("find").expect("exists").form;

    assert_eq!(reloaded.title, "Dinner survey");
    assert_eq!(reloaded.questions.len(), 2);
    assert_eq!(reloaded.questions[0].id, kept_id);
    assert_eq!(reloaded.questions[1].question_type(), QuestionType::Time);
}

#[tokio::test]
async fn test_publish_and_list() {
    let Some(pool) = setup_test_db().await else { return };
    let owner = create_user(&pool, "store_publish").await;
    let id = form::create(&pool, owner, &draft()).await.expect("create form");

    form::set_public(&pool, &id).await.expect("publish");
    let stored = form::find_by_id(&pool, &id).await.expect("find").expect("exists");
    assert_eq!(stored.form.state(), FormState::Published);

    let listed = form::list_for_owner(&pool, owner).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert!(listed[0].is_public);
    assert_eq!(listed[0].question_count, 2);
    assert_eq!(listed[0].response_count, 0);
}

#[tokio::test]
async fn test_responses_round_trip_and_summarize() {
    let Some(pool) = setup_test_db().await else { return };
    let owner = create_user(&pool, "store_responses").await;
    let id = form::create(&pool, owner, &draft()).await.expect("create form");
    form::set_public(&pool, &id).await.expect("publish");
    let published = form::find_by_id(&pool, &id).await.expect("find").expect("exists").form;
    let pick = published.questions[0].id.clone().expect("question id");
    let note = published.questions[1].id.clone().expect("question id");

    for (place, comment) in [("Pizza", "hot, please"), ("Pizza", ""), ("Sushi", "")] {
        let payload = SubmissionPayload {
            form_id: id.clone(),
            answers: vec![
                AnswerPayload { question_id: pick.clone(), answer_text: place.to_string() },
                AnswerPayload { question_id: note.clone(), answer_text: comment.to_string() },
            ],
        };
        response::create(&pool, &payload).await.expect("store response");
    }

    let stored = response::find_for_form(&pool, &id).await.expect("load responses");
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().all(|r| r.answers.len() == 2 && r.answers[0].question_id == pick));

    let stats = summarize(&published, &stored);
    assert_eq!(stats.total_responses, 3);
    assert_eq!(
        stats.questions[0].summary,
        Summary::Choices {
            options: vec![
                OptionCount { text: "Pizza".to_string(), count: 2 },
                OptionCount { text: "Sushi".to_string(), count: 1 },
            ],
            other: 0,
        }
    );
    assert_eq!(
        stats.questions[1].summary,
        Summary::Texts { answers: vec!["hot, please".to_string()] }
    );
}

#[tokio::test]
async fn test_delete_cascades() {
    let Some(pool) = setup_test_db().await else { return };
    let owner = create_user(&pool, "store_delete").await;
    let id = form::create(&pool, owner, &draft()).await.expect("create form");

    assert!(form::delete(&pool, &id).await.expect("delete"));
    assert!(form::find_by_id(&pool, &id).await.expect("find").is_none());
    assert!(!form::delete(&pool, &id).await.expect("second delete"));
    assert!(response::find_for_form(&pool, &id).await.expect("responses").is_empty());
}
