//! Envelope success checks and wire shape.

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use questionask::envelope::{ApplicationError, CREATED, Envelope, OK, Operation};

#[test]
fn test_success_codes() {
    assert_eq!(Operation::CreateForm.success_code(), CREATED);
    assert_eq!(Operation::SubmitResponse.success_code(), CREATED);
    assert_eq!(Operation::Register.success_code(), CREATED);
    for op in [
        Operation::UpdateForm,
        Operation::FetchForm,
        Operation::ListForms,
        Operation::DeleteForm,
        Operation::PublishForm,
        Operation::FetchPublicForm,
        Operation::FetchStats,
        Operation::Login,
    ] {
        assert_eq!(op.success_code(), OK, "{op:?}");
    }
}

#[test]
fn test_into_data_on_success() {
    let env = Envelope::created("abc".to_string());
    assert_eq!(env.into_data(Operation::CreateForm), Ok("abc".to_string()));
}

#[test]
fn test_into_data_wrong_success_code_is_failure() {
    // A 200 is not success for an operation that succeeds with 201
    let env = Envelope::ok(());
    assert_eq!(
        env.into_data(Operation::CreateForm),
        Err(ApplicationError { code: OK, message: "OK".to_string() })
    );
}

#[test]
fn test_into_data_keeps_message_verbatim() {
    let env: Envelope<serde_json::Value> =
        serde_json::from_str(r#"{"code": 400, "message": "Title is required", "data": null}"#)
            .expect("parse envelope");
    let err = env.into_data(Operation::UpdateForm).unwrap_err();
    assert_eq!(err.code, 400);
    assert_eq!(err.message, "Title is required");
    assert_eq!(err.to_string(), "Title is required (code 400)");
}

#[test]
fn test_envelope_json_shape() {
    let json = serde_json::to_value(Envelope::ok(vec![1, 2])).expect("serialize");
    assert_eq!(json, serde_json::json!({"code": 200, "message": "OK", "data": [1, 2]}));
}

#[actix_rt::test]
async fn test_into_response_status_mirrors_code() {
    let resp = Envelope::new(404, "Not found", serde_json::Value::Null).into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = to_bytes(resp.into_body()).await.expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["code"], 404);
    assert_eq!(json["message"], "Not found");
}
