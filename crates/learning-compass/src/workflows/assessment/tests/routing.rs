use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::PaymentConfig;
use crate::workflows::assessment::{
    AssessmentService, Requester, ROLE_HEADER, STUDENT_HEADER,
};
use crate::workflows::questions::{Category, QuestionBank};

fn student_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(ROLE_HEADER, "student")
        .header(STUDENT_HEADER, "stu-1");
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn example_batch(assessment_id: &str) -> Value {
    let responses: Vec<Value> = EXAMPLE_ANSWERS
        .iter()
        .flat_map(|(category, values)| {
            values.iter().enumerate().map(move |(index, value)| {
                let question_id = example_question_id(*category, index);
                json!({
                    "question_id": question_id,
                    "answer": { "kind": "choice", "option_id": option_for(&question_id, *value) },
                })
            })
        })
        .collect();
    json!({ "assessment_id": assessment_id, "responses": responses })
}

#[tokio::test]
async fn requests_without_identity_are_forbidden() {
    let (service, _) = build_service(example_bank());
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/questions/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains(ROLE_HEADER));
}

#[tokio::test]
async fn students_must_name_themselves() {
    let (service, _) = build_service(example_bank());
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/questions/")
                .header(ROLE_HEADER, "student")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn full_assessment_flow_over_http() {
    let (service, _) = build_service(example_bank());
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(student_request(
            "POST",
            "/api/v1/assessments/",
            Some(json!({ "grade": "G4" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json_body(response).await;
    let id = created["assessment_id"].as_str().unwrap().to_string();
    assert_eq!(created["student_id"], "stu-1");
    assert_eq!(created["grade_band"], "elementary");

    let response = router
        .clone()
        .oneshot(student_request(
            "POST",
            "/api/v1/responses/batch/",
            Some(example_batch(&id)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(read_json_body(response).await["recorded"], 30);

    let response = router
        .clone()
        .oneshot(student_request(
            "POST",
            &format!("/api/v1/assessments/{id}/complete/"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let completed = read_json_body(response).await;
    assert_eq!(completed["learning_style"]["primary"], "logical");
    assert_eq!(completed["learning_style"]["secondary"], "visual");

    let response = router
        .clone()
        .oneshot(student_request(
            "GET",
            &format!("/api/v1/assessments/{id}/results/"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, completed);

    let response = router
        .clone()
        .oneshot(student_request(
            "GET",
            &format!("/api/v1/reports/{id}/detailed/"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let payment = read_json_body(response).await;
    assert_eq!(payment["amount"], 100);
    assert_eq!(payment["currency"], "AED");
    assert!(payment.get("ranking").is_none());

    let response = router
        .clone()
        .oneshot(student_request(
            "POST",
            &format!("/api/v1/payments/{id}/confirm/"),
            Some(json!({ "transaction_id": "txn-1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(student_request(
            "GET",
            &format!("/api/v1/reports/{id}/detailed/"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&format!("detailed_report_{id}.html")));
    let html = read_text_body(response).await;
    assert!(html.contains("Recommended Courses"));
}

#[tokio::test]
async fn invalid_answers_name_the_field() {
    let (service, _) = build_service(example_bank());
    let assessment = service
        .create_assessment(
            &Requester::student("stu-1"),
            crate::workflows::assessment::NewAssessment {
                grade: crate::workflows::questions::Grade::G4,
                student_id: None,
            },
        )
        .unwrap();
    let router = router_with_service(service);
    let question_id = example_question_id(Category::Visual, 0);

    let response = router
        .oneshot(student_request(
            "POST",
            "/api/v1/responses/",
            Some(json!({
                "assessment_id": assessment.id,
                "question_id": question_id,
                "answer": { "kind": "choice", "option_id": "missing" },
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], "answer.option_id");
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let (service, _) = build_service(example_bank());
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/assessments/")
                .header(ROLE_HEADER, "student")
                .header(STUDENT_HEADER, "stu-1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"grade\":"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["field"], "body");
}

#[tokio::test]
async fn unknown_assessments_return_not_found() {
    let (service, _) = build_service(example_bank());
    let router = router_with_service(service);

    let response = router
        .oneshot(student_request(
            "GET",
            "/api/v1/assessments/asm-missing/results/",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn question_listing_filters_by_grade() {
    let (service, _) = build_service(QuestionBank::standard());
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(student_request("GET", "/api/v1/questions/?grade=K", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let questions = read_json_body(response).await;
    let ids: Vec<&str> = questions
        .as_array()
        .unwrap()
        .iter()
        .map(|question| question["id"].as_str().unwrap())
        .collect();
    assert!(!ids.is_empty());
    assert!(!ids.contains(&"reflect-1"));

    let response = router
        .oneshot(student_request("GET", "/api/v1/questions/?grade=G13", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["field"], "grade");
}

#[tokio::test]
async fn storage_failures_map_to_internal_errors() {
    let service = Arc::new(AssessmentService::new(
        Arc::new(UnavailableRepository),
        example_bank(),
        PaymentConfig::default(),
    ));

    let response = crate::workflows::assessment::router::status_handler::<
        UnavailableRepository,
        crate::workflows::assessment::scoring::IgnoreFreeText,
    >(
        State(service),
        Requester::admin(),
        Path("asm-000001".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn student_history_route_checks_the_linked_student() {
    let (service, _) = build_service(example_bank());
    let id = completed_example(&service);
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(student_request("GET", "/api/v1/students/stu-2/assessments/", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .oneshot(student_request("GET", "/api/v1/students/stu-1/assessments/", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["student_id"], "stu-1");
    let assessments = body["assessments"].as_array().unwrap();
    assert_eq!(assessments.len(), 1);
    assert_eq!(assessments[0]["assessment_id"], id.0.as_str());
    assert!(assessments[0]["completed_at"].is_string());
    assert_eq!(assessments[0]["learning_style"]["primary"], "logical");
}
