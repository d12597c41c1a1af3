mod common;

use axum::http::{Method, StatusCode};
use common::{memory_state, router, send, send_as, send_raw};
use coral::delegate::REGISTRATION_REQUIRED;
use coral::extractors::ROLE_HEADER;
use coral::model::User;
use coral::HeaderRoleAccess;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn promoting_an_unregistered_user_is_401_and_writes_nothing() {
    let app = router(memory_state());
    let (status, body) = send(&app, Method::PUT, "/expert", Some(json!({"integrationId": 1}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!(REGISTRATION_REQUIRED));

    let (status, body) = send(&app, Method::GET, "/expert", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn promote_then_read_with_user() {
    let state = memory_state();
    let user = state.users.create(&User::new("ada@example.com")).await.unwrap();
    let user_id = user.get_id().unwrap();
    let app = router(state);

    let (status, expert) = send(
        &app,
        Method::PUT,
        "/expert",
        Some(json!({"integrationId": 1, "userId": user_id, "role": "OWNER"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(expert["role"], "EXPERT");
    assert_eq!(expert["status"], "ENABLED");
    let id = expert["id"].as_i64().unwrap();

    let (status, plain) = send(&app, Method::GET, &format!("/expert/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(plain.get("user").is_none());

    let (_, with_user) = send(&app, Method::GET, &format!("/experts/{}?flag=include_user", id), None).await;
    assert_eq!(with_user["user"]["email"], "ada@example.com");
    assert_eq!(with_user["user_id"], json!(user_id));
}

#[tokio::test]
async fn include_user_is_null_when_the_user_row_is_gone() {
    let app = router(memory_state());
    let (_, expert) = send(&app, Method::PUT, "/expert", Some(json!({"integration_id": 2, "user_id": 77}))).await;
    let id = expert["id"].as_i64().unwrap();
    let (status, body) = send(&app, Method::GET, &format!("/expert/{}?flag=bogus,include_user", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"].is_null());
    assert!(body.as_object().unwrap().contains_key("user"));
}

#[tokio::test]
async fn search_filters_by_query_and_defaults_to_experts() {
    let state = memory_state();
    state
        .members
        .add_member(1, Some(1), coral::model::IntegrationMemberRole::Owner)
        .await
        .unwrap();
    let app = router(state);
    for (integration, user) in [(1, 10), (1, 11), (2, 12)] {
        send(&app, Method::PUT, "/expert", Some(json!({"integration_id": integration, "user_id": user}))).await;
    }

    let (_, all) = send(&app, Method::GET, "/expert", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, in_one) = send(&app, Method::GET, "/expert?integrationId=1", None).await;
    assert_eq!(in_one.as_array().unwrap().len(), 2);

    let (_, by_body) = send(&app, Method::GET, "/expert", Some(json!({"user_id": 12}))).await;
    assert_eq!(by_body[0]["integration_id"], 2);

    let (status, _) = send(&app, Method::GET, "/expert?password=x", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_refuses_a_body_that_is_not_json() {
    let app = router(memory_state());
    send(&app, Method::PUT, "/expert", Some(json!({"integration_id": 1, "user_id": 10}))).await;

    let (status, body) = send_raw(&app, Method::GET, "/expert", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("not JSON"));

    let (status, all) = send_raw(&app, Method::GET, "/expert", "  \n").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_uses_the_expert_key_and_404s_when_missing() {
    let app = router(memory_state());
    let (_, expert) = send(&app, Method::PUT, "/expert", Some(json!({"integration_id": 1, "user_id": 3}))).await;
    let id = expert["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        Method::POST,
        &format!("/expert/{}", id),
        Some(json!({"expert": {"revenueShare": 40}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["revenue_share"], 40);

    let (status, _) = send(&app, Method::POST, &format!("/expert/{}", id), Some(json!({"revenue_share": 40}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/expert/999", Some(json!({"expert": {"revenue_share": 1}}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/expert/{}", id),
        Some(json!({"expert": {"revenue_share": 140}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_reports_count_even_for_unknown_ids() {
    let app = router(memory_state());
    let (_, expert) = send(&app, Method::PUT, "/expert", Some(json!({"integration_id": 1, "user_id": 3}))).await;
    let uri = format!("/expert/{}", expert["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": 1}));

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": 0}));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn activity_counts_served_transactions() {
    let app = router(memory_state());
    let (_, expert) = send(&app, Method::PUT, "/expert", Some(json!({"integration_id": 4, "user_id": 3}))).await;
    let id = expert["id"].as_i64().unwrap();
    for status in ["COMPLETED", "PENDING"] {
        let (_, t) = send(
            &app,
            Method::PUT,
            "/transactions",
            Some(json!({"integrationId": 4, "expertId": id, "status": status})),
        )
        .await;
        send(
            &app,
            Method::PUT,
            &format!("/transactions/{}/items", t["id"]),
            Some(json!({"item_type": "CALL", "amount": 250, "quantity": 2})),
        )
        .await;
    }

    let (status, body) = send(&app, Method::GET, &format!("/expert/{}/activity", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"expert_id": id, "integration_id": 4, "status": "ENABLED", "transactions": 2, "revenue": 500})
    );
}

#[tokio::test]
async fn header_access_guards_expert_routes() {
    let state = memory_state().with_access(Arc::new(HeaderRoleAccess));
    let app = router(state);

    let (status, body) = send(&app, Method::GET, "/expert", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!("access denied"));

    let (status, _) = send_as(&app, Method::GET, "/expert", None, &[(ROLE_HEADER, "OWNER")]).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_as(&app, Method::DELETE, "/expert/1", None, &[(ROLE_HEADER, "OWNER")]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send_as(&app, Method::DELETE, "/expert/1", None, &[(ROLE_HEADER, "ADMIN")]).await;
    assert_eq!(status, StatusCode::OK);

    // profile reads are open
    let (status, _) = send(&app, Method::GET, "/expert/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
