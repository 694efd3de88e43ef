use uuid::Uuid;

use crate::helpers::{subscription_body, TestApp};

#[tokio::test]
async fn summary_clips_subscriptions_to_the_query_window() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .create_subscription(subscription_body(
            "Netflix",
            100,
            Uuid::new_v4(),
            "01-2024",
            Some("06-2024"),
        ))
        .await;

    let summary = test_app
        .summary_of(serde_json::json!({"start_date": "03-2024", "end_date": "12-2024"}))
        .await;

    assert_eq!(summary, 400);
}

#[tokio::test]
async fn summary_bills_open_ended_subscriptions_until_the_window_end() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .create_subscription(subscription_body("Spotify", 50, Uuid::new_v4(), "01-2024", None))
        .await;

    let summary = test_app
        .summary_of(serde_json::json!({"start_date": "06-2024", "end_date": "08-2024"}))
        .await;

    assert_eq!(summary, 150);
}

#[tokio::test]
async fn summary_excludes_subscriptions_outside_the_window() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .create_subscription(subscription_body(
            "Netflix",
            100,
            Uuid::new_v4(),
            "01-2024",
            Some("02-2024"),
        ))
        .await;

    let summary = test_app
        .summary_of(serde_json::json!({"start_date": "06-2024", "end_date": "08-2024"}))
        .await;

    assert_eq!(summary, 0);
}

#[tokio::test]
async fn summary_applies_the_service_and_user_filters() {
    let test_app = TestApp::spawn_app().await;
    let user_id = Uuid::new_v4();
    test_app
        .create_subscription(subscription_body("Netflix", 100, user_id, "01-2024", None))
        .await;
    test_app
        .create_subscription(subscription_body("Spotify", 10, user_id, "01-2024", None))
        .await;
    test_app
        .create_subscription(subscription_body(
            "Netflix",
            1000,
            Uuid::new_v4(),
            "01-2024",
            None,
        ))
        .await;

    let everything = test_app
        .summary_of(serde_json::json!({"start_date": "01-2024", "end_date": "12-2024"}))
        .await;
    let netflix = test_app
        .summary_of(serde_json::json!({
            "service_name": "Netflix",
            "start_date": "01-2024",
            "end_date": "12-2024"
        }))
        .await;
    let user_netflix = test_app
        .summary_of(serde_json::json!({
            "service_name": "Netflix",
            "user_id": user_id,
            "start_date": "01-2024",
            "end_date": "12-2024"
        }))
        .await;
    let user = test_app
        .summary_of(serde_json::json!({
            "service_name": "",
            "user_id": user_id,
            "start_date": "01-2024",
            "end_date": "12-2024"
        }))
        .await;

    assert_eq!(everything, (100 + 10 + 1000) * 12);
    assert_eq!(netflix, (100 + 1000) * 12);
    assert_eq!(user_netflix, 100 * 12);
    assert_eq!(user, (100 + 10) * 12);
}

#[tokio::test]
async fn summary_returns_400_when_dates_are_missing_or_reversed() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({}), "missing dates"),
        (
            serde_json::json!({"start_date": "01-2024"}),
            "missing end date",
        ),
        (
            serde_json::json!({"start_date": "01-2024", "end_date": null}),
            "null end date",
        ),
        (
            serde_json::json!({"start_date": "06-2024", "end_date": "05-2024"}),
            "end date before start date",
        ),
        (
            serde_json::json!({"start_date": "13-2024", "end_date": "12-2024"}),
            "month out of range",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_summary(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn summary_returns_500_when_the_total_overflows() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .create_subscription(subscription_body(
            "Netflix",
            i64::MAX / 4,
            Uuid::new_v4(),
            "01-2024",
            None,
        ))
        .await;

    let response = test_app
        .post_summary(&serde_json::json!({"start_date": "01-2024", "end_date": "12-2024"}))
        .await;

    assert_eq!(500, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["message"], "internal server error");
}
