use cloudlink_enterprise::{
    CloudLinkClient, CloudLinkConfig, CloudLinkError, ExpirationType, Priority, PushNotification,
    PushNotificationTarget,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_notification() -> PushNotification {
    PushNotification {
        title: "Title".into(),
        body: "Body".into(),
        priority: Priority::High,
        expiration_type: ExpirationType::Days,
        expiration_amount: 5,
        ..Default::default()
    }
}

fn client_for(server: &MockServer) -> CloudLinkClient {
    CloudLinkClient::new(CloudLinkConfig::with_host(server.uri(), "test-key")).unwrap()
}

#[tokio::test]
async fn send_push_notification_returns_server_assigned_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/3/push/enterprise/notification"))
        .and(header("authorization", "Gluon test-key"))
        .and(body_string_contains("title=Title"))
        .and(body_string_contains("body=Body"))
        .and(body_string_contains("deliveryDate=0"))
        .and(body_string_contains("priority=HIGH"))
        .and(body_string_contains("expirationType=DAYS"))
        .and(body_string_contains("expirationAmount=5"))
        .and(body_string_contains("targetType=ALL_DEVICES"))
        .and(body_string_contains("invisible=false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "{\"identifier\":\"n-42\",\"creationDate\":1500000000000,\"title\":\"Title\"}",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let sent = client_for(&server)
        .send_push_notification(&sample_notification())
        .await
        .unwrap();

    assert_eq!(sent.identifier.as_deref(), Some("n-42"));
    assert_eq!(sent.creation_date, 1_500_000_000_000);
}

#[tokio::test]
async fn topic_target_is_sent_as_form_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/3/push/enterprise/notification"))
        .and(body_string_contains("targetType=TOPIC"))
        .and(body_string_contains("targetTopic=sports"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("{\"identifier\":\"n-topic\"}"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let notification = PushNotification {
        target: PushNotificationTarget::topic("sports"),
        ..sample_notification()
    };

    let sent = client_for(&server)
        .send_push_notification(&notification)
        .await
        .unwrap();
    assert_eq!(sent.identifier.as_deref(), Some("n-topic"));
}

#[tokio::test]
async fn single_device_target_sends_device_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/3/push/enterprise/notification"))
        .and(body_string_contains("targetType=SINGLE_DEVICE"))
        .and(body_string_contains("targetDeviceToken=fa91b5b4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("{\"identifier\":\"n-device\"}"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let notification = PushNotification {
        target: PushNotificationTarget::single_device("fa91b5b4"),
        ..sample_notification()
    };

    let sent = client_for(&server)
        .send_push_notification(&notification)
        .await
        .unwrap();
    assert_eq!(sent.identifier.as_deref(), Some("n-device"));
}

#[tokio::test]
async fn invalid_notification_never_reaches_the_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // 5 weeks exceeds the WEEKS maximum of 4.
    let notification = PushNotification {
        expiration_amount: 5,
        ..PushNotification::default()
    };

    let error = client_for(&server)
        .send_push_notification(&notification)
        .await
        .unwrap_err();
    assert!(matches!(error, CloudLinkError::Validation(_)), "{error:?}");
}

#[tokio::test]
async fn unauthorized_response_maps_to_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/3/push/enterprise/notification"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server)
        .send_push_notification(&sample_notification())
        .await
        .unwrap_err();

    match error {
        CloudLinkError::Status {
            status,
            reason,
            body,
        } => {
            assert_eq!(status, 401);
            assert_eq!(reason, "Unauthorized");
            assert!(body.is_none());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn error_response_body_is_captured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/3/push/enterprise/notification"))
        .respond_with(ResponseTemplate::new(500).set_body_string("push gateway unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server)
        .send_push_notification(&sample_notification())
        .await
        .unwrap_err();

    match error {
        CloudLinkError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body.as_deref(), Some("push gateway unavailable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
