use httpmock::prelude::*;
use hypixelio::{ClientConfig, Converter, HypixelClient, HypixelError, PlayerRef, SkinKind};
use serde_json::json;

const NOTCH_UUID: &str = "069a79f444e94726a5befca90e38aaf5";

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::with_keys(["test-key"])
        .with_hypixel_api_url(server.url("/v2"))
        .with_mojang_api_url(server.url("/mojang"))
        .with_crafatar_url(server.url("/crafatar"))
}

#[tokio::test]
async fn test_username_and_uuid_round_trip() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/mojang/users/profiles/minecraft/Notch");
            then.status(200)
                .json_body(json!({"id": NOTCH_UUID, "name": "Notch"}));
        })
        .await;
    let by_uuid = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/mojang/user/profile/{}", NOTCH_UUID));
            then.status(200)
                .json_body(json!({"id": NOTCH_UUID, "name": "Notch"}));
        })
        .await;

    let converter = Converter::with_config(&config(&server), None).unwrap();
    assert_eq!(converter.username_to_uuid("Notch").await.unwrap(), NOTCH_UUID);
    assert_eq!(
        converter
            .uuid_to_username("069a79f4-44e9-4726-a5be-fca90e38aaf5")
            .await
            .unwrap(),
        "Notch"
    );
    by_uuid.assert_async().await;
}

#[tokio::test]
async fn test_unknown_name_is_player_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/mojang/users/profiles/minecraft/NoSuchPlayer123");
            then.status(204);
        })
        .await;

    let converter = Converter::with_config(&config(&server), None).unwrap();
    match converter.username_to_uuid("NoSuchPlayer123").await {
        Err(HypixelError::PlayerNotFound { user, .. }) => {
            assert_eq!(user.as_deref(), Some("NoSuchPlayer123"))
        }
        other => panic!("expected PlayerNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_body_is_mojang_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/mojang/user/profile/{}", NOTCH_UUID));
            then.status(200).json_body(json!({
                "error": "IllegalArgumentException",
                "errorMessage": "Invalid UUID string"
            }));
        })
        .await;

    let converter = Converter::with_config(&config(&server), None).unwrap();
    assert!(matches!(
        converter.uuid_to_username(NOTCH_UUID).await,
        Err(HypixelError::MojangApi { ref reason }) if reason == "Invalid UUID string"
    ));
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_the_network() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({}));
        })
        .await;

    let converter = Converter::with_config(&config(&server), None).unwrap();
    assert!(matches!(
        converter.username_to_uuid("   ").await,
        Err(HypixelError::InvalidArgument { .. })
    ));
    assert!(matches!(
        converter.uuid_to_username("definitely-not-a-uuid").await,
        Err(HypixelError::InvalidArgument { .. })
    ));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_names_with_url_syntax_are_rejected() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200)
                .json_body(json!({"id": NOTCH_UUID, "name": "Notch"}));
        })
        .await;

    let converter = Converter::with_config(&config(&server), None).unwrap();
    for name in ["Notch?x=1", "x/../Notch", "Notch#top"] {
        assert!(
            matches!(
                converter.username_to_uuid(name).await,
                Err(HypixelError::InvalidArgument { .. })
            ),
            "{name} should be rejected"
        );
    }
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_skin_urls_are_verified() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/crafatar/renders/head/{}", NOTCH_UUID));
            then.status(200).header("Content-Type", "image/png").body("png");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/crafatar/skins/{}", NOTCH_UUID));
            then.status(422).body("invalid");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/crafatar/avatars/{}", NOTCH_UUID));
            then.status(500).body("render failed");
        })
        .await;

    let client = HypixelClient::with_config(config(&server)).unwrap();
    let player = PlayerRef::uuid(NOTCH_UUID);

    let url = client.get_skin_url(player.clone(), SkinKind::Head).await.unwrap();
    assert_eq!(url.path(), format!("/crafatar/renders/head/{}", NOTCH_UUID));
    assert!(matches!(
        client.get_skin_url(player.clone(), SkinKind::Skin).await,
        Err(HypixelError::InvalidArgument { .. })
    ));
    assert!(matches!(
        client.get_skin_url(player, SkinKind::Avatar).await,
        Err(HypixelError::CrafatarApi { .. })
    ));
}
