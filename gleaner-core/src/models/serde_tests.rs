//! Deserialization tests against trimmed upstream payloads.

use super::*;

#[test]
fn test_docbase_post_full() {
    let json = r#"{
        "id": 1,
        "title": "Onboarding",
        "body": "Welcome!",
        "draft": false,
        "url": "https://example.docbase.io/posts/1",
        "created_at": "2024-04-01T10:00:00+09:00",
        "updated_at": "2024-04-02T10:00:00+09:00",
        "scope": "everyone",
        "tags": [{"name": "guide"}, {"name": "hr"}],
        "user": {"id": 5, "name": "hanako", "profile_image_url": "https://img/5.png"},
        "groups": [{"id": 3, "name": "dev"}]
    }"#;

    let post: DocbasePost = serde_json::from_str(json).unwrap();
    assert_eq!(post.tag_names(), vec!["guide", "hr"]);
    assert_eq!(post.author_name(), Some("hanako"));
    assert_eq!(post.groups[0].name, "dev");
    assert!(post.created_at.is_some());
}

#[test]
fn test_docbase_post_minimal() {
    let post: DocbasePost = serde_json::from_str(r#"{"id": 9}"#).unwrap();
    assert!(post.title.is_empty());
    assert!(post.tags.is_empty());
    assert!(post.user.is_none());
}

#[test]
fn test_qiita_item() {
    let json = r##"{
        "id": "c686397e4a0f4f11683d",
        "title": "Example",
        "body": "# Example",
        "url": "https://qiita.com/qiita/items/c686397e4a0f4f11683d",
        "created_at": "2000-01-01T00:00:00+00:00",
        "likes_count": 100,
        "private": false,
        "tags": [{"name": "Rust", "versions": ["1.85"]}],
        "user": {"id": "qiita", "name": "Qiita"}
    }"##;

    let item: QiitaItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.likes_count, 100);
    assert_eq!(item.tags[0].versions, vec!["1.85"]);
    assert_eq!(item.user.unwrap().id, "qiita");
}

#[test]
fn test_slack_thread_serializes_messages_in_order() {
    let thread = SlackThread {
        channel: SlackChannel {
            id: "C1".into(),
            name: Some("general".into()),
        },
        thread_ts: "1.0".into(),
        permalink: None,
        messages: vec![
            SlackMessage {
                ts: "1.0".into(),
                text: "parent".into(),
                ..Default::default()
            },
            SlackMessage {
                ts: "1.5".into(),
                thread_ts: Some("1.0".into()),
                text: "reply".into(),
                ..Default::default()
            },
        ],
    };

    let json = serde_json::to_value(&thread).unwrap();
    assert_eq!(json["messages"][0]["text"], "parent");
    assert_eq!(json["messages"][1]["text"], "reply");
    assert_eq!(json["channel"]["name"], "general");
}
