//! Search and custom metadata integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bluenoise_client::ErrorCode;
    use bluenoise_model::input::UpdateMetadataInput;
    use bluenoise_model::types::MetadataAction;

    use crate::{client, create_test_bucket};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_update_and_search_metadata() {
        let client = client();
        let bucket = create_test_bucket(&client, "meta").await;
        let key = format!("{bucket}-report.pdf");

        let uploaded = client
            .upload(&bucket, &key, "application/pdf", "%PDF-1.7")
            .await
            .expect("upload");
        let id = uploaded.id.expect("object id");

        let updated = client
            .update_metadata(&UpdateMetadataInput {
                id: id.clone(),
                custom_metadata: BTreeMap::from([
                    ("owner".to_owned(), "ana".to_owned()),
                    ("tier".to_owned(), "hot".to_owned()),
                ]),
                action: MetadataAction::Add,
            })
            .await
            .expect("add");
        assert_eq!(updated.id, id);
        assert_eq!(updated.custom_metadata.len(), 2);

        let updated = client
            .update_metadata(&UpdateMetadataInput {
                id: id.clone(),
                custom_metadata: BTreeMap::from([("tier".to_owned(), String::new())]),
                action: MetadataAction::Delete,
            })
            .await
            .expect("delete");
        assert_eq!(updated.custom_metadata.keys().collect::<Vec<_>>(), vec!["owner"]);

        let by_key = client.search(&key).await.expect("search by key");
        assert_eq!(by_key.len(), 1);
        assert_eq!(by_key[0].bucket, bucket);
        assert_eq!(by_key[0].custom_metadata.get("owner").map(String::as_str), Some("ana"));

        let by_bucket = client.search(&bucket).await.expect("search by bucket");
        assert_eq!(by_bucket.len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_unknown_object_id() {
        let err = client()
            .update_metadata(&UpdateMetadataInput {
                id: uuid::Uuid::new_v4().to_string(),
                custom_metadata: BTreeMap::new(),
                action: MetadataAction::Update,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::NoSuchObject));
    }
}
