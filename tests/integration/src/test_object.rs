//! Object CRUD integration tests.

#[cfg(test)]
mod tests {
    use bluenoise_client::ErrorCode;

    use crate::{client, create_test_bucket};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_run_photos_scenario() {
        let client = client();
        let bucket = create_test_bucket(&client, "photos").await;

        let uploaded = client
            .upload(&bucket, "a.png", "image/png", b"\x89PNGbytesA".to_vec())
            .await
            .expect("upload");
        assert!(uploaded.id.is_some());

        assert_eq!(client.list(&bucket).await.expect("list"), vec!["a.png"]);

        let got = client.download(&bucket, "a.png").await.expect("download");
        assert_eq!(got.body.as_ref(), b"\x89PNGbytesA");
        assert_eq!(got.content_type, "image/png");
        assert_eq!(got.id, uploaded.id);
        assert_eq!(got.etag, uploaded.etag);

        client.delete(&bucket, "a.png").await.expect("delete");

        let err = client.download(&bucket, "a.png").await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::NoSuchKey));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_overwrite_object() {
        let client = client();
        let bucket = create_test_bucket(&client, "overwrite").await;

        client
            .upload(&bucket, "doc", "text/plain", "first")
            .await
            .expect("upload v1");
        client
            .upload(&bucket, "doc", "application/json", "{\"v\":2}")
            .await
            .expect("upload v2");

        let got = client.download(&bucket, "doc").await.expect("download");
        assert_eq!(got.body.as_ref(), b"{\"v\":2}");
        assert_eq!(got.content_type, "application/json");
        assert_eq!(client.list(&bucket).await.expect("list"), vec!["doc"]);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_sorted_keys() {
        let client = client();
        let bucket = create_test_bucket(&client, "sorted").await;

        for key in ["c.txt", "a.txt", "b/nested.txt", "B.txt"] {
            client
                .upload(&bucket, key, "text/plain", key.to_owned())
                .await
                .expect("upload");
        }

        let first = client.list(&bucket).await.expect("list");
        let second = client.list(&bucket).await.expect("list");
        assert_eq!(first, vec!["B.txt", "a.txt", "b/nested.txt", "c.txt"]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_missing_key_on_delete() {
        let client = client();
        let bucket = create_test_bucket(&client, "delmissing").await;

        let err = client.delete(&bucket, "ghost").await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::NoSuchKey));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_store_binary_and_empty_objects() {
        let client = client();
        let bucket = create_test_bucket(&client, "binary").await;

        let binary: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
        client
            .upload(&bucket, "blob.bin", "application/octet-stream", binary.clone())
            .await
            .expect("upload binary");
        client
            .upload(&bucket, "empty", "text/plain", Vec::new())
            .await
            .expect("upload empty");

        let got = client.download(&bucket, "blob.bin").await.expect("download");
        assert_eq!(got.body.as_ref(), binary.as_slice());
        let empty = client.download(&bucket, "empty").await.expect("download");
        assert!(empty.body.is_empty());
    }
}
