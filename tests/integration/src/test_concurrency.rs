//! Concurrent access integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::future::join_all;

    use crate::{client, create_test_bucket};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_concurrent_uploads_on_distinct_keys() {
        let client = client();
        let bucket = create_test_bucket(&client, "fanout").await;

        let uploads = (0..24).map(|i| {
            let client = client.clone();
            let bucket = bucket.clone();
            async move {
                client
                    .upload(&bucket, &format!("k{i:02}"), "text/plain", format!("v{i}"))
                    .await
            }
        });
        for result in join_all(uploads).await {
            result.expect("upload");
        }

        let keys = client.list(&bucket).await.expect("list");
        let expected: Vec<String> = (0..24).map(|i| format!("k{i:02}")).collect();
        assert_eq!(keys, expected);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_never_serve_mixed_content() {
        let client = client();
        let bucket = create_test_bucket(&client, "torn").await;

        let a = Bytes::from(vec![b'a'; 256 * 1024]);
        let z = Bytes::from(vec![b'z'; 256 * 1024]);
        client
            .upload(&bucket, "hot", "application/octet-stream", a.clone())
            .await
            .expect("seed");

        let writers = (0..8).map(|i| {
            let client = client.clone();
            let bucket = bucket.clone();
            let body = if i % 2 == 0 { z.clone() } else { a.clone() };
            async move {
                client
                    .upload(&bucket, "hot", "application/octet-stream", body)
                    .await
                    .map(|_| ())
            }
        });
        let readers = (0..16).map(|_| {
            let client = client.clone();
            let bucket = bucket.clone();
            async move { client.download(&bucket, "hot").await }
        });

        let (written, read) = tokio::join!(join_all(writers), join_all(readers));
        for result in written {
            result.expect("upload");
        }
        for result in read {
            let got = result.expect("download");
            assert!(got.body == a || got.body == z, "observed mixed content");
        }
    }
}
