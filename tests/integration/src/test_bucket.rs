//! Bucket integration tests.

#[cfg(test)]
mod tests {
    use bluenoise_client::ErrorCode;

    use crate::{client, create_test_bucket, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_bucket_once() {
        let client = client();
        let bucket = create_test_bucket(&client, "once").await;

        let err = client.create_bucket(&bucket).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::BucketAlreadyExists));

        let keys = client.list(&bucket).await.expect("list");
        assert!(keys.is_empty(), "namespace should be untouched");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_invalid_bucket_names() {
        let client = client();
        let too_long = "x".repeat(64);
        for name in ["has space", "dot.ted", too_long.as_str()] {
            let err = client.create_bucket(name).await.unwrap_err();
            assert_eq!(err.code(), Some(ErrorCode::InvalidBucketName), "{name}");
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_missing_bucket() {
        let client = client();
        let bucket = test_bucket_name("absent");

        let err = client.list(&bucket).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::NoSuchBucket));

        let err = client
            .upload(&bucket, "k", "text/plain", "v")
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::NoSuchBucket));
    }
}
