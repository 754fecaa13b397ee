//! Wire-level error handling tests.
//!
//! These bypass the typed client to exercise malformed requests.

#[cfg(test)]
mod tests {
    use crate::{client, create_test_bucket, endpoint_url};

    fn http() -> reqwest::Client {
        reqwest::Client::new()
    }

    fn error_code(resp: &reqwest::Response) -> Option<String> {
        resp.headers()
            .get("x-error-code")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned)
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_missing_parameters() {
        let resp = http()
            .get(format!("{}/list", endpoint_url()))
            .send()
            .await
            .expect("send");
        assert_eq!(resp.status().as_u16(), 400);
        assert_eq!(error_code(&resp).as_deref(), Some("InvalidRequest"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_wrong_method() {
        let resp = http()
            .get(format!("{}/delete?bucket=b&filename=k", endpoint_url()))
            .send()
            .await
            .expect("send");
        assert_eq!(resp.status().as_u16(), 405);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_unknown_path() {
        let resp = http()
            .get(format!("{}/buckets", endpoint_url()))
            .send()
            .await
            .expect("send");
        assert_eq!(resp.status().as_u16(), 404);
        assert_eq!(error_code(&resp).as_deref(), Some("NotFound"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_malformed_metadata_update() {
        let resp = http()
            .post(format!("{}/update-metadata", endpoint_url()))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .expect("send");
        assert_eq!(resp.status().as_u16(), 400);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_multipart_upload() {
        let client = client();
        let bucket = create_test_bucket(&client, "multipart").await;

        let form = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"hello.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            hello world\r\n\
            --XyZ--\r\n";
        let resp = http()
            .post(format!("{}/upload?bucket={bucket}", endpoint_url()))
            .header("content-type", "multipart/form-data; boundary=XyZ")
            .body(form)
            .send()
            .await
            .expect("send");
        assert_eq!(resp.status().as_u16(), 200);

        let got = client.download(&bucket, "hello.txt").await.expect("download");
        assert_eq!(got.body.as_ref(), b"hello world");
        assert_eq!(got.content_type, "text/plain");
    }
}
