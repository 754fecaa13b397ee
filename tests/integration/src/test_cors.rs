//! CORS and health integration tests.

#[cfg(test)]
mod tests {
    use bluenoise_model::types::HealthStatus;

    use crate::{client, endpoint_url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_preflight() {
        let resp = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, format!("{}/upload", endpoint_url()))
            .header("origin", "https://app.example")
            .header("access-control-request-method", "POST")
            .send()
            .await
            .expect("send");

        assert_eq!(resp.status().as_u16(), 200);
        let headers = resp.headers();
        assert!(headers.contains_key("access-control-allow-origin"));
        assert_eq!(
            headers
                .get("access-control-allow-methods")
                .and_then(|v| v.to_str().ok()),
            Some("GET, POST, PUT, DELETE, OPTIONS")
        );
        assert!(resp.bytes().await.expect("body").is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_healthy() {
        let status = client().health().await.expect("health");
        assert_eq!(status, HealthStatus::Healthy);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_tag_every_response_with_request_id() {
        let resp = reqwest::Client::new()
            .get(format!("{}/health", endpoint_url()))
            .send()
            .await
            .expect("send");
        let id = resp
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("x-request-id header");
        assert_eq!(id.len(), 36);
    }
}
