use std::future::Future;

use crate::event::{EventCatalog, EventDocument};
use crate::TimelineError;

/// Phản hồi thô từ nguồn dữ liệu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Nguồn đọc tài liệu sự kiện (fetch trên trình duyệt, file trên máy).
///
/// `Err` mang mô tả lỗi truyền tải; future không cần `Send`.
pub trait EventSource {
    fn fetch(&self, resource: &str) -> impl Future<Output = Result<FetchResponse, String>>;
}

/// Đọc một lần, không thử lại, không timeout.
pub async fn load<S: EventSource>(
    source: &S,
    resource: &str,
) -> Result<EventCatalog, TimelineError> {
    let result = match source.fetch(resource).await {
        Ok(response) if response.is_success() => parse_document(resource, &response.body),
        Ok(response) => Err(TimelineError::load_failure(
            resource,
            format!("HTTP error! status: {}", response.status),
        )),
        Err(cause) => Err(TimelineError::load_failure(resource, cause)),
    };

    match &result {
        Ok(catalog) => tracing::debug!(resource, events = catalog.len(), "timeline events loaded"),
        Err(err) => tracing::error!(resource, cause = err.cause(), "error loading events"),
    }
    result
}

/// Phân tích tài liệu JSON đã có trong bộ nhớ.
pub fn parse_document(resource: &str, body: &str) -> Result<EventCatalog, TimelineError> {
    serde_json::from_str::<EventDocument>(body)
        .map(EventCatalog::from)
        .map_err(|err| TimelineError::load_failure(resource, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    struct StaticSource(Result<FetchResponse, String>);

    impl EventSource for StaticSource {
        async fn fetch(&self, _resource: &str) -> Result<FetchResponse, String> {
            self.0.clone()
        }
    }

    const DOC: &str = r#"{"events":[
        {"id":2,"year":2001,"category":"Space","title":"B","description":"b","imageURL":"b.jpg"},
        {"id":1,"year":1990,"category":"Tech","title":"A","description":"a","imageURL":"a.jpg"}
    ]}"#;

    #[test]
    fn successful_load_is_sorted() {
        let source = StaticSource(Ok(FetchResponse::ok(DOC)));
        let catalog = block_on(load(&source, "data/events.json")).unwrap();

        let years: Vec<i32> = catalog.events().iter().map(|e| e.year).collect();
        assert_eq!(years, vec![1990, 2001]);
    }

    #[test]
    fn non_success_status_is_load_failure() {
        let source = StaticSource(Ok(FetchResponse::status(404)));
        let err = block_on(load(&source, "data/events.json")).unwrap_err();

        assert_eq!(err.cause(), "HTTP error! status: 404");
        assert!(err.to_string().contains("data/events.json"));
    }

    #[test]
    fn transport_error_is_load_failure() {
        let source = StaticSource(Err("connection refused".to_string()));
        let err = block_on(load(&source, "feed.json")).unwrap_err();

        assert_eq!(
            err,
            TimelineError::LoadFailure {
                resource: "feed.json".to_string(),
                cause: "connection refused".to_string(),
            }
        );
    }

    #[test]
    fn document_without_events_is_load_failure() {
        assert!(parse_document("data/events.json", r#"{"items":[]}"#).is_err());
        assert!(parse_document("data/events.json", "<html>").is_err());
    }

    #[test]
    fn redirect_range_is_not_success() {
        assert!(!FetchResponse::status(304).is_success());
        assert!(FetchResponse::status(204).is_success());
    }
}
