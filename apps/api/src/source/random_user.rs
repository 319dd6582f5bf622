//! `ResumeSource` backed by the public random-user API.
//!
//! Only identity, contact and avatar come from the API. Career content is
//! synthesized locally, so every record is still a complete resume.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::models::resume::ResumeRecord;
use crate::source::synthetic::{synthesize_resume, Identity};
use crate::source::{ResumeSource, SourceError};

pub const DEFAULT_RANDOM_USER_URL: &str = "https://randomuser.me/api/";
const INCLUDED_FIELDS: &str = "name,email,phone,location,picture";
const NATIONALITIES: &str = "us,gb,ca,au";

#[derive(Debug, Deserialize)]
struct RandomUserResponse {
    results: Vec<RandomUser>,
}

#[derive(Debug, Deserialize)]
struct RandomUser {
    name: RandomUserName,
    email: String,
    phone: String,
    location: RandomUserLocation,
    picture: Option<RandomUserPicture>,
}

#[derive(Debug, Deserialize)]
struct RandomUserName {
    first: String,
    last: String,
}

#[derive(Debug, Deserialize)]
struct RandomUserLocation {
    city: String,
    state: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct RandomUserPicture {
    large: String,
}

#[derive(Debug, Deserialize)]
struct RandomUserError {
    error: String,
}

impl From<RandomUser> for Identity {
    fn from(user: RandomUser) -> Self {
        let location = [user.location.city, user.location.state, user.location.country]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Identity {
            name: format!("{} {}", user.name.first.trim(), user.name.last.trim()),
            email: user.email,
            phone: user.phone,
            location,
            avatar_url: user.picture.map(|p| p.large),
        }
    }
}

pub struct RandomUserSource {
    client: Client,
    url: String,
    rng: Mutex<StdRng>,
}

impl RandomUserSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.into(),
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    async fn fetch_identity(&self) -> Result<Identity, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("inc", INCLUDED_FIELDS), ("nat", NATIONALITIES)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<RandomUserError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_identity(&body)
    }
}

fn parse_identity(body: &str) -> Result<Identity, SourceError> {
    let parsed: RandomUserResponse = serde_json::from_str(body)?;
    parsed
        .results
        .into_iter()
        .next()
        .map(Identity::from)
        .ok_or(SourceError::EmptyResults)
}

#[async_trait]
impl ResumeSource for RandomUserSource {
    async fn fetch_one(&self) -> Result<ResumeRecord, SourceError> {
        let identity = self.fetch_identity().await?;
        debug!("Fetched random identity: {}", identity.name);

        let mut rng = self.rng.lock();
        Ok(synthesize_resume(&mut *rng, identity, Utc::now().year()))
    }

    fn backend_name(&self) -> &'static str {
        "randomuser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "results": [{
            "name": {"title": "Ms", "first": "Jane", "last": "Doe"},
            "email": "jane.doe@example.com",
            "phone": "(272) 790-0888",
            "location": {"city": "Leeds", "state": "West Yorkshire", "country": "United Kingdom",
                         "street": {"number": 1, "name": "High St"}},
            "picture": {"large": "https://randomuser.me/api/portraits/women/1.jpg",
                        "thumbnail": "https://randomuser.me/api/portraits/thumb/women/1.jpg"}
        }],
        "info": {"seed": "abc", "results": 1, "page": 1, "version": "1.4"}
    }"#;

    #[test]
    fn test_parse_identity_maps_fields() {
        let identity = parse_identity(SAMPLE).unwrap();
        assert_eq!(identity.name, "Jane Doe");
        assert_eq!(identity.email, "jane.doe@example.com");
        assert_eq!(identity.location, "Leeds, West Yorkshire, United Kingdom");
        assert_eq!(
            identity.avatar_url.as_deref(),
            Some("https://randomuser.me/api/portraits/women/1.jpg")
        );
    }

    #[test]
    fn test_parse_identity_skips_blank_location_parts() {
        let body = r#"{"results": [{
            "name": {"first": "Kenji", "last": "Tanaka"},
            "email": "k@example.com", "phone": "1",
            "location": {"city": "Sydney", "state": "", "country": "Australia"}
        }]}"#;
        let identity = parse_identity(body).unwrap();
        assert_eq!(identity.location, "Sydney, Australia");
        assert!(identity.avatar_url.is_none());
    }

    #[test]
    fn test_parse_identity_empty_results() {
        let err = parse_identity(r#"{"results": []}"#).unwrap_err();
        assert!(matches!(err, SourceError::EmptyResults));
    }

    /// Serves `replies` in order, one per request, on an ephemeral local port.
    async fn serve_replies(replies: Vec<(u16, &'static str)>) -> String {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        use axum::http::{header, StatusCode};
        use axum::{extract::State, routing::get, Router};

        type Replies = Arc<(AtomicUsize, Vec<(u16, &'static str)>)>;

        let app = Router::new()
            .route(
                "/api/",
                get(|State(replies): State<Replies>| async move {
                    let (served, replies) = &*replies;
                    let i = served.fetch_add(1, Ordering::SeqCst);
                    let (status, body) = replies[i.min(replies.len() - 1)];
                    (
                        StatusCode::from_u16(status).unwrap(),
                        [(header::CONTENT_TYPE, "application/json")],
                        body,
                    )
                }),
            )
            .with_state(Arc::new((AtomicUsize::new(0), replies)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/api/")
    }

    #[tokio::test]
    async fn test_fetch_maps_error_status_and_empty_results() {
        let url = serve_replies(vec![
            (503, r#"{"error":"down"}"#),
            (200, r#"{"results":[]}"#),
        ])
        .await;
        let source = RandomUserSource::new(url, Duration::from_secs(5)).unwrap();

        let err = source.fetch_one().await.unwrap_err();
        assert!(
            matches!(&err, SourceError::Api { status: 503, message } if message == "down"),
            "unexpected error: {err:?}"
        );

        let err = source.fetch_one().await.unwrap_err();
        assert!(matches!(err, SourceError::EmptyResults), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_keeps_raw_body_when_error_is_not_json() {
        let url = serve_replies(vec![(500, "upstream exploded")]).await;
        let source = RandomUserSource::new(url, Duration::from_secs(5)).unwrap();

        let err = source.fetch_one().await.unwrap_err();
        assert!(
            matches!(&err, SourceError::Api { status: 500, message } if message == "upstream exploded"),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_fetch_builds_full_record() {
        let url = serve_replies(vec![(200, SAMPLE)]).await;
        let source = RandomUserSource::new(url, Duration::from_secs(5)).unwrap();

        let record = source.fetch_one().await.unwrap();
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.contact.email, "jane.doe@example.com");
        assert!(!record.experience.is_empty());
    }

    #[test]
    fn test_parse_identity_malformed_body() {
        let err = parse_identity("<html>503</html>").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
