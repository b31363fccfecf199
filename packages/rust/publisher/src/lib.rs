//! Files generated topics as a GitHub issue.
//!
//! A single `POST /repos/{owner}/{repo}/issues` per run. Any non-success
//! status is surfaced with the response body; nothing is retried.

mod issue;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use topicgen_shared::{GitHubConfig, RepoSlug, Result, Secret, TopicGenError};
use tracing::{info, instrument};

pub use issue::{CreatedIssue, IssueDraft, NEW_TOPICS_LABEL};

/// Service name used in error messages.
const SERVICE: &str = "GitHub";

/// GitHub rejects API requests without a User-Agent.
const USER_AGENT: &str = concat!("topicgen/", env!("CARGO_PKG_VERSION"));

/// REST API version pinned for stable response shapes.
const API_VERSION: &str = "2022-11-28";

/// GitHub REST client authenticated with one token.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
}

impl GitHubClient {
    /// Build a client from settings. Makes no network calls.
    pub fn new(config: &GitHubConfig, token: &Secret) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|_| TopicGenError::config("GITHUB_TOKEN contains invalid header characters"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TopicGenError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Create the issue and return what GitHub reports back.
    #[instrument(skip_all, fields(repo = %repo, title = %draft.title))]
    pub async fn create_issue(&self, repo: &RepoSlug, draft: &IssueDraft) -> Result<CreatedIssue> {
        let url = format!("{}/repos/{}/{}/issues", self.api_base, repo.owner, repo.name);
        info!(labels = ?draft.labels, "creating GitHub issue");

        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| TopicGenError::Network(format!("{SERVICE} request failed: {e}")))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            TopicGenError::Network(format!("{SERVICE}: failed to read body: {e}"))
        })?;

        if !status.is_success() {
            return Err(TopicGenError::service(SERVICE, status.as_u16(), &text));
        }

        let created: CreatedIssue = serde_json::from_str(&text)
            .map_err(|e| TopicGenError::parse(format!("invalid {SERVICE} issue response: {e}")))?;

        info!(number = created.number, url = %created.html_url, "created issue");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topicgen_shared::{Domain, GeneratedText};
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GitHubClient {
        let config = GitHubConfig {
            api_base: Url::parse(&server.uri()).unwrap(),
            timeout_secs: 5,
        };
        GitHubClient::new(&config, &Secret::new("ghp_test")).unwrap()
    }

    fn sample_draft() -> IssueDraft {
        IssueDraft::for_topics(
            &Domain::new("Psychology").unwrap(),
            "2".parse().unwrap(),
            &GeneratedText::new("1. Topic C\n2. Topic D"),
        )
    }

    #[tokio::test]
    async fn test_create_issue_posts_draft() {
        let server = MockServer::start().await;
        let draft = sample_draft();

        Mock::given(method("POST"))
            .and(path("/repos/octo-org/essays/issues"))
            .and(header("authorization", "Bearer ghp_test"))
            .and(header("accept", "application/vnd.github+json"))
            .and(header("x-github-api-version", API_VERSION))
            .and(body_json(serde_json::json!({
                "title": "New Topics Generated for: Psychology",
                "body": draft.body.clone(),
                "labels": ["new-topics", "domain:psychology"],
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "number": 42,
                "html_url": "https://github.com/octo-org/essays/issues/42",
                "state": "open"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let repo: RepoSlug = "octo-org/essays".parse().unwrap();
        let created = client_for(&server).create_issue(&repo, &draft).await.unwrap();
        assert_eq!(created.number, 42);
        assert_eq!(created.html_url, "https://github.com/octo-org/essays/issues/42");
    }

    #[tokio::test]
    async fn test_create_issue_surfaces_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/octo-org/essays/issues"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_string(r#"{"message":"Resource not accessible by integration"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let repo: RepoSlug = "octo-org/essays".parse().unwrap();
        let err = client_for(&server)
            .create_issue(&repo, &sample_draft())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("Resource not accessible by integration"));
    }

    #[tokio::test]
    async fn test_create_issue_missing_url_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "number": 7
            })))
            .mount(&server)
            .await;

        let repo: RepoSlug = "octo-org/essays".parse().unwrap();
        let err = client_for(&server)
            .create_issue(&repo, &sample_draft())
            .await
            .unwrap_err();

        assert!(matches!(err, TopicGenError::Parse { .. }));
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let config = GitHubConfig::default();
        let err = GitHubClient::new(&config, &Secret::new("ghp\nbad")).unwrap_err();
        assert!(matches!(err, TopicGenError::Config { .. }));
    }
}
