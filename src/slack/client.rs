//! Slack Web API client for the read-only methods the audit needs.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{AccessLogin, ChannelVisibility, CursorPage, SlackApi, SlackChannel, SlackUser};
use crate::config::SlackConfig;
use crate::error::AuditError;

#[derive(Debug, Deserialize)]
struct UsersListResponse {
    #[serde(default)]
    members: Vec<SlackUser>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ConversationsListResponse {
    #[serde(default)]
    channels: Vec<SlackChannel>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ConversationsMembersResponse {
    #[serde(default)]
    members: Vec<String>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct AccessLogsResponse {
    #[serde(default)]
    logins: Vec<AccessLogin>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

fn next_cursor(metadata: Option<ResponseMetadata>) -> Option<String> {
    metadata
        .and_then(|meta| meta.next_cursor)
        .filter(|cursor| !cursor.trim().is_empty())
}

pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    token: SecretString,
    page_limit: u32,
    access_log_count: u32,
}

impl SlackClient {
    pub fn new(config: &SlackConfig) -> Result<Self, AuditError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("slack-seat-audit/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs.max(1)));
        }
        let http = builder.build()?;

        // Fail on a bad base url here rather than on the first request.
        Url::parse(&config.api_base_url)?;

        Ok(Self {
            http,
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
            token: SecretString::from(config.token.trim().to_string()),
            page_limit: config.page_limit.max(1),
            access_log_count: config.access_log_count.max(1),
        })
    }

    fn method_url(&self, method: &str, params: &[(&str, String)]) -> Result<Url, AuditError> {
        let mut url = Url::parse(&format!("{}/{}", self.api_base, method))?;
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, AuditError> {
        let url = self.method_url(method, params)?;
        debug!(method, params = params.len(), "calling slack api");

        let response = self
            .http
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let value: Value = serde_json::from_str(&body).map_err(|source| AuditError::Decode {
            method: method.to_string(),
            source,
        })?;
        ensure_ok(method, &value)?;

        serde_json::from_value(value).map_err(|source| AuditError::Decode {
            method: method.to_string(),
            source,
        })
    }

    fn paged_params(&self, cursor: Option<String>) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.page_limit.to_string())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }
        params
    }
}

/// Every Slack response carries `ok`; `ok: false` comes with an `error` code.
fn ensure_ok(method: &str, value: &Value) -> Result<(), AuditError> {
    if value.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(());
    }
    let message = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    Err(AuditError::api(method, message))
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn users_list(&self, cursor: Option<String>) -> Result<CursorPage<SlackUser>, AuditError> {
        let response: UsersListResponse = self.call("users.list", &self.paged_params(cursor)).await?;
        Ok(CursorPage {
            items: response.members,
            next_cursor: next_cursor(response.response_metadata),
        })
    }

    async fn conversations_list(
        &self,
        visibility: ChannelVisibility,
        cursor: Option<String>,
    ) -> Result<CursorPage<SlackChannel>, AuditError> {
        let mut params = self.paged_params(cursor);
        params.push(("types", visibility.as_type().to_string()));
        params.push(("exclude_archived", "true".to_string()));

        let response: ConversationsListResponse =
            self.call("conversations.list", &params).await?;
        Ok(CursorPage {
            items: response.channels,
            next_cursor: next_cursor(response.response_metadata),
        })
    }

    async fn conversations_members(
        &self,
        channel_id: &str,
        cursor: Option<String>,
    ) -> Result<CursorPage<String>, AuditError> {
        let mut params = self.paged_params(cursor);
        params.push(("channel", channel_id.to_string()));

        let response: ConversationsMembersResponse =
            self.call("conversations.members", &params).await?;
        Ok(CursorPage {
            items: response.members,
            next_cursor: next_cursor(response.response_metadata),
        })
    }

    async fn access_logs(&self, page: u32) -> Result<Vec<AccessLogin>, AuditError> {
        // team.accessLogs numbers its pages from 1.
        let params = [
            ("count", self.access_log_count.to_string()),
            ("page", (page + 1).to_string()),
        ];
        let response: AccessLogsResponse = self.call("team.accessLogs", &params).await?;
        Ok(response.logins)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::SlackClient;
    use crate::config::SlackConfig;
    use crate::error::AuditError;
    use crate::slack::{ChannelVisibility, SlackApi};

    fn client_for(server: &MockServer) -> SlackClient {
        let config = SlackConfig {
            token: "xoxp-test".to_string(),
            api_base_url: server.base_url(),
            page_limit: 200,
            access_log_count: 50,
            ..SlackConfig::default()
        };
        SlackClient::new(&config).expect("client")
    }

    #[tokio::test]
    async fn users_list_sends_bearer_token_and_decodes_members() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/users.list")
                .header("authorization", "Bearer xoxp-test")
                .query_param("limit", "200");
            then.status(200).json_body(json!({
                "ok": true,
                "members": [
                    {"id": "U1", "is_admin": true, "profile": {"email": "admin@example.com"}},
                    {"id": "U2", "deleted": true, "profile": {}}
                ],
                "response_metadata": {"next_cursor": ""}
            }));
        });

        let page = client_for(&server)
            .users_list(None)
            .await
            .expect("users.list succeeds");

        assert_eq!(mock.calls(), 1);
        assert_eq!(page.items.len(), 2);
        assert!(page.items[0].is_admin);
        assert_eq!(page.items[0].email(), Some("admin@example.com"));
        assert!(page.items[1].deleted);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn conversations_list_passes_filters_and_cursor() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.list")
                .query_param("types", "private_channel")
                .query_param("exclude_archived", "true")
                .query_param("limit", "200")
                .query_param("cursor", "dXNlcjpVMDYx");
            then.status(200).json_body(json!({
                "ok": true,
                "channels": [{"id": "G1", "name": "secret", "num_members": 3, "is_private": true}],
                "response_metadata": {"next_cursor": "dXNlcjpVMDc4"}
            }));
        });

        let page = client_for(&server)
            .conversations_list(ChannelVisibility::Private, Some("dXNlcjpVMDYx".to_string()))
            .await
            .expect("conversations.list succeeds");

        mock.assert();
        assert_eq!(page.items[0].name, "secret");
        assert_eq!(page.items[0].num_members, 3);
        assert_eq!(page.next_cursor.as_deref(), Some("dXNlcjpVMDc4"));
    }

    #[tokio::test]
    async fn conversations_members_queries_by_channel() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.members")
                .query_param("channel", "C42");
            then.status(200).json_body(json!({
                "ok": true,
                "members": ["U1", "U2"]
            }));
        });

        let page = client_for(&server)
            .conversations_members("C42", None)
            .await
            .expect("conversations.members succeeds");

        mock.assert();
        assert_eq!(page.items, vec!["U1".to_string(), "U2".to_string()]);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn access_logs_requests_one_based_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/team.accessLogs")
                .query_param("count", "50")
                .query_param("page", "1");
            then.status(200).json_body(json!({
                "ok": true,
                "logins": [{"user_id": "U1", "username": "one", "date_first": 1, "date_last": 1700000000}]
            }));
        });

        let logins = client_for(&server)
            .access_logs(0)
            .await
            .expect("team.accessLogs succeeds");

        mock.assert();
        assert_eq!(logins.len(), 1);
        assert_eq!(logins[0].user_id, "U1");
        assert_eq!(logins[0].date_last, 1_700_000_000);
    }

    #[tokio::test]
    async fn ok_false_becomes_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users.list");
            then.status(200)
                .json_body(json!({"ok": false, "error": "invalid_auth"}));
        });

        let err = client_for(&server)
            .users_list(None)
            .await
            .expect_err("ok:false must fail");

        match err {
            AuditError::Api { method, message } => {
                assert_eq!(method, "users.list");
                assert_eq!(message, "invalid_auth");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_becomes_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/team.accessLogs");
            then.status(200).body("<html>not json</html>");
        });

        let err = client_for(&server)
            .access_logs(3)
            .await
            .expect_err("malformed body must fail");

        assert!(matches!(err, AuditError::Decode { ref method, .. } if method == "team.accessLogs"));
    }

    #[tokio::test]
    async fn server_error_status_becomes_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/conversations.members");
            then.status(500).body("boom");
        });

        let err = client_for(&server)
            .conversations_members("C1", None)
            .await
            .expect_err("5xx must fail");

        assert!(matches!(err, AuditError::Http(_)));
    }
}
