use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use summify_core::ContributionMap;
use summify_store::{config_string, keys};

// ── Config ──

pub const DEFAULT_BACKEND_URL: &str = "https://backend-summifyai.onrender.com";
pub const BACKEND_URL_ENV: &str = "SUMMIFY_BACKEND_URL";
pub const TOKEN_ENV: &str = "SUMMIFY_TOKEN";

const TIMEOUT: Duration = Duration::from_secs(10);

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// `$SUMMIFY_BACKEND_URL`, then the `backend_url` config key, then the
    /// public default.
    pub fn resolve(config: &Map<String, Value>) -> Self {
        Self::from_sources(config, std::env::var(BACKEND_URL_ENV).ok())
    }

    fn from_sources(config: &Map<String, Value>, env_url: Option<String>) -> Self {
        let backend_url = env_url
            .filter(|u| !u.trim().is_empty())
            .or_else(|| config_string(config, keys::BACKEND_URL))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
        }
    }
}

// ── Session ──

/// Credentials handed to every backend call. Callers build one explicitly and
/// pass it to [`BackendClient::new`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.is_empty()).then_some(token),
        }
    }

    /// `$SUMMIFY_TOKEN`, then the `token` config key.
    pub fn resolve(config: &Map<String, Value>) -> Self {
        Self::from_sources(config, std::env::var(TOKEN_ENV).ok())
    }

    fn from_sources(config: &Map<String, Value>, env_token: Option<String>) -> Self {
        env_token
            .filter(|t| !t.is_empty())
            .or_else(|| config_string(config, keys::TOKEN))
            .map(Self::with_token)
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Value for the `Authorization` header, if a token is present.
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ── Responses ──

/// Usage counters shown on the profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub quizzes_taken: u64,
    #[serde(default)]
    pub pdfs_summarized: u64,
    #[serde(default)]
    pub yt_summaries_generated: u64,
}

/// Public profile fields. The backend sends and accepts all three together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bio: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Client ──

pub struct BackendClient {
    config: ClientConfig,
    session: Session,
    agent: ureq::Agent,
}

impl BackendClient {
    pub fn new(config: ClientConfig, session: Session) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(TIMEOUT))
            .build()
            .new_agent();
        Self {
            config,
            session,
            agent,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn user_url(&self, resource: &str, user_id: &str) -> anyhow::Result<String> {
        let user_id = user_id.trim();
        if user_id.is_empty() || user_id.contains('/') {
            anyhow::bail!("invalid user id `{user_id}`");
        }
        Ok(format!(
            "{}/user/{resource}/{user_id}/",
            self.config.backend_url
        ))
    }

    fn get_json(&self, url: &str) -> anyhow::Result<Value> {
        tracing::debug!(%url, authenticated = self.session.is_authenticated(), "GET");
        let mut request = self
            .agent
            .get(url)
            .header("Content-Type", "application/json");
        if let Some(auth) = self.session.authorization() {
            request = request.header("Authorization", auth);
        }
        let mut response = request.call().with_context(|| format!("GET {url}"))?;
        let body = response.body_mut().read_to_string()?;
        serde_json::from_str(&body).with_context(|| format!("decoding response from {url}"))
    }

    fn patch_json(&self, url: &str, body: &Value) -> anyhow::Result<Value> {
        tracing::debug!(%url, authenticated = self.session.is_authenticated(), "PATCH");
        let mut request = self
            .agent
            .patch(url)
            .header("Content-Type", "application/json");
        if let Some(auth) = self.session.authorization() {
            request = request.header("Authorization", auth);
        }
        let mut response = request
            .send(body.to_string())
            .with_context(|| format!("PATCH {url}"))?;
        let body = response.body_mut().read_to_string()?;
        serde_json::from_str(&body).with_context(|| format!("decoding response from {url}"))
    }

    /// Fetch a user's per-day contribution records.
    pub fn try_fetch_contributions(&self, user_id: &str) -> anyhow::Result<ContributionMap> {
        let url = self.user_url("contributions", user_id)?;
        let body = self.get_json(&url)?;
        Ok(ContributionMap::from_json(&body))
    }

    /// Like [`try_fetch_contributions`](Self::try_fetch_contributions), but a
    /// failed fetch is logged and yields an empty map so the calendar still
    /// renders (all days at zero).
    pub fn fetch_contributions(&self, user_id: &str) -> ContributionMap {
        match self.try_fetch_contributions(user_id) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(user_id, "error fetching contributions: {e:#}");
                ContributionMap::new()
            }
        }
    }

    pub fn fetch_statistics(&self, user_id: &str) -> anyhow::Result<Statistics> {
        let url = self.user_url("statistics", user_id)?;
        let body = self.get_json(&url)?;
        serde_json::from_value(body).context("failed to fetch statistics")
    }

    pub fn fetch_profile(&self, user_id: &str) -> anyhow::Result<Profile> {
        let url = self.user_url("profile", user_id)?;
        let body = self.get_json(&url)?;
        serde_json::from_value(body).context("failed to fetch profile")
    }

    /// Replace the profile fields; returns the profile as the backend stored it.
    pub fn update_profile(&self, user_id: &str, profile: &Profile) -> anyhow::Result<Profile> {
        if !self.session.is_authenticated() {
            anyhow::bail!("updating a profile needs a token (`summify config set token <TOKEN>`)");
        }
        let url = self.user_url("profile", user_id)?;
        let body = self.patch_json(&url, &serde_json::to_value(profile)?)?;
        let updated = serde_json::from_value(body).context("failed to update profile")?;
        tracing::info!(user_id, "profile updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;
    use time::macros::date;

    /// Serve a single canned response; the handle yields the raw request head,
    /// followed by a blank line and the request body when one was sent.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                head.push_str(&line);
            }
            if content_length > 0 {
                let mut body = vec![0; content_length];
                reader.read_exact(&mut body).unwrap();
                head.push_str("\r\n");
                head.push_str(&String::from_utf8(body).unwrap());
            }
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            head
        });
        (url, handle)
    }

    fn client(url: &str, session: Session) -> BackendClient {
        BackendClient::new(
            ClientConfig {
                backend_url: url.to_string(),
            },
            session,
        )
    }

    #[test]
    fn config_prefers_env_then_file_then_default() {
        let mut file = Map::new();
        assert_eq!(ClientConfig::from_sources(&file, None), ClientConfig::default());

        file.insert(keys::BACKEND_URL.into(), "http://file:8000/".into());
        assert_eq!(
            ClientConfig::from_sources(&file, None).backend_url,
            "http://file:8000"
        );
        assert_eq!(
            ClientConfig::from_sources(&file, Some("http://env".into())).backend_url,
            "http://env"
        );
        assert_eq!(
            ClientConfig::from_sources(&file, Some("  ".into())).backend_url,
            "http://file:8000"
        );
    }

    #[test]
    fn session_sources_and_header() {
        let mut file = Map::new();
        assert!(!Session::from_sources(&file, None).is_authenticated());

        file.insert(keys::TOKEN.into(), "from-file".into());
        let s = Session::from_sources(&file, None);
        assert_eq!(s.authorization().as_deref(), Some("Bearer from-file"));

        let s = Session::from_sources(&file, Some("from-env".into()));
        assert_eq!(s.authorization().as_deref(), Some("Bearer from-env"));

        assert!(!Session::with_token("").is_authenticated());
    }

    #[test]
    fn session_debug_hides_token() {
        let rendered = format!("{:?}", Session::with_token("secret-token"));
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn user_url_rejects_bad_ids() {
        let c = client("http://example.invalid", Session::anonymous());
        assert_eq!(
            c.user_url("contributions", " 7 ").unwrap(),
            "http://example.invalid/user/contributions/7/"
        );
        assert!(c.user_url("contributions", "").is_err());
        assert!(c.user_url("statistics", "1/../2").is_err());
    }

    #[test]
    fn fetch_contributions_sends_bearer_token() {
        let body = r#"{"contributions":{"2024-01-10":{"contributions":["a","b","c","d","e"],"highlight":true}}}"#;
        let (url, server) = serve_once("200 OK", body);
        let map = client(&url, Session::with_token("tok-123")).fetch_contributions("42");
        let head = server.join().unwrap().to_ascii_lowercase();

        assert!(head.starts_with("get /user/contributions/42/ "));
        assert!(head.contains("authorization: bearer tok-123"));
        let record = map.record(date!(2024 - 01 - 10));
        assert_eq!(record.count, 5);
        assert!(record.highlight);
    }

    #[test]
    fn failed_fetch_yields_empty_map() {
        let (url, server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#);
        let c = client(&url, Session::anonymous());
        assert!(c.fetch_contributions("42").is_empty());
        let head = server.join().unwrap().to_ascii_lowercase();
        assert!(!head.contains("authorization:"));
    }

    #[test]
    fn unreachable_backend_yields_empty_map() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let c = client(&url, Session::anonymous());
        assert!(c.try_fetch_contributions("1").is_err());
        assert!(c.fetch_contributions("1").is_empty());
    }

    #[test]
    fn fetch_statistics_decodes_counters() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"quizzes_taken":3,"pdfs_summarized":11,"yt_summaries_generated":0}"#,
        );
        let stats = client(&url, Session::with_token("t"))
            .fetch_statistics("9")
            .unwrap();
        server.join().unwrap();
        assert_eq!(
            stats,
            Statistics {
                quizzes_taken: 3,
                pdfs_summarized: 11,
                yt_summaries_generated: 0,
            }
        );
    }

    #[test]
    fn fetch_statistics_propagates_errors() {
        let (url, server) = serve_once("404 Not Found", "{}");
        let err = client(&url, Session::anonymous())
            .fetch_statistics("9")
            .unwrap_err();
        server.join().unwrap();
        assert!(format!("{err:#}").contains("/user/statistics/9/"));
    }

    #[test]
    fn fetch_profile_decodes_fields() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"username":"ada","bio":"maths","location":"London","id":9}"#,
        );
        let profile = client(&url, Session::with_token("t"))
            .fetch_profile("9")
            .unwrap();
        let head = server.join().unwrap().to_ascii_lowercase();

        assert!(head.starts_with("get /user/profile/9/ "));
        assert!(head.contains("authorization: bearer t"));
        assert_eq!(
            profile,
            Profile {
                username: "ada".into(),
                bio: "maths".into(),
                location: "London".into(),
            }
        );
    }

    #[test]
    fn fetch_profile_defaults_missing_and_null_fields() {
        let (url, server) = serve_once("200 OK", r#"{"username":"ada","bio":null}"#);
        let profile = client(&url, Session::anonymous()).fetch_profile("9").unwrap();
        server.join().unwrap();
        assert_eq!(profile.username, "ada");
        assert!(profile.bio.is_empty() && profile.location.is_empty());
    }

    #[test]
    fn update_profile_patches_json_with_bearer() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"username":"ada","bio":"engines","location":"London"}"#,
        );
        let wanted = Profile {
            username: "ada".into(),
            bio: "engines".into(),
            location: "London".into(),
        };
        let updated = client(&url, Session::with_token("tok-9"))
            .update_profile("9", &wanted)
            .unwrap();
        let request = server.join().unwrap();
        let (head, body) = request.split_once("\r\n\r\n").unwrap();
        let head = head.to_ascii_lowercase();

        assert!(head.starts_with("patch /user/profile/9/ "));
        assert!(head.contains("authorization: bearer tok-9"));
        assert!(head.contains("content-type: application/json"));
        let sent: Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"username": "ada", "bio": "engines", "location": "London"})
        );
        assert_eq!(updated, wanted);
    }

    #[test]
    fn update_profile_requires_token() {
        let c = client("http://example.invalid", Session::anonymous());
        let err = c.update_profile("9", &Profile::default()).unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn update_profile_propagates_rejection() {
        let (url, server) = serve_once("401 Unauthorized", r#"{"detail":"bad token"}"#);
        let err = client(&url, Session::with_token("stale"))
            .update_profile("9", &Profile::default())
            .unwrap_err();
        server.join().unwrap();
        assert!(format!("{err:#}").contains("PATCH"));
    }
}
