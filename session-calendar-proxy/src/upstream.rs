use reqwest::Client;
use serde_json::Value;
use session_calendar::SessionRecord;
use tokio::time::Duration;
use url::Url;

use crate::error::ProxyError;

pub const COURSE: &str = "Course";
pub const MENTORSHIP: &str = "Mentorship";

const TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the marketplace API that owns courses and mentorships.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: Client,
    base: Url,
}

impl Upstream {
    pub fn new(base: Url) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(TIMEOUT)
            .build()?;

        Ok(Self { client, base })
    }

    /// Courses first, then mentorships, each tagged with its kind.
    pub async fn mentor_sessions(&self, mentor: &str) -> Result<Vec<SessionRecord>, ProxyError> {
        let (mut sessions, mentorships) = tokio::try_join!(
            self.fetch("courses", COURSE, mentor),
            self.fetch("mentorships", MENTORSHIP, mentor),
        )?;

        sessions.extend(mentorships);
        Ok(sessions)
    }

    async fn fetch(
        &self,
        collection: &str,
        kind: &str,
        mentor: &str,
    ) -> Result<Vec<SessionRecord>, ProxyError> {
        let url = self.endpoint(collection, mentor)?;
        log::debug!("Fetching {url}");

        let items: Vec<Value> = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(tag_records(items, kind))
    }

    fn endpoint(&self, collection: &str, mentor: &str) -> Result<Url, ProxyError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ProxyError::UpstreamUrl(mentor.to_string()))?
            .pop_if_empty()
            .extend([collection, "mentor", mentor]);
        Ok(url)
    }
}

/// Decodes each item on its own so one malformed record is dropped instead
/// of failing the whole response.
fn tag_records(items: Vec<Value>, kind: &str) -> Vec<SessionRecord> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<SessionRecord>(item) {
            Ok(mut session) => {
                session.kind = kind.to_string();
                Some(session)
            }
            Err(err) => {
                log::warn!("Dropping malformed {kind} record: {err}");
                None
            }
        })
        .collect()
}
