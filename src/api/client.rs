//! HTTP client for the tutor backend

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::TutorApi;
use super::error::ApiError;
use super::fetched::Fetched;
use super::models::{
    Answer, Chapter, ListBody, Question, QuestionContext, ResourceId, Subject, Topic, TopicRef,
};

/// Base URL used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Tutor API client
pub struct TutorClient {
    /// HTTP client
    client: Client,
    /// Base URL every endpoint path is appended to (e.g. `http://localhost:8000/api`)
    base_url: Url,
}

impl TutorClient {
    /// Create a client for the given base URL
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The base URL requests are issued against
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an endpoint URL, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a GET and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }

    /// Validate the status and decode the JSON body
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status: status.as_u16(), message });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch all subjects
    pub async fn try_fetch_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        let body: ListBody<Subject> = self.get_json(&["subjects"]).await?;
        Ok(body.into_vec())
    }

    /// Fetch the chapters of a subject
    pub async fn try_fetch_chapters(
        &self,
        subject_id: &ResourceId,
    ) -> Result<Vec<Chapter>, ApiError> {
        let body: ListBody<Chapter> = self.get_json(&["chapters", subject_id.as_str()]).await?;
        Ok(body.into_vec())
    }

    /// Fetch a chapter with its embedded topic list
    pub async fn try_fetch_chapter(&self, chapter_id: &ResourceId) -> Result<Chapter, ApiError> {
        self.get_json(&["chapter", chapter_id.as_str()]).await
    }

    /// Fetch a chapter's topic list on its own
    pub async fn try_fetch_chapter_topics(
        &self,
        chapter_id: &ResourceId,
    ) -> Result<Vec<TopicRef>, ApiError> {
        let body: ListBody<TopicRef> =
            self.get_json(&["chapter", chapter_id.as_str(), "topics"]).await?;
        Ok(body.into_vec())
    }

    /// Fetch a topic's content
    pub async fn try_fetch_topic(&self, topic_id: &ResourceId) -> Result<Topic, ApiError> {
        self.get_json(&["topic", topic_id.as_str()]).await
    }

    /// Post a question to the tutor
    pub async fn try_ask(&self, question: &Question) -> Result<Answer, ApiError> {
        let url = self.endpoint(&["tutor", "ask"])?;
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(question).send().await?;
        Self::read_json(response).await
    }
}

/// Log a failed fetch before handing the outcome to the caller
fn logged<T>(what: &str, fetched: Fetched<T>) -> Fetched<T> {
    match &fetched {
        Fetched::Failed(e) => tracing::warn!("Error fetching {}: {}", what, e),
        Fetched::NoData => tracing::debug!("No {} available", what),
        Fetched::Data(_) => {}
    }
    fetched
}

#[async_trait]
impl TutorApi for TutorClient {
    async fn fetch_subjects(&self) -> Fetched<Vec<Subject>> {
        logged("subjects", Fetched::from_list(self.try_fetch_subjects().await))
    }

    async fn fetch_chapters(&self, subject_id: &ResourceId) -> Fetched<Vec<Chapter>> {
        logged("chapters", Fetched::from_list(self.try_fetch_chapters(subject_id).await))
    }

    async fn fetch_chapter(&self, chapter_id: &ResourceId) -> Fetched<Chapter> {
        logged("chapter", Fetched::from_result(self.try_fetch_chapter(chapter_id).await))
    }

    async fn fetch_chapter_topics(&self, chapter_id: &ResourceId) -> Fetched<Vec<TopicRef>> {
        logged("topics", Fetched::from_list(self.try_fetch_chapter_topics(chapter_id).await))
    }

    async fn fetch_topic_content(&self, topic_id: &ResourceId) -> Fetched<Topic> {
        logged("topic", Fetched::from_result(self.try_fetch_topic(topic_id).await))
    }

    async fn ask_question(
        &self,
        question: &str,
        context: Option<QuestionContext>,
    ) -> Fetched<Answer> {
        let question = Question { question: question.to_string(), context };
        logged("answer", Fetched::from_result(self.try_ask(&question).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> TutorClient {
        TutorClient::new(&format!("{}/api", server.uri())).unwrap()
    }

    #[test]
    fn default_base_url_is_usable() {
        let client = TutorClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(crate::config::Config::default().api_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(TutorClient::new("not a url"), Err(ApiError::InvalidBaseUrl(_))));
        assert!(matches!(
            TutorClient::new("mailto:me@example.com"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn endpoint_handles_trailing_slash_and_encoding() {
        let client = TutorClient::new("http://localhost:8000/api/").unwrap();
        let url = client.endpoint(&["chapters", "social studies"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/chapters/social%20studies");
    }

    #[tokio::test]
    async fn fetch_subjects_accepts_bare_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/subjects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "science", "name": "Science", "grade": "10"}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let subjects = client.fetch_subjects().await.into_vec();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].name, "Science");
    }

    #[tokio::test]
    async fn fetch_chapters_accepts_wrapped_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chapters/science"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "chapters": [{
                    "id": 1,
                    "title": "Chemical Reactions",
                    "description": "Learn about different types of chemical reactions..."
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let fetched = client.fetch_chapters(&"science".into()).await;
        let chapters = fetched.data().unwrap();
        assert_eq!(chapters[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn empty_subject_list_is_no_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/subjects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(matches!(client.fetch_subjects().await, Fetched::NoData));
    }

    #[tokio::test]
    async fn server_error_is_failed_and_falls_back_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chapters/maths"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let fetched = client.fetch_chapters(&"maths".into()).await;
        match &fetched {
            Fetched::Failed(ApiError::Status { status, message }) => {
                assert_eq!(*status, 500);
                assert_eq!(message, "database down");
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(fetched.into_vec().is_empty());
    }

    #[tokio::test]
    async fn missing_topic_is_no_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/topic/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let fetched = client.fetch_topic_content(&"99".into()).await;
        assert!(matches!(fetched, Fetched::NoData));
    }

    #[tokio::test]
    async fn malformed_topic_is_failed_and_falls_back_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/topic/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let fetched = client.fetch_topic_content(&"1".into()).await;
        assert!(matches!(fetched, Fetched::Failed(ApiError::Json(_))));
        assert!(fetched.into_option().is_none());
    }

    #[tokio::test]
    async fn fetch_chapter_topics_reads_wrapped_topics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chapter/1/topics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "topics": [{"id": 1, "title": "Introduction to Chemical Reactions",
                            "estimated_time": "15 mins"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let topics = client.fetch_chapter_topics(&"1".into()).await.into_vec();
        assert_eq!(topics[0].display_title(), "Introduction to Chemical Reactions");
    }

    #[tokio::test]
    async fn ask_question_posts_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tutor/ask"))
            .and(body_json(serde_json::json!({
                "question": "What is oxidation?",
                "context": {"chapterId": "1", "topicId": "2"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "Loss of electrons.",
                "sources": ["Chapter 2", "Chapter 4"],
                "confidence": 0.95
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let context = QuestionContext::topic("1".into(), "2".into());
        let answer = client
            .ask_question("What is oxidation?", Some(context))
            .await
            .into_option()
            .unwrap();
        assert_eq!(answer.answer, "Loss of electrons.");
        assert_eq!(answer.sources, vec!["Chapter 2".to_string(), "Chapter 4".to_string()]);
    }

    #[tokio::test]
    async fn unreachable_server_is_failed() {
        // Nothing listens on port 9 (discard) in test environments
        let client = TutorClient::new("http://127.0.0.1:9/api").unwrap();
        let fetched = client.fetch_subjects().await;
        assert!(matches!(fetched, Fetched::Failed(ApiError::Request(_))));
    }
}
