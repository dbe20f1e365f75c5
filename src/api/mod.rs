//! Tutor backend integration
//!
//! Provides the HTTP client, wire models and the `Fetched` outcome type
//! used by every view to tell "no data" apart from "request failed".

pub mod client;
pub mod error;
pub mod fetched;
#[cfg(test)]
pub mod mock;
pub mod models;

use async_trait::async_trait;

pub use client::TutorClient;
pub use error::ApiError;
pub use fetched::Fetched;
pub use models::{Answer, Chapter, Question, QuestionContext, ResourceId, Subject, Topic, TopicRef};

/// Operations the views need from the tutor backend
///
/// Every call issues at most one request and never returns an error to the
/// caller; failures are reported through [`Fetched::Failed`].
#[async_trait]
pub trait TutorApi: Send + Sync {
    /// `GET /subjects`
    async fn fetch_subjects(&self) -> Fetched<Vec<Subject>>;

    /// `GET /chapters/{subject_id}`
    async fn fetch_chapters(&self, subject_id: &ResourceId) -> Fetched<Vec<Chapter>>;

    /// `GET /chapter/{chapter_id}`
    async fn fetch_chapter(&self, chapter_id: &ResourceId) -> Fetched<Chapter>;

    /// `GET /chapter/{chapter_id}/topics`
    async fn fetch_chapter_topics(&self, chapter_id: &ResourceId) -> Fetched<Vec<TopicRef>>;

    /// `GET /topic/{topic_id}`
    async fn fetch_topic_content(&self, topic_id: &ResourceId) -> Fetched<Topic>;

    /// `POST /tutor/ask`
    async fn ask_question(
        &self,
        question: &str,
        context: Option<QuestionContext>,
    ) -> Fetched<Answer>;
}
