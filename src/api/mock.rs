//! In-memory tutor backend for testing views without a server.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    Answer, ApiError, Chapter, Fetched, Question, QuestionContext, ResourceId, Subject, Topic,
    TopicRef, TutorApi,
};

fn mock_failure() -> ApiError {
    ApiError::Status { status: 500, message: "mock failure".to_string() }
}

/// A scripted tutor backend
///
/// `None` for a resource means requests for it fail; an empty collection
/// means the backend has nothing to return.
#[derive(Default)]
pub struct MockTutor {
    pub subjects: Option<Vec<Subject>>,
    /// Chapters per subject id
    pub chapters: Option<HashMap<String, Vec<Chapter>>>,
    /// Chapter records by id
    pub chapter_records: Option<HashMap<String, Chapter>>,
    /// Separate topic lists by chapter id
    pub chapter_topics: HashMap<String, Vec<TopicRef>>,
    /// Topic bodies by id
    pub topics: HashMap<String, Topic>,
    /// Topic ids whose fetch fails
    pub failing_topics: HashSet<String>,
    /// Chapter ids whose topic-list fetch fails
    pub failing_chapter_topics: HashSet<String>,
    /// Fixed answer; `None` makes asking fail
    pub answer: Option<Answer>,
    /// Every topic id requested, in order
    topic_requests: Mutex<Vec<String>>,
    /// Every question posted, in order
    questions: Mutex<Vec<Question>>,
    /// Number of chapter requests
    chapter_requests: Mutex<usize>,
}

impl MockTutor {
    /// A backend serving one chapter with `count` topics named "Topic N"
    pub fn with_chapter(chapter_id: &str, count: usize) -> Self {
        let topics: Vec<TopicRef> = (1..=count)
            .map(|n| TopicRef {
                id: ResourceId::new(format!("t{}", n)),
                title: Some(format!("Topic {}", n)),
                estimated_time: None,
            })
            .collect();
        let chapter = Chapter {
            id: chapter_id.into(),
            title: "Chemical Reactions".to_string(),
            description: None,
            topics: topics.clone(),
        };

        let mut mock = Self {
            chapter_records: Some(HashMap::from([(chapter_id.to_string(), chapter)])),
            answer: Some(Answer { answer: "Because.".to_string(), ..Default::default() }),
            ..Default::default()
        };
        for topic in topics {
            let id = topic.id.to_string();
            mock.topics.insert(
                id.clone(),
                Topic {
                    id: Some(topic.id.clone()),
                    title: topic.title.clone(),
                    content: format!("<p>Body of {}</p>", id),
                    ..Default::default()
                },
            );
        }
        mock
    }

    /// A backend serving only a subject list
    pub fn with_subjects(subjects: Vec<Subject>) -> Self {
        Self { subjects: Some(subjects), ..Default::default() }
    }

    /// A backend serving the chapters of one subject
    pub fn with_chapters(subject_id: &str, chapters: Vec<Chapter>) -> Self {
        Self {
            chapters: Some(HashMap::from([(subject_id.to_string(), chapters)])),
            ..Default::default()
        }
    }

    /// Topic ids requested so far
    pub fn topic_requests(&self) -> Vec<String> {
        self.topic_requests.lock().unwrap().clone()
    }

    /// Questions posted so far
    pub fn questions(&self) -> Vec<Question> {
        self.questions.lock().unwrap().clone()
    }

    /// Number of chapter requests made
    pub fn chapter_requests(&self) -> usize {
        *self.chapter_requests.lock().unwrap()
    }
}

#[async_trait]
impl TutorApi for MockTutor {
    async fn fetch_subjects(&self) -> Fetched<Vec<Subject>> {
        match &self.subjects {
            Some(subjects) => Fetched::from_list(Ok(subjects.clone())),
            None => Fetched::Failed(mock_failure()),
        }
    }

    async fn fetch_chapters(&self, subject_id: &ResourceId) -> Fetched<Vec<Chapter>> {
        match &self.chapters {
            Some(chapters) => Fetched::from_list(Ok(chapters
                .get(subject_id.as_str())
                .cloned()
                .unwrap_or_default())),
            None => Fetched::Failed(mock_failure()),
        }
    }

    async fn fetch_chapter(&self, chapter_id: &ResourceId) -> Fetched<Chapter> {
        *self.chapter_requests.lock().unwrap() += 1;
        match &self.chapter_records {
            Some(records) => match records.get(chapter_id.as_str()) {
                Some(chapter) => Fetched::Data(chapter.clone()),
                None => Fetched::NoData,
            },
            None => Fetched::Failed(mock_failure()),
        }
    }

    async fn fetch_chapter_topics(&self, chapter_id: &ResourceId) -> Fetched<Vec<TopicRef>> {
        if self.failing_chapter_topics.contains(chapter_id.as_str()) {
            return Fetched::Failed(mock_failure());
        }
        Fetched::from_list(Ok(self
            .chapter_topics
            .get(chapter_id.as_str())
            .cloned()
            .unwrap_or_default()))
    }

    async fn fetch_topic_content(&self, topic_id: &ResourceId) -> Fetched<Topic> {
        self.topic_requests.lock().unwrap().push(topic_id.to_string());
        if self.failing_topics.contains(topic_id.as_str()) {
            return Fetched::Failed(mock_failure());
        }
        match self.topics.get(topic_id.as_str()) {
            Some(topic) => Fetched::Data(topic.clone()),
            None => Fetched::NoData,
        }
    }

    async fn ask_question(
        &self,
        question: &str,
        context: Option<QuestionContext>,
    ) -> Fetched<Answer> {
        self.questions
            .lock()
            .unwrap()
            .push(Question { question: question.to_string(), context });
        match &self.answer {
            Some(answer) => Fetched::Data(answer.clone()),
            None => Fetched::Failed(mock_failure()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builders_fill_only_their_resource() {
        let subject = Subject { id: "chem".into(), name: "Chemistry".into(), grade: None };
        let api = MockTutor::with_subjects(vec![subject.clone()]);
        assert!(matches!(api.fetch_subjects().await, Fetched::Data(s) if s == vec![subject]));
        assert!(api.fetch_chapters(&"chem".into()).await.is_failed());

        let chapter =
            Chapter { id: "c1".into(), title: "Atoms".into(), description: None, topics: vec![] };
        let api = MockTutor::with_chapters("chem", vec![chapter]);
        assert_eq!(api.fetch_chapters(&"chem".into()).await.into_vec().len(), 1);
        assert!(matches!(api.fetch_chapters(&"phys".into()).await, Fetched::NoData));
        assert!(api.fetch_subjects().await.is_failed());
    }
}
