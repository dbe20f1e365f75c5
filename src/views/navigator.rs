//! Chapter reader: walks a chapter's topics in order

use tracing::{debug, info};

use crate::api::{Chapter, Fetched, QuestionContext, ResourceId, TopicRef, TutorApi};
use crate::document::{self, Document};

pub const NO_CHAPTER: &str = "No chapter specified";
pub const NO_TOPICS: &str = "No topics available in this chapter";
pub const CHAPTER_FAILED: &str = "Failed to load chapter content";
pub const CHAPTER_NOT_FOUND: &str = "Chapter not found";
pub const TOPIC_FAILED: &str = "Failed to load topic content";
pub const TOPIC_EMPTY: &str = "No content available for this topic";

/// State of the chapter screen
///
/// `current_index` always points into `topics` when `topics` is non-empty,
/// and only changes after a topic was fetched successfully.
#[derive(Debug, Default)]
pub struct TopicNavigator {
    chapter_id: Option<ResourceId>,
    title: String,
    topics: Vec<TopicRef>,
    current_index: usize,
    /// Page of the topic at `current_index`
    page: Option<Document>,
    /// Message replacing the content area
    notice: Option<&'static str>,
}

impl TopicNavigator {
    /// Load a chapter and show its first topic
    pub async fn load(&mut self, api: &dyn TutorApi, chapter_id: &ResourceId) {
        self.open(api, chapter_id, None).await;
    }

    /// Load a chapter picked from a list, whose entry already carries a title
    pub async fn open(
        &mut self,
        api: &dyn TutorApi,
        chapter_id: &ResourceId,
        listed_title: Option<&str>,
    ) {
        *self = Self::default();

        if chapter_id.is_empty() {
            self.notice = Some(NO_CHAPTER);
            return;
        }
        self.chapter_id = Some(chapter_id.clone());

        let chapter = match fetch_outline(api, chapter_id).await {
            Fetched::Data(chapter) => chapter,
            Fetched::NoData => {
                self.notice = Some(CHAPTER_NOT_FOUND);
                return;
            }
            Fetched::Failed(_) => {
                self.notice = Some(CHAPTER_FAILED);
                return;
            }
        };

        let Chapter { title, topics, .. } = chapter;
        self.title = if !title.trim().is_empty() {
            title
        } else {
            match listed_title.map(str::trim).filter(|t| !t.is_empty()) {
                Some(listed) => listed.to_string(),
                None => format!("Chapter {}", chapter_id),
            }
        };
        self.topics = topics;
        info!("Opened chapter {} with {} topics", chapter_id, self.topics.len());

        if self.topics.is_empty() {
            self.notice = Some(NO_TOPICS);
        } else {
            self.display_topic(api, 0).await;
        }
    }

    /// Fetch and show the topic at `index`
    ///
    /// Out-of-range indices are ignored without a request.
    pub async fn display_topic(&mut self, api: &dyn TutorApi, index: usize) {
        let Some(topic_ref) = self.topics.get(index) else {
            debug!("Ignoring topic index {} of {}", index, self.topics.len());
            return;
        };
        let fallback_title = topic_ref.display_title();

        match api.fetch_topic_content(&topic_ref.id).await {
            Fetched::Data(topic) => {
                self.page = Some(document::parse_topic(&topic, &fallback_title));
                self.notice = None;
                self.current_index = index;
            }
            Fetched::NoData => {
                self.page = None;
                self.notice = Some(TOPIC_EMPTY);
            }
            Fetched::Failed(_) => {
                self.page = None;
                self.notice = Some(TOPIC_FAILED);
            }
        }
    }

    /// Advance to the next topic, if any
    pub async fn next(&mut self, api: &dyn TutorApi) {
        if self.can_go_next() {
            self.display_topic(api, self.current_index + 1).await;
        }
    }

    /// Go back to the previous topic, if any
    pub async fn previous(&mut self, api: &dyn TutorApi) {
        if self.can_go_previous() {
            self.display_topic(api, self.current_index - 1).await;
        }
    }

    /// Jump to a 1-based topic number
    pub async fn goto(&mut self, api: &dyn TutorApi, number: usize) {
        if let Some(index) = number.checked_sub(1) {
            self.display_topic(api, index).await;
        }
    }

    pub fn chapter_id(&self) -> Option<&ResourceId> {
        self.chapter_id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn topics(&self) -> &[TopicRef] {
        &self.topics
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_topic(&self) -> Option<&TopicRef> {
        self.topics.get(self.current_index)
    }

    pub fn page(&self) -> Option<&Document> {
        self.page.as_ref()
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Share of the chapter read so far, in percent
    pub fn progress_percent(&self) -> f64 {
        if self.topics.is_empty() {
            return 0.0;
        }
        (self.current_index + 1) as f64 / self.topics.len() as f64 * 100.0
    }

    pub fn can_go_previous(&self) -> bool {
        !self.topics.is_empty() && self.current_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current_index + 1 < self.topics.len()
    }

    /// Question context for the topic being read
    pub fn question_context(&self) -> Option<QuestionContext> {
        let chapter_id = self.chapter_id.clone()?;
        Some(QuestionContext {
            chapter_id: Some(chapter_id),
            topic_id: self.current_topic().map(|t| t.id.clone()),
        })
    }
}

/// Fetch a chapter together with its ordered topic list
///
/// Falls back to `GET /chapter/{id}/topics` when the chapter record is
/// missing or arrives without topics. The result is `NoData` only when
/// neither endpoint knows the chapter.
pub async fn fetch_outline(api: &dyn TutorApi, chapter_id: &ResourceId) -> Fetched<Chapter> {
    let record = match api.fetch_chapter(chapter_id).await {
        Fetched::Data(chapter) if !chapter.topics.is_empty() => return Fetched::Data(chapter),
        Fetched::Data(chapter) => Some(chapter),
        Fetched::NoData => None,
        Fetched::Failed(e) => return Fetched::Failed(e),
    };

    match (api.fetch_chapter_topics(chapter_id).await, record) {
        (Fetched::Failed(e), _) => Fetched::Failed(e),
        (Fetched::Data(topics), record) => {
            let mut chapter = record.unwrap_or_else(|| Chapter {
                id: chapter_id.clone(),
                title: String::new(),
                description: None,
                topics: Vec::new(),
            });
            chapter.topics = topics;
            Fetched::Data(chapter)
        }
        (Fetched::NoData, Some(chapter)) => Fetched::Data(chapter),
        (Fetched::NoData, None) => Fetched::NoData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTutor;
    use crate::document::ContentBlock;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    async fn loaded(count: usize) -> (MockTutor, TopicNavigator) {
        let api = MockTutor::with_chapter("c1", count);
        let mut nav = TopicNavigator::default();
        nav.load(&api, &"c1".into()).await;
        (api, nav)
    }

    #[tokio::test]
    async fn three_topic_walkthrough() {
        let (api, mut nav) = loaded(3).await;

        assert_eq!(nav.title(), "Chemical Reactions");
        assert_eq!(nav.current_index(), 0);
        assert!(!nav.can_go_previous());
        assert!(nav.can_go_next());
        let page = nav.page().unwrap();
        assert_eq!(page.title, "Topic 1");
        assert_eq!(page.blocks, vec![ContentBlock::Paragraph("Body of t1".into())]);

        nav.next(&api).await;
        nav.next(&api).await;
        assert_eq!(nav.current_index(), 2);
        assert!(!nav.can_go_next());
        assert!(nav.can_go_previous());
        assert_eq!(nav.progress_percent(), 100.0);
        assert_eq!(api.topic_requests(), vec!["t1", "t2", "t3"]);
    }

    #[tokio::test]
    async fn next_at_last_topic_makes_no_request() {
        let (api, mut nav) = loaded(2).await;
        nav.next(&api).await;
        nav.next(&api).await;
        assert_eq!(nav.current_index(), 1);
        assert_eq!(api.topic_requests().len(), 2);
    }

    #[tokio::test]
    async fn previous_at_first_topic_makes_no_request() {
        let (api, mut nav) = loaded(2).await;
        nav.previous(&api).await;
        assert_eq!(nav.current_index(), 0);
        assert_eq!(api.topic_requests().len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_index_is_ignored() {
        let (api, mut nav) = loaded(3).await;
        nav.display_topic(&api, 3).await;
        nav.display_topic(&api, 99).await;
        assert_eq!(nav.current_index(), 0);
        assert_eq!(api.topic_requests().len(), 1);
        assert_eq!(nav.page().unwrap().title, "Topic 1");
    }

    #[tokio::test]
    async fn failed_topic_keeps_index() {
        let mut api = MockTutor::with_chapter("c1", 3);
        api.failing_topics.insert("t2".into());
        let mut nav = TopicNavigator::default();
        nav.load(&api, &"c1".into()).await;

        nav.next(&api).await;
        assert_eq!(nav.current_index(), 0);
        assert_eq!(nav.notice(), Some(TOPIC_FAILED));
        assert!(nav.page().is_none());

        // The failed topic can be retried by navigating again
        nav.goto(&api, 3).await;
        assert_eq!(nav.current_index(), 2);
        assert_eq!(nav.notice(), None);
    }

    #[tokio::test]
    async fn missing_topic_is_reported_separately() {
        let mut api = MockTutor::with_chapter("c1", 2);
        api.topics.remove("t2");
        let mut nav = TopicNavigator::default();
        nav.load(&api, &"c1".into()).await;

        nav.next(&api).await;
        assert_eq!(nav.current_index(), 0);
        assert_eq!(nav.notice(), Some(TOPIC_EMPTY));
    }

    #[tokio::test]
    async fn empty_chapter_id_makes_no_request() {
        let api = MockTutor::with_chapter("c1", 1);
        let mut nav = TopicNavigator::default();
        nav.load(&api, &"".into()).await;
        assert_eq!(nav.notice(), Some(NO_CHAPTER));
        assert_eq!(api.chapter_requests(), 0);
    }

    #[tokio::test]
    async fn chapter_failure_is_reported() {
        let api = MockTutor::default();
        let mut nav = TopicNavigator::default();
        nav.load(&api, &"c1".into()).await;
        assert_eq!(nav.notice(), Some(CHAPTER_FAILED));
        assert!(nav.topics().is_empty());
        assert!(!nav.can_go_next());
        assert!(!nav.can_go_previous());
    }

    #[tokio::test]
    async fn chapter_without_topics() {
        let (api, nav) = loaded(0).await;
        assert_eq!(nav.notice(), Some(NO_TOPICS));
        assert!(api.topic_requests().is_empty());
        assert_eq!(nav.progress_percent(), 0.0);
    }

    #[tokio::test]
    async fn topics_fall_back_to_separate_endpoint() {
        let mut api = MockTutor::with_chapter("c1", 0);
        api.chapter_topics.insert(
            "c1".into(),
            vec![TopicRef { id: "t1".into(), title: None, estimated_time: None }],
        );
        api.topics.insert(
            "t1".into(),
            crate::api::Topic { content: "Plain body".into(), ..Default::default() },
        );
        let mut nav = TopicNavigator::default();
        nav.load(&api, &"c1".into()).await;

        assert_eq!(nav.topics().len(), 1);
        assert_eq!(nav.page().unwrap().title, "Topic t1");
    }

    #[tokio::test]
    async fn missing_record_uses_topics_endpoint() {
        let mut api = MockTutor::with_chapter("c1", 1);
        api.chapter_records = Some(Default::default());
        api.chapter_topics.insert(
            "c1".into(),
            vec![TopicRef { id: "t1".into(), title: None, estimated_time: None }],
        );

        let mut nav = TopicNavigator::default();
        nav.open(&api, &"c1".into(), Some("Chemical Reactions")).await;
        assert_eq!(nav.notice(), None);
        assert_eq!(nav.title(), "Chemical Reactions");
        assert_eq!(nav.topics().len(), 1);
        assert_eq!(api.topic_requests(), vec!["t1"]);

        nav.load(&api, &"c1".into()).await;
        assert_eq!(nav.title(), "Chapter c1");
    }

    #[tokio::test]
    async fn unknown_chapter_is_not_found() {
        let mut api = MockTutor::with_chapter("c1", 1);
        api.chapter_records = Some(Default::default());
        let mut nav = TopicNavigator::default();
        nav.load(&api, &"c1".into()).await;
        assert_eq!(nav.notice(), Some(CHAPTER_NOT_FOUND));
        assert!(api.topic_requests().is_empty());
    }

    #[tokio::test]
    async fn failed_topic_list_is_not_an_empty_chapter() {
        let mut api = MockTutor::with_chapter("c1", 0);
        api.failing_chapter_topics.insert("c1".into());
        let mut nav = TopicNavigator::default();
        nav.load(&api, &"c1".into()).await;
        assert_eq!(nav.notice(), Some(CHAPTER_FAILED));

        api.chapter_records = Some(Default::default());
        nav.load(&api, &"c1".into()).await;
        assert_eq!(nav.notice(), Some(CHAPTER_FAILED));
    }

    #[tokio::test]
    async fn goto_zero_is_ignored() {
        let (api, mut nav) = loaded(3).await;
        nav.goto(&api, 0).await;
        assert_eq!(api.topic_requests().len(), 1);
    }

    #[tokio::test]
    async fn question_context_tracks_current_topic() {
        let (api, mut nav) = loaded(2).await;
        nav.next(&api).await;
        assert_eq!(
            nav.question_context(),
            Some(QuestionContext::topic("c1".into(), "t2".into()))
        );
    }

    proptest! {
        #[test]
        fn progress_and_controls_follow_index(count in 1usize..12, target in 0usize..16) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let (api, mut nav) = loaded(count).await;
                nav.display_topic(&api, target).await;

                let expected = if target < count { target } else { 0 };
                prop_assert_eq!(nav.current_index(), expected);

                let percent = (expected + 1) as f64 / count as f64 * 100.0;
                prop_assert!((nav.progress_percent() - percent).abs() < 1e-9);
                prop_assert_eq!(nav.can_go_previous(), expected != 0);
                prop_assert_eq!(nav.can_go_next(), expected != count - 1);
                Ok(())
            })?;
        }
    }
}
