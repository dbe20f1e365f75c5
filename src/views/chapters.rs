//! Chapters of one subject

use crate::api::{Chapter, Fetched, ResourceId, Subject, TutorApi};

pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_SUBJECT: &str = "No subject specified";
pub const NO_CHAPTERS: &str = "No chapters available for this subject";
pub const CHAPTERS_FAILED: &str = "Failed to load chapters";

#[derive(Debug, Default)]
pub struct ChapterListView {
    subject_id: Option<ResourceId>,
    /// Heading for the list; the subject name when known
    heading: String,
    chapters: Option<Fetched<Vec<Chapter>>>,
    selected: usize,
}

impl ChapterListView {
    /// Load the chapters of a subject picked from the subject list
    pub async fn load_subject(&mut self, api: &dyn TutorApi, subject: &Subject) {
        self.load(api, &subject.id).await;
        self.heading = subject.name.clone();
    }

    pub async fn load(&mut self, api: &dyn TutorApi, subject_id: &ResourceId) {
        *self = Self { heading: format!("Subject {}", subject_id), ..Self::default() };
        if subject_id.is_empty() {
            return;
        }
        self.subject_id = Some(subject_id.clone());
        self.chapters = Some(api.fetch_chapters(subject_id).await);
    }

    /// Fetch the same subject again, keeping the heading
    pub async fn reload(&mut self, api: &dyn TutorApi) {
        let Some(subject_id) = self.subject_id.clone() else {
            return;
        };
        let heading = std::mem::take(&mut self.heading);
        let selected = self.selected;
        self.load(api, &subject_id).await;
        self.heading = heading;
        self.selected = selected.min(self.chapters().len().saturating_sub(1));
    }

    pub fn subject_id(&self) -> Option<&ResourceId> {
        self.subject_id.as_ref()
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn chapters(&self) -> &[Chapter] {
        self.chapters.as_ref().and_then(Fetched::data).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Message shown instead of the list
    pub fn message(&self) -> Option<&'static str> {
        if self.subject_id.is_none() {
            return Some(NO_SUBJECT);
        }
        match self.chapters.as_ref()? {
            Fetched::Data(_) => None,
            Fetched::NoData => Some(NO_CHAPTERS),
            Fetched::Failed(_) => Some(CHAPTERS_FAILED),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_chapter(&self) -> Option<&Chapter> {
        self.chapters().get(self.selected)
    }

    pub fn select_next(&mut self) {
        self.selected = super::step_selection(self.selected, self.chapters().len(), 1);
    }

    pub fn select_previous(&mut self) {
        self.selected = super::step_selection(self.selected, self.chapters().len(), -1);
    }
}

/// Description line for a chapter entry
pub fn description(chapter: &Chapter) -> &str {
    chapter
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION)
}
