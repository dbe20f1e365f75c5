//! Subject list shown at startup

use crate::api::{Fetched, Subject, TutorApi};

pub const NO_SUBJECTS: &str = "No subjects available";
pub const SUBJECTS_FAILED: &str = "Failed to load subjects";

#[derive(Debug, Default)]
pub struct SubjectListView {
    /// `None` until the first load
    subjects: Option<Fetched<Vec<Subject>>>,
    selected: usize,
}

impl SubjectListView {
    pub async fn load(&mut self, api: &dyn TutorApi) {
        self.subjects = Some(api.fetch_subjects().await);
        self.selected = 0;
    }

    pub fn is_loaded(&self) -> bool {
        self.subjects.is_some()
    }

    pub fn subjects(&self) -> &[Subject] {
        self.subjects.as_ref().and_then(Fetched::data).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Message shown instead of the grid
    pub fn message(&self) -> Option<&'static str> {
        match self.subjects.as_ref()? {
            Fetched::Data(_) => None,
            Fetched::NoData => Some(NO_SUBJECTS),
            Fetched::Failed(_) => Some(SUBJECTS_FAILED),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_subject(&self) -> Option<&Subject> {
        self.subjects().get(self.selected)
    }

    pub fn select_next(&mut self) {
        self.selected = super::step_selection(self.selected, self.subjects().len(), 1);
    }

    pub fn select_previous(&mut self) {
        self.selected = super::step_selection(self.selected, self.subjects().len(), -1);
    }

    /// Move by whole rows of a grid `columns` wide
    pub fn select_row(&mut self, columns: usize, down: bool) {
        let delta = columns.max(1) as isize;
        self.selected = super::step_selection(
            self.selected,
            self.subjects().len(),
            if down { delta } else { -delta },
        );
    }
}

/// Card lines for a subject: name, then grade when known
pub fn card_lines(subject: &Subject) -> (String, Option<String>) {
    let grade = subject.grade.as_deref().map(str::trim).filter(|g| !g.is_empty());
    (subject.name.clone(), grade.map(|g| format!("Grade {}", g.trim_start_matches("Grade "))))
}
