//! Question box and the running log of answers

use tracing::info;

use crate::api::{Answer, Fetched, QuestionContext, TutorApi};

use super::text_input::TextInput;

pub const EMPTY_QUESTION: &str = "Please enter a question.";
pub const ANSWER_FAILED: &str = "Failed to get answer. Please try again.";
pub const NO_ANSWER: &str = "The tutor had no answer for that question.";

/// One answered question
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub question: String,
    pub answer: Answer,
}

/// State of the questions panel
///
/// Entries are only ever appended.
#[derive(Debug, Default)]
pub struct QuestionLog {
    pub input: TextInput,
    entries: Vec<Exchange>,
    error: Option<&'static str>,
    /// A question is being sent
    pending: bool,
}

impl QuestionLog {
    pub fn entries(&self) -> &[Exchange] {
        &self.entries
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Validate the input before sending
    ///
    /// Returns the trimmed question, or records the inline error.
    pub fn begin(&mut self) -> Option<String> {
        if self.input.is_blank() {
            self.error = Some(EMPTY_QUESTION);
            return None;
        }
        self.error = None;
        self.pending = true;
        Some(self.input.text().trim().to_string())
    }

    /// Send the typed question with optional context
    pub async fn submit(&mut self, api: &dyn TutorApi, context: Option<QuestionContext>) {
        let Some(question) = self.begin() else {
            return;
        };
        self.ask(api, question, context).await;
    }

    /// Send a question that did not come from the input box
    pub async fn ask(
        &mut self,
        api: &dyn TutorApi,
        question: String,
        context: Option<QuestionContext>,
    ) {
        self.pending = true;
        let outcome = api.ask_question(&question, context).await;
        self.pending = false;

        match outcome {
            Fetched::Data(answer) => {
                info!("Answered question ({} sources)", answer.sources.len());
                self.input.remember(&question);
                if self.input.text().trim() == question {
                    self.input.clear();
                }
                self.error = None;
                self.entries.push(Exchange { question, answer });
            }
            Fetched::NoData => self.error = Some(NO_ANSWER),
            Fetched::Failed(_) => self.error = Some(ANSWER_FAILED),
        }
    }
}
