//! Data models for tutor API requests and responses

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a subject, chapter or topic
///
/// The backend is inconsistent about identifier types (subjects use strings,
/// chapters and topics use integers), so both deserialize into the string form
/// used when building request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Create an identifier from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as used in request paths
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A JSON string or number, flattened to text
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(Scalar::deserialize(deserializer)?.into_string()))
    }
}

fn optional_scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A top-level curriculum grouping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: ResourceId,
    pub name: String,
    /// Grade label; some deployments send a number here
    #[serde(default, deserialize_with = "optional_scalar")]
    pub grade: Option<String>,
}

/// An entry in a chapter's ordered topic list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRef {
    pub id: ResourceId,
    #[serde(default)]
    pub title: Option<String>,
    /// Free-form estimate such as "15 mins"
    #[serde(default)]
    pub estimated_time: Option<String>,
}

impl TopicRef {
    /// Title to show in lists, falling back to the identifier
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => format!("Topic {}", self.id),
        }
    }
}

/// An ordered unit within a subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Topics in navigation order
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<TopicRef>,
}

/// A single content page within a chapter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub title: Option<String>,
    /// HTML or plain text body
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_points: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub examples: Vec<String>,
}

/// Identifiers scoping a question to the material being read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<ResourceId>,
}

impl QuestionContext {
    /// Context for a topic inside a chapter
    pub fn topic(chapter_id: ResourceId, topic_id: ResourceId) -> Self {
        Self { chapter_id: Some(chapter_id), topic_id: Some(topic_id) }
    }
}

/// Request body for the ask endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    /// Sent as `null` when absent
    pub context: Option<QuestionContext>,
}

/// Response from the ask endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_concepts: Vec<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// List responses arrive either bare or wrapped under the resource name
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "subjects", alias = "chapters", alias = "topics")]
        items: Vec<T>,
    },
}

impl<T> ListBody<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) | ListBody::Wrapped { items } => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resource_id_accepts_strings_and_numbers() {
        let text: ResourceId = serde_json::from_str(r#""science""#).unwrap();
        let number: ResourceId = serde_json::from_str("42").unwrap();
        assert_eq!(text.as_str(), "science");
        assert_eq!(number.as_str(), "42");
    }

    #[test]
    fn subject_grade_may_be_missing_or_numeric() {
        let subjects: Vec<Subject> = serde_json::from_str(
            r#"[{"id":"maths","name":"Maths","grade":"Grade 10"},
                {"id":"science","name":"Science"},
                {"id":3,"name":"Social","grade":9}]"#,
        )
        .unwrap();
        assert_eq!(subjects[0].grade.as_deref(), Some("Grade 10"));
        assert_eq!(subjects[1].grade, None);
        assert_eq!(subjects[2].grade.as_deref(), Some("9"));
        assert_eq!(subjects[2].id.as_str(), "3");
    }

    #[test]
    fn chapter_embeds_topics_and_ignores_extra_fields() {
        let chapter: Chapter = serde_json::from_str(
            r#"{"id":1,"title":"Chemical Reactions","topics":[
                {"id":"t1","title":"Intro","content":"<p>x</p>"},
                {"id":2,"title":"Balancing","estimated_time":"15 mins"}]}"#,
        )
        .unwrap();
        assert_eq!(chapter.description, None);
        assert_eq!(chapter.topics.len(), 2);
        assert_eq!(chapter.topics[1].estimated_time.as_deref(), Some("15 mins"));
    }

    #[test]
    fn chapter_with_null_topics_is_empty() {
        let chapter: Chapter =
            serde_json::from_str(r#"{"id":1,"title":"Empty","topics":null}"#).unwrap();
        assert!(chapter.topics.is_empty());
    }

    #[test]
    fn topic_without_title_deserializes() {
        let topic: Topic = serde_json::from_str(
            r#"{"content":"Content here...","key_points":["Point 1"],"examples":["Example 1"]}"#,
        )
        .unwrap();
        assert_eq!(topic.title, None);
        assert_eq!(topic.key_points, vec!["Point 1".to_string()]);
    }

    #[test]
    fn answer_sources_null_or_missing() {
        let a: Answer = serde_json::from_str(r#"{"answer":"yes","sources":null}"#).unwrap();
        let b: Answer = serde_json::from_str(r#"{"answer":"no"}"#).unwrap();
        assert!(a.sources.is_empty());
        assert!(b.sources.is_empty());
        assert_eq!(b.confidence, None);
    }

    #[test]
    fn question_context_uses_camel_case() {
        let question = Question {
            question: "Why?".into(),
            context: Some(QuestionContext::topic("7".into(), "t3".into())),
        };
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"question":"Why?","context":{"chapterId":"7","topicId":"t3"}})
        );
    }

    #[test]
    fn question_without_context_sends_null() {
        let question = Question { question: "Why?".into(), context: None };
        let json = serde_json::to_string(&question).unwrap();
        assert_eq!(json, r#"{"question":"Why?","context":null}"#);
    }

    #[test]
    fn list_body_bare_and_wrapped() {
        let bare: ListBody<Subject> =
            serde_json::from_str(r#"[{"id":"a","name":"A"}]"#).unwrap();
        let wrapped: ListBody<Subject> =
            serde_json::from_str(r#"{"subjects":[{"id":"a","name":"A"},{"id":"b","name":"B"}]}"#)
                .unwrap();
        assert_eq!(bare.into_vec().len(), 1);
        assert_eq!(wrapped.into_vec().len(), 2);
    }

    #[test]
    fn topic_ref_display_title_falls_back_to_id() {
        let titled = TopicRef { id: "1".into(), title: Some("Atoms".into()), estimated_time: None };
        let untitled = TopicRef { id: "2".into(), title: None, estimated_time: None };
        assert_eq!(titled.display_title(), "Atoms");
        assert_eq!(untitled.display_title(), "Topic 2");
    }
}
