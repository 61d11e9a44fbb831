// src/api/responses.rs
//! Raw response shapes, as the backends send them.
//!
//! Two dialects reach the adapter: Notion pages, whose fields live inside a
//! `properties` object of typed values, and flat REST records with plain
//! fields. Both are described here as serde types so that normalization can
//! match on them instead of probing JSON by hand.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Reads an optional field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Reads a tag list, keeping the tags that decode and dropping the rest.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<Vec<TagValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Record id as it appears upstream: a string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

impl RecordId {
    /// The id as a string; blank ids are unusable.
    pub fn into_string(self) -> Option<String> {
        match self {
            RecordId::Text(text) if text.trim().is_empty() => None,
            RecordId::Text(text) => Some(text),
            RecordId::Number(number) => Some(number.to_string()),
        }
    }
}

/// List payloads come bare, wrapped in `results` (Notion queries), or
/// wrapped in `data` (notes APIs).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    Bare(Vec<Value>),
    Results { results: Vec<Value> },
    Data { data: Vec<Value> },
}

impl ListEnvelope {
    pub fn into_items(self) -> Vec<Value> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Results { results } => results,
            ListEnvelope::Data { data } => data,
        }
    }
}

/// One upstream record in either dialect.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawRecord {
    Notion(NotionPage),
    Flat(FlatRecord),
}

/// A Notion page. Properties are decoded one at a time, on demand, so a
/// single odd property never costs the whole record.
#[derive(Debug, Deserialize)]
pub struct NotionPage {
    pub id: RecordId,
    pub properties: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_time: Option<String>,
}

impl NotionPage {
    pub fn property(&self, name: &str) -> Option<NotionProperty> {
        let raw = self.properties.get(name)?;
        match serde_json::from_value(raw.clone()) {
            Ok(property) => Some(property),
            Err(e) => {
                log::debug!("Ignoring undecodable property '{}': {}", name, e);
                None
            }
        }
    }
}

/// A flat REST record. Every entity reads the subset of fields it knows.
///
/// Only `id` is required. Any other field of an unexpected type reads as
/// absent, so the record still normalizes with placeholders.
#[derive(Debug, Deserialize)]
pub struct FlatRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_edited_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Option<Vec<TagValue>>,
}

/// Tags are either bare strings or `{name}` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Name(String),
    Labelled { name: String },
}

impl TagValue {
    pub fn into_name(self) -> String {
        match self {
            TagValue::Name(name) | TagValue::Labelled { name } => name,
        }
    }
}

/// The typed value of a Notion page property.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotionProperty {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Date { date: Option<DateValue> },
    MultiSelect { multi_select: Vec<SelectOption> },
    Select { select: Option<SelectOption> },
    Status { status: Option<SelectOption> },
    Number { number: Option<f64> },
    CreatedTime { created_time: String },
    LastEditedTime { last_edited_time: String },
    #[serde(other)]
    Other,
}

impl NotionProperty {
    /// Text of a title or rich-text property, all segments joined.
    pub fn plain_text(&self) -> Option<String> {
        match self {
            NotionProperty::Title { title: segments }
            | NotionProperty::RichText {
                rich_text: segments,
            } => Some(segments.iter().map(RichText::as_plain).collect()),
            _ => None,
        }
    }

    /// Start of a date property, or the timestamp of a time property.
    pub fn date_start(&self) -> Option<String> {
        match self {
            NotionProperty::Date { date } => date.as_ref().and_then(|d| d.start.clone()),
            NotionProperty::CreatedTime { created_time } => Some(created_time.clone()),
            NotionProperty::LastEditedTime { last_edited_time } => Some(last_edited_time.clone()),
            _ => None,
        }
    }

    /// Names of the chosen options of a select-like property.
    pub fn option_names(&self) -> Vec<String> {
        match self {
            NotionProperty::MultiSelect { multi_select } => {
                multi_select.iter().map(|o| o.name.clone()).collect()
            }
            NotionProperty::Select { select: Some(o) } | NotionProperty::Status { status: Some(o) } => {
                vec![o.name.clone()]
            }
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RichText {
    pub plain_text: Option<String>,
    pub text: Option<TextContent>,
}

impl RichText {
    pub fn as_plain(&self) -> &str {
        self.plain_text
            .as_deref()
            .or_else(|| self.text.as_ref().map(|t| t.content.as_str()))
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct DateValue {
    pub start: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

/// Answer to a write: the new record's id and possibly a message.
#[derive(Debug, Deserialize)]
pub struct RawCreated {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

/// Everything a priority-task endpoint may answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawPriority {
    Listing(ListEnvelope),
    Record(RawRecord),
    Sentinel { message: String },
    Nothing,
}
