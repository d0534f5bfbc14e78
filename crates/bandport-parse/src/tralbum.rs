// Typed view of the album data object embedded in release pages.
//
// Every field is optional: pages routinely omit or null any of them, and
// a field of an unexpected JSON type reads as absent instead of failing
// the whole object. Each accessor below is one extraction strategy for one
// record field and returns `None` when the data does not settle that field.

use bandport_model::Track;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Cover image URL template; `{}` is the numeric art identifier.
pub const COVER_ART_TEMPLATE: &str = "https://f4.bcbits.com/img/a{}_10.jpg";

#[derive(Debug, Default, Deserialize)]
pub struct TralbumData {
    #[serde(default, deserialize_with = "lenient")]
    pub current: Option<Current>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub art_id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub digital_price: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, deserialize_with = "lenient_tracks")]
    pub trackinfo: Option<Vec<TrackInfo>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Current {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub about: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackInfo {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
}

/// Any value that does not fit `T` (including `null`) becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Strings pass through and numbers are rendered; anything else is absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(Scalar::Number(n).render()),
        _ => None,
    })
}

/// Tag entries that are neither names nor `{name}` objects are dropped.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<Vec<Tag>>, D::Error>
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

/// Malformed track entries keep their position as untitled tracks.
fn lenient_tracks<'de, D>(deserializer: D) -> Result<Option<Vec<TrackInfo>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

/// A loosely typed leaf value (ids and prices arrive as numbers or strings).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
    Flag(bool),
}

impl Scalar {
    /// Whether the value would count as set in a boolean context.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Scalar::Text(s) => !s.is_empty(),
            Scalar::Flag(b) => *b,
        }
    }

    /// Render as text; whole floats drop their fraction (`7.0` -> `7`).
    pub fn render(&self) -> String {
        match self {
            Scalar::Number(n) => match n.as_f64() {
                Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => {
                    format!("{}", v as i64)
                }
                _ => n.to_string(),
            },
            Scalar::Text(s) => s.clone(),
            Scalar::Flag(b) => b.to_string(),
        }
    }
}

/// Tags appear either as bare names or as objects carrying a `name`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Name(String),
    Entry { name: String },
}

impl Tag {
    pub fn name(&self) -> &str {
        match self {
            Tag::Name(name) | Tag::Entry { name } => name,
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl TralbumData {
    pub fn title(&self) -> Option<&str> {
        non_empty(self.current.as_ref().and_then(|c| c.title.as_ref()))
    }

    /// Current release artist, falling back to the top-level artist.
    pub fn artist(&self) -> Option<&str> {
        non_empty(self.current.as_ref().and_then(|c| c.artist.as_ref()))
            .or_else(|| non_empty(self.artist.as_ref()))
    }

    pub fn about(&self) -> Option<&str> {
        non_empty(self.current.as_ref().and_then(|c| c.about.as_ref()))
    }

    pub fn cover_art(&self) -> Option<String> {
        self.art_id
            .as_ref()
            .filter(|id| id.is_truthy())
            .map(|id| COVER_ART_TEMPLATE.replace("{}", &id.render()))
    }

    /// Digital price whenever the field is present, including `0`.
    pub fn price(&self) -> Option<String> {
        self.digital_price.as_ref().map(Scalar::render)
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .flatten()
            .map(|tag| tag.name().to_string())
            .collect()
    }

    /// One track per track-info entry; untitled entries get `Track {n}`.
    pub fn tracks(&self) -> Vec<Track> {
        self.trackinfo
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, info)| match non_empty(info.title.as_ref()) {
                Some(title) => Track::new(title),
                None => Track::new(format!("Track {}", i + 1)),
            })
            .collect()
    }
}
