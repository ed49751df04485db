use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::null_as_empty;

/// A gallery entry: either a bare image URL or a richer object (caption, alt text, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Url(String),
    Detailed(Map<String, Value>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchPaper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// College document (collection: colleges)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct College {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<ImageRef>,

    #[serde(
        rename = "researchPapers",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub research_papers: Vec<ResearchPaper>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A research paper as returned by the aggregation endpoint, tagged with its college.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedPaper {
    #[serde(flatten)]
    pub paper: ResearchPaper,

    #[serde(rename = "collegeName", skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
}
