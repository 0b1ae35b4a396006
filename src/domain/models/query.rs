use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub top_k: u32,
    pub namespace: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub source_num: u32,
    pub document: String,
    pub page: Option<u32>,
    pub source: String,
    pub excerpt: String,
}

/// Answer to a query along with the excerpts it cites, in rank order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}
