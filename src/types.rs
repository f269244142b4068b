use serde::Deserialize;

/// One page of a list endpoint's results.
#[derive(Clone, Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl<T> Page<T> {
    /// Whether another page exists beyond this one.
    pub fn has_more(&self) -> bool {
        self.offset + self.limit < self.total
    }

    /// Offset to request the next page with.
    pub fn next_offset(&self) -> u64 {
        self.offset + self.limit
    }
}

/// Common filters accepted by every list endpoint.
#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub status: Option<String>,
}

impl ListQuery {
    /// Renders `path` with this query appended, or `path` unchanged when no
    /// filter is set.
    pub(crate) fn append_to(&self, path: &str) -> String {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(format!("limit={limit}"));
        }
        if let Some(offset) = self.offset {
            params.push(format!("offset={offset}"));
        }
        if let Some(status) = &self.status {
            params.push(format!("status={status}"));
        }
        if params.is_empty() {
            path.to_owned()
        } else {
            format!("{path}?{}", params.join("&"))
        }
    }
}
