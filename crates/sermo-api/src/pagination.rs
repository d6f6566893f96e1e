use axum::extract::{Query, rejection::QueryRejection};

/// Largest page a list route returns, also the default page size.
pub const MAX_COUNT: i64 = 10;

/// Raw `count` / `start` query parameters. Kept as strings so that anything
/// unparseable degrades to 0 instead of rejecting the request.
#[derive(Debug, Default)]
pub struct PageParams {
    pub count: Option<String>,
    pub start: Option<String>,
}

impl PageParams {
    /// The first occurrence of each key wins. Other keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "count" if params.count.is_none() => params.count = Some(value),
                "start" if params.start.is_none() => params.start = Some(value),
                _ => {}
            }
        }
        params
    }
}

/// Extractor input for list routes. Keys are read one by one, so a bad or
/// repeated key never discards the others.
pub type PageQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Page window for a list request. A query string that cannot be decoded at
/// all falls back to the defaults.
pub fn page(query: PageQuery) -> Page {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    PageParams::from_pairs(pairs).into()
}

/// A clamped page window: `1 <= count <= 10`, `start >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start: i64,
    pub count: i64,
}

impl From<PageParams> for Page {
    fn from(params: PageParams) -> Self {
        let count = parse_or_zero(params.count.as_deref());
        let start = parse_or_zero(params.start.as_deref());

        Self {
            count: if (1..=MAX_COUNT).contains(&count) { count } else { MAX_COUNT },
            start: start.max(0),
        }
    }
}

fn parse_or_zero(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.parse().ok()).unwrap_or(0)
}
