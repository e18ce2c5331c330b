use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

// Query strings reach flattened structs as strings, so numbers are parsed by hand.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: i64, params: &PaginationParams, returned: usize) -> Self {
        let offset = params.offset();
        Self {
            total,
            limit: params.limit(),
            offset,
            page: params.page(),
            has_more: offset.saturating_add(returned as i64) < total,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_LIMIT),
            offset: Some(0),
            page: None,
        }
    }
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        // page wins over offset
        if let Some(page) = self.page {
            page.max(1).saturating_sub(1).saturating_mul(self.limit())
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_default() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), DEFAULT_LIMIT);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.page(), None);
    }

    #[test]
    fn test_pagination_params_limit_bounds() {
        let params = PaginationParams {
            limit: Some(0),
            offset: None,
            page: None,
        };
        assert_eq!(params.limit(), 1);

        let params = PaginationParams {
            limit: Some(150),
            offset: None,
            page: None,
        };
        assert_eq!(params.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_pagination_params_negative_offset() {
        let params = PaginationParams {
            limit: Some(10),
            offset: Some(-5),
            page: None,
        };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_page_overrides_offset() {
        let params = PaginationParams {
            limit: Some(10),
            offset: Some(3),
            page: Some(3),
        };
        assert_eq!(params.offset(), 20);
        assert_eq!(params.page(), Some(3));
    }

    #[test]
    fn test_pagination_from_query_strings() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"limit":"15","offset":"","page":"2"}"#).unwrap();
        assert_eq!(params.limit(), 15);
        assert_eq!(params.offset(), 15);
    }

    #[test]
    fn test_pagination_huge_page_saturates() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"page":"9223372036854775807","limit":"20"}"#).unwrap();
        assert_eq!(params.offset(), i64::MAX);

        let meta = PaginationMeta::new(3, &params, 0);
        assert!(meta.offset >= 0);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_pagination_meta_has_more() {
        let params = PaginationParams {
            limit: Some(10),
            offset: Some(0),
            page: None,
        };
        let meta = PaginationMeta::new(25, &params, 10);
        assert!(meta.has_more);

        let params = PaginationParams {
            limit: Some(10),
            offset: Some(20),
            page: None,
        };
        let meta = PaginationMeta::new(25, &params, 5);
        assert!(!meta.has_more);
        assert_eq!(meta.offset, 20);
    }
}
