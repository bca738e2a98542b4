//! Pagination and listing primitives shared across all list endpoints.

use serde::{Deserialize, Serialize};

use crate::config::ListSettings;

/// Raw listing parameters, accepted from the query string or the request
/// body (query wins when both carry a value).
///
/// `page` and `size` parse leniently: a non-numeric value reads as absent,
/// which downstream turns into the fallback first page rather than a 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub size: Option<i64>,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

impl ListParams {
    /// Merge query-string and body parameters, query preferred.
    pub fn merged(query: Self, body: Option<Self>) -> Self {
        let body = body.unwrap_or_default();
        Self {
            page: query.page.or(body.page),
            size: query.size.or(body.size),
            order_by: query.order_by.or(body.order_by),
            sort_by: query.sort_by.or(body.sort_by),
        }
    }

    pub fn sort_key(&self) -> SortKey {
        SortKey::from_param(self.order_by.as_deref())
    }

    pub fn sort_dir(&self) -> SortDir {
        SortDir::from_param(self.sort_by.as_deref())
    }
}

/// Whitelisted sort columns. Anything outside the whitelist silently falls
/// back to `CreatedAt` rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("updatedAt") => Self::UpdatedAt,
            _ => Self::CreatedAt,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction, case-normalized; anything but ASC/DESC falls back to DESC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(|p| p.to_uppercase()).as_deref() {
            Some("ASC") => Self::Asc,
            Some("DESC") => Self::Desc,
            _ => Self::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Offset/limit window derived from a page request.
///
/// Invalid input never errors: an absent or out-of-range page degrades to
/// the fallback first page, and the effective page size never drops below
/// the configured floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub start: i64,
    pub end: i64,
    pub pages: i64,
    pub limit: i64,
}

impl PageWindow {
    pub fn compute(
        page: Option<i64>,
        size: Option<i64>,
        total_records: i64,
        settings: &ListSettings,
    ) -> Self {
        let floor = settings.page_size_floor.max(1);
        let records = match size {
            Some(s) if s >= floor => s,
            _ => floor,
        };
        let pages = if total_records == 0 {
            0
        } else {
            (total_records + records - 1) / records
        };

        match page {
            Some(p) if p >= 1 && p <= pages => {
                let end = if p == pages { total_records } else { p * records };
                // The last page absorbs the remainder by reaching backwards
                // a full window; page 1 always starts at zero.
                let start = if p == 1 { 0 } else { end - records };
                Self {
                    start,
                    end,
                    pages,
                    limit: end - start,
                }
            }
            _ => {
                let end = total_records.min(records);
                Self {
                    start: 0,
                    end,
                    pages,
                    limit: end,
                }
            }
        }
    }
}

/// Record page plus metadata returned by listing endpoints. `pages` is
/// omitted on the public no-pagination variants.
#[derive(Debug, Serialize)]
pub struct Listed<T: Serialize> {
    pub count: i64,
    pub rows: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
}

impl<T: Serialize> Listed<T> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Data payload for list endpoints: the page object when records matched,
/// or a bare empty sequence for the "not found" success response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListPayload<T: Serialize> {
    Page(Listed<T>),
    Empty([(); 0]),
}

impl<T: Serialize> From<Listed<T>> for ListPayload<T> {
    fn from(listed: Listed<T>) -> Self {
        if listed.is_empty() {
            Self::Empty([])
        } else {
            Self::Page(listed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ListSettings {
        ListSettings::default()
    }

    #[test]
    fn first_page_of_45() {
        let w = PageWindow::compute(Some(1), Some(20), 45, &settings());
        assert_eq!(
            w,
            PageWindow {
                start: 0,
                end: 20,
                pages: 3,
                limit: 20
            }
        );
    }

    #[test]
    fn last_page_absorbs_remainder() {
        let w = PageWindow::compute(Some(3), Some(20), 45, &settings());
        assert_eq!(
            w,
            PageWindow {
                start: 25,
                end: 45,
                pages: 3,
                limit: 20
            }
        );
    }

    #[test]
    fn interior_page() {
        let w = PageWindow::compute(Some(2), Some(20), 45, &settings());
        assert_eq!(
            w,
            PageWindow {
                start: 20,
                end: 40,
                pages: 3,
                limit: 20
            }
        );
    }

    #[test]
    fn out_of_range_page_falls_back() {
        let w = PageWindow::compute(Some(5), Some(20), 45, &settings());
        assert_eq!(
            w,
            PageWindow {
                start: 0,
                end: 20,
                pages: 3,
                limit: 20
            }
        );
    }

    #[test]
    fn absent_page_and_size_cap_at_total() {
        let w = PageWindow::compute(None, None, 5, &settings());
        assert_eq!(
            w,
            PageWindow {
                start: 0,
                end: 5,
                pages: 1,
                limit: 5
            }
        );
    }

    #[test]
    fn size_below_floor_is_raised() {
        let w = PageWindow::compute(Some(1), Some(5), 45, &settings());
        assert_eq!(w.limit, 20);
        assert_eq!(w.pages, 3);
    }

    #[test]
    fn negative_and_zero_pages_fall_back() {
        for page in [Some(-1), Some(0), None] {
            let w = PageWindow::compute(page, Some(20), 45, &settings());
            assert_eq!(w.start, 0);
            assert_eq!(w.end, 20);
        }
    }

    #[test]
    fn empty_table_yields_empty_window() {
        let w = PageWindow::compute(Some(1), None, 0, &settings());
        assert_eq!(
            w,
            PageWindow {
                start: 0,
                end: 0,
                pages: 0,
                limit: 0
            }
        );
    }

    #[test]
    fn window_invariants_hold() {
        let s = settings();
        for total in [0i64, 1, 19, 20, 21, 45, 100, 1001] {
            for page in [None, Some(-3), Some(0), Some(1), Some(2), Some(3), Some(99)] {
                for size in [None, Some(0), Some(5), Some(20), Some(33)] {
                    let w = PageWindow::compute(page, size, total, &s);
                    assert!(0 <= w.start, "start {w:?}");
                    assert!(w.start <= w.end, "order {w:?}");
                    assert!(w.end <= total, "end {w:?} total {total}");
                    assert_eq!(w.limit, w.end - w.start, "limit {w:?}");
                }
            }
        }
    }

    #[test]
    fn sort_key_whitelist_fallback() {
        assert_eq!(SortKey::from_param(Some("updatedAt")), SortKey::UpdatedAt);
        assert_eq!(SortKey::from_param(Some("createdAt")), SortKey::CreatedAt);
        assert_eq!(SortKey::from_param(Some("views")), SortKey::CreatedAt);
        assert_eq!(SortKey::from_param(Some("id; DROP TABLE")), SortKey::CreatedAt);
        assert_eq!(SortKey::from_param(None), SortKey::CreatedAt);
    }

    #[test]
    fn sort_dir_case_insensitive_with_fallback() {
        assert_eq!(SortDir::from_param(Some("asc")), SortDir::Asc);
        assert_eq!(SortDir::from_param(Some("ASC")), SortDir::Asc);
        assert_eq!(SortDir::from_param(Some("Desc")), SortDir::Desc);
        assert_eq!(SortDir::from_param(Some("sideways")), SortDir::Desc);
        assert_eq!(SortDir::from_param(None), SortDir::Desc);
    }

    #[test]
    fn params_parse_leniently() {
        let params: ListParams =
            serde_json::from_value(serde_json::json!({"page": "3", "size": 25})).unwrap();
        assert_eq!(params.page, Some(3));
        assert_eq!(params.size, Some(25));

        let params: ListParams =
            serde_json::from_value(serde_json::json!({"page": "abc", "size": null})).unwrap();
        assert_eq!(params.page, None);
        assert_eq!(params.size, None);
    }

    #[test]
    fn params_merge_prefers_query() {
        let query = ListParams {
            page: Some(2),
            size: None,
            order_by: None,
            sort_by: Some("asc".into()),
        };
        let body = ListParams {
            page: Some(9),
            size: Some(50),
            order_by: Some("updatedAt".into()),
            sort_by: Some("desc".into()),
        };
        let merged = ListParams::merged(query, Some(body));
        assert_eq!(merged.page, Some(2));
        assert_eq!(merged.size, Some(50));
        assert_eq!(merged.order_by.as_deref(), Some("updatedAt"));
        assert_eq!(merged.sort_by.as_deref(), Some("asc"));
    }

    #[test]
    fn listed_omits_pages_when_absent() {
        let listed = Listed {
            count: 2,
            rows: vec![1, 2],
            pages: None,
        };
        let json = serde_json::to_value(&listed).unwrap();
        assert!(json.get("pages").is_none());

        let paged = Listed {
            count: 2,
            rows: vec![1, 2],
            pages: Some(1),
        };
        let json = serde_json::to_value(&paged).unwrap();
        assert_eq!(json["pages"], 1);
    }

    #[test]
    fn empty_payload_serializes_as_sequence() {
        let listed: Listed<i32> = Listed {
            count: 0,
            rows: vec![],
            pages: Some(0),
        };
        let payload = ListPayload::from(listed);
        assert_eq!(serde_json::to_value(&payload).unwrap(), serde_json::json!([]));
    }

    #[test]
    fn nonempty_payload_serializes_as_page_object() {
        let listed = Listed {
            count: 1,
            rows: vec!["a"],
            pages: Some(1),
        };
        let payload = ListPayload::from(listed);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["rows"][0], "a");
    }
}
