//! Generic list-query engine shared by every resource.
//!
//! One parametrized implementation of the list/search flow: compose the
//! filter predicate, derive the page window, and run a count plus a fetch
//! built from the identical WHERE clause and bind sequence, so the reported
//! `pages` always agrees with the window that produced the rows. The count
//! and fetch are separate round-trips; rows inserted or deleted between
//! them are an accepted staleness window.

use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::config::ListSettings;
use crate::errors::AppError;
use crate::models::pagination::{ListParams, Listed, PageWindow};

/// Static description of a listable resource: where rows live, what to
/// select, and which text column search runs against.
#[derive(Debug, Clone, Copy)]
pub struct ResourceQuery {
    /// FROM clause head, including an alias when joined (`"posts p"`).
    pub table: &'static str,
    /// FROM clause tail: join clauses, or empty.
    pub joins: &'static str,
    /// SELECT column list; aliases resolve joined columns.
    pub columns: &'static str,
    /// Qualified primary text column, searched and used as the leading
    /// sort key on search listings.
    pub primary_field: &'static str,
    /// Prefix for the base table's columns in WHERE/ORDER BY (`"p."`
    /// when joined, empty otherwise).
    pub qualifier: &'static str,
}

/// Predicates AND-ed into one WHERE clause.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub status: Option<i16>,
    /// Column equality predicates (column name, value).
    pub equals: Vec<(&'static str, String)>,
    /// Search term matched against the primary text field.
    pub search: Option<String>,
    /// Extra raw predicate without binds (e.g. a date horizon).
    pub extra: Option<&'static str>,
}

impl ListFilter {
    pub fn active() -> Self {
        Self {
            status: Some(crate::models::status::ACTIVE),
            ..Self::default()
        }
    }

    pub fn searching(search: &str) -> Self {
        Self {
            search: Some(search.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Bind {
    Status(i16),
    Text(String),
}

/// Build the WHERE clause and its bind sequence.
///
/// The search predicate ORs four match modes against the primary field,
/// kept exactly as the legacy endpoints shipped them: `%term` (the
/// "contains" slot, which really is a suffix match), `term%`, `%term`,
/// and `%term%`. The duplication between the first and third mode is
/// intentional and must not be unified.
fn build_where(resource: &ResourceQuery, filter: &ListFilter) -> (String, Vec<Bind>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut binds: Vec<Bind> = Vec::new();
    let q = resource.qualifier;

    if let Some(status) = filter.status {
        binds.push(Bind::Status(status));
        conditions.push(format!("{q}status = ${}", binds.len()));
    }
    for (column, value) in &filter.equals {
        binds.push(Bind::Text(value.clone()));
        conditions.push(format!("{column} = ${}", binds.len()));
    }
    if let Some(search) = &filter.search {
        let field = resource.primary_field;
        let first = binds.len() + 1;
        binds.push(Bind::Text(format!("%{search}")));
        binds.push(Bind::Text(format!("{search}%")));
        binds.push(Bind::Text(format!("%{search}")));
        binds.push(Bind::Text(format!("%{search}%")));
        conditions.push(format!(
            "({field} ILIKE ${first} OR {field} ILIKE ${} OR {field} ILIKE ${} OR {field} ILIKE ${})",
            first + 1,
            first + 2,
            first + 3
        ));
    }
    if let Some(extra) = filter.extra {
        conditions.push(extra.to_string());
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, binds)
}

/// ORDER BY clause: search listings lead with the primary field ascending,
/// then everything follows the whitelisted sort key and direction.
fn order_clause(resource: &ResourceQuery, params: &ListParams, searching: bool) -> String {
    let key = params.sort_key().column();
    let dir = params.sort_dir().as_sql();
    let q = resource.qualifier;
    if searching {
        format!("ORDER BY {} ASC, {q}{key} {dir}", resource.primary_field)
    } else {
        format!("ORDER BY {q}{key} {dir}")
    }
}

/// Run the paginated list flow: count, window, fetch.
pub async fn list_page<T>(
    pool: &PgPool,
    resource: &ResourceQuery,
    filter: &ListFilter,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<T>, AppError>
where
    T: Serialize + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let (where_clause, binds) = build_where(resource, filter);

    let count_sql = format!(
        "SELECT COUNT(*) FROM {} {} {}",
        resource.table, resource.joins, where_clause
    );
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in &binds {
        count_query = match bind {
            Bind::Status(v) => count_query.bind(*v),
            Bind::Text(s) => count_query.bind(s.clone()),
        };
    }
    let total = count_query.fetch_one(pool).await?;

    let window = PageWindow::compute(params.page, params.size, total, settings);
    let order = order_clause(resource, params, filter.search.is_some());
    let data_sql = format!(
        "SELECT {} FROM {} {} {} {} LIMIT {} OFFSET {}",
        resource.columns,
        resource.table,
        resource.joins,
        where_clause,
        order,
        window.limit,
        window.start
    );
    let mut data_query = sqlx::query_as::<_, T>(&data_sql);
    for bind in &binds {
        data_query = match bind {
            Bind::Status(v) => data_query.bind(*v),
            Bind::Text(s) => data_query.bind(s.clone()),
        };
    }
    let rows = data_query.fetch_all(pool).await?;

    Ok(Listed {
        count: total,
        rows,
        pages: Some(window.pages),
    })
}

/// Run the no-pagination public variant: the whole filtered set under a
/// fixed ordering, with no `pages` in the result.
pub async fn list_all<T>(
    pool: &PgPool,
    resource: &ResourceQuery,
    filter: &ListFilter,
    order_by: &str,
) -> Result<Listed<T>, AppError>
where
    T: Serialize + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let (where_clause, binds) = build_where(resource, filter);
    let data_sql = format!(
        "SELECT {} FROM {} {} {} ORDER BY {}",
        resource.columns, resource.table, resource.joins, where_clause, order_by
    );
    let mut data_query = sqlx::query_as::<_, T>(&data_sql);
    for bind in &binds {
        data_query = match bind {
            Bind::Status(v) => data_query.bind(*v),
            Bind::Text(s) => data_query.bind(s.clone()),
        };
    }
    let rows = data_query.fetch_all(pool).await?;

    Ok(Listed {
        count: rows.len() as i64,
        rows,
        pages: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: ResourceQuery = ResourceQuery {
        table: "events",
        joins: "",
        columns: "*",
        primary_field: "name",
        qualifier: "",
    };

    const JOINED: ResourceQuery = ResourceQuery {
        table: "posts p",
        joins: "JOIN categories c ON c.unique_id = p.category_unique_id",
        columns: "p.*",
        primary_field: "p.title",
        qualifier: "p.",
    };

    #[test]
    fn empty_filter_builds_no_where() {
        let (clause, binds) = build_where(&BARE, &ListFilter::default());
        assert_eq!(clause, "");
        assert!(binds.is_empty());
    }

    #[test]
    fn status_filter_is_qualified() {
        let (clause, binds) = build_where(&JOINED, &ListFilter::active());
        assert_eq!(clause, "WHERE p.status = $1");
        assert_eq!(binds, vec![Bind::Status(1)]);
    }

    #[test]
    fn search_expands_to_four_or_modes() {
        let (clause, binds) = build_where(&BARE, &ListFilter::searching("gala"));
        assert_eq!(
            clause,
            "WHERE (name ILIKE $1 OR name ILIKE $2 OR name ILIKE $3 OR name ILIKE $4)"
        );
        assert_eq!(
            binds,
            vec![
                Bind::Text("%gala".into()),
                Bind::Text("gala%".into()),
                Bind::Text("%gala".into()),
                Bind::Text("%gala%".into()),
            ]
        );
    }

    #[test]
    fn equality_filters_and_with_search() {
        let filter = ListFilter {
            status: Some(1),
            equals: vec![("p.category_unique_id", "abc".into())],
            search: Some("law".into()),
            extra: None,
        };
        let (clause, binds) = build_where(&JOINED, &filter);
        assert_eq!(
            clause,
            "WHERE p.status = $1 AND p.category_unique_id = $2 AND \
             (p.title ILIKE $3 OR p.title ILIKE $4 OR p.title ILIKE $5 OR p.title ILIKE $6)"
        );
        assert_eq!(binds.len(), 6);
    }

    #[test]
    fn extra_predicate_is_appended_raw() {
        let filter = ListFilter {
            status: Some(1),
            extra: Some("start_time >= (NOW() AT TIME ZONE 'utc')"),
            ..ListFilter::default()
        };
        let (clause, _) = build_where(&BARE, &filter);
        assert_eq!(
            clause,
            "WHERE status = $1 AND start_time >= (NOW() AT TIME ZONE 'utc')"
        );
    }

    #[test]
    fn plain_order_uses_whitelisted_key_and_direction() {
        let params = ListParams {
            order_by: Some("updatedAt".into()),
            sort_by: Some("asc".into()),
            ..ListParams::default()
        };
        assert_eq!(order_clause(&JOINED, &params, false), "ORDER BY p.updated_at ASC");
    }

    #[test]
    fn unknown_sort_inputs_degrade_to_defaults() {
        let params = ListParams {
            order_by: Some("views".into()),
            sort_by: Some("upwards".into()),
            ..ListParams::default()
        };
        assert_eq!(order_clause(&BARE, &params, false), "ORDER BY created_at DESC");
    }

    #[test]
    fn search_order_leads_with_primary_field() {
        let params = ListParams::default();
        assert_eq!(
            order_clause(&JOINED, &params, true),
            "ORDER BY p.title ASC, p.created_at DESC"
        );
    }
}
