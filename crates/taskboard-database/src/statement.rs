//! SQL templates shared by every PostgreSQL repository.
//!
//! Statements use `?` placeholders in the order of their parameter list.
//! [`number_placeholders`] rewrites them to PostgreSQL's `$n` form just
//! before execution.

use chrono::{DateTime, Utc};

use taskboard_core::result::AppResult;
use taskboard_core::traits::{Entity, RepositoryPersistence, Statement};
use taskboard_core::types::{Criteria, Join, Ordered, Predicate, SqlValue};

/// Row window of a page query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: u64,
    pub offset: u64,
}

impl Window {
    pub fn first(limit: u64) -> Self {
        Self { limit, offset: 0 }
    }

    pub fn page(criteria: &Criteria) -> Self {
        Self {
            limit: criteria.limit(),
            offset: criteria.offset(),
        }
    }
}

fn columns(persistence: &RepositoryPersistence, qualified: bool) -> String {
    persistence
        .fields
        .iter()
        .map(|field| {
            if qualified {
                format!("{}.{field}", persistence.table_name)
            } else {
                (*field).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn joins_clause(joins: &[Join]) -> String {
    joins
        .iter()
        .map(|join| format!(" {}", join.to_definition()))
        .collect()
}

/// ` WHERE ...` for the conjunction of `predicates`, with their values.
///
/// Several predicates are each parenthesized so an `OR` group keeps its
/// meaning next to its siblings.
pub fn where_clause(predicates: &[Predicate]) -> (String, Vec<SqlValue>) {
    let values = predicates.iter().flat_map(Predicate::values).collect();
    let sql = match predicates {
        [] => String::new(),
        [single] => format!(" WHERE {}", single.to_definition()),
        many => format!(
            " WHERE {}",
            many.iter()
                .map(|p| format!("({})", p.to_definition()))
                .collect::<Vec<_>>()
                .join(" AND ")
        ),
    };
    (sql, values)
}

fn order_clause(orders: &[Ordered]) -> String {
    if orders.is_empty() {
        return String::new();
    }
    let items: Vec<_> = orders.iter().map(Ordered::to_definition).collect();
    format!(" ORDER BY {}", items.join(", "))
}

/// `SELECT <columns> FROM <table> [joins] [WHERE] [ORDER BY] [LIMIT/OFFSET]`.
///
/// Columns are qualified with the table name when joins are present. Joined
/// tables only narrow the rows; their columns are not projected.
pub fn select(
    persistence: &RepositoryPersistence,
    predicates: &[Predicate],
    orders: &[Ordered],
    joins: &[Join],
    window: Option<Window>,
) -> Statement {
    let (filter_sql, params) = where_clause(predicates);
    let mut sql = format!(
        "SELECT {} FROM {}{}{}{}",
        columns(persistence, !joins.is_empty()),
        persistence.table_name,
        joins_clause(joins),
        filter_sql,
        order_clause(orders),
    );
    if let Some(window) = window {
        sql.push_str(&format!(" LIMIT {} OFFSET {}", window.limit, window.offset));
    }
    Statement::query(sql, params)
}

/// One page of the rows matched by `criteria`.
pub fn select_page(
    persistence: &RepositoryPersistence,
    criteria: &Criteria,
    joins: &[Join],
) -> Statement {
    select(
        persistence,
        criteria.filters(),
        criteria.orders(),
        joins,
        Some(Window::page(criteria)),
    )
}

/// `SELECT COUNT(*) AS total` over the same joins and predicates as a page.
pub fn count(
    persistence: &RepositoryPersistence,
    predicates: &[Predicate],
    joins: &[Join],
) -> Statement {
    let (filter_sql, params) = where_clause(predicates);
    Statement::query(
        format!(
            "SELECT COUNT(*) AS total FROM {}{}{}",
            persistence.table_name,
            joins_clause(joins),
            filter_sql
        ),
        params,
    )
}

fn values_of<E: Entity>(entity: &E, fields: &[&'static str]) -> AppResult<Vec<SqlValue>> {
    fields.iter().map(|field| entity.column(field)).collect()
}

/// `INSERT INTO <table> (...) VALUES (...) RETURNING id`.
///
/// An empty id is left out so the database assigns one.
pub fn insert<E: Entity>(persistence: &RepositoryPersistence, entity: &E) -> AppResult<Statement> {
    let fields: Vec<&'static str> = persistence
        .fields
        .iter()
        .copied()
        .filter(|field| *field != "id" || !entity.id().is_empty())
        .collect();
    let params = values_of(entity, &fields)?;
    let placeholders = vec!["?"; fields.len()].join(", ");
    Ok(Statement::query(
        format!(
            "INSERT INTO {} ({}) VALUES ({placeholders}) RETURNING id",
            persistence.table_name,
            fields.join(", ")
        ),
        params,
    ))
}

/// `UPDATE <table> SET <every column but id> WHERE id = ?`.
pub fn update<E: Entity>(
    persistence: &RepositoryPersistence,
    id: &str,
    entity: &E,
) -> AppResult<Statement> {
    let fields: Vec<&'static str> = persistence
        .fields
        .iter()
        .copied()
        .filter(|field| *field != "id")
        .collect();
    let mut params = values_of(entity, &fields)?;
    params.push(SqlValue::from(id));
    let assignments: Vec<_> = fields.iter().map(|field| format!("{field} = ?")).collect();
    Ok(Statement::command(
        format!(
            "UPDATE {} SET {} WHERE id = ?",
            persistence.table_name,
            assignments.join(", ")
        ),
        params,
    ))
}

/// Mark the rows matched by `target` deleted and inactive.
pub fn soft_delete(
    persistence: &RepositoryPersistence,
    target: &Predicate,
    now: DateTime<Utc>,
) -> Statement {
    let (filter_sql, filter_params) = where_clause(std::slice::from_ref(target));
    let mut params = vec![SqlValue::from(now), SqlValue::from(now), SqlValue::Bool(false)];
    params.extend(filter_params);
    Statement::command(
        format!(
            "UPDATE {} SET deleted_at = ?, updated_at = ?, is_activated = ?{filter_sql}",
            persistence.table_name
        ),
        params,
    )
}

/// Rewrite `?` placeholders to `$1`, `$2`, ... skipping quoted literals.
pub fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0;
    let mut quoted = false;
    for ch in sql.chars() {
        match ch {
            '\'' => {
                quoted = !quoted;
                out.push(ch);
            }
            '?' if !quoted => {
                index += 1;
                out.push('$');
                out.push_str(&index.to_string());
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use taskboard_core::types::{FilterKind, GroupKind, OrderKind};
    use taskboard_entity::user::{Role, USER_PERSISTENCE, User};

    use super::*;
    use crate::filter::postgres_filter_builder;

    fn user() -> User {
        User::new(
            "Alice",
            "Liddell",
            "alice",
            "alice@example.com",
            "argon2-hash",
            Role::Client,
        )
    }

    #[test]
    fn test_select_without_filters() {
        let statement = select(&USER_PERSISTENCE, &[], &[], &[], None);
        assert_eq!(
            statement.sql,
            "SELECT id, name, last_name, username, email, password, permissions, created_at, \
             updated_at, deleted_at, is_activated FROM tbl_user"
        );
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_page_query() {
        let builder = postgres_filter_builder();
        let criteria = Criteria::new(3, 10)
            .unwrap()
            .filter(builder.filter(FilterKind::Like, "username", "ali").unwrap())
            .order_by(builder.order(OrderKind::Desc, "created_at").unwrap());
        let statement = select_page(&USER_PERSISTENCE, &criteria, &[]);
        assert!(statement.sql.ends_with(
            "FROM tbl_user WHERE username LIKE ? ORDER BY created_at DESC LIMIT 10 OFFSET 20"
        ));
        assert_eq!(statement.params, vec![SqlValue::from("%ali%")]);
    }

    #[test]
    fn test_sibling_predicates_are_parenthesized() {
        let builder = postgres_filter_builder();
        let either = builder
            .group(
                GroupKind::Or,
                [
                    builder.filter(FilterKind::Equal, "username", "a").unwrap(),
                    builder.filter(FilterKind::Equal, "email", "a").unwrap(),
                ],
            )
            .unwrap();
        let active = builder.filter(FilterKind::Equal, "is_activated", true).unwrap();
        let statement = count(&USER_PERSISTENCE, &[either.into(), active.into()], &[]);
        assert_eq!(
            statement.sql,
            "SELECT COUNT(*) AS total FROM tbl_user \
             WHERE ((username = ?) OR (email = ?)) AND (is_activated = ?)"
        );
        assert_eq!(statement.params.len(), 3);
    }

    #[test]
    fn test_joined_select_qualifies_columns() {
        let join = Join::inner("tbl_profile", "tbl_profile.user_id = tbl_user.id");
        let statement = select(&USER_PERSISTENCE, &[], &[], &[join], Some(Window::first(1)));
        assert!(statement.sql.starts_with("SELECT tbl_user.id, tbl_user.name,"));
        assert!(statement.sql.ends_with(
            "FROM tbl_user INNER JOIN tbl_profile ON tbl_profile.user_id = tbl_user.id LIMIT 1 OFFSET 0"
        ));
    }

    #[test]
    fn test_insert_returns_id() {
        let statement = insert(&USER_PERSISTENCE, &user()).unwrap();
        assert_eq!(
            statement.sql,
            "INSERT INTO tbl_user (name, last_name, username, email, password, permissions, \
             created_at, updated_at, deleted_at, is_activated) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id"
        );
        assert_eq!(statement.params.len(), 10);
        assert_eq!(statement.params[2], SqlValue::from("alice"));

        let mut user = user();
        user.data.id = "u-1".into();
        let statement = insert(&USER_PERSISTENCE, &user).unwrap();
        assert!(statement.sql.starts_with("INSERT INTO tbl_user (id, name,"));
        assert_eq!(statement.params[0], SqlValue::from("u-1"));
    }

    #[test]
    fn test_update_excludes_id_from_set() {
        let statement = update(&USER_PERSISTENCE, "u-1", &user()).unwrap();
        assert!(statement.sql.starts_with("UPDATE tbl_user SET name = ?, last_name = ?"));
        assert!(statement.sql.ends_with("is_activated = ? WHERE id = ?"));
        assert!(!statement.sql.contains("SET id"));
        assert_eq!(statement.params.last(), Some(&SqlValue::from("u-1")));
        assert_eq!(statement.params.len(), 11);
    }

    #[test]
    fn test_soft_delete() {
        let builder = postgres_filter_builder();
        let target: Predicate = builder.filter(FilterKind::Equal, "id", "u-1").unwrap().into();
        let now = Utc::now();
        let statement = soft_delete(&USER_PERSISTENCE, &target, now);
        assert_eq!(
            statement.sql,
            "UPDATE tbl_user SET deleted_at = ?, updated_at = ?, is_activated = ? WHERE id = ?"
        );
        assert_eq!(
            statement.params,
            vec![
                SqlValue::from(now),
                SqlValue::from(now),
                SqlValue::Bool(false),
                SqlValue::from("u-1"),
            ]
        );
    }

    #[test]
    fn test_number_placeholders() {
        assert_eq!(
            number_placeholders("a = ? AND b IN (?, ?) AND c = '?'"),
            "a = $1 AND b IN ($2, $3) AND c = '?'"
        );
        assert_eq!(number_placeholders("SELECT 1"), "SELECT 1");
    }
}
