//! SurrealDB implementation of [`ResourceRepository`].

use chrono::{DateTime, Utc};
use roster_core::error::RosterResult;
use roster_core::filter::{ResourceFilter, SearchField};
use roster_core::models::resource::{CreateResource, Resource, UpdateResource};
use roster_core::repository::ResourceRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_uuid, parse_uuids, uuid_strings};
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ResourceRow {
    name: Option<String>,
    phone_number: Option<String>,
    email: Option<String>,
    identity_card: Option<String>,
    address: Option<String>,
    metadata: serde_json::Value,
    projects: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ResourceRow {
    fn into_resource(self, id: Uuid) -> Result<Resource, DbError> {
        Ok(Resource {
            id,
            name: self.name,
            phone_number: self.phone_number,
            email: self.email,
            identity_card: self.identity_card,
            address: self.address,
            metadata: self.metadata,
            projects: parse_uuids(&self.projects, "project")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ResourceRowWithId {
    record_id: String,
    name: Option<String>,
    phone_number: Option<String>,
    email: Option<String>,
    identity_card: Option<String>,
    address: Option<String>,
    metadata: serde_json::Value,
    projects: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ResourceRowWithId {
    fn try_into_resource(self) -> Result<Resource, DbError> {
        let id = parse_uuid(&self.record_id, "resource")?;
        ResourceRow {
            name: self.name,
            phone_number: self.phone_number,
            email: self.email,
            identity_card: self.identity_card,
            address: self.address,
            metadata: self.metadata,
            projects: self.projects,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_resource(id)
    }
}

fn single_row(rows: Vec<ResourceRow>, id: Uuid) -> Result<Resource, DbError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| DbError::not_found("resource", id.to_string()))?
        .into_resource(id)
}

/// Bind parameter name for a field-specific search term.
fn term_param(field: SearchField) -> &'static str {
    match field {
        SearchField::Name => "name_term",
        SearchField::PhoneNumber => "phone_number_term",
        SearchField::Email => "email_term",
        SearchField::IdentityCard => "identity_card_term",
    }
}

fn contains_expr(field: SearchField, param: &str) -> String {
    format!(
        "string::contains(string::lowercase({} ?? ''), ${param})",
        field.column()
    )
}

/// Render `filter` as a SurrealQL `WHERE` clause plus its bindings.
///
/// Returns an empty clause for an empty filter. Terms only ever appear as
/// bound parameters.
pub fn search_clause(filter: &ResourceFilter) -> (String, Vec<(&'static str, String)>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    if let Some(term) = filter.search_term() {
        let any = SearchField::ALL
            .iter()
            .map(|field| contains_expr(*field, "search"))
            .collect::<Vec<_>>()
            .join(" OR ");
        conditions.push(format!("({any})"));
        binds.push(("search", term.as_str().to_owned()));
    }

    for (field, term) in filter.field_terms() {
        let param = term_param(*field);
        conditions.push(contains_expr(*field, param));
        binds.push((param, term.as_str().to_owned()));
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), binds)
    }
}

/// SurrealDB implementation of the Resource repository.
#[derive(Clone)]
pub struct SurrealResourceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealResourceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ResourceRepository for SurrealResourceRepository<C> {
    async fn create(&self, input: CreateResource) -> RosterResult<Resource> {
        let id = Uuid::new_v4();
        let projects = uuid_strings(&input.projects.unwrap_or_default());
        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('resource', $id) SET \
                 name = $name, phone_number = $phone_number, \
                 email = $email, identity_card = $identity_card, \
                 address = $address, metadata = $metadata, \
                 projects = $projects",
            )
            .bind(("id", id.to_string()))
            .bind(("name", input.name))
            .bind(("phone_number", input.phone_number))
            .bind(("email", input.email))
            .bind(("identity_card", input.identity_card))
            .bind(("address", input.address))
            .bind(("metadata", metadata))
            .bind(("projects", projects))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ResourceRow> = result.take(0).map_err(DbError::from)?;
        single_row(rows, id).map_err(Into::into)
    }

    async fn get_by_id(&self, id: Uuid) -> RosterResult<Resource> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('resource', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResourceRow> = result.take(0).map_err(DbError::from)?;
        single_row(rows, id).map_err(Into::into)
    }

    async fn update(&self, id: Uuid, input: UpdateResource) -> RosterResult<Resource> {
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.phone_number.is_some() {
            sets.push("phone_number = $phone_number");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.identity_card.is_some() {
            sets.push("identity_card = $identity_card");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        if input.metadata.is_some() {
            sets.push("metadata = $metadata");
        }
        if input.projects.is_some() {
            sets.push("projects = $projects");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('resource', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id.to_string()));

        // Inner `None` binds NONE, which clears the column.
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(phone_number) = input.phone_number {
            builder = builder.bind(("phone_number", phone_number));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(identity_card) = input.identity_card {
            builder = builder.bind(("identity_card", identity_card));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }
        if let Some(metadata) = input.metadata {
            builder = builder.bind(("metadata", metadata));
        }
        if let Some(projects) = input.projects {
            builder = builder.bind(("projects", uuid_strings(&projects)));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ResourceRow> = result.take(0).map_err(DbError::from)?;
        single_row(rows, id).map_err(Into::into)
    }

    async fn delete(&self, id: Uuid) -> RosterResult<Resource> {
        // Only the resource record goes; project `members` keep the id.
        let result = self
            .db
            .query("DELETE type::record('resource', $id) RETURN BEFORE")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ResourceRow> = result.take(0).map_err(DbError::from)?;
        single_row(rows, id).map_err(Into::into)
    }

    async fn search(&self, filter: ResourceFilter) -> RosterResult<Vec<Resource>> {
        let (clause, binds) = search_clause(&filter);
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM resource {clause} \
             ORDER BY created_at ASC"
        );

        let mut builder = self.db.query(&query);
        for bind in binds {
            builder = builder.bind(bind);
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<ResourceRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_resource())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (clause, binds) = search_clause(&ResourceFilter::new());
        assert!(clause.is_empty());
        assert!(binds.is_empty());
    }

    #[test]
    fn search_term_ors_all_fields() {
        let (clause, binds) = search_clause(&ResourceFilter::new().search("Alice"));
        assert!(clause.starts_with("WHERE ("));
        for column in ["name", "phone_number", "email", "identity_card"] {
            assert!(clause.contains(&format!("string::lowercase({column} ?? '')")));
        }
        assert_eq!(clause.matches(" OR ").count(), 3);
        assert_eq!(binds, vec![("search", "alice".to_owned())]);
    }

    #[test]
    fn field_terms_are_anded_with_search() {
        let filter = ResourceFilter::new()
            .search("ali")
            .field(SearchField::Email, "example");
        let (clause, binds) = search_clause(&filter);
        assert!(clause.contains(") AND string::contains(string::lowercase(email ?? ''), $email_term)"));
        assert_eq!(binds.len(), 2);
        assert_eq!(binds[1], ("email_term", "example".to_owned()));
    }

    #[test]
    fn user_input_never_reaches_query_text() {
        let filter = ResourceFilter::new().search("'; DELETE resource; --");
        let (clause, binds) = search_clause(&filter);
        assert!(!clause.contains("DELETE"));
        assert_eq!(binds[0].1, "'; delete resource; --");
    }
}
