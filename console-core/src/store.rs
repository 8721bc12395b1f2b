use log::debug;

use crate::entity::{Entity, SubmitContext};
use crate::error::{ConsoleError, ConsoleResult};
use crate::forms::Form;
use crate::models::{parse_choice, Choice, RecordId};

/// Wire value of the "no constraint" filter
pub const FILTER_ALL: &str = "all";

/// A categorical filter: either the sentinel "all" or one exact value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

impl<T: Choice> Filter<T> {
    /// Parses "all" (or an empty string) as no constraint, anything else as a value
    pub fn parse(s: &str) -> ConsoleResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(FILTER_ALL) {
            return Ok(Filter::All);
        }
        parse_choice(trimmed).map(Filter::Only)
    }

    /// The sentinel followed by every value, as offered by a filter select box
    pub fn options() -> Vec<Filter<T>> {
        std::iter::once(Filter::All)
            .chain(T::ALL.iter().copied().map(Filter::Only))
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => FILTER_ALL,
            Filter::Only(value) => value.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Only(value) => value.label(),
        }
    }
}

/// Free-text search plus categorical filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery<F> {
    pub search: String,
    pub filter: F,
}

impl<F: Default> ListQuery<F> {
    /// A query with only a search term
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            filter: F::default(),
        }
    }
}

impl<F> ListQuery<F> {
    pub fn new(search: impl Into<String>, filter: F) -> Self {
        Self {
            search: search.into(),
            filter,
        }
    }
}

/// Case-insensitive substring match of `needle` in any of `fields`
fn search_matches(fields: &[&str], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

/// An ordered list of records with per-store identity allocation
#[derive(Debug, Clone)]
pub struct EntityStore<E> {
    records: Vec<E>,
    next_id: u64,
}

impl<E: Entity> Default for EntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityStore<E> {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Creates a store holding `records`; new ids continue after the highest one
    pub fn from_records(records: Vec<E>) -> Self {
        let next_id = records.iter().map(|r| r.id().0).max().unwrap_or(0) + 1;
        Self { records, next_id }
    }

    /// All records in insertion order
    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Gets a record by identity
    pub fn get(&self, id: RecordId) -> Option<&E> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Peeks at the identity the next insert will receive
    pub fn peek_next_id(&self) -> RecordId {
        RecordId(self.next_id)
    }

    fn mint_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: RecordId) -> ConsoleResult<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(ConsoleError::NotFound { kind: E::KIND, id })
    }

    /// Records matching the query, in insertion order
    pub fn list(&self, query: &ListQuery<E::Filter>) -> Vec<&E> {
        let visible: Vec<&E> = self
            .records
            .iter()
            .filter(|r| search_matches(&r.search_fields(), &query.search))
            .filter(|r| r.matches_filter(&query.filter))
            .collect();
        debug!(
            "{} list: {} of {} visible (search {:?})",
            E::KIND,
            visible.len(),
            self.records.len(),
            query.search
        );
        visible
    }

    /// Validates the form and appends a new record built from it
    pub fn insert(&mut self, form: E::Form, ctx: &SubmitContext) -> ConsoleResult<&E> {
        form.validate()?;
        let id = self.mint_id();
        let record = E::create(id, form, ctx)?;
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Validates the form and merges it over the record with identity `id`
    pub fn update(&mut self, id: RecordId, form: E::Form, ctx: &SubmitContext) -> ConsoleResult<&E> {
        form.validate()?;
        let pos = self.position(id)?;
        self.records[pos].apply(form, ctx)?;
        Ok(&self.records[pos])
    }

    /// Removes and returns the record with identity `id`
    pub fn remove(&mut self, id: RecordId) -> ConsoleResult<E> {
        let pos = self.position(id)?;
        Ok(self.records.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ProjectFilter, TaskFilter};
    use crate::forms::ProjectForm;
    use crate::models::{Project, ProjectStatus, Task, TaskPriority, TaskStatus};
    use crate::seed;
    use chrono::NaiveDate;

    fn ctx() -> SubmitContext {
        SubmitContext::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    fn project_form(name: &str) -> ProjectForm {
        ProjectForm {
            name: name.to_string(),
            client_name: "Acme".to_string(),
            contact_number: "+1 555 0100".to_string(),
            ..ProjectForm::default()
        }
    }

    fn names<E: Entity>(records: &[&E]) -> Vec<String> {
        records.iter().map(|r| r.display_name().to_string()).collect()
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(Filter::<TaskStatus>::parse("all").unwrap(), Filter::All);
        assert_eq!(Filter::<TaskStatus>::parse("").unwrap(), Filter::All);
        assert_eq!(
            Filter::<TaskStatus>::parse("completed").unwrap(),
            Filter::Only(TaskStatus::Completed)
        );
        assert!(Filter::<TaskStatus>::parse("blocked").is_err());
    }

    #[test]
    fn test_filter_options_start_with_all() {
        let options = Filter::<TaskPriority>::options();
        assert_eq!(options.len(), 4);
        assert_eq!(options[0].label(), "All");
        assert_eq!(options[3].as_str(), "high");
    }

    #[test]
    fn test_search_bank_finds_banking_app() {
        let store = EntityStore::from_records(seed::projects());
        let hits = store.list(&ListQuery::search("bank"));
        assert_eq!(names(&hits), vec!["Mobile Banking App"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = EntityStore::from_records(seed::projects());
        let hits = store.list(&ListQuery::search("MEDICARE"));
        assert_eq!(names(&hits), vec!["Healthcare Portal"]);
    }

    #[test]
    fn test_empty_search_returns_all_in_order() {
        let store = EntityStore::from_records(seed::tasks());
        let hits = store.list(&ListQuery::default());
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, RecordId(1));
        assert_eq!(hits[2].id, RecordId(3));
    }

    #[test]
    fn test_filtering_is_idempotent_and_commutative() {
        let store = EntityStore::from_records(seed::tasks());
        let filter = TaskFilter {
            status: Filter::Only(TaskStatus::InProgress),
            ..TaskFilter::default()
        };

        let combined: Vec<RecordId> = store
            .list(&ListQuery::new("john", filter.clone()))
            .iter()
            .map(|t| t.id)
            .collect();

        // search first, then status
        let search_then_status: Vec<RecordId> = store
            .list(&ListQuery::search("john"))
            .into_iter()
            .filter(|t| t.matches_filter(&filter))
            .map(|t| t.id)
            .collect();

        // status first, then search
        let status_then_search: Vec<RecordId> = store
            .list(&ListQuery::new("", filter.clone()))
            .into_iter()
            .filter(|t: &&Task| search_matches(&t.search_fields(), "john"))
            .map(|t| t.id)
            .collect();

        assert_eq!(combined, search_then_status);
        assert_eq!(combined, status_then_search);
        assert_eq!(combined, vec![RecordId(2)]);

        // Applying the same query again changes nothing
        let again: Vec<RecordId> = store
            .list(&ListQuery::new("john", filter))
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(again, combined);
    }

    #[test]
    fn test_insert_assigns_next_id() {
        let mut store = EntityStore::from_records(seed::projects());
        assert_eq!(store.peek_next_id(), RecordId(4));

        let project = store.insert(project_form("Intranet"), &ctx()).unwrap();
        assert_eq!(project.id, RecordId(4));
        assert_eq!(project.created_at, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_rapid_inserts_never_collide() {
        let mut store: EntityStore<Project> = EntityStore::new();
        let mut ids = Vec::new();
        for i in 0..100 {
            let id = store.insert(project_form(&format!("P{}", i)), &ctx()).unwrap().id;
            ids.push(id);
        }
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut store = EntityStore::from_records(seed::projects());
        store.remove(RecordId(3)).unwrap();
        let id = store.insert(project_form("Intranet"), &ctx()).unwrap().id;
        assert_eq!(id, RecordId(4));
    }

    #[test]
    fn test_insert_rejects_invalid_form() {
        let mut store = EntityStore::from_records(seed::projects());
        let result = store.insert(project_form(""), &ctx());
        assert!(matches!(result, Err(ConsoleError::Validation { field: "name", .. })));
        assert_eq!(store.len(), 3);
        assert_eq!(store.peek_next_id(), RecordId(4));
    }

    #[test]
    fn test_update_replaces_by_identity() {
        let mut store = EntityStore::from_records(seed::projects());
        let before: Vec<Project> = store.records().to_vec();

        let mut form = store.get(RecordId(2)).unwrap().to_form();
        form.status = ProjectStatus::OnHold;
        store.update(RecordId(2), form, &ctx()).unwrap();

        assert_eq!(store.len(), 3);
        let updated = store.get(RecordId(2)).unwrap();
        assert_eq!(updated.status, ProjectStatus::OnHold);
        assert_eq!(updated.created_at, before[1].created_at);
        assert_eq!(store.records()[0], before[0]);
        assert_eq!(store.records()[2], before[2]);
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = EntityStore::from_records(seed::projects());
        let err = store
            .update(RecordId(99), project_form("Ghost"), &ctx())
            .unwrap_err();
        assert_eq!(err.to_string(), "Project not found: 99");
    }

    #[test]
    fn test_remove_by_identity() {
        let mut store = EntityStore::from_records(seed::projects());
        let removed = store.remove(RecordId(1)).unwrap();
        assert_eq!(removed.name, "E-commerce Website");
        assert_eq!(store.len(), 2);
        assert!(store.get(RecordId(1)).is_none());
        assert!(store.remove(RecordId(1)).is_err());
    }

    #[test]
    fn test_status_filter_on_projects() {
        let store = EntityStore::from_records(seed::projects());
        let query = ListQuery::new(
            "",
            ProjectFilter {
                status: Filter::Only(ProjectStatus::Completed),
            },
        );
        assert_eq!(names(&store.list(&query)), vec!["Healthcare Portal"]);
    }
}
