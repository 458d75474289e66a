//! Config: the reconciled execution plan for one request.
//!
//! Reconciliation is pure and infallible: unknown requested columns are
//! dropped, filters on columns absent from the template are ignored, and
//! empty intervals disappear. A config never references a column the
//! template does not declare.

use crate::{
    predicate::{ComparisonOp, PageSpec, Predicate, SortDirection, SortSpec},
    request::{Request, SearchMode},
    template::{ColumnMeta, Template},
    value::Value,
};
use std::ops::Bound;

///
/// Config
///
/// Effective projection, predicates, sort, page, and count-cache decision
/// for one request. Derived fresh per request; never shared.
///

#[derive(Clone, Debug)]
pub struct Config {
    projection: Vec<String>,
    predicates: Vec<Predicate>,
    sort: Option<SortSpec>,
    page: PageSpec,
    use_count_cache: bool,
    cache_key: String,
}

impl Config {
    /// Merge a template and a request into an execution plan.
    #[must_use]
    pub fn reconcile(template: &Template, request: &Request) -> Self {
        let mut predicates = Vec::new();

        search_predicate(template, request, &mut predicates);
        filter_predicates(template, request, &mut predicates);
        interval_predicates(template, request, &mut predicates);

        Self {
            projection: projection(template, request),
            predicates,
            sort: sort(template, request),
            page: PageSpec {
                offset: request.offset(),
                limit: request.limit(),
            },
            use_count_cache: template.count_cache() && !request.has_narrowing(),
            cache_key: template.cache_key(),
        }
    }

    /// Data keys to select, in effective order.
    #[must_use]
    pub fn projection(&self) -> &[String] {
        &self.projection
    }

    /// AND-combined effective predicates.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub const fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    #[must_use]
    pub const fn page(&self) -> PageSpec {
        self.page
    }

    /// True when the unfiltered count may be served from the cache.
    #[must_use]
    pub const fn use_count_cache(&self) -> bool {
        self.use_count_cache
    }

    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }
}

// Request order wins when columns were requested; template order otherwise.
fn projection(template: &Template, request: &Request) -> Vec<String> {
    if request.columns().is_empty() {
        return template
            .columns()
            .iter()
            .map(|column| column.data_key().to_string())
            .collect();
    }

    request
        .columns()
        .iter()
        .filter_map(|name| template.column(name))
        .map(|column| column.data_key().to_string())
        .collect()
}

fn search_predicate(template: &Template, request: &Request, predicates: &mut Vec<Predicate>) {
    let term = request.search_term();
    if term.is_empty() {
        return;
    }

    let licensed = |column: &&ColumnMeta| match request.search_mode() {
        SearchMode::Full => true,
        SearchMode::PerColumn => request.filters().contains_key(column.name()),
    };

    let mut matched: Vec<Predicate> = template
        .columns()
        .iter()
        .filter(|column| column.searchable())
        .filter(licensed)
        .map(|column| Predicate::Compare {
            column: column.data_key().to_string(),
            op: column
                .comparison_operator()
                .unwrap_or(template.comparison_operator()),
            value: Value::Text(term.to_string()),
        })
        .collect();

    match matched.len() {
        0 => {}
        1 => predicates.push(matched.remove(0)),
        _ => predicates.push(Predicate::Or(matched)),
    }
}

// Explicit per-column filters always apply, regardless of search mode.
fn filter_predicates(template: &Template, request: &Request, predicates: &mut Vec<Predicate>) {
    for (name, value) in request.filters().iter() {
        if let Some(column) = template.column(name) {
            predicates.push(Predicate::Compare {
                column: column.data_key().to_string(),
                op: ComparisonOp::Exact,
                value: value.clone(),
            });
        }
    }
}

fn interval_predicates(template: &Template, request: &Request, predicates: &mut Vec<Predicate>) {
    for (name, interval) in request.intervals().iter() {
        let Some(column) = template.column(name) else {
            continue;
        };
        if interval.is_empty() {
            continue;
        }

        predicates.push(Predicate::Range {
            column: column.data_key().to_string(),
            lower: interval
                .min
                .clone()
                .map_or(Bound::Unbounded, Bound::Included),
            upper: interval
                .max
                .clone()
                .map_or(Bound::Unbounded, Bound::Included),
        });
    }
}

// Request sort when the named column is sortable; template default otherwise.
fn sort(template: &Template, request: &Request) -> Option<SortSpec> {
    request
        .sort_column()
        .filter(|_| request.sort_direction() != SortDirection::None)
        .and_then(|name| template.column(name))
        .filter(|column| column.sortable())
        .map(|column| SortSpec {
            column: column.data_key().to_string(),
            direction: request.sort_direction(),
        })
        .or_else(|| {
            template
                .columns()
                .iter()
                .find(|column| column.default_sort() != SortDirection::None)
                .map(|column| SortSpec {
                    column: column.data_key().to_string(),
                    direction: column.default_sort(),
                })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        request::RequestEnvelope,
        template::{RawColumn, TableDescriptor},
    };
    use serde_json::json;

    fn template(payload: serde_json::Value) -> Template {
        let descriptor: TableDescriptor =
            serde_json::from_value(payload).expect("descriptor should deserialize");

        Template::build(descriptor).expect("template should build")
    }

    fn request(payload: serde_json::Value) -> Request {
        let envelope: RequestEnvelope =
            serde_json::from_value(payload).expect("envelope should deserialize");

        Request::parse(envelope).expect("request should parse")
    }

    fn users_template() -> Template {
        template(json!({
            "routePrefix": "userTables",
            "comparisonOperator": "like",
            "columns": [
                { "name": "name", "data": "name", "meta": ["searchable", "sortable"] },
                { "name": "email", "data": "email_address", "meta": ["searchable"] },
                { "name": "price", "data": "price", "meta": ["total", "sort:desc"] }
            ]
        }))
    }

    #[test]
    fn empty_request_columns_project_the_template_in_order() {
        let config = Config::reconcile(&users_template(), &request(json!({})));

        assert_eq!(config.projection(), ["name", "email_address", "price"]);
    }

    #[test]
    fn requested_columns_keep_request_order_and_drop_unknown_names() {
        let config = Config::reconcile(
            &users_template(),
            &request(json!({ "columns": ["price", "ghost", "name"] })),
        );

        assert_eq!(config.projection(), ["price", "name"]);
    }

    #[test]
    fn full_search_ors_every_searchable_column() {
        let config = Config::reconcile(
            &users_template(),
            &request(json!({ "meta": { "search": "alice" } })),
        );

        assert_eq!(
            config.predicates(),
            [Predicate::Or(vec![
                Predicate::Compare {
                    column: "name".into(),
                    op: ComparisonOp::Like,
                    value: Value::Text("alice".into()),
                },
                Predicate::Compare {
                    column: "email_address".into(),
                    op: ComparisonOp::Like,
                    value: Value::Text("alice".into()),
                },
            ])]
        );
    }

    #[test]
    fn per_column_search_targets_filter_keyed_columns_only() {
        let config = Config::reconcile(
            &users_template(),
            &request(json!({
                "meta": { "search": "alice", "searchMode": "perColumn" },
                "filters": { "email": "x" }
            })),
        );

        // One search predicate on email plus the explicit email filter.
        assert_eq!(config.predicates().len(), 2);
        assert_eq!(
            config.predicates()[0],
            Predicate::Compare {
                column: "email_address".into(),
                op: ComparisonOp::Like,
                value: Value::Text("alice".into()),
            }
        );
    }

    #[test]
    fn column_operator_override_beats_the_template_default() {
        let config = Config::reconcile(
            &template(json!({
                "routePrefix": "userTables",
                "comparisonOperator": "like",
                "columns": [{
                    "name": "code",
                    "data": "code",
                    "meta": ["searchable"],
                    "comparisonOperator": "exact"
                }]
            })),
            &request(json!({ "meta": { "search": "abc" } })),
        );

        assert_eq!(
            config.predicates(),
            [Predicate::Compare {
                column: "code".into(),
                op: ComparisonOp::Exact,
                value: Value::Text("abc".into()),
            }]
        );
    }

    #[test]
    fn filters_on_unknown_columns_are_dropped() {
        let config = Config::reconcile(
            &users_template(),
            &request(json!({ "filters": { "name": "Alice", "ghost": 1 } })),
        );

        assert_eq!(
            config.predicates(),
            [Predicate::Compare {
                column: "name".into(),
                op: ComparisonOp::Exact,
                value: Value::Text("Alice".into()),
            }]
        );
    }

    #[test]
    fn one_sided_intervals_become_half_open_ranges() {
        let config = Config::reconcile(
            &users_template(),
            &request(json!({ "intervals": { "price": [1000] } })),
        );

        assert_eq!(
            config.predicates(),
            [Predicate::Range {
                column: "price".into(),
                lower: Bound::Included(Value::Int(1000)),
                upper: Bound::Unbounded,
            }]
        );
    }

    #[test]
    fn request_sort_applies_when_the_column_is_sortable() {
        let config = Config::reconcile(
            &users_template(),
            &request(json!({ "meta": { "sortColumn": "name", "sortDirection": "desc" } })),
        );

        assert_eq!(
            config.sort(),
            Some(&SortSpec {
                column: "name".into(),
                direction: SortDirection::Desc,
            })
        );
    }

    #[test]
    fn unsortable_request_sort_falls_back_to_the_template_default() {
        let config = Config::reconcile(
            &users_template(),
            &request(json!({ "meta": { "sortColumn": "email", "sortDirection": "asc" } })),
        );

        assert_eq!(
            config.sort(),
            Some(&SortSpec {
                column: "price".into(),
                direction: SortDirection::Desc,
            })
        );
    }

    #[test]
    fn no_sort_when_nothing_is_sortable_or_defaulted() {
        let bare = template(json!({
            "routePrefix": "bareTables",
            "columns": [{ "name": "name", "data": "name" }]
        }));

        assert_eq!(Config::reconcile(&bare, &request(json!({}))).sort(), None);
    }

    #[test]
    fn count_cache_is_used_only_without_narrowing() {
        let template = users_template();

        assert!(Config::reconcile(&template, &request(json!({}))).use_count_cache());
        assert!(
            !Config::reconcile(&template, &request(json!({ "meta": { "search": "x" } })))
                .use_count_cache()
        );
        assert!(
            !Config::reconcile(&template, &request(json!({ "filters": { "name": "x" } })))
                .use_count_cache()
        );
        assert!(
            !Config::reconcile(
                &template,
                &request(json!({ "intervals": { "price": [1, 2] } }))
            )
            .use_count_cache()
        );
    }

    #[test]
    fn cache_key_is_derived_from_the_template() {
        let config = Config::reconcile(&users_template(), &request(json!({})));

        assert_eq!(config.cache_key(), "enso:tables:user_tables");
    }
}
