//! Data builder: orchestrates one table data request end to end.
//!
//! Merges template and request into a config, resolves counts (optionally
//! through the count cache), applies the fetch-all short circuit, computes
//! totals, and assembles the response payload.


use crate::{
    cache::CountCache,
    config::Config,
    error::Error,
    executor::QueryExecutor,
    obs::metrics::{self, Event},
    predicate::PageSpec,
    request::Request,
    template::Template,
    value::Row,
};
use serde::Serialize;
use std::collections::BTreeMap;

///
/// TableData
///
/// Response payload for one table data request. `full_record_info` is
/// true when more matching rows exist than were returned.
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub count: u64,
    pub filtered: u64,
    pub rows: Vec<Row>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<BTreeMap<String, f64>>,

    pub full_record_info: bool,
}

///
/// DataBuilder
///
/// One-shot orchestrator: holds the collaborators for a single request
/// and produces the response payload.
///

pub struct DataBuilder<'a, X, C>
where
    X: QueryExecutor,
    C: CountCache,
{
    executor: &'a X,
    cache: &'a mut C,
    template: &'a Template,
    request: &'a Request,
}

impl<'a, X, C> DataBuilder<'a, X, C>
where
    X: QueryExecutor,
    C: CountCache,
{
    pub fn new(
        executor: &'a X,
        cache: &'a mut C,
        template: &'a Template,
        request: &'a Request,
    ) -> Self {
        Self {
            executor,
            cache,
            template,
            request,
        }
    }

    /// Execute the request and assemble the response payload.
    pub fn data(&mut self) -> Result<TableData, Error> {
        metrics::record(Event::DataCall);

        let config = Config::reconcile(self.template, self.request);

        let count = self.count(&config)?;
        let filtered = self.executor.count(config.predicates())?;

        let (page, full_record_info) = self.resolve_page(&config, filtered);

        let rows =
            self.executor
                .select(config.projection(), config.predicates(), config.sort(), page)?;
        metrics::record(Event::RowsLoaded(rows.len() as u64));

        let total = self.totals(&config)?;

        Ok(TableData {
            count,
            filtered,
            rows,
            total,
            full_record_info,
        })
    }

    // Unfiltered count, optionally via the count cache. Only the
    // unfiltered total is ever cached.
    fn count(&mut self, config: &Config) -> Result<u64, Error> {
        if config.use_count_cache() {
            if let Some(cached) = self.cache.get(config.cache_key()) {
                metrics::record(Event::CountCacheHit);
                return Ok(cached);
            }
            metrics::record(Event::CountCacheMiss);
        }

        let count = self.executor.count(&[])?;

        if config.use_count_cache() {
            self.cache.put(config.cache_key(), count);
            metrics::record(Event::CountCacheWrite);
        }

        Ok(count)
    }

    // Decide between normal pagination and the fetch-all short circuit.
    //
    // The record limit only gates entry into fetch-all mode: it compares
    // against the filtered count and against the requested page length,
    // and once entered the fetch itself is uncapped so the client is
    // guaranteed the complete filtered set.
    fn resolve_page(&self, config: &Config, filtered: u64) -> (PageSpec, bool) {
        let page = config.page();

        if let Some(limit) = self.request.full_info_record_limit() {
            let page_fits = page.limit.is_some_and(|length| u64::from(length) <= limit);

            if filtered <= limit || page_fits {
                metrics::record(Event::FetchAllEntered);

                return (PageSpec::unlimited(), false);
            }
        }

        let full = page.limit.is_some_and(|length| filtered > u64::from(length));

        (page, full)
    }

    // Aggregate sums over the filtered set, keyed by column name.
    fn totals(&self, config: &Config) -> Result<Option<BTreeMap<String, f64>>, Error> {
        if !self.template.total_enabled() && !self.request.total() {
            return Ok(None);
        }

        let mut totals = BTreeMap::new();

        for column in self.template.columns() {
            if column.aggregatable() {
                let sum = self.executor.sum(column.data_key(), config.predicates())?;

                totals.insert(column.name().to_string(), sum);
            }
        }

        Ok(Some(totals))
    }
}
