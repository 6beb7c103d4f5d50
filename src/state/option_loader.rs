//! OptionLoader - Per-Editor Option Discovery
//!
//! Each filter editor owns one loader. A request is tagged with its key and
//! a generation; a response that arrives after the editor moved on to a
//! different request is cached but never shown.

use futures::future::join_all;

use crate::domain::dashboard_filter::{DashboardFilterConfig, FilterType};
use crate::error::Result;
use crate::services::{FilterApi, OptionCache, PreviewKey, PreviewResponse};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum OptionState {
    #[default]
    Idle,
    Loading,
    Loaded(PreviewResponse),
    /// Inline error for this editor only
    Failed(String),
}

impl OptionState {
    /// "No options available" placeholder condition
    pub fn is_empty_result(&self) -> bool {
        matches!(
            self,
            OptionState::Loaded(PreviewResponse::Options { options }) if options.is_empty()
        )
    }
}

/// Identifies one issued fetch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    key: PreviewKey,
    generation: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &PreviewKey {
        &self.key
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadRequest {
    /// Served from the cache, nothing to fetch
    Cached,
    /// Same key already loading
    InFlight,
    /// Caller must fetch and hand the result to [`OptionLoader::resolve`]
    Fetch(FetchTicket),
}

#[derive(Debug, Default)]
pub struct OptionLoader {
    key: Option<PreviewKey>,
    generation: u64,
    state: OptionState,
}

impl OptionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OptionState {
        &self.state
    }

    pub fn key(&self) -> Option<&PreviewKey> {
        self.key.as_ref()
    }

    /// Point the editor at `key`
    pub fn request(&mut self, cache: &mut OptionCache, key: PreviewKey) -> LoadRequest {
        if self.key.as_ref() == Some(&key) && self.state == OptionState::Loading {
            return LoadRequest::InFlight;
        }

        self.generation += 1;
        self.key = Some(key.clone());

        if let Some(hit) = cache.get(&key) {
            tracing::trace!(column = %key.column, "Filter options served from cache");
            self.state = OptionState::Loaded(hit);
            return LoadRequest::Cached;
        }

        self.state = OptionState::Loading;
        LoadRequest::Fetch(FetchTicket {
            key,
            generation: self.generation,
        })
    }

    /// Store a fetch result; returns false when the ticket is stale
    pub fn resolve<E: std::fmt::Display>(
        &mut self,
        cache: &mut OptionCache,
        ticket: FetchTicket,
        result: std::result::Result<PreviewResponse, E>,
    ) -> bool {
        if let Ok(response) = &result {
            cache.insert(ticket.key.clone(), response.clone());
        }

        let current = ticket.generation == self.generation && self.key.as_ref() == Some(&ticket.key);
        if !current {
            tracing::debug!(
                column = %ticket.key.column,
                "Discarding stale filter option response"
            );
            return false;
        }

        self.state = match result {
            Ok(response) => OptionState::Loaded(response),
            Err(e) => {
                tracing::warn!(column = %ticket.key.column, "Failed to load filter options: {}", e);
                OptionState::Failed(e.to_string())
            }
        };
        true
    }

    /// Request and, on a cache miss, fetch
    pub async fn load<A: FilterApi>(
        &mut self,
        cache: &mut OptionCache,
        api: &A,
        key: PreviewKey,
    ) -> &OptionState {
        if let LoadRequest::Fetch(ticket) = self.request(cache, key) {
            let result = api.preview(ticket.key()).await;
            self.resolve(cache, ticket, result);
        }
        &self.state
    }
}

/// Whether a filter type has a preview to fetch
pub fn needs_preview(filter_type: FilterType) -> bool {
    matches!(filter_type, FilterType::Value | FilterType::Numerical)
}

/// Load options for many editors at once
///
/// Cache misses are fetched concurrently, one request per distinct key. A
/// failure only marks the editors sharing that key.
pub async fn preload<A: FilterApi>(
    api: &A,
    cache: &mut OptionCache,
    editors: &mut [(&DashboardFilterConfig, &mut OptionLoader)],
    default_limit: usize,
) {
    let mut tickets = Vec::new();
    for (index, (filter, loader)) in editors.iter_mut().enumerate() {
        if !needs_preview(filter.filter_type) {
            continue;
        }
        let key = PreviewKey::for_filter(filter, default_limit);
        if let LoadRequest::Fetch(ticket) = loader.request(cache, key) {
            tickets.push((index, ticket));
        }
    }

    let mut distinct: Vec<PreviewKey> = Vec::new();
    for (_, ticket) in &tickets {
        if !distinct.contains(ticket.key()) {
            distinct.push(ticket.key().clone());
        }
    }
    tracing::debug!(requests = distinct.len(), "Preloading filter options");

    let results = join_all(distinct.iter().map(|key| api.preview(key))).await;
    let results: Vec<(PreviewKey, Result<PreviewResponse>)> =
        distinct.into_iter().zip(results).collect();

    for (index, ticket) in tickets {
        let Some((_, result)) = results.iter().find(|(key, _)| key == ticket.key()) else {
            continue;
        };
        let result = result.as_ref().map(Clone::clone).map_err(ToString::to_string);
        editors[index].1.resolve(cache, ticket, result);
    }
}
