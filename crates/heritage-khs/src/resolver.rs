//! Best-match resolution of a clicked heritage feature to a KHS detail record.
//!
//! ```text
//! list ──▶ rank by name ──▶ top N ──▶ for each: detail ─▶ score ──▶ best
//!   │                                     │
//!   └─ empty: NoListResults               └─ all skipped: NoScorableCandidate
//! ```
//!
//! Details are fetched one at a time. A candidate whose detail cannot be
//! fetched or parsed is logged and skipped; the resolve only fails when no
//! candidate survives.

use std::future::Future;

use crate::client::KhsClient;
use crate::error::{KhsError, ResolveError};
use crate::geo::{distance_bonus, haversine_km, GeoPoint};
use crate::normalize::name_score;
use crate::types::{
    Candidate, DetailKey, DetailRecord, ListItem, ListQuery, ResolveRequest, ScoredCandidate,
};

/// Number of candidates whose details are fetched.
pub const DEFAULT_TOP_N: usize = 5;

/// Rows requested from the list endpoint.
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 50;

/// Where the resolver gets list items and detail records from.
pub trait HeritageSource {
    fn list(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Vec<ListItem>, KhsError>> + Send;

    fn detail(&self, key: &DetailKey)
        -> impl Future<Output = Result<DetailRecord, KhsError>> + Send;
}

impl HeritageSource for KhsClient {
    async fn list(&self, query: &ListQuery) -> Result<Vec<ListItem>, KhsError> {
        self.list_items(query).await
    }

    async fn detail(&self, key: &DetailKey) -> Result<DetailRecord, KhsError> {
        KhsClient::detail(self, key).await
    }
}

pub struct Resolver<S> {
    source: S,
    top_n: usize,
    page_size: u32,
}

impl<S> Resolver<S>
where
    S: HeritageSource + Sync,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            top_n: DEFAULT_TOP_N,
            page_size: DEFAULT_LIST_PAGE_SIZE,
        }
    }

    /// Sets how many top-ranked candidates get a detail lookup (minimum 1).
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n.max(1);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolves `request` to the best-scoring detail record.
    ///
    /// Dropping the returned future aborts the request in flight.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::List`] if the list request fails.
    /// - [`ResolveError::NoListResults`] if the list is empty.
    /// - [`ResolveError::NoScorableCandidate`] if no shortlisted candidate
    ///   produced a detail record.
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<ScoredCandidate, ResolveError> {
        let query = ListQuery {
            kind_code: request.kind_code.trim().to_string(),
            region_code: request.region_code.trim().to_string(),
            name: request.name.trim().to_string(),
            page_size: self.page_size,
        };

        let items = self
            .source
            .list(&query)
            .await
            .map_err(ResolveError::List)?;
        if items.is_empty() {
            tracing::info!(name = %request.name, "heritage list returned no items");
            return Err(ResolveError::NoListResults);
        }

        let shortlist = shortlist(&request.name, items, self.top_n);
        let mut best: Option<ScoredCandidate> = None;

        for candidate in shortlist {
            if candidate.external_id.is_empty() {
                tracing::debug!(title = %candidate.title, "skipping candidate without asno");
                continue;
            }

            let kind_code = pick_code(&query.kind_code, &candidate.source_kind_code);
            let region_code = pick_code(&query.region_code, &candidate.source_region_code);
            if kind_code.is_empty() || region_code.is_empty() {
                tracing::warn!(
                    asno = %candidate.external_id,
                    "skipping candidate without kind or region code"
                );
                continue;
            }

            let key = DetailKey {
                kind_code: kind_code.to_string(),
                external_id: candidate.external_id.clone(),
                region_code: region_code.to_string(),
            };
            let mut detail = match self.source.detail(&key).await {
                Ok(detail) => detail,
                Err(e) => {
                    tracing::warn!(
                        asno = %candidate.external_id,
                        error = %e,
                        "heritage detail lookup failed; skipping candidate"
                    );
                    continue;
                }
            };

            let score = score_detail(&request.name, &detail, request.click);
            tracing::debug!(
                asno = %candidate.external_id,
                prelim = candidate.preliminary_name_score,
                score,
                "scored heritage candidate"
            );

            if best.as_ref().is_none_or(|b| score > b.score) {
                detail.external_id = Some(candidate.external_id.clone());
                best = Some(ScoredCandidate {
                    detail,
                    score,
                    external_id: candidate.external_id,
                });
            }
        }

        best.ok_or(ResolveError::NoScorableCandidate)
    }

    /// Like [`Resolver::resolve`], but gives up as soon as `cancel` completes.
    ///
    /// # Errors
    ///
    /// [`ResolveError::Cancelled`] if `cancel` wins, otherwise whatever
    /// [`Resolver::resolve`] returns.
    pub async fn resolve_until<C>(
        &self,
        request: &ResolveRequest,
        cancel: C,
    ) -> Result<ScoredCandidate, ResolveError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => Err(ResolveError::Cancelled),
            result = self.resolve(request) => result,
        }
    }
}

/// Combined score of a detail record: name similarity (0–100) plus the
/// proximity bonus (0–40) when the record has coordinates.
#[must_use]
pub fn score_detail(query_name: &str, detail: &DetailRecord, click: GeoPoint) -> u32 {
    let name = name_score(query_name, &detail.title);
    let proximity = detail
        .position()
        .map_or(0, |p| distance_bonus(haversine_km(click, p)));
    name + proximity
}

/// Ranks list items by name similarity and keeps the best `top_n`.
/// Equal scores keep list order.
fn shortlist(query_name: &str, items: Vec<ListItem>, top_n: usize) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = items
        .into_iter()
        .map(|item| Candidate {
            preliminary_name_score: name_score(query_name, &item.title),
            external_id: item.external_id.trim().to_string(),
            title: item.title,
            source_kind_code: item.kind_code.trim().to_string(),
            source_region_code: item.region_code.trim().to_string(),
        })
        .collect();
    candidates.sort_by(|a, b| b.preliminary_name_score.cmp(&a.preliminary_name_score));
    candidates.truncate(top_n);
    candidates
}

fn pick_code<'a>(requested: &'a str, fallback: &'a str) -> &'a str {
    if requested.is_empty() {
        fallback
    } else {
        requested
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
