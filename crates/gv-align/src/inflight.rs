//! Coalescing of identical in-flight alignment queries

use std::sync::Arc;

use ahash::AHashMap;
use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use parking_lot::Mutex;
use tracing::debug;

use gv_core::{DisplayedRegion, GenomicInterval};

use crate::service::{AlignmentSegments, AlignmentService};
use crate::AlignmentError;

pub(crate) type QueryOutcome = Result<Arc<AlignmentSegments>, AlignmentError>;

/// A query whose result can be awaited by any number of callers
pub(crate) type SharedQuery = Shared<BoxFuture<'static, QueryOutcome>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    primary_genome: String,
    query_genome: String,
    interval: GenomicInterval,
}

/// Registry of queries currently in flight.
///
/// Entries are held weakly and removed when their query completes, so a
/// finished or abandoned query is never joined by a later caller.
#[derive(Clone, Default)]
pub(crate) struct InFlightQueries {
    queries: Arc<Mutex<AHashMap<QueryKey, WeakShared<BoxFuture<'static, QueryOutcome>>>>>,
}

impl InFlightQueries {
    /// Join the identical query if one is in flight, otherwise start one
    pub(crate) fn query(
        &self,
        service: &Arc<dyn AlignmentService>,
        primary_genome: &str,
        query_genome: &str,
        region: &DisplayedRegion,
    ) -> SharedQuery {
        let key = QueryKey {
            primary_genome: primary_genome.to_string(),
            query_genome: query_genome.to_string(),
            interval: region.interval(),
        };

        let mut queries = self.queries.lock();
        if let Some(existing) = queries.get(&key).and_then(WeakShared::upgrade) {
            debug!(genome = query_genome, interval = %key.interval, "joining in-flight alignment query");
            return existing;
        }

        let registry = self.queries.clone();
        let service = service.clone();
        let region = region.clone();
        let owned_key = key.clone();
        let query = async move {
            let outcome = service
                .query_alignment(&owned_key.primary_genome, &owned_key.query_genome, &region)
                .await
                .map(Arc::new)
                .map_err(|e| AlignmentError::QueryFailed {
                    genome: owned_key.query_genome.clone(),
                    reason: format!("{e:#}"),
                });
            registry.lock().remove(&owned_key);
            outcome
        }
        .boxed()
        .shared();

        queries.retain(|_, weak| weak.upgrade().is_some());
        if let Some(weak) = query.downgrade() {
            queries.insert(key, weak);
        }
        query
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.queries.lock().len()
    }
}
