//! Concurrent module discovery for [`Linker::link_async`](crate::Linker::link_async).
//!
//! Loads every module reachable from the entry paths, keeping one load in
//! flight per discovered path. Each path is requested at most once, so a
//! module imported from many places (or from inside a cycle) is fetched a
//! single time. Declaring and defining happens afterwards, synchronously.

use crate::error::LinkError;
use crate::loader::AsyncModuleLoader;
use crate::resolver::{PackageResolver, canonicalize};
use futures::stream::{FuturesUnordered, StreamExt};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};
use tsv_graph::RawModule;

pub(crate) async fn prefetch_modules<L>(
    packages: &dyn PackageResolver,
    entries: &[String],
    loader: &L,
) -> Result<FxHashMap<String, RawModule>, LinkError>
where
    L: AsyncModuleLoader + ?Sized,
{
    let mut requested: FxHashSet<String> = FxHashSet::default();
    let mut loaded: FxHashMap<String, RawModule> = FxHashMap::default();
    let mut in_flight = FuturesUnordered::new();

    for entry in entries {
        if requested.insert(entry.clone()) {
            in_flight.push(fetch(loader, entry.clone()));
        }
    }

    while let Some((path, result)) = in_flight.next().await {
        let raw = result.map_err(|source| LinkError::Load {
            path: path.clone(),
            source,
        })?;
        trace!(path = %path, "prefetched module");

        for specifier in raw.import_paths() {
            let target = canonicalize(packages, specifier, Some(&path))?;
            if requested.insert(target.clone()) {
                in_flight.push(fetch(loader, target));
            }
        }
        loaded.insert(path, raw);
    }

    debug!(modules = loaded.len(), "prefetch complete");
    Ok(loaded)
}

async fn fetch<L>(loader: &L, path: String) -> (String, anyhow::Result<RawModule>)
where
    L: AsyncModuleLoader + ?Sized,
{
    let result = loader.load(&path).await;
    (path, result)
}
