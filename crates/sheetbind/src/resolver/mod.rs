//! Index and title bindings, resolved once per record type.

mod column;
mod title;

pub use column::IndexBinding;
pub use title::TitleBinding;

use crate::cache::{CachePolicy, MetadataCache, WeakCache};
use crate::descriptor::FieldDescriptor;
use crate::discovery::discover;
use crate::error::ConfigError;
use crate::groups::is_included;
use crate::meta::GroupTag;
use crate::record::{ExcelRecord, RecordType};
use crate::sorter::sort_fields;
use once_cell::sync::Lazy;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverConfig {
    pub cache: CachePolicy,
}

impl ResolverConfig {
    /// One binding per live type, reused across calls.
    pub fn cached() -> Self {
        Self {
            cache: CachePolicy::Weak,
        }
    }

    /// Recompute every binding; each call yields fresh descriptors.
    pub fn uncached() -> Self {
        Self {
            cache: CachePolicy::Disabled,
        }
    }
}

/// Resolves record types into column bindings and caches the results.
///
/// Safe to share between threads. Two threads resolving the same uncached
/// type may both compute it; the first binding stored is the one every later
/// call sees.
#[derive(Default)]
pub struct Resolver {
    config: ResolverConfig,
    cache: MetadataCache,
}

static DEFAULT_RESOLVER: Lazy<Resolver> = Lazy::new(Resolver::new);

impl Resolver {
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            cache: MetadataCache::new(),
        }
    }

    /// The process-wide resolver behind [`resolve_index_binding`] and
    /// [`resolve_title_binding`].
    pub fn global() -> &'static Resolver {
        &DEFAULT_RESOLVER
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Bind column positions to fields of `record`.
    pub fn index_binding(
        &self,
        record: &Arc<RecordType>,
    ) -> Result<Arc<IndexBinding>, ConfigError> {
        if record.is_dynamic() {
            return Ok(Arc::new(IndexBinding::default()));
        }
        self.cached(self.cache.index(), record, column::build_index_binding)
    }

    /// Bind column titles to fields of `record`.
    pub fn title_binding(
        &self,
        record: &Arc<RecordType>,
    ) -> Result<Arc<TitleBinding>, ConfigError> {
        if record.is_dynamic() {
            return Ok(Arc::new(TitleBinding::default()));
        }
        self.cached(self.cache.titles(), record, title::build_title_binding)
    }

    pub fn index_binding_of<T: ExcelRecord>(&self) -> Result<Arc<IndexBinding>, ConfigError> {
        self.index_binding(&T::record_type())
    }

    pub fn title_binding_of<T: ExcelRecord>(&self) -> Result<Arc<TitleBinding>, ConfigError> {
        self.title_binding(&T::record_type())
    }

    /// Fields of `record` selected by `groups`, in declared order.
    pub fn select_fields(
        &self,
        record: &Arc<RecordType>,
        groups: &[GroupTag],
    ) -> Vec<Arc<FieldDescriptor>> {
        select_fields(record, groups)
    }

    fn cached<V>(
        &self,
        cache: &WeakCache<V>,
        record: &Arc<RecordType>,
        build: fn(&RecordType) -> Result<V, ConfigError>,
    ) -> Result<Arc<V>, ConfigError> {
        if self.config.cache == CachePolicy::Disabled {
            return build(record).map(Arc::new);
        }
        if let Some(hit) = cache.get(record) {
            #[cfg(feature = "tracing")]
            tracing::trace!(record = record.name(), "binding cache hit");
            return Ok(hit);
        }
        let computed = Arc::new(build(record)?);
        Ok(cache.insert(record, computed))
    }
}

/// Fields of `record` that pass the group filter, stably sorted by declared order.
pub fn select_fields(record: &RecordType, groups: &[GroupTag]) -> Vec<Arc<FieldDescriptor>> {
    let mut fields: Vec<_> = discover(record)
        .fields()
        .into_iter()
        .filter(|field| is_included(groups, field))
        .collect();
    sort_fields(&mut fields);
    fields
}

pub fn resolve_index_binding(record: &Arc<RecordType>) -> Result<Arc<IndexBinding>, ConfigError> {
    Resolver::global().index_binding(record)
}

pub fn resolve_title_binding(record: &Arc<RecordType>) -> Result<Arc<TitleBinding>, ConfigError> {
    Resolver::global().title_binding(record)
}

pub fn index_binding_of<T: ExcelRecord>() -> Result<Arc<IndexBinding>, ConfigError> {
    Resolver::global().index_binding_of::<T>()
}

pub fn title_binding_of<T: ExcelRecord>() -> Result<Arc<TitleBinding>, ConfigError> {
    Resolver::global().title_binding_of::<T>()
}
