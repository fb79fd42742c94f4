/*
 * Memoized access to backend-generated assets (icons and thumbnails).
 * Generation lives entirely on the backend, behind the
 * `AssetGeneratorOperations` trait; this layer only keys results by the
 * joined path sequence and serves repeats from memory. A failed generation
 * is memoized too, as a sentinel asset, so `get` never fails and a broken
 * file costs exactly one backend call per session. Failures are not lost:
 * they land on an observable failure log for diagnostics.
 *
 * The cache is write-once per key and unbounded. It is bounded in practice
 * by the number of distinct paths browsed in one desktop session; there is
 * no eviction.
 */
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::observable::{Observable, SubscriptionId};
use super::settings::ResampleMethod;

pub const UNKNOWN_FORMAT: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub format: String,
    pub bytes: Vec<u8>,
}

impl Asset {
    /* The fallback served in place of a failed generation. */
    pub fn sentinel() -> Self {
        Asset {
            format: UNKNOWN_FORMAT.to_string(),
            bytes: Vec::new(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.format == UNKNOWN_FORMAT && self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IconOptions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThumbnailOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub method: ResampleMethod,
}

#[derive(Debug, Clone)]
pub enum AssetError {
    Backend(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Backend(msg) => write!(f, "Asset generation failed: {msg}"),
        }
    }
}

impl std::error::Error for AssetError {}

/*
 * The backend's asset generation surface. Both calls block the caller
 * until the backend resolves; the transport behind them is opaque to this
 * layer, and the backend already dedups and optimizes on its side.
 */
pub trait AssetGeneratorOperations: Send + Sync {
    fn generate_icon(&self, segments: &[String], options: &IconOptions)
    -> Result<Asset, AssetError>;
    fn generate_thumbnail(
        &self,
        segments: &[String],
        options: &ThumbnailOptions,
    ) -> Result<Asset, AssetError>;
}

/* A memoized failure, kept on the observable failure log. */
#[derive(Debug, Clone)]
pub struct AssetFailure {
    pub key: String,
    pub error: AssetError,
}

type FetchFn<O> = Box<dyn Fn(&[String], &O) -> Result<Asset, AssetError>>;

pub struct AssetCache<O> {
    entries: RefCell<HashMap<String, Asset>>,
    fetch: FetchFn<O>,
    failures: Observable<Vec<AssetFailure>>,
}

impl AssetCache<IconOptions> {
    pub fn for_icons(generator: Arc<dyn AssetGeneratorOperations>) -> Self {
        AssetCache::new(Box::new(move |segments, options| {
            generator.generate_icon(segments, options)
        }))
    }
}

impl AssetCache<ThumbnailOptions> {
    pub fn for_thumbnails(generator: Arc<dyn AssetGeneratorOperations>) -> Self {
        AssetCache::new(Box::new(move |segments, options| {
            generator.generate_thumbnail(segments, options)
        }))
    }
}

impl<O> AssetCache<O> {
    pub fn new(fetch: FetchFn<O>) -> Self {
        AssetCache {
            entries: RefCell::new(HashMap::new()),
            fetch,
            failures: Observable::new(Vec::new()),
        }
    }

    /*
     * Returns the asset for the joined path sequence. A cached key (hit or
     * memoized failure) is served from memory with no backend call; a miss
     * blocks on the backend and memoizes the outcome either way. This call
     * never fails: a backend failure degrades to the sentinel asset and is
     * recorded on the failure log.
     */
    pub fn get(&self, segments: &[String], options: &O) -> Asset {
        let key = segments.join("/");
        if let Some(asset) = self.entries.borrow().get(&key) {
            log::trace!("AssetCache: hit for '{key}'");
            return asset.clone();
        }

        // Suspension point: the cache map must not stay borrowed across
        // the backend call.
        let asset = match (self.fetch)(segments, options) {
            Ok(asset) => {
                log::trace!("AssetCache: generated '{key}' ({})", asset.format);
                asset
            }
            Err(error) => {
                log::warn!("AssetCache: generation failed for '{key}': {error}");
                self.failures.update(|log| {
                    log.push(AssetFailure {
                        key: key.clone(),
                        error,
                    })
                });
                Asset::sentinel()
            }
        };
        self.entries.borrow_mut().insert(key, asset.clone());
        asset
    }

    pub fn contains(&self, segments: &[String]) -> bool {
        self.entries.borrow().contains_key(&segments.join("/"))
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn subscribe_failures(
        &self,
        listener: Box<dyn FnMut(&Vec<AssetFailure>)>,
    ) -> SubscriptionId {
        self.failures.subscribe(listener)
    }

    pub fn failures(&self) -> Vec<AssetFailure> {
        self.failures.snapshot()
    }
}
