use std::{
    hash::{Hash, Hasher},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use fxhash::FxHasher64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    directions_service::{DirectionsError, DirectionsService},
    route_options::RouteOptions,
    route_response::{DirectionsCredentials, Route, RouteResponse},
};

const CACHE_FOLDER_ENV_VAR: &str = "WAYMARK_CACHE_FOLDER";

/// Stores candidate routes per request. Credentials are never cached, they
/// belong to the live service.
pub trait RouteCache: Send + Sync {
    fn cache(&self, options: &RouteOptions, routes: &[Route]) -> anyhow::Result<()>;

    fn get_cached(&self, options: &RouteOptions) -> anyhow::Result<Option<Vec<Route>>>;
}

pub struct NoCache;

impl RouteCache for NoCache {
    fn cache(&self, _options: &RouteOptions, _routes: &[Route]) -> anyhow::Result<()> {
        Ok(())
    }

    fn get_cached(&self, _options: &RouteOptions) -> anyhow::Result<Option<Vec<Route>>> {
        Ok(None)
    }
}

#[derive(Serialize)]
struct CacheEntryRef<'a> {
    options: &'a RouteOptions,
    routes: &'a [Route],
}

#[derive(Deserialize)]
struct CacheEntry {
    routes: Vec<Route>,
}

/// Stores each entry as a JSON file named after the hash of its options.
pub struct FileCache {
    folder: PathBuf,
}

impl FileCache {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let folder = std::env::var(CACHE_FOLDER_ENV_VAR)?;
        Ok(Self::new(folder))
    }

    fn folder(&self) -> anyhow::Result<&Path> {
        if !self.folder.is_dir() {
            return Err(anyhow::anyhow!(
                "Path {} is not a directory",
                self.folder.display()
            ));
        }

        Ok(&self.folder)
    }
}

fn get_filename(options: &RouteOptions) -> String {
    let mut hasher = FxHasher64::default();
    options.hash(&mut hasher);

    format!("{:016x}.json", hasher.finish())
}

impl RouteCache for FileCache {
    fn cache(&self, options: &RouteOptions, routes: &[Route]) -> anyhow::Result<()> {
        let file = std::fs::File::create(self.folder()?.join(get_filename(options)))?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, &CacheEntryRef { options, routes })?;
        writer.flush()?;

        Ok(())
    }

    fn get_cached(&self, options: &RouteOptions) -> anyhow::Result<Option<Vec<Route>>> {
        let file_path = self.folder()?.join(get_filename(options));

        if !file_path.is_file() {
            return Ok(None);
        }

        let file = std::fs::File::open(file_path)?;
        let entry: CacheEntry = serde_json::from_reader(file)?;

        Ok(Some(entry.routes))
    }
}

/// Serves routes from a [`RouteCache`] before asking the wrapped service.
/// Cache failures are logged and never fail a request.
pub struct CachedDirections<D, C> {
    inner: D,
    cache: C,
}

impl<D, C> CachedDirections<D, C>
where
    D: DirectionsService,
    C: RouteCache,
{
    pub fn new(inner: D, cache: C) -> Self {
        Self { inner, cache }
    }
}

impl<D, C> DirectionsService for CachedDirections<D, C>
where
    D: DirectionsService,
    C: RouteCache,
{
    async fn calculate(&self, options: &RouteOptions) -> Result<RouteResponse, DirectionsError> {
        match self.cache.get_cached(options) {
            Ok(Some(routes)) => {
                debug!("RouteCache: hit for {} waypoints", options.waypoints.len());
                return Ok(RouteResponse {
                    routes,
                    options: options.clone(),
                    credentials: self.inner.credentials(),
                });
            }
            Ok(None) => {}
            Err(err) => warn!("RouteCache: failed to read cached response: {}", err),
        }

        let response = self.inner.calculate(options).await?;

        if let Err(err) = self.cache.cache(options, &response.routes) {
            warn!("RouteCache: failed to cache response: {}", err);
        }

        Ok(response)
    }

    fn credentials(&self) -> DirectionsCredentials {
        self.inner.credentials()
    }
}
