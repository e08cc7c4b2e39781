//! Background asset resolution boundary.
//!
//! Background references in the catalog are opaque strings. Loading and
//! decoding live outside the core; all the sequencer needs is that a
//! reference either resolves to a handle before a swap is requested, or
//! fails fast with [`PlaybackError::MissingAsset`].

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::PlaybackError;

/// A resolved background handle, opaque to the core. The rendering runtime
/// decides what the identifier means (file path, texture id, URL).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetHandle(String);

impl AssetHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Resolves catalog background references ahead of a swap.
pub trait AssetResolver {
    fn resolve(&self, reference: &str) -> Result<AssetHandle>;
}

/// Map-backed resolver for hosts that pre-register every asset.
#[derive(Debug, Default)]
pub struct StaticAssets {
    handles: BTreeMap<String, String>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, reference: impl Into<String>, resolved: impl Into<String>) {
        self.handles.insert(reference.into(), resolved.into());
    }
}

impl AssetResolver for StaticAssets {
    fn resolve(&self, reference: &str) -> Result<AssetHandle> {
        match self.handles.get(reference) {
            Some(resolved) => Ok(AssetHandle::new(resolved.clone())),
            None => Err(PlaybackError::MissingAsset {
                reference: reference.to_string(),
            }
            .into()),
        }
    }
}

/// Resolver that treats every reference as already resolved. Used by the
/// binaries, where references are file paths the renderer loads itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityAssets;

impl AssetResolver for IdentityAssets {
    fn resolve(&self, reference: &str) -> Result<AssetHandle> {
        Ok(AssetHandle::new(reference))
    }
}
