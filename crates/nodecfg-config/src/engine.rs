//! Profile application over an injected [`ConfigStore`].
//!
//! # Design
//! - Documents are loaded fresh on every call; nothing is cached between calls.
//! - Transforms run on a copy and are scope-checked before anything is written.
//! - A dry run returns exactly what a real run would persist, with zero writes.

use tracing::{info, instrument};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ApplyOptions, ApplyResult, ConfigDocument};
use crate::profile::{Profile, ProfileRegistry, Transform};
use crate::store::ConfigStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Apply,
    Revert,
}

impl Direction {
    fn transform(self, profile: &Profile) -> ConfigResult<Transform> {
        match self {
            Self::Apply => Ok(profile.apply),
            Self::Revert => profile.revert.ok_or_else(|| ConfigError::ProfileNotReversible {
                name: profile.name.to_string(),
            }),
        }
    }
}

/// Applies and reverts named profiles against a configuration store.
#[derive(Debug)]
pub struct ProfileEngine<S> {
    store: S,
    registry: ProfileRegistry,
}

impl<S: ConfigStore> ProfileEngine<S> {
    /// Engine over the built-in profile registry.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_registry(store, ProfileRegistry::builtin())
    }

    /// Engine over an explicit registry.
    #[must_use]
    pub const fn with_registry(store: S, registry: ProfileRegistry) -> Self {
        Self { store, registry }
    }

    /// Registry used to resolve profile names.
    #[must_use]
    pub const fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Apply a profile to the stored document.
    ///
    /// # Errors
    ///
    /// Store failures plus every error listed on [`ProfileEngine::apply_to`].
    pub async fn apply_profile(
        &self,
        name: &str,
        options: ApplyOptions,
    ) -> ConfigResult<ApplyResult> {
        let document = self.store.get().await?;
        self.apply_to(&document, name, options).await
    }

    /// Apply a profile to `document`, persisting the result unless `dry_run` is set.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProfile`, transform failures (`FieldTypeMismatch`,
    /// `MalformedDocument`), `ScopeViolation`, or store failures on write. The
    /// store is untouched whenever an error is returned before the write.
    #[instrument(name = "profile.apply", skip(self, document), fields(profile = name, dry_run = options.dry_run))]
    pub async fn apply_to(
        &self,
        document: &ConfigDocument,
        name: &str,
        options: ApplyOptions,
    ) -> ConfigResult<ApplyResult> {
        let updated = self.run(document, name, Direction::Apply)?;
        self.finish(document.clone(), updated, options).await
    }

    /// Revert a profile on the stored document.
    ///
    /// # Errors
    ///
    /// Store failures plus every error listed on [`ProfileEngine::revert_to`].
    pub async fn revert_profile(
        &self,
        name: &str,
        options: ApplyOptions,
    ) -> ConfigResult<ApplyResult> {
        let document = self.store.get().await?;
        self.revert_to(&document, name, options).await
    }

    /// Run a profile's revert transform on `document`.
    ///
    /// # Errors
    ///
    /// Same as [`ProfileEngine::apply_to`], plus `ProfileNotReversible` for
    /// profiles without a revert transform.
    #[instrument(name = "profile.revert", skip(self, document), fields(profile = name, dry_run = options.dry_run))]
    pub async fn revert_to(
        &self,
        document: &ConfigDocument,
        name: &str,
        options: ApplyOptions,
    ) -> ConfigResult<ApplyResult> {
        let updated = self.run(document, name, Direction::Revert)?;
        self.finish(document.clone(), updated, options).await
    }

    /// Apply several profiles in order and persist the combined result once.
    ///
    /// # Errors
    ///
    /// The first failing profile aborts the whole batch before any write.
    #[instrument(name = "profile.apply_many", skip(self), fields(dry_run = options.dry_run))]
    pub async fn apply_profiles(
        &self,
        names: &[String],
        options: ApplyOptions,
    ) -> ConfigResult<ApplyResult> {
        let original = self.store.get().await?;
        let mut updated = original.clone();
        for name in names {
            updated = self.run(&updated, name, Direction::Apply)?;
        }
        self.finish(original, updated, options).await
    }

    fn run(
        &self,
        document: &ConfigDocument,
        name: &str,
        direction: Direction,
    ) -> ConfigResult<ConfigDocument> {
        let profile = self.registry.get(name)?;
        let transform = direction.transform(profile)?;
        let updated = transform(document)?;
        if let Some(path) = document
            .changed_paths(&updated)
            .into_iter()
            .find(|path| !profile.owns(path))
        {
            return Err(ConfigError::ScopeViolation {
                profile: profile.name.to_string(),
                path,
            });
        }
        Ok(updated)
    }

    async fn finish(
        &self,
        original: ConfigDocument,
        updated: ConfigDocument,
        options: ApplyOptions,
    ) -> ConfigResult<ApplyResult> {
        let changed = original.changed_paths(&updated);
        if !options.dry_run {
            self.store.set(&updated).await?;
        }
        info!(
            changed = changed.len(),
            applied = !options.dry_run,
            "profile transform completed"
        );
        Ok(ApplyResult {
            original,
            updated,
            applied: !options.dry_run,
            changed,
        })
    }
}
