use chrono::{DateTime, Utc};
use log::{info, warn};
use ricochet_core::{
    store::{ConfigurationStore, StoreError},
    ConfigId, Configuration, ConfigurationDraft, UserId,
};

use crate::{MemoryBackend, Tables};

/// [`ConfigurationStore`] view of a [`MemoryBackend`].
#[derive(Clone, Copy, Debug)]
pub struct Configurations<'a> {
    backend: &'a MemoryBackend,
}

impl<'a> Configurations<'a> {
    pub(crate) const fn new(backend: &'a MemoryBackend) -> Self {
        Self { backend }
    }

    fn is_baseline_author(&self, user_id: &UserId) -> bool {
        *user_id == self.backend.settings().baseline_author
    }
}

fn not_found(config_id: &ConfigId) -> StoreError {
    StoreError::NotFound(format!("configuration {config_id}"))
}

fn owned<'t>(
    tables: &'t Tables,
    config_id: &ConfigId,
    owner_id: &UserId,
) -> Result<&'t Configuration, StoreError> {
    let configuration = tables
        .configurations
        .get(config_id)
        .ok_or_else(|| not_found(config_id))?;
    if configuration.author_id() != owner_id {
        warn!("{owner_id} may not modify configuration {config_id}");
        return Err(StoreError::Forbidden(format!(
            "configuration {config_id} belongs to another user"
        )));
    }
    Ok(configuration)
}

fn has_solved_round(tables: &Tables, config_id: &ConfigId) -> bool {
    tables
        .rounds
        .values()
        .any(|round| round.config_id() == config_id && round.is_solved())
}

impl ConfigurationStore for Configurations<'_> {
    fn get(&self, config_id: &ConfigId, viewer: &UserId) -> Result<Configuration, StoreError> {
        let tables = self.backend.lock();
        let configuration = tables
            .configurations
            .get(config_id)
            .ok_or_else(|| not_found(config_id))?;
        let visible = configuration.is_baseline()
            || configuration.author_id() == viewer
            || has_solved_round(&tables, config_id);
        if visible {
            Ok(configuration.clone())
        } else {
            Err(not_found(config_id))
        }
    }

    fn list(&self, owner_id: &UserId) -> Result<Vec<Configuration>, StoreError> {
        let tables = self.backend.lock();
        Ok(tables
            .configurations
            .values()
            .filter(|configuration| configuration.author_id() == owner_id)
            .cloned()
            .collect())
    }

    fn list_baseline(&self) -> Result<Vec<Configuration>, StoreError> {
        let tables = self.backend.lock();
        Ok(tables
            .configurations
            .values()
            .filter(|configuration| configuration.is_baseline())
            .cloned()
            .collect())
    }

    fn create(
        &self,
        draft: ConfigurationDraft,
        owner_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Configuration, StoreError> {
        draft.validate()?;
        let is_baseline = self.is_baseline_author(owner_id);
        let mut tables = self.backend.lock();
        let config_id = ConfigId::new((tables.last_config_id + 1).to_string());
        let configuration =
            Configuration::new(config_id.clone(), owner_id.clone(), draft, is_baseline, at)?;

        tables.last_config_id += 1;
        let _ = tables
            .configurations
            .insert(config_id.clone(), configuration.clone());
        info!(
            "created configuration {config_id} for {owner_id} with {} targets",
            configuration.targets().len()
        );
        Ok(configuration)
    }

    fn update(
        &self,
        config_id: &ConfigId,
        draft: ConfigurationDraft,
        owner_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Configuration, StoreError> {
        let mut tables = self.backend.lock();
        let configuration = owned(&tables, config_id, owner_id)?.revise(draft, at)?;
        let _ = tables
            .configurations
            .insert(config_id.clone(), configuration.clone());
        info!("updated configuration {config_id}");
        Ok(configuration)
    }

    fn delete(&self, config_id: &ConfigId, owner_id: &UserId) -> Result<(), StoreError> {
        let mut tables = self.backend.lock();
        let _ = owned(&tables, config_id, owner_id)?;
        let _ = tables.configurations.remove(config_id);
        info!("deleted configuration {config_id}");
        Ok(())
    }
}
