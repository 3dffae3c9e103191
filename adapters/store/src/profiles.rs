use chrono::{DateTime, Utc};
use log::info;
use ricochet_core::{
    store::{Profile, ProfileStore, StoreError},
    Identity, UserId, Username,
};

use crate::MemoryBackend;

/// [`ProfileStore`] view of a [`MemoryBackend`].
#[derive(Clone, Copy, Debug)]
pub struct Profiles<'a> {
    backend: &'a MemoryBackend,
}

impl<'a> Profiles<'a> {
    pub(crate) const fn new(backend: &'a MemoryBackend) -> Self {
        Self { backend }
    }
}

impl ProfileStore for Profiles<'_> {
    fn get(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError> {
        Ok(self.backend.lock().profiles.get(user_id).cloned())
    }

    fn set_username(
        &self,
        identity: &Identity,
        username: Username,
        at: DateTime<Utc>,
    ) -> Result<Profile, StoreError> {
        let mut tables = self.backend.lock();
        let profile = tables
            .profiles
            .entry(identity.user_id.clone())
            .or_insert_with(|| Profile {
                identity: Identity::anonymous(identity.user_id.clone()),
                created_at: at,
                updated_at: at,
            });

        if identity.email.is_some() {
            profile.identity.email = identity.email.clone();
        }
        profile.identity.username = Some(username);
        profile.updated_at = at;
        info!(
            "{} is now shown as {}",
            identity.user_id,
            profile.identity.display_name()
        );
        Ok(profile.clone())
    }
}
