use crate::{config::RuntimeConfiguration, data::StudentStore, error::RosterResult};
use std::ops::Deref;

#[derive(Clone, Debug)]
pub struct RosterState {
    store: StudentStore,
    config: RuntimeConfiguration,
}

impl RosterState {
    pub async fn new(config: RuntimeConfiguration) -> RosterResult<Self> {
        let store = StudentStore::open(config.storage_config().students_file()).await?;
        info!(path = %store.path().display(), "student store ready");

        Ok(Self { store, config })
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }
}

impl Deref for RosterState {
    type Target = StudentStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
