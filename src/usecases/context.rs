use crate::{
    api::ApiClient,
    infra::{config::AppConfig, storage_layout::StorageLayout},
    usecases::session::SessionHandle,
};

/// Everything a command needs: configuration, storage layout, the shared
/// session, and the backend client. Built once at startup and passed down
/// explicitly instead of living in ambient globals.
pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub session: SessionHandle,
    pub api: ApiClient,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        layout: StorageLayout,
        session: SessionHandle,
        api: ApiClient,
    ) -> Self {
        Self {
            config,
            layout,
            session,
            api,
        }
    }
}
