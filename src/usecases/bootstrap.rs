use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    api::ApiClient,
    infra::{
        self,
        config::FileConfigAdapter,
        contracts::ConfigAdapter,
        error::AppError,
        storage_layout::StorageLayout,
        token_store::TokenStore,
    },
    usecases::{context::AppContext, session::SessionHandle},
};

pub struct Bootstrapped {
    pub context: AppContext,
    /// Keeps the non-blocking log writer alive for the process lifetime.
    pub log_guard: WorkerGuard,
}

pub fn bootstrap(config_path: Option<&Path>) -> Result<Bootstrapped, AppError> {
    let context = build_context(config_path)?;
    let log_guard = infra::logging::init(&context.config.logging, &context.layout.cache_dir)?;

    Ok(Bootstrapped { context, log_guard })
}

fn build_context(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config_adapter = FileConfigAdapter::new(config_path);
    let config = config_adapter.load().map_err(AppError::Other)?;

    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;

    let session = SessionHandle::new(TokenStore::new(layout.token_file()));
    let api = ApiClient::new(&config.server, session.clone())?;

    Ok(AppContext::new(config, layout, session, api))
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::test_support::env_lock;

    #[test]
    fn builds_context_with_default_config_when_file_is_missing() {
        let _guard = env_lock();

        let temp = tempfile::tempdir().expect("temp dir should be creatable");
        let old_xdg = env::var_os("XDG_CONFIG_HOME");
        // SAFETY: env is guarded by the process-wide test mutex.
        unsafe { env::set_var("XDG_CONFIG_HOME", temp.path()) };

        let context = build_context(Some(Path::new("./missing-config.toml")))
            .expect("context should build from defaults");

        assert_eq!(context.config, crate::infra::config::AppConfig::default());
        assert!(!context.session.is_active());
        assert!(context.layout.session_dir.exists());

        match old_xdg {
            // SAFETY: restoring env while guard is held.
            Some(value) => unsafe { env::set_var("XDG_CONFIG_HOME", value) },
            // SAFETY: restoring env while guard is held.
            None => unsafe { env::remove_var("XDG_CONFIG_HOME") },
        }
    }
}
