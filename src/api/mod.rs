//! Backend integration layer: HTTP transport and endpoint gateways.

mod auth;
mod directory;
mod messages;
mod resources;
pub mod transport;
mod wire;

use crate::{
    infra::{config::ServerConfig, error::AppError},
    usecases::session::SessionHandle,
};

use self::transport::HttpTransport;

/// One client for the whole backend. Implements the gateway traits the
/// usecase layer is written against; every call goes through the shared
/// transport and therefore through its credential and unauthorized
/// handling.
pub struct ApiClient {
    transport: HttpTransport,
}

impl ApiClient {
    pub fn new(config: &ServerConfig, session: SessionHandle) -> Result<Self, AppError> {
        Ok(Self {
            transport: HttpTransport::new(config, session)?,
        })
    }

    pub(crate) fn transport(&self) -> &HttpTransport {
        &self.transport
    }
}

/// Returns the api module name for smoke checks.
pub fn module_name() -> &'static str {
    "api"
}
