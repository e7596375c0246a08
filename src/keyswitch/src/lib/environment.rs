use crate::lib::error::KeyswitchResult;
use keyswitch_core::identity::IdentityService;
use slog::Logger;

pub trait Environment {
    fn get_logger(&self) -> &Logger;
    fn get_identity_service(&self) -> &IdentityService;
}

pub struct EnvironmentImpl {
    logger: Logger,
    identity_service: IdentityService,
}

impl EnvironmentImpl {
    pub fn new(logger: Logger) -> KeyswitchResult<Self> {
        let identity_service = IdentityService::new(logger.clone())?;
        Ok(EnvironmentImpl {
            logger,
            identity_service,
        })
    }
}

impl Environment for EnvironmentImpl {
    fn get_logger(&self) -> &Logger {
        &self.logger
    }

    fn get_identity_service(&self) -> &IdentityService {
        &self.identity_service
    }
}
