use crate::web::{CoreConfig, ServiceConfig};
use anyhow::{anyhow, Error as AnyError};
use serde::de::DeserializeOwned;
use std::{fmt::Debug, path::PathBuf};

/// The configuration section of a service, stored under the `NAME` key.
pub trait FeatureConfig: Debug {
    const NAME: &'static str;
}

#[derive(Debug, Clone)]
pub struct WebAppConfig<F>
where
    F: FeatureConfig,
{
    pub core: CoreConfig,
    pub service: ServiceConfig,
    pub feature: F,
}

impl<F> WebAppConfig<F>
where
    F: FeatureConfig + DeserializeOwned,
{
    pub fn load(stage: &str, config_file: Option<PathBuf>) -> Result<Self, AnyError> {
        let pre_init = CoreConfig::new(stage, config_file)?;
        let config = pre_init.create_config_builder()?.build()?;

        let core: CoreConfig = config.clone().try_deserialize()?;
        if pre_init != core {
            return Err(anyhow!("Core config mismatch"));
        }

        let cfg = Self {
            core,
            service: config.get("service")?,
            feature: config.get(F::NAME)?,
        };
        log::info!("Config loaded [{}]: {:#?}", cfg.core.root_file, cfg);
        Ok(cfg)
    }
}
