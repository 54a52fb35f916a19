use crate::web::Environment;
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_VERSION_CONFIG_FILE: &str = "server_version.json";

/// Partial configuration required for early setup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    pub stage: String,
    pub version: String,
    #[serde(default)]
    pub before_layers: Vec<String>,
    #[serde(default)]
    pub after_layers: Vec<String>,
    pub root_file: String,
}

/// A source of configuration stacked around the root config file.
#[derive(Debug, PartialEq, Eq)]
enum ConfigLayer<'a> {
    Base,
    Environment,
    File(&'a str),
    OptionalFile(&'a str),
}

impl<'a> ConfigLayer<'a> {
    fn parse(layer: &'a str) -> Result<Self, ConfigError> {
        if layer == "environment" {
            return Ok(ConfigLayer::Environment);
        }

        let invalid = |cause: &str| ConfigError::FileParse {
            uri: Some(layer.to_owned()),
            cause: cause.to_owned().into(),
        };

        let (schema, path) = layer.split_once("://").ok_or_else(|| invalid("Invalid config layer"))?;
        if path.is_empty() {
            return Err(invalid("Missing file path"));
        }
        match schema {
            "file" => Ok(ConfigLayer::File(path)),
            "file?" => Ok(ConfigLayer::OptionalFile(path)),
            schema => Err(invalid(&format!("Unsupported schema, {schema}"))),
        }
    }
}

impl CoreConfig {
    pub fn new(stage: &str, config_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        log::info!("Loading configuration for {stage}");

        let root_file = config_file.unwrap_or_else(|| PathBuf::from(format!("server_config.{stage}.json")));
        let root_file = root_file
            .to_str()
            .ok_or_else(|| ConfigError::Message(format!("Invalid config path: {}", root_file.display())))?
            .to_owned();
        let mut builder = Config::builder().add_source(File::from(Path::new(&root_file)));

        let version_path = Path::new(DEFAULT_VERSION_CONFIG_FILE);
        if version_path.exists() {
            builder = builder.add_source(File::from(version_path));
        } else {
            log::warn!("No version file found at {}", version_path.display());
            builder = builder.set_override("version", "custom")?;
        }

        let cfg: CoreConfig = builder
            .set_override("stage", stage)?
            .set_override("rootFile", root_file)?
            .build()?
            .try_deserialize()?;

        log::debug!("pre-init configuration: {cfg:#?}");
        Ok(cfg)
    }

    pub fn create_config_builder(&self) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        log::debug!("Setting up configuration builder...");

        let mut layers = Vec::with_capacity(self.before_layers.len() + self.after_layers.len() + 1);
        for layer in &self.before_layers {
            layers.push(ConfigLayer::parse(layer)?);
        }
        layers.push(ConfigLayer::Base);
        for layer in &self.after_layers {
            layers.push(ConfigLayer::parse(layer)?);
        }

        let mut builder = Config::builder();
        for layer in layers {
            log::debug!("Adding layer: {layer:?}");
            builder = match layer {
                ConfigLayer::Base => builder.add_source(File::from(Path::new(&self.root_file))),
                ConfigLayer::Environment => builder.add_source(Environment::new()),
                ConfigLayer::File(path) => builder.add_source(File::from(Path::new(path))),
                ConfigLayer::OptionalFile(path) => {
                    log::info!("Adding optional config file {path}...");
                    builder.add_source(File::from(Path::new(path)).required(false))
                }
            };
        }

        // these properties cannot be altered wrt the core config
        builder = builder
            .set_override("stage", self.stage.clone())?
            .set_override("version", self.version.clone())?
            .set_override("rootFile", self.root_file.clone())?;

        Ok(builder)
    }
}
