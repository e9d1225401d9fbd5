use roi::{
    Axis, DecodedRegion, Interval, RealMask,
    config::ConversionConfig,
    params::{JobParam, ParamSpec, ParamType},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Roi(#[from] roi::RoiError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Settings file shared by every subcommand
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CliConfig {
    #[serde(default)]
    pub conversion: ConversionConfig,
    /// Module parameters to describe with `params`
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Job parameter descriptions for the configured parameters, or one
    /// example per known type when none are configured.
    pub fn job_params(&self) -> Vec<(String, JobParam)> {
        if self.params.is_empty() {
            return ParamType::type_names()
                .iter()
                .filter_map(|name| name.parse::<ParamType>().ok())
                .map(|param_type| {
                    let spec = ParamSpec {
                        name: param_type.to_string(),
                        param_type,
                        required: true,
                        description: Some(param_type.description().to_string()),
                        choices: Vec::new(),
                        min: None,
                        max: None,
                    };
                    (spec.name.clone(), JobParam::from(&spec))
                })
                .collect();
        }
        self.params.iter().map(|spec| (spec.name.clone(), JobParam::from(spec))).collect()
    }
}

/// Members of one plane of a decoded collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaneSummary {
    pub z: i32,
    pub t: i32,
    pub c: i32,
    pub shapes: usize,
}

/// What `inspect` reports about a collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InspectReport {
    pub roi_id: Option<i64>,
    pub name: Option<String>,
    pub shapes: usize,
    /// Records that could not be decoded
    pub skipped: usize,
    pub dims: usize,
    pub axes: Vec<Axis>,
    pub planes: Vec<PlaneSummary>,
    pub bounds: Option<Interval>,
}

impl From<&DecodedRegion> for InspectReport {
    fn from(decoded: &DecodedRegion) -> Self {
        Self {
            roi_id: decoded.id.map(|id| id.0),
            name: decoded.name.clone(),
            shapes: decoded.shapes().len(),
            skipped: decoded.skipped().len(),
            dims: decoded.dims(),
            axes: decoded.axes().to_vec(),
            planes: decoded
                .planes()
                .map(|(plane, members)| PlaneSummary { z: plane.z, t: plane.t, c: plane.c, shapes: members.len() })
                .collect(),
            bounds: decoded.bounds(),
        }
    }
}
