//! Describing typed module parameters in the remote store's neutral schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

/// Local type of a module parameter.
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParamType {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Character,
    String,
    File,
    BigDecimal,
    BigInteger,
    Color,
    /// An image with its metadata.
    Dataset,
    /// A view onto a dataset.
    DatasetView,
    /// A displayed image.
    ImageDisplay,
    Array,
    List,
    Map,
    Set,
}

/// Remote value type used as a parameter's prototype.
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Prototype {
    Bool,
    Double,
    Float,
    Int,
    Long,
    String,
    Array,
    List,
    Map,
    Set,
}

impl Prototype {
    /// Placeholder value sent with the prototype. Floating prototypes carry
    /// NaN, which JSON writes as `null`.
    pub fn default_value(&self) -> serde_json::Value {
        match self {
            Self::Bool => false.into(),
            Self::Double | Self::Float => serde_json::Value::Null,
            Self::Int | Self::Long => 0.into(),
            Self::String => "".into(),
            Self::Array | Self::List | Self::Set => serde_json::Value::Array(Vec::new()),
            Self::Map => serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

impl ParamType {
    pub fn prototype(&self) -> Prototype {
        match self {
            // Images travel as their remote id.
            Self::Dataset | Self::DatasetView | Self::ImageDisplay => Prototype::Long,
            Self::Boolean => Prototype::Bool,
            Self::Double => Prototype::Double,
            Self::Float => Prototype::Float,
            Self::Integer => Prototype::Int,
            Self::Long => Prototype::Long,
            Self::Array => Prototype::Array,
            Self::List => Prototype::List,
            Self::Map => Prototype::Map,
            Self::Set => Prototype::Set,
            Self::Byte
            | Self::Short
            | Self::Character
            | Self::String
            | Self::File
            | Self::BigDecimal
            | Self::BigInteger
            | Self::Color => Prototype::String,
        }
    }

    /// Get a description of the type
    pub fn description(&self) -> &'static str {
        match self {
            Self::Dataset | Self::DatasetView | Self::ImageDisplay => "Image, passed by remote image id",
            Self::Array | Self::List | Self::Map | Self::Set => "Collection of values",
            Self::Boolean | Self::Integer | Self::Long | Self::Float | Self::Double => "Primitive value",
            _ => "Value passed as its string form",
        }
    }

    pub fn type_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }
}

/// A parameter declared by a local module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Value>,
}

/// The parameter as the remote job service describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobParam {
    pub optional: bool,
    pub prototype: Prototype,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Value>,
}

impl From<&ParamSpec> for JobParam {
    fn from(spec: &ParamSpec) -> Self {
        Self {
            optional: !spec.required,
            prototype: spec.param_type.prototype(),
            description: spec.description.clone(),
            values: (!spec.choices.is_empty()).then(|| spec.choices.clone()),
            min: spec.min.clone(),
            max: spec.max.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_prototype_mapping() {
        assert_eq!(ParamType::Boolean.prototype(), Prototype::Bool);
        assert_eq!(ParamType::Double.prototype(), Prototype::Double);
        assert_eq!(ParamType::Float.prototype(), Prototype::Float);
        assert_eq!(ParamType::Integer.prototype(), Prototype::Int);
        assert_eq!(ParamType::Long.prototype(), Prototype::Long);
        assert_eq!(ParamType::Dataset.prototype(), Prototype::Long);
        assert_eq!(ParamType::ImageDisplay.prototype(), Prototype::Long);
        assert_eq!(ParamType::Array.prototype(), Prototype::Array);
        assert_eq!(ParamType::Map.prototype(), Prototype::Map);
        assert_eq!(ParamType::Short.prototype(), Prototype::String);
        assert_eq!(ParamType::File.prototype(), Prototype::String);
    }

    #[test]
    fn test_every_type_has_a_prototype_and_name() {
        for param_type in ParamType::iter() {
            let name: &'static str = param_type.into();
            assert_eq!(ParamType::from_str(name).unwrap(), param_type);
            let _ = param_type.prototype().default_value();
        }
        assert_eq!(ParamType::type_names().len(), ParamType::iter().count());
    }

    #[test]
    fn test_job_param_from_spec() {
        let spec = ParamSpec {
            name: "sigma".into(),
            param_type: ParamType::Double,
            required: false,
            description: Some("Blur radius".into()),
            choices: vec![],
            min: Some(0.5.into()),
            max: None,
        };
        let param = JobParam::from(&spec);
        assert!(param.optional);
        assert_eq!(param.prototype, Prototype::Double);
        assert_eq!(param.values, None);
        assert_eq!(param.min, Some(serde_json::Value::from(0.5)));

        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(json["prototype"], "double");
    }
}
