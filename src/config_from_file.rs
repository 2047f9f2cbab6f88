//! Supports reading the planner configuration from YAML (optional)

use std::path::Path;
use std::sync::Arc;

use yaml_rust2::{Yaml, YamlLoader};

use crate::basis::PolynomeBasis;
use crate::collision_object::{CollisionAlgorithm, CollisionRequest};
use crate::collision_validation::CollisionValidation;
use crate::configuration::ConfigurationSpace;
use crate::device::Device;
use crate::error::ConfigError;
use crate::steering_method::SplineSteering;

/// Settings of the collision validation and of the spline steering method.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub collision_request: CollisionRequest,
    pub check_parameterized: bool,
    pub basis: PolynomeBasis,
    /// Degree of the spline.
    pub spline_order: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            collision_request: CollisionRequest::default(),
            check_parameterized: false,
            basis: PolynomeBasis::Bernstein,
            spline_order: 3,
        }
    }
}

impl PlannerConfig {
    /// Read the configuration from YAML file. YAML file like this is supported:
    /// ```yaml
    /// collision_request:
    ///   num_max_contacts: 1
    ///   exhaustive: false
    ///   security_margin: 0.0
    ///   algorithm: exact          # or bounding_volume
    /// check_parameterized: false
    /// spline:
    ///   basis: bernstein          # or canonical
    ///   order: 3
    /// ```
    /// All entries are optional, missing ones take the values shown.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let docs = YamlLoader::load_from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = PlannerConfig::default();
        let Some(doc) = docs.first() else {
            return Ok(config);
        };

        let request = &doc["collision_request"];
        if let Some(contacts) = read_integer(&request["num_max_contacts"], "num_max_contacts")? {
            if contacts < 1 {
                return Err(invalid("num_max_contacts", format!("at least one contact required, got {}", contacts)));
            }
            config.collision_request.num_max_contacts = contacts as usize;
        }
        if let Some(exhaustive) = read_bool(&request["exhaustive"], "exhaustive")? {
            config.collision_request.exhaustive = exhaustive;
        }
        if let Some(margin) = read_real(&request["security_margin"], "security_margin")? {
            if !margin.is_finite() || margin < 0.0 {
                return Err(invalid("security_margin", format!("must be finite and not negative, got {}", margin)));
            }
            config.collision_request.security_margin = margin as f32;
        }
        if let Some(algorithm) = read_str(&request["algorithm"], "algorithm")? {
            config.collision_request.algorithm = match algorithm {
                "exact" => CollisionAlgorithm::Exact,
                "bounding_volume" => CollisionAlgorithm::BoundingVolume,
                other => return Err(invalid("algorithm", format!("unknown algorithm '{}'", other))),
            };
        }

        if let Some(check) = read_bool(&doc["check_parameterized"], "check_parameterized")? {
            config.check_parameterized = check;
        }

        let spline = &doc["spline"];
        if let Some(basis) = read_str(&spline["basis"], "basis")? {
            config.basis = match basis {
                "bernstein" => PolynomeBasis::Bernstein,
                "canonical" => PolynomeBasis::CanonicalPolynome,
                other => return Err(invalid("basis", format!("unknown basis '{}'", other))),
            };
        }
        if let Some(order) = read_integer(&spline["order"], "order")? {
            if order < 1 {
                return Err(invalid("order", format!("spline order must be at least 1, got {}", order)));
            }
            config.spline_order = order as usize;
        }
        Ok(config)
    }

    /// Serialize into YAML that [`Self::from_yaml_str`] reads back.
    pub fn to_yaml(&self) -> String {
        let request = &self.collision_request;
        format!(
            "collision_request:\n  num_max_contacts: {}\n  exhaustive: {}\n  security_margin: {:?}\n  algorithm: {}\n\
             check_parameterized: {}\nspline:\n  basis: {}\n  order: {}\n",
            request.num_max_contacts,
            request.exhaustive,
            request.security_margin as f64,
            match request.algorithm {
                CollisionAlgorithm::Exact => "exact",
                CollisionAlgorithm::BoundingVolume => "bounding_volume",
            },
            self.check_parameterized,
            match self.basis {
                PolynomeBasis::Bernstein => "bernstein",
                PolynomeBasis::CanonicalPolynome => "canonical",
            },
            self.spline_order,
        )
    }

    /// Collision validation of the robot with these settings.
    pub fn collision_validation(&self, robot: &dyn Device) -> CollisionValidation {
        let mut validation = CollisionValidation::with_request(robot, self.collision_request.clone());
        validation.set_check_parameterized(self.check_parameterized);
        validation
    }

    pub fn steering(&self, space: Arc<ConfigurationSpace>) -> SplineSteering {
        SplineSteering::new(space, self.basis, self.spline_order)
    }
}

fn invalid(key: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { key: key.to_string(), reason }
}

fn read_integer(value: &Yaml, key: &str) -> Result<Option<i64>, ConfigError> {
    match value {
        Yaml::BadValue => Ok(None),
        Yaml::Integer(i) => Ok(Some(*i)),
        _ => Err(invalid(key, "integer expected".to_string())),
    }
}

fn read_real(value: &Yaml, key: &str) -> Result<Option<f64>, ConfigError> {
    match value {
        Yaml::BadValue => Ok(None),
        Yaml::Integer(i) => Ok(Some(*i as f64)),
        Yaml::Real(_) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(key, "number expected".to_string())),
        _ => Err(invalid(key, "number expected".to_string())),
    }
}

fn read_bool(value: &Yaml, key: &str) -> Result<Option<bool>, ConfigError> {
    match value {
        Yaml::BadValue => Ok(None),
        Yaml::Boolean(b) => Ok(Some(*b)),
        _ => Err(invalid(key, "true or false expected".to_string())),
    }
}

fn read_str<'a>(value: &'a Yaml, key: &str) -> Result<Option<&'a str>, ConfigError> {
    match value {
        Yaml::BadValue => Ok(None),
        Yaml::String(s) => Ok(Some(s.as_str())),
        _ => Err(invalid(key, "string expected".to_string())),
    }
}
