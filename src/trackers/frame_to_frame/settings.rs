use crate::Errors;
use itertools::Itertools;
use std::collections::HashMap;

/// Maximal distance between two linked spots
pub const KEY_LINKING_MAX_DISTANCE: &str = "LINKING_MAX_DISTANCE";
/// Factor applied to the cutoff percentile of the linking costs to get the opt-out cost
pub const KEY_ALTERNATIVE_LINKING_COST_FACTOR: &str = "ALTERNATIVE_LINKING_COST_FACTOR";
/// Percentile of the linking costs the opt-out cost is derived from, in `[0, 100]`
pub const KEY_CUTOFF_PERCENTILE: &str = "CUTOFF_PERCENTILE";
/// Optional feature name to penalty weight map
pub const KEY_LINKING_FEATURE_PENALTIES: &str = "LINKING_FEATURE_PENALTIES";

pub const DEFAULT_LINKING_MAX_DISTANCE: f64 = 15.0;
pub const DEFAULT_ALTERNATIVE_LINKING_COST_FACTOR: f64 = 1.05;
pub const DEFAULT_CUTOFF_PERCENTILE: f64 = 90.0;

const MANDATORY_KEYS: [&str; 3] = [
    KEY_LINKING_MAX_DISTANCE,
    KEY_ALTERNATIVE_LINKING_COST_FACTOR,
    KEY_CUTOFF_PERCENTILE,
];
const OPTIONAL_KEYS: [&str; 1] = [KEY_LINKING_FEATURE_PENALTIES];

/// Raw value of a settings entry
///
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Double(f64),
    Integer(i64),
    Boolean(bool),
    Text(String),
    FeatureMap(HashMap<String, f64>),
}

impl SettingValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Double(_) => "Double",
            SettingValue::Integer(_) => "Integer",
            SettingValue::Boolean(_) => "Boolean",
            SettingValue::Text(_) => "Text",
            SettingValue::FeatureMap(_) => "FeatureMap",
        }
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        SettingValue::Double(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Integer(v)
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Boolean(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Text(v.to_string())
    }
}

impl From<HashMap<String, f64>> for SettingValue {
    fn from(v: HashMap<String, f64>) -> Self {
        SettingValue::FeatureMap(v)
    }
}

/// Key/value settings as delivered by the configuration layer
///
/// The map is only read by the tracker; [Settings::validate] turns it into
/// [LinkingSettings] or reports every problem found at once.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: HashMap<String, SettingValue>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entry and returns the settings for chaining
    ///
    pub fn with(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<SettingValue>) -> Option<SettingValue> {
        self.values.insert(key.to_string(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn check_double(&self, key: &str, errors: &mut Vec<String>) -> Option<f64> {
        match self.values.get(key) {
            None => {
                errors.push(format!(
                    "Parameter {} could not be found in settings map.",
                    key
                ));
                None
            }
            Some(SettingValue::Double(v)) => Some(*v),
            Some(other) => {
                errors.push(format!(
                    "Value for parameter {} is not of the right type. Expected Double, got {}.",
                    key,
                    other.type_name()
                ));
                None
            }
        }
    }

    fn check_feature_map(&self, key: &str, errors: &mut Vec<String>) -> HashMap<String, f64> {
        match self.values.get(key) {
            None => HashMap::default(),
            Some(SettingValue::FeatureMap(map)) => {
                for (feature, weight) in map.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
                    if !(weight.is_finite() && *weight >= 0.0) {
                        errors.push(format!(
                            "Penalty weight for feature {} in {} must be a non-negative number, got {}.",
                            feature, key, weight
                        ));
                    }
                }
                map.clone()
            }
            Some(other) => {
                errors.push(format!(
                    "Value for parameter {} is not of the right type. Expected FeatureMap, got {}.",
                    key,
                    other.type_name()
                ));
                HashMap::default()
            }
        }
    }

    fn check_keys(&self, errors: &mut Vec<String>) {
        for key in self.values.keys().sorted() {
            if !MANDATORY_KEYS.contains(&key.as_str()) && !OPTIONAL_KEYS.contains(&key.as_str()) {
                errors.push(format!(
                    "Settings map contains an unexpected key: {}.",
                    key
                ));
            }
        }
    }

    /// Validates the settings
    ///
    /// All violations are collected in a single [Errors::InvalidSettings] report:
    /// missing or mistyped parameters, out of range values, invalid penalty weights
    /// and unexpected keys.
    ///
    pub fn validate(&self) -> Result<LinkingSettings, Errors> {
        let mut errors = Vec::default();

        let max_distance = self.check_double(KEY_LINKING_MAX_DISTANCE, &mut errors);
        if let Some(d) = max_distance {
            if !(d.is_finite() && d > 0.0) {
                errors.push(format!(
                    "Parameter {} must be strictly positive, got {}.",
                    KEY_LINKING_MAX_DISTANCE, d
                ));
            }
        }

        let feature_penalties =
            self.check_feature_map(KEY_LINKING_FEATURE_PENALTIES, &mut errors);

        let cutoff_percentile = self.check_double(KEY_CUTOFF_PERCENTILE, &mut errors);
        if let Some(p) = cutoff_percentile {
            if !(0.0..=100.0).contains(&p) {
                errors.push(format!(
                    "Parameter {} must be within [0, 100], got {}.",
                    KEY_CUTOFF_PERCENTILE, p
                ));
            }
        }

        let alternative_cost_factor =
            self.check_double(KEY_ALTERNATIVE_LINKING_COST_FACTOR, &mut errors);
        if let Some(f) = alternative_cost_factor {
            if !(f.is_finite() && f >= 0.0) {
                errors.push(format!(
                    "Parameter {} must be non-negative, got {}.",
                    KEY_ALTERNATIVE_LINKING_COST_FACTOR, f
                ));
            }
        }

        self.check_keys(&mut errors);

        match (max_distance, cutoff_percentile, alternative_cost_factor) {
            (Some(max_distance), Some(cutoff_percentile), Some(alternative_cost_factor))
                if errors.is_empty() =>
            {
                Ok(LinkingSettings {
                    max_distance,
                    alternative_cost_factor,
                    cutoff_percentile,
                    feature_penalties,
                })
            }
            _ => Err(Errors::InvalidSettings(errors)),
        }
    }
}

/// Validated linking parameters
///
#[derive(Debug, Clone, PartialEq)]
pub struct LinkingSettings {
    pub max_distance: f64,
    pub alternative_cost_factor: f64,
    pub cutoff_percentile: f64,
    pub feature_penalties: HashMap<String, f64>,
}

impl Default for LinkingSettings {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_LINKING_MAX_DISTANCE,
            alternative_cost_factor: DEFAULT_ALTERNATIVE_LINKING_COST_FACTOR,
            cutoff_percentile: DEFAULT_CUTOFF_PERCENTILE,
            feature_penalties: HashMap::default(),
        }
    }
}

impl LinkingSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_distance(mut self, d: f64) -> Self {
        self.max_distance = d;
        self
    }

    pub fn alternative_cost_factor(mut self, f: f64) -> Self {
        self.alternative_cost_factor = f;
        self
    }

    pub fn cutoff_percentile(mut self, p: f64) -> Self {
        self.cutoff_percentile = p;
        self
    }

    pub fn feature_penalty(mut self, feature: &str, weight: f64) -> Self {
        self.feature_penalties.insert(feature.to_string(), weight);
        self
    }

    /// Linking costs above this value are never accepted
    ///
    pub fn cost_threshold(&self) -> f64 {
        self.max_distance * self.max_distance
    }

    /// Raw settings map carrying these parameters
    ///
    pub fn to_settings(&self) -> Settings {
        let settings = Settings::new()
            .with(KEY_LINKING_MAX_DISTANCE, self.max_distance)
            .with(KEY_ALTERNATIVE_LINKING_COST_FACTOR, self.alternative_cost_factor)
            .with(KEY_CUTOFF_PERCENTILE, self.cutoff_percentile);
        if self.feature_penalties.is_empty() {
            settings
        } else {
            settings.with(
                KEY_LINKING_FEATURE_PENALTIES,
                self.feature_penalties.clone(),
            )
        }
    }
}

impl From<&LinkingSettings> for Settings {
    fn from(s: &LinkingSettings) -> Self {
        s.to_settings()
    }
}
