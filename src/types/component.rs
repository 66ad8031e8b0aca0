//! System description types: Component, ComponentSpec, System

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::defaults;

// ============================================================================
// Roles and Categorical Attributes
// ============================================================================

/// Role a component plays in the drive train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    Motor,
    DrivingPulley,
    DrivenPulley,
    Bearing,
}

impl ComponentRole {
    /// Wire name used in the `type` field of a component
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentRole::Motor => "motor",
            ComponentRole::DrivingPulley => "driving_pulley",
            ComponentRole::DrivenPulley => "driven_pulley",
            ComponentRole::Bearing => "bearing",
        }
    }
}

impl std::fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentRole::Motor => write!(f, "Motor"),
            ComponentRole::DrivingPulley => write!(f, "Driving Pulley"),
            ComponentRole::DrivenPulley => write!(f, "Driven Pulley"),
            ComponentRole::Bearing => write!(f, "Bearing"),
        }
    }
}

/// Belt family, read off the driving pulley
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BeltType {
    /// Classical / narrow V-belt
    #[default]
    #[serde(rename = "V", alias = "v")]
    V,
    /// Toothed timing belt
    #[serde(rename = "synchronous", alias = "Synchronous", alias = "SYNCHRONOUS")]
    Synchronous,
    /// Flat belt
    #[serde(rename = "flat", alias = "Flat", alias = "FLAT")]
    Flat,
    /// Anything not recognised; picks up the fallback factors
    #[serde(rename = "other", other)]
    Other,
}

impl std::fmt::Display for BeltType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeltType::V => write!(f, "V"),
            BeltType::Synchronous => write!(f, "synchronous"),
            BeltType::Flat => write!(f, "flat"),
            BeltType::Other => write!(f, "other"),
        }
    }
}

/// Rolling element family; selects the ISO 281 life exponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BearingType {
    #[serde(alias = "ball")]
    Balls,
    #[serde(alias = "roller")]
    Rollers,
    /// Unrecognised type string; life cannot be computed
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for BearingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BearingType::Balls => write!(f, "balls"),
            BearingType::Rollers => write!(f, "rollers"),
            BearingType::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// Per-Role Data
// ============================================================================

/// Electric motor driving the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorData {
    /// Shaft speed (rpm)
    pub rpm: f64,
    /// Rated shaft power (kW)
    pub power_kw: f64,
    /// Motor efficiency (%)
    #[serde(default = "default_motor_efficiency")]
    pub efficiency: f64,
    /// Energy tariff (currency per kWh)
    #[serde(default = "default_cost_per_kwh")]
    pub cost_per_kwh: f64,
    /// Operating hours per day
    #[serde(default = "default_operating_hours")]
    pub operating_hours: f64,
}

fn default_motor_efficiency() -> f64 {
    defaults::MOTOR_EFFICIENCY_PERCENT
}
fn default_cost_per_kwh() -> f64 {
    defaults::COST_PER_KWH
}
fn default_operating_hours() -> f64 {
    defaults::OPERATING_HOURS_PER_DAY
}

impl MotorData {
    /// Motor with default efficiency, tariff and duty cycle.
    pub fn new(rpm: f64, power_kw: f64) -> Self {
        Self {
            rpm,
            power_kw,
            efficiency: default_motor_efficiency(),
            cost_per_kwh: default_cost_per_kwh(),
            operating_hours: default_operating_hours(),
        }
    }
}

/// Driving or driven pulley
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulleyData {
    /// Pitch diameter (mm)
    pub diameter: f64,
    /// Belt family (only meaningful on the driving pulley)
    #[serde(default)]
    pub belt_type: BeltType,
    /// Shaft center distance (mm). When set on the driving pulley the
    /// analyzer also reports belt length, speed and contact arc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_distance: Option<f64>,
}

impl PulleyData {
    pub fn new(diameter: f64) -> Self {
        Self {
            diameter,
            belt_type: BeltType::default(),
            center_distance: None,
        }
    }

    pub fn with_belt_type(mut self, belt_type: BeltType) -> Self {
        self.belt_type = belt_type;
        self
    }

    pub fn with_center_distance(mut self, center_distance: f64) -> Self {
        self.center_distance = Some(center_distance);
        self
    }
}

/// Shaft bearing. Fields are optional and read leniently: a bearing that
/// cannot be rated (missing or wrong-typed values) is reported with zero
/// life instead of failing the analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BearingData {
    /// Catalog designation (e.g. "6205")
    #[serde(default, deserialize_with = "lenient_model")]
    pub model: String,
    #[serde(default, deserialize_with = "lenient_bearing_type")]
    pub bearing_type: Option<BearingType>,
    /// Basic dynamic load rating C (N)
    #[serde(
        default,
        alias = "dynamic_load_rating",
        deserialize_with = "lenient_load_rating"
    )]
    pub dynamic_load_c: Option<f64>,
}

fn lenient_model<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_bearing_type<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BearingType>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Numbers and numeric strings are accepted; anything else is `None`.
fn lenient_load_rating<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

impl BearingData {
    pub fn new(model: impl Into<String>, bearing_type: BearingType, dynamic_load_c: f64) -> Self {
        Self {
            model: model.into(),
            bearing_type: Some(bearing_type),
            dynamic_load_c: Some(dynamic_load_c),
        }
    }
}

impl From<&crate::types::BearingSpec> for BearingData {
    fn from(spec: &crate::types::BearingSpec) -> Self {
        Self::new(spec.model.clone(), spec.bearing_type, spec.dynamic_load_c)
    }
}

// ============================================================================
// Component
// ============================================================================

/// Typed payload of a component, discriminated by its wire `type`
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentSpec {
    Motor(MotorData),
    DrivingPulley(PulleyData),
    DrivenPulley(PulleyData),
    Bearing(BearingData),
    /// Component type this crate does not model; carried through untouched
    Other {
        kind: String,
        data: serde_json::Value,
    },
}

impl ComponentSpec {
    /// Role in the drive train, `None` for unmodelled component types
    pub fn role(&self) -> Option<ComponentRole> {
        match self {
            ComponentSpec::Motor(_) => Some(ComponentRole::Motor),
            ComponentSpec::DrivingPulley(_) => Some(ComponentRole::DrivingPulley),
            ComponentSpec::DrivenPulley(_) => Some(ComponentRole::DrivenPulley),
            ComponentSpec::Bearing(_) => Some(ComponentRole::Bearing),
            ComponentSpec::Other { .. } => None,
        }
    }

    fn kind(&self) -> &str {
        match self {
            ComponentSpec::Other { kind, .. } => kind.as_str(),
            other => other.role().map_or("other", |r| r.as_str()),
        }
    }
}

/// One element of a system: `{ "type": ..., "id": ..., "data": { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComponent", into = "RawComponent")]
pub struct Component {
    pub id: String,
    pub spec: ComponentSpec,
}

impl Component {
    pub fn new(id: impl Into<String>, spec: ComponentSpec) -> Self {
        Self {
            id: id.into(),
            spec,
        }
    }

    pub fn motor(id: impl Into<String>, data: MotorData) -> Self {
        Self::new(id, ComponentSpec::Motor(data))
    }

    pub fn driving_pulley(id: impl Into<String>, data: PulleyData) -> Self {
        Self::new(id, ComponentSpec::DrivingPulley(data))
    }

    pub fn driven_pulley(id: impl Into<String>, data: PulleyData) -> Self {
        Self::new(id, ComponentSpec::DrivenPulley(data))
    }

    pub fn bearing(id: impl Into<String>, data: BearingData) -> Self {
        Self::new(id, ComponentSpec::Bearing(data))
    }

    pub fn role(&self) -> Option<ComponentRole> {
        self.spec.role()
    }
}

/// Error raised when a component's `data` block does not fit its `type`
#[derive(Debug, Error)]
#[error("component '{id}' ({kind}): {message}")]
pub struct ComponentParseError {
    pub id: String,
    pub kind: String,
    pub message: String,
}

/// Loose wire form, converted to the typed form once at deserialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawComponent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    data: serde_json::Value,
}

fn parse_data<T: serde::de::DeserializeOwned>(raw: &RawComponent) -> Result<T, ComponentParseError> {
    let data = if raw.data.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        raw.data.clone()
    };
    serde_json::from_value(data).map_err(|e| ComponentParseError {
        id: raw.id.clone(),
        kind: raw.kind.clone(),
        message: e.to_string(),
    })
}

impl TryFrom<RawComponent> for Component {
    type Error = ComponentParseError;

    fn try_from(raw: RawComponent) -> Result<Self, Self::Error> {
        let spec = match raw.kind.as_str() {
            "motor" => ComponentSpec::Motor(parse_data(&raw)?),
            "driving_pulley" => ComponentSpec::DrivingPulley(parse_data(&raw)?),
            "driven_pulley" => ComponentSpec::DrivenPulley(parse_data(&raw)?),
            "bearing" => ComponentSpec::Bearing(parse_data(&raw)?),
            _ => ComponentSpec::Other {
                kind: raw.kind.clone(),
                data: raw.data.clone(),
            },
        };
        Ok(Self { id: raw.id, spec })
    }
}

impl From<Component> for RawComponent {
    fn from(component: Component) -> Self {
        let kind = component.spec.kind().to_string();
        let data = match component.spec {
            ComponentSpec::Motor(d) => serde_json::to_value(d),
            ComponentSpec::DrivingPulley(d) | ComponentSpec::DrivenPulley(d) => {
                serde_json::to_value(d)
            }
            ComponentSpec::Bearing(d) => serde_json::to_value(d),
            ComponentSpec::Other { data, .. } => Ok(data),
        }
        .unwrap_or(serde_json::Value::Null);
        Self {
            kind,
            id: component.id,
            data,
        }
    }
}

// ============================================================================
// System
// ============================================================================

/// A drive train description: an ordered list of components
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct System {
    #[serde(default)]
    pub components: Vec<Component>,
}

impl System {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    pub fn push(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn with(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Components playing `role`, in list order
    pub fn by_role(&self, role: ComponentRole) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(move |c| c.role() == Some(role))
    }

    /// Position of the first component playing `role`
    pub fn position_of(&self, role: ComponentRole) -> Option<usize> {
        self.components.iter().position(|c| c.role() == Some(role))
    }

    pub fn motor(&self) -> Option<&MotorData> {
        self.components.iter().find_map(|c| match &c.spec {
            ComponentSpec::Motor(m) => Some(m),
            _ => None,
        })
    }

    pub fn driving_pulley(&self) -> Option<&PulleyData> {
        self.components.iter().find_map(|c| match &c.spec {
            ComponentSpec::DrivingPulley(p) => Some(p),
            _ => None,
        })
    }

    pub fn driven_pulley(&self) -> Option<&PulleyData> {
        self.components.iter().find_map(|c| match &c.spec {
            ComponentSpec::DrivenPulley(p) => Some(p),
            _ => None,
        })
    }

    /// Bearings with their ids, in list order
    pub fn bearings(&self) -> impl Iterator<Item = (&str, &BearingData)> {
        self.components.iter().filter_map(|c| match &c.spec {
            ComponentSpec::Bearing(b) => Some((c.id.as_str(), b)),
            _ => None,
        })
    }
}
