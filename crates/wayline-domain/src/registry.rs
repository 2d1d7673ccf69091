//! Vehicle capability registry.
//!
//! Static per-model operating envelopes. The built-in table is initialised
//! once per process and never mutated; missions refer to entries by
//! identifier only.

use crate::action::ActionType;
use crate::error::{parse_option, DomainError, Result};
use crate::Bounds;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// =============================================================================
// PAYLOADS
// =============================================================================

/// Camera / sensor payload models with their firmware enum values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadModel {
    H20,
    H20T,
    P1,
    M30,
    M30T,
    H20N,
    M3E,
    M3T,
    M3M,
    M3D,
    M3TD,
    H30,
    H30T,
    #[serde(rename = "PSDK")]
    Psdk,
}

impl PayloadModel {
    const NAMES: [(&'static str, Self); 14] = [
        ("H20", Self::H20),
        ("H20T", Self::H20T),
        ("P1", Self::P1),
        ("M30", Self::M30),
        ("M30T", Self::M30T),
        ("H20N", Self::H20N),
        ("M3E", Self::M3E),
        ("M3T", Self::M3T),
        ("M3M", Self::M3M),
        ("M3D", Self::M3D),
        ("M3TD", Self::M3TD),
        ("H30", Self::H30),
        ("H30T", Self::H30T),
        ("PSDK", Self::Psdk),
    ];

    /// Parse a canonical payload name such as `"H20T"`.
    pub fn parse(name: &str) -> Result<Self> {
        parse_option("payload model", name, &Self::NAMES)
    }

    pub fn as_str(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, model)| *model == self)
            .map_or("PSDK", |(name, _)| name)
    }

    /// `payloadEnumValue` written into the mission config
    pub const fn enum_value(self) -> u32 {
        match self {
            Self::H20 => 42,
            Self::H20T => 43,
            Self::P1 => 50,
            Self::M30 => 52,
            Self::M30T => 53,
            Self::H20N => 61,
            Self::M3E => 66,
            Self::M3T => 67,
            Self::M3M => 68,
            Self::M3D => 80,
            Self::M3TD => 81,
            Self::H30 => 82,
            Self::H30T => 83,
            Self::Psdk => 65534,
        }
    }
}

impl fmt::Display for PayloadModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// VEHICLE MODELS
// =============================================================================

/// Operating envelope and firmware metadata for one aircraft type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleModel {
    pub id: &'static str,

    // Envelope
    pub speed: Bounds,
    pub altitude: Bounds,
    pub supported_actions: &'static [ActionType],
    pub gimbal_pitch: Bounds,
    pub gimbal_yaw: Bounds,
    pub compatible_payloads: &'static [PayloadModel],
    pub supports_rtk: bool,

    // Firmware identification
    pub drone_enum_value: u32,
    pub drone_sub_enum_value: Option<u32>,

    // Authoring defaults
    pub default_payload: PayloadModel,
    pub default_speed: f64,
    pub default_altitude: f64,
    pub takeoff_security_height: f64,
}

impl VehicleModel {
    pub fn supports(&self, action: ActionType) -> bool {
        self.supported_actions.contains(&action)
    }

    pub fn is_payload_compatible(&self, payload: PayloadModel) -> bool {
        self.compatible_payloads.contains(&payload)
    }
}

const ALL_ACTIONS: &[ActionType] = &ActionType::ALL;

const STILLS_ONLY: &[ActionType] = &[
    ActionType::TakePhoto,
    ActionType::Hover,
    ActionType::Heading,
    ActionType::GimbalRotate,
];

const ENTERPRISE_SPEED: Bounds = Bounds::new(1.0, 15.0);
const ENTERPRISE_ALTITUDE: Bounds = Bounds::new(2.0, 1500.0);
const MAVIC_ALTITUDE: Bounds = Bounds::new(2.0, 500.0);
const GIMBAL_YAW: Bounds = Bounds::new(-180.0, 180.0);

const MATRICE_PAYLOADS: &[PayloadModel] = &[
    PayloadModel::H20,
    PayloadModel::H20T,
    PayloadModel::H20N,
    PayloadModel::H30,
    PayloadModel::H30T,
    PayloadModel::P1,
    PayloadModel::Psdk,
];

const fn matrice(id: &'static str, drone_enum_value: u32) -> VehicleModel {
    VehicleModel {
        id,
        speed: ENTERPRISE_SPEED,
        altitude: ENTERPRISE_ALTITUDE,
        supported_actions: ALL_ACTIONS,
        gimbal_pitch: Bounds::new(-90.0, 30.0),
        gimbal_yaw: GIMBAL_YAW,
        compatible_payloads: MATRICE_PAYLOADS,
        supports_rtk: true,
        drone_enum_value,
        drone_sub_enum_value: None,
        default_payload: PayloadModel::H20,
        default_speed: 10.0,
        default_altitude: 100.0,
        takeoff_security_height: 5.0,
    }
}

/// Aircraft with an integrated camera: the only compatible payload is its own.
const fn integrated(
    id: &'static str,
    drone_enum_value: u32,
    drone_sub_enum_value: u32,
    payload: &'static [PayloadModel],
    mavic: bool,
) -> VehicleModel {
    VehicleModel {
        id,
        speed: ENTERPRISE_SPEED,
        altitude: if mavic { MAVIC_ALTITUDE } else { ENTERPRISE_ALTITUDE },
        supported_actions: ALL_ACTIONS,
        gimbal_pitch: Bounds::new(-90.0, 35.0),
        gimbal_yaw: GIMBAL_YAW,
        compatible_payloads: payload,
        supports_rtk: !mavic,
        drone_enum_value,
        drone_sub_enum_value: Some(drone_sub_enum_value),
        default_payload: payload[0],
        default_speed: 8.0,
        default_altitude: 80.0,
        takeoff_security_height: 3.0,
    }
}

const fn builtin_models() -> [VehicleModel; 9] {
    let mut m3m = integrated("M3M", 77, 2, &[PayloadModel::M3M], true);
    m3m.supported_actions = STILLS_ONLY;

    [
        matrice("M350", 89),
        matrice("M300", 60),
        integrated("M30", 67, 0, &[PayloadModel::M30], false),
        integrated("M30T", 67, 1, &[PayloadModel::M30T], false),
        integrated("M3E", 77, 0, &[PayloadModel::M3E], true),
        integrated("M3T", 77, 1, &[PayloadModel::M3T], true),
        m3m,
        integrated("M3D", 91, 0, &[PayloadModel::M3D], true),
        integrated("M3TD", 91, 1, &[PayloadModel::M3TD], true),
    ]
}

static BUILTIN: LazyLock<CapabilityRegistry> =
    LazyLock::new(|| CapabilityRegistry::new(builtin_models().to_vec()));

// =============================================================================
// REGISTRY
// =============================================================================

/// Read-only lookup from model identifier to capability envelope
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityRegistry {
    models: Vec<VehicleModel>,
}

impl CapabilityRegistry {
    pub const fn new(models: Vec<VehicleModel>) -> Self {
        Self { models }
    }

    /// Registry of all supported aircraft
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Resolve a vehicle model identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownVehicleModel`] if the identifier is not
    /// registered.
    pub fn lookup(&self, id: &str) -> Result<&VehicleModel> {
        self.models
            .iter()
            .find(|model| model.id == id)
            .ok_or_else(|| DomainError::UnknownVehicleModel {
                id: id.to_string(),
                supported: self.ids().collect::<Vec<_>>().join(", "),
            })
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.models.iter().map(|model| model.id)
    }

    pub fn models(&self) -> &[VehicleModel] {
        &self.models
    }
}
