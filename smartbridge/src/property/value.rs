//! Value coercion and the closed enumerations behind raw vendor codes

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Integer from a JSON number or a numeric string
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Boolean from `true/false`, `0/1` or `"0"/"1"`
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        other => match as_int(other)? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        },
    }
}

/// Text form of a scalar, as the vendor expects it in `pvalue`
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

/// Vacuum operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VacuumMode {
    BreakPoint,
    FullFinishSweepingOnWayCharge,
    Idle,
    OnWayCharge,
    Pause,
    Sweeping,
}

impl VacuumMode {
    /// Map a raw mode code; codes the vendor has not documented are `Idle`
    pub fn from_code(code: i64) -> Self {
        match code {
            11 | 33 | 39 => VacuumMode::BreakPoint,
            10 | 12 | 26 | 32 | 38 => VacuumMode::FullFinishSweepingOnWayCharge,
            5 => VacuumMode::OnWayCharge,
            4 | 9 | 27 | 31 | 37 => VacuumMode::Pause,
            1 | 7 | 25 | 30 | 36 => VacuumMode::Sweeping,
            _ => VacuumMode::Idle,
        }
    }
}

/// Vacuum suction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VacuumSuction {
    Quiet,
    Standard,
    Strong,
}

impl VacuumSuction {
    pub fn code(self) -> u32 {
        match self {
            VacuumSuction::Quiet => 1,
            VacuumSuction::Standard => 2,
            VacuumSuction::Strong => 3,
        }
    }

    /// Unknown codes read as `Standard`
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => VacuumSuction::Quiet,
            3 => VacuumSuction::Strong,
            _ => VacuumSuction::Standard,
        }
    }
}

/// Power state of a switchable device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    /// `1` or `0`, sent as the `pvalue` text
    pub fn code(self) -> i64 {
        match self {
            SwitchState::On => 1,
            SwitchState::Off => 0,
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        as_bool(value).map(|on| if on { SwitchState::On } else { SwitchState::Off })
    }

    pub fn is_on(self) -> bool {
        self == SwitchState::On
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchState::On => f.write_str("on"),
            SwitchState::Off => f.write_str("off"),
        }
    }
}
