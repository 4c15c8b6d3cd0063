use std::fmt;

use crate::property::Family;

/// Every device type the provider recognises by product model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Bulb,
    Plug,
    Vacuum,
    ContactSensor,
    MotionSensor,
    /// Recognised, but no service exists for it
    Lock,
}

impl DeviceType {
    pub const ALL: [DeviceType; 6] = [
        DeviceType::Bulb,
        DeviceType::Plug,
        DeviceType::Vacuum,
        DeviceType::ContactSensor,
        DeviceType::MotionSensor,
        DeviceType::Lock,
    ];

    /// Vendor `product_model` values of this type
    pub fn models(self) -> &'static [&'static str] {
        match self {
            DeviceType::Bulb => &["WLPA19", "WLPA19C"],
            DeviceType::Plug => &["WLPP1", "WLPP1CFH"],
            DeviceType::Vacuum => &["JA_RO2"],
            DeviceType::ContactSensor => &["DWS3U"],
            DeviceType::MotionSensor => &["PIR3U"],
            DeviceType::Lock => &["YD.LO1"],
        }
    }

    pub fn from_model(model: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|device_type| device_type.models().contains(&model))
    }

    pub fn matches(self, model: &str) -> bool {
        self.models().contains(&model)
    }

    /// Property family, `None` for types without a facade
    pub fn family(self) -> Option<Family> {
        match self {
            DeviceType::Bulb => Some(Family::Bulb),
            DeviceType::Plug => Some(Family::Plug),
            DeviceType::Vacuum => Some(Family::Vacuum),
            DeviceType::ContactSensor => Some(Family::ContactSensor),
            DeviceType::MotionSensor => Some(Family::MotionSensor),
            DeviceType::Lock => None,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family() {
            Some(family) => write!(f, "{}", family),
            None => f.write_str("lock"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("WLPA19C", Some(DeviceType::Bulb))]
    #[case("WLPP1CFH", Some(DeviceType::Plug))]
    #[case("JA_RO2", Some(DeviceType::Vacuum))]
    #[case("DWS3U", Some(DeviceType::ContactSensor))]
    #[case("PIR3U", Some(DeviceType::MotionSensor))]
    #[case("YD.LO1", Some(DeviceType::Lock))]
    #[case("WYZEC1", None)]
    fn test_from_model(#[case] model: &str, #[case] expected: Option<DeviceType>) {
        assert_eq!(DeviceType::from_model(model), expected);
    }

    #[test]
    fn test_models_do_not_overlap() {
        let mut seen = std::collections::HashSet::new();
        for device_type in DeviceType::ALL {
            for model in device_type.models() {
                assert!(seen.insert(*model), "{} listed twice", model);
            }
        }
    }
}
