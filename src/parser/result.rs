//! 识别结果
//! 未识别的部分统一以各自的空值表示，不使用 Option

use serde::{Deserialize, Serialize};

use crate::model::{Browser, Category, Device, Family, OperatingSystem, Robot, UserAgentType};
use crate::version::VersionNumber;

/// 操作系统识别结果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperatingSystemInfo {
    pub family: Family,
    pub family_name: String,
    pub name: String,
    pub producer: String,
    pub producer_url: String,
    pub url: String,
    pub icon: String,
    pub version: VersionNumber,
}

impl OperatingSystemInfo {
    /// 空结果：家族 UNKNOWN，版本未知
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entity(operating_system: &OperatingSystem, version: VersionNumber) -> Self {
        Self {
            family: operating_system.family.clone(),
            family_name: operating_system.family_name.clone(),
            name: operating_system.name.clone(),
            producer: operating_system.producer.clone(),
            producer_url: operating_system.producer_url.clone(),
            url: operating_system.url.clone(),
            icon: operating_system.icon.clone(),
            version,
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::empty()
    }
}

/// 设备类别识别结果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceCategory {
    pub category: Category,
    pub name: String,
    pub icon: String,
    pub info_url: String,
}

impl DeviceCategory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::empty()
    }
}

impl From<&Device> for DeviceCategory {
    fn from(device: &Device) -> Self {
        Self {
            category: device.category,
            name: device.name.clone(),
            icon: device.icon.clone(),
            info_url: device.info_url.clone(),
        }
    }
}

/// User-Agent 识别结果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserAgent {
    pub family: Family,
    pub name: String,
    pub producer: String,
    pub producer_url: String,
    pub url: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: UserAgentType,
    pub type_name: String,
    pub version: VersionNumber,
    pub operating_system: OperatingSystemInfo,
    pub device_category: DeviceCategory,
}

impl UserAgent {
    /// 空结果
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::empty()
    }

    pub(crate) fn from_browser(browser: &Browser, version: VersionNumber) -> Self {
        Self {
            family: browser.family.clone(),
            name: browser.family_name.clone(),
            producer: browser.producer.clone(),
            producer_url: browser.producer_url.clone(),
            url: browser.url.clone(),
            icon: browser.icon.clone(),
            kind: UserAgentType::evaluate(&browser.browser_type.name),
            type_name: browser.browser_type.name.clone(),
            version,
            ..Self::default()
        }
    }

    pub(crate) fn from_robot(robot: &Robot) -> Self {
        Self {
            family: robot.family.clone(),
            name: robot.name.clone(),
            producer: robot.producer.clone(),
            producer_url: robot.producer_url.clone(),
            url: robot.info_url.clone(),
            icon: robot.icon.clone(),
            kind: UserAgentType::Robot,
            type_name: UserAgentType::Robot.name().to_string(),
            ..Self::default()
        }
    }
}
