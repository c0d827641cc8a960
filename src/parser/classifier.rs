//! 匹配引擎：在一份数据快照上识别 User-Agent
//! 纯内存计算，不加锁、不做 I/O；同一快照上的结果完全确定

use std::sync::Arc;

use tracing::debug;

use super::result::{DeviceCategory, OperatingSystemInfo, UserAgent};
use crate::model::{Browser, Data, OperatingSystem, Pattern};
use crate::version::{VersionExtractor, VersionNumber};

/// 识别策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifierOptions {
    /// 为 true 时浏览器的静态操作系统映射优先于操作系统模式匹配
    pub prefer_browser_mapping: bool,
}

/// User-Agent 识别器
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAgentClassifier {
    options: ClassifierOptions,
}

impl UserAgentClassifier {
    pub fn new(options: ClassifierOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ClassifierOptions {
        self.options
    }

    /// 识别 User-Agent（任何输入都返回结果，未匹配时各部分为空值）
    pub fn classify(&self, data: &Data, user_agent: &str) -> UserAgent {
        // 1. 设备
        let device_category = first_match(data.device_index(), user_agent)
            .map(|(device, _)| DeviceCategory::from(device.as_ref()))
            .unwrap_or_else(DeviceCategory::empty);

        // 2. 爬虫（完整字面值匹配，命中后不再识别浏览器与操作系统）
        if let Some(robot) = data.robots().iter().find(|robot| robot.user_agent_string == user_agent) {
            debug!("命中爬虫：{}", robot.name);
            let mut result = UserAgent::from_robot(robot);
            result.device_category = device_category;
            return result;
        }

        // 3. 浏览器
        let browser = first_match(data.browser_index(), user_agent);
        let mut result = match &browser {
            Some((browser, version)) => UserAgent::from_browser(browser, version.clone()),
            None => UserAgent::empty(),
        };

        // 4. 操作系统
        result.operating_system = self.resolve_operating_system(data, user_agent, browser.as_ref().map(|(b, _)| b));
        result.device_category = device_category;
        result
    }

    fn resolve_operating_system(
        &self,
        data: &Data,
        user_agent: &str,
        browser: Option<&Arc<Browser>>,
    ) -> OperatingSystemInfo {
        let mapped = || {
            browser
                .and_then(|browser| browser.operating_system.as_ref())
                .map(|os| OperatingSystemInfo::from_entity(os, os_version(os, VersionNumber::unknown(), user_agent)))
        };
        let matched = || {
            first_match(data.operating_system_index(), user_agent).map(|(os, version): (Arc<OperatingSystem>, _)| {
                OperatingSystemInfo::from_entity(&os, os_version(&os, version, user_agent))
            })
        };

        let resolved = if self.options.prefer_browser_mapping {
            mapped().or_else(matched)
        } else {
            matched().or_else(mapped)
        };
        resolved.unwrap_or_else(OperatingSystemInfo::empty)
    }
}

/// 模式未捕获版本时按操作系统家族从 User-Agent 中提取
fn os_version(operating_system: &OperatingSystem, captured: VersionNumber, user_agent: &str) -> VersionNumber {
    if captured.is_unknown() {
        VersionNumber::parse_operating_system_version(&operating_system.family, user_agent)
    } else {
        captured
    }
}

/// 按索引顺序返回第一个命中的实体及其版本
fn first_match<T>(index: &[(Pattern, Arc<T>)], user_agent: &str) -> Option<(Arc<T>, VersionNumber)> {
    index.iter().find_map(|(pattern, entity)| {
        pattern
            .regex
            .captures(user_agent)
            .map(|captures| (Arc::clone(entity), VersionExtractor::extract(&captures)))
    })
}
