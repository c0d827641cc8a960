//! 数据快照
//! 一次解析得到的完整模式库：构建后任何字段都不再修改，更新时整体替换

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{
    Browser, BrowserOperatingSystemMapping, BrowserRecord, BrowserType, Device, OperatingSystem, Pattern, Robot,
};

/// 不可变的数据快照
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Data {
    version: String,
    browsers: BTreeMap<u32, Arc<Browser>>,
    browser_patterns: BTreeMap<u32, Vec<Pattern>>,
    browser_types: BTreeMap<u32, BrowserType>,
    browser_index: Vec<(Pattern, Arc<Browser>)>,
    browser_os_mappings: BTreeSet<BrowserOperatingSystemMapping>,
    operating_systems: BTreeMap<u32, Arc<OperatingSystem>>,
    operating_system_patterns: BTreeMap<u32, Vec<Pattern>>,
    operating_system_index: Vec<(Pattern, Arc<OperatingSystem>)>,
    robots: Vec<Robot>,
    devices: BTreeMap<u32, Arc<Device>>,
    device_patterns: BTreeMap<u32, Vec<Pattern>>,
    device_index: Vec<(Pattern, Arc<Device>)>,
}

impl Data {
    /// 空数据（读取失败时返回的哨兵值）
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn browsers(&self) -> &BTreeMap<u32, Arc<Browser>> {
        &self.browsers
    }

    pub fn browser_patterns(&self) -> &BTreeMap<u32, Vec<Pattern>> {
        &self.browser_patterns
    }

    pub fn browser_types(&self) -> &BTreeMap<u32, BrowserType> {
        &self.browser_types
    }

    /// 模式→浏览器有序索引（按模式全序升序）
    pub fn browser_index(&self) -> &[(Pattern, Arc<Browser>)] {
        &self.browser_index
    }

    pub fn browser_os_mappings(&self) -> &BTreeSet<BrowserOperatingSystemMapping> {
        &self.browser_os_mappings
    }

    pub fn operating_systems(&self) -> &BTreeMap<u32, Arc<OperatingSystem>> {
        &self.operating_systems
    }

    pub fn operating_system_patterns(&self) -> &BTreeMap<u32, Vec<Pattern>> {
        &self.operating_system_patterns
    }

    pub fn operating_system_index(&self) -> &[(Pattern, Arc<OperatingSystem>)] {
        &self.operating_system_index
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn devices(&self) -> &BTreeMap<u32, Arc<Device>> {
        &self.devices
    }

    pub fn device_patterns(&self) -> &BTreeMap<u32, Vec<Pattern>> {
        &self.device_patterns
    }

    pub fn device_index(&self) -> &[(Pattern, Arc<Device>)] {
        &self.device_index
    }
}

/// 数据快照构建器
///
/// 解析器单遍收集实体与模式，`build` 时统一解析外键：
/// 指向不存在实体的引用会被丢弃（记录告警），不会报错，也不会留下悬空引用。
#[derive(Debug, Default)]
pub struct DataBuilder {
    version: String,
    browser_types: Vec<BrowserType>,
    browsers: Vec<BrowserRecord>,
    browser_patterns: Vec<Pattern>,
    mappings: Vec<BrowserOperatingSystemMapping>,
    operating_systems: Vec<OperatingSystem>,
    operating_system_patterns: Vec<Pattern>,
    robots: Vec<Robot>,
    devices: Vec<Device>,
    device_patterns: Vec<Pattern>,
}

impl DataBuilder {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn browser_type(mut self, browser_type: BrowserType) -> Self {
        self.browser_types.push(browser_type);
        self
    }

    pub fn browser(mut self, browser: BrowserRecord) -> Self {
        self.browsers.push(browser);
        self
    }

    pub fn browser_pattern(mut self, pattern: Pattern) -> Self {
        self.browser_patterns.push(pattern);
        self
    }

    pub fn browser_os_mapping(mut self, mapping: BrowserOperatingSystemMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    pub fn operating_system(mut self, operating_system: OperatingSystem) -> Self {
        self.operating_systems.push(operating_system.normalized());
        self
    }

    pub fn operating_system_pattern(mut self, pattern: Pattern) -> Self {
        self.operating_system_patterns.push(pattern);
        self
    }

    pub fn robot(mut self, robot: Robot) -> Self {
        self.robots.push(robot.normalized());
        self
    }

    pub fn device(mut self, device: Device) -> Self {
        self.devices.push(device.normalized());
        self
    }

    pub fn device_pattern(mut self, pattern: Pattern) -> Self {
        self.device_patterns.push(pattern);
        self
    }

    /// 解析外键并生成快照
    pub fn build(self) -> Data {
        let browser_types: BTreeMap<u32, BrowserType> =
            self.browser_types.into_iter().map(|t| (t.id, t)).collect();

        let operating_systems: BTreeMap<u32, Arc<OperatingSystem>> = self
            .operating_systems
            .into_iter()
            .map(|os| (os.id, Arc::new(os)))
            .collect();

        // 1. 浏览器：类型不存在的浏览器整体丢弃
        let known_browser_ids: BTreeSet<u32> = self.browsers.iter().map(|b| b.id).collect();
        let browser_os_mappings: BTreeSet<BrowserOperatingSystemMapping> = self
            .mappings
            .into_iter()
            .filter(|mapping| {
                let valid = known_browser_ids.contains(&mapping.browser_id)
                    && operating_systems.contains_key(&mapping.operating_system_id);
                if !valid {
                    warn!(
                        "丢弃无效的浏览器→操作系统映射：browser={}，os={}",
                        mapping.browser_id, mapping.operating_system_id
                    );
                }
                valid
            })
            .collect();

        let mut browsers = BTreeMap::new();
        for record in &self.browsers {
            let Some(browser_type) = browser_types.get(&record.type_id) else {
                warn!("浏览器 {}（{}）引用的类型 {} 不存在，已丢弃", record.id, record.family_name, record.type_id);
                continue;
            };
            let operating_system = browser_os_mappings
                .iter()
                .find(|mapping| mapping.browser_id == record.id)
                .and_then(|mapping| operating_systems.get(&mapping.operating_system_id))
                .cloned();
            let browser = Browser::resolve(record, browser_type.clone(), operating_system);
            browsers.insert(record.id, Arc::new(browser));
        }
        // 浏览器被丢弃后，其映射同样失效
        let browser_os_mappings: BTreeSet<_> = browser_os_mappings
            .into_iter()
            .filter(|mapping| browsers.contains_key(&mapping.browser_id))
            .collect();

        // 2. 模式分组与有序索引
        let (browser_patterns, browser_index) = index_patterns(self.browser_patterns, &browsers, "浏览器");
        let (operating_system_patterns, operating_system_index) =
            index_patterns(self.operating_system_patterns, &operating_systems, "操作系统");

        let devices: BTreeMap<u32, Arc<Device>> =
            self.devices.into_iter().map(|d| (d.id, Arc::new(d))).collect();
        let (device_patterns, device_index) = index_patterns(self.device_patterns, &devices, "设备");

        debug!(
            "数据快照构建完成，版本：{}，浏览器{}个（模式{}条）、操作系统{}个（模式{}条）、爬虫{}个、设备{}个（模式{}条）",
            self.version,
            browsers.len(),
            browser_index.len(),
            operating_systems.len(),
            operating_system_index.len(),
            self.robots.len(),
            devices.len(),
            device_index.len()
        );

        Data {
            version: self.version,
            browsers,
            browser_patterns,
            browser_types,
            browser_index,
            browser_os_mappings,
            operating_systems,
            operating_system_patterns,
            operating_system_index,
            robots: self.robots,
            devices,
            device_patterns,
            device_index,
        }
    }
}

/// 按所属实体分组，并生成按全序排列的「模式→实体」索引；所属实体不存在的模式被丢弃
fn index_patterns<T>(
    patterns: Vec<Pattern>,
    owners: &BTreeMap<u32, Arc<T>>,
    kind: &str,
) -> (BTreeMap<u32, Vec<Pattern>>, Vec<(Pattern, Arc<T>)>) {
    let mut grouped: BTreeMap<u32, Vec<Pattern>> = BTreeMap::new();
    let mut index = Vec::with_capacity(patterns.len());

    for pattern in patterns {
        let Some(owner) = owners.get(&pattern.owner_id) else {
            warn!("{}模式 {} 引用的实体 {} 不存在，已丢弃", kind, pattern.id, pattern.owner_id);
            continue;
        };
        index.push((pattern.clone(), Arc::clone(owner)));
        grouped.entry(pattern.owner_id).or_default().push(pattern);
    }

    for group in grouped.values_mut() {
        group.sort();
        group.dedup();
    }
    index.sort_by(|(a, _), (b, _)| a.cmp(b));
    index.dedup_by(|(a, _), (b, _)| a == b);

    (grouped, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(id: u32, name: &str) -> OperatingSystem {
        OperatingSystem {
            id,
            family_name: name.to_string(),
            name: name.to_string(),
            ..OperatingSystem::default()
        }
    }

    fn browser(id: u32, type_id: u32, name: &str) -> BrowserRecord {
        BrowserRecord {
            id,
            type_id,
            family_name: name.to_string(),
            icon: String::new(),
            info_url: String::new(),
            producer: String::new(),
            producer_url: String::new(),
            url: String::new(),
        }
    }

    fn base() -> DataBuilder {
        DataBuilder::new("20120801-00")
            .browser_type(BrowserType { id: 1, name: "Browser".to_string() })
            .browser(browser(1, 1, "Firefox"))
            .browser_pattern(Pattern::from_perl(1, 1, 10, r"/firefox/([\d.]+)/si").unwrap())
            .operating_system(os(5, "Linux"))
    }

    #[test]
    fn test_dangling_os_mapping_is_dropped() {
        let with_dangling = base()
            .browser_os_mapping(BrowserOperatingSystemMapping { browser_id: 1, operating_system_id: 999 })
            .build();
        let without = base().build();

        assert_eq!(with_dangling, without);
        assert!(with_dangling.browser_os_mappings().is_empty());
        assert!(with_dangling.browsers()[&1].operating_system.is_none());
    }

    #[test]
    fn test_valid_mapping_is_resolved() {
        let data = base()
            .browser_os_mapping(BrowserOperatingSystemMapping { browser_id: 1, operating_system_id: 5 })
            .build();
        let linked = data.browsers()[&1].operating_system.as_ref().unwrap();
        assert_eq!(linked.family, "LINUX");
    }

    #[test]
    fn test_browser_with_unknown_type_is_dropped() {
        let data = base()
            .browser(browser(2, 42, "Orphan"))
            .browser_pattern(Pattern::from_perl(2, 2, 1, "/orphan/").unwrap())
            .build();

        assert!(!data.browsers().contains_key(&2));
        assert!(!data.browser_patterns().contains_key(&2));
        assert_eq!(data.browser_index().len(), 1);
    }

    #[test]
    fn test_index_is_sorted_by_position_then_text() {
        let data = base()
            .browser(browser(2, 1, "Chrome"))
            .browser_pattern(Pattern::from_perl(3, 2, 10, r"/chrome/").unwrap())
            .browser_pattern(Pattern::from_perl(4, 2, 2, r"/chromium/").unwrap())
            .build();

        let positions: Vec<(u32, &str)> = data
            .browser_index()
            .iter()
            .map(|(pattern, _)| (pattern.position, pattern.body()))
            .collect();
        assert_eq!(positions, vec![(2, "chromium"), (10, "chrome"), (10, r"firefox/([\d.]+)")]);
        assert_eq!(data.browser_patterns()[&2].len(), 2);
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(Data::empty().is_empty());
        assert!(!base().build().is_empty());
        assert!(!DataBuilder::new("1").build().is_empty());
    }
}
