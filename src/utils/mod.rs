//! 工具模块：自然序比较、Perl 正则转换、数据源读取
pub mod natural_order;
pub mod regex_converter;
pub mod url_reader;

// 导出核心接口
pub use self::natural_order::NaturalOrderComparator;
pub use self::regex_converter::RegexConverter;
pub use self::url_reader::UrlReader;
