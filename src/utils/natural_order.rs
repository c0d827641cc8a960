//! 自然序比较工具
//! 将连续数字视为一个整体参与比较，使 "img2" < "img10"
//!
//! 数字块先比较长度，长度相同再逐字符比较，因此前导零会增加权重：
//! "0" < "1" < "00" < "01" < "10"。
//! `None` 视为最小值，两个 `None` 相等，正反两个方向结果一致。

use std::cmp::Ordering;

/// 自然序比较器
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalOrderComparator;

impl NaturalOrderComparator {
    /// 比较两个可空字符串（None 小于任何非空值）
    pub fn compare(a: Option<&str>, b: Option<&str>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => Self::compare_str(a, b),
        }
    }

    /// 比较两个字符串
    pub fn compare_str(a: &str, b: &str) -> Ordering {
        let mut left = Chunks { rest: a };
        let mut right = Chunks { rest: b };

        loop {
            match (left.next(), right.next()) {
                (Some(x), Some(y)) => {
                    let result = Self::compare_chunk(x, y);
                    if result != Ordering::Equal {
                        return result;
                    }
                }
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
            }
        }
    }

    /// 判断 `candidate` 是否严格新于 `current`
    pub fn is_newer(candidate: &str, current: &str) -> bool {
        Self::compare_str(candidate, current) == Ordering::Greater
    }

    fn compare_chunk(x: &str, y: &str) -> Ordering {
        if is_digit_chunk(x) && is_digit_chunk(y) {
            x.len().cmp(&y.len()).then_with(|| x.cmp(y))
        } else {
            x.cmp(y)
        }
    }
}

fn is_digit_chunk(chunk: &str) -> bool {
    chunk.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

/// 按「数字/非数字」切分的块迭代器
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digit)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}
