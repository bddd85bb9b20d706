use std::fmt::Display;
use std::ops::Range;

/// 批次：组件列表中一段连续的半开区间 `[start, end)`，以起始偏移标识
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub start: usize,
    pub end: usize,
}

impl Batch {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// 取出本批对应的元素
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range()]
    }

    /// 批次编号（从 1 开始）
    pub fn number(&self, batch_size: usize) -> usize {
        self.start / batch_size + 1
    }
}

impl Display for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "[{}, {})", self.start, self.end)
        } else {
            write!(f, "[{}-{}]", self.start, self.end - 1)
        }
    }
}
