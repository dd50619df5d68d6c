/// Pagination window: skip `start` rows, return at most `length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub start: u64,
    pub length: u64,
}

impl Limit {
    pub fn new(start: u64, length: u64) -> Self {
        Self { start, length }
    }

    /// `LIMIT start, length`, for SELECT.
    pub fn build_sql(&self) -> String {
        format!("LIMIT {}, {}", self.start, self.length)
    }
}
