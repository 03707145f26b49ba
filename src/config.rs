/// Year assumed for the first release date of a file.
pub const DEFAULT_BASE_YEAR: i32 = 2020;

/// Secondary dates further than this from their release date are reported.
pub const DEFAULT_WARN_THRESHOLD_DAYS: i64 = 150;

/// Encoding of the files the agency publishes.
pub const DEFAULT_ENCODING: &str = "shift_jis";

pub const DEFAULT_OUTPUT_SUFFIX: &str = "_c";

/// Labels appended to the header row, in column order.
pub const APPENDED_LABELS: [&str; 3] = ["リリース日YMD", "発症日YMD", "確定日YMD"];

// ── Positional schema ──────────────────────────────────────────────
//
//  0: リリース日   1: 居住地   2: 年代   3: 性別   4: 属性(職業等)
//  5: 渡航歴       6: 接触歴   7: 発症日 8: 確定日 9: 重症  10: 退院等

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub release: usize,
    pub onset: usize,
    pub confirmed: usize,
}

impl FieldLayout {
    /// Minimum number of fields a data row must carry.
    pub fn width(&self) -> usize {
        self.release.max(self.onset).max(self.confirmed) + 1
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            release: 0,
            onset: 7,
            confirmed: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_year: i32,
    pub warn_threshold_days: i64,
    pub encoding: String,
    pub output_suffix: String,
    pub layout: FieldLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_year: DEFAULT_BASE_YEAR,
            warn_threshold_days: DEFAULT_WARN_THRESHOLD_DAYS,
            encoding: DEFAULT_ENCODING.to_string(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            layout: FieldLayout::default(),
        }
    }
}
