//! 长度显示
//!
//! 平面图只使用米制：保留两位小数并附加 `" m"` 后缀。

/// 长度标注后缀
pub const METER_SUFFIX: &str = " m";

/// 格式化墙体长度标注，如 `3.00 m`
pub fn format_meters(meters: f64) -> String {
    format!("{:.2}{}", meters, METER_SUFFIX)
}
