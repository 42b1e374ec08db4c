//! 文字排版辅助
//!
//! 页面使用 PDF 标准 14 字体（Helvetica 系列），无需嵌入字体文件。
//! 宽度按 Helvetica AFM 字宽估算，粗体也按常规字宽处理，仅用于居中摆放。

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Helvetica 字宽（1/1000 em），覆盖 ASCII 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// 非 ASCII 字符的估算字宽
const FALLBACK_WIDTH: u16 = 556;

/// 估算文字宽度（与字号同单位）
pub fn text_width(text: &str, size: f64) -> f64 {
    let units: u32 = text
        .chars()
        .map(|c| match c {
            ' '..='~' => HELVETICA_WIDTHS[c as usize - 32] as u32,
            '\u{2014}' => 1000,
            '\u{2013}' => 556,
            _ => FALLBACK_WIDTH as u32,
        })
        .sum();
    units as f64 / 1000.0 * size
}

/// 编码为 WinAnsiEncoding 字节，无法表示的字符替换为 `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{0020}'..='\u{007E}' | '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

/// 时间戳：中等日期 + 短时间，如 `Oct 18, 2026 at 3:04 PM`
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format("%b %-d, %Y at %-I:%M %p").to_string()
}
