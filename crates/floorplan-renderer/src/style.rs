//! 平面图配色

use serde::{Deserialize, Serialize};

/// RGBA颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// 从十六进制值创建（如 0xFF0000 表示红色）
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 255,
        }
    }

    /// 转换为 [0.0, 1.0] 范围的 RGB 分量
    pub fn to_unit_rgb(&self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    /// CSS `rgb(...)` 表示
    pub fn to_css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const ACCENT_BLUE: Color = Color::from_hex(0x007AFF);
    pub const SECONDARY_GRAY: Color = Color::from_hex(0x8A8A8E);
}

/// 平面图样式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanStyle {
    /// 墙线
    pub wall: Color,
    /// 长度标注（与正文区分的强调色）
    pub label: Color,
    /// 正文
    pub text: Color,
    /// 次要文字（时间戳、免责声明）
    pub secondary_text: Color,
}

impl Default for PlanStyle {
    fn default() -> Self {
        Self {
            wall: Color::BLACK,
            label: Color::ACCENT_BLUE,
            text: Color::BLACK,
            secondary_text: Color::SECONDARY_GRAY,
        }
    }
}
