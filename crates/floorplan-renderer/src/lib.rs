//! FloorPlanPro 渲染
//!
//! 把投影结果适配到任意绘制表面，输出表面坐标下的绘制指令。
//!
//! # 特点
//!
//! - **均匀缩放**：两轴共用一个比例，不改变几何长宽比
//! - **共用算法**：交互画布与固定页面文档只在参数上不同
//! - **无状态**：每帧从投影结果重新计算

pub mod camera;
pub mod fit;
pub mod style;
pub mod transform;

pub use camera::PlanCamera;
pub use fit::{fit, DrawCommand, FitRequest, Inset, PlanFrame};
pub use style::{Color, PlanStyle};
pub use transform::ViewTransform;
