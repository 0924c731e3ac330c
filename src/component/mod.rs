//! 组件系统模块
//!
//! 渲染边界上的场景组件：观察镜面球的相机和照亮它的光源。

mod camera;
mod component;
mod light;

pub use camera::{Camera, FrameUniforms};
pub use component::Component;
pub use light::{DirectionalLight, LightRig};
