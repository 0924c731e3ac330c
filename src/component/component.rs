//! 组件基类

/// 组件 trait
///
/// 场景中随时间变化的对象（相机、光源）的基础接口
pub trait Component {
    /// 获取组件名称
    fn name(&self) -> &str;

    /// 每帧更新（可选实现）
    ///
    /// `delta_time` 为距上一帧的秒数。
    fn tick(&mut self, _delta_time: f32) {}
}
