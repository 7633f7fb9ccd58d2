//! 每个窗口的视图状态
//!
//! 投影矩阵只在宽高比变化时重新计算；模型矩阵每帧由累积的旋转角重新生成。
//! 颜色、光照方向、距离和旋转参数由 GUI 修改。

use crate::core::config::SceneConfig;
use crate::core::math::{self, ClippingRange, Float4x4};

use super::SceneUniforms;

/// 模型旋转轴（归一化前）
pub const ROTATION_AXIS: [f32; 3] = [1.0, 1.0, 1.0];

/// 旋转模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// 按速度自动累积角度
    Automatic,
    /// 直接使用手动设定的角度
    Manual,
}

/// 视图：一个窗口内场景的全部可变状态
#[derive(Debug, Clone)]
pub struct View {
    pub projection: Float4x4,
    pub model: Float4x4,
    pub color: [f32; 4],
    /// 指向光源的单位向量
    pub light: [f32; 3],
    pub distance: f32,
    pub rotation_mode: RotationMode,
    pub rotate_speed: f32,
    pub manual_angle: f32,
    /// 当前旋转角，范围 [0, 2π)
    pub angle: f32,

    fov: f32,
    near: f32,
    far: f32,
    clipping: ClippingRange,
}

impl View {
    pub fn new(config: &SceneConfig, clipping: ClippingRange, width: u32, height: u32) -> Self {
        let mut view = Self {
            projection: math::IDENTITY,
            model: math::IDENTITY,
            color: config.color,
            light: config.light_direction(),
            distance: config.distance,
            rotation_mode: RotationMode::Automatic,
            rotate_speed: config.rotate_speed,
            manual_angle: 0.0,
            angle: 0.0,
            fov: config.fov,
            near: config.near,
            far: config.far,
            clipping,
        };
        view.update_projection(width, height);
        view.update_model();
        view
    }

    /// 按新的窗口尺寸重新计算投影矩阵
    ///
    /// 高度为零（窗口最小化）时保留原矩阵。
    pub fn update_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let aspect = width as f32 / height as f32;
        self.projection =
            math::perspective_projection(aspect, self.near, self.far, self.fov, self.clipping);
    }

    /// 推进 `dt` 秒并重建模型矩阵
    pub fn advance(&mut self, dt: f32) {
        self.angle = match self.rotation_mode {
            RotationMode::Automatic => math::wrap_angle(self.angle + self.rotate_speed * dt * 10.0),
            RotationMode::Manual => self.manual_angle,
        };
        self.update_model();
    }

    /// 设置光照方向，零向量会被拒绝
    ///
    /// 返回是否接受了新的方向。
    pub fn set_light(&mut self, light: [f32; 3]) -> bool {
        match math::try_normalize(light) {
            Some(unit) => {
                self.light = unit;
                true
            }
            None => false,
        }
    }

    fn update_model(&mut self) {
        math::model_rotation(&mut self.model, ROTATION_AXIS, self.angle);
        self.model[3] = [0.0, 0.0, self.distance, 1.0];
    }

    /// 本帧上传到 uniform 缓冲的数据
    pub fn uniforms(&self) -> SceneUniforms {
        SceneUniforms {
            vp_matrix: self.projection,
            w_matrix: self.model,
            color: self.color,
            light_vec: [self.light[0], self.light[1], self.light[2], 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
    use nalgebra::Matrix4;

    fn view() -> View {
        View::new(&SceneConfig::default(), ClippingRange::ZeroToOne, 1280, 768)
    }

    #[test]
    fn test_automatic_angle_stays_wrapped() {
        let mut view = view();
        view.rotate_speed = 3.0;
        for step in 0..200 {
            view.advance(0.016 * step as f32);
            assert!(view.angle >= 0.0 && view.angle < math::TAU);
        }
    }

    #[test]
    fn test_manual_mode_uses_manual_angle() {
        let mut view = view();
        view.rotation_mode = RotationMode::Manual;
        view.manual_angle = 1.25;
        view.advance(10.0);
        view.advance(10.0);
        assert_eq!(view.angle, 1.25);
    }

    #[test]
    fn test_rotation_inverse_is_identity() {
        for theta in [0.0, FRAC_PI_4, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            let mut forward = math::IDENTITY;
            let mut backward = math::IDENTITY;
            math::model_rotation(&mut forward, ROTATION_AXIS, theta);
            math::model_rotation(&mut backward, ROTATION_AXIS, -theta);

            let product = Matrix4::from(forward) * Matrix4::from(backward);
            assert!((product - Matrix4::identity()).abs().max() < 1e-5);
        }
    }

    #[test]
    fn test_model_translation_uses_distance() {
        let mut view = view();
        view.distance = 7.5;
        view.advance(0.0);
        assert_eq!(view.model[3], [0.0, 0.0, 7.5, 1.0]);
    }

    #[test]
    fn test_zero_sized_resize_keeps_projection() {
        let mut view = view();
        let before = view.projection;
        view.update_projection(1280, 0);
        assert_eq!(view.projection, before);
    }

    #[test]
    fn test_zero_light_is_rejected() {
        let mut view = view();
        let before = view.light;
        assert!(!view.set_light([0.0, 0.0, 0.0]));
        assert_eq!(view.light, before);

        assert!(view.set_light([0.0, 2.0, 0.0]));
        assert_eq!(view.light, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_uniforms_layout() {
        let view = view();
        let uniforms = view.uniforms();
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 160);
        assert_eq!(uniforms.light_vec[3], 0.0);
        assert_eq!(uniforms.w_matrix, view.model);
    }
}
