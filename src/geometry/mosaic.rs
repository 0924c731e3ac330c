//! 镜面球马赛克生成器
//!
//! 把球面划分为若干纬度环，每个环按周长自适应地放置尺寸大致相同的方形镜片，
//! 并对每块镜片施加少量随机倾斜（模拟镜片粘贴不齐）。
//!
//! # 算法
//!
//! ```text
//! pitch      = 2 · (tile_size + tile_spacing)
//! ring_count = floor(2π · radius / pitch)        // 纬度步数
//! step0      = 2π / ring_count
//!
//! for i in -π/2, -π/2 + step0, ... < π/2:
//!     ring_radius = rotate_x((0, radius, 0), i).y
//!     tiles       = floor(2π · ring_radius / pitch)
//!     tiles == 0 && i > 0   → 停止（上半球已放不下镜片）
//!     tiles == 0 && i <= 0  → 跳过该环
//!     shift += step1 / 2                          // 相邻环错缝
//!     for j in 0, step1, ... < 2π - step1/2:
//!         抖动 → 绕镜片中心倾斜 → 按 (i, j + shift) 放置到球面
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::mesh::{Mesh, Tile, MAX_VERTICES, VERTICES_PER_TILE};
use super::random::{RandomSource, RngSource};
use crate::core::error::MeshError;
use crate::math::constants::{DEG_TO_RAD, HALF_PI, TAU};
use crate::math::{Axis, Color, Vec3};

/// 镜面球生成参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicParams {
    /// 球体半径
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// 镜片半宽
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,

    /// 镜片间距，缺省为 `tile_size / 15`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_spacing: Option<f32>,

    /// 最大抖动角（度），每个轴在 ±max/2 内均匀分布
    #[serde(default = "default_max_jitter_degrees")]
    pub max_jitter_degrees: f32,

    /// 随机种子，缺省使用系统熵
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_radius() -> f32 { 1.0 }
fn default_tile_size() -> f32 { 1.0 / 64.0 }
fn default_max_jitter_degrees() -> f32 { 10.0 }

impl Default for MosaicParams {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            tile_size: default_tile_size(),
            tile_spacing: None,
            max_jitter_degrees: default_max_jitter_degrees(),
            seed: None,
        }
    }
}

impl MosaicParams {
    /// 实际使用的镜片间距
    pub fn spacing(&self) -> f32 {
        self.tile_spacing.unwrap_or(self.tile_size / 15.0)
    }

    /// 相邻镜片中心的间隔
    pub fn pitch(&self) -> f32 {
        2.0 * (self.tile_size + self.spacing())
    }

    /// 纬度步数
    ///
    /// 参数无效或结果不为正时返回 `MeshError::InvalidConfiguration`。
    /// 步数超过 `MAX_VERTICES` 时，仅赤道附近的一环就已超出 u16 索引范围，
    /// 直接返回 `MeshError::IndexOverflow`（`vertex_count` 为下界估计）。
    pub fn ring_count(&self) -> Result<usize, MeshError> {
        self.check_ranges()?;

        let count = (TAU * self.radius / self.pitch()).floor();
        if count <= 0.0 {
            return Err(MeshError::InvalidConfiguration(format!(
                "tile size {} with spacing {} leaves no room on a sphere of radius {}",
                self.tile_size,
                self.spacing(),
                self.radius
            )));
        }

        if count > MAX_VERTICES as f32 {
            return Err(MeshError::IndexOverflow {
                vertex_count: (count as usize).saturating_mul(VERTICES_PER_TILE),
            });
        }

        Ok(count as usize)
    }

    fn check_ranges(&self) -> Result<(), MeshError> {
        let positive = |name: &str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(MeshError::InvalidConfiguration(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )))
            }
        };
        let non_negative = |name: &str, value: f32| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(MeshError::InvalidConfiguration(format!(
                    "{} must be a non-negative finite number, got {}",
                    name, value
                )))
            }
        };

        positive("radius", self.radius)?;
        positive("tile_size", self.tile_size)?;
        non_negative("tile_spacing", self.spacing())?;
        non_negative("max_jitter_degrees", self.max_jitter_degrees)
    }
}

/// 一个会放置镜片的纬度环
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPlan {
    /// 纬度角（弧度），范围 [-π/2, π/2)
    pub latitude: f32,

    /// 环上的镜片数
    pub tile_count: usize,

    /// 经度步长 `2π / tile_count`
    pub step: f32,

    /// 累积错缝偏移（已包含本环的 step / 2）
    pub shift: f32,
}

impl RingPlan {
    /// 环上每块镜片的经度（不含错缝偏移）
    ///
    /// 上界减去半步，避免浮点累积误差产生与第一块重叠的多余镜片。
    pub fn longitudes(&self) -> impl Iterator<Item = f32> {
        let step = self.step;
        (0..)
            .map(move |m| m as f32 * step)
            .take_while(move |&j| j < TAU - step / 2.0)
    }
}

/// 镜面球马赛克生成器
#[derive(Debug, Clone)]
pub struct MosaicGenerator {
    params: MosaicParams,
    ring_count: usize,
}

impl MosaicGenerator {
    /// 校验参数并创建生成器
    pub fn new(params: MosaicParams) -> Result<Self, MeshError> {
        let ring_count = params.ring_count()?;
        Ok(Self { params, ring_count })
    }

    pub fn params(&self) -> &MosaicParams {
        &self.params
    }

    /// 纬度步数
    pub fn ring_count(&self) -> usize {
        self.ring_count
    }

    /// 纬度步长 `2π / ring_count`
    pub fn latitude_step(&self) -> f32 {
        TAU / self.ring_count as f32
    }

    /// 给定纬度上能放下的镜片数（不会为负）
    pub fn tiles_at_latitude(&self, latitude: f32) -> usize {
        let radius = self.params.radius;
        let ring_radius = Vec3::new(0.0, radius, 0.0)
            .rotate_about(Vec3::ZERO, latitude, Axis::X)
            .y;
        let count = (TAU * ring_radius / self.params.pitch()).floor();
        count.max(0.0) as usize
    }

    /// 按从南到北的顺序列出所有放置镜片的环
    ///
    /// 下半球的空环被跳过，上半球遇到第一个空环即停止。
    pub fn ring_plan(&self) -> Vec<RingPlan> {
        let step0 = self.latitude_step();
        let mut rings = Vec::new();
        let mut shift = 0.0_f32;

        for k in 0.. {
            let latitude = -HALF_PI + k as f32 * step0;
            if latitude >= HALF_PI {
                break;
            }

            let tile_count = self.tiles_at_latitude(latitude);
            if tile_count == 0 {
                if latitude > 0.0 {
                    debug!(latitude, "no room for tiles near the north pole, stopping");
                    break;
                }
                trace!(latitude, "skipping empty ring");
                continue;
            }

            let step = TAU / tile_count as f32;
            shift += step / 2.0;
            trace!(latitude, tile_count, shift, "ring planned");

            rings.push(RingPlan {
                latitude,
                tile_count,
                step,
                shift,
            });
        }

        rings
    }

    /// 生成镜面球网格
    ///
    /// 每块镜片依次抽取 rx、rz 两个抖动值，再抽取 r、g、b 三个颜色分量。
    pub fn generate<S: RandomSource + ?Sized>(&self, source: &mut S) -> Result<Mesh, MeshError> {
        let _span = tracing::debug_span!("mosaic_generate").entered();

        let rings = self.ring_plan();
        let tile_total: usize = rings.iter().map(|r| r.tile_count).sum();
        let vertex_total = tile_total * VERTICES_PER_TILE;
        if vertex_total > MAX_VERTICES {
            return Err(MeshError::IndexOverflow {
                vertex_count: vertex_total,
            });
        }

        let mut mesh = Mesh::with_tile_capacity(tile_total);
        for ring in &rings {
            for longitude in ring.longitudes() {
                let tile = self.build_tile(ring, longitude, source);
                mesh.push_tile(&tile)?;
            }
        }

        info!(
            rings = rings.len(),
            tiles = mesh.tile_count(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "Mirror ball generated"
        );

        Ok(mesh)
    }

    /// 使用参数中的种子（或系统熵）生成
    pub fn generate_default(&self) -> Result<Mesh, MeshError> {
        match self.params.seed {
            Some(seed) => self.generate(&mut RngSource::seeded(seed)),
            None => self.generate(&mut RngSource::from_entropy()),
        }
    }

    /// 抖动角（弧度），在 ±max_jitter_degrees/2 内均匀分布
    fn jitter<S: RandomSource + ?Sized>(&self, source: &mut S) -> f32 {
        (source.next_unit() - 0.5) * self.params.max_jitter_degrees * DEG_TO_RAD
    }

    fn build_tile<S: RandomSource + ?Sized>(&self, ring: &RingPlan, longitude: f32, source: &mut S) -> Tile {
        let r = self.params.radius;
        let t = self.params.tile_size;
        let origin = Vec3::ZERO;
        let center = Vec3::new(0.0, r, 0.0);

        let rx = self.jitter(source);
        let rz = self.jitter(source);

        // 法线绕原点倾斜，角点绕镜片中心倾斜，中心位置不变
        let normal = Vec3::Y
            .rotate_about(origin, rx, Axis::X)
            .rotate_about(origin, rz, Axis::Z);
        let corners = [
            Vec3::new(-t, r, -t),
            Vec3::new(t, r, -t),
            Vec3::new(t, r, t),
            Vec3::new(-t, r, t),
        ]
        .map(|c| c.rotate_about(center, rx, Axis::X).rotate_about(center, rz, Axis::Z));

        let azimuth = longitude + ring.shift;
        let place = |p: Vec3| {
            p.rotate_about(origin, ring.latitude, Axis::X)
                .rotate_about(origin, azimuth, Axis::Z)
        };

        let color = Color::new(source.next_unit(), source.next_unit(), source.next_unit(), 1.0);

        Tile {
            corners: corners.map(place),
            normal: place(normal),
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::random::SequenceSource;

    fn large_tiles() -> MosaicParams {
        MosaicParams {
            tile_size: 0.5,
            ..MosaicParams::default()
        }
    }

    #[test]
    fn test_default_ring_count() {
        // 2π / (2 · (1/64 + 1/960)) = 60π ≈ 188.5
        let generator = MosaicGenerator::new(MosaicParams::default()).unwrap();
        assert_eq!(generator.ring_count(), 188);
    }

    #[test]
    fn test_south_pole_ring_is_skipped_not_aborted() {
        let generator = MosaicGenerator::new(MosaicParams::default()).unwrap();
        assert_eq!(generator.tiles_at_latitude(-HALF_PI), 0);

        let rings = generator.ring_plan();
        let step0 = generator.latitude_step();
        assert!(rings.len() > 90);
        assert!((rings[0].latitude - (-HALF_PI + step0)).abs() < 1e-6);
    }

    #[test]
    fn test_ring_plan_for_large_tiles() {
        let generator = MosaicGenerator::new(large_tiles()).unwrap();
        assert_eq!(generator.ring_count(), 5);

        let rings = generator.ring_plan();
        let counts: Vec<usize> = rings.iter().map(|r| r.tile_count).collect();
        assert_eq!(counts, vec![5, 3]);

        let expected_shift = TAU / 5.0 / 2.0 + TAU / 3.0 / 2.0;
        assert!((rings[1].shift - expected_shift).abs() < 1e-5);
        assert_eq!(rings[0].longitudes().count(), 5);
        assert_eq!(rings[1].longitudes().count(), 3);
    }

    #[test]
    fn test_ring_plan_stops_in_upper_hemisphere() {
        let generator = MosaicGenerator::new(MosaicParams::default()).unwrap();
        let rings = generator.ring_plan();
        let last = rings.last().unwrap();
        let next = last.latitude + generator.latitude_step();

        assert!(last.latitude > 0.0 && last.latitude < HALF_PI);
        assert!(next >= HALF_PI || generator.tiles_at_latitude(next) == 0);
        assert!(rings.windows(2).all(|w| w[0].latitude < w[1].latitude));
        assert!(rings.iter().all(|r| r.tile_count > 0));
    }

    #[test]
    fn test_mesh_invariants_for_default_ball() {
        let generator = MosaicGenerator::new(MosaicParams::default()).unwrap();
        let mesh = generator.generate(&mut RngSource::seeded(7)).unwrap();

        let floats = mesh.position_buffer().len();
        assert_eq!(floats % 12, 0);
        assert_eq!(mesh.indices().len(), floats / 3 / 4 * 6);
        assert!(mesh.indices().iter().all(|&i| (i as usize) < floats / 3));
        assert_eq!(mesh.normals().len(), mesh.vertices().len());
        assert!(mesh.validate().is_ok());

        let planned: usize = generator.ring_plan().iter().map(|r| r.tile_count).sum();
        assert_eq!(mesh.tile_count(), planned);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let params = MosaicParams {
            seed: Some(1234),
            ..large_tiles()
        };
        let generator = MosaicGenerator::new(params).unwrap();

        let a = generator.generate_default().unwrap();
        let b = generator.generate_default().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_jitter_places_tiles_on_sphere() {
        let generator = MosaicGenerator::new(MosaicParams::default()).unwrap();
        let mesh = generator.generate(&mut SequenceSource::constant(0.5)).unwrap();

        let t = generator.params().tile_size;
        let corner_distance = (1.0 + 2.0 * t * t).sqrt();
        for v in mesh.vertices() {
            assert!((v.length() - corner_distance).abs() < 1e-4);
        }

        for (quad, normal) in mesh.vertices().chunks_exact(4).zip(mesh.normals().iter().step_by(4)) {
            let center = (quad[0] + quad[1] + quad[2] + quad[3]) * 0.25;
            let radial = center.normalize().unwrap();
            assert!((normal.length() - 1.0).abs() < 1e-4);
            assert!(normal.dot(radial) > 0.9999);
        }
    }

    #[test]
    fn test_jitter_stays_within_bound() {
        let generator = MosaicGenerator::new(large_tiles()).unwrap();
        let mesh = generator.generate(&mut RngSource::seeded(99)).unwrap();

        // rx、rz 各不超过 5°，合成倾斜不超过约 7.08°
        let min_cos = (7.1_f32 * DEG_TO_RAD).cos();
        for (quad, normal) in mesh.vertices().chunks_exact(4).zip(mesh.normals().iter().step_by(4)) {
            let center = (quad[0] + quad[1] + quad[2] + quad[3]) * 0.25;
            let radial = center.normalize().unwrap();
            assert!(normal.dot(radial) >= min_cos);
            // 绕镜片中心倾斜不改变中心位置
            assert!((center.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_exact_jitter_and_colors_from_sequence() {
        let generator = MosaicGenerator::new(large_tiles()).unwrap();
        // 每块镜片：rx = -5°, rz = 0, 颜色 (0.1, 0.2, 0.3)
        let mesh = generator
            .generate(&mut SequenceSource::new([0.0, 0.5, 0.1, 0.2, 0.3]))
            .unwrap();

        assert_eq!(mesh.tile_count(), 8);
        assert!(mesh
            .face_colors()
            .iter()
            .all(|c| *c == Color::new(0.1, 0.2, 0.3, 1.0)));

        let ring = generator.ring_plan()[0];
        let rx = -5.0 * DEG_TO_RAD;
        let expected = Vec3::new(0.0, rx.cos(), rx.sin())
            .rotate_about(Vec3::ZERO, ring.latitude, Axis::X)
            .rotate_about(Vec3::ZERO, ring.shift, Axis::Z);
        assert!((mesh.normals()[0] - expected).length() < 1e-5);
    }

    #[test]
    fn test_invalid_configuration() {
        let too_big = MosaicParams {
            tile_size: 4.0,
            ..MosaicParams::default()
        };
        assert!(matches!(
            MosaicGenerator::new(too_big),
            Err(MeshError::InvalidConfiguration(_))
        ));

        let negative = MosaicParams {
            radius: -1.0,
            ..MosaicParams::default()
        };
        assert!(matches!(
            MosaicGenerator::new(negative),
            Err(MeshError::InvalidConfiguration(_))
        ));

        let nan_spacing = MosaicParams {
            tile_spacing: Some(f32::NAN),
            ..MosaicParams::default()
        };
        assert!(MosaicGenerator::new(nan_spacing).is_err());
    }

    #[test]
    fn test_tiny_tiles_overflow_u16_indices() {
        let params = MosaicParams {
            tile_size: 1.0 / 256.0,
            ..MosaicParams::default()
        };
        let generator = MosaicGenerator::new(params).unwrap();
        let result = generator.generate(&mut SequenceSource::constant(0.5));

        match result {
            Err(MeshError::IndexOverflow { vertex_count }) => assert!(vertex_count > MAX_VERTICES),
            other => panic!("expected IndexOverflow, got {:?}", other.map(|m| m.vertex_count())),
        }
    }

    #[test]
    fn test_huge_radius_reports_overflow() {
        let params = MosaicParams {
            radius: f32::MAX,
            ..MosaicParams::default()
        };
        match MosaicGenerator::new(params) {
            Err(MeshError::IndexOverflow { vertex_count }) => assert!(vertex_count > MAX_VERTICES),
            other => panic!("expected IndexOverflow, got {:?}", other.map(|g| g.ring_count())),
        }

        let params = MosaicParams {
            radius: 1e30,
            ..MosaicParams::default()
        };
        assert!(matches!(
            params.ring_count(),
            Err(MeshError::IndexOverflow { .. })
        ));
    }

    #[test]
    fn test_generate_accepts_unsized_source() {
        let generator = MosaicGenerator::new(large_tiles()).unwrap();
        let mut seeded = RngSource::seeded(5);
        let source: &mut dyn RandomSource = &mut seeded;

        let mesh = generator.generate(source).unwrap();
        assert_eq!(mesh.tile_count(), 8);
    }

    #[test]
    fn test_params_spacing_default() {
        let params = MosaicParams::default();
        assert_eq!(params.spacing(), params.tile_size / 15.0);

        let explicit = MosaicParams {
            tile_spacing: Some(0.0),
            ..MosaicParams::default()
        };
        assert_eq!(explicit.pitch(), 2.0 * explicit.tile_size);
    }
}
