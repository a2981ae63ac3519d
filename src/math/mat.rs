//! 4x4 matrices in row-vector convention.
//!
//! Points are transformed as `p · M`; the translation lives in the last row.
//! This is the layout WGSL expects when the matrix is uploaded verbatim.

use crate::math::deg_to_rad;
use crate::math::vec::Vec3;

#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Mat4 {
    pub fn identity() -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, tz, 1.0],
        ])
    }

    /// Rotation about the X axis. Positive angles tip +Z towards -Y.
    pub fn rotation_x(degrees: f32) -> Mat4 {
        let c = deg_to_rad(degrees).cos();
        let s = deg_to_rad(degrees).sin();
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Y axis. Positive angles turn +Z towards +X (yaw right).
    pub fn rotation_y(degrees: f32) -> Mat4 {
        let c = deg_to_rad(degrees).cos();
        let s = deg_to_rad(degrees).sin();
        Mat4([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Returns `self · rhs`: apply `self` first, then `rhs`.
    pub fn multiply(&self, rhs: &Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[i][k] * rhs.0[k][j]).sum();
            }
        }
        Mat4(result)
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.0;
        let v = [p.x(), p.y(), p.z(), 1.0];
        let mut out = [0.0_f32; 4];
        for (j, cell) in out.iter_mut().enumerate() {
            *cell = (0..4).map(|k| v[k] * m[k][j]).sum();
        }
        Vec3::new(out[0], out[1], out[2])
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(matrix: [[f32; 4]; 4]) -> Self {
        Mat4(matrix)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(matrix: Mat4) -> Self {
        matrix.0
    }
}
