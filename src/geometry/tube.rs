use glam::Vec3;
use std::f32::consts::TAU;

use super::mesh::{Mesh, MeshVertex};
use super::spline::ClosedCatmullRom;

pub const TUBULAR_SEGMENTS: usize = 100;
pub const RADIAL_SEGMENTS: usize = 100;
pub const TUBE_RADIUS: f32 = 0.4;

/// A point along the path with its rotation-minimizing frame
#[derive(Clone, Copy)]
struct PathFrame {
    pos: Vec3,
    tangent: Vec3,
    normal: Vec3,
    binormal: Vec3,
}

/// Sweep a circular cross-section along a closed path.
///
/// The vertex grid is (tubular + 1) × (radial + 1): the closing ring and the
/// radial seam duplicate their start so texture coordinates can run 0..1.
pub fn build_tube(
    path: &ClosedCatmullRom,
    tubular_segments: usize,
    radius: f32,
    radial_segments: usize,
) -> Mesh {
    let frames = compute_frames(path, tubular_segments);

    let mut vertices = Vec::with_capacity((tubular_segments + 1) * (radial_segments + 1));
    for (i, frame) in frames.iter().enumerate() {
        for j in 0..=radial_segments {
            let angle = TAU * j as f32 / radial_segments as f32;
            let dir = frame.normal * angle.cos() + frame.binormal * angle.sin();

            vertices.push(MeshVertex {
                position: (frame.pos + dir * radius).to_array(),
                normal: dir.to_array(),
                uv: [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
            });
        }
    }

    let mut indices = Vec::with_capacity(tubular_segments * radial_segments * 6);
    let ring = (radial_segments + 1) as u32;
    for i in 0..tubular_segments as u32 {
        for j in 0..radial_segments as u32 {
            let a = ring * i + j;
            let b = ring * (i + 1) + j;
            let c = b + 1;
            let d = a + 1;

            indices.extend_from_slice(&[a, b, d]);
            indices.extend_from_slice(&[b, c, d]);
        }
    }

    Mesh { vertices, indices }
}

/// Rotation minimizing frames via the double reflection method
/// (Wang et al. 2008), with the residual twist spread over the rings so the
/// closing frame lands back on the opening one.
fn compute_frames(path: &ClosedCatmullRom, segments: usize) -> Vec<PathFrame> {
    let mut frames = Vec::with_capacity(segments + 1);

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        frames.push(PathFrame {
            pos: path.point(t),
            tangent: path.tangent(t).normalize(),
            normal: Vec3::ZERO,
            binormal: Vec3::ZERO,
        });
    }

    // Initialize first frame from an arbitrary non-parallel axis
    let t0 = frames[0].tangent;
    let arbitrary = if t0.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    frames[0].normal = t0.cross(arbitrary).normalize();
    frames[0].binormal = t0.cross(frames[0].normal).normalize();

    for i in 0..segments {
        let (x_i, t_i, r_i) = (frames[i].pos, frames[i].tangent, frames[i].normal);
        let b_i = frames[i].binormal;
        let (x_i1, t_i1) = (frames[i + 1].pos, frames[i + 1].tangent);

        let v1 = x_i1 - x_i;
        let c1 = v1.dot(v1);
        if c1 < 1e-10 {
            frames[i + 1].normal = r_i;
            frames[i + 1].binormal = b_i;
            continue;
        }

        let r_i_l = r_i - (2.0 / c1) * v1.dot(r_i) * v1;
        let t_i_l = t_i - (2.0 / c1) * v1.dot(t_i) * v1;

        let v2 = t_i1 - t_i_l;
        let c2 = v2.dot(v2);
        let r_i1 = if c2 < 1e-10 {
            r_i_l
        } else {
            r_i_l - (2.0 / c2) * v2.dot(r_i_l) * v2
        };

        let r_i1 = (r_i1 - t_i1 * t_i1.dot(r_i1)).normalize();
        frames[i + 1].normal = r_i1;
        frames[i + 1].binormal = t_i1.cross(r_i1).normalize();
    }

    // The propagated end frame is generally twisted relative to the start;
    // unroll that twist progressively so the seam welds.
    let start = frames[0];
    let end = frames[segments];
    let twist = end
        .normal
        .dot(start.normal)
        .clamp(-1.0, 1.0)
        .acos()
        .copysign(end.normal.cross(start.normal).dot(start.tangent));

    for (i, frame) in frames.iter_mut().enumerate() {
        let angle = twist * i as f32 / segments as f32;
        frame.normal = rotate_about(frame.normal, frame.tangent, angle);
        frame.binormal = frame.tangent.cross(frame.normal).normalize();
    }

    frames
}

/// Rodrigues rotation of `v` about unit `axis` by `angle`
fn rotate_about(v: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    v * cos + axis.cross(v) * sin + axis * axis.dot(v) * (1.0 - cos)
}
