//! Smart-object warp descriptors (§4.6 "Smart-object layer", GLOSSARY
//! "Warp"): the parametric deformation applied to a linked source image
//! when a smart object is evaluated into its in-document channels.
//!
//! Evaluating a warp against pixels (`warp_apply`) is out of scope — §0
//! Non-goals names it as an external pure function,
//! `warp_apply(src_buffer, mesh) -> dst_buffer` — so this module only
//! models the mesh data the transform operations mutate, not the resampling
//! math itself.

/// The quadrilateral a smart object's source image is placed onto, before
/// any warp mesh is applied. Move/rotate/scale/resize all edit these
/// corners (§4.6 "Transforms... operate on the warp's corner/affine data").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    /// Corners in `(x, y)` document space, ordered top-left, top-right,
    /// bottom-right, bottom-left.
    pub points: [(f64, f64); 4],
}

impl Corners {
    /// An axis-aligned rectangle's corners.
    pub fn rect(left: f64, top: f64, right: f64, bottom: f64) -> Corners {
        Corners {
            points: [(left, top), (right, top), (right, bottom), (left, bottom)],
        }
    }

    /// Translate every corner by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for (x, y) in &mut self.points {
            *x += dx;
            *y += dy;
        }
    }

    /// Scale every corner about `(origin_x, origin_y)` by `(sx, sy)`.
    pub fn scale(&mut self, origin_x: f64, origin_y: f64, sx: f64, sy: f64) {
        for (x, y) in &mut self.points {
            *x = origin_x + (*x - origin_x) * sx;
            *y = origin_y + (*y - origin_y) * sy;
        }
    }

    /// Rotate every corner about `(origin_x, origin_y)` by `radians`.
    pub fn rotate(&mut self, origin_x: f64, origin_y: f64, radians: f64) {
        let (sin, cos) = radians.sin_cos();
        for (x, y) in &mut self.points {
            let dx = *x - origin_x;
            let dy = *y - origin_y;
            *x = origin_x + dx * cos - dy * sin;
            *y = origin_y + dx * sin + dy * cos;
        }
    }

    /// The axis-aligned bounding box of the four corners, as
    /// `(left, top, right, bottom)`.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        let xs = self.points.map(|p| p.0);
        let ys = self.points.map(|p| p.1);
        (
            xs.iter().cloned().fold(f64::INFINITY, f64::min) as i32,
            ys.iter().cloned().fold(f64::INFINITY, f64::min) as i32,
            xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max) as i32,
            ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max) as i32,
        )
    }
}

/// A warp mesh: either the classic 4x4 control-point grid ("normal" warp)
/// or an arbitrary N x M "quilt" warp subdividing the image into more
/// panels.
#[derive(Debug, Clone, PartialEq)]
pub enum Warp {
    /// A 4x4 grid of control points (16 total), Photoshop's standard warp.
    Normal {
        /// Row-major control points, 16 entries.
        mesh: Vec<(f64, f64)>,
    },
    /// An arbitrary `rows x cols` grid of control points.
    Quilt {
        rows: usize,
        cols: usize,
        /// Row-major control points, `rows * cols` entries.
        mesh: Vec<(f64, f64)>,
    },
}

impl Warp {
    /// An identity 4x4 warp over `corners`.
    pub fn identity_normal(corners: Corners) -> Warp {
        let mut mesh = Vec::with_capacity(16);
        for row in 0..4 {
            for col in 0..4 {
                let u = col as f64 / 3.0;
                let v = row as f64 / 3.0;
                let top = lerp(corners.points[0], corners.points[1], u);
                let bottom = lerp(corners.points[3], corners.points[2], u);
                mesh.push(lerp(top, bottom, v));
            }
        }
        Warp::Normal { mesh }
    }

    /// Whether this warp is a no-op (every control point sits on a regular
    /// grid interpolated from `corners`), used to skip re-evaluation when a
    /// smart object has never been warped.
    pub fn is_identity(&self, corners: &Corners) -> bool {
        *self == Warp::identity_normal(*corners)
    }
}

fn lerp(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}
