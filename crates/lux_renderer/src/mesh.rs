//! Indexed triangle meshes.
//!
//! A mesh reports the index of the triangle it was hit on together with the
//! barycentric `uv` of the hit, and uses both to interpolate per-vertex
//! normals and texture coordinates when it resolves the surface.

use crate::{
    hittable::{Hittable, PrimitiveHit, SurfaceProperties},
    triangle::intersect_triangle,
    Color, Material, RenderError, RenderResult,
};
use lux_math::{Interval, Ray, Vec2, Vec3};

/// Triangle mesh sharing one material and base color.
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    normals: Option<Vec<Vec3>>,
    tex_coords: Option<Vec<Vec2>>,
    color: Color,
    material: Material,
}

impl TriangleMesh {
    /// Create a mesh from positions and triangle indices.
    ///
    /// Fails with [`RenderError::InvalidGeometry`] naming the first triangle
    /// that references a missing vertex.
    pub fn new(
        positions: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
        material: Material,
    ) -> RenderResult<Self> {
        if let Some(index) = triangles
            .iter()
            .position(|tri| tri.iter().any(|&i| i as usize >= positions.len()))
        {
            return Err(RenderError::InvalidGeometry { index });
        }

        log::debug!(
            "Created mesh with {} vertices, {} triangles",
            positions.len(),
            triangles.len()
        );

        Ok(Self {
            positions,
            triangles,
            normals: None,
            tex_coords: None,
            color: Color::ONE,
            material,
        })
    }

    /// Axis-aligned quad `corner`, `corner + u`, `corner + u + v`, `corner + v`.
    ///
    /// The face normal is `u x v`.
    pub fn quad(corner: Vec3, u: Vec3, v: Vec3, material: Material) -> Self {
        Self {
            positions: vec![corner, corner + u, corner + u + v, corner + v],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            normals: None,
            tex_coords: Some(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]),
            color: Color::ONE,
            material,
        }
    }

    /// Attach per-vertex normals for smooth shading.
    ///
    /// Ignored (with a warning) when the count does not match the vertices.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        if normals.len() == self.positions.len() {
            self.normals = Some(normals);
        } else {
            log::warn!(
                "Mesh has {} vertices but {} normals, using face normals",
                self.positions.len(),
                normals.len()
            );
        }
        self
    }

    /// Attach per-vertex texture coordinates.
    ///
    /// Ignored (with a warning) when the count does not match the vertices.
    pub fn with_tex_coords(mut self, tex_coords: Vec<Vec2>) -> Self {
        if tex_coords.len() == self.positions.len() {
            self.tex_coords = Some(tex_coords);
        } else {
            log::warn!(
                "Mesh has {} vertices but {} texture coordinates, ignoring them",
                self.positions.len(),
                tex_coords.len()
            );
        }
        self
    }

    /// Set the base color of the surface.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    fn vertices(&self, tri: [u32; 3]) -> [Vec3; 3] {
        tri.map(|i| self.positions[i as usize])
    }
}

/// Interpolate per-vertex attributes with barycentric `uv`.
#[inline]
fn interpolate<T>(values: [T; 3], uv: Vec2) -> T
where
    T: std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
{
    let [a, b, c] = values;
    a * (1.0 - uv.x - uv.y) + b * uv.x + c * uv.y
}

impl Hittable for TriangleMesh {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<PrimitiveHit> {
        let mut closest: Option<PrimitiveHit> = None;

        for (index, &tri) in self.triangles.iter().enumerate() {
            let interval = closest.map_or(ray_t, |c| ray_t.with_max(c.t));
            let [v0, v1, v2] = self.vertices(tri);
            if let Some((t, u, v)) = intersect_triangle(ray, interval, v0, v1, v2) {
                closest = Some(PrimitiveHit {
                    t,
                    index,
                    uv: Vec2::new(u, v),
                });
            }
        }

        closest
    }

    fn surface_properties(
        &self,
        _point: Vec3,
        _direction: Vec3,
        index: usize,
        uv: Vec2,
    ) -> Option<SurfaceProperties<'_>> {
        let tri = *self.triangles.get(index)?;

        let normal = match &self.normals {
            Some(normals) => interpolate(tri.map(|i| normals[i as usize]), uv),
            None => {
                let [v0, v1, v2] = self.vertices(tri);
                (v1 - v0).cross(v2 - v0)
            }
        };
        let tex_coords = match &self.tex_coords {
            Some(st) => interpolate(tri.map(|i| st[i as usize]), uv),
            None => uv,
        };

        Some(SurfaceProperties {
            normal: normal.normalize_or_zero(),
            tex_coords,
            color: self.color,
            material: Some(&self.material),
        })
    }
}
