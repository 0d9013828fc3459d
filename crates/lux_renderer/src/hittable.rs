//! Scene query contract and the hit record consumed by the integrator.
//!
//! Objects answer two questions: where does a ray first hit me
//! ([`Hittable::intersect`]), and what does the surface look like there
//! ([`Hittable::surface_properties`]). A [`Scene`] only exposes the closest
//! hit over all of its objects.

use crate::{Color, Material, RenderError, RenderResult};
use lux_math::{Interval, Ray, Vec2, Vec3};

/// Closest hit on a single object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveHit {
    /// Ray parameter of the hit
    pub t: f32,
    /// Primitive within the object (triangle index for meshes, 0 otherwise)
    pub index: usize,
    /// Barycentric or parametric coordinates of the hit
    pub uv: Vec2,
}

/// What an object reports about its surface at a hit point.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceProperties<'a> {
    /// Outward surface normal
    pub normal: Vec3,
    /// Texture coordinates
    pub tex_coords: Vec2,
    /// Base color of the surface
    pub color: Color,
    /// Material of the surface, if one could be resolved
    pub material: Option<&'a Material>,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Find the closest hit of `ray` with this object inside `ray_t`.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<PrimitiveHit>;

    /// Resolve shading data for a hit previously reported by `intersect`.
    ///
    /// Returns `None` when `index`/`uv` do not describe a point on this object.
    fn surface_properties(
        &self,
        point: Vec3,
        direction: Vec3,
        index: usize,
        uv: Vec2,
    ) -> Option<SurfaceProperties<'_>>;
}

/// The single query the integrator needs from a scene.
pub trait Scene: Send + Sync {
    /// Closest hit of `ray` inside `ray_t`, over every object in the scene.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>>;
}

/// Closest scene hit, along with the object that was hit.
#[derive(Clone, Copy)]
pub struct Intersection<'a> {
    pub hit: PrimitiveHit,
    pub object: &'a dyn Hittable,
}

impl<'a> Intersection<'a> {
    /// Resolve the full hit record for `ray`.
    ///
    /// Fails with [`RenderError::InvalidGeometry`] when the object cannot
    /// describe the hit point and with [`RenderError::InvalidMaterial`] when
    /// the surface has no material.
    pub fn resolve(&self, ray: &Ray) -> RenderResult<HitRecord<'a>> {
        let PrimitiveHit { t, index, uv } = self.hit;
        let point = ray.at(t);

        let props = self
            .object
            .surface_properties(point, ray.direction(), index, uv)
            .ok_or(RenderError::InvalidGeometry { index })?;
        let normal = props
            .normal
            .try_normalize()
            .ok_or(RenderError::InvalidGeometry { index })?;
        let material = props.material.ok_or(RenderError::InvalidMaterial { index })?;

        Ok(HitRecord {
            t,
            uv,
            index,
            point,
            normal,
            front_face: ray.direction().dot(normal) < 0.0,
            tex_coords: props.tex_coords,
            color: props.color,
            material,
        })
    }
}

/// Record of a ray-object intersection.
///
/// Lives for a single `cast_ray` call.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Barycentric/parametric coordinates reported by the object
    pub uv: Vec2,
    /// Primitive index reported by the object
    pub index: usize,
    /// Point of intersection
    pub point: Vec3,
    /// Outward unit normal as reported by the object
    pub normal: Vec3,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Texture coordinates
    pub tex_coords: Vec2,
    /// Base color of the surface
    pub color: Color,
    /// Material at the intersection point
    pub material: &'a Material,
}

impl HitRecord<'_> {
    /// The normal flipped to face against the incoming ray.
    #[inline]
    pub fn facing_normal(&self) -> Vec3 {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// A list of hittable objects.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Add an object, builder style.
    pub fn with(mut self, object: impl Hittable + 'static) -> Self {
        self.add(Box::new(object));
        self
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for HittableList {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>> {
        let mut closest: Option<Intersection<'_>> = None;

        for object in &self.objects {
            let interval = closest.map_or(ray_t, |c| ray_t.with_max(c.hit.t));
            if let Some(hit) = object.intersect(ray, interval) {
                closest = Some(Intersection {
                    hit,
                    object: object.as_ref(),
                });
            }
        }

        closest
    }
}
