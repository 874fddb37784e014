use glam::Vec3;

/// Half-line used for pointer picking. `dir` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Distance along the ray to the first sphere surface crossing ahead of
    /// the origin. An origin inside the sphere reports the exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        if radius <= 0.0 {
            return None;
        }
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let t1 = -b - root;
        let t2 = -b + root;
        if t1 >= 0.0 {
            Some(t1)
        } else if t2 >= 0.0 {
            Some(t2)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_sphere_ahead() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::new(0.0, 0.0, -10.0), 2.0).unwrap();
        assert!((t - 8.0).abs() < 1e-5);
    }

    #[test]
    fn misses_sphere_to_the_side() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(ray.intersect_sphere(Vec3::new(5.0, 0.0, -10.0), 2.0).is_none());
    }

    #[test]
    fn ignores_sphere_behind() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(ray.intersect_sphere(Vec3::new(0.0, 0.0, 10.0), 2.0).is_none());
    }

    #[test]
    fn origin_inside_reports_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = ray.intersect_sphere(Vec3::ZERO, 3.0).unwrap();
        assert!((t - 3.0).abs() < 1e-5);
    }
}
