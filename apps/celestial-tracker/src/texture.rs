//! Procedural fallback surfaces, used whenever no external image is available
//! for a body. Output is a deterministic equirectangular RGBA8 image: the same
//! name and size always produce the same bytes.

use std::f32::consts::{PI, TAU};
use std::fmt::Display;

use glam::{Vec2, Vec3};

pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_HEIGHT: u32 = 256;

/// Row-major RGBA8 image, `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Non-empty and the pixel buffer matches the stated size.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == self.width as usize * self.height as usize * 4
    }

    /// RGBA at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Surface family picked from a body name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPattern {
    Corona,
    Cratered,
    CloudSwirl,
    OceanWorld,
    Desert,
    BandedGiant,
    RingWorld,
    SoftIce,
    TurbulentIce,
    /// Unknown name: a single color derived from the name hash.
    Flat(u32),
}

impl BodyPattern {
    pub fn for_name(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "sun" => BodyPattern::Corona,
            "mercury" | "moon" => BodyPattern::Cratered,
            "venus" => BodyPattern::CloudSwirl,
            "earth" => BodyPattern::OceanWorld,
            "mars" => BodyPattern::Desert,
            "jupiter" => BodyPattern::BandedGiant,
            "saturn" => BodyPattern::RingWorld,
            "uranus" => BodyPattern::SoftIce,
            "neptune" => BodyPattern::TurbulentIce,
            _ => BodyPattern::Flat(name_hash(&lower)),
        }
    }
}

pub fn generate_texture(name: &str) -> TextureImage {
    generate_texture_sized(name, DEFAULT_WIDTH, DEFAULT_HEIGHT)
}

pub fn generate_texture_sized(name: &str, width: u32, height: u32) -> TextureImage {
    let pattern = BodyPattern::for_name(name);
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        let v = (y as f32 + 0.5) / height.max(1) as f32;
        for x in 0..width {
            let u = (x as f32 + 0.5) / width.max(1) as f32;
            let c = shade(pattern, Vec2::new(u, v)).clamp(Vec3::ZERO, Vec3::ONE);
            pixels.extend_from_slice(&[
                (c.x * 255.0).round() as u8,
                (c.y * 255.0).round() as u8,
                (c.z * 255.0).round() as u8,
                255,
            ]);
        }
    }
    TextureImage { width, height, pixels }
}

/// Prefer a fetched image when it is usable, else fall back to the generator
/// at the requested size.
pub fn resolve_texture<E: Display>(
    name: &str,
    fetched: Result<TextureImage, E>,
    width: u32,
    height: u32,
) -> TextureImage {
    match fetched {
        Ok(image) if image.is_valid() => image,
        Ok(image) => {
            log::debug!(
                "texture for {name} is {}x{} with {} bytes, using procedural fallback",
                image.width,
                image.height,
                image.pixels.len()
            );
            generate_texture_sized(name, width, height)
        }
        Err(err) => {
            log::debug!("texture for {name} unavailable ({err}), using procedural fallback");
            generate_texture_sized(name, width, height)
        }
    }
}

fn shade(pattern: BodyPattern, uv: Vec2) -> Vec3 {
    match pattern {
        BodyPattern::Corona => corona(uv),
        BodyPattern::Cratered => cratered(uv),
        BodyPattern::CloudSwirl => cloud_swirl(uv),
        BodyPattern::OceanWorld => ocean_world(uv),
        BodyPattern::Desert => desert(uv),
        BodyPattern::BandedGiant => banded_giant(uv),
        BodyPattern::RingWorld => ring_world(uv),
        BodyPattern::SoftIce => soft_ice(uv),
        BodyPattern::TurbulentIce => turbulent_ice(uv),
        BodyPattern::Flat(h) => flat_tint(h),
    }
}

fn corona(uv: Vec2) -> Vec3 {
    let granules = fbm(uv * Vec2::new(24.0, 12.0), 5);
    let cells = value_noise(uv * Vec2::new(64.0, 32.0));
    let heat = 0.55 * granules + 0.45 * cells;
    Vec3::new(1.0, 0.55, 0.12).lerp(Vec3::new(1.0, 0.93, 0.45), heat)
}

fn cratered(uv: Vec2) -> Vec3 {
    let base = Vec3::new(0.33, 0.31, 0.29).lerp(Vec3::new(0.55, 0.52, 0.48), fbm(uv * 6.0, 4));
    let p = sphere_dir(uv);
    let mut shade = 0.0;
    for i in 0..14 {
        let k = i as f32;
        let center = sphere_dir(Vec2::new(fract(k * 0.618 + 0.11), 0.15 + 0.7 * fract(k * 0.377)));
        let r = 0.07 + 0.06 * fract(k * 0.731);
        let d = p.dot(center).clamp(-1.0, 1.0).acos();
        let rim = smoothstep(r * 1.1, r * 0.95, d) - smoothstep(r * 0.95, r * 0.75, d);
        let floor = smoothstep(r * 0.7, r * 0.5, d);
        shade += rim * 0.25 - floor * 0.12;
    }
    base * (1.0 + shade)
}

fn cloud_swirl(uv: Vec2) -> Vec3 {
    let warp = Vec2::new(fbm(uv * 4.0, 4), fbm(uv * 4.0 + Vec2::splat(5.2), 4));
    let swirl = fbm(uv * Vec2::new(6.0, 3.0) + warp * 1.8, 5);
    Vec3::new(0.78, 0.64, 0.38).lerp(Vec3::new(0.98, 0.9, 0.7), swirl)
}

fn ocean_world(uv: Vec2) -> Vec3 {
    let land_mask = fbm(uv * Vec2::new(6.0, 3.0), 6);
    let water = Vec3::new(0.03, 0.14, 0.32).lerp(Vec3::new(0.06, 0.34, 0.66), fbm(uv * 12.0, 3));
    let land = Vec3::new(0.1, 0.28, 0.07).lerp(Vec3::new(0.5, 0.45, 0.28), fbm(uv * 18.0, 3));
    let coast = smoothstep(0.49, 0.53, land_mask);
    let mut c = water.lerp(land, coast);

    // Polar caps
    let polar = smoothstep(0.88, 0.95, (uv.y - 0.5).abs() * 2.0);
    c = c.lerp(Vec3::splat(0.95), polar);

    let clouds = smoothstep(0.58, 0.75, fbm(uv * Vec2::new(10.0, 14.0) + Vec2::splat(3.3), 5));
    c.lerp(Vec3::ONE, clouds * 0.65)
}

fn desert(uv: Vec2) -> Vec3 {
    let dunes = ((uv.x * TAU * 10.0 + fbm(uv * 8.0, 3) * 4.0).sin() * 0.5 + 0.5) * 0.4
        + fbm(uv * 12.0, 4) * 0.6;
    let base = Vec3::new(0.52, 0.24, 0.12).lerp(Vec3::new(0.82, 0.5, 0.3), dunes);
    let p = sphere_dir(uv);
    let mut pits = 0.0;
    for i in 0..8 {
        let k = i as f32;
        let center = sphere_dir(Vec2::new(fract(k * 0.437 + 0.2), 0.2 + 0.6 * fract(k * 0.291)));
        let d = p.dot(center).clamp(-1.0, 1.0).acos();
        pits += smoothstep(0.08, 0.03, d) * 0.2;
    }
    base * (1.0 - pits)
}

fn banded_giant(uv: Vec2) -> Vec3 {
    let lat = (uv.y - 0.5) * PI;
    let bands = (lat * 16.0 + fbm(uv * Vec2::new(10.0, 2.0), 3) * 2.5).sin() * 0.5 + 0.5;
    let base = Vec3::new(0.66, 0.52, 0.38).lerp(Vec3::new(0.95, 0.87, 0.74), bands);

    // Storm spot, an ellipse in the southern hemisphere
    let d = (uv - Vec2::new(0.3, 0.62)) * Vec2::new(1.0, 2.0);
    let spot = smoothstep(0.05, 0.035, d.length());
    base.lerp(Vec3::new(0.72, 0.32, 0.2), spot)
}

fn ring_world(uv: Vec2) -> Vec3 {
    let lat = (uv.y - 0.5) * PI;
    let bands = (lat * 9.0).sin() * 0.5 + 0.5;
    let t = bands * 0.75 + fbm(uv * Vec2::new(16.0, 6.0), 3) * 0.25;
    Vec3::new(0.8, 0.7, 0.52).lerp(Vec3::new(0.96, 0.9, 0.76), t)
}

fn soft_ice(uv: Vec2) -> Vec3 {
    let lat = (uv.y - 0.5) * PI;
    let bands = (lat * 4.0).sin() * 0.5 + 0.5;
    let t = bands * 0.8 + fbm(uv * 5.0, 3) * 0.2;
    Vec3::new(0.56, 0.8, 0.84).lerp(Vec3::new(0.72, 0.92, 0.96), t)
}

fn turbulent_ice(uv: Vec2) -> Vec3 {
    let warp = Vec2::splat(fbm(uv * 6.0, 3));
    let flow = fbm(uv * 14.0 + warp * 3.0, 5);
    Vec3::new(0.1, 0.2, 0.55).lerp(Vec3::new(0.2, 0.4, 0.92), flow)
}

fn flat_tint(h: u32) -> Vec3 {
    let channel = |shift: u32| 0.35 + 0.55 * ((h >> shift) & 0xff) as f32 / 255.0;
    Vec3::new(channel(0), channel(8), channel(16))
}

/// Unit direction for an equirectangular texel center.
fn sphere_dir(uv: Vec2) -> Vec3 {
    let lon = (uv.x - 0.5) * TAU;
    let lat = (0.5 - uv.y) * PI;
    Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin())
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// FNV-1a over the name, finished with an integer mix.
fn name_hash(name: &str) -> u32 {
    let mut h: u32 = 0x811c_9dc5;
    for b in name.bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(0x0100_0193);
    }
    mix(h)
}

fn mix(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

fn lattice(ix: i32, iy: i32) -> f32 {
    let h = mix((ix as u32).wrapping_mul(0x9e37_79b9) ^ (iy as u32).rotate_left(16));
    h as f32 / u32::MAX as f32
}

/// Smooth value noise in `[0, 1]`.
fn value_noise(p: Vec2) -> f32 {
    let cell = p.floor();
    let f = p - cell;
    let (ix, iy) = (cell.x as i32, cell.y as i32);
    let s = f * f * (Vec2::splat(3.0) - 2.0 * f);
    let a = lattice(ix, iy);
    let b = lattice(ix + 1, iy);
    let c = lattice(ix, iy + 1);
    let d = lattice(ix + 1, iy + 1);
    let top = a + (b - a) * s.x;
    let bottom = c + (d - c) * s.x;
    top + (bottom - top) * s.y
}

fn fbm(p: Vec2, octaves: u32) -> f32 {
    let mut sum = 0.0;
    let mut amp = 0.5;
    let mut norm = 0.0;
    let mut freq = 1.0;
    for _ in 0..octaves {
        sum += amp * value_noise(p * freq);
        norm += amp;
        freq *= 2.03;
        amp *= 0.5;
    }
    if norm > 0.0 {
        sum / norm
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_are_case_insensitive() {
        assert_eq!(BodyPattern::for_name("Earth"), BodyPattern::OceanWorld);
        assert_eq!(BodyPattern::for_name("MOON"), BodyPattern::Cratered);
        assert_eq!(BodyPattern::for_name(" neptune "), BodyPattern::TurbulentIce);
        assert!(matches!(BodyPattern::for_name("Voyager 1"), BodyPattern::Flat(_)));
    }

    #[test]
    fn generated_image_is_sized_and_opaque() {
        let image = generate_texture_sized("jupiter", 32, 16);
        assert!(image.is_valid());
        assert_eq!(image.pixels.len(), 32 * 16 * 4);
        assert!(image.pixels.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_texture_sized("mars", 24, 12);
        let b = generate_texture_sized("Mars", 24, 12);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_name_is_flat_and_name_dependent() {
        let a = generate_texture_sized("apophis", 8, 4);
        let first = a.pixel(0, 0).unwrap();
        assert!(a.pixels.chunks(4).all(|px| px == first));

        let b = generate_texture_sized("bennu", 8, 4);
        assert_ne!(a.pixel(0, 0), b.pixel(0, 0));
    }

    #[test]
    fn pixel_outside_the_image_is_none() {
        let image = generate_texture_sized("earth", 8, 4);
        assert!(image.pixel(7, 3).is_some());
        assert_eq!(image.pixel(8, 0), None);
        assert_eq!(image.pixel(0, 4), None);
        let short = TextureImage {
            width: 2,
            height: 2,
            pixels: vec![0; 4],
        };
        assert_eq!(short.pixel(1, 1), None);
    }

    #[test]
    fn default_size_matches_constants() {
        let image = generate_texture("ceres");
        assert_eq!((image.width, image.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert!(image.is_valid());
    }

    #[test]
    fn resolve_prefers_valid_fetch() {
        let fetched = TextureImage {
            width: 2,
            height: 1,
            pixels: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        let out = resolve_texture::<String>("earth", Ok(fetched.clone()), 16, 8);
        assert_eq!(out, fetched);
    }

    #[test]
    fn resolve_falls_back_on_error_or_bad_size() {
        let out = resolve_texture("earth", Err("404"), 16, 8);
        assert_eq!(out, generate_texture_sized("earth", 16, 8));

        let truncated = TextureImage {
            width: 4,
            height: 4,
            pixels: vec![0; 10],
        };
        let out = resolve_texture::<String>("earth", Ok(truncated), 16, 8);
        assert_eq!((out.width, out.height), (16, 8));
        assert!(out.is_valid());
    }
}
