//! Canonical material pairs used for per-step deduplication.

use crate::emitter::SoundEmitter;
use crate::math::Vec3;
use std::hash::{Hash, Hasher};

/// Orders two materials so that `(a, b)` and `(b, a)` produce the same pair.
///
/// Comparison is ordinal (byte-wise), not locale-aware. Byte order of UTF-8 is
/// code point order, which differs from UTF-16 code unit order only for
/// characters outside the Basic Multilingual Plane.
pub fn canonicalize<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a > b { (b, a) } else { (a, b) }
}

/// Orders two emitters by material, keeping each emitter attached to its material.
pub fn canonicalize_emitters<'a>(
    a: &'a SoundEmitter,
    b: &'a SoundEmitter,
) -> (&'a SoundEmitter, &'a SoundEmitter) {
    if a.material() > b.material() {
        (b, a)
    } else {
        (a, b)
    }
}

/// Identity of one collision sound within a simulation step.
///
/// Floats compare exactly (by bit pattern, with `-0.0` folded into `0.0`), so
/// two reports of the same contact from both sides of a collision collapse
/// into one key while any distinct contact point stays distinct.
#[derive(Debug, Clone)]
pub struct MaterialPairKey {
    material0: String,
    material1: String,
    position: Vec3,
    impact_volume: f32,
}

impl MaterialPairKey {
    pub fn new(material_a: &str, material_b: &str, position: Vec3, impact_volume: f32) -> Self {
        let (material0, material1) = canonicalize(material_a, material_b);
        Self {
            material0: material0.to_string(),
            material1: material1.to_string(),
            position,
            impact_volume,
        }
    }

    pub fn material0(&self) -> &str {
        &self.material0
    }

    pub fn material1(&self) -> &str {
        &self.material1
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn impact_volume(&self) -> f32 {
        self.impact_volume
    }

    fn float_bits(&self) -> [u32; 4] {
        let bits = |v: f32| (v + 0.0).to_bits();
        [
            bits(self.position.x),
            bits(self.position.y),
            bits(self.position.z),
            bits(self.impact_volume),
        ]
    }
}

impl PartialEq for MaterialPairKey {
    fn eq(&self, other: &Self) -> bool {
        self.material0 == other.material0
            && self.material1 == other.material1
            && self.float_bits() == other.float_bits()
    }
}

impl Eq for MaterialPairKey {}

impl Hash for MaterialPairKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.material0.hash(state);
        self.material1.hash(state);
        self.float_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_order_is_ordinal() {
        assert_eq!(canonicalize("Wood", "Metal"), ("Metal", "Wood"));
        assert_eq!(canonicalize("Metal", "Wood"), ("Metal", "Wood"));
        // uppercase sorts before lowercase in ordinal comparison
        assert_eq!(canonicalize("metal", "Wood"), ("Wood", "metal"));
        assert_eq!(canonicalize("Stone", "Stone"), ("Stone", "Stone"));
    }

    #[test]
    fn test_supplementary_characters_sort_by_code_point() {
        // U+10000 sorts after U+FF61 here; UTF-16 code unit order would put it first
        assert_eq!(
            canonicalize("\u{10000}", "\u{FF61}"),
            ("\u{FF61}", "\u{10000}")
        );
    }

    #[test]
    fn test_emitters_keep_their_material() {
        let wood = SoundEmitter::new("Wood");
        let metal = SoundEmitter::new("Metal");
        let (first, second) = canonicalize_emitters(&wood, &metal);
        assert_eq!(first.id(), metal.id());
        assert_eq!(second.id(), wood.id());
    }

    #[test]
    fn test_key_equality() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let a = MaterialPairKey::new("Wood", "Metal", p, 0.5);
        let b = MaterialPairKey::new("Metal", "Wood", p, 0.5);
        assert_eq!(a, b);
        assert_eq!(b.material0(), "Metal");

        let mut set = HashSet::new();
        assert!(set.insert(a));
        assert!(!set.insert(b));
        assert!(set.insert(MaterialPairKey::new("Metal", "Wood", p, 0.51)));
        assert!(set.insert(MaterialPairKey::new(
            "Metal",
            "Wood",
            Vec3::new(1.0, 2.0, 3.001),
            0.5
        )));
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let a = MaterialPairKey::new("A", "B", Vec3::new(0.0, -0.0, 0.0), 0.3);
        let b = MaterialPairKey::new("A", "B", Vec3::ZERO, 0.3);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }
}
