//! Material-to-clip mapping.
//!
//! A [`ClipLibrary`] maps every material tag to the clips that may play when
//! something made of it is hit. It can be filled explicitly or built from a
//! flat list of clip names following the `Material__suffix` convention
//! (`Wood__01`, `Wood__thud`, or just `Wood`).

use crate::error::{ImpactSonicError, Result};
use std::collections::HashMap;

/// Separator between a clip's material and the rest of its name.
pub const CLIP_NAME_SEPARATOR: &str = "__";

/// Identifier of an audio clip as understood by the audio backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipId(String);

impl ClipId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Material a clip belongs to by name: everything before the first `__`.
    pub fn material(&self) -> &str {
        match self.0.find(CLIP_NAME_SEPARATOR) {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClipId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClipId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Candidate clips per material, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    sets: HashMap<String, Vec<ClipId>>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a library from clip names, keeping only materials in `materials`.
    ///
    /// Returns the library along with one [`ImpactSonicError::UnknownMaterial`]
    /// per clip that was skipped.
    pub fn from_clip_names<I, S>(names: I, materials: &[String]) -> (Self, Vec<ImpactSonicError>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut library = Self::new();
        let skipped = library.discover(names, materials);
        (library, skipped)
    }

    /// Adds one clip to a material, ignoring duplicates.
    pub fn add_clip(&mut self, material: impl Into<String>, clip: impl Into<ClipId>) {
        let clip = clip.into();
        let set = self.sets.entry(material.into()).or_default();
        if !set.contains(&clip) {
            set.push(clip);
        }
    }

    /// Adds several clips to a material, ignoring duplicates.
    pub fn insert<I, C>(&mut self, material: impl Into<String>, clips: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<ClipId>,
    {
        let material = material.into();
        self.sets.entry(material.clone()).or_default();
        for clip in clips {
            self.add_clip(material.clone(), clip);
        }
    }

    /// Files clips under the material encoded in their name.
    ///
    /// Clips whose material is not listed in `materials` (unless the library
    /// already has an entry for it) are skipped and reported.
    pub fn discover<I, S>(&mut self, names: I, materials: &[String]) -> Vec<ImpactSonicError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut skipped = Vec::new();
        let mut added = 0usize;
        for name in names {
            let clip = ClipId::new(name);
            let material = clip.material().to_string();
            if !self.sets.contains_key(&material) && !materials.contains(&material) {
                log::warn!(
                    "Found clip for material that is not in materials list: {}",
                    clip
                );
                skipped.push(ImpactSonicError::UnknownMaterial {
                    clip: clip.to_string(),
                    material,
                });
                continue;
            }
            self.add_clip(material, clip);
            added += 1;
        }
        log::debug!(
            "Discovered {} clips ({} skipped) across {} materials",
            added,
            skipped.len(),
            self.sets.len()
        );
        skipped
    }

    /// Non-empty clip set for `material`.
    pub fn clips(&self, material: &str) -> Result<&[ClipId]> {
        match self.sets.get(material) {
            Some(clips) if !clips.is_empty() => Ok(clips),
            _ => Err(ImpactSonicError::MissingClip(material.to_string())),
        }
    }

    pub fn contains(&self, material: &str) -> bool {
        self.clips(material).is_ok()
    }

    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Listed materials that have no clip to play.
    pub fn missing<'a>(&self, materials: &'a [String]) -> Vec<&'a str> {
        materials
            .iter()
            .map(String::as_str)
            .filter(|m| !self.contains(m))
            .collect()
    }

    /// Number of materials with an entry (possibly empty).
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
