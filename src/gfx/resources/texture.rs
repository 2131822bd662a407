//! Texture slots on materials
//!
//! Textures are carried as the raw bytes of their source file. Decoding is
//! left to the renderer; a slot only records that an image is attached.

use std::collections::BTreeMap;
use std::rc::Rc;

/// Named texture inputs a material may accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSlot {
    Map,
    AlphaMap,
    AoMap,
    DisplacementMap,
    NormalMap,
    MetalnessMap,
    RoughnessMap,
    Matcap,
    GradientMap,
}

/// Undecoded image file contents
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub source: String,
    pub bytes: Vec<u8>,
}

impl TextureData {
    pub fn new(source: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            bytes,
        }
    }
}

/// Textures attached to a material, keyed by slot
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    slots: BTreeMap<TextureSlot, Rc<TextureData>>,
}

impl TextureSet {
    pub fn get(&self, slot: TextureSlot) -> Option<&Rc<TextureData>> {
        self.slots.get(&slot)
    }

    pub fn insert(&mut self, slot: TextureSlot, texture: Rc<TextureData>) {
        self.slots.insert(slot, texture);
    }

    pub fn contains(&self, slot: TextureSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureSlot, &Rc<TextureData>)> {
        self.slots.iter().map(|(slot, tex)| (*slot, tex))
    }
}
