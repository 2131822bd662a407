use std::rc::Rc;

use log::{debug, warn};

use crate::gfx::resources::{
    material::MaterialHandle,
    texture::{TextureData, TextureSlot},
};

use super::loader::{AssetHandle, AssetLoader, LoadStatus};

/// Where a completed texture lands
#[derive(Debug, Clone)]
pub struct TextureTarget {
    pub material: MaterialHandle,
    pub slot: TextureSlot,
}

#[derive(Debug)]
struct PendingLoad {
    handle: AssetHandle,
    targets: Vec<TextureTarget>,
}

/// Outcome counts of one [`PendingLoads::poll`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub applied: usize,
    pub failed: usize,
    pub pending: usize,
}

/// Texture loads waiting to be attached to materials
///
/// Each requested path is loaded once, however many slots it feeds.
#[derive(Debug, Default)]
pub struct PendingLoads {
    loads: Vec<PendingLoad>,
}

impl PendingLoads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests `path` and records where it should land
    pub fn request(
        &mut self,
        loader: &dyn AssetLoader,
        path: &str,
        material: &MaterialHandle,
        slot: TextureSlot,
    ) {
        let target = TextureTarget {
            material: material.clone(),
            slot,
        };
        if let Some(load) = self.loads.iter_mut().find(|l| l.handle.path() == path) {
            load.targets.push(target);
            return;
        }
        self.loads.push(PendingLoad {
            handle: loader.load(path),
            targets: vec![target],
        });
    }

    /// Moves the loads of `other` into this set
    pub fn extend(&mut self, other: PendingLoads) {
        self.loads.extend(other.loads);
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Applies every load that has finished since the last poll
    ///
    /// Ready textures go through [`Material::set_texture`]. Failed loads are
    /// logged and dropped, leaving their slots empty.
    ///
    /// [`Material::set_texture`]: crate::gfx::resources::material::Material::set_texture
    pub fn poll(&mut self) -> PollSummary {
        let mut summary = PollSummary::default();

        self.loads.retain_mut(|load| match load.handle.poll() {
            LoadStatus::Pending => {
                summary.pending += 1;
                true
            }
            LoadStatus::Ready(bytes) => {
                let texture = Rc::new(TextureData::new(load.handle.path(), bytes));
                for target in &load.targets {
                    let result = target
                        .material
                        .borrow_mut()
                        .set_texture(target.slot, texture.clone());
                    match result {
                        Ok(()) => {
                            debug!("Attached `{}` as {:?}", load.handle.path(), target.slot);
                            summary.applied += 1;
                        }
                        Err(e) => {
                            warn!("{}", e);
                            summary.failed += 1;
                        }
                    }
                }
                false
            }
            LoadStatus::Failed(e) => {
                warn!("Texture `{}` failed to load: {}", load.handle.path(), e);
                summary.failed += load.targets.len();
                false
            }
        });

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ManualLoader;
    use crate::gfx::resources::material::{Color, Material};

    #[test]
    fn test_slot_empty_until_load_completes() {
        let loader = ManualLoader::new();
        let material = MaterialHandle::new(Material::standard(Color::WHITE, 0.0, 1.0));
        let mut loads = PendingLoads::new();
        loads.request(&loader, "door/color.jpg", &material, TextureSlot::Map);

        assert_eq!(loads.poll(), PollSummary { pending: 1, ..Default::default() });
        assert!(material.borrow().texture(TextureSlot::Map).is_none());

        loader.complete("door/color.jpg", vec![0xff, 0xd8]);
        assert_eq!(loads.poll(), PollSummary { applied: 1, ..Default::default() });
        let material = material.borrow();
        let texture = material.texture(TextureSlot::Map).unwrap();
        assert_eq!(texture.source, "door/color.jpg");
        assert_eq!(texture.bytes, vec![0xff, 0xd8]);
        assert!(loads.is_empty());
    }

    #[test]
    fn test_failed_load_is_dropped_and_slot_stays_empty() {
        let loader = ManualLoader::new();
        let material = MaterialHandle::new(Material::standard(Color::WHITE, 0.0, 1.0));
        let mut loads = PendingLoads::new();
        loads.request(&loader, "door/ao.jpg", &material, TextureSlot::AoMap);
        loader.fail("door/ao.jpg");

        assert_eq!(loads.poll(), PollSummary { failed: 1, ..Default::default() });
        assert!(loads.is_empty());
        assert!(material.borrow().textures().is_empty());
        assert_eq!(loads.poll(), PollSummary::default());
    }

    #[test]
    fn test_same_path_loaded_once() {
        let loader = ManualLoader::new();
        let a = MaterialHandle::new(Material::basic(Color::WHITE));
        let b = MaterialHandle::new(Material::lambert(Color::WHITE));
        let mut loads = PendingLoads::new();
        loads.request(&loader, "alpha.jpg", &a, TextureSlot::AlphaMap);
        loads.request(&loader, "alpha.jpg", &b, TextureSlot::AlphaMap);

        assert_eq!(loader.requested().len(), 1);
        loader.complete("alpha.jpg", vec![1]);
        assert_eq!(loads.poll().applied, 2);
        assert!(b.borrow().texture(TextureSlot::AlphaMap).is_some());
    }

    #[test]
    fn test_unsupported_slot_counts_as_failure() {
        let loader = ManualLoader::new();
        let material = MaterialHandle::new(Material::basic(Color::WHITE));
        let mut loads = PendingLoads::new();
        loads.request(&loader, "height.png", &material, TextureSlot::DisplacementMap);
        loader.complete("height.png", vec![0]);
        assert_eq!(loads.poll(), PollSummary { failed: 1, ..Default::default() });
    }
}
