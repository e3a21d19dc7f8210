//! Renderable assembly

use crate::floor::{extra_mesh, floor_mesh};
use crate::models::ModelCache;
use crate::policy::{ColorPolicy, FloorPolicy};
use roomcast_core::{Color, Result, RoomcastError, Transform, Vec3};
use roomcast_layout::{Extra, FurnitureCatalog, PredictedLayout, PredictedObject, SceneRecord};
use roomcast_render::{Mesh, Renderable};
use std::sync::Arc;

/// Colour of wall, door, and window overlays
pub const OVERLAY_COLOR: Color = Color::new(0.8, 0.8, 0.8, 0.6);

/// Optional overlay passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayFlags {
    pub walls: bool,
    pub doors_and_windows: bool,
}

/// Builds renderable lists against one catalog and object-type vocabulary
pub struct SceneAssembler<'a> {
    catalog: &'a FurnitureCatalog,
    object_types: &'a [String],
    models: &'a mut ModelCache,
}

impl<'a> SceneAssembler<'a> {
    pub fn new(
        catalog: &'a FurnitureCatalog,
        object_types: &'a [String],
        models: &'a mut ModelCache,
    ) -> Self {
        Self {
            catalog,
            object_types,
            models,
        }
    }

    /// Furniture in layout order, then the floor, then walls, then doors and windows
    pub fn assemble(
        &mut self,
        scene: &SceneRecord,
        layout: &PredictedLayout,
        floor: &FloorPolicy,
        colors: &ColorPolicy,
        overlays: OverlayFlags,
    ) -> Result<Vec<Renderable>> {
        let mut renderables = Vec::with_capacity(layout.len() + 1);

        for object in layout.objects() {
            renderables.push(self.furniture(&object, colors)?);
        }

        if let Some(floor) = self.floor(scene, floor)? {
            renderables.push(floor);
        }

        if overlays.walls {
            renderables.extend(scene.walls().map(|e| overlay(e, scene.centroid)));
        }
        if overlays.doors_and_windows {
            renderables.extend(scene.doors_and_windows().map(|e| overlay(e, scene.centroid)));
        }

        Ok(renderables)
    }

    fn furniture(&mut self, object: &PredictedObject, colors: &ColorPolicy) -> Result<Renderable> {
        let label = self.object_types.get(object.class_index).ok_or_else(|| {
            RoomcastError::InvalidBundle(format!(
                "class index {} outside {} object types",
                object.class_index,
                self.object_types.len()
            ))
        })?;

        let entry = self.catalog.closest_to_box(label, object.size)?;
        let model = self.models.model(&entry.raw_model_path)?;

        // Centre the scaled model on the predicted translation
        let pivot = Vec3::from_array(model.bounds.center()).scaled(&entry.scale);
        let transform = Transform::from_yaw(object.angle)
            .with_position(object.translation)
            .with_scale(entry.scale)
            .with_pivot(pivot);

        let renderable = Renderable::new(label.clone(), model.render_mesh.clone())
            .with_transform(transform);

        Ok(match colors {
            ColorPolicy::FlatPalette(palette) => {
                let color = palette.get(object.class_index).copied().unwrap_or(Color::GREY);
                renderable.with_color(color)
            }
            ColorPolicy::Textured => {
                match self
                    .models
                    .texture_for(&model, entry.texture_image_path.as_deref())?
                {
                    Some(texture) => renderable.with_texture(texture),
                    None => renderable.with_color(Color::GREY),
                }
            }
        })
    }

    fn floor(&mut self, scene: &SceneRecord, policy: &FloorPolicy) -> Result<Option<Renderable>> {
        let floor = || {
            let mesh = Mesh::from(&floor_mesh(&scene.floor_plan, scene.centroid));
            Renderable::new("floor", Arc::new(mesh))
        };

        Ok(match policy {
            FloorPolicy::NoFloor => None,
            FloorPolicy::SolidColor(color) => Some(floor().with_color(*color)),
            FloorPolicy::Textured(path) => Some(floor().with_texture(self.models.image(path)?)),
        })
    }
}

fn overlay(extra: &Extra, centroid: Vec3) -> Renderable {
    Renderable::new(
        extra.model_type.clone(),
        Arc::new(Mesh::from(&extra_mesh(extra, centroid))),
    )
    .with_color(OVERLAY_COLOR)
    .translucent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::hls_palette;
    use roomcast_layout::{CatalogEntry, FloorPlan};
    use std::path::{Path, PathBuf};

    struct Fixture {
        dir: PathBuf,
        catalog: FurnitureCatalog,
        object_types: Vec<String>,
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.dir).ok();
        }
    }

    const BOX_OBJ: &str = "v 0 0 0\nv 2 0 0\nv 2 1 0\nv 0 1 0\nv 0 0 2\nv 2 0 2\nv 2 1 2\nv 0 1 2\n\
f 1 2 3 4\nf 5 6 7 8\nf 1 2 6 5\nf 4 3 7 8\n";

    fn fixture() -> Fixture {
        let dir = std::env::temp_dir().join(format!("roomcast_assemble_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let model = dir.join("box.obj");
        std::fs::write(&model, BOX_OBJ).unwrap();

        let entry = |jid: &str, label: &str| CatalogEntry {
            model_jid: jid.to_string(),
            label: label.to_string(),
            size: Vec3::new(1.0, 0.5, 1.0),
            scale: Vec3::ONE,
            raw_model_path: model.clone(),
            texture_image_path: None,
        };

        Fixture {
            catalog: FurnitureCatalog::new(vec![entry("bed-1", "bed"), entry("chair-1", "chair")]),
            object_types: vec!["bed".to_string(), "chair".to_string()],
            dir,
        }
    }

    fn scene() -> SceneRecord {
        let extra = |uid: &str, kind: &str| Extra {
            model_uid: uid.to_string(),
            model_type: kind.to_string(),
            xyz: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            faces: vec![[0, 1, 2]],
        };
        SceneRecord {
            scene_id: "Bedroom-0001".to_string(),
            centroid: Vec3::new(1.0, 0.0, 1.0),
            floor_plan: FloorPlan {
                vertices: vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 0.0, 2.0], [0.0, 0.0, 2.0]],
                faces: vec![[0, 2, 1], [0, 3, 2]],
            },
            extras: vec![extra("w", "WallInner"), extra("d", "Door"), extra("f", "Front")],
            furniture: vec![],
        }
    }

    fn layout(classes: &[usize], n_types: usize) -> PredictedLayout {
        PredictedLayout {
            class_labels: classes
                .iter()
                .map(|&c| (0..n_types).map(|i| if i == c { 1.0 } else { 0.0 }).collect())
                .collect(),
            translations: classes.iter().map(|&c| [c as f32, 0.5, 0.0]).collect(),
            sizes: vec![[1.0, 0.5, 1.0]; classes.len()],
            angles: vec![[0.0]; classes.len()],
        }
    }

    #[test]
    fn test_furniture_order_and_floor_last() {
        let f = fixture();
        let mut models = ModelCache::new();
        let mut assembler = SceneAssembler::new(&f.catalog, &f.object_types, &mut models);

        let list = assembler
            .assemble(
                &scene(),
                &layout(&[1, 0, 1], 2),
                &FloorPolicy::SolidColor(Color::WHITE),
                &ColorPolicy::Textured,
                OverlayFlags::default(),
            )
            .unwrap();

        let labels: Vec<&str> = list.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["chair", "bed", "chair", "floor"]);
        // Untextured models fall back to grey
        assert_eq!(list[0].color, Color::GREY);
        assert_eq!(list[3].color, Color::WHITE);
        assert!(list.iter().all(|r| !r.translucent));
        assert_eq!(models.model_count(), 1);
    }

    #[test]
    fn test_furniture_is_centred_on_translation() {
        let f = fixture();
        let mut models = ModelCache::new();
        let mut assembler = SceneAssembler::new(&f.catalog, &f.object_types, &mut models);

        let list = assembler
            .assemble(
                &scene(),
                &layout(&[0], 2),
                &FloorPolicy::NoFloor,
                &ColorPolicy::Textured,
                OverlayFlags::default(),
            )
            .unwrap();

        assert_eq!(list.len(), 1);
        // Box centre (1, 0.5, 1) lands on the predicted translation (0, 0.5, 0)
        let centre = list[0].transform.transform_point(Vec3::new(1.0, 0.5, 1.0));
        assert!((centre - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_flat_palette_colours_by_class() {
        let f = fixture();
        let mut models = ModelCache::new();
        let mut assembler = SceneAssembler::new(&f.catalog, &f.object_types, &mut models);
        let palette = hls_palette(2);

        let list = assembler
            .assemble(
                &scene(),
                &layout(&[0, 1], 2),
                &FloorPolicy::NoFloor,
                &ColorPolicy::FlatPalette(palette.clone()),
                OverlayFlags::default(),
            )
            .unwrap();

        assert_eq!(list[0].color, palette[0]);
        assert_eq!(list[1].color, palette[1]);
        assert!(list.iter().all(|r| !r.is_textured()));
    }

    #[test]
    fn test_overlays_follow_floor() {
        let f = fixture();
        let mut models = ModelCache::new();
        let mut assembler = SceneAssembler::new(&f.catalog, &f.object_types, &mut models);

        let list = assembler
            .assemble(
                &scene(),
                &layout(&[0], 2),
                &FloorPolicy::SolidColor(Color::GREY),
                &ColorPolicy::Textured,
                OverlayFlags {
                    walls: true,
                    doors_and_windows: true,
                },
            )
            .unwrap();

        let labels: Vec<&str> = list.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["bed", "floor", "WallInner", "Door"]);
        assert!(list[2].translucent && list[3].translucent);
        assert_eq!(list[2].color, OVERLAY_COLOR);
    }

    #[test]
    fn test_textured_floor_loads_image() {
        let f = fixture();
        let texture = f.dir.join("floor.png");
        image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 180, 160, 255]))
            .save(&texture)
            .unwrap();

        let mut models = ModelCache::new();
        let mut assembler = SceneAssembler::new(&f.catalog, &f.object_types, &mut models);
        let list = assembler
            .assemble(
                &scene(),
                &layout(&[], 2),
                &FloorPolicy::Textured(texture.clone()),
                &ColorPolicy::Textured,
                OverlayFlags::default(),
            )
            .unwrap();

        assert_eq!(list.len(), 1);
        assert!(list[0].is_textured());
        assert_eq!(models.image_count(), 1);
        assert!(Path::new(&texture).exists());
    }

    #[test]
    fn test_unknown_label_is_fatal() {
        let f = fixture();
        let mut models = ModelCache::new();
        let types = vec!["bed".to_string(), "piano".to_string()];
        let mut assembler = SceneAssembler::new(&f.catalog, &types, &mut models);

        let err = assembler
            .assemble(
                &scene(),
                &layout(&[1], 2),
                &FloorPolicy::NoFloor,
                &ColorPolicy::Textured,
                OverlayFlags::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RoomcastError::NoMatchingFurniture(ref l) if l == "piano"));
    }
}
