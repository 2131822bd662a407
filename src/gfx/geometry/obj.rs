//! OBJ mesh loading
//!
//! Loads every model in an OBJ file as its own [`GeometryData`], computing
//! normals when the file does not carry them.

use log::debug;

use super::GeometryData;
use crate::error::AssetError;

/// A named model from an OBJ file
#[derive(Debug, Clone)]
pub struct ObjModel {
    pub name: String,
    pub geometry: GeometryData,
    /// Diffuse color of the model's MTL material, if any
    pub diffuse: Option<[f32; 3]>,
}

/// Loads all models from an OBJ file (and its MTL file, if present)
pub fn load_obj(path: &str) -> Result<Vec<ObjModel>, AssetError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Obj {
        path: path.to_string(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|_| {
        debug!("No MTL file found for {}, using default materials", path);
        Vec::new()
    });

    let mut out = Vec::with_capacity(models.len());
    for (i, model) in models.into_iter().enumerate() {
        let mesh = model.mesh;
        let mut geometry = GeometryData::new();

        geometry.vertices = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        geometry.tex_coords = mesh
            .texcoords
            .chunks_exact(2)
            .map(|t| [t[0], t[1]])
            .collect();
        geometry.indices = mesh.indices;

        // Use normals from OBJ if available, otherwise calculate them
        if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
            geometry.normals = mesh
                .normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect();
        } else {
            geometry.compute_vertex_normals();
        }

        let diffuse = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .and_then(|m| m.diffuse);

        let name = if model.name.is_empty() {
            format!("model_{}", i)
        } else {
            model.name
        };

        debug!(
            "Loaded OBJ model {}: {} vertices, {} triangles",
            name,
            geometry.vertex_count(),
            geometry.triangle_count()
        );

        out.push(ObjModel {
            name,
            geometry,
            diffuse,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_obj("does/not/exist.obj");
        assert!(matches!(result, Err(AssetError::Obj { .. })));
    }
}
