//! Surface mesh decoding.

use std::path::Path;

use crate::array::NumericArray;
use crate::codec::{self, freesurfer, GiftiImage};
use crate::constants::{GIFTI_INTENT_POINTSET, GIFTI_INTENT_TRIANGLE};
use crate::error::{ExtractError, Result};
use crate::extract::ExtractOptions;
use crate::format::MeshFormat;
use crate::model::SurfaceMesh;

/// Decode the mesh stored at `path` in the given format.
///
/// FreeSurfer surfaces are shifted by their `cras` offset when the options
/// ask for it. GIFTI meshes take the first `POINTSET` and `TRIANGLE` arrays.
pub fn decode_mesh(path: &Path, format: MeshFormat, options: &ExtractOptions) -> Result<SurfaceMesh> {
    let (coords, faces) = match format {
        MeshFormat::FreeSurferGeometry => {
            let bytes = codec::read_source(path, false)?;
            let geometry = freesurfer::read_geometry(&bytes)?;
            let coords = match geometry.volume_info {
                Some(info) if options.apply_cras => {
                    log::debug!("Shifting {:?} by cras {:?}", path, info.cras);
                    geometry.coords.add_column_offsets(&info.cras)?
                }
                _ => geometry.coords,
            };
            (coords, geometry.faces)
        }
        MeshFormat::Gifti { compressed } => {
            let bytes = codec::read_source(path, compressed)?;
            let mut image = codec::read_gifti(&bytes)?;
            let coords = take_intent(&mut image, GIFTI_INTENT_POINTSET, path)?;
            let faces = take_intent(&mut image, GIFTI_INTENT_TRIANGLE, path)?;
            (coords, faces)
        }
    };
    let mesh = assemble_mesh(coords, faces, options.validate_faces)?;
    log::info!(
        "Decoded {:?}: {} vertices, {} faces",
        path,
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

fn take_intent(image: &mut GiftiImage, intent: &str, path: &Path) -> Result<NumericArray> {
    let matches = image.count_intent(intent);
    if matches > 1 {
        log::warn!(
            "{:?} has {} {} arrays, using the first",
            path,
            matches,
            intent
        );
    }
    image
        .take_first_with_intent(intent)
        .map(|array| array.data)
        .ok_or_else(|| {
            ExtractError::unsupported_format(format!(
                "GIFTI file '{}' has no {} array and cannot be read as a mesh.",
                path.display(),
                intent
            ))
        })
}

/// Check both arrays are `(k, 3)` and flatten them into a [`SurfaceMesh`].
pub fn assemble_mesh(coords: NumericArray, faces: NumericArray, validate_faces: bool) -> Result<SurfaceMesh> {
    require_triples(&coords, "Vertex coordinates")?;
    require_triples(&faces, "Faces")?;

    let vertex_count = coords.shape()[0];
    if validate_faces {
        let indices = faces.indices().ok_or_else(|| {
            ExtractError::decode(
                "surface mesh",
                format!("face indices are stored as {}", faces.data_type()),
            )
        })?;
        if let Some(bad) = indices
            .iter()
            .find(|&&index| usize::try_from(index).map_or(true, |i| i >= vertex_count))
        {
            return Err(ExtractError::decode(
                "surface mesh",
                format!(
                    "face references vertex {} but the mesh has {} vertices",
                    bad, vertex_count
                ),
            ));
        }
    }

    Ok(SurfaceMesh {
        vertices: coords.flatten(),
        faces: faces.flatten(),
    })
}

fn require_triples(array: &NumericArray, what: &str) -> Result<()> {
    match array.shape() {
        [_, 3] => Ok(()),
        shape => Err(ExtractError::dimension(format!(
            "{} must have shape (n, 3), found {:?}",
            what, shape
        ))),
    }
}
