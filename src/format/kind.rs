//! Format tags produced by the resolver.

/// A file format that decodes to a surface mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// FreeSurfer binary surface (`.pial`, `.white`, ...)
    FreeSurferGeometry,
    /// GIFTI container; `compressed` for `.gii.gz`
    Gifti { compressed: bool },
}

/// A file format that decodes to a per-element data map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapFormat {
    /// NIfTI volume; `compressed` for `.nii.gz`
    Nifti { compressed: bool },
    /// FreeSurfer compressed MGH volume
    Mgz,
    /// FreeSurfer per-vertex morphometry (`.curv`, `.thickness`, ...)
    Morphometry,
    /// FreeSurfer parcellation annotation
    Annotation,
    /// FreeSurfer ASCII label
    Label,
    /// GIFTI data arrays; `compressed` for `.gii.gz`
    Gifti { compressed: bool },
}

impl MeshFormat {
    /// Human-readable name for log and error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            MeshFormat::FreeSurferGeometry => "FreeSurfer surface",
            MeshFormat::Gifti { compressed: false } => "GIFTI",
            MeshFormat::Gifti { compressed: true } => "GIFTI (gzip)",
        }
    }
}

impl MapFormat {
    /// Human-readable name for log and error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            MapFormat::Nifti { compressed: false } => "NIfTI",
            MapFormat::Nifti { compressed: true } => "NIfTI (gzip)",
            MapFormat::Mgz => "MGZ",
            MapFormat::Morphometry => "FreeSurfer morphometry",
            MapFormat::Annotation => "FreeSurfer annotation",
            MapFormat::Label => "FreeSurfer label",
            MapFormat::Gifti { compressed: false } => "GIFTI",
            MapFormat::Gifti { compressed: true } => "GIFTI (gzip)",
        }
    }

    /// Whether the format holds a voxel grid rather than per-vertex values.
    pub fn is_volume(&self) -> bool {
        matches!(self, MapFormat::Nifti { .. } | MapFormat::Mgz)
    }
}
