//! Magic numbers and fixed layout constants of the supported file formats.

/// FreeSurfer triangle surface magic (3 bytes, big-endian).
pub const FS_TRIANGLE_MAGIC: u32 = 0xFF_FF_FE;

/// FreeSurfer quad surface magic with `i16` coordinates scaled by 100.
pub const FS_QUAD_MAGIC: u32 = 0xFF_FF_FF;

/// FreeSurfer quad surface magic with `f32` coordinates.
pub const FS_NEW_QUAD_MAGIC: u32 = 0xFF_FF_FD;

/// FreeSurfer "new" curvature (morphometry) magic.
pub const FS_NEW_CURV_MAGIC: u32 = 0xFF_FF_FF;

/// Divisor applied to `i16` values in quad surfaces and old curvature files.
pub const FS_FIXED_POINT_SCALE: f64 = 100.0;

/// Keys of the volume-info footer, in file order.
pub const FS_VOLUME_INFO_KEYS: [&str; 8] = [
    "valid",
    "filename",
    "volume",
    "voxelsize",
    "xras",
    "yras",
    "zras",
    "cras",
];

/// Annotation colour table version understood by the reader.
pub const FS_ANNOT_CTAB_VERSION: i32 = 2;

/// NIfTI-1 header size, also the value of `sizeof_hdr`.
pub const NIFTI1_HEADER_SIZE: usize = 348;

/// NIfTI-2 header size, also the value of `sizeof_hdr`.
pub const NIFTI2_HEADER_SIZE: usize = 540;

/// Byte offset of the voxel data in an MGH file.
pub const MGH_DATA_OFFSET: usize = 284;

/// Largest `Dimensionality` a GIFTI data array may declare.
pub const GIFTI_MAX_RANK: usize = 6;

/// GIFTI intent of a coordinate array.
pub const GIFTI_INTENT_POINTSET: &str = "NIFTI_INTENT_POINTSET";

/// GIFTI intent of a triangle index array.
pub const GIFTI_INTENT_TRIANGLE: &str = "NIFTI_INTENT_TRIANGLE";

/// Gzip member header magic.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
