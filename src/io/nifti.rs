//! NIfTI-1 reading and writing for series, masks and statistic maps.

use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use ndarray::{Array, Array3, Array4, ArrayD, Axis, Dimension, Ix3, Ix4};
use nifti::volume::ndarray::IntoNdArray;
use nifti::{InMemNiftiObject, NiftiHeader, NiftiObject};

const HEADER_LEN: usize = 348;
const VOX_OFFSET: usize = 352;
const DT_FLOAT32: i16 = 16;
const UNITS_MM_SEC: u8 = 2 | 8;

/// Volume geometry carried from the input series to every written map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub voxel_mm: [f64; 3],
    pub tr_s: f64,
    /// Row-major 4x4.
    pub affine: [f64; 16],
}

impl Geometry {
    pub fn isotropic(voxel_mm: f64, tr_s: f64) -> Self {
        let mut affine = [0.0; 16];
        affine[0] = voxel_mm;
        affine[5] = voxel_mm;
        affine[10] = voxel_mm;
        affine[15] = 1.0;
        Self {
            voxel_mm: [voxel_mm; 3],
            tr_s,
            affine,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Series {
    pub data: Array4<f64>,
    pub geometry: Geometry,
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn read_object(path: &Path) -> Result<InMemNiftiObject> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let obj = if is_gzip(&bytes) {
        InMemNiftiObject::from_reader(GzDecoder::new(Cursor::new(&bytes[..])))
    } else {
        InMemNiftiObject::from_reader(Cursor::new(&bytes[..]))
    };
    obj.map_err(|e| anyhow!("failed to parse NIfTI {}: {}", path.display(), e))
}

fn geometry_of(header: &NiftiHeader) -> Geometry {
    let voxel_mm = [
        header.pixdim[1] as f64,
        header.pixdim[2] as f64,
        header.pixdim[3] as f64,
    ];
    let affine = if header.sform_code > 0 {
        let (s, t, u) = (&header.srow_x, &header.srow_y, &header.srow_z);
        [
            s[0] as f64, s[1] as f64, s[2] as f64, s[3] as f64,
            t[0] as f64, t[1] as f64, t[2] as f64, t[3] as f64,
            u[0] as f64, u[1] as f64, u[2] as f64, u[3] as f64,
            0.0, 0.0, 0.0, 1.0,
        ]
    } else {
        [
            voxel_mm[0], 0.0, 0.0, 0.0,
            0.0, voxel_mm[1], 0.0, 0.0,
            0.0, 0.0, voxel_mm[2], 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]
    };
    Geometry {
        voxel_mm,
        tr_s: header.pixdim[4] as f64,
        affine,
    }
}

fn into_array(obj: InMemNiftiObject, path: &Path) -> Result<ArrayD<f64>> {
    obj.into_volume()
        .into_ndarray::<f64>()
        .map_err(|e| anyhow!("failed to decode voxels of {}: {}", path.display(), e))
}

/// Reads a 4D series indexed `(x, y, z, t)`.
pub fn read_series(path: &Path) -> Result<Series> {
    let obj = read_object(path)?;
    let geometry = geometry_of(obj.header());
    let array = into_array(obj, path)?;
    if array.ndim() != 4 {
        bail!(
            "{} is {}D; a 4D time series is required",
            path.display(),
            array.ndim()
        );
    }
    let data = array
        .into_dimensionality::<Ix4>()
        .with_context(|| format!("unexpected layout in {}", path.display()))?;
    Ok(Series { data, geometry })
}

/// Reads a binary mask; any nonzero voxel is tissue. A trailing singleton time axis is dropped.
pub fn read_mask(path: &Path) -> Result<Array3<u8>> {
    let obj = read_object(path)?;
    let mut array = into_array(obj, path)?;
    while array.ndim() > 3 && array.shape()[array.ndim() - 1] == 1 {
        let last = array.ndim() - 1;
        array = array.index_axis_move(Axis(last), 0);
    }
    let volume = array
        .into_dimensionality::<Ix3>()
        .map_err(|_| anyhow!("{} is not a 3D mask", path.display()))?;
    Ok(volume.mapv(|v| u8::from(v != 0.0)))
}

fn encode<D: Dimension>(data: &Array<f64, D>, geometry: &Geometry) -> Result<Vec<u8>> {
    let shape = data.shape();
    if shape.len() > 7 {
        bail!("NIfTI-1 supports at most 7 dimensions");
    }
    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(&(HEADER_LEN as i32).to_le_bytes());

    let mut dim = [1i16; 8];
    dim[0] = shape.len() as i16;
    for (i, &extent) in shape.iter().enumerate() {
        dim[i + 1] = i16::try_from(extent).context("axis extent exceeds NIfTI-1 limit")?;
    }
    for (i, d) in dim.iter().enumerate() {
        let offset = 40 + i * 2;
        header[offset..offset + 2].copy_from_slice(&d.to_le_bytes());
    }

    header[70..72].copy_from_slice(&DT_FLOAT32.to_le_bytes());
    header[72..74].copy_from_slice(&32i16.to_le_bytes());

    let [vx, vy, vz] = geometry.voxel_mm;
    let pixdim: [f32; 8] = [
        1.0,
        vx as f32,
        vy as f32,
        vz as f32,
        geometry.tr_s as f32,
        1.0,
        1.0,
        1.0,
    ];
    for (i, p) in pixdim.iter().enumerate() {
        let offset = 76 + i * 4;
        header[offset..offset + 4].copy_from_slice(&p.to_le_bytes());
    }

    header[108..112].copy_from_slice(&(VOX_OFFSET as f32).to_le_bytes());
    header[112..116].copy_from_slice(&1.0f32.to_le_bytes());
    header[116..120].copy_from_slice(&0.0f32.to_le_bytes());
    header[123] = UNITS_MM_SEC;
    header[254..256].copy_from_slice(&1i16.to_le_bytes());

    for row in 0..3 {
        for col in 0..4 {
            let offset = 280 + row * 16 + col * 4;
            let v = geometry.affine[row * 4 + col] as f32;
            header[offset..offset + 4].copy_from_slice(&v.to_le_bytes());
        }
    }
    header[344..348].copy_from_slice(b"n+1\0");

    let mut buffer = Vec::with_capacity(VOX_OFFSET + data.len() * 4);
    buffer.extend_from_slice(&header);
    buffer.extend_from_slice(&[0u8; VOX_OFFSET - HEADER_LEN]);
    // NIfTI stores x fastest; the reversed-axes view iterates in that order.
    for &v in data.t().iter() {
        buffer.extend_from_slice(&(v as f32).to_le_bytes());
    }
    Ok(buffer)
}

fn write_encoded(path: &Path, bytes: Vec<u8>) -> Result<()> {
    let out = if path.to_string_lossy().ends_with(".gz") {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes)?;
        encoder.finish()?
    } else {
        bytes
    };
    std::fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))
}

/// Writes a 3D map as float32; `.gz` suffix selects gzip compression.
pub fn write_map(path: &Path, map: &Array3<f64>, geometry: &Geometry) -> Result<()> {
    write_encoded(path, encode(map, geometry)?)
}

pub fn write_series(path: &Path, series: &Array4<f64>, geometry: &Geometry) -> Result<()> {
    write_encoded(path, encode(series, geometry)?)
}
