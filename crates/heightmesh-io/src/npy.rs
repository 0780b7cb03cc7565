//! Reader for NumPy `.npy` files holding a single 2-D array.
//!
//! Supports format versions 1 through 3, C order, little-endian
//! `f4`, `f8`, `u1`, `u2`, `i2` and `i4`. Values are widened or narrowed to `f32`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use heightmesh_grid::{GridError, HeightGrid};
use log::debug;

use crate::error::IoError;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dtype {
    F4,
    F8,
    U1,
    U2,
    I2,
    I4,
}

impl Dtype {
    pub fn parse(descr: &str) -> Option<Dtype> {
        let mut chars = descr.chars();
        let order = chars.next()?;
        let code = chars.as_str();
        match (order, code) {
            ('<', "f4") => Some(Dtype::F4),
            ('<', "f8") => Some(Dtype::F8),
            ('|' | '<', "u1") => Some(Dtype::U1),
            ('<', "u2") => Some(Dtype::U2),
            ('<', "i2") => Some(Dtype::I2),
            ('<', "i4") => Some(Dtype::I4),
            _ => None,
        }
    }

    #[inline]
    pub fn size(self) -> usize {
        match self {
            Dtype::U1 => 1,
            Dtype::U2 | Dtype::I2 => 2,
            Dtype::F4 | Dtype::I4 => 4,
            Dtype::F8 => 8,
        }
    }

    fn decode(self, b: &[u8]) -> f32 {
        match self {
            Dtype::F4 => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            Dtype::F8 => f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f32,
            Dtype::U1 => b[0] as f32,
            Dtype::U2 => u16::from_le_bytes([b[0], b[1]]) as f32,
            Dtype::I2 => i16::from_le_bytes([b[0], b[1]]) as f32,
            Dtype::I4 => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32,
        }
    }
}

/// Parsed header dictionary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NpyHeader {
    pub descr: String,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
}

impl NpyHeader {
    /// Parses the Python dict literal that follows the preamble, e.g.
    /// `{'descr': '<f4', 'fortran_order': False, 'shape': (3, 4), }`.
    pub fn parse(text: &str) -> Result<NpyHeader, IoError> {
        let descr = {
            let rest = value_of(text, "descr")?;
            let quote = rest
                .chars()
                .next()
                .filter(|c| *c == '\'' || *c == '"')
                .ok_or_else(|| IoError::npy("descr is not a string"))?;
            let body = &rest[1..];
            let end = body
                .find(quote)
                .ok_or_else(|| IoError::npy("unterminated descr"))?;
            body[..end].to_string()
        };
        let fortran_order = {
            let rest = value_of(text, "fortran_order")?;
            if rest.starts_with("True") {
                true
            } else if rest.starts_with("False") {
                false
            } else {
                return Err(IoError::npy("fortran_order is not a bool"));
            }
        };
        let shape = {
            let rest = value_of(text, "shape")?;
            let body = rest
                .strip_prefix('(')
                .ok_or_else(|| IoError::npy("shape is not a tuple"))?;
            let end = body
                .find(')')
                .ok_or_else(|| IoError::npy("unterminated shape"))?;
            body[..end]
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    // Python 2 era writers append an `L` to long ints
                    s.trim_end_matches('L')
                        .parse::<usize>()
                        .map_err(|_| IoError::npy(format!("bad shape entry `{s}`")))
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(NpyHeader {
            descr,
            fortran_order,
            shape,
        })
    }
}

fn value_of<'a>(text: &'a str, key: &str) -> Result<&'a str, IoError> {
    let pos = text
        .find(&format!("'{key}'"))
        .or_else(|| text.find(&format!("\"{key}\"")))
        .ok_or_else(|| IoError::npy(format!("header has no `{key}`")))?;
    let rest = text[pos + key.len() + 2..].trim_start();
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| IoError::npy(format!("missing `:` after `{key}`")))?;
    Ok(rest.trim_start())
}

fn read_header<R: Read>(reader: &mut R) -> Result<NpyHeader, IoError> {
    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(IoError::npy("bad magic string"));
    }
    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let header_len = match version[0] {
        1 => {
            let mut b = [0u8; 2];
            reader.read_exact(&mut b)?;
            u16::from_le_bytes(b) as usize
        }
        2 | 3 => {
            let mut b = [0u8; 4];
            reader.read_exact(&mut b)?;
            u32::from_le_bytes(b) as usize
        }
        v => return Err(IoError::npy(format!("unsupported format version {v}.{}", version[1]))),
    };
    let mut raw = vec![0u8; header_len];
    reader.read_exact(&mut raw)?;
    let text = std::str::from_utf8(&raw).map_err(|_| IoError::npy("header is not text"))?;
    NpyHeader::parse(text)
}

/// Reads a 2-D array from any `.npy` stream.
pub fn read_grid<R: Read>(mut reader: R) -> Result<HeightGrid, IoError> {
    let header = read_header(&mut reader)?;
    let dtype = Dtype::parse(&header.descr)
        .ok_or_else(|| IoError::npy(format!("unsupported dtype `{}`", header.descr)))?;
    if header.fortran_order {
        return Err(IoError::npy("fortran-ordered arrays are not supported"));
    }
    let [rows, cols] = header.shape[..] else {
        return Err(IoError::npy(format!(
            "expected a 2-D array, got shape {:?}",
            header.shape
        )));
    };
    let n_bytes = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(dtype.size()))
        .ok_or_else(|| IoError::npy("array size overflows"))?;
    // Allocation is bounded by the bytes actually present, not the declared shape
    let mut raw = Vec::new();
    reader.take(n_bytes as u64).read_to_end(&mut raw)?;
    if raw.len() != n_bytes {
        return Err(IoError::npy(format!(
            "payload holds {} bytes, shape {}x{} of {:?} needs {}",
            raw.len(),
            rows,
            cols,
            dtype,
            n_bytes
        )));
    }
    let values: Vec<f32> = raw.chunks_exact(dtype.size()).map(|b| dtype.decode(b)).collect();
    debug!("npy {:?} {}x{}", dtype, rows, cols);
    HeightGrid::new(rows, cols, values).map_err(|e| IoError::Grid(GridError::from(e)))
}

pub fn load_grid(path: impl AsRef<Path>) -> Result<HeightGrid, IoError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_grid(BufReader::new(file)).map_err(|e| e.at_path(path))
}
