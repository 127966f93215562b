//! Array loading and saving.
//!
//! Maps and masks are read from NumPy `.npy` files or from JSON documents
//! holding an array of rows. Every numeric `.npy` dtype is widened to `f64`;
//! JSON `null` entries become NaN.

use ndarray::{Array2, ArrayView2, ShapeBuilder};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, RplotError};
use crate::field::finite_range;
use crate::logging::log_data_load_stats;

/// On-disk array encodings, selected by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayFormat {
    Npy,
    Json,
}

impl ArrayFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("npy") => Ok(ArrayFormat::Npy),
            Some("json") => Ok(ArrayFormat::Json),
            _ => Err(RplotError::DataLoad {
                message: format!(
                    "Unsupported array file {}: expected a .npy or .json extension",
                    path.display()
                ),
            }),
        }
    }
}

/// Load a 2D array from a `.npy` or `.json` file
pub fn load_array(path: &Path) -> Result<Array2<f64>> {
    // Check if the file exists
    if !path.exists() {
        return Err(RplotError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let format = ArrayFormat::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);
    let (array, dtype) = match format {
        ArrayFormat::Npy => read_npy(reader)?,
        ArrayFormat::Json => (read_json(reader)?, "json".to_string()),
    };

    log_data_load_stats(
        &path.display().to_string(),
        array.dim(),
        &dtype,
        finite_range(array.view()),
    );
    Ok(array)
}

/// Save a 2D array as `.npy` (little-endian `f64`, C order) or `.json`
pub fn save_array(path: &Path, data: ArrayView2<f64>) -> Result<()> {
    let format = ArrayFormat::from_path(path)?;
    let writer = BufWriter::new(File::create(path)?);
    match format {
        ArrayFormat::Npy => write_npy(writer, data)?,
        ArrayFormat::Json => write_json(writer, data)?,
    }
    debug!(path = %path.display(), shape = ?data.dim(), "Array saved");
    Ok(())
}

fn read_npy<R: Read>(reader: R) -> Result<(Array2<f64>, String)> {
    let npy = npyz::NpyFile::new(reader)?;
    let shape = npy.shape().to_vec();
    let fortran = matches!(npy.order(), npyz::Order::Fortran);
    let dtype = npy.dtype().descr();

    let (rows, cols) = match shape.as_slice() {
        [rows, cols] => (*rows as usize, *cols as usize),
        other => {
            return Err(RplotError::DataLoad {
                message: format!("Expected a 2D array, got shape {:?}", other),
            });
        }
    };

    let values = widen_to_f64(npy)?;
    let array = if fortran {
        Array2::from_shape_vec((rows, cols).f(), values)
    } else {
        Array2::from_shape_vec((rows, cols), values)
    }
    .map_err(|e| RplotError::DataLoad {
        message: format!("Array data does not match shape {:?}: {}", shape, e),
    })?;

    debug!(dtype = %dtype, fortran_order = fortran, "Decoded npy array");
    Ok((array, dtype))
}

/// Read every element as `f64`, trying the supported element types in turn
fn widen_to_f64<R: Read>(npy: npyz::NpyFile<R>) -> Result<Vec<f64>> {
    macro_rules! try_element {
        ($npy:expr, $ty:ty) => {
            match $npy.try_data::<$ty>() {
                Ok(reader) => {
                    return reader
                        .map(|v| v.map(|v| v as f64))
                        .collect::<std::io::Result<Vec<f64>>>()
                        .map_err(RplotError::from);
                }
                Err(npy) => npy,
            }
        };
    }

    let npy = try_element!(npy, f64);
    let npy = try_element!(npy, f32);
    let npy = try_element!(npy, i64);
    let npy = try_element!(npy, i32);
    let npy = try_element!(npy, i16);
    let npy = try_element!(npy, i8);
    let npy = try_element!(npy, u64);
    let npy = try_element!(npy, u32);
    let npy = try_element!(npy, u16);
    let npy = try_element!(npy, u8);

    Err(RplotError::DataLoad {
        message: format!("Unsupported npy dtype {}", npy.dtype().descr()),
    })
}

fn read_json<R: Read>(reader: R) -> Result<Array2<f64>> {
    let rows: Vec<Vec<Option<f64>>> = serde_json::from_reader(reader)?;
    let cols = rows.first().map_or(0, Vec::len);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(RplotError::DataLoad {
            message: format!(
                "Ragged JSON array: row {} has {} values, expected {}",
                i,
                row.len(),
                cols
            ),
        });
    }

    let values: Vec<f64> = rows
        .iter()
        .flatten()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();
    Array2::from_shape_vec((rows.len(), cols), values).map_err(|e| RplotError::DataLoad {
        message: format!("Failed to build array from JSON rows: {}", e),
    })
}

fn write_npy<W: std::io::Write>(writer: W, data: ArrayView2<f64>) -> Result<()> {
    use npyz::WriterBuilder;

    let (rows, cols) = data.dim();
    let mut npy = npyz::WriteOptions::<f64>::new()
        .default_dtype()
        .shape(&[rows as u64, cols as u64])
        .writer(writer)
        .begin_nd()?;
    npy.extend(data.iter().copied())?;
    npy.finish()?;
    Ok(())
}

fn write_json<W: std::io::Write>(writer: W, data: ArrayView2<f64>) -> Result<()> {
    let rows: Vec<Vec<Option<f64>>> = data
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .map(|&v| if v.is_finite() { Some(v) } else { None })
                .collect()
        })
        .collect();
    serde_json::to_writer(writer, &rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use npyz::WriterBuilder;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ArrayFormat::from_path(Path::new("map.npy")).unwrap(),
            ArrayFormat::Npy
        );
        assert_eq!(
            ArrayFormat::from_path(Path::new("map.JSON")).unwrap(),
            ArrayFormat::Json
        );
        assert!(ArrayFormat::from_path(Path::new("map.nc")).is_err());
    }

    #[test]
    fn test_npy_keeps_row_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.npy");
        let data = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];

        save_array(&path, data.view()).unwrap();
        let loaded = load_array(&path).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_npy_fortran_order_and_f32() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fortran.npy");
        let file = File::create(&path).unwrap();
        let mut writer = npyz::WriteOptions::<f32>::new()
            .default_dtype()
            .shape(&[2, 3])
            .order(npyz::Order::Fortran)
            .writer(file)
            .begin_nd()
            .unwrap();
        // column-major storage of [[1, 2, 3], [4, 5, 6]]
        writer.extend([1.0f32, 4.0, 2.0, 5.0, 3.0, 6.0]).unwrap();
        writer.finish().unwrap();

        let loaded = load_array(&path).unwrap();
        assert_eq!(loaded, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_npy_rejects_1d() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("line.npy");
        npyz::to_file_1d(&path, vec![1.0f64, 2.0]).unwrap();
        assert!(matches!(load_array(&path), Err(RplotError::DataLoad { .. })));
    }

    #[test]
    fn test_json_nulls_become_nan() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.json");
        std::fs::write(&path, "[[1.0, null], [3, 4.5]]").unwrap();

        let loaded = load_array(&path).unwrap();
        assert_eq!(loaded.dim(), (2, 2));
        assert!(loaded[[0, 1]].is_nan());
        assert_eq!(loaded[[1, 0]], 3.0);

        let out = dir.path().join("copy.json");
        save_array(&out, loaded.view()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "[[1.0,null],[3.0,4.5]]"
        );
    }

    #[test]
    fn test_json_ragged_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.json");
        std::fs::write(&path, "[[1.0, 2.0], [3.0]]").unwrap();
        assert!(matches!(load_array(&path), Err(RplotError::DataLoad { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = load_array(Path::new("/nonexistent/map.npy"));
        assert!(matches!(result, Err(RplotError::Io(_))));
    }
}
