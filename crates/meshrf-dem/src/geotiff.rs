//! Raster loading from (Geo)TIFF files.
//!
//! Only the first image of the file is decoded. Georeferencing tags are not
//! interpreted; the caller supplies the ground-sample distance.

use crate::{ElevationGrid, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tracing::debug;

/// Decoder buffer ceiling; a 16k x 16k `f32` raster needs 1 GiB.
const MAX_BUFFER_BYTES: usize = 1 << 30;

impl ElevationGrid {
    /// Load an elevation grid from a single-band TIFF file.
    ///
    /// Any integer or floating-point sample type is accepted and converted to
    /// `f32` meters.
    pub fn from_geotiff<P: AsRef<Path>>(path: P, gsd_meters: f64) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let mut limits = Limits::default();
        limits.decoding_buffer_size = MAX_BUFFER_BYTES;
        limits.intermediate_buffer_size = MAX_BUFFER_BYTES;
        limits.ifd_value_size = MAX_BUFFER_BYTES;
        let mut decoder = Decoder::new(reader)?.with_limits(limits);

        let (width, height) = decoder.dimensions()?;
        let samples = read_samples(&mut decoder)?;

        debug!(
            path = %path.display(),
            width,
            height,
            gsd_meters,
            "Loaded elevation raster"
        );

        Self::try_new(width as usize, height as usize, gsd_meters, samples)
    }
}

/// First image of the file as `f32` samples.
fn read_samples<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Vec<f32>> {
    macro_rules! widen {
        ($values:expr) => {
            $values.into_iter().map(|v| v as f32).collect()
        };
    }

    Ok(match decoder.read_image()? {
        DecodingResult::F32(values) => values,
        DecodingResult::F64(values) => widen!(values),
        DecodingResult::U8(values) => widen!(values),
        DecodingResult::U16(values) => widen!(values),
        DecodingResult::U32(values) => widen!(values),
        DecodingResult::U64(values) => widen!(values),
        DecodingResult::I8(values) => widen!(values),
        DecodingResult::I16(values) => widen!(values),
        DecodingResult::I32(values) => widen!(values),
        DecodingResult::I64(values) => widen!(values),
    })
}
