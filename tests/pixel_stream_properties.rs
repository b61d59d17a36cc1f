//! Property tests for the pixel transcoder and parameter pass-through.

use std::io::{self, Write};
use std::sync::Arc;

use proptest::prelude::*;

use jpx_filter::{
    CodecError, CodecRegistry, DecodeOptions, DecodedImage, Filter, JpxFilter, Parameters,
    PixelGrid, PixelStreamWriter, Value, WaveletDecoder,
};

#[derive(Default)]
struct RecordingSink {
    data: Vec<u8>,
    writes: Vec<usize>,
}

impl Write for RecordingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        self.writes.push(buf.len());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn grid_strategy() -> impl Strategy<Value = PixelGrid> {
    (0u32..24, 0u32..24).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u32>(), (w * h) as usize)
            .prop_map(move |pixels| PixelGrid::new(w, h, pixels).unwrap())
    })
}

fn reference_bytes(grid: &PixelGrid) -> Vec<u8> {
    grid.pixels()
        .iter()
        .flat_map(|&p| [(p >> 16) as u8, (p >> 8) as u8, p as u8])
        .collect()
}

/// Always returns the same grid.
struct FixedDecoder(PixelGrid);

impl WaveletDecoder for FixedDecoder {
    fn name(&self) -> &str {
        "fixed"
    }

    fn decode(&self, _data: &[u8], _options: &DecodeOptions) -> Result<DecodedImage, CodecError> {
        Ok(DecodedImage::new(self.0.clone()))
    }
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        any::<bool>().prop_map(Value::Boolean),
        "[A-Za-z]{1,8}".prop_map(Value::Name),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn transcode_writes_three_bytes_per_pixel(grid in grid_strategy(), pixels in 1usize..64) {
        let writer = PixelStreamWriter::with_pixels(pixels).unwrap();
        let mut sink = RecordingSink::default();
        let n = writer.transcode(&grid, &mut sink).unwrap();

        prop_assert_eq!(n as usize, 3 * grid.width() as usize * grid.height() as usize);
        prop_assert_eq!(sink.data.len(), n as usize);
    }

    #[test]
    fn flushes_never_split_a_triplet(grid in grid_strategy(), pixels in 1usize..16) {
        let writer = PixelStreamWriter::with_pixels(pixels).unwrap();
        let mut sink = RecordingSink::default();
        writer.transcode(&grid, &mut sink).unwrap();

        let capacity = writer.capacity();
        for &len in &sink.writes {
            prop_assert_eq!(len % 3, 0);
            prop_assert!(len > 0 && len <= capacity);
        }
        if sink.data.len() > capacity {
            prop_assert!(sink.writes.len() > 1);
        }
        prop_assert_eq!(&sink.data, &reference_bytes(&grid));
    }

    #[test]
    fn decode_result_is_superset_of_input(
        entries in prop::collection::btree_map("[A-Z][a-z]{0,10}", value_strategy(), 0..8),
    ) {
        let params = entries.into_iter().collect::<Parameters>();
        let grid = PixelGrid::new(2, 2, vec![0x00FF_FFFF; 4]).unwrap();
        let registry = CodecRegistry::new().with_decoder(Arc::new(FixedDecoder(grid)));
        let filter = JpxFilter::with_registry(Arc::new(registry));

        let mut out = Vec::new();
        let result = filter
            .decode_default(&mut &b"\xFF\x4F"[..], &mut out, &params, 0)
            .unwrap();

        prop_assert!(result.parameters().is_superset_of(&params));
        prop_assert_eq!(out.len(), 12);
    }
}
