use image::{DynamicImage, Rgba, RgbaImage};

use crate::{
    DitherMode, Framing, Pipeline, PipelineOptions, PrinterProfile, RasterEncoder, RawSink,
    WriterSink,
};

fn photo(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        let v = ((x * 255) / width) as u8;
        Rgba([v, v / 2, 255 - v, if y % 7 == 0 { 0 } else { 255 }])
    }))
}

#[test]
fn test_profile_driven_job() {
    let profile = PrinterProfile::generic_80mm();
    let opts = PipelineOptions::for_profile(&profile).with_dither(DitherMode::FloydSteinberg);
    let encoder = RasterEncoder::for_profile(&profile).unwrap();

    let cmd = Pipeline::new(opts).render(&photo(1152, 300), &encoder).unwrap();

    // 576 dots -> 72 bytes per row, 150 rows
    assert_eq!(&cmd[..8], &[0x1d, 0x76, 0x30, 0, 72, 0, 150, 0]);
    assert_eq!(cmd.len(), 8 + 72 * 150);

    let mut sink = WriterSink::new(Vec::new());
    sink.write(&cmd).unwrap();
    assert_eq!(sink.into_inner(), cmd);
}

#[test]
fn test_jobs_are_independent() {
    let pipeline = Pipeline::new(PipelineOptions::new().with_dither(DitherMode::Atkinson));
    let encoder = RasterEncoder::default().with_framing(Framing::Auto);
    let img = photo(500, 120);

    let first = pipeline.render(&img, &encoder).unwrap();
    let _other = pipeline.render(&photo(90, 90), &encoder).unwrap();
    let second = pipeline.render(&img, &encoder).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_failed_encode_yields_no_bytes() {
    let mut profile = PrinterProfile::generic_58mm();
    profile.max_buffer_size = 100;
    let encoder = RasterEncoder::for_profile(&profile).unwrap();
    let result = Pipeline::new(PipelineOptions::for_profile(&profile)).render(&photo(384, 384), &encoder);
    assert!(result.is_err());
}
