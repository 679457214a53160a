//! Decoding GeoTIFF and photo uploads into canonical images

mod common;

use std::io::Cursor;

use common::*;
use geopixel::raster::{decode, DecodeError, ImageFormat, RasterDecoder};
use geopixel::tiff::GeoKeyValue;

fn to_16_bit(value: u8) -> u16 {
    if value == 0 { 0 } else { value as u16 * 256 + 17 }
}

#[test]
fn chunky_8_bit_strip() {
    let image = decode(&rgb_tiff().build(), "scene.tif").unwrap();

    assert_eq!(image.format(), ImageFormat::GeoRaster);
    assert_eq!((image.width(), image.height()), (4, 2));
    assert_eq!(image.pixels(), rgb_pattern_rgba().as_slice());
    assert_eq!(image.band_count(), 3);
    assert_eq!(image.bits_per_sample(), 8);
    assert_eq!(image.file_name(), "scene.tif");
}

#[test]
fn strips_split_across_rows() {
    let bytes = rgb_tiff()
        .strips(1, vec![RGB_PATTERN[..12].to_vec(), RGB_PATTERN[12..].to_vec()])
        .build();
    assert_eq!(decode(&bytes, "scene.tif").unwrap().pixels(), rgb_pattern_rgba().as_slice());
}

#[test]
fn sixteen_bit_matches_eight_bit() {
    let builder = TiffBuilder::new(4, 2).samples(3, 16, 1);
    let wide: Vec<u16> = RGB_PATTERN.iter().map(|&v| to_16_bit(v)).collect();
    let data = builder.u16_samples(&wide);
    let image = decode(&builder.strips(2, vec![data]).build(), "scene.tiff").unwrap();

    assert_eq!(image.pixels(), rgb_pattern_rgba().as_slice());
    assert_eq!(image.bits_per_sample(), 16);
}

#[test]
fn big_endian_sixteen_bit() {
    let builder = TiffBuilder::new(4, 2).big_endian().samples(3, 16, 1);
    let wide: Vec<u16> = RGB_PATTERN.iter().map(|&v| to_16_bit(v)).collect();
    let data = builder.u16_samples(&wide);
    let image = decode(&builder.strips(2, vec![data]).build(), "scene.TIF").unwrap();

    assert_eq!(image.pixels(), rgb_pattern_rgba().as_slice());
}

#[test]
fn big_tiff_container() {
    let bytes = rgb_tiff().big_tiff().build();
    assert_eq!(decode(&bytes, "scene.tif").unwrap().pixels(), rgb_pattern_rgba().as_slice());
}

#[test]
fn planar_bands() {
    let planes: Vec<Vec<u8>> = (0..3)
        .map(|band| RGB_PATTERN.iter().skip(band).step_by(3).copied().collect())
        .collect();
    let bytes = TiffBuilder::new(4, 2)
        .samples(3, 8, 1)
        .tag(PLANAR_CONFIGURATION, Value::Short(vec![2]))
        .strips(2, planes)
        .build();

    assert_eq!(decode(&bytes, "scene.tif").unwrap().pixels(), rgb_pattern_rgba().as_slice());
}

#[test]
fn padded_tile() {
    let mut tile = vec![0u8; 16 * 16 * 3];
    tile[..12].copy_from_slice(&RGB_PATTERN[..12]);
    tile[16 * 3..16 * 3 + 12].copy_from_slice(&RGB_PATTERN[12..]);
    let bytes = TiffBuilder::new(4, 2).samples(3, 8, 1).tiles(16, 16, vec![tile]).build();

    assert_eq!(decode(&bytes, "scene.tif").unwrap().pixels(), rgb_pattern_rgba().as_slice());
}

#[test]
fn deflate_compressed_strip() {
    let bytes = rgb_tiff()
        .tag(COMPRESSION, Value::Short(vec![8]))
        .strips(2, vec![deflate(&RGB_PATTERN)])
        .build();
    assert_eq!(decode(&bytes, "scene.tif").unwrap().pixels(), rgb_pattern_rgba().as_slice());
}

#[test]
fn deflate_with_horizontal_predictor() {
    let differenced = difference_rows_u8(&RGB_PATTERN, 4, 3);
    let bytes = rgb_tiff()
        .tag(COMPRESSION, Value::Short(vec![32946]))
        .tag(PREDICTOR, Value::Short(vec![2]))
        .strips(2, vec![deflate(&differenced)])
        .build();
    assert_eq!(decode(&bytes, "scene.tif").unwrap().pixels(), rgb_pattern_rgba().as_slice());
}

#[test]
fn single_band_is_gray() {
    let bytes = TiffBuilder::new(2, 1).samples(1, 8, 1).strips(1, vec![vec![40, 200]]).build();
    let image = decode(&bytes, "dem.tif").unwrap();
    assert_eq!(image.pixels(), &[40, 40, 40, 255, 200, 200, 200, 255]);
}

#[test]
fn fourth_band_is_not_rendered() {
    let data = vec![10, 20, 30, 99, 40, 50, 60, 7];
    let bytes = TiffBuilder::new(2, 1).samples(4, 8, 1).strips(1, vec![data]).build();
    let image = decode(&bytes, "multispectral.tif").unwrap();

    assert_eq!(image.pixels(), &[10, 20, 30, 255, 40, 50, 60, 255]);
    assert_eq!(image.band_count(), 4);
}

#[test]
fn float_samples_normalize() {
    let builder = TiffBuilder::new(3, 1).samples(1, 32, 3);
    let data = builder.f32_samples(&[3000.0, 100.4, f32::NAN]);
    let image = decode(&builder.strips(1, vec![data]).build(), "reflectance.tif").unwrap();

    assert_eq!(image.pixel(0, 0), Some([11, 11, 11, 255]));
    assert_eq!(image.pixel(1, 0), Some([100, 100, 100, 255]));
    assert_eq!(image.pixel(2, 0), Some([0, 0, 0, 255]));
}

fn georeferenced() -> TiffBuilder {
    rgb_tiff()
        .tag(GEO_KEY_DIRECTORY, Value::Short(vec![
            1, 1, 0, 3,
            1024, 0, 1, 1,
            1026, GEO_ASCII_PARAMS, 22, 0,
            3072, 0, 1, 32633,
        ]))
        .tag(GEO_ASCII_PARAMS, Value::Ascii("WGS 84 / UTM zone 33N|".to_string()))
        .tag(MODEL_PIXEL_SCALE, Value::Double(vec![10.0, 10.0, 0.0]))
        .tag(MODEL_TIEPOINT, Value::Double(vec![0.0, 0.0, 0.0, 500000.0, 4000000.0, 0.0]))
        .tag(IMAGE_DESCRIPTION, Value::Ascii("Sentinel-2 true colour".to_string()))
        .tag(SOFTWARE, Value::Ascii("GDAL 3.8".to_string()))
        .tag(DATE_TIME, Value::Ascii("2024:05:01 10:00:00".to_string()))
        .tag(GDAL_METADATA, Value::Ascii(
            r#"<GDALMetadata><Item name="CLOUD_COVER">3.5</Item><Item name="SCALE" sample="0">0.0001</Item></GDALMetadata>"#.to_string(),
        ))
        .tag(GDAL_NODATA, Value::Ascii("0".to_string()))
}

#[test]
fn metadata_is_surfaced() {
    let image = decode(&georeferenced().build(), "scene.tif").unwrap();
    let metadata = image.geo_metadata().unwrap();

    assert_eq!(metadata.geo_keys.get("GTModelTypeGeoKey"), Some(&GeoKeyValue::Integer(1)));
    assert_eq!(metadata.geo_key_integer("ProjectedCSTypeGeoKey"), Some(32633));
    assert_eq!(
        metadata.geo_keys.get("GTCitationGeoKey"),
        Some(&GeoKeyValue::Text("WGS 84 / UTM zone 33N".to_string()))
    );
    assert_eq!(metadata.pixel_scale, Some([10.0, 10.0, 0.0]));
    assert_eq!(metadata.tie_points.as_ref().map(Vec::len), Some(6));
    assert_eq!(metadata.description.as_deref(), Some("Sentinel-2 true colour"));
    assert_eq!(metadata.software.as_deref(), Some("GDAL 3.8"));
    assert_eq!(metadata.capture_time.as_deref(), Some("2024:05:01 10:00:00"));
    assert_eq!(metadata.gdal_metadata.get("CLOUD_COVER").map(String::as_str), Some("3.5"));
    assert_eq!(metadata.gdal_metadata.get("SCALE[0]").map(String::as_str), Some("0.0001"));
    assert_eq!(metadata.no_data.as_deref(), Some("0"));
    assert_eq!(image.pixels(), rgb_pattern_rgba().as_slice());
}

#[test]
fn corrupt_metadata_tag_does_not_fail_decode() {
    // Three doubles whose offset points past the end of the file
    let bytes = georeferenced()
        .tag(MODEL_PIXEL_SCALE, Value::Raw { field_type: 12, count: 3, bytes: 0x00FF_FF00u32.to_le_bytes().to_vec() })
        .build();
    let image = decode(&bytes, "scene.tif").unwrap();
    let metadata = image.geo_metadata().unwrap();

    assert_eq!(metadata.pixel_scale, None);
    assert_eq!(metadata.geo_key_integer("ProjectedCSTypeGeoKey"), Some(32633));
    assert_eq!(image.pixels(), rgb_pattern_rgba().as_slice());
}

#[test]
fn plain_tiff_has_empty_metadata() {
    let image = decode(&rgb_tiff().build(), "scene.tif").unwrap();
    assert!(image.geo_metadata().unwrap().is_empty());
}

#[test]
fn truncated_strip_is_corrupt() {
    let bytes = rgb_tiff().strips(2, vec![RGB_PATTERN[..10].to_vec()]).build();
    assert!(matches!(decode(&bytes, "scene.tif"), Err(DecodeError::CorruptData(_))));
}

#[test]
fn lzw_is_unsupported_data() {
    let bytes = rgb_tiff().tag(COMPRESSION, Value::Short(vec![5])).build();
    assert!(matches!(decode(&bytes, "scene.tif"), Err(DecodeError::CorruptData(_))));
}

#[test]
fn missing_dimensions_are_corrupt() {
    let bytes = rgb_tiff().without_tag(IMAGE_WIDTH).build();
    assert!(matches!(decode(&bytes, "scene.tif"), Err(DecodeError::CorruptData(_))));
}

#[test]
fn oversized_tile_dimensions_are_corrupt() {
    let bytes = TiffBuilder::new(1, 1).samples(3, 8, 1).tiles(u32::MAX, u32::MAX, vec![vec![1, 2, 3]]).build();
    assert!(matches!(decode(&bytes, "scene.tif"), Err(DecodeError::CorruptData(_))));
}

#[test]
fn largest_tile_with_short_data_is_corrupt() {
    let bytes = TiffBuilder::new(1, 1)
        .samples(3, 8, 1)
        .tag(COMPRESSION, Value::Short(vec![8]))
        .tiles(65536, 65536, vec![deflate(&[1, 2, 3])])
        .build();
    assert!(matches!(decode(&bytes, "scene.tif"), Err(DecodeError::CorruptData(_))));
}

#[test]
fn unknown_extension_is_unsupported() {
    let bytes = rgb_tiff().build();
    assert!(matches!(decode(&bytes, "scene.gif"), Err(DecodeError::UnsupportedFormat(_))));
}

#[test]
fn size_limit_applies_to_rasters() {
    let bytes = rgb_tiff().build();
    let decoder = RasterDecoder::with_max_file_size(bytes.len() as u64 - 1);
    assert!(matches!(decoder.decode(&bytes, "scene.tif"), Err(DecodeError::FileTooLarge { .. })));
}

#[test]
fn png_photo() {
    let rgba = rgb_pattern_rgba();
    let mut png = Cursor::new(Vec::new());
    image::write_buffer_with_format(&mut png, &rgba, 4, 2, image::ExtendedColorType::Rgba8, image::ImageFormat::Png)
        .unwrap();

    let image = decode(png.get_ref(), "photo.PNG").unwrap();
    assert_eq!(image.format(), ImageFormat::StandardPhoto);
    assert_eq!(image.pixels(), rgba.as_slice());
    assert!(image.geo_metadata().is_none());
    assert_eq!(image.source_byte_size(), png.get_ref().len() as u64);
}

#[test]
fn jpeg_photo_dimensions() {
    let rgb = vec![128u8; 8 * 8 * 3];
    let mut jpeg = Cursor::new(Vec::new());
    image::write_buffer_with_format(&mut jpeg, &rgb, 8, 8, image::ExtendedColorType::Rgb8, image::ImageFormat::Jpeg)
        .unwrap();

    let image = decode(jpeg.get_ref(), "photo.jpeg").unwrap();
    assert_eq!((image.width(), image.height()), (8, 8));
    assert_eq!(image.pixel(3, 3).map(|px| px[3]), Some(255));
}

#[test]
fn photo_must_hold_png_or_jpeg() {
    let tiff_as_png = rgb_tiff().build();
    assert!(matches!(decode(&tiff_as_png, "photo.png"), Err(DecodeError::CorruptData(_))));

    let rgb = vec![128u8; 4 * 4 * 3];
    let mut bmp = Cursor::new(Vec::new());
    image::write_buffer_with_format(&mut bmp, &rgb, 4, 4, image::ExtendedColorType::Rgb8, image::ImageFormat::Bmp)
        .unwrap();
    assert!(matches!(decode(bmp.get_ref(), "photo.jpg"), Err(DecodeError::CorruptData(_))));
}

#[tokio::test]
async fn decode_on_worker_thread() {
    let image = RasterDecoder::new().decode_async(rgb_tiff().build(), "scene.tif".to_string()).await.unwrap();
    assert_eq!(image.pixels(), rgb_pattern_rgba().as_slice());
}
