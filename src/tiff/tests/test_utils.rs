use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

/// Writes one classic little-endian IFD entry
pub fn write_entry(buffer: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: u32) {
    buffer.write_u16::<LittleEndian>(tag).unwrap();
    buffer.write_u16::<LittleEndian>(field_type).unwrap();
    buffer.write_u32::<LittleEndian>(count).unwrap();
    buffer.write_u32::<LittleEndian>(value).unwrap();
}

/// Creates a test buffer with TIFF header and an 800x600 image directory
pub fn create_test_tiff_buffer() -> Vec<u8> {
    let mut buffer = Vec::new();

    // TIFF header (little-endian)
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II for little-endian
    buffer.write_u16::<LittleEndian>(42).unwrap();     // TIFF magic number
    buffer.write_u32::<LittleEndian>(8).unwrap();      // IFD offset

    // Sample IFD (at offset 8)
    buffer.write_u16::<LittleEndian>(2).unwrap();      // Entry count (2 entries)
    write_entry(&mut buffer, 256, 4, 1, 800);          // ImageWidth (LONG)
    write_entry(&mut buffer, 257, 4, 1, 600);          // ImageLength (LONG)

    // Next IFD offset (0 = no more IFDs)
    buffer.write_u32::<LittleEndian>(0).unwrap();

    buffer
}

/// Creates a test buffer with BigTIFF header and a 1024x768 image directory
pub fn create_test_bigtiff_buffer() -> Vec<u8> {
    let mut buffer = Vec::new();

    // BigTIFF header (little-endian)
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II for little-endian
    buffer.write_u16::<LittleEndian>(43).unwrap();     // BigTIFF version
    buffer.write_u16::<LittleEndian>(8).unwrap();      // Offset size
    buffer.write_u16::<LittleEndian>(0).unwrap();      // Reserved
    buffer.write_u64::<LittleEndian>(16).unwrap();     // IFD offset

    // Sample IFD (at offset 16)
    buffer.write_u64::<LittleEndian>(2).unwrap();      // Entry count (2 entries)

    // Entry 1: ImageWidth (tag 256)
    buffer.write_u16::<LittleEndian>(256).unwrap();    // Tag
    buffer.write_u16::<LittleEndian>(4).unwrap();      // Type (LONG)
    buffer.write_u64::<LittleEndian>(1).unwrap();      // Count
    buffer.write_u64::<LittleEndian>(1024).unwrap();   // Value (width)

    // Entry 2: ImageLength/Height (tag 257)
    buffer.write_u16::<LittleEndian>(257).unwrap();    // Tag
    buffer.write_u16::<LittleEndian>(4).unwrap();      // Type (LONG)
    buffer.write_u64::<LittleEndian>(1).unwrap();      // Count
    buffer.write_u64::<LittleEndian>(768).unwrap();    // Value (height)

    // Next IFD offset (0 = no more IFDs)
    buffer.write_u64::<LittleEndian>(0).unwrap();

    buffer
}

/// Creates a big-endian TIFF whose dimensions are inline SHORT values
///
/// A SHORT stored inline sits in the first two bytes of the value field,
/// so decoding the field as a 32-bit offset would give `300 << 16`.
pub fn create_big_endian_short_tiff() -> Vec<u8> {
    let mut buffer = Vec::new();

    buffer.write_u16::<BigEndian>(0x4D4D).unwrap();    // MM for big-endian
    buffer.write_u16::<BigEndian>(42).unwrap();
    buffer.write_u32::<BigEndian>(8).unwrap();

    buffer.write_u16::<BigEndian>(2).unwrap();
    for (tag, value) in [(256u16, 300u16), (257, 200)] {
        buffer.write_u16::<BigEndian>(tag).unwrap();
        buffer.write_u16::<BigEndian>(3).unwrap();     // SHORT
        buffer.write_u32::<BigEndian>(1).unwrap();
        buffer.write_u16::<BigEndian>(value).unwrap();
        buffer.write_u16::<BigEndian>(0).unwrap();     // Padding
    }
    buffer.write_u32::<BigEndian>(0).unwrap();

    buffer
}

/// Creates a TIFF with two IFDs where the second links back to the first
pub fn create_looping_tiff() -> Vec<u8> {
    let mut buffer = Vec::new();

    buffer.write_u16::<LittleEndian>(0x4949).unwrap();
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();

    // IFD 0 at 8, 18 bytes long, links to 26
    buffer.write_u16::<LittleEndian>(1).unwrap();
    write_entry(&mut buffer, 256, 4, 1, 16);
    buffer.write_u32::<LittleEndian>(26).unwrap();

    // IFD 1 at 26, links back to 8
    buffer.write_u16::<LittleEndian>(1).unwrap();
    write_entry(&mut buffer, 256, 4, 1, 32);
    buffer.write_u32::<LittleEndian>(8).unwrap();

    buffer
}

/// Citation text stored in GeoAsciiParams by [`create_geokey_tiff`]
pub const CITATION: &str = "WGS 84 / UTM zone 33N";

/// Creates a TIFF carrying a GeoKey directory with inline, double and
/// ASCII keys
///
/// Layout: header (8), IFD at 8 with 5 entries (66 bytes), then the key
/// directory at 74 (20 SHORTs), GeoDoubleParams at 114 and GeoAsciiParams
/// at 122.
pub fn create_geokey_tiff() -> Vec<u8> {
    let mut buffer = Vec::new();
    let ascii = format!("{}|\0", CITATION);

    buffer.write_u16::<LittleEndian>(0x4949).unwrap();
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();

    buffer.write_u16::<LittleEndian>(5).unwrap();
    write_entry(&mut buffer, 256, 4, 1, 10);
    write_entry(&mut buffer, 257, 4, 1, 10);
    write_entry(&mut buffer, 34735, 3, 20, 74);
    write_entry(&mut buffer, 34736, 12, 1, 114);
    write_entry(&mut buffer, 34737, 2, ascii.len() as u32, 122);
    buffer.write_u32::<LittleEndian>(0).unwrap();
    assert_eq!(buffer.len(), 74);

    let directory: [u16; 20] = [
        1, 1, 0, 4,
        1024, 0, 1, 1,                                   // GTModelType = Projected
        1026, 34737, (CITATION.len() + 1) as u16, 0,     // GTCitation from ASCII params
        2057, 34736, 1, 0,                               // GeogSemiMajorAxis from doubles
        3072, 0, 1, 32633,                               // ProjectedCSType = UTM 33N
    ];
    for value in directory {
        buffer.write_u16::<LittleEndian>(value).unwrap();
    }

    buffer.write_f64::<LittleEndian>(6378137.0).unwrap();
    buffer.extend_from_slice(ascii.as_bytes());

    buffer
}
