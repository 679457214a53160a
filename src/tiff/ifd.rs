//! Image File Directory (IFD) structures and methods
//!
//! An IFD is the collection of tag entries describing one image in a TIFF
//! file. Only the directory itself is stored here; resolving an entry to
//! its values needs the file bytes and is done by `TiffReader`.

use std::collections::HashMap;
use std::fmt;
use log::{debug, trace};

use crate::tiff::constants::{field_types, tags};
use crate::utils::tag_utils;

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD, in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Index into `entries` by tag
    tag_map: HashMap<u16, usize>,
}

/// Represents an entry in an Image File Directory (IFD)
///
/// `raw_value` keeps the undecoded value/offset field exactly as stored,
/// because inline values are laid out in the file's byte order and cannot
/// be recovered from the decoded offset alone.
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Value field decoded as an offset
    pub value_offset: u64,
    /// Raw value/offset field (first 4 bytes used in classic TIFF)
    pub raw_value: [u8; 8],
}

impl IFDEntry {
    /// Creates a new IFD entry
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64, raw_value: [u8; 8]) -> Self {
        trace!("IFD entry: tag={} ({}), type={} ({}), count={}, offset/value={}",
               tag, tag_utils::get_tag_name(tag),
               field_type, tag_utils::get_field_type_name(field_type),
               count, value_offset);

        Self {
            tag,
            field_type,
            count,
            value_offset,
            raw_value,
        }
    }

    /// Get the size in bytes for this entry's field type
    pub fn get_field_type_size(&self) -> u64 {
        match self.field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
            field_types::SHORT | field_types::SSHORT => 2,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
            _ => {
                debug!("Unknown field type: {}, assuming 1 byte", self.field_type);
                1
            }
        }
    }

    /// Total size of the entry's values in bytes, saturating on overflow
    pub fn byte_len(&self) -> u64 {
        self.get_field_type_size().saturating_mul(self.count)
    }

    /// Determines if the value is stored inline in the value/offset field
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        let inline_size = if is_big_tiff { 8 } else { 4 };
        self.byte_len() <= inline_size
    }

    /// Returns a human-readable description of this entry
    pub fn description(&self) -> String {
        let value_display = match self.tag {
            tags::COMPRESSION => format!("{} ({})",
                                         self.value_offset,
                                         tag_utils::get_compression_name(self.value_offset)),
            _ => self.value_offset.to_string(),
        };

        format!("Tag: {} ({}), Type: {} ({}), Count: {}, Value/Offset: {}",
                self.tag, tag_utils::get_tag_name(self.tag),
                self.field_type, tag_utils::get_field_type_name(self.field_type),
                self.count, value_display)
    }
}

impl IFD {
    /// Creates a new, empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        debug!("Creating IFD #{} at offset {}", number, offset);

        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry to this IFD
    ///
    /// A repeated tag keeps its first occurrence for lookups.
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("Adding entry to IFD #{}: {}", self.number, entry.description());

        self.tag_map.entry(entry.tag).or_insert(self.entries.len());
        self.entries.push(entry);
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&index| &self.entries[index])
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;
        writeln!(f, "  Tags:")?;
        for entry in &self.entries {
            writeln!(f, "    {} ({}): count {} [{}]",
                     entry.tag,
                     tag_utils::get_tag_name(entry.tag),
                     entry.count,
                     tag_utils::get_field_type_name(entry.field_type))?;
        }

        Ok(())
    }
}
