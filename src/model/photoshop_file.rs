//! The whole document as four sections in file order (§4.4
//! "PhotoshopFile"): FileHeader, ColorModeData, ImageResources,
//! LayerAndMaskInformation, ImageData.

use crate::compression::SampleWidth;
use crate::error::{PsdError, Result};
use crate::io::{Cursor, Version, Writer};
use crate::model::color_mode_data::ColorModeData;
use crate::model::header::FileHeader;
use crate::model::image_data::ImageData;
use crate::model::image_resources::ImageResources;
use crate::model::layer_and_mask::LayerAndMaskInformation;

const SECTION: &str = "PhotoshopFile";

/// The whole document, parsed section by section. The file is assumed to
/// fit in memory for reading; see [`crate::io::stream`] for how bytes get
/// here from disk.
#[derive(Debug, Clone)]
pub struct PhotoshopFile {
    /// The 26-byte file header.
    pub header: FileHeader,
    /// The (usually empty) color mode data section.
    pub color_mode_data: ColorModeData,
    /// Image resource blocks (resolution, ICC profile, slices, ...).
    pub image_resources: ImageResources,
    /// The layer tree's on-disk representation.
    pub layer_and_mask: LayerAndMaskInformation,
    /// The flat document preview.
    pub image_data: ImageData,
}

impl PhotoshopFile {
    /// Parse a whole document from its bytes.
    pub fn read(bytes: &[u8]) -> Result<PhotoshopFile> {
        let mut cursor = Cursor::new(bytes, SECTION);

        let header_bytes = cursor.read(26)?;
        let header = FileHeader::read(header_bytes)?;
        let version = header.version;

        let color_mode_len = cursor.read_u32()? as u64;
        let color_mode_data = ColorModeData::new(cursor.read(color_mode_len)?.to_vec());

        let image_resources_len = cursor.read_u32()? as u64;
        let image_resources = ImageResources::read(cursor.read(image_resources_len)?)?;

        let layer_and_mask_len = cursor.read_variant_wide(version)?;
        let layer_and_mask =
            LayerAndMaskInformation::read(cursor.read(layer_and_mask_len)?, version)?;

        let sample = SampleWidth::from_bit_depth(header.depth as u16);
        let image_data_bytes = cursor.read(cursor.remaining() as u64)?;
        let image_data = ImageData::read(
            image_data_bytes,
            header.width,
            header.height,
            header.channel_count,
            sample,
            version,
        )?;

        Ok(PhotoshopFile {
            header,
            color_mode_data,
            image_resources,
            layer_and_mask,
            image_data,
        })
    }

    /// Serialize the whole document.
    pub fn write(&self) -> Result<Vec<u8>> {
        let version = self.header.version;
        let mut writer = Writer::new();

        self.header.write(&mut writer);

        writer.write_u32(self.color_mode_data.as_bytes().len() as u32);
        writer.write_bytes(self.color_mode_data.as_bytes());

        let resources_patch = writer.reserve_u32();
        self.image_resources.write(&mut writer);
        writer.patch_length_since(resources_patch);

        let layer_and_mask_patch = writer.reserve_variant_wide(version);
        self.layer_and_mask.write(&mut writer, version);
        writer.patch_length_since(layer_and_mask_patch);

        let sample = SampleWidth::from_bit_depth(self.header.depth as u16);
        self.image_data
            .write(&mut writer, self.header.width, self.header.height, sample, version)
            .map_err(|e| match e {
                PsdError::Codec { source, .. } => {
                    PsdError::codec(SECTION, writer.position(), source)
                }
                other => other,
            })?;

        Ok(writer.into_bytes())
    }
}
