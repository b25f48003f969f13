//! End-to-end document round trips through the public [`LayeredFile`] API:
//! build a tiny document in memory, write it to disk, read it back, and
//! check the scenarios from §8 (visibility, compression, linked-layer
//! cleanup).

use photoshop_doc::compression::{Compression, SampleWidth};
use photoshop_doc::io::Version;
use photoshop_doc::layer::header::LayerHeader;
use photoshop_doc::layer::{GroupLayer, ImageLayer, Layer};
use photoshop_doc::model::layer_and_mask::tagged_block::TaggedBlock;
use photoshop_doc::model::color_mode_data::ColorModeData;
use photoshop_doc::model::image_data::ImageData;
use photoshop_doc::model::image_resources::ImageResources;
use photoshop_doc::model::layer_and_mask::LayerAndMaskInformation;
use photoshop_doc::model::photoshop_file::PhotoshopFile;
use photoshop_doc::{Channel, ChannelStore, ColorMode, Depth, FileHeader};
use photoshop_doc::{LayeredFile, ReadOptions, WriteOptions, U8};

fn temp_path(name: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("photoshop-doc-test-{}-{}", std::process::id(), name));
    path
}

fn flat_header(width: u32, height: u32, channel_count: u16) -> FileHeader {
    FileHeader {
        version: Version::Psd,
        channel_count,
        height,
        width,
        depth: Depth::Eight,
        color_mode: ColorMode::Rgb,
    }
}

fn solid_channel(role_id: i16, width: u32, height: u32, value: u8) -> Channel {
    let samples = vec![value; width as usize * height as usize];
    Channel::from_samples(
        role_id,
        &samples,
        width,
        height,
        0.0,
        0.0,
        SampleWidth::Eight,
        Compression::Raw,
        Version::Psd,
    )
    .unwrap()
}

fn empty_document(width: u32, height: u32) -> PhotoshopFile {
    let channels = vec![vec![0u8; width as usize * height as usize]; 3];
    PhotoshopFile {
        header: flat_header(width, height, 3),
        color_mode_data: ColorModeData::new(Vec::new()),
        image_resources: ImageResources::default(),
        layer_and_mask: LayerAndMaskInformation::default(),
        image_data: ImageData {
            compression: Compression::Raw,
            channels,
        },
    }
}

#[test]
fn empty_document_round_trips_through_layered_file() {
    let path = temp_path("empty.psd");
    let _ = std::fs::remove_file(&path);

    let file = empty_document(4, 4);
    std::fs::write(&path, file.write().unwrap()).unwrap();

    let doc = LayeredFile::<U8>::read(&path, ReadOptions::default()).unwrap();
    assert_eq!(doc.width, 4);
    assert_eq!(doc.height, 4);
    assert_eq!(doc.color_mode, ColorMode::Rgb);
    assert!(doc.layers.is_empty());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn reading_a_document_declared_at_the_wrong_bit_depth_fails() {
    let path = temp_path("wrong-depth.psd");
    let _ = std::fs::remove_file(&path);

    let mut file = empty_document(2, 2);
    file.header.depth = Depth::Sixteen;
    std::fs::write(&path, file.write().unwrap()).unwrap();

    let result = LayeredFile::<U8>::read(&path, ReadOptions::default());
    assert!(result.is_err());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn write_refuses_to_overwrite_without_the_flag() {
    let path = temp_path("overwrite.psd");
    std::fs::write(&path, b"not a psd, just needs to exist").unwrap();

    let file = empty_document(1, 1);
    std::fs::write(temp_path("overwrite-src.psd"), file.write().unwrap()).unwrap();
    let doc = LayeredFile::<U8>::read(temp_path("overwrite-src.psd"), ReadOptions::default())
        .unwrap();

    let result = doc.write(&path, WriteOptions::default());
    assert!(result.is_err());

    let mut options = WriteOptions::default();
    options.overwrite = true;
    doc.write(&path, options).unwrap();

    std::fs::remove_file(&path).unwrap();
    std::fs::remove_file(temp_path("overwrite-src.psd")).unwrap();
}

#[test]
fn layer_visibility_round_trips() {
    let width = 2;
    let height = 2;
    let mut channels = ChannelStore::new();
    channels.set(solid_channel(0, width, height, 10));
    channels.set(solid_channel(1, width, height, 20));
    channels.set(solid_channel(2, width, height, 30));

    let mut header = LayerHeader {
        name: "invisible".to_string(),
        blend_mode: *b"norm",
        opacity: 255,
        clipping: 0,
        flags: Default::default(),
        top: 0,
        left: 0,
        bottom: height as i32,
        right: width as i32,
        channels,
        mask: None,
        reference_point: None,
        protected_settings: None,
        extra_tagged_blocks: Vec::new(),
    };
    header.set_visible(false);

    let layers = vec![Layer::Image(ImageLayer { header })];

    let path = temp_path("visibility.psd");
    let _ = std::fs::remove_file(&path);

    let mut file = empty_document(width, height);
    let (records, channel_data) = photoshop_doc::layer::tree::flatten(
        &layers,
        ColorMode::Rgb,
        SampleWidth::Eight,
        Version::Psd,
    )
    .unwrap();
    file.layer_and_mask.layer_info.records = records;
    file.layer_and_mask.layer_info.channel_data = channel_data;
    std::fs::write(&path, file.write().unwrap()).unwrap();

    let doc = LayeredFile::<U8>::read(&path, ReadOptions::default()).unwrap();
    let found = doc.find_layer("invisible").expect("layer survived round trip");
    assert!(!found.header().visible());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn skip_unknown_tagged_blocks_drops_unrecognized_blocks_on_read() {
    let width = 1;
    let height = 1;
    let mut channels = ChannelStore::new();
    channels.set(solid_channel(0, width, height, 1));
    channels.set(solid_channel(1, width, height, 1));
    channels.set(solid_channel(2, width, height, 1));

    let header = LayerHeader {
        name: "layer".to_string(),
        blend_mode: *b"norm",
        opacity: 255,
        clipping: 0,
        flags: Default::default(),
        top: 0,
        left: 0,
        bottom: height as i32,
        right: width as i32,
        channels,
        mask: None,
        reference_point: None,
        protected_settings: None,
        extra_tagged_blocks: vec![TaggedBlock::Other {
            key: *b"zzzz",
            data: vec![1, 2, 3, 4],
        }],
    };

    let layers = vec![Layer::Image(ImageLayer { header })];

    let path = temp_path("unknown-block.psd");
    let _ = std::fs::remove_file(&path);

    let mut file = empty_document(width, height);
    let (records, channel_data) = photoshop_doc::layer::tree::flatten(
        &layers,
        ColorMode::Rgb,
        SampleWidth::Eight,
        Version::Psd,
    )
    .unwrap();
    file.layer_and_mask.layer_info.records = records;
    file.layer_and_mask.layer_info.channel_data = channel_data;
    std::fs::write(&path, file.write().unwrap()).unwrap();

    let kept = LayeredFile::<U8>::read(&path, ReadOptions::default()).unwrap();
    let kept_layer = kept.find_layer("layer").unwrap();
    assert_eq!(kept_layer.header().extra_tagged_blocks.len(), 1);

    let mut options = ReadOptions::default();
    options.skip_unknown_tagged_blocks = true;
    let stripped = LayeredFile::<U8>::read(&path, options).unwrap();
    let stripped_layer = stripped.find_layer("layer").unwrap();
    assert!(stripped_layer.header().extra_tagged_blocks.is_empty());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn set_compression_recurses_into_groups() {
    let width = 2;
    let height = 2;
    let mut leaf_channels = ChannelStore::new();
    leaf_channels.set(solid_channel(0, width, height, 1));
    leaf_channels.set(solid_channel(1, width, height, 2));
    leaf_channels.set(solid_channel(2, width, height, 3));

    let leaf_header = LayerHeader {
        name: "leaf".to_string(),
        blend_mode: *b"norm",
        opacity: 255,
        clipping: 0,
        flags: Default::default(),
        top: 0,
        left: 0,
        bottom: height as i32,
        right: width as i32,
        channels: leaf_channels,
        mask: None,
        reference_point: None,
        protected_settings: None,
        extra_tagged_blocks: Vec::new(),
    };

    let group_header = LayerHeader {
        name: "group".to_string(),
        blend_mode: *b"pass",
        opacity: 255,
        clipping: 0,
        flags: Default::default(),
        top: 0,
        left: 0,
        bottom: height as i32,
        right: width as i32,
        channels: ChannelStore::new(),
        mask: None,
        reference_point: None,
        protected_settings: None,
        extra_tagged_blocks: Vec::new(),
    };

    let layers = vec![Layer::Group(GroupLayer {
        header: group_header,
        children: vec![Layer::Image(ImageLayer { header: leaf_header })],
        is_open: true,
    })];

    let path = temp_path("groups.psd");
    let _ = std::fs::remove_file(&path);

    let mut file = empty_document(width, height);
    let (records, channel_data) = photoshop_doc::layer::tree::flatten(
        &layers,
        ColorMode::Rgb,
        SampleWidth::Eight,
        Version::Psd,
    )
    .unwrap();
    file.layer_and_mask.layer_info.records = records;
    file.layer_and_mask.layer_info.channel_data = channel_data;
    std::fs::write(&path, file.write().unwrap()).unwrap();

    let mut doc = LayeredFile::<U8>::read(&path, ReadOptions::default()).unwrap();
    doc.set_compression(Compression::Rle).unwrap();

    let leaf = doc.find_layer("group/leaf").expect("nested leaf found by path");
    for channel in leaf.header().channels.iter() {
        assert_eq!(channel.compression(), Compression::Rle);
    }

    std::fs::remove_file(&path).unwrap();
}
