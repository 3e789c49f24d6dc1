/// Domain types for Cadence
pub mod audio;
pub mod container;
pub mod metadata;

pub use audio::{AudioInfo, ChannelLayout, SampleFormat};
pub use container::{
    AttachedPicture, AudioStreamParams, ContainerInfo, DurationEstimation, RawChapter, RawTag,
    StandardKey,
};
pub use metadata::{
    Chapter, CoverArt, MetadataEntry, MetadataFormat, PrimaryMetadata, ReplayGain,
    REPLAYGAIN_REFERENCE_LUFS,
};
