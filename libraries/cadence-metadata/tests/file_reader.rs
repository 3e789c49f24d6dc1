//! Primary metadata assembly against a scripted backend

use cadence_core::{
    AttachedPicture, AudioStreamParams, CadenceError, ChannelLayout, ContainerBackend,
    ContainerInfo, DurationEstimation, MetadataFormat, RawChapter, RawTag, ReplayGain,
    SampleFormat, StandardKey,
};
use cadence_metadata::{FileReader, MetadataError};
use proptest::prelude::*;
use std::path::Path;

/// Backend returning a fixed snapshot for every path
struct FakeBackend {
    info: Option<ContainerInfo>,
    brute_force: Option<f64>,
}

impl FakeBackend {
    fn with_tags(extension: &str, tags: Vec<RawTag>) -> Self {
        let mut info = ContainerInfo::new(format!("/music/track.{extension}"));
        info.format_name = extension.to_string();
        info.duration = 10.0;
        info.duration_estimation = DurationEstimation::FromStream;
        info.tags = tags;
        Self {
            info: Some(info),
            brute_force: None,
        }
    }

    fn failing() -> Self {
        Self {
            info: None,
            brute_force: None,
        }
    }

    fn reader(self) -> FileReader<Self> {
        FileReader::with_backend(self)
    }
}

impl ContainerBackend for FakeBackend {
    fn open(&self, path: &Path) -> cadence_core::Result<ContainerInfo> {
        self.info
            .clone()
            .ok_or_else(|| CadenceError::format_initialization(path, "no such container"))
    }

    fn brute_force_duration(&self, path: &Path) -> cadence_core::Result<f64> {
        self.brute_force
            .ok_or_else(|| CadenceError::format_initialization(path, "cannot walk packets"))
    }
}

fn path(extension: &str) -> std::path::PathBuf {
    Path::new("/music").join(format!("track.{extension}"))
}

#[test]
fn open_failure_is_format_initialization() {
    let reader = FakeBackend::failing().reader();
    let err = reader.get_primary_metadata(&path("mp3")).unwrap_err();

    match err {
        MetadataError::FormatInitialization { path, reason } => {
            assert_eq!(path, Path::new("/music/track.mp3"));
            assert_eq!(reason, "no such container");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scalars_come_from_the_highest_priority_parser() {
    let reader = FakeBackend::with_tags(
        "mp3",
        vec![
            RawTag::new("TITLE", "Vorbis Title"),
            RawTag::new("TIT2", "ID3 Title"),
            RawTag::new("ALBUM", "Vorbis Album"),
            RawTag::new("TPE1", "   "),
            RawTag::new("ARTIST", "Vorbis Artist"),
        ],
    )
    .reader();

    let metadata = reader.get_primary_metadata(&path("mp3")).unwrap();

    assert_eq!(metadata.title.as_deref(), Some("ID3 Title"));
    assert_eq!(metadata.album.as_deref(), Some("Vorbis Album"));
    // Blank values never shadow a lower-priority parser
    assert_eq!(metadata.artist.as_deref(), Some("Vorbis Artist"));
}

#[test]
fn any_drm_flag_rejects_the_file() {
    let reader = FakeBackend::with_tags(
        "wma",
        vec![
            RawTag::new("Title", "Protected Song"),
            RawTag::new("Is_Protected", "1"),
        ],
    )
    .reader();

    assert!(matches!(
        reader.get_primary_metadata(&path("wma")),
        Err(MetadataError::DrmProtected { .. })
    ));

    // A higher-priority parser saying "not protected" does not override it
    let reader = FakeBackend::with_tags(
        "wma",
        vec![
            RawTag::new("Title", "Song"),
            RawTag::new("WM/Protected", "0"),
            RawTag::new("ProtectedContent", "1"),
        ],
    )
    .reader();

    assert!(matches!(
        reader.get_primary_metadata(&path("wma")),
        Err(MetadataError::DrmProtected { .. })
    ));
}

#[test]
fn unprotected_files_report_the_flag() {
    let reader = FakeBackend::with_tags(
        "wma",
        vec![
            RawTag::new("Title", "Song"),
            RawTag::new("WM/Protected", "0"),
        ],
    )
    .reader();

    let metadata = reader.get_primary_metadata(&path("wma")).unwrap();
    assert_eq!(metadata.is_protected, Some(false));
}

#[test]
fn standalone_total_fills_a_missing_total() {
    let reader = FakeBackend::with_tags(
        "mp3",
        vec![
            RawTag::new("TRCK", "5"),
            RawTag::new("TXXX:TOTALTRACKS", "12"),
            RawTag::new("TPOS", "1"),
            RawTag::new("TXXX:TOTALDISCS", "2"),
        ],
    )
    .reader();

    let metadata = reader.get_primary_metadata(&path("mp3")).unwrap();
    assert_eq!((metadata.track_number, metadata.total_tracks), (Some(5), Some(12)));
    assert_eq!((metadata.disc_number, metadata.total_discs), (Some(1), Some(2)));
}

#[test]
fn combined_total_ignores_standalone_total() {
    let reader = FakeBackend::with_tags(
        "mp3",
        vec![
            RawTag::new("TRCK", "5/9"),
            RawTag::new("TXXX:TOTALTRACKS", "12"),
        ],
    )
    .reader();

    let metadata = reader.get_primary_metadata(&path("mp3")).unwrap();
    assert_eq!((metadata.track_number, metadata.total_tracks), (Some(5), Some(9)));
}

#[test]
fn number_and_total_come_from_the_same_parser() {
    // mp3 order: common, ID3, Vorbis. ID3 holds the number, so its
    // standalone total applies and the Vorbis pair is ignored.
    let reader = FakeBackend::with_tags(
        "mp3",
        vec![
            RawTag::new("TIT2", "Song"),
            RawTag::new("TRCK", "5"),
            RawTag::new("TXXX:TOTALTRACKS", "12"),
            RawTag::new("TRACKNUMBER", "3/9"),
            RawTag::new("TPOS", "1"),
            RawTag::new("DISCNUMBER", "2/4"),
        ],
    )
    .reader();

    let metadata = reader.get_primary_metadata(&path("mp3")).unwrap();
    assert_eq!((metadata.track_number, metadata.total_tracks), (Some(5), Some(12)));
    assert_eq!((metadata.disc_number, metadata.total_discs), (Some(1), None));
}

#[test]
fn total_from_a_parser_without_a_number_is_ignored() {
    // ID3 has only a total; the pair comes whole from Vorbis
    let reader = FakeBackend::with_tags(
        "mp3",
        vec![
            RawTag::new("TIT2", "Song"),
            RawTag::new("TXXX:TOTALTRACKS", "12"),
            RawTag::new("TRACKNUMBER", "3/9"),
        ],
    )
    .reader();

    let metadata = reader.get_primary_metadata(&path("mp3")).unwrap();
    assert_eq!((metadata.track_number, metadata.total_tracks), (Some(3), Some(9)));
}

#[test]
fn total_without_number_is_not_synthesised() {
    let reader = FakeBackend::with_tags(
        "flac",
        vec![RawTag::new("TITLE", "Song"), RawTag::new("TRACKTOTAL", "12")],
    )
    .reader();

    let metadata = reader.get_primary_metadata(&path("flac")).unwrap();
    assert_eq!((metadata.track_number, metadata.total_tracks), (None, None));
}

#[test]
fn auxiliary_entries_merge_last_writer_wins() {
    // mp3 order: common, ID3, Vorbis, ...; Vorbis writes after ID3
    let reader = FakeBackend::with_tags(
        "mp3",
        vec![
            RawTag::new("TIT2", "Song"),
            RawTag::new("TCOP", "a"),
            RawTag::new("TITLE", "Song"),
            RawTag::new("COPYRIGHT", "b"),
        ],
    )
    .reader();

    let metadata = reader.get_primary_metadata(&path("mp3")).unwrap();
    let entry = &metadata.auxiliary_metadata["Copyright"];
    assert_eq!(entry.value, "b");
    assert_eq!(entry.format, MetadataFormat::Vorbis);
}

#[test]
fn parsers_without_essentials_contribute_no_auxiliary_entries() {
    let reader = FakeBackend::with_tags(
        "mp3",
        vec![RawTag::new("TIT2", "Song"), RawTag::new("COPYRIGHT", "orphan")],
    )
    .reader();

    let metadata = reader.get_primary_metadata(&path("mp3")).unwrap();
    assert!(metadata.auxiliary_metadata.is_empty());
}

#[test]
fn replay_gain_alone_does_not_make_a_parser_relevant() {
    let reader = FakeBackend::with_tags(
        "mp3",
        vec![
            RawTag::new("TIT2", "Song"),
            RawTag::new("REPLAYGAIN_TRACK_GAIN", "-6.00 dB"),
            RawTag::new("COPYRIGHT", "orphan"),
        ],
    )
    .reader();

    let metadata = reader.get_primary_metadata(&path("mp3")).unwrap();
    assert!(metadata.auxiliary_metadata.is_empty());
    assert!(metadata.replay_gain.is_none());
}

#[test]
fn duration_accuracy_requires_a_positive_duration() {
    let mut backend = FakeBackend::with_tags("flac", Vec::new());
    if let Some(info) = backend.info.as_mut() {
        info.duration = 0.0;
        info.duration_estimation = DurationEstimation::FromStream;
    }

    let metadata = backend.reader().get_primary_metadata(&path("flac")).unwrap();
    assert!(!metadata.duration_is_accurate);

    let metadata = FakeBackend::with_tags("flac", Vec::new())
        .reader()
        .get_primary_metadata(&path("flac"))
        .unwrap();
    assert!(metadata.duration_is_accurate);

    let mut backend = FakeBackend::with_tags("mp3", Vec::new());
    if let Some(info) = backend.info.as_mut() {
        info.duration_estimation = DurationEstimation::FromBitrate;
    }
    let metadata = backend.reader().get_primary_metadata(&path("mp3")).unwrap();
    assert!(!metadata.duration_is_accurate);
}

#[test]
fn audio_info_is_derived_from_the_stream() {
    let mut backend = FakeBackend::with_tags("flac", Vec::new());
    if let Some(info) = backend.info.as_mut() {
        info.format_long_name = Some("raw FLAC".to_string());
        info.bit_rate = Some(880_640);
        info.audio_stream = Some(AudioStreamParams {
            codec_name: Some("flac".to_string()),
            codec_long_name: Some("Free Lossless Audio Codec (FLAC)".to_string()),
            sample_rate: Some(44100),
            channel_count: Some(2),
            sample_format: Some(SampleFormat::S24),
            channel_layout: Some(ChannelLayout::STEREO),
            replay_gain: None,
        });
    }

    let reader = backend.reader();
    let metadata = reader.get_primary_metadata(&path("flac")).unwrap();

    let audio = &metadata.audio_info;
    assert_eq!(audio.frames, Some(441_000));
    assert_eq!(audio.bit_rate, Some(860));
    assert_eq!(audio.format.as_deref(), Some("raw FLAC"));
    assert_eq!(audio.codec.as_deref(), Some("Free Lossless Audio Codec (FLAC)"));
    assert_eq!(audio.channel_layout.as_deref(), Some("Stereo"));

    assert_eq!(reader.get_audio_info(&path("flac")).unwrap().frames, Some(441_000));
}

#[test]
fn codec_replay_gain_outranks_tags() {
    let embedded = ReplayGain::from_parts(Some(-4.0), Some(0.9), None, None);

    let mut backend = FakeBackend::with_tags(
        "flac",
        vec![RawTag::new("REPLAYGAIN_TRACK_GAIN", "-8.00 dB")],
    );
    if let Some(info) = backend.info.as_mut() {
        info.audio_stream = Some(AudioStreamParams {
            replay_gain: embedded,
            ..AudioStreamParams::default()
        });
    }

    let metadata = backend.reader().get_primary_metadata(&path("flac")).unwrap();
    assert_eq!(metadata.replay_gain, embedded);
    assert_eq!(metadata.audio_info.replay_gain_from_metadata, embedded);
}

#[test]
fn tag_replay_gain_is_used_without_codec_gain() {
    let reader = FakeBackend::with_tags(
        "flac",
        vec![
            RawTag::new("TITLE", "Song"),
            RawTag::new("REPLAYGAIN_TRACK_GAIN", "-8.00 dB"),
            RawTag::new("REPLAYGAIN_TRACK_PEAK", "0.977"),
        ],
    )
    .reader();

    let rg = reader
        .get_primary_metadata(&path("flac"))
        .unwrap()
        .replay_gain
        .unwrap();
    assert_eq!(rg.track_gain, Some(-8.0));
    assert_eq!(rg.track_peak, Some(0.977));
}

#[test]
fn chapters_and_art_are_copied() {
    let mut backend = FakeBackend::with_tags(
        "m4a",
        vec![RawTag::new("TITLE", "Book").with_std_key(StandardKey::TrackTitle)],
    );
    if let Some(info) = backend.info.as_mut() {
        info.chapters = vec![
            RawChapter {
                title: Some("One".to_string()),
                start_time: 0.0,
                end_time: 4.0,
            },
            RawChapter {
                title: None,
                start_time: 4.0,
                end_time: 10.0,
            },
        ];
        info.pictures.push(AttachedPicture {
            data: vec![0x89, b'P', b'N', b'G'],
            mime_type: None,
            is_front_cover: true,
        });
    }

    let reader = backend.reader();
    let metadata = reader.get_primary_metadata(&path("m4a")).unwrap();

    assert_eq!(metadata.title.as_deref(), Some("Book"));
    assert_eq!(metadata.chapters.len(), 2);
    assert!((metadata.chapters[1].duration - 6.0).abs() < f64::EPSILON);

    let art = metadata.art.unwrap();
    assert_eq!(art.detect_mime_type(), Some("image/png"));

    assert!(reader.get_art(&path("m4a")).is_some());
}

#[test]
fn companion_operations_swallow_failures() {
    let reader = FakeBackend::failing().reader();
    assert!(reader.get_art(&path("mp3")).is_none());
    assert!(reader.compute_accurate_duration(&path("mp3")).is_none());

    let mut backend = FakeBackend::with_tags("mp3", Vec::new());
    backend.brute_force = Some(183.4);
    assert_eq!(
        backend.reader().compute_accurate_duration(&path("mp3")),
        Some(183.4)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Lower-priority values never change a resolved scalar
    #[test]
    fn lower_priority_values_never_win(
        high in "[A-Za-z][A-Za-z ]{0,20}",
        low in "[A-Za-z ]{0,20}",
    ) {
        let reader = FakeBackend::with_tags(
            "mp3",
            vec![RawTag::new("TITLE", low), RawTag::new("TIT2", high.clone())],
        )
        .reader();

        let metadata = reader.get_primary_metadata(&path("mp3")).unwrap();
        prop_assert_eq!(metadata.title, Some(high.trim().to_string()));
    }

    /// Every extension resolves to an ordering that starts with the common
    /// parser and ends with the default parser
    #[test]
    fn orderings_are_bracketed(extension in "[a-z0-9]{0,5}") {
        let parsers = cadence_metadata::ParserSet::parsers_for_extension(&extension);
        prop_assert_eq!(parsers.len(), 6);
        prop_assert_eq!(parsers[0].kind(), cadence_metadata::ParserKind::Common);
        prop_assert_eq!(parsers[5].kind(), cadence_metadata::ParserKind::Default);
    }
}
