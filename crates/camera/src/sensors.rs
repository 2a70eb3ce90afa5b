//! Sensor widths (mm) for cameras whose EXIF omits focal-plane resolution
//!
//! Keys are normalized sensor identities, see [`crate::Parser::extract_sensor`].

const SENSOR_WIDTHS: &[(&str, f64)] = &[
    // DJI
    ("dji fc220", 6.17),
    ("dji fc300c", 6.17),
    ("dji fc300s", 6.17),
    ("dji fc300x", 6.17),
    ("dji fc330", 6.17),
    ("dji fc350", 6.17),
    ("dji fc550", 17.3),
    ("dji fc2103", 6.3),
    ("dji fc2204", 6.3),
    ("dji fc3170", 6.4),
    ("dji fc3411", 13.2),
    ("dji fc3582", 9.7),
    ("dji fc6310", 13.2),
    ("dji fc6310s", 13.2),
    ("dji fc6510", 13.2),
    ("dji fc6520", 17.3),
    ("dji fc6540", 23.5),
    ("dji fc7203", 6.3),
    ("dji fc7303", 6.3),
    ("dji l1d-20c", 13.2),
    ("dji zenmuse p1", 35.9),
    ("hasselblad l1d-20c", 13.2),
    ("hasselblad l2d-20c", 17.3),
    // Parrot
    ("parrot anafi", 6.17),
    ("parrot bebop 2", 6.17),
    ("parrot sequoia", 4.8),
    // MicaSense
    ("micasense rededge", 4.8),
    ("micasense rededge-m", 4.8),
    ("micasense altum", 7.12),
    // GoPro
    ("gopro hero3+ black edition", 6.17),
    ("gopro hero4 black", 6.17),
    ("gopro hero5 black", 6.17),
    // Sony
    ("sony dsc-rx100", 13.2),
    ("sony dsc-rx100m2", 13.2),
    ("sony ilce-5100", 23.5),
    ("sony ilce-6000", 23.5),
    ("sony ilce-7rm2", 35.9),
    ("sony ilce-qx1", 23.2),
    // Canon
    ("canon powershot s100", 7.44),
    ("canon powershot s110", 7.44),
    ("canon powershot sx260 hs", 6.17),
    ("canon eos 5d mark iii", 36.0),
    // Yuneec
    ("yuneec e90", 13.2),
    ("yuneec cgo3+", 6.17),
];

/// Sensor width in millimeters for a normalized `"<make> <model>"` identity
pub fn sensor_width(sensor: &str) -> Option<f64> {
    SENSOR_WIDTHS
        .iter()
        .find(|(name, _)| *name == sensor)
        .map(|(_, width)| *width)
}
