//! KMZ reader.
//!
//! A KMZ file is a zip archive holding a KML document, by convention
//! `doc.kml` at the root. Archives without one fall back to the first `.kml`
//! entry in directory order.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use super::error::TrackError;
use super::kml::parse_kml;
use super::types::Track;

/// Entry name KMZ writers use for the main document.
const MAIN_DOCUMENT: &str = "doc.kml";

/// Parses the KML document inside a KMZ archive.
pub fn parse_kmz(bytes: &[u8]) -> Result<Track, TrackError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| TrackError::Archive(e.to_string()))?;

    let name = archive
        .file_names()
        .find(|n| n.eq_ignore_ascii_case(MAIN_DOCUMENT))
        .or_else(|| {
            archive
                .file_names()
                .find(|n| n.to_ascii_lowercase().ends_with(".kml"))
        })
        .map(str::to_owned)
        .ok_or_else(|| TrackError::Archive("archive holds no .kml document".to_string()))?;

    debug!(entry = %name, "Reading KML from KMZ");
    let mut entry = archive
        .by_name(&name)
        .map_err(|e| TrackError::Archive(format!("{}: {}", name, e)))?;

    // Reading to the end verifies the entry's CRC-32
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| TrackError::Archive(format!("{}: {}", name, e)))?;
    parse_kml(&xml)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    /// Writes `files` into an in-memory zip archive.
    pub(crate) fn zip_archive(files: &[(&str, &[u8])], method: CompressionMethod) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(method);
        for (name, content) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    const KML: &[u8] = br#"<kml><Placemark><LineString><coordinates>1,2 3,4</coordinates></LineString></Placemark></kml>"#;

    #[test]
    fn test_deflated_doc_kml() {
        let icon: &[u8] = b"not read";
        let zip = zip_archive(
            &[("files/icon.png", icon), ("doc.kml", KML)],
            CompressionMethod::Deflated,
        );
        let track = parse_kmz(&zip).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.positions()[1].lat, 4.0);
    }

    #[test]
    fn test_stored_entry() {
        let zip = zip_archive(&[("doc.kml", KML)], CompressionMethod::Stored);
        assert_eq!(parse_kmz(&zip).unwrap().len(), 2);
    }

    #[test]
    fn test_falls_back_to_first_kml() {
        let readme: &[u8] = b"hi";
        let zip = zip_archive(
            &[("readme.txt", readme), ("tracks/ride.KML", KML)],
            CompressionMethod::Deflated,
        );
        assert_eq!(parse_kmz(&zip).unwrap().len(), 2);
    }

    #[test]
    fn test_doc_kml_preferred() {
        let other: &[u8] = br#"<kml><LineString><coordinates>5,5</coordinates></LineString></kml>"#;
        let zip = zip_archive(
            &[("a.kml", other), ("DOC.KML", KML)],
            CompressionMethod::Stored,
        );
        assert_eq!(parse_kmz(&zip).unwrap().len(), 2);
    }

    #[test]
    fn test_no_kml_entry() {
        let readme: &[u8] = b"hi";
        let zip = zip_archive(&[("readme.txt", readme)], CompressionMethod::Stored);
        assert!(matches!(parse_kmz(&zip), Err(TrackError::Archive(_))));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            parse_kmz(b"<kml></kml> definitely not a zip archive"),
            Err(TrackError::Archive(_))
        ));
        assert!(matches!(parse_kmz(b"PK"), Err(TrackError::Archive(_))));
    }

    #[test]
    fn test_corrupted_entry_fails_checksum() {
        let kml: &[u8] = br#"<kml><LineString><coordinates>7,45 7.5,45.5</coordinates></LineString></kml>"#;
        let mut zip = zip_archive(&[("doc.kml", kml)], CompressionMethod::Stored);

        let at = zip
            .windows(4)
            .position(|w| w == b"45.5")
            .expect("stored entry holds the coordinate text");
        zip[at..at + 4].copy_from_slice(b"49.5");

        assert!(matches!(parse_kmz(&zip), Err(TrackError::Archive(_))));
    }

    #[test]
    fn test_truncated_archive() {
        let zip = zip_archive(&[("doc.kml", KML)], CompressionMethod::Deflated);
        let mut damaged = zip[..40].to_vec();
        damaged.extend_from_slice(&zip[zip.len() - 80..]);
        assert!(parse_kmz(&damaged).is_err());
    }
}
