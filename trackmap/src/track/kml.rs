//! KML reader.
//!
//! Google's track extension (`<gx:Track>` with `<when>`/`<gx:coord>` pairs) is
//! preferred when present; otherwise the `<coordinates>` of every
//! `<LineString>` are read in document order.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use super::error::TrackError;
use super::types::{parse_time, Track, TrackPoint};

#[derive(Clone, Copy, PartialEq)]
enum Capture {
    None,
    Coord,
    When,
    LineCoordinates,
    Name,
}

/// Parses a KML document.
pub fn parse_kml(xml: &str) -> Result<Track, TrackError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut coords = Vec::new();
    let mut whens = Vec::new();
    let mut line_points = Vec::new();
    let mut name: Option<String> = None;

    let mut capture = Capture::None;
    let mut in_line_string = 0usize;
    let mut text = String::new();

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                capture = match e.local_name().as_ref() {
                    b"coord" => Capture::Coord,
                    b"when" => Capture::When,
                    b"coordinates" if in_line_string > 0 => Capture::LineCoordinates,
                    b"name" if name.is_none() => Capture::Name,
                    b"LineString" => {
                        in_line_string += 1;
                        Capture::None
                    }
                    _ => Capture::None,
                };
                text.clear();
            }
            Ok(Event::Text(t)) if capture != Capture::None => {
                let unescaped = t.unescape().map_err(|e| TrackError::xml(position, e))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(t)) if capture != Capture::None => {
                text.push_str(&String::from_utf8_lossy(&t));
            }
            Ok(Event::End(e)) => {
                match (capture, e.local_name().as_ref()) {
                    (Capture::Coord, b"coord") => coords.push(parse_gx_coord(&text)?),
                    (Capture::When, b"when") => whens.push(parse_time(&text)),
                    (Capture::LineCoordinates, b"coordinates") => {
                        line_points.extend(parse_coordinates(&text)?)
                    }
                    (Capture::Name, b"name") => name = Some(text.trim().to_string()),
                    (_, b"LineString") => in_line_string = in_line_string.saturating_sub(1),
                    _ => {}
                }
                capture = Capture::None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TrackError::xml(reader.buffer_position() as u64, e)),
            _ => {}
        }
        buf.clear();
    }

    let points = if coords.is_empty() {
        debug!(count = line_points.len(), "Parsed KML LineString coordinates");
        line_points
    } else {
        // <when> and <gx:coord> pair up by index when the counts match
        if whens.len() == coords.len() {
            for (point, time) in coords.iter_mut().zip(whens) {
                point.time = time;
            }
        }
        debug!(count = coords.len(), "Parsed KML gx:Track coordinates");
        coords
    };

    let track = Track::new(points);
    Ok(match name.filter(|n| !n.is_empty()) {
        Some(name) => track.with_name(name),
        None => track,
    })
}

/// `"lon lat [alt]"`
fn parse_gx_coord(text: &str) -> Result<TrackPoint, TrackError> {
    let mut parts = text.split_whitespace();
    parse_lon_lat(parts.next(), parts.next(), text)
}

/// Whitespace-separated `"lon,lat[,alt]"` tuples.
fn parse_coordinates(text: &str) -> Result<Vec<TrackPoint>, TrackError> {
    text.split_whitespace()
        .map(|tuple| {
            let mut parts = tuple.split(',');
            parse_lon_lat(parts.next(), parts.next(), tuple)
        })
        .collect()
}

fn parse_lon_lat(
    lon: Option<&str>,
    lat: Option<&str>,
    raw: &str,
) -> Result<TrackPoint, TrackError> {
    let parse = |v: Option<&str>| v.and_then(|v| v.trim().parse::<f64>().ok());
    match (parse(lon), parse(lat)) {
        (Some(lon), Some(lat)) => Ok(TrackPoint::new(lat, lon)),
        _ => Err(TrackError::InvalidPoint(format!(
            "'{}' is not a 'lon lat' pair",
            raw.trim()
        ))),
    }
}
