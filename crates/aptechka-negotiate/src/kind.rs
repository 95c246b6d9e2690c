use std::fmt;
use std::str::FromStr;

use crate::error::NegotiateError;

pub const JSON_LABEL: &str = "application/json";
pub const LWP_LABEL: &str = "application/lwp";
pub const LWP_V1_LABEL: &str = "application/x-lwp-v1";
pub const MSGPACK_LABEL: &str = "application/msgpack";

/// One of the three wire representations of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Named JSON object.
    Plain,
    /// Positional LWP frame in a JSON array.
    Positional,
    /// MessagePack map.
    GeneralBinary,
}

impl ContentKind {
    /// All kinds in default server preference order.
    pub const ALL: [ContentKind; 3] = [Self::Plain, Self::Positional, Self::GeneralBinary];

    /// Canonical media type produced for this kind.
    pub fn label(self) -> &'static str {
        match self {
            Self::Plain => JSON_LABEL,
            Self::Positional => LWP_LABEL,
            Self::GeneralBinary => MSGPACK_LABEL,
        }
    }

    /// Short name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Positional => "positional",
            Self::GeneralBinary => "general-binary",
        }
    }

    /// Match a media type, ignoring case and parameters.
    ///
    /// `application/x-lwp-v1` is accepted as an alias of the positional kind.
    pub fn from_label(label: &str) -> Option<Self> {
        known_label(label).map(|(_, kind)| kind)
    }
}

const KNOWN_LABELS: [(&str, ContentKind); 4] = [
    (JSON_LABEL, ContentKind::Plain),
    (LWP_LABEL, ContentKind::Positional),
    (LWP_V1_LABEL, ContentKind::Positional),
    (MSGPACK_LABEL, ContentKind::GeneralBinary),
];

fn known_label(label: &str) -> Option<(&'static str, ContentKind)> {
    let media_type = label.split(';').next().unwrap_or_default().trim();
    KNOWN_LABELS
        .into_iter()
        .find(|(known, _)| media_type.eq_ignore_ascii_case(known))
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContentKind {
    type Err = NegotiateError;

    /// Accepts a short name (`plain`, `positional`, `lwp`, `general-binary`,
    /// `msgpack`) or a media type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "json" => Ok(Self::Plain),
            "positional" | "lwp" => Ok(Self::Positional),
            "general-binary" | "msgpack" => Ok(Self::GeneralBinary),
            _ => Self::from_label(s).ok_or_else(|| NegotiateError::UnsupportedKind(s.to_string())),
        }
    }
}

/// Parse an HTTP Accept header into a ranked list of known kinds.
///
/// Entries are ranked by `q` weight (default 1) with ties kept in header
/// order. `*/*` and `application/*` expand to `server_preference`. Entries
/// with `q=0` exclude their kinds, unknown media types are dropped, and each
/// kind appears at most once. An absent or blank header yields
/// `server_preference`.
pub fn parse_accept(header: Option<&str>, server_preference: &[ContentKind]) -> Vec<ContentKind> {
    let header = match header.map(str::trim) {
        Some(header) if !header.is_empty() => header,
        _ => return server_preference.to_vec(),
    };

    let mut ranked: Vec<(f32, Vec<ContentKind>)> = Vec::new();
    let mut excluded: Vec<ContentKind> = Vec::new();

    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let media_type = parts.next().unwrap_or_default().trim();
        if media_type.is_empty() {
            continue;
        }
        let Some(weight) = parse_weight(parts) else {
            continue;
        };

        let kinds = if media_type == "*/*" || media_type.eq_ignore_ascii_case("application/*") {
            server_preference.to_vec()
        } else {
            match ContentKind::from_label(media_type) {
                Some(kind) => vec![kind],
                None => continue,
            }
        };

        if weight <= 0.0 {
            excluded.extend(kinds);
        } else {
            ranked.push((weight, kinds));
        }
    }

    // sort_by is stable: equal weights keep header order.
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut out = Vec::with_capacity(ContentKind::ALL.len());
    for kind in ranked.into_iter().flat_map(|(_, kinds)| kinds) {
        if !excluded.contains(&kind) && !out.contains(&kind) {
            out.push(kind);
        }
    }
    out
}

/// The media type to label a `kind` response with, given the caller's
/// Accept header.
///
/// This is the highest-weighted label the header names explicitly for
/// `kind` (first wins on a tie), so an alias such as `application/x-lwp-v1`
/// is echoed back. Wildcard-only or absent headers get the canonical label.
pub fn accepted_label(header: Option<&str>, kind: ContentKind) -> &'static str {
    let mut best: Option<(f32, &'static str)> = None;
    for entry in header.unwrap_or_default().split(',') {
        let mut parts = entry.split(';');
        let Some((label, entry_kind)) = known_label(parts.next().unwrap_or_default()) else {
            continue;
        };
        if entry_kind != kind {
            continue;
        }
        let Some(weight) = parse_weight(parts) else {
            continue;
        };
        if weight > 0.0 && best.map_or(true, |(top, _)| weight > top) {
            best = Some((weight, label));
        }
    }
    best.map_or(kind.label(), |(_, label)| label)
}

/// Read the `q` parameter. `None` means the weight is malformed.
fn parse_weight<'a>(params: impl Iterator<Item = &'a str>) -> Option<f32> {
    for param in params {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("q") {
            let weight: f32 = value.trim().parse().ok()?;
            return (0.0..=1.0).contains(&weight).then_some(weight);
        }
    }
    Some(1.0)
}
