//! Deterministic tag colours.
//!
//! A tag's colour is a pure function of its normalised name, so two tags that
//! differ only in case or surrounding whitespace always look the same. Stored
//! colours must stay byte-identical across releases: the hash runs over UTF-16
//! code units with wrapping 32-bit FNV-1a arithmetic, and channels round
//! half-to-even.

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

const SATURATION: f64 = 0.45;
const LIGHTNESS: f64 = 0.85;

/// Name used for hashing when the input is blank.
const FALLBACK_NAME: &str = "tag";

/// Maps a tag name to a `#RRGGBB` colour.
pub fn derive_color(name: &str) -> String {
    let normalized = normalize(name);
    let hue = fnv1a(&normalized) % 360;
    hsl_to_hex(hue, SATURATION, LIGHTNESS)
}

/// Lowercases one character at a time, so a word-final `Σ` becomes `σ` rather than `ς`.
fn normalize(name: &str) -> String {
    let trimmed: String = name.trim().chars().flat_map(char::to_lowercase).collect();
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed
    }
}

fn fnv1a(input: &str) -> u32 {
    input.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

fn hsl_to_hex(hue: u32, s: f64, l: f64) -> String {
    let h = f64::from(hue);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match hue {
        0..60 => (c, x, 0.0),
        60..120 => (x, c, 0.0),
        120..180 => (0.0, c, x),
        180..240 => (0.0, x, c),
        240..300 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    format!("#{:02X}{:02X}{:02X}", channel(r, m), channel(g, m), channel(b, m))
}

fn channel(component: f64, m: f64) -> u8 {
    ((component + m) * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}
