use serde::{Deserialize, Serialize};

/// The five NYC boroughs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Borough {
    Manhattan,
    Brooklyn,
    Queens,
    Bronx,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

/// Place names that pin a location to a borough.
const PLACE_NAMES: &[(&str, Borough)] = &[
    ("staten island", Borough::StatenIsland),
    ("st. george", Borough::StatenIsland),
    ("bronx", Borough::Bronx),
    ("grand concourse", Borough::Bronx),
    ("brooklyn", Borough::Brooklyn),
    ("queens", Borough::Queens),
    ("kew gardens", Borough::Queens),
    ("jamaica", Borough::Queens),
    ("flushing", Borough::Queens),
    ("long island city", Borough::Queens),
    ("manhattan", Borough::Manhattan),
    ("city hall", Borough::Manhattan),
    ("broadway", Borough::Manhattan),
];

impl Borough {
    /// Best-effort borough for a free-text location.
    ///
    /// A five-digit NYC ZIP code wins; otherwise the first known place name.
    pub fn from_location(location: &str) -> Option<Borough> {
        let lower = location.to_lowercase();

        let by_zip = zip_codes(&lower).find_map(borough_for_zip);
        by_zip.or_else(|| {
            PLACE_NAMES
                .iter()
                .find(|(name, _)| lower.contains(name))
                .map(|(_, borough)| *borough)
        })
    }
}

fn zip_codes(text: &str) -> impl Iterator<Item = u32> + '_ {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|token| token.len() == 5)
        .filter_map(|token| token.parse().ok())
}

fn borough_for_zip(zip: u32) -> Option<Borough> {
    match zip / 100 {
        100..=102 => Some(Borough::Manhattan),
        103 => Some(Borough::StatenIsland),
        104 => Some(Borough::Bronx),
        112 => Some(Borough::Brooklyn),
        110 | 111 | 113..=116 => Some(Borough::Queens),
        _ => None,
    }
}
