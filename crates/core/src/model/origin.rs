use serde::{Deserialize, Serialize};

/// Upstream site an item was aggregated from.
///
/// Persisted as its numeric code; unknown codes decode as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Origin {
    #[default]
    Unknown,
    Xvideos,
    Porntube,
    Eporner,
    Pornone,
    Cumlouder,
    Superporn,
    Alphaporno,
}

impl Origin {
    pub fn code(self) -> u8 {
        match self {
            Origin::Unknown => 0,
            Origin::Xvideos => 1,
            Origin::Porntube => 2,
            Origin::Eporner => 3,
            Origin::Pornone => 4,
            Origin::Cumlouder => 5,
            Origin::Superporn => 6,
            Origin::Alphaporno => 8,
        }
    }

    /// Links to this origin must be served without a referer.
    pub fn is_referer_disabled(self) -> bool {
        self == Origin::Alphaporno
    }

    /// Playback goes through the origin's embed player.
    pub fn is_embed(self) -> bool {
        matches!(self, Origin::Eporner | Origin::Porntube | Origin::Superporn)
    }

    /// Playback streams the origin's video URL directly.
    pub fn is_stream(self) -> bool {
        matches!(self, Origin::Xvideos | Origin::Pornone)
    }
}

impl From<u8> for Origin {
    fn from(code: u8) -> Self {
        match code {
            1 => Origin::Xvideos,
            2 => Origin::Porntube,
            3 => Origin::Eporner,
            4 => Origin::Pornone,
            5 => Origin::Cumlouder,
            6 => Origin::Superporn,
            8 => Origin::Alphaporno,
            _ => Origin::Unknown,
        }
    }
}

impl From<Origin> for u8 {
    fn from(origin: Origin) -> Self {
        origin.code()
    }
}
