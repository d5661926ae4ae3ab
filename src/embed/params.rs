use once_cell::sync::Lazy;
use regex::Regex;
use strum::{AsRefStr, Display, EnumString};

use super::decode::{decode_text, percent_decode};
use super::escape::escape_html;

/// Braille blank; keeps the description non-empty when no text is supplied.
pub const PLACEHOLDER_GLYPH: &str = "\u{2800}";

/// Title and site name used when the parameter is omitted entirely.
pub const DEFAULT_PLACEHOLDER_TITLE: &str = "〔 ͟𝀛͟𝀛͟╹͟⌵͟╹͟𝀛͟𝀛͟ 〕";

pub const DEFAULT_IMAGE_URL: &str = "https://files.catbox.moe/1f995e.webp";

pub const DEFAULT_THEME_COLOR: &str = "fc7ea4";

/// Width and height assumed for a small avatar when none are given.
pub const SMALL_AVATAR_SIZE: &str = "45";

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid regex")
});

static DIMENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,5}$").expect("valid regex"));

// ── Query params ───────────────────────────────────────────────────────────

/// Raw `GET /embed` query. Every field is optional; `title` and `siteName`
/// additionally distinguish an empty value from an absent one.
///
/// Built from the decoded key/value pairs with [`FromIterator`]: the first
/// occurrence of a key wins and unknown keys are ignored.
#[derive(Debug, Default, Clone)]
pub struct EmbedQuery {
    pub text: Option<String>,
    pub img: Option<String>,
    pub color: Option<String>,
    pub title: Option<String>,
    pub site_name: Option<String>,
    pub avatar_type: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_width: Option<String>,
    pub avatar_height: Option<String>,
}

impl FromIterator<(String, String)> for EmbedQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = EmbedQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "text" => &mut query.text,
                "img" => &mut query.img,
                "color" => &mut query.color,
                "title" => &mut query.title,
                "siteName" => &mut query.site_name,
                "avatarType" => &mut query.avatar_type,
                "avatarUrl" => &mut query.avatar_url,
                "avatarWidth" => &mut query.avatar_width,
                "avatarHeight" => &mut query.avatar_height,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

// ── Resolved view ──────────────────────────────────────────────────────────

/// State of a text parameter that may be omitted, blanked, or set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    /// Parameter absent: use the default text.
    Default,
    /// Parameter present but empty: suppress the field.
    Hidden,
    /// Parameter carries an encoded value.
    Custom(String),
}

impl FieldState {
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            None => FieldState::Default,
            Some("") => FieldState::Hidden,
            Some(token) => FieldState::Custom(token.to_string()),
        }
    }

    /// Decode and escape into the text the renderer will emit.
    pub fn resolve(self) -> ToggleText {
        match self {
            FieldState::Default => ToggleText {
                text: DEFAULT_PLACEHOLDER_TITLE.to_string(),
                show: true,
            },
            FieldState::Hidden => ToggleText {
                text: String::new(),
                show: false,
            },
            FieldState::Custom(token) => ToggleText {
                text: escape_html(&decode_text(Some(&token))),
                show: true,
            },
        }
    }
}

/// Escaped text plus whether its meta tag is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleText {
    pub text: String,
    pub show: bool,
}

impl ToggleText {
    /// The text, if shown and non-empty.
    pub fn visible(&self) -> Option<&str> {
        Some(self.text.as_str()).filter(|t| self.show && !t.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AvatarKind {
    None,
    Small,
    Large,
    /// Any unrecognised value. Still counts as "not none" for the image
    /// override.
    #[strum(default)]
    Other(String),
}

impl AvatarKind {
    fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or(AvatarKind::None)
    }

    pub fn as_str(&self) -> &str {
        match self {
            AvatarKind::None => "none",
            AvatarKind::Small => "small",
            AvatarKind::Large => "large",
            AvatarKind::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CardType {
    Summary,
    SummaryLargeImage,
}

impl From<&AvatarKind> for CardType {
    fn from(kind: &AvatarKind) -> Self {
        match kind {
            AvatarKind::Large => CardType::SummaryLargeImage,
            _ => CardType::Summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    pub kind: AvatarKind,
    /// Raw, still percent-encoded URL.
    pub url: String,
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSize {
    pub width: String,
    pub height: String,
}

/// Everything the renderer needs, already escaped where free text is involved.
#[derive(Debug, Clone)]
pub struct EmbedView {
    pub description: String,
    pub title: ToggleText,
    pub site_name: ToggleText,
    pub image_url: String,
    /// Hex digits without `#`. Not escaped.
    pub theme_color: String,
    pub avatar: Avatar,
    pub card_type: CardType,
    pub image_size: Option<ImageSize>,
}

// ── Validation policy ──────────────────────────────────────────────────────

/// How `color`, `avatarWidth` and `avatarHeight` are treated. These values
/// are written into the document unescaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamPolicy {
    /// Use values verbatim.
    #[default]
    Passthrough,
    /// Replace malformed colours with the default and drop malformed sizes.
    Strict,
}

impl ParamPolicy {
    fn color(self, raw: Option<&str>) -> String {
        match (self, raw) {
            (_, None) => DEFAULT_THEME_COLOR.to_string(),
            (ParamPolicy::Strict, Some(c)) if !HEX_COLOR.is_match(c) => {
                tracing::warn!(color = %c, "rejecting malformed theme color");
                DEFAULT_THEME_COLOR.to_string()
            }
            (_, Some(c)) => c.to_string(),
        }
    }

    fn dimension(self, raw: Option<&str>, field: &'static str) -> Option<String> {
        let value = raw?;
        if self == ParamPolicy::Strict && !DIMENSION.is_match(value) {
            tracing::warn!(field, value = %value, "rejecting malformed avatar dimension");
            return None;
        }
        Some(value.to_string())
    }
}

// ── Resolution ─────────────────────────────────────────────────────────────

/// Treat an empty value the same as a missing one.
fn supplied(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.is_empty())
}

/// Apply defaults and overrides to a raw query.
pub fn resolve(query: &EmbedQuery, policy: ParamPolicy) -> EmbedView {
    let text = decode_text(query.text.as_deref());
    let description = escape_html(if text.is_empty() {
        PLACEHOLDER_GLYPH
    } else {
        &text
    });

    let title = FieldState::from_param(query.title.as_deref()).resolve();
    let site_name = FieldState::from_param(query.site_name.as_deref()).resolve();

    let img_url = supplied(&query.img)
        .map(|img| escape_html(&percent_decode(img)))
        .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());

    let avatar = Avatar {
        kind: AvatarKind::from_param(supplied(&query.avatar_type)),
        url: supplied(&query.avatar_url).unwrap_or_default().to_string(),
        width: policy.dimension(supplied(&query.avatar_width), "avatarWidth"),
        height: policy.dimension(supplied(&query.avatar_height), "avatarHeight"),
    };

    let image_url = if avatar.kind != AvatarKind::None && !avatar.url.is_empty() {
        escape_html(&percent_decode(&avatar.url))
    } else {
        img_url
    };

    let image_size = match (&avatar.kind, &avatar.width, &avatar.height) {
        (AvatarKind::Small, w, h) => Some(ImageSize {
            width: w.clone().unwrap_or_else(|| SMALL_AVATAR_SIZE.to_string()),
            height: h.clone().unwrap_or_else(|| SMALL_AVATAR_SIZE.to_string()),
        }),
        (AvatarKind::Large, Some(w), Some(h)) => Some(ImageSize {
            width: w.clone(),
            height: h.clone(),
        }),
        _ => None,
    };

    let card_type = CardType::from(&avatar.kind);
    let theme_color = policy.color(supplied(&query.color));

    tracing::debug!(
        title_shown = title.show,
        site_name_shown = site_name.show,
        avatar = avatar.kind.as_str(),
        card = %card_type,
        "resolved embed parameters"
    );

    EmbedView {
        description,
        title,
        site_name,
        image_url,
        theme_color,
        avatar,
        card_type,
        image_size,
    }
}
