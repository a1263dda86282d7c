//! Static reference data offered to the design form.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    Traditional,
    Modern,
    Artistic,
}

#[derive(Debug, Clone, Serialize)]
pub struct StyleOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: StyleCategory,
    /// Neutral art-style descriptor used in prompts.
    #[serde(skip)]
    pub descriptor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SizeOption {
    pub id: &'static str,
    pub name: &'static str,
    pub dimensions: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub body_part: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub examples: &'static [&'static str],
    #[serde(skip)]
    pub descriptor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub styles: &'static [StyleOption],
    pub sizes: &'static [SizeOption],
    pub locations: &'static [LocationOption],
    pub themes: &'static [ThemeOption],
    pub moods: &'static [&'static str],
    pub color_preferences: &'static [ColorOption],
}

pub static STYLES: &[StyleOption] = &[
    StyleOption {
        id: "line-art",
        name: "line art",
        description: "Clean, minimal designs built from lines",
        category: StyleCategory::Modern,
        descriptor: "clean line drawing style",
    },
    StyleOption {
        id: "abstract",
        name: "abstract",
        description: "Geometric forms and abstract patterns",
        category: StyleCategory::Artistic,
        descriptor: "abstract geometric style",
    },
    StyleOption {
        id: "traditional",
        name: "traditional",
        description: "Classic motifs and traditional technique",
        category: StyleCategory::Traditional,
        descriptor: "classical artistic style",
    },
    StyleOption {
        id: "minimalism",
        name: "minimalism",
        description: "Simple, meaningful, few elements",
        category: StyleCategory::Modern,
        descriptor: "minimalist style",
    },
    StyleOption {
        id: "watercolor",
        name: "watercolor",
        description: "Soft colors that bleed like paint",
        category: StyleCategory::Artistic,
        descriptor: "watercolor painting style",
    },
    StyleOption {
        id: "tribal",
        name: "tribal",
        description: "Bold, primal tribal patterns",
        category: StyleCategory::Traditional,
        descriptor: "tribal pattern style",
    },
];

pub static SIZES: &[SizeOption] = &[
    SizeOption {
        id: "small",
        name: "small",
        dimensions: "2-5cm",
    },
    SizeOption {
        id: "medium",
        name: "medium",
        dimensions: "5-10cm",
    },
    SizeOption {
        id: "large",
        name: "large",
        dimensions: "10cm+",
    },
];

pub static LOCATIONS: &[LocationOption] = &[
    LocationOption {
        id: "arm",
        name: "arm",
        description: "Upper arm, forearm, shoulder",
        body_part: "upper_limb",
    },
    LocationOption {
        id: "leg",
        name: "leg",
        description: "Thigh, calf",
        body_part: "lower_limb",
    },
    LocationOption {
        id: "back",
        name: "back",
        description: "Shoulder blades, lower back, spine",
        body_part: "torso",
    },
    LocationOption {
        id: "wrist",
        name: "wrist",
        description: "Inner or outer wrist",
        body_part: "upper_limb",
    },
    LocationOption {
        id: "ankle",
        name: "ankle",
        description: "Inner or outer ankle",
        body_part: "lower_limb",
    },
    LocationOption {
        id: "chest",
        name: "chest",
        description: "Center or side of the chest",
        body_part: "torso",
    },
];

pub static THEMES: &[ThemeOption] = &[
    ThemeOption {
        id: "nature",
        name: "nature",
        description: "Plants, animals, landscapes",
        examples: &["flower", "tree", "animal", "sea", "mountain"],
        descriptor: "nature elements",
    },
    ThemeOption {
        id: "symbolic",
        name: "symbolic",
        description: "Geometric shapes and symbols",
        examples: &["circle", "triangle", "star", "heart", "arrow"],
        descriptor: "geometric patterns",
    },
    ThemeOption {
        id: "cultural",
        name: "cultural",
        description: "Traditional and folk elements",
        examples: &["traditional patterns", "talisman", "mythology"],
        descriptor: "cultural symbols",
    },
    ThemeOption {
        id: "personal",
        name: "personal",
        description: "Personal meaning and memories",
        examples: &["name", "date", "motto", "family"],
        descriptor: "personal symbols",
    },
    ThemeOption {
        id: "artistic",
        name: "artistic",
        description: "Art works and creative expression",
        examples: &["painting", "sculpture", "architecture", "music"],
        descriptor: "artistic elements",
    },
];

pub static MOODS: &[&str] = &[
    "calm",
    "intense",
    "elegant",
    "strong",
    "mysterious",
    "friendly",
    "luxurious",
    "free",
    "orderly",
    "creative",
];

pub static COLOR_PREFERENCES: &[ColorOption] = &[
    ColorOption {
        id: "black",
        name: "black & grey",
        description: "Black and white only",
    },
    ColorOption {
        id: "color",
        name: "color",
        description: "A range of colors",
    },
    ColorOption {
        id: "both",
        name: "mixed",
        description: "Black and grey combined with color",
    },
];

pub fn catalog() -> Catalog {
    Catalog {
        styles: STYLES,
        sizes: SIZES,
        locations: LOCATIONS,
        themes: THEMES,
        moods: MOODS,
        color_preferences: COLOR_PREFERENCES,
    }
}

/// Folds case, `-` and `_` so "Line-Art" and "line art" compare equal.
pub(crate) fn normalize_term(term: &str) -> String {
    term.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

pub fn find_style(term: &str) -> Option<&'static StyleOption> {
    let key = normalize_term(term);
    STYLES
        .iter()
        .find(|s| normalize_term(s.id) == key || s.name == key)
}

pub fn find_location(term: &str) -> Option<&'static LocationOption> {
    let key = normalize_term(term);
    LOCATIONS.iter().find(|l| l.id == key || l.name == key)
}

pub fn find_theme(term: &str) -> Option<&'static ThemeOption> {
    let key = normalize_term(term);
    THEMES.iter().find(|t| t.id == key || t.name == key)
}
