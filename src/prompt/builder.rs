use crate::catalog::{find_location, find_style, find_theme};
use crate::models::{ColorPreference, DesignRequest};

pub const DEFAULT_MAX_PROMPT_LENGTH: usize = 4000;

/// Segments kept when a prompt has to be shortened.
pub const MAX_PROMPT_SEGMENTS: usize = 10;

const ARTISTIC_REQUIREMENTS: &[&str] = &[
    "High resolution digital art",
    "Clean, precise lines",
    "Professional artistic quality",
    "Visually striking and beautiful",
    "Abstract and symbolic elements",
    "No text, letters, or words",
    "Focus on visual patterns and shapes",
    "Suitable for decorative purposes",
];

/// Turns a design request into a neutral, policy-safe art prompt.
///
/// Style, location and theme go through the catalog translation tables; a
/// value the catalog does not know is used as given. Size is deliberately
/// left out since image providers ignore it.
pub fn build_prompt(request: &DesignRequest) -> String {
    let style = find_style(&request.style).map_or(request.style.as_str(), |s| s.descriptor);
    let area = find_location(&request.location)
        .map(|l| format!("{} area", l.id))
        .unwrap_or_else(|| request.location.clone());
    let theme = find_theme(&request.theme).map_or(request.theme.as_str(), |t| t.descriptor);

    let mut lines = vec![
        "Create a beautiful, detailed artistic design with the following characteristics:"
            .to_string(),
        String::new(),
        format!("Style: {}", style),
        format!("Area: {}", area),
        format!("Theme: {}", theme),
        format!("Color scheme: {}", color_scheme(request.color_preference)),
    ];

    if let Some(mood) = non_blank(&request.mood) {
        lines.push(format!("Mood: {}", mood));
    }
    if let Some(description) = non_blank(&request.description) {
        lines.push(format!("Additional details: {}", description));
    }

    lines.push(String::new());
    lines.push("Artistic requirements:".to_string());
    lines.extend(ARTISTIC_REQUIREMENTS.iter().map(|req| format!("- {}", req)));

    let mut prompt = lines.join("\n");
    prompt.push('\n');
    prompt
}

/// Shortens a prompt that is over `max_length` characters by keeping only its
/// first ten lines. Prompts within the limit come back unchanged.
pub fn optimize_for_provider(prompt: &str, max_length: usize) -> String {
    if prompt.chars().count() <= max_length {
        return prompt.to_string();
    }

    prompt
        .split('\n')
        .take(MAX_PROMPT_SEGMENTS)
        .collect::<Vec<_>>()
        .join("\n")
}

fn color_scheme(preference: Option<ColorPreference>) -> &'static str {
    match preference {
        Some(ColorPreference::Black) => "Monochrome with high contrast",
        Some(ColorPreference::Color) => "Vibrant and colorful",
        Some(ColorPreference::Both | ColorPreference::Mixed) | None => "Mixed monochrome and color",
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
