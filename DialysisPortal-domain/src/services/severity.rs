use crate::entities::{DisplayPriority, Severity};

/// Display palette entry for a severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    /// CSS-style hex color
    pub hex: &'static str,
    pub rgb: (u8, u8, u8),
    pub priority: DisplayPriority,
}

const MILD: PaletteEntry = PaletteEntry {
    hex: "#16a34a",
    rgb: (22, 163, 74),
    priority: DisplayPriority::Low,
};

const MODERATE: PaletteEntry = PaletteEntry {
    hex: "#d97706",
    rgb: (217, 119, 6),
    priority: DisplayPriority::Medium,
};

const SEVERE: PaletteEntry = PaletteEntry {
    hex: "#dc2626",
    rgb: (220, 38, 38),
    priority: DisplayPriority::High,
};

const VERY_SEVERE: PaletteEntry = PaletteEntry {
    hex: "#7f1d1d",
    rgb: (127, 29, 29),
    priority: DisplayPriority::Critical,
};

const UNSPECIFIED: PaletteEntry = PaletteEntry {
    hex: "#6b7280",
    rgb: (107, 114, 128),
    priority: DisplayPriority::Medium,
};

/// Intensity on a 1-10 scale
pub fn intensity(severity: Severity) -> u8 {
    match severity {
        Severity::Mild => 3,
        Severity::Moderate => 6,
        Severity::Severe => 9,
        Severity::VerySevere => 10,
        Severity::Unspecified => 5,
    }
}

/// Map a raw severity label straight to its intensity
pub fn severity_to_intensity(label: Option<&str>) -> u8 {
    intensity(Severity::from_label(label))
}

pub fn palette(severity: Severity) -> PaletteEntry {
    match severity {
        Severity::Mild => MILD,
        Severity::Moderate => MODERATE,
        Severity::Severe => SEVERE,
        Severity::VerySevere => VERY_SEVERE,
        Severity::Unspecified => UNSPECIFIED,
    }
}

/// Human label shown to patients and clinicians
pub fn label(severity: Severity) -> &'static str {
    match severity {
        Severity::Mild => "Leve",
        Severity::Moderate => "Moderada",
        Severity::Severe => "Grave",
        Severity::VerySevere => "Muito grave",
        Severity::Unspecified => "Não informada",
    }
}
