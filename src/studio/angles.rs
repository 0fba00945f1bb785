//! Static angle tables, display labels and studio color presets.

use serde::{Deserialize, Serialize};

/// Display language for angle labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Bn,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Language::En),
            "bn" => Some(Language::Bn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleLabel {
    Front,
    Perspective,
    Side,
    Back,
    BackPerspective,
    Top,
}

impl AngleLabel {
    pub fn text(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::En, AngleLabel::Front) => "Front Hero Shot",
            (Language::En, AngleLabel::Perspective) => "Perspective Angle",
            (Language::En, AngleLabel::Side) => "Side Profile",
            (Language::En, AngleLabel::Back) => "Rear View",
            (Language::En, AngleLabel::BackPerspective) => "Rear Perspective",
            (Language::En, AngleLabel::Top) => "Top View",
            (Language::Bn, AngleLabel::Front) => "সামনের হিরো শট",
            (Language::Bn, AngleLabel::Perspective) => "পার্সপেক্টিভ অ্যাঙ্গেল",
            (Language::Bn, AngleLabel::Side) => "সাইড প্রোফাইল",
            (Language::Bn, AngleLabel::Back) => "পেছনের দৃশ্য",
            (Language::Bn, AngleLabel::BackPerspective) => "পেছনের পার্সপেক্টিভ",
            (Language::Bn, AngleLabel::Top) => "টপ ভিউ",
        }
    }
}

/// One camera angle to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleDescriptor {
    pub id: &'static str,
    /// Render from the back photo instead of the front one
    pub uses_secondary_image: bool,
    pub prompt_text: &'static str,
    pub label: AngleLabel,
}

/// Angles used when only a front photo is supplied.
pub const SINGLE_IMAGE_ANGLES: [AngleDescriptor; 4] = [
    AngleDescriptor {
        id: "front",
        uses_secondary_image: false,
        prompt_text: "Straight front hero shot.",
        label: AngleLabel::Front,
    },
    AngleDescriptor {
        id: "perspective",
        uses_secondary_image: false,
        prompt_text: "45-degree perspective shot showing depth.",
        label: AngleLabel::Perspective,
    },
    AngleDescriptor {
        id: "side",
        uses_secondary_image: false,
        prompt_text: "90-degree side profile shot.",
        label: AngleLabel::Side,
    },
    AngleDescriptor {
        id: "top",
        uses_secondary_image: false,
        prompt_text: "Slightly elevated top-down perspective shot.",
        label: AngleLabel::Top,
    },
];

/// Angles used when both front and back photos are supplied.
pub const DUAL_IMAGE_ANGLES: [AngleDescriptor; 4] = [
    AngleDescriptor {
        id: "front",
        uses_secondary_image: false,
        prompt_text: "Straight front hero shot using the provided front image.",
        label: AngleLabel::Front,
    },
    AngleDescriptor {
        id: "front_p",
        uses_secondary_image: false,
        prompt_text: "Perspective angle using the provided front image.",
        label: AngleLabel::Perspective,
    },
    AngleDescriptor {
        id: "back",
        uses_secondary_image: true,
        prompt_text: "Straight rear hero shot using the provided back image.",
        label: AngleLabel::Back,
    },
    AngleDescriptor {
        id: "back_p",
        uses_secondary_image: true,
        prompt_text: "Rear perspective angle using the provided back image.",
        label: AngleLabel::BackPerspective,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleSet {
    Single,
    Dual,
}

impl AngleSet {
    pub fn for_inputs(has_back: bool) -> Self {
        if has_back {
            AngleSet::Dual
        } else {
            AngleSet::Single
        }
    }

    pub fn descriptors(self) -> &'static [AngleDescriptor] {
        match self {
            AngleSet::Single => &SINGLE_IMAGE_ANGLES,
            AngleSet::Dual => &DUAL_IMAGE_ANGLES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StudioColor {
    pub name: &'static str,
    pub value: &'static str,
}

/// Background presets offered to the user. The first is the default.
pub const STUDIO_COLORS: [StudioColor; 5] = [
    StudioColor { name: "White", value: "#FFFFFF" },
    StudioColor { name: "Light Gray", value: "#F3F4F6" },
    StudioColor { name: "Soft Blue", value: "#EBF5FF" },
    StudioColor { name: "Soft Pink", value: "#FFF5F5" },
    StudioColor { name: "Studio Black", value: "#1A1A1A" },
];
