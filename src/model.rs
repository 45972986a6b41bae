use serde::{Deserialize, Serialize};

/// Half-open `[begin, end)` byte range into a step description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub begin: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(begin: usize, end: usize) -> Self {
        TextSpan { begin, end }
    }

    /// The sentinel marking a quantity that does not appear in the text.
    pub fn whole(text: &str) -> Self {
        TextSpan::new(0, text.len())
    }

    pub fn is_whole_range(&self, text: &str) -> bool {
        self.begin == 0 && self.end == text.len()
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the span can be sliced out of `text` without panicking.
    pub fn is_valid_in(&self, text: &str) -> bool {
        self.begin <= self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.begin)
            && text.is_char_boundary(self.end)
    }

    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.begin..self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Amount for `Recipe::number_of_people` servings
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    pub quantity_position: TextSpan,
}

impl Ingredient {
    /// Whether the quantity textually appears in `description`.
    pub fn quantity_in_text(&self, description: &str) -> bool {
        !self.quantity_position.is_whole_range(description)
            && self.quantity_position.is_valid_in(description)
            && !self.quantity_position.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub position: TextSpan,
    pub lower_bound_seconds: u32,
    pub upper_bound_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub timers: Vec<Timer>,
}

impl RecipeStep {
    pub fn new(description: impl Into<String>) -> Self {
        RecipeStep {
            description: description.into(),
            ingredients: Vec::new(),
            timers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Recipe {
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Servings the text was written for; `None` when the extractor found none
    #[serde(default)]
    pub number_of_people: Option<u32>,
}

impl Recipe {
    /// Servings count if the extractor found a usable one. Zero counts as missing.
    pub fn servings(&self) -> Option<u32> {
        self.number_of_people.filter(|&n| n > 0)
    }
}

/// Raw document text handed to the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExtractedText {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sections: Vec<String>,
}

impl ExtractedText {
    pub fn from_plain_text(text: impl Into<String>) -> Self {
        ExtractedText {
            title: String::new(),
            sections: vec![text.into()],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// All sections joined with blank lines, title first when present.
    pub fn full_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.sections.len() + 1);
        if !self.title.is_empty() {
            parts.push(&self.title);
        }
        parts.extend(self.sections.iter().map(String::as_str));
        parts.join("\n\n")
    }
}

/// Input accepted by the orchestrator.
#[derive(Debug, Clone)]
pub enum RecipeSource {
    PlainText(String),
    Extracted(ExtractedText),
}

impl RecipeSource {
    pub fn into_extracted_text(self) -> ExtractedText {
        match self {
            RecipeSource::PlainText(text) => ExtractedText::from_plain_text(text),
            RecipeSource::Extracted(extracted) => extracted,
        }
    }
}
