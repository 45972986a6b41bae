//! Splitting a step description into text and timer blocks.
//!
//! Every text block keeps the original slice of the description plus a
//! template in which each ingredient quantity found inside the block is
//! replaced by [`QUANTITY_PLACEHOLDER`]. The template is what
//! [`crate::rescale`] expands again for a given number of servings.

use log::{debug, warn};

use crate::model::{RecipeStep, TextSpan};

/// Marks a removed quantity. U+E000 sits in the private use area and does not occur in recipe text.
pub const QUANTITY_PLACEHOLDER: &str = "\u{E000}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// Byte offset of the block in the description
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
    /// Untouched slice of the description
    pub content: String,
    /// `content` with quantities replaced by placeholders
    pub template: String,
}

impl TextBlock {
    pub fn range(&self) -> TextSpan {
        TextSpan::new(self.start, self.end)
    }

    pub fn placeholder_count(&self) -> usize {
        self.template.matches(QUANTITY_PLACEHOLDER).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(TextBlock),
    /// Index into `RecipeStep::timers`
    Timer { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepSegmentation {
    pub blocks: Vec<Block>,
}

impl StepSegmentation {
    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Text(text) => Some(text),
            Block::Timer { .. } => None,
        })
    }

    /// Concatenation of all text block contents, equal to the step description.
    pub fn reconstruct(&self) -> String {
        self.text_blocks().map(|block| block.content.as_str()).collect()
    }
}

/// Split `step` into blocks delimited by its timers.
pub fn segment_step(step: &RecipeStep) -> StepSegmentation {
    let description = step.description.as_str();
    let mut blocks = Vec::with_capacity(step.timers.len() * 2 + 1);
    let mut cursor = 0;

    for (index, timer) in step.timers.iter().enumerate() {
        let end = clamp_to_boundary(description, timer.position.end, cursor);
        if end != timer.position.end {
            warn!(
                "Timer {} ends at {} which is outside [{}, {}], clamped to {}",
                index,
                timer.position.end,
                cursor,
                description.len(),
                end
            );
        }

        if end > cursor {
            blocks.push(Block::Text(text_block(step, cursor, end)));
        }
        blocks.push(Block::Timer { index });
        cursor = end;
    }

    if cursor < description.len() {
        blocks.push(Block::Text(text_block(step, cursor, description.len())));
    }

    debug!(
        "Segmented step into {} blocks ({} timers)",
        blocks.len(),
        step.timers.len()
    );
    StepSegmentation { blocks }
}

fn text_block(step: &RecipeStep, start: usize, end: usize) -> TextBlock {
    let content = step.description[start..end].to_string();
    let mut template = content.clone();

    // Descending order keeps the offsets of not yet replaced quantities valid
    for index in quantities_in_range(step, start, end) {
        let span = placeholder_span(&step.description, step.ingredients[index].quantity_position);
        template.replace_range(span.begin - start..span.end - start, QUANTITY_PLACEHOLDER);
    }

    TextBlock {
        start,
        end,
        content,
        template,
    }
}

/// Indices of the ingredients whose quantity lies inside `[start, end)`, in
/// descending order of their position.
///
/// Segmentation walks the result as is; rescaling walks it reversed so that
/// placeholders are filled left to right.
pub fn quantities_in_range(step: &RecipeStep, start: usize, end: usize) -> Vec<usize> {
    let description = step.description.as_str();
    let mut order: Vec<usize> = (0..step.ingredients.len())
        .filter(|&i| step.ingredients[i].quantity_in_text(description))
        .collect();
    order.sort_by(|&a, &b| {
        let a = step.ingredients[a].quantity_position;
        let b = step.ingredients[b].quantity_position;
        b.begin.cmp(&a.begin).then(b.end.cmp(&a.end))
    });

    let mut selected = Vec::new();
    let mut claimed_from = usize::MAX;
    for index in order {
        let span = step.ingredients[index].quantity_position;
        if span.begin < start {
            // Everything after this one starts even earlier
            break;
        }
        if span.end > end {
            continue;
        }
        if span.end > claimed_from {
            warn!(
                "Quantity of '{}' at {}..{} overlaps another quantity, left as is",
                step.ingredients[index].name, span.begin, span.end
            );
            continue;
        }
        claimed_from = span.begin;
        selected.push(index);
    }
    selected
}

/// Part of a quantity span that the placeholder replaces: the numeric lead
/// ("200" in "200 g"), or the whole span when it has no numeric lead.
fn placeholder_span(description: &str, span: TextSpan) -> TextSpan {
    let text = &description[span.begin..span.end];
    match numeric_lead_len(text) {
        0 => span,
        len => TextSpan::new(span.begin, span.begin + len),
    }
}

fn numeric_lead_len(text: &str) -> usize {
    let mut len = 0;
    let mut seen_digit = false;
    for (offset, c) in text.char_indices() {
        if c.is_ascii_digit() || is_vulgar_fraction(c) {
            seen_digit = true;
            len = offset + c.len_utf8();
        } else if !matches!(c, '.' | ',' | '/' | '-' | ' ' | '\u{2044}' | '\u{2013}') {
            break;
        }
    }
    if seen_digit {
        len
    } else {
        0
    }
}

fn is_vulgar_fraction(c: char) -> bool {
    matches!(c, '\u{00BC}'..='\u{00BE}' | '\u{2150}'..='\u{215E}')
}

/// Clamp `offset` into `[floor, text.len()]` and move it forward onto a char boundary.
fn clamp_to_boundary(text: &str, offset: usize, floor: usize) -> usize {
    let mut offset = offset.clamp(floor, text.len());
    while !text.is_char_boundary(offset) {
        offset += 1;
    }
    offset
}
