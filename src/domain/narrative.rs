// Narrative text returned by the language model and its paragraph split

/// Generated analysis, or an inline error note when generation failed
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeText {
    text: String,
    failed: bool,
}

impl NarrativeText {
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: false,
        }
    }

    /// `message` is expected to carry its own "Error" prefix
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            text: message.into(),
            failed: true,
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn is_failure(&self) -> bool {
        self.failed
    }

    pub fn paragraphs(&self) -> Vec<NarrativeParagraph> {
        split_paragraphs(&self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    Heading,
    Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeParagraph {
    pub kind: ParagraphKind,
    pub text: String,
}

/// Decide whether a raw paragraph is a subheading.
///
/// Checked in order: starts with a digit and a period (after trimming),
/// all cased characters are uppercase, or the untrimmed first line holds a colon.
pub fn classify_paragraph(paragraph: &str) -> ParagraphKind {
    let trimmed = paragraph.trim();

    let mut chars = trimmed.chars();
    let numbered = matches!(
        (chars.next(), chars.next()),
        (Some(d), Some('.')) if d.is_ascii_digit()
    );
    if numbered || is_all_uppercase(trimmed) {
        return ParagraphKind::Heading;
    }

    let first_line = paragraph.split('\n').next().unwrap_or_default();
    if first_line.contains(':') {
        ParagraphKind::Heading
    } else {
        ParagraphKind::Body
    }
}

/// Split on blank lines, drop empty paragraphs, and clean up each one for layout
pub fn split_paragraphs(text: &str) -> Vec<NarrativeParagraph> {
    text.split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|raw| {
            let kind = classify_paragraph(raw);
            let text = match kind {
                ParagraphKind::Heading => raw.trim().replace('\n', " "),
                ParagraphKind::Body => raw.trim().replace('\n', " ").replace("**", ""),
            };
            NarrativeParagraph { kind, text }
        })
        .collect()
}

// At least one cased character and no lowercase ones
fn is_all_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}
