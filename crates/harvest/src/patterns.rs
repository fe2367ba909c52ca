// ABOUTME: Static pattern tables used by the cleaners, the validity check and the verifier.
// ABOUTME: Pure data: substitution rules, boilerplate denylists, mojibake repairs and noise selectors.

/// Verse cleanup rules, applied once each and in this order.
///
/// Later rules assume the earlier ones already removed the surrounding
/// markup, so the order is part of the contract.
pub const VERSE_CLEANUP_RULES: &[&str] = &[
    // Cross-references such as "#Luk 3:23f."
    r"#[^.]*\.?\s*",
    // Footnote anchors followed by a note: "1:5 not *Alt. övers. ..."
    r"#?\d+:\d+\s+not\s+\*[^.]*\.?\s*",
    // Alternate translation notes
    r"\s+not\s+\*[^.]*\.?\s*",
    r"\*[Aa]lt\.?\s*övers?\.?[^.]*\.?\s*",
    r"\*[Aa]lternativ[^.]*\.?\s*",
    // Any other starred note
    r"\*[^.]*\.?\s*",
    // Left-over note labels
    r"\b[Nn]ot\b\s*",
    // Remaining cross-reference shapes
    r"#\w+\s*\d+:\d+[^.]*\.?\s*",
];

/// Text matching any of these (case-insensitive) is not verse text.
pub const BOILERPLATE_PATTERNS: &[&str] = &[
    r"^Life\.Church",
    r"Privacy Policy",
    r"Terms",
    r"Vulnerability Disclosure",
    r"Facebook.*Twitter.*Instagram",
    r"^Home.*Bible.*Plans",
    r"YouVersion",
    r"^not\s*$",
    r"^\*?alt\.?\s*övers",
    r"^\*?alternativ",
    r"^#\d+:\d+",
    r"^\s*$",
];

/// Minimum cleaned verse length (in characters) accepted by the validity check.
pub const MIN_VERSE_CHARS: usize = 3;

/// Substrings that mark a stored verse as suspicious during verification.
pub const SUSPICIOUS_KEYWORDS: &[&str] = &["youversion", "privacy", "facebook", "twitter"];

/// UTF-8 text that was decoded as Latin-1 somewhere upstream.
pub const MOJIBAKE_REPAIRS: &[(&str, &str)] = &[
    ("â€‹", ""),
    ("â€\"", "–"),
    ("â€™", "'"),
    ("â€œ", "\""),
    ("â€", "\""),
    ("Ã¥", "å"),
    ("Ã¤", "ä"),
    ("Ã¶", "ö"),
    ("Ã…", "Å"),
    ("Ã„", "Ä"),
    ("Ã–", "Ö"),
];

/// Tags whose subtrees never contribute page text.
pub const NOISE_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "footer", "header",
];

/// Class names whose subtrees never contribute page text.
pub const NOISE_CLASSES: &[&str] = &[
    "nav",
    "footer",
    "header",
    "navigation",
    "breadcrumb",
    "social",
];

/// Class fragment of inline verse-number labels, padded with spaces when flattening.
pub const VERSE_LABEL_CLASS_HINT: &str = "label";

/// Elements that start and end a line when flattening text.
pub const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figure", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section",
    "table", "tbody", "td", "th", "thead", "tr", "ul",
];
