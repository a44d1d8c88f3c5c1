// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Optional cleanup applied to questions and contexts while they
// are extracted. Contexts are compared by exact string value when
// batching, so two copies of a passage that differ only in
// whitespace would otherwise count as different passages:
//
//   "The  college\u{00A0}was founded\r\n in 1842 "
//   "The college was founded\n in 1842"
//
// both normalise to "The college was founded\nin 1842".
//
// Cleaning steps (applied in order):
//   1. Tabs, NBSP, zero-width space, BOM → plain space
//   2. \r\n and lone \r → \n
//   3. Other control characters → space
//   4. Collapse runs of spaces, trim each line
//   5. Collapse more than one blank line, trim the whole text

/// Whitespace/control-character normaliser for dataset text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Return a cleaned copy of `text`.
    pub fn normalize(&self, text: &str) -> String {
        // ── Step 1-3: character mapping ───────────────────────────────────────
        let unified = text.replace("\r\n", "\n");
        let mapped: String = unified
            .chars()
            .map(|c| match c {
                '\t' | '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                '\r' => '\n',
                c if c.is_control() && c != '\n' => ' ',
                c => c,
            })
            .collect();

        // ── Step 4: per-line space collapsing ─────────────────────────────────
        let lines: Vec<String> = mapped
            .split('\n')
            .map(|line| line.split(' ').filter(|w| !w.is_empty()).collect::<Vec<_>>().join(" "))
            .collect();

        // ── Step 5: blank line collapsing ─────────────────────────────────────
        let mut out: Vec<&str> = Vec::with_capacity(lines.len());
        for line in &lines {
            let prev_blank = out.last().is_some_and(|l| l.is_empty());
            if line.is_empty() && prev_blank {
                continue;
            }
            out.push(line);
        }

        out.join("\n").trim().to_string()
    }
}
