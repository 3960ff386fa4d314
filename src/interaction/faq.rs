//! Exact and fuzzy lookup over the short-form FAQ.

/// Returned with `matched = false` when no key is close enough.
pub const FAQ_NOT_FOUND: &str = "해당 질문에 대한 답변을 찾을 수 없어요.";

#[derive(Debug, Clone)]
struct FaqKey {
    normalized: String,
    chars: Vec<char>,
    answer: String,
}

/// FAQ resolver over an ordered `(question, answer)` table.
///
/// Keys are case-normalized once; iteration order is the table order, which
/// decides ties.
#[derive(Debug, Clone)]
pub struct FaqResolver {
    keys: Vec<FaqKey>,
    threshold: f64,
}

impl FaqResolver {
    pub fn new(entries: &[(String, String)], threshold: f64) -> Self {
        let keys = entries
            .iter()
            .map(|(question, answer)| {
                let normalized = normalize(question);
                FaqKey {
                    chars: normalized.chars().collect(),
                    normalized,
                    answer: answer.clone(),
                }
            })
            .collect();

        Self { keys, threshold }
    }

    /// Resolve `text` to `(answer, matched)`.
    pub fn resolve(&self, text: &str) -> (String, bool) {
        match self.lookup(text) {
            Some(answer) => (answer.to_string(), true),
            None => (FAQ_NOT_FOUND.to_string(), false),
        }
    }

    /// Exact (case-insensitive) match first, then the best fuzzy match at or above the threshold.
    fn lookup(&self, text: &str) -> Option<&str> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }

        if let Some(key) = self.keys.iter().find(|k| k.normalized == normalized) {
            return Some(&key.answer);
        }

        let query = normalized.chars().collect::<Vec<_>>();

        let mut best: Option<(&FaqKey, f64)> = None;
        for key in &self.keys {
            let score = similarity(&query, &key.chars);
            if score >= self.threshold && best.is_none_or(|(_, s)| score > s) {
                best = Some((key, score));
            }
        }

        best.map(|(key, _)| key.answer.as_str())
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Normalized edit similarity in `0..=1`.
fn similarity(a: &[char], b: &[char]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }

    1.0 - levenshtein(a, b) as f64 / longest as f64
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous = (0..=b.len()).collect::<Vec<_>>();
    let mut current = vec![0; b.len() + 1];

    for (i, left) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, right) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(left != right);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
