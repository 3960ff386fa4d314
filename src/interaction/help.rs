//! Help guide pagination into embeds.

use crate::base::{
    constants::{HELP_COLOR, HELP_DESCRIPTION, HELP_FIRST_TITLE, HELP_NEXT_TITLE},
    types::Embed,
};

const ELLIPSIS: &str = "...";

/// Split `entries` into embeds of at most `page_size` fields each.
///
/// Field bodies longer than `max_len` characters are cut so that the body
/// plus the ellipsis still fits the limit.
pub fn paginate(entries: &[(String, String)], page_size: usize, max_len: usize) -> Vec<Embed> {
    let page_size = page_size.max(1);

    entries
        .chunks(page_size)
        .enumerate()
        .map(|(page, chunk)| Embed {
            title: if page == 0 { HELP_FIRST_TITLE } else { HELP_NEXT_TITLE }.to_string(),
            description: HELP_DESCRIPTION.to_string(),
            color: HELP_COLOR,
            fields: chunk.iter().map(|(key, body)| (key.clone(), truncate(body, max_len))).collect(),
        })
        .collect()
}

fn truncate(body: &str, max_len: usize) -> String {
    if body.chars().count() <= max_len {
        return body.to_string();
    }

    let keep = max_len.saturating_sub(ELLIPSIS.len() + 1);
    let mut cut = body.chars().take(keep).collect::<String>();
    cut.push_str(ELLIPSIS);
    cut
}
