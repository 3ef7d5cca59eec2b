use crate::model::{Dated, Event};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Line break understood by the tooltip renderer.
pub const LINE_BREAK: &str = "<br>";

/// Shown for a timeline entry whose news field was missing or malformed.
pub const NO_EVENT: &str = "No event";

/// Tooltip text for one date.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FormattedEvent {
    pub date: NaiveDate,
    pub text: String,
}

impl Dated for FormattedEvent {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Join the news items of one entry with [`LINE_BREAK`], or [`NO_EVENT`] without a list.
pub fn join_news(news: Option<&[String]>) -> String {
    match news {
        Some(items) => items.join(LINE_BREAK),
        None => NO_EVENT.to_string(),
    }
}

/// Greedily pack whitespace-delimited words into lines of at most `width` characters.
///
/// Words are never split: one longer than `width` takes a line to itself.
///
/// ```
/// use pandemic_core::events::wrap_lines;
///
/// assert_eq!(wrap_lines("AAA BBB CCC", 7), vec!["AAA BBB", "CCC"]);
/// ```
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line.is_empty() {
            line.push_str(word);
            line_len = word_len;
        } else if line_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
        } else {
            line.push(' ');
            line.push_str(word);
            line_len += 1 + word_len;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

/// [`wrap_lines`], joined with [`LINE_BREAK`].
pub fn wrap(text: &str, width: usize) -> String {
    wrap_lines(text, width).join(LINE_BREAK)
}

/// Tooltip text per date, ascending: every news item is wrapped to `width`, the items of an
/// entry are joined, and entries sharing a date are concatenated.
pub fn format_events(events: &[Event], width: usize) -> Vec<FormattedEvent> {
    let mut by_date: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for event in events {
        let text = match &event.news {
            Some(items) => {
                let wrapped: Vec<String> = items.iter().map(|item| wrap(item, width)).collect();
                join_news(Some(&wrapped))
            }
            None => join_news(None),
        };
        by_date.entry(event.date).or_default().push(text);
    }

    by_date
        .into_iter()
        .map(|(date, texts)| FormattedEvent {
            date,
            text: texts.join(LINE_BREAK),
        })
        .collect()
}
