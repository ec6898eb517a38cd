use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::anchors::{HeaderIdMap, SlugSet, generate_unique_slug};
use crate::parsing::lines::line_starts;

fn preview_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Renders `source` to HTML, giving every heading an `id`.
///
/// Headings the extractor recorded are matched by source line and take their
/// slug from `ids`. Any other heading (setext, or ATX nested in a list or
/// quote) gets a slug synthesized from its raw text, kept distinct from the
/// slugs already in `ids`.
pub fn render_preview_html(source: &str, ids: &HeaderIdMap) -> String {
    let starts = line_starts(source);
    let mut synthesized = SlugSet::new();
    for slug in ids.slugs() {
        synthesized.reserve(slug);
    }

    let mut events: Vec<Event<'_>> = Vec::new();
    // Index of an open heading still waiting for a synthesized id
    let mut pending: Option<usize> = None;
    let mut raw = String::new();

    for (event, range) in Parser::new_ext(source, preview_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading {
                level,
                classes,
                attrs,
                ..
            }) => {
                let line = starts
                    .partition_point(|&s| s <= range.start)
                    .saturating_sub(1);
                let id = ids.slug_for_line(line).map(|s| CowStr::from(s.to_string()));
                if id.is_none() {
                    pending = Some(events.len());
                    raw.clear();
                }
                events.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some(at) = pending.take() {
                    let slug = generate_unique_slug(&raw, &mut synthesized);
                    log::debug!("synthesized heading id {slug:?} at byte {}", range.start);
                    if let Some(Event::Start(Tag::Heading { id, .. })) = events.get_mut(at) {
                        *id = Some(CowStr::from(slug));
                    }
                }
                events.push(Event::End(TagEnd::Heading(level)));
            }
            other => {
                if pending.is_some() {
                    if let Event::Text(text) | Event::Code(text) = &other {
                        raw.push_str(text);
                    }
                }
                events.push(other);
            }
        }
    }

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}
