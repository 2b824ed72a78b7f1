//! Placeholder substitution inside `.docx` packages.
//!
//! Word splits text into runs wherever formatting (or spell-check state) changes, so a
//! token like `«Pet_Name»` may be spread over several `<w:t>` elements. Each paragraph
//! is therefore buffered, its visible text joined (tabs and breaks read as `\t` and
//! `\n`), substituted once, and written back into the paragraph's first run; later text
//! elements are emptied and later breaks dropped. The first run keeps its formatting.
//! Paragraphs without tokens are left byte-for-byte.

use std::{
    collections::VecDeque,
    fs::File,
    io::{
        Read,
        Write,
    },
    path::Path,
};

use quick_xml::{
    events::{
        BytesStart,
        BytesText,
        Event,
    },
    Reader,
    Writer,
};
use zip::{
    write::SimpleFileOptions,
    CompressionMethod,
    ZipArchive,
    ZipWriter,
};

use super::placeholders::PlaceholderMap;
use crate::core::MsnapError;

const PARAGRAPH: &[u8] = b"w:p";
const RUN: &[u8] = b"w:r";
const TEXT: &[u8] = b"w:t";
const TAB: &[u8] = b"w:tab";
const BREAK: &[u8] = b"w:br";
const CARRIAGE_RETURN: &[u8] = b"w:cr";

/// Copies `template` to `output`, substituting tokens in the body, headers and footers.
pub fn fill_template(template: &Path, output: &Path, map: &PlaceholderMap) -> Result<(), MsnapError> {
    let mut archive = ZipArchive::new(File::open(template)?)?;
    let mut writer = ZipWriter::new(File::create(output)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for index in 0..archive.len() {
        let name = archive.by_index_raw(index)?.name().to_string();

        if is_text_part(&name) {
            let mut xml = Vec::new();
            archive.by_index(index)?.read_to_end(&mut xml)?;
            let filled = fill_part_xml(&xml, map)?;
            writer.start_file(name, options)?;
            writer.write_all(&filled)?;
        } else {
            writer.raw_copy_file(archive.by_index_raw(index)?)?;
        }
    }

    writer.finish()?;
    tracing::debug!("Filled {} -> {}", template.display(), output.display());
    Ok(())
}

fn is_text_part(name: &str) -> bool {
    name == "word/document.xml"
        || ((name.starts_with("word/header") || name.starts_with("word/footer"))
            && name.ends_with(".xml"))
}

enum Tag {
    ParagraphStart,
    ParagraphEnd,
    Other,
    Eof,
}

fn classify(event: &Event<'_>) -> Tag {
    match event {
        Event::Start(start) if start.name().as_ref() == PARAGRAPH => Tag::ParagraphStart,
        Event::End(end) if end.name().as_ref() == PARAGRAPH => Tag::ParagraphEnd,
        Event::Eof => Tag::Eof,
        _ => Tag::Other,
    }
}

/// Substitutes tokens in every paragraph of one WordprocessingML part. Table cells
/// hold ordinary paragraphs, so they are covered by the same pass.
pub fn fill_part_xml(xml: &[u8], map: &PlaceholderMap) -> Result<Vec<u8>, MsnapError> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    // Innermost paragraph last. Text boxes can nest paragraphs inside paragraphs.
    let mut open_paragraphs: Vec<Vec<Event<'static>>> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)?.into_owned();
        buf.clear();

        match classify(&event) {
            Tag::Eof => break,
            Tag::ParagraphStart => open_paragraphs.push(vec![event]),
            Tag::ParagraphEnd => match open_paragraphs.pop() {
                Some(mut paragraph) => {
                    paragraph.push(event);
                    let rewritten = rewrite_paragraph(paragraph, map)?;
                    emit(&mut open_paragraphs, &mut writer, rewritten)?;
                }
                None => writer.write_event(event)?,
            },
            Tag::Other => emit(&mut open_paragraphs, &mut writer, vec![event])?,
        }
    }

    // Malformed input: flush anything left open untouched.
    for paragraph in open_paragraphs {
        for event in paragraph {
            writer.write_event(event)?;
        }
    }

    Ok(writer.into_inner())
}

fn emit(
    open_paragraphs: &mut [Vec<Event<'static>>],
    writer: &mut Writer<Vec<u8>>,
    events: Vec<Event<'static>>,
) -> Result<(), MsnapError> {
    match open_paragraphs.last_mut() {
        Some(parent) => parent.extend(events),
        None => {
            for event in events {
                writer.write_event(event)?;
            }
        }
    }
    Ok(())
}

/// A top-level piece of a paragraph's visible text.
#[derive(Debug, Clone, Copy)]
enum Piece {
    /// A `<w:t>` element, by the indices of its start and end tags.
    Text { start: usize, end: usize },
    /// A `<w:tab/>`, `<w:br/>` or `<w:cr/>` inside a run, read as `\t` or `\n`.
    Break { index: usize, ch: char },
}

impl Piece {
    fn span(self) -> (usize, usize) {
        match self {
            Piece::Text { start, end } => (start, end),
            Piece::Break { index, .. } => (index, index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Keep,
    Drop,
    Consolidate,
}

fn break_char(name: &[u8]) -> Option<char> {
    match name {
        TAB => Some('\t'),
        BREAK | CARRIAGE_RETURN => Some('\n'),
        _ => None,
    }
}

/// `events` runs from the paragraph's own start tag to its end tag inclusive.
fn rewrite_paragraph(
    events: Vec<Event<'static>>,
    map: &PlaceholderMap,
) -> Result<Vec<Event<'static>>, MsnapError> {
    let mut pieces: Vec<Piece> = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;
    let mut in_run = false;
    let mut open_text: Option<usize> = None;

    let last = events.len().saturating_sub(1);
    for (index, event) in events.iter().enumerate().take(last).skip(1) {
        match event {
            Event::Start(start) if start.name().as_ref() == PARAGRAPH => depth += 1,
            Event::End(end) if end.name().as_ref() == PARAGRAPH => {
                depth = depth.saturating_sub(1)
            }
            // Nested paragraphs were already rewritten on their own.
            _ if depth > 0 => {}
            Event::Start(start) if start.name().as_ref() == RUN => in_run = true,
            Event::End(end) if end.name().as_ref() == RUN => in_run = false,
            Event::Start(start) if in_run && start.name().as_ref() == TEXT => {
                open_text = Some(index)
            }
            Event::End(end) if end.name().as_ref() == TEXT => {
                if let Some(start) = open_text.take() {
                    pieces.push(Piece::Text { start, end: index });
                }
            }
            Event::Text(content) if open_text.is_some() => text.push_str(&content.unescape()?),
            Event::Empty(empty) if in_run => {
                if let Some(ch) = break_char(empty.name().as_ref()) {
                    text.push(ch);
                    pieces.push(Piece::Break { index, ch });
                }
            }
            _ => {}
        }
    }

    let Some(&Piece::Text { start: text_start, end: text_end }) =
        pieces.iter().find(|piece| matches!(piece, Piece::Text { .. }))
    else {
        return Ok(events);
    };
    if !map.contains_token(&text) {
        return Ok(events);
    }
    let replaced = map.substitute(&text);
    if replaced == text {
        return Ok(events);
    }

    let consolidated = consolidate(
        &replaced,
        preserve_space(events[text_start].clone()),
        events[text_end].clone(),
        &events,
        &pieces,
    );

    // The first piece's position receives the whole text; later text elements are
    // left empty and later breaks are dropped, since the text now carries them.
    let mut actions = vec![Action::Keep; events.len()];
    for (n, piece) in pieces.iter().enumerate() {
        let (first, last) = piece.span();
        actions[first..=last].fill(Action::Drop);
        if n == 0 {
            actions[first] = Action::Consolidate;
        } else if let Piece::Text { start, end } = *piece {
            actions[start] = Action::Keep;
            actions[end] = Action::Keep;
        }
    }

    let mut consolidated = Some(consolidated);
    let mut out = Vec::with_capacity(events.len());
    for (event, action) in events.into_iter().zip(actions) {
        match action {
            Action::Keep => out.push(event),
            Action::Drop => {}
            Action::Consolidate => out.extend(consolidated.take().into_iter().flatten()),
        }
    }

    Ok(out)
}

/// Splits `replaced` on tabs and line breaks into `<w:t>` elements separated by the
/// paragraph's original break elements, reused in order so attributes like
/// `w:type="page"` survive. Breaks introduced by field values get plain elements.
fn consolidate(
    replaced: &str,
    text_start: Event<'static>,
    text_end: Event<'static>,
    events: &[Event<'static>],
    pieces: &[Piece],
) -> Vec<Event<'static>> {
    let mut tabs = VecDeque::new();
    let mut breaks = VecDeque::new();
    for piece in pieces {
        if let Piece::Break { index, ch } = *piece {
            let pool = if ch == '\t' { &mut tabs } else { &mut breaks };
            pool.push_back(events[index].clone());
        }
    }

    let mut out = Vec::new();
    let push_segment = |out: &mut Vec<Event<'static>>, segment: &str| {
        if !segment.is_empty() {
            out.push(text_start.clone());
            out.push(Event::Text(BytesText::new(segment).into_owned()));
            out.push(text_end.clone());
        }
    };

    let mut segment = String::new();
    for ch in replaced.chars() {
        match ch {
            '\t' | '\n' => {
                push_segment(&mut out, &segment);
                segment.clear();
                let element = if ch == '\t' {
                    tabs.pop_front().unwrap_or_else(|| Event::Empty(BytesStart::new("w:tab")))
                } else {
                    breaks.pop_front().unwrap_or_else(|| Event::Empty(BytesStart::new("w:br")))
                };
                out.push(element);
            }
            _ => segment.push(ch),
        }
    }
    push_segment(&mut out, &segment);

    out
}

fn preserve_space(event: Event<'static>) -> Event<'static> {
    match event {
        Event::Start(mut start) => {
            let has_space =
                start.attributes().flatten().any(|attr| attr.key.as_ref() == b"xml:space");
            if !has_space {
                start.push_attribute(("xml:space", "preserve"));
            }
            Event::Start(start)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn map() -> PlaceholderMap {
        let mut values = HashMap::new();
        values.insert("«Pet_Name»".to_string(), "Rex & Co".to_string());
        values.insert("«City»".to_string(), "Morgantown".to_string());
        PlaceholderMap::new(values).unwrap()
    }

    fn fill(xml: &str) -> String {
        String::from_utf8(fill_part_xml(xml.as_bytes(), &map()).unwrap()).unwrap()
    }

    fn body(inner: &str) -> String {
        format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {NS}><w:body>{inner}</w:body></w:document>"#)
    }

    #[test]
    fn test_token_split_across_runs_is_consolidated() {
        let xml = body(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Pet: «Pet_</w:t></w:r><w:r><w:t>Name» from «City»</w:t></w:r></w:p>"#,
        );
        let out = fill(&xml);
        assert!(out.contains(
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Pet: Rex &amp; Co from Morgantown</w:t></w:r><w:r><w:t></w:t></w:r>"#
        ), "{out}");
        assert!(!out.contains("«"));
    }

    #[test]
    fn test_tabs_and_breaks_stay_between_their_text() {
        let xml = body(
            r#"<w:p><w:r><w:t>Pet:</w:t></w:r><w:r><w:tab/></w:r><w:r><w:t>«Pet_Name»</w:t></w:r><w:r><w:br w:type="page"/></w:r><w:r><w:t>«City»</w:t></w:r></w:p>"#,
        );
        let out = fill(&xml);
        assert!(out.contains(concat!(
            r#"<w:p><w:r><w:t xml:space="preserve">Pet:</w:t><w:tab/>"#,
            r#"<w:t xml:space="preserve">Rex &amp; Co</w:t><w:br w:type="page"/>"#,
            r#"<w:t xml:space="preserve">Morgantown</w:t></w:r>"#,
            r#"<w:r></w:r><w:r><w:t></w:t></w:r><w:r></w:r><w:r><w:t></w:t></w:r></w:p>"#,
        )), "{out}");
        assert_eq!(fill(&out), out);
    }

    #[test]
    fn test_tab_stops_in_paragraph_properties_are_kept() {
        let xml = body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>«City»</w:t><w:tab/><w:t>«Pet_Name»</w:t></w:r></w:p>"#,
        );
        let out = fill(&xml);
        assert!(out.contains(r#"<w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs>"#), "{out}");
        assert!(out.contains(concat!(
            r#"<w:r><w:t xml:space="preserve">Morgantown</w:t><w:tab/>"#,
            r#"<w:t xml:space="preserve">Rex &amp; Co</w:t><w:t></w:t></w:r>"#,
        )), "{out}");
    }

    #[test]
    fn test_paragraphs_without_tokens_are_untouched() {
        let xml = body(r#"<w:p><w:r><w:t xml:space="preserve">Plain </w:t></w:r><w:r><w:t>text</w:t></w:r></w:p>"#);
        assert_eq!(fill(&xml), xml);
    }

    #[test]
    fn test_table_cells_are_substituted() {
        let xml = body(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>«City»</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>«Pet_Name»</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        let out = fill(&xml);
        assert!(out.contains(">Morgantown</w:t>"));
        assert!(out.contains(">Rex &amp; Co</w:t>"));
    }

    #[test]
    fn test_substitution_is_idempotent() {
        let xml = body(r#"<w:p><w:r><w:t>«Pet_</w:t></w:r><w:r><w:t>Name»</w:t></w:r></w:p>"#);
        let once = fill(&xml);
        assert_eq!(fill(&once), once);
    }

    #[test]
    fn test_nested_text_box_paragraph_is_filled_once() {
        let xml = body(
            r#"<w:p><w:r><w:t>«City»</w:t></w:r><w:r><w:txbxContent><w:p><w:r><w:t>«Pet_Name»</w:t></w:r></w:p></w:txbxContent></w:r></w:p>"#,
        );
        let out = fill(&xml);
        assert!(out.contains(r#"<w:t xml:space="preserve">Morgantown</w:t>"#), "{out}");
        assert!(out.contains(r#"<w:t xml:space="preserve">Rex &amp; Co</w:t>"#), "{out}");
    }

    #[test]
    fn test_fill_template_copies_other_parts() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.docx");
        let output = dir.path().join("out.docx");

        {
            let mut zip = ZipWriter::new(File::create(&template).unwrap());
            let options = SimpleFileOptions::default();
            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(b"<Types/>").unwrap();
            zip.start_file("word/document.xml", options).unwrap();
            zip.write_all(body(r#"<w:p><w:r><w:t>«Pet_Name»</w:t></w:r></w:p>"#).as_bytes())
                .unwrap();
            zip.start_file("word/footer1.xml", options).unwrap();
            zip.write_all(format!(r#"<w:ftr {NS}><w:p><w:r><w:t>«City»</w:t></w:r></w:p></w:ftr>"#).as_bytes())
                .unwrap();
            zip.finish().unwrap();
        }

        fill_template(&template, &output, &map()).unwrap();

        let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let read = |archive: &mut ZipArchive<File>, name: &str| {
            let mut content = String::new();
            archive.by_name(name).unwrap().read_to_string(&mut content).unwrap();
            content
        };
        assert_eq!(read(&mut archive, "[Content_Types].xml"), "<Types/>");
        assert!(read(&mut archive, "word/document.xml").contains("Rex &amp; Co"));
        assert!(read(&mut archive, "word/footer1.xml").contains("Morgantown"));
    }
}
