//! Resume composition: turns a `ResumeRecord` into positioned lines on pages.
//!
//! Output is everything a painter needs and nothing more: text, face, size and
//! baseline position. Coordinates are measured from the top-left corner of the
//! page so the layout reads in document order; the PDF painter flips them.
//!
//! Composition is CPU-bound. Async callers run it inside `spawn_blocking`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::font_metrics::{get_metrics, FontFace, PageConfig};
use crate::models::resume::ResumeRecord;

const BULLET: &str = "- ";
const SECTION_GAP_PT: f32 = 8.0;
const ENTRY_GAP_PT: f32 = 4.0;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Name,
    Title,
    Contact,
    SectionHeading,
    EntryHeading,
    EntryMeta,
    Body,
}

impl TextStyle {
    pub fn face(self) -> FontFace {
        match self {
            TextStyle::Name | TextStyle::SectionHeading | TextStyle::EntryHeading => {
                FontFace::HelveticaBold
            }
            _ => FontFace::Helvetica,
        }
    }

    pub fn size_pt(self, config: &PageConfig) -> f32 {
        match self {
            TextStyle::Name => config.name_size_pt,
            TextStyle::Title | TextStyle::SectionHeading => config.heading_size_pt,
            TextStyle::Contact | TextStyle::EntryMeta => config.body_size_pt - 1.0,
            TextStyle::EntryHeading | TextStyle::Body => config.body_size_pt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLine {
    pub text: String,
    pub style: TextStyle,
    pub size_pt: f32,
    pub x_pt: f32,
    /// Baseline distance from the top edge of the page.
    pub baseline_pt: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub lines: Vec<PlacedLine>,
}

/// A fully laid-out resume: what the preview region shows and the exporter captures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedResume {
    /// Position of the record in the workflow list at render time.
    pub index: usize,
    pub record_id: Uuid,
    pub name: String,
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub pages: Vec<RenderedPage>,
}

impl RenderedResume {
    /// All line texts in document order.
    #[cfg(test)]
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|l| l.text.as_str()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Word wrap
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word wrap. A single word wider than `max_width_pt` gets a line to itself.
pub fn wrap_text(text: &str, face: FontFace, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let metrics = get_metrics(face);
    let space_w = metrics.space_width * size_pt;

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = metrics.width_pt(word, size_pt);
        if !current.is_empty() && current_width + space_w + word_w > max_width_pt {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += space_w;
        }
        current.push_str(word);
        current_width += word_w;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Composer
// ────────────────────────────────────────────────────────────────────────────

struct Composer<'a> {
    config: &'a PageConfig,
    pages: Vec<RenderedPage>,
    current: RenderedPage,
    cursor_pt: f32,
}

impl<'a> Composer<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            current: RenderedPage::default(),
            cursor_pt: config.margin_pt,
        }
    }

    fn bottom_limit(&self) -> f32 {
        self.config.page_height_pt - self.config.margin_pt
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.cursor_pt = self.config.margin_pt;
    }

    fn place(&mut self, text: String, style: TextStyle, x_pt: f32) {
        let size = style.size_pt(self.config);
        let advance = size * self.config.leading;
        if self.cursor_pt + advance > self.bottom_limit() && !self.current.lines.is_empty() {
            self.break_page();
        }
        self.cursor_pt += advance;
        self.current.lines.push(PlacedLine {
            text,
            style,
            size_pt: size,
            x_pt,
            baseline_pt: self.cursor_pt,
        });
    }

    /// Places a line on the current baseline without advancing (right-aligned extras).
    fn place_right_aligned(&mut self, text: String, style: TextStyle) {
        let size = style.size_pt(self.config);
        let width = get_metrics(style.face()).width_pt(&text, size);
        let x = self.config.page_width_pt - self.config.margin_pt - width;
        let baseline = self.cursor_pt;
        self.current.lines.push(PlacedLine {
            text,
            style,
            size_pt: size,
            x_pt: x,
            baseline_pt: baseline,
        });
    }

    fn paragraph(&mut self, text: &str, style: TextStyle, indent_pt: f32) {
        let size = style.size_pt(self.config);
        let width = self.config.text_width_pt() - indent_pt;
        let x = self.config.margin_pt + indent_pt;
        for line in wrap_text(text, style.face(), size, width) {
            self.place(line, style, x);
        }
    }

    /// Bulleted paragraph with a hanging indent so wrapped lines align with the text.
    fn bullet(&mut self, text: &str) {
        let style = TextStyle::Body;
        let size = style.size_pt(self.config);
        let hang = get_metrics(style.face()).width_pt(BULLET, size);
        let width = self.config.text_width_pt() - hang;
        let x = self.config.margin_pt;
        for (i, line) in wrap_text(text, style.face(), size, width)
            .into_iter()
            .enumerate()
        {
            if i == 0 {
                self.place(format!("{BULLET}{line}"), style, x);
            } else {
                self.place(line, style, x + hang);
            }
        }
    }

    fn section(&mut self, heading: &str) {
        self.gap(SECTION_GAP_PT);
        self.place(
            heading.to_uppercase(),
            TextStyle::SectionHeading,
            self.config.margin_pt,
        );
    }

    fn gap(&mut self, pt: f32) {
        self.cursor_pt = (self.cursor_pt + pt).min(self.bottom_limit());
    }

    fn finish(mut self) -> Vec<RenderedPage> {
        if !self.current.lines.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Lays out `record` as it appears at position `index` of the workflow list.
pub fn compose_resume(index: usize, record: &ResumeRecord, config: &PageConfig) -> RenderedResume {
    let mut c = Composer::new(config);

    c.paragraph(&record.name, TextStyle::Name, 0.0);
    c.paragraph(&record.title, TextStyle::Title, 0.0);
    let contact = [
        record.contact.email.as_str(),
        record.contact.phone.as_str(),
        record.contact.location.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join("  |  ");
    c.paragraph(&contact, TextStyle::Contact, 0.0);

    if !record.summary.is_empty() {
        c.section("Summary");
        c.paragraph(&record.summary, TextStyle::Body, 0.0);
    }

    if !record.experience.is_empty() {
        c.section("Experience");
        for (i, entry) in record.experience.iter().enumerate() {
            if i > 0 {
                c.gap(ENTRY_GAP_PT);
            }
            c.paragraph(&entry.position, TextStyle::EntryHeading, 0.0);
            c.place_right_aligned(entry.period(), TextStyle::EntryMeta);
            c.paragraph(&entry.company, TextStyle::EntryMeta, 0.0);
            for highlight in &entry.highlights {
                c.bullet(highlight);
            }
        }
    }

    if !record.education.is_empty() {
        c.section("Education");
        for (i, entry) in record.education.iter().enumerate() {
            if i > 0 {
                c.gap(ENTRY_GAP_PT);
            }
            c.paragraph(
                &format!("{}, {}", entry.degree, entry.field),
                TextStyle::EntryHeading,
                0.0,
            );
            c.place_right_aligned(entry.graduation_year.to_string(), TextStyle::EntryMeta);
            c.paragraph(&entry.institution, TextStyle::EntryMeta, 0.0);
        }
    }

    if !record.skills.is_empty() {
        c.section("Skills");
        c.paragraph(&record.skills.join(", "), TextStyle::Body, 0.0);
    }

    RenderedResume {
        index,
        record_id: record.id,
        name: record.name.clone(),
        page_width_pt: config.page_width_pt,
        page_height_pt: config.page_height_pt,
        pages: c.finish(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;
    use crate::models::resume::{ContactInfo, EducationEntry, ExperienceEntry};
    use chrono::Utc;

    fn sample_record(highlights_per_role: usize) -> ResumeRecord {
        let highlight = "Cut p95 API latency by 40% by redesigning the caching layer \
                         and moving hot reads to a write-through cache"
            .to_string();
        ResumeRecord {
            id: Uuid::new_v4(),
            name: "Jane A. Doe".to_string(),
            title: "Software Engineer".to_string(),
            contact: ContactInfo {
                email: "jane.doe@example.com".to_string(),
                phone: "(555) 010-2030".to_string(),
                location: "Leeds, England, United Kingdom".to_string(),
            },
            summary: "Results-driven software engineer.".to_string(),
            experience: vec![
                ExperienceEntry {
                    company: "Northwind Labs".to_string(),
                    position: "Software Engineer".to_string(),
                    start_year: 2022,
                    end_year: None,
                    highlights: vec![highlight.clone(); highlights_per_role],
                },
                ExperienceEntry {
                    company: "Bluefin Analytics".to_string(),
                    position: "Backend Developer".to_string(),
                    start_year: 2019,
                    end_year: Some(2022),
                    highlights: vec![highlight; highlights_per_role],
                },
            ],
            education: vec![EducationEntry {
                institution: "University of Leeds".to_string(),
                degree: "Bachelor of Science".to_string(),
                field: "Computer Science".to_string(),
                graduation_year: 2019,
            }],
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            avatar_url: None,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(10);
        let face = FontFace::Helvetica;
        let lines = wrap_text(&text, face, 10.0, 200.0);
        assert!(lines.len() > 1);
        let metrics = get_metrics(face);
        for line in &lines {
            assert!(metrics.width_pt(line, 10.0) <= 200.0, "overflowing line: {line}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_long_word_gets_own_line() {
        let lines = wrap_text("a supercalifragilisticexpialidocious b", FontFace::Helvetica, 12.0, 40.0);
        assert_eq!(lines, vec!["a", "supercalifragilisticexpialidocious", "b"]);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(wrap_text("   ", FontFace::Helvetica, 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_compose_starts_with_name_and_carries_identity() {
        let record = sample_record(2);
        let rendered = compose_resume(3, &record, &default_page_config());
        assert_eq!(rendered.index, 3);
        assert_eq!(rendered.record_id, record.id);
        let first = &rendered.pages[0].lines[0];
        assert_eq!(first.text, "Jane A. Doe");
        assert_eq!(first.style, TextStyle::Name);
        let texts: Vec<&str> = rendered.text_lines().collect();
        assert!(texts.contains(&"EXPERIENCE"));
        assert!(texts.contains(&"2022 - Present"));
        assert!(texts.contains(&"Rust, SQL"));
    }

    #[test]
    fn test_lines_stay_inside_margins() {
        let cfg = default_page_config();
        let rendered = compose_resume(0, &sample_record(3), &cfg);
        for page in &rendered.pages {
            for line in &page.lines {
                assert!(line.baseline_pt <= cfg.page_height_pt - cfg.margin_pt);
                assert!(line.x_pt >= cfg.margin_pt - 0.01);
                let w = get_metrics(line.style.face()).width_pt(&line.text, line.size_pt);
                assert!(line.x_pt + w <= cfg.page_width_pt - cfg.margin_pt + 0.01);
            }
        }
    }

    #[test]
    fn test_long_name_and_title_wrap_inside_margins() {
        let cfg = default_page_config();
        let mut record = sample_record(1);
        record.name = "Maximiliana Anastasia Konstantinopoulou-Vanderbilt \
                       Featherstonehaugh Montgomery-Ashworth"
            .to_string();
        record.title = "Principal Distributed Systems and Platform Reliability Engineering \
                        Architect for Realtime Payments Infrastructure"
            .to_string();
        record.experience[0].company = "Consolidated Intercontinental Logistics and \
                                        Supply Chain Optimization Holdings Limited"
            .to_string();

        let rendered = compose_resume(0, &record, &cfg);
        let first = &rendered.pages[0].lines;
        assert!(first.iter().filter(|l| l.style == TextStyle::Name).count() > 1);
        for page in &rendered.pages {
            for line in &page.lines {
                let w = get_metrics(line.style.face()).width_pt(&line.text, line.size_pt);
                assert!(
                    line.x_pt + w <= cfg.page_width_pt - cfg.margin_pt + 0.01,
                    "'{}' overflows the right margin",
                    line.text
                );
            }
        }
    }

    #[test]
    fn test_long_resume_breaks_pages() {
        let rendered = compose_resume(0, &sample_record(30), &default_page_config());
        assert!(rendered.pages.len() > 1);
        assert!(rendered.pages.iter().all(|p| !p.lines.is_empty()));
    }

    #[test]
    fn test_baselines_increase_within_page() {
        let rendered = compose_resume(0, &sample_record(2), &default_page_config());
        for page in &rendered.pages {
            for pair in page.lines.windows(2) {
                assert!(pair[1].baseline_pt >= pair[0].baseline_pt);
            }
        }
    }
}
