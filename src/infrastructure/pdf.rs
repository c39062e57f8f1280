// PDF assembly - lays out statistics, charts and narrative into an A4 document
use crate::domain::error::ReportError;
use crate::domain::narrative::{NarrativeText, ParagraphKind};
use crate::domain::report::{ChartRole, ChartSet, LegendEntry};
use crate::domain::statistics::ReportStatistics;
use crate::infrastructure::charts::CHART_SIZE;
use chrono::{DateTime, Local};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rect, Rgb,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const PT_TO_MM: f32 = 25.4 / 72.0;
const INCH: f32 = 25.4;

const IMAGE_WIDTH: f32 = 7.0 * INCH;
const IMAGE_HEIGHT: f32 = 3.5 * INCH;

/// Column widths of the statistics table, in inches
const TABLE_COLUMNS: [f32; 6] = [2.0, 0.8, 0.8, 0.8, 0.8, 1.0];
const TABLE_HEADER: [&str; 6] = ["Sensor", "Min", "Max", "Mean", "Std Dev", "Status"];

const GREEN: (u8, u8, u8) = (0x00, 0xff, 0x00);
const CYAN: (u8, u8, u8) = (0x00, 0xcc, 0xcc);
const AMBER: (u8, u8, u8) = (0xff, 0xb0, 0x00);
const BLACK: (u8, u8, u8) = (0, 0, 0);
const GREY: (u8, u8, u8) = (0x55, 0x55, 0x55);
const TABLE_HEAD_BG: (u8, u8, u8) = (0x1a, 0x1a, 0x2e);
const TABLE_BODY_BG: (u8, u8, u8) = (0xf0, 0xf0, 0xf0);
const TABLE_GRID: (u8, u8, u8) = (0x33, 0x33, 0x33);

/// Cover-page facts that do not come from the statistics
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub generated_at: DateTime<Local>,
    pub model_label: String,
}

/// One flowable in reading order
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Spacer(f32),
    Title(String),
    Heading(String),
    Subheading(String),
    Body(String),
    Field { label: String, value: String },
    Table(Vec<[String; 6]>),
    Chart {
        title: String,
        path: PathBuf,
        legend: Vec<LegendEntry>,
        caption: String,
    },
    Rule,
    Footnote(String),
    PageBreak,
}

/// Rows of the statistics table, one per tracked column, header excluded
pub fn statistics_rows(stats: &ReportStatistics) -> Vec<[String; 6]> {
    stats
        .series
        .iter()
        .map(|s| {
            let (min, max) = if s.column.is_integer() {
                (format!("{:.0}", s.min), format!("{:.0}", s.max))
            } else {
                (format!("{:.1}", s.min), format!("{:.1}", s.max))
            };
            [
                s.column.label().to_string(),
                min,
                max,
                format!("{:.1}", s.mean),
                format!("{:.1}", s.std_dev),
                s.status.to_string(),
            ]
        })
        .collect()
}

/// Everything the document shows, in order, before any page geometry is decided
pub fn layout_plan(
    header: &ReportHeader,
    stats: &ReportStatistics,
    charts: &ChartSet,
    narrative: &NarrativeText,
) -> Result<Vec<Block>, ReportError> {
    let mut plan = vec![
        Block::Spacer(2.0 * INCH),
        Block::Title("PRAN-BOT".to_string()),
        Block::Heading("Environmental Monitoring Report".to_string()),
        Block::Spacer(0.5 * INCH),
        Block::Field {
            label: "Generated:".to_string(),
            value: header.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        },
        Block::Field {
            label: "Data Points:".to_string(),
            value: format!("{} records", stats.record_count),
        },
        Block::Field {
            label: "Time Range:".to_string(),
            value: format!("{} - {}", stats.first_timestamp, stats.last_timestamp),
        },
        Block::Field {
            label: "AI Model:".to_string(),
            value: format!("{} (Ollama)", header.model_label),
        },
        Block::PageBreak,
        Block::Heading("Statistical Summary".to_string()),
        Block::Table(statistics_rows(stats)),
        Block::PageBreak,
    ];

    for (i, role) in ChartRole::ALL.into_iter().enumerate() {
        let chart = charts
            .get(role)
            .ok_or_else(|| ReportError::Document(format!("missing {:?} chart", role)))?;
        plan.push(Block::Chart {
            title: role.title().to_string(),
            path: chart.path.clone(),
            legend: chart.legend.clone(),
            caption: chart.caption.clone(),
        });
        // Two charts per page
        if i % 2 == 1 {
            plan.push(Block::PageBreak);
        } else {
            plan.push(Block::Spacer(0.2 * INCH));
        }
    }

    plan.push(Block::Heading(format!(
        "AI-Powered Analysis ({})",
        header.model_label
    )));
    plan.push(Block::Spacer(0.1 * INCH));
    for paragraph in narrative.paragraphs() {
        plan.push(match paragraph.kind {
            ParagraphKind::Heading => Block::Subheading(paragraph.text),
            ParagraphKind::Body => Block::Body(paragraph.text),
        });
    }

    plan.push(Block::Spacer(0.5 * INCH));
    plan.push(Block::Rule);
    plan.push(Block::Footnote(format!(
        "This report was automatically generated by Pran-Bot using {} AI model. \
         Data accuracy depends on sensor calibration and environmental conditions.",
        header.model_label
    )));

    Ok(plan)
}

/// Build the whole PDF in memory from a finished plan.
/// Reads the chart images but writes nothing to disk.
pub fn render(plan: &[Block]) -> Result<Vec<u8>, ReportError> {
    let mut writer = PageWriter::new("Pran-Bot Environmental Monitoring Report")?;
    for block in plan {
        writer.place(block)?;
    }
    writer.finish()
}

fn document_error<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Document(e.to_string())
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
    Italic,
}

/// Writes blocks top to bottom, opening a new page when the next one does not fit
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    /// Distance of the next free line from the bottom edge, in mm
    cursor: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(document_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(document_error)?;
        let italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(document_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            cursor: PAGE_HEIGHT - MARGIN,
        })
    }

    fn finish(self) -> Result<Vec<u8>, ReportError> {
        self.doc.save_to_bytes().map_err(document_error)
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn at_page_top(&self) -> bool {
        (self.cursor - (PAGE_HEIGHT - MARGIN)).abs() < f32::EPSILON
    }

    /// Start a new page unless `height` still fits above the bottom margin
    fn reserve(&mut self, height: f32) {
        if self.cursor - height < MARGIN && !self.at_page_top() {
            self.new_page();
        }
    }

    fn font(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Italic => &self.italic,
        }
    }

    fn place(&mut self, block: &Block) -> Result<(), ReportError> {
        match block {
            Block::Spacer(height) => {
                self.cursor -= height;
                if self.cursor < MARGIN {
                    self.new_page();
                }
            }
            Block::Title(text) => {
                self.paragraph(text, 24.0, 30.0, Face::Bold, GREEN, Align::Center, 0.0, 20.0)
            }
            Block::Heading(text) => {
                self.paragraph(text, 16.0, 20.0, Face::Bold, CYAN, Align::Left, 15.0, 10.0)
            }
            Block::Subheading(text) => {
                self.paragraph(text, 12.0, 15.0, Face::Bold, AMBER, Align::Left, 10.0, 5.0)
            }
            Block::Body(text) => {
                self.paragraph(text, 10.0, 14.0, Face::Regular, BLACK, Align::Justify, 0.0, 8.0)
            }
            Block::Footnote(text) => {
                self.paragraph(text, 9.0, 12.0, Face::Italic, GREY, Align::Justify, 0.0, 8.0)
            }
            Block::Field { label, value } => self.field(label, value),
            Block::Table(rows) => self.table(rows),
            Block::Chart {
                title,
                path,
                legend,
                caption,
            } => self.chart(title, path, legend, caption)?,
            Block::Rule => {
                self.reserve(6.0);
                self.cursor -= 3.0;
                self.layer.set_outline_color(rgb(GREY));
                self.layer.set_outline_thickness(0.5);
                self.hline(MARGIN, PAGE_WIDTH - MARGIN, self.cursor);
                self.cursor -= 3.0;
            }
            Block::PageBreak => {
                if !self.at_page_top() {
                    self.new_page();
                }
            }
        }
        Ok(())
    }

    fn write(&self, text: &str, size: f32, face: Face, color: (u8, u8, u8), x: f32, y: f32) {
        self.layer.set_fill_color(rgb(color));
        self.layer
            .use_text(pdf_safe(text), size, Mm(x), Mm(y), self.font(face));
    }

    #[allow(clippy::too_many_arguments)]
    fn paragraph(
        &mut self,
        text: &str,
        size: f32,
        leading_pt: f32,
        face: Face,
        color: (u8, u8, u8),
        align: Align,
        space_before_pt: f32,
        space_after_pt: f32,
    ) {
        let leading = leading_pt * PT_TO_MM;
        let lines = wrap_text(text, size, face == Face::Bold, CONTENT_WIDTH);

        if !self.at_page_top() {
            self.cursor -= space_before_pt * PT_TO_MM;
        }
        // Keep at least two lines together
        self.reserve(leading * lines.len().min(2) as f32);

        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            self.reserve(leading);
            self.cursor -= leading;
            let baseline = self.cursor + (leading - size * PT_TO_MM) / 2.0;
            let width = text_width(line, size, face == Face::Bold);

            match align {
                Align::Center => {
                    let x = MARGIN + (CONTENT_WIDTH - width).max(0.0) / 2.0;
                    self.write(line, size, face, color, x, baseline);
                }
                Align::Justify if i < last => {
                    let gaps = line.matches(' ').count();
                    let slack_pt = (CONTENT_WIDTH - width).max(0.0) / PT_TO_MM;
                    if gaps > 0 {
                        self.layer.set_word_spacing(slack_pt / gaps as f32);
                    }
                    self.write(line, size, face, color, MARGIN, baseline);
                    self.layer.set_word_spacing(0.0);
                }
                _ => self.write(line, size, face, color, MARGIN, baseline),
            }
        }

        self.cursor -= space_after_pt * PT_TO_MM;
    }

    fn field(&mut self, label: &str, value: &str) {
        let size = 10.0;
        let leading = 14.0 * PT_TO_MM;
        self.reserve(leading);
        self.cursor -= leading;
        let baseline = self.cursor + (leading - size * PT_TO_MM) / 2.0;

        self.write(label, size, Face::Bold, BLACK, MARGIN, baseline);
        let offset = text_width(label, size, true) + text_width(" ", size, false);
        self.write(value, size, Face::Regular, BLACK, MARGIN + offset, baseline);
        self.cursor -= 8.0 * PT_TO_MM;
    }

    fn table(&mut self, rows: &[[String; 6]]) {
        let widths: Vec<f32> = TABLE_COLUMNS.iter().map(|w| w * INCH).collect();
        let total: f32 = widths.iter().sum();
        let left = MARGIN + (CONTENT_WIDTH - total) / 2.0;
        let header_height = 9.0;
        let row_height = 6.5;

        self.reserve(header_height + row_height * rows.len() as f32);
        let top = self.cursor;
        let header_bottom = top - header_height;
        let bottom = header_bottom - row_height * rows.len() as f32;

        self.layer.set_fill_color(rgb(TABLE_HEAD_BG));
        self.layer
            .add_rect(Rect::new(Mm(left), Mm(header_bottom), Mm(left + total), Mm(top)));
        self.layer.set_fill_color(rgb(TABLE_BODY_BG));
        self.layer
            .add_rect(Rect::new(Mm(left), Mm(bottom), Mm(left + total), Mm(header_bottom)));

        let header: Vec<String> = TABLE_HEADER.iter().map(|h| h.to_string()).collect();
        self.table_row(&header, &widths, left, header_bottom, header_height, 10.0, Face::Bold, GREEN);
        for (i, row) in rows.iter().enumerate() {
            let row_bottom = header_bottom - row_height * (i + 1) as f32;
            self.table_row(row, &widths, left, row_bottom, row_height, 9.0, Face::Regular, BLACK);
        }

        self.layer.set_outline_color(rgb(TABLE_GRID));
        self.layer.set_outline_thickness(1.0);
        self.hline(left, left + total, top);
        self.hline(left, left + total, header_bottom);
        for i in 1..=rows.len() {
            self.hline(left, left + total, header_bottom - row_height * i as f32);
        }
        let mut x = left;
        self.vline(x, bottom, top);
        for w in &widths {
            x += w;
            self.vline(x, bottom, top);
        }

        self.cursor = bottom;
    }

    #[allow(clippy::too_many_arguments)]
    fn table_row(
        &self,
        cells: &[String],
        widths: &[f32],
        left: f32,
        bottom: f32,
        height: f32,
        size: f32,
        face: Face,
        color: (u8, u8, u8),
    ) {
        let baseline = bottom + (height - size * PT_TO_MM) / 2.0 + 0.5;
        let mut x = left;
        for (cell, width) in cells.iter().zip(widths) {
            let text_w = text_width(cell, size, face == Face::Bold);
            let cx = x + (width - text_w).max(0.0) / 2.0;
            self.write(cell, size, face, color, cx, baseline);
            x += width;
        }
    }

    fn chart(
        &mut self,
        title: &str,
        path: &std::path::Path,
        legend: &[LegendEntry],
        caption: &str,
    ) -> Result<(), ReportError> {
        let heading_height = (15.0 + 20.0 + 10.0) * PT_TO_MM;
        let legend_height = 6.0 * legend_rows(legend) as f32;
        let caption_lines = wrap_text(caption, 8.0, false, IMAGE_WIDTH);
        let caption_height = 4.5 * caption_lines.len() as f32;
        self.reserve(heading_height + IMAGE_HEIGHT + legend_height + caption_height + 6.0);
        self.paragraph(title, 16.0, 20.0, Face::Bold, CYAN, Align::Left, 15.0, 10.0);

        let file = File::open(path)?;
        let decoder = PngDecoder::new(BufReader::new(file)).map_err(document_error)?;
        let image = Image::try_from(decoder).map_err(document_error)?;
        let dpi = CHART_SIZE.0 as f32 / (IMAGE_WIDTH / INCH);
        let x = MARGIN + (CONTENT_WIDTH - IMAGE_WIDTH) / 2.0;

        self.reserve(IMAGE_HEIGHT);
        self.cursor -= IMAGE_HEIGHT;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(self.cursor)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );

        self.legend(legend, x);
        for line in &caption_lines {
            self.cursor -= 4.5;
            self.write(line, 8.0, Face::Italic, GREY, x, self.cursor);
        }
        Ok(())
    }

    /// Coloured swatch plus label per entry, wrapping at the image width
    fn legend(&mut self, entries: &[LegendEntry], left: f32) {
        let size = 8.0;
        let swatch = 3.0;
        let mut x = left;
        self.cursor -= 6.0;
        for entry in entries {
            let item_width = swatch + 1.5 + text_width(&entry.label, size, false) + 5.0;
            if x + item_width > left + IMAGE_WIDTH && x > left {
                x = left;
                self.cursor -= 6.0;
            }
            self.layer.set_fill_color(rgb(entry.color));
            self.layer.add_rect(Rect::new(
                Mm(x),
                Mm(self.cursor),
                Mm(x + swatch),
                Mm(self.cursor + swatch),
            ));
            self.write(&entry.label, size, Face::Regular, BLACK, x + swatch + 1.5, self.cursor + 0.3);
            x += item_width;
        }
    }

    fn hline(&self, x1: f32, x2: f32, y: f32) {
        self.layer.add_line(Line {
            points: vec![(Point::new(Mm(x1), Mm(y)), false), (Point::new(Mm(x2), Mm(y)), false)],
            is_closed: false,
        });
    }

    fn vline(&self, x: f32, y1: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![(Point::new(Mm(x), Mm(y1)), false), (Point::new(Mm(x), Mm(y2)), false)],
            is_closed: false,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Justify,
}

fn legend_rows(entries: &[LegendEntry]) -> usize {
    let mut rows = 1;
    let mut x = 0.0;
    for entry in entries {
        let item_width = 3.0 + 1.5 + text_width(&entry.label, 8.0, false) + 5.0;
        if x + item_width > IMAGE_WIDTH && x > 0.0 {
            rows += 1;
            x = 0.0;
        }
        x += item_width;
    }
    rows
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Rendered width in mm; bold is approximated from the regular metrics
fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = pdf_safe(text)
        .chars()
        .map(|c| {
            let idx = (c as u32).wrapping_sub(32) as usize;
            HELVETICA_WIDTHS.get(idx).copied().unwrap_or(556) as u32
        })
        .sum();
    let scale = if bold { 1.06 } else { 1.0 };
    units as f32 / 1000.0 * size * PT_TO_MM * scale
}

/// Greedy word wrap to `max_width` mm; overlong words get a line of their own
fn wrap_text(text: &str, size: f32, bold: bool, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, size, bold) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Map text onto what the built-in fonts can show.
///
/// Printable ASCII and Latin-1 (°, µ, ², é, ...) share their WinAnsi code
/// points and pass through. Typographic punctuation becomes its ASCII
/// counterpart; anything else becomes `?`.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' | '\u{2500}' => '-',
            '\u{2022}' => '*',
            '\t' => ' ',
            c if c == ' ' || c.is_ascii_graphic() => c,
            '\u{00A0}'..='\u{00FF}' => c,
            _ => '?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sensor::tests::sample_data;
    use crate::infrastructure::charts;
    use chrono::TimeZone;

    fn header() -> ReportHeader {
        ReportHeader {
            generated_at: Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            model_label: "Gemma 2 9B".to_string(),
        }
    }

    fn stats(len: usize) -> ReportStatistics {
        let records = sample_data(len).into_report_records().unwrap();
        ReportStatistics::summarize(&records).unwrap()
    }

    #[test]
    fn test_statistics_rows() {
        let rows = statistics_rows(&stats(3));
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], ["MQ-2 (Smoke)", "300", "320", "310.0", "10.0", "Normal"].map(String::from));
        assert_eq!(rows[4][0], "GPI");
        assert_eq!(rows[4][5], "Good");
        assert_eq!(rows[5][1], "25.0");
        assert_eq!(rows[6][5], "-");
    }

    #[test]
    fn test_layout_places_failure_note_in_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample_data(5).into_report_records().unwrap();
        let set = charts::render_all(&records, dir.path()).unwrap();
        let narrative = NarrativeText::failure("Error connecting to Ollama: refused");

        let plan = layout_plan(&header(), &stats(5), &set, &narrative).unwrap();
        let charts_in_plan = plan.iter().filter(|b| matches!(b, Block::Chart { .. })).count();
        assert_eq!(charts_in_plan, 4);
        assert!(plan.contains(&Block::Subheading(
            "Error connecting to Ollama: refused".to_string()
        )));
        assert!(plan.contains(&Block::Field {
            label: "Data Points:".to_string(),
            value: "5 records".to_string()
        }));
    }

    #[test]
    fn test_layout_requires_every_chart() {
        let narrative = NarrativeText::generated("All good.");
        let err = layout_plan(&header(), &stats(3), &ChartSet::default(), &narrative).unwrap_err();
        assert!(matches!(err, ReportError::Document(_)));
    }

    #[test]
    fn test_render_produces_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample_data(20).into_report_records().unwrap();
        let set = charts::render_all(&records, dir.path()).unwrap();
        let narrative = NarrativeText::generated(
            "1. EXECUTIVE SUMMARY\n\nAir quality is **good** across the run, with smoke and \
             methane comfortably below alert levels and a slowly rising GPI.\n\n\
             2. DETAILED SENSOR ANALYSIS\n\nNo anomalies.",
        );

        let plan = layout_plan(&header(), &stats(20), &set, &narrative).unwrap();
        let bytes = render(&plan).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // Charts are read, not consumed
        assert!(set.paths().all(|p| p.exists()));
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let text = "word ".repeat(200);
        let lines = wrap_text(&text, 10.0, false, CONTENT_WIDTH);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, false) <= CONTENT_WIDTH);
        }
        assert_eq!(lines.join(" ").split(' ').count(), 200);
    }

    #[test]
    fn test_pdf_safe_replaces_unsupported_characters() {
        assert_eq!(pdf_safe("\u{201C}ok\u{201D} \u{2013} 25\u{00B0}C"), "\"ok\" - 25\u{00B0}C");
        assert_eq!(pdf_safe("12 \u{00B5}g/m\u{00B3}, caf\u{00E9}"), "12 \u{00B5}g/m\u{00B3}, caf\u{00E9}");
        assert_eq!(pdf_safe("CO\u{2082} \u{2192} \u{1F600}"), "CO? ? ?");
    }
}
