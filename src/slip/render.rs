//! genpdf rendering of the salary slip layout.
//!
//! Fixed sequence: letterhead, title, employee info, the three category columns, totals,
//! take home pay and the HR signature block.

use genpdf::elements::{Break, Image, LinearLayout, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{Alignment, Document, Element as _, PaperSize, SimplePageDecorator};
use std::path::{Path, PathBuf};

use super::content::SlipContent;
use super::{RenderError, RenderedSlip, SlipRenderer};
use crate::config::{Letterhead, SlipAssets};

const BRAND: Color = Color::Rgb(0, 61, 92);
const INK: Color = Color::Rgb(51, 51, 51);
const MUTED: Color = Color::Rgb(102, 102, 102);
const PAGE_MARGIN_MM: i32 = 14;
const IMAGE_DPI: f64 = 300.0;

const COLUMN_HEADINGS: [&str; 3] = ["INCOME", "DEDUCTION", "LAST MONTH'S BENEFITS"];
const BENEFITS_NOTE: &str = "Benefits 100% supported by the company";

/// Slip renderer backed by TTF fonts and optional logo / stamp images on disk.
pub struct PdfSlipRenderer {
    fonts_dir: PathBuf,
    font_family: String,
    logo_path: Option<PathBuf>,
    stamp_path: Option<PathBuf>,
    letterhead: Letterhead,
}

impl PdfSlipRenderer {
    pub fn new(assets: &SlipAssets, letterhead: Letterhead) -> Self {
        Self {
            fonts_dir: assets.fonts_dir.clone(),
            font_family: assets.font_family.clone(),
            logo_path: assets.logo_path.clone(),
            stamp_path: assets.stamp_path.clone(),
            letterhead,
        }
    }

    fn load_fonts(&self) -> Result<FontFamily<FontData>, RenderError> {
        genpdf::fonts::from_files(
            &self.fonts_dir,
            &self.font_family,
            Some(genpdf::fonts::Builtin::Helvetica),
        )
            .map_err(RenderError::Font)
    }

    fn configure_document(&self, title: &str) -> Result<Document, RenderError> {
        let mut doc = Document::new(self.load_fonts()?);
        doc.set_title(title);
        doc.set_paper_size(PaperSize::A4);
        doc.set_font_size(8);
        doc.set_line_spacing(1.1);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(PAGE_MARGIN_MM);
        doc.set_page_decorator(decorator);
        Ok(doc)
    }

    fn letterhead(&self) -> Result<TableLayout, RenderError> {
        let mut left = LinearLayout::vertical();
        match existing_image(self.logo_path.as_deref())? {
            Some(logo) => left.push(logo.with_alignment(Alignment::Left)),
            None => left.push(Paragraph::new("")),
        }

        let mut right = LinearLayout::vertical();
        for line in [&self.letterhead.address, &self.letterhead.contact] {
            right.push(
                Paragraph::new(StyledString::new(line.clone(), Style::new().with_color(INK)))
                    .aligned(Alignment::Right),
            );
        }

        let mut table = TableLayout::new(vec![1, 2]);
        table
            .row()
            .element(left)
            .element(right)
            .push()
            .map_err(RenderError::Layout)?;
        Ok(table)
    }

    fn signature(&self) -> Result<LinearLayout, RenderError> {
        let mut block = LinearLayout::vertical();
        if let Some(stamp) = existing_image(self.stamp_path.as_deref())? {
            block.push(stamp.with_alignment(Alignment::Right));
        } else {
            block.push(Break::new(3));
        }
        block.push(
            Paragraph::new(StyledString::new("HRD Department", Style::new().bold()))
                .aligned(Alignment::Right),
        );
        Ok(block)
    }
}

impl SlipRenderer for PdfSlipRenderer {
    fn check(&self) -> Result<(), RenderError> {
        self.load_fonts().map(|_| ())
    }

    fn render(&self, content: &SlipContent) -> Result<RenderedSlip, RenderError> {
        let filename = content.attachment_name();
        let mut doc = self.configure_document(&filename)?;

        doc.push(self.letterhead()?);
        doc.push(Break::new(2));
        doc.push(
            Paragraph::new(StyledString::new(
                "SALARY SLIP",
                Style::new().bold().with_font_size(18),
            ))
            .aligned(Alignment::Center),
        );
        doc.push(Break::new(1));
        doc.push(info_block(content)?);
        doc.push(Break::new(1));
        doc.push(category_table(content)?);
        doc.push(Break::new(1));
        doc.push(take_home_pay(content)?);
        doc.push(Break::new(2));
        doc.push(self.signature()?);

        let mut pdf = Vec::new();
        doc.render(&mut pdf).map_err(RenderError::Render)?;

        log::debug!("Rendered {} ({} bytes)", filename, pdf.len());
        Ok(RenderedSlip { filename, pdf })
    }
}

fn existing_image(path: Option<&Path>) -> Result<Option<Image>, RenderError> {
    let Some(path) = path.filter(|p| p.exists()) else {
        return Ok(None);
    };

    let mut image = Image::from_path(path).map_err(|source| RenderError::Image {
        path: path.display().to_string(),
        source,
    })?;
    image.set_dpi(IMAGE_DPI);
    Ok(Some(image))
}

fn info_block(content: &SlipContent) -> Result<TableLayout, RenderError> {
    let mut table = TableLayout::new(vec![1, 1]);
    table.set_cell_decorator(genpdf::elements::FrameCellDecorator::new(false, true, false));

    for [left, right] in content.info_lines() {
        table
            .row()
            .element(info_cell(left).padded(1))
            .element(info_cell(right).padded(1))
            .push()
            .map_err(RenderError::Layout)?;
    }
    Ok(table)
}

fn info_cell((label, value): (&str, &str)) -> Paragraph {
    Paragraph::new(StyledString::new(
        format!("{}: {}", label, value),
        Style::new().with_color(INK),
    ))
}

fn category_table(content: &SlipContent) -> Result<TableLayout, RenderError> {
    let mut outer = TableLayout::new(vec![1, 1, 1]);

    let mut headings = outer.row();
    for heading in COLUMN_HEADINGS {
        headings = headings.element(
            Paragraph::new(StyledString::new(
                heading,
                Style::new().bold().with_font_size(9).with_color(BRAND),
            ))
            .aligned(Alignment::Center)
            .padded(1),
        );
    }
    headings.push().map_err(RenderError::Layout)?;

    let rows = content.table_rows();
    let mut body = outer.row();
    for column in 0..COLUMN_HEADINGS.len() {
        let mut lines = TableLayout::new(vec![3, 2]);
        for row in &rows {
            let (label, amount) = row[column].clone().unwrap_or_default();
            lines
                .row()
                .element(Paragraph::new(StyledString::new(label, Style::new().with_color(INK))))
                .element(
                    Paragraph::new(StyledString::new(amount, Style::new().with_color(INK)))
                        .aligned(Alignment::Right),
                )
                .push()
                .map_err(RenderError::Layout)?;
        }
        body = body.element(lines.padded(1));
    }
    body.push().map_err(RenderError::Layout)?;

    outer
        .row()
        .element(Paragraph::new(""))
        .element(Paragraph::new(""))
        .element(
            Paragraph::new(StyledString::new(
                BENEFITS_NOTE,
                Style::new().italic().with_font_size(7).with_color(MUTED),
            ))
            .padded(1),
        )
        .push()
        .map_err(RenderError::Layout)?;

    let mut totals = outer.row();
    for total in content.totals() {
        let mut line = TableLayout::new(vec![3, 2]);
        line.row()
            .element(Paragraph::new(StyledString::new("TOTAL", Style::new().bold())))
            .element(
                Paragraph::new(StyledString::new(total, Style::new().bold()))
                    .aligned(Alignment::Right),
            )
            .push()
            .map_err(RenderError::Layout)?;
        totals = totals.element(line.padded(1));
    }
    totals.push().map_err(RenderError::Layout)?;

    Ok(outer)
}

fn take_home_pay(content: &SlipContent) -> Result<TableLayout, RenderError> {
    let mut boxed = LinearLayout::vertical();
    boxed.push(Paragraph::new(StyledString::new(
        "TAKE HOME PAY",
        Style::new().bold().with_font_size(10),
    )));
    boxed.push(
        Paragraph::new(StyledString::new(
            content.take_home_pay(),
            Style::new().bold().with_font_size(14).with_color(BRAND),
        ))
        .aligned(Alignment::Right),
    );

    let mut frame = TableLayout::new(vec![1]);
    frame.set_cell_decorator(genpdf::elements::FrameCellDecorator::new(true, true, false));
    frame
        .row()
        .element(boxed.padded(2))
        .push()
        .map_err(RenderError::Layout)?;

    let mut table = TableLayout::new(vec![1, 1]);
    table
        .row()
        .element(Paragraph::new(""))
        .element(frame)
        .push()
        .map_err(RenderError::Layout)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::row::PayrollRow;

    fn renderer(fonts_dir: &Path) -> PdfSlipRenderer {
        PdfSlipRenderer::new(
            &SlipAssets {
                fonts_dir: fonts_dir.to_path_buf(),
                font_family: "LiberationSans".to_string(),
                logo_path: None,
                stamp_path: None,
            },
            Letterhead::default(),
        )
    }

    #[test]
    fn test_check_fails_without_fonts() {
        let dir = tempfile::tempdir().unwrap();
        let result = renderer(dir.path()).check();
        assert!(matches!(result, Err(RenderError::Font(_))));
    }

    #[test]
    fn test_render_fails_without_fonts() {
        let dir = tempfile::tempdir().unwrap();
        let row: PayrollRow = serde_json::from_value(serde_json::json!({"Name": "Ana"})).unwrap();
        let result = renderer(dir.path()).render(&SlipContent::from_row(&row));
        assert!(matches!(result, Err(RenderError::Font(_))));
    }

    fn fixture_fonts() -> Option<PathBuf> {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts");
        dir.join("DejaVuSans-Regular.ttf").exists().then_some(dir)
    }

    #[test]
    fn test_render_full_slip_on_one_page() {
        let Some(fonts_dir) = fixture_fonts() else {
            eprintln!("fixture fonts not found, skipping");
            return;
        };
        let renderer = PdfSlipRenderer::new(
            &SlipAssets {
                fonts_dir,
                font_family: "DejaVuSans".to_string(),
                logo_path: None,
                stamp_path: None,
            },
            Letterhead::default(),
        );
        let row: PayrollRow = serde_json::from_value(serde_json::json!({
            "EmployeeID": "TTM-001",
            "Name": "Ana Putri",
            "Position": "Seamstress",
            "HireDate": "5 Januari 2020",
            "WorkingDays": 22,
            "Location": "Kerobokan",
            "BasicSalary": "Rp 5.000.000",
            "YearlyWorkingAllowance": 250000,
            "SkillAllowance": 150000,
            "MealAllowance": 440000,
            "Transport": 300000,
            "Productivity": 100000,
            "Overtime": 125000,
            "MealOvertime": 50000,
            "HomeworkAllowance": 75000,
            "Other Deductions": 20000,
            "Adv cash deductions": 500000,
            "Benefit BPJS kesehatan": 200000,
            "Benefit BPJS Tenaga Kerja": 170000,
            "Benefit PPH 21": 90000,
            "TotalEarnings": 6490000,
            "Total deduction": 520000,
            "Total  benefit": 460000,
            "NetPay": "Rp 5.970.000"
        }))
        .unwrap();

        renderer.check().unwrap();
        let slip = renderer.render(&SlipContent::from_row(&row)).unwrap();

        assert_eq!(slip.filename, "Salary-Slip-Ana Putri.pdf");
        assert!(slip.pdf.starts_with(b"%PDF"));
        let pdf = String::from_utf8_lossy(&slip.pdf);
        assert!(pdf.contains("/Count 1"), "slip must fit on a single page");
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let image = existing_image(Some(Path::new("/definitely/not/here.jpg"))).unwrap();
        assert!(image.is_none());
        assert!(existing_image(None).unwrap().is_none());
    }
}
