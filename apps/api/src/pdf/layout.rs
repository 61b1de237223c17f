//! Places the resume text on US-letter pages. Produces positioned lines only;
//! `render` turns them into PDF objects.

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::metrics::{wrap, PdfFont};
use crate::employees::EmployeeView;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 50.0;
pub const TITLE: &str = "HOJA DE VIDA - TALENTOPLUS";

const TITLE_SIZE: f32 = 20.0;
const SECTION_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const FOOTER_SIZE: f32 = 9.0;
const LEADING: f32 = 1.4;
const SECTION_GAP: f32 = 20.0;
/// Body text stops here so it never runs into the footer.
const BODY_BOTTOM: f32 = MARGIN + 20.0;
const FOOTER_Y: f32 = MARGIN - FOOTER_SIZE;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub font: PdfFont,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

fn text_width() -> f32 {
    PAGE_WIDTH - 2.0 * MARGIN
}

struct Cursor {
    pages: Vec<Page>,
    current: Page,
    /// Baseline of the next line.
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Page::default(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn place(&mut self, font: PdfFont, size: f32, x: f32, text: String) {
        if self.y - size < BODY_BOTTOM {
            self.break_page();
        }
        self.y -= size;
        self.current.lines.push(PlacedLine {
            font,
            size,
            x,
            y: self.y,
            text,
        });
        self.y -= size * (LEADING - 1.0);
    }

    fn centered(&mut self, font: PdfFont, size: f32, text: &str) {
        let x = ((PAGE_WIDTH - font.measure(text, size)) / 2.0).max(MARGIN);
        self.place(font, size, x, text.to_string());
    }

    fn paragraph(&mut self, font: PdfFont, size: f32, text: &str) {
        for line in wrap(font, text, size, text_width()) {
            self.place(font, size, MARGIN, line);
        }
    }

    fn section(&mut self, heading: &str) {
        self.y -= SECTION_GAP;
        self.place(PdfFont::Bold, SECTION_SIZE, MARGIN, heading.to_string());
    }

    fn field(&mut self, label: &str, value: &str) {
        self.paragraph(PdfFont::Regular, BODY_SIZE, &format!("{label}: {value}"));
    }

    /// Closes the last page and stamps every page with the footer.
    fn finish(mut self, generated_at: NaiveDateTime) -> Vec<Page> {
        self.pages.push(self.current);
        let stamp = generated_at.format("%d/%m/%Y %H:%M").to_string();
        for (index, page) in self.pages.iter_mut().enumerate() {
            let text = format!("Generado el {stamp} - Página {}", index + 1);
            let x = (PAGE_WIDTH - PdfFont::Regular.measure(&text, FOOTER_SIZE)) / 2.0;
            page.lines.push(PlacedLine {
                font: PdfFont::Regular,
                size: FOOTER_SIZE,
                x,
                y: FOOTER_Y,
                text,
            });
        }
        self.pages
    }
}

/// `$ 3.000.000` or `$ 1.234,50`: dot thousands, comma decimals, cents only
/// when non-zero.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let abs = rounded.abs();
    let whole = abs.trunc();
    let cents = ((abs - whole) * Decimal::ONE_HUNDRED).trunc().to_u32().unwrap_or(0);

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if cents == 0 {
        format!("$ {sign}{grouped}")
    } else {
        format!("$ {sign}{grouped},{cents:02}")
    }
}

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        "No especificado"
    } else {
        value
    }
}

pub fn layout_resume(view: &EmployeeView, generated_at: NaiveDateTime) -> Vec<Page> {
    let e = &view.employee;
    let mut cursor = Cursor::new();

    cursor.centered(PdfFont::Bold, TITLE_SIZE, TITLE);

    cursor.section("DATOS PERSONALES");
    cursor.field("Documento", &e.document);
    cursor.field("Nombre", &e.full_name());
    cursor.field("Fecha de Nacimiento", &e.birth_date.format("%d/%m/%Y").to_string());
    cursor.field("Dirección", or_unspecified(&e.address));
    cursor.field("Teléfono", or_unspecified(&e.phone));
    cursor.field("Email", &e.email);

    cursor.section("INFORMACIÓN LABORAL");
    cursor.field("Cargo", or_unspecified(&view.job_title_name));
    cursor.field("Departamento", or_unspecified(&view.department_name));
    cursor.field("Nivel Educativo", or_unspecified(&view.education_level_name));
    cursor.field("Salario", &format_money(e.salary));
    cursor.field("Fecha de Ingreso", &e.hire_date.format("%d/%m/%Y").to_string());
    cursor.field("Estado", view.status_label);

    cursor.section("PERFIL PROFESIONAL");
    cursor.paragraph(
        PdfFont::Regular,
        BODY_SIZE,
        or_unspecified(&e.professional_profile),
    );

    cursor.finish(generated_at)
}
