//! Unit conversion from `LayoutVars` to the integer units WordprocessingML stores.
//!
//! - font sizes: half-points (`w:sz`)
//! - spacing and margins: twentieths of a point (`w:spacing`, `w:pgMar`)
//! - line height: 240ths of a line (`w:line` with `lineRule="auto"`)
//!
//! All conversions round half up. No clamping or other decisions happen here.

use serde::{Deserialize, Serialize};

use crate::layout::vars::LayoutVars;

const HALF_POINTS_PER_PT: f64 = 2.0;
const TWIPS_PER_PT: f64 = 20.0;
const TWIPS_PER_INCH: f64 = 1440.0;
const LINE_UNITS_PER_LINE: f64 = 240.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocxStyleRecord {
    pub body_font_half_points: u32,
    pub name_font_half_points: u32,
    pub section_header_font_half_points: u32,
    pub line_spacing: u32,
    pub section_spacing_before_twips: u32,
    pub section_spacing_after_twips: u32,
    pub role_gap_twips: u32,
    pub bullet_spacing_twips: u32,
    pub contact_spacing_twips: u32,
    pub margin_top_twips: u32,
    pub margin_bottom_twips: u32,
    pub margin_left_twips: u32,
    pub margin_right_twips: u32,
}

/// Negative inputs saturate to 0.
fn round_half_up(value: f64) -> u32 {
    (value + 0.5).floor() as u32
}

fn half_points(pt: f64) -> u32 {
    round_half_up(pt * HALF_POINTS_PER_PT)
}

fn pt_twips(pt: f64) -> u32 {
    round_half_up(pt * TWIPS_PER_PT)
}

fn in_twips(inches: f64) -> u32 {
    round_half_up(inches * TWIPS_PER_INCH)
}

pub fn layout_vars_to_docx(vars: &LayoutVars) -> DocxStyleRecord {
    DocxStyleRecord {
        body_font_half_points: half_points(vars.body_font_pt),
        name_font_half_points: half_points(vars.name_font_pt),
        section_header_font_half_points: half_points(vars.section_header_font_pt),
        line_spacing: round_half_up(vars.line_height * LINE_UNITS_PER_LINE),
        section_spacing_before_twips: pt_twips(vars.section_spacing_before_pt),
        section_spacing_after_twips: pt_twips(vars.section_spacing_after_pt),
        role_gap_twips: pt_twips(vars.role_gap_pt),
        bullet_spacing_twips: pt_twips(vars.bullet_spacing_pt),
        contact_spacing_twips: pt_twips(vars.contact_spacing_pt),
        margin_top_twips: in_twips(vars.margin_vertical_in),
        margin_bottom_twips: in_twips(vars.margin_vertical_in),
        margin_left_twips: in_twips(vars.margin_horizontal_in),
        margin_right_twips: in_twips(vars.margin_horizontal_in),
    }
}
