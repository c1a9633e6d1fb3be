//! The bounded knob space the fit solver moves through.
//!
//! Every field of `LayoutVars` carries a declared `[min, max]`. Nothing outside that range is
//! ever emitted: defaults are chosen inside it and `clamped()` folds any input back into it.

use serde::{Deserialize, Serialize};

/// Pixels per inch of the reference surface all heights are expressed in.
pub const REFERENCE_DPI: f64 = 96.0;
const POINTS_PER_INCH: f64 = 72.0;

pub fn pt_to_px(pt: f64) -> f64 {
    pt * REFERENCE_DPI / POINTS_PER_INCH
}

pub fn in_to_px(inches: f64) -> f64 {
    inches * REFERENCE_DPI
}

// ────────────────────────────────────────────────────────────────────────────
// LayoutVars
// ────────────────────────────────────────────────────────────────────────────

/// Purely visual layout parameters. Fonts and spacing are in points, line height is a
/// multiplier of the font size, margins are in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutVars {
    pub body_font_pt: f64,
    pub name_font_pt: f64,
    pub section_header_font_pt: f64,
    pub line_height: f64,
    pub section_spacing_before_pt: f64,
    pub section_spacing_after_pt: f64,
    pub role_gap_pt: f64,
    pub bullet_spacing_pt: f64,
    pub contact_spacing_pt: f64,
    pub margin_vertical_in: f64,
    pub margin_horizontal_in: f64,
}

impl Default for LayoutVars {
    fn default() -> Self {
        Density::Normal.preset()
    }
}

/// Which group a field belongs to when the solver picks what to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// Line height and every vertical gap.
    Spacing,
    Margins,
    Fonts,
}

/// Addressable handle for one `LayoutVars` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutField {
    BodyFont,
    NameFont,
    SectionHeaderFont,
    LineHeight,
    SectionSpacingBefore,
    SectionSpacingAfter,
    RoleGap,
    BulletSpacing,
    ContactSpacing,
    MarginVertical,
    MarginHorizontal,
}

impl LayoutField {
    pub const ALL: [LayoutField; 11] = [
        LayoutField::BodyFont,
        LayoutField::NameFont,
        LayoutField::SectionHeaderFont,
        LayoutField::LineHeight,
        LayoutField::SectionSpacingBefore,
        LayoutField::SectionSpacingAfter,
        LayoutField::RoleGap,
        LayoutField::BulletSpacing,
        LayoutField::ContactSpacing,
        LayoutField::MarginVertical,
        LayoutField::MarginHorizontal,
    ];

    /// Inclusive `(min, max)` for the field.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            LayoutField::BodyFont => (9.0, 12.0),
            LayoutField::NameFont => (14.0, 24.0),
            LayoutField::SectionHeaderFont => (10.0, 14.0),
            LayoutField::LineHeight => (1.0, 1.5),
            LayoutField::SectionSpacingBefore => (2.0, 16.0),
            LayoutField::SectionSpacingAfter => (1.0, 8.0),
            LayoutField::RoleGap => (1.0, 12.0),
            LayoutField::BulletSpacing => (0.5, 6.0),
            LayoutField::ContactSpacing => (1.0, 10.0),
            LayoutField::MarginVertical => (0.4, 1.0),
            LayoutField::MarginHorizontal => (0.4, 1.0),
        }
    }

    pub fn group(self) -> FieldGroup {
        match self {
            LayoutField::BodyFont | LayoutField::NameFont | LayoutField::SectionHeaderFont => {
                FieldGroup::Fonts
            }
            LayoutField::MarginVertical | LayoutField::MarginHorizontal => FieldGroup::Margins,
            _ => FieldGroup::Spacing,
        }
    }

    pub fn get(self, vars: &LayoutVars) -> f64 {
        match self {
            LayoutField::BodyFont => vars.body_font_pt,
            LayoutField::NameFont => vars.name_font_pt,
            LayoutField::SectionHeaderFont => vars.section_header_font_pt,
            LayoutField::LineHeight => vars.line_height,
            LayoutField::SectionSpacingBefore => vars.section_spacing_before_pt,
            LayoutField::SectionSpacingAfter => vars.section_spacing_after_pt,
            LayoutField::RoleGap => vars.role_gap_pt,
            LayoutField::BulletSpacing => vars.bullet_spacing_pt,
            LayoutField::ContactSpacing => vars.contact_spacing_pt,
            LayoutField::MarginVertical => vars.margin_vertical_in,
            LayoutField::MarginHorizontal => vars.margin_horizontal_in,
        }
    }

    fn slot(self, vars: &mut LayoutVars) -> &mut f64 {
        match self {
            LayoutField::BodyFont => &mut vars.body_font_pt,
            LayoutField::NameFont => &mut vars.name_font_pt,
            LayoutField::SectionHeaderFont => &mut vars.section_header_font_pt,
            LayoutField::LineHeight => &mut vars.line_height,
            LayoutField::SectionSpacingBefore => &mut vars.section_spacing_before_pt,
            LayoutField::SectionSpacingAfter => &mut vars.section_spacing_after_pt,
            LayoutField::RoleGap => &mut vars.role_gap_pt,
            LayoutField::BulletSpacing => &mut vars.bullet_spacing_pt,
            LayoutField::ContactSpacing => &mut vars.contact_spacing_pt,
            LayoutField::MarginVertical => &mut vars.margin_vertical_in,
            LayoutField::MarginHorizontal => &mut vars.margin_horizontal_in,
        }
    }

    /// Writes `value` folded into bounds.
    pub fn set(self, vars: &mut LayoutVars, value: f64) {
        *self.slot(vars) = self.clamp(value);
    }

    /// Folds `value` into bounds. Non-finite input maps to the minimum.
    pub fn clamp(self, value: f64) -> f64 {
        let (min, max) = self.bounds();
        if value.is_finite() {
            value.clamp(min, max)
        } else {
            min
        }
    }
}

impl LayoutVars {
    /// Returns a copy with every field independently clamped. Idempotent.
    pub fn clamped(&self) -> LayoutVars {
        let mut out = self.clone();
        for field in LayoutField::ALL {
            field.set(&mut out, field.get(self));
        }
        out
    }

    /// Every field at its lower bound: the densest layout the bounds allow.
    pub fn minimum() -> LayoutVars {
        let mut out = LayoutVars::default();
        for field in LayoutField::ALL {
            field.set(&mut out, field.bounds().0);
        }
        out
    }

    pub fn is_valid(&self) -> bool {
        LayoutField::ALL.iter().all(|&field| {
            let (min, max) = field.bounds();
            let value = field.get(self);
            value.is_finite() && value >= min && value <= max
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Density presets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Sparse,
    Normal,
    Dense,
    Overflow,
}

/// Exclusive upper char-count bound per tier, in ascending order. Anything above the last
/// bound is `Overflow`.
const DENSITY_TIERS: [(usize, Density); 3] = [
    (2200, Density::Sparse),
    (3400, Density::Normal),
    (4600, Density::Dense),
];

impl Density {
    pub fn for_char_count(char_count: usize) -> Density {
        DENSITY_TIERS
            .iter()
            .find(|(limit, _)| char_count < *limit)
            .map(|(_, density)| *density)
            .unwrap_or(Density::Overflow)
    }

    pub fn preset(self) -> LayoutVars {
        match self {
            Density::Sparse => LayoutVars {
                body_font_pt: 11.5,
                name_font_pt: 22.0,
                section_header_font_pt: 13.0,
                line_height: 1.3,
                section_spacing_before_pt: 12.0,
                section_spacing_after_pt: 5.0,
                role_gap_pt: 8.0,
                bullet_spacing_pt: 3.0,
                contact_spacing_pt: 6.0,
                margin_vertical_in: 0.9,
                margin_horizontal_in: 0.9,
            },
            Density::Normal => LayoutVars {
                body_font_pt: 11.0,
                name_font_pt: 20.0,
                section_header_font_pt: 12.0,
                line_height: 1.2,
                section_spacing_before_pt: 9.0,
                section_spacing_after_pt: 4.0,
                role_gap_pt: 6.0,
                bullet_spacing_pt: 2.0,
                contact_spacing_pt: 4.0,
                margin_vertical_in: 0.75,
                margin_horizontal_in: 0.75,
            },
            Density::Dense => LayoutVars {
                body_font_pt: 10.0,
                name_font_pt: 18.0,
                section_header_font_pt: 11.0,
                line_height: 1.1,
                section_spacing_before_pt: 6.0,
                section_spacing_after_pt: 3.0,
                role_gap_pt: 4.0,
                bullet_spacing_pt: 1.0,
                contact_spacing_pt: 3.0,
                margin_vertical_in: 0.6,
                margin_horizontal_in: 0.6,
            },
            Density::Overflow => LayoutVars {
                body_font_pt: 9.5,
                name_font_pt: 16.0,
                section_header_font_pt: 10.5,
                line_height: 1.05,
                section_spacing_before_pt: 4.0,
                section_spacing_after_pt: 2.0,
                role_gap_pt: 2.0,
                bullet_spacing_pt: 0.5,
                contact_spacing_pt: 2.0,
                margin_vertical_in: 0.5,
                margin_horizontal_in: 0.5,
            },
        }
    }
}

/// Starting layout for a resume of `char_count` characters.
pub fn default_layout_vars(char_count: usize) -> LayoutVars {
    Density::for_char_count(char_count).preset()
}

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    Letter,
    A4,
}

impl PaperSize {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "letter" | "us-letter" => Some(PaperSize::Letter),
            "a4" => Some(PaperSize::A4),
            _ => None,
        }
    }

    /// `(width, height)` in inches.
    pub fn dimensions_in(self) -> (f64, f64) {
        match self {
            PaperSize::Letter => (8.5, 11.0),
            PaperSize::A4 => (8.27, 11.69),
        }
    }
}

/// Physical page plus the margins in effect for one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub width_in: f64,
    pub height_in: f64,
    pub margin_top_in: f64,
    pub margin_bottom_in: f64,
    pub margin_left_in: f64,
    pub margin_right_in: f64,
}

impl PageSpec {
    pub fn new(paper: PaperSize, vars: &LayoutVars) -> Self {
        let (width_in, height_in) = paper.dimensions_in();
        PageSpec {
            width_in,
            height_in,
            margin_top_in: vars.margin_vertical_in,
            margin_bottom_in: vars.margin_vertical_in,
            margin_left_in: vars.margin_horizontal_in,
            margin_right_in: vars.margin_horizontal_in,
        }
    }

    pub fn content_width_px(&self) -> f64 {
        in_to_px(self.width_in - self.margin_left_in - self.margin_right_in).max(0.0)
    }
}

/// Usable vertical space on the page, in reference pixels.
pub fn content_height_px(page: &PageSpec) -> f64 {
    in_to_px(page.height_in - page.margin_top_in - page.margin_bottom_in).max(0.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_every_preset_is_valid() {
        for density in [
            Density::Sparse,
            Density::Normal,
            Density::Dense,
            Density::Overflow,
        ] {
            assert!(density.preset().is_valid(), "{density:?} preset out of bounds");
        }
    }

    #[test]
    fn test_density_tiers() {
        assert_eq!(Density::for_char_count(0), Density::Sparse);
        assert_eq!(Density::for_char_count(2199), Density::Sparse);
        assert_eq!(Density::for_char_count(2200), Density::Normal);
        assert_eq!(Density::for_char_count(4000), Density::Dense);
        assert_eq!(Density::for_char_count(4600), Density::Overflow);
        assert_eq!(Density::for_char_count(usize::MAX), Density::Overflow);
    }

    #[test]
    fn test_denser_content_gets_smaller_body_font() {
        let sparse = default_layout_vars(500);
        let dense = default_layout_vars(9000);
        assert!(dense.body_font_pt < sparse.body_font_pt);
        assert!(dense.margin_vertical_in < sparse.margin_vertical_in);
    }

    #[test]
    fn test_clamp_folds_out_of_range_values() {
        let vars = LayoutVars {
            body_font_pt: 4.0,
            line_height: 3.0,
            bullet_spacing_pt: -2.0,
            margin_vertical_in: f64::NAN,
            margin_horizontal_in: f64::INFINITY,
            ..LayoutVars::default()
        };
        let clamped = vars.clamped();
        assert_eq!(clamped.body_font_pt, 9.0);
        assert_eq!(clamped.line_height, 1.5);
        assert_eq!(clamped.bullet_spacing_pt, 0.5);
        assert_eq!(clamped.margin_vertical_in, 0.4);
        assert_eq!(clamped.margin_horizontal_in, 0.4);
        assert!(clamped.is_valid());
    }

    #[test]
    fn test_bounds_never_allow_zero_spacing_or_tiny_fonts() {
        for field in LayoutField::ALL {
            let (min, max) = field.bounds();
            assert!(min > 0.0, "{field:?} allows zero");
            assert!(min < max);
        }
        assert!(LayoutField::BodyFont.bounds().0 >= 9.0);
    }

    #[test]
    fn test_groups_partition_fields() {
        let spacing = LayoutField::ALL
            .iter()
            .filter(|f| f.group() == FieldGroup::Spacing)
            .count();
        let margins = LayoutField::ALL
            .iter()
            .filter(|f| f.group() == FieldGroup::Margins)
            .count();
        let fonts = LayoutField::ALL
            .iter()
            .filter(|f| f.group() == FieldGroup::Fonts)
            .count();
        assert_eq!((spacing, margins, fonts), (6, 2, 3));
    }

    #[test]
    fn test_content_height_letter_with_three_quarter_margins() {
        let page = PageSpec::new(PaperSize::Letter, &LayoutVars::default());
        assert!((content_height_px(&page) - 912.0).abs() < 1e-9);
        assert!((page.content_width_px() - 672.0).abs() < 1e-9);
    }

    #[test]
    fn test_a4_is_taller_than_letter() {
        let vars = LayoutVars::default();
        let a4 = content_height_px(&PageSpec::new(PaperSize::A4, &vars));
        let letter = content_height_px(&PageSpec::new(PaperSize::Letter, &vars));
        assert!(a4 > letter);
    }

    #[test]
    fn test_pt_to_px() {
        assert!((pt_to_px(72.0) - 96.0).abs() < 1e-12);
        assert!((pt_to_px(12.0) - 16.0).abs() < 1e-12);
    }

    fn any_value() -> impl Strategy<Value = f64> {
        prop_oneof![
            8 => -50.0..80.0f64,
            1 => Just(f64::NAN),
            1 => Just(f64::INFINITY),
            1 => Just(f64::NEG_INFINITY),
        ]
    }

    fn any_layout_vars() -> impl Strategy<Value = LayoutVars> {
        proptest::collection::vec(any_value(), 11).prop_map(|v| LayoutVars {
            body_font_pt: v[0],
            name_font_pt: v[1],
            section_header_font_pt: v[2],
            line_height: v[3],
            section_spacing_before_pt: v[4],
            section_spacing_after_pt: v[5],
            role_gap_pt: v[6],
            bullet_spacing_pt: v[7],
            contact_spacing_pt: v[8],
            margin_vertical_in: v[9],
            margin_horizontal_in: v[10],
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_clamp_is_idempotent(vars in any_layout_vars()) {
            let once = vars.clamped();
            let twice = once.clamped();
            prop_assert!(once.is_valid());
            prop_assert_eq!(once, twice);
        }
    }
}
