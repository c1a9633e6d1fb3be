//! Static font-metric tables for the two export fonts.
//!
//! Widths are advance widths in 1/1000 em, taken from the standard Helvetica and Times-Roman
//! AFM tables (Arial and Times New Roman are metric-compatible). Kerning is ignored; the fit
//! tolerance band absorbs the residual error.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters). Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

use crate::layout::vars::pt_to_px;

/// Fonts the exporter can embed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Arial,
    Times,
}

impl FontFamily {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "arial" | "helvetica" => Some(FontFamily::Arial),
            "times" | "times new roman" => Some(FontFamily::Times),
            _ => None,
        }
    }
}

/// Static character-width table for a font family.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: [u16; 95],
    /// Fallback for non-ASCII characters.
    pub average_width: u16,
}

impl FontMetricTable {
    /// Width of `s` in em units.
    pub fn measure_em(&self, s: &str) -> f64 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                let units = if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_width
                };
                f64::from(units) / 1000.0
            })
            .sum()
    }

    /// Width of `s` in pixels at `font_pt`.
    pub fn measure_px(&self, s: &str, font_pt: f64) -> f64 {
        self.measure_em(s) * pt_to_px(font_pt)
    }

    /// Number of lines `text` occupies when greedily word-wrapped at `max_width_px`.
    ///
    /// A word wider than the line is split across as many lines as it needs.
    /// Empty or whitespace-only text occupies zero lines.
    pub fn line_count(&self, text: &str, max_width_px: f64, font_pt: f64) -> u32 {
        if max_width_px <= 0.0 {
            return 0;
        }
        let space_w = self.measure_px(" ", font_pt);
        let mut lines = 0u32;
        let mut current = 0.0_f64;

        for word in text.split_whitespace() {
            let word_w = self.measure_px(word, font_pt);
            if lines == 0 {
                lines = 1;
            } else if current + space_w + word_w <= max_width_px {
                current += space_w + word_w;
                continue;
            } else {
                lines += 1;
            }

            if word_w > max_width_px {
                let extra = (word_w / max_width_px).ceil() as u32 - 1;
                lines += extra;
                current = word_w - f64::from(extra) * max_width_px;
            } else {
                current = word_w;
            }
        }
        lines
    }
}

/// Helvetica / Arial.
static ARIAL_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Arial,
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    average_width: 530,
};

/// Times-Roman / Times New Roman.
static TIMES_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Times,
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        278, 278, 564, 564, 564, 444, 921,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 469, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        // {    |    }    ~
        480, 200, 480, 541,
    ],
    average_width: 470,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Arial => &ARIAL_TABLE,
        FontFamily::Times => &TIMES_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
