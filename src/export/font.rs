//! Built-in 5x7 bitmap font for the raster stage.
//!
//! Glyphs are stored column-major, one byte per column, bit 0 at the top.
//! Each glyph occupies a 6x8 cell (one column and one row of spacing).

pub const GLYPH_COLUMNS: u32 = 5;
pub const GLYPH_ROWS: u32 = 7;
pub const CELL_WIDTH: u32 = 6;
pub const CELL_HEIGHT: u32 = 8;

const FIRST: u32 = 0x20;

const REPLACEMENT: [u8; 5] = [0x7F, 0x41, 0x41, 0x41, 0x7F];

#[rustfmt::skip]
const ASCII: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];

/// Typographic punctuation drawn with its ASCII counterpart.
const ALIASES: [(char, char); 9] = [
    ('\u{00A0}', ' '),
    ('\u{00AD}', '-'),
    ('\u{2010}', '-'),
    ('\u{2013}', '-'),
    ('\u{2014}', '-'),
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
];

#[rustfmt::skip]
const STANDALONE: [(char, [u8; 5]); 14] = [
    ('¡', [0x00, 0x00, 0x7D, 0x00, 0x00]),
    ('¿', [0x30, 0x48, 0x45, 0x40, 0x20]),
    ('°', [0x00, 0x06, 0x09, 0x06, 0x00]),
    ('·', [0x00, 0x00, 0x08, 0x00, 0x00]),
    ('«', [0x08, 0x14, 0x2A, 0x14, 0x22]),
    ('»', [0x22, 0x14, 0x2A, 0x14, 0x08]),
    ('×', [0x22, 0x14, 0x08, 0x14, 0x22]),
    ('ß', [0x7E, 0x01, 0x49, 0x49, 0x36]),
    ('Æ', [0x7E, 0x09, 0x7F, 0x49, 0x41]),
    ('æ', [0x20, 0x54, 0x78, 0x54, 0x58]),
    ('Ø', [0x5E, 0x31, 0x49, 0x46, 0x3D]),
    ('ø', [0x58, 0x64, 0x54, 0x4C, 0x34]),
    ('Đ', [0x08, 0x7F, 0x49, 0x41, 0x3E]),
    ('đ', [0x38, 0x44, 0x44, 0x4A, 0x7F]),
];

/// Diacritics drawn above an ASCII base letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Acute,
    Grave,
    Circumflex,
    Tilde,
    Diaeresis,
    Ring,
    Caron,
    Breve,
    Macron,
    Dot,
    DoubleAcute,
    Hook,
    /// Cedilla, ogonek and dot below have no room in the cell.
    Below,
}

impl Mark {
    /// Rows 0 and 1, for bases whose top two rows are blank.
    const fn tall(self) -> [u8; 5] {
        match self {
            Self::Acute => [0x00, 0x00, 0x02, 0x01, 0x00],
            Self::Grave => [0x00, 0x01, 0x02, 0x00, 0x00],
            Self::Circumflex => [0x00, 0x02, 0x01, 0x02, 0x00],
            Self::Tilde => [0x02, 0x01, 0x02, 0x01, 0x00],
            Self::Diaeresis => [0x00, 0x01, 0x00, 0x01, 0x00],
            Self::Ring => [0x00, 0x03, 0x01, 0x03, 0x00],
            Self::Caron => [0x00, 0x01, 0x02, 0x01, 0x00],
            Self::Breve => [0x00, 0x01, 0x02, 0x02, 0x01],
            Self::Macron => [0x00, 0x02, 0x02, 0x02, 0x00],
            Self::Dot => [0x00, 0x00, 0x01, 0x00, 0x00],
            Self::DoubleAcute => [0x00, 0x02, 0x01, 0x02, 0x01],
            Self::Hook => [0x00, 0x01, 0x03, 0x00, 0x00],
            Self::Below => [0x00; 5],
        }
    }

    /// Row 0 only, for capitals and ascenders.
    const fn flat(self) -> [u8; 5] {
        match self {
            Self::Acute => [0x00, 0x00, 0x00, 0x01, 0x01],
            Self::Grave => [0x01, 0x01, 0x00, 0x00, 0x00],
            Self::Circumflex => [0x00, 0x00, 0x01, 0x00, 0x00],
            Self::Tilde => [0x01, 0x00, 0x01, 0x00, 0x01],
            Self::Diaeresis => [0x00, 0x01, 0x00, 0x01, 0x00],
            Self::Ring => [0x00, 0x01, 0x01, 0x01, 0x00],
            Self::Caron => [0x01, 0x00, 0x00, 0x00, 0x01],
            Self::Breve => [0x01, 0x00, 0x00, 0x01, 0x00],
            Self::Macron => [0x01, 0x01, 0x01, 0x01, 0x01],
            Self::Dot => [0x00, 0x00, 0x01, 0x00, 0x00],
            Self::DoubleAcute => [0x00, 0x01, 0x00, 0x01, 0x00],
            Self::Hook => [0x00, 0x00, 0x01, 0x01, 0x00],
            Self::Below => [0x00; 5],
        }
    }
}

use Mark::*;

#[rustfmt::skip]
const ACCENTED: &[(char, char, Mark)] = &[
    // Latin-1 supplement
    ('À', 'A', Grave), ('Á', 'A', Acute), ('Â', 'A', Circumflex), ('Ã', 'A', Tilde),
    ('Ä', 'A', Diaeresis), ('Å', 'A', Ring), ('Ç', 'C', Below), ('È', 'E', Grave),
    ('É', 'E', Acute), ('Ê', 'E', Circumflex), ('Ë', 'E', Diaeresis), ('Ì', 'I', Grave),
    ('Í', 'I', Acute), ('Î', 'I', Circumflex), ('Ï', 'I', Diaeresis), ('Ð', 'D', Below),
    ('Ñ', 'N', Tilde), ('Ò', 'O', Grave), ('Ó', 'O', Acute), ('Ô', 'O', Circumflex),
    ('Õ', 'O', Tilde), ('Ö', 'O', Diaeresis), ('Ù', 'U', Grave), ('Ú', 'U', Acute),
    ('Û', 'U', Circumflex), ('Ü', 'U', Diaeresis), ('Ý', 'Y', Acute),
    ('à', 'a', Grave), ('á', 'a', Acute), ('â', 'a', Circumflex), ('ã', 'a', Tilde),
    ('ä', 'a', Diaeresis), ('å', 'a', Ring), ('ç', 'c', Below), ('è', 'e', Grave),
    ('é', 'e', Acute), ('ê', 'e', Circumflex), ('ë', 'e', Diaeresis), ('ì', 'i', Grave),
    ('í', 'i', Acute), ('î', 'i', Circumflex), ('ï', 'i', Diaeresis), ('ñ', 'n', Tilde),
    ('ò', 'o', Grave), ('ó', 'o', Acute), ('ô', 'o', Circumflex), ('õ', 'o', Tilde),
    ('ö', 'o', Diaeresis), ('ù', 'u', Grave), ('ú', 'u', Acute), ('û', 'u', Circumflex),
    ('ü', 'u', Diaeresis), ('ý', 'y', Acute), ('ÿ', 'y', Diaeresis),
    // Latin extended-A
    ('Ā', 'A', Macron), ('ā', 'a', Macron), ('Ă', 'A', Breve), ('ă', 'a', Breve),
    ('Ą', 'A', Below), ('ą', 'a', Below), ('Ć', 'C', Acute), ('ć', 'c', Acute),
    ('Č', 'C', Caron), ('č', 'c', Caron), ('Ď', 'D', Caron), ('ď', 'd', Caron),
    ('Ē', 'E', Macron), ('ē', 'e', Macron), ('Ė', 'E', Dot), ('ė', 'e', Dot),
    ('Ę', 'E', Below), ('ę', 'e', Below), ('Ě', 'E', Caron), ('ě', 'e', Caron),
    ('Ğ', 'G', Breve), ('ğ', 'g', Breve), ('Ī', 'I', Macron), ('ī', 'i', Macron),
    ('İ', 'I', Dot), ('ı', 'i', Below), ('Ł', 'L', Below), ('ł', 'l', Below),
    ('Ń', 'N', Acute), ('ń', 'n', Acute), ('Ň', 'N', Caron), ('ň', 'n', Caron),
    ('Ō', 'O', Macron), ('ō', 'o', Macron), ('Ő', 'O', DoubleAcute), ('ő', 'o', DoubleAcute),
    ('Ř', 'R', Caron), ('ř', 'r', Caron), ('Ś', 'S', Acute), ('ś', 's', Acute),
    ('Ş', 'S', Below), ('ş', 's', Below), ('Š', 'S', Caron), ('š', 's', Caron),
    ('Ţ', 'T', Below), ('ţ', 't', Below), ('Ť', 'T', Caron), ('ť', 't', Caron),
    ('Ū', 'U', Macron), ('ū', 'u', Macron), ('Ů', 'U', Ring), ('ů', 'u', Ring),
    ('Ű', 'U', DoubleAcute), ('ű', 'u', DoubleAcute), ('Ź', 'Z', Acute), ('ź', 'z', Acute),
    ('Ż', 'Z', Dot), ('ż', 'z', Dot), ('Ž', 'Z', Caron), ('ž', 'z', Caron),
    // Vietnamese vowels keep their tone mark
    ('ơ', 'o', Below), ('ư', 'u', Below), ('ạ', 'a', Below), ('ả', 'a', Hook),
    ('ấ', 'a', Acute), ('ầ', 'a', Grave), ('ẩ', 'a', Hook), ('ẫ', 'a', Tilde),
    ('ậ', 'a', Circumflex), ('ắ', 'a', Acute), ('ằ', 'a', Grave), ('ẳ', 'a', Hook),
    ('ẵ', 'a', Tilde), ('ặ', 'a', Breve), ('ẹ', 'e', Below), ('ẻ', 'e', Hook),
    ('ẽ', 'e', Tilde), ('ế', 'e', Acute), ('ề', 'e', Grave), ('ể', 'e', Hook),
    ('ễ', 'e', Tilde), ('ệ', 'e', Circumflex), ('ỉ', 'i', Hook), ('ị', 'i', Below),
    ('ọ', 'o', Below), ('ỏ', 'o', Hook), ('ố', 'o', Acute), ('ồ', 'o', Grave),
    ('ổ', 'o', Hook), ('ỗ', 'o', Tilde), ('ộ', 'o', Circumflex), ('ớ', 'o', Acute),
    ('ờ', 'o', Grave), ('ở', 'o', Hook), ('ỡ', 'o', Tilde), ('ợ', 'o', Below),
    ('ụ', 'u', Below), ('ủ', 'u', Hook), ('ứ', 'u', Acute), ('ừ', 'u', Grave),
    ('ử', 'u', Hook), ('ữ', 'u', Tilde), ('ự', 'u', Below), ('ỳ', 'y', Grave),
    ('ỵ', 'y', Below), ('ỷ', 'y', Hook), ('ỹ', 'y', Tilde),
];

/// Column bitmap for `c`. Printable ASCII, Latin-1 letters and the common
/// extended Latin letters have a glyph; anything else gets a box.
pub fn glyph(c: char) -> [u8; 5] {
    let c = ALIASES
        .iter()
        .find(|(alias, _)| *alias == c)
        .map_or(c, |&(_, plain)| plain);
    if let Some(bits) = ascii(c) {
        return bits;
    }
    if let Some((_, bits)) = STANDALONE.iter().find(|(special, _)| *special == c) {
        return *bits;
    }
    ACCENTED
        .iter()
        .find(|(accented, ..)| *accented == c)
        .and_then(|&(_, base, mark)| Some(compose(ascii(base)?, base, mark)))
        .unwrap_or(REPLACEMENT)
}

fn ascii(c: char) -> Option<[u8; 5]> {
    u32::from(c)
        .checked_sub(FIRST)
        .and_then(|offset| ASCII.get(offset as usize))
        .copied()
}

/// Places `mark` above `base`. Bases with blank top rows take the two-row
/// mark; `i` and `j` lose their dot first. Otherwise row 1 is dropped to make
/// room for a one-row mark.
fn compose(mut base: [u8; 5], letter: char, mark: Mark) -> [u8; 5] {
    if mark == Below {
        return base;
    }
    if matches!(letter, 'i' | 'j') {
        base.iter_mut().for_each(|column| *column &= !0x01);
    }
    let accent = if base.iter().all(|column| column & 0x03 == 0) {
        mark.tall()
    } else {
        base.iter_mut()
            .for_each(|column| *column = (*column & 0x7C) | ((*column & 0x01) << 1));
        mark.flat()
    };
    let mut composed = base;
    for (column, bits) in composed.iter_mut().zip(accent) {
        *column |= bits;
    }
    composed
}

/// Pixel size of one glyph dot for a CSS-style font size.
pub fn dot_size(font_size: u32) -> u32 {
    ((font_size + 4) / CELL_HEIGHT).max(1)
}

pub fn char_width(font_size: u32) -> u32 {
    CELL_WIDTH * dot_size(font_size)
}

pub fn glyph_height(font_size: u32) -> u32 {
    GLYPH_ROWS * dot_size(font_size)
}

pub fn text_width(text: &str, font_size: u32) -> u32 {
    text.chars().count() as u32 * char_width(font_size)
}

/// Greedy word wrap to `max_width` pixels. Words wider than a line are split.
/// Always returns at least one line.
pub fn wrap(text: &str, font_size: u32, max_width: u32) -> Vec<String> {
    let per_line = (max_width / char_width(font_size)).max(1) as usize;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while chars.len() > per_line {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(per_line);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }

        let needed = if current_len == 0 {
            chars.len()
        } else {
            current_len + 1 + chars.len()
        };
        if needed > per_line {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += chars.len();
        current.extend(chars);
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
