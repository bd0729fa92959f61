use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern};

const HEADER_BG: u32 = 0x2F75B5;
const TOTAL_BG: u32 = 0xEAF3FB;

/// Cell formats shared by every sheet of an export.
pub(crate) struct Styles {
    pub title: Format,
    pub header: Format,
    pub text: Format,
    pub hours: Format,
    pub money: Format,
    pub percent: Format,
    pub integer: Format,
    pub total_label: Format,
    pub total_hours: Format,
    pub total_money: Format,
    pub total_percent: Format,
    pub total_integer: Format,
}

impl Styles {
    pub fn new() -> Self {
        let cell = Format::new().set_border(FormatBorder::Thin);
        let total = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(TOTAL_BG))
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin);

        Self {
            title: Format::new().set_bold().set_font_size(14),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(0xFFFFFF))
                .set_background_color(Color::RGB(HEADER_BG))
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center),
            text: cell.clone(),
            hours: cell.clone().set_num_format("0.00"),
            money: cell.clone().set_num_format("#,##0.00"),
            percent: cell.clone().set_num_format("0.0%"),
            integer: cell.set_num_format("0"),
            total_label: total.clone(),
            total_hours: total.clone().set_num_format("0.00"),
            total_money: total.clone().set_num_format("#,##0.00"),
            total_percent: total.clone().set_num_format("0.0%"),
            total_integer: total.set_num_format("0"),
        }
    }
}
