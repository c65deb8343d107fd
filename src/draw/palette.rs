//! Fixed color palette of the promo.

use crate::foundation::core::Rgba8;

pub(crate) const BG_TOP: Rgba8 = Rgba8::hex(0xfff3ea);
pub(crate) const BG_BOTTOM: Rgba8 = Rgba8::hex(0xffdcc6);
pub(crate) const ACCENT: Rgba8 = Rgba8::hex(0xff8a5b);
pub(crate) const INK: Rgba8 = Rgba8::hex(0x2b2b2b);
pub(crate) const FOOTER_INK: Rgba8 = Rgba8::hex(0x6b6b6b);
pub(crate) const WHITE: Rgba8 = Rgba8::hex(0xffffff);
pub(crate) const CARD_OUTLINE: Rgba8 = Rgba8::hex(0xffd1bd);

pub(crate) const HOUSE_BODY: Rgba8 = Rgba8::hex(0xffe2cf);
pub(crate) const HOUSE_ROOF: Rgba8 = Rgba8::hex(0xffb38a);
pub(crate) const HOUSE_DOOR: Rgba8 = Rgba8::hex(0xd07b50);

pub(crate) const STOVE_BODY: Rgba8 = Rgba8::hex(0xe9eef2);
pub(crate) const STOVE_PANEL: Rgba8 = Rgba8::hex(0xcfd8df);
pub(crate) const STOVE_KNOB: Rgba8 = Rgba8::hex(0x6b7c8a);
pub(crate) const FLAME: Rgba8 = Rgba8 {
    r: 255,
    g: 140,
    b: 66,
    a: 179,
};

pub(crate) const STATUS_OK: Rgba8 = Rgba8::hex(0x2ecc71);
pub(crate) const STATUS_IDLE: Rgba8 = Rgba8::hex(0xf1c40f);

pub(crate) const BRAND_GREEN: Rgba8 = Rgba8::hex(0x25d366);
