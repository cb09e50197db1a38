use indexmap::IndexMap;
use itertools::Itertools;
use jzon::JsonValue;

use crate::boards::Board;

/// Board oscillator frequency assumed by every generated design.
pub const REF_CLK_HZ: u32 = 100_000_000;
/// Toggle rate of the generated stimulus.
pub const TICK_HZ: u32 = 100;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttrVal {
    Str(String),
    Int(u32),
}

/// Ordered list of electrical attributes applied to one IO buffer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PinAttrs {
    pub attrs: Vec<(&'static str, AttrVal)>,
}

impl PinAttrs {
    pub fn attr_str(&mut self, name: &'static str, val: &str) {
        self.attrs.push((name, AttrVal::Str(val.to_string())));
    }

    pub fn attr_int(&mut self, name: &'static str, val: u32) {
        self.attrs.push((name, AttrVal::Int(val)));
    }

    pub fn output_attrs(iostandard: &str, drive: u32, slew: &str) -> Self {
        let mut attrs = PinAttrs::default();
        attrs.attr_str("IOSTANDARD", iostandard);
        if drive != 0 {
            attrs.attr_int("DRIVE", drive);
        }
        attrs.attr_str("SLEW", slew);
        attrs
    }

    pub fn input_attrs(iostandard: &str, in_term: &str) -> Self {
        let mut attrs = PinAttrs::default();
        attrs.attr_str("IOSTANDARD", iostandard);
        attrs.attr_str("IN_TERM", in_term);
        attrs
    }

    pub fn get(&self, name: &str) -> Option<&AttrVal> {
        self.attrs
            .iter()
            .find(|&&(attr, _)| attr == name)
            .map(|(_, val)| val)
    }

    /// Inline parameter list for a buffer instantiation; string values are
    /// quoted, integers are not.
    pub fn verilog_params(&self) -> String {
        self.attrs
            .iter()
            .map(|(name, val)| match val {
                AttrVal::Str(s) => format!(".{name}(\"{s}\")"),
                AttrVal::Int(i) => format!(".{name}({i})"),
            })
            .join(",")
    }
}

impl From<&PinAttrs> for JsonValue {
    fn from(attrs: &PinAttrs) -> Self {
        jzon::object::Object::from_iter(attrs.attrs.iter().map(|(name, val)| {
            (
                *name,
                match val {
                    AttrVal::Str(s) => JsonValue::from(s.as_str()),
                    AttrVal::Int(i) => JsonValue::from(*i),
                },
            )
        }))
        .into()
    }
}

/// Manifest of the attributes applied to each physical pin, keyed by package
/// pin, in pin consumption order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IoSettings {
    pub pins: IndexMap<String, PinAttrs>,
}

impl IoSettings {
    pub fn insert(&mut self, pin: &str, attrs: PinAttrs) {
        self.pins.insert(pin.to_string(), attrs);
    }

    pub fn to_json(&self) -> String {
        JsonValue::from(self).pretty(2)
    }
}

impl From<&IoSettings> for JsonValue {
    fn from(settings: &IoSettings) -> Self {
        jzon::object::Object::from_iter(
            settings
                .pins
                .iter()
                .map(|(pin, attrs)| (pin.as_str(), attrs)),
        )
        .into()
    }
}

/// The three outputs of one generation routine.
#[derive(Debug)]
pub struct Fixture {
    pub verilog: String,
    pub pcf: String,
    pub iosettings: IoSettings,
}

/// Every constraint file starts with the clock binding.
pub fn pcf_clock(board: &Board) -> String {
    format!("\nset_io clk {}\n", board.clock)
}
